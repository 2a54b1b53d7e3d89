// src/lib.rs
//! Applicant evaluation parsing and session expiry for the hiring dashboard

pub mod analysis;
pub mod cli;
pub mod core;
pub mod logging;
pub mod privacy;
pub mod session;

pub use analysis::{clean_evidence, parse, parse_with, AnalysisResult};
pub use session::{ActivityBus, ActivityEvent, SessionTimeout, SessionTimeoutConfig};
