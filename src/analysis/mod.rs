// src/analysis/mod.rs
//! Parsing of LLM-written applicant evaluation reports

pub mod clean;
pub mod parser;
pub mod patterns;
pub mod summary;
pub mod types;

pub use clean::clean_evidence;
pub use parser::{parse, parse_with};
pub use summary::{classification_description, Level};
pub use types::{
    AnalysisResult, CaptureThresholds, CultureFitEntry, FitStatus, Overview, ParserOptions,
    Profile, SkillEntry,
};
