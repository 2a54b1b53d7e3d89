// src/session/mod.rs
//! Automatic session expiry after user inactivity

pub mod activity;
pub mod countdown;
pub mod timeout;

pub use activity::{ActivityBus, ActivityEvent};
pub use countdown::{format_countdown, is_urgent};
pub use timeout::{SessionCallback, SessionPhase, SessionSnapshot, SessionTimeout, SessionTimeoutConfig};
