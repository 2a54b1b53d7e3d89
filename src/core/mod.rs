// src/core/mod.rs
//! Shared services for the binary: configuration and input handling

pub mod config_manager;
pub mod fs_ops;

pub use config_manager::ConfigManager;
pub use fs_ops::FsOps;
