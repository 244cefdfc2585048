//! Configuration types and defaults for the application.
//!
//! This module contains the persistent configuration file model and the
//! hardcoded defaults that apply when neither the CLI nor the file sets a value.

pub mod defaults;
pub mod file;

pub use defaults::{DEFAULT_TEMPLATE, default_seen_log, default_templates_dir};
pub use file::{FileConfig, FileWatchConfig, expand_tilde};
