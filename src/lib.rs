//! # scaffold-dirs
//!
//! Scaffold project directory trees from declarative JSON templates, and
//! generate them automatically from descriptor files dropped into a watched
//! folder.
//!
//! This library provides the core functionality for the scaffold-dirs CLI:
//! storing, validating, previewing, cloning, searching and generating
//! templates, plus the polling watcher that drives generation.

pub mod config;
pub mod engine;
pub mod error;
pub mod store;
pub mod template;
pub mod watcher;

pub use error::{Result, ScaffoldError};
