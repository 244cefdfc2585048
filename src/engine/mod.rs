//! Template engine operations.
//!
//! This module contains everything that turns templates into directories and
//! back:
//!
//! - [`Generator`] - Materializes a template under an output root
//! - [`clone_directory`] - Captures an existing tree as a template
//! - [`search`] - Finds subdirectories by key or file name
//! - [`export_directory_map`] - Writes a text map of a real directory

pub mod clone;
pub mod generate;
pub mod map;
pub mod search;

pub use clone::{check_source_directory, clone_directory, template_from_directory};
pub use generate::{GenerateReport, Generator};
pub use map::{export_directory_map, render_directory_map};
pub use search::{search, search_named};
