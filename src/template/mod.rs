//! Template model, validation and preview.
//!
//! ## Main Parts
//!
//! - [`Template`] - Typed template with ordered subdirectories
//! - [`FileEntry`] / [`FileKind`] - Files declared in a subdirectory
//! - [`ProjectParams`] - Parameters for project-specific substitution
//! - [`validate_document`] - Structural check over raw JSON documents
//! - [`render_tree`] - Box-drawing preview

#[allow(clippy::module_inception)]
pub mod template;
pub mod tree;
pub mod validate;

pub use template::{FileEntry, FileKind, NUMBER_PLACEHOLDER, ProjectParams, Subdirectory, Template};
pub use tree::render_tree;
pub use validate::validate_document;
