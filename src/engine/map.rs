//! Plain-text maps of real directory trees.

use std::{fmt::Write, fs, path::Path};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::error::{Result, ScaffoldError};

use super::clone::check_source_directory;

const INDENT: &str = "    ";

/// Render the directory tree at `root` as an indented listing.
///
/// Each directory is written as `name/` followed by its files, then its
/// subdirectories, all sorted by name and indented four spaces per level.
///
/// # Output Format
///
/// ```text
/// project/
///     README.md
///     docs/
///         notes.txt
/// ```
///
/// # Errors
///
/// Any error from [`check_source_directory`].
pub fn render_directory_map(root: &Path) -> Result<String> {
    check_source_directory(root)?;

    let mut out = String::new();

    let walker = WalkDir::new(root).sort_by(|a, b| {
        a.file_type()
            .is_dir()
            .cmp(&b.file_type().is_dir())
            .then_with(|| a.file_name().cmp(b.file_name()))
    });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry while mapping: {e}");
                continue;
            }
        };

        let indent = INDENT.repeat(entry.depth());
        let name = if entry.depth() == 0 {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
                .unwrap_or_else(|| root.display().to_string())
        } else {
            entry.file_name().to_string_lossy().into_owned()
        };

        let suffix = if entry.file_type().is_dir() { "/" } else { "" };
        let _ = writeln!(out, "{indent}{name}{suffix}");
    }

    Ok(out)
}

/// Write the map of `root` to `output_file`.
///
/// # Errors
///
/// Any error from [`render_directory_map`], or [`ScaffoldError::Io`] if the
/// map cannot be written.
pub fn export_directory_map(root: &Path, output_file: &Path) -> Result<()> {
    let map = render_directory_map(root)?;
    fs::write(output_file, map).map_err(|e| ScaffoldError::io(output_file, e))?;

    info!(
        root = %root.display(),
        output = %output_file.display(),
        "Directory map exported"
    );
    Ok(())
}
