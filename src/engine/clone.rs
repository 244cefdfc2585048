//! Turning an existing directory tree into a template.

use std::{
    fs,
    io::ErrorKind,
    path::{Component, Path},
};

use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::{
    error::{Result, ScaffoldError},
    store::TemplateStore,
    template::{FileEntry, Template},
};

/// Check that `path` is an existing, listable directory.
///
/// # Errors
///
/// - [`ScaffoldError::NotFound`] if nothing exists at `path`
/// - [`ScaffoldError::NotADirectory`] if `path` is not a directory
/// - [`ScaffoldError::PermissionDenied`] if the directory cannot be listed
pub fn check_source_directory(path: &Path) -> Result<()> {
    let metadata = match fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(ScaffoldError::NotFound(format!(
                "path does not exist: {}",
                path.display()
            )));
        }
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            return Err(ScaffoldError::PermissionDenied(path.to_path_buf()));
        }
        Err(e) => return Err(ScaffoldError::io(path, e)),
    };

    if !metadata.is_dir() {
        return Err(ScaffoldError::NotADirectory(path.to_path_buf()));
    }

    match fs::read_dir(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            Err(ScaffoldError::PermissionDenied(path.to_path_buf()))
        }
        Err(e) => Err(ScaffoldError::io(path, e)),
    }
}

/// Build a template describing the directory tree at `source`.
///
/// Every directory, including `source` itself under the empty key, becomes a
/// subdirectory entry listing its own regular files as `empty` entries.
/// Nested directories show up only as their own keys. Entries are visited in
/// name order. Unreadable nested entries are skipped with a warning.
///
/// # Errors
///
/// Any error from [`check_source_directory`].
pub fn template_from_directory(source: &Path) -> Result<Template> {
    check_source_directory(source)?;

    let mut template = Template::new(directory_name(source));

    for entry in WalkDir::new(source).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry while cloning: {e}");
                continue;
            }
        };

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };

        if entry.file_type().is_dir() {
            template
                .subdirectories
                .entry(template_key(relative))
                .or_default();
        } else if entry.path().is_file() {
            let parent = relative.parent().unwrap_or_else(|| Path::new(""));
            template
                .subdirectories
                .entry(template_key(parent))
                .or_default()
                .files
                .push(FileEntry::empty(
                    entry.file_name().to_string_lossy().into_owned(),
                ));
        }
    }

    debug!(
        source = %source.display(),
        subdirectories = template.subdirectories.len(),
        "Directory walked"
    );

    Ok(template)
}

/// Clone the directory tree at `source` into a template and save it.
///
/// # Errors
///
/// Any error from [`template_from_directory`] or [`TemplateStore::save`].
pub fn clone_directory(
    store: &TemplateStore,
    source: &Path,
    template_name: &str,
    is_default: bool,
) -> Result<Template> {
    let template = template_from_directory(source)?;
    store.save(template_name, &template, is_default)?;

    info!(
        source = %source.display(),
        template = template_name,
        "Directory cloned to template"
    );

    Ok(template)
}

/// Subdirectory key for a path relative to the cloned root, `/`-separated.
fn template_key(relative: &Path) -> String {
    relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn directory_name(source: &Path) -> String {
    source
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .or_else(|| {
            source
                .canonicalize()
                .ok()?
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| "cloned".to_string())
}
