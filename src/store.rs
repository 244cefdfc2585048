//! Flat-file template persistence.
//!
//! Templates are JSON files split into two namespaces under a store root:
//!
//! ```text
//! <root>/
//! ├── defaults/         templates shipped with an installation
//! ├── user_created/     templates saved or cloned by users
//! └── file_templates/   source files referenced by `template` entries
//! ```
//!
//! Templates are addressed by namespaced identifiers such as
//! `defaults/basic.json` or `user_created/site.json`. A bare file name
//! refers to the user namespace.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::{
    error::{Result, ScaffoldError},
    template::Template,
};

/// Directory and identifier prefix of the default namespace.
pub const DEFAULTS_NAMESPACE: &str = "defaults";

/// Directory and identifier prefix of the user namespace.
pub const USER_NAMESPACE: &str = "user_created";

/// Directory holding source files for `template` file entries.
pub const FILE_TEMPLATES_DIR: &str = "file_templates";

/// A file in the file template pool.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileTemplate {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

/// Handle to a template store rooted at one directory.
#[derive(Clone, Debug)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    /// Open a store, creating its namespace directories if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] if a namespace directory cannot be created.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let store = Self { root: root.into() };

        for dir in [
            store.defaults_dir(),
            store.user_dir(),
            store.file_templates_dir(),
        ] {
            fs::create_dir_all(&dir).map_err(|e| ScaffoldError::io(&dir, e))?;
        }

        debug!(root = %store.root.display(), "Opened template store");
        Ok(store)
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn defaults_dir(&self) -> PathBuf {
        self.root.join(DEFAULTS_NAMESPACE)
    }

    #[must_use]
    pub fn user_dir(&self) -> PathBuf {
        self.root.join(USER_NAMESPACE)
    }

    #[must_use]
    pub fn file_templates_dir(&self) -> PathBuf {
        self.root.join(FILE_TEMPLATES_DIR)
    }

    /// List every template as a namespaced identifier.
    ///
    /// Defaults come first, then user templates; each namespace is sorted by
    /// file name.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] if a namespace directory cannot be read.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut templates = Vec::new();

        for (namespace, dir) in [
            (DEFAULTS_NAMESPACE, self.defaults_dir()),
            (USER_NAMESPACE, self.user_dir()),
        ] {
            templates.extend(
                json_file_names(&dir)?
                    .into_iter()
                    .map(|name| format!("{namespace}/{name}")),
            );
        }

        Ok(templates)
    }

    /// Read and parse a template document without validating it.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::InvalidName`] if the name escapes its namespace
    /// - [`ScaffoldError::NotFound`] if the template file does not exist
    /// - [`ScaffoldError::MalformedInput`] if the file is not valid JSON
    pub fn load_document(&self, name: &str) -> Result<Value> {
        let path = self.resolve(name)?;

        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(ScaffoldError::NotFound(format!("template '{name}'")));
            }
            Err(e) => return Err(ScaffoldError::io(&path, e)),
        };

        serde_json::from_str(&content)
            .map_err(|source| ScaffoldError::MalformedInput { path, source })
    }

    /// Load, validate and decode a template.
    ///
    /// # Errors
    ///
    /// Everything [`load_document`](Self::load_document) returns, plus
    /// [`ScaffoldError::SchemaInvalid`] when the document fails validation.
    pub fn load(&self, name: &str) -> Result<Template> {
        let document = self.load_document(name)?;
        Template::from_document(name, document)
    }

    /// Save a template, silently replacing any existing file of that name.
    ///
    /// The document is written as JSON indented with four spaces. Returns
    /// the path that was written.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::InvalidName`] if the name escapes its namespace
    /// - [`ScaffoldError::Io`] if the file cannot be written
    pub fn save(&self, name: &str, template: &Template, is_default: bool) -> Result<PathBuf> {
        let file_name = plain_file_name(strip_namespace(name).1, name)?;
        let dir = if is_default {
            self.defaults_dir()
        } else {
            self.user_dir()
        };
        let path = dir.join(file_name);

        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        template
            .serialize(&mut serializer)
            .map_err(|source| ScaffoldError::MalformedInput {
                path: path.clone(),
                source,
            })?;
        buf.push(b'\n');

        fs::write(&path, buf).map_err(|e| ScaffoldError::io(&path, e))?;

        info!(template = name, path = %path.display(), "Template saved");
        Ok(path)
    }

    /// Copy a file into the file template pool.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::NotFound`] if `source` is not an existing regular file
    /// - [`ScaffoldError::Io`] if the copy fails
    pub fn add_file_template(&self, source: &Path) -> Result<PathBuf> {
        if !source.is_file() {
            return Err(ScaffoldError::NotFound(format!(
                "'{}' is not a valid file",
                source.display()
            )));
        }

        let file_name = source
            .file_name()
            .ok_or_else(|| ScaffoldError::NotFound(source.display().to_string()))?;
        let destination = self.file_templates_dir().join(file_name);

        fs::copy(source, &destination).map_err(|e| ScaffoldError::io(&destination, e))?;

        info!(path = %destination.display(), "File template added");
        Ok(destination)
    }

    /// List the file template pool, sorted by name.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] if the pool directory cannot be read.
    pub fn list_file_templates(&self) -> Result<Vec<FileTemplate>> {
        let dir = self.file_templates_dir();
        let entries = fs::read_dir(&dir).map_err(|e| ScaffoldError::io(&dir, e))?;

        let mut templates: Vec<_> = entries
            .flatten()
            .filter_map(|entry| {
                let metadata = entry.metadata().ok()?;
                metadata.is_file().then(|| FileTemplate {
                    name: entry.file_name().to_string_lossy().into_owned(),
                    path: entry.path(),
                    size: metadata.len(),
                })
            })
            .collect();

        templates.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(templates)
    }

    /// Locate the source file of a `template` file entry.
    ///
    /// Absolute paths are used as given. A relative path is looked up in the
    /// file template pool first and otherwise taken relative to the working
    /// directory.
    #[must_use]
    pub fn resolve_source(&self, source: &Path) -> PathBuf {
        if source.is_relative() {
            let pooled = self.file_templates_dir().join(source);
            if pooled.is_file() {
                return pooled;
            }
        }
        source.to_path_buf()
    }

    fn resolve(&self, name: &str) -> Result<PathBuf> {
        let (namespace, rest) = strip_namespace(name);
        let file_name = plain_file_name(rest, name)?;

        let dir = if namespace == Some(DEFAULTS_NAMESPACE) {
            self.defaults_dir()
        } else {
            self.user_dir()
        };

        Ok(dir.join(file_name))
    }
}

/// Split a template identifier into its namespace (if any) and file name.
fn strip_namespace(name: &str) -> (Option<&'static str>, &str) {
    for namespace in [DEFAULTS_NAMESPACE, USER_NAMESPACE] {
        if let Some(rest) = name
            .strip_prefix(namespace)
            .and_then(|rest| rest.strip_prefix('/'))
        {
            return (Some(namespace), rest);
        }
    }
    (None, name)
}

fn plain_file_name<'a>(candidate: &'a str, requested: &str) -> Result<&'a str> {
    let is_plain = !candidate.is_empty()
        && candidate != "."
        && candidate != ".."
        && !candidate.contains(['/', '\\']);

    if is_plain {
        Ok(candidate)
    } else {
        Err(ScaffoldError::InvalidName(requested.to_string()))
    }
}

fn json_file_names(dir: &Path) -> Result<Vec<String>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ScaffoldError::io(dir, e)),
    };

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| path.file_name().map(|n| n.to_string_lossy().into_owned()))
        .collect();

    names.sort();
    Ok(names)
}
