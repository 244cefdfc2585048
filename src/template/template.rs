//! Core template data structures.
//!
//! A [`Template`] is the typed form of a template document: a main directory
//! name plus an ordered mapping of subdirectories to the files they contain.

use std::{
    fmt::{self, Display, Formatter},
    path::PathBuf,
};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Result, ScaffoldError};

use super::validate::validate_document;

/// Token in file names that parameter substitution replaces with the project number.
pub const NUMBER_PLACEHOLDER: &str = "xxxxx";

/// How a file is materialized during generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    /// Zero-length file
    Empty,

    /// Byte copy of the entry's `source`
    Template,
}

impl Display for FileKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::Template => write!(f, "template"),
        }
    }
}

/// One file declared inside a subdirectory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    /// File name relative to its subdirectory
    pub name: String,

    #[serde(rename = "type")]
    pub kind: FileKind,

    /// Path of the file whose bytes are copied; required for [`FileKind::Template`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

impl FileEntry {
    /// A zero-length file entry.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Empty,
            source: None,
        }
    }

    /// A file entry copied from `source` at generation time.
    #[must_use]
    pub fn from_source(name: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind: FileKind::Template,
            source: Some(source.into()),
        }
    }
}

/// The file list of a single subdirectory.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subdirectory {
    pub files: Vec<FileEntry>,
}

/// Project name and number used to parameterize a template.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProjectParams {
    pub name: String,
    pub number: String,
}

impl ProjectParams {
    #[must_use]
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            number: number.into(),
        }
    }

    /// Directory name a parameterized template generates: `{name}-{number}`.
    #[must_use]
    pub fn directory_name(&self) -> String {
        format!("{}-{}", self.name, self.number)
    }
}

/// Declarative description of a directory tree.
///
/// Subdirectory keys are paths relative to the main directory. The empty key
/// stands for the main directory itself. Key order is the document order and
/// is the order generation and preview follow.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    pub main_directory: String,

    pub subdirectories: IndexMap<String, Subdirectory>,
}

impl Template {
    #[must_use]
    pub fn new(main_directory: impl Into<String>) -> Self {
        Self {
            main_directory: main_directory.into(),
            subdirectories: IndexMap::new(),
        }
    }

    /// Builder-style helper that appends a subdirectory with its files.
    #[must_use]
    pub fn with_subdirectory(mut self, key: impl Into<String>, files: Vec<FileEntry>) -> Self {
        self.subdirectories.insert(key.into(), Subdirectory { files });
        self
    }

    /// Decode a raw template document after validating its structure.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::SchemaInvalid`] with every validation message if
    ///   the document is structurally invalid
    /// - [`ScaffoldError::MalformedInput`] if decoding fails anyway
    pub fn from_document(name: &str, document: Value) -> Result<Self> {
        let errors = validate_document(&document);
        if !errors.is_empty() {
            return Err(ScaffoldError::SchemaInvalid {
                name: name.to_string(),
                errors,
            });
        }

        serde_json::from_value(document).map_err(|source| ScaffoldError::MalformedInput {
            path: PathBuf::from(name),
            source,
        })
    }

    /// Check the invariants serde cannot enforce on the typed form.
    ///
    /// Returns the validation messages in declaration order; an empty list
    /// means the template can be generated.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.main_directory.trim().is_empty() {
            errors.push("'main_directory' must be a non-empty string.".to_string());
        }

        for (subdir, contents) in &self.subdirectories {
            for file in &contents.files {
                if file.name.is_empty() {
                    errors.push(format!("File entry in '{subdir}' has an empty 'name'."));
                } else if file.kind == FileKind::Template && file.source.is_none() {
                    errors.push(format!(
                        "Template file '{}' in '{subdir}' is missing a 'source' key.",
                        file.name
                    ));
                }
            }
        }

        errors
    }

    /// Rewrite the template for a concrete project.
    ///
    /// Sets the main directory to `{name}-{number}` and replaces every
    /// [`NUMBER_PLACEHOLDER`] in file names with the project number. Once the
    /// placeholders are gone, applying the same parameters again changes nothing.
    pub fn apply_project(&mut self, params: &ProjectParams) {
        self.main_directory = params.directory_name();

        for file in self
            .subdirectories
            .values_mut()
            .flat_map(|contents| contents.files.iter_mut())
        {
            if file.name.contains(NUMBER_PLACEHOLDER) {
                file.name = file.name.replace(NUMBER_PLACEHOLDER, &params.number);
            }
        }
    }

    /// Total number of file entries across all subdirectories.
    #[must_use]
    pub fn file_count(&self) -> usize {
        self.subdirectories.values().map(|s| s.files.len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Template {
        Template::new("base")
            .with_subdirectory(
                "docs",
                vec![
                    FileEntry::empty("xxxxx_notes.txt"),
                    FileEntry::empty("readme.md"),
                ],
            )
            .with_subdirectory("data", vec![FileEntry::empty("xxxxx-xxxxx.csv")])
    }

    #[test]
    fn test_apply_project_rewrites_main_directory_and_placeholders() {
        let mut template = sample();
        template.apply_project(&ProjectParams::new("Acme", "042"));

        assert_eq!(template.main_directory, "Acme-042");
        assert_eq!(template.subdirectories["docs"].files[0].name, "042_notes.txt");
        assert_eq!(template.subdirectories["docs"].files[1].name, "readme.md");
        assert_eq!(template.subdirectories["data"].files[0].name, "042-042.csv");
    }

    #[test]
    fn test_apply_project_twice_is_idempotent() {
        let params = ProjectParams::new("Acme", "042");
        let mut once = sample();
        once.apply_project(&params);

        let mut twice = once.clone();
        twice.apply_project(&params);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_from_document_preserves_order() {
        let document = json!({
            "main_directory": "root",
            "subdirectories": {
                "zeta": {"files": []},
                "alpha": {"files": [{"name": "a.txt", "type": "empty"}]},
                "": {"files": []}
            }
        });

        let template = Template::from_document("t.json", document).unwrap();
        let keys: Vec<_> = template.subdirectories.keys().cloned().collect();

        assert_eq!(keys, vec!["zeta", "alpha", ""]);
    }

    #[test]
    fn test_from_document_reports_schema_errors() {
        let document = json!({"subdirectories": {"x": {}}});

        match Template::from_document("broken.json", document) {
            Err(ScaffoldError::SchemaInvalid { name, errors }) => {
                assert_eq!(name, "broken.json");
                assert_eq!(errors.len(), 2);
            }
            other => panic!("expected SchemaInvalid, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_typed_template() {
        let mut template = sample();
        assert!(template.validate().is_empty());

        template.main_directory = String::new();
        template.subdirectories["docs"].files.push(FileEntry {
            name: "letter.docx".to_string(),
            kind: FileKind::Template,
            source: None,
        });

        let errors = template.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[1].contains("letter.docx"));
    }

    #[test]
    fn test_source_is_omitted_when_absent() {
        let value = serde_json::to_value(FileEntry::empty("a.txt")).unwrap();
        assert_eq!(value, json!({"name": "a.txt", "type": "empty"}));
    }

    #[test]
    fn test_file_count() {
        assert_eq!(sample().file_count(), 3);
    }
}
