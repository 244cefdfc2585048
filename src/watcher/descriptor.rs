//! Descriptor files that trigger generation.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_json::Value;

use crate::{
    error::{Result, ScaffoldError},
    template::ProjectParams,
};

/// File name a descriptor is copied to inside the generated project.
pub const DESCRIPTOR_COPY_NAME: &str = "project_vars.json";

/// The keys of a descriptor the watcher reads. Other keys are ignored here
/// and survive in the verbatim copy.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Descriptor {
    #[serde(default)]
    pub project_name: Option<Value>,

    #[serde(default)]
    pub project_number: Option<Value>,
}

impl Descriptor {
    /// Read and parse a descriptor file.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::Io`] if the file cannot be read
    /// - [`ScaffoldError::MalformedInput`] if it is not a JSON object
    pub fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScaffoldError::io(path, e))?;

        serde_json::from_str(&content).map_err(|source| ScaffoldError::MalformedInput {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Project parameters, if both keys hold a non-empty value.
    ///
    /// Numbers are accepted for either key and used in their JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::UnsafeProjectValue`] if either value contains
    /// a path separator, since both end up in generated paths.
    pub fn params(&self) -> Result<Option<ProjectParams>> {
        let (Some(name), Some(number)) = (
            text(self.project_name.as_ref()),
            text(self.project_number.as_ref()),
        ) else {
            return Ok(None);
        };

        if let Some(unsafe_value) = [&name, &number]
            .into_iter()
            .find(|value| value.contains(['/', '\\']))
        {
            return Err(ScaffoldError::UnsafeProjectValue(unsafe_value.clone()));
        }

        Ok(Some(ProjectParams::new(name, number)))
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
