//! Structural validation of raw template documents.
//!
//! Validation runs on the untyped JSON so that every problem in a document
//! can be reported at once, instead of stopping at the first decode error.

use serde_json::Value;

const REQUIRED_KEYS: [&str; 2] = ["main_directory", "subdirectories"];
const FILE_KINDS: [&str; 2] = ["empty", "template"];

/// Check a template document and collect human-readable error messages.
///
/// The returned list is in document order and is empty when the document is
/// a valid template. This function never fails and has no side effects.
#[must_use]
pub fn validate_document(document: &Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = document.as_object() else {
        errors.push("Template must be a JSON object.".to_string());
        return errors;
    };

    for key in REQUIRED_KEYS {
        if !root.contains_key(key) {
            errors.push(format!("Missing required key: '{key}'"));
        }
    }

    if let Some(main) = root.get("main_directory")
        && !main.as_str().is_some_and(|s| !s.trim().is_empty())
    {
        errors.push("'main_directory' must be a non-empty string.".to_string());
    }

    match root.get("subdirectories") {
        Some(Value::Object(subdirectories)) => {
            for (subdir, contents) in subdirectories {
                validate_subdirectory(subdir, contents, &mut errors);
            }
        }
        Some(_) => errors.push("'subdirectories' must be a dictionary.".to_string()),
        None => {}
    }

    errors
}

fn validate_subdirectory(subdir: &str, contents: &Value, errors: &mut Vec<String>) {
    let Some(contents) = contents.as_object() else {
        errors.push(format!("Subdirectory '{subdir}' must be a dictionary."));
        return;
    };

    match contents.get("files") {
        None => errors.push(format!("Subdirectory '{subdir}' is missing a 'files' list.")),
        Some(Value::Array(files)) => {
            for file in files {
                validate_file_entry(subdir, file, errors);
            }
        }
        Some(_) => errors.push(format!("'files' in subdirectory '{subdir}' must be a list.")),
    }
}

fn validate_file_entry(subdir: &str, file: &Value, errors: &mut Vec<String>) {
    let Some(file) = file.as_object() else {
        errors.push(format!("File entry in '{subdir}' must be a dictionary."));
        return;
    };

    let (Some(name), Some(kind)) = (file.get("name"), file.get("type")) else {
        errors.push(format!("File entry in '{subdir}' must have 'name' and 'type' keys."));
        return;
    };

    let name = name.as_str().map_or_else(|| name.to_string(), str::to_string);

    if kind.as_str() == Some("template") && !file.contains_key("source") {
        errors.push(format!(
            "Template file '{name}' in '{subdir}' is missing a 'source' key."
        ));
    } else if !kind.as_str().is_some_and(|k| FILE_KINDS.contains(&k)) {
        errors.push(format!(
            "Invalid file type for '{name}' in '{subdir}'. Must be 'empty' or 'template'."
        ));
    }
}
