//! Substring search over template contents.

use crate::{error::Result, store::TemplateStore, template::Template};

/// Find subdirectories matching `query`.
///
/// A subdirectory matches when its own key, or the name of any file it
/// contains, includes `query`. Matches are returned in template order and
/// each subdirectory appears at most once.
#[must_use]
pub fn search(template: &Template, query: &str) -> Vec<String> {
    template
        .subdirectories
        .iter()
        .filter(|(subdir, contents)| {
            subdir.contains(query) || contents.files.iter().any(|f| f.name.contains(query))
        })
        .map(|(subdir, _)| subdir.clone())
        .collect()
}

/// Load a template from the store and search it.
///
/// # Errors
///
/// Any error from [`TemplateStore::load`].
pub fn search_named(store: &TemplateStore, name: &str, query: &str) -> Result<Vec<String>> {
    let template = store.load(name)?;
    Ok(search(&template, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::FileEntry;

    fn sample() -> Template {
        Template::new("project")
            .with_subdirectory("main_docs", vec![FileEntry::empty("readme.md")])
            .with_subdirectory(
                "src",
                vec![FileEntry::empty("main.rs"), FileEntry::empty("main_test.rs")],
            )
            .with_subdirectory("assets", vec![FileEntry::empty("logo.png")])
    }

    #[test]
    fn test_search_matches_keys_and_file_names() {
        assert_eq!(search(&sample(), "main"), vec!["main_docs", "src"]);
    }

    #[test]
    fn test_search_reports_directory_once() {
        let results = search(&sample(), ".rs");
        assert_eq!(results, vec!["src"]);
    }

    #[test]
    fn test_search_without_matches() {
        assert!(search(&sample(), "nothing").is_empty());
    }
}
