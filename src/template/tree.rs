//! Text tree preview of a template.

use std::fmt::Write;

use super::Template;

const BRANCH: &str = "├── ";
const LAST_BRANCH: &str = "└── ";
const PIPE: &str = "│   ";
const SPACE: &str = "    ";

/// Label used for the subdirectory key that stands for the main directory.
const ROOT_LABEL: &str = ".";

/// Render a template as a box-drawing tree.
///
/// # Output Format
///
/// ```text
/// project
/// ├── ./
/// │   └── README.md
/// ├── docs/
/// │   ├── notes.txt
/// │   └── brief.docx
/// └── data/
///     └── (empty)
/// ```
#[must_use]
pub fn render_tree(template: &Template) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", template.main_directory);

    let count = template.subdirectories.len();
    for (i, (subdir, contents)) in template.subdirectories.iter().enumerate() {
        let is_last = i + 1 == count;
        let (connector, prefix) = if is_last {
            (LAST_BRANCH, SPACE)
        } else {
            (BRANCH, PIPE)
        };

        let label = if subdir.is_empty() { ROOT_LABEL } else { subdir };
        let _ = writeln!(out, "{connector}{label}/");

        if contents.files.is_empty() {
            let _ = writeln!(out, "{prefix}{LAST_BRANCH}(empty)");
            continue;
        }

        let file_count = contents.files.len();
        for (j, file) in contents.files.iter().enumerate() {
            let file_connector = if j + 1 == file_count {
                LAST_BRANCH
            } else {
                BRANCH
            };
            let _ = writeln!(out, "{prefix}{file_connector}{}", file.name);
        }
    }

    out
}
