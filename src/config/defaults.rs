//! Hardcoded fallbacks used when neither the CLI nor the config file set a value.

use std::path::PathBuf;

/// Template used by `--generate` and the watcher when none is configured.
pub const DEFAULT_TEMPLATE: &str = "defaults/ace_basic.json";

const APP_DIR: &str = "scaffold-dirs";

/// Template store root: `<data_dir>/scaffold-dirs/templates`, or `./templates`
/// when the platform has no data directory.
#[must_use]
pub fn default_templates_dir() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("templates"),
        |dir| dir.join(APP_DIR).join("templates"),
    )
}

/// Seen-files log: `<data_dir>/scaffold-dirs/seen_files.txt`, or
/// `./seen_files.txt` when the platform has no data directory.
#[must_use]
pub fn default_seen_log() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from("seen_files.txt"),
        |dir| dir.join(APP_DIR).join("seen_files.txt"),
    )
}
