//! Materializing templates on disk.
//!
//! Generation is all-or-nothing at the validation boundary: an invalid
//! template is rejected before anything is written. Once writing starts,
//! problems with individual files are collected as warnings and the remaining
//! files are still generated.

use std::{
    fs::{self, File},
    path::{Path, PathBuf},
};

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};

use crate::{
    error::{Result, ScaffoldError},
    store::TemplateStore,
    template::{FileEntry, FileKind, ProjectParams, Template},
};

/// Outcome of a successful generation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GenerateReport {
    /// The generated main directory
    pub root: PathBuf,

    /// Number of directories created or reused, including the main directory
    pub directories: usize,

    /// Number of files written
    pub files: usize,

    /// Per-file problems that did not stop generation, in template order
    pub warnings: Vec<String>,
}

impl GenerateReport {
    /// Whether every declared file was written.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Writes templates to disk.
///
/// A generator optionally holds a [`TemplateStore`] so relative `source`
/// paths can be found in the store's file template pool.
#[derive(Clone, Debug, Default)]
pub struct Generator {
    store: Option<TemplateStore>,

    /// When `true`, suppresses the progress bar.
    quiet: bool,
}

impl Generator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative template sources against this store's file template pool.
    #[must_use]
    pub fn with_store(mut self, store: &TemplateStore) -> Self {
        self.store = Some(store.clone());
        self
    }

    /// Enable or disable quiet mode (hides the progress bar).
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Generate `template` under `output_root`.
    ///
    /// # Behavior
    ///
    /// 1. Validates the template; any error aborts before touching the filesystem
    /// 2. Creates `output_root/main_directory`
    /// 3. Creates each subdirectory in template order (the empty key is the
    ///    main directory itself)
    /// 4. Writes each file in order: `empty` entries become zero-length files,
    ///    `template` entries are copied from their source
    ///
    /// Existing directories are reused and existing files are overwritten.
    ///
    /// # Errors
    ///
    /// - [`ScaffoldError::SchemaInvalid`] if the template fails validation
    /// - [`ScaffoldError::Io`] if the main directory cannot be created
    pub fn generate(&self, template: &Template, output_root: &Path) -> Result<GenerateReport> {
        let errors = template.validate();
        if !errors.is_empty() {
            return Err(ScaffoldError::SchemaInvalid {
                name: template.main_directory.clone(),
                errors,
            });
        }

        let main_dir = output_root.join(&template.main_directory);
        fs::create_dir_all(&main_dir).map_err(|e| ScaffoldError::io(&main_dir, e))?;

        let mut report = GenerateReport {
            root: main_dir.clone(),
            directories: 1,
            ..GenerateReport::default()
        };

        let progress = self.progress_bar(template.file_count() as u64);

        for (subdir, contents) in &template.subdirectories {
            let subdir_path = if subdir.is_empty() {
                main_dir.clone()
            } else {
                main_dir.join(subdir)
            };

            if let Err(e) = fs::create_dir_all(&subdir_path) {
                let message = format!(
                    "Failed to create directory {}: {e}",
                    subdir_path.display()
                );
                warn!("{message}");
                report.warnings.push(message);
                progress.inc(contents.files.len() as u64);
                continue;
            }
            if !subdir.is_empty() {
                report.directories += 1;
            }

            for file in &contents.files {
                let target = subdir_path.join(&file.name);
                progress.set_message(file.name.clone());

                match self.write_file(file, &target) {
                    Ok(()) => report.files += 1,
                    Err(message) => {
                        warn!("{message}");
                        report.warnings.push(message);
                    }
                }

                progress.inc(1);
            }
        }

        progress.finish_and_clear();
        info!(
            path = %main_dir.display(),
            files = report.files,
            warnings = report.warnings.len(),
            "Directory structure generated"
        );

        Ok(report)
    }

    /// Load a template from the store, parameterize it and generate it.
    ///
    /// This is the entry point behind `--generate`.
    ///
    /// # Errors
    ///
    /// Any error from [`TemplateStore::load`] or [`generate`](Self::generate).
    pub fn generate_named(
        &self,
        store: &TemplateStore,
        name: &str,
        output_root: &Path,
        params: Option<&ProjectParams>,
    ) -> Result<GenerateReport> {
        let mut template = store.load(name)?;

        if let Some(params) = params {
            template.apply_project(params);
        }

        self.generate(&template, output_root)
    }

    fn write_file(&self, file: &FileEntry, target: &Path) -> std::result::Result<(), String> {
        match file.kind {
            FileKind::Empty => File::create(target)
                .map(drop)
                .map_err(|e| format!("Failed to create {}: {e}", target.display())),
            FileKind::Template => {
                let Some(source) = file.source.as_deref() else {
                    return Err(format!("Template file '{}' has no source", file.name));
                };
                let source = self.resolve_source(source);

                if !source.exists() {
                    return Err(format!("Template file not found: {}", source.display()));
                }

                fs::copy(&source, target).map(drop).map_err(|e| {
                    format!(
                        "Failed to copy {} to {}: {e}",
                        source.display(),
                        target.display()
                    )
                })
            }
        }
    }

    fn resolve_source(&self, source: &Path) -> PathBuf {
        self.store.as_ref().map_or_else(
            || source.to_path_buf(),
            |store| store.resolve_source(source),
        )
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("█▉▊▋▌▍▎▏  "));
        }
        pb
    }
}
