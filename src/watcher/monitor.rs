//! The polling loop that turns dropped descriptors into generated projects.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use tracing::{error, info, warn};

use crate::error::{Result, ScaffoldError};

use super::{
    descriptor::{DESCRIPTOR_COPY_NAME, Descriptor},
    launcher::{GenerateRequest, Launcher},
    seen::SeenFiles,
    wait::{Clock, WaitPolicy, wait_for},
};

/// Default delay between two polls of the watched directory.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Everything the watcher needs to know about its environment.
#[derive(Clone, Debug)]
pub struct WatchOptions {
    /// Directory scanned for `*.json` descriptors
    pub watch_dir: PathBuf,

    /// Log of descriptor names already handled
    pub seen_log: PathBuf,

    /// Output root handed to the generator
    pub output_dir: PathBuf,

    /// Template identifier handed to the generator
    pub template: String,

    pub poll_interval: Duration,

    /// How long to wait for the generated project directory to appear
    pub wait: WaitPolicy,
}

/// What happened to a single new descriptor.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DescriptorOutcome {
    /// The project was generated and the descriptor copied into it.
    Generated { project_dir: PathBuf },

    /// `project_name` or `project_number` was missing or empty.
    MissingKeys,

    /// Generation ran but the project directory never appeared.
    TimedOut { project_dir: PathBuf },

    /// The descriptor was unreadable or rejected, or launching or copying failed.
    Failed(String),
}

/// Polls a directory for new descriptors and generates a project for each.
///
/// Every new descriptor is handled exactly once: its name enters the seen set
/// whatever the outcome, so failures are logged and never retried.
pub struct Watcher<L, C> {
    options: WatchOptions,
    launcher: L,
    clock: C,
    seen: SeenFiles,
}

impl<L: Launcher, C: Clock> Watcher<L, C> {
    /// Create a watcher, loading the seen set from `options.seen_log`.
    #[must_use]
    pub fn new(options: WatchOptions, launcher: L, clock: C) -> Self {
        let seen = SeenFiles::load(&options.seen_log);
        Self {
            options,
            launcher,
            clock,
            seen,
        }
    }

    #[must_use]
    pub fn options(&self) -> &WatchOptions {
        &self.options
    }

    #[must_use]
    pub fn seen(&self) -> &SeenFiles {
        &self.seen
    }

    /// Poll until `stop` is set.
    ///
    /// The flag is checked once per cycle, so a stop request is observed
    /// within one poll interval. Errors from a cycle are logged and the loop
    /// carries on with the next one.
    pub fn run(&mut self, stop: &AtomicBool) {
        info!(
            dir = %self.options.watch_dir.display(),
            interval = ?self.options.poll_interval,
            "Watcher started"
        );

        while !stop.load(Ordering::Relaxed) {
            if let Err(e) = self.poll_once() {
                error!("Monitor error: {e}");
            }
            self.clock.sleep(self.options.poll_interval);
        }

        info!("Watcher stopped");
    }

    /// Run a single poll cycle.
    ///
    /// New descriptors are handled in name order. The seen log is rewritten
    /// at the end of the cycle; a failure to write it is logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the watched directory cannot be listed.
    pub fn poll_once(&mut self) -> Result<Vec<(String, DescriptorOutcome)>> {
        let new_files: Vec<String> = list_descriptors(&self.options.watch_dir)?
            .into_iter()
            .filter(|name| !self.seen.contains(name))
            .collect();

        let mut outcomes = Vec::with_capacity(new_files.len());
        for name in new_files {
            let outcome = self.process(&self.options.watch_dir.join(&name));
            self.seen.insert(name.clone());
            outcomes.push((name, outcome));
        }

        if let Err(e) = self.seen.save() {
            error!("Error writing seen files log: {e}");
        }

        Ok(outcomes)
    }

    fn process(&self, path: &Path) -> DescriptorOutcome {
        let descriptor = match Descriptor::read(path) {
            Ok(descriptor) => descriptor,
            Err(e) => {
                error!("Error reading descriptor: {e}");
                return DescriptorOutcome::Failed(e.to_string());
            }
        };

        let params = match descriptor.params() {
            Ok(Some(params)) => params,
            Ok(None) => {
                error!(path = %path.display(), "Missing keys in descriptor");
                return DescriptorOutcome::MissingKeys;
            }
            Err(e) => {
                error!(path = %path.display(), "Rejected descriptor: {e}");
                return DescriptorOutcome::Failed(e.to_string());
            }
        };

        let request = GenerateRequest {
            template: self.options.template.clone(),
            output: self.options.output_dir.clone(),
            params,
        };

        if let Err(e) = self.launcher.launch(&request) {
            error!("Error running directory generator: {e}");
            return DescriptorOutcome::Failed(e.to_string());
        }

        let project_name = request.params.directory_name();
        let project_dir = self.options.output_dir.join(&project_name);

        if !wait_for(&self.clock, self.options.wait, || project_dir.is_dir()) {
            error!(dir = %project_dir.display(), "Timeout waiting for directory");
            return DescriptorOutcome::TimedOut { project_dir };
        }

        let copy = project_dir.join(DESCRIPTOR_COPY_NAME);
        if let Err(e) = fs::copy(path, &copy) {
            error!(path = %copy.display(), "Failed to copy descriptor: {e}");
            return DescriptorOutcome::Failed(e.to_string());
        }

        info!(path = %copy.display(), "Copied descriptor");
        info!("Processed {project_name}");
        DescriptorOutcome::Generated { project_dir }
    }
}

/// Names of the `*.json` files directly inside `dir`, sorted.
fn list_descriptors(dir: &Path) -> Result<Vec<String>> {
    let entries = fs::read_dir(dir).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            ScaffoldError::NotFound(format!("watch directory {}", dir.display()))
        } else {
            ScaffoldError::io(dir, e)
        }
    })?;

    let mut names: Vec<String> = entries
        .flatten()
        .map(|entry| entry.path())
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "json"))
        .filter_map(|path| match path.file_name()?.to_str() {
            Some(name) => Some(name.to_string()),
            None => {
                warn!(path = %path.display(), "Skipping descriptor with non UTF-8 name");
                None
            }
        })
        .collect();

    names.sort();
    Ok(names)
}
