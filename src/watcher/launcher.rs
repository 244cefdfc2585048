//! Running generation out of process.

use std::{
    ffi::OsString,
    path::{Path, PathBuf},
    process::Command,
};

use tracing::debug;

use crate::{
    error::{Result, ScaffoldError},
    template::ProjectParams,
};

/// Parameters for one non-interactive generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GenerateRequest {
    pub template: String,
    pub output: PathBuf,
    pub params: ProjectParams,
}

impl GenerateRequest {
    /// Command-line arguments understood by the `--generate` entry point.
    #[must_use]
    pub fn args(&self) -> Vec<OsString> {
        vec![
            "--generate".into(),
            "--template".into(),
            self.template.clone().into(),
            "--output".into(),
            self.output.clone().into_os_string(),
            "--project_name".into(),
            self.params.name.clone().into(),
            "--project_number".into(),
            self.params.number.clone().into(),
        ]
    }
}

/// Something that can carry out a [`GenerateRequest`].
pub trait Launcher {
    /// Run generation and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Returns an error if generation could not be started or reported failure.
    fn launch(&self, request: &GenerateRequest) -> Result<()>;
}

/// Launcher that runs a generator executable and waits for its exit status.
#[derive(Clone, Debug)]
pub struct ProcessLauncher {
    program: PathBuf,

    /// Arguments passed ahead of the request's own, e.g. `--templates-dir`
    base_args: Vec<OsString>,
}

impl ProcessLauncher {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
        }
    }

    /// Pass `arg` to every invocation, before the request's arguments.
    #[must_use]
    pub fn with_arg(mut self, arg: impl Into<OsString>) -> Self {
        self.base_args.push(arg.into());
        self
    }

    /// Launcher that re-invokes the running executable.
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::Io`] if the current executable cannot be located.
    pub fn current_exe() -> Result<Self> {
        let program = std::env::current_exe().map_err(|e| ScaffoldError::io("current_exe", e))?;
        Ok(Self::new(program))
    }

    #[must_use]
    pub fn program(&self) -> &Path {
        &self.program
    }
}

impl Launcher for ProcessLauncher {
    fn launch(&self, request: &GenerateRequest) -> Result<()> {
        debug!(program = %self.program.display(), ?request, "Launching generator");

        let status = Command::new(&self.program)
            .args(&self.base_args)
            .args(request.args())
            .status()
            .map_err(|e| ScaffoldError::io(&self.program, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(ScaffoldError::GeneratorFailed(format!(
                "{} exited with {status}",
                self.program.display()
            )))
        }
    }
}
