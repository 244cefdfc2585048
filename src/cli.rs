use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use scaffold_dirs::{
    config::{DEFAULT_TEMPLATE, FileConfig, default_seen_log, default_templates_dir, expand_tilde},
    template::ProjectParams,
    watcher::{DEFAULT_POLL_INTERVAL, WaitPolicy, WatchOptions},
};

#[derive(Parser)]
struct GenerateArgs {
    /// Generate a project from a template without any prompts
    #[arg(long)]
    generate: bool,

    /// Template to generate from [default: defaults/ace_basic.json]
    #[arg(long, requires = "generate")]
    template: Option<String>,

    /// Directory the project is generated into [default: .]
    #[arg(long, requires = "generate")]
    output: Option<PathBuf>,

    /// Project name; the main directory becomes NAME-NUMBER
    #[arg(long = "project_name", requires_all = ["generate", "project_number"])]
    project_name: Option<String>,

    /// Project number; replaces every "xxxxx" in file names
    #[arg(long = "project_number", requires_all = ["generate", "project_name"])]
    project_number: Option<String>,
}

#[derive(Parser)]
struct StoreArgs {
    /// Root directory of the template store
    #[arg(long, global = true)]
    templates_dir: Option<PathBuf>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Parser)]
struct LogArgs {
    /// Show debug logging
    #[arg(short = 'v', long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors and hide progress bars
    #[arg(short = 'q', long, global = true)]
    quiet: bool,
}

#[derive(Parser)]
pub(crate) struct WatchArgs {
    /// Directory polled for descriptor files
    #[arg(long)]
    dir: Option<PathBuf>,

    /// File recording descriptors that were already processed
    #[arg(long)]
    seen_log: Option<PathBuf>,

    /// Directory projects are generated into
    #[arg(long)]
    output: Option<PathBuf>,

    /// Template used for every descriptor
    #[arg(long)]
    template: Option<String>,

    /// Seconds between polls
    #[arg(long)]
    interval: Option<u64>,

    /// Generator executable [default: this binary]
    #[arg(long)]
    generator: Option<PathBuf>,
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// List available templates
    List,

    /// Validate a template and report every structural problem
    Validate {
        /// Template identifier, e.g. defaults/basic.json
        template: String,
    },

    /// Print a template as a tree
    Preview {
        /// Template identifier
        template: String,
    },

    /// Find subdirectories whose name or files contain a query
    Search {
        /// Template identifier
        template: String,

        /// Text to look for
        query: String,
    },

    /// Capture an existing directory tree as a template
    Clone {
        /// Directory to clone
        source: PathBuf,

        /// File name of the new template, e.g. site.json
        name: String,

        /// Save into the defaults namespace
        #[arg(long)]
        default: bool,
    },

    /// Write a text map of a directory tree
    Map {
        /// Directory to map
        root: PathBuf,

        /// File the map is written to
        output: PathBuf,
    },

    /// Copy a file into the file template pool
    AddFileTemplate {
        /// File to add
        source: PathBuf,
    },

    /// List the file template pool
    FileTemplates,

    /// Watch a directory for project descriptors and generate each one
    Watch(WatchArgs),
}

#[derive(Parser)]
#[command(name = "scaffold-dirs", version)]
#[command(about = "Scaffold project directory trees from JSON templates")]
pub(crate) struct Cli {
    /// Non-interactive generation
    #[command(flatten)]
    generation: GenerateArgs,

    /// Template store options
    #[command(flatten)]
    store: StoreArgs,

    /// Logging options
    #[command(flatten)]
    logging: LogArgs,

    #[command(subcommand)]
    pub(crate) command: Option<Command>,
}

impl Cli {
    /// Reject combinations clap cannot express.
    pub(crate) fn check(&self) -> Result<()> {
        if self.generation.generate && self.command.is_some() {
            bail!("--generate cannot be combined with a subcommand");
        }
        Ok(())
    }

    pub(crate) const fn generate(&self) -> bool {
        self.generation.generate
    }

    pub(crate) const fn quiet(&self) -> bool {
        self.logging.quiet
    }

    /// Config file given with `--config`, if any.
    pub(crate) fn config_path(&self) -> Option<&Path> {
        self.store.config.as_deref()
    }

    /// Default log filter when `RUST_LOG` is not set.
    pub(crate) fn log_filter(&self) -> &'static str {
        if self.logging.verbose {
            "debug"
        } else if self.logging.quiet {
            "error"
        } else if matches!(self.command, Some(Command::Watch(_))) {
            "info"
        } else {
            "warn"
        }
    }

    pub(crate) fn templates_dir(&self, config: &FileConfig) -> PathBuf {
        self.store
            .templates_dir
            .clone()
            .or_else(|| config.templates_dir.as_deref().map(expand_tilde))
            .unwrap_or_else(default_templates_dir)
    }

    pub(crate) fn output_dir(&self, config: &FileConfig) -> PathBuf {
        self.generation
            .output
            .clone()
            .or_else(|| config.output_dir.as_deref().map(expand_tilde))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub(crate) fn template(&self, config: &FileConfig) -> String {
        self.generation
            .template
            .clone()
            .or_else(|| config.template.clone())
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string())
    }

    pub(crate) fn project_params(&self) -> Option<ProjectParams> {
        match (&self.generation.project_name, &self.generation.project_number) {
            (Some(name), Some(number)) if !name.is_empty() && !number.is_empty() => {
                Some(ProjectParams::new(name, number))
            }
            _ => None,
        }
    }
}

impl WatchArgs {
    pub(crate) fn watch_options(&self, config: &FileConfig) -> Result<WatchOptions> {
        let watch = &config.watch;

        let Some(watch_dir) = self
            .dir
            .clone()
            .or_else(|| watch.dir.as_deref().map(expand_tilde))
        else {
            bail!("no watch directory given; pass --dir or set [watch] dir in the config file");
        };

        let seen_log = self
            .seen_log
            .clone()
            .or_else(|| watch.seen_log.as_deref().map(expand_tilde))
            .unwrap_or_else(default_seen_log);

        let output_dir = self
            .output
            .clone()
            .or_else(|| watch.output_dir.as_deref().map(expand_tilde))
            .or_else(|| config.output_dir.as_deref().map(expand_tilde))
            .unwrap_or_else(|| PathBuf::from("."));

        let template = self
            .template
            .clone()
            .or_else(|| watch.template.clone())
            .or_else(|| config.template.clone())
            .unwrap_or_else(|| DEFAULT_TEMPLATE.to_string());

        let poll_interval = self
            .interval
            .or(watch.interval_secs)
            .map_or(DEFAULT_POLL_INTERVAL, Duration::from_secs);

        let defaults = WaitPolicy::default();
        let wait = WaitPolicy {
            interval: watch
                .wait_interval_ms
                .map_or(defaults.interval, Duration::from_millis),
            timeout: watch
                .wait_timeout_secs
                .map_or(defaults.timeout, Duration::from_secs),
        };

        Ok(WatchOptions {
            watch_dir,
            seen_log,
            output_dir,
            template,
            poll_interval,
            wait,
        })
    }

    pub(crate) fn generator(&self, config: &FileConfig) -> Option<PathBuf> {
        self.generator
            .clone()
            .or_else(|| config.watch.generator.as_deref().map(expand_tilde))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("scaffold-dirs").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_generate_flags() {
        let cli = parse(&[
            "--generate",
            "--template",
            "user_created/site.json",
            "--output",
            "/srv/projects",
            "--project_name",
            "Acme",
            "--project_number",
            "042",
        ]);
        let config = FileConfig::default();

        assert!(cli.generate());
        assert_eq!(cli.template(&config), "user_created/site.json");
        assert_eq!(cli.output_dir(&config), PathBuf::from("/srv/projects"));
        assert_eq!(cli.project_params(), Some(ProjectParams::new("Acme", "042")));
    }

    #[test]
    fn test_generate_defaults() {
        let cli = parse(&["--generate"]);
        let config = FileConfig::default();

        assert_eq!(cli.template(&config), DEFAULT_TEMPLATE);
        assert_eq!(cli.output_dir(&config), PathBuf::from("."));
        assert!(cli.project_params().is_none());
    }

    #[test]
    fn test_config_file_fills_gaps() {
        let cli = parse(&["--generate"]);
        let config: FileConfig = toml::from_str(
            r#"
output_dir = "/srv/out"
template = "defaults/other.json"
"#,
        )
        .unwrap();

        assert_eq!(cli.output_dir(&config), PathBuf::from("/srv/out"));
        assert_eq!(cli.template(&config), "defaults/other.json");
    }

    #[test]
    fn test_project_name_requires_number() {
        let result = Cli::try_parse_from(["scaffold-dirs", "--generate", "--project_name", "Acme"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_generate_conflicts_with_subcommand() {
        let cli = parse(&["--generate", "list"]);
        assert!(cli.check().is_err());

        assert!(parse(&["list"]).check().is_ok());
    }

    #[test]
    fn test_watch_options_layering() {
        let cli = parse(&["watch", "--dir", "/srv/incoming", "--interval", "3"]);
        let config: FileConfig = toml::from_str(
            r#"
output_dir = "/srv/out"

[watch]
template = "defaults/client.json"
wait_timeout_secs = 5
"#,
        )
        .unwrap();

        let Some(Command::Watch(watch)) = &cli.command else {
            panic!("expected watch subcommand");
        };
        let options = watch.watch_options(&config).unwrap();

        assert_eq!(options.watch_dir, PathBuf::from("/srv/incoming"));
        assert_eq!(options.output_dir, PathBuf::from("/srv/out"));
        assert_eq!(options.template, "defaults/client.json");
        assert_eq!(options.poll_interval, Duration::from_secs(3));
        assert_eq!(options.wait.interval, Duration::from_millis(500));
        assert_eq!(options.wait.timeout, Duration::from_secs(5));
        assert_eq!(cli.log_filter(), "info");
    }

    #[test]
    fn test_config_path_is_only_set_explicitly() {
        assert!(parse(&["list"]).config_path().is_none());

        let cli = parse(&["--config", "/srv/scaffold.toml", "list"]);
        assert_eq!(cli.config_path(), Some(Path::new("/srv/scaffold.toml")));
    }

    #[test]
    fn test_watch_requires_directory() {
        let cli = parse(&["watch"]);
        let Some(Command::Watch(watch)) = &cli.command else {
            panic!("expected watch subcommand");
        };

        assert!(watch.watch_options(&FileConfig::default()).is_err());
    }
}
