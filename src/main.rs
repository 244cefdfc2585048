//! # scaffold-dirs
//!
//! Scaffold project directory trees from declarative JSON templates.
//!
//! Templates live in a flat-file store with a `defaults/` and a
//! `user_created/` namespace. A template names a main directory and the files
//! each subdirectory should contain; generating it materializes that tree,
//! optionally renamed for a concrete project.
//!
//! ## Usage
//!
//! ```bash
//! # Generate a project non-interactively
//! scaffold-dirs --generate --template defaults/ace_basic.json \
//!     --output ~/Projects --project_name Acme --project_number 042
//!
//! # Inspect templates
//! scaffold-dirs list
//! scaffold-dirs preview defaults/ace_basic.json
//! scaffold-dirs validate user_created/site.json
//!
//! # Turn an existing tree into a template
//! scaffold-dirs clone ~/Projects/Acme-042 acme.json
//!
//! # Generate a project for every descriptor dropped into a folder
//! scaffold-dirs watch --dir ~/Dropbox/incoming --output ~/Projects
//! ```

mod cli;

use std::{
    process::exit,
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    thread,
};

use anyhow::{Context, Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use colored::Colorize;
use humansize::{DECIMAL, format_size};
use scaffold_dirs::{
    config::FileConfig,
    engine::{self, GenerateReport, Generator},
    store::TemplateStore,
    template::{Template, render_tree, validate_document},
    watcher::{ProcessLauncher, SystemClock, Watcher},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Entry point for the scaffold-dirs application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err:#}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// This function:
/// 1. Parses command-line arguments and installs logging
/// 2. Loads the persistent configuration file (if present)
/// 3. Opens the template store
/// 4. Runs `--generate` or the requested subcommand
fn inner_main() -> Result<()> {
    let args = Cli::parse();
    args.check()?;
    init_logging(args.log_filter());

    let file_config = args
        .config_path()
        .map_or_else(FileConfig::load, FileConfig::load_from)
        .unwrap_or_else(|e| {
            eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            FileConfig::default()
        });

    let templates_dir = args.templates_dir(&file_config);
    let store = TemplateStore::open(&templates_dir).with_context(|| {
        format!("Failed to open template store at {}", templates_dir.display())
    })?;

    if args.generate() {
        return run_generate(&args, &file_config, &store);
    }

    let Some(command) = &args.command else {
        bail!("no action given; pass --generate or a subcommand (see --help)");
    };

    match command {
        Command::List => {
            let templates = store.list()?;
            if templates.is_empty() {
                println!("{}", "No templates found.".yellow());
            } else {
                println!("{}", "Available templates:".bold());
                for template in templates {
                    println!("  {template}");
                }
            }
        }
        Command::Validate { template } => run_validate(&store, template)?,
        Command::Preview { template } => {
            let loaded = store.load(template)?;
            println!(
                "\n{} {}\n",
                loaded.main_directory.bold(),
                "template preview".dimmed()
            );
            print!("{}", render_tree(&loaded));
        }
        Command::Search { template, query } => {
            let results = engine::search_named(&store, template, query)?;
            if results.is_empty() {
                println!("{}", "No matches found.".yellow());
            } else {
                println!("{}", "Search results:".bold());
                for subdir in results {
                    println!("  - {}", display_key(&subdir));
                }
            }
        }
        Command::Clone {
            source,
            name,
            default,
        } => {
            let template = engine::clone_directory(&store, source, name, *default)?;
            println!(
                "{} Cloned {} into template '{}' ({} directories, {} files)",
                "✅".green(),
                source.display(),
                name.bright_white(),
                template.subdirectories.len(),
                template.file_count()
            );
        }
        Command::Map { root, output } => {
            engine::export_directory_map(root, output)?;
            println!(
                "{} Directory map exported to '{}'",
                "✅".green(),
                output.display()
            );
        }
        Command::AddFileTemplate { source } => {
            let path = store.add_file_template(source)?;
            println!(
                "{} File template '{}' added",
                "✅".green(),
                path.display()
            );
        }
        Command::FileTemplates => {
            let templates = store.list_file_templates()?;
            if templates.is_empty() {
                println!("{}", "No file templates available.".yellow());
            } else {
                println!("{}", "Available file templates:".bold());
                for (i, template) in templates.iter().enumerate() {
                    println!(
                        "  {}) {} ({})",
                        i + 1,
                        template.name,
                        format_size(template.size, DECIMAL)
                    );
                }
            }
        }
        Command::Watch(watch) => {
            let options = watch.watch_options(&file_config)?;

            let launcher = match watch.generator(&file_config) {
                Some(program) => ProcessLauncher::new(program),
                None => ProcessLauncher::current_exe()?,
            };
            let mut launcher = launcher
                .with_arg("--templates-dir")
                .with_arg(store.root().as_os_str());
            if let Some(config) = args.config_path() {
                launcher = launcher.with_arg("--config").with_arg(config.as_os_str());
            }

            let stop = Arc::new(AtomicBool::new(false));
            stop_on_ctrl_c(Arc::clone(&stop))?;
            Watcher::new(options, launcher, SystemClock).run(&stop);
        }
    }

    Ok(())
}

/// Install the `tracing` subscriber; `RUST_LOG` overrides `default_filter`.
fn init_logging(default_filter: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Set `stop` on Ctrl-C so the watcher exits after its current cycle.
fn stop_on_ctrl_c(stop: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start the signal handler")?;

    thread::spawn(move || {
        runtime.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Received shutdown signal, stopping after the current cycle");
                    stop.store(true, Ordering::Relaxed);
                }
                Err(e) => error!("Failed to listen for Ctrl-C: {e}"),
            }
        });
    });

    Ok(())
}

fn run_generate(args: &Cli, file_config: &FileConfig, store: &TemplateStore) -> Result<()> {
    let template = args.template(file_config);
    let output = args.output_dir(file_config);
    let params = args.project_params();

    if !args.quiet() {
        println!(
            "Generating directory structure from template '{}' into '{}'",
            template.bright_white(),
            output.display()
        );
    }

    let report = Generator::new()
        .with_store(store)
        .with_quiet(args.quiet())
        .generate_named(store, &template, &output, params.as_ref())
        .with_context(|| format!("Generation from '{template}' aborted"))?;

    if !args.quiet() {
        print_report(&report);
    }

    Ok(())
}

fn run_validate(store: &TemplateStore, name: &str) -> Result<()> {
    let document = store.load_document(name)?;
    let errors = validate_document(&document);

    if !errors.is_empty() {
        println!("{}", format!("Validation errors for template '{name}':").red());
        for error in &errors {
            println!("  - {error}");
        }
        bail!("template '{name}' has {} validation error(s)", errors.len());
    }

    // Structurally valid documents can still carry values of the wrong type.
    Template::from_document(name, document)?;

    println!(
        "{}",
        format!("No errors generated during validation of '{name}'.").green()
    );
    Ok(())
}

fn print_report(report: &GenerateReport) {
    if !report.warnings.is_empty() {
        println!("\n{}", "⚠️  Some files could not be generated:".yellow());
        for warning in &report.warnings {
            eprintln!("  {}", warning.red());
        }
    }

    println!(
        "\n{} {}",
        "✅ Directory structure generated in:".green(),
        report.root.display().to_string().bright_white()
    );
    println!(
        "  📁 {} directories, 📄 {} files",
        report.directories.to_string().bright_white(),
        report.files.to_string().bright_white()
    );
}

/// The empty subdirectory key is the main directory itself.
fn display_key(key: &str) -> &str {
    if key.is_empty() { "." } else { key }
}
