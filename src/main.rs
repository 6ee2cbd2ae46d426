//! Playdeck - pipeline playbook dashboard for your terminal.
//!
//! Opens the interactive dashboard by default; the subcommands expose the
//! same actions for scripts.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate, Shell};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use playdeck::core::{drive, Action, Catalog, Config, Dashboard, LogLine};
use playdeck::{tui, App};

/// Pipeline playbook dashboard for your terminal
#[derive(Parser)]
#[command(name = "playdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file to use instead of the default lookup
    #[arg(short, long, global = true, env = "PLAYDECK_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the dashboard (default)
    Dashboard,

    /// List the pipeline catalog
    Catalog {
        /// Output format (text, json)
        #[arg(short, long, default_value = "text")]
        format: String,
    },

    /// Build a playbook and simulate running it
    Run {
        /// Pipelines to add, by id or name
        pipelines: Vec<String>,

        /// Pipeline files to add (only the file name is used)
        #[arg(short, long)]
        file: Vec<PathBuf>,

        /// Milliseconds between simulated pipeline executions
        #[arg(short, long)]
        interval_ms: Option<u64>,
    },

    /// Schedule a playbook for a time
    Schedule {
        /// When to run (free-form)
        time: String,

        /// Pipelines to add, by id or name
        pipelines: Vec<String>,
    },

    /// Print the configuration dump of a playbook
    Save {
        /// Pipelines to add, by id or name
        pipelines: Vec<String>,

        /// Pipeline files to add (only the file name is used)
        #[arg(short, long)]
        file: Vec<PathBuf>,
    },

    /// Show configuration
    Config {
        /// Show config directory path
        #[arg(long)]
        path: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose { EnvFilter::new("debug") } else { EnvFilter::new("warn") };

    tracing_subscriber::registry().with(fmt::layer().with_target(false)).with(filter).init();

    let config_path = cli.config.as_deref();

    match cli.command {
        None | Some(Commands::Dashboard) => cmd_dashboard(config_path)?,
        Some(Commands::Catalog { format }) => cmd_catalog(config_path, &format)?,
        Some(Commands::Run { pipelines, file, interval_ms }) => {
            cmd_run(config_path, &pipelines, &file, interval_ms)?;
        }
        Some(Commands::Schedule { time, pipelines }) => {
            cmd_schedule(config_path, &time, &pipelines)?;
        }
        Some(Commands::Save { pipelines, file }) => cmd_save(config_path, &pipelines, &file)?,
        Some(Commands::Config { path }) => cmd_config(config_path, path)?,
        Some(Commands::Completions { shell }) => cmd_completions(shell),
    }

    Ok(())
}

/// Load the config file named on the command line, or the default one.
fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    }
}

/// Build a dashboard and add the referenced pipelines and files to it.
fn build_dashboard(
    config: &Config,
    references: &[String],
    files: &[PathBuf],
    interval_ms: Option<u64>,
) -> Result<Dashboard> {
    let catalog = Catalog::builtin().with_extra(config.pipelines.clone());
    let interval = interval_ms.map_or_else(|| config.run.interval(), Duration::from_millis);

    // Resolve everything first so a typo does not leave a half-built playbook
    let ids = references
        .iter()
        .map(|reference| catalog.resolve(reference).map(|p| p.id))
        .collect::<Result<Vec<_>, _>>()?;

    let mut dashboard = Dashboard::new(catalog, interval);
    let now = std::time::Instant::now();
    for id in ids {
        dashboard.apply(Action::AddPipeline(id), now);
    }
    for file in files {
        dashboard.apply(Action::AddFile(file.clone()), now);
    }

    Ok(dashboard)
}

fn print_lines(lines: &[LogLine]) {
    for line in lines {
        println!("{}", line.message);
    }
}

/// Run the interactive dashboard.
fn cmd_dashboard(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    tui::run_tui(App::new(config))
}

/// List the pipeline catalog.
fn cmd_catalog(config_path: Option<&Path>, format: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let catalog = Catalog::builtin().with_extra(config.pipelines);

    match format {
        "json" => {
            let pipelines: Vec<_> = catalog.iter().collect();
            println!("{}", serde_json::to_string_pretty(&pipelines)?);
        }
        "text" => {
            for p in catalog.iter() {
                println!("{:>4}  {:<24} {}", p.id, p.name, p.params);
            }
            println!("\nTotal: {} pipelines", catalog.len());
        }
        other => anyhow::bail!("Unsupported format: {other}. Supported: text, json"),
    }

    Ok(())
}

/// Simulate a playbook run, streaming the log to stdout.
fn cmd_run(
    config_path: Option<&Path>,
    references: &[String],
    files: &[PathBuf],
    interval_ms: Option<u64>,
) -> Result<()> {
    let config = load_config(config_path)?;
    let mut dashboard = build_dashboard(&config, references, files, interval_ms)?;

    let rt = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    rt.block_on(async {
        dashboard.apply(Action::Run, tokio::time::Instant::now().into_std());
        print_lines(dashboard.log().lines());

        let stop = async {
            if tokio::signal::ctrl_c().await.is_err() {
                // No signal support: run until the queue drains
                std::future::pending::<()>().await;
            }
        };
        drive(&mut dashboard, stop, print_lines).await;
    });

    Ok(())
}

/// Log a schedule request for a playbook.
fn cmd_schedule(config_path: Option<&Path>, time: &str, references: &[String]) -> Result<()> {
    let config = load_config(config_path)?;
    let mut dashboard = build_dashboard(&config, references, &[], None)?;

    dashboard.apply(Action::Schedule(time.to_string()), std::time::Instant::now());
    print_lines(dashboard.log().lines());
    Ok(())
}

/// Print the configuration dump of a playbook.
fn cmd_save(config_path: Option<&Path>, references: &[String], files: &[PathBuf]) -> Result<()> {
    let config = load_config(config_path)?;
    let mut dashboard = build_dashboard(&config, references, files, None)?;

    dashboard.apply(Action::SaveConfiguration, std::time::Instant::now());
    print_lines(dashboard.log().lines());
    Ok(())
}

/// Show configuration.
fn cmd_config(config_path: Option<&Path>, show_path: bool) -> Result<()> {
    if show_path {
        if let Some(path) = Config::config_dir() {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let config = load_config(config_path)?;
    let toml = toml::to_string_pretty(&config)?;
    println!("{toml}");

    Ok(())
}

/// Generate shell completions.
fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    generate(shell, &mut cmd, "playdeck", &mut io::stdout());
}
