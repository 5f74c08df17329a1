use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gpm::health::CheckResult;
use gpm::{Catalog, Config, HealthCheck, RepoFilter, Repository, Walker};

#[derive(Parser)]
#[command(name = "gpm")]
#[command(about = "Catalog and browse the git projects under a workspace root")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path (defaults to XDG config location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Workspace root to scan (overrides the configured one)
    #[arg(short, long, global = true)]
    root: Option<String>,

    /// Verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Hosting sources found in the workspace
    Source {
        #[command(subcommand)]
        source_command: SourceCommands,
    },

    /// Owners found in the workspace
    Owner {
        #[command(subcommand)]
        owner_command: OwnerCommands,
    },

    /// Repositories found in the workspace
    Repo {
        #[command(subcommand)]
        repo_command: RepoCommands,
    },

    /// Write a configuration file pointing at a workspace root
    Init {
        /// Workspace root (defaults to --root, then ${GOPATH}/src); environment
        /// variables and ~ are expanded when scanning
        workspace_root: Option<String>,
    },

    /// Diagnose configuration and workspace root
    Doctor,
}

#[derive(Subcommand)]
enum SourceCommands {
    /// List all sources
    List {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum OwnerCommands {
    /// List owners, optionally within one source
    List {
        /// Only owners under this source
        #[arg(long)]
        source: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(Subcommand)]
enum RepoCommands {
    /// List repositories in discovery order
    List {
        /// Only repositories under this source
        #[arg(long)]
        source: Option<String>,

        /// Only repositories of this owner
        #[arg(long)]
        owner: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

#[derive(ValueEnum, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    /// Aligned columns
    Table,
    /// JSON array
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // `init` may point --config at a file it is about to create
    let creating = matches!(cli.command, Commands::Init { .. });
    let config = load_config(cli.config.as_deref(), creating)?;
    init_logging(cli.verbose, &config);
    debug!("Starting gpm v{}", env!("CARGO_PKG_VERSION"));

    let root = cli.root.as_deref();

    match cli.command {
        Commands::Source { source_command } => match source_command {
            SourceCommands::List { format } => cmd_source_list(root, format, &config),
        },
        Commands::Owner { owner_command } => match owner_command {
            OwnerCommands::List { source, format } => cmd_owner_list(root, source, format, &config),
        },
        Commands::Repo { repo_command } => match repo_command {
            RepoCommands::List {
                source,
                owner,
                format,
            } => cmd_repo_list(root, RepoFilter { source, owner }, format, &config),
        },
        Commands::Init { workspace_root } => {
            let workspace_root = workspace_root
                .or(cli.root)
                .unwrap_or_else(|| Config::default().workspace_root);
            cmd_init(workspace_root, cli.config, &config)
        }
        Commands::Doctor => cmd_doctor(cli.config.as_deref(), root, &config),
    }
}

/// Initialize logging; RUST_LOG wins, then --verbose, then the configured level
fn init_logging(verbose: bool, config: &Config) {
    let default_level = if verbose {
        "debug"
    } else {
        config.logging.level.as_str()
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(config.logging.color),
        )
        .with(filter)
        .init();
}

/// Load configuration from specified path or default location
fn load_config(config_path: Option<&Path>, allow_missing: bool) -> Result<Config> {
    match config_path {
        Some(path) if allow_missing && !path.exists() => Ok(Config::default()),
        Some(path) => Config::load(path),
        None => Config::load_or_default(),
    }
}

/// Walk the workspace and return its catalog
fn scan(root_override: Option<&str>, config: &Config) -> Result<Catalog> {
    let root = config.workspace_root(root_override)?;
    let walker = Walker::new(&config.scan)?;

    let report = walker.walk(&root)?;

    if !report.skipped.is_empty() {
        warn!(
            "{} repositories skipped; they do not sit at source/owner/repo beneath {}",
            report.skipped.len(),
            root.display()
        );
    }
    if report.stats.errors > 0 {
        warn!("{} directory entries could not be read", report.stats.errors);
    }
    if report.stats.stopped {
        info!("Scan stopped after {} repositories", report.catalog.len());
    }

    Ok(report.catalog)
}

fn cmd_source_list(root: Option<&str>, format: OutputFormat, config: &Config) -> Result<()> {
    let catalog = scan(root, config)?;
    print_names(catalog.sources().into_iter().collect(), format)
}

fn cmd_owner_list(
    root: Option<&str>,
    source: Option<String>,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let catalog = scan(root, config)?;
    let owners = match source.as_deref() {
        Some(source) => catalog.owners_of(source),
        None => catalog.owners(),
    };
    print_names(owners.into_iter().collect(), format)
}

fn cmd_repo_list(
    root: Option<&str>,
    filter: RepoFilter,
    format: OutputFormat,
    config: &Config,
) -> Result<()> {
    let catalog = scan(root, config)?;
    let repos: Vec<&Repository> = catalog.filter(&filter).collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&repos)?),
        OutputFormat::Table => {
            let widths = catalog.widths();
            let index_width = repos.len().saturating_sub(1).to_string().len();

            for (i, repo) in repos.iter().enumerate() {
                println!(
                    "{:>iw$}:  {:<rw$}  {:<ow$}  {:<sw$}  {}",
                    i,
                    repo.name,
                    repo.owner,
                    repo.source,
                    repo.path.display(),
                    iw = index_width,
                    rw = widths.repo,
                    ow = widths.owner,
                    sw = widths.source,
                );
            }
        }
    }

    Ok(())
}

fn print_names(names: Vec<&str>, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&names)?),
        OutputFormat::Table => {
            for name in names {
                println!("{}", name);
            }
        }
    }
    Ok(())
}

/// Write a configuration file with the given workspace root
fn cmd_init(workspace_root: String, config_path: Option<PathBuf>, config: &Config) -> Result<()> {
    info!("Initializing gpm...");

    // The stored root stays a template; it only has to resolve at scan time
    let resolved = match gpm::config::expand_root(&workspace_root) {
        Ok(resolved) => {
            if !resolved.is_dir() {
                warn!("Workspace root {} does not exist yet", resolved.display());
            }
            resolved.display().to_string()
        }
        Err(e) => {
            warn!("{}; it must resolve before scanning", e);
            workspace_root.clone()
        }
    };

    let mut new_config = config.clone();
    new_config.workspace_root = workspace_root;

    let config_path = match config_path {
        Some(path) => path,
        None => Config::default_config_path()?,
    };
    new_config.save(&config_path)?;

    println!("✅ gpm initialized successfully!");
    println!("   Config: {}", config_path.display());
    println!("   Workspace root: {}", resolved);

    Ok(())
}

/// Workspace health check and diagnostics
fn cmd_doctor(config_path: Option<&Path>, root: Option<&str>, config: &Config) -> Result<()> {
    let health = HealthCheck::run(config, config_path, root);
    print_health_report(&health);
    Ok(())
}

/// Print health check report to stdout
fn print_health_report(health: &HealthCheck) {
    fn print_check(name: &str, result: &CheckResult) {
        println!("{}:", name);
        let icon = if result.passed {
            if result.is_warning { "⚠️ " } else { "✅" }
        } else {
            "❌"
        };
        println!("  {} {}", icon, result.message);
        if let Some(details) = &result.details {
            for line in details.lines() {
                println!("     {}", line);
            }
        }
    }

    println!("🔍 gpm Workspace Diagnostics");
    println!();

    for (name, result) in health.all_checks() {
        print_check(name, result);
        println!();
    }

    let warnings = health.warnings().len();
    if health.all_passed() && warnings > 0 {
        println!("✅ All checks passed ({} warning(s))", warnings);
    } else if health.all_passed() {
        println!("✅ All checks passed");
    } else {
        println!("❌ Some checks failed");
    }
}
