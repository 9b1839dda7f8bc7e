//! transfer-content - Copy or move content subtrees between sites.
//!
//! Usage:
//!   transfer-content transfer -r REPO --source-site A --target-site B \
//!       --source-node ID --target-parent ID [--mode move]
//!   transfer-content sites -r REPO     List online sites
//!   transfer-content modes             List transfer modes
//!   transfer-content plan              Show the configured dimension plan
//!   transfer-content --help            Show help

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{Context, Result};
use itertools::Itertools;
use tracing_subscriber::EnvFilter;

use transfer_content_core::{Mode, TransferConfig, TransferRequest};
use transfer_content_ops::{Catalog, ContentTransfer, UserMessage};
use transfer_content_store::MemoryRepository;

#[derive(Parser)]
#[command(
    name = "transfer-content",
    version,
    about = "Copy or move content subtrees between sites",
    long_about = "transfer-content copies or moves a document subtree from one site into a \
                  target parent node of another, replaying moves across the configured \
                  dimension variants."
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (defaults to the user config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Message catalog overriding the built-in English texts
    #[arg(long, global = true)]
    messages: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Copy or move a node into a target parent
    Transfer {
        /// Repository snapshot file
        #[arg(short, long)]
        repository: PathBuf,

        /// Site the source node lives in
        #[arg(long)]
        source_site: String,

        /// Site the target parent lives in
        #[arg(long)]
        target_site: String,

        /// Identifier of the node to transfer
        #[arg(long)]
        source_node: String,

        /// Identifier of the node receiving the subtree
        #[arg(long)]
        target_parent: String,

        /// Transfer mode
        #[arg(short, long, default_value_t = Mode::Copy)]
        mode: Mode,

        /// Do not write the repository back
        #[arg(long)]
        dry_run: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List online sites
    Sites {
        /// Repository snapshot file
        #[arg(short, long)]
        repository: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List transfer modes
    Modes {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show the configured dimension plan
    Plan {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let catalog = load_catalog(cli.messages.as_deref())?;

    match cli.command {
        Command::Transfer {
            repository,
            source_site,
            target_site,
            source_node,
            target_parent,
            mode,
            dry_run,
            format,
        } => {
            let config = load_config(cli.config.as_deref())?;
            let request =
                TransferRequest::new(source_site, target_site, source_node, target_parent, mode);
            return run_transfer(&repository, config, &request, &catalog, dry_run, format);
        }
        Command::Sites { repository, format } => run_sites(&repository, format)?,
        Command::Modes { format } => run_modes(&catalog, format)?,
        Command::Plan { format } => {
            let config = load_config(cli.config.as_deref())?;
            run_plan(&config, format)?;
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<TransferConfig> {
    match path {
        Some(path) => TransferConfig::load(path)
            .with_context(|| format!("Failed to load configuration {}", path.display())),
        None => TransferConfig::load_default().context("Failed to load default configuration"),
    }
}

fn load_catalog(path: Option<&Path>) -> Result<Catalog> {
    let english = Catalog::english();
    match path {
        Some(path) => {
            let overrides = Catalog::load(path)
                .with_context(|| format!("Failed to load messages {}", path.display()))?;
            Ok(english.merge(overrides))
        }
        None => Ok(english),
    }
}

/// Run a transfer and print its messages.
fn run_transfer(
    repository_path: &Path,
    config: TransferConfig,
    request: &TransferRequest,
    catalog: &Catalog,
    dry_run: bool,
    format: OutputFormat,
) -> Result<ExitCode> {
    let repository = MemoryRepository::load(repository_path).context("Failed to load repository")?;

    let mut service = ContentTransfer::new(repository, config);
    let outcome = service.transfer(request);
    let messages = outcome.to_messages(catalog);

    print_messages(&messages, format)?;

    if outcome.is_success() && !dry_run {
        service
            .repository()
            .save(repository_path)
            .context("Failed to write repository")?;
        eprintln!("Saved {}", repository_path.display());
    }

    if outcome.has_errors() {
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn print_messages(messages: &[UserMessage], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for message in messages {
                println!("[{}] {}", message.title, message.text);
            }
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(messages)?);
        }
    }
    Ok(())
}

/// List online sites.
fn run_sites(repository_path: &Path, format: OutputFormat) -> Result<()> {
    let repository = MemoryRepository::load(repository_path).context("Failed to load repository")?;
    let service = ContentTransfer::new(repository, TransferConfig::default());
    let sites = service.online_sites();

    match format {
        OutputFormat::Text => {
            if sites.is_empty() {
                println!(" No online sites.");
            }
            for site in &sites {
                println!(" {:<24} {}", site.id, site.title);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sites)?),
    }
    Ok(())
}

/// List transfer modes with their labels.
fn run_modes(catalog: &Catalog, format: OutputFormat) -> Result<()> {
    let choices = Mode::choices(catalog);

    match format {
        OutputFormat::Text => {
            for choice in &choices {
                println!(" {:<8} {}", choice.mode, choice.label);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&choices)?),
    }
    Ok(())
}

/// Print the dimension plan in replay order.
fn run_plan(config: &TransferConfig, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            println!(" Document type: {}", config.document_type);
            if config.plan().is_empty() {
                println!(" No dimensions configured; moves apply to the default variant only.");
                return Ok(());
            }
            for (index, spec) in config.plan().iter().enumerate() {
                let sources = spec
                    .dimensions
                    .iter()
                    .map(|(name, values)| format!("{name}={}", values.join(",")))
                    .join(" ");
                println!(" {:>3}. {:<16} reads {}", index + 1, spec.variant_key(), sources);
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(config.plan())?),
    }
    Ok(())
}
