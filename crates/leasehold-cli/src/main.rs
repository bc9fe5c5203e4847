//! Leasehold CLI - lease-based mutual exclusion over SQLite

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use leasehold_core::config::Config;
use leasehold_core::domain::lease::{
    ExpirySweeper, LockManager, LockRecord, LockRepository, LockStatus, SweeperConfig,
};
use leasehold_core::storage::{Database, DatabaseConfig};
use tracing::info;

#[derive(Parser)]
#[command(name = "leasehold")]
#[command(author, version, about = "Lease-based lock service over a SQLite store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the lock database (defaults to the configured path)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Acquire or renew a lock
    Acquire {
        /// Name of the protected resource
        name: String,
        /// Requester identity (defaults to this machine's hostname)
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Release a lock you hold
    Release {
        /// Name of the protected resource
        name: String,
        /// Holder identity (defaults to this machine's hostname)
        #[arg(short, long)]
        owner: Option<String>,
    },

    /// Ask the current holder of a lock to yield
    Interrupt {
        /// Name of the protected resource
        name: String,
    },

    /// Show the record for a lock
    Status {
        /// Name of the protected resource
        name: String,
    },

    /// List all live locks
    List,

    /// Run a single reclamation pass
    Sweep {
        /// Lease TTL in seconds (defaults to the configured value)
        #[arg(long)]
        ttl_secs: Option<u64>,
    },

    /// Run the expiry sweeper until interrupted
    Watch {
        /// Lease TTL in seconds (defaults to the configured value)
        #[arg(long)]
        ttl_secs: Option<u64>,
        /// Sweep cadence in seconds (defaults to the configured value)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
}

/// Exit code for "the operation was refused", as opposed to a hard failure
const EXIT_REFUSED: i32 = 1;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leasehold=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let db_path = cli
        .database
        .clone()
        .unwrap_or_else(|| config.database.path.clone());
    let db = Database::new(DatabaseConfig::with_path(db_path)).await?;
    let repo = LockRepository::new(db.pool().clone());
    let manager = LockManager::new(repo.clone());

    match cli.command {
        Commands::Acquire { name, owner } => {
            cmd_acquire(&manager, &name, &resolve_owner(owner), cli.quiet).await
        }

        Commands::Release { name, owner } => {
            cmd_release(&manager, &name, &resolve_owner(owner), cli.quiet).await
        }

        Commands::Interrupt { name } => cmd_interrupt(&manager, &name, cli.quiet).await,

        Commands::Status { name } => cmd_status(&repo, &name, cli.format).await,

        Commands::List => cmd_list(&repo, cli.format).await,

        Commands::Sweep { ttl_secs } => {
            let ttl = ttl_secs.unwrap_or(config.lease.ttl_secs);
            cmd_sweep(repo, ttl, cli.quiet).await
        }

        Commands::Watch {
            ttl_secs,
            interval_secs,
        } => {
            let ttl = ttl_secs.unwrap_or(config.lease.ttl_secs);
            let interval = interval_secs.unwrap_or(config.lease.sweep_interval_secs);
            cmd_watch(repo, ttl, interval).await
        }
    }
}

/// Default requester identity: the machine hostname, which stays stable
/// across invocations so renewals from the same host keep working
fn resolve_owner(owner: Option<String>) -> String {
    owner.unwrap_or_else(|| gethostname::gethostname().to_string_lossy().into_owned())
}

// ============================================================================
// Command Implementations
// ============================================================================

async fn cmd_acquire(
    manager: &LockManager,
    name: &str,
    owner: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    match manager.acquire(name, owner).await? {
        Some(status) => {
            if !quiet {
                println!("Acquired '{}' as '{}' ({})", name, owner, status);
            }
            Ok(())
        }
        None => {
            if !quiet {
                eprintln!("Lock '{}' is held by another owner", name);
            }
            std::process::exit(EXIT_REFUSED);
        }
    }
}

async fn cmd_release(
    manager: &LockManager,
    name: &str,
    owner: &str,
    quiet: bool,
) -> anyhow::Result<()> {
    if manager.release(name, owner).await? {
        if !quiet {
            println!("Released '{}'", name);
        }
        Ok(())
    } else {
        if !quiet {
            eprintln!("Cannot release '{}': '{}' does not hold it", name, owner);
        }
        std::process::exit(EXIT_REFUSED);
    }
}

async fn cmd_interrupt(manager: &LockManager, name: &str, quiet: bool) -> anyhow::Result<()> {
    if manager.interrupt(name).await? {
        if !quiet {
            println!("Interrupted '{}'", name);
        }
        Ok(())
    } else {
        if !quiet {
            eprintln!("Cannot interrupt '{}': no such lock", name);
        }
        std::process::exit(EXIT_REFUSED);
    }
}

async fn cmd_status(
    repo: &LockRepository,
    name: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match repo.find_by_name(name).await? {
        Some(record) => {
            print_records(&[record], format)?;
            Ok(())
        }
        None => {
            eprintln!("No lock named '{}'", name);
            std::process::exit(EXIT_REFUSED);
        }
    }
}

async fn cmd_list(repo: &LockRepository, format: OutputFormat) -> anyhow::Result<()> {
    let records = repo.list().await?;
    print_records(&records, format)?;
    Ok(())
}

fn print_records(records: &[LockRecord], format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(records)?);
        }
        OutputFormat::Text => {
            for record in records {
                let marker = match record.status {
                    LockStatus::Owned => "",
                    LockStatus::Interrupted => " [interrupted]",
                };
                println!(
                    "{}  owner={}  last_renewed={}{}",
                    record.name, record.owner, record.last_renewed, marker
                );
            }
        }
    }
    Ok(())
}

async fn cmd_sweep(repo: LockRepository, ttl_secs: u64, quiet: bool) -> anyhow::Result<()> {
    let sweeper = ExpirySweeper::new(
        repo,
        SweeperConfig::default().with_ttl(Duration::from_secs(ttl_secs)),
    );
    let reclaimed = sweeper.sweep_once().await?;
    if !quiet {
        println!("Reclaimed {} expired lease(s)", reclaimed);
    }
    Ok(())
}

async fn cmd_watch(repo: LockRepository, ttl_secs: u64, interval_secs: u64) -> anyhow::Result<()> {
    let sweeper = ExpirySweeper::new(
        repo,
        SweeperConfig::default()
            .with_ttl(Duration::from_secs(ttl_secs))
            .with_interval(Duration::from_secs(interval_secs)),
    );

    info!(
        ttl_secs = ttl_secs,
        interval_secs = interval_secs,
        "starting expiry sweeper"
    );
    let handle = sweeper.start();

    tokio::signal::ctrl_c().await?;
    info!("shutting down expiry sweeper");
    handle.shutdown().await;
    Ok(())
}
