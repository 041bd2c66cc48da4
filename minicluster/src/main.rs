//! Minicluster control tool
//!
//! Inspect and poke at a locally running test cluster:
//! - list the daemons with their PIDs and ports
//! - count coordinators that answer a trivial query
//! - kill or restart a single daemon

use std::str::FromStr;

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand};

use minicluster::{ClusterProcess, DaemonKind, ImpalaCluster, KillOutcome, Signal};

#[derive(Parser)]
#[command(name = "minicluster")]
#[command(about = "Control the daemons of a local test cluster")]
struct Args {
    /// Enable verbose tracing output
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List discovered daemons
    Status {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Count coordinators that can run a trivial query
    Responsive,

    /// Send a signal to one daemon
    Kill {
        /// impalad, statestored or catalogd
        kind: DaemonKind,

        /// Position among daemons of that kind (impalads in backend-port order)
        #[arg(long, default_value = "0")]
        index: usize,

        /// Signal name, e.g. SIGKILL or SIGTERM
        #[arg(long, default_value = "SIGKILL")]
        signal: String,
    },

    /// Kill one daemon and start it again
    Restart {
        /// impalad, statestored or catalogd
        kind: DaemonKind,

        /// Position among daemons of that kind (impalads in backend-port order)
        #[arg(long, default_value = "0")]
        index: usize,

        /// Start without waiting for the readiness metric
        #[arg(long)]
        no_wait: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    shared::logging::init_tracing("minicluster", args.verbose);

    let cluster = ImpalaCluster::local().context("failed to discover the local cluster")?;

    match args.command {
        Command::Status { json } => print_status(&cluster, json)?,
        Command::Responsive => {
            println!("{}", cluster.responsive_coordinator_count().await);
        }
        Command::Kill { kind, index, signal } => {
            let signal = Signal::from_str(&signal.to_ascii_uppercase())
                .map_err(|e| anyhow!("unknown signal '{}': {}", signal, e))?;
            let daemon = find_daemon(&cluster, kind, index)?;

            match daemon.kill(signal)? {
                KillOutcome::Killed(pid) => println!("Killed {} #{} (PID {})", kind, index, pid),
                KillOutcome::NotFound => return Err(anyhow!("{} #{} is not running", kind, index)),
            }
        }
        Command::Restart { kind, index, no_wait } => {
            find_daemon(&cluster, kind, index)?.restart(!no_wait).await?;
            println!("Restarted {} #{}", kind, index);
        }
    }

    Ok(())
}

fn find_daemon(cluster: &ImpalaCluster, kind: DaemonKind, index: usize) -> Result<&dyn ClusterProcess> {
    cluster
        .daemon(kind, index)
        .ok_or_else(|| anyhow!("no {} #{} found", kind, index))
}

fn print_status(cluster: &ImpalaCluster, json: bool) -> Result<()> {
    let status = cluster.status();

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("{:<12} {:>5} {:>8} {:>9}  COMMAND", "KIND", "INDEX", "PID", "WEBSERVER");
    for daemon in &status {
        let pid = daemon.pid.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string());
        println!(
            "{:<12} {:>5} {:>8} {:>9}  {}",
            daemon.kind.to_string(),
            daemon.index,
            pid,
            daemon.ports.webserver_port,
            daemon.cmdline
        );
    }
    Ok(())
}
