//! Trait definitions with mockall annotations for testing
//!
//! The cluster code only talks to the operating system and to the daemons
//! through these seams. Real implementations live in [`crate::services`].

use crate::error::ClusterResult;
use shared::Pid;
use std::collections::HashMap;

pub use nix::sys::signal::Signal;

/// Snapshot of one OS process as seen during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessRecord {
    pub pid: Pid,
    pub name: String,
    /// `None` when the owning uid has no user entry
    pub owner: Option<String>,
    pub cmdline: Vec<String>,
}

/// Metric name -> JSON value, as served by a daemon's debug webserver
pub type MetricMap = HashMap<String, serde_json::Value>;

/// Outcome of a single query against a coordinator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    pub success: bool,
}

/// Read-only view of the OS process table
#[mockall::automock]
pub trait ProcessTable: Send + Sync {
    /// Every process currently known to the OS, one pid per process (threads excluded)
    fn pids(&self) -> Vec<Pid>;

    /// Inspect a single process. `None` when it exited since `pids()` was taken.
    fn inspect(&self, pid: Pid) -> Option<ProcessRecord>;

    /// Name of the user running this process
    fn current_user(&self) -> Option<String>;
}

/// Signal delivery and detached process launch
#[mockall::automock]
pub trait ProcessLauncher: Send + Sync {
    fn signal(&self, pid: Pid, signal: Signal) -> ClusterResult<()>;

    /// Run `argv` in the background through a shell so the new process is
    /// re-parented to init and outlives the caller
    fn spawn_detached(&self, argv: &[String]) -> ClusterResult<()>;
}

/// Access to a daemon's metrics page
#[mockall::automock]
#[async_trait::async_trait]
pub trait MetricSource: Send + Sync {
    async fn fetch_metrics(&self, hostname: &str, port: u16) -> ClusterResult<MetricMap>;
}

/// Opens client connections to a coordinator's client-protocol port
#[mockall::automock]
#[async_trait::async_trait]
pub trait QueryConnector: Send + Sync {
    async fn connect(&self, hostname: &str, port: u16) -> ClusterResult<Box<dyn QueryClient>>;
}

/// An open client session
#[mockall::automock]
#[async_trait::async_trait]
pub trait QueryClient: Send {
    async fn execute(&mut self, query: &str) -> ClusterResult<QueryOutcome>;

    async fn close(&mut self);
}
