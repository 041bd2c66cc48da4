//! Cluster-management error types

use shared::{CommandLine, Pid, SharedError};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClusterError {
    #[error(transparent)]
    Shared(#[from] SharedError),

    #[error("Configuration error: {field}: {message}")]
    ConfigError { field: String, message: String },

    #[error("No processes {cmdline} found")]
    ProcessNotFound { cmdline: CommandLine },

    #[error("Failed to send {signal} to PID {pid}: {message}")]
    SignalFailed { pid: Pid, signal: String, message: String },

    #[error("Failed to launch '{command}': {message}")]
    SpawnFailed { command: String, message: String },

    #[error("Metric value {metric} did not reach value {expected} in {timeout:?}")]
    MetricTimeout { metric: String, expected: i64, timeout: Duration },

    #[error("Failed to fetch metrics from {url}: {message}")]
    MetricFetch { url: String, message: String },

    #[error("Only {available} impalads available to choose from")]
    NotEnoughCoordinators { available: usize },

    #[error("Query '{query}' failed on {endpoint}: {message}")]
    QueryFailed { query: String, endpoint: String, message: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

pub type ClusterResult<T> = Result<T, ClusterError>;
