//! Cluster Configuration
//!
//! Where the installation lives and how long the lifecycle operations wait.

use crate::error::{ClusterError, ClusterResult};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the installation root
pub const IMPALA_HOME_VAR: &str = "IMPALA_HOME";

const COORDINATOR_LAUNCHER: &str = "bin/start-impalad.sh";
const CATALOG_LAUNCHER: &str = "bin/start-catalogd.sh";

#[derive(Debug, Clone, PartialEq)]
pub struct ClusterConfig {
    /// Installation root; launcher scripts live under `bin/`
    pub impala_home: PathBuf,
    /// Hostname recorded on every service endpoint
    pub hostname: String,
    /// Pause between kill and start so listening sockets are released
    pub restart_pause: Duration,
    /// How long a restarted daemon gets to report ready
    pub ready_timeout: Duration,
    /// Interval between metric polls
    pub poll_interval: Duration,
    /// Per-request timeout for metric fetches
    pub http_timeout: Duration,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            impala_home: PathBuf::new(),
            hostname: local_hostname(),
            restart_pause: Duration::from_secs(1),
            ready_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(1),
            http_timeout: Duration::from_secs(5),
        }
    }
}

impl ClusterConfig {
    /// Create a new builder
    pub fn builder() -> crate::config::builder::ClusterConfigBuilder {
        crate::config::builder::ClusterConfigBuilder::new()
    }

    /// Load from the environment, reading a `.env` file first if present
    pub fn from_env() -> ClusterResult<Self> {
        dotenv::dotenv().ok();

        let home = std::env::var(IMPALA_HOME_VAR).map_err(|e| ClusterError::ConfigError {
            field: IMPALA_HOME_VAR.to_string(),
            message: e.to_string(),
        })?;

        Ok(Self::builder().impala_home(home).build())
    }

    /// Command prefix that relaunches a coordinator
    pub fn coordinator_launcher(&self) -> Vec<String> {
        vec![
            self.impala_home.join(COORDINATOR_LAUNCHER).display().to_string(),
            "-build_type=latest".to_string(),
        ]
    }

    /// Command prefix that relaunches the catalog daemon
    pub fn catalog_launcher(&self) -> Vec<String> {
        vec![self.impala_home.join(CATALOG_LAUNCHER).display().to_string()]
    }
}

/// Hostname of this machine, `localhost` when it cannot be determined
pub fn local_hostname() -> String {
    nix::unistd::gethostname()
        .ok()
        .and_then(|name| name.into_string().ok())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| "localhost".to_string())
}
