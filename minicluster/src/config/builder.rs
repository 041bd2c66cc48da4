//! Cluster Configuration Builder
//!
//! Provides a flexible builder pattern for constructing cluster configurations

use super::ClusterConfig;
use std::path::PathBuf;
use std::time::Duration;

pub struct ClusterConfigBuilder {
    config: ClusterConfig,
}

impl ClusterConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ClusterConfig::default(),
        }
    }

    /// Set the installation root
    pub fn impala_home<P: Into<PathBuf>>(mut self, home: P) -> Self {
        self.config.impala_home = home.into();
        self
    }

    /// Override the hostname recorded on service endpoints
    pub fn hostname<S: Into<String>>(mut self, hostname: S) -> Self {
        self.config.hostname = hostname.into();
        self
    }

    /// Set the pause between kill and start during a restart
    pub fn restart_pause(mut self, pause: Duration) -> Self {
        self.config.restart_pause = pause;
        self
    }

    /// Set how long a started daemon may take to become ready
    pub fn ready_timeout(mut self, timeout: Duration) -> Self {
        self.config.ready_timeout = timeout;
        self
    }

    /// Set the metric polling interval
    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Set the HTTP request timeout for metric fetches
    pub fn http_timeout(mut self, timeout: Duration) -> Self {
        self.config.http_timeout = timeout;
        self
    }

    /// Build the configuration
    pub fn build(self) -> ClusterConfig {
        self.config
    }
}

impl Default for ClusterConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
