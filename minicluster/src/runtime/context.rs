//! Shared context handed to every cluster component
//!
//! Bundles the configuration, the OS/network collaborators and the logging
//! span. Process handles and service endpoints hold an `Arc` to it.

use std::sync::Arc;

use tracing::Span;

use crate::config::ClusterConfig;
use crate::error::ClusterResult;
use crate::services::{HttpMetricSource, ShellLauncher, SysinfoProcessTable, TcpQueryConnector};
use crate::traits::{MetricSource, ProcessLauncher, ProcessTable, QueryConnector};

pub struct ClusterContext {
    pub config: ClusterConfig,
    pub process_table: Arc<dyn ProcessTable>,
    pub launcher: Arc<dyn ProcessLauncher>,
    pub metrics: Arc<dyn MetricSource>,
    pub connector: Arc<dyn QueryConnector>,
    /// Parent span for every event emitted on behalf of this cluster
    pub span: Span,
}

impl ClusterContext {
    /// Context wired to the local machine: sysinfo, signals, HTTP, TCP
    pub fn local(config: ClusterConfig) -> ClusterResult<Self> {
        let metrics = HttpMetricSource::new(config.http_timeout)?;
        let connector = TcpQueryConnector::new(config.http_timeout);

        Ok(Self {
            config,
            process_table: Arc::new(SysinfoProcessTable::new()),
            launcher: Arc::new(ShellLauncher::new()),
            metrics: Arc::new(metrics),
            connector: Arc::new(connector),
            span: shared::logging::cluster_span("local"),
        })
    }

    /// Replace the process table (fluent API)
    pub fn with_process_table(mut self, table: Arc<dyn ProcessTable>) -> Self {
        self.process_table = table;
        self
    }

    /// Replace the signal/launch backend (fluent API)
    pub fn with_launcher(mut self, launcher: Arc<dyn ProcessLauncher>) -> Self {
        self.launcher = launcher;
        self
    }

    /// Replace the metrics client (fluent API)
    pub fn with_metric_source(mut self, metrics: Arc<dyn MetricSource>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Replace the query connector (fluent API)
    pub fn with_query_connector(mut self, connector: Arc<dyn QueryConnector>) -> Self {
        self.connector = connector;
        self
    }

    /// Log under a different parent span (fluent API)
    pub fn with_span(mut self, span: Span) -> Self {
        self.span = span;
        self
    }

    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}
