//! Service endpoint handles
//!
//! Each daemon exposes a debug webserver with a JSON metrics page, plus its
//! own service ports. Handles are built once from the daemon's command line
//! and never change afterwards.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};

use crate::error::{ClusterError, ClusterResult};
use crate::runtime::context::ClusterContext;
use crate::traits::QueryClient;

/// Debug webserver of a single daemon
#[derive(Clone)]
pub struct WebEndpoint {
    hostname: String,
    webserver_port: u16,
    ctx: Arc<ClusterContext>,
}

impl WebEndpoint {
    pub fn new(hostname: String, webserver_port: u16, ctx: Arc<ClusterContext>) -> Self {
        Self {
            hostname,
            webserver_port,
            ctx,
        }
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn webserver_port(&self) -> u16 {
        self.webserver_port
    }

    /// Current value of a metric, `None` if the daemon does not report it
    pub async fn get_metric_value(&self, metric: &str) -> ClusterResult<Option<serde_json::Value>> {
        let mut metrics = self
            .ctx
            .metrics
            .fetch_metrics(&self.hostname, self.webserver_port)
            .await?;
        Ok(metrics.remove(metric))
    }

    /// Poll `metric` until it equals `expected` or `timeout` elapses.
    ///
    /// Fetch failures count as "not there yet"; a daemon that is still
    /// starting up usually refuses connections for a while.
    pub async fn wait_for_metric_value(&self, metric: &str, expected: i64, timeout: Duration) -> ClusterResult<()> {
        let span = &self.ctx.span;
        let start = Instant::now();

        loop {
            debug!(
                parent: span,
                "Getting metric: {} from {}:{}", metric, self.hostname, self.webserver_port
            );

            match self.get_metric_value(metric).await {
                Ok(Some(value)) if metric_matches(&value, expected) => {
                    info!(parent: span, "✅ Metric '{}' has reached desired value: {}", metric, expected);
                    return Ok(());
                }
                Ok(value) => {
                    debug!(parent: span, "Metric '{}' is {:?}, waiting for {}", metric, value, expected);
                }
                Err(e) => {
                    warn!(parent: span, "⚠️ {}", e);
                }
            }

            if start.elapsed() >= timeout {
                break;
            }
            sleep(self.ctx.config.poll_interval).await;
        }

        Err(ClusterError::MetricTimeout {
            metric: metric.to_string(),
            expected,
            timeout,
        })
    }
}

/// Numbers compare numerically, booleans as 0/1, strings if they parse
pub fn metric_matches(value: &serde_json::Value, expected: i64) -> bool {
    match value {
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => i == expected,
            None => n.as_f64() == Some(expected as f64),
        },
        serde_json::Value::Bool(b) => i64::from(*b) == expected,
        serde_json::Value::String(s) => s.trim().parse::<i64>() == Ok(expected),
        _ => false,
    }
}

/// Ports a daemon listens on, for status reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServicePorts {
    pub webserver_port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub beeswax_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub be_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hs2_port: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub catalog_service_port: Option<u16>,
}

/// Coordinator endpoint
#[derive(Clone)]
pub struct ImpaladService {
    web: WebEndpoint,
    beeswax_port: u16,
    be_port: u16,
    hs2_port: u16,
}

impl ImpaladService {
    pub fn new(web: WebEndpoint, beeswax_port: u16, be_port: u16, hs2_port: u16) -> Self {
        Self {
            web,
            beeswax_port,
            be_port,
            hs2_port,
        }
    }

    pub fn web(&self) -> &WebEndpoint {
        &self.web
    }

    pub fn hostname(&self) -> &str {
        self.web.hostname()
    }

    pub fn webserver_port(&self) -> u16 {
        self.web.webserver_port()
    }

    pub fn beeswax_port(&self) -> u16 {
        self.beeswax_port
    }

    pub fn be_port(&self) -> u16 {
        self.be_port
    }

    pub fn hs2_port(&self) -> u16 {
        self.hs2_port
    }

    /// Open a client on the beeswax port
    pub async fn create_beeswax_client(&self) -> ClusterResult<Box<dyn QueryClient>> {
        self.web.ctx.connector.connect(self.hostname(), self.beeswax_port).await
    }

    pub fn ports(&self) -> ServicePorts {
        ServicePorts {
            webserver_port: self.webserver_port(),
            beeswax_port: Some(self.beeswax_port),
            be_port: Some(self.be_port),
            hs2_port: Some(self.hs2_port),
            catalog_service_port: None,
        }
    }
}

/// Membership daemon endpoint
#[derive(Clone)]
pub struct StatestoredService {
    web: WebEndpoint,
}

impl StatestoredService {
    pub fn new(web: WebEndpoint) -> Self {
        Self { web }
    }

    pub fn web(&self) -> &WebEndpoint {
        &self.web
    }

    pub fn hostname(&self) -> &str {
        self.web.hostname()
    }

    pub fn webserver_port(&self) -> u16 {
        self.web.webserver_port()
    }

    pub fn ports(&self) -> ServicePorts {
        ServicePorts {
            webserver_port: self.webserver_port(),
            beeswax_port: None,
            be_port: None,
            hs2_port: None,
            catalog_service_port: None,
        }
    }
}

/// Catalog daemon endpoint
#[derive(Clone)]
pub struct CatalogdService {
    web: WebEndpoint,
    service_port: u16,
}

impl CatalogdService {
    pub fn new(web: WebEndpoint, service_port: u16) -> Self {
        Self { web, service_port }
    }

    pub fn web(&self) -> &WebEndpoint {
        &self.web
    }

    pub fn hostname(&self) -> &str {
        self.web.hostname()
    }

    pub fn webserver_port(&self) -> u16 {
        self.web.webserver_port()
    }

    pub fn service_port(&self) -> u16 {
        self.service_port
    }

    pub fn ports(&self) -> ServicePorts {
        ServicePorts {
            webserver_port: self.webserver_port(),
            beeswax_port: None,
            be_port: None,
            hs2_port: None,
            catalog_service_port: Some(self.service_port),
        }
    }
}
