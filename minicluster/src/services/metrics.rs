//! HTTP client for the daemons' JSON metrics page

use std::time::Duration;

use crate::error::{ClusterError, ClusterResult};
use crate::traits::{MetricMap, MetricSource};

/// Path of the flat metric-name -> value JSON document
pub const METRICS_PATH: &str = "jsonmetrics?json";

#[derive(Clone)]
pub struct HttpMetricSource {
    client: reqwest::Client,
}

impl HttpMetricSource {
    pub fn new(timeout: Duration) -> ClusterResult<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn metrics_url(hostname: &str, port: u16) -> String {
        format!("http://{hostname}:{port}/{METRICS_PATH}")
    }
}

#[async_trait::async_trait]
impl MetricSource for HttpMetricSource {
    async fn fetch_metrics(&self, hostname: &str, port: u16) -> ClusterResult<MetricMap> {
        let url = Self::metrics_url(hostname, port);

        let response = self.client.get(&url).send().await.map_err(|e| ClusterError::MetricFetch {
            url: url.clone(),
            message: e.to_string(),
        })?;

        if !response.status().is_success() {
            return Err(ClusterError::MetricFetch {
                url,
                message: format!("HTTP {}", response.status()),
            });
        }

        Ok(response.json::<MetricMap>().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_url() {
        assert_eq!(
            HttpMetricSource::metrics_url("node-1", 25000),
            "http://node-1:25000/jsonmetrics?json"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_fetch_error() {
        let source = HttpMetricSource::new(Duration::from_millis(500)).unwrap();
        // Port 1 is never a metrics server
        let result = source.fetch_metrics("127.0.0.1", 1).await;
        assert!(matches!(result, Err(ClusterError::MetricFetch { .. })));
    }
}
