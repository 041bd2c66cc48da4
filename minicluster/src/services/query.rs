//! Client-protocol reachability probe
//!
//! Speaking the engine's client protocol is outside this crate. The TCP
//! connector treats an accepted connection on the client-protocol port as a
//! coordinator that can answer a trivial query. Tests that need real query
//! results plug in their own [`QueryConnector`].

use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;

use crate::error::{ClusterError, ClusterResult};
use crate::traits::{QueryClient, QueryConnector, QueryOutcome};

#[derive(Debug, Clone)]
pub struct TcpQueryConnector {
    connect_timeout: Duration,
}

impl TcpQueryConnector {
    pub fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }
}

#[async_trait::async_trait]
impl QueryConnector for TcpQueryConnector {
    async fn connect(&self, hostname: &str, port: u16) -> ClusterResult<Box<dyn QueryClient>> {
        let endpoint = format!("{hostname}:{port}");

        let stream = tokio::time::timeout(self.connect_timeout, TcpStream::connect(endpoint.as_str()))
            .await
            .map_err(|_| ClusterError::QueryFailed {
                query: String::new(),
                endpoint: endpoint.clone(),
                message: format!("connect timed out after {:?}", self.connect_timeout),
            })??;

        Ok(Box::new(TcpQueryClient {
            endpoint,
            stream: Some(stream),
        }))
    }
}

pub struct TcpQueryClient {
    endpoint: String,
    stream: Option<TcpStream>,
}

#[async_trait::async_trait]
impl QueryClient for TcpQueryClient {
    async fn execute(&mut self, query: &str) -> ClusterResult<QueryOutcome> {
        let stream = self.stream.as_ref().ok_or_else(|| ClusterError::QueryFailed {
            query: query.to_string(),
            endpoint: self.endpoint.clone(),
            message: "connection closed".to_string(),
        })?;

        // Still connected means the coordinator is accepting clients
        stream.peer_addr()?;
        Ok(QueryOutcome { success: true })
    }

    async fn close(&mut self) {
        if let Some(mut stream) = self.stream.take() {
            let _ = stream.shutdown().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_probe_against_listening_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let connector = TcpQueryConnector::new(Duration::from_secs(1));
        let mut client = connector.connect("127.0.0.1", port).await.unwrap();

        let outcome = client.execute("select 1").await.unwrap();
        assert!(outcome.success);

        client.close().await;
        assert!(client.execute("select 1").await.is_err());
    }

    #[tokio::test]
    async fn test_probe_against_closed_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let connector = TcpQueryConnector::new(Duration::from_secs(1));
        assert!(connector.connect("127.0.0.1", port).await.is_err());
    }
}
