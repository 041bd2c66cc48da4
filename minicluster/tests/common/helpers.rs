//! Test helpers and builder patterns for cluster tests

use std::sync::{Arc, Mutex};
use std::time::Duration;

use minicluster::*;

use super::fixtures::TestFixtures;

/// Mutable in-memory process table
#[derive(Clone, Default)]
pub struct FakeProcessTable {
    records: Arc<Mutex<Vec<ProcessRecord>>>,
}

impl FakeProcessTable {
    pub fn new(records: Vec<ProcessRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    pub fn remove(&self, pid: Pid) {
        self.records.lock().unwrap().retain(|r| r.pid != pid);
    }

    pub fn add(&self, record: ProcessRecord) {
        self.records.lock().unwrap().push(record);
    }
}

impl ProcessTable for FakeProcessTable {
    fn pids(&self) -> Vec<Pid> {
        self.records.lock().unwrap().iter().map(|r| r.pid).collect()
    }

    fn inspect(&self, pid: Pid) -> Option<ProcessRecord> {
        self.records.lock().unwrap().iter().find(|r| r.pid == pid).cloned()
    }

    fn current_user(&self) -> Option<String> {
        Some(TestFixtures::USER.to_string())
    }
}

/// Builder for test clusters with sensible defaults and permissive mocks
pub struct ClusterBuilder {
    table: FakeProcessTable,
    launcher: MockProcessLauncher,
    metrics: MockMetricSource,
    connector: MockQueryConnector,
}

impl ClusterBuilder {
    pub fn new(table: FakeProcessTable) -> Self {
        Self {
            table,
            launcher: MockProcessLauncher::new(),
            metrics: MockMetricSource::new(),
            connector: MockQueryConnector::new(),
        }
    }

    pub fn with_launcher(mut self, launcher: MockProcessLauncher) -> Self {
        self.launcher = launcher;
        self
    }

    pub fn with_metrics(mut self, metrics: MockMetricSource) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn with_connector(mut self, connector: MockQueryConnector) -> Self {
        self.connector = connector;
        self
    }

    pub fn context(self) -> Arc<ClusterContext> {
        let config = ClusterConfig::builder()
            .impala_home(TestFixtures::IMPALA_HOME)
            .hostname(TestFixtures::HOSTNAME)
            .restart_pause(Duration::ZERO)
            .poll_interval(Duration::from_millis(5))
            .ready_timeout(Duration::from_millis(500))
            .build();

        ClusterContext::local(config)
            .expect("context")
            .with_process_table(Arc::new(self.table))
            .with_launcher(Arc::new(self.launcher))
            .with_metric_source(Arc::new(self.metrics))
            .with_query_connector(Arc::new(self.connector))
            .with_span(shared::logging::cluster_span("test"))
            .shared()
    }

    pub fn build(self) -> ImpalaCluster {
        ImpalaCluster::new(self.context()).expect("discovery")
    }
}

/// Query client that answers every query with the given outcome
pub fn answering_client(success: bool) -> Box<dyn QueryClient> {
    let mut client = MockQueryClient::new();
    client.expect_execute().returning(move |_| Ok(QueryOutcome { success }));
    client.expect_close().times(1).returning(|| ());
    Box::new(client)
}
