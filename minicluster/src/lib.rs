//! Local test-cluster control
//!
//! Object model of a local Impala minicluster: find the `impalad`,
//! `statestored` and `catalogd` processes of the current user, kill and
//! restart them, and reach their service endpoints from test code.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use minicluster::*;
//!
//! # async fn run() -> ClusterResult<()> {
//! let mut cluster = ImpalaCluster::local()?;
//!
//! let impalad = cluster.first_coordinator().expect("cluster is running").clone();
//! impalad.kill(Signal::SIGKILL)?.expect_killed();
//! cluster.refresh()?;
//!
//! impalad.start(true).await?;
//! assert_eq!(cluster.responsive_coordinator_count().await, 3);
//! # Ok(())
//! # }
//! ```

// Core modules
pub mod config;
pub mod error;
pub mod runtime;
pub mod services;
pub mod traits;

// Main interfaces - re-exported at crate root for convenience
pub use config::{ClusterConfig, ClusterConfigBuilder};
pub use error::{ClusterError, ClusterResult};
pub use runtime::{
    CatalogdProcess, ClusterContext, ClusterProcess, ImpalaCluster, ImpaladProcess, KillOutcome, Process,
    StatestoredProcess,
};

// Supporting types
pub use runtime::{CatalogdService, DaemonStatus, ImpaladService, ServicePorts, StatestoredService, WebEndpoint};
pub use shared::{CommandLine, DaemonKind, Pid};
pub use traits::{
    MetricSource, ProcessLauncher, ProcessRecord, ProcessTable, QueryClient, QueryConnector, QueryOutcome, Signal,
};

// Mocks for tests in downstream crates
pub use traits::{MockMetricSource, MockProcessLauncher, MockProcessTable, MockQueryClient, MockQueryConnector};
