//! Runtime Management
//!
//! Process handles, service endpoints, discovery and the cluster view.

pub mod cluster;
pub mod context;
pub mod daemons;
pub mod discovery;
pub mod endpoint;
pub mod process;

// Re-export main types
pub use cluster::{DaemonStatus, ImpalaCluster, PROBE_QUERY};
pub use context::ClusterContext;
pub use daemons::{CatalogdProcess, DaemonProcess, ImpaladProcess, StatestoredProcess};
pub use discovery::{DiscoveredDaemons, discover};
pub use endpoint::{CatalogdService, ImpaladService, ServicePorts, StatestoredService, WebEndpoint};
pub use process::{ClusterProcess, KillOutcome, Process};
