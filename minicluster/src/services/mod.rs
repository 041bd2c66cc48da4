//! Service implementations
//!
//! Real implementations of the collaborator traits in [`crate::traits`]. These
//! are the ones that touch the process table, deliver signals, and talk to the
//! daemons over the network.

pub mod launcher;
pub mod metrics;
pub mod process_table;
pub mod query;

// Re-export all service implementations
pub use launcher::ShellLauncher;
pub use metrics::HttpMetricSource;
pub use process_table::SysinfoProcessTable;
pub use query::TcpQueryConnector;
