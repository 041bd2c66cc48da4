//! Configuration Management
//!
//! Configuration structures and builders describing the local test cluster.

pub mod builder;
pub mod cluster;

// Re-export main types
pub use builder::ClusterConfigBuilder;
pub use cluster::{ClusterConfig, IMPALA_HOME_VAR};
