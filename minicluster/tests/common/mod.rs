//! Common test utilities and infrastructure
//!
//! Fixtures and helpers shared by the minicluster integration suites.

pub mod fixtures;
pub mod helpers;

// Re-export commonly used items for convenience
pub use fixtures::TestFixtures;
pub use helpers::{ClusterBuilder, FakeProcessTable};
