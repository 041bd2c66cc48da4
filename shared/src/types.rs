//! Core shared types and identifiers

use crate::errors::{SharedError, SharedResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating-system process id
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pid(u32);

impl Pid {
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for Pid {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// The daemons that make up a local test cluster, keyed by OS process name
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DaemonKind {
    /// Query coordinator/executor
    Impalad,
    /// Cluster membership daemon
    Statestored,
    /// Metadata catalog daemon
    Catalogd,
}

impl DaemonKind {
    pub const ALL: [DaemonKind; 3] = [DaemonKind::Impalad, DaemonKind::Statestored, DaemonKind::Catalogd];

    /// Classify a process by its OS process name. Unrelated processes yield `None`.
    pub fn from_process_name(name: &str) -> Option<Self> {
        match name {
            "impalad" => Some(DaemonKind::Impalad),
            "statestored" => Some(DaemonKind::Statestored),
            "catalogd" => Some(DaemonKind::Catalogd),
            _ => None,
        }
    }

    pub fn process_name(&self) -> &'static str {
        match self {
            DaemonKind::Impalad => "impalad",
            DaemonKind::Statestored => "statestored",
            DaemonKind::Catalogd => "catalogd",
        }
    }
}

impl fmt::Display for DaemonKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.process_name())
    }
}

impl FromStr for DaemonKind {
    type Err = SharedError;

    fn from_str(s: &str) -> SharedResult<Self> {
        match s.to_ascii_lowercase().as_str() {
            "impalad" | "coordinator" => Ok(DaemonKind::Impalad),
            "statestored" | "statestore" | "membership" => Ok(DaemonKind::Statestored),
            "catalogd" | "catalog" => Ok(DaemonKind::Catalogd),
            _ => Err(SharedError::UnknownDaemonKind { input: s.to_string() }),
        }
    }
}
