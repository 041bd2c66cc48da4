//! Cluster view
//!
//! The set of daemons a test is running against, as of the last discovery
//! pass. Call [`ImpalaCluster::refresh`] after killing or starting processes.

use std::sync::Arc;

use rand::seq::SliceRandom;
use serde::Serialize;
use shared::{CommandLine, DaemonKind, Pid};
use tracing::{debug, info, warn};

use crate::config::ClusterConfig;
use crate::error::{ClusterError, ClusterResult};
use crate::runtime::context::ClusterContext;
use crate::runtime::daemons::{CatalogdProcess, ImpaladProcess, StatestoredProcess};
use crate::runtime::discovery::{DiscoveredDaemons, discover};
use crate::runtime::endpoint::ServicePorts;
use crate::runtime::process::ClusterProcess;

/// Query used to decide whether a coordinator is responsive
pub const PROBE_QUERY: &str = "select 1";

pub struct ImpalaCluster {
    ctx: Arc<ClusterContext>,
    daemons: DiscoveredDaemons,
}

/// One line of `status` output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DaemonStatus {
    pub kind: DaemonKind,
    pub index: usize,
    pub pid: Option<Pid>,
    pub cmdline: CommandLine,
    pub ports: ServicePorts,
}

impl ImpalaCluster {
    /// Discover the daemons currently running
    pub fn new(ctx: Arc<ClusterContext>) -> ClusterResult<Self> {
        let daemons = discover(&ctx)?;
        Ok(Self { ctx, daemons })
    }

    /// Cluster on this machine, configured from the environment
    pub fn local() -> ClusterResult<Self> {
        let config = ClusterConfig::from_env()?;
        Self::new(ClusterContext::local(config)?.shared())
    }

    pub fn context(&self) -> &Arc<ClusterContext> {
        &self.ctx
    }

    /// Re-run discovery. The old state is kept if discovery fails.
    pub fn refresh(&mut self) -> ClusterResult<()> {
        self.daemons = discover(&self.ctx)?;
        Ok(())
    }

    pub fn impalads(&self) -> &[ImpaladProcess] {
        &self.daemons.impalads
    }

    pub fn statestoreds(&self) -> &[StatestoredProcess] {
        &self.daemons.statestoreds
    }

    /// The statestore, assuming there is at most one
    pub fn statestored(&self) -> Option<&StatestoredProcess> {
        self.daemons.statestoreds.first()
    }

    pub fn catalogd(&self) -> Option<&CatalogdProcess> {
        self.daemons.catalogd.as_ref()
    }

    /// Impalad with the lowest backend port
    pub fn first_coordinator(&self) -> Option<&ImpaladProcess> {
        self.daemons.impalads.first()
    }

    pub fn random_coordinator(&self) -> Option<&ImpaladProcess> {
        self.daemons.impalads.choose(&mut rand::thread_rng())
    }

    /// Random impalad other than `other`
    pub fn distinct_coordinator(&self, other: &ImpaladProcess) -> ClusterResult<&ImpaladProcess> {
        let available = self.daemons.impalads.len();
        if available <= 1 {
            return Err(ClusterError::NotEnoughCoordinators { available });
        }

        debug!(parent: &self.ctx.span, "other_impalad: {}", other);
        let candidates: Vec<&ImpaladProcess> = self
            .daemons
            .impalads
            .iter()
            .filter(|impalad| *impalad != other)
            .collect();

        candidates
            .choose(&mut rand::thread_rng())
            .copied()
            .ok_or(ClusterError::NotEnoughCoordinators { available })
    }

    /// Number of impalads that can run a trivial query
    pub async fn responsive_coordinator_count(&self) -> usize {
        let span = &self.ctx.span;
        let mut responsive = 0;

        for impalad in &self.daemons.impalads {
            let service = impalad.service();
            let mut client = match service.create_beeswax_client().await {
                Ok(client) => client,
                Err(e) => {
                    warn!(parent: span, "⚠️ Cannot connect to {}:{}: {}", service.hostname(), service.beeswax_port(), e);
                    continue;
                }
            };

            match client.execute(PROBE_QUERY).await {
                Ok(outcome) if outcome.success => responsive += 1,
                Ok(_) => warn!(parent: span, "⚠️ '{}' did not succeed on {}", PROBE_QUERY, impalad),
                Err(e) => warn!(parent: span, "⚠️ '{}' failed on {}: {}", PROBE_QUERY, impalad, e),
            }
            client.close().await;
        }

        info!(parent: span, "{} of {} coordinators responsive", responsive, self.daemons.impalads.len());
        responsive
    }

    /// Daemon of the given kind by position (impalads in backend-port order)
    pub fn daemon(&self, kind: DaemonKind, index: usize) -> Option<&dyn ClusterProcess> {
        match kind {
            DaemonKind::Impalad => self.daemons.impalads.get(index).map(|p| p as &dyn ClusterProcess),
            DaemonKind::Statestored => self.daemons.statestoreds.get(index).map(|p| p as &dyn ClusterProcess),
            DaemonKind::Catalogd => self
                .daemons
                .catalogd
                .as_ref()
                .filter(|_| index == 0)
                .map(|p| p as &dyn ClusterProcess),
        }
    }

    /// Snapshot of every known daemon with its live PID
    pub fn status(&self) -> Vec<DaemonStatus> {
        let impalads = self.daemons.impalads.iter().enumerate().map(|(index, p)| DaemonStatus {
            kind: DaemonKind::Impalad,
            index,
            pid: p.get_pid(),
            cmdline: p.process().cmd().clone(),
            ports: p.service().ports(),
        });
        let statestoreds = self.daemons.statestoreds.iter().enumerate().map(|(index, p)| DaemonStatus {
            kind: DaemonKind::Statestored,
            index,
            pid: p.get_pid(),
            cmdline: p.process().cmd().clone(),
            ports: p.service().ports(),
        });
        let catalogd = self.daemons.catalogd.iter().map(|p| DaemonStatus {
            kind: DaemonKind::Catalogd,
            index: 0,
            pid: p.get_pid(),
            cmdline: p.process().cmd().clone(),
            ports: p.service().ports(),
        });

        impalads.chain(statestoreds).chain(catalogd).collect()
    }
}
