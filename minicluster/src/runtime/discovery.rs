//! Cluster discovery
//!
//! Scans the process table for daemons owned by the current user.
//! Only works for the local case: a real multi-host cluster would need one
//! scan per machine.

use std::sync::Arc;

use shared::{CommandLine, DaemonKind};
use tracing::{debug, info};

use crate::error::{ClusterError, ClusterResult};
use crate::runtime::context::ClusterContext;
use crate::runtime::daemons::{CatalogdProcess, DaemonProcess, ImpaladProcess, StatestoredProcess, build_daemon};

/// Everything one discovery pass found
#[derive(Debug, Clone, Default)]
pub struct DiscoveredDaemons {
    /// Sorted by backend port
    pub impalads: Vec<ImpaladProcess>,
    pub statestoreds: Vec<StatestoredProcess>,
    pub catalogd: Option<CatalogdProcess>,
}

pub fn discover(ctx: &Arc<ClusterContext>) -> ClusterResult<DiscoveredDaemons> {
    let span = &ctx.span;
    let table = &ctx.process_table;

    let user = table
        .current_user()
        .or_else(|| std::env::var("USER").ok())
        .ok_or_else(|| ClusterError::ConfigError {
            field: "user".to_string(),
            message: "cannot determine the current user".to_string(),
        })?;

    let mut found = DiscoveredDaemons::default();

    for pid in table.pids() {
        let Some(record) = table.inspect(pid) else {
            debug!(parent: span, "Process {} no longer exists", pid);
            continue;
        };

        // Unknown uids are somebody else's processes
        if record.owner.as_deref() != Some(user.as_str()) {
            continue;
        }

        // A zombie's cmdline is briefly empty before its parent reaps it
        if record.cmdline.is_empty() {
            debug!(parent: span, "Process {} ({}) has an empty command line", pid, record.name);
            continue;
        }

        let Some(kind) = DaemonKind::from_process_name(&record.name) else {
            continue;
        };

        let cmd = CommandLine::new(record.cmdline)?;
        match build_daemon(kind, cmd, ctx.clone())? {
            DaemonProcess::Impalad(p) => found.impalads.push(p),
            DaemonProcess::Statestored(p) => found.statestoreds.push(p),
            DaemonProcess::Catalogd(p) => found.catalogd = Some(p),
        }
    }

    // PIDs can wrap around while a minicluster starts, so pid order says
    // nothing; backend port order keeps the first impalad stable.
    found.impalads.sort_by_key(|impalad| impalad.service().be_port());

    info!(
        parent: span,
        "Found {} impalad/{} statestored/{} catalogd process(es)",
        found.impalads.len(),
        found.statestoreds.len(),
        usize::from(found.catalogd.is_some())
    );
    Ok(found)
}
