//! Process handles
//!
//! A handle is a command line plus the context needed to act on it. It does
//! not own the OS process: the process may exit while the handle lives on, in
//! which case [`Process::get_pid`] simply returns `None`.

use std::fmt;
use std::sync::Arc;

use shared::{CommandLine, Pid};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{ClusterError, ClusterResult};
use crate::runtime::context::ClusterContext;
use crate::traits::Signal;

/// Result of a kill attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillOutcome {
    Killed(Pid),
    /// No running process matched the handle's command line
    NotFound,
}

impl KillOutcome {
    pub fn pid(&self) -> Option<Pid> {
        match self {
            KillOutcome::Killed(pid) => Some(*pid),
            KillOutcome::NotFound => None,
        }
    }

    /// Treat a missing process as an error
    pub fn into_result(self, cmdline: &CommandLine) -> ClusterResult<Pid> {
        self.pid().ok_or_else(|| ClusterError::ProcessNotFound {
            cmdline: cmdline.clone(),
        })
    }

    /// Test-harness form: a missing process halts the test
    pub fn expect_killed(self) -> Pid {
        match self {
            KillOutcome::Killed(pid) => pid,
            KillOutcome::NotFound => panic!("No process found to kill"),
        }
    }
}

/// A process identified by its command line
#[derive(Clone)]
pub struct Process {
    cmd: CommandLine,
    ctx: Arc<ClusterContext>,
}

impl Process {
    pub fn new(cmd: CommandLine, ctx: Arc<ClusterContext>) -> Self {
        Self { cmd, ctx }
    }

    /// Build from a raw argument vector; fails when it is empty
    pub fn from_args<I, S>(args: I, ctx: Arc<ClusterContext>) -> ClusterResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Self::new(CommandLine::new(args)?, ctx))
    }

    pub fn cmd(&self) -> &CommandLine {
        &self.cmd
    }

    pub fn context(&self) -> &Arc<ClusterContext> {
        &self.ctx
    }

    /// PID of the live process whose argument set equals ours
    pub fn get_pid(&self) -> Option<Pid> {
        let span = &self.ctx.span;
        info!(parent: span, "Attempting to find PID for {}", self.cmd);

        let table = &self.ctx.process_table;
        for pid in table.pids() {
            match table.inspect(pid) {
                Some(record) if self.cmd.matches_set(&record.cmdline) => return Some(pid),
                Some(_) => {}
                None => debug!(parent: span, "Process {} no longer exists", pid),
            }
        }

        info!(parent: span, "No PID found for process cmdline: {}. Process is dead?", self.cmd);
        None
    }

    /// Send `signal` to the matching process
    pub fn kill(&self, signal: Signal) -> ClusterResult<KillOutcome> {
        let Some(pid) = self.get_pid() else {
            warn!(parent: &self.ctx.span, "⚠️ No processes {} found", self.cmd);
            return Ok(KillOutcome::NotFound);
        };

        info!(
            parent: &self.ctx.span,
            "💀 Killing: {} (PID: {}) with signal {}", self.cmd, pid, signal.as_str()
        );
        self.ctx.launcher.signal(pid, signal)?;
        Ok(KillOutcome::Killed(pid))
    }

    /// Launch the stored command line in the background
    pub fn launch(&self) -> ClusterResult<()> {
        info!(parent: &self.ctx.span, "🚀 Starting process: {}", self.cmd);
        self.ctx.launcher.spawn_detached(self.cmd.as_slice())
    }

    /// Launch `prefix` followed by our arguments (minus the executable)
    pub(crate) fn launch_with(&self, prefix: Vec<String>) -> ClusterResult<()> {
        let mut argv = prefix;
        argv.extend_from_slice(self.cmd.args());

        info!(parent: &self.ctx.span, "🚀 Starting process: {}", argv.join(" "));
        self.ctx.launcher.spawn_detached(&argv)
    }
}

impl PartialEq for Process {
    fn eq(&self, other: &Self) -> bool {
        self.cmd == other.cmd
    }
}

impl Eq for Process {}

impl fmt::Debug for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Process").field("cmd", &self.cmd).finish()
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Command: {}", self.cmd)
    }
}

/// Lifecycle operations shared by every kind of cluster process
#[async_trait::async_trait]
pub trait ClusterProcess: Send + Sync {
    fn process(&self) -> &Process;

    fn get_pid(&self) -> Option<Pid> {
        self.process().get_pid()
    }

    fn kill(&self, signal: Signal) -> ClusterResult<KillOutcome> {
        self.process().kill(signal)
    }

    /// Start the process. Daemons that report readiness block until they do
    /// when `wait_until_ready` is set.
    async fn start(&self, _wait_until_ready: bool) -> ClusterResult<()> {
        self.process().launch()
    }

    /// Kill with SIGKILL, give the ports a moment to free up, start again
    async fn restart(&self, wait_until_ready: bool) -> ClusterResult<()> {
        let process = self.process();
        self.kill(Signal::SIGKILL)?.into_result(process.cmd())?;

        sleep(process.context().config.restart_pause).await;
        self.start(wait_until_ready).await
    }
}

#[async_trait::async_trait]
impl ClusterProcess for Process {
    fn process(&self) -> &Process {
        self
    }
}
