//! Signal delivery through `nix` and detached launches through `sh`

use std::process::Command;

use nix::errno::Errno;
use nix::sys::signal;
use nix::unistd::Pid as NixPid;
use shared::Pid;

use crate::error::{ClusterError, ClusterResult};
use crate::traits::{ProcessLauncher, Signal};

#[derive(Debug, Default, Clone)]
pub struct ShellLauncher;

impl ShellLauncher {
    pub fn new() -> Self {
        Self
    }

    /// Shell line that runs `argv` in the background
    pub fn background_command(argv: &[String]) -> String {
        format!("{} &", argv.join(" "))
    }
}

impl ProcessLauncher for ShellLauncher {
    fn signal(&self, pid: Pid, sig: Signal) -> ClusterResult<()> {
        let raw = i32::try_from(pid.as_u32()).map_err(|_| ClusterError::SignalFailed {
            pid,
            signal: sig.as_str().to_string(),
            message: "PID out of range".to_string(),
        })?;

        signal::kill(NixPid::from_raw(raw), sig).map_err(|e: Errno| ClusterError::SignalFailed {
            pid,
            signal: sig.as_str().to_string(),
            message: e.to_string(),
        })
    }

    fn spawn_detached(&self, argv: &[String]) -> ClusterResult<()> {
        let line = Self::background_command(argv);

        // The shell exits right away; the backgrounded child is re-parented to init
        let status = Command::new("sh").arg("-c").arg(&line).status()?;

        if !status.success() {
            return Err(ClusterError::SpawnFailed {
                command: line,
                message: format!("shell exited with {status}"),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_command() {
        let argv = vec!["/opt/bin/catalogd".to_string(), "--webserver_port=25020".to_string()];
        assert_eq!(
            ShellLauncher::background_command(&argv),
            "/opt/bin/catalogd --webserver_port=25020 &"
        );
    }

    #[test]
    fn test_signal_nonexistent_process() {
        let launcher = ShellLauncher::new();
        let result = launcher.signal(Pid::from_raw(999_999_999), Signal::SIGTERM);
        assert!(matches!(result, Err(ClusterError::SignalFailed { .. })));
    }

    #[test]
    fn test_spawn_detached_runs_shell() {
        let launcher = ShellLauncher::new();
        assert!(launcher.spawn_detached(&["true".to_string()]).is_ok());
    }
}
