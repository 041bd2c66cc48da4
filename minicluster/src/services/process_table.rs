//! Process table backed by `sysinfo`
//!
//! On Linux `sysinfo` reports every thread as its own entry, carrying the
//! name and command line of its process. Only thread-group leaders are
//! listed here.

use std::collections::HashSet;
use std::sync::Mutex;

use shared::Pid;
use sysinfo::{ProcessRefreshKind, System, Users};

use crate::traits::{ProcessRecord, ProcessTable};

pub struct SysinfoProcessTable {
    system: Mutex<System>,
    users: Mutex<Users>,
}

impl SysinfoProcessTable {
    pub fn new() -> Self {
        Self {
            system: Mutex::new(System::new()),
            users: Mutex::new(Users::new_with_refreshed_list()),
        }
    }

    fn user_name(&self, uid: &sysinfo::Uid) -> Option<String> {
        let users = self.users.lock().unwrap_or_else(|e| e.into_inner());
        users.get_user_by_id(uid).map(|user| user.name().to_string())
    }
}

impl Default for SysinfoProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

/// Pids that are not some other process's thread
fn thread_group_leaders<I>(entries: I) -> Vec<Pid>
where
    I: IntoIterator<Item = (Pid, Vec<Pid>)>,
{
    let entries: Vec<(Pid, Vec<Pid>)> = entries.into_iter().collect();
    let threads: HashSet<Pid> = entries
        .iter()
        .flat_map(|(pid, tasks)| tasks.iter().filter(move |task| *task != pid).copied())
        .collect();

    entries
        .into_iter()
        .map(|(pid, _)| pid)
        .filter(|pid| !threads.contains(pid))
        .collect()
}

impl ProcessTable for SysinfoProcessTable {
    fn pids(&self) -> Vec<Pid> {
        self.users.lock().unwrap_or_else(|e| e.into_inner()).refresh_list();

        let mut system = self.system.lock().unwrap_or_else(|e| e.into_inner());
        system.refresh_processes_specifics(ProcessRefreshKind::everything());

        thread_group_leaders(system.processes().iter().map(|(pid, process)| {
            let tasks: Vec<Pid> = process
                .tasks()
                .map(|tasks| tasks.iter().map(|task| Pid::from_raw(task.as_u32())).collect())
                .unwrap_or_default();
            (Pid::from_raw(pid.as_u32()), tasks)
        }))
    }

    fn inspect(&self, pid: Pid) -> Option<ProcessRecord> {
        let (name, uid, cmdline) = {
            let mut system = self.system.lock().unwrap_or_else(|e| e.into_inner());
            let sys_pid = sysinfo::Pid::from_u32(pid.as_u32());

            // Re-read so exits since the scan are noticed
            if !system.refresh_process_specifics(sys_pid, ProcessRefreshKind::everything()) {
                return None;
            }

            let process = system.process(sys_pid)?;
            (
                process.name().to_string(),
                process.user_id().cloned(),
                process.cmd().to_vec(),
            )
        };

        Some(ProcessRecord {
            pid,
            name,
            owner: uid.and_then(|uid| self.user_name(&uid)),
            cmdline,
        })
    }

    fn current_user(&self) -> Option<String> {
        let pid = sysinfo::get_current_pid().ok()?;
        self.inspect(Pid::from_raw(pid.as_u32()))?.owner
    }
}
