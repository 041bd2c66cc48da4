//! Test fixtures: process records for a typical three-node minicluster

use minicluster::{Pid, ProcessRecord};

pub struct TestFixtures;

impl TestFixtures {
    pub const USER: &'static str = "dev";
    pub const HOSTNAME: &'static str = "test-host";
    pub const IMPALA_HOME: &'static str = "/home/dev/impala";

    pub fn record(pid: u32, cmdline: &[&str]) -> ProcessRecord {
        let name = cmdline[0].rsplit('/').next().unwrap_or(cmdline[0]).to_string();
        ProcessRecord {
            pid: Pid::from_raw(pid),
            name,
            owner: Some(Self::USER.to_string()),
            cmdline: cmdline.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The canonical coordinator command line
    pub fn impalad_cmdline() -> Vec<&'static str> {
        vec![
            "impalad",
            "--webserver_port=25000",
            "--beeswax_port=21000",
            "--be_port=22000",
            "--hs2_port=21050",
        ]
    }

    /// Coordinator `n` of a minicluster, ports offset by `n`
    pub fn impalad(pid: u32, n: u16) -> ProcessRecord {
        let cmdline = [
            "/home/dev/impala/be/build/latest/service/impalad".to_string(),
            format!("--webserver_port={}", 25000 + n),
            format!("--beeswax_port={}", 21000 + n),
            format!("--be_port={}", 22000 + n),
            format!("--hs2_port={}", 21050 + n),
            "--log_dir=/tmp/impala-logs".to_string(),
        ];
        let args: Vec<&str> = cmdline.iter().map(String::as_str).collect();
        Self::record(pid, &args)
    }

    pub fn statestored(pid: u32) -> ProcessRecord {
        Self::record(pid, &["statestored", "--webserver_port=25010"])
    }

    pub fn catalogd(pid: u32) -> ProcessRecord {
        Self::record(
            pid,
            &["catalogd", "--webserver_port=25020", "--catalog_service_port=26000"],
        )
    }

    /// Three impalads listed in wrapped-PID order, plus statestored and catalogd
    pub fn minicluster() -> Vec<ProcessRecord> {
        vec![
            Self::impalad(32001, 2),
            Self::impalad(150, 0),
            Self::impalad(151, 1),
            Self::statestored(140),
            Self::catalogd(145),
        ]
    }
}
