//! Daemon command lines and flag lookup
//!
//! A command line is the identity of a cluster process: handles are built from
//! it, ports are parsed out of it, and running processes are matched against
//! it. Flags are expected in `--name=value` form.

use crate::errors::{SharedError, SharedResult};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Non-empty argument vector; element 0 is the executable
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct CommandLine(Vec<String>);

impl CommandLine {
    pub fn new<I, S>(args: I) -> SharedResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let args: Vec<String> = args.into_iter().map(Into::into).collect();
        if args.is_empty() {
            return Err(SharedError::InvalidArgument {
                message: "Process object must be created with valid command line argument list".to_string(),
            });
        }
        Ok(Self(args))
    }

    pub fn executable(&self) -> &str {
        &self.0[0]
    }

    /// Everything after the executable
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Unordered comparison against another argument vector.
    ///
    /// Two processes started with the same arguments in a different order are
    /// considered the same process; two live processes with identical argument
    /// sets cannot be told apart.
    pub fn matches_set(&self, other: &[String]) -> bool {
        let ours: HashSet<&str> = self.0.iter().map(String::as_str).collect();
        let theirs: HashSet<&str> = other.iter().map(String::as_str).collect();
        ours == theirs
    }

    /// Value of the first argument containing `<name>=`, with leading dashes ignored
    pub fn arg_value(&self, name: &str) -> Option<&str> {
        let needle = format!("{name}=");
        self.0
            .iter()
            .find(|arg| arg.trim().trim_start_matches('-').contains(&needle))
            .and_then(|arg| arg.split('=').nth(1))
    }

    /// Parse a port flag, falling back to `default` when the flag is absent
    pub fn port(&self, name: &str, default: Option<u16>) -> SharedResult<u16> {
        match self.arg_value(name) {
            Some(raw) => raw.trim().parse::<u16>().map_err(|_| SharedError::InvalidFlagValue {
                flag: name.to_string(),
                value: raw.to_string(),
            }),
            None => default.ok_or_else(|| SharedError::MissingFlag { flag: name.to_string() }),
        }
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

impl TryFrom<Vec<String>> for CommandLine {
    type Error = SharedError;

    fn try_from(args: Vec<String>) -> SharedResult<Self> {
        CommandLine::new(args)
    }
}

impl From<CommandLine> for Vec<String> {
    fn from(cmd: CommandLine) -> Self {
        cmd.0
    }
}
