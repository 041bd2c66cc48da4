//! Shared types for the minicluster workspace
//!
//! Holds the pieces every component agrees on: the command-line model and its
//! flag lookup, daemon kinds, process ids, errors and logging setup.

pub mod command_line;
pub mod errors;
pub mod logging;
pub mod types;

pub use command_line::CommandLine;
pub use errors::*;
pub use types::*;
