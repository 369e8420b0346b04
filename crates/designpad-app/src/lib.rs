//! DesignPad command-line front end.
//!
//! Inspects, renders and replays designs against a local file store or a
//! remote design store.

mod backend;
mod cli;
mod commands;
mod error;
mod replay;

pub use backend::AnyBackend;
pub use cli::{Cli, Command};
pub use commands::run;
pub use error::CliError;
pub use replay::{ReplayScript, ReplayStep};
