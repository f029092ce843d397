//! Command-line interface module.

mod commands;
mod read;

pub use commands::{Cli, Commands, ReadArgs};
pub use read::read_comic;
