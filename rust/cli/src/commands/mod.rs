//! Command handler modules for the noughts CLI.
//!
//! Each subcommand lives in its own file and exposes
//! `handle_COMMAND_command(...) -> Result<(), CliError>`. Output streams and
//! stdin are passed in so tests can drive handlers with in-memory buffers.

mod cfg;
mod play;
mod suggest;

pub use cfg::handle_cfg_command;
pub use play::{PlayOptions, handle_play_command};
pub use suggest::handle_suggest_command;
