//! Configuration command handler.
//!
//! Prints the resolved configuration with the source of every value:
//!
//! ```json
//! {
//!   "starting_mark": { "value": "x", "source": "default" },
//!   "advisor": { "value": "alphabeta", "source": "env" },
//!   "seed": { "value": null, "source": "default" }
//! }
//! ```

use crate::config;
use crate::error::CliError;
use crate::ui;
use std::io::Write;

/// Handle the cfg command.
///
/// # Errors
///
/// Returns `CliError::Config` if configuration loading fails.
/// Returns `CliError::Io` if writing to output stream fails.
pub fn handle_cfg_command(out: &mut dyn Write, err: &mut dyn Write) -> Result<(), CliError> {
    let resolved = match config::load_with_sources() {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(CliError::Config(format!("Invalid configuration: {}", e)));
        }
    };

    let config::ConfigResolved { config, sources } = resolved;
    let display = serde_json::json!({
        "starting_mark": {
            "value": config.starting_mark,
            "source": sources.starting_mark,
        },
        "advisor": {
            "value": config.advisor,
            "source": sources.advisor,
        },
        "seed": {
            "value": config.seed,
            "source": sources.seed,
        }
    });
    let json_str = serde_json::to_string_pretty(&display).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}
