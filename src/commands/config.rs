//! Config command - inspect the effective client configuration

use crate::XcatError;
use crate::cli::ConfigCommands;
use crate::config::ClientConfig;

type Result<T> = std::result::Result<T, XcatError>;

/// Execute the config command
///
/// # Errors
/// Returns an error if the configuration cannot be serialized.
pub fn execute(config: &ClientConfig, command: &ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            print!("{}", config.to_toml()?);
            Ok(())
        }
    }
}
