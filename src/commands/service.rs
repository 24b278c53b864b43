//! Service host commands

use serde_json::Value;

use crate::cli::ServiceCommands;
use crate::client::ResourceClient;
use crate::{XcatError, output};

type Result<T> = std::result::Result<T, XcatError>;

/// Execute a service subcommand
///
/// # Errors
/// Returns an error if the request fails.
pub fn execute(client: &ResourceClient, command: &ServiceCommands, quiet: bool) -> Result<()> {
    match command {
        ServiceCommands::List => {
            let listing = client.list()?;
            let lines: Vec<String> = listing
                .get(client.resource().path())
                .and_then(Value::as_array)
                .map(|services| services.iter().filter_map(output::format_service).collect())
                .unwrap_or_default();
            if lines.is_empty() && !quiet {
                println!("Could not find any record.");
            }
            for line in lines {
                println!("{line}");
            }
            Ok(())
        }
        ServiceCommands::Show { hostname } => {
            println!("{}", output::pretty_json(&client.show_by_hostname(hostname)?));
            Ok(())
        }
    }
}
