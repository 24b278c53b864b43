//! Network interface commands

use crate::attrs::parse_key_values;
use crate::cli::NicCommands;
use crate::client::ResourceClient;
use crate::{XcatError, output};

type Result<T> = std::result::Result<T, XcatError>;

/// Execute a nic subcommand
///
/// # Errors
/// Returns an error for malformed attributes or a failed request.
pub fn execute(client: &ResourceClient, command: &NicCommands, quiet: bool) -> Result<()> {
    match command {
        NicCommands::List => {
            super::print_listing(&client.list()?, client.resource(), quiet);
            Ok(())
        }
        NicCommands::Show { uuid, mac, fields } => {
            let body = match (uuid, mac) {
                (_, Some(mac)) => client.show_by_mac(mac, &fields.fields)?,
                (Some(uuid), None) => client.show(uuid, &fields.fields)?,
                (None, None) => {
                    return Err(XcatError::InvalidInput(
                        "Please specify the uuid or the MAC address of the nic".into(),
                    ));
                }
            };
            println!("{}", output::pretty_json(&body));
            Ok(())
        }
        NicCommands::Create { attributes } => {
            let body = parse_key_values(attributes)?;
            println!("{}", output::pretty_json(&client.create(&body)?));
            Ok(())
        }
        NicCommands::Delete { uuid } => super::resource::delete(client, uuid),
        NicCommands::Update { uuid, attributes } => {
            super::resource::update(client, uuid, attributes)
        }
    }
}
