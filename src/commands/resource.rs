//! Generic commands for networks, images and passwords

use serde_json::Value;

use crate::attrs::{parse_key_values, parse_patches};
use crate::cli::ResourceCommands;
use crate::client::ResourceClient;
use crate::{XcatError, output};

type Result<T> = std::result::Result<T, XcatError>;

/// Execute a subcommand against one resource collection
///
/// # Errors
/// Returns an error for malformed attributes or a failed request.
pub fn execute(client: &ResourceClient, command: &ResourceCommands, quiet: bool) -> Result<()> {
    let resource = client.resource();
    match command {
        ResourceCommands::List => {
            super::print_listing(&client.list()?, resource, quiet);
            Ok(())
        }
        ResourceCommands::Show { name, fields } => {
            println!("{}", output::pretty_json(&client.show(name, &fields.fields)?));
            Ok(())
        }
        ResourceCommands::Create { name, attributes } => {
            let mut body = parse_key_values(attributes)?;
            body.insert(resource.key_field().to_string(), Value::String(name.clone()));
            println!("{}", output::pretty_json(&client.create(&body)?));
            Ok(())
        }
        ResourceCommands::Delete { name } => delete(client, name),
        ResourceCommands::Update { name, attributes } => update(client, name, attributes),
    }
}

pub(super) fn delete(client: &ResourceClient, name: &str) -> Result<()> {
    client.delete(name)?;
    println!("{name}: deleted");
    Ok(())
}

pub(super) fn update(client: &ResourceClient, name: &str, attributes: &[String]) -> Result<()> {
    let patches = parse_patches(attributes)?;
    client.update(name, &patches)?;
    println!("{name}: updated");
    Ok(())
}
