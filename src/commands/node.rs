//! Node commands

use std::fs;
use std::path::Path;

use serde_json::{Value, json};
use tracing::info;

use crate::api::{BulkCreateRequest, BulkResponse};
use crate::attrs::{CreateOptions, alias_node_paths, parse_patches};
use crate::bulk::{BulkDispatcher, BulkReport, BulkSettings};
use crate::cli::NodeCommands;
use crate::client::{DeployOptions, NodeClient, Resource};
use crate::range::expand;
use crate::{XcatError, output};

type Result<T> = std::result::Result<T, XcatError>;

/// Fields written by `node export`
pub const EXPORT_FIELDS: &[&str] = &[
    "name",
    "mgt",
    "netboot",
    "type",
    "arch",
    "nics_info",
    "control_info",
];

/// Execute a node subcommand
///
/// # Errors
/// Returns an error for malformed ranges or attributes, and for any failed
/// request to the service.
pub fn execute(
    client: &NodeClient,
    settings: BulkSettings,
    command: &NodeCommands,
    quiet: bool,
) -> Result<()> {
    match command {
        NodeCommands::Create {
            range,
            nics,
            control,
            attributes,
        } => {
            let options = CreateOptions {
                nics: nics.clone(),
                control: control.clone(),
                attributes: attributes.clone(),
            };
            create(client, settings, range, &options)
        }
        NodeCommands::Import { file } => import(client, settings, file),
        NodeCommands::Update { range, attributes } => {
            update(client, settings, range, attributes)
        }
        NodeCommands::Delete { range } => {
            let names = expand(range)?.into_vec();
            print_response(client.delete(&names)?)
        }
        NodeCommands::List { range } => list(client, range.as_deref(), quiet),
        NodeCommands::Show { range, fields } => {
            let names = expand(range)?.into_vec();
            let body = client.show(&names, &fields.fields)?;
            println!("{}", output::pretty_json(&body));
            Ok(())
        }
        NodeCommands::Export { range, output } => export(client, range, output, quiet),
        NodeCommands::Power { range, action } => {
            let names = expand(range)?.into_vec();
            print_response(client.power(&names, *action)?)
        }
        NodeCommands::Bootdev { range, device } => {
            let names = expand(range)?.into_vec();
            print_response(client.boot_device(&names, *device)?)
        }
        NodeCommands::Deploy {
            range,
            osimage,
            state,
            delete,
        } => {
            let names = expand(range)?.into_vec();
            let options = DeployOptions {
                osimage: osimage.clone(),
                state: Some(state.clone()),
                delete: *delete,
            };
            print_response(client.deploy(&names, &options)?)
        }
    }
}

fn print_response(response: BulkResponse) -> Result<()> {
    output::print_report(&BulkReport::new(response.nodes))?;
    Ok(())
}

fn create(
    client: &NodeClient,
    settings: BulkSettings,
    range: &str,
    options: &CreateOptions,
) -> Result<()> {
    let names = expand(range)?;
    let template = options.template()?;
    let dispatcher = BulkDispatcher::new(client, settings);
    let report = dispatcher.bulk_create(names.as_slice(), &template)?;
    output::print_report(&report)?;
    Ok(())
}

fn import(client: &NodeClient, settings: BulkSettings, file: &Path) -> Result<()> {
    let data = fs::read(file)?;
    let request: BulkCreateRequest = serde_json::from_slice(&data)?;
    info!(file = %file.display(), nodes = request.nodes.len(), "importing nodes");
    let dispatcher = BulkDispatcher::new(client, settings);
    let report = dispatcher.bulk_create_nodes(request.nodes)?;
    output::print_report(&report)?;
    Ok(())
}

fn update(
    client: &NodeClient,
    settings: BulkSettings,
    range: &str,
    attributes: &[String],
) -> Result<()> {
    let names = expand(range)?;
    let patches = alias_node_paths(parse_patches(attributes)?);
    let dispatcher = BulkDispatcher::new(client, settings);
    let report = dispatcher.bulk_patch(names.as_slice(), &patches)?;
    output::print_report(&report)?;
    Ok(())
}

fn list(client: &NodeClient, range: Option<&str>, quiet: bool) -> Result<()> {
    let listing = client.list()?;
    let Some(range) = range else {
        super::print_listing(&listing, Resource::Nodes, quiet);
        return Ok(());
    };
    let wanted = expand(range)?;
    let filtered: Vec<Value> = crate::client::entry_names(&listing, Resource::Nodes)
        .into_iter()
        .filter(|name| wanted.contains(name))
        .map(Value::String)
        .collect();
    super::print_listing(&json!({ "nodes": filtered }), Resource::Nodes, quiet);
    Ok(())
}

fn export(client: &NodeClient, range: &str, path: &Path, quiet: bool) -> Result<()> {
    let names = expand(range)?.into_vec();
    let fields: Vec<String> = EXPORT_FIELDS.iter().map(ToString::to_string).collect();
    let body = client.show(&names, &fields)?;
    let document = export_document(serde_json::from_slice(&body)?);
    fs::write(path, serde_json::to_string_pretty(&document)?)?;
    if !quiet {
        println!("Exported {} node(s) to {}", names.len(), path.display());
    }
    Ok(())
}

/// Shape node details as an importable `{"nodes": [...]}` document.
///
/// A single node is returned as a bare object and gets wrapped; the
/// multi-node form may key nodes by name and is flattened into a list.
#[must_use]
pub fn export_document(details: Value) -> Value {
    match details {
        Value::Object(mut map) => match map.remove("nodes") {
            Some(Value::Array(nodes)) => json!({ "nodes": nodes }),
            Some(Value::Object(by_name)) => {
                let nodes: Vec<Value> = by_name.into_iter().map(|(_, node)| node).collect();
                json!({ "nodes": nodes })
            }
            Some(other) => {
                map.insert("nodes".into(), other);
                json!({ "nodes": [Value::Object(map)] })
            }
            None => json!({ "nodes": [Value::Object(map)] }),
        },
        Value::Array(nodes) => json!({ "nodes": nodes }),
        other => json!({ "nodes": [other] }),
    }
}
