//! Command implementations
//!
//! Each command group is a module with an `execute` function that takes the
//! parsed subcommand and runs it against the xCAT3 service.

pub mod config;
pub mod nic;
pub mod node;
pub mod resource;
pub mod service;

pub use config::execute as config;
pub use nic::execute as nic;
pub use node::execute as node;
pub use resource::execute as resource;
pub use service::execute as service;

use crate::client::{Resource, entry_names};
use crate::output;
use serde_json::Value;

/// Print one line per entry of a list response
fn print_listing(listing: &Value, resource: Resource, quiet: bool) {
    let names = entry_names(listing, resource);
    if names.is_empty() {
        if !quiet {
            println!("Could not find any record.");
        }
        return;
    }
    for name in names {
        println!("{}", output::format_entry(&name, resource.label(), quiet));
    }
}
