//! xcat3 CLI application entry point
//!
//! Command-line client for the xCAT3 cluster management service.
//!
//! # Usage
//!
//! ```bash
//! # Register 5000 nodes sharing one set of attributes
//! xcat3 node create 'node[0-4999]' -i mac=42:87:0a:05:00:00,name=eth0 mgt=ipmi arch=x86_64
//!
//! # Update and inspect them
//! xcat3 node update 'node[0-9],mn01' netboot=pxe
//! xcat3 node show node1 -i arch,mgt
//!
//! # Power and provisioning
//! xcat3 node power 'node[0-9]' status
//! xcat3 node deploy 'node[0-9]' --osimage rhels7.4-x86_64
//!
//! # Other resources
//! xcat3 network list
//! xcat3 nic show --mac 42:87:0a:05:00:00
//! ```
//!
//! # Configuration
//!
//! The service endpoint comes from `~/.config/xcat3/config.toml`, the
//! `XCAT3_URL` environment variable, or `--url`. Logs go to stderr; raise the
//! level with `-v` or set `RUST_LOG`.

use std::process::ExitCode;

use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;
use xcat3::{
    XcatError,
    cli::{Cli, Commands},
    client::{NodeClient, Resource, ResourceClient},
    commands,
    config::ClientConfig,
    transport::HttpSession,
};

type Result<T> = std::result::Result<T, XcatError>;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(cli: &Cli) -> Result<ClientConfig> {
    let config = match &cli.config {
        Some(path) => ClientConfig::load_from(path)?,
        None => ClientConfig::load()?,
    };
    Ok(config.with_url(cli.url.clone()))
}

fn run(cli: Cli) -> Result<()> {
    let config = load_config(&cli)?;
    let quiet = cli.quiet || config.quiet;

    if let Commands::Config { command } = &cli.command {
        return commands::config(&config, command);
    }

    let endpoint = config.endpoint()?;
    let settings = config.bulk_settings()?;
    let session = HttpSession::new(config.timeout())?;
    debug!(%endpoint, ?settings, "client configured");

    let resource_client = |resource| ResourceClient::new(session.clone(), &endpoint, resource);

    match &cli.command {
        Commands::Node { command } => {
            let client = NodeClient::new(session.clone(), &endpoint);
            commands::node(&client, settings, command, quiet)
        }
        Commands::Network { command } => {
            commands::resource(&resource_client(Resource::Networks), command, quiet)
        }
        Commands::Osimage { command } => {
            commands::resource(&resource_client(Resource::OsImages), command, quiet)
        }
        Commands::Passwd { command } => {
            commands::resource(&resource_client(Resource::Passwds), command, quiet)
        }
        Commands::Nic { command } => commands::nic(&resource_client(Resource::Nics), command, quiet),
        Commands::Service { command } => {
            commands::service(&resource_client(Resource::Services), command, quiet)
        }
        Commands::Config { .. } => Ok(()),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
