//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::client::{BootDevice, PowerAction};

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "xcat3")]
#[command(about = "Command line client for the xCAT3 cluster management service", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Service endpoint, e.g. http://mgmt01:3010 (overrides config)
    #[arg(long = "url", global = true, value_name = "URL")]
    pub url: Option<String>,

    /// Configuration file to use instead of the default location
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Raise the log level (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Manage nodes
    Node {
        #[command(subcommand)]
        command: NodeCommands,
    },

    /// Manage networks
    Network {
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Manage network interfaces
    Nic {
        #[command(subcommand)]
        command: NicCommands,
    },

    /// Manage operating system images
    Osimage {
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Manage stored passwords
    Passwd {
        #[command(subcommand)]
        command: ResourceCommands,
    },

    /// Inspect xCAT3 service hosts
    Service {
        #[command(subcommand)]
        command: ServiceCommands,
    },

    /// Inspect client configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Shared `--fields` selection for show commands
#[derive(Args, Debug, Clone, Default)]
pub struct FieldArgs {
    /// Fields separated by comma; only these are fetched from the service
    #[arg(short = 'i', long = "fields", value_name = "FIELDS", value_delimiter = ',')]
    pub fields: Vec<String>,
}

/// Node subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum NodeCommands {
    /// Register node(s), e.g. `create node[0-9] -i mac=..,name=eth0 -c bmc_address=.. mgt=ipmi`
    Create {
        /// Node range expression
        range: String,

        /// Network interface as key=val,key=val (repeatable)
        #[arg(short = 'i', long = "nic", value_name = "KEY=VAL,..")]
        nics: Vec<String>,

        /// Control plugin settings as key=val,key=val
        #[arg(short = 'c', long = "control", value_name = "KEY=VAL,..")]
        control: Option<String>,

        /// Node attributes
        #[arg(value_name = "KEY=VAL")]
        attributes: Vec<String>,
    },

    /// Register nodes from a JSON file shaped as {"nodes": [...]}
    Import {
        /// JSON file to import
        file: PathBuf,
    },

    /// Update attributes of registered node(s); an empty value removes the field
    Update {
        /// Node range expression
        range: String,

        /// Attributes to set, as path=value
        #[arg(value_name = "KEY=VAL", required = true)]
        attributes: Vec<String>,
    },

    /// Unregister node(s)
    #[command(visible_alias = "rm")]
    Delete {
        /// Node range expression
        range: String,
    },

    /// List registered nodes, optionally restricted to a range
    #[command(visible_alias = "ls")]
    List {
        /// Node range expression
        range: Option<String>,
    },

    /// Show detailed information about node(s)
    Show {
        /// Node range expression
        range: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Export node(s) to a JSON file that `import` accepts
    Export {
        /// Node range expression
        range: String,

        /// Output file
        #[arg(short = 'o', long = "output", value_name = "FILE")]
        output: PathBuf,
    },

    /// Query or change node power state
    Power {
        /// Node range expression
        range: String,

        /// on, off, boot or status
        action: PowerAction,
    },

    /// Query or set the next boot device
    Bootdev {
        /// Node range expression
        range: String,

        /// net, disk, cdrom or status
        device: BootDevice,
    },

    /// Provision node(s) with an operating system image
    Deploy {
        /// Node range expression
        range: String,

        /// Image to deploy
        #[arg(long = "osimage")]
        osimage: Option<String>,

        /// Target state (nodeset or dhcp)
        #[arg(long = "state", default_value = "nodeset")]
        state: String,

        /// Undo a previous deploy
        #[arg(short = 'd', long = "delete")]
        delete: bool,
    },
}

/// Subcommands shared by networks, images and passwords
#[derive(Subcommand, Debug, Clone)]
pub enum ResourceCommands {
    /// List registered entries
    #[command(visible_alias = "ls")]
    List,

    /// Show detailed information about one entry
    Show {
        name: String,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Register an entry, e.g. `create mgmt subnet=10.0.0.0 netmask=255.0.0.0`
    Create {
        name: String,

        #[arg(value_name = "KEY=VAL", required = true)]
        attributes: Vec<String>,
    },

    /// Unregister an entry
    #[command(visible_alias = "rm")]
    Delete { name: String },

    /// Update an entry; an empty value removes the field
    Update {
        name: String,

        #[arg(value_name = "KEY=VAL", required = true)]
        attributes: Vec<String>,
    },
}

/// Network interface subcommands. Interfaces are addressed by uuid.
#[derive(Subcommand, Debug, Clone)]
pub enum NicCommands {
    /// List registered interfaces
    #[command(visible_alias = "ls")]
    List,

    /// Show one interface by uuid, or by MAC address with --mac
    Show {
        #[arg(required_unless_present = "mac", conflicts_with = "mac")]
        uuid: Option<String>,

        /// Look the interface up by MAC address
        #[arg(long = "mac")]
        mac: Option<String>,

        #[command(flatten)]
        fields: FieldArgs,
    },

    /// Register an interface, e.g. `create mac=42:87:0a:05:00:00 name=eth0 node=node1`
    Create {
        #[arg(value_name = "KEY=VAL", required = true)]
        attributes: Vec<String>,
    },

    /// Unregister an interface
    #[command(visible_alias = "rm")]
    Delete { uuid: String },

    /// Update an interface
    Update {
        uuid: String,

        #[arg(value_name = "KEY=VAL", required = true)]
        attributes: Vec<String>,
    },
}

/// Service host subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ServiceCommands {
    /// List service hosts with their state
    #[command(visible_alias = "ls")]
    List,

    /// Show one service host
    Show { hostname: String },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,
}
