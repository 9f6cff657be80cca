//! CLI argument definitions using clap
//!
//! Commands:
//! - solarcmd version
//! - solarcmd ip get|lookup|reserve|release|comment
//! - solarcmd subnet find|list
//! - solarcmd query <swql> [--param key=value]...
//! - solarcmd ncm remove <guid>...

use std::path::PathBuf;

use clap::{ArgGroup, Args, Parser, Subcommand};

/// solarcmd - talk to SolarWinds IPAM and SWIS from the shell
#[derive(Parser, Debug)]
#[command(name = "solarcmd")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection settings shared by every command
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalOptions {
    /// Config file (default is $HOME/.solar.yaml)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Orion server hostname
    #[arg(short = 's', long, global = true, env = "ORION_SERVER")]
    pub server: Option<String>,

    /// Orion username
    #[arg(short = 'u', long, global = true, env = "ORION_USERNAME")]
    pub username: Option<String>,

    /// Orion password
    #[arg(short = 'p', long, global = true, env = "ORION_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Skip TLS certificate verification
    #[arg(
        long,
        global = true,
        env = "ORION_INSECURE",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "true",
        value_name = "BOOL"
    )]
    pub insecure: Option<bool>,

    /// Log filter, e.g. `debug` or `swis_client=trace`
    #[arg(long, global = true, env = "ORION_DEBUG", value_name = "LEVEL")]
    pub debug: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the version number
    Version,

    /// Commands related to IPAM
    #[command(subcommand)]
    Ip(IpCommand),

    /// Commands related to IPAM subnets
    #[command(subcommand)]
    Subnet(SubnetCommand),

    /// Run a SWQL query and print the raw result rows
    Query(QueryOptions),

    /// Commands related to Network Configuration Manager
    #[command(subcommand)]
    Ncm(NcmCommand),
}

#[derive(Subcommand, Debug)]
pub enum IpCommand {
    /// Get the first available IP address of a subnet
    Get(IpGetOptions),
    /// Look up an IP node by address
    Lookup(AddressOptions),
    /// Mark an IP address as used
    Reserve(AddressOptions),
    /// Mark an IP address as available
    Release(AddressOptions),
    /// Set the comment of an IP node
    Comment(CommentOptions),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct IpGetOptions {
    /// Network address of the subnet, e.g. 10.200.20.0
    #[arg(long, visible_alias = "subnet_address")]
    pub subnet_address: String,

    /// Prefix length of the subnet
    #[arg(long, default_value = "24")]
    pub cidr: String,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct AddressOptions {
    /// IP address
    #[arg(short = 'a', long)]
    pub address: String,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct CommentOptions {
    /// IP address
    #[arg(short = 'a', long)]
    pub address: String,

    /// Comment text
    #[arg(short = 'c', long)]
    pub comment: String,
}

#[derive(Subcommand, Debug)]
pub enum SubnetCommand {
    /// Find a subnet by display name or VLAN
    Find(SubnetFindOptions),
    /// List every subnet
    List,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
#[command(group(ArgGroup::new("selector").required(true).args(["name", "vlan"])))]
pub struct SubnetFindOptions {
    /// Subnet display name
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// VLAN identifier
    #[arg(long)]
    pub vlan: Option<String>,
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct QueryOptions {
    /// SWQL query text
    pub swql: String,

    /// Query parameter as key=value; may be repeated
    #[arg(long = "param", value_name = "KEY=VALUE")]
    pub params: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum NcmCommand {
    /// Stop managing nodes in NCM
    Remove(NcmRemoveOptions),
}

#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct NcmRemoveOptions {
    /// NCM node GUIDs
    #[arg(required = true)]
    pub guids: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_ip_get() {
        let cli = Cli::try_parse_from([
            "solarcmd",
            "ip",
            "get",
            "--subnet-address",
            "10.200.20.0",
            "--cidr",
            "20",
            "-s",
            "orion.local",
        ])
        .unwrap();

        assert_eq!(cli.global.server.as_deref(), Some("orion.local"));
        match cli.command {
            Command::Ip(IpCommand::Get(options)) => {
                assert_eq!(options.subnet_address, "10.200.20.0");
                assert_eq!(options.cidr, "20");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cidr_defaults_to_24() {
        let cli = Cli::try_parse_from(["solarcmd", "ip", "get", "--subnet_address", "10.0.0.0"]).unwrap();
        match cli.command {
            Command::Ip(IpCommand::Get(options)) => assert_eq!(options.cidr, "24"),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_insecure_flag_forms() {
        let bare = Cli::try_parse_from(["solarcmd", "--insecure", "subnet", "list"]).unwrap();
        assert_eq!(bare.global.insecure, Some(true));

        let explicit = Cli::try_parse_from(["solarcmd", "--insecure=false", "subnet", "list"]).unwrap();
        assert_eq!(explicit.global.insecure, Some(false));

        let trailing = Cli::try_parse_from(["solarcmd", "subnet", "list", "--insecure"]).unwrap();
        assert_eq!(trailing.global.insecure, Some(true));

        let absent = Cli::try_parse_from(["solarcmd", "subnet", "list"]).unwrap();
        assert_eq!(absent.global.insecure, None);
    }

    #[test]
    fn test_insecure_does_not_take_next_word() {
        let parsed = Cli::try_parse_from(["solarcmd", "--insecure", "ip", "lookup", "10.0.0.1"]).unwrap();
        assert_eq!(parsed.global.insecure, Some(true));
        assert!(matches!(parsed.command, Command::Ip(IpCommand::Lookup(_))));

        // a value must be attached with '='
        assert!(Cli::try_parse_from(["solarcmd", "--insecure", "false", "subnet", "list"]).is_err());
    }

    #[test]
    fn test_subnet_find_requires_selector() {
        assert!(Cli::try_parse_from(["solarcmd", "subnet", "find"]).is_err());
        assert!(Cli::try_parse_from(["solarcmd", "subnet", "find", "--name", "a", "--vlan", "1"]).is_err());
        assert!(Cli::try_parse_from(["solarcmd", "subnet", "find", "--vlan", "120"]).is_ok());
    }

    #[test]
    fn test_query_params_repeat() {
        let cli = Cli::try_parse_from([
            "solarcmd",
            "query",
            "SELECT Caption FROM Orion.Nodes WHERE Vendor = @v AND Status = @s",
            "--param",
            "v=Cisco",
            "--param",
            "s=1",
        ])
        .unwrap();

        match cli.command {
            Command::Query(options) => assert_eq!(options.params, vec!["v=Cisco", "s=1"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_ncm_remove_requires_guid() {
        assert!(Cli::try_parse_from(["solarcmd", "ncm", "remove"]).is_err());
    }
}
