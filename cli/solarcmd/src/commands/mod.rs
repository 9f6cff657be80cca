//! Command handlers
//!
//! Handlers take the client through [`SwisClientTrait`] so they can run
//! against `MockSwisClient` in tests, plus the options parsed for this
//! invocation. Each returns the JSON value to print.

pub mod ip;
pub mod ncm;
pub mod query;
pub mod subnet;

use serde_json::Value;
use swis_client::{RequestContext, SwisClientTrait};

use crate::cli::{Command, IpCommand, NcmCommand, SubnetCommand};

/// Dispatch a parsed command
///
/// `Command::Version` needs no connection and is handled before a client exists.
pub async fn run(client: &dyn SwisClientTrait, ctx: &RequestContext, command: &Command) -> anyhow::Result<Value> {
    match command {
        Command::Version => Ok(Value::String(version())),
        Command::Ip(IpCommand::Get(options)) => ip::get(client, ctx, options).await,
        Command::Ip(IpCommand::Lookup(options)) => ip::lookup(client, ctx, options).await,
        Command::Ip(IpCommand::Reserve(options)) => ip::reserve(client, ctx, options).await,
        Command::Ip(IpCommand::Release(options)) => ip::release(client, ctx, options).await,
        Command::Ip(IpCommand::Comment(options)) => ip::comment(client, ctx, options).await,
        Command::Subnet(SubnetCommand::Find(options)) => subnet::find(client, ctx, options).await,
        Command::Subnet(SubnetCommand::List) => subnet::list(client, ctx).await,
        Command::Query(options) => query::run(client, ctx, options).await,
        Command::Ncm(NcmCommand::Remove(options)) => ncm::remove(client, ctx, options).await,
    }
}

/// Version string printed by `solarcmd version`
pub fn version() -> String {
    format!("solarcmd {}", env!("CARGO_PKG_VERSION"))
}
