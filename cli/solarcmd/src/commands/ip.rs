//! `solarcmd ip ...`

use anyhow::Context;
use serde_json::{Value, json};
use swis_client::{RequestContext, SwisClientTrait};
use tracing::info;

use crate::cli::{AddressOptions, CommentOptions, IpGetOptions};

/// First available address of a subnet
pub async fn get(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &IpGetOptions) -> anyhow::Result<Value> {
    let ip = client
        .get_first_available_ip(ctx, &options.subnet_address, &options.cidr)
        .await
        .with_context(|| format!("failed to get an address from {}/{}", options.subnet_address, options.cidr))?;
    Ok(serde_json::to_value(ip)?)
}

/// IP node for an address, `null` if IPAM does not know it
pub async fn lookup(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &AddressOptions) -> anyhow::Result<Value> {
    let ip = client
        .get_ip(ctx, &options.address)
        .await
        .with_context(|| format!("failed to look up {}", options.address))?;
    Ok(serde_json::to_value(ip)?)
}

pub async fn reserve(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &AddressOptions) -> anyhow::Result<Value> {
    let result = client
        .reserve_ip(ctx, &options.address)
        .await
        .with_context(|| format!("failed to reserve {}", options.address))?;
    info!(address = %options.address, "reserved IP");
    Ok(json!(result))
}

pub async fn release(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &AddressOptions) -> anyhow::Result<Value> {
    let result = client
        .release_ip(ctx, &options.address)
        .await
        .with_context(|| format!("failed to release {}", options.address))?;
    info!(address = %options.address, "released IP");
    Ok(json!(result))
}

pub async fn comment(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &CommentOptions) -> anyhow::Result<Value> {
    let ip = client
        .comment_on_ip_node(ctx, &options.address, &options.comment)
        .await
        .with_context(|| format!("failed to comment on {}", options.address))?;
    Ok(serde_json::to_value(ip)?)
}
