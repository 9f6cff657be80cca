//! `solarcmd ncm ...`

use anyhow::Context;
use serde_json::{Value, json};
use swis_client::{RequestContext, SwisClientTrait};
use tracing::info;

use crate::cli::NcmRemoveOptions;

pub async fn remove(client: &dyn SwisClientTrait, ctx: &RequestContext, options: &NcmRemoveOptions) -> anyhow::Result<Value> {
    client
        .remove_ncm_nodes(ctx, &options.guids)
        .await
        .context("failed to remove NCM nodes")?;
    info!(count = options.guids.len(), "removed NCM nodes");
    Ok(json!({ "removed": options.guids }))
}
