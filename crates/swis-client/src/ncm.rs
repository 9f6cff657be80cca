//! Network Configuration Manager helpers

use crate::client::SwisClient;
use crate::context::RequestContext;
use crate::error::{ErrorKind, SwisError};

const REMOVE_NODES_ENDPOINT: &str = "Invoke/Cirrus.Nodes/RemoveNodes";

/// Body and endpoint for removing nodes from NCM.
///
/// The verb takes a single argument: the list of NCM node GUIDs.
pub fn remove_ncm_nodes_request(guids: &[String]) -> (Vec<Vec<String>>, &'static str) {
    (vec![guids.to_vec()], REMOVE_NODES_ENDPOINT)
}

impl SwisClient {
    /// Stop managing nodes in NCM
    ///
    /// # Errors
    /// An internal error wrapping the request failure.
    pub async fn remove_ncm_nodes_ctx(&self, ctx: &RequestContext, guids: &[String]) -> Result<(), SwisError> {
        let (body, endpoint) = remove_ncm_nodes_request(guids);
        self.post_ctx(ctx, endpoint, &body).await.map_err(|e| {
            SwisError::wrap(e, ErrorKind::Internal, "remove_ncm_nodes", "failed to remove the NCM nodes")
        })?;
        Ok(())
    }

    /// [`SwisClient::remove_ncm_nodes_ctx`] without cancellation
    ///
    /// # Errors
    /// An internal error wrapping the request failure.
    pub async fn remove_ncm_nodes(&self, guids: &[String]) -> Result<(), SwisError> {
        self.remove_ncm_nodes_ctx(&RequestContext::background(), guids).await
    }
}
