//! Universal Device Poller (UnDP) assignments

use serde::Serialize;

use crate::client::SwisClient;
use crate::context::RequestContext;
use crate::error::SwisError;
use crate::models::Assignment;

pub(crate) const ASSIGNMENTS_QUERY: &str = "SELECT CustomPollerAssignmentID, CustomPollerID, NodeID, InterfaceID, InstanceType \
     FROM Orion.NPM.CustomPollerAssignment";

#[derive(Serialize)]
struct NodePoller<'a> {
    #[serde(rename = "NodeID")]
    node_id: u64,
    #[serde(rename = "CustomPollerID")]
    custom_poller_id: &'a str,
}

#[derive(Serialize)]
struct InterfacePoller<'a> {
    #[serde(rename = "InterfaceID")]
    interface_id: u64,
    #[serde(rename = "CustomPollerID")]
    custom_poller_id: &'a str,
}

impl SwisClient {
    /// All custom poller assignments currently in effect
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_assignments_ctx(&self, ctx: &RequestContext) -> Result<Vec<Assignment>, SwisError> {
        Ok(self.query_as_ctx::<Assignment>(ctx, ASSIGNMENTS_QUERY, None).await?.results)
    }

    /// [`SwisClient::get_assignments_ctx`] without cancellation
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_assignments(&self) -> Result<Vec<Assignment>, SwisError> {
        self.get_assignments_ctx(&RequestContext::background()).await
    }

    /// Assign a poller to a node
    ///
    /// # Errors
    /// Any request error.
    pub async fn add_node_poller_ctx(
        &self,
        ctx: &RequestContext,
        custom_poller_id: &str,
        node_id: u64,
    ) -> Result<(), SwisError> {
        let body = NodePoller {
            node_id,
            custom_poller_id,
        };
        self.create_ctx(ctx, "Orion.NPM.CustomPollerAssignmentOnNode", &body).await?;
        Ok(())
    }

    /// [`SwisClient::add_node_poller_ctx`] without cancellation
    ///
    /// # Errors
    /// Any request error.
    pub async fn add_node_poller(&self, custom_poller_id: &str, node_id: u64) -> Result<(), SwisError> {
        self.add_node_poller_ctx(&RequestContext::background(), custom_poller_id, node_id)
            .await
    }

    /// Assign a poller to an interface
    ///
    /// # Errors
    /// Any request error.
    pub async fn add_interface_poller_ctx(
        &self,
        ctx: &RequestContext,
        custom_poller_id: &str,
        interface_id: u64,
    ) -> Result<(), SwisError> {
        let body = InterfacePoller {
            interface_id,
            custom_poller_id,
        };
        self.create_ctx(ctx, "Orion.NPM.CustomPollerAssignmentOnInterface", &body)
            .await?;
        Ok(())
    }

    /// [`SwisClient::add_interface_poller_ctx`] without cancellation
    ///
    /// # Errors
    /// Any request error.
    pub async fn add_interface_poller(&self, custom_poller_id: &str, interface_id: u64) -> Result<(), SwisError> {
        self.add_interface_poller_ctx(&RequestContext::background(), custom_poller_id, interface_id)
            .await
    }
}
