//! IPAM helpers
//!
//! IP node lookup and status changes through `IPAM.SubnetManagement`.

use serde_json::{Map, Value, json};
use tracing::{debug, info};

use crate::client::SwisClient;
use crate::context::RequestContext;
use crate::error::{ErrorKind, SwisError};
use crate::models::{IpAddress, IpStatus};

/// Entity exposing the IPAM management verbs
pub const SUBNET_MANAGEMENT: &str = "IPAM.SubnetManagement";

pub(crate) const GET_IP_QUERY: &str =
    "SELECT TOP 1 IpNodeId, IPAddress, Status, Comments FROM IPAM.IPNode WHERE IPAddress = @ipAddress";

/// URI of an IP node, as used for updates
pub fn ip_node_uri(ip_node_id: u64) -> String {
    format!("swis://localhost/Orion/IPAM.IPNode/IpNodeId={ip_node_id}")
}

/// Decode a `GetFirstAvailableIp` response.
///
/// IPAM answers with either an IP node object or a bare JSON string.
pub(crate) fn parse_available_ip(body: &[u8]) -> Result<IpAddress, SwisError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::String(address)) => Ok(IpAddress {
            address,
            ..IpAddress::default()
        }),
        Ok(value @ Value::Object(_)) => serde_json::from_value(value).map_err(|e| {
            SwisError::wrap(e, ErrorKind::Internal, "get_first_available_ip", "failed to unmarshal result")
        }),
        Ok(Value::Null) => Err(SwisError::new(
            ErrorKind::NotFound,
            "get_first_available_ip",
            "no available IP in subnet",
        )),
        Ok(other) => Err(SwisError::new(
            ErrorKind::Internal,
            "get_first_available_ip",
            format!("unexpected response: {other}"),
        )),
        Err(e) => Err(SwisError::wrap(
            e,
            ErrorKind::Internal,
            "get_first_available_ip",
            "failed to unmarshal result",
        )),
    }
}

impl SwisClient {
    /// First free address of a subnet
    ///
    /// # Arguments
    /// * `subnet_address` - Network address, e.g. `10.200.20.0`
    /// * `cidr` - Prefix length, e.g. `24`
    ///
    /// # Errors
    /// A not-found error when the subnet is full, or any request error.
    pub async fn get_first_available_ip_ctx(
        &self,
        ctx: &RequestContext,
        subnet_address: &str,
        cidr: &str,
    ) -> Result<IpAddress, SwisError> {
        debug!(subnet_address, cidr, "looking up first available IP");
        let body = self
            .invoke_ctx(ctx, SUBNET_MANAGEMENT, "GetFirstAvailableIp", &[subnet_address, cidr])
            .await?;
        parse_available_ip(&body)
    }

    /// [`SwisClient::get_first_available_ip_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::get_first_available_ip_ctx`].
    pub async fn get_first_available_ip(&self, subnet_address: &str, cidr: &str) -> Result<IpAddress, SwisError> {
        self.get_first_available_ip_ctx(&RequestContext::background(), subnet_address, cidr)
            .await
    }

    /// Look up an IP node by address
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_ip_ctx(&self, ctx: &RequestContext, address: &str) -> Result<Option<IpAddress>, SwisError> {
        let parameters = json!({ "ipAddress": address });
        let mut result = self
            .query_as_ctx::<IpAddress>(ctx, GET_IP_QUERY, Some(&parameters))
            .await?;
        Ok(result.results.pop())
    }

    /// [`SwisClient::get_ip_ctx`] without cancellation
    ///
    /// # Errors
    /// Any query error.
    pub async fn get_ip(&self, address: &str) -> Result<Option<IpAddress>, SwisError> {
        self.get_ip_ctx(&RequestContext::background(), address).await
    }

    /// Set the IPAM status of an address
    ///
    /// # Errors
    /// Any request error.
    pub async fn change_ip_status_ctx(
        &self,
        ctx: &RequestContext,
        address: &str,
        status: IpStatus,
    ) -> Result<String, SwisError> {
        let result = self
            .invoke_ctx(ctx, SUBNET_MANAGEMENT, "ChangeIPStatus", &[address, status.as_str()])
            .await?;
        let result = String::from_utf8_lossy(&result).into_owned();
        info!(address, status = status.as_str(), "changed IP status");
        Ok(result)
    }

    /// [`SwisClient::change_ip_status_ctx`] without cancellation
    ///
    /// # Errors
    /// Any request error.
    pub async fn change_ip_status(&self, address: &str, status: IpStatus) -> Result<String, SwisError> {
        self.change_ip_status_ctx(&RequestContext::background(), address, status)
            .await
    }

    /// Mark an address as used
    ///
    /// # Errors
    /// Any request error.
    pub async fn reserve_ip_ctx(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError> {
        self.change_ip_status_ctx(ctx, address, IpStatus::Used).await
    }

    /// [`SwisClient::reserve_ip_ctx`] without cancellation
    ///
    /// # Errors
    /// Any request error.
    pub async fn reserve_ip(&self, address: &str) -> Result<String, SwisError> {
        self.reserve_ip_ctx(&RequestContext::background(), address).await
    }

    /// Mark an address as available again
    ///
    /// # Errors
    /// Any request error.
    pub async fn release_ip_ctx(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError> {
        self.change_ip_status_ctx(ctx, address, IpStatus::Available).await
    }

    /// [`SwisClient::release_ip_ctx`] without cancellation
    ///
    /// # Errors
    /// Any request error.
    pub async fn release_ip(&self, address: &str) -> Result<String, SwisError> {
        self.release_ip_ctx(&RequestContext::background(), address).await
    }

    /// Set the comment of an IP node
    ///
    /// # Errors
    /// A not-found error if IPAM has no node for `address`, or any request error.
    pub async fn comment_on_ip_node_ctx(
        &self,
        ctx: &RequestContext,
        address: &str,
        comment: &str,
    ) -> Result<IpAddress, SwisError> {
        let mut ip = self.get_ip_ctx(ctx, address).await?.ok_or_else(|| {
            SwisError::new(
                ErrorKind::NotFound,
                "comment_on_ip_node",
                format!("no IP node for {address}"),
            )
        })?;

        let mut properties = Map::new();
        properties.insert("Comments".to_string(), Value::String(comment.to_string()));
        self.update_ctx(ctx, &ip_node_uri(ip.ip_node_id), &properties).await?;

        ip.comments = Some(comment.to_string());
        Ok(ip)
    }

    /// [`SwisClient::comment_on_ip_node_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::comment_on_ip_node_ctx`].
    pub async fn comment_on_ip_node(&self, address: &str, comment: &str) -> Result<IpAddress, SwisError> {
        self.comment_on_ip_node_ctx(&RequestContext::background(), address, comment)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_available_ip_string() {
        let ip = parse_available_ip(br#""10.0.0.5""#).unwrap();
        assert_eq!(ip.address, "10.0.0.5");
        assert_eq!(ip.ip_node_id, 0);
    }

    #[test]
    fn test_parse_available_ip_object() {
        let ip = parse_available_ip(br#"{"IpNodeId":12,"IPAddress":"10.0.0.6","Status":"Available"}"#).unwrap();
        assert_eq!(ip.ip_node_id, 12);
        assert_eq!(ip.address, "10.0.0.6");
        assert_eq!(ip.status, "Available");
    }

    #[test]
    fn test_parse_available_ip_null_is_not_found() {
        let err = parse_available_ip(b"null").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_ip_node_uri() {
        assert_eq!(ip_node_uri(2), "swis://localhost/Orion/IPAM.IPNode/IpNodeId=2");
    }
}
