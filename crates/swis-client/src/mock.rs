//! Mock SwisClient for unit testing
//!
//! This module provides a mock implementation of SwisClientTrait that can be used
//! in unit tests without requiring a running SolarWinds instance.
//!
//! IP nodes and subnets live in memory so the IPAM and subnet helpers behave
//! like the real service. Raw façade calls are recorded and answered from
//! scripted responses keyed by query text or endpoint.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use serde_json::{Map, Value};

use crate::common::query;
use crate::context::RequestContext;
use crate::custom_properties::custom_properties_uri;
use crate::error::{ErrorKind, SwisError};
use crate::models::{Assignment, CreateCustomPropertyRequest, IpAddress, IpStatus, Subnet};
use crate::ncm::remove_ncm_nodes_request;
use crate::swis_trait::SwisClientTrait;
use crate::{custom_pollers, ipam, subnet};

/// A call the mock received
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// HTTP method the real client would use
    pub method: &'static str,
    /// Endpoint relative to the base URL
    pub endpoint: String,
    /// JSON body, if any
    pub body: Option<Value>,
}

/// Mock SwisClient for testing
///
/// This mock stores resources in memory and can be configured to return
/// specific responses for testing different scenarios.
#[derive(Debug, Clone, Default)]
pub struct MockSwisClient {
    pub(crate) ip_nodes: Arc<Mutex<HashMap<String, IpAddress>>>,
    pub(crate) subnets: Arc<Mutex<Vec<Subnet>>>,
    pub(crate) assignments: Arc<Mutex<Vec<Assignment>>>,
    pub(crate) custom_properties: Arc<Mutex<HashMap<String, Map<String, Value>>>>,
    // Raw `results` arrays keyed by SWQL text
    pub(crate) query_results: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    // Raw response bodies keyed by endpoint
    pub(crate) responses: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    pub(crate) failures: Arc<Mutex<HashMap<String, (ErrorKind, u16)>>>,
    pub(crate) calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl MockSwisClient {
    /// Create a new, empty mock client
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an IP node to the mock store (for test setup)
    pub fn add_ip_node(&self, ip: IpAddress) {
        lock(&self.ip_nodes).insert(ip.address.clone(), ip);
    }

    /// Add a subnet to the mock store (for test setup)
    pub fn add_subnet(&self, subnet: Subnet) {
        lock(&self.subnets).push(subnet);
    }

    /// Add a poller assignment to the mock store (for test setup)
    pub fn add_assignment(&self, assignment: Assignment) {
        lock(&self.assignments).push(assignment);
    }

    /// Answer `query` with the raw result array `results`
    pub fn set_query_result(&self, query: &str, results: impl Into<Vec<u8>>) {
        lock(&self.query_results).insert(query.to_string(), results.into());
    }

    /// Answer calls to `endpoint` with `body`
    pub fn set_response(&self, endpoint: &str, body: impl Into<Vec<u8>>) {
        lock(&self.responses).insert(endpoint.to_string(), body.into());
    }

    /// Fail calls to `endpoint` as if the server returned `status`
    pub fn fail_endpoint(&self, endpoint: &str, status: u16) {
        lock(&self.failures).insert(endpoint.to_string(), (ErrorKind::from_status(status), status));
    }

    /// Every call received so far
    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    /// Look up an IP node (for test assertions)
    pub fn ip_node(&self, address: &str) -> Option<IpAddress> {
        lock(&self.ip_nodes).get(address).cloned()
    }

    /// Custom properties written to `uri` (for test assertions)
    pub fn custom_properties_of(&self, uri: &str) -> Map<String, Value> {
        lock(&self.custom_properties).get(uri).cloned().unwrap_or_default()
    }

    fn record(&self, ctx: &RequestContext, method: &'static str, endpoint: &str, body: Option<Value>) -> Result<(), SwisError> {
        if let Some(reason) = ctx.err() {
            return Err(SwisError::wrap(reason, ErrorKind::Network, "request", "request cancelled").with_endpoint(endpoint));
        }

        lock(&self.calls).push(RecordedCall {
            method,
            endpoint: endpoint.to_string(),
            body,
        });

        match lock(&self.failures).get(endpoint) {
            Some((kind, status)) => Err(SwisError::new(*kind, "request", format!("mock HTTP {status}"))
                .with_endpoint(endpoint)),
            None => Ok(()),
        }
    }

    fn response(&self, endpoint: &str) -> Vec<u8> {
        lock(&self.responses).get(endpoint).cloned().unwrap_or_default()
    }

    fn query_result(&self, query: &str) -> Vec<u8> {
        lock(&self.query_results)
            .get(query)
            .cloned()
            .unwrap_or_else(|| b"[]".to_vec())
    }

    fn record_query(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<(), SwisError> {
        let body = serde_json::json!({ "query": query, "parameters": parameters });
        self.record(ctx, "POST", "Query", Some(body))
    }

    fn set_status(&self, ctx: &RequestContext, address: &str, status: IpStatus) -> Result<String, SwisError> {
        let body = Value::from(vec![address, status.as_str()]);
        self.record(ctx, "POST", "Invoke/IPAM.SubnetManagement/ChangeIPStatus", Some(body))?;

        let mut nodes = lock(&self.ip_nodes);
        let node = nodes.get_mut(address).ok_or_else(|| {
            SwisError::new(ErrorKind::NotFound, "request", format!("no IP node for {address}"))
        })?;
        node.status = status.as_str().to_string();
        Ok(String::new())
    }

    fn find_subnet(
        &self,
        ctx: &RequestContext,
        filter: &str,
        parameters: &Value,
        matches: impl Fn(&Subnet) -> bool,
    ) -> Result<Option<Subnet>, SwisError> {
        self.record_query(ctx, &subnet::subnet_query(filter), Some(parameters))?;
        Ok(lock(&self.subnets).iter().find(|s| matches(s)).cloned())
    }
}

#[async_trait::async_trait]
impl SwisClientTrait for MockSwisClient {
    async fn query(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError> {
        if query.trim().is_empty() {
            return Err(SwisError::new(ErrorKind::Swql, "query", "query text is empty"));
        }
        self.record_query(ctx, query, parameters)?;
        Ok(self.query_result(query))
    }

    async fn query_row(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError> {
        let results = SwisClientTrait::query(self, ctx, query, parameters).await?;
        Ok(query::single_row(&results))
    }

    async fn query_one(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Option<Value>, SwisError> {
        let raw = SwisClientTrait::query(self, ctx, query, parameters).await?;
        Ok(query::first_row_value(query::decode_rows(&raw, "query_one")?))
    }

    async fn query_column(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<Value>, SwisError> {
        let raw = SwisClientTrait::query(self, ctx, query, parameters).await?;
        Ok(query::first_column(query::decode_rows(&raw, "query_column")?))
    }

    async fn create(&self, ctx: &RequestContext, entity: &str, body: &Value) -> Result<Vec<u8>, SwisError> {
        let endpoint = format!("Create/{entity}");
        self.record(ctx, "POST", &endpoint, Some(body.clone()))?;
        Ok(self.response(&endpoint))
    }

    async fn read(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.record(ctx, "GET", uri, None)?;
        Ok(self.response(uri))
    }

    async fn update(&self, ctx: &RequestContext, uri: &str, properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError> {
        self.record(ctx, "POST", uri, Some(Value::Object(properties.clone())))?;
        Ok(self.response(uri))
    }

    async fn delete(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.record(ctx, "DELETE", uri, None)?;
        Ok(self.response(uri))
    }

    async fn bulk_delete(&self, ctx: &RequestContext, uris: &[String]) -> Result<Vec<u8>, SwisError> {
        self.record(ctx, "POST", "BulkDelete", Some(serde_json::json!({ "uris": uris })))?;
        Ok(self.response("BulkDelete"))
    }

    async fn bulk_update(&self, ctx: &RequestContext, uris: &[String], properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError> {
        let body = serde_json::json!({ "uris": uris, "properties": properties });
        self.record(ctx, "POST", "BulkUpdate", Some(body))?;
        Ok(self.response("BulkUpdate"))
    }

    async fn invoke(&self, ctx: &RequestContext, entity: &str, verb: &str, body: &Value) -> Result<Vec<u8>, SwisError> {
        let endpoint = format!("Invoke/{entity}/{verb}");
        self.record(ctx, "POST", &endpoint, Some(body.clone()))?;
        Ok(self.response(&endpoint))
    }

    async fn get_first_available_ip(&self, ctx: &RequestContext, subnet_address: &str, cidr: &str) -> Result<IpAddress, SwisError> {
        self.record(
            ctx,
            "POST",
            "Invoke/IPAM.SubnetManagement/GetFirstAvailableIp",
            Some(Value::from(vec![subnet_address, cidr])),
        )?;

        let prefix = subnet_address.rsplit_once('.').map_or(subnet_address, |(head, _)| head);
        let nodes = lock(&self.ip_nodes);
        let mut free: Vec<&IpAddress> = nodes
            .values()
            .filter(|ip| ip.status == IpStatus::Available.as_str() && ip.address.starts_with(prefix))
            .collect();
        free.sort_by_key(|ip| ip.ip_node_id);

        free.first().map(|ip| (*ip).clone()).ok_or_else(|| {
            SwisError::new(ErrorKind::NotFound, "get_first_available_ip", "no available IP in subnet")
        })
    }

    async fn get_ip(&self, ctx: &RequestContext, address: &str) -> Result<Option<IpAddress>, SwisError> {
        self.record_query(ctx, ipam::GET_IP_QUERY, Some(&serde_json::json!({ "ipAddress": address })))?;
        Ok(self.ip_node(address))
    }

    async fn reserve_ip(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError> {
        self.set_status(ctx, address, IpStatus::Used)
    }

    async fn release_ip(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError> {
        self.set_status(ctx, address, IpStatus::Available)
    }

    async fn comment_on_ip_node(&self, ctx: &RequestContext, address: &str, comment: &str) -> Result<IpAddress, SwisError> {
        let mut node = SwisClientTrait::get_ip(self, ctx, address).await?.ok_or_else(|| {
            SwisError::new(ErrorKind::NotFound, "comment_on_ip_node", format!("no IP node for {address}"))
        })?;

        let mut properties = Map::new();
        properties.insert("Comments".to_string(), Value::String(comment.to_string()));
        self.record(ctx, "POST", &ipam::ip_node_uri(node.ip_node_id), Some(Value::Object(properties)))?;

        node.comments = Some(comment.to_string());
        if let Some(stored) = lock(&self.ip_nodes).get_mut(address) {
            stored.comments = node.comments.clone();
        }
        Ok(node)
    }

    async fn get_subnet(&self, ctx: &RequestContext, name: &str) -> Result<Option<Subnet>, SwisError> {
        let parameters = serde_json::json!({ "name": name });
        self.find_subnet(ctx, subnet::BY_NAME, &parameters, |s| s.display_name == name)
    }

    async fn get_subnet_by_vlan(&self, ctx: &RequestContext, vlan: &str) -> Result<Option<Subnet>, SwisError> {
        let parameters = serde_json::json!({ "vlan": vlan });
        self.find_subnet(ctx, subnet::BY_VLAN, &parameters, |s| s.vlan.as_deref() == Some(vlan))
    }

    async fn list_subnets(&self, ctx: &RequestContext) -> Result<Vec<Subnet>, SwisError> {
        self.record_query(ctx, &subnet::subnet_query(subnet::ALL_SUBNETS), None)?;
        Ok(lock(&self.subnets).clone())
    }

    async fn set_custom_property(&self, ctx: &RequestContext, uri: &str, name: &str, value: Value) -> Result<(), SwisError> {
        if uri.is_empty() || name.is_empty() {
            return Err(SwisError::new(
                ErrorKind::Validation,
                "set_custom_property",
                "URI and property name are required",
            ));
        }

        let mut properties = Map::new();
        properties.insert(name.to_string(), value.clone());
        self.record(ctx, "POST", &custom_properties_uri(uri), Some(Value::Object(properties)))
            .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, "set_custom_property", "failed to update custom property"))?;

        lock(&self.custom_properties)
            .entry(uri.to_string())
            .or_default()
            .insert(name.to_string(), value);
        Ok(())
    }

    async fn bulk_set_custom_property(&self, ctx: &RequestContext, uris: &[String], name: &str, value: Value) -> Result<(), SwisError> {
        const OP: &str = "bulk_set_custom_property";
        if uris.is_empty() || name.is_empty() {
            return Err(SwisError::new(ErrorKind::Validation, OP, "URIs and property name are required"));
        }

        let targets: Vec<String> = uris.iter().map(|uri| custom_properties_uri(uri)).collect();
        let mut properties = Map::new();
        properties.insert(name.to_string(), value.clone());
        let body = serde_json::json!({ "uris": targets, "properties": properties });
        self.record(ctx, "POST", "BulkUpdate", Some(body))
            .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, OP, "failed to update custom properties"))?;

        let mut stored = lock(&self.custom_properties);
        for uri in uris {
            stored.entry(uri.clone()).or_default().insert(name.to_string(), value.clone());
        }
        Ok(())
    }

    async fn create_custom_property(&self, ctx: &RequestContext, request: &CreateCustomPropertyRequest) -> Result<(), SwisError> {
        request.validate()?;
        let endpoint = format!("Invoke/{}/CreateCustomProperty", request.entity);
        self.record(ctx, "POST", &endpoint, Some(Value::from(request.verb_arguments())))
            .map_err(|e| {
                SwisError::wrap(e, ErrorKind::Internal, "create_custom_property", "failed to create custom property")
            })
    }

    async fn get_assignments(&self, ctx: &RequestContext) -> Result<Vec<Assignment>, SwisError> {
        self.record_query(ctx, custom_pollers::ASSIGNMENTS_QUERY, None)?;
        Ok(lock(&self.assignments).clone())
    }

    async fn remove_ncm_nodes(&self, ctx: &RequestContext, guids: &[String]) -> Result<(), SwisError> {
        let (body, endpoint) = remove_ncm_nodes_request(guids);
        self.record(ctx, "POST", endpoint, Some(Value::from(body))).map_err(|e| {
            SwisError::wrap(e, ErrorKind::Internal, "remove_ncm_nodes", "failed to remove the NCM nodes")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: u64, address: &str, status: IpStatus) -> IpAddress {
        IpAddress {
            ip_node_id: id,
            address: address.to_string(),
            status: status.as_str().to_string(),
            comments: None,
        }
    }

    #[tokio::test]
    async fn test_reserve_and_release() {
        let mock = MockSwisClient::new();
        let ctx = RequestContext::background();
        mock.add_ip_node(node(1, "10.0.0.1", IpStatus::Available));

        mock.reserve_ip(&ctx, "10.0.0.1").await.unwrap();
        assert_eq!(mock.ip_node("10.0.0.1").unwrap().status, "Used");

        mock.release_ip(&ctx, "10.0.0.1").await.unwrap();
        assert_eq!(mock.ip_node("10.0.0.1").unwrap().status, "Available");
        assert_eq!(mock.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_first_available_ip_skips_used() {
        let mock = MockSwisClient::new();
        mock.add_ip_node(node(1, "10.0.0.1", IpStatus::Used));
        mock.add_ip_node(node(2, "10.0.0.2", IpStatus::Available));
        mock.add_ip_node(node(3, "10.0.0.3", IpStatus::Available));

        let ip = mock
            .get_first_available_ip(&RequestContext::background(), "10.0.0.0", "24")
            .await
            .unwrap();
        assert_eq!(ip.address, "10.0.0.2");
    }

    #[tokio::test]
    async fn test_scripted_query_and_failure() {
        let mock = MockSwisClient::new();
        mock.set_query_result("SELECT 1", r#"[{"a":1}]"#);
        let ctx = RequestContext::background();

        let one = SwisClientTrait::query_one(&mock, &ctx, "SELECT 1", None).await.unwrap();
        assert_eq!(one, Some(Value::from(1)));

        mock.fail_endpoint("Query", 403);
        let err = SwisClientTrait::query(&mock, &ctx, "SELECT 1", None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Permission);
    }

    #[tokio::test]
    async fn test_query_one_takes_first_row() {
        let mock = MockSwisClient::new();
        mock.set_query_result("SELECT Caption FROM Orion.Nodes", r#"[{"Caption":"a"},{"Caption":"b"}]"#);

        let one = SwisClientTrait::query_one(&mock, &RequestContext::background(), "SELECT Caption FROM Orion.Nodes", None)
            .await
            .unwrap();
        assert_eq!(one, Some(Value::from("a")));
    }

    #[tokio::test]
    async fn test_helpers_are_recorded_and_can_fail() {
        let mock = MockSwisClient::new();
        let ctx = RequestContext::background();
        mock.add_ip_node(node(1, "10.0.0.1", IpStatus::Used));

        SwisClientTrait::get_ip(&mock, &ctx, "10.0.0.1").await.unwrap();
        mock.list_subnets(&ctx).await.unwrap();
        mock.get_assignments(&ctx).await.unwrap();
        mock.set_custom_property(&ctx, "swis://h/Orion/Orion.Nodes/NodeID=1", "Owner", Value::from("netops"))
            .await
            .unwrap();

        let endpoints: Vec<String> = mock.calls().into_iter().map(|c| c.endpoint).collect();
        assert_eq!(
            endpoints,
            vec!["Query", "Query", "Query", "swis://h/Orion/Orion.Nodes/NodeID=1/CustomProperties"]
        );
        assert_eq!(
            mock.custom_properties_of("swis://h/Orion/Orion.Nodes/NodeID=1")["Owner"],
            Value::from("netops")
        );

        mock.fail_endpoint("Query", 500);
        let err = mock.get_subnet(&ctx, "build-net").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.endpoint(), Some("Query"));
    }

    #[tokio::test]
    async fn test_bulk_set_failure_is_internal() {
        let mock = MockSwisClient::new();
        mock.fail_endpoint("BulkUpdate", 404);

        let err = mock
            .bulk_set_custom_property(&RequestContext::background(), &["swis://h/a".to_string()], "Owner", Value::Null)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.operation(), "bulk_set_custom_property");
        assert!(mock.custom_properties_of("swis://h/a").is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_context_is_refused() {
        let mock = MockSwisClient::new();
        let (ctx, handle) = RequestContext::cancellable();
        handle.cancel();

        let err = mock.list_subnets(&ctx).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Network);
        assert!(mock.calls().is_empty());
    }
}
