//! SwisClient trait for mocking
//!
//! This trait abstracts the SwisClient to enable mocking in unit tests.
//! The concrete SwisClient implements this trait, and tests can use mock implementations.
//! Every operation takes a [`RequestContext`] so callers can cancel it.

use serde_json::{Map, Value};

use crate::client::SwisClient;
use crate::context::RequestContext;
use crate::error::SwisError;
use crate::models::{Assignment, CreateCustomPropertyRequest, IpAddress, Subnet};

/// Trait for SWIS API client operations
///
/// All async methods must be `Send` to work with Tokio's work-stealing runtime.
#[async_trait::async_trait]
pub trait SwisClientTrait: Send + Sync {
    // Query façade
    async fn query(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError>;
    async fn query_row(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError>;
    async fn query_one(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Option<Value>, SwisError>;
    async fn query_column(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<Value>, SwisError>;
    async fn create(&self, ctx: &RequestContext, entity: &str, body: &Value) -> Result<Vec<u8>, SwisError>;
    async fn read(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError>;
    async fn update(&self, ctx: &RequestContext, uri: &str, properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError>;
    async fn delete(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError>;
    async fn bulk_delete(&self, ctx: &RequestContext, uris: &[String]) -> Result<Vec<u8>, SwisError>;
    async fn bulk_update(&self, ctx: &RequestContext, uris: &[String], properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError>;
    async fn invoke(&self, ctx: &RequestContext, entity: &str, verb: &str, body: &Value) -> Result<Vec<u8>, SwisError>;

    // IPAM
    async fn get_first_available_ip(&self, ctx: &RequestContext, subnet_address: &str, cidr: &str) -> Result<IpAddress, SwisError>;
    async fn get_ip(&self, ctx: &RequestContext, address: &str) -> Result<Option<IpAddress>, SwisError>;
    async fn reserve_ip(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError>;
    async fn release_ip(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError>;
    async fn comment_on_ip_node(&self, ctx: &RequestContext, address: &str, comment: &str) -> Result<IpAddress, SwisError>;

    // Subnets
    async fn get_subnet(&self, ctx: &RequestContext, name: &str) -> Result<Option<Subnet>, SwisError>;
    async fn get_subnet_by_vlan(&self, ctx: &RequestContext, vlan: &str) -> Result<Option<Subnet>, SwisError>;
    async fn list_subnets(&self, ctx: &RequestContext) -> Result<Vec<Subnet>, SwisError>;

    // Custom properties and pollers
    async fn set_custom_property(&self, ctx: &RequestContext, uri: &str, name: &str, value: Value) -> Result<(), SwisError>;
    async fn bulk_set_custom_property(&self, ctx: &RequestContext, uris: &[String], name: &str, value: Value) -> Result<(), SwisError>;
    async fn create_custom_property(&self, ctx: &RequestContext, request: &CreateCustomPropertyRequest) -> Result<(), SwisError>;
    async fn get_assignments(&self, ctx: &RequestContext) -> Result<Vec<Assignment>, SwisError>;

    // NCM
    async fn remove_ncm_nodes(&self, ctx: &RequestContext, guids: &[String]) -> Result<(), SwisError>;
}

#[async_trait::async_trait]
impl SwisClientTrait for SwisClient {
    async fn query(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError> {
        self.query_ctx(ctx, query, parameters).await
    }

    async fn query_row(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError> {
        self.query_row_ctx(ctx, query, parameters).await
    }

    async fn query_one(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Option<Value>, SwisError> {
        self.query_one_ctx(ctx, query, parameters).await
    }

    async fn query_column(&self, ctx: &RequestContext, query: &str, parameters: Option<&Value>) -> Result<Vec<Value>, SwisError> {
        self.query_column_ctx(ctx, query, parameters).await
    }

    async fn create(&self, ctx: &RequestContext, entity: &str, body: &Value) -> Result<Vec<u8>, SwisError> {
        self.create_ctx(ctx, entity, body).await
    }

    async fn read(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.read_ctx(ctx, uri).await
    }

    async fn update(&self, ctx: &RequestContext, uri: &str, properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError> {
        self.update_ctx(ctx, uri, properties).await
    }

    async fn delete(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.delete_ctx(ctx, uri).await
    }

    async fn bulk_delete(&self, ctx: &RequestContext, uris: &[String]) -> Result<Vec<u8>, SwisError> {
        self.bulk_delete_ctx(ctx, uris).await
    }

    async fn bulk_update(&self, ctx: &RequestContext, uris: &[String], properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError> {
        self.bulk_update_ctx(ctx, uris, properties).await
    }

    async fn invoke(&self, ctx: &RequestContext, entity: &str, verb: &str, body: &Value) -> Result<Vec<u8>, SwisError> {
        self.invoke_ctx(ctx, entity, verb, body).await
    }

    async fn get_first_available_ip(&self, ctx: &RequestContext, subnet_address: &str, cidr: &str) -> Result<IpAddress, SwisError> {
        self.get_first_available_ip_ctx(ctx, subnet_address, cidr).await
    }

    async fn get_ip(&self, ctx: &RequestContext, address: &str) -> Result<Option<IpAddress>, SwisError> {
        self.get_ip_ctx(ctx, address).await
    }

    async fn reserve_ip(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError> {
        self.reserve_ip_ctx(ctx, address).await
    }

    async fn release_ip(&self, ctx: &RequestContext, address: &str) -> Result<String, SwisError> {
        self.release_ip_ctx(ctx, address).await
    }

    async fn comment_on_ip_node(&self, ctx: &RequestContext, address: &str, comment: &str) -> Result<IpAddress, SwisError> {
        self.comment_on_ip_node_ctx(ctx, address, comment).await
    }

    async fn get_subnet(&self, ctx: &RequestContext, name: &str) -> Result<Option<Subnet>, SwisError> {
        self.get_subnet_ctx(ctx, name).await
    }

    async fn get_subnet_by_vlan(&self, ctx: &RequestContext, vlan: &str) -> Result<Option<Subnet>, SwisError> {
        self.get_subnet_by_vlan_ctx(ctx, vlan).await
    }

    async fn list_subnets(&self, ctx: &RequestContext) -> Result<Vec<Subnet>, SwisError> {
        self.list_subnets_ctx(ctx).await
    }

    async fn set_custom_property(&self, ctx: &RequestContext, uri: &str, name: &str, value: Value) -> Result<(), SwisError> {
        self.set_custom_property_ctx(ctx, uri, name, value).await
    }

    async fn bulk_set_custom_property(&self, ctx: &RequestContext, uris: &[String], name: &str, value: Value) -> Result<(), SwisError> {
        self.bulk_set_custom_property_ctx(ctx, uris, name, value).await
    }

    async fn create_custom_property(&self, ctx: &RequestContext, request: &CreateCustomPropertyRequest) -> Result<(), SwisError> {
        self.create_custom_property_ctx(ctx, request).await
    }

    async fn get_assignments(&self, ctx: &RequestContext) -> Result<Vec<Assignment>, SwisError> {
        self.get_assignments_ctx(ctx).await
    }

    async fn remove_ncm_nodes(&self, ctx: &RequestContext, guids: &[String]) -> Result<(), SwisError> {
        self.remove_ncm_nodes_ctx(ctx, guids).await
    }
}
