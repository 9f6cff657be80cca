//! Custom property helpers
//!
//! Writes go to `<entity uri>/CustomProperties`; definitions are created with
//! the `CreateCustomProperty` verb of the custom-property entity.

use serde_json::{Map, Value};

use crate::client::SwisClient;
use crate::context::RequestContext;
use crate::error::{ErrorKind, SwisError};
use crate::models::CreateCustomPropertyRequest;

pub(crate) fn custom_properties_uri(uri: &str) -> String {
    format!("{uri}/CustomProperties")
}

fn invalid(operation: &str, message: &str) -> SwisError {
    SwisError::new(ErrorKind::Validation, operation, message)
}

impl SwisClient {
    /// Set one custom property on an entity
    ///
    /// # Errors
    /// A validation error for an empty URI or name; an internal error wrapping
    /// the request failure otherwise.
    pub async fn set_custom_property_ctx(
        &self,
        ctx: &RequestContext,
        uri: &str,
        name: &str,
        value: Value,
    ) -> Result<(), SwisError> {
        const OP: &str = "set_custom_property";
        if uri.is_empty() {
            return Err(invalid(OP, "URI cannot be empty"));
        }
        if name.is_empty() {
            return Err(invalid(OP, "property name cannot be empty"));
        }

        let mut properties = Map::new();
        properties.insert(name.to_string(), value);
        self.post_ctx(ctx, &custom_properties_uri(uri), &properties)
            .await
            .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, OP, "failed to update custom property"))?;
        Ok(())
    }

    /// [`SwisClient::set_custom_property_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::set_custom_property_ctx`].
    pub async fn set_custom_property(&self, uri: &str, name: &str, value: Value) -> Result<(), SwisError> {
        self.set_custom_property_ctx(&RequestContext::background(), uri, name, value)
            .await
    }

    /// Set several custom properties on an entity
    ///
    /// # Errors
    /// A validation error for an empty URI or property map; an internal error
    /// wrapping the request failure otherwise.
    pub async fn set_custom_properties_ctx(
        &self,
        ctx: &RequestContext,
        uri: &str,
        properties: &Map<String, Value>,
    ) -> Result<(), SwisError> {
        const OP: &str = "set_custom_properties";
        if uri.is_empty() {
            return Err(invalid(OP, "URI cannot be empty"));
        }
        if properties.is_empty() {
            return Err(invalid(OP, "no properties provided"));
        }

        self.post_ctx(ctx, &custom_properties_uri(uri), properties)
            .await
            .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, OP, "failed to update custom properties"))?;
        Ok(())
    }

    /// [`SwisClient::set_custom_properties_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::set_custom_properties_ctx`].
    pub async fn set_custom_properties(&self, uri: &str, properties: &Map<String, Value>) -> Result<(), SwisError> {
        self.set_custom_properties_ctx(&RequestContext::background(), uri, properties)
            .await
    }

    /// Set the same custom property on many entities in one `BulkUpdate`
    ///
    /// # Errors
    /// A validation error for an empty URI list or name; an internal error
    /// wrapping the request failure otherwise.
    pub async fn bulk_set_custom_property_ctx(
        &self,
        ctx: &RequestContext,
        uris: &[String],
        name: &str,
        value: Value,
    ) -> Result<(), SwisError> {
        const OP: &str = "bulk_set_custom_property";
        if uris.is_empty() {
            return Err(invalid(OP, "no URIs provided"));
        }
        if name.is_empty() {
            return Err(invalid(OP, "property name cannot be empty"));
        }

        let targets: Vec<String> = uris.iter().map(|uri| custom_properties_uri(uri)).collect();
        let mut properties = Map::new();
        properties.insert(name.to_string(), value);

        self.bulk_update_ctx(ctx, &targets, &properties)
            .await
            .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, OP, "failed to update custom properties"))?;
        Ok(())
    }

    /// [`SwisClient::bulk_set_custom_property_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::bulk_set_custom_property_ctx`].
    pub async fn bulk_set_custom_property(&self, uris: &[String], name: &str, value: Value) -> Result<(), SwisError> {
        self.bulk_set_custom_property_ctx(&RequestContext::background(), uris, name, value)
            .await
    }

    /// Define a new custom property
    ///
    /// # Errors
    /// A validation error from [`CreateCustomPropertyRequest::validate`]; an
    /// internal error wrapping the request failure otherwise.
    pub async fn create_custom_property_ctx(
        &self,
        ctx: &RequestContext,
        request: &CreateCustomPropertyRequest,
    ) -> Result<(), SwisError> {
        const OP: &str = "create_custom_property";
        request.validate()?;

        self.invoke_ctx(ctx, &request.entity, "CreateCustomProperty", &request.verb_arguments())
            .await
            .map_err(|e| SwisError::wrap(e, ErrorKind::Internal, OP, "failed to create custom property"))?;
        Ok(())
    }

    /// [`SwisClient::create_custom_property_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::create_custom_property_ctx`].
    pub async fn create_custom_property(&self, request: &CreateCustomPropertyRequest) -> Result<(), SwisError> {
        self.create_custom_property_ctx(&RequestContext::background(), request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn client() -> SwisClient {
        SwisClient::new(Config::new("h", "u", "p")).unwrap()
    }

    #[tokio::test]
    async fn test_rejects_empty_inputs_before_sending() {
        let client = client();

        let err = client.set_custom_property("", "Owner", Value::Null).await.unwrap_err();
        assert_eq!(err.message(), "URI cannot be empty");

        let err = client
            .set_custom_property("swis://h/Orion/Orion.Nodes/NodeID=1", "", Value::Null)
            .await
            .unwrap_err();
        assert_eq!(err.message(), "property name cannot be empty");

        let err = client
            .set_custom_properties("swis://h/Orion/Orion.Nodes/NodeID=1", &Map::new())
            .await
            .unwrap_err();
        assert_eq!(err.message(), "no properties provided");

        let err = client.bulk_set_custom_property(&[], "Owner", Value::Null).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.operation(), "bulk_set_custom_property");
    }

    #[tokio::test]
    async fn test_cancelled_context_is_wrapped() {
        let client = client();
        let (ctx, handle) = RequestContext::cancellable();
        handle.cancel();

        let err = client
            .set_custom_property_ctx(&ctx, "swis://h/Orion/Orion.Nodes/NodeID=1", "Owner", Value::Null)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.operation(), "set_custom_property");
        let cause = std::error::Error::source(&err).unwrap();
        assert!(cause.to_string().contains("request cancelled"));
    }

    #[test]
    fn test_custom_properties_uri() {
        assert_eq!(
            custom_properties_uri("swis://h/Orion/Orion.Nodes/NodeID=1"),
            "swis://h/Orion/Orion.Nodes/NodeID=1/CustomProperties"
        );
    }
}
