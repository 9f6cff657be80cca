//! Common utilities for the SWIS client
//!
//! [`HttpClient`] is the request executor every API operation goes through:
//! it authenticates, retries transport failures, honours the caller's
//! [`RequestContext`] and classifies HTTP error responses.

pub mod query;

use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method, Url};
use serde::Serialize;
use tracing::{Instrument, debug, warn};

use crate::context::{ContextError, RequestContext};
use crate::error::{ErrorKind, SwisError};

/// Authenticated HTTP executor bound to one SWIS base URL
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: Url,
    username: String,
    password: String,
    user_agent: String,
    max_retries: u32,
    retry_delay: Duration,
    span: tracing::Span,
}

/// Outcome of the send loop when no response was obtained
enum SendFailure {
    Transport(reqwest::Error),
    Context(ContextError),
}

impl HttpClient {
    /// Create a new executor.
    ///
    /// `max_retries` counts retries after the first attempt.
    #[allow(clippy::too_many_arguments, reason = "plain constructor over already validated config")]
    pub fn new(
        client: Client,
        base_url: Url,
        username: String,
        password: String,
        user_agent: String,
        max_retries: u32,
        retry_delay: Duration,
        span: tracing::Span,
    ) -> Self {
        Self {
            client,
            base_url,
            username,
            password,
            user_agent,
            max_retries,
            retry_delay,
            span,
        }
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build a full URL from an endpoint.
    ///
    /// Absolute `http(s)` URLs are used as-is. Anything else, including
    /// `swis://` entity URIs, is appended to the base URL.
    ///
    /// # Errors
    /// A validation error if the result is not a valid URL.
    pub fn build_url(&self, endpoint: &str) -> Result<Url, SwisError> {
        let raw = if endpoint.starts_with("http://") || endpoint.starts_with("https://") {
            endpoint.to_string()
        } else {
            format!("{}{}", self.base_url, endpoint.trim_start_matches('/'))
        };

        Url::parse(&raw).map_err(|e| {
            SwisError::wrap(e, ErrorKind::Validation, "request", "invalid endpoint").with_endpoint(endpoint)
        })
    }

    /// Execute one logical call and return the raw response body.
    ///
    /// Transport failures are retried up to `max_retries` times with
    /// `retry_delay` between attempts. Any HTTP response ends the loop; a
    /// status of 400 or above is classified into a [`SwisError`] and never
    /// retried.
    ///
    /// # Errors
    /// - validation: the body cannot be serialised or the endpoint is invalid
    /// - network: every attempt failed, the context fired, or the body could not be read
    /// - any kind from [`ErrorKind::from_status`] for HTTP error responses
    pub async fn execute<B>(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        let payload = match body {
            Some(body) => Some(serde_json::to_vec(body).map_err(|e| {
                SwisError::wrap(e, ErrorKind::Validation, "request", "failed to marshal request body")
            })?),
            None => None,
        };
        let url = self.build_url(endpoint)?;

        self.execute_inner(ctx, method, endpoint, url, payload)
            .instrument(self.span.clone())
            .await
    }

    async fn execute_inner(
        &self,
        ctx: &RequestContext,
        method: Method,
        endpoint: &str,
        url: Url,
        payload: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, SwisError> {
        debug!(%method, endpoint, "making request");

        let response = match self.send_with_retries(ctx, &method, url, payload).await {
            Ok(response) => response,
            Err(SendFailure::Transport(e)) => {
                return Err(SwisError::wrap(
                    e,
                    ErrorKind::Network,
                    "request",
                    "request failed after retries",
                )
                .with_endpoint(endpoint));
            }
            Err(SendFailure::Context(e)) => return Err(cancelled("request", endpoint, e)),
        };

        let status = response.status();

        // Consuming the response releases the connection on every path below
        let output = tokio::select! {
            biased;
            reason = ctx.done() => return Err(cancelled("response", endpoint, reason)),
            bytes = response.bytes() => bytes.map_err(|e| {
                SwisError::wrap(e, ErrorKind::Network, "response", "failed to read response body")
                    .with_endpoint(endpoint)
            })?,
        };

        if status.as_u16() >= 400 {
            debug!(status = status.as_u16(), endpoint, "request rejected");
            return Err(SwisError::from_status(
                "request",
                endpoint,
                status,
                String::from_utf8_lossy(&output),
            ));
        }

        debug!(status = status.as_u16(), "request completed");
        Ok(output.to_vec())
    }

    async fn send_with_retries(
        &self,
        ctx: &RequestContext,
        method: &Method,
        url: Url,
        payload: Option<Vec<u8>>,
    ) -> Result<reqwest::Response, SendFailure> {
        let mut last_err = None;

        for attempt in 0..=self.max_retries {
            if let Some(reason) = ctx.err() {
                return Err(SendFailure::Context(reason));
            }

            if attempt > 0 {
                debug!(attempt, "retrying request");
                tokio::select! {
                    biased;
                    reason = ctx.done() => return Err(SendFailure::Context(reason)),
                    () = tokio::time::sleep(self.retry_delay) => {}
                }
            }

            let mut request = self
                .client
                .request(method.clone(), url.clone())
                .header(CONTENT_TYPE, "application/json")
                .header(USER_AGENT, &self.user_agent)
                .basic_auth(&self.username, Some(&self.password));
            if let Some(payload) = &payload {
                request = request.body(payload.clone());
            }

            let result = tokio::select! {
                biased;
                reason = ctx.done() => return Err(SendFailure::Context(reason)),
                result = request.send() => result,
            };

            match result {
                Ok(response) => return Ok(response),
                Err(e) => {
                    warn!(attempt, error = %e, "request attempt failed");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(e) => Err(SendFailure::Transport(e)),
            // The loop always runs at least once
            None => Err(SendFailure::Context(ContextError::Cancelled)),
        }
    }

    /// POST `body` to `endpoint`
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn post<B>(&self, ctx: &RequestContext, endpoint: &str, body: &B) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.execute(ctx, Method::POST, endpoint, Some(body)).await
    }

    /// GET `endpoint`
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn get(&self, ctx: &RequestContext, endpoint: &str) -> Result<Vec<u8>, SwisError> {
        self.execute::<()>(ctx, Method::GET, endpoint, None).await
    }

    /// DELETE `endpoint`
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn delete(&self, ctx: &RequestContext, endpoint: &str) -> Result<Vec<u8>, SwisError> {
        self.execute::<()>(ctx, Method::DELETE, endpoint, None).await
    }
}

fn cancelled(operation: &str, endpoint: &str, reason: ContextError) -> SwisError {
    let message = match reason {
        ContextError::Cancelled => "request cancelled",
        ContextError::DeadlineExceeded => "deadline exceeded",
    };
    SwisError::wrap(reason, ErrorKind::Network, operation, message).with_endpoint(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn http() -> HttpClient {
        HttpClient::new(
            Client::new(),
            Url::parse("https://orion:17778/SolarWinds/InformationService/v3/Json/").unwrap(),
            "admin".to_string(),
            "secret".to_string(),
            "test-agent".to_string(),
            0,
            Duration::from_millis(1),
            tracing::Span::none(),
        )
    }

    #[test]
    fn test_build_url_relative() {
        let url = http().build_url("Query").unwrap();
        assert_eq!(
            url.as_str(),
            "https://orion:17778/SolarWinds/InformationService/v3/Json/Query"
        );

        let url = http().build_url("Invoke/IPAM.SubnetManagement/ChangeIPStatus").unwrap();
        assert_eq!(url.path(), "/SolarWinds/InformationService/v3/Json/Invoke/IPAM.SubnetManagement/ChangeIPStatus");
    }

    #[test]
    fn test_build_url_entity_uri_is_appended() {
        let url = http()
            .build_url("swis://orion/Orion/Orion.Nodes/NodeID=1")
            .unwrap();

        assert_eq!(url.host_str(), Some("orion"));
        assert!(
            url.path()
                .starts_with("/SolarWinds/InformationService/v3/Json/swis:")
        );
        assert!(url.path().ends_with("/Orion/Orion.Nodes/NodeID=1"));
    }

    #[test]
    fn test_build_url_absolute_passthrough() {
        let url = http().build_url("http://other:8080/x").unwrap();
        assert_eq!(url.as_str(), "http://other:8080/x");
    }

    #[tokio::test]
    async fn test_unserialisable_body_is_validation_error() {
        use std::collections::HashMap;

        // Non-string map keys cannot be encoded as JSON object keys
        let mut body = HashMap::new();
        body.insert(vec![1u8], "value");

        let err = http()
            .post(&RequestContext::background(), "Create/Orion.Nodes", &body)
            .await
            .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.operation(), "request");
        assert_eq!(err.message(), "failed to marshal request body");
    }
}
