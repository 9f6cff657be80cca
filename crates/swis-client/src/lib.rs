//! SolarWinds Information Service (SWIS) REST API Client
//!
//! A Rust client library for the SWIS REST/JSON API exposed by SolarWinds
//! Orion on port 17778. Provides SWQL queries, entity CRUD, verb invocation
//! and bulk operations, plus helpers for IPAM, subnets, custom properties,
//! custom pollers and NCM.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use serde_json::json;
//! use swis_client::{Config, RequestContext, SwisClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Create a client
//! let config = Config::new("orion.example.com", "admin", "secret")
//!     .with_timeout(Duration::from_secs(10))
//!     .with_max_retries(2);
//! let client = SwisClient::new(config)?;
//!
//! // Query nodes
//! let rows = client
//!     .query("SELECT NodeID, Caption FROM Orion.Nodes WHERE Vendor = @vendor", Some(&json!({"vendor": "Cisco"})))
//!     .await?;
//!
//! // Single value with a deadline
//! let ctx = RequestContext::with_timeout(Duration::from_secs(2));
//! let count = client.query_one_ctx(&ctx, "SELECT COUNT(NodeID) AS N FROM Orion.Nodes", None).await?;
//!
//! // Reserve an address in IPAM
//! client.reserve_ip("10.0.0.12").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Features
//!
//! - **Retry Logic**: Transport failures are retried with a fixed delay; HTTP errors are not
//! - **Cancellation**: Every call accepts a [`RequestContext`] deadline or cancel signal
//! - **Typed Errors**: [`SwisError`] carries an [`ErrorKind`], the operation, endpoint and HTTP status
//! - **Mocking**: [`SwisClientTrait`] and, with `test-util`, an in-memory `MockSwisClient`

pub mod client;
pub mod common;
pub mod config;
pub mod context;
pub mod custom_pollers;
pub mod custom_properties;
pub mod error;
pub mod ipam;
#[cfg(feature = "test-util")]
pub mod mock;
pub mod models;
pub mod ncm;
pub mod subnet;
#[path = "trait.rs"]
pub mod swis_trait;

pub use client::SwisClient;
pub use common::HttpClient;
pub use common::query::Row;
pub use config::Config;
pub use context::{CancelHandle, ContextError, RequestContext};
pub use error::{ErrorKind, SwisError};
#[cfg(feature = "test-util")]
pub use mock::{MockSwisClient, RecordedCall};
pub use models::*;
pub use swis_trait::SwisClientTrait;
