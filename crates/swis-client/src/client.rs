//! SWIS API client
//!
//! Implements the SolarWinds Information Service REST/JSON API:
//! `Query`, `Create/<entity>`, `Invoke/<entity>/<verb>`, `BulkDelete`,
//! `BulkUpdate` and plain entity URIs for read, update and delete.

use reqwest::{Client, Url};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::common::HttpClient;
use crate::common::query;
use crate::config::Config;
use crate::context::RequestContext;
use crate::error::{ErrorKind, SwisError};
use crate::models::{BulkDeleteRequest, BulkUpdateRequest, QueryRequest, QueryResult};

/// Port the SWIS REST endpoint listens on
pub const SWIS_PORT: u16 = 17778;

/// Path of the JSON API below the host
pub const SWIS_PATH: &str = "SolarWinds/InformationService/v3/Json/";

/// SWIS API client
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct SwisClient {
    http: HttpClient,
    config: Config,
}

impl SwisClient {
    /// Create a new SWIS client
    ///
    /// # Arguments
    /// * `config` - Validated before anything else happens
    ///
    /// # Errors
    /// The validation error from [`Config::validate`], or a validation error
    /// if the host does not form a valid URL.
    pub fn new(config: Config) -> Result<Self, SwisError> {
        config.validate()?;

        let base_url = Url::parse(&format!("https://{}:{}/{}", config.host, SWIS_PORT, SWIS_PATH))
            .map_err(|e| SwisError::wrap(e, ErrorKind::Validation, "new_client", "invalid host URL"))?;

        Self::with_base_url(config, base_url)
    }

    /// Create a client with positional connection settings.
    ///
    /// Equivalent to [`SwisClient::new`] with [`Config::default`] and these
    /// four fields set.
    ///
    /// # Errors
    /// See [`SwisClient::new`].
    pub fn new_legacy(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        insecure_skip_verify: bool,
    ) -> Result<Self, SwisError> {
        let config = Config {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            insecure_skip_verify,
            ..Config::default()
        };
        Self::new(config)
    }

    /// Create a client against an explicit base URL (proxies, custom ports).
    ///
    /// # Errors
    /// The validation error from [`Config::validate`], or an internal error
    /// if the HTTP transport cannot be built.
    pub fn with_base_url(config: Config, mut base_url: Url) -> Result<Self, SwisError> {
        config.validate()?;

        // Relative endpoints are appended, so the base must end in a slash
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(config.max_idle_conns)
            .danger_accept_invalid_certs(config.insecure_skip_verify)
            .build()
            .map_err(|e| {
                SwisError::wrap(e, ErrorKind::Internal, "new_client", "failed to build HTTP client")
            })?;

        let span = config
            .span
            .clone()
            .unwrap_or_else(|| tracing::debug_span!("swis_client", host = %config.host));

        // validate() rejects negative values
        let max_retries = u32::try_from(config.max_retries).unwrap_or_default();

        let http = HttpClient::new(
            client,
            base_url,
            config.username.clone(),
            config.password.clone(),
            config.user_agent.clone(),
            max_retries,
            config.retry_delay,
            span,
        );

        Ok(Self { http, config })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        self.http.base_url()
    }

    /// Get the configuration the client was built from
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// POST a JSON body to an endpoint and return the raw response
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn post_ctx<B>(&self, ctx: &RequestContext, endpoint: &str, body: &B) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.http.post(ctx, endpoint, body).await
    }

    /// GET an endpoint and return the raw response
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn get_ctx(&self, ctx: &RequestContext, endpoint: &str) -> Result<Vec<u8>, SwisError> {
        self.http.get(ctx, endpoint).await
    }

    /// [`SwisClient::post_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn post<B>(&self, endpoint: &str, body: &B) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.post_ctx(&RequestContext::background(), endpoint, body).await
    }

    /// [`SwisClient::get_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn get(&self, endpoint: &str) -> Result<Vec<u8>, SwisError> {
        self.get_ctx(&RequestContext::background(), endpoint).await
    }

    /// Run a SWQL query and return the raw `results` array.
    ///
    /// A query matching no rows yields `[]`.
    ///
    /// # Arguments
    /// * `query` - SWQL text, e.g. `SELECT NodeID FROM Orion.Nodes WHERE Caption = @name`
    /// * `parameters` - Values for the `@` placeholders
    ///
    /// # Errors
    /// - swql: the query text is blank
    /// - internal: the response is not a result envelope
    /// - anything [`HttpClient::execute`] returns
    pub async fn query_ctx(
        &self,
        ctx: &RequestContext,
        query: &str,
        parameters: Option<&Value>,
    ) -> Result<Vec<u8>, SwisError> {
        if query.trim().is_empty() {
            return Err(SwisError::new(ErrorKind::Swql, "query", "query text is empty"));
        }

        debug!(query, "running SWQL query");
        let request = QueryRequest { query, parameters };
        let body = self.http.post(ctx, "Query", &request).await?;
        query::unwrap_results(&body)
    }

    /// [`SwisClient::query_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::query_ctx`].
    pub async fn query(&self, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError> {
        self.query_ctx(&RequestContext::background(), query, parameters).await
    }

    /// Run a query and decode the rows into `T`
    ///
    /// # Errors
    /// See [`SwisClient::query_ctx`]; an internal error if the rows do not match `T`.
    pub async fn query_as_ctx<T>(
        &self,
        ctx: &RequestContext,
        query: &str,
        parameters: Option<&Value>,
    ) -> Result<QueryResult<T>, SwisError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        let raw = self.query_ctx(ctx, query, parameters).await?;
        QueryResult::from_slice(&raw)
    }

    /// [`SwisClient::query_as_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::query_as_ctx`].
    pub async fn query_as<T>(&self, query: &str, parameters: Option<&Value>) -> Result<QueryResult<T>, SwisError>
    where
        T: for<'de> serde::Deserialize<'de>,
    {
        self.query_as_ctx(&RequestContext::background(), query, parameters).await
    }

    /// Run a query and return its single row as a raw JSON object.
    ///
    /// No rows gives `{}`. The outer brackets are stripped as-is, so a result
    /// with several rows is not a single object; use [`SwisClient::query`] or
    /// [`SwisClient::query_as`] for those.
    ///
    /// # Errors
    /// See [`SwisClient::query_ctx`].
    pub async fn query_row_ctx(
        &self,
        ctx: &RequestContext,
        query: &str,
        parameters: Option<&Value>,
    ) -> Result<Vec<u8>, SwisError> {
        let results = self.query_ctx(ctx, query, parameters).await?;
        Ok(query::single_row(&results))
    }

    /// [`SwisClient::query_row_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::query_ctx`].
    pub async fn query_row(&self, query: &str, parameters: Option<&Value>) -> Result<Vec<u8>, SwisError> {
        self.query_row_ctx(&RequestContext::background(), query, parameters).await
    }

    /// Run a query and return the first column of its first row.
    ///
    /// Meant for single-value queries. With more columns the first one in
    /// SELECT order wins; with more rows the first row wins. `None` when there
    /// is no row or the row has no columns.
    ///
    /// # Errors
    /// See [`SwisClient::query_ctx`]; an internal error if the rows are not objects.
    pub async fn query_one_ctx(
        &self,
        ctx: &RequestContext,
        query: &str,
        parameters: Option<&Value>,
    ) -> Result<Option<Value>, SwisError> {
        let raw = self.query_ctx(ctx, query, parameters).await?;
        let rows = query::decode_rows(&raw, "query_one")?;
        Ok(query::first_row_value(rows))
    }

    /// [`SwisClient::query_one_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::query_one_ctx`].
    pub async fn query_one(&self, query: &str, parameters: Option<&Value>) -> Result<Option<Value>, SwisError> {
        self.query_one_ctx(&RequestContext::background(), query, parameters).await
    }

    /// Run a query and return the first column of every row.
    ///
    /// "First" is SELECT order. Use [`SwisClient::query_column_named`] when the
    /// query selects more than one column.
    ///
    /// # Errors
    /// See [`SwisClient::query_ctx`]; an internal error if the rows are not objects.
    pub async fn query_column_ctx(
        &self,
        ctx: &RequestContext,
        query: &str,
        parameters: Option<&Value>,
    ) -> Result<Vec<Value>, SwisError> {
        let raw = self.query_ctx(ctx, query, parameters).await?;
        let rows = query::decode_rows(&raw, "query_column")?;
        Ok(query::first_column(rows))
    }

    /// [`SwisClient::query_column_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::query_column_ctx`].
    pub async fn query_column(&self, query: &str, parameters: Option<&Value>) -> Result<Vec<Value>, SwisError> {
        self.query_column_ctx(&RequestContext::background(), query, parameters).await
    }

    /// Run a query and return `column` from every row (`null` where absent)
    ///
    /// # Errors
    /// See [`SwisClient::query_column_ctx`].
    pub async fn query_column_named_ctx(
        &self,
        ctx: &RequestContext,
        query: &str,
        parameters: Option<&Value>,
        column: &str,
    ) -> Result<Vec<Value>, SwisError> {
        let raw = self.query_ctx(ctx, query, parameters).await?;
        let rows = query::decode_rows(&raw, "query_column")?;
        Ok(query::named_column(rows, column))
    }

    /// [`SwisClient::query_column_named_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`SwisClient::query_column_ctx`].
    pub async fn query_column_named(
        &self,
        query: &str,
        parameters: Option<&Value>,
        column: &str,
    ) -> Result<Vec<Value>, SwisError> {
        self.query_column_named_ctx(&RequestContext::background(), query, parameters, column)
            .await
    }

    /// Create an entity; the response is the new entity's URI
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn create_ctx<B>(&self, ctx: &RequestContext, entity: &str, body: &B) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.http.post(ctx, &format!("Create/{entity}"), body).await
    }

    /// [`SwisClient::create_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn create<B>(&self, entity: &str, body: &B) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.create_ctx(&RequestContext::background(), entity, body).await
    }

    /// Read an entity by URI
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn read_ctx(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.http.get(ctx, uri).await
    }

    /// [`SwisClient::read_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn read(&self, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.read_ctx(&RequestContext::background(), uri).await
    }

    /// Update properties of an entity
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn update_ctx(
        &self,
        ctx: &RequestContext,
        uri: &str,
        properties: &Map<String, Value>,
    ) -> Result<Vec<u8>, SwisError> {
        self.http.post(ctx, uri, properties).await
    }

    /// [`SwisClient::update_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn update(&self, uri: &str, properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError> {
        self.update_ctx(&RequestContext::background(), uri, properties).await
    }

    /// Delete an entity by URI
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn delete_ctx(&self, ctx: &RequestContext, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.http.delete(ctx, uri).await
    }

    /// [`SwisClient::delete_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn delete(&self, uri: &str) -> Result<Vec<u8>, SwisError> {
        self.delete_ctx(&RequestContext::background(), uri).await
    }

    /// Delete several entities in one request
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn bulk_delete_ctx(&self, ctx: &RequestContext, uris: &[String]) -> Result<Vec<u8>, SwisError> {
        self.http.post(ctx, "BulkDelete", &BulkDeleteRequest { uris }).await
    }

    /// [`SwisClient::bulk_delete_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn bulk_delete(&self, uris: &[String]) -> Result<Vec<u8>, SwisError> {
        self.bulk_delete_ctx(&RequestContext::background(), uris).await
    }

    /// Apply the same property changes to several entities
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn bulk_update_ctx(
        &self,
        ctx: &RequestContext,
        uris: &[String],
        properties: &Map<String, Value>,
    ) -> Result<Vec<u8>, SwisError> {
        self.http
            .post(ctx, "BulkUpdate", &BulkUpdateRequest { uris, properties })
            .await
    }

    /// [`SwisClient::bulk_update_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn bulk_update(&self, uris: &[String], properties: &Map<String, Value>) -> Result<Vec<u8>, SwisError> {
        self.bulk_update_ctx(&RequestContext::background(), uris, properties).await
    }

    /// Invoke a verb on an entity
    ///
    /// # Arguments
    /// * `entity` - e.g. `IPAM.SubnetManagement`
    /// * `verb` - e.g. `GetFirstAvailableIp`
    /// * `body` - Verb arguments, usually a JSON array
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn invoke_ctx<B>(
        &self,
        ctx: &RequestContext,
        entity: &str,
        verb: &str,
        body: &B,
    ) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.http.post(ctx, &format!("Invoke/{entity}/{verb}"), body).await
    }

    /// [`SwisClient::invoke_ctx`] without cancellation
    ///
    /// # Errors
    /// See [`HttpClient::execute`].
    pub async fn invoke<B>(&self, entity: &str, verb: &str, body: &B) -> Result<Vec<u8>, SwisError>
    where
        B: Serialize + ?Sized,
    {
        self.invoke_ctx(&RequestContext::background(), entity, verb, body).await
    }
}
