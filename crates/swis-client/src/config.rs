//! Client configuration

use std::fmt;
use std::time::Duration;

use crate::error::{ErrorKind, SwisError};

/// User agent sent when none is configured
pub const DEFAULT_USER_AGENT: &str = concat!("swis-client/", env!("CARGO_PKG_VERSION"));

/// Connection and behaviour settings for a [`SwisClient`](crate::SwisClient).
///
/// Validated once when the client is built and never modified afterwards.
#[derive(Clone)]
pub struct Config {
    /// SolarWinds server hostname or IP
    pub host: String,
    /// Username for HTTP Basic authentication
    pub username: String,
    /// Password for HTTP Basic authentication
    pub password: String,
    /// Skip TLS certificate verification
    pub insecure_skip_verify: bool,
    /// Timeout applied to every HTTP request
    pub timeout: Duration,
    /// Maximum number of idle pooled connections per host
    pub max_idle_conns: usize,
    /// Retries after a transport failure (0 disables retrying).
    ///
    /// Signed so that values read from outside sources can be checked.
    pub max_retries: i32,
    /// Delay before each retry
    pub retry_delay: Duration,
    /// `User-Agent` header value
    pub user_agent: String,
    /// Span the client's events are recorded under
    pub span: Option<tracing::Span>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            insecure_skip_verify: false,
            timeout: Duration::from_secs(30),
            max_idle_conns: 10,
            max_retries: 3,
            retry_delay: Duration::from_secs(1),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            span: None,
        }
    }
}

impl Config {
    /// Default configuration with the three required fields set
    pub fn new(
        host: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry count
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: i32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the delay between retries
    #[must_use]
    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Skip (or enforce) TLS certificate verification
    #[must_use]
    pub fn with_insecure_skip_verify(mut self, insecure: bool) -> Self {
        self.insecure_skip_verify = insecure;
        self
    }

    /// Set the idle connection limit
    #[must_use]
    pub fn with_max_idle_conns(mut self, max_idle_conns: usize) -> Self {
        self.max_idle_conns = max_idle_conns;
        self
    }

    /// Set the `User-Agent` header
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Record client events under `span`
    #[must_use]
    pub fn with_span(mut self, span: tracing::Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// A validation error naming the first offending field.
    pub fn validate(&self) -> Result<(), SwisError> {
        let problem = if self.host.is_empty() {
            "host is required"
        } else if self.username.is_empty() {
            "username is required"
        } else if self.password.is_empty() {
            "password is required"
        } else if self.timeout.is_zero() {
            "timeout must be positive"
        } else if self.max_retries < 0 {
            "max retries cannot be negative"
        } else {
            return Ok(());
        };

        Err(SwisError::new(ErrorKind::Validation, "config", problem))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("host", &self.host)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("insecure_skip_verify", &self.insecure_skip_verify)
            .field("timeout", &self.timeout)
            .field("max_idle_conns", &self.max_idle_conns)
            .field("max_retries", &self.max_retries)
            .field("retry_delay", &self.retry_delay)
            .field("user_agent", &self.user_agent)
            .finish_non_exhaustive()
    }
}
