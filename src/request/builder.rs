//! Request construction for a single page fetch

use crate::config::MatomoConfig;
use crate::pagination::Cursor;
use crate::streams::StreamDefinition;
use crate::types::{pair_value, Method, Pairs};

/// Value of the fixed `module` selector
pub const API_MODULE: &str = "API";

/// Content type of every request
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Body field carrying the auth token
pub const TOKEN_FIELD: &str = "token_auth";

/// Everything the transport needs to issue one request
#[derive(Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method (always POST for Matomo)
    pub method: Method,
    /// Absolute target URL
    pub url: String,
    /// Request headers
    pub headers: Pairs,
    /// Query string parameters, in send order
    pub query: Pairs,
    /// Form-encoded body fields
    pub form: Pairs,
}

impl RequestDescriptor {
    /// First query value for `key`
    pub fn query_value(&self, key: &str) -> Option<&str> {
        pair_value(&self.query, key)
    }

    /// First header value for `key` (case-insensitive)
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    /// First form value for `key`
    pub fn form_value(&self, key: &str) -> Option<&str> {
        pair_value(&self.form, key)
    }
}

impl std::fmt::Debug for RequestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let form: Vec<(&str, &str)> = self
            .form
            .iter()
            .map(|(k, v)| {
                if k == TOKEN_FIELD {
                    (k.as_str(), "<redacted>")
                } else {
                    (k.as_str(), v.as_str())
                }
            })
            .collect();
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("form", &form)
            .finish()
    }
}

/// Builds page requests from the fetch configuration
///
/// Pure: the same configuration and cursor always yield the same request.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    config: MatomoConfig,
    path: String,
    replication_key: Option<String>,
}

impl RequestBuilder {
    /// Create a builder for the configured endpoint
    pub fn new(config: &MatomoConfig) -> Self {
        Self {
            config: config.clone(),
            path: String::new(),
            replication_key: None,
        }
    }

    /// Create a builder for a declared stream (path and replication key)
    pub fn for_stream(config: &MatomoConfig, stream: &StreamDefinition) -> Self {
        Self::new(config)
            .with_path(stream.path.clone())
            .with_replication_key(stream.replication_key.clone())
    }

    /// Set the path appended to the base URL
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Request ascending sort on this key
    #[must_use]
    pub fn with_replication_key(mut self, key: Option<String>) -> Self {
        self.replication_key = key.filter(|k| !k.is_empty());
        self
    }

    /// The configuration requests are built from
    pub fn config(&self) -> &MatomoConfig {
        &self.config
    }

    /// Target URL
    pub fn url(&self) -> String {
        let base = self.config.api_url.trim();
        if self.path.is_empty() {
            return base.to_string();
        }
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            self.path.trim_start_matches('/')
        )
    }

    /// Headers sent with every page
    pub fn headers(&self) -> Pairs {
        vec![("Content-Type".to_string(), FORM_CONTENT_TYPE.to_string())]
    }

    /// Query parameters for a page at `cursor`
    pub fn query_params(&self, cursor: Option<&Cursor>) -> Pairs {
        let config = &self.config;
        let mut params: Pairs = vec![
            ("module".to_string(), API_MODULE.to_string()),
            ("method".to_string(), config.method.clone()),
            ("idSite".to_string(), config.id_site.clone()),
            ("period".to_string(), config.period.clone()),
            ("date".to_string(), config.date().to_string()),
            ("format".to_string(), config.format.clone()),
            ("filter_limit".to_string(), config.filter_limit.as_query_value()),
        ];

        if let Some(cursor) = cursor {
            params.push((cursor.query_param().to_string(), cursor.query_value()));
        }

        if let Some(key) = &self.replication_key {
            params.push(("sort".to_string(), "asc".to_string()));
            params.push(("order_by".to_string(), key.clone()));
        }

        params
    }

    /// Form body (the auth token)
    pub fn body(&self) -> Pairs {
        vec![(TOKEN_FIELD.to_string(), self.config.token_auth.clone())]
    }

    /// Complete request for a page at `cursor`
    pub fn build(&self, cursor: Option<&Cursor>) -> RequestDescriptor {
        RequestDescriptor {
            method: Method::POST,
            url: self.url(),
            headers: self.headers(),
            query: self.query_params(cursor),
            form: self.body(),
        }
    }
}
