//! Tap configuration
//!
//! `MatomoConfig` is the immutable per-run fetch configuration. It is loaded
//! once (JSON, YAML or inline JSON), validated, and then handed by reference
//! to the request builder, paginator and HTTP client constructors.

use crate::error::{Error, Result, ResultExt};
use crate::types::{BackoffType, JsonValue, OptionStringExt};
use serde::{Deserialize, Deserializer};
use serde_json::json;
use std::path::Path;
use std::time::Duration;

/// Default Matomo API method
pub const DEFAULT_METHOD: &str = "Live.getLastVisitsDetails";

/// Default reporting period
pub const DEFAULT_PERIOD: &str = "day";

/// Default date expression
pub const DEFAULT_DATE: &str = "today";

/// Only supported output format
pub const DEFAULT_FORMAT: &str = "json";

/// Default page size when `filter_limit` is not configured
pub const DEFAULT_FILTER_LIMIT: u32 = 1000;

/// Default location of the continuation token for token-style pagination
pub const DEFAULT_NEXT_PAGE_PATH: &str = "$.next_page";

// ============================================================================
// Page Size
// ============================================================================

/// Page size requested through `filter_limit`
///
/// Matomo uses `-1` to mean "return every row"; that sentinel disables
/// pagination for the whole run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    /// At most this many rows per page
    Limited(u32),
    /// `filter_limit=-1`
    Unlimited,
}

impl Default for PageSize {
    fn default() -> Self {
        Self::Limited(DEFAULT_FILTER_LIMIT)
    }
}

impl PageSize {
    /// Parse the textual form used in config files (`"1000"`, `"-1"`)
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let value: i64 = raw
            .parse()
            .map_err(|_| Error::invalid_value("filter_limit", format!("'{raw}' is not an integer")))?;

        match value {
            -1 => Ok(Self::Unlimited),
            n if n > 0 => u32::try_from(n)
                .map(Self::Limited)
                .map_err(|_| Error::invalid_value("filter_limit", format!("{n} is too large"))),
            n => Err(Error::invalid_value(
                "filter_limit",
                format!("{n} is not a positive page size or -1"),
            )),
        }
    }

    /// Interpret a JSON value (string or integer)
    pub fn from_value(value: &JsonValue) -> Result<Self> {
        match value {
            JsonValue::Null => Ok(Self::default()),
            JsonValue::String(s) => Self::parse(s),
            JsonValue::Number(n) => Self::parse(&n.to_string()),
            other => Err(Error::invalid_value(
                "filter_limit",
                format!("expected a string or integer, got {other}"),
            )),
        }
    }

    /// Whether this is the "no limit" sentinel
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The row limit, if any
    pub fn limit(&self) -> Option<u32> {
        match self {
            Self::Limited(n) => Some(*n),
            Self::Unlimited => None,
        }
    }

    /// Value sent as the `filter_limit` query parameter
    pub fn as_query_value(&self) -> String {
        match self {
            Self::Limited(n) => n.to_string(),
            Self::Unlimited => "-1".to_string(),
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = JsonValue::deserialize(deserializer)?;
        Self::from_value(&value).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Pagination Style
// ============================================================================

/// Which pagination protocol the paginator speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaginationStyle {
    /// `filter_offset` running offset
    #[default]
    Offset,
    /// Opaque `page` token read from the previous response
    Token,
}

// ============================================================================
// HTTP Settings
// ============================================================================

/// Transport tuning
#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Retries for transient transport failures
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Backoff between retries
    #[serde(default)]
    pub backoff: BackoffType,

    /// Client-side rate limit (requests per second)
    #[serde(default)]
    pub requests_per_second: Option<u32>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            backoff: BackoffType::default(),
            requests_per_second: None,
        }
    }
}

impl HttpSettings {
    /// Request timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

// ============================================================================
// Matomo Config
// ============================================================================

/// Fetch configuration for one run
#[derive(Clone, Deserialize)]
pub struct MatomoConfig {
    /// Reporting API endpoint, e.g. `https://matomo.example.com/index.php`
    #[serde(default)]
    pub api_url: String,

    /// API token sent in the POST body
    #[serde(default, alias = "auth_token")]
    pub token_auth: String,

    /// Site id, or a comma separated list of ids
    #[serde(rename = "idSite", default, deserialize_with = "deserialize_site_ids")]
    pub id_site: String,

    /// API method, e.g. `Live.getLastVisitsDetails`
    #[serde(default = "default_method")]
    pub method: String,

    /// `day`, `week`, `month`, `year` or `range`
    #[serde(default = "default_period")]
    pub period: String,

    /// `YYYY-MM-DD`, a range, or a magic keyword like `yesterday`
    #[serde(default)]
    pub date: Option<String>,

    /// Response format requested from the API
    #[serde(default = "default_format")]
    pub format: String,

    /// Rows per page (`-1` disables pagination)
    #[serde(default)]
    pub filter_limit: PageSize,

    /// Pagination protocol
    #[serde(default)]
    pub pagination: PaginationStyle,

    /// JSONPath of the continuation token (token style only)
    #[serde(default = "default_next_page_path")]
    pub next_page_path: String,

    /// Transport settings
    #[serde(default)]
    pub http: HttpSettings,
}

fn default_method() -> String {
    DEFAULT_METHOD.to_string()
}

fn default_period() -> String {
    DEFAULT_PERIOD.to_string()
}

fn default_format() -> String {
    DEFAULT_FORMAT.to_string()
}

fn default_next_page_path() -> String {
    DEFAULT_NEXT_PAGE_PATH.to_string()
}

/// Accept `"1"`, `1`, `"1,4,5"` or `[1, 4, 5]`
fn deserialize_site_ids<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> std::result::Result<String, D::Error> {
    fn scalar(value: &JsonValue) -> Option<String> {
        match value {
            JsonValue::String(s) => Some(s.trim().to_string()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    let value = JsonValue::deserialize(deserializer)?;
    match &value {
        JsonValue::Null => Ok(String::new()),
        JsonValue::Array(items) => items
            .iter()
            .map(|item| {
                scalar(item).ok_or_else(|| {
                    <D::Error as serde::de::Error>::custom("idSite entries must be scalars")
                })
            })
            .collect::<std::result::Result<Vec<_>, _>>()
            .map(|ids| ids.join(",")),
        other => scalar(other)
            .ok_or_else(|| {
                <D::Error as serde::de::Error>::custom("idSite must be a string, integer or list")
            }),
    }
}

impl MatomoConfig {
    /// Parse config from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::config(format!("Invalid config JSON: {e}")))
    }

    /// Parse config from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::config(format!("Invalid config YAML: {e}")))
    }

    /// Parse config from an already-decoded JSON value
    pub fn from_value(value: JsonValue) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| Error::config(format!("Invalid config: {e}")))
    }

    /// Load config from a file; `.yaml`/`.yml` are read as YAML, anything else as JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        let parsed = if is_yaml {
            Self::from_yaml(&content)
        } else {
            Self::from_json(&content)
        };
        parsed.with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Check required values and formats before any request is built
    pub fn validate(&self) -> Result<()> {
        if self.api_url.trim().is_empty() {
            return Err(Error::missing_field("api_url"));
        }
        let url = url::Url::parse(self.api_url.trim())?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::invalid_value(
                "api_url",
                format!("unsupported scheme '{}'", url.scheme()),
            ));
        }

        if self.token_auth.trim().is_empty() {
            return Err(Error::missing_field("token_auth"));
        }
        if self.id_site.trim().is_empty() {
            return Err(Error::missing_field("idSite"));
        }
        if self.method.trim().is_empty() {
            return Err(Error::missing_field("method"));
        }
        if self.period.trim().is_empty() {
            return Err(Error::missing_field("period"));
        }
        if !self.format.eq_ignore_ascii_case(DEFAULT_FORMAT) {
            return Err(Error::invalid_value(
                "format",
                format!("only 'json' responses can be extracted, got '{}'", self.format),
            ));
        }
        if self.pagination == PaginationStyle::Token && !self.next_page_path.starts_with('$') {
            return Err(Error::invalid_value(
                "next_page_path",
                "must be a JSONPath starting with '$'",
            ));
        }

        Ok(())
    }

    /// Date expression sent to the API
    pub fn date(&self) -> &str {
        self.date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .unwrap_or(DEFAULT_DATE)
    }

    /// Whether `filter_limit=-1` turned pagination off
    pub fn is_pagination_disabled(&self) -> bool {
        self.filter_limit.is_unlimited()
    }

    /// Copy of this config with a different page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.filter_limit = page_size;
        self
    }

    /// Copy of this config with a different date expression
    #[must_use]
    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        let date: String = date.into();
        self.date = Some(date).none_if_blank();
        self
    }

    /// JSON Schema of the accepted configuration
    pub fn spec() -> JsonValue {
        json!({
            "$schema": "http://json-schema.org/draft-07/schema#",
            "title": "tap-matomo",
            "type": "object",
            "required": ["api_url", "token_auth", "idSite"],
            "properties": {
                "api_url": {
                    "type": "string",
                    "title": "API URL",
                    "description": "The url for the API service"
                },
                "token_auth": {
                    "type": "string",
                    "title": "Auth Token",
                    "description": "The token to authenticate against the API service (alias: auth_token)",
                    "secret": true
                },
                "idSite": {
                    "type": ["string", "integer"],
                    "title": "idSite",
                    "description": "The integer id of your website; a comma separated list such as 1,4,5,6 is also accepted"
                },
                "method": {
                    "type": "string",
                    "default": DEFAULT_METHOD,
                    "description": "The API method you want to call"
                },
                "period": {
                    "type": "string",
                    "default": DEFAULT_PERIOD,
                    "enum": ["day", "week", "month", "year", "range"],
                    "description": "The period you request the statistics for, in the website's time zone"
                },
                "date": {
                    "type": ["string", "null"],
                    "default": DEFAULT_DATE,
                    "description": "YYYY-MM-DD or a magic keyword: today, yesterday, lastWeek, lastMonth, lastYear"
                },
                "format": {
                    "type": "string",
                    "default": DEFAULT_FORMAT,
                    "description": "Output format requested from the API"
                },
                "filter_limit": {
                    "type": ["string", "integer"],
                    "default": DEFAULT_FILTER_LIMIT.to_string(),
                    "description": "Rows per page; -1 fetches everything in a single request"
                },
                "pagination": {
                    "type": "string",
                    "enum": ["offset", "token"],
                    "default": "offset",
                    "description": "Pagination protocol: filter_offset or a page token from the response"
                },
                "next_page_path": {
                    "type": "string",
                    "default": DEFAULT_NEXT_PAGE_PATH,
                    "description": "JSONPath of the continuation token (token pagination only)"
                },
                "http": {
                    "type": "object",
                    "properties": {
                        "timeout_secs": {"type": "integer", "default": 30},
                        "max_retries": {"type": "integer", "default": 3},
                        "backoff": {"type": "string", "enum": ["constant", "linear", "exponential"]},
                        "requests_per_second": {"type": ["integer", "null"]}
                    }
                }
            }
        })
    }
}

impl std::fmt::Debug for MatomoConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatomoConfig")
            .field("api_url", &self.api_url)
            .field("token_auth", &"<redacted>")
            .field("id_site", &self.id_site)
            .field("method", &self.method)
            .field("period", &self.period)
            .field("date", &self.date)
            .field("format", &self.format)
            .field("filter_limit", &self.filter_limit)
            .field("pagination", &self.pagination)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}
