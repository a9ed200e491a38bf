//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | CATALOG_API_BASE | http://localhost:5000 | API origin |
//! | CATALOG_TIMEOUT_SECS | 30 | Request timeout |
//! | CATALOG_TOKEN | - | Bearer token from a previous login |
//! | CATALOG_UPLOAD_FIELD | images | Multipart field name for uploads |
//! | CATALOG_RECONCILE_POLICY | degrade | `degrade` or `strict` |
//! | CATALOG_KEEP_IMAGES_WHEN_EMPTY | false | Save the loaded images when the editor list is empty |

use crate::editor::ReconcilePolicy;
use crate::error::ClientResult;
use crate::http::NetworkHttpClient;

/// Default API origin
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Default multipart field name for image uploads
pub const DEFAULT_UPLOAD_FIELD: &str = "images";

/// Client configuration for the catalog API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://localhost:5000")
    pub base_url: String,

    /// Bearer token for authenticated calls
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Multipart field every uploaded file is sent under
    pub upload_field: String,

    /// What a submit does when the upload returns fewer ids than files
    pub reconcile_policy: ReconcilePolicy,

    /// Save the product's loaded images when the editor list ends up empty
    pub keep_previous_images_when_empty: bool,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: 30,
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
            reconcile_policy: ReconcilePolicy::default(),
            keep_previous_images_when_empty: false,
        }
    }

    /// Load configuration from environment variables (and `.env` if present)
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    ///
    /// Unset or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config =
            Self::new(lookup("CATALOG_API_BASE").unwrap_or_else(|| DEFAULT_BASE_URL.into()));

        config.token = lookup("CATALOG_TOKEN").filter(|t| !t.is_empty());
        if let Some(timeout) = lookup("CATALOG_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            config.timeout = timeout;
        }
        if let Some(field) = lookup("CATALOG_UPLOAD_FIELD").filter(|f| !f.is_empty()) {
            config.upload_field = field;
        }
        if let Some(policy) = lookup("CATALOG_RECONCILE_POLICY") {
            match policy.parse() {
                Ok(policy) => config.reconcile_policy = policy,
                Err(_) => tracing::warn!(
                    value = %policy,
                    "Unknown CATALOG_RECONCILE_POLICY, keeping default"
                ),
            }
        }
        if let Some(keep) = lookup("CATALOG_KEEP_IMAGES_WHEN_EMPTY").and_then(|v| v.parse().ok())
        {
            config.keep_previous_images_when_empty = keep;
        }
        config
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the multipart field name for uploads
    pub fn with_upload_field(mut self, field: impl Into<String>) -> Self {
        self.upload_field = field.into();
        self
    }

    /// Set the partial reconciliation policy
    pub fn with_reconcile_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.reconcile_policy = policy;
        self
    }

    /// Keep the loaded images when the editor list is saved empty
    pub fn with_empty_list_fallback(mut self, keep: bool) -> Self {
        self.keep_previous_images_when_empty = keep;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<NetworkHttpClient> {
        NetworkHttpClient::from_config(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
