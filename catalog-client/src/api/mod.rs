//! Catalog API calls
//!
//! [`CatalogClient`] wraps an [`HttpClient`] and groups the endpoints the
//! admin console uses:
//! - [`auth`]: admin login and registration
//! - [`products`]: product CRUD per product line
//! - [`offers`]: discount offers
//! - [`upload`]: batch image upload and product save for the editor

pub mod auth;
pub mod offers;
pub mod products;
pub mod upload;

use crate::config::{ClientConfig, DEFAULT_UPLOAD_FIELD};
use crate::error::ClientResult;
use crate::http::{HttpClient, NetworkHttpClient};

/// Admin client for the catalog API
#[derive(Debug, Clone)]
pub struct CatalogClient<H: HttpClient = NetworkHttpClient> {
    http: H,
    upload_field: String,
}

impl CatalogClient<NetworkHttpClient> {
    /// Build a network client from `config`
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        let http = config.build_http_client()?;
        tracing::debug!(base_url = %http.base_url(), "Catalog client created");
        Ok(Self::new(http).with_upload_field(config.upload_field.clone()))
    }

    /// API origin without trailing slash
    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }
}

impl<H: HttpClient> CatalogClient<H> {
    pub fn new(http: H) -> Self {
        Self {
            http,
            upload_field: DEFAULT_UPLOAD_FIELD.to_string(),
        }
    }

    /// Multipart field every uploaded file is sent under
    pub fn with_upload_field(mut self, field: impl Into<String>) -> Self {
        self.upload_field = field.into();
        self
    }

    pub fn upload_field(&self) -> &str {
        &self.upload_field
    }

    pub fn http(&self) -> &H {
        &self.http
    }

    pub fn is_logged_in(&self) -> bool {
        self.http.token().is_some()
    }
}
