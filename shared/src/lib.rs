//! Shared types for the catalog admin client
//!
//! Product records, image reference helpers, offer arithmetic and the auth
//! DTOs spoken by the catalog API. Used by `catalog-client` and anything else
//! that needs to read or build catalog payloads.

pub mod client;
pub mod error;
pub mod models;

// Re-exports
pub use error::{ValidationError, ValidationResult};
pub use models::{
    ImageRefKind, OfferRequest, OfferUpdate, Product, ProductForm, ProductLine,
    ProductListResponse, ProductPayload, ProductResponse,
};
pub use rust_decimal::Decimal;
pub use serde::{Deserialize, Serialize};
