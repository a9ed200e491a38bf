//! Data models
//!
//! Catalog records as the API returns them, plus the payloads the admin
//! client sends back.

pub mod image_ref;
pub mod offer;
pub mod product;

// Re-exports
pub use image_ref::*;
pub use offer::*;
pub use product::*;
