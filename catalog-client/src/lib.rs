//! Catalog Client - admin client for the haircare/skincare catalog API
//!
//! Provides the HTTP calls an admin console needs (login, product CRUD,
//! offers, image upload) and the product image editor: an ordered list of
//! stored and pending images that is uploaded, reconciled and saved in one
//! submit.

pub mod api;
pub mod config;
pub mod editor;
pub mod error;
pub mod http;
pub mod logger;

pub use api::CatalogClient;
pub use config::ClientConfig;
pub use editor::{
    BusyFlag, Direction, EditMode, EditSession, ImageSlot, ImageSlotList, ImageUploader,
    PendingFile, PreviewHandle, PreviewRegistry, ProductStore, ReconcilePolicy, Reconciliation,
    SlotKind, SubmitReport, UploadBatchResult, UploadReconciler,
};
pub use error::{ClientError, ClientResult};
pub use http::{FilePart, HttpClient, NetworkHttpClient};

// Re-export shared types for convenience
pub use shared::client::{LoginRequest, LoginResponse, MessageResponse, RegisterRequest};
pub use shared::models::{
    OfferRequest, OfferUpdate, Product, ProductForm, ProductLine, ProductPayload,
};
