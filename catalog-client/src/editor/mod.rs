//! Product image editor
//!
//! - [`slot`]: ordered list of stored and pending images
//! - [`reconcile`]: batch upload and positional id matching
//! - [`assemble`]: final list construction
//! - [`session`]: one open editor and its submit sequence

pub mod assemble;
pub mod preview;
pub mod reconcile;
pub mod session;
pub mod slot;
pub mod upload_result;

pub use assemble::assemble;
pub use preview::{PREVIEW_SCHEME, PreviewHandle, PreviewInfo, PreviewRegistry};
pub use reconcile::{ImageUploader, ReconcilePolicy, Reconciliation, UploadReconciler};
pub use session::{BusyFlag, BusyGuard, EditMode, EditSession, ProductStore, SubmitReport};
pub use slot::{Direction, ImageSlot, ImageSlotList, PendingFile, SlotKind};
pub use upload_result::{UploadBatchResult, UploadedFile};
