//! Product edit session
//!
//! One session per open editor. It owns the image list and the form, and
//! runs the submit sequence: validate, upload pending images, reconcile,
//! assemble, save.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use shared::models::{Product, ProductForm, ProductLine, ProductPayload, resolve_display_url};

use super::assemble::assemble;
use super::preview::PreviewRegistry;
use super::reconcile::{ImageUploader, ReconcilePolicy, UploadReconciler};
use super::slot::{Direction, ImageSlot, ImageSlotList, PendingFile};
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Product save endpoint
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Create when `product_id` is `None`, update otherwise
    async fn save(
        &self,
        line: ProductLine,
        product_id: Option<&str>,
        payload: &ProductPayload,
    ) -> ClientResult<()>;
}

/// Whether the session creates or updates a product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditMode {
    Add,
    Edit { product_id: String },
}

impl EditMode {
    pub fn product_id(&self) -> Option<&str> {
        match self {
            EditMode::Add => None,
            EditMode::Edit { product_id } => Some(product_id),
        }
    }
}

/// Shared "submit in flight" flag for the host UI
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Set the flag; `None` if it is already set
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Clears the busy flag on drop
#[derive(Debug)]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Outcome of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitReport {
    /// Image list the product was saved with
    pub images: Vec<String>,
    /// Pending images uploaded and kept
    pub uploaded: usize,
    /// Pending images dropped because the upload returned no id for them
    pub dropped: usize,
}

/// Editor state for one product
#[derive(Debug)]
pub struct EditSession {
    line: ProductLine,
    mode: EditMode,
    form: ProductForm,
    slots: ImageSlotList,
    /// Images the product had when the session opened
    loaded_images: Vec<String>,
    reconciler: UploadReconciler,
    keep_loaded_images_when_empty: bool,
    busy: BusyFlag,
}

impl EditSession {
    /// Start a session for a new product, with an empty image list
    pub fn add(line: ProductLine, previews: PreviewRegistry) -> Self {
        tracing::debug!(%line, "Opening editor for a new product");
        Self {
            line,
            mode: EditMode::Add,
            form: ProductForm::default(),
            slots: ImageSlotList::new(previews),
            loaded_images: Vec::new(),
            reconciler: UploadReconciler::default(),
            keep_loaded_images_when_empty: false,
            busy: BusyFlag::new(),
        }
    }

    /// Start a session for an existing product
    ///
    /// The image list is seeded from `product.images`, in stored order.
    pub fn edit(line: ProductLine, product: &Product, previews: PreviewRegistry) -> Self {
        tracing::debug!(%line, id = %product.id, images = product.images.len(), "Opening editor");
        let mut slots = ImageSlotList::new(previews);
        slots.reset_from_existing(product.images.iter().cloned());
        Self {
            line,
            mode: EditMode::Edit {
                product_id: product.id.clone(),
            },
            form: ProductForm::from_product(product),
            slots,
            loaded_images: product.images.clone(),
            reconciler: UploadReconciler::default(),
            keep_loaded_images_when_empty: false,
            busy: BusyFlag::new(),
        }
    }

    /// Apply the reconcile policy and empty-list fallback from `config`
    pub fn configure(self, config: &ClientConfig) -> Self {
        self.with_policy(config.reconcile_policy)
            .with_empty_list_fallback(config.keep_previous_images_when_empty)
    }

    pub fn with_policy(mut self, policy: ReconcilePolicy) -> Self {
        self.reconciler = UploadReconciler::new(policy);
        self
    }

    /// Save the loaded images when the list is submitted empty
    pub fn with_empty_list_fallback(mut self, keep: bool) -> Self {
        self.keep_loaded_images_when_empty = keep;
        self
    }

    pub fn line(&self) -> ProductLine {
        self.line
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    pub fn form(&self) -> &ProductForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut ProductForm {
        &mut self.form
    }

    pub fn slots(&self) -> &ImageSlotList {
        &self.slots
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.reconciler.policy()
    }

    /// Flag the host UI watches to disable resubmission
    pub fn busy_flag(&self) -> BusyFlag {
        self.busy.clone()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    /// Display URL per slot, in list order
    ///
    /// Stored references resolve against `api_base`; pending slots show their
    /// preview URL.
    pub fn display_urls(&self, api_base: &str) -> Vec<Option<String>> {
        self.slots
            .iter()
            .map(|slot| match slot {
                ImageSlot::Existing(reference) => resolve_display_url(api_base, reference),
                ImageSlot::Pending { preview, .. } => Some(preview.url()),
            })
            .collect()
    }

    pub fn append_files<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = PendingFile>,
    {
        self.slots.append(files);
    }

    /// Read local files and append them as pending slots
    ///
    /// All files are read before anything is appended, so a failing read
    /// leaves the list unchanged.
    pub async fn append_paths<I, P>(&mut self, paths: I) -> ClientResult<usize>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut files = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let file = PendingFile::read(path).await.inspect_err(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read image");
            })?;
            files.push(file);
        }
        let count = files.len();
        self.slots.append(files);
        Ok(count)
    }

    pub fn move_image(&mut self, index: usize, direction: Direction) -> bool {
        self.slots.move_slot(index, direction)
    }

    pub fn remove_image(&mut self, index: usize) -> bool {
        self.slots.remove_at(index)
    }

    /// Upload pending images and save the product
    ///
    /// On success the image list is cleared and its previews released. On
    /// failure the list and form are left as they were so the admin can
    /// retry.
    pub async fn submit<U, S>(&mut self, uploader: &U, store: &S) -> ClientResult<SubmitReport>
    where
        U: ImageUploader + ?Sized,
        S: ProductStore + ?Sized,
    {
        let _guard = self.busy.try_acquire().ok_or(ClientError::SessionBusy)?;

        // Validate before anything goes over the wire
        let mut payload = self.form.to_payload(self.line, Vec::new())?;

        let reconciliation = self.reconciler.reconcile(&self.slots, uploader).await?;
        let mut images = assemble(&self.slots, &reconciliation);

        if images.is_empty() && self.keep_loaded_images_when_empty && !self.loaded_images.is_empty()
        {
            tracing::info!(
                images = self.loaded_images.len(),
                "Image list is empty, keeping the loaded images"
            );
            images = self.loaded_images.clone();
        }
        payload.images = images;

        store
            .save(self.line, self.mode.product_id(), &payload)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Product save failed"))?;

        let report = SubmitReport {
            images: payload.images,
            uploaded: reconciliation.resolved_count(),
            dropped: reconciliation.dropped_count(),
        };
        tracing::info!(
            line = %self.line,
            images = report.images.len(),
            uploaded = report.uploaded,
            dropped = report.dropped,
            "Product saved"
        );

        self.slots.clear();
        self.form = ProductForm::default();
        Ok(report)
    }

    /// End the session, releasing every preview
    pub fn close(self) {
        tracing::debug!(line = %self.line, pending = self.slots.pending_count(), "Editor closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::reconcile::tests::FakeUploader;
    use rust_decimal::Decimal;
    use std::sync::Mutex;

    /// Store double: records saves, optionally fails
    #[derive(Default)]
    struct FakeStore {
        saves: Mutex<Vec<(ProductLine, Option<String>, ProductPayload)>>,
        fail: bool,
    }

    impl FakeStore {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn saved(&self) -> Vec<(ProductLine, Option<String>, ProductPayload)> {
            self.saves.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProductStore for FakeStore {
        async fn save(
            &self,
            line: ProductLine,
            product_id: Option<&str>,
            payload: &ProductPayload,
        ) -> ClientResult<()> {
            if self.fail {
                return Err(ClientError::Internal("500 Internal Server Error".into()));
            }
            self.saves
                .lock()
                .unwrap()
                .push((line, product_id.map(String::from), payload.clone()));
            Ok(())
        }
    }

    fn product(images: &[&str]) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "665f1c2b9d3e4a0012ab34cd",
            "name": "Argan Oil Shampoo",
            "description": "Gentle daily shampoo",
            "price": 12.5,
            "images": images,
            "hairType": ["dry"],
            "concern": ["frizz"]
        }))
        .unwrap()
    }

    fn file(name: &str) -> PendingFile {
        PendingFile::new(name, vec![0xff, 0xd8])
    }

    #[test]
    fn test_add_starts_empty() {
        let session = EditSession::add(ProductLine::Skincare, PreviewRegistry::new());
        assert_eq!(session.mode(), &EditMode::Add);
        assert!(session.slots().is_empty());
        assert_eq!(session.form(), &ProductForm::default());
    }

    #[test]
    fn test_edit_seeds_existing_slots_in_order() {
        let session = EditSession::edit(
            ProductLine::Haircare,
            &product(&["b", "a", "/uploads/c.png"]),
            PreviewRegistry::new(),
        );
        assert_eq!(session.slots().existing_refs(), vec!["b", "a", "/uploads/c.png"]);
        assert_eq!(session.mode().product_id(), Some("665f1c2b9d3e4a0012ab34cd"));
        assert_eq!(session.form().name, "Argan Oil Shampoo");
    }

    #[test]
    fn test_display_urls() {
        let mut session = EditSession::edit(
            ProductLine::Haircare,
            &product(&["665f1c2b9d3e4a0012ab34cd", "/uploads/c.png"]),
            PreviewRegistry::new(),
        );
        session.append_files([file("new.jpg")]);
        let urls = session.display_urls("http://localhost:5000");
        assert_eq!(
            urls[0].as_deref(),
            Some("http://localhost:5000/api/image/665f1c2b9d3e4a0012ab34cd")
        );
        assert_eq!(urls[1].as_deref(), Some("http://localhost:5000/uploads/c.png"));
        assert!(urls[2].as_deref().unwrap().starts_with("preview://"));
    }

    #[tokio::test]
    async fn test_submit_interleaved() {
        let previews = PreviewRegistry::new();
        let mut session =
            EditSession::edit(ProductLine::Haircare, &product(&["A", "B"]), previews.clone());
        session.append_files([file("f1.jpg")]);
        assert!(session.move_image(2, Direction::Left));

        let uploader = FakeUploader::with_ids(&["x1"]);
        let store = FakeStore::default();
        let report = session.submit(&uploader, &store).await.unwrap();

        assert_eq!(report.images, vec!["A", "x1", "B"]);
        assert_eq!((report.uploaded, report.dropped), (1, 0));

        let saves = store.saved();
        assert_eq!(saves.len(), 1);
        let (line, id, payload) = &saves[0];
        assert_eq!(*line, ProductLine::Haircare);
        assert_eq!(id.as_deref(), Some("665f1c2b9d3e4a0012ab34cd"));
        assert_eq!(payload.images, vec!["A", "x1", "B"]);
        assert_eq!(payload.price, Decimal::new(125, 1));

        assert!(session.slots().is_empty());
        assert_eq!(previews.live_count(), 0);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_submit_without_pending_skips_upload() {
        let mut session =
            EditSession::edit(ProductLine::Haircare, &product(&["A", "B"]), PreviewRegistry::new());
        let uploader = FakeUploader::with_ids(&["unused"]);
        let store = FakeStore::default();

        let report = session.submit(&uploader, &store).await.unwrap();
        assert_eq!(report.images, vec!["A", "B"]);
        assert_eq!(uploader.calls(), 0);
    }

    #[tokio::test]
    async fn test_upload_failure_leaves_state_untouched() {
        let previews = PreviewRegistry::new();
        let mut session =
            EditSession::edit(ProductLine::Haircare, &product(&["A"]), previews.clone());
        session.append_files([file("f1.jpg"), file("f2.jpg")]);
        session.form_mut().name = "Renamed".into();

        let uploader = FakeUploader::with_ids(&[]);
        let store = FakeStore::default();
        let err = session.submit(&uploader, &store).await.unwrap_err();

        assert!(matches!(err, ClientError::UploadReconciliation { pending: 2 }));
        assert!(store.saved().is_empty());
        assert_eq!(session.slots().len(), 3);
        assert_eq!(session.form().name, "Renamed");
        assert_eq!(previews.live_count(), 2);
        assert!(!session.is_busy());
    }

    #[tokio::test]
    async fn test_partial_upload_degrades_or_aborts() {
        let mut session =
            EditSession::edit(ProductLine::Haircare, &product(&["A"]), PreviewRegistry::new());
        session.append_files([file("f1.jpg"), file("f2.jpg")]);
        let uploader = FakeUploader::with_ids(&["x1"]);
        let store = FakeStore::default();

        let mut strict = EditSession::edit(
            ProductLine::Haircare,
            &product(&["A"]),
            PreviewRegistry::new(),
        )
        .with_policy(ReconcilePolicy::Strict);
        strict.append_files([file("f1.jpg"), file("f2.jpg")]);
        let err = strict.submit(&uploader, &store).await.unwrap_err();
        assert!(matches!(err, ClientError::PartialReconciliation { .. }));
        assert_eq!(strict.slots().pending_count(), 2);

        let report = session.submit(&uploader, &store).await.unwrap();
        assert_eq!(report.images, vec!["A", "x1"]);
        assert_eq!(report.dropped, 1);
    }

    #[tokio::test]
    async fn test_invalid_form_rejected_before_upload() {
        let mut session = EditSession::add(ProductLine::Skincare, PreviewRegistry::new());
        session.append_files([file("f1.jpg")]);
        session.form_mut().name = "Vitamin C Serum".into();
        session.form_mut().price = "twelve".into();

        let uploader = FakeUploader::with_ids(&["x1"]);
        let err = session
            .submit(&uploader, &FakeStore::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Model(_)));
        assert_eq!(uploader.calls(), 0);
        assert_eq!(session.slots().len(), 1);
    }

    #[tokio::test]
    async fn test_save_failure_keeps_slots() {
        let mut session = EditSession::add(ProductLine::Skincare, PreviewRegistry::new());
        session.form_mut().name = "Vitamin C Serum".into();
        session.form_mut().price = "30".into();
        session.append_files([file("f1.jpg")]);

        let err = session
            .submit(&FakeUploader::with_ids(&["x1"]), &FakeStore::failing())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Internal(_)));
        assert_eq!(session.slots().pending_count(), 1);
    }

    #[tokio::test]
    async fn test_add_mode_creates() {
        let mut session = EditSession::add(ProductLine::Skincare, PreviewRegistry::new());
        session.form_mut().name = "Vitamin C Serum".into();
        session.form_mut().price = "30".into();
        session.form_mut().skin_type = "oily, dry".into();

        let store = FakeStore::default();
        let report = session
            .submit(&FakeUploader::with_ids(&[]), &store)
            .await
            .unwrap();
        assert!(report.images.is_empty());

        let (line, id, payload) = store.saved().remove(0);
        assert_eq!(line, ProductLine::Skincare);
        assert!(id.is_none());
        assert_eq!(payload.skin_type, Some(vec!["oily".into(), "dry".into()]));
        assert!(payload.hair_type.is_none());
    }

    #[tokio::test]
    async fn test_empty_list_fallback() {
        let loaded = product(&["A", "B"]);
        let store = FakeStore::default();
        let uploader = FakeUploader::with_ids(&[]);

        let mut session = EditSession::edit(ProductLine::Haircare, &loaded, PreviewRegistry::new())
            .configure(&ClientConfig::default().with_empty_list_fallback(true));
        session.remove_image(0);
        session.remove_image(0);
        let report = session.submit(&uploader, &store).await.unwrap();
        assert_eq!(report.images, vec!["A", "B"]);

        let mut session = EditSession::edit(ProductLine::Haircare, &loaded, PreviewRegistry::new());
        session.remove_image(0);
        session.remove_image(0);
        let report = session.submit(&uploader, &store).await.unwrap();
        assert!(report.images.is_empty());
    }

    #[tokio::test]
    async fn test_busy_flag_rejects_resubmit() {
        let mut session =
            EditSession::edit(ProductLine::Haircare, &product(&["A"]), PreviewRegistry::new());
        let flag = session.busy_flag();
        let guard = flag.try_acquire().unwrap();
        assert!(session.is_busy());

        let err = session
            .submit(&FakeUploader::with_ids(&[]), &FakeStore::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::SessionBusy));

        drop(guard);
        assert!(!flag.is_busy());
        assert!(
            session
                .submit(&FakeUploader::with_ids(&[]), &FakeStore::default())
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn test_append_paths_is_all_or_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("front.png");
        std::fs::write(&good, [0x89, b'P', b'N', b'G']).unwrap();
        let missing = dir.path().join("missing.png");

        let mut session = EditSession::add(ProductLine::Haircare, PreviewRegistry::new());
        let err = session.append_paths([&good, &missing]).await.unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
        assert!(session.slots().is_empty());

        assert_eq!(session.append_paths([&good]).await.unwrap(), 1);
        let file = session.slots().get(0).unwrap().pending_file().unwrap();
        assert_eq!(file.file_name, "front.png");
        assert_eq!(file.content_type, "image/png");
    }

    #[test]
    fn test_close_releases_previews() {
        let previews = PreviewRegistry::new();
        let mut session = EditSession::add(ProductLine::Haircare, previews.clone());
        session.append_files([file("a.jpg"), file("b.jpg")]);
        assert_eq!(previews.live_count(), 2);
        session.close();
        assert_eq!(previews.live_count(), 0);
    }
}
