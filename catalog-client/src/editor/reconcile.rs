//! Upload reconciliation
//!
//! Uploads the pending slots of a list in one batch and maps the returned
//! identifiers back onto those slots by position. The response is matched
//! positionally, never by file name or content, so the submission order must
//! equal the list order of the pending slots.

use std::str::FromStr;

use async_trait::async_trait;

use super::slot::{ImageSlotList, PendingFile};
use super::upload_result::UploadBatchResult;
use crate::error::{ClientError, ClientResult};

/// Batch upload endpoint
#[async_trait]
pub trait ImageUploader: Send + Sync {
    /// Upload `files` in one request, preserving their order
    async fn upload_batch(&self, files: Vec<PendingFile>) -> ClientResult<UploadBatchResult>;
}

/// What to do when the upload returns fewer identifiers than files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReconcilePolicy {
    /// Resolve what came back in order, drop the unmatched tail, warn
    #[default]
    Degrade,
    /// Abort the submit
    Strict,
}

impl ReconcilePolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReconcilePolicy::Degrade => "degrade",
            ReconcilePolicy::Strict => "strict",
        }
    }
}

impl std::fmt::Display for ReconcilePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ReconcilePolicy {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "degrade" => Ok(ReconcilePolicy::Degrade),
            "strict" => Ok(ReconcilePolicy::Strict),
            other => Err(ClientError::Config(format!(
                "unknown reconcile policy '{}'",
                other
            ))),
        }
    }
}

/// Identifiers resolved for the pending slots of a list
///
/// Position `i` belongs to the `i`-th pending slot in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Reconciliation {
    resolved: Vec<Option<String>>,
}

impl Reconciliation {
    /// Nothing was pending
    pub fn empty() -> Self {
        Self::default()
    }

    /// Identifier for the `pending_index`-th pending slot, if one came back
    pub fn resolution(&self, pending_index: usize) -> Option<&str> {
        self.resolved.get(pending_index)?.as_deref()
    }

    pub fn pending_count(&self) -> usize {
        self.resolved.len()
    }

    pub fn resolved_count(&self) -> usize {
        self.resolved.iter().filter(|id| id.is_some()).count()
    }

    /// Pending slots that will not appear in the saved list
    pub fn dropped_count(&self) -> usize {
        self.pending_count() - self.resolved_count()
    }

    pub fn is_complete(&self) -> bool {
        self.dropped_count() == 0
    }
}

/// Drives the batch upload and matches identifiers to pending slots
#[derive(Debug, Clone, Copy, Default)]
pub struct UploadReconciler {
    policy: ReconcilePolicy,
}

impl UploadReconciler {
    pub fn new(policy: ReconcilePolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> ReconcilePolicy {
        self.policy
    }

    /// Upload the pending slots of `slots` and resolve their identifiers
    ///
    /// No request is made when nothing is pending. Any failure aborts with an
    /// error and leaves `slots` untouched.
    pub async fn reconcile<U>(
        &self,
        slots: &ImageSlotList,
        uploader: &U,
    ) -> ClientResult<Reconciliation>
    where
        U: ImageUploader + ?Sized,
    {
        let files = slots.pending_files();
        let pending = files.len();
        if pending == 0 {
            tracing::debug!("No pending images, skipping upload");
            return Ok(Reconciliation::empty());
        }

        tracing::info!(pending, "Uploading pending images");
        let batch = match uploader.upload_batch(files).await {
            Ok(batch) => batch,
            Err(ClientError::Serialization(e)) => {
                tracing::error!(pending, error = %e, "Upload response is not valid JSON");
                return Err(ClientError::UploadReconciliation { pending });
            }
            Err(e) => {
                tracing::error!(pending, error = %e, "Image upload failed");
                return Err(ClientError::UploadTransport(e.to_string()));
            }
        };

        self.match_identifiers(pending, batch.into_identifiers())
    }

    /// Match positional identifiers against `pending` slots
    pub fn match_identifiers(
        &self,
        pending: usize,
        mut identifiers: Vec<Option<String>>,
    ) -> ClientResult<Reconciliation> {
        if pending == 0 {
            if !identifiers.is_empty() {
                tracing::warn!(returned = identifiers.len(), "Upload ids without pending files");
            }
            return Ok(Reconciliation::empty());
        }
        if identifiers.len() > pending {
            tracing::warn!(
                pending,
                returned = identifiers.len(),
                "Upload returned more ids than files, ignoring the surplus"
            );
            identifiers.truncate(pending);
        }
        identifiers.resize(pending, None);

        let reconciliation = Reconciliation {
            resolved: identifiers,
        };
        let resolved = reconciliation.resolved_count();

        if resolved == 0 {
            tracing::error!(pending, "Upload did not return file ids");
            return Err(ClientError::UploadReconciliation { pending });
        }
        if resolved < pending {
            match self.policy {
                ReconcilePolicy::Strict => {
                    tracing::error!(pending, resolved, "Partial upload reconciliation");
                    return Err(ClientError::PartialReconciliation { pending, resolved });
                }
                ReconcilePolicy::Degrade => {
                    tracing::warn!(
                        pending,
                        resolved,
                        dropped = pending - resolved,
                        "Partial upload reconciliation, unmatched images are dropped"
                    );
                }
            }
        }

        Ok(reconciliation)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use super::super::slot::Direction;
    use std::sync::Mutex;

    /// Uploader double: records each batch's file names, replies with a fixed result
    pub(crate) struct FakeUploader {
        reply: Box<dyn Fn(usize) -> ClientResult<UploadBatchResult> + Send + Sync>,
        pub(crate) batches: Mutex<Vec<Vec<String>>>,
    }

    impl FakeUploader {
        pub(crate) fn replying(
            reply: impl Fn(usize) -> ClientResult<UploadBatchResult> + Send + Sync + 'static,
        ) -> Self {
            Self {
                reply: Box::new(reply),
                batches: Mutex::new(Vec::new()),
            }
        }

        pub(crate) fn with_ids(ids: &[&str]) -> Self {
            let value = serde_json::json!({ "ids": ids });
            Self::replying(move |_| Ok(serde_json::from_value(value.clone()).unwrap()))
        }

        pub(crate) fn calls(&self) -> usize {
            self.batches.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ImageUploader for FakeUploader {
        async fn upload_batch(&self, files: Vec<PendingFile>) -> ClientResult<UploadBatchResult> {
            let count = files.len();
            self.batches
                .lock()
                .unwrap()
                .push(files.into_iter().map(|f| f.file_name).collect());
            (self.reply)(count)
        }
    }

    fn list(existing: &[&str], pending: &[&str]) -> ImageSlotList {
        let mut list = ImageSlotList::default();
        list.reset_from_existing(existing.iter().copied());
        list.append(
            pending
                .iter()
                .map(|name| PendingFile::new(*name, vec![1, 2, 3])),
        );
        list
    }

    #[tokio::test]
    async fn test_no_pending_skips_upload() {
        let uploader = FakeUploader::with_ids(&["x"]);
        let result = UploadReconciler::default()
            .reconcile(&list(&["A", "B"], &[]), &uploader)
            .await
            .unwrap();
        assert_eq!(result, Reconciliation::empty());
        assert_eq!(uploader.calls(), 0);
    }

    #[tokio::test]
    async fn test_uploads_in_list_order() {
        let mut slots = list(&["A"], &["f1.png", "f2.png", "f3.png"]);
        slots.move_slot(3, Direction::Left);
        let uploader = FakeUploader::with_ids(&["x1", "x2", "x3"]);

        let result = UploadReconciler::default()
            .reconcile(&slots, &uploader)
            .await
            .unwrap();

        assert_eq!(
            uploader.batches.lock().unwrap()[0],
            vec!["f1.png", "f3.png", "f2.png"]
        );
        assert_eq!(result.resolution(1), Some("x2"));
        assert!(result.is_complete());
    }

    #[tokio::test]
    async fn test_transport_failure() {
        let uploader =
            FakeUploader::replying(|_| Err(ClientError::Internal("502 Bad Gateway".into())));
        let err = UploadReconciler::default()
            .reconcile(&list(&[], &["f1.png"]), &uploader)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UploadTransport(msg) if msg.contains("502")));
    }

    #[tokio::test]
    async fn test_malformed_body_is_reconciliation_failure() {
        let uploader = FakeUploader::replying(|_| {
            Err(serde_json::from_str::<serde_json::Value>("<html>")
                .unwrap_err()
                .into())
        });
        let err = UploadReconciler::default()
            .reconcile(&list(&[], &["f1.png", "f2.png"]), &uploader)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UploadReconciliation { pending: 2 }));
    }

    #[tokio::test]
    async fn test_empty_response_is_fatal() {
        let uploader = FakeUploader::with_ids(&[]);
        let err = UploadReconciler::default()
            .reconcile(&list(&[], &["f1.png", "f2.png"]), &uploader)
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::UploadReconciliation { pending: 2 }));
    }

    #[test]
    fn test_partial_degrades_positionally() {
        let result = UploadReconciler::new(ReconcilePolicy::Degrade)
            .match_identifiers(2, vec![Some("x1".into())])
            .unwrap();
        assert_eq!(result.resolution(0), Some("x1"));
        assert_eq!(result.resolution(1), None);
        assert_eq!(result.dropped_count(), 1);
    }

    #[test]
    fn test_partial_strict_aborts() {
        let err = UploadReconciler::new(ReconcilePolicy::Strict)
            .match_identifiers(2, vec![Some("x1".into())])
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::PartialReconciliation {
                pending: 2,
                resolved: 1
            }
        ));
    }

    #[test]
    fn test_surplus_is_ignored() {
        let result = UploadReconciler::default()
            .match_identifiers(1, vec![Some("x1".into()), Some("x2".into())])
            .unwrap();
        assert_eq!(result.pending_count(), 1);
        assert_eq!(result.resolution(1), None);
    }

    #[test]
    fn test_nothing_pending_matches_to_empty() {
        let reconciler = UploadReconciler::new(ReconcilePolicy::Strict);
        assert_eq!(
            reconciler.match_identifiers(0, Vec::new()).unwrap(),
            Reconciliation::empty()
        );
        assert_eq!(
            reconciler
                .match_identifiers(0, vec![Some("x1".into())])
                .unwrap(),
            Reconciliation::empty()
        );
    }

    #[test]
    fn test_all_positions_unresolved_is_fatal() {
        let err = UploadReconciler::default()
            .match_identifiers(2, vec![None, None])
            .unwrap_err();
        assert!(matches!(err, ClientError::UploadReconciliation { pending: 2 }));
    }

    #[test]
    fn test_policy_parsing() {
        assert_eq!("Strict".parse::<ReconcilePolicy>().unwrap(), ReconcilePolicy::Strict);
        assert_eq!(" degrade ".parse::<ReconcilePolicy>().unwrap(), ReconcilePolicy::Degrade);
        assert!("abort".parse::<ReconcilePolicy>().is_err());
    }
}
