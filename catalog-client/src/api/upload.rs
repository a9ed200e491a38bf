//! Network implementations of the editor's upload and save endpoints

use async_trait::async_trait;
use shared::models::{ProductLine, ProductPayload};

use super::CatalogClient;
use crate::editor::{ImageUploader, PendingFile, ProductStore, UploadBatchResult};
use crate::error::{ClientError, ClientResult};
use crate::http::{FilePart, HttpClient};

const UPLOAD_PATH: &str = "api/upload";

/// Multipart field of a single offer/banner image
const OFFER_IMAGE_FIELD: &str = "image";

impl<H: HttpClient> CatalogClient<H> {
    /// Upload one offer banner image
    ///
    /// Any non-2xx status is an error. A success body is not required to
    /// carry an id; the first one found is returned when present.
    pub async fn upload_offer_image(&self, file: PendingFile) -> ClientResult<Option<String>> {
        let file_name = file.file_name.clone();
        let part = FilePart {
            field: OFFER_IMAGE_FIELD.to_string(),
            file_name: file.file_name,
            content_type: file.content_type,
            bytes: file.bytes,
        };

        let result = self
            .http
            .post_multipart::<UploadBatchResult>(UPLOAD_PATH, vec![part])
            .await;
        let id = match result {
            Ok(batch) => batch.into_identifiers().into_iter().flatten().next(),
            Err(ClientError::Serialization(e)) => {
                tracing::warn!(error = %e, "Offer image upload returned a non-JSON body");
                None
            }
            Err(e) => {
                tracing::error!(file_name = %file_name, error = %e, "Offer image upload failed");
                return Err(e);
            }
        };
        tracing::info!(file_name = %file_name, id = ?id, "Offer image uploaded");
        Ok(id)
    }
}

#[async_trait]
impl<H: HttpClient> ImageUploader for CatalogClient<H> {
    /// One multipart POST; every file goes under the same field, in order
    async fn upload_batch(&self, files: Vec<PendingFile>) -> ClientResult<UploadBatchResult> {
        let parts: Vec<FilePart> = files
            .into_iter()
            .map(|file| FilePart {
                field: self.upload_field.clone(),
                file_name: file.file_name,
                content_type: file.content_type,
                bytes: file.bytes,
            })
            .collect();
        tracing::debug!(files = parts.len(), field = %self.upload_field, "Posting upload batch");
        self.http.post_multipart(UPLOAD_PATH, parts).await
    }
}

#[async_trait]
impl<H: HttpClient> ProductStore for CatalogClient<H> {
    async fn save(
        &self,
        line: ProductLine,
        product_id: Option<&str>,
        payload: &ProductPayload,
    ) -> ClientResult<()> {
        match product_id {
            Some(id) => self.update_product(line, id, payload).await,
            None => self.create_product(line, payload).await,
        }
    }
}
