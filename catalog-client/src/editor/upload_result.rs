//! Batch upload response shapes
//!
//! The upload endpoint has answered in several shapes over time. They are
//! all accepted here and normalized into one positional identifier list:
//! entry `i` belongs to the `i`-th uploaded file, `None` where the server
//! gave no usable identifier for that position.

use serde::Deserialize;
use serde_json::Value;

/// Upload response, one variant per accepted shape
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UploadBatchResult {
    /// `{ "files": [ {"id": ..}, "id", .. ] }`
    Files { files: Vec<UploadedFile> },
    /// `{ "files": "id" }`
    SingleFile { files: String },
    /// `{ "ids": [ .. ] }`
    Ids { ids: Vec<UploadedFile> },
    /// `{ "fileId": "id" }` or `{ "file_id": "id" }`
    FileId {
        #[serde(rename = "fileId", alias = "file_id")]
        file_id: String,
    },
    /// Any accepted shape wrapped as `{ "data": .. }`
    Envelope { data: Box<UploadBatchResult> },
    /// Bare array of ids or id objects
    List(Vec<UploadedFile>),
    /// Bare id string
    Single(String),
    /// Anything else
    Unrecognized(Value),
}

/// One entry of an uploaded-files list
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UploadedFile {
    Id(String),
    Record(FileRecord),
    Other(Value),
}

/// Identifier object; the first present key wins, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FileRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default, rename = "fileId")]
    pub file_id_camel: Option<String>,
    #[serde(default)]
    pub file_id: Option<String>,
    #[serde(default, rename = "_id")]
    pub object_id: Option<ObjectIdValue>,
}

/// `_id` as a plain string or extended JSON `{ "$oid": ".." }`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ObjectIdValue {
    Plain(String),
    Extended {
        #[serde(rename = "$oid")]
        oid: String,
    },
}

impl FileRecord {
    pub fn identifier(self) -> Option<String> {
        let object_id = self.object_id.map(|v| match v {
            ObjectIdValue::Plain(id) | ObjectIdValue::Extended { oid: id } => id,
        });
        [self.id, self.file_id_camel, self.file_id, object_id]
            .into_iter()
            .flatten()
            .find_map(non_blank)
    }
}

impl UploadedFile {
    pub fn into_identifier(self) -> Option<String> {
        match self {
            UploadedFile::Id(id) => non_blank(id),
            UploadedFile::Record(record) => record.identifier(),
            UploadedFile::Other(value) => {
                tracing::warn!(%value, "Upload entry without an identifier");
                None
            }
        }
    }
}

impl UploadBatchResult {
    /// Positional identifiers, one per returned entry
    ///
    /// An unrecognized shape yields an empty list.
    pub fn into_identifiers(self) -> Vec<Option<String>> {
        match self {
            UploadBatchResult::Files { files }
            | UploadBatchResult::Ids { ids: files }
            | UploadBatchResult::List(files) => {
                files.into_iter().map(UploadedFile::into_identifier).collect()
            }
            UploadBatchResult::SingleFile { files: id }
            | UploadBatchResult::FileId { file_id: id }
            | UploadBatchResult::Single(id) => vec![non_blank(id)],
            UploadBatchResult::Envelope { data } => data.into_identifiers(),
            UploadBatchResult::Unrecognized(value) => {
                tracing::warn!(%value, "Unknown upload response format");
                Vec::new()
            }
        }
    }
}

fn non_blank(id: String) -> Option<String> {
    let trimmed = id.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
