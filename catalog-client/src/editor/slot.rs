//! Ordered image slots of the product being edited
//!
//! A slot is either an image the server already stores or a local file
//! waiting to be uploaded. The list order is the display order the product
//! will be saved with. Index operations come from the rendered list, so an
//! out-of-range index is a silent no-op rather than an error.

use std::path::Path;

use super::preview::{PreviewHandle, PreviewInfo, PreviewRegistry};
use crate::error::ClientResult;

/// A locally selected file waiting for upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PendingFile {
    /// Wrap in-memory file content; the content type is guessed from the name
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    /// Override the guessed content type
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    /// Read a file from disk
    pub async fn read(path: impl AsRef<Path>) -> ClientResult<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }

    fn preview_info(&self) -> PreviewInfo {
        PreviewInfo {
            file_name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len(),
        }
    }
}

/// Kind of a slot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Existing,
    Pending,
}

/// One entry of the image list
#[derive(Debug)]
pub enum ImageSlot {
    /// Reference stored by the server, passed through unchanged
    Existing(String),
    /// Local file plus its display-only preview
    Pending {
        file: PendingFile,
        preview: PreviewHandle,
    },
}

impl ImageSlot {
    pub fn kind(&self) -> SlotKind {
        match self {
            ImageSlot::Existing(_) => SlotKind::Existing,
            ImageSlot::Pending { .. } => SlotKind::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.kind() == SlotKind::Pending
    }

    pub fn existing_ref(&self) -> Option<&str> {
        match self {
            ImageSlot::Existing(reference) => Some(reference),
            ImageSlot::Pending { .. } => None,
        }
    }

    pub fn pending_file(&self) -> Option<&PendingFile> {
        match self {
            ImageSlot::Existing(_) => None,
            ImageSlot::Pending { file, .. } => Some(file),
        }
    }

    /// Preview URL of a pending slot
    pub fn preview_url(&self) -> Option<String> {
        match self {
            ImageSlot::Existing(_) => None,
            ImageSlot::Pending { preview, .. } => Some(preview.url()),
        }
    }
}

/// Neighbour to swap with in [`ImageSlotList::move_slot`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    fn offset(self) -> isize {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }
}

/// Ordered image list of one editor session
///
/// Never merges or deduplicates entries.
#[derive(Debug, Default)]
pub struct ImageSlotList {
    slots: Vec<ImageSlot>,
    previews: PreviewRegistry,
}

impl ImageSlotList {
    pub fn new(previews: PreviewRegistry) -> Self {
        Self {
            slots: Vec::new(),
            previews,
        }
    }

    /// Replace the contents with one existing slot per reference, in order
    ///
    /// Previews of any pending slots being replaced are released.
    pub fn reset_from_existing<I, S>(&mut self, refs: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.slots = refs
            .into_iter()
            .map(|r| ImageSlot::Existing(r.into()))
            .collect();
    }

    /// Append one pending slot per file, in input order
    pub fn append<I>(&mut self, files: I)
    where
        I: IntoIterator<Item = PendingFile>,
    {
        for file in files {
            let preview = self.previews.acquire(file.preview_info());
            self.slots.push(ImageSlot::Pending { file, preview });
        }
    }

    /// Swap the slot at `index` with its neighbour
    ///
    /// Returns `false` (and changes nothing) when either index is out of range.
    pub fn move_slot(&mut self, index: usize, direction: Direction) -> bool {
        let Some(target) = index.checked_add_signed(direction.offset()) else {
            return false;
        };
        if index >= self.slots.len() || target >= self.slots.len() {
            return false;
        }
        self.slots.swap(index, target);
        true
    }

    /// Remove the slot at `index`, releasing its preview
    ///
    /// Returns `false` when `index` is out of range.
    pub fn remove_at(&mut self, index: usize) -> bool {
        if index >= self.slots.len() {
            return false;
        }
        let removed = self.slots.remove(index);
        tracing::debug!(index, kind = ?removed.kind(), "Image slot removed");
        true
    }

    /// Remove every slot, releasing all previews
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageSlot> {
        self.slots.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageSlot> {
        self.slots.iter()
    }

    pub fn pending_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_pending()).count()
    }

    /// Existing references in list order
    pub fn existing_refs(&self) -> Vec<&str> {
        self.slots.iter().filter_map(ImageSlot::existing_ref).collect()
    }

    /// Pending files in list order (the upload order)
    pub fn pending_files(&self) -> Vec<PendingFile> {
        self.slots
            .iter()
            .filter_map(ImageSlot::pending_file)
            .cloned()
            .collect()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }
}

impl<'a> IntoIterator for &'a ImageSlotList {
    type Item = &'a ImageSlot;
    type IntoIter = std::slice::Iter<'a, ImageSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
