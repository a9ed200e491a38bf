//! Final image list assembly

use super::reconcile::Reconciliation;
use super::slot::{ImageSlot, ImageSlotList};

/// Merge existing references and resolved upload ids into the saved list
///
/// Walks the slots in list order. Existing slots contribute their reference
/// unchanged; the `k`-th pending slot contributes the `k`-th resolved id, or
/// nothing when that position did not resolve.
pub fn assemble(slots: &ImageSlotList, reconciliation: &Reconciliation) -> Vec<String> {
    let mut images = Vec::with_capacity(slots.len());
    let mut pending_index = 0;

    for slot in slots {
        match slot {
            ImageSlot::Existing(reference) => images.push(reference.clone()),
            ImageSlot::Pending { file, .. } => {
                match reconciliation.resolution(pending_index) {
                    Some(id) => images.push(id.to_string()),
                    None => {
                        tracing::debug!(file_name = %file.file_name, "Dropping unresolved image");
                    }
                }
                pending_index += 1;
            }
        }
    }

    images
}
