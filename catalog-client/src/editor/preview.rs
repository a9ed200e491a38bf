//! Local preview handles for pending images
//!
//! Every pending file gets a preview handle the host can render from. A
//! handle is released exactly once: when it is dropped. Slots own their
//! handles, so removing a slot, clearing the list or dropping the session
//! releases them.

use std::sync::Arc;

use dashmap::DashMap;
use uuid::Uuid;

/// URL scheme used for preview keys
pub const PREVIEW_SCHEME: &str = "preview://";

/// What a host needs to display a preview
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewInfo {
    pub file_name: String,
    pub content_type: String,
    pub size: usize,
}

/// Registry of live previews
///
/// Cloning shares the registry.
#[derive(Debug, Clone, Default)]
pub struct PreviewRegistry {
    live: Arc<DashMap<Uuid, PreviewInfo>>,
}

impl PreviewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a new preview handle
    pub fn acquire(&self, info: PreviewInfo) -> PreviewHandle {
        let id = Uuid::new_v4();
        tracing::trace!(%id, file_name = %info.file_name, "Preview acquired");
        self.live.insert(id, info);
        PreviewHandle {
            id,
            live: Arc::clone(&self.live),
        }
    }

    /// Number of previews not yet released
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// Look up a preview by its `preview://` URL
    pub fn lookup(&self, url: &str) -> Option<PreviewInfo> {
        let id = url.strip_prefix(PREVIEW_SCHEME)?;
        let id = Uuid::parse_str(id).ok()?;
        self.live.get(&id).map(|entry| entry.value().clone())
    }
}

/// Scoped preview resource; released on drop
pub struct PreviewHandle {
    id: Uuid,
    live: Arc<DashMap<Uuid, PreviewInfo>>,
}

impl PreviewHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display URL, resolvable through [`PreviewRegistry::lookup`]
    pub fn url(&self) -> String {
        format!("{}{}", PREVIEW_SCHEME, self.id)
    }
}

impl std::fmt::Debug for PreviewHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreviewHandle").field("id", &self.id).finish()
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        if self.live.remove(&self.id).is_some() {
            tracing::trace!(id = %self.id, "Preview released");
        } else {
            tracing::warn!(id = %self.id, "Preview already released");
        }
    }
}
