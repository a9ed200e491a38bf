//! Image Reference Model
//!
//! Products store their images as opaque strings: a 24-hex object id served
//! by the image endpoint, an absolute URL, or a path on the API origin.
//! Classification here is only used to build display URLs; the stored value
//! is never rewritten.

use serde::{Deserialize, Serialize};

/// Length of an object-id shaped reference
const OBJECT_ID_LEN: usize = 24;

/// Shape of a stored image reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageRefKind {
    /// 24 hex characters, served by `/api/image/{id}`
    ObjectId,
    /// `http://` or `https://` URL, used as-is
    AbsoluteUrl,
    /// Path starting with `/`, relative to the API origin
    RootRelative,
    /// Anything else, treated as a path below the API origin
    Relative,
}

impl ImageRefKind {
    /// Classify a stored reference
    pub fn classify(reference: &str) -> Self {
        if is_object_id(reference) {
            ImageRefKind::ObjectId
        } else if reference.starts_with("http://") || reference.starts_with("https://") {
            ImageRefKind::AbsoluteUrl
        } else if reference.starts_with('/') {
            ImageRefKind::RootRelative
        } else {
            ImageRefKind::Relative
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ImageRefKind::ObjectId => "object_id",
            ImageRefKind::AbsoluteUrl => "absolute_url",
            ImageRefKind::RootRelative => "root_relative",
            ImageRefKind::Relative => "relative",
        }
    }
}

impl std::fmt::Display for ImageRefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether `reference` is a 24-character hex object id (any case)
pub fn is_object_id(reference: &str) -> bool {
    reference.len() == OBJECT_ID_LEN && reference.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Build the URL a host should load to display `reference`
///
/// Returns `None` for an empty reference.
pub fn resolve_display_url(api_base: &str, reference: &str) -> Option<String> {
    if reference.is_empty() {
        return None;
    }
    let base = api_base.trim_end_matches('/');

    let url = match ImageRefKind::classify(reference) {
        ImageRefKind::ObjectId => format!("{}/api/image/{}", base, reference),
        ImageRefKind::AbsoluteUrl => reference.to_string(),
        ImageRefKind::RootRelative => format!("{}{}", base, reference),
        ImageRefKind::Relative => collapse_slashes(&format!("{}/{}", base, reference)),
    };
    Some(url)
}

/// Collapse repeated `/` in the path part, leaving the `scheme://` intact
fn collapse_slashes(url: &str) -> String {
    let (head, rest) = match url.find("://") {
        Some(pos) => url.split_at(pos + 3),
        None => ("", url),
    };

    let mut out = String::with_capacity(url.len());
    out.push_str(head);
    let mut prev_slash = false;
    for c in rest.chars() {
        if c == '/' && prev_slash {
            continue;
        }
        prev_slash = c == '/';
        out.push(c);
    }
    out
}
