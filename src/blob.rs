//! Object URLs for in-memory previews
//!
//! The logo SVG is exposed as a `blob:` URL so a viewer can load it like any
//! other image. Registering a blob hands back an [`ObjectUrl`]; the blob stays
//! alive until that handle is revoked. Nothing revokes it automatically, the
//! component displaying the preview decides when it is done.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use url::Url;
use uuid::Uuid;

/// Binary payload with its MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub mime: String,
    pub data: Vec<u8>,
}

impl Blob {
    pub fn new(mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        Self {
            mime: mime.into(),
            data: data.into(),
        }
    }
}

/// Shared store of blobs addressable by `blob:` URL
///
/// Cloning the registry shares the same store.
#[derive(Debug, Clone, Default)]
pub struct ObjectUrlRegistry {
    blobs: Arc<Mutex<HashMap<String, Blob>>>,
}

/// A registered object URL. Must be released with [`ObjectUrl::revoke`].
#[must_use = "object URLs stay registered until revoked"]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a blob under a fresh `blob:<origin>/<uuid>` URL
    pub fn create(&self, origin: &Url, blob: Blob) -> ObjectUrl {
        let url = format!(
            "blob:{}/{}",
            origin.origin().ascii_serialization(),
            Uuid::new_v4()
        );
        ::log::trace!("Registered {} ({} bytes of {})", url, blob.data.len(), blob.mime);
        self.lock().insert(url.clone(), blob);
        ObjectUrl { url }
    }

    /// Blob registered under `url`, if it has not been revoked
    pub fn resolve(&self, url: &str) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    /// Releases the blob behind `url`. Returns `false` if it was not registered.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.lock().remove(url).is_some();
        if removed {
            ::log::trace!("Revoked {}", url);
        }
        removed
    }

    /// Number of live object URLs
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Blob>> {
        self.blobs.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ObjectUrl {
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// Releases the blob this URL points to
    pub fn revoke(self, registry: &ObjectUrlRegistry) -> bool {
        registry.revoke(&self.url)
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn origin() -> Url {
        Url::parse("https://example.com/products/index.html").unwrap()
    }

    #[test]
    fn test_create_resolve_revoke() {
        let registry = ObjectUrlRegistry::new();
        let url = registry.create(&origin(), Blob::new("image/svg+xml", "<svg/>"));

        assert!(url.as_str().starts_with("blob:https://example.com/"));
        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.resolve(url.as_str()).map(|b| b.mime),
            Some("image/svg+xml".to_string())
        );

        let key = url.as_str().to_string();
        assert!(url.revoke(&registry));
        assert!(registry.resolve(&key).is_none());
        assert!(registry.is_empty());
        assert!(!registry.revoke(&key));
    }

    #[test]
    fn test_clones_share_the_store() {
        let registry = ObjectUrlRegistry::new();
        let viewer = registry.clone();
        let url = registry.create(&origin(), Blob::new("image/svg+xml", "<svg/>"));

        assert!(viewer.resolve(url.as_str()).is_some());
        assert!(url.revoke(&viewer));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_urls_are_unique() {
        let registry = ObjectUrlRegistry::new();
        let a = registry.create(&origin(), Blob::new("text/plain", "a"));
        let b = registry.create(&origin(), Blob::new("text/plain", "b"));
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        let _ = a.revoke(&registry);
        let _ = b.revoke(&registry);
    }
}
