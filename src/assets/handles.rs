use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Encoded bytes plus their MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    /// Raw bytes.
    pub bytes: Arc<[u8]>,
    /// MIME type, e.g. `image/png`.
    pub mime: String,
}

impl Blob {
    /// Construct a blob.
    pub fn new(bytes: impl Into<Arc<[u8]>>, mime: impl Into<String>) -> Self {
        Self {
            bytes: bytes.into(),
            mime: mime.into(),
        }
    }

    /// Byte length.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for a zero-length blob.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Borrow the bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Short-lived `blob:` handle naming bytes held by an [`ObjectUrls`] registry.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectUrl(String);

impl ObjectUrl {
    /// URL scheme prefix.
    pub const SCHEME: &'static str = "blob:";

    /// Wrap a URL string. Fails when it is not a `blob:` URL.
    pub fn parse(s: &str) -> Option<Self> {
        s.starts_with(Self::SCHEME).then(|| Self(s.to_owned()))
    }

    /// Borrow as `&str`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Capability for tying bytes to short-lived URL handles.
///
/// The compositor allocates one URL per file-handle source and one for its result. It never revokes
/// them; that is the caller's job.
pub trait ObjectUrls: Send + Sync {
    /// Register `blob` and return a fresh URL for it.
    fn allocate(&self, blob: Blob) -> ObjectUrl;
    /// Look up a live URL.
    fn resolve(&self, url: &ObjectUrl) -> Option<Blob>;
    /// Release a URL. Returns `false` if it was not live.
    fn revoke(&self, url: &ObjectUrl) -> bool;
}

/// In-memory [`ObjectUrls`] implementation.
#[derive(Debug)]
pub struct BlobRegistry {
    origin: String,
    next: AtomicU64,
    live: Mutex<HashMap<ObjectUrl, Blob>>,
}

impl Default for BlobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlobRegistry {
    /// Registry issuing `blob:image-wire/<n>` URLs.
    pub fn new() -> Self {
        Self::with_origin("image-wire")
    }

    /// Registry issuing `blob:<origin>/<n>` URLs.
    pub fn with_origin(origin: impl Into<String>) -> Self {
        Self {
            origin: origin.into(),
            next: AtomicU64::new(0),
            live: Mutex::new(HashMap::new()),
        }
    }

    /// Number of live URLs.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// `true` when no URL is live.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<ObjectUrl, Blob>> {
        // A panic while holding the lock cannot leave the map half-updated.
        self.live.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ObjectUrls for BlobRegistry {
    fn allocate(&self, blob: Blob) -> ObjectUrl {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        let url = ObjectUrl(format!("{}{}/{n}", ObjectUrl::SCHEME, self.origin));
        self.lock().insert(url.clone(), blob);
        url
    }

    fn resolve(&self, url: &ObjectUrl) -> Option<Blob> {
        self.lock().get(url).cloned()
    }

    fn revoke(&self, url: &ObjectUrl) -> bool {
        self.lock().remove(url).is_some()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/handles.rs"]
mod tests;
