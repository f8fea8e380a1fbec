use std::path::PathBuf;
use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose};
use percent_encoding::percent_decode_str;
use url::Url;

use crate::assets::handles::{ObjectUrl, ObjectUrls};
use crate::foundation::error::{WireError, WireResult};

/// Turns a source URI into raw encoded bytes.
pub trait Fetch: Send + Sync {
    /// Fetch the bytes behind `uri`. Every failure is a [`WireError::Load`].
    fn fetch(&self, uri: &str) -> WireResult<Vec<u8>>;
}

/// Default fetcher.
///
/// Supported schemes:
/// - `data:` (base64 or percent-encoded payloads)
/// - `blob:` (looked up in the object-URL registry)
/// - `file://` and plain filesystem paths
/// - `http://` / `https://` with the `http` feature
#[derive(Clone)]
pub struct UriFetcher {
    urls: Arc<dyn ObjectUrls>,
}

impl std::fmt::Debug for UriFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UriFetcher").finish_non_exhaustive()
    }
}

impl UriFetcher {
    /// Fetcher resolving `blob:` URLs through `urls`.
    pub fn new(urls: Arc<dyn ObjectUrls>) -> Self {
        Self { urls }
    }
}

impl Fetch for UriFetcher {
    fn fetch(&self, uri: &str) -> WireResult<Vec<u8>> {
        let scheme = uri
            .split_once(':')
            .map(|(s, _)| s.to_ascii_lowercase())
            .unwrap_or_default();
        match scheme.as_str() {
            "data" => parse_data_uri(uri).map(|(_, bytes)| bytes),
            "blob" => {
                let url = ObjectUrl::parse(uri)
                    .ok_or_else(|| WireError::load(uri, "malformed object URL"))?;
                self.urls
                    .resolve(&url)
                    .map(|b| b.bytes.to_vec())
                    .ok_or_else(|| WireError::load(uri, "object URL is not live"))
            }
            "file" => read_path(uri, file_uri_to_path(uri)?),
            "http" | "https" => fetch_http(uri),
            _ => read_path(uri, PathBuf::from(uri)),
        }
    }
}

fn read_path(uri: &str, path: PathBuf) -> WireResult<Vec<u8>> {
    std::fs::read(&path).map_err(|e| WireError::load(uri, format!("read '{}': {e}", path.display())))
}

#[cfg(feature = "http")]
fn fetch_http(uri: &str) -> WireResult<Vec<u8>> {
    let resp = reqwest::blocking::get(uri)
        .and_then(|r| r.error_for_status())
        .map_err(|e| WireError::load(uri, e))?;
    let bytes = resp.bytes().map_err(|e| WireError::load(uri, e))?;
    Ok(bytes.to_vec())
}

#[cfg(not(feature = "http"))]
fn fetch_http(uri: &str) -> WireResult<Vec<u8>> {
    Err(WireError::load(
        uri,
        "http(s) sources need the `http` feature",
    ))
}

/// Split a `data:` URI into its media type and decoded payload.
pub fn parse_data_uri(uri: &str) -> WireResult<(String, Vec<u8>)> {
    let rest = uri
        .get(..5)
        .filter(|p| p.eq_ignore_ascii_case("data:"))
        .map(|_| &uri[5..])
        .ok_or_else(|| WireError::load(uri, "not a data URI"))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| WireError::load(uri, "data URI has no ',' separator"))?;

    let (media, is_base64) = match meta.strip_suffix(";base64") {
        Some(m) => (m, true),
        None => (meta, false),
    };
    let media = if media.is_empty() {
        "text/plain;charset=US-ASCII".to_owned()
    } else {
        media.to_owned()
    };

    let bytes = if is_base64 {
        let compact: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
        general_purpose::STANDARD
            .decode(percent_decode(&compact).as_slice())
            .map_err(|e| WireError::load(uri, format!("invalid base64 payload: {e}")))?
    } else {
        percent_decode(payload)
    };
    Ok((media, bytes))
}

/// Encode bytes as a base64 `data:` URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", general_purpose::STANDARD.encode(bytes))
}

/// Local path behind a `file:` URI. Only an empty host or `localhost` is accepted.
fn file_uri_to_path(uri: &str) -> WireResult<PathBuf> {
    let url = Url::parse(uri).map_err(|e| WireError::load(uri, format!("invalid file URI: {e}")))?;
    url.to_file_path()
        .map_err(|()| WireError::load(uri, "file URI does not name a local path"))
}

fn percent_decode(s: &str) -> Vec<u8> {
    percent_decode_str(s).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fetch.rs"]
mod tests;
