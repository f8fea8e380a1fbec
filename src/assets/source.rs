use std::path::Path;
use std::sync::Arc;

use anyhow::Context as _;

use crate::foundation::error::WireResult;

/// In-memory file, the equivalent of one entry of a file-picker selection.
#[derive(Clone, Debug)]
pub struct FileHandle {
    /// Display name (usually the file name).
    pub name: String,
    /// MIME type, when known.
    pub mime: Option<String>,
    /// File contents.
    pub bytes: Arc<[u8]>,
}

impl FileHandle {
    /// Wrap bytes already in memory.
    pub fn new(name: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        let name = name.into();
        let mime = mime_from_name(&name).map(str::to_owned);
        Self {
            name,
            mime,
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk into a handle. The MIME type is guessed from the extension.
    pub fn open(path: impl AsRef<Path>) -> WireResult<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self::new(name, bytes))
    }
}

/// Ordered file selection. Enumerated in insertion order.
#[derive(Clone, Debug, Default)]
pub struct FileList {
    files: Vec<FileHandle>,
}

impl FileList {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a file.
    pub fn push(&mut self, file: FileHandle) {
        self.files.push(file);
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// `true` when nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Iterate in native order.
    pub fn iter(&self) -> std::slice::Iter<'_, FileHandle> {
        self.files.iter()
    }
}

impl FromIterator<FileHandle> for FileList {
    fn from_iter<I: IntoIterator<Item = FileHandle>>(iter: I) -> Self {
        Self {
            files: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FileList {
    type Item = FileHandle;
    type IntoIter = std::vec::IntoIter<FileHandle>;

    fn into_iter(self) -> Self::IntoIter {
        self.files.into_iter()
    }
}

/// One image to composite.
#[derive(Clone, Debug)]
pub enum Source {
    /// URI string (`data:`, `blob:`, `file://`, plain path, or `http(s)://` with the `http` feature).
    Uri(String),
    /// In-memory file; converted to an object URL before loading.
    File(FileHandle),
}

impl From<&str> for Source {
    fn from(s: &str) -> Self {
        Self::Uri(s.to_owned())
    }
}

impl From<String> for Source {
    fn from(s: String) -> Self {
        Self::Uri(s)
    }
}

impl From<FileHandle> for Source {
    fn from(f: FileHandle) -> Self {
        Self::File(f)
    }
}

/// The input collection accepted by the compositor.
#[derive(Clone, Debug)]
pub enum Sources {
    /// A list of URI strings.
    Uris(Vec<String>),
    /// A file selection.
    Files(FileList),
    /// A mixed, ordered list.
    Mixed(Vec<Source>),
}

impl Sources {
    /// Number of entries.
    pub fn len(&self) -> usize {
        match self {
            Self::Uris(v) => v.len(),
            Self::Files(f) => f.len(),
            Self::Mixed(v) => v.len(),
        }
    }

    /// `true` when there is nothing to composite.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Flatten into individual sources, keeping order.
    pub fn into_sources(self) -> Vec<Source> {
        match self {
            Self::Uris(v) => v.into_iter().map(Source::Uri).collect(),
            Self::Files(f) => f.into_iter().map(Source::File).collect(),
            Self::Mixed(v) => v,
        }
    }
}

impl From<Vec<String>> for Sources {
    fn from(v: Vec<String>) -> Self {
        Self::Uris(v)
    }
}

impl From<Vec<&str>> for Sources {
    fn from(v: Vec<&str>) -> Self {
        Self::Uris(v.into_iter().map(str::to_owned).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Sources {
    fn from(v: [&str; N]) -> Self {
        Self::Uris(v.into_iter().map(str::to_owned).collect())
    }
}

impl From<FileList> for Sources {
    fn from(f: FileList) -> Self {
        Self::Files(f)
    }
}

impl From<Vec<Source>> for Sources {
    fn from(v: Vec<Source>) -> Self {
        Self::Mixed(v)
    }
}

/// Guess an image MIME type from a file name extension.
pub fn mime_from_name(name: &str) -> Option<&'static str> {
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    Some(match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "ico" => "image/x-icon",
        _ => return None,
    })
}
