use std::sync::{Arc, OnceLock};

use rayon::prelude::*;

use crate::assets::color::Fill;
use crate::assets::decode::{DecodedImage, decode_image};
use crate::assets::fetch::{Fetch, UriFetcher};
use crate::assets::handles::{Blob, BlobRegistry, ObjectUrl, ObjectUrls};
use crate::assets::source::{Source, Sources};
use crate::encode::raster::encode_surface;
use crate::foundation::core::Size;
use crate::foundation::error::{WireError, WireResult};
use crate::layout::solver::solve_layout;
use crate::options::{Options, PartialOptions};
use crate::render::surface::{ResolvedFill, Surface};

/// Compositor construction options.
#[derive(Clone, Copy, Debug, Default)]
pub struct CompositorOpts {
    /// Worker threads for parallel loads. `None` uses rayon's global pool.
    pub threads: Option<usize>,
}

/// Output of [`Compositor::composite`].
///
/// Every URL in here is live in the compositor's registry. Revoking them is up to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Composited {
    /// Object URL of the encoded result.
    pub url: ObjectUrl,
    /// The encoded result.
    pub blob: Blob,
    /// Object URLs issued for file-handle sources, in source order.
    pub source_urls: Vec<ObjectUrl>,
}

impl Composited {
    /// The result URL and bytes, dropping the source URLs.
    pub fn into_parts(self) -> (ObjectUrl, Blob) {
        (self.url, self.blob)
    }

    /// Revoke the result URL and every source URL. Returns how many were still live.
    pub fn revoke_all(&self, urls: &dyn ObjectUrls) -> usize {
        std::iter::once(&self.url)
            .chain(&self.source_urls)
            .filter(|u| urls.revoke(u))
            .count()
    }
}

/// A source ready to load: the URI to fetch, the name used in errors, and the object URL this
/// call allocated for it, if any.
struct Resolved {
    uri: String,
    label: String,
    allocated: Option<ObjectUrl>,
}

impl Resolved {
    fn uri(uri: String) -> Self {
        Self {
            label: uri.clone(),
            uri,
            allocated: None,
        }
    }
}

/// Loads sources, lays them out, draws and encodes the result.
///
/// One call owns its decoded images and surface; nothing is shared between calls except the
/// object-URL registry.
pub struct Compositor {
    urls: Arc<dyn ObjectUrls>,
    fetcher: Arc<dyn Fetch>,
    pool: Option<rayon::ThreadPool>,
}

impl std::fmt::Debug for Compositor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Compositor")
            .field("dedicated_pool", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide registry used by [`image_wire`] and [`Compositor::new`].
pub fn global_object_urls() -> Arc<BlobRegistry> {
    static GLOBAL: OnceLock<Arc<BlobRegistry>> = OnceLock::new();
    GLOBAL.get_or_init(|| Arc::new(BlobRegistry::new())).clone()
}

impl Compositor {
    /// Compositor backed by the process-wide object-URL registry.
    pub fn new() -> Self {
        Self::with_object_urls(global_object_urls())
    }

    /// Compositor issuing and resolving object URLs through `urls`.
    pub fn with_object_urls(urls: Arc<dyn ObjectUrls>) -> Self {
        let fetcher: Arc<dyn Fetch> = Arc::new(UriFetcher::new(urls.clone()));
        Self {
            urls,
            fetcher,
            pool: None,
        }
    }

    /// Replace the URI fetcher.
    pub fn with_fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// Apply [`CompositorOpts`].
    pub fn with_opts(mut self, opts: CompositorOpts) -> WireResult<Self> {
        self.pool = opts.threads.map(build_thread_pool).transpose()?;
        Ok(self)
    }

    /// The object-URL registry this compositor allocates from.
    pub fn object_urls(&self) -> &Arc<dyn ObjectUrls> {
        &self.urls
    }

    /// Composite `sources` and return the result's object URL plus its encoded bytes.
    ///
    /// Fails as a whole: any unloadable source is a [`WireError::Load`] and nothing is returned.
    /// Object URLs allocated for file handles are handed back in [`Composited::source_urls`] on
    /// success and revoked on failure.
    #[tracing::instrument(skip_all, fields(sources = tracing::field::Empty))]
    pub fn composite(
        &self,
        sources: impl Into<Sources>,
        options: &Options,
    ) -> WireResult<Composited> {
        let sources = sources.into();
        tracing::Span::current().record("sources", sources.len());
        options.validate()?;

        let (surface, source_urls) = self.render_keeping_urls(sources, options)?;
        let blob = match encode_surface(&surface, options.format, options.quality) {
            Ok(blob) => blob,
            Err(e) => {
                self.revoke(&source_urls);
                return Err(e);
            }
        };
        let url = self.urls.allocate(blob.clone());
        tracing::debug!(%url, bytes = blob.len(), "composite ready");
        Ok(Composited {
            url,
            blob,
            source_urls,
        })
    }

    /// [`Compositor::composite`] with partial options merged onto the defaults.
    pub fn composite_with(
        &self,
        sources: impl Into<Sources>,
        options: PartialOptions,
    ) -> WireResult<Composited> {
        self.composite(sources, &options.into())
    }

    /// Run every step except encoding and return the drawn surface.
    ///
    /// Object URLs allocated for file handles are revoked before returning.
    pub fn render(&self, sources: impl Into<Sources>, options: &Options) -> WireResult<Surface> {
        let (surface, source_urls) = self.render_keeping_urls(sources.into(), options)?;
        self.revoke(&source_urls);
        Ok(surface)
    }

    fn render_keeping_urls(
        &self,
        sources: Sources,
        options: &Options,
    ) -> WireResult<(Surface, Vec<ObjectUrl>)> {
        if sources.is_empty() {
            return Err(match sources {
                Sources::Files(_) => WireError::validation("file list is empty"),
                _ => WireError::validation("at least one source is required"),
            });
        }

        let resolved = self.resolve_sources(sources);
        let source_urls = resolved
            .iter()
            .filter_map(|r| r.allocated.clone())
            .collect::<Vec<_>>();
        match self.draw(resolved, options) {
            Ok(surface) => Ok((surface, source_urls)),
            Err(e) => {
                self.revoke(&source_urls);
                Err(e)
            }
        }
    }

    fn draw(&self, mut resolved: Vec<Resolved>, options: &Options) -> WireResult<Surface> {
        let pattern_uri = options.color.as_ref().and_then(Fill::pattern_source);
        if let Some(p) = pattern_uri {
            resolved.push(Resolved::uri(p.to_owned()));
        }

        let mut images = self.load_all(&resolved)?;
        let pattern = pattern_uri.and_then(|_| images.pop());

        let sizes = images.iter().map(DecodedImage::size).collect::<Vec<Size>>();
        let layout = solve_layout(&sizes, options.direction, options.gap)?;
        tracing::debug!(
            width = layout.canvas.width,
            height = layout.canvas.height,
            images = images.len(),
            "layout solved"
        );

        let mut surface = Surface::new(layout.canvas)?;
        if let Some(fill) = &options.color {
            surface.fill(&ResolvedFill::resolve(fill, pattern)?);
        }
        for (img, at) in images.iter().zip(&layout.placements) {
            surface.draw_image(img, *at)?;
        }
        Ok(surface)
    }

    fn resolve_sources(&self, sources: Sources) -> Vec<Resolved> {
        sources
            .into_sources()
            .into_iter()
            .map(|s| match s {
                Source::Uri(u) => Resolved::uri(u),
                Source::File(f) => {
                    let mime = f
                        .mime
                        .unwrap_or_else(|| "application/octet-stream".to_owned());
                    let url = self.urls.allocate(Blob::new(f.bytes, mime));
                    Resolved {
                        uri: url.as_str().to_owned(),
                        label: f.name,
                        allocated: Some(url),
                    }
                }
            })
            .collect()
    }

    fn revoke(&self, urls: &[ObjectUrl]) {
        for url in urls {
            self.urls.revoke(url);
        }
    }

    /// Load every source in parallel. Order is preserved and the first failure aborts the join.
    fn load_all(&self, resolved: &[Resolved]) -> WireResult<Vec<DecodedImage>> {
        let run = || {
            resolved
                .par_iter()
                .map(|r| self.load_one(&r.uri, &r.label))
                .collect::<WireResult<Vec<_>>>()
        };
        match &self.pool {
            Some(pool) => pool.install(run),
            None => run(),
        }
    }

    /// Fetch and decode `uri`. Errors name `label`, which is the file name for file handles.
    #[tracing::instrument(skip(self), level = "debug")]
    fn load_one(&self, uri: &str, label: &str) -> WireResult<DecodedImage> {
        let relabel = |e: WireError| match e {
            WireError::Load { reason, .. } => WireError::load(label, reason),
            WireError::Other(err) => WireError::load(label, format!("{err:#}")),
            other => WireError::load(label, other),
        };
        let bytes = self.fetcher.fetch(uri).map_err(&relabel)?;
        decode_image(&bytes).map_err(relabel)
    }
}

fn build_thread_pool(threads: usize) -> WireResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(WireError::validation(
            "compositor 'threads' must be >= 1 when set",
        ));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| WireError::validation(format!("failed to build rayon thread pool: {e}")))
}

/// Glue `sources` together with the process-wide compositor.
///
/// ```no_run
/// use image_wire::{Direction, PartialOptions, image_wire};
///
/// let out = image_wire(
///     ["left.png", "right.png"],
///     PartialOptions {
///         direction: Some(Direction::Vertical),
///         gap: Some(100),
///         color: Some("red".parse()?),
///         ..PartialOptions::default()
///     },
/// )?;
/// println!("{}: {} bytes of {}", out.url, out.blob.len(), out.blob.mime);
/// # Ok::<(), image_wire::WireError>(())
/// ```
pub fn image_wire(sources: impl Into<Sources>, options: PartialOptions) -> WireResult<Composited> {
    Compositor::new().composite_with(sources, options)
}

#[cfg(test)]
#[path = "../tests/unit/compositor.rs"]
mod tests;
