//! image-wire glues a list of images together into a single image.
//!
//! Sources (URIs or in-memory files) are loaded in parallel, laid out left-to-right or
//! top-to-bottom with an optional gap, drawn over an optional background fill and encoded as
//! PNG, JPEG or WebP. The result comes back as an object URL plus the encoded bytes, together
//! with the object URLs issued for file-handle sources so the caller can revoke them.
//!
//! # Pipeline overview
//!
//! 1. **Resolve**: file handles become `blob:` object URLs; URI strings pass through.
//! 2. **Load**: every URI is fetched and decoded in parallel. One failure fails the call.
//! 3. **Layout**: the canvas is the sum of extents (plus gaps) along the layout axis and the
//!    largest extent across it. Images are placed top/left aligned.
//! 4. **Draw**: background fill, then each image in source order (premultiplied RGBA8).
//! 5. **Encode**: the surface becomes a [`Blob`], registered under a fresh [`ObjectUrl`] and
//!    returned as a [`Composited`].
//!
//! ```no_run
//! use image_wire::{Compositor, Direction, Options};
//!
//! let compositor = Compositor::new();
//! let options = Options::default()
//!     .with_direction(Direction::Vertical)
//!     .with_gap(8);
//! let out = compositor.composite(vec!["a.png", "b.png"], &options)?;
//! std::fs::write("out.png", out.blob.as_bytes()).ok();
//! println!("{}", out.url);
//! out.revoke_all(compositor.object_urls().as_ref());
//! # Ok::<(), image_wire::WireError>(())
//! ```
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod compositor;
mod encode;
mod foundation;
mod layout;
mod options;
mod render;

pub use assets::color::{ColorDef, ColorStop, Fill, PatternRepeat, Ramp};
pub use assets::decode::{DecodedImage, decode_image};
pub use assets::fetch::{Fetch, UriFetcher, parse_data_uri, to_data_uri};
pub use assets::handles::{Blob, BlobRegistry, ObjectUrl, ObjectUrls};
pub use assets::source::{FileHandle, FileList, Source, Sources, mime_from_name};
pub use compositor::{Composited, Compositor, CompositorOpts, global_object_urls, image_wire};
pub use encode::raster::{encode_surface, jpeg_quality, webp_quality};
pub use foundation::core::{Axis, Position, Rgba8Premul, Size};
pub use foundation::error::{WireError, WireResult};
pub use layout::solver::{Layout, LayoutSolver, solve_layout};
pub use options::{DEFAULT_QUALITY, Direction, Options, OutputFormat, PartialOptions};
pub use render::composite::{PremulRgba8, over, over_in_place};
pub use render::surface::{ResolvedFill, Surface};
