use std::io::Cursor;
use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use image_wire::{
    Compositor, CompositorOpts, Direction, FileHandle, FileList, Fill, Options, OutputFormat,
    PartialOptions, Sources,
};

#[derive(Parser, Debug)]
#[command(
    name = "image-wire",
    version,
    about = "Glue images together horizontally or vertically into a single image"
)]
struct Cli {
    /// Image sources: paths, file:// or data: URIs (http(s) with the `http` feature).
    #[arg(required = true)]
    sources: Vec<String>,

    /// Output image path.
    #[arg(long)]
    out: PathBuf,

    /// Options JSON (any subset of gap/direction/type/quality/color).
    #[arg(long)]
    options: Option<PathBuf>,

    /// Layout direction: horizontal | vertical.
    #[arg(long)]
    direction: Option<Direction>,

    /// Pixels between consecutive images.
    #[arg(long)]
    gap: Option<u32>,

    /// Output MIME type: image/png | image/jpeg | image/webp. Defaults from the --out extension.
    #[arg(long = "type")]
    format: Option<OutputFormat>,

    /// Lossy quality in [0, 1].
    #[arg(long)]
    quality: Option<f32>,

    /// Background: color (`red`, `#ff000080`) or a JSON fill object.
    #[arg(long)]
    color: Option<Fill>,

    /// Read SOURCES as local files and pass them through object URLs.
    #[arg(long, default_value_t = false)]
    files: bool,

    /// Worker threads for parallel loads.
    #[arg(long)]
    threads: Option<usize>,

    /// Log pipeline steps to stderr.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let options = resolve_options(&cli)?;
    let sources = if cli.files {
        let files = cli
            .sources
            .iter()
            .map(FileHandle::open)
            .collect::<Result<FileList, _>>()?;
        Sources::Files(files)
    } else {
        Sources::Uris(cli.sources.clone())
    };

    let compositor = Compositor::new().with_opts(CompositorOpts {
        threads: cli.threads,
    })?;
    let out = compositor.composite(sources, &options)?;
    let blob = &out.blob;

    if let Some(parent) = cli.out.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(&cli.out, blob.as_bytes())
        .with_context(|| format!("write '{}'", cli.out.display()))?;

    let (w, h) = image::ImageReader::new(Cursor::new(blob.as_bytes()))
        .with_guessed_format()
        .context("sniff encoded output")?
        .into_dimensions()
        .context("read encoded output dimensions")?;
    eprintln!("wrote {} ({w}x{h}, {})", cli.out.display(), blob.mime);
    out.revoke_all(compositor.object_urls().as_ref());
    Ok(())
}

/// Defaults, then the options file, then explicit flags. The output type falls back to the
/// `--out` extension when nothing else sets it.
fn resolve_options(cli: &Cli) -> anyhow::Result<Options> {
    let from_file = match &cli.options {
        Some(path) => PartialOptions::from_path(path)?,
        None => PartialOptions::default(),
    };
    let flags = PartialOptions {
        gap: cli.gap,
        direction: cli.direction,
        format: cli.format,
        quality: cli.quality,
        color: cli.color.clone(),
    };
    let mut merged = from_file.overlay(flags);
    if merged.format.is_none() {
        merged.format = cli
            .out
            .extension()
            .and_then(|e| e.to_str())
            .and_then(|e| OutputFormat::from_mime(e).ok());
    }
    Ok(merged.into())
}
