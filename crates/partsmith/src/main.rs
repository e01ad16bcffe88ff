//! Partsmith - layered character reconstruction from unpacked game assets.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use assets::DirectorySource;
use common::{CanvasSize, Tint};
use compositor::{CompositeRequest, Compositor};
use partsmith::{overrides, report, ExtractionMode, Extractor, ExtractorConfig};
use scene::{CharacterPart, PartCategory};

/// Partsmith - rebuild layered 2D characters from unpacked asset records
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Extract parts, sprites and reports from a manifest
    Extract {
        /// Manifest file, or a directory containing manifest.json
        manifest: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out: Option<PathBuf>,

        /// Extraction mode
        #[arg(long, value_enum, default_value_t = ModeArg::Auto)]
        mode: ModeArg,

        /// JSON configuration file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Skip writing sprite images
        #[arg(long)]
        no_sprites: bool,
    },

    /// Composite selected parts into one PNG
    Compose(ComposeArgs),

    /// Print the transform hierarchy
    Hierarchy {
        /// Manifest file, or a directory containing manifest.json
        manifest: PathBuf,
    },

    /// Print resolved parts grouped by category
    Parts {
        /// Manifest file, or a directory containing manifest.json
        manifest: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ModeArg {
    /// Detect from the container name
    Auto,
    /// Full character extraction
    Character,
    /// Export raw sprites only
    Sprites,
}

#[derive(clap::Args, Debug)]
struct ComposeArgs {
    /// Manifest file, or a directory containing manifest.json
    manifest: PathBuf,

    /// Output PNG file
    #[arg(short, long)]
    output: PathBuf,

    /// Select a part by name (repeatable)
    #[arg(long = "select", value_name = "NAME")]
    select: Vec<String>,

    /// Select every part of a category (repeatable)
    #[arg(long = "category", value_name = "CATEGORY", value_parser = overrides::parse_category)]
    category: Vec<PartCategory>,

    /// Override a part's depth (repeatable)
    #[arg(long = "depth", value_name = "NAME=N", value_parser = overrides::parse_depth)]
    depth: Vec<(String, i32)>,

    /// Override a part's tint (repeatable)
    #[arg(long = "tint", value_name = "NAME=R,G,B,A", value_parser = overrides::parse_tint)]
    tint: Vec<(String, Tint)>,

    /// Pixels per source unit
    #[arg(long)]
    ratio: Option<f32>,

    /// Total canvas padding in pixels
    #[arg(long)]
    margin: Option<u32>,

    /// Minimum canvas size
    #[arg(long, value_name = "WxH", value_parser = overrides::parse_size)]
    min_size: Option<CanvasSize>,

    /// JSON configuration file
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Partsmith v{}", partsmith::VERSION);
    run(args.command)
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Extract {
            manifest,
            out,
            mode,
            config,
            no_sprites,
        } => {
            let mut config = load_config(config.as_deref())?;
            if let Some(out) = out {
                config.output_dir = out;
            }
            if no_sprites {
                config.write_sprites = false;
            }

            let mode = match mode {
                ModeArg::Auto => ExtractionMode::detect(&manifest),
                ModeArg::Character => ExtractionMode::Character,
                ModeArg::Sprites => ExtractionMode::SpritesOnly,
            };

            let source = open_source(&manifest)?;
            let extractor = Extractor::new(config);
            let result = extractor
                .run(&source, mode, None)
                .context("extraction failed")?;

            info!(
                "Extracted {} parts, {} sprites, {} diagnostics into {}",
                result.parts.len(),
                result.sprites.len(),
                result.diagnostics.len(),
                extractor.config().output_dir.display()
            );
        }

        Command::Compose(args) => compose(args)?,

        Command::Hierarchy { manifest } => {
            let source = open_source(&manifest)?;
            let result = Extractor::with_defaults().analyze(&source, None);
            print!("{}", report::hierarchy_text(&result.hierarchy));
        }

        Command::Parts { manifest } => {
            let source = open_source(&manifest)?;
            let result = Extractor::with_defaults().analyze(&source, None);
            print!("{}", report::parts_text(&result.parts));
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<ExtractorConfig> {
    match path {
        Some(path) => ExtractorConfig::from_json_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(ExtractorConfig::default()),
    }
}

fn open_source(manifest: &Path) -> Result<DirectorySource> {
    DirectorySource::open(manifest).with_context(|| format!("failed to open {}", manifest.display()))
}

fn compose(args: ComposeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    let settings = &mut config.compositor;
    if let Some(ratio) = args.ratio {
        settings.ratio = ratio;
    }
    if let Some(margin) = args.margin {
        settings.margin = margin;
    }
    if let Some(size) = args.min_size {
        settings.min_width = size.width;
        settings.min_height = size.height;
    }
    config.validate()?;

    let source = open_source(&args.manifest)?;
    let extractor = Extractor::new(config);
    let result = extractor.analyze(&source, None);

    let request = build_request(&result.parts, &args);
    let output = Compositor::new(extractor.config().compositor.clone()).composite(&request, None);

    output
        .canvas
        .save_png(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;

    info!(
        "Composited {} parts onto {} canvas: {}",
        output.painted.len(),
        output.canvas.size(),
        args.output.display()
    );
    Ok(())
}

fn build_request<'a>(parts: &'a [CharacterPart], args: &ComposeArgs) -> CompositeRequest<'a> {
    let mut request = if args.select.is_empty() && args.category.is_empty() {
        CompositeRequest::select_all(parts)
    } else {
        let by_category = parts
            .iter()
            .filter(|part| args.category.contains(&part.category))
            .map(|part| part.name.clone());

        CompositeRequest::new(parts)
            .with_selected(args.select.iter().cloned())
            .with_selected(by_category)
    };

    for name in &args.select {
        if !parts.iter().any(|part| &part.name == name) {
            warn!("No part named '{}'", name);
        }
    }

    for (name, depth) in &args.depth {
        request = request.with_depth(name.clone(), *depth);
    }
    for (name, tint) in &args.tint {
        request = request.with_tint(name.clone(), *tint);
    }

    request
}
