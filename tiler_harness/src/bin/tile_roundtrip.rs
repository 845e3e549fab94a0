//! Patch tiling round-trip tool
//!
//! Generates a seeded synthetic multispectral image, splits it into patches
//! with the requested kernel/stride, reassembles it and reports coverage and
//! reconstruction error. Useful for checking a tiling config before running
//! a model over real imagery.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;
use std::path::PathBuf;
use tiler::{EdgePolicy, ImageShape, PatchTiler, TilerConfig, Window};
use tiler_harness::{run_roundtrip, synthetic_image, SceneParams};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum EdgeArg {
    /// Skip origins whose patch would hang off the image
    Drop,
    /// Keep every origin, zero-filling the part outside the image
    ZeroPad,
}

impl From<EdgeArg> for EdgePolicy {
    fn from(arg: EdgeArg) -> Self {
        match arg {
            EdgeArg::Drop => EdgePolicy::Drop,
            EdgeArg::ZeroPad => EdgePolicy::ZeroPad,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "Tile Round-Trip",
    about = "Tiles a synthetic image into patches, reconstructs it and reports the error",
    long_about = None
)]
struct Args {
    /// Image height in pixels
    #[arg(long, default_value_t = 256)]
    height: usize,

    /// Image width in pixels
    #[arg(long, default_value_t = 256)]
    width: usize,

    /// Number of spectral bands
    #[arg(long, default_value_t = 4)]
    channels: usize,

    /// JSON tiling config; explicit flags below take precedence
    #[arg(long)]
    config: Option<PathBuf>,

    /// Patch size as RxC or N (e.g. "32x32")
    #[arg(long)]
    kernel: Option<Window>,

    /// Step between patch origins as RxC or N
    #[arg(long)]
    stride: Option<Window>,

    /// Handling of origins near the trailing edge
    #[arg(long, value_enum)]
    edge: Option<EdgeArg>,

    /// Patches per batch
    #[arg(long)]
    batch_size: Option<usize>,

    /// Mean of the first band
    #[arg(long, default_value_t = 100.0)]
    mean: f64,

    /// Noise standard deviation
    #[arg(long, default_value_t = 10.0)]
    std_dev: f64,

    /// Random seed for the synthetic image
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,
}

impl Args {
    fn tiler_config(&self) -> Result<TilerConfig> {
        let mut config = match &self.config {
            Some(path) => TilerConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => TilerConfig::default(),
        };

        if let Some(kernel) = self.kernel {
            config.kernel = kernel;
        }
        if let Some(stride) = self.stride {
            config.stride = stride;
        }
        if let Some(edge) = self.edge {
            config.edge_policy = edge.into();
        }
        if let Some(batch_size) = self.batch_size {
            config.batch_size = batch_size;
        }
        Ok(config)
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let tiler = PatchTiler::new(args.tiler_config()?)?;
    let params = SceneParams {
        shape: ImageShape::new(args.height, args.width, args.channels),
        mean: args.mean,
        std_dev: args.std_dev,
        seed: args.seed,
    };

    info!("Generating {} synthetic image (seed {})", params.shape, params.seed);
    let image = synthetic_image(&params)?;

    let report = run_roundtrip(image.view(), &tiler)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{report}");
    }

    Ok(())
}
