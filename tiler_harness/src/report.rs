//! Round-trip measurement: tile an image in batches, reassemble it, and
//! compare against the original over the pixels the grid actually covers.

use crate::error::HarnessError;
use log::{debug, info};
use ndarray::{concatenate, ArrayView3, Axis, Zip};
use serde::Serialize;
use std::fmt;
use tiler::{ImageShape, PatchTiler, TilerConfig};

/// Outcome of a tile / reconstruct round trip
#[derive(Debug, Clone, Serialize)]
pub struct RoundTripReport {
    pub shape: ImageShape,
    pub config: TilerConfig,
    pub patch_count: usize,
    pub batch_count: usize,
    /// Spatial pixels reached by at least one patch
    pub covered_pixels: usize,
    /// Largest per-pixel coverage count
    pub max_coverage: u32,
    /// Largest absolute error over covered samples
    pub max_abs_error: f64,
    /// Mean absolute error over covered samples
    pub mean_abs_error: f64,
}

impl RoundTripReport {
    pub fn covered_fraction(&self) -> f64 {
        match self.shape.pixel_count() {
            0 => 0.0,
            total => self.covered_pixels as f64 / total as f64,
        }
    }
}

impl fmt::Display for RoundTripReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Image:          {}", self.shape)?;
        writeln!(
            f,
            "Kernel/stride:  {} / {} ({:?})",
            self.config.kernel, self.config.stride, self.config.edge_policy
        )?;
        writeln!(
            f,
            "Patches:        {} in {} batches of <= {}",
            self.patch_count, self.batch_count, self.config.batch_size
        )?;
        writeln!(
            f,
            "Coverage:       {:.2}% of pixels, max {} patches per pixel",
            self.covered_fraction() * 100.0,
            self.max_coverage
        )?;
        write!(
            f,
            "Error:          max {:.3e}, mean {:.3e}",
            self.max_abs_error, self.mean_abs_error
        )
    }
}

/// Tile `image` batch by batch, reassemble it and measure the error.
///
/// Batches are collected as a downstream model would see them and stitched
/// back together before reconstruction.
pub fn run_roundtrip(
    image: ArrayView3<f64>,
    tiler: &PatchTiler,
) -> Result<RoundTripReport, HarnessError> {
    let shape = ImageShape::of(&image);
    let grid = tiler.grid(shape)?;

    let batches: Vec<_> = tiler.batches(image.view())?.collect();
    for (i, batch) in batches.iter().enumerate() {
        debug!("Batch {i}: {} patches", batch.len_of(Axis(0)));
    }
    info!(
        "Extracted {} patches in {} batches from {}",
        grid.len(),
        batches.len(),
        shape
    );

    let views: Vec<_> = batches.iter().map(|b| b.view()).collect();
    let patches = concatenate(Axis(0), &views)?;
    let rebuilt = tiler.reconstruct(patches.view(), shape)?;

    let coverage = grid.coverage_map();
    let mut max_abs_error = 0.0f64;
    let mut error_sum = 0.0;
    let mut samples = 0usize;

    Zip::from(rebuilt.lanes(Axis(2)))
        .and(image.lanes(Axis(2)))
        .and(&coverage)
        .for_each(|got, want, &count| {
            if count == 0 {
                return;
            }
            for (g, w) in got.iter().zip(want.iter()) {
                let err = (g - w).abs();
                max_abs_error = max_abs_error.max(err);
                error_sum += err;
                samples += 1;
            }
        });

    Ok(RoundTripReport {
        shape,
        config: *tiler.config(),
        patch_count: grid.len(),
        batch_count: batches.len(),
        covered_pixels: coverage.iter().filter(|&&c| c > 0).count(),
        max_coverage: coverage.iter().copied().max().unwrap_or(0),
        max_abs_error,
        mean_abs_error: if samples == 0 {
            0.0
        } else {
            error_sum / samples as f64
        },
    })
}
