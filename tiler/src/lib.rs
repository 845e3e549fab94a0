//! Patch tiling for multi/hyperspectral raster imagery.
//!
//! Splits `[row, column, channel]` images into fixed-size, possibly
//! overlapping patches, typically to feed a model one window at a time, and
//! rebuilds an image from a patch sequence by averaging every contribution
//! that lands on a pixel.
//!
//! Everything here is a pure function of its inputs: no global state, no
//! threads, no I/O beyond optional JSON configs.

pub mod config;
pub mod error;
pub mod image_shape;
pub mod patches;
pub mod window;

pub use config::TilerConfig;
pub use error::{Result, TileError};
pub use image_shape::ImageShape;
pub use patches::{
    extract, extract_dyn, iter_batches, iter_patches, reconstruct, reconstruct_dyn, EdgePolicy,
    PatchBatches, PatchGrid, PatchIter, PatchTiler,
};
pub use window::Window;
