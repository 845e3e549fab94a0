//! Patch extraction and reconstruction
//!
//! This module tiles `[row, column, channel]` images into fixed-size,
//! possibly overlapping patches and reassembles images from patch sequences
//! by averaging overlapping contributions.

pub mod extract;
pub mod grid;
pub mod reconstruct;
pub mod tiler;

pub use extract::{extract, extract_dyn, iter_batches, iter_patches, PatchBatches, PatchIter};
pub use grid::{EdgePolicy, PatchGrid};
pub use reconstruct::{reconstruct, reconstruct_dyn};
pub use tiler::PatchTiler;
