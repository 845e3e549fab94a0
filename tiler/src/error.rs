//! Error types for patch tiling and reconstruction

use thiserror::Error;

/// Errors that can occur while tiling or reconstructing an image.
///
/// All variants are raised before any output is allocated; there is no
/// partial result to recover.
#[derive(Error, Debug)]
pub enum TileError {
    /// Rank mismatch, non-positive window component, or a window that does
    /// not fit inside the image.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(
        "patch size {actual_rows}x{actual_cols} does not match kernel {kernel_rows}x{kernel_cols}"
    )]
    PatchSizeMismatch {
        kernel_rows: usize,
        kernel_cols: usize,
        actual_rows: usize,
        actual_cols: usize,
    },

    #[error("patches carry {actual} channels but the target has {expected}")]
    ChannelMismatch { expected: usize, actual: usize },

    #[error("expected {expected} patches for this grid, got {actual}")]
    PatchCountMismatch { expected: usize, actual: usize },

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl TileError {
    /// True for the shape-mismatch family (patch size, channels, count).
    pub fn is_shape_mismatch(&self) -> bool {
        matches!(
            self,
            TileError::PatchSizeMismatch { .. }
                | TileError::ChannelMismatch { .. }
                | TileError::PatchCountMismatch { .. }
        )
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        TileError::InvalidArgument(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, TileError>;
