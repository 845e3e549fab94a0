//! Patch origin enumeration shared by extraction and reconstruction.
//!
//! Every entry point in this crate that produces or consumes a patch
//! sequence walks the same grid of top-left offsets: rows in the outer loop,
//! columns in the inner loop. Reconstruction carries no coordinate metadata,
//! so replaying this exact order is what ties patch `i` back to its origin.

use crate::error::{Result, TileError};
use crate::image_shape::ImageShape;
use crate::window::Window;
use itertools::iproduct;
use ndarray::{s, Array2};
use serde::{Deserialize, Serialize};
use std::iter::StepBy;
use std::ops::Range;

/// How origins near the trailing edge of the image are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgePolicy {
    /// Only origins whose patch lies fully inside the image (`r + kh <= H`).
    /// Trailing pixels that no full patch reaches are left uncovered.
    #[default]
    Drop,
    /// Every origin inside the image (`r < H`). The part of a patch hanging
    /// off the edge is zero-filled on extraction and ignored on reconstruction.
    ZeroPad,
}

/// Grid of patch origins over an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchGrid {
    shape: ImageShape,
    kernel: Window,
    stride: Window,
    policy: EdgePolicy,
}

impl PatchGrid {
    /// Validate the window parameters against `shape` and build the grid.
    ///
    /// # Errors
    /// `TileError::InvalidArgument` when a kernel or stride component is zero,
    /// when either is larger than the image along some axis, or when the
    /// image has no bands.
    pub fn new(
        shape: ImageShape,
        kernel: Window,
        stride: Window,
        policy: EdgePolicy,
    ) -> Result<Self> {
        validate_windows(kernel, stride)?;

        if shape.channels == 0 {
            return Err(TileError::invalid("image must have at least one channel"));
        }
        if kernel.rows > shape.height || kernel.cols > shape.width {
            return Err(TileError::invalid(format!(
                "kernel {kernel} does not fit inside image {}x{}",
                shape.height, shape.width
            )));
        }
        if stride.rows > shape.height || stride.cols > shape.width {
            return Err(TileError::invalid(format!(
                "stride {stride} is larger than image {}x{}",
                shape.height, shape.width
            )));
        }

        Ok(Self {
            shape,
            kernel,
            stride,
            policy,
        })
    }

    pub fn shape(&self) -> ImageShape {
        self.shape
    }

    pub fn kernel(&self) -> Window {
        self.kernel
    }

    pub fn stride(&self) -> Window {
        self.stride
    }

    pub fn policy(&self) -> EdgePolicy {
        self.policy
    }

    /// Number of origins along the row axis
    pub fn rows(&self) -> usize {
        axis_count(self.shape.height, self.kernel.rows, self.stride.rows, self.policy)
    }

    /// Number of origins along the column axis
    pub fn cols(&self) -> usize {
        axis_count(self.shape.width, self.kernel.cols, self.stride.cols, self.policy)
    }

    /// Total number of patches the grid produces
    pub fn len(&self) -> usize {
        self.rows() * self.cols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Top-left origins `(row, col)` in extraction order (column varies fastest)
    pub fn offsets(&self) -> impl Iterator<Item = (usize, usize)> + Clone {
        iproduct!(
            self.axis_offsets(self.shape.height, self.kernel.rows, self.stride.rows),
            self.axis_offsets(self.shape.width, self.kernel.cols, self.stride.cols)
        )
    }

    /// Origin of patch `index`, or `None` past the end of the grid
    pub fn offset(&self, index: usize) -> Option<(usize, usize)> {
        if index >= self.len() {
            return None;
        }
        let cols = self.cols();
        Some((
            (index / cols) * self.stride.rows,
            (index % cols) * self.stride.cols,
        ))
    }

    /// Extent of the patch at `(row, col)` that lies inside the image.
    ///
    /// Equal to the kernel under `EdgePolicy::Drop`; may be smaller for
    /// trailing origins under `EdgePolicy::ZeroPad`.
    pub fn clipped_extent(&self, (row, col): (usize, usize)) -> Window {
        Window::new(
            self.kernel.rows.min(self.shape.height - row),
            self.kernel.cols.min(self.shape.width - col),
        )
    }

    /// Number of patches covering each spatial pixel
    pub fn coverage_map(&self) -> Array2<u32> {
        let mut coverage = Array2::<u32>::zeros((self.shape.height, self.shape.width));
        for origin in self.offsets() {
            let (row, col) = origin;
            let extent = self.clipped_extent(origin);
            coverage
                .slice_mut(s![row..row + extent.rows, col..col + extent.cols])
                .mapv_inplace(|c| c + 1);
        }
        coverage
    }

    fn axis_offsets(&self, len: usize, kernel: usize, stride: usize) -> StepBy<Range<usize>> {
        let end = match self.policy {
            EdgePolicy::Drop => len - kernel + 1,
            EdgePolicy::ZeroPad => len,
        };
        (0..end).step_by(stride)
    }
}

/// Positivity checks shared by every entry point, independent of image size
pub(crate) fn validate_windows(kernel: Window, stride: Window) -> Result<()> {
    if !kernel.is_positive() {
        return Err(TileError::invalid(format!(
            "kernel must be at least 1x1, got {kernel}"
        )));
    }
    if !stride.is_positive() {
        return Err(TileError::invalid(format!(
            "stride must be at least 1x1, got {stride}"
        )));
    }
    Ok(())
}

fn axis_count(len: usize, kernel: usize, stride: usize, policy: EdgePolicy) -> usize {
    match policy {
        EdgePolicy::Drop => (len - kernel) / stride + 1,
        EdgePolicy::ZeroPad => len.div_ceil(stride),
    }
}
