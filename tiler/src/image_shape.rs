//! Image dimensions for band-interleaved rasters

use ndarray::{Array3, ArrayBase, Data, Ix3};
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Shape of a `[row, column, channel]` image.
///
/// Arrays built from this shape follow the row-major convention used
/// throughout the crate: rows (height) first, then columns, then bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageShape {
    /// Number of rows
    pub height: usize,
    /// Number of columns
    pub width: usize,
    /// Number of bands
    pub channels: usize,
}

impl ImageShape {
    pub fn new(height: usize, width: usize, channels: usize) -> Self {
        Self {
            height,
            width,
            channels,
        }
    }

    /// Shape of an existing image array
    pub fn of<S: Data>(image: &ArrayBase<S, Ix3>) -> Self {
        Self::from(image.dim())
    }

    /// Zero-filled array with this shape
    pub fn zeros<T>(&self) -> Array3<T>
    where
        T: Clone + Zero,
    {
        Array3::zeros(self.to_tuple())
    }

    /// Number of spatial pixels (bands not counted)
    pub fn pixel_count(&self) -> usize {
        self.height * self.width
    }

    /// Convert to tuple (height, width, channels)
    pub fn to_tuple(&self) -> (usize, usize, usize) {
        (self.height, self.width, self.channels)
    }
}

impl From<(usize, usize, usize)> for ImageShape {
    fn from((height, width, channels): (usize, usize, usize)) -> Self {
        Self::new(height, width, channels)
    }
}

impl From<ImageShape> for (usize, usize, usize) {
    fn from(shape: ImageShape) -> Self {
        shape.to_tuple()
    }
}

impl fmt::Display for ImageShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}x{}x{}", self.height, self.width, self.channels)
    }
}
