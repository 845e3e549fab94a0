//! Patch extraction: eager, lazy and batched.
//!
//! All three forms walk the same [`PatchGrid`] and copy the same windows, so
//! collecting [`PatchIter`] or concatenating [`PatchBatches`] yields exactly
//! what [`extract`] returns.

use crate::config::TilerConfig;
use crate::error::{Result, TileError};
use crate::image_shape::ImageShape;
use crate::patches::grid::{EdgePolicy, PatchGrid};
use crate::window::Window;
use log::debug;
use ndarray::{s, Array3, Array4, ArrayView3, ArrayViewD, ArrayViewMut3, Ix3};
use num_traits::Zero;

/// Split an image into patches.
///
/// Origins are enumerated row-major (column varies fastest) at multiples of
/// `stride`, keeping only origins whose patch lies fully inside the image.
/// Trailing pixels no full patch reaches are not part of any patch.
///
/// # Arguments
/// * `image` - `[row, column, channel]` image
/// * `kernel` - patch size `(rows, cols)`
/// * `stride` - step between successive origins `(rows, cols)`
///
/// # Returns
/// `[N, kernel.rows, kernel.cols, channels]` array of patch copies
///
/// # Errors
/// `TileError::InvalidArgument` if a kernel or stride component is zero or
/// larger than the image along that axis.
///
/// # Example
/// ```
/// use ndarray::Array3;
/// use tiler::extract;
///
/// let image = Array3::<f32>::zeros((6, 6, 4));
/// let patches = extract(image.view(), (2, 2), (2, 2)).unwrap();
/// assert_eq!(patches.dim(), (9, 2, 2, 4));
/// ```
pub fn extract<T>(
    image: ArrayView3<T>,
    kernel: impl Into<Window>,
    stride: impl Into<Window>,
) -> Result<Array4<T>>
where
    T: Clone + Zero,
{
    let grid = PatchGrid::new(
        ImageShape::of(&image),
        kernel.into(),
        stride.into(),
        EdgePolicy::Drop,
    )?;
    Ok(extract_on(&grid, image))
}

/// [`extract`] for an image of dynamic rank.
///
/// # Errors
/// `TileError::InvalidArgument` if `image` is not rank 3, plus everything
/// [`extract`] rejects.
pub fn extract_dyn<T>(
    image: ArrayViewD<T>,
    kernel: impl Into<Window>,
    stride: impl Into<Window>,
) -> Result<Array4<T>>
where
    T: Clone + Zero,
{
    extract(into_image(image)?, kernel, stride)
}

/// Lazily yield the patches [`extract`] would produce, one at a time.
///
/// Arguments are validated up front; the returned iterator cannot fail.
pub fn iter_patches<'a, T>(
    image: ArrayView3<'a, T>,
    kernel: impl Into<Window>,
    stride: impl Into<Window>,
) -> Result<PatchIter<'a, T>>
where
    T: Clone + Zero,
{
    let grid = PatchGrid::new(
        ImageShape::of(&image),
        kernel.into(),
        stride.into(),
        EdgePolicy::Drop,
    )?;
    Ok(PatchIter::new(grid, image))
}

/// Yield patches in batches of `config.batch_size` (the last one may be shorter).
pub fn iter_batches<'a, T>(
    image: ArrayView3<'a, T>,
    config: &TilerConfig,
) -> Result<PatchBatches<'a, T>>
where
    T: Clone + Zero,
{
    config.validate()?;
    let grid = PatchGrid::new(
        ImageShape::of(&image),
        config.kernel,
        config.stride,
        config.edge_policy,
    )?;
    Ok(PatchBatches::new(grid, image, config.batch_size))
}

pub(crate) fn into_image<T>(image: ArrayViewD<T>) -> Result<ArrayView3<T>> {
    let ndim = image.ndim();
    image
        .into_dimensionality::<Ix3>()
        .map_err(|_| TileError::invalid(format!("image must have rank 3, got rank {ndim}")))
}

/// Copy every patch of `grid` out of `image`. `grid` must have been built
/// from `image`'s shape.
pub(crate) fn extract_on<T>(grid: &PatchGrid, image: ArrayView3<T>) -> Array4<T>
where
    T: Clone + Zero,
{
    let kernel = grid.kernel();
    debug!(
        "Extracting {} patches ({}x{} origins, kernel {}, stride {}, {:?}) from {}",
        grid.len(),
        grid.rows(),
        grid.cols(),
        kernel,
        grid.stride(),
        grid.policy(),
        grid.shape()
    );

    let channels = grid.shape().channels;
    let mut patches = Array4::zeros((grid.len(), kernel.rows, kernel.cols, channels));
    for (slot, origin) in patches.outer_iter_mut().zip(grid.offsets()) {
        copy_patch(grid, &image, origin, slot);
    }
    patches
}

/// Copy the in-bounds part of the window at `origin` into `dst`.
/// Anything past the image edge keeps whatever `dst` already holds (zeros).
fn copy_patch<T: Clone>(
    grid: &PatchGrid,
    image: &ArrayView3<T>,
    origin: (usize, usize),
    mut dst: ArrayViewMut3<T>,
) {
    let (row, col) = origin;
    let extent = grid.clipped_extent(origin);
    dst.slice_mut(s![..extent.rows, ..extent.cols, ..]).assign(&image.slice(s![
        row..row + extent.rows,
        col..col + extent.cols,
        ..
    ]));
}

fn zeroed_patch<T: Clone + Zero>(grid: &PatchGrid) -> Array3<T> {
    let kernel = grid.kernel();
    Array3::zeros((kernel.rows, kernel.cols, grid.shape().channels))
}

/// Lazy patch producer backed by a [`PatchGrid`].
///
/// Finite and restartable: clone it before consuming to walk the grid again.
#[derive(Debug, Clone)]
pub struct PatchIter<'a, T> {
    grid: PatchGrid,
    image: ArrayView3<'a, T>,
    next: usize,
}

impl<'a, T> PatchIter<'a, T> {
    pub(crate) fn new(grid: PatchGrid, image: ArrayView3<'a, T>) -> Self {
        Self {
            grid,
            image,
            next: 0,
        }
    }
}

impl<T: Clone + Zero> Iterator for PatchIter<'_, T> {
    type Item = Array3<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let origin = self.grid.offset(self.next)?;
        self.next += 1;

        let mut patch = zeroed_patch(&self.grid);
        copy_patch(&self.grid, &self.image, origin, patch.view_mut());
        Some(patch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.grid.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl<T: Clone + Zero> ExactSizeIterator for PatchIter<'_, T> {}

/// Batched patch producer yielding `[n, kh, kw, channels]` arrays.
#[derive(Debug, Clone)]
pub struct PatchBatches<'a, T> {
    grid: PatchGrid,
    image: ArrayView3<'a, T>,
    batch_size: usize,
    next: usize,
}

impl<'a, T> PatchBatches<'a, T> {
    pub(crate) fn new(grid: PatchGrid, image: ArrayView3<'a, T>, batch_size: usize) -> Self {
        Self {
            grid,
            image,
            batch_size,
            next: 0,
        }
    }
}

impl<T: Clone + Zero> Iterator for PatchBatches<'_, T> {
    type Item = Array4<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.grid.len() - self.next;
        if remaining == 0 {
            return None;
        }

        let count = remaining.min(self.batch_size);
        let kernel = self.grid.kernel();
        let channels = self.grid.shape().channels;
        let mut batch = Array4::zeros((count, kernel.rows, kernel.cols, channels));
        for (i, slot) in batch.outer_iter_mut().enumerate() {
            let origin = self.grid.offset(self.next + i)?;
            copy_patch(&self.grid, &self.image, origin, slot);
        }
        self.next += count;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches = (self.grid.len() - self.next).div_ceil(self.batch_size);
        (batches, Some(batches))
    }
}

impl<T: Clone + Zero> ExactSizeIterator for PatchBatches<'_, T> {}
