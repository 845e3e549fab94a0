//! Config-bound front end over the extraction and reconstruction functions.

use crate::config::TilerConfig;
use crate::error::Result;
use crate::image_shape::ImageShape;
use crate::patches::extract::{extract_on, into_image, PatchBatches, PatchIter};
use crate::patches::grid::PatchGrid;
use crate::patches::reconstruct::reconstruct_on;
use ndarray::{Array3, Array4, ArrayView3, ArrayView4, ArrayViewD, NdFloat};
use num_traits::Zero;

/// Extraction and reconstruction bound to one [`TilerConfig`].
///
/// Holding the config in one place keeps the forward and inverse passes on
/// the same grid, which reconstruction relies on.
///
/// ```
/// use ndarray::Array3;
/// use tiler::{EdgePolicy, PatchTiler, TilerConfig};
///
/// let tiler = PatchTiler::new(
///     TilerConfig::square(4).with_stride((2, 2)).with_edge_policy(EdgePolicy::ZeroPad),
/// )
/// .unwrap();
///
/// let image = Array3::<f32>::ones((10, 9, 3));
/// let patches = tiler.extract(image.view()).unwrap();
/// let rebuilt = tiler.reconstruct(patches.view(), (10, 9, 3)).unwrap();
/// assert_eq!(rebuilt, image);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchTiler {
    config: TilerConfig,
}

impl PatchTiler {
    pub fn new(config: TilerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TilerConfig {
        &self.config
    }

    /// Origin grid for an image of `shape`
    pub fn grid(&self, shape: impl Into<ImageShape>) -> Result<PatchGrid> {
        PatchGrid::new(
            shape.into(),
            self.config.kernel,
            self.config.stride,
            self.config.edge_policy,
        )
    }

    pub fn extract<T: Clone + Zero>(&self, image: ArrayView3<T>) -> Result<Array4<T>> {
        let grid = self.grid(ImageShape::of(&image))?;
        Ok(extract_on(&grid, image))
    }

    pub fn extract_dyn<T: Clone + Zero>(&self, image: ArrayViewD<T>) -> Result<Array4<T>> {
        self.extract(into_image(image)?)
    }

    pub fn iter<'a, T: Clone + Zero>(&self, image: ArrayView3<'a, T>) -> Result<PatchIter<'a, T>> {
        let grid = self.grid(ImageShape::of(&image))?;
        Ok(PatchIter::new(grid, image))
    }

    pub fn batches<'a, T: Clone + Zero>(
        &self,
        image: ArrayView3<'a, T>,
    ) -> Result<PatchBatches<'a, T>> {
        let grid = self.grid(ImageShape::of(&image))?;
        Ok(PatchBatches::new(grid, image, self.config.batch_size))
    }

    pub fn reconstruct<T: NdFloat>(
        &self,
        patches: ArrayView4<T>,
        target: impl Into<ImageShape>,
    ) -> Result<Array3<T>> {
        let grid = self.grid(target)?;
        reconstruct_on(&grid, patches)
    }
}
