//! Reassembly of an image from a patch sequence.
//!
//! Overlapping contributions are averaged, not overwritten: each output pixel
//! is the mean of every patch value that landed on it. Pixels no patch
//! reaches stay zero.

use crate::error::{Result, TileError};
use crate::image_shape::ImageShape;
use crate::patches::grid::{EdgePolicy, PatchGrid};
use crate::window::Window;
use log::debug;
use ndarray::{s, Array2, Array3, ArrayView4, ArrayViewD, Axis, Ix4, NdFloat, Zip};

/// Rebuild an image of `target` shape from patches produced by
/// [`crate::extract`] with the same `kernel` and `stride`.
///
/// Patches carry no coordinates; patch `i` is placed at the `i`-th origin of
/// the same row-major enumeration extraction uses.
///
/// # Errors
/// * `TileError::InvalidArgument` - zero kernel/stride component, or a window
///   larger than `target`
/// * `TileError::PatchSizeMismatch` - patch rows/cols differ from `kernel`
/// * `TileError::ChannelMismatch` - patch bands differ from `target.channels`
/// * `TileError::PatchCountMismatch` - patch count differs from the grid size
///
/// # Example
/// ```
/// use ndarray::Array3;
/// use tiler::{extract, reconstruct};
///
/// let image = Array3::from_shape_fn((4, 4, 2), |(r, c, b)| (r * 4 + c + b) as f64);
/// let patches = extract(image.view(), (2, 2), (2, 2)).unwrap();
/// let rebuilt = reconstruct(patches.view(), (4, 4, 2), (2, 2), (2, 2)).unwrap();
/// assert_eq!(rebuilt, image);
/// ```
pub fn reconstruct<T: NdFloat>(
    patches: ArrayView4<T>,
    target: impl Into<ImageShape>,
    kernel: impl Into<Window>,
    stride: impl Into<Window>,
) -> Result<Array3<T>> {
    let grid = PatchGrid::new(target.into(), kernel.into(), stride.into(), EdgePolicy::Drop)?;
    reconstruct_on(&grid, patches)
}

/// [`reconstruct`] for a patch array of dynamic rank.
///
/// # Errors
/// `TileError::InvalidArgument` if `patches` is not rank 4, plus everything
/// [`reconstruct`] rejects.
pub fn reconstruct_dyn<T: NdFloat>(
    patches: ArrayViewD<T>,
    target: impl Into<ImageShape>,
    kernel: impl Into<Window>,
    stride: impl Into<Window>,
) -> Result<Array3<T>> {
    let ndim = patches.ndim();
    let patches = patches.into_dimensionality::<Ix4>().map_err(|_| {
        TileError::invalid(format!("patches must have rank 4, got rank {ndim}"))
    })?;
    reconstruct(patches, target, kernel, stride)
}

pub(crate) fn reconstruct_on<T: NdFloat>(
    grid: &PatchGrid,
    patches: ArrayView4<T>,
) -> Result<Array3<T>> {
    check_patches(grid, &patches)?;

    let shape = grid.shape();
    debug!(
        "Reconstructing {} from {} patches (kernel {}, stride {}, {:?})",
        shape,
        grid.len(),
        grid.kernel(),
        grid.stride(),
        grid.policy()
    );

    let mut image = shape.zeros::<T>();
    let mut coverage = Array2::<T>::zeros((shape.height, shape.width));

    for (patch, origin) in patches.outer_iter().zip(grid.offsets()) {
        let (row, col) = origin;
        let extent = grid.clipped_extent(origin);

        let mut region = image.slice_mut(s![row..row + extent.rows, col..col + extent.cols, ..]);
        region += &patch.slice(s![..extent.rows, ..extent.cols, ..]);

        coverage
            .slice_mut(s![row..row + extent.rows, col..col + extent.cols])
            .mapv_inplace(|count| count + T::one());
    }

    Zip::from(image.lanes_mut(Axis(2)))
        .and(&coverage)
        .for_each(|mut bands, &count| {
            if count > T::zero() {
                bands.mapv_inplace(|v| v / count);
            }
        });

    Ok(image)
}

fn check_patches<T>(grid: &PatchGrid, patches: &ArrayView4<T>) -> Result<()> {
    let (count, rows, cols, channels) = patches.dim();
    let kernel = grid.kernel();

    if (rows, cols) != (kernel.rows, kernel.cols) {
        return Err(TileError::PatchSizeMismatch {
            kernel_rows: kernel.rows,
            kernel_cols: kernel.cols,
            actual_rows: rows,
            actual_cols: cols,
        });
    }
    if channels != grid.shape().channels {
        return Err(TileError::ChannelMismatch {
            expected: grid.shape().channels,
            actual: channels,
        });
    }
    if count != grid.len() {
        return Err(TileError::PatchCountMismatch {
            expected: grid.len(),
            actual: count,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patches::extract::extract;
    use approx::assert_abs_diff_eq;
    use ndarray::{Array, Array4, IxDyn};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn random_image(shape: (usize, usize, usize), seed: u64) -> Array3<f64> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        Array3::from_shape_simple_fn(shape, || rng.random_range(-10.0..10.0))
    }

    #[test]
    fn test_roundtrip_non_overlapping() {
        let image = random_image((8, 12, 5), 7);
        let patches = extract(image.view(), (4, 3), (4, 3)).unwrap();
        let rebuilt = reconstruct(patches.view(), (8, 12, 5), (4, 3), (4, 3)).unwrap();
        assert_eq!(rebuilt, image);
    }

    #[test]
    fn test_roundtrip_overlapping_is_mean_of_identical_values() {
        let image = random_image((9, 7, 2), 11);
        let patches = extract(image.view(), (3, 3), (1, 2)).unwrap();
        let rebuilt = reconstruct(patches.view(), (9, 7, 2), (3, 3), (1, 2)).unwrap();
        // Every pixel is reached, and every contribution is the same sample
        for (&got, &want) in rebuilt.iter().zip(image.iter()) {
            assert_abs_diff_eq!(got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_constant_image_with_overlap() {
        let v = 3.25;
        let image = Array3::from_elem((3, 3, 1), v);
        let patches = extract(image.view(), (2, 2), (1, 1)).unwrap();
        let rebuilt = reconstruct(patches.view(), (3, 3, 1), (2, 2), (1, 1)).unwrap();
        assert!(rebuilt.iter().all(|&p| p == v));
    }

    #[test]
    fn test_overlap_is_averaged_not_overwritten() {
        // Four 2x2 patches over a 3x3 image, patch i filled with value i
        let patches = Array4::from_shape_fn((4, 2, 2, 1), |(i, _, _, _)| i as f64);
        let rebuilt = reconstruct(patches.view(), (3, 3, 1), (2, 2), (1, 1)).unwrap();

        assert_eq!(rebuilt[[0, 0, 0]], 0.0);
        assert_eq!(rebuilt[[0, 1, 0]], 0.5); // patches 0, 1
        assert_eq!(rebuilt[[1, 0, 0]], 1.0); // patches 0, 2
        assert_eq!(rebuilt[[1, 1, 0]], 1.5); // all four
        assert_eq!(rebuilt[[2, 2, 0]], 3.0);
    }

    #[test]
    fn test_uncovered_edge_is_zero() {
        let image = Array3::from_elem((5, 5, 1), 2.0);
        let patches = extract(image.view(), (2, 2), (2, 2)).unwrap();
        let rebuilt = reconstruct(patches.view(), (5, 5, 1), (2, 2), (2, 2)).unwrap();

        for i in 0..5 {
            assert_eq!(rebuilt[[4, i, 0]], 0.0);
            assert_eq!(rebuilt[[i, 4, 0]], 0.0);
        }
        assert!(rebuilt.slice(s![..4, ..4, ..]).iter().all(|&p| p == 2.0));
    }

    #[test]
    fn test_patch_count_mismatch() {
        let image = Array3::<f64>::zeros((6, 6, 1));
        let patches = extract(image.view(), (2, 2), (2, 2)).unwrap();
        let short = patches.slice(s![..8, .., .., ..]);

        let err = reconstruct(short, (6, 6, 1), (2, 2), (2, 2)).unwrap_err();
        assert!(err.is_shape_mismatch());
        assert!(matches!(
            err,
            TileError::PatchCountMismatch {
                expected: 9,
                actual: 8
            }
        ));
    }

    #[test]
    fn test_patch_size_mismatch() {
        let patches = Array4::<f64>::zeros((9, 3, 2, 1));
        let err = reconstruct(patches.view(), (6, 6, 1), (2, 2), (2, 2)).unwrap_err();
        assert!(matches!(err, TileError::PatchSizeMismatch { .. }));
    }

    #[test]
    fn test_channel_mismatch() {
        let patches = Array4::<f64>::zeros((9, 2, 2, 3));
        let err = reconstruct(patches.view(), (6, 6, 4), (2, 2), (2, 2)).unwrap_err();
        assert!(matches!(
            err,
            TileError::ChannelMismatch {
                expected: 4,
                actual: 3
            }
        ));
    }

    #[test]
    fn test_invalid_windows() {
        let patches = Array4::<f64>::zeros((9, 2, 2, 1));
        assert!(matches!(
            reconstruct(patches.view(), (6, 6, 1), (0, 2), (2, 2)),
            Err(TileError::InvalidArgument(_))
        ));
        assert!(matches!(
            reconstruct(patches.view(), (6, 6, 1), (2, 2), (2, 0)),
            Err(TileError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_window_larger_than_target() {
        let patches = Array4::<f64>::zeros((1, 7, 7, 1));
        assert!(matches!(
            reconstruct(patches.view(), (6, 6, 1), (7, 7), (1, 1)),
            Err(TileError::InvalidArgument(_))
        ));

        let patches = Array4::<f64>::zeros((1, 2, 2, 1));
        assert!(matches!(
            reconstruct(patches.view(), (6, 6, 1), (2, 2), (1, 8)),
            Err(TileError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_dyn_rank_checked() {
        let patches = Array::<f64, _>::zeros(IxDyn(&[2, 2, 1]));
        let err = reconstruct_dyn(patches.view(), (4, 4, 1), (2, 2), (2, 2)).unwrap_err();
        assert!(matches!(err, TileError::InvalidArgument(_)));

        let patches = Array::<f64, _>::ones(IxDyn(&[4, 2, 2, 1]));
        let rebuilt = reconstruct_dyn(patches.view(), (4, 4, 1), (2, 2), (2, 2)).unwrap();
        assert!(rebuilt.iter().all(|&p| p == 1.0));
    }

    #[test]
    fn test_f32_roundtrip() {
        let image = Array3::<f32>::from_shape_fn((4, 6, 3), |(r, c, b)| (r + c * b) as f32);
        let patches = extract(image.view(), (2, 3), (2, 3)).unwrap();
        let rebuilt = reconstruct(patches.view(), (4, 6, 3), (2, 3), (2, 3)).unwrap();
        assert_eq!(rebuilt, image);
    }
}
