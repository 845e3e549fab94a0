//! Synthetic multispectral imagery for exercising the tiler.
//!
//! Each band is Gaussian noise around its own mean, so patches differ from
//! one another and band mix-ups show up as large reconstruction errors.

use crate::error::HarnessError;
use ndarray::{Array3, Axis};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use tiler::ImageShape;

/// Parameters for [`synthetic_image`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneParams {
    pub shape: ImageShape,
    /// Mean of the first band
    pub mean: f64,
    /// Noise standard deviation, also the spacing between band means
    pub std_dev: f64,
    pub seed: u64,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            shape: ImageShape::new(256, 256, 4),
            mean: 100.0,
            std_dev: 10.0,
            seed: 42,
        }
    }
}

/// Generate a deterministic `[row, column, band]` noise cube.
///
/// Band `b` is drawn from `Normal(mean + b * std_dev, std_dev)`. The same
/// parameters always produce the same image.
///
/// # Errors
/// * `HarnessError::InvalidParams` - `std_dev` is negative
/// * `HarnessError::Noise` - `std_dev` is not finite
///
/// # Example
/// ```
/// use tiler::ImageShape;
/// use tiler_harness::synthetic::{synthetic_image, SceneParams};
///
/// let params = SceneParams { shape: ImageShape::new(8, 8, 3), ..SceneParams::default() };
/// let image = synthetic_image(&params).unwrap();
/// assert_eq!(image.dim(), (8, 8, 3));
/// ```
pub fn synthetic_image(params: &SceneParams) -> Result<Array3<f64>, HarnessError> {
    if params.std_dev < 0.0 {
        return Err(HarnessError::InvalidParams(format!(
            "std_dev must be non-negative, got {}",
            params.std_dev
        )));
    }

    let mut rng = StdRng::seed_from_u64(params.seed);
    let mut image = params.shape.zeros::<f64>();

    for (band, mut plane) in image.axis_iter_mut(Axis(2)).enumerate() {
        let dist = Normal::new(params.mean + band as f64 * params.std_dev, params.std_dev)?;
        plane.iter_mut().for_each(|px| *px = dist.sample(&mut rng));
    }

    Ok(image)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(seed: u64) -> SceneParams {
        SceneParams {
            shape: ImageShape::new(32, 24, 3),
            mean: 50.0,
            std_dev: 5.0,
            seed,
        }
    }

    #[test]
    fn test_same_seed_same_image() {
        let a = synthetic_image(&small(7)).unwrap();
        let b = synthetic_image(&small(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seed_different_image() {
        let a = synthetic_image(&small(7)).unwrap();
        let b = synthetic_image(&small(8)).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_band_means_are_spaced() {
        let image = synthetic_image(&small(1)).unwrap();
        for band in 0..3 {
            let mean = image.index_axis(Axis(2), band).mean().unwrap();
            let expected = 50.0 + band as f64 * 5.0;
            // 768 samples per band, standard error ~0.18
            assert!((mean - expected).abs() < 1.5, "band {band}: {mean}");
        }
    }

    #[test]
    fn test_negative_std_dev_rejected() {
        let params = SceneParams {
            std_dev: -1.0,
            ..small(1)
        };
        assert!(matches!(
            synthetic_image(&params),
            Err(HarnessError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_non_finite_std_dev_rejected() {
        for std_dev in [f64::NAN, f64::INFINITY] {
            let params = SceneParams {
                std_dev,
                ..small(1)
            };
            assert!(matches!(
                synthetic_image(&params),
                Err(HarnessError::Noise(_))
            ));
        }
    }
}
