//! Tiling configuration.
//!
//! A [`TilerConfig`] bundles the kernel, stride, edge policy and batch size
//! used by [`crate::PatchTiler`]. Configs are plain serde values and can be
//! stored as JSON next to the data they were used on, so a model pipeline can
//! reconstruct predictions with exactly the grid that produced its inputs.

use crate::error::{Result, TileError};
use crate::patches::grid::{validate_windows, EdgePolicy};
use crate::window::Window;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Window parameters for patch extraction and reconstruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TilerConfig {
    /// Patch size `(rows, cols)`
    pub kernel: Window,
    /// Step between successive patch origins `(rows, cols)`
    pub stride: Window,
    /// Handling of origins near the trailing edge
    pub edge_policy: EdgePolicy,
    /// Number of patches per batch for batched extraction
    pub batch_size: usize,
}

impl Default for TilerConfig {
    fn default() -> Self {
        Self {
            kernel: Window::square(16),
            stride: Window::square(16),
            edge_policy: EdgePolicy::Drop,
            batch_size: 1,
        }
    }
}

impl TilerConfig {
    /// Non-overlapping tiling with square patches of `size`
    pub fn square(size: usize) -> Self {
        Self {
            kernel: Window::square(size),
            stride: Window::square(size),
            ..Self::default()
        }
    }

    pub fn with_kernel(mut self, kernel: impl Into<Window>) -> Self {
        self.kernel = kernel.into();
        self
    }

    pub fn with_stride(mut self, stride: impl Into<Window>) -> Self {
        self.stride = stride.into();
        self
    }

    pub fn with_edge_policy(mut self, edge_policy: EdgePolicy) -> Self {
        self.edge_policy = edge_policy;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Check the parts of the config that do not depend on an image.
    ///
    /// Kernel and stride must be at least 1x1 and the batch size at least 1.
    /// Fit against a concrete image is checked when a grid is built.
    pub fn validate(&self) -> Result<()> {
        validate_windows(self.kernel, self.stride)?;
        if self.batch_size == 0 {
            return Err(TileError::invalid("batch_size must be at least 1"));
        }
        Ok(())
    }

    /// Parse and validate a JSON config
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a JSON config file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_matches_16px_tiles() {
        let config = TilerConfig::default();
        assert_eq!(config.kernel, Window::square(16));
        assert_eq!(config.stride, Window::square(16));
        assert_eq!(config.edge_policy, EdgePolicy::Drop);
        assert_eq!(config.batch_size, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TilerConfig::square(32)
            .with_stride((16, 8))
            .with_edge_policy(EdgePolicy::ZeroPad)
            .with_batch_size(64);
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"zero-pad\""));
        assert_eq!(TilerConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            TilerConfig::from_json_str(r#"{"kernel": {"rows": 8, "cols": 4}}"#).unwrap();
        assert_eq!(config.kernel, Window::new(8, 4));
        assert_eq!(config.stride, Window::square(16));
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = TilerConfig::from_json_str(r#"{"batch_size": 0}"#).unwrap_err();
        assert!(matches!(err, TileError::InvalidArgument(_)));

        let err =
            TilerConfig::from_json_str(r#"{"stride": {"rows": 0, "cols": 1}}"#).unwrap_err();
        assert!(matches!(err, TileError::InvalidArgument(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = TilerConfig::from_json_str("{kernel: 3").unwrap_err();
        assert!(matches!(err, TileError::Config(_)));
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tiler.json");

        let config = TilerConfig::square(4).with_stride((2, 2));
        config.save_to_file(&path).unwrap();
        assert_eq!(TilerConfig::load_from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = TilerConfig::load_from_file(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, TileError::Io(_)));
    }
}
