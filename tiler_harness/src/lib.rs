//! Harness for the patch tiler
//!
//! Provides seeded synthetic imagery and round-trip measurement used by the
//! `tile_roundtrip` binary and the integration tests.

pub mod error;
pub mod report;
pub mod synthetic;

pub use error::HarnessError;
pub use report::{run_roundtrip, RoundTripReport};
pub use synthetic::{synthetic_image, SceneParams};
