use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("tiling error: {0}")]
    Tile(#[from] tiler::TileError),

    #[error("invalid scene parameters: {0}")]
    InvalidParams(String),

    #[error("invalid noise parameters: {0}")]
    Noise(#[from] rand_distr::NormalError),

    #[error("array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}
