use thiserror::Error;

/// Everything that can end a run early
#[derive(Error, Debug)]
pub enum LightningError {
    /// Size argument that cannot produce a grid
    #[error("invalid size {0}: expected a value between 2 and 16384")]
    InvalidSize(u32),

    /// The direction sampler produced a code outside 0..=7
    #[error("unexpected direction sample: {0}")]
    InvalidDirectionSample(u32),

    /// Cell access outside the grid
    #[error("cell ({x}, {y}) is outside the {side}x{side} grid")]
    OutOfBounds { x: i64, y: i64, side: u32 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("PNG export failed: {0}")]
    Image(#[from] image::ImageError),

    #[error("GIF export failed: {0}")]
    Gif(#[from] gif::EncodingError),
}

pub type Result<T> = std::result::Result<T, LightningError>;
