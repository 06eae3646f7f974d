use thiserror::Error;

#[derive(Debug, Error)]
pub enum AtlasPackerError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Input missing: {0}")]
    InputMissing(String),
    #[error(
        "Sprite '{key}' ({width}x{height}) cannot be placed within the maximum atlas size {max_width}x{max_height}"
    )]
    PlacementFailure {
        key: String,
        width: u32,
        height: u32,
        max_width: u32,
        max_height: u32,
    },
    #[error("Duplicate sprite identifier: {0}")]
    DuplicateIdentifier(String),
    #[error("Invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, AtlasPackerError>;
