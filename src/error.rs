use thiserror::Error;

/// Input rejected before it reaches the store.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter some text")]
    EmptyText,
}

/// Errors raised while accepting an uploaded image.
///
/// The display strings are shown to the user as-is.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Please upload a valid image file (JPEG, PNG, or WebP)")]
    UnsupportedType(String),

    #[error("File size must be less than {}MB", .limit / (1024 * 1024))]
    TooLarge { size: usize, limit: usize },

    #[error("Failed to read file")]
    Read(#[from] std::io::Error),

    #[error("Failed to load image")]
    Decode(#[from] image::ImageError),
}

/// Errors raised by the export dialog.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export")]
    NoSource,

    #[error("An export is already in progress")]
    InFlight,

    #[error("Export failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("Export failed: {0}")]
    Save(#[from] std::io::Error),

    #[error("Export failed: WebP encoder error {0}")]
    Webp(String),

    #[error("Export failed: the save worker went away")]
    Cancelled,
}

#[derive(Debug, Error)]
pub enum FontError {
    #[error("Failed to read font file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Invalid font data: {0}")]
    Parse(&'static str),
}

/// Errors that can occur while loading or saving the editor configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to serialize config: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
