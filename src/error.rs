use miniz_oxide::deflate::core::TDEFLStatus;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PngError {
    #[error("Invalid data")]
    InvalidData,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Compression failed: {0:?}")]
    Compression(TDEFLStatus),

    // Configuration errors
    #[error("Invalid argument width")]
    InvalidArgumentWidth,
    #[error("Invalid argument height")]
    InvalidArgumentHeight,
    #[error("Invalid argument compression level")]
    InvalidArgumentCompressionLevel,
    #[error("Invalid argument chunk size")]
    InvalidArgumentChunkSize,
    #[error("Configuration cannot change after encoding has started")]
    ConfigurationLocked,

    // Lifecycle errors
    #[error("Encoder already started")]
    AlreadyStarted,
    #[error("Encoder not started")]
    NotStarted,
    #[error("Encoder already ended")]
    AlreadyEnded,
    #[error("Compressed stream already finished")]
    StreamFinished,
}

impl PngError {
    /// True for errors raised by the underlying sink.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
