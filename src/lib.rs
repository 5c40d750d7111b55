//! Streaming PNG encoder.
//!
//! Pixels arrive as packed `0xRRGGBB` values in row-major bands. Each band is
//! converted to raw scanlines, pushed through a persistent zlib stream, and
//! the compressed bytes are framed into size-bounded IDAT chunks as they
//! accumulate. See [`PngStreamEncoder`] for the lifecycle.

pub mod chunk_type;
pub mod constants;
pub mod crc;
pub mod deflate_stream;
pub mod encoder;
pub mod error;
pub mod png_stream_writer;
pub mod scanline;
pub mod sink;

pub use chunk_type::ChunkType;
pub use encoder::PngStreamEncoder;
pub use error::PngError;
pub use sink::{FileTarget, MemoryTarget, SinkTarget};

use constants::{DEFAULT_CHUNK_SIZE, MAXIMUM_COMPRESSION_LEVEL};
use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Per-pixel color transform applied before compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum ColorMode {
    /// Red, green and blue taken straight from the packed value.
    #[default]
    Direct = 1,
    /// Integer luminance written to all three samples.
    Grayscale = 2,
    /// Sepia tone matrix.
    Sepia = 3,
}

/// Compression strategy selected by the filter flag.
///
/// Neither variant changes the per-scanline filter byte, which is always
/// "none".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum FilterStrategy {
    /// Filtering disabled; favors speed.
    #[default]
    Unfiltered = 0,
    /// Filtering enabled; tuned for filtered data.
    Filtered = 1,
}

impl FilterStrategy {
    pub fn from_flag(enable: bool) -> Self {
        if enable { Self::Filtered } else { Self::Unfiltered }
    }

    pub fn is_filtered(self) -> bool {
        self == Self::Filtered
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncoderState {
    Configured,
    Started,
    Ended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncoderConfig {
    pub width: u32,
    pub height: u32,
    pub color_mode: ColorMode,
    pub filter_strategy: FilterStrategy,
    pub compression_level: u32,
    /// Compressed bytes buffered before IDAT chunks are emitted, and the
    /// upper bound of one IDAT payload.
    pub chunk_size: usize,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            color_mode: ColorMode::Direct,
            filter_strategy: FilterStrategy::Unfiltered,
            compression_level: 0,
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl EncoderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), PngError> {
        self.validate_dimensions()?;
        self.validate_stream()
    }

    pub fn validate_dimensions(&self) -> Result<(), PngError> {
        if self.width == 0 || self.width > i32::MAX as u32 {
            return Err(PngError::InvalidArgumentWidth);
        }
        if self.height == 0 || self.height > i32::MAX as u32 {
            return Err(PngError::InvalidArgumentHeight);
        }
        Ok(())
    }

    pub fn validate_stream(&self) -> Result<(), PngError> {
        if self.compression_level > MAXIMUM_COMPRESSION_LEVEL {
            return Err(PngError::InvalidArgumentCompressionLevel);
        }
        // A chunk length field must fit in 31 bits.
        if self.chunk_size == 0 || self.chunk_size > i32::MAX as usize {
            return Err(PngError::InvalidArgumentChunkSize);
        }
        Ok(())
    }
}
