//! The streaming PNG encoder and its lifecycle.
//!
//! ```text
//! Configured --start--> Started --write_data*--> Started --end--> Ended
//! ```
//!
//! Configuration is only accepted in `Configured`. `start` writes the
//! signature and IHDR, `write_data` pushes pixel bands through the zlib
//! stream and emits IDAT chunks once enough compressed data has piled up,
//! and `end` writes IEND and closes the sink. There is no way back to
//! `Configured`.

use log::{debug, info, warn};

use crate::chunk_type::ChunkType;
use crate::constants::FILTER_TYPE_NONE;
use crate::deflate_stream::DeflateStream;
use crate::error::PngError;
use crate::png_stream_writer::PngStreamWriter;
use crate::scanline;
use crate::sink::SinkTarget;
use crate::{ColorMode, EncoderConfig, EncoderState, FilterStrategy};

pub struct PngStreamEncoder<T: SinkTarget> {
    target: T,
    config: EncoderConfig,
    state: EncoderState,
    writer: Option<PngStreamWriter<T::Sink>>,
    stream: Option<DeflateStream>,
    bytes_written: u64,
}

impl<T: SinkTarget> PngStreamEncoder<T> {
    /// Creates an encoder with the default configuration. The image size must
    /// be set before `start`.
    pub fn new(target: T) -> Self {
        Self {
            target,
            config: EncoderConfig::default(),
            state: EncoderState::Configured,
            writer: None,
            stream: None,
            bytes_written: 0,
        }
    }

    pub fn with_size(target: T, width: u32, height: u32) -> Result<Self, PngError> {
        let mut encoder = Self::new(target);
        encoder.set_image_size(width, height)?;
        Ok(encoder)
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn state(&self) -> EncoderState {
        self.state
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Bytes written to the sink so far, including framing.
    pub fn bytes_written(&self) -> u64 {
        match &self.writer {
            Some(writer) => writer.len(),
            None => self.bytes_written,
        }
    }

    fn ensure_configurable(&self) -> Result<(), PngError> {
        match self.state {
            EncoderState::Configured => Ok(()),
            EncoderState::Started | EncoderState::Ended => Err(PngError::ConfigurationLocked),
        }
    }

    /// Replaces the whole configuration.
    pub fn configure(&mut self, config: EncoderConfig) -> Result<(), PngError> {
        self.ensure_configurable()?;
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn set_image_size(&mut self, width: u32, height: u32) -> Result<(), PngError> {
        self.ensure_configurable()?;
        let mut config = self.config;
        config.width = width;
        config.height = height;
        config.validate_dimensions()?;
        self.config = config;
        Ok(())
    }

    pub fn set_color_mode(&mut self, color_mode: ColorMode) -> Result<(), PngError> {
        self.ensure_configurable()?;
        self.config.color_mode = color_mode;
        Ok(())
    }

    pub fn set_filter(&mut self, enable: bool) -> Result<(), PngError> {
        self.ensure_configurable()?;
        self.config.filter_strategy = FilterStrategy::from_flag(enable);
        Ok(())
    }

    pub fn set_compression_level(&mut self, level: u32) -> Result<(), PngError> {
        self.ensure_configurable()?;
        let mut config = self.config;
        config.compression_level = level;
        config.validate_stream()?;
        self.config = config;
        Ok(())
    }

    pub fn set_chunk_size(&mut self, chunk_size: usize) -> Result<(), PngError> {
        self.ensure_configurable()?;
        let mut config = self.config;
        config.chunk_size = chunk_size;
        config.validate_stream()?;
        self.config = config;
        Ok(())
    }

    /// Opens the sink and writes the signature and the IHDR chunk.
    ///
    /// On failure the encoder stays in `Configured` and the sink, if it was
    /// opened, is released again.
    pub fn start(&mut self) -> Result<(), PngError> {
        match self.state {
            EncoderState::Configured => {}
            EncoderState::Started => return Err(PngError::AlreadyStarted),
            EncoderState::Ended => return Err(PngError::AlreadyEnded),
        }
        self.config.validate()?;

        let mut writer = PngStreamWriter::new(self.target.open()?);
        if let Err(e) = Self::write_preamble(&mut writer, &self.config) {
            if let Err(close_error) = self.target.close(writer.into_inner()) {
                warn!("failed to release sink after header error: {}", close_error);
            }
            return Err(e);
        }

        info!(
            "started {}x{} PNG: {:?} color, {:?} strategy, level {}, chunk size {}",
            self.config.width,
            self.config.height,
            self.config.color_mode,
            self.config.filter_strategy,
            self.config.compression_level,
            self.config.chunk_size
        );

        self.writer = Some(writer);
        self.stream = Some(DeflateStream::new(
            self.config.filter_strategy,
            self.config.compression_level,
        ));
        self.state = EncoderState::Started;
        Ok(())
    }

    fn write_preamble(
        writer: &mut PngStreamWriter<T::Sink>,
        config: &EncoderConfig,
    ) -> Result<(), PngError> {
        writer.write_signature()?;
        writer.write_image_header(config.width, config.height)
    }

    /// Encodes a band of whole rows. `is_last` finishes the zlib stream and
    /// flushes everything compressed so far.
    ///
    /// `pixels.len()` should be a multiple of the image width; a trailing
    /// partial row is dropped.
    pub fn write_data(&mut self, pixels: &[u32], is_last: bool) -> Result<(), PngError> {
        match self.state {
            EncoderState::Started => {}
            EncoderState::Configured => return Err(PngError::NotStarted),
            EncoderState::Ended => return Err(PngError::AlreadyEnded),
        }
        let (Some(writer), Some(stream)) = (self.writer.as_mut(), self.stream.as_mut()) else {
            return Err(PngError::NotStarted);
        };

        let raw = scanline::transform(
            pixels,
            self.config.width as usize,
            self.config.color_mode,
            FILTER_TYPE_NONE,
        );
        stream.feed(&raw)?;
        if is_last {
            stream.finish()?;
        }

        if stream.len() > self.config.chunk_size || is_last {
            Self::flush_compressed(writer, stream, self.config.chunk_size)?;
        }
        Ok(())
    }

    fn flush_compressed(
        writer: &mut PngStreamWriter<T::Sink>,
        stream: &mut DeflateStream,
        chunk_size: usize,
    ) -> Result<(), PngError> {
        let compressed = stream.drain();
        debug!(
            "flushing {} compressed bytes ({} raw bytes in so far)",
            compressed.len(),
            stream.total_in()
        );
        writer.write_chunks(ChunkType::ImageData, &compressed, chunk_size)
    }

    /// Writes IEND and closes the sink.
    ///
    /// If the last band was never flagged, the zlib stream is finished and
    /// its remaining bytes are written as IDAT first.
    pub fn end(&mut self) -> Result<(), PngError> {
        match self.state {
            EncoderState::Started => {}
            EncoderState::Configured => return Err(PngError::NotStarted),
            EncoderState::Ended => return Err(PngError::AlreadyEnded),
        }
        let (Some(writer), Some(stream)) = (self.writer.as_mut(), self.stream.as_mut()) else {
            return Err(PngError::NotStarted);
        };

        if !stream.is_finished() {
            stream.finish()?;
        }
        if !stream.is_empty() {
            Self::flush_compressed(writer, stream, self.config.chunk_size)?;
        }
        writer.write_image_end()?;
        writer.flush()?;

        self.state = EncoderState::Ended;
        self.stream = None;
        if let Some(writer) = self.writer.take() {
            self.bytes_written = writer.len();
            self.target.close(writer.into_inner())?;
        }
        info!("finished PNG: {} bytes written", self.bytes_written);
        Ok(())
    }
}

impl<T: SinkTarget> Drop for PngStreamEncoder<T> {
    fn drop(&mut self) {
        if let Some(mut writer) = self.writer.take() {
            warn!(
                "encoder dropped before end; closing truncated output after {} bytes",
                writer.len()
            );
            if let Err(e) = writer.flush() {
                warn!("flush on drop failed: {}", e);
            }
            if let Err(e) = self.target.close(writer.into_inner()) {
                warn!("close on drop failed: {}", e);
            }
        }
    }
}
