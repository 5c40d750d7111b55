//! PNG chunk stream writer.
//!
//! This module provides the `PngStreamWriter` which handles the generation
//! of the PNG signature and of length-prefixed, CRC-trailed chunks
//! (IHDR, IDAT, IEND) on top of any `std::io::Write` sink.

use std::io::Write;

use log::debug;

use crate::chunk_type::ChunkType;
use crate::constants::{
    BIT_DEPTH_8, CHUNK_OVERHEAD, COLOR_TYPE_TRUECOLOR, COMPRESSION_METHOD_DEFLATE,
    CRC32_INITIAL, FILTER_METHOD_ADAPTIVE, IHDR_PAYLOAD_SIZE, INTERLACE_METHOD_NONE,
    PNG_SIGNATURE,
};
use crate::crc;
use crate::error::PngError;

/// Writes `value` most-significant byte first into `buffer[offset..offset + 4]`.
///
/// # Panics
/// Panics if `buffer` has fewer than 4 bytes from `offset`.
#[inline]
pub fn write_u32_be(value: u32, buffer: &mut [u8], offset: usize) {
    buffer[offset..offset + 4].copy_from_slice(&value.to_be_bytes());
}

/// A writer for PNG files that frames payloads into chunks.
pub struct PngStreamWriter<W: Write> {
    sink: W,
    position: u64,
}

impl<W: Write> PngStreamWriter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink, position: 0 }
    }

    /// Number of bytes handed to the sink so far.
    pub fn len(&self) -> u64 {
        self.position
    }

    pub fn is_empty(&self) -> bool {
        self.position == 0
    }

    pub fn into_inner(self) -> W {
        self.sink
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), PngError> {
        self.sink.write_all(bytes)?;
        self.position += bytes.len() as u64;
        Ok(())
    }

    pub fn write_u32(&mut self, value: u32) -> Result<(), PngError> {
        let mut bytes = [0u8; 4];
        write_u32_be(value, &mut bytes, 0);
        self.write_bytes(&bytes)
    }

    pub fn flush(&mut self) -> Result<(), PngError> {
        self.sink.flush()?;
        Ok(())
    }

    pub fn write_signature(&mut self) -> Result<(), PngError> {
        self.write_bytes(&PNG_SIGNATURE)
    }

    /// Writes one chunk: length, tag, payload, CRC over tag and payload.
    pub fn write_chunk(&mut self, chunk_type: ChunkType, payload: &[u8]) -> Result<(), PngError> {
        let tag = chunk_type.tag();
        let crc = crc::finalize(crc::update(crc::update(CRC32_INITIAL, &tag), payload));

        self.write_u32(payload.len() as u32)?;
        self.write_bytes(&tag)?;
        self.write_bytes(payload)?;
        self.write_u32(crc)?;
        Ok(())
    }

    /// Writes `payload[start..start + len]` as a single chunk.
    ///
    /// # Panics
    /// Panics if the range is out of bounds for `payload`.
    pub fn write_chunk_range(
        &mut self,
        chunk_type: ChunkType,
        payload: &[u8],
        start: usize,
        len: usize,
    ) -> Result<(), PngError> {
        self.write_chunk(chunk_type, &payload[start..start + len])
    }

    /// Splits `payload` into consecutive chunks of at most `max_size` bytes.
    ///
    /// An empty payload emits nothing. Stops at the first failing chunk, which
    /// leaves the preceding chunks in the sink.
    pub fn write_chunks(
        &mut self,
        chunk_type: ChunkType,
        payload: &[u8],
        max_size: usize,
    ) -> Result<(), PngError> {
        if max_size == 0 {
            return Err(PngError::InvalidArgumentChunkSize);
        }

        let mut count = 0usize;
        for slice in payload.chunks(max_size) {
            self.write_chunk(chunk_type, slice)?;
            count += 1;
        }

        debug!(
            "wrote {} {} chunk(s), {} payload bytes (+{} framing)",
            count,
            chunk_type,
            payload.len(),
            count * CHUNK_OVERHEAD
        );
        Ok(())
    }

    /// Writes the IHDR chunk for an 8-bit truecolor, non-interlaced image.
    pub fn write_image_header(&mut self, width: u32, height: u32) -> Result<(), PngError> {
        let mut payload = [0u8; IHDR_PAYLOAD_SIZE];
        write_u32_be(width, &mut payload, 0);
        write_u32_be(height, &mut payload, 4);
        payload[8] = BIT_DEPTH_8;
        payload[9] = COLOR_TYPE_TRUECOLOR;
        payload[10] = COMPRESSION_METHOD_DEFLATE;
        payload[11] = FILTER_METHOD_ADAPTIVE;
        payload[12] = INTERLACE_METHOD_NONE;
        self.write_chunk(ChunkType::ImageHeader, &payload)
    }

    pub fn write_image_end(&mut self) -> Result<(), PngError> {
        self.write_chunk(ChunkType::ImageEnd, &[])
    }
}
