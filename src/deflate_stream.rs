//! Incremental zlib compression of raw scanlines.
//!
//! `DeflateStream` drives a persistent `miniz_oxide` compressor so that
//! scanline bytes can be pushed in arbitrary runs while the compressed output
//! accumulates in an in-memory buffer until the encoder drains it into IDAT
//! chunks.

use log::debug;
use miniz_oxide::deflate::core::{
    CompressionStrategy, CompressorOxide, TDEFLFlush, TDEFLStatus, compress,
    create_comp_flags_from_zip_params,
};

use crate::FilterStrategy;
use crate::constants::COMPRESSED_BUFFER_GROWTH;
use crate::error::PngError;

// Positive window bits select the zlib wrapper (header and Adler-32 trailer).
const ZLIB_WINDOW_BITS: i32 = 1;

pub struct DeflateStream {
    compressor: CompressorOxide,
    output: Vec<u8>,
    strategy: FilterStrategy,
    total_in: u64,
    total_out: u64,
    finished: bool,
}

impl DeflateStream {
    /// Creates a zlib-wrapped stream at `level` (0..=9).
    ///
    /// The filtered strategy discards short matches; the unfiltered one uses
    /// the default match search. Level 0 stores raw blocks either way.
    pub fn new(strategy: FilterStrategy, level: u32) -> Self {
        let zip_strategy = if strategy.is_filtered() {
            CompressionStrategy::Filtered
        } else {
            CompressionStrategy::Default
        };
        let flags =
            create_comp_flags_from_zip_params(level as i32, ZLIB_WINDOW_BITS, zip_strategy as i32);

        Self {
            compressor: CompressorOxide::new(flags),
            output: Vec::with_capacity(COMPRESSED_BUFFER_GROWTH),
            strategy,
            total_in: 0,
            total_out: 0,
            finished: false,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Bytes of compressed output waiting to be drained.
    pub fn len(&self) -> usize {
        self.output.len()
    }

    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    pub fn total_in(&self) -> u64 {
        self.total_in
    }

    /// Pushes `bytes` into the compressor. Output may be deferred.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), PngError> {
        if self.finished {
            return Err(PngError::StreamFinished);
        }

        let mut input = bytes;
        while !input.is_empty() {
            let (status, consumed) = self.step(input, TDEFLFlush::None)?;
            if status != TDEFLStatus::Okay {
                return Err(PngError::Compression(status));
            }
            input = &input[consumed..];
        }
        Ok(())
    }

    /// Flushes all pending input and writes the zlib trailer.
    pub fn finish(&mut self) -> Result<(), PngError> {
        if self.finished {
            return Ok(());
        }

        loop {
            match self.step(&[], TDEFLFlush::Finish)? {
                (TDEFLStatus::Done, _) => break,
                (TDEFLStatus::Okay, _) => continue,
                (status, _) => return Err(PngError::Compression(status)),
            }
        }

        self.finished = true;
        debug!(
            "deflate stream finished: {} raw bytes -> {} compressed bytes ({:?})",
            self.total_in, self.total_out, self.strategy
        );
        Ok(())
    }

    /// Removes and returns everything compressed so far.
    pub fn drain(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.output)
    }

    /// Runs the compressor once into fresh space at the end of the output
    /// buffer. Returns the status and the number of input bytes consumed.
    fn step(
        &mut self,
        input: &[u8],
        flush: TDEFLFlush,
    ) -> Result<(TDEFLStatus, usize), PngError> {
        let start = self.output.len();
        self.output.resize(start + COMPRESSED_BUFFER_GROWTH, 0);
        let (status, consumed, produced) =
            compress(&mut self.compressor, input, &mut self.output[start..], flush);
        self.output.truncate(start + produced);

        self.total_in += consumed as u64;
        self.total_out += produced as u64;

        if status == TDEFLStatus::Okay && consumed == 0 && produced == 0 {
            // Neither side moved with free output space: the compressor is stuck.
            return Err(PngError::Compression(TDEFLStatus::PutBufFailed));
        }
        Ok((status, consumed))
    }
}
