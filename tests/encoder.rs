//! End-to-end tests of the streaming encoder against in-memory and file sinks.

mod common;

use common::{idat_stream, inflate, parse_png, pattern, raw_scanlines};
use pngstream_rs::{
    ColorMode, EncoderConfig, EncoderState, FileTarget, MemoryTarget, PngError, PngStreamEncoder,
    SinkTarget, scanline,
};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

/// Target whose bytes stay readable while the encoder still owns the sink.
#[derive(Default, Clone)]
struct SharedTarget(Rc<RefCell<Vec<u8>>>);

struct SharedSink(Rc<RefCell<Vec<u8>>>);

impl Write for SharedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SinkTarget for SharedTarget {
    type Sink = SharedSink;

    fn open(&mut self) -> io::Result<Self::Sink> {
        Ok(SharedSink(Rc::clone(&self.0)))
    }
}

fn encode(config: EncoderConfig, bands: &[&[u32]]) -> Vec<u8> {
    let mut encoder = PngStreamEncoder::new(MemoryTarget::new());
    encoder.configure(config).unwrap();
    encoder.start().unwrap();
    for (i, band) in bands.iter().enumerate() {
        encoder.write_data(band, i + 1 == bands.len()).unwrap();
    }
    encoder.end().unwrap();
    assert_eq!(encoder.state(), EncoderState::Ended);
    encoder.target().bytes().to_vec()
}

#[test]
fn test_two_pixel_direct_image() {
    let config = EncoderConfig::new(2, 1);
    let png = encode(config, &[&[0xFF_00_00u32, 0x00_FF_00][..]]);

    assert_eq!(
        raw_scanlines(&png),
        vec![0x00, 0xFF, 0x00, 0x00, 0x00, 0xFF, 0x00]
    );
}

#[test]
fn test_chunk_layout() {
    let png = encode(EncoderConfig::new(3, 2), &[pattern(3, 2).as_slice()]);
    let chunks = parse_png(&png);

    assert_eq!(&chunks.first().unwrap().tag, b"IHDR");
    assert_eq!(&chunks.last().unwrap().tag, b"IEND");
    assert!(chunks.last().unwrap().payload.is_empty());
    assert!(chunks[1..chunks.len() - 1].iter().all(|c| &c.tag == b"IDAT"));
    assert!(chunks.iter().all(|c| c.crc_is_valid()));

    let ihdr = &chunks[0].payload;
    assert_eq!(ihdr.as_slice(), &[0, 0, 0, 3, 0, 0, 0, 2, 8, 2, 0, 0, 0]);
}

#[test]
fn test_multiple_bands_match_single_pass() {
    let (width, height) = (37, 24);
    let pixels = pattern(width, height);
    let mut config = EncoderConfig::new(width as u32, height as u32);
    config.compression_level = 6;
    config.filter_strategy = pngstream_rs::FilterStrategy::Filtered;

    let bands: Vec<&[u32]> = pixels.chunks(width * 5).collect();
    let png = encode(config, &bands);

    let expected = scanline::transform(&pixels, width, ColorMode::Direct, 0);
    assert_eq!(raw_scanlines(&png), expected);
}

#[test]
fn test_idat_payloads_bounded_by_chunk_size() {
    let (width, height) = (64, 64);
    let pixels = pattern(width, height);
    let mut config = EncoderConfig::new(width as u32, height as u32);
    config.chunk_size = 1000;

    let bands: Vec<&[u32]> = pixels.chunks(width * 8).collect();
    let png = encode(config, &bands);
    let chunks = parse_png(&png);

    let idats: Vec<_> = chunks.iter().filter(|c| &c.tag == b"IDAT").collect();
    // Level 0 stores 64 * (64 * 3 + 1) raw bytes, so many chunks are needed.
    assert!(idats.len() > 10);
    assert!(idats.iter().all(|c| c.payload.len() <= 1000));
    assert_eq!(
        inflate(&idat_stream(&chunks)),
        scanline::transform(&pixels, width, ColorMode::Direct, 0)
    );
}

#[test]
fn test_idat_emitted_before_last_band() {
    let (width, height) = (256, 1 + 128 + 1);
    let pixels = pattern(width, height);
    let mut config = EncoderConfig::new(width as u32, height as u32);
    config.chunk_size = 1000;

    let shared = SharedTarget::default();
    let mut encoder = PngStreamEncoder::new(shared.clone());
    encoder.configure(config).unwrap();
    encoder.start().unwrap();
    let header_len = (8 + 25) as u64;
    assert_eq!(encoder.bytes_written(), header_len);

    let (first, rest) = pixels.split_at(width);
    let (middle, last) = rest.split_at(width * 128);

    // One stored row is well under the threshold, so nothing is framed yet.
    encoder.write_data(first, false).unwrap();
    assert_eq!(encoder.bytes_written(), header_len);
    assert_eq!(shared.0.borrow().len() as u64, header_len);

    // 128 rows push far more than one chunk's worth through the compressor.
    encoder.write_data(middle, false).unwrap();
    let written = encoder.bytes_written();
    assert!(written > header_len);
    assert_eq!(shared.0.borrow().len() as u64, written);

    let partial = parse_png(&shared.0.borrow());
    assert_eq!(&partial[0].tag, b"IHDR");
    assert!(partial.len() > 1);
    assert!(partial[1..].iter().all(|c| &c.tag == b"IDAT"));
    assert!(partial[1..].iter().all(|c| c.payload.len() <= 1000 && c.crc_is_valid()));

    encoder.write_data(last, true).unwrap();
    encoder.end().unwrap();
    assert_eq!(
        raw_scanlines(&shared.0.borrow()),
        scanline::transform(&pixels, width, ColorMode::Direct, 0)
    );
}

#[test]
fn test_grayscale_and_sepia_modes() {
    let pixels = [0xC8_C8_C8u32, 0xFF_FF_FF];

    let mut config = EncoderConfig::new(2, 1);
    config.color_mode = ColorMode::Grayscale;
    let gray = raw_scanlines(&encode(config, &[&pixels[..]]));
    assert_eq!(gray, vec![0, 199, 199, 199, 254, 254, 254]);

    config.color_mode = ColorMode::Sepia;
    let sepia = raw_scanlines(&encode(config, &[&pixels[..]]));
    assert_eq!(&sepia[4..], &[255, 255, 237]);
}

#[test]
fn test_no_data_still_valid() {
    let mut encoder = PngStreamEncoder::with_size(MemoryTarget::new(), 1, 1).unwrap();
    encoder.start().unwrap();
    encoder.end().unwrap();

    let chunks = parse_png(encoder.target().bytes());
    assert!(inflate(&idat_stream(&chunks)).is_empty());
}

#[test]
fn test_write_after_last_band_fails() {
    let mut encoder = PngStreamEncoder::with_size(MemoryTarget::new(), 1, 2).unwrap();
    encoder.start().unwrap();
    encoder.write_data(&[0x01_02_03], true).unwrap();
    assert!(matches!(
        encoder.write_data(&[0x04_05_06], true),
        Err(PngError::StreamFinished)
    ));
    assert_eq!(encoder.state(), EncoderState::Started);
    encoder.end().unwrap();
    assert_eq!(raw_scanlines(encoder.target().bytes()), vec![0, 1, 2, 3]);
}

#[test]
fn test_file_target() {
    let path = std::env::temp_dir().join(format!("pngstream-e2e-{}.png", std::process::id()));
    let mut encoder = PngStreamEncoder::with_size(FileTarget::new(&path), 4, 4).unwrap();
    encoder.set_compression_level(9).unwrap();
    encoder.start().unwrap();
    encoder.write_data(&pattern(4, 4), true).unwrap();
    encoder.end().unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len() as u64, encoder.bytes_written());
    assert_eq!(
        raw_scanlines(&bytes),
        scanline::transform(&pattern(4, 4), 4, ColorMode::Direct, 0)
    );
    std::fs::remove_file(&path).unwrap();
}

#[test]
fn test_drop_closes_file() {
    let path = std::env::temp_dir().join(format!("pngstream-drop-{}.png", std::process::id()));
    {
        let mut encoder = PngStreamEncoder::with_size(FileTarget::new(&path), 2, 2).unwrap();
        encoder.start().unwrap();
        encoder.write_data(&[0; 2], false).unwrap();
    }

    // Signature and IHDR reached the file even though `end` never ran.
    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(bytes.len(), 8 + 25);
    assert_eq!(&bytes[12..16], b"IHDR");
    std::fs::remove_file(&path).unwrap();
}
