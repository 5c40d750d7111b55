//! Common utility functions for integration tests

#![allow(dead_code)]

use flate2::read::ZlibDecoder;
use pngstream_rs::constants::PNG_SIGNATURE;
use pngstream_rs::crc;
use std::io::Read;

/// One chunk as found in an encoded file.
#[derive(Debug, Clone)]
pub struct RawChunk {
    pub tag: [u8; 4],
    pub payload: Vec<u8>,
    pub crc: u32,
}

impl RawChunk {
    pub fn crc_is_valid(&self) -> bool {
        let mut covered = self.tag.to_vec();
        covered.extend_from_slice(&self.payload);
        crc::checksum(&covered) == self.crc
    }
}

/// Checks the signature and splits the rest of the file into chunks.
pub fn parse_png(bytes: &[u8]) -> Vec<RawChunk> {
    assert!(bytes.len() >= 8, "file shorter than the signature");
    assert_eq!(&bytes[..8], &PNG_SIGNATURE, "bad PNG signature");

    let mut rest = &bytes[8..];
    let mut chunks = Vec::new();
    while !rest.is_empty() {
        assert!(rest.len() >= 12, "truncated chunk header");
        let len = u32::from_be_bytes(rest[0..4].try_into().unwrap()) as usize;
        let tag: [u8; 4] = rest[4..8].try_into().unwrap();
        let payload = rest[8..8 + len].to_vec();
        let crc = u32::from_be_bytes(rest[8 + len..12 + len].try_into().unwrap());
        chunks.push(RawChunk { tag, payload, crc });
        rest = &rest[12 + len..];
    }
    chunks
}

/// Concatenated IDAT payloads in file order.
pub fn idat_stream(chunks: &[RawChunk]) -> Vec<u8> {
    chunks
        .iter()
        .filter(|c| &c.tag == b"IDAT")
        .flat_map(|c| c.payload.iter().copied())
        .collect()
}

pub fn inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .expect("IDAT stream is not valid zlib");
    out
}

/// Decoded raw scanlines of an encoded file.
pub fn raw_scanlines(bytes: &[u8]) -> Vec<u8> {
    inflate(&idat_stream(&parse_png(bytes)))
}

/// Deterministic test pattern of packed RGB values.
pub fn pattern(width: usize, height: usize) -> Vec<u32> {
    (0..width * height)
        .map(|i| {
            let x = (i % width) as u32;
            let y = (i / width) as u32;
            ((x * 7) & 0xFF) << 16 | ((y * 13) & 0xFF) << 8 | ((x ^ y) & 0xFF)
        })
        .collect()
}
