/// The fixed 8-byte signature that opens every PNG file.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

// Size in bytes of the chunk length field, type tag and CRC trailer.
pub const CHUNK_LENGTH_SIZE: usize = 4;
pub const CHUNK_TYPE_SIZE: usize = 4;
pub const CHUNK_CRC_SIZE: usize = 4;

// Total framing overhead around a chunk payload.
pub const CHUNK_OVERHEAD: usize = CHUNK_LENGTH_SIZE + CHUNK_TYPE_SIZE + CHUNK_CRC_SIZE;

// The IHDR payload is always 13 bytes: width, height, depth, color type,
// compression method, filter method, interlace method.
pub const IHDR_PAYLOAD_SIZE: usize = 13;

pub const BIT_DEPTH_8: u8 = 8;

// Color type 2: truecolor, three samples per pixel, no palette, no alpha.
pub const COLOR_TYPE_TRUECOLOR: u8 = 2;

pub const COMPRESSION_METHOD_DEFLATE: u8 = 0;
pub const FILTER_METHOD_ADAPTIVE: u8 = 0;
pub const INTERLACE_METHOD_NONE: u8 = 0;

// Per-scanline filter selector for "no filter".
pub const FILTER_TYPE_NONE: u8 = 0;

pub const BYTES_PER_PIXEL: usize = 3;

// Default upper bound for one IDAT payload. Also the deflate window size.
pub const DEFAULT_CHUNK_SIZE: usize = 32768;

pub const MAXIMUM_COMPRESSION_LEVEL: u32 = 9;

// Initial allocation for the compressed output buffer.
pub const COMPRESSED_BUFFER_GROWTH: usize = 32768;

// Reflected CRC-32 polynomial used by PNG (ISO 3309 / ITU-T V.42).
pub const CRC32_POLYNOMIAL: u32 = 0xEDB8_8320;
pub const CRC32_INITIAL: u32 = 0xFFFF_FFFF;
