use crate::error::PngError;

/// Critical chunk types emitted by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChunkType {
    /// IHDR: image dimensions and sample format. Always the first chunk.
    ImageHeader,

    /// IDAT: a slice of the zlib stream holding the filtered scanlines.
    ImageData,

    /// IEND: empty terminator. Always the last chunk.
    ImageEnd,
}

impl ChunkType {
    /// The four raw tag bytes written between the length and the payload.
    pub const fn tag(self) -> [u8; 4] {
        match self {
            Self::ImageHeader => *b"IHDR",
            Self::ImageData => *b"IDAT",
            Self::ImageEnd => *b"IEND",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ImageHeader => "IHDR",
            Self::ImageData => "IDAT",
            Self::ImageEnd => "IEND",
        }
    }
}

impl std::convert::TryFrom<[u8; 4]> for ChunkType {
    type Error = PngError;
    fn try_from(v: [u8; 4]) -> Result<Self, Self::Error> {
        match &v {
            b"IHDR" => Ok(Self::ImageHeader),
            b"IDAT" => Ok(Self::ImageData),
            b"IEND" => Ok(Self::ImageEnd),
            _ => Err(PngError::InvalidData),
        }
    }
}

impl std::fmt::Display for ChunkType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
