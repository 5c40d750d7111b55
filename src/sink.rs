//! Byte sinks the encoder writes into.
//!
//! A [`SinkTarget`] describes where the PNG goes. The encoder opens it in
//! `start` and hands the sink back through [`SinkTarget::close`] in `end`, or
//! when it is dropped mid-stream.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

pub trait SinkTarget {
    type Sink: Write;

    /// Acquires the sink. Called once, from `start`.
    fn open(&mut self) -> io::Result<Self::Sink>;

    /// Flushes and releases the sink.
    fn close(&mut self, mut sink: Self::Sink) -> io::Result<()> {
        sink.flush()
    }
}

/// Writes to a file, created or truncated when encoding starts.
#[derive(Debug, Clone)]
pub struct FileTarget {
    path: PathBuf,
}

impl FileTarget {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SinkTarget for FileTarget {
    type Sink = BufWriter<File>;

    fn open(&mut self) -> io::Result<Self::Sink> {
        Ok(BufWriter::new(File::create(&self.path)?))
    }

    fn close(&mut self, sink: Self::Sink) -> io::Result<()> {
        let file = sink.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()
    }
}

/// Collects the encoded file in memory.
///
/// Bytes become visible through [`MemoryTarget::bytes`] once the sink is
/// closed.
#[derive(Debug, Default, Clone)]
pub struct MemoryTarget {
    bytes: Vec<u8>,
    opened: usize,
}

impl MemoryTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// How many times the target has been opened.
    pub fn open_count(&self) -> usize {
        self.opened
    }
}

impl SinkTarget for MemoryTarget {
    type Sink = Vec<u8>;

    fn open(&mut self) -> io::Result<Self::Sink> {
        self.opened += 1;
        Ok(Vec::new())
    }

    fn close(&mut self, sink: Self::Sink) -> io::Result<()> {
        self.bytes = sink;
        Ok(())
    }
}
