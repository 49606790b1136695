//! In-memory output buffer for serialized documents.
//!
//! [`Document::save_to_stream`](crate::Document::save_to_stream) fills a
//! [`MemoryStream`]; callers then read it back in pieces of any size or copy
//! it to a sink in fixed-size chunks.
//!
//! # Example
//!
//! ```rust
//! use harupdf::streaming::MemoryStream;
//!
//! # fn main() -> harupdf::Result<()> {
//! let mut stream = MemoryStream::new(b"%PDF-1.3\n".to_vec());
//! assert_eq!(stream.read(4)?, b"%PDF");
//! assert_eq!(stream.read(100)?, b"-1.3\n");
//! assert!(stream.read(100)?.is_empty());
//!
//! stream.rewind();
//! let mut sink = Vec::new();
//! assert_eq!(stream.write_to(&mut sink, 2)?, 9);
//! # Ok(())
//! # }
//! ```

use std::io::{self, Read, Write};

use tracing::trace;

use crate::error::{PdfError, Result};

/// Growable byte buffer with a read cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryStream {
    data: Vec<u8>,
    position: usize,
}

impl MemoryStream {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, position: 0 }
    }

    /// Total bytes held, independent of the cursor.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.position
    }

    pub fn is_exhausted(&self) -> bool {
        self.position >= self.data.len()
    }

    /// Up to `size` bytes from the cursor. Returns a short vector near the
    /// end and an empty one once everything has been read.
    pub fn read(&mut self, size: usize) -> Result<Vec<u8>> {
        if size == 0 {
            return Err(PdfError::InvalidParameter(
                "read size must be positive".to_string(),
            ));
        }
        let end = self.position.saturating_add(size).min(self.data.len());
        let chunk = self.data[self.position..end].to_vec();
        self.position = end;
        Ok(chunk)
    }

    /// Fills as much of `buf` as possible and returns the count.
    pub fn read_into(&mut self, buf: &mut [u8]) -> usize {
        let count = buf.len().min(self.remaining());
        buf[..count].copy_from_slice(&self.data[self.position..self.position + count]);
        self.position += count;
        count
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Copies the unread bytes to `writer` in `chunk_size` pieces.
    pub fn write_to<W: Write>(&mut self, mut writer: W, chunk_size: usize) -> Result<u64> {
        let chunk_size = chunk_size.max(1);
        let mut written = 0u64;
        while !self.is_exhausted() {
            let end = (self.position + chunk_size).min(self.data.len());
            writer.write_all(&self.data[self.position..end])?;
            written += (end - self.position) as u64;
            self.position = end;
        }
        writer.flush()?;
        trace!(written, chunk_size, "copied memory stream");
        Ok(written)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<u8> {
        self.data
    }
}

impl Read for MemoryStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf))
    }
}

impl From<Vec<u8>> for MemoryStream {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}
