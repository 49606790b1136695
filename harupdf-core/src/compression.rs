//! Compression modes and Flate utilities for PDF streams

use crate::error::{PdfError, Result};
use bitflags::bitflags;

bitflags! {
    /// Which kinds of streams are Flate-compressed at save time.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CompressionMode: u32 {
        /// Page content streams.
        const TEXT = 0x01;
        /// Image data other than JPEG.
        const IMAGE = 0x02;
        /// Embedded font programs.
        const METADATA = 0x04;
        const ALL = 0x0F;
    }
}

impl CompressionMode {
    pub const NONE: CompressionMode = CompressionMode::empty();

    /// Validates raw mode bits; anything outside `ALL` is rejected.
    pub fn from_raw(bits: u32) -> Result<Self> {
        if bits & !CompressionMode::ALL.bits() != 0 {
            return Err(PdfError::InvalidCompressionMode(bits));
        }
        Ok(CompressionMode::from_bits_retain(bits))
    }
}

/// Compress data using Flate/Zlib compression
#[cfg(feature = "compression")]
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::write::ZlibEncoder;
    use flate2::Compression;
    use std::io::Write;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PdfError::CompressionError(e.to_string()))
}

#[cfg(not(feature = "compression"))]
pub fn compress(_data: &[u8]) -> Result<Vec<u8>> {
    Err(PdfError::UnsupportedFunc("Zlib"))
}

/// Decompress data using Flate/Zlib decompression
#[cfg(feature = "compression")]
pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::ZlibDecoder;
    use std::io::Read;

    let mut decoder = ZlibDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PdfError::CompressionError(e.to_string()))?;
    Ok(decompressed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_raw() {
        assert_eq!(CompressionMode::from_raw(0).unwrap(), CompressionMode::NONE);
        assert_eq!(
            CompressionMode::from_raw(0x03).unwrap(),
            CompressionMode::TEXT | CompressionMode::IMAGE
        );
        assert_eq!(CompressionMode::from_raw(0x0F).unwrap(), CompressionMode::ALL);
        assert!(matches!(
            CompressionMode::from_raw(0x10),
            Err(PdfError::InvalidCompressionMode(0x10))
        ));
    }

    #[test]
    fn test_all_contains_each_kind() {
        let all = CompressionMode::ALL;
        assert!(all.contains(CompressionMode::TEXT));
        assert!(all.contains(CompressionMode::IMAGE));
        assert!(all.contains(CompressionMode::METADATA));
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compress_decompress() {
        let original = b"BT /F1 12 Tf 100 700 Td (Hello) Tj ET\n";

        let compressed = compress(original).unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(decompress(&compressed).unwrap(), original);
    }

    #[cfg(feature = "compression")]
    #[test]
    fn test_compress_empty() {
        let compressed = compress(b"").unwrap();
        assert!(!compressed.is_empty());
        assert_eq!(decompress(&compressed).unwrap(), b"");
    }
}
