//! # harupdf
//!
//! A PDF generation engine: documents built page by page from vector paths,
//! text in standard, TrueType, Type 1 and CJK fonts, PNG/JPEG/raw images,
//! annotations, outlines, page labels and RC4 encryption.
//!
//! ## Features
//!
//! - **Graphics-mode checked drawing**: every content operator is validated
//!   against the page's current mode before anything is written
//! - **Fonts**: the 14 standard fonts, TrueType (TTF/TTC, embedded or
//!   not), Type 1 from AFM/PFB, and the Japanese, Korean and Chinese CID
//!   fonts
//! - **Images**: PNG (with alpha as soft mask), JPEG pass-through and raw
//!   samples, explicit and colour-key masks
//! - **Security**: standard security handler revisions 2 and 3
//! - **Output**: file, any `Write` sink, or an in-memory stream read back in
//!   chunks; the bytes are identical for the same document state
//!
//! ## Quick Start
//!
//! ```rust
//! use harupdf::{Document, LineCap, Result};
//!
//! # fn main() -> Result<()> {
//! let mut doc = Document::new();
//! let font = doc.get_font("Helvetica-Bold", None)?;
//! let handle = doc.add_page()?;
//!
//! let mut page = doc.page(handle)?;
//! page.set_line_cap(LineCap::Round)?;
//! page.set_rgb_stroke(0.0, 0.3, 0.8)?;
//! page.circle(300.0, 400.0, 50.0)?;
//! page.stroke()?;
//!
//! page.begin_text()?;
//! page.set_font_and_size(font, 24.0)?;
//! page.text_out(50.0, 700.0, "Hello, PDF!")?;
//! page.end_text()?;
//!
//! let mut bytes = Vec::new();
//! doc.write_to(&mut bytes)?;
//! assert!(bytes.ends_with(b"%%EOF\n"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`document`] - document assembly, resources and output
//! - [`page`] - page attributes and drawing state
//! - [`graphics`] - modes, matrices, colours, paths and images
//! - [`text`] - encoders, metrics and text measurement
//! - [`fonts`] - font definitions and their PDF objects
//! - [`objects`] and [`writer`] - the object model and low-level serializer

pub mod annotations;
pub mod compression;
pub mod document;
pub mod encryption;
pub mod error;
pub mod fonts;
pub mod graphics;
pub mod handles;
pub mod objects;
pub mod page;
pub mod page_labels;
pub mod streaming;
pub mod structure;
pub mod text;
pub mod writer;

pub use annotations::{AnnotationIcon, HighlightMode};
pub use compression::CompressionMode;
pub use document::{
    Document, DocumentOptions, InfoType, PageLayout, PageMode, PageMut, PdfDate, UtcOffset,
};
pub use encryption::{EncryptMode, Permissions};
pub use error::{PdfError, Result, Status};
pub use graphics::{
    ColorSpace, GraphicsMode, LineCap, LineJoin, Point, Rect, TextAlignment, TextRenderingMode,
    TransMatrix,
};
pub use handles::{
    AnnotationRef, DestinationRef, DocumentId, EncoderRef, Entity, FontRef, ImageRef, OutlineRef,
    PageRef,
};
pub use page::{Page, PageDirection, PageSize, TransitionStyle};
pub use page_labels::PageNumStyle;
pub use streaming::MemoryStream;
pub use writer::PdfVersion;

/// Current version of harupdf
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_document() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
    }

    #[test]
    fn test_version_info() {
        assert!(!VERSION.is_empty());
        assert!(Document::producer().contains(VERSION));
    }
}
