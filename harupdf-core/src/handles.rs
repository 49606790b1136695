//! Copyable handles into a document's arenas.
//!
//! A handle remembers which document created it; passing it to another
//! document is rejected with [`PdfError::InvalidDocument`].

use crate::error::{PdfError, Result};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_DOCUMENT_ID: AtomicU32 = AtomicU32::new(1);

/// Identity of one `Document` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(u32);

impl DocumentId {
    pub(crate) fn fresh() -> Self {
        DocumentId(NEXT_DOCUMENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

macro_rules! define_handle {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct $name {
            doc: DocumentId,
            index: u32,
        }

        impl $name {
            pub(crate) fn new(doc: DocumentId, index: usize) -> Self {
                Self {
                    doc,
                    index: index as u32,
                }
            }

            /// Arena index, checked against the owning document.
            pub(crate) fn index_in(self, doc: DocumentId) -> Result<usize> {
                if self.doc != doc {
                    return Err(PdfError::InvalidDocument);
                }
                Ok(self.index as usize)
            }

            pub(crate) fn raw_index(self) -> usize {
                self.index as usize
            }
        }
    };
}

define_handle!(
    /// A page of a document.
    PageRef
);
define_handle!(
    /// A font bound to an encoder.
    FontRef
);
define_handle!(
    /// An image XObject.
    ImageRef
);
define_handle!(
    /// A destination on a page.
    DestinationRef
);
define_handle!(
    /// A text, link or URI annotation.
    AnnotationRef
);
define_handle!(
    /// An outline (bookmark) item.
    OutlineRef
);
define_handle!(
    /// A registered encoder.
    EncoderRef
);

/// Any document-owned entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Page(PageRef),
    Font(FontRef),
    Image(ImageRef),
    Destination(DestinationRef),
    Annotation(AnnotationRef),
    Outline(OutlineRef),
    Encoder(EncoderRef),
}

impl Entity {
    pub fn kind(&self) -> &'static str {
        match self {
            Entity::Page(_) => "page",
            Entity::Font(_) => "font",
            Entity::Image(_) => "image",
            Entity::Destination(_) => "destination",
            Entity::Annotation(_) => "annotation",
            Entity::Outline(_) => "outline",
            Entity::Encoder(_) => "encoder",
        }
    }
}

macro_rules! entity_from {
    ($($variant:ident($handle:ident)),*) => {
        $(
            impl From<$handle> for Entity {
                fn from(handle: $handle) -> Self {
                    Entity::$variant(handle)
                }
            }
        )*
    };
}

entity_from!(
    Page(PageRef),
    Font(FontRef),
    Image(ImageRef),
    Destination(DestinationRef),
    Annotation(AnnotationRef),
    Outline(OutlineRef),
    Encoder(EncoderRef)
);
