//! Page annotations according to ISO 32000-1 Section 12.5
//!
//! Three kinds are supported: text notes, links to a destination in the
//! same document and links to a URI.

mod annotation;

pub use annotation::{Annotation, AnnotationIcon, AnnotationKind, BorderStyle, HighlightMode};
