//! Encoders, standard font metrics and text measurement.

mod encoding;
pub mod glyph_names;
mod layout;
mod metrics;

pub use encoding::{
    cjk_family_of, BaseEncoding, ByteType, CjkFamily, Encoder, EncoderType, WritingMode,
    FONT_SPECIFIC, MAC_ROMAN_ENCODING, SINGLE_BYTE_ENCODINGS, STANDARD_ENCODING,
    WIN_ANSI_ENCODING,
};
pub use layout::{MeasureOptions, TextWidth};
pub use metrics::{standard_metrics, FontMetrics};

pub(crate) use layout::{is_white_space, measure, text_width, Glyph};
