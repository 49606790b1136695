//! Font definitions and the fonts pages draw with.
//!
//! A font definition describes a face: one of the standard fonts, a
//! loaded TrueType or Type 1 font, or a built-in CJK CID font. A [`Font`]
//! pairs a definition with an encoder and is what text operators and
//! width queries work on.

mod cjk;
mod font_descriptor;
mod standard;
mod truetype;
mod type1;

pub use cjk::{CidFont, CidStyle, CID_DEFAULT_WIDTH, CID_HALF_WIDTH};
pub use font_descriptor::{FontDescriptor, FontFileKind, FontFlags};
pub use standard::StandardFont;
pub use truetype::TrueTypeFont;
pub use type1::{parse_pfb, Type1Font, Type1Program};

#[cfg(test)]
pub(crate) use truetype::test_font;

use std::sync::Arc;

use crate::compression::CompressionMode;
use crate::error::{PdfError, Result};
use crate::graphics::Rect;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::text::{
    self, BaseEncoding, CjkFamily, Encoder, EncoderType, Glyph, MeasureOptions, TextWidth,
    FONT_SPECIFIC, STANDARD_ENCODING, WIN_ANSI_ENCODING,
};

/// A face a [`Font`] can be built from.
#[derive(Debug, Clone)]
pub(crate) enum FontDef {
    Standard(StandardFont),
    TrueType(Arc<TrueTypeFont>),
    Type1(Arc<Type1Font>),
    Cid(CidFont),
}

impl FontDef {
    pub fn name(&self) -> &str {
        match self {
            FontDef::Standard(font) => font.pdf_name(),
            FontDef::TrueType(font) => font.base_font(),
            FontDef::Type1(font) => font.font_name(),
            FontDef::Cid(font) => font.name(),
        }
    }

    /// Encoder used when `get_font` is called without one.
    pub fn default_encoding(&self) -> &'static str {
        match self {
            FontDef::Standard(font) => font.default_encoding(),
            FontDef::TrueType(_) => WIN_ANSI_ENCODING,
            FontDef::Type1(font) if font.is_font_specific() => FONT_SPECIFIC,
            FontDef::Type1(_) => STANDARD_ENCODING,
            FontDef::Cid(font) => font.family().default_encoding(),
        }
    }

    pub fn cjk_family(&self) -> Option<CjkFamily> {
        match self {
            FontDef::Cid(font) => Some(font.family()),
            _ => None,
        }
    }
}

/// A font definition bound to an encoder.
#[derive(Debug, Clone)]
pub struct Font {
    name: String,
    def: FontDef,
    encoder: Arc<Encoder>,
    /// Per-code widths of single-byte fonts.
    widths: Option<Box<[u16; 256]>>,
}

impl Font {
    pub(crate) fn new(def: FontDef, encoder: Arc<Encoder>) -> Result<Self> {
        let mismatch = || PdfError::InvalidEncoderType {
            font: def.name().to_string(),
            encoding: encoder.name().to_string(),
        };
        match (&def, encoder.encoder_type()) {
            (FontDef::Cid(cid), EncoderType::DoubleByte) => {
                if encoder.cjk_family() != Some(cid.family()) {
                    return Err(mismatch());
                }
            }
            (FontDef::Cid(_), _) => return Err(mismatch()),
            (_, EncoderType::SingleByte) => {}
            _ => return Err(mismatch()),
        }

        let widths = match &def {
            FontDef::Cid(_) => None,
            single => Some(Box::new(single_byte_widths(single, &encoder))),
        };

        Ok(Self {
            name: def.name().to_string(),
            def,
            encoder,
            widths,
        })
    }

    /// PostScript name.
    pub fn font_name(&self) -> &str {
        &self.name
    }

    pub fn encoding_name(&self) -> &str {
        self.encoder.name()
    }

    pub fn encoder(&self) -> &Encoder {
        &self.encoder
    }

    pub fn is_double_byte(&self) -> bool {
        self.encoder.encoder_type() == EncoderType::DoubleByte
    }

    /// Advance of the glyph for a Unicode value, in 1/1000 em.
    pub fn unicode_width(&self, unicode: u16) -> u16 {
        match &self.def {
            FontDef::Standard(font) if font.is_symbolic() => self
                .code_for_unicode(unicode)
                .map(|code| text::standard_metrics(*font).code_width(code))
                .unwrap_or(0),
            FontDef::Standard(font) => char::from_u32(u32::from(unicode))
                .map(|ch| text::standard_metrics(*font).char_width(ch))
                .unwrap_or(0),
            FontDef::TrueType(font) => font.unicode_width(u32::from(unicode)),
            FontDef::Type1(font) => font.unicode_width(unicode),
            FontDef::Cid(font) => font.char_width(unicode > 0x7F),
        }
    }

    fn code_for_unicode(&self, unicode: u16) -> Option<u8> {
        (0..=255u8).find(|&code| self.encoder.unicode(u16::from(code)) == unicode)
    }

    pub fn ascent(&self) -> i16 {
        self.vertical_metrics().0
    }

    pub fn descent(&self) -> i16 {
        self.vertical_metrics().1
    }

    pub fn x_height(&self) -> i16 {
        self.vertical_metrics().2
    }

    pub fn cap_height(&self) -> i16 {
        self.vertical_metrics().3
    }

    pub fn bbox(&self) -> Rect {
        let [left, bottom, right, top] = match &self.def {
            FontDef::Standard(font) => text::standard_metrics(*font).bbox,
            FontDef::TrueType(font) => font.descriptor().font_bbox,
            FontDef::Type1(font) => font.descriptor().font_bbox,
            FontDef::Cid(font) => font.descriptor().font_bbox,
        };
        Rect::new(
            f32::from(left),
            f32::from(bottom),
            f32::from(right),
            f32::from(top),
        )
    }

    /// Ascent, descent, x-height, cap height.
    fn vertical_metrics(&self) -> (i16, i16, i16, i16) {
        let descriptor = match &self.def {
            FontDef::Standard(font) => {
                let m = text::standard_metrics(*font);
                return (m.ascent, m.descent, m.x_height, m.cap_height);
            }
            FontDef::TrueType(font) => font.descriptor().clone(),
            FontDef::Type1(font) => font.descriptor().clone(),
            FontDef::Cid(font) => font.descriptor(),
        };
        (
            descriptor.ascent,
            descriptor.descent,
            descriptor.x_height,
            descriptor.cap_height,
        )
    }

    pub fn text_width(&self, text: impl AsRef<[u8]>) -> TextWidth {
        text::text_width(&self.glyphs(text.as_ref()))
    }

    /// Length in bytes of the longest prefix of `text` that fits `width`.
    pub fn measure_text(
        &self,
        text: impl AsRef<[u8]>,
        width: f32,
        font_size: f32,
        char_space: f32,
        word_space: f32,
        word_wrap: bool,
    ) -> usize {
        let text = text.as_ref();
        let options = MeasureOptions {
            width,
            font_size,
            char_space,
            word_space,
            word_wrap,
        };
        text::measure(&self.glyphs(text), text.len(), &options)
    }

    pub(crate) fn glyphs(&self, text: &[u8]) -> Vec<Glyph> {
        self.encoder
            .char_spans(text)
            .into_iter()
            .map(|(start, len)| {
                let byte = text[start];
                let width = match (&self.widths, &self.def) {
                    (Some(widths), _) => widths[byte as usize],
                    (None, FontDef::Cid(font)) => font.char_width(len > 1),
                    (None, _) => 0,
                };
                Glyph {
                    start,
                    len,
                    width,
                    byte,
                }
            })
            .collect()
    }

    /// Object ids this font's dictionaries occupy.
    pub(crate) fn object_count(&self) -> usize {
        match &self.def {
            FontDef::Standard(_) => 1,
            FontDef::TrueType(font) => 2 + usize::from(font.is_embedded()),
            FontDef::Type1(font) => 2 + usize::from(font.program().is_some()),
            FontDef::Cid(_) => 3,
        }
    }

    /// Builds the font dictionary at `ids[0]` and its dependent objects at
    /// the following ids.
    pub(crate) fn write_objects(
        &self,
        ids: &[ObjectId],
        compression: CompressionMode,
    ) -> Result<Vec<(ObjectId, Object)>> {
        if ids.len() != self.object_count() {
            return Err(PdfError::Consistency(format!(
                "font {} expects {} object ids",
                self.name,
                self.object_count()
            )));
        }
        let compress = compression.contains(CompressionMode::METADATA);

        match &self.def {
            FontDef::Standard(_) => {
                let mut dict = self.simple_font_dict("Type1", false);
                self.set_encoding(&mut dict, true);
                Ok(vec![(ids[0], dict.into())])
            }
            FontDef::TrueType(font) => {
                let mut dict = self.simple_font_dict("TrueType", true);
                self.set_encoding(&mut dict, false);
                dict.set("FontDescriptor", ids[1]);

                let mut objects = vec![(ids[0], Object::from(dict))];
                let file = font.program().map(|program| {
                    let mut stream = Stream::new(program.to_vec());
                    stream.dictionary_mut().set("Length1", program.len() as i64);
                    (FontFileKind::TrueType, ids[2], stream)
                });
                objects.extend(descriptor_objects(font.descriptor(), ids[1], file, compress)?);
                Ok(objects)
            }
            FontDef::Type1(font) => {
                let mut dict = self.simple_font_dict("Type1", true);
                self.set_encoding(&mut dict, true);
                dict.set("FontDescriptor", ids[1]);

                let mut objects = vec![(ids[0], Object::from(dict))];
                let file = font.program().map(|program| {
                    let mut stream = Stream::new(program.data.clone());
                    let stream_dict = stream.dictionary_mut();
                    stream_dict.set("Length1", program.length1 as i64);
                    stream_dict.set("Length2", program.length2 as i64);
                    stream_dict.set("Length3", program.length3 as i64);
                    (FontFileKind::Type1, ids[2], stream)
                });
                objects.extend(descriptor_objects(font.descriptor(), ids[1], file, compress)?);
                Ok(objects)
            }
            FontDef::Cid(font) => {
                let mut type0 = Dictionary::typed("Font");
                type0.set_name("Subtype", "Type0");
                type0.set_name("BaseFont", self.name.clone());
                type0.set_name("Encoding", self.encoder.name());
                type0.set("DescendantFonts", Object::Array(vec![ids[1].into()]));

                let (ordering, supplement) = font.family().ordering();
                let mut system_info = Dictionary::new();
                system_info.set("Registry", "Adobe");
                system_info.set("Ordering", ordering);
                system_info.set("Supplement", supplement);

                let mut cid = Dictionary::typed("Font");
                cid.set_name("Subtype", "CIDFontType2");
                cid.set_name("BaseFont", self.name.clone());
                cid.set("CIDSystemInfo", system_info);
                cid.set("FontDescriptor", ids[2]);
                cid.set("DW", i64::from(CID_DEFAULT_WIDTH));
                let mut w = Vec::new();
                for &(first, last) in font.half_width_ranges() {
                    w.push(Object::from(i64::from(first)));
                    w.push(Object::from(i64::from(last)));
                    w.push(Object::from(i64::from(CID_HALF_WIDTH)));
                }
                cid.set("W", w);
                if self.encoder.writing_mode() == text::WritingMode::Vertical {
                    cid.set("DW2", Object::Array(vec![880i64.into(), (-1000i64).into()]));
                }

                Ok(vec![
                    (ids[0], type0.into()),
                    (ids[1], cid.into()),
                    (ids[2], font.descriptor().to_dict(None).into()),
                ])
            }
        }
    }

    fn simple_font_dict(&self, subtype: &str, with_widths: bool) -> Dictionary {
        let mut dict = Dictionary::typed("Font");
        dict.set_name("Subtype", subtype);
        dict.set_name("BaseFont", self.name.clone());
        if let (true, Some(widths)) = (with_widths, &self.widths) {
            dict.set("FirstChar", 32i64);
            dict.set("LastChar", 255i64);
            let widths: Vec<Object> = widths[32..]
                .iter()
                .map(|&w| Object::from(i64::from(w)))
                .collect();
            dict.set("Widths", widths);
        }
        dict
    }

    /// `has_builtin_standard` marks Type 1 faces whose built-in encoding
    /// is StandardEncoding.
    fn set_encoding(&self, dict: &mut Dictionary, has_builtin_standard: bool) {
        match self.encoder.base_encoding() {
            Some(BaseEncoding::FontSpecific) => {}
            Some(BaseEncoding::Standard) if has_builtin_standard => {}
            Some(base @ (BaseEncoding::WinAnsi | BaseEncoding::MacRoman)) => {
                if let Some(name) = base.pdf_name() {
                    dict.set_name("Encoding", name);
                }
            }
            _ => {
                let mut differences = Vec::new();
                let mut previous: Option<u8> = None;
                for (code, name) in self.encoder.differences() {
                    if previous.map_or(true, |p| p + 1 != code) {
                        differences.push(Object::from(i64::from(code)));
                    }
                    differences.push(Object::name(name));
                    previous = Some(code);
                }
                let mut encoding = Dictionary::typed("Encoding");
                encoding.set_name("BaseEncoding", WIN_ANSI_ENCODING);
                if !differences.is_empty() {
                    encoding.set("Differences", differences);
                }
                dict.set("Encoding", encoding);
            }
        }
    }
}

fn descriptor_objects(
    descriptor: &FontDescriptor,
    id: ObjectId,
    file: Option<(FontFileKind, ObjectId, Stream)>,
    compress: bool,
) -> Result<Vec<(ObjectId, Object)>> {
    let Some((kind, file_id, mut stream)) = file else {
        return Ok(vec![(id, descriptor.to_dict(None).into())]);
    };
    if compress {
        stream.compress_flate()?;
    }
    Ok(vec![
        (id, descriptor.to_dict(Some((kind, file_id))).into()),
        (file_id, stream.into()),
    ])
}

fn single_byte_widths(def: &FontDef, encoder: &Encoder) -> [u16; 256] {
    let font_specific = encoder.name() == FONT_SPECIFIC;
    let mut widths = [0u16; 256];
    for (code, width) in widths.iter_mut().enumerate() {
        let unicode = encoder.unicode(code as u16);
        *width = match def {
            FontDef::Standard(font) if font.is_symbolic() || font_specific => {
                text::standard_metrics(*font).code_width(code as u8)
            }
            FontDef::Type1(font) if font_specific => font.code_width(code as u8),
            _ if unicode == 0 => 0,
            FontDef::Standard(font) => char::from_u32(u32::from(unicode))
                .map(|ch| text::standard_metrics(*font).char_width(ch))
                .unwrap_or(0),
            FontDef::TrueType(font) => font.unicode_width(u32::from(unicode)),
            FontDef::Type1(font) => font.unicode_width(unicode),
            FontDef::Cid(_) => 0,
        };
    }
    widths
}
