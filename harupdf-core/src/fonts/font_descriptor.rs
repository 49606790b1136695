//! Font descriptor structures for PDF font embedding

use crate::objects::{Dictionary, Object, ObjectId};
use bitflags::bitflags;

bitflags! {
    /// Font descriptor flags as defined in PDF specification
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FontFlags: u32 {
        /// All glyphs have the same width
        const FIXED_PITCH = 1 << 0;
        /// Glyphs have serifs
        const SERIF = 1 << 1;
        /// Font contains glyphs outside Adobe standard Latin set
        const SYMBOLIC = 1 << 2;
        /// Font is a script font
        const SCRIPT = 1 << 3;
        /// Font uses Adobe standard Latin character set
        const NONSYMBOLIC = 1 << 5;
        /// Font is italic
        const ITALIC = 1 << 6;
        /// All glyphs have no lowercase letters
        const ALL_CAP = 1 << 16;
        /// All glyphs are small capitals
        const SMALL_CAP = 1 << 17;
        /// Bold font
        const FORCE_BOLD = 1 << 18;
    }
}

/// Which descriptor key carries an embedded font program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontFileKind {
    /// Type 1 program (`/FontFile`)
    Type1,
    /// TrueType program (`/FontFile2`)
    TrueType,
}

impl FontFileKind {
    fn key(self) -> &'static str {
        match self {
            FontFileKind::Type1 => "FontFile",
            FontFileKind::TrueType => "FontFile2",
        }
    }
}

/// PDF Font Descriptor
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    /// Font name (PostScript name)
    pub font_name: String,
    pub flags: FontFlags,
    /// Font bounding box [llx, lly, urx, ury]
    pub font_bbox: [i16; 4],
    /// Italic angle in degrees
    pub italic_angle: f32,
    pub ascent: i16,
    /// Descent value (typically negative)
    pub descent: i16,
    pub cap_height: i16,
    pub x_height: i16,
    pub stem_v: i16,
    /// Width of missing character
    pub missing_width: u16,
}

impl FontDescriptor {
    /// Create a new font descriptor with default values
    pub fn new(font_name: impl Into<String>) -> Self {
        FontDescriptor {
            font_name: font_name.into(),
            flags: FontFlags::NONSYMBOLIC,
            font_bbox: [0, 0, 1000, 1000],
            italic_angle: 0.0,
            ascent: 800,
            descent: -200,
            cap_height: 700,
            x_height: 500,
            stem_v: 80,
            missing_width: 0,
        }
    }

    /// Convert to PDF dictionary
    pub fn to_dict(&self, font_file: Option<(FontFileKind, ObjectId)>) -> Dictionary {
        let mut dict = Dictionary::typed("FontDescriptor");

        dict.set_name("FontName", self.font_name.clone());
        dict.set("Flags", self.flags.bits());
        dict.set(
            "FontBBox",
            Object::Array(self.font_bbox.iter().map(|v| Object::from(i64::from(*v))).collect()),
        );
        dict.set("ItalicAngle", self.italic_angle);
        dict.set("Ascent", i64::from(self.ascent));
        dict.set("Descent", i64::from(self.descent));
        dict.set("CapHeight", i64::from(self.cap_height));
        if self.x_height != 0 {
            dict.set("XHeight", i64::from(self.x_height));
        }
        dict.set("StemV", i64::from(self.stem_v));
        if self.missing_width != 0 {
            dict.set("MissingWidth", u32::from(self.missing_width));
        }

        if let Some((kind, id)) = font_file {
            dict.set(kind.key(), id);
        }

        dict
    }
}
