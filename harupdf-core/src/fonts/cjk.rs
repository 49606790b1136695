//! Built-in CID fonts for Chinese, Japanese and Korean text.
//!
//! These fonts are never embedded. The viewer substitutes an installed
//! face, so only approximate metrics are carried.

use crate::fonts::{FontDescriptor, FontFlags};
use crate::text::CjkFamily;

/// Style suffix appended to a base CID font name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CidStyle {
    Regular,
    Bold,
    Italic,
    BoldItalic,
}

impl CidStyle {
    const ALL: [CidStyle; 4] = [
        CidStyle::Regular,
        CidStyle::Bold,
        CidStyle::Italic,
        CidStyle::BoldItalic,
    ];

    fn suffix(self) -> &'static str {
        match self {
            CidStyle::Regular => "",
            CidStyle::Bold => ",Bold",
            CidStyle::Italic => ",Italic",
            CidStyle::BoldItalic => ",BoldItalic",
        }
    }
}

/// Base name, family, and whether Latin glyphs are proportional.
const BASE_FONTS: [(&str, CjkFamily, bool); 11] = [
    ("MS-Mincho", CjkFamily::Japanese, false),
    ("MS-Gothic", CjkFamily::Japanese, false),
    ("MS-PMincho", CjkFamily::Japanese, true),
    ("MS-PGothic", CjkFamily::Japanese, true),
    ("Dotum", CjkFamily::Korean, true),
    ("DotumChe", CjkFamily::Korean, false),
    ("Batang", CjkFamily::Korean, true),
    ("BatangChe", CjkFamily::Korean, false),
    ("SimSun", CjkFamily::SimplifiedChinese, false),
    ("SimHei", CjkFamily::SimplifiedChinese, false),
    ("MingLiU", CjkFamily::TraditionalChinese, false),
];

/// Width of every double-byte character.
pub const CID_DEFAULT_WIDTH: u16 = 1000;
/// Width of single-byte (half-width) characters.
pub const CID_HALF_WIDTH: u16 = 500;

/// A built-in CID font face.
#[derive(Debug, Clone, PartialEq)]
pub struct CidFont {
    name: String,
    base: &'static str,
    family: CjkFamily,
    style: CidStyle,
    proportional: bool,
}

impl CidFont {
    /// Every face of `family`, styles included.
    pub fn family_fonts(family: CjkFamily) -> Vec<CidFont> {
        BASE_FONTS
            .iter()
            .filter(|(_, f, _)| *f == family)
            .flat_map(|&(base, family, proportional)| {
                CidStyle::ALL.into_iter().map(move |style| CidFont {
                    name: format!("{base}{}", style.suffix()),
                    base,
                    family,
                    style,
                    proportional,
                })
            })
            .collect()
    }

    /// Name used with `get_font`, e.g. `MS-Gothic,Bold`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn family(&self) -> CjkFamily {
        self.family
    }

    pub fn style(&self) -> CidStyle {
        self.style
    }

    pub fn is_proportional(&self) -> bool {
        self.proportional
    }

    /// Width of a character given its encoded length.
    pub fn char_width(&self, double_byte: bool) -> u16 {
        if double_byte {
            CID_DEFAULT_WIDTH
        } else {
            CID_HALF_WIDTH
        }
    }

    /// CID ranges of the half-width glyphs, used for `/W`.
    pub fn half_width_ranges(&self) -> &'static [(u32, u32)] {
        match self.family {
            CjkFamily::Japanese => &[(231, 389), (631, 631)],
            CjkFamily::Korean => &[(8094, 8190)],
            CjkFamily::SimplifiedChinese => &[(814, 907), (7716, 7716)],
            CjkFamily::TraditionalChinese => &[(13648, 13742), (17603, 17603)],
        }
    }

    pub fn descriptor(&self) -> FontDescriptor {
        let mut flags = FontFlags::SYMBOLIC;
        if !self.proportional {
            flags |= FontFlags::FIXED_PITCH;
        }
        if self.base.contains("Mincho")
            || self.base.starts_with("Batang")
            || self.base == "SimSun"
            || self.base == "MingLiU"
        {
            flags |= FontFlags::SERIF;
        }
        let italic = matches!(self.style, CidStyle::Italic | CidStyle::BoldItalic);
        if italic {
            flags |= FontFlags::ITALIC;
        }
        if matches!(self.style, CidStyle::Bold | CidStyle::BoldItalic) {
            flags |= FontFlags::FORCE_BOLD;
        }

        FontDescriptor {
            font_name: self.name.clone(),
            flags,
            font_bbox: [0, -141, 1000, 859],
            italic_angle: if italic { -11.0 } else { 0.0 },
            ascent: 859,
            descent: -140,
            cap_height: 769,
            x_height: 0,
            stem_v: 78,
            missing_width: 0,
        }
    }
}
