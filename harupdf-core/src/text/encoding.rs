//! Encoders translate between text bytes and Unicode.
//!
//! Single-byte encoders carry a 256-entry code table. Double-byte encoders
//! name a predefined CMap and classify bytes as lead or trail bytes of
//! multi-byte characters; their Unicode mapping goes through the matching
//! `encoding_rs` codec.

use encoding_rs::Encoding;
use std::collections::HashMap;

use crate::text::glyph_names::glyph_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EncoderType {
    SingleByte,
    DoubleByte,
    Uninitialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteType {
    Single,
    Lead,
    Trail,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WritingMode {
    #[default]
    Horizontal,
    Vertical,
}

/// Encodings a simple font dictionary can name without `/Differences`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseEncoding {
    Standard,
    WinAnsi,
    MacRoman,
    FontSpecific,
}

impl BaseEncoding {
    pub fn pdf_name(self) -> Option<&'static str> {
        match self {
            BaseEncoding::Standard => Some("StandardEncoding"),
            BaseEncoding::WinAnsi => Some("WinAnsiEncoding"),
            BaseEncoding::MacRoman => Some("MacRomanEncoding"),
            BaseEncoding::FontSpecific => None,
        }
    }
}

pub const STANDARD_ENCODING: &str = "StandardEncoding";
pub const WIN_ANSI_ENCODING: &str = "WinAnsiEncoding";
pub const MAC_ROMAN_ENCODING: &str = "MacRomanEncoding";
pub const FONT_SPECIFIC: &str = "FontSpecific";

/// Every built-in single-byte encoder name.
pub const SINGLE_BYTE_ENCODINGS: &[&str] = &[
    STANDARD_ENCODING,
    MAC_ROMAN_ENCODING,
    WIN_ANSI_ENCODING,
    FONT_SPECIFIC,
    "ISO8859-2",
    "ISO8859-3",
    "ISO8859-4",
    "ISO8859-5",
    "ISO8859-6",
    "ISO8859-7",
    "ISO8859-8",
    "ISO8859-9",
    "ISO8859-10",
    "ISO8859-11",
    "ISO8859-13",
    "ISO8859-14",
    "ISO8859-15",
    "ISO8859-16",
    "CP1250",
    "CP1251",
    "CP1252",
    "CP1253",
    "CP1254",
    "CP1255",
    "CP1256",
    "CP1257",
    "CP1258",
    "KOI8-R",
];

// 0x80..=0x9F of WinAnsiEncoding; zero marks an undefined code.
const WIN_ANSI_HIGH: [u16; 32] = [
    0x20AC, 0x0000, 0x201A, 0x0192, 0x201E, 0x2026, 0x2020, 0x2021, 0x02C6, 0x2030, 0x0160,
    0x2039, 0x0152, 0x0000, 0x017D, 0x0000, 0x0000, 0x2018, 0x2019, 0x201C, 0x201D, 0x2022,
    0x2013, 0x2014, 0x02DC, 0x2122, 0x0161, 0x203A, 0x0153, 0x0000, 0x017E, 0x0178,
];

// Codes of StandardEncoding that differ from ASCII or lie above 0x7F.
const STANDARD_ENCODING_CODES: &[(u8, u16)] = &[
    (0x27, 0x2019),
    (0x60, 0x2018),
    (0xA1, 0x00A1),
    (0xA2, 0x00A2),
    (0xA3, 0x00A3),
    (0xA4, 0x2044),
    (0xA5, 0x00A5),
    (0xA6, 0x0192),
    (0xA7, 0x00A7),
    (0xA8, 0x00A4),
    (0xA9, 0x0027),
    (0xAA, 0x201C),
    (0xAB, 0x00AB),
    (0xAC, 0x2039),
    (0xAD, 0x203A),
    (0xAE, 0xFB01),
    (0xAF, 0xFB02),
    (0xB1, 0x2013),
    (0xB2, 0x2020),
    (0xB3, 0x2021),
    (0xB4, 0x00B7),
    (0xB6, 0x00B6),
    (0xB7, 0x2022),
    (0xB8, 0x201A),
    (0xB9, 0x201E),
    (0xBA, 0x201D),
    (0xBB, 0x00BB),
    (0xBC, 0x2026),
    (0xBD, 0x2030),
    (0xBF, 0x00BF),
    (0xC1, 0x0060),
    (0xC2, 0x00B4),
    (0xC3, 0x02C6),
    (0xC4, 0x02DC),
    (0xC5, 0x00AF),
    (0xC6, 0x02D8),
    (0xC7, 0x02D9),
    (0xC8, 0x00A8),
    (0xCA, 0x02DA),
    (0xCB, 0x00B8),
    (0xCD, 0x02DD),
    (0xCE, 0x02DB),
    (0xCF, 0x02C7),
    (0xD0, 0x2014),
    (0xE1, 0x00C6),
    (0xE3, 0x00AA),
    (0xE8, 0x0141),
    (0xE9, 0x00D8),
    (0xEA, 0x0152),
    (0xEB, 0x00BA),
    (0xF1, 0x00E6),
    (0xF5, 0x0131),
    (0xF8, 0x0142),
    (0xF9, 0x00F8),
    (0xFA, 0x0153),
    (0xFB, 0x00DF),
];

fn win_ansi_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = match code {
            0x80..=0x9F => WIN_ANSI_HIGH[code - 0x80],
            _ => code as u16,
        };
    }
    table
}

fn standard_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    for (code, slot) in table.iter_mut().enumerate().take(0x7F) {
        *slot = code as u16;
    }
    for &(code, unicode) in STANDARD_ENCODING_CODES {
        table[code as usize] = unicode;
    }
    table
}

fn identity_table() -> [u16; 256] {
    let mut table = [0u16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        *slot = code as u16;
    }
    table
}

/// Decodes every byte through a code page. `c1_identity` keeps
/// 0x80..=0x9F as C1 controls for ISO tables that share a Windows codec.
fn codec_table(codec: &'static Encoding, c1_identity: bool) -> [u16; 256] {
    let mut table = [0u16; 256];
    for (code, slot) in table.iter_mut().enumerate() {
        if code < 0x80 || (c1_identity && code < 0xA0) {
            *slot = code as u16;
            continue;
        }
        let byte = [code as u8];
        let unicode = codec
            .decode_without_bom_handling_and_without_replacement(&byte)
            .and_then(|text| text.chars().next())
            .map(|ch| ch as u32)
            .unwrap_or(0);
        *slot = u16::try_from(unicode).unwrap_or(0);
    }
    table
}

fn single_byte_spec(name: &str) -> Option<([u16; 256], Option<BaseEncoding>)> {
    let table = match name {
        STANDARD_ENCODING => return Some((standard_table(), Some(BaseEncoding::Standard))),
        WIN_ANSI_ENCODING => return Some((win_ansi_table(), Some(BaseEncoding::WinAnsi))),
        MAC_ROMAN_ENCODING => {
            return Some((
                codec_table(encoding_rs::MACINTOSH, false),
                Some(BaseEncoding::MacRoman),
            ))
        }
        FONT_SPECIFIC => return Some((identity_table(), Some(BaseEncoding::FontSpecific))),
        "CP1252" => win_ansi_table(),
        "ISO8859-2" => codec_table(encoding_rs::ISO_8859_2, true),
        "ISO8859-3" => codec_table(encoding_rs::ISO_8859_3, true),
        "ISO8859-4" => codec_table(encoding_rs::ISO_8859_4, true),
        "ISO8859-5" => codec_table(encoding_rs::ISO_8859_5, true),
        "ISO8859-6" => codec_table(encoding_rs::ISO_8859_6, true),
        "ISO8859-7" => codec_table(encoding_rs::ISO_8859_7, true),
        "ISO8859-8" => codec_table(encoding_rs::ISO_8859_8, true),
        "ISO8859-9" => codec_table(encoding_rs::WINDOWS_1254, true),
        "ISO8859-10" => codec_table(encoding_rs::ISO_8859_10, true),
        "ISO8859-11" => codec_table(encoding_rs::WINDOWS_874, true),
        "ISO8859-13" => codec_table(encoding_rs::ISO_8859_13, true),
        "ISO8859-14" => codec_table(encoding_rs::ISO_8859_14, true),
        "ISO8859-15" => codec_table(encoding_rs::ISO_8859_15, true),
        "ISO8859-16" => codec_table(encoding_rs::ISO_8859_16, true),
        "CP1250" => codec_table(encoding_rs::WINDOWS_1250, false),
        "CP1251" => codec_table(encoding_rs::WINDOWS_1251, false),
        "CP1253" => codec_table(encoding_rs::WINDOWS_1253, false),
        "CP1254" => codec_table(encoding_rs::WINDOWS_1254, false),
        "CP1255" => codec_table(encoding_rs::WINDOWS_1255, false),
        "CP1256" => codec_table(encoding_rs::WINDOWS_1256, false),
        "CP1257" => codec_table(encoding_rs::WINDOWS_1257, false),
        "CP1258" => codec_table(encoding_rs::WINDOWS_1258, false),
        "KOI8-R" => codec_table(encoding_rs::KOI8_R, false),
        _ => return None,
    };
    Some((table, None))
}

/// Lead/trail byte rules of a multi-byte code page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ByteScheme {
    ShiftJis,
    EucJp,
    Euc,
    Uhc,
    Gbk,
    Big5,
}

impl ByteScheme {
    fn is_lead(self, b: u8) -> bool {
        match self {
            ByteScheme::ShiftJis => matches!(b, 0x81..=0x9F | 0xE0..=0xFC),
            ByteScheme::EucJp => matches!(b, 0x8E | 0xA1..=0xFE),
            ByteScheme::Euc => matches!(b, 0xA1..=0xFE),
            ByteScheme::Uhc | ByteScheme::Gbk | ByteScheme::Big5 => matches!(b, 0x81..=0xFE),
        }
    }

    fn is_trail(self, b: u8) -> bool {
        match self {
            ByteScheme::ShiftJis => matches!(b, 0x40..=0x7E | 0x80..=0xFC),
            ByteScheme::EucJp | ByteScheme::Euc => matches!(b, 0xA1..=0xFE),
            ByteScheme::Uhc => matches!(b, 0x41..=0x5A | 0x61..=0x7A | 0x81..=0xFE),
            ByteScheme::Gbk => matches!(b, 0x40..=0x7E | 0x80..=0xFE),
            ByteScheme::Big5 => matches!(b, 0x40..=0x7E | 0xA1..=0xFE),
        }
    }
}

/// Script families whose CMaps are enabled together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CjkFamily {
    Japanese,
    Korean,
    SimplifiedChinese,
    TraditionalChinese,
}

impl CjkFamily {
    /// `CIDSystemInfo` ordering and supplement.
    pub fn ordering(self) -> (&'static str, i64) {
        match self {
            CjkFamily::Japanese => ("Japan1", 2),
            CjkFamily::Korean => ("Korea1", 1),
            CjkFamily::SimplifiedChinese => ("GB1", 2),
            CjkFamily::TraditionalChinese => ("CNS1", 0),
        }
    }

    pub fn encoding_names(self) -> impl Iterator<Item = &'static str> {
        CMAPS
            .iter()
            .filter(move |cmap| cmap.family == self)
            .map(|cmap| cmap.name)
    }

    /// CMap used when a CID font of this family is requested without one.
    pub fn default_encoding(self) -> &'static str {
        match self {
            CjkFamily::Japanese => "90ms-RKSJ-H",
            CjkFamily::Korean => "KSCms-UHC-H",
            CjkFamily::SimplifiedChinese => "GBK-EUC-H",
            CjkFamily::TraditionalChinese => "ETen-B5-H",
        }
    }
}

struct CMapSpec {
    name: &'static str,
    family: CjkFamily,
    scheme: ByteScheme,
    codec: &'static Encoding,
    writing_mode: WritingMode,
}

macro_rules! cmap {
    ($name:expr, $family:ident, $scheme:ident, $codec:ident, $mode:ident) => {
        CMapSpec {
            name: $name,
            family: CjkFamily::$family,
            scheme: ByteScheme::$scheme,
            codec: encoding_rs::$codec,
            writing_mode: WritingMode::$mode,
        }
    };
}

static CMAPS: [CMapSpec; 16] = [
    cmap!("90ms-RKSJ-H", Japanese, ShiftJis, SHIFT_JIS, Horizontal),
    cmap!("90ms-RKSJ-V", Japanese, ShiftJis, SHIFT_JIS, Vertical),
    cmap!("90msp-RKSJ-H", Japanese, ShiftJis, SHIFT_JIS, Horizontal),
    cmap!("EUC-H", Japanese, EucJp, EUC_JP, Horizontal),
    cmap!("EUC-V", Japanese, EucJp, EUC_JP, Vertical),
    cmap!("KSC-EUC-H", Korean, Euc, EUC_KR, Horizontal),
    cmap!("KSC-EUC-V", Korean, Euc, EUC_KR, Vertical),
    cmap!("KSCms-UHC-H", Korean, Uhc, EUC_KR, Horizontal),
    cmap!("KSCms-UHC-HW-H", Korean, Uhc, EUC_KR, Horizontal),
    cmap!("KSCms-UHC-HW-V", Korean, Uhc, EUC_KR, Vertical),
    cmap!("GB-EUC-H", SimplifiedChinese, Euc, GBK, Horizontal),
    cmap!("GB-EUC-V", SimplifiedChinese, Euc, GBK, Vertical),
    cmap!("GBK-EUC-H", SimplifiedChinese, Gbk, GBK, Horizontal),
    cmap!("GBK-EUC-V", SimplifiedChinese, Gbk, GBK, Vertical),
    cmap!("ETen-B5-H", TraditionalChinese, Big5, BIG5, Horizontal),
    cmap!("ETen-B5-V", TraditionalChinese, Big5, BIG5, Vertical),
];

fn find_cmap(name: &str) -> Option<&'static CMapSpec> {
    CMAPS.iter().find(|cmap| cmap.name == name)
}

/// Family a double-byte encoder name belongs to.
pub fn cjk_family_of(name: &str) -> Option<CjkFamily> {
    find_cmap(name).map(|cmap| cmap.family)
}

#[derive(Debug, Clone)]
struct SingleByteTable {
    to_unicode: [u16; 256],
    from_unicode: HashMap<u16, u8>,
    base: Option<BaseEncoding>,
}

#[derive(Debug, Clone)]
struct CMapEncoding {
    family: CjkFamily,
    scheme: ByteScheme,
    codec: &'static Encoding,
    writing_mode: WritingMode,
}

#[derive(Debug, Clone)]
enum EncoderKind {
    SingleByte(SingleByteTable),
    DoubleByte(CMapEncoding),
}

#[derive(Debug, Clone)]
pub struct Encoder {
    name: String,
    kind: EncoderKind,
}

impl Encoder {
    /// Built-in single-byte encoder by name.
    pub fn single_byte(name: &str) -> Option<Self> {
        let (to_unicode, base) = single_byte_spec(name)?;
        let mut from_unicode = HashMap::with_capacity(256);
        // Lowest code wins when two codes share a Unicode value.
        for (code, &unicode) in to_unicode.iter().enumerate().rev() {
            if unicode != 0 || code == 0 {
                from_unicode.insert(unicode, code as u8);
            }
        }
        Some(Self {
            name: name.to_string(),
            kind: EncoderKind::SingleByte(SingleByteTable {
                to_unicode,
                from_unicode,
                base,
            }),
        })
    }

    /// Built-in double-byte encoder by CMap name.
    pub fn double_byte(name: &str) -> Option<Self> {
        let cmap = find_cmap(name)?;
        Some(Self {
            name: cmap.name.to_string(),
            kind: EncoderKind::DoubleByte(CMapEncoding {
                family: cmap.family,
                scheme: cmap.scheme,
                codec: cmap.codec,
                writing_mode: cmap.writing_mode,
            }),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn encoder_type(&self) -> EncoderType {
        match self.kind {
            EncoderKind::SingleByte(_) => EncoderType::SingleByte,
            EncoderKind::DoubleByte(_) => EncoderType::DoubleByte,
        }
    }

    pub fn writing_mode(&self) -> WritingMode {
        match &self.kind {
            EncoderKind::SingleByte(_) => WritingMode::Horizontal,
            EncoderKind::DoubleByte(cmap) => cmap.writing_mode,
        }
    }

    /// Classifies the byte at `index`, scanning from the start of `text`.
    pub fn byte_type(&self, text: &[u8], index: usize) -> ByteType {
        if index >= text.len() {
            return ByteType::Unknown;
        }
        let cmap = match &self.kind {
            EncoderKind::SingleByte(_) => return ByteType::Single,
            EncoderKind::DoubleByte(cmap) => cmap,
        };

        let mut i = 0;
        loop {
            let b = text[i];
            if !cmap.scheme.is_lead(b) {
                if i == index {
                    return ByteType::Single;
                }
                i += 1;
                continue;
            }
            if i == index {
                return ByteType::Lead;
            }
            let has_trail = text.get(i + 1).is_some_and(|&t| cmap.scheme.is_trail(t));
            if i + 1 == index {
                return if has_trail {
                    ByteType::Trail
                } else {
                    ByteType::Unknown
                };
            }
            i += if has_trail { 2 } else { 1 };
        }
    }

    /// Unicode value of a code; 0 when the code is unmapped.
    ///
    /// Double-byte codes are `lead << 8 | trail`.
    pub fn unicode(&self, code: u16) -> u16 {
        match &self.kind {
            EncoderKind::SingleByte(table) => {
                if code > 0xFF {
                    return 0;
                }
                table.to_unicode[code as usize]
            }
            EncoderKind::DoubleByte(cmap) => {
                let bytes = code.to_be_bytes();
                let input: &[u8] = if code > 0xFF { &bytes } else { &bytes[1..] };
                cmap.codec
                    .decode_without_bom_handling_and_without_replacement(input)
                    .and_then(|text| {
                        let mut chars = text.chars();
                        match (chars.next(), chars.next()) {
                            (Some(ch), None) => u16::try_from(ch as u32).ok(),
                            _ => None,
                        }
                    })
                    .unwrap_or(0)
            }
        }
    }

    /// Converts UTF-8 text into this encoder's bytes.
    ///
    /// Unmappable characters become `?` for single-byte encoders.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match &self.kind {
            EncoderKind::SingleByte(table) => {
                let mut out = Vec::with_capacity(text.len());
                let mut units = [0u16; 2];
                for ch in text.chars() {
                    let encoded = ch.encode_utf16(&mut units);
                    let code = match encoded {
                        [unit] => table.from_unicode.get(unit).copied(),
                        _ => None,
                    };
                    out.push(code.unwrap_or(b'?'));
                }
                out
            }
            EncoderKind::DoubleByte(cmap) => {
                let (bytes, _, _) = cmap.codec.encode(text);
                bytes.into_owned()
            }
        }
    }

    /// Splits `text` into characters as `(start, len)` byte ranges.
    pub(crate) fn char_spans(&self, text: &[u8]) -> Vec<(usize, usize)> {
        let cmap = match &self.kind {
            EncoderKind::SingleByte(_) => return (0..text.len()).map(|i| (i, 1)).collect(),
            EncoderKind::DoubleByte(cmap) => cmap,
        };
        let mut spans = Vec::with_capacity(text.len());
        let mut i = 0;
        while i < text.len() {
            let double = cmap.scheme.is_lead(text[i])
                && text.get(i + 1).is_some_and(|&t| cmap.scheme.is_trail(t));
            let len = if double { 2 } else { 1 };
            spans.push((i, len));
            i += len;
        }
        spans
    }

    pub(crate) fn base_encoding(&self) -> Option<BaseEncoding> {
        match &self.kind {
            EncoderKind::SingleByte(table) => table.base,
            EncoderKind::DoubleByte(_) => None,
        }
    }

    pub(crate) fn cjk_family(&self) -> Option<CjkFamily> {
        match &self.kind {
            EncoderKind::SingleByte(_) => None,
            EncoderKind::DoubleByte(cmap) => Some(cmap.family),
        }
    }

    /// Codes 32..=255 whose glyph differs from WinAnsiEncoding, as
    /// `(code, glyph name)` pairs. Empty for encoders a font dictionary
    /// names directly.
    pub(crate) fn differences(&self) -> Vec<(u8, String)> {
        let table = match &self.kind {
            EncoderKind::SingleByte(table)
                if matches!(table.base, None | Some(BaseEncoding::Standard)) =>
            {
                table
            }
            _ => return Vec::new(),
        };
        let win_ansi = win_ansi_table();
        (32..=255usize)
            .filter(|&code| {
                let unicode = table.to_unicode[code];
                unicode != 0 && unicode != win_ansi[code]
            })
            .map(|code| (code as u8, glyph_name(table.to_unicode[code]).into_owned()))
            .collect()
    }

    /// Whether outline titles in this encoding can be written as bytes.
    pub(crate) fn is_latin(&self) -> bool {
        matches!(
            self.base_encoding(),
            Some(BaseEncoding::Standard | BaseEncoding::WinAnsi | BaseEncoding::MacRoman)
        )
    }
}
