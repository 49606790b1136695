//! Type 1 fonts described by an AFM file, optionally embedded from a PFB.

use std::collections::HashMap;

use crate::error::{PdfError, Result};
use crate::fonts::{FontDescriptor, FontFlags};
use crate::text::glyph_names;

/// A Type 1 font program split the way `/FontFile` expects it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type1Program {
    pub data: Vec<u8>,
    /// Clear-text portion.
    pub length1: usize,
    /// Encrypted binary portion.
    pub length2: usize,
    /// Trailing zeros and `cleartomark`.
    pub length3: usize,
}

/// Metrics of a Type 1 font read from its AFM file.
#[derive(Debug, Clone)]
pub struct Type1Font {
    font_name: String,
    descriptor: FontDescriptor,
    /// `EncodingScheme` from the AFM header.
    encoding_scheme: String,
    widths_by_name: HashMap<String, u16>,
    widths_by_code: HashMap<u8, u16>,
    program: Option<Type1Program>,
}

impl Type1Font {
    /// Parse AFM text and, when given, the matching PFB file.
    pub fn parse(afm: &str, pfb: Option<&[u8]>) -> Result<Self> {
        let mut lines = afm.lines().map(str::trim).filter(|l| !l.is_empty());
        match lines.next() {
            Some(first) if first.starts_with("StartFontMetrics") => {}
            _ => return Err(PdfError::InvalidAfmHeader),
        }

        let mut font_name = None;
        let mut descriptor = FontDescriptor::new("");
        descriptor.x_height = 0;
        let mut fixed_pitch = false;
        let mut encoding_scheme = String::from("AdobeStandardEncoding");
        let mut widths_by_name = HashMap::new();
        let mut widths_by_code = HashMap::new();
        let mut in_char_metrics = false;

        for line in lines {
            let (key, value) = line
                .split_once(char::is_whitespace)
                .map(|(k, v)| (k, v.trim()))
                .unwrap_or((line, ""));

            if in_char_metrics {
                match key {
                    "EndCharMetrics" => in_char_metrics = false,
                    _ => {
                        let (code, width, name) = parse_char_metrics(line)?;
                        if let Some(name) = name {
                            widths_by_name.insert(name, width);
                        }
                        if let Ok(code) = u8::try_from(code) {
                            widths_by_code.insert(code, width);
                        }
                    }
                }
                continue;
            }

            match key {
                "FontName" => font_name = Some(value.to_string()),
                "ItalicAngle" => descriptor.italic_angle = value.parse().unwrap_or(0.0),
                "IsFixedPitch" => fixed_pitch = value == "true",
                "FontBBox" => {
                    let parts: Vec<i16> = value
                        .split_whitespace()
                        .filter_map(|v| v.parse::<f32>().ok())
                        .map(|v| v as i16)
                        .collect();
                    if let [llx, lly, urx, ury] = parts[..] {
                        descriptor.font_bbox = [llx, lly, urx, ury];
                    }
                }
                "CapHeight" => descriptor.cap_height = parse_metric(value),
                "XHeight" => descriptor.x_height = parse_metric(value),
                "Ascender" => descriptor.ascent = parse_metric(value),
                "Descender" => descriptor.descent = parse_metric(value),
                "StdVW" => descriptor.stem_v = parse_metric(value),
                "EncodingScheme" => encoding_scheme = value.to_string(),
                "StartCharMetrics" => in_char_metrics = true,
                "EndFontMetrics" => break,
                _ => {}
            }
        }

        let font_name = font_name.filter(|n| !n.is_empty()).ok_or(PdfError::InvalidNData)?;
        descriptor.font_name = font_name.clone();

        let symbolic = encoding_scheme == "FontSpecific";
        descriptor.flags = if symbolic {
            FontFlags::SYMBOLIC
        } else {
            FontFlags::NONSYMBOLIC
        };
        if fixed_pitch {
            descriptor.flags |= FontFlags::FIXED_PITCH;
        }
        if descriptor.italic_angle != 0.0 {
            descriptor.flags |= FontFlags::ITALIC;
        }
        if descriptor.cap_height == 0 {
            descriptor.cap_height = descriptor.font_bbox[3];
        }
        if descriptor.ascent == 0 {
            descriptor.ascent = descriptor.font_bbox[3];
        }
        if descriptor.descent == 0 {
            descriptor.descent = descriptor.font_bbox[1];
        }

        let program = pfb.map(parse_pfb).transpose()?;

        Ok(Self {
            font_name,
            descriptor,
            encoding_scheme,
            widths_by_name,
            widths_by_code,
            program,
        })
    }

    pub fn font_name(&self) -> &str {
        &self.font_name
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn encoding_scheme(&self) -> &str {
        &self.encoding_scheme
    }

    /// True when the AFM declares a built-in symbolic encoding.
    pub fn is_font_specific(&self) -> bool {
        self.encoding_scheme == "FontSpecific"
    }

    pub fn program(&self) -> Option<&Type1Program> {
        self.program.as_ref()
    }

    /// Width of the glyph named for `unicode`; 0 when the font lacks it.
    pub fn unicode_width(&self, unicode: u16) -> u16 {
        self.glyph_width(&glyph_names::glyph_name(unicode))
    }

    pub fn glyph_width(&self, name: &str) -> u16 {
        self.widths_by_name.get(name).copied().unwrap_or(0)
    }

    /// Width of the glyph at `code` in the font's built-in encoding.
    pub fn code_width(&self, code: u8) -> u16 {
        self.widths_by_code.get(&code).copied().unwrap_or(0)
    }
}

fn parse_metric(value: &str) -> i16 {
    value.parse::<f32>().map(|v| v as i16).unwrap_or(0)
}

/// `C code ; WX width ; N name ; ...`
fn parse_char_metrics(line: &str) -> Result<(i32, u16, Option<String>)> {
    let mut code = None;
    let mut width = None;
    let mut name = None;

    for field in line.split(';').map(str::trim).filter(|f| !f.is_empty()) {
        let mut parts = field.split_whitespace();
        match parts.next() {
            Some("C") | Some("CH") => {
                let raw = parts
                    .next()
                    .ok_or_else(|| PdfError::InvalidCharMetricsData(line.to_string()))?;
                let parsed = match raw.strip_prefix('<').and_then(|h| h.strip_suffix('>')) {
                    Some(hex) => i32::from_str_radix(hex, 16).ok(),
                    None => raw.parse().ok(),
                };
                let parsed =
                    parsed.ok_or_else(|| PdfError::InvalidCharMetricsData(line.to_string()))?;
                code = Some(parsed);
            }
            Some("WX") | Some("W0X") => {
                let value = parts
                    .next()
                    .and_then(|w| w.parse::<f32>().ok())
                    .filter(|w| *w >= 0.0)
                    .ok_or_else(|| PdfError::InvalidWxData(line.to_string()))?;
                width = Some(value as u16);
            }
            Some("N") => name = parts.next().map(str::to_string),
            _ => {}
        }
    }

    let code = code.ok_or_else(|| PdfError::InvalidCharMetricsData(line.to_string()))?;
    let width = width.ok_or_else(|| PdfError::InvalidWxData(line.to_string()))?;
    Ok((code, width, name))
}

/// Splits a PFB file into its clear-text, binary and trailer parts.
pub fn parse_pfb(data: &[u8]) -> Result<Type1Program> {
    let malformed = |msg: &str| PdfError::UnsupportedType1Font(msg.to_string());

    let mut pos = 0;
    let mut segments: [Vec<u8>; 3] = Default::default();
    let mut binary_seen = false;

    loop {
        let header = data.get(pos..pos + 2).ok_or_else(|| malformed("unexpected end of file"))?;
        if header[0] != 0x80 {
            return Err(malformed("missing segment marker"));
        }
        let kind = header[1];
        if kind == 0x03 {
            break;
        }
        let len_bytes = data
            .get(pos + 2..pos + 6)
            .ok_or_else(|| malformed("truncated segment header"))?;
        let len =
            u32::from_le_bytes([len_bytes[0], len_bytes[1], len_bytes[2], len_bytes[3]]) as usize;
        let body = data
            .get(pos + 6..pos + 6 + len)
            .ok_or_else(|| malformed("segment extends beyond file"))?;

        let slot = match kind {
            0x01 if !binary_seen => 0,
            0x01 => 2,
            0x02 => {
                binary_seen = true;
                1
            }
            _ => return Err(malformed("unknown segment type")),
        };
        segments[slot].extend_from_slice(body);
        pos += 6 + len;
    }

    if segments[0].is_empty() || segments[1].is_empty() {
        return Err(malformed("missing clear-text or binary segment"));
    }

    let [clear, binary, trailer] = segments;
    let (length1, length2, length3) = (clear.len(), binary.len(), trailer.len());
    let mut data = clear;
    data.extend(binary);
    data.extend(trailer);
    Ok(Type1Program {
        data,
        length1,
        length2,
        length3,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AFM: &str = "StartFontMetrics 4.1
Comment Test font
FontName Test-Roman
FullName Test Roman
ItalicAngle 0
IsFixedPitch false
FontBBox -168 -218 1000 898
CapHeight 662
XHeight 450
Ascender 683
Descender -217
StdVW 84
EncodingScheme AdobeStandardEncoding
StartCharMetrics 3
C 32 ; WX 250 ; N space ; B 0 0 0 0 ;
C 65 ; WX 722 ; N A ; B 15 0 706 674 ;
C -1 ; WX 667 ; N Adieresis ; B 15 0 706 888 ;
EndCharMetrics
EndFontMetrics
";

    #[test]
    fn test_parse_afm() {
        let font = Type1Font::parse(AFM, None).unwrap();
        assert_eq!(font.font_name(), "Test-Roman");
        assert_eq!(font.glyph_width("A"), 722);
        assert_eq!(font.unicode_width(0x41), 722);
        assert_eq!(font.unicode_width(0xC4), 667);
        assert_eq!(font.code_width(32), 250);
        assert_eq!(font.unicode_width(0x42), 0);

        let desc = font.descriptor();
        assert_eq!(desc.font_bbox, [-168, -218, 1000, 898]);
        assert_eq!(desc.cap_height, 662);
        assert_eq!(desc.x_height, 450);
        assert_eq!(desc.stem_v, 84);
        assert_eq!(desc.flags, FontFlags::NONSYMBOLIC);
        assert!(font.program().is_none());
    }

    #[test]
    fn test_afm_errors() {
        assert!(matches!(
            Type1Font::parse("FontName X\n", None),
            Err(PdfError::InvalidAfmHeader)
        ));
        assert!(matches!(
            Type1Font::parse("StartFontMetrics 4.1\nEndFontMetrics\n", None),
            Err(PdfError::InvalidNData)
        ));

        let bad_wx = AFM.replace("WX 722", "WX abc");
        assert!(matches!(
            Type1Font::parse(&bad_wx, None),
            Err(PdfError::InvalidWxData(_))
        ));
        let bad_code = AFM.replace("C 65 ;", "C x ;");
        assert!(matches!(
            Type1Font::parse(&bad_code, None),
            Err(PdfError::InvalidCharMetricsData(_))
        ));
    }

    fn segment(kind: u8, body: &[u8]) -> Vec<u8> {
        let mut out = vec![0x80, kind];
        out.extend_from_slice(&(body.len() as u32).to_le_bytes());
        out.extend_from_slice(body);
        out
    }

    #[test]
    fn test_parse_pfb_segments() {
        let mut pfb = segment(1, b"%!PS-AdobeFont-1.0");
        pfb.extend(segment(2, &[1, 2, 3, 4, 5]));
        pfb.extend(segment(1, b"cleartomark"));
        pfb.extend([0x80, 0x03]);

        let program = parse_pfb(&pfb).unwrap();
        assert_eq!(program.length1, 18);
        assert_eq!(program.length2, 5);
        assert_eq!(program.length3, 11);
        assert_eq!(program.data.len(), 34);
        assert!(program.data.starts_with(b"%!PS"));
    }

    #[test]
    fn test_malformed_pfb() {
        assert!(matches!(parse_pfb(b"%!PS"), Err(PdfError::UnsupportedType1Font(_))));

        let mut truncated = segment(1, b"abc");
        truncated.truncate(5);
        assert!(parse_pfb(&truncated).is_err());

        let mut no_binary = segment(1, b"abc");
        no_binary.extend([0x80, 0x03]);
        assert!(parse_pfb(&no_binary).is_err());
    }
}
