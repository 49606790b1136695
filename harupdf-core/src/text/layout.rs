//! Width accounting and line breaking over encoded text.
//!
//! Fonts turn text bytes into [`Glyph`]s; everything here works on those
//! so single- and double-byte fonts share one breaking algorithm.

/// Totals reported by `text_width`. `width` is in 1/1000 text space units
/// at font size 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextWidth {
    pub numchars: u32,
    pub numwords: u32,
    pub width: u32,
    pub numspace: u32,
}

/// One character of encoded text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Glyph {
    /// Byte offset of the character in the text.
    pub start: usize,
    /// 1 for single-byte characters, 2 for lead/trail pairs.
    pub len: usize,
    pub width: u16,
    /// First byte of the character.
    pub byte: u8,
}

impl Glyph {
    pub fn is_double_byte(&self) -> bool {
        self.len > 1
    }

    fn is_white_space(&self) -> bool {
        !self.is_double_byte() && is_white_space(self.byte)
    }
}

/// NUL, tab, line feed, form feed, carriage return and space.
pub(crate) fn is_white_space(b: u8) -> bool {
    matches!(b, 0x00 | 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

pub(crate) fn text_width(glyphs: &[Glyph]) -> TextWidth {
    let mut result = TextWidth::default();
    for glyph in glyphs {
        if !glyph.is_double_byte() && glyph.byte == b' ' {
            result.numspace += 1;
            result.numwords += 1;
        }
        result.width += u32::from(glyph.width);
        result.numchars += 1;
    }
    if glyphs.last().is_some_and(|last| !last.is_white_space()) {
        result.numwords += 1;
    }
    result
}

/// Parameters of one `measure_text` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeasureOptions {
    pub width: f32,
    pub font_size: f32,
    pub char_space: f32,
    pub word_space: f32,
    pub word_wrap: bool,
}

/// Length in bytes of the longest prefix of the text that fits in
/// `options.width`.
///
/// With word wrap the prefix ends after white space. Double-byte
/// characters may always start a new line. A line feed ends the prefix
/// and is included in it. When not even the first word fits, the text is
/// broken between characters instead.
pub(crate) fn measure(glyphs: &[Glyph], text_len: usize, options: &MeasureOptions) -> usize {
    let fitted = measure_pass(glyphs, text_len, options, options.word_wrap);
    if fitted == 0 && options.word_wrap && text_len > 0 {
        return measure_pass(glyphs, text_len, options, false);
    }
    fitted
}

fn measure_pass(
    glyphs: &[Glyph],
    text_len: usize,
    options: &MeasureOptions,
    word_wrap: bool,
) -> usize {
    let mut width = 0.0f32;
    let mut fitted = 0;

    for (i, glyph) in glyphs.iter().enumerate() {
        if glyph.is_white_space() {
            fitted = glyph.start + glyph.len;
            if glyph.byte == b' ' {
                width += options.word_space;
            }
        } else if !word_wrap || glyph.is_double_byte() {
            fitted = glyph.start;
        }

        width += f32::from(glyph.width) * options.font_size / 1000.0;
        if width > options.width || (!glyph.is_double_byte() && glyph.byte == b'\n') {
            return fitted;
        }
        if i > 0 {
            width += options.char_space;
        }
    }

    text_len
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every byte is a 500-unit glyph.
    fn glyphs(text: &[u8]) -> Vec<Glyph> {
        text.iter()
            .enumerate()
            .map(|(start, &byte)| Glyph {
                start,
                len: 1,
                width: 500,
                byte,
            })
            .collect()
    }

    fn options(width: f32, word_wrap: bool) -> MeasureOptions {
        MeasureOptions {
            width,
            font_size: 10.0,
            char_space: 0.0,
            word_space: 0.0,
            word_wrap,
        }
    }

    #[test]
    fn test_text_width_counts() {
        let tw = text_width(&glyphs(b"ab cd e"));
        assert_eq!(tw.numchars, 7);
        assert_eq!(tw.numspace, 2);
        assert_eq!(tw.numwords, 3);
        assert_eq!(tw.width, 3500);

        let trailing = text_width(&glyphs(b"ab "));
        assert_eq!(trailing.numwords, 1);
        assert_eq!(text_width(&[]), TextWidth::default());
    }

    #[test]
    fn test_everything_fits() {
        let text = b"hello world";
        assert_eq!(measure(&glyphs(text), text.len(), &options(1000.0, true)), text.len());
    }

    #[test]
    fn test_word_wrap_breaks_after_space() {
        // 5 units per glyph; "hello wo" needs 40.
        let text = b"hello world";
        assert_eq!(measure(&glyphs(text), text.len(), &options(42.0, true)), 6);
    }

    #[test]
    fn test_character_breaking() {
        let text = b"hello world";
        assert_eq!(measure(&glyphs(text), text.len(), &options(42.0, false)), 8);
    }

    #[test]
    fn test_long_first_word_falls_back_to_characters() {
        let text = b"abcdefghij klm";
        assert_eq!(measure(&glyphs(text), text.len(), &options(22.0, true)), 4);
    }

    #[test]
    fn test_line_feed_forces_break() {
        let text = b"ab\ncd";
        assert_eq!(measure(&glyphs(text), text.len(), &options(1000.0, true)), 3);
    }

    #[test]
    fn test_spacing_reduces_fit() {
        let text = b"aaaa";
        let mut opts = options(20.0, false);
        assert_eq!(measure(&glyphs(text), text.len(), &opts), 4);
        opts.char_space = 1.0;
        assert_eq!(measure(&glyphs(text), text.len(), &opts), 3);
    }

    #[test]
    fn test_double_byte_characters_break_anywhere() {
        let glyphs = vec![
            Glyph { start: 0, len: 2, width: 1000, byte: 0x82 },
            Glyph { start: 2, len: 2, width: 1000, byte: 0x82 },
            Glyph { start: 4, len: 2, width: 1000, byte: 0x82 },
        ];
        assert_eq!(measure(&glyphs, 6, &options(25.0, true)), 4);
    }
}
