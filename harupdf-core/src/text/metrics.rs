//! AFM metrics of the fourteen standard fonts.
//!
//! Widths are in 1/1000 text space units. Latin fonts are keyed by Unicode
//! character; Symbol and ZapfDingbats are keyed by their built-in code.

use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

use crate::fonts::StandardFont;

/// Character widths and vertical metrics of one standard font.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    widths: HashMap<char, u16>,
    default_width: u16,
    pub ascent: i16,
    pub descent: i16,
    pub cap_height: i16,
    pub x_height: i16,
    pub bbox: [i16; 4],
}

impl FontMetrics {
    fn new(default_width: u16) -> Self {
        Self {
            widths: HashMap::new(),
            default_width,
            ascent: 0,
            descent: 0,
            cap_height: 0,
            x_height: 0,
            bbox: [0, 0, 1000, 1000],
        }
    }

    fn with_widths(mut self, widths: &[(char, u16)]) -> Self {
        for &(ch, width) in widths {
            self.widths.insert(ch, width);
        }
        self
    }

    /// Widths of the printable ASCII codes 0x20..=0x7E, in order.
    fn with_ascii_widths(mut self, widths: &[u16; 95]) -> Self {
        for (offset, &width) in widths.iter().enumerate() {
            self.widths.insert(char::from(0x20 + offset as u8), width);
        }
        self
    }

    fn with_vertical(mut self, ascent: i16, descent: i16, cap_height: i16, x_height: i16) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self.cap_height = cap_height;
        self.x_height = x_height;
        self
    }

    fn with_bbox(mut self, bbox: [i16; 4]) -> Self {
        self.bbox = bbox;
        self
    }

    pub fn default_width(&self) -> u16 {
        self.default_width
    }

    /// Width of `ch`, falling back to its unaccented base letter and then
    /// to the ASCII look-alike of typographic punctuation.
    pub fn char_width(&self, ch: char) -> u16 {
        if let Some(width) = self.widths.get(&ch) {
            return *width;
        }
        if let Some(base) = std::iter::once(ch).nfd().next() {
            if let Some(width) = self.widths.get(&base) {
                return *width;
            }
        }
        ascii_lookalike(ch)
            .and_then(|alt| self.widths.get(&alt).copied())
            .unwrap_or(self.default_width)
    }

    /// Width of a built-in code of a symbolic font.
    pub fn code_width(&self, code: u8) -> u16 {
        self.widths
            .get(&char::from(code))
            .copied()
            .unwrap_or(self.default_width)
    }
}

fn ascii_lookalike(ch: char) -> Option<char> {
    match ch {
        '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{2039}' | '\u{203A}' => Some('\''),
        '\u{201C}' | '\u{201D}' | '\u{201E}' => Some('"'),
        '\u{2010}' | '\u{2011}' | '\u{2012}' | '\u{2013}' | '\u{00AD}' => Some('-'),
        '\u{00A0}' => Some(' '),
        _ => None,
    }
}

const TIMES_BOLD_WIDTHS: [u16; 95] = [
    250, 333, 555, 500, 500, 1000, 833, 278, 333, 333, 500, 570,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 333, 333, 570, 570, 570, 500, 930, 722, 667, 722,
    722, 667, 611, 778, 778, 389, 500, 778, 667, 944, 722, 778,
    611, 778, 722, 556, 667, 722, 722, 1000, 722, 722, 667, 333,
    278, 333, 581, 500, 333, 500, 556, 444, 556, 444, 333, 500,
    556, 278, 333, 556, 278, 833, 556, 500, 556, 556, 444, 389,
    333, 556, 500, 722, 500, 500, 444, 394, 220, 394, 520,
];

const TIMES_ITALIC_WIDTHS: [u16; 95] = [
    250, 333, 420, 500, 500, 833, 778, 214, 333, 333, 500, 675,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 333, 333, 675, 675, 675, 500, 920, 611, 611, 667,
    722, 611, 611, 722, 722, 333, 444, 667, 556, 833, 667, 722,
    611, 722, 611, 500, 556, 722, 611, 833, 611, 556, 556, 389,
    278, 389, 422, 500, 333, 500, 500, 444, 500, 444, 278, 500,
    500, 278, 278, 444, 278, 722, 500, 500, 500, 500, 389, 389,
    278, 500, 444, 667, 444, 444, 389, 400, 275, 400, 541,
];

const TIMES_BOLD_ITALIC_WIDTHS: [u16; 95] = [
    250, 389, 555, 500, 500, 833, 778, 278, 333, 333, 500, 570,
    250, 333, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 333, 333, 570, 570, 570, 500, 832, 667, 667, 667,
    722, 667, 667, 722, 778, 389, 500, 667, 611, 889, 722, 722,
    611, 722, 667, 556, 611, 722, 667, 889, 667, 611, 611, 333,
    278, 333, 570, 500, 333, 500, 500, 444, 500, 444, 333, 500,
    556, 278, 278, 500, 278, 778, 556, 500, 500, 500, 389, 389,
    278, 556, 444, 667, 500, 444, 389, 348, 220, 348, 570,
];

const SYMBOL_WIDTHS: [u16; 95] = [
    250, 333, 713, 500, 549, 833, 778, 439, 333, 333, 500, 549,
    250, 549, 250, 278, 500, 500, 500, 500, 500, 500, 500, 500,
    500, 500, 278, 278, 549, 549, 549, 444, 549, 722, 667, 722,
    612, 611, 763, 603, 722, 333, 631, 722, 686, 889, 722, 722,
    768, 741, 556, 592, 611, 690, 439, 768, 645, 795, 611, 333,
    863, 333, 658, 500, 500, 631, 549, 549, 494, 439, 521, 411,
    603, 329, 603, 549, 549, 576, 521, 549, 549, 521, 549, 603,
    439, 576, 713, 686, 493, 686, 494, 480, 200, 480, 549,
];

const ZAPF_DINGBATS_WIDTHS: [u16; 95] = [
    278, 974, 961, 974, 980, 719, 789, 790, 791, 690, 960, 939,
    549, 855, 911, 933, 911, 945, 974, 755, 846, 762, 761, 571,
    677, 763, 760, 759, 754, 494, 552, 537, 577, 692, 786, 788,
    788, 790, 793, 794, 816, 823, 789, 841, 823, 833, 816, 831,
    923, 744, 723, 749, 790, 792, 695, 776, 768, 792, 759, 707,
    708, 682, 701, 826, 815, 789, 789, 707, 687, 696, 689, 786,
    787, 713, 791, 785, 791, 873, 761, 762, 762, 759, 759, 892,
    892, 788, 784, 438, 138, 277, 415, 392, 392, 668, 668,
];

lazy_static::lazy_static! {
    static ref FONT_METRICS: HashMap<StandardFont, FontMetrics> = {
        let mut metrics = HashMap::new();

        let helvetica = FontMetrics::new(556).with_widths(&[
            (' ', 278), ('!', 278), ('"', 355), ('#', 556), ('$', 556), ('%', 889),
            ('&', 667), ('\'', 191), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 278), (';', 278), ('<', 584), ('=', 584),
            ('>', 584), ('?', 556), ('@', 1015), ('A', 667), ('B', 667), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 500), ('K', 667), ('L', 556), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 278),
            ('\\', 278), (']', 278), ('^', 469), ('_', 556), ('`', 333), ('a', 556),
            ('b', 556), ('c', 500), ('d', 556), ('e', 556), ('f', 278), ('g', 556),
            ('h', 556), ('i', 222), ('j', 222), ('k', 500), ('l', 222), ('m', 833),
            ('n', 556), ('o', 556), ('p', 556), ('q', 556), ('r', 333), ('s', 500),
            ('t', 278), ('u', 556), ('v', 500), ('w', 722), ('x', 500), ('y', 500),
            ('z', 500), ('{', 334), ('|', 260), ('}', 334), ('~', 584),
        ]).with_vertical(718, -207, 718, 523);
        metrics.insert(
            StandardFont::Helvetica,
            helvetica.clone().with_bbox([-166, -225, 1000, 931]),
        );
        metrics.insert(
            StandardFont::HelveticaOblique,
            helvetica.with_bbox([-170, -225, 1116, 931]),
        );

        let helvetica_bold = FontMetrics::new(611).with_widths(&[
            (' ', 278), ('!', 333), ('"', 474), ('#', 556), ('$', 556), ('%', 889),
            ('&', 722), ('\'', 238), ('(', 333), (')', 333), ('*', 389), ('+', 584),
            (',', 278), ('-', 333), ('.', 278), ('/', 278), ('0', 556), ('1', 556),
            ('2', 556), ('3', 556), ('4', 556), ('5', 556), ('6', 556), ('7', 556),
            ('8', 556), ('9', 556), (':', 333), (';', 333), ('<', 584), ('=', 584),
            ('>', 584), ('?', 611), ('@', 975), ('A', 722), ('B', 722), ('C', 722),
            ('D', 722), ('E', 667), ('F', 611), ('G', 778), ('H', 722), ('I', 278),
            ('J', 556), ('K', 722), ('L', 611), ('M', 833), ('N', 722), ('O', 778),
            ('P', 667), ('Q', 778), ('R', 722), ('S', 667), ('T', 611), ('U', 722),
            ('V', 667), ('W', 944), ('X', 667), ('Y', 667), ('Z', 611), ('[', 333),
            ('\\', 278), (']', 333), ('^', 584), ('_', 556), ('`', 333), ('a', 556),
            ('b', 611), ('c', 556), ('d', 611), ('e', 556), ('f', 333), ('g', 611),
            ('h', 611), ('i', 278), ('j', 278), ('k', 556), ('l', 278), ('m', 889),
            ('n', 611), ('o', 611), ('p', 611), ('q', 611), ('r', 389), ('s', 556),
            ('t', 333), ('u', 611), ('v', 556), ('w', 778), ('x', 556), ('y', 556),
            ('z', 500), ('{', 389), ('|', 280), ('}', 389), ('~', 584),
        ]).with_vertical(718, -207, 718, 532);
        metrics.insert(
            StandardFont::HelveticaBold,
            helvetica_bold.clone().with_bbox([-170, -228, 1003, 962]),
        );
        metrics.insert(
            StandardFont::HelveticaBoldOblique,
            helvetica_bold.with_bbox([-174, -228, 1114, 962]),
        );

        metrics.insert(StandardFont::TimesRoman, FontMetrics::new(500).with_widths(&[
            (' ', 250), ('!', 333), ('"', 408), ('#', 500), ('$', 500), ('%', 833),
            ('&', 778), ('\'', 180), ('(', 333), (')', 333), ('*', 500), ('+', 564),
            (',', 250), ('-', 333), ('.', 250), ('/', 278), ('0', 500), ('1', 500),
            ('2', 500), ('3', 500), ('4', 500), ('5', 500), ('6', 500), ('7', 500),
            ('8', 500), ('9', 500), (':', 278), (';', 278), ('<', 564), ('=', 564),
            ('>', 564), ('?', 444), ('@', 921), ('A', 722), ('B', 667), ('C', 667),
            ('D', 722), ('E', 611), ('F', 556), ('G', 722), ('H', 722), ('I', 333),
            ('J', 389), ('K', 722), ('L', 611), ('M', 889), ('N', 722), ('O', 722),
            ('P', 556), ('Q', 722), ('R', 667), ('S', 556), ('T', 611), ('U', 722),
            ('V', 722), ('W', 944), ('X', 722), ('Y', 722), ('Z', 611), ('[', 333),
            ('\\', 278), (']', 333), ('^', 469), ('_', 500), ('`', 333), ('a', 444),
            ('b', 500), ('c', 444), ('d', 500), ('e', 444), ('f', 333), ('g', 500),
            ('h', 500), ('i', 278), ('j', 278), ('k', 500), ('l', 278), ('m', 778),
            ('n', 500), ('o', 500), ('p', 500), ('q', 500), ('r', 333), ('s', 389),
            ('t', 278), ('u', 500), ('v', 500), ('w', 722), ('x', 500), ('y', 500),
            ('z', 444), ('{', 480), ('|', 200), ('}', 480), ('~', 541),
        ]).with_vertical(683, -217, 662, 450).with_bbox([-168, -218, 1000, 898]));

        metrics.insert(StandardFont::TimesBold, FontMetrics::new(500)
            .with_ascii_widths(&TIMES_BOLD_WIDTHS)
            .with_vertical(683, -217, 676, 461)
            .with_bbox([-168, -218, 1000, 935]));
        metrics.insert(StandardFont::TimesItalic, FontMetrics::new(500)
            .with_ascii_widths(&TIMES_ITALIC_WIDTHS)
            .with_vertical(683, -217, 653, 441)
            .with_bbox([-169, -217, 1010, 883]));
        metrics.insert(StandardFont::TimesBoldItalic, FontMetrics::new(500)
            .with_ascii_widths(&TIMES_BOLD_ITALIC_WIDTHS)
            .with_vertical(683, -217, 669, 462)
            .with_bbox([-200, -218, 996, 921]));

        // Courier (all characters have the same width)
        let courier = FontMetrics::new(600).with_vertical(629, -157, 562, 426);
        metrics.insert(StandardFont::Courier, courier.clone().with_bbox([-23, -250, 715, 805]));
        metrics.insert(StandardFont::CourierOblique, courier.with_bbox([-27, -250, 849, 805]));
        let courier_bold = FontMetrics::new(600).with_vertical(629, -157, 562, 439);
        metrics.insert(
            StandardFont::CourierBold,
            courier_bold.clone().with_bbox([-113, -250, 749, 801]),
        );
        metrics.insert(
            StandardFont::CourierBoldOblique,
            courier_bold.with_bbox([-57, -250, 869, 801]),
        );

        metrics.insert(StandardFont::Symbol, FontMetrics::new(250)
            .with_ascii_widths(&SYMBOL_WIDTHS)
            .with_vertical(1010, -293, 0, 0)
            .with_bbox([-180, -293, 1090, 1010]));
        metrics.insert(StandardFont::ZapfDingbats, FontMetrics::new(788)
            .with_ascii_widths(&ZAPF_DINGBATS_WIDTHS)
            .with_vertical(820, -143, 0, 0)
            .with_bbox([-1, -143, 981, 820]));

        metrics
    };
}

/// Metrics of a standard font.
pub fn standard_metrics(font: StandardFont) -> &'static FontMetrics {
    // Every variant is inserted above.
    &FONT_METRICS[&font]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_font_metrics_creation() {
        let metrics = FontMetrics::new(500);
        assert_eq!(metrics.char_width('A'), 500);
        assert_eq!(metrics.default_width(), 500);
    }

    #[test]
    fn test_font_metrics_with_widths() {
        let metrics = FontMetrics::new(500).with_widths(&[('A', 600), ('B', 700)]);
        assert_eq!(metrics.char_width('A'), 600);
        assert_eq!(metrics.char_width('B'), 700);
        assert_eq!(metrics.char_width('C'), 500);
    }

    #[test]
    fn test_all_font_metrics_exist() {
        for font in StandardFont::ALL {
            let metrics = standard_metrics(font);
            assert!(metrics.ascent > 0, "{font:?}");
            assert!(metrics.descent < 0, "{font:?}");
        }
    }

    #[test]
    fn test_helvetica_specific_characters() {
        let metrics = standard_metrics(StandardFont::Helvetica);
        assert_eq!(metrics.char_width(' '), 278);
        assert_eq!(metrics.char_width('A'), 667);
        assert_eq!(metrics.char_width('i'), 222);
        assert_eq!(metrics.char_width('W'), 944);
        assert_eq!(metrics.bbox, [-166, -225, 1000, 931]);
    }

    #[test]
    fn test_times_variants_have_own_widths() {
        assert_eq!(standard_metrics(StandardFont::TimesRoman).char_width('A'), 722);
        assert_eq!(standard_metrics(StandardFont::TimesBold).char_width('A'), 722);
        assert_eq!(standard_metrics(StandardFont::TimesItalic).char_width('A'), 611);
        assert_eq!(standard_metrics(StandardFont::TimesBoldItalic).char_width('A'), 667);
        assert_eq!(standard_metrics(StandardFont::TimesBold).char_width('W'), 1000);
    }

    #[test]
    fn test_courier_monospace_property() {
        for font in [StandardFont::Courier, StandardFont::CourierBoldOblique] {
            let metrics = standard_metrics(font);
            for ch in ['i', 'W', ' ', '\u{00E9}', '\u{4E00}'] {
                assert_eq!(metrics.char_width(ch), 600);
            }
        }
    }

    #[test]
    fn test_accented_characters_use_base_width() {
        let metrics = standard_metrics(StandardFont::Helvetica);
        assert_eq!(metrics.char_width('\u{00E9}'), metrics.char_width('e'));
        assert_eq!(metrics.char_width('\u{0160}'), metrics.char_width('S'));
        assert_eq!(metrics.char_width('\u{2019}'), metrics.char_width('\''));
        assert_eq!(metrics.char_width('\u{4E00}'), 556);
    }

    #[test]
    fn test_symbolic_fonts_use_codes() {
        let symbol = standard_metrics(StandardFont::Symbol);
        assert_eq!(symbol.code_width(b'a'), 631);
        assert_eq!(symbol.code_width(0xF0), 250);
        let zapf = standard_metrics(StandardFont::ZapfDingbats);
        assert_eq!(zapf.code_width(0x20), 278);
        assert_eq!(zapf.code_width(0x21), 974);
    }
}
