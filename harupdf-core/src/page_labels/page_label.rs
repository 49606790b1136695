//! Page label ranges according to ISO 32000-1 Section 12.4.2

use crate::objects::{Dictionary, Object};

/// Numbering style of a page label range (`/S`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageNumStyle {
    /// 1, 2, 3, ...
    #[default]
    Decimal,
    /// I, II, III, ...
    UpperRoman,
    /// i, ii, iii, ...
    LowerRoman,
    /// A, B, ... Z, AA, ...
    UpperLetters,
    /// a, b, ... z, aa, ...
    LowerLetters,
}

impl PageNumStyle {
    pub fn pdf_name(self) -> &'static str {
        match self {
            PageNumStyle::Decimal => "D",
            PageNumStyle::UpperRoman => "R",
            PageNumStyle::LowerRoman => "r",
            PageNumStyle::UpperLetters => "A",
            PageNumStyle::LowerLetters => "a",
        }
    }

    /// Renders `number` the way a viewer displays it.
    pub fn format(self, number: u32) -> String {
        match self {
            PageNumStyle::Decimal => number.to_string(),
            PageNumStyle::UpperRoman => to_roman(number).to_uppercase(),
            PageNumStyle::LowerRoman => to_roman(number),
            PageNumStyle::UpperLetters => to_letters(number, true),
            PageNumStyle::LowerLetters => to_letters(number, false),
        }
    }
}

/// Labelling of the pages from one page index up to the next range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLabel {
    pub style: PageNumStyle,
    /// Number of the first page in the range.
    pub first_page: u32,
    pub prefix: Option<String>,
}

impl PageLabel {
    /// An empty prefix is treated as none.
    pub fn new(style: PageNumStyle, first_page: u32, prefix: Option<&str>) -> Self {
        Self {
            style,
            first_page,
            prefix: prefix.filter(|p| !p.is_empty()).map(str::to_string),
        }
    }

    /// Label of the page `offset` pages into the range.
    pub fn format_label(&self, offset: u32) -> String {
        let mut label = self.prefix.clone().unwrap_or_default();
        label.push_str(&self.style.format(self.first_page.saturating_add(offset)));
        label
    }

    pub fn to_dict(&self) -> Dictionary {
        let mut dict = Dictionary::typed("PageLabel");
        dict.set_name("S", self.style.pdf_name());
        if let Some(prefix) = &self.prefix {
            dict.set("P", Object::String(prefix.as_bytes().to_vec()));
        }
        if self.first_page != 1 {
            dict.set("St", self.first_page);
        }
        dict
    }
}

fn to_roman(mut num: u32) -> String {
    const NUMERALS: [(u32, &str); 13] = [
        (1000, "m"),
        (900, "cm"),
        (500, "d"),
        (400, "cd"),
        (100, "c"),
        (90, "xc"),
        (50, "l"),
        (40, "xl"),
        (10, "x"),
        (9, "ix"),
        (5, "v"),
        (4, "iv"),
        (1, "i"),
    ];

    let mut result = String::new();
    for (value, numeral) in NUMERALS {
        while num >= value {
            result.push_str(numeral);
            num -= value;
        }
    }
    result
}

/// A..Z, then doubled letters (AA, BB, ...), the PDF letter style.
fn to_letters(num: u32, uppercase: bool) -> String {
    if num == 0 {
        return String::new();
    }
    let base = if uppercase { b'A' } else { b'a' };
    let letter = (base + ((num - 1) % 26) as u8) as char;
    let repeat = ((num - 1) / 26 + 1) as usize;
    std::iter::repeat(letter).take(repeat).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_names() {
        assert_eq!(PageNumStyle::Decimal.pdf_name(), "D");
        assert_eq!(PageNumStyle::UpperRoman.pdf_name(), "R");
        assert_eq!(PageNumStyle::LowerRoman.pdf_name(), "r");
        assert_eq!(PageNumStyle::UpperLetters.pdf_name(), "A");
        assert_eq!(PageNumStyle::LowerLetters.pdf_name(), "a");
    }

    #[test]
    fn test_formatting() {
        assert_eq!(PageNumStyle::Decimal.format(42), "42");
        assert_eq!(PageNumStyle::UpperRoman.format(58), "LVIII");
        assert_eq!(PageNumStyle::LowerRoman.format(4), "iv");
        assert_eq!(PageNumStyle::UpperLetters.format(26), "Z");
        assert_eq!(PageNumStyle::UpperLetters.format(27), "AA");
        assert_eq!(PageNumStyle::LowerLetters.format(53), "aaa");
    }

    #[test]
    fn test_label_dictionary() {
        let label = PageLabel::new(PageNumStyle::LowerRoman, 1, Some(""));
        assert!(label.prefix.is_none());
        let dict = label.to_dict();
        assert_eq!(dict.get("S").and_then(Object::as_name), Some("r"));
        assert!(dict.get("St").is_none());
        assert!(dict.get("P").is_none());

        let label = PageLabel::new(PageNumStyle::Decimal, 5, Some("A-"));
        let dict = label.to_dict();
        assert_eq!(dict.get("St"), Some(&Object::Integer(5)));
        assert_eq!(dict.get("P"), Some(&Object::String(b"A-".to_vec())));
        assert_eq!(label.format_label(2), "A-7");
    }
}
