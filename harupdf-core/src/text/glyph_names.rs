//! PostScript glyph names for the Unicode values the built-in encoders reach.
//!
//! Used to write `/Differences` arrays and to resolve `N` entries of AFM
//! files. Code points without a named glyph use the `uniXXXX` form.

use std::borrow::Cow;
use std::collections::HashMap;

const ASCII_NAMES: [&str; 95] = [
    "space", "exclam", "quotedbl", "numbersign", "dollar", "percent", "ampersand",
    "quotesingle", "parenleft", "parenright", "asterisk", "plus", "comma", "hyphen",
    "period", "slash", "zero", "one", "two", "three", "four", "five", "six", "seven",
    "eight", "nine", "colon", "semicolon", "less", "equal", "greater", "question", "at",
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q",
    "R", "S", "T", "U", "V", "W", "X", "Y", "Z", "bracketleft", "backslash",
    "bracketright", "asciicircum", "underscore", "grave", "a", "b", "c", "d", "e", "f",
    "g", "h", "i", "j", "k", "l", "m", "n", "o", "p", "q", "r", "s", "t", "u", "v", "w",
    "x", "y", "z", "braceleft", "bar", "braceright", "asciitilde",
];

// U+00A0..=U+00FF
const LATIN1_NAMES: [&str; 96] = [
    "space", "exclamdown", "cent", "sterling", "currency", "yen", "brokenbar", "section",
    "dieresis", "copyright", "ordfeminine", "guillemotleft", "logicalnot", "hyphen",
    "registered", "macron", "degree", "plusminus", "twosuperior", "threesuperior", "acute",
    "mu", "paragraph", "periodcentered", "cedilla", "onesuperior", "ordmasculine",
    "guillemotright", "onequarter", "onehalf", "threequarters", "questiondown", "Agrave",
    "Aacute", "Acircumflex", "Atilde", "Adieresis", "Aring", "AE", "Ccedilla", "Egrave",
    "Eacute", "Ecircumflex", "Edieresis", "Igrave", "Iacute", "Icircumflex", "Idieresis",
    "Eth", "Ntilde", "Ograve", "Oacute", "Ocircumflex", "Otilde", "Odieresis", "multiply",
    "Oslash", "Ugrave", "Uacute", "Ucircumflex", "Udieresis", "Yacute", "Thorn",
    "germandbls", "agrave", "aacute", "acircumflex", "atilde", "adieresis", "aring", "ae",
    "ccedilla", "egrave", "eacute", "ecircumflex", "edieresis", "igrave", "iacute",
    "icircumflex", "idieresis", "eth", "ntilde", "ograve", "oacute", "ocircumflex",
    "otilde", "odieresis", "divide", "oslash", "ugrave", "uacute", "ucircumflex",
    "udieresis", "yacute", "thorn", "ydieresis",
];

// U+0100..=U+017F
const LATIN_EXT_A_NAMES: [&str; 128] = [
    "Amacron", "amacron", "Abreve", "abreve", "Aogonek", "aogonek", "Cacute", "cacute",
    "Ccircumflex", "ccircumflex", "Cdotaccent", "cdotaccent", "Ccaron", "ccaron", "Dcaron",
    "dcaron", "Dcroat", "dcroat", "Emacron", "emacron", "Ebreve", "ebreve", "Edotaccent",
    "edotaccent", "Eogonek", "eogonek", "Ecaron", "ecaron", "Gcircumflex", "gcircumflex",
    "Gbreve", "gbreve", "Gdotaccent", "gdotaccent", "Gcommaaccent", "gcommaaccent",
    "Hcircumflex", "hcircumflex", "Hbar", "hbar", "Itilde", "itilde", "Imacron", "imacron",
    "Ibreve", "ibreve", "Iogonek", "iogonek", "Idotaccent", "dotlessi", "IJ", "ij",
    "Jcircumflex", "jcircumflex", "Kcommaaccent", "kcommaaccent", "kgreenlandic", "Lacute",
    "lacute", "Lcommaaccent", "lcommaaccent", "Lcaron", "lcaron", "Ldot", "ldot", "Lslash",
    "lslash", "Nacute", "nacute", "Ncommaaccent", "ncommaaccent", "Ncaron", "ncaron",
    "napostrophe", "Eng", "eng", "Omacron", "omacron", "Obreve", "obreve", "Ohungarumlaut",
    "ohungarumlaut", "OE", "oe", "Racute", "racute", "Rcommaaccent", "rcommaaccent",
    "Rcaron", "rcaron", "Sacute", "sacute", "Scircumflex", "scircumflex", "Scedilla",
    "scedilla", "Scaron", "scaron", "Tcommaaccent", "tcommaaccent", "Tcaron", "tcaron",
    "Tbar", "tbar", "Utilde", "utilde", "Umacron", "umacron", "Ubreve", "ubreve", "Uring",
    "uring", "Uhungarumlaut", "uhungarumlaut", "Uogonek", "uogonek", "Wcircumflex",
    "wcircumflex", "Ycircumflex", "ycircumflex", "Ydieresis", "Zacute", "zacute",
    "Zdotaccent", "zdotaccent", "Zcaron", "zcaron", "longs",
];

// U+0391..=U+03A9, U+03A2 is unassigned.
const GREEK_UPPER_NAMES: [&str; 25] = [
    "Alpha", "Beta", "Gamma", "Delta", "Epsilon", "Zeta", "Eta", "Theta", "Iota", "Kappa",
    "Lambda", "Mu", "Nu", "Xi", "Omicron", "Pi", "Rho", "", "Sigma", "Tau", "Upsilon",
    "Phi", "Chi", "Psi", "Omega",
];

// U+03B1..=U+03C9
const GREEK_LOWER_NAMES: [&str; 25] = [
    "alpha", "beta", "gamma", "delta", "epsilon", "zeta", "eta", "theta", "iota", "kappa",
    "lambda", "mu", "nu", "xi", "omicron", "pi", "rho", "sigma1", "sigma", "tau", "upsilon",
    "phi", "chi", "psi", "omega",
];

const PUNCTUATION_NAMES: &[(u16, &str)] = &[
    (0x0192, "florin"),
    (0x02C6, "circumflex"),
    (0x02C7, "caron"),
    (0x02D8, "breve"),
    (0x02D9, "dotaccent"),
    (0x02DA, "ring"),
    (0x02DB, "ogonek"),
    (0x02DC, "tilde"),
    (0x02DD, "hungarumlaut"),
    (0x2013, "endash"),
    (0x2014, "emdash"),
    (0x2018, "quoteleft"),
    (0x2019, "quoteright"),
    (0x201A, "quotesinglbase"),
    (0x201C, "quotedblleft"),
    (0x201D, "quotedblright"),
    (0x201E, "quotedblbase"),
    (0x2020, "dagger"),
    (0x2021, "daggerdbl"),
    (0x2022, "bullet"),
    (0x2026, "ellipsis"),
    (0x2030, "perthousand"),
    (0x2039, "guilsinglleft"),
    (0x203A, "guilsinglright"),
    (0x2044, "fraction"),
    (0x20AC, "Euro"),
    (0x2122, "trademark"),
    (0x2212, "minus"),
    (0xFB01, "fi"),
    (0xFB02, "fl"),
];

lazy_static::lazy_static! {
    static ref NAME_BY_UNICODE: HashMap<u16, &'static str> = {
        let mut names = HashMap::new();
        let ranges: [(u16, &[&'static str]); 5] = [
            (0x0020, &ASCII_NAMES),
            (0x00A0, &LATIN1_NAMES),
            (0x0100, &LATIN_EXT_A_NAMES),
            (0x0391, &GREEK_UPPER_NAMES),
            (0x03B1, &GREEK_LOWER_NAMES),
        ];
        for (first, table) in ranges {
            for (offset, name) in table.iter().enumerate() {
                if !name.is_empty() {
                    names.insert(first + offset as u16, *name);
                }
            }
        }
        for &(code, name) in PUNCTUATION_NAMES {
            names.insert(code, name);
        }
        names
    };

    static ref UNICODE_BY_NAME: HashMap<&'static str, u16> = {
        let mut codes = HashMap::new();
        for (&code, &name) in NAME_BY_UNICODE.iter() {
            // U+00A0 and U+00AD share names with ASCII; the ASCII code wins.
            codes
                .entry(name)
                .and_modify(|existing: &mut u16| *existing = (*existing).min(code))
                .or_insert(code);
        }
        codes
    };
}

/// Glyph name for a Unicode value.
pub fn glyph_name(unicode: u16) -> Cow<'static, str> {
    match NAME_BY_UNICODE.get(&unicode) {
        Some(name) => Cow::Borrowed(name),
        None => Cow::Owned(format!("uni{unicode:04X}")),
    }
}

/// Unicode value of a glyph name, including the `uniXXXX` form.
pub fn unicode_for_name(name: &str) -> Option<u16> {
    if let Some(code) = UNICODE_BY_NAME.get(name) {
        return Some(*code);
    }
    let hex = name.strip_prefix("uni")?;
    if hex.len() != 4 {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}
