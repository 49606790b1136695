//! Shared helpers for the integration tests.
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use harupdf::Document;
use tracing_subscriber::EnvFilter;

/// Routes library logs to the test harness. `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Serializes a document into memory.
pub fn render(doc: &Document) -> Vec<u8> {
    let mut bytes = Vec::new();
    doc.write_to(&mut bytes).expect("document serializes");
    bytes
}

pub fn render_text(doc: &Document) -> String {
    String::from_utf8_lossy(&render(doc)).into_owned()
}

pub fn count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}

/// Checks that every in-use xref entry points at its `N 0 obj` header and
/// that `startxref` points at the table. Returns the in-use object numbers.
pub fn verify_xref(bytes: &[u8]) -> Vec<u32> {
    let text = String::from_utf8_lossy(bytes);
    let startxref = text.rfind("startxref\n").expect("startxref keyword");
    let offset: usize = text[startxref + 10..]
        .lines()
        .next()
        .and_then(|line| line.trim().parse().ok())
        .expect("startxref offset");
    assert!(bytes[offset..].starts_with(b"xref\n"), "startxref points at xref");

    let mut lines = text[offset..].lines().skip(1);
    let header = lines.next().expect("subsection header");
    let size: u32 = header
        .split_whitespace()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .expect("subsection size");

    let mut in_use = Vec::new();
    for number in 0..size {
        let entry = lines.next().expect("xref entry");
        assert_eq!(entry.len(), 19, "entry {number} is 20 bytes with its newline");
        if entry.ends_with('n') || entry.ends_with("n ") {
            let position: usize = entry[..10].parse().expect("entry offset");
            let expected = format!("{number} 0 obj\n");
            assert!(
                bytes[position..].starts_with(expected.as_bytes()),
                "xref entry {number} points at its object"
            );
            in_use.push(number);
        }
    }
    in_use
}

/// Decodes every Flate stream whose dictionary immediately precedes it.
#[cfg(feature = "compression")]
pub fn inflate(data: &[u8]) -> Vec<u8> {
    use std::io::Read;
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .expect("valid zlib data");
    out
}

/// Content of the first stream following `marker` in `bytes`.
pub fn stream_after<'a>(bytes: &'a [u8], marker: &[u8]) -> &'a [u8] {
    let start = find(bytes, marker).expect("marker present");
    let rest = &bytes[start..];
    let begin = find(rest, b"stream\n").expect("stream keyword") + 7;
    let end = find(rest, b"\nendstream").expect("endstream keyword");
    &rest[begin..end]
}

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Minimal JPEG header: SOI, APP0, and a frame header.
pub fn jpeg(width: u16, height: u16, components: u8) -> Vec<u8> {
    let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x04, 0x00, 0x00];
    data.extend_from_slice(&[0xFF, 0xC0, 0x00, 0x11, 0x08]);
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.push(components);
    data.extend_from_slice(&[0xFF, 0xD9]);
    data
}

#[cfg(feature = "png")]
pub fn png(image: image::DynamicImage) -> Vec<u8> {
    let mut out = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("png encodes");
    out.into_inner()
}

pub mod ttf {
    //! Synthetic TrueType files: glyph 0 is .notdef, 1 is space and
    //! 2..=27 are `A`..=`Z`, 2048 units per em.

    pub fn build(name: &str, fs_type: u16) -> Vec<u8> {
        sfnt(&tables(name, fs_type), 0)
    }

    /// A collection of two faces sharing nothing.
    pub fn collection(first: &str, second: &str) -> Vec<u8> {
        let header_len = 12 + 2 * 4;
        let first_font = sfnt(&tables(first, 0), header_len);
        let second_offset = header_len + first_font.len();
        let second_font = sfnt(&tables(second, 0), second_offset);

        let mut out = Vec::new();
        out.extend_from_slice(b"ttcf");
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&2u32.to_be_bytes());
        out.extend_from_slice(&(header_len as u32).to_be_bytes());
        out.extend_from_slice(&(second_offset as u32).to_be_bytes());
        out.extend_from_slice(&first_font);
        out.extend_from_slice(&second_font);
        out
    }

    fn tables(name: &str, fs_type: u16) -> Vec<([u8; 4], Vec<u8>)> {
        vec![
            (*b"OS/2", os2(fs_type)),
            (*b"cmap", cmap()),
            (*b"head", head()),
            (*b"hhea", hhea()),
            (*b"hmtx", hmtx()),
            (*b"maxp", maxp()),
            (*b"name", name_table(name)),
            (*b"post", vec![0u8; 32]),
        ]
    }

    fn sfnt(tables: &[([u8; 4], Vec<u8>)], base: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0u8; 6]);
        let directory_end = base + 12 + tables.len() * 16;
        let mut body = Vec::new();
        for (tag, data) in tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&((directory_end + body.len()) as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
        }
        out.extend_from_slice(&body);
        out
    }

    fn put16(table: &mut [u8], at: usize, value: u16) {
        table[at..at + 2].copy_from_slice(&value.to_be_bytes());
    }

    fn push16(out: &mut Vec<u8>, value: u16) {
        out.extend_from_slice(&value.to_be_bytes());
    }

    fn head() -> Vec<u8> {
        let mut t = vec![0u8; 54];
        put16(&mut t, 18, 2048);
        put16(&mut t, 36, (-100i16) as u16);
        put16(&mut t, 38, (-400i16) as u16);
        put16(&mut t, 40, 2000);
        put16(&mut t, 42, 1800);
        t
    }

    fn hhea() -> Vec<u8> {
        let mut t = vec![0u8; 36];
        put16(&mut t, 4, 1638);
        put16(&mut t, 6, (-410i16) as u16);
        put16(&mut t, 34, 28);
        t
    }

    fn maxp() -> Vec<u8> {
        let mut t = vec![0u8; 6];
        t[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
        put16(&mut t, 4, 28);
        t
    }

    fn hmtx() -> Vec<u8> {
        let mut t = Vec::new();
        for glyph in 0..28u16 {
            push16(&mut t, match glyph {
                0 => 1024,
                1 => 512,
                _ => 1228,
            });
            push16(&mut t, 0);
        }
        t
    }

    fn cmap() -> Vec<u8> {
        let segments: [(u16, u16, i16); 3] =
            [(0x20, 0x20, 1 - 0x20), (0x41, 0x5A, 2 - 0x41), (0xFFFF, 0xFFFF, 1)];
        let mut sub = Vec::new();
        push16(&mut sub, 4);
        push16(&mut sub, (16 + segments.len() * 8) as u16);
        push16(&mut sub, 0);
        push16(&mut sub, (segments.len() * 2) as u16);
        push16(&mut sub, 4);
        push16(&mut sub, 1);
        push16(&mut sub, 2);
        for (_, end, _) in segments {
            push16(&mut sub, end);
        }
        push16(&mut sub, 0);
        for (start, _, _) in segments {
            push16(&mut sub, start);
        }
        for (_, _, delta) in segments {
            push16(&mut sub, delta as u16);
        }
        for _ in segments {
            push16(&mut sub, 0);
        }

        let mut t = Vec::new();
        push16(&mut t, 0);
        push16(&mut t, 1);
        push16(&mut t, 3);
        push16(&mut t, 1);
        t.extend_from_slice(&12u32.to_be_bytes());
        t.extend_from_slice(&sub);
        t
    }

    fn name_table(name: &str) -> Vec<u8> {
        let utf16: Vec<u8> = name.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        let mut t = Vec::new();
        for value in [0, 1, 18, 3, 1, 0x409, 6, utf16.len() as u16, 0] {
            push16(&mut t, value);
        }
        t.extend_from_slice(&utf16);
        t
    }

    fn os2(fs_type: u16) -> Vec<u8> {
        let mut t = vec![0u8; 96];
        put16(&mut t, 0, 2);
        put16(&mut t, 4, 700);
        put16(&mut t, 8, fs_type);
        put16(&mut t, 86, 1024);
        put16(&mut t, 88, 1434);
        t
    }
}
