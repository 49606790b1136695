//! Document outline (bookmarks) according to ISO 32000-1 Section 12.3.3

use std::sync::Arc;

use crate::error::Result;
use crate::handles::{DestinationRef, OutlineRef};
use crate::objects::{Dictionary, Object, ObjectId};
use crate::text::Encoder;

/// Outline item (bookmark)
#[derive(Debug, Clone)]
pub struct Outline {
    title: Vec<u8>,
    /// Encoder the title bytes are written in; `None` means PDFDocEncoding.
    encoder: Option<Arc<Encoder>>,
    pub(crate) parent: Option<OutlineRef>,
    pub(crate) children: Vec<OutlineRef>,
    pub(crate) destination: Option<DestinationRef>,
    opened: bool,
    pub(crate) id: ObjectId,
}

impl Outline {
    pub(crate) fn new(
        title: Vec<u8>,
        encoder: Option<Arc<Encoder>>,
        parent: Option<OutlineRef>,
        id: ObjectId,
    ) -> Self {
        Self {
            title,
            encoder,
            parent,
            children: Vec::new(),
            destination: None,
            opened: false,
            id,
        }
    }

    pub fn title(&self) -> &[u8] {
        &self.title
    }

    pub fn parent(&self) -> Option<OutlineRef> {
        self.parent
    }

    pub fn children(&self) -> &[OutlineRef] {
        &self.children
    }

    pub fn destination(&self) -> Option<DestinationRef> {
        self.destination
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn set_opened(&mut self, opened: bool) {
        self.opened = opened;
    }

    /// Title as a PDF text string. Non-Latin titles become UTF-16BE.
    pub(crate) fn title_object(&self) -> Object {
        text_string(&self.title, self.encoder.as_deref())
    }
}

/// Encodes `bytes` as a text string: verbatim for Latin single-byte
/// encoders, UTF-16BE with a byte order mark otherwise.
pub(crate) fn text_string(bytes: &[u8], encoder: Option<&Encoder>) -> Object {
    let encoder = match encoder {
        Some(encoder) if !encoder.is_latin() => encoder,
        _ => return Object::String(bytes.to_vec()),
    };

    let mut out = vec![0xFE, 0xFF];
    for (start, len) in encoder.char_spans(bytes) {
        let code = if len == 2 {
            u16::from_be_bytes([bytes[start], bytes[start + 1]])
        } else {
            u16::from(bytes[start])
        };
        let unicode = match encoder.unicode(code) {
            0 if code != 0 => u16::from(b'?'),
            unicode => unicode,
        };
        out.extend_from_slice(&unicode.to_be_bytes());
    }
    Object::String(out)
}

/// Number of visible descendants of an item.
fn visible_count(outlines: &[Outline], item: &Outline) -> i64 {
    item.children
        .iter()
        .map(|child| {
            let child = &outlines[child.raw_index()];
            1 + if child.opened {
                visible_count(outlines, child)
            } else {
                0
            }
        })
        .sum()
}

/// Builds the `/Outlines` root at `root_id` and one dictionary per item.
///
/// `roots` lists the top-level items; `dest` resolves a destination to
/// its array form.
pub(crate) fn outline_objects(
    outlines: &[Outline],
    roots: &[OutlineRef],
    root_id: ObjectId,
    mut dest: impl FnMut(DestinationRef) -> Result<Object>,
) -> Result<Vec<(ObjectId, Object)>> {
    let mut objects = Vec::with_capacity(outlines.len() + 1);

    let mut root = Dictionary::typed("Outlines");
    link_children(&mut root, outlines, roots);
    let top_level: i64 = roots
        .iter()
        .map(|r| {
            let item = &outlines[r.raw_index()];
            1 + if item.opened {
                visible_count(outlines, item)
            } else {
                0
            }
        })
        .sum();
    root.set("Count", top_level);
    objects.push((root_id, root.into()));

    for item in outlines {
        let mut dict = Dictionary::new();
        dict.set("Title", item.title_object());

        let parent_id = item
            .parent
            .map(|p| outlines[p.raw_index()].id)
            .unwrap_or(root_id);
        dict.set("Parent", parent_id);

        let siblings = match item.parent {
            Some(p) => &outlines[p.raw_index()].children,
            None => roots,
        };
        if let Some(pos) = siblings.iter().position(|s| outlines[s.raw_index()].id == item.id) {
            if pos > 0 {
                dict.set("Prev", outlines[siblings[pos - 1].raw_index()].id);
            }
            if let Some(next) = siblings.get(pos + 1) {
                dict.set("Next", outlines[next.raw_index()].id);
            }
        }

        if !item.children.is_empty() {
            link_children(&mut dict, outlines, &item.children);
            // Count (negative if closed)
            let count = visible_count(outlines, item);
            let count = if item.opened {
                count
            } else {
                -(item.children.len() as i64)
            };
            dict.set("Count", count);
        }

        if let Some(destination) = item.destination {
            dict.set("Dest", dest(destination)?);
        }

        objects.push((item.id, dict.into()));
    }

    Ok(objects)
}

fn link_children(dict: &mut Dictionary, outlines: &[Outline], children: &[OutlineRef]) {
    if let (Some(first), Some(last)) = (children.first(), children.last()) {
        dict.set("First", outlines[first.raw_index()].id);
        dict.set("Last", outlines[last.raw_index()].id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handles::DocumentId;

    fn tree() -> (Vec<Outline>, Vec<OutlineRef>) {
        let doc = DocumentId::fresh();
        let r = |i| OutlineRef::new(doc, i);
        let id = |n| ObjectId::new(n, 0);

        let mut book = Outline::new(b"Book".to_vec(), None, None, id(10));
        let mut ch1 = Outline::new(b"Chapter 1".to_vec(), None, Some(r(0)), id(11));
        let s11 = Outline::new(b"Section 1.1".to_vec(), None, Some(r(1)), id(12));
        let s12 = Outline::new(b"Section 1.2".to_vec(), None, Some(r(1)), id(13));
        let ch2 = Outline::new(b"Chapter 2".to_vec(), None, Some(r(0)), id(14));

        book.children = vec![r(1), r(4)];
        book.set_opened(true);
        ch1.children = vec![r(2), r(3)];
        (vec![book, ch1, s11, s12, ch2], vec![r(0)])
    }

    #[test]
    fn test_outline_defaults_closed() {
        let item = Outline::new(b"Chapter".to_vec(), None, None, ObjectId::new(5, 0));
        assert!(!item.is_opened());
        assert!(item.destination().is_none());
        assert_eq!(item.title_object(), Object::String(b"Chapter".to_vec()));
    }

    #[test]
    fn test_outline_counts() {
        let (mut outlines, roots) = tree();
        assert_eq!(visible_count(&outlines, &outlines[0]), 2);
        outlines[1].set_opened(true);
        assert_eq!(visible_count(&outlines, &outlines[0]), 4);

        let objects =
            outline_objects(&outlines, &roots, ObjectId::new(9, 0), |_| Ok(Object::Null)).unwrap();
        assert_eq!(objects.len(), 6);
        let root = objects[0].1.as_dict().unwrap();
        assert_eq!(root.get("Count"), Some(&Object::Integer(5)));
        assert_eq!(root.get("First"), Some(&Object::Reference(ObjectId::new(10, 0))));
    }

    #[test]
    fn test_closed_item_has_negative_count() {
        let (outlines, roots) = tree();
        let objects =
            outline_objects(&outlines, &roots, ObjectId::new(9, 0), |_| Ok(Object::Null)).unwrap();
        let chapter = objects[2].1.as_dict().unwrap();
        assert_eq!(chapter.get("Count"), Some(&Object::Integer(-2)));
        assert_eq!(chapter.get("Next"), Some(&Object::Reference(ObjectId::new(14, 0))));
        assert!(chapter.get("Prev").is_none());

        let section = objects[4].1.as_dict().unwrap();
        assert_eq!(section.get("Prev"), Some(&Object::Reference(ObjectId::new(12, 0))));
        assert_eq!(section.get("Parent"), Some(&Object::Reference(ObjectId::new(11, 0))));
    }

    #[test]
    fn test_double_byte_title_is_utf16() {
        let encoder = Encoder::double_byte("90ms-RKSJ-H").unwrap();
        // "A" then HIRAGANA LETTER A in Shift_JIS.
        let title = text_string(&[b'A', 0x82, 0xA0], Some(&encoder));
        assert_eq!(title, Object::String(vec![0xFE, 0xFF, 0x00, 0x41, 0x30, 0x42]));

        let latin = Encoder::single_byte("WinAnsiEncoding").unwrap();
        assert_eq!(text_string(b"abc", Some(&latin)), Object::String(b"abc".to_vec()));
    }
}
