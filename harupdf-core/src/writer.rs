use crate::error::{PdfError, Result};
use crate::objects::{Dictionary, Object, ObjectId};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

pub(crate) const LIMIT_MAX_ARRAY: usize = 8191;
pub(crate) const LIMIT_MAX_DICT_ELEMENT: usize = 4095;
pub(crate) const LIMIT_MAX_STRING_LEN: usize = 65535;
pub(crate) const LIMIT_MAX_NAME_LEN: usize = 127;
pub(crate) const LIMIT_MAX_REAL: f64 = 32767.0;

/// Header version of the produced file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum PdfVersion {
    V1_3,
    V1_4,
}

impl PdfVersion {
    fn header(self) -> &'static [u8] {
        match self {
            PdfVersion::V1_3 => b"%PDF-1.3\n",
            PdfVersion::V1_4 => b"%PDF-1.4\n",
        }
    }
}

/// Low-level serializer: header, numbered objects, xref, trailer.
///
/// The writer knows nothing about pages or fonts; it receives a complete
/// object table and checks the structural limits while writing it.
pub struct PdfWriter<W: Write> {
    writer: W,
    xref_positions: HashMap<ObjectId, u64>,
    current_position: u64,
}

impl<W: Write> PdfWriter<W> {
    pub fn new_with_writer(writer: W) -> Self {
        Self {
            writer,
            xref_positions: HashMap::new(),
            current_position: 0,
        }
    }

    /// Writes a full file. `trailer` must not carry `/Size`; it is computed.
    pub fn write_file(
        &mut self,
        version: PdfVersion,
        objects: &BTreeMap<ObjectId, Object>,
        trailer: Dictionary,
    ) -> Result<()> {
        self.write_header(version)?;

        for (id, object) in objects {
            check_references(object, objects)?;
            self.write_object(*id, object)?;
        }
        check_references(&Object::Dictionary(trailer.clone()), objects)?;

        let xref_position = self.current_position;
        self.write_xref()?;
        self.write_trailer(trailer, xref_position)?;

        self.writer.flush()?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    fn write_header(&mut self, version: PdfVersion) -> Result<()> {
        self.write_bytes(version.header())?;
        // Binary comment to ensure file is treated as binary
        self.write_bytes(&[b'%', 0xE2, 0xE3, 0xCF, 0xD3, b'\n'])?;
        Ok(())
    }

    fn write_object(&mut self, id: ObjectId, object: &Object) -> Result<()> {
        self.xref_positions.insert(id, self.current_position);

        let header = format!("{} {} obj\n", id.number(), id.generation());
        self.write_bytes(header.as_bytes())?;

        self.write_object_value(object)?;

        self.write_bytes(b"\nendobj\n")?;
        Ok(())
    }

    fn write_object_value(&mut self, object: &Object) -> Result<()> {
        match object {
            Object::Null => self.write_bytes(b"null")?,
            Object::Boolean(b) => self.write_bytes(if *b { b"true" } else { b"false" })?,
            Object::Integer(i) => self.write_bytes(i.to_string().as_bytes())?,
            Object::Real(f) => {
                let formatted = format_real(*f)?;
                self.write_bytes(formatted.as_bytes())?
            }
            Object::String(s) => {
                if s.len() > LIMIT_MAX_STRING_LEN {
                    return Err(PdfError::BinaryLengthExceeded(s.len()));
                }
                let escaped = escape_literal(s);
                self.write_bytes(&escaped)?;
            }
            Object::HexString(s) => {
                if s.len() > LIMIT_MAX_STRING_LEN {
                    return Err(PdfError::BinaryLengthExceeded(s.len()));
                }
                let hex = hex_literal(s);
                self.write_bytes(hex.as_bytes())?;
            }
            Object::Name(n) => {
                let name = escape_name(n)?;
                self.write_bytes(name.as_bytes())?;
            }
            Object::Array(arr) => {
                if arr.len() > LIMIT_MAX_ARRAY {
                    return Err(PdfError::Consistency(format!(
                        "array holds {} elements, limit is {LIMIT_MAX_ARRAY}",
                        arr.len()
                    )));
                }
                self.write_bytes(b"[")?;
                for (i, obj) in arr.iter().enumerate() {
                    if i > 0 {
                        self.write_bytes(b" ")?;
                    }
                    self.write_object_value(obj)?;
                }
                self.write_bytes(b"]")?;
            }
            Object::Dictionary(dict) => self.write_dictionary(dict)?,
            Object::Stream(stream) => {
                self.write_dictionary(stream.dictionary())?;
                self.write_bytes(b"\nstream\n")?;
                self.write_bytes(stream.data())?;
                self.write_bytes(b"\nendstream")?;
            }
            Object::Reference(id) => {
                let ref_str = format!("{} {} R", id.number(), id.generation());
                self.write_bytes(ref_str.as_bytes())?;
            }
        }
        Ok(())
    }

    fn write_dictionary(&mut self, dict: &Dictionary) -> Result<()> {
        if dict.len() > LIMIT_MAX_DICT_ELEMENT {
            return Err(PdfError::Consistency(format!(
                "dictionary holds {} entries, limit is {LIMIT_MAX_DICT_ELEMENT}",
                dict.len()
            )));
        }
        self.write_bytes(b"<<")?;
        for (key, value) in dict.iter() {
            self.write_bytes(b"\n")?;
            let name = escape_name(key)?;
            self.write_bytes(name.as_bytes())?;
            self.write_bytes(b" ")?;
            self.write_object_value(value)?;
        }
        self.write_bytes(b"\n>>")?;
        Ok(())
    }

    fn max_object_number(&self) -> u32 {
        self.xref_positions
            .keys()
            .map(|id| id.number())
            .max()
            .unwrap_or(0)
    }

    fn write_xref(&mut self) -> Result<()> {
        self.write_bytes(b"xref\n")?;

        let max_obj_num = self.max_object_number();
        let mut positions: Vec<(u32, u64)> = self
            .xref_positions
            .iter()
            .map(|(id, pos)| (id.number(), *pos))
            .collect();
        positions.sort_unstable();

        self.write_bytes(format!("0 {}\n", max_obj_num + 1).as_bytes())?;
        self.write_bytes(b"0000000000 65535 f \n")?;

        let mut entries = positions.into_iter().peekable();
        for obj_num in 1..=max_obj_num {
            match entries.peek() {
                Some((num, position)) if *num == obj_num => {
                    let entry = format!("{:010} {:05} n \n", position, 0);
                    self.write_bytes(entry.as_bytes())?;
                    entries.next();
                }
                _ => self.write_bytes(b"0000000000 00000 f \n")?,
            }
        }

        Ok(())
    }

    fn write_trailer(&mut self, trailer: Dictionary, xref_position: u64) -> Result<()> {
        let mut full = Dictionary::new();
        full.set("Size", Object::Integer((self.max_object_number() + 1) as i64));
        for (key, value) in trailer.iter() {
            full.set(key.clone(), value.clone());
        }

        self.write_bytes(b"trailer\n")?;
        self.write_dictionary(&full)?;
        self.write_bytes(b"\nstartxref\n")?;
        self.write_bytes(xref_position.to_string().as_bytes())?;
        self.write_bytes(b"\n%%EOF\n")?;

        Ok(())
    }

    fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        self.writer.write_all(data)?;
        self.current_position += data.len() as u64;
        Ok(())
    }
}

fn check_references(object: &Object, objects: &BTreeMap<ObjectId, Object>) -> Result<()> {
    match object {
        Object::Reference(id) if !objects.contains_key(id) => Err(PdfError::Consistency(
            format!("reference to object {id} which is never written"),
        )),
        Object::Array(items) => items
            .iter()
            .try_for_each(|item| check_references(item, objects)),
        Object::Dictionary(dict) => dict
            .values()
            .try_for_each(|value| check_references(value, objects)),
        Object::Stream(stream) => stream
            .dictionary()
            .values()
            .try_for_each(|value| check_references(value, objects)),
        _ => Ok(()),
    }
}

/// Formats a real with at most four decimals, trailing zeros trimmed.
///
/// Values beyond the implementation limit are clamped.
pub(crate) fn format_real(value: f64) -> Result<String> {
    if !value.is_finite() {
        return Err(PdfError::RealOutOfRange(value));
    }
    let clamped = value.clamp(-LIMIT_MAX_REAL, LIMIT_MAX_REAL);
    let formatted = format!("{clamped:.4}");
    let trimmed = formatted.trim_end_matches('0').trim_end_matches('.');
    Ok(match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    })
}

/// Content-stream flavour of [`format_real`] for values already validated.
pub(crate) fn fmt_num(value: f32) -> String {
    format_real(value as f64).unwrap_or_else(|_| "0".to_string())
}

pub(crate) fn escape_literal(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(bytes.len() + 2);
    out.push(b'(');
    for &b in bytes {
        match b {
            b'(' | b')' | b'\\' => {
                out.push(b'\\');
                out.push(b);
            }
            b'\n' => out.extend_from_slice(b"\\n"),
            b'\r' => out.extend_from_slice(b"\\r"),
            b'\t' => out.extend_from_slice(b"\\t"),
            0x08 => out.extend_from_slice(b"\\b"),
            0x0C => out.extend_from_slice(b"\\f"),
            0x00..=0x1F | 0x7F..=0xFF => {
                out.extend_from_slice(format!("\\{b:03o}").as_bytes());
            }
            _ => out.push(b),
        }
    }
    out.push(b')');
    out
}

pub(crate) fn hex_literal(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2 + 2);
    out.push('<');
    for b in bytes {
        out.push_str(&format!("{b:02X}"));
    }
    out.push('>');
    out
}

fn escape_name(name: &str) -> Result<String> {
    if name.len() > LIMIT_MAX_NAME_LEN {
        return Err(PdfError::Consistency(format!(
            "name of {} bytes exceeds the limit of {LIMIT_MAX_NAME_LEN}",
            name.len()
        )));
    }
    let mut out = String::with_capacity(name.len() + 1);
    out.push('/');
    for &b in name.as_bytes() {
        match b {
            b'#' | b'(' | b')' | b'/' | b'<' | b'>' | b'[' | b']' | b'{' | b'}' | b'%' => {
                out.push_str(&format!("#{b:02X}"))
            }
            0x21..=0x7E => out.push(b as char),
            _ => out.push_str(&format!("#{b:02X}")),
        }
    }
    Ok(out)
}
