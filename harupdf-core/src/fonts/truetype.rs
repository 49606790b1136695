//! TrueType font and collection parsing.
//!
//! Reads the tables needed to describe a font to a PDF reader: metrics
//! from `head`, `hhea`, `OS/2` and `post`, advance widths from `hmtx`,
//! the Unicode subtable of `cmap` and the PostScript name from `name`.
//! Embedding copies the whole font program; a font taken out of a
//! collection is rebuilt into a standalone sfnt first.

use std::collections::HashMap;

use crate::error::{PdfError, Result};
use crate::fonts::{FontDescriptor, FontFlags};

const SFNT_TRUETYPE: u32 = 0x0001_0000;
const SFNT_TRUE: u32 = 0x7472_7565; // 'true'
const SFNT_OPENTYPE: u32 = 0x4F54_544F; // 'OTTO'
const TTC_TAG: u32 = 0x7474_6366; // 'ttcf'

/// Tables a font must carry to be usable.
const REQUIRED_TABLES: [&[u8; 4]; 5] = [b"head", b"hhea", b"hmtx", b"maxp", b"cmap"];

/// `fsType` bit that forbids embedding.
const FS_TYPE_RESTRICTED: u16 = 0x0002;

/// Table directory entry
#[derive(Debug, Clone)]
struct TableEntry {
    tag: [u8; 4],
    checksum: u32,
    /// Offset from beginning of file
    offset: u32,
    length: u32,
}

/// Tables of one font inside a file.
struct Sfnt<'a> {
    data: &'a [u8],
    tables: HashMap<[u8; 4], TableEntry>,
}

impl<'a> Sfnt<'a> {
    /// Reads the table directory starting at `offset`.
    fn parse(data: &'a [u8], offset: usize) -> Result<Self> {
        let signature = read_u32(data, offset)?;
        if !matches!(signature, SFNT_TRUETYPE | SFNT_TRUE | SFNT_OPENTYPE) {
            return Err(PdfError::TtfInvalidFormat(format!(
                "invalid font signature 0x{signature:08X}"
            )));
        }

        let num_tables = read_u16(data, offset + 4)?;
        let mut tables = HashMap::with_capacity(num_tables as usize);
        let mut record = offset + 12;
        for _ in 0..num_tables {
            let tag_bytes = data
                .get(record..record + 4)
                .ok_or_else(|| PdfError::TtfInvalidFormat("truncated table directory".into()))?;
            let tag = [tag_bytes[0], tag_bytes[1], tag_bytes[2], tag_bytes[3]];
            let entry = TableEntry {
                tag,
                checksum: read_u32(data, record + 4)?,
                offset: read_u32(data, record + 8)?,
                length: read_u32(data, record + 12)?,
            };
            let end = entry.offset as usize + entry.length as usize;
            if end > data.len() {
                return Err(PdfError::TtfInvalidFormat(format!(
                    "table {} extends beyond file",
                    tag_name(&tag)
                )));
            }
            tables.insert(tag, entry);
            record += 16;
        }

        for tag in REQUIRED_TABLES {
            if !tables.contains_key(tag) {
                return Err(PdfError::TtfMissingTable(tag_name(tag)));
            }
        }

        Ok(Self { data, tables })
    }

    fn table(&self, tag: &[u8; 4]) -> Result<&'a [u8]> {
        self.find(tag)
            .ok_or_else(|| PdfError::TtfMissingTable(tag_name(tag)))
    }

    fn find(&self, tag: &[u8; 4]) -> Option<&'a [u8]> {
        let entry = self.tables.get(tag)?;
        let start = entry.offset as usize;
        self.data.get(start..start + entry.length as usize)
    }

    /// Standalone sfnt holding this font's tables, 4-byte aligned.
    fn assemble(&self) -> Vec<u8> {
        let mut entries: Vec<&TableEntry> = self.tables.values().collect();
        entries.sort_by_key(|entry| entry.tag);

        let num_tables = entries.len() as u16;
        let mut entry_selector = 0u16;
        while (1u32 << (entry_selector + 1)) <= u32::from(num_tables) {
            entry_selector += 1;
        }
        let search_range = (1u32 << entry_selector) * 16;
        let range_shift = (u32::from(num_tables) * 16).saturating_sub(search_range);

        let mut out = Vec::new();
        out.extend_from_slice(&SFNT_TRUETYPE.to_be_bytes());
        out.extend_from_slice(&num_tables.to_be_bytes());
        out.extend_from_slice(&clamp_u16(search_range).to_be_bytes());
        out.extend_from_slice(&entry_selector.to_be_bytes());
        out.extend_from_slice(&clamp_u16(range_shift).to_be_bytes());

        let mut offset = 12 + 16 * entries.len();
        let mut body = Vec::new();
        for entry in &entries {
            let start = entry.offset as usize;
            let bytes = &self.data[start..start + entry.length as usize];
            out.extend_from_slice(&entry.tag);
            out.extend_from_slice(&entry.checksum.to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&entry.length.to_be_bytes());

            body.extend_from_slice(bytes);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = 12 + 16 * entries.len() + body.len();
        }
        out.extend_from_slice(&body);
        out
    }
}

/// A parsed TrueType font definition.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    base_font: String,
    units_per_em: u16,
    descriptor: FontDescriptor,
    /// Advance widths by glyph index, in font units.
    advance_widths: Vec<u16>,
    /// Unicode code point to glyph index.
    cmap: HashMap<u32, u16>,
    embedding_allowed: bool,
    /// Full font program when embedding was requested.
    program: Option<Vec<u8>>,
}

impl TrueTypeFont {
    /// Parse a `.ttf` file.
    pub fn parse(data: &[u8], embed: bool) -> Result<Self> {
        if data.len() < 12 {
            return Err(PdfError::TtfInvalidFormat("font file too small".into()));
        }
        if read_u32(data, 0)? == TTC_TAG {
            return Err(PdfError::TtfInvalidFormat(
                "font collection passed where a single font was expected".into(),
            ));
        }
        let sfnt = Sfnt::parse(data, 0)?;
        Self::from_sfnt(&sfnt, embed, || data.to_vec())
    }

    /// Parse font `index` of a `.ttc` collection.
    pub fn parse_collection(data: &[u8], index: u32, embed: bool) -> Result<Self> {
        let offsets = collection_offsets(data)?;
        let count = offsets.len() as u32;
        let offset = *offsets
            .get(index as usize)
            .ok_or(PdfError::InvalidTtcIndex { index, count })?;
        let sfnt = Sfnt::parse(data, offset as usize)?;
        Self::from_sfnt(&sfnt, embed, || sfnt.assemble())
    }

    fn from_sfnt(sfnt: &Sfnt<'_>, embed: bool, program: impl FnOnce() -> Vec<u8>) -> Result<Self> {
        let head = sfnt.table(b"head")?;
        let units_per_em = read_u16(head, 18)?;
        if units_per_em == 0 {
            return Err(PdfError::TtfInvalidFormat("unitsPerEm is zero".into()));
        }
        let bbox_units = [
            read_i16(head, 36)?,
            read_i16(head, 38)?,
            read_i16(head, 40)?,
            read_i16(head, 42)?,
        ];
        let mac_style = read_u16(head, 44)?;

        let hhea = sfnt.table(b"hhea")?;
        let ascender = read_i16(hhea, 4)?;
        let descender = read_i16(hhea, 6)?;
        let num_h_metrics = read_u16(hhea, 34)?;

        let num_glyphs = read_u16(sfnt.table(b"maxp")?, 4)?;
        let advance_widths = parse_hmtx(sfnt.table(b"hmtx")?, num_h_metrics, num_glyphs)?;
        let cmap = parse_cmap(sfnt.table(b"cmap")?, num_glyphs)?;
        let base_font = match sfnt.find(b"name") {
            Some(name) => parse_postscript_name(name)?,
            None => return Err(PdfError::TtfMissingTable("name".into())),
        };

        let scale = |v: i16| -> i16 {
            let scaled = i32::from(v) * 1000 / i32::from(units_per_em);
            scaled.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
        };

        let mut italic_angle = 0.0f32;
        let mut flags = FontFlags::NONSYMBOLIC;
        if let Some(post) = sfnt.find(b"post") {
            italic_angle = read_u32(post, 4).map(|v| v as i32 as f32 / 65536.0).unwrap_or(0.0);
            if read_u32(post, 12).unwrap_or(0) != 0 {
                flags |= FontFlags::FIXED_PITCH;
            }
        }
        if italic_angle != 0.0 || mac_style & 0x0002 != 0 {
            flags |= FontFlags::ITALIC;
        }
        if mac_style & 0x0001 != 0 {
            flags |= FontFlags::FORCE_BOLD;
        }

        let mut fs_type = 0;
        let mut weight_class = 400u16;
        let mut cap_height = None;
        let mut x_height = None;
        if let Some(os2) = sfnt.find(b"OS/2") {
            weight_class = read_u16(os2, 4).unwrap_or(400);
            fs_type = read_u16(os2, 8).unwrap_or(0);
            if read_u16(os2, 0).unwrap_or(0) >= 2 {
                x_height = read_i16(os2, 86).ok();
                cap_height = read_i16(os2, 88).ok();
            }
        }

        let embedding_allowed = fs_type & FS_TYPE_RESTRICTED == 0;
        if embed && !embedding_allowed {
            return Err(PdfError::TtfCannotEmbedFont(base_font));
        }

        let stem = f32::from(weight_class) / 65.0;
        let descriptor = FontDescriptor {
            font_name: base_font.clone(),
            flags,
            font_bbox: bbox_units.map(scale),
            italic_angle,
            ascent: scale(ascender),
            descent: scale(descender),
            cap_height: scale(cap_height.unwrap_or(bbox_units[3])),
            x_height: scale(x_height.unwrap_or(ascender / 2)),
            stem_v: (stem * stem + 50.0) as i16,
            missing_width: 0,
        };

        Ok(Self {
            base_font,
            units_per_em,
            descriptor,
            advance_widths,
            cmap,
            embedding_allowed,
            program: embed.then(program),
        })
    }

    /// Get the PostScript name of the font
    pub fn base_font(&self) -> &str {
        &self.base_font
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    pub fn glyph_index(&self, unicode: u32) -> Option<u16> {
        self.cmap.get(&unicode).copied()
    }

    /// Advance of the glyph mapped to `unicode`, in 1/1000 em. Unmapped
    /// characters use the width of glyph 0.
    pub fn unicode_width(&self, unicode: u32) -> u16 {
        let glyph = self.glyph_index(unicode).unwrap_or(0);
        let units = self
            .advance_widths
            .get(glyph as usize)
            .copied()
            .unwrap_or(0);
        clamp_u16(u32::from(units) * 1000 / u32::from(self.units_per_em))
    }

    pub fn is_embedded(&self) -> bool {
        self.program.is_some()
    }

    pub fn embedding_allowed(&self) -> bool {
        self.embedding_allowed
    }

    pub fn program(&self) -> Option<&[u8]> {
        self.program.as_deref()
    }
}

/// Font offsets listed in a `ttcf` header.
fn collection_offsets(data: &[u8]) -> Result<Vec<u32>> {
    let invalid = |msg: &str| PdfError::InvalidTtcFile(msg.to_string());
    if data.len() < 12 || read_u32(data, 0).ok() != Some(TTC_TAG) {
        return Err(invalid("missing ttcf header"));
    }
    let count = read_u32(data, 8).map_err(|_| invalid("truncated header"))?;
    (0..count as usize)
        .map(|i| read_u32(data, 12 + i * 4).map_err(|_| invalid("truncated offset table")))
        .collect()
}

fn parse_hmtx(hmtx: &[u8], num_h_metrics: u16, num_glyphs: u16) -> Result<Vec<u16>> {
    if num_h_metrics == 0 {
        return Err(PdfError::TtfInvalidFormat("numberOfHMetrics is zero".into()));
    }
    let mut widths = Vec::with_capacity(num_glyphs.max(num_h_metrics) as usize);
    for glyph in 0..num_h_metrics as usize {
        widths.push(read_u16(hmtx, glyph * 4)?);
    }
    // Last advance width applies to remaining glyphs
    let last = widths[widths.len() - 1];
    widths.resize(num_glyphs.max(num_h_metrics) as usize, last);
    Ok(widths)
}

fn clamp_u16(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}

/// Picks a Unicode subtable: (3,10), (3,1), then any platform 0 table.
fn parse_cmap(cmap: &[u8], num_glyphs: u16) -> Result<HashMap<u32, u16>> {
    let num_subtables = read_u16(cmap, 2)?;
    let mut candidates = Vec::new();
    for i in 0..num_subtables as usize {
        let record = 4 + i * 8;
        let platform_id = read_u16(cmap, record)?;
        let encoding_id = read_u16(cmap, record + 2)?;
        let offset = read_u32(cmap, record + 4)? as usize;
        let rank = match (platform_id, encoding_id) {
            (3, 10) => 0,
            (3, 1) => 1,
            (0, _) => 2,
            _ => continue,
        };
        candidates.push((rank, offset));
    }
    candidates.sort_unstable();

    for (_, offset) in candidates {
        if let Ok(mappings) = parse_cmap_subtable(cmap, offset, num_glyphs) {
            if !mappings.is_empty() {
                return Ok(mappings);
            }
        }
    }
    Err(PdfError::TtfInvalidCmap)
}

fn parse_cmap_subtable(data: &[u8], offset: usize, num_glyphs: u16) -> Result<HashMap<u32, u16>> {
    let format = read_u16(data, offset)?;
    let mut mappings = HashMap::new();

    match format {
        0 => {
            // Format 0: Byte encoding table
            for code in 0..256usize {
                let glyph_id = *data
                    .get(offset + 6 + code)
                    .ok_or(PdfError::TtfInvalidCmap)?;
                if glyph_id != 0 {
                    mappings.insert(code as u32, u16::from(glyph_id));
                }
            }
        }
        4 => {
            // Format 4: Segment mapping to delta values
            let seg_count_x2 = read_u16(data, offset + 6)? as usize;
            let seg_count = seg_count_x2 / 2;

            let end_codes_offset = offset + 14;
            let start_codes_offset = end_codes_offset + seg_count_x2 + 2;
            let id_deltas_offset = start_codes_offset + seg_count_x2;
            let id_range_offsets_offset = id_deltas_offset + seg_count_x2;

            for i in 0..seg_count {
                let end_code = read_u16(data, end_codes_offset + i * 2)?;
                let start_code = read_u16(data, start_codes_offset + i * 2)?;
                let id_delta = read_i16(data, id_deltas_offset + i * 2)?;
                let id_range_offset = read_u16(data, id_range_offsets_offset + i * 2)?;

                if start_code == 0xFFFF || start_code > end_code {
                    continue;
                }

                for code in start_code..=end_code {
                    let glyph_id = if id_range_offset == 0 {
                        ((i32::from(code) + i32::from(id_delta)) & 0xFFFF) as u16
                    } else {
                        let glyph_index_offset = id_range_offsets_offset
                            + i * 2
                            + id_range_offset as usize
                            + 2 * (code - start_code) as usize;
                        match read_u16(data, glyph_index_offset) {
                            Ok(0) | Err(_) => 0,
                            Ok(glyph) => ((i32::from(glyph) + i32::from(id_delta)) & 0xFFFF) as u16,
                        }
                    };

                    if glyph_id != 0 {
                        mappings.insert(u32::from(code), glyph_id);
                    }
                    if code == 0xFFFF {
                        break;
                    }
                }
            }
        }
        6 => {
            // Format 6: Trimmed mapping table
            let first_code = u32::from(read_u16(data, offset + 6)?);
            let entry_count = read_u16(data, offset + 8)? as usize;
            for i in 0..entry_count {
                let glyph_id = read_u16(data, offset + 10 + i * 2)?;
                if glyph_id != 0 {
                    mappings.insert(first_code + i as u32, glyph_id);
                }
            }
        }
        12 => {
            // Format 12: Segmented coverage
            let num_groups = read_u32(data, offset + 12)? as usize;
            for group in 0..num_groups {
                let record = offset + 16 + group * 12;
                let start_char_code = read_u32(data, record)?;
                let end_char_code = read_u32(data, record + 4)?;
                let start_glyph_id = read_u32(data, record + 8)?;
                let glyphs = u32::from(num_glyphs);
                if end_char_code < start_char_code
                    || end_char_code > 0x10FFFF
                    || start_glyph_id >= glyphs
                {
                    continue;
                }
                // Codes past the last glyph cannot map to anything.
                let span = (end_char_code - start_char_code).min(glyphs - 1 - start_glyph_id);
                for i in 0..=span {
                    let Some(glyph_id) = start_glyph_id.checked_add(i) else {
                        break;
                    };
                    if glyph_id != 0 {
                        mappings.insert(start_char_code + i, glyph_id as u16);
                    }
                }
            }
        }
        _ => return Err(PdfError::TtfInvalidCmap),
    }

    Ok(mappings)
}

/// Name ID 6, falling back to the full name (ID 4) without spaces.
fn parse_postscript_name(name: &[u8]) -> Result<String> {
    let count = read_u16(name, 2)? as usize;
    let string_offset = read_u16(name, 4)? as usize;

    let mut full_name = None;
    for i in 0..count {
        let record = 6 + i * 12;
        let platform_id = read_u16(name, record)?;
        let encoding_id = read_u16(name, record + 2)?;
        let name_id = read_u16(name, record + 6)?;
        let length = read_u16(name, record + 8)? as usize;
        let offset = read_u16(name, record + 10)? as usize;

        if name_id != 6 && name_id != 4 {
            continue;
        }
        let start = string_offset + offset;
        let Some(bytes) = name.get(start..start + length) else {
            continue;
        };
        let value = match (platform_id, encoding_id) {
            (1, 0) => bytes.iter().map(|&b| char::from(b)).collect::<String>(),
            (0, _) | (3, 0) | (3, 1) | (3, 10) => {
                let units: Vec<u16> = bytes
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                    .collect();
                String::from_utf16_lossy(&units)
            }
            _ => continue,
        };
        let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
        if value.is_empty() {
            continue;
        }
        if name_id == 6 {
            return Ok(value);
        }
        full_name.get_or_insert(value);
    }

    full_name.ok_or_else(|| PdfError::TtfInvalidFormat("no PostScript name".into()))
}

fn tag_name(tag: &[u8; 4]) -> String {
    String::from_utf8_lossy(tag).trim_end().to_string()
}

/// Helper functions for reading binary data
fn read_u16(data: &[u8], offset: usize) -> Result<u16> {
    data.get(offset..offset + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| PdfError::TtfInvalidFormat(format!("unexpected end of data at {offset}")))
}

fn read_i16(data: &[u8], offset: usize) -> Result<i16> {
    read_u16(data, offset).map(|v| v as i16)
}

fn read_u32(data: &[u8], offset: usize) -> Result<u32> {
    data.get(offset..offset + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| PdfError::TtfInvalidFormat(format!("unexpected end of data at {offset}")))
}

#[cfg(test)]
pub(crate) mod test_font {
    //! Builds small synthetic TrueType files.

    /// Glyph 0 is .notdef, glyph 1 is space, glyphs 2..=27 are `A`..=`Z`.
    pub fn build(name: &str, fs_type: u16) -> Vec<u8> {
        let tables = tables(name, fs_type);
        sfnt(&tables)
    }

    pub fn tables(name: &str, fs_type: u16) -> Vec<([u8; 4], Vec<u8>)> {
        vec![
            (*b"OS/2", os2(fs_type)),
            (*b"cmap", cmap()),
            (*b"head", head()),
            (*b"hhea", hhea()),
            (*b"hmtx", hmtx()),
            (*b"maxp", maxp()),
            (*b"name", name_table(name)),
            (*b"post", post()),
        ]
    }

    pub fn sfnt(tables: &[([u8; 4], Vec<u8>)]) -> Vec<u8> {
        sfnt_at(tables, 0)
    }

    /// Sfnt whose table offsets are relative to a file position `base`.
    pub fn sfnt_at(tables: &[([u8; 4], Vec<u8>)], base: usize) -> Vec<u8> {
        let mut out = Vec::new();
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(tables.len() as u16).to_be_bytes());
        out.extend_from_slice(&[0u8; 6]);
        let mut offset = base + 12 + tables.len() * 16;
        let mut body = Vec::new();
        for (tag, data) in tables {
            out.extend_from_slice(tag);
            out.extend_from_slice(&0u32.to_be_bytes());
            out.extend_from_slice(&(offset as u32).to_be_bytes());
            out.extend_from_slice(&(data.len() as u32).to_be_bytes());
            body.extend_from_slice(data);
            while body.len() % 4 != 0 {
                body.push(0);
            }
            offset = base + 12 + tables.len() * 16 + body.len();
        }
        out.extend_from_slice(&body);
        out
    }

    fn be16(out: &mut Vec<u8>, v: u16) {
        out.extend_from_slice(&v.to_be_bytes());
    }

    fn head() -> Vec<u8> {
        let mut t = vec![0u8; 54];
        t[18..20].copy_from_slice(&2048u16.to_be_bytes());
        t[36..38].copy_from_slice(&(-100i16).to_be_bytes());
        t[38..40].copy_from_slice(&(-400i16).to_be_bytes());
        t[40..42].copy_from_slice(&2000i16.to_be_bytes());
        t[42..44].copy_from_slice(&1800i16.to_be_bytes());
        t
    }

    fn hhea() -> Vec<u8> {
        let mut t = vec![0u8; 36];
        t[4..6].copy_from_slice(&1638i16.to_be_bytes());
        t[6..8].copy_from_slice(&(-410i16).to_be_bytes());
        t[34..36].copy_from_slice(&28u16.to_be_bytes());
        t
    }

    fn maxp() -> Vec<u8> {
        let mut t = vec![0u8; 6];
        t[0..4].copy_from_slice(&0x0000_5000u32.to_be_bytes());
        t[4..6].copy_from_slice(&28u16.to_be_bytes());
        t
    }

    /// .notdef 1024, space 512, letters 1228.
    fn hmtx() -> Vec<u8> {
        let mut t = Vec::new();
        for glyph in 0..28u16 {
            let width = match glyph {
                0 => 1024,
                1 => 512,
                _ => 1228,
            };
            be16(&mut t, width);
            be16(&mut t, 0);
        }
        t
    }

    fn cmap() -> Vec<u8> {
        // Segments: space, A-Z, terminator.
        let segments: [(u16, u16, i16); 3] = [
            (0x20, 0x20, 1 - 0x20),
            (0x41, 0x5A, 2 - 0x41),
            (0xFFFF, 0xFFFF, 1),
        ];
        let mut sub = Vec::new();
        be16(&mut sub, 4);
        be16(&mut sub, (16 + segments.len() * 8) as u16);
        be16(&mut sub, 0);
        be16(&mut sub, (segments.len() * 2) as u16);
        be16(&mut sub, 4);
        be16(&mut sub, 1);
        be16(&mut sub, 2);
        for (_, end, _) in segments {
            be16(&mut sub, end);
        }
        be16(&mut sub, 0);
        for (start, _, _) in segments {
            be16(&mut sub, start);
        }
        for (_, _, delta) in segments {
            be16(&mut sub, delta as u16);
        }
        for _ in segments {
            be16(&mut sub, 0);
        }

        let mut t = Vec::new();
        be16(&mut t, 0);
        be16(&mut t, 1);
        be16(&mut t, 3);
        be16(&mut t, 1);
        t.extend_from_slice(&12u32.to_be_bytes());
        t.extend_from_slice(&sub);
        t
    }

    fn name_table(name: &str) -> Vec<u8> {
        let utf16: Vec<u8> = name.encode_utf16().flat_map(|u| u.to_be_bytes()).collect();
        let mut t = Vec::new();
        be16(&mut t, 0);
        be16(&mut t, 1);
        be16(&mut t, 18);
        be16(&mut t, 3);
        be16(&mut t, 1);
        be16(&mut t, 0x409);
        be16(&mut t, 6);
        be16(&mut t, utf16.len() as u16);
        be16(&mut t, 0);
        t.extend_from_slice(&utf16);
        t
    }

    fn os2(fs_type: u16) -> Vec<u8> {
        let mut t = vec![0u8; 96];
        t[0..2].copy_from_slice(&2u16.to_be_bytes());
        t[4..6].copy_from_slice(&700u16.to_be_bytes());
        t[8..10].copy_from_slice(&fs_type.to_be_bytes());
        t[86..88].copy_from_slice(&1024i16.to_be_bytes());
        t[88..90].copy_from_slice(&1434i16.to_be_bytes());
        t
    }

    fn post() -> Vec<u8> {
        vec![0u8; 32]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_helpers() {
        let data = vec![0x00, 0x10, 0xFF, 0xFE, 0x12, 0x34, 0x56, 0x78];

        assert_eq!(read_u16(&data, 0).unwrap(), 0x0010);
        assert_eq!(read_u16(&data, 2).unwrap(), 0xFFFE);
        assert_eq!(read_i16(&data, 2).unwrap(), -2);
        assert_eq!(read_u32(&data, 4).unwrap(), 0x12345678);

        assert!(read_u16(&data, 7).is_err());
        assert!(read_u32(&data, 5).is_err());
    }

    #[test]
    fn test_invalid_font_signatures() {
        assert!(matches!(
            TrueTypeFont::parse(&[0u8; 12], false),
            Err(PdfError::TtfInvalidFormat(_))
        ));
        assert!(TrueTypeFont::parse(&[0x00, 0x01], false).is_err());
    }

    #[test]
    fn test_parse_synthetic_font() {
        let data = test_font::build("Synthetic-Regular", 0);
        let font = TrueTypeFont::parse(&data, false).unwrap();

        assert_eq!(font.base_font(), "Synthetic-Regular");
        assert_eq!(font.units_per_em(), 2048);
        assert_eq!(font.glyph_index('A' as u32), Some(2));
        assert_eq!(font.glyph_index('Z' as u32), Some(27));
        assert_eq!(font.glyph_index('a' as u32), None);
        assert_eq!(font.unicode_width('A' as u32), 599);
        assert_eq!(font.unicode_width(' ' as u32), 250);
        assert_eq!(font.unicode_width('a' as u32), 500);
        assert!(!font.is_embedded());

        let desc = font.descriptor();
        assert_eq!(desc.ascent, 799);
        assert_eq!(desc.descent, -200);
        assert_eq!(desc.cap_height, 700);
        assert_eq!(desc.font_bbox, [-48, -195, 976, 878]);
    }

    #[test]
    fn test_missing_required_table() {
        let tables: Vec<_> = test_font::tables("NoHmtx", 0)
            .into_iter()
            .filter(|(tag, _)| tag != b"hmtx")
            .collect();
        let data = test_font::sfnt(&tables);
        match TrueTypeFont::parse(&data, false) {
            Err(PdfError::TtfMissingTable(tag)) => assert_eq!(tag, "hmtx"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_restricted_font_cannot_be_embedded() {
        let data = test_font::build("Restricted", FS_TYPE_RESTRICTED);
        assert!(matches!(
            TrueTypeFont::parse(&data, true),
            Err(PdfError::TtfCannotEmbedFont(_))
        ));
        let font = TrueTypeFont::parse(&data, false).unwrap();
        assert!(!font.embedding_allowed());
    }

    #[test]
    fn test_embedding_keeps_program() {
        let data = test_font::build("Embedded", 0);
        let font = TrueTypeFont::parse(&data, true).unwrap();
        assert_eq!(font.program(), Some(data.as_slice()));
    }

    /// A (3,10) format 12 cmap holding the given groups.
    fn segmented_cmap(groups: &[(u32, u32, u32)]) -> Vec<u8> {
        let mut t = Vec::new();
        t.extend_from_slice(&0u16.to_be_bytes());
        t.extend_from_slice(&1u16.to_be_bytes());
        t.extend_from_slice(&3u16.to_be_bytes());
        t.extend_from_slice(&10u16.to_be_bytes());
        t.extend_from_slice(&12u32.to_be_bytes());
        t.extend_from_slice(&12u16.to_be_bytes());
        t.extend_from_slice(&0u16.to_be_bytes());
        t.extend_from_slice(&((16 + groups.len() * 12) as u32).to_be_bytes());
        t.extend_from_slice(&0u32.to_be_bytes());
        t.extend_from_slice(&(groups.len() as u32).to_be_bytes());
        for (start, end, glyph) in groups {
            t.extend_from_slice(&start.to_be_bytes());
            t.extend_from_slice(&end.to_be_bytes());
            t.extend_from_slice(&glyph.to_be_bytes());
        }
        t
    }

    fn with_cmap(cmap: Vec<u8>) -> Vec<u8> {
        let tables: Vec<_> = test_font::tables("Segmented", 0)
            .into_iter()
            .map(|(tag, data)| {
                if &tag == b"cmap" {
                    (tag, cmap.clone())
                } else {
                    (tag, data)
                }
            })
            .collect();
        test_font::sfnt(&tables)
    }

    #[test]
    fn test_segmented_cmap_out_of_range_glyphs() {
        let data = with_cmap(segmented_cmap(&[(0x41, 0x42, 0xFFFF_FFFF)]));
        assert!(matches!(
            TrueTypeFont::parse(&data, false),
            Err(PdfError::TtfInvalidCmap)
        ));

        // A range far wider than the glyph count stops at the last glyph.
        let data = with_cmap(segmented_cmap(&[
            (0xFFFF_FFF0, 0x20, 1),
            (0x41, 0x10_FFFF, 2),
        ]));
        let font = TrueTypeFont::parse(&data, false).unwrap();
        assert_eq!(font.glyph_index('A' as u32), Some(2));
        assert_eq!(font.glyph_index('Z' as u32), Some(27));
        assert_eq!(font.glyph_index('Z' as u32 + 1), None);
        assert_eq!(font.glyph_index(' ' as u32), None);
    }

    #[test]
    fn test_widths_saturate() {
        let tables: Vec<_> = test_font::tables("Tiny", 0)
            .into_iter()
            .map(|(tag, mut data)| {
                if &tag == b"head" {
                    data[18..20].copy_from_slice(&16u16.to_be_bytes());
                }
                (tag, data)
            })
            .collect();
        let font = TrueTypeFont::parse(&test_font::sfnt(&tables), false).unwrap();
        // 1228 units at 16 upem is 76750 thousandths.
        assert_eq!(font.unicode_width('A' as u32), u16::MAX);
        assert_eq!(font.unicode_width(' ' as u32), 32000);
        assert_eq!(font.descriptor().font_bbox[2], i16::MAX);
    }

    #[test]
    fn test_extracted_font_with_many_tables() {
        let mut tables = test_font::tables("Crowded", 0);
        for n in 0..4100u32 {
            tables.push((n.to_be_bytes(), vec![0u8; 4]));
        }
        let base = 12 + 4;
        let mut data = Vec::new();
        data.extend_from_slice(&TTC_TAG.to_be_bytes());
        data.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        data.extend_from_slice(&1u32.to_be_bytes());
        data.extend_from_slice(&(base as u32).to_be_bytes());
        data.extend(test_font::sfnt_at(&tables, base));

        let font = TrueTypeFont::parse_collection(&data, 0, true).unwrap();
        let program = font.program().unwrap();
        assert_eq!(read_u16(program, 4).unwrap(), 4108);
        assert_eq!(read_u16(program, 6).unwrap(), u16::MAX);
        assert_eq!(read_u16(program, 8).unwrap(), 12);
        assert_eq!(read_u16(program, 10).unwrap(), 192);
        assert_eq!(
            TrueTypeFont::parse(program, false).unwrap().base_font(),
            "Crowded"
        );
    }

    fn collection(names: &[&str]) -> Vec<u8> {
        let header_len = 12 + names.len() * 4;
        let mut fonts = Vec::new();
        let mut offsets = Vec::new();
        for name in names {
            let base = header_len + fonts.len();
            offsets.push(base as u32);
            fonts.extend(test_font::sfnt_at(&test_font::tables(name, 0), base));
        }
        let mut out = Vec::new();
        out.extend_from_slice(&TTC_TAG.to_be_bytes());
        out.extend_from_slice(&0x0001_0000u32.to_be_bytes());
        out.extend_from_slice(&(names.len() as u32).to_be_bytes());
        for offset in offsets {
            out.extend_from_slice(&offset.to_be_bytes());
        }
        out.extend(fonts);
        out
    }

    #[test]
    fn test_collection_index() {
        let data = collection(&["First", "Second"]);
        let second = TrueTypeFont::parse_collection(&data, 1, true).unwrap();
        assert_eq!(second.base_font(), "Second");

        let program = second.program().unwrap();
        let standalone = TrueTypeFont::parse(program, false).unwrap();
        assert_eq!(standalone.base_font(), "Second");
        assert_eq!(standalone.unicode_width('A' as u32), 599);

        assert!(matches!(
            TrueTypeFont::parse_collection(&data, 2, false),
            Err(PdfError::InvalidTtcIndex { index: 2, count: 2 })
        ));
        assert!(matches!(
            TrueTypeFont::parse_collection(&test_font::build("Single", 0), 0, false),
            Err(PdfError::InvalidTtcFile(_))
        ));
    }
}
