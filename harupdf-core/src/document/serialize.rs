//! Assembles the object table of a document and writes it out.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::compression::CompressionMode;
use crate::document::{Document, PageSlot};
use crate::encryption::{encryption_dictionary, EncryptMode, ObjectEncryptor};
use crate::error::{PdfError, Result};
use crate::handles::DestinationRef;
use crate::objects::{Dictionary, Object, ObjectId, Stream};
use crate::page::Page;
use crate::streaming::MemoryStream;
use crate::structure::{outline_objects, PageTree};
use crate::writer::{PdfVersion, PdfWriter};

const PROC_SET: [&str; 5] = ["PDF", "Text", "ImageB", "ImageC", "ImageI"];

/// Everything the writer needs for one file.
struct Assembled {
    version: PdfVersion,
    objects: BTreeMap<ObjectId, Object>,
    trailer: Dictionary,
}

impl Document {
    /// Writes the document to `path`, checked against the base directory.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = self.options.resolve_path(path.as_ref())?;
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        std::fs::write(&path, &bytes).map_err(|source| PdfError::FileOpen {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }

    /// Serializes the document into any sink.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        let Assembled {
            version,
            objects,
            trailer,
        } = self.assemble()?;
        debug!(objects = objects.len(), ?version, "writing document");
        let mut writer = PdfWriter::new_with_writer(writer);
        writer.write_file(version, &objects, trailer)
    }

    /// Serializes into the memory stream, replacing previous contents.
    pub fn save_to_stream(&mut self) -> Result<()> {
        let mut bytes = Vec::new();
        self.write_to(&mut bytes)?;
        debug!(bytes = bytes.len(), "saved document to memory stream");
        self.stream = Some(MemoryStream::new(bytes));
        Ok(())
    }

    /// Saves to the memory stream, then copies it to `writer` in chunks of
    /// the configured size. Returns the number of bytes copied.
    pub fn output<W: Write>(&mut self, writer: W) -> Result<u64> {
        self.save_to_stream()?;
        let chunk_size = self.options.chunk_size;
        let stream = self.stream_mut()?;
        stream.rewind();
        stream.write_to(writer, chunk_size)
    }

    pub fn stream_size(&self) -> Result<usize> {
        self.stream
            .as_ref()
            .map(MemoryStream::size)
            .ok_or_else(no_stream)
    }

    /// Next `size` bytes of the memory stream; empty once exhausted.
    pub fn read_from_stream(&mut self, size: usize) -> Result<Vec<u8>> {
        self.stream_mut()?.read(size)
    }

    /// Rewinds the memory stream to its start.
    pub fn reset_stream(&mut self) -> Result<()> {
        self.stream_mut()?.rewind();
        Ok(())
    }

    fn stream_mut(&mut self) -> Result<&mut MemoryStream> {
        self.stream.as_mut().ok_or_else(no_stream)
    }

    fn assemble(&self) -> Result<Assembled> {
        let mut objects = BTreeMap::new();
        let mut version = PdfVersion::V1_3;

        // Intermediate page-tree nodes follow every registered object.
        let page_ids: Vec<ObjectId> = self.page_order.iter().map(|&i| self.pages[i].id).collect();
        let mut next_number = self.registry.peek();
        let tree = PageTree::build(self.pages_id, &page_ids, self.pages_per_node, || {
            let id = ObjectId::new(next_number, 0);
            next_number += 1;
            id
        });
        objects.extend(tree.node_objects());

        for (position, &index) in self.page_order.iter().enumerate() {
            let slot = &self.pages[index];
            let parent = tree.parent_of(position).unwrap_or(self.pages_id);
            objects.insert(slot.id, self.page_dict(slot, parent)?.into());
            objects.insert(slot.contents_id, self.contents_stream(&slot.page)?.into());
        }

        for slot in &self.fonts {
            objects.extend(slot.font.write_objects(&slot.ids, self.compression)?);
        }

        for slot in &self.images {
            let image = &slot.image;
            let (samples, alpha) = image.resolve_samples()?;
            let mut dict = image.base_dictionary();
            if let Some(mask) = image.mask {
                dict.set("Mask", self.images[self.image_index(mask)?].id);
            }
            if let Some(smask) = image.smask {
                dict.set("SMask", self.images[self.image_index(smask)?].id);
                version = PdfVersion::V1_4;
            } else if let (Some(alpha_id), Some(alpha)) = (slot.alpha_id, alpha) {
                let mut smask = Dictionary::typed("XObject");
                smask.set_name("Subtype", "Image");
                smask.set("Width", image.width());
                smask.set("Height", image.height());
                smask.set_name("ColorSpace", "DeviceGray");
                smask.set("BitsPerComponent", 8i64);
                objects.insert(alpha_id, self.image_stream(smask, alpha, false)?.into());
                dict.set("SMask", alpha_id);
                version = PdfVersion::V1_4;
            }
            objects.insert(slot.id, self.image_stream(dict, samples, image.is_dct())?.into());
        }

        for slot in &self.annotations {
            let dict = slot.annotation.to_dict(|dest| self.destination_array(dest))?;
            objects.insert(slot.id, dict.into());
        }

        if let Some(root_id) = self.outline_root_id {
            objects.extend(outline_objects(
                &self.outlines,
                &self.outline_roots,
                root_id,
                |dest| self.destination_array(dest),
            )?);
        }

        objects.insert(self.catalog_id, self.catalog()?.into());
        let producer = Self::producer();
        objects.insert(self.info_id, self.info.to_dict(&producer).into());

        let mut trailer = Dictionary::new();
        trailer.set("Root", self.catalog_id);
        trailer.set("Info", self.info_id);

        if let Some(security) = &self.security {
            let file_id = md5::compute(self.info.digest_input(&producer)).0.to_vec();
            let keys = security.handler.compute_keys(&file_id);
            let encryptor = ObjectEncryptor::new(&keys);
            for (id, object) in objects.iter_mut() {
                encryptor.encrypt_object(*id, object)?;
            }
            objects.insert(
                security.id,
                encryption_dictionary(&security.handler, &keys).into(),
            );
            if security.handler.mode() == EncryptMode::R3 {
                version = PdfVersion::V1_4;
            }

            trailer.set("Encrypt", security.id);
            trailer.set(
                "ID",
                Object::Array(vec![Object::hex(file_id.clone()), Object::hex(file_id)]),
            );
        }

        Ok(Assembled {
            version,
            objects,
            trailer,
        })
    }

    fn catalog(&self) -> Result<Dictionary> {
        let mut catalog = Dictionary::typed("Catalog");
        catalog.set("Pages", self.pages_id);
        if let Some(layout) = self.page_layout {
            catalog.set_name("PageLayout", layout.pdf_name());
        }
        if let Some(mode) = self.page_mode {
            catalog.set_name("PageMode", mode.pdf_name());
        }
        if let Some(root_id) = self.outline_root_id {
            catalog.set("Outlines", root_id);
        }
        if let Some(dest) = self.open_action {
            catalog.set("OpenAction", self.destination_array(dest)?);
        }
        if !self.page_labels.is_empty() {
            catalog.set("PageLabels", self.page_labels.to_dict());
        }
        Ok(catalog)
    }

    fn page_dict(&self, slot: &PageSlot, parent: ObjectId) -> Result<Dictionary> {
        let page = &slot.page;
        let mut dict = Dictionary::typed("Page");
        dict.set("Parent", parent);
        let media_box = page.media_box();
        dict.set(
            "MediaBox",
            Object::reals([media_box.left, media_box.bottom, media_box.right, media_box.top]),
        );
        dict.set("Resources", self.resources(page)?);
        dict.set("Contents", slot.contents_id);

        if page.rotate() != 0 {
            dict.set("Rotate", page.rotate());
        }
        if let Some(transition) = page.transition() {
            let (style, direction, dimension, motion) = transition.style.entries();
            let mut trans = Dictionary::typed("Trans");
            trans.set_name("S", style);
            trans.set("D", transition.transition_time);
            if let Some(direction) = direction {
                trans.set("Di", direction);
            }
            if let Some(dimension) = dimension {
                trans.set_name("Dm", dimension);
            }
            if let Some(motion) = motion {
                trans.set_name("M", motion);
            }
            dict.set("Trans", trans);
            dict.set("Dur", transition.display_time);
        }
        if let Some(zoom) = page.zoom() {
            dict.set("PZ", zoom);
        }
        if !page.annotations.is_empty() {
            let annots = page
                .annotations
                .iter()
                .map(|&handle| {
                    let index = handle.index_in(self.doc_id)?;
                    let slot = self.annotations.get(index).ok_or(PdfError::InvalidAnnotation)?;
                    Ok(Object::Reference(slot.id))
                })
                .collect::<Result<Vec<_>>>()?;
            dict.set("Annots", Object::Array(annots));
        }
        Ok(dict)
    }

    fn resources(&self, page: &Page) -> Result<Dictionary> {
        let mut resources = Dictionary::new();
        resources.set(
            "ProcSet",
            Object::Array(PROC_SET.iter().map(|name| Object::name(*name)).collect()),
        );

        if !page.fonts.is_empty() {
            let mut fonts = Dictionary::new();
            for (&font, name) in &page.fonts {
                fonts.set(name.clone(), self.fonts[self.font_index(font)?].ids[0]);
            }
            resources.set("Font", fonts);
        }
        if !page.xobjects.is_empty() {
            let mut xobjects = Dictionary::new();
            for (&image, name) in &page.xobjects {
                xobjects.set(name.clone(), self.images[self.image_index(image)?].id);
            }
            resources.set("XObject", xobjects);
        }
        Ok(resources)
    }

    fn contents_stream(&self, page: &Page) -> Result<Stream> {
        let mut stream = Stream::new(page.content().to_vec());
        if self.compression.contains(CompressionMode::TEXT) {
            stream.compress_flate()?;
        }
        Ok(stream)
    }

    fn image_stream(&self, dict: Dictionary, data: Vec<u8>, is_dct: bool) -> Result<Stream> {
        let mut stream = Stream::with_dictionary(dict, data);
        if !is_dct && self.compression.contains(CompressionMode::IMAGE) {
            stream.compress_flate()?;
        }
        Ok(stream)
    }

    /// Array form of a destination, e.g. `[3 0 R /Fit]`.
    pub(crate) fn destination_array(&self, destination: DestinationRef) -> Result<Object> {
        let destination = &self.destinations[self.destination_index(destination)?];
        let page = &self.pages[self.page_index(destination.page())?];
        Ok(destination.to_array(page.id))
    }
}

fn no_stream() -> PdfError {
    PdfError::InvalidOperation("the document has not been saved to a stream".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{InfoType, PageLayout};
    use crate::encryption::Permissions;
    use crate::graphics::ColorSpace;
    use crate::page_labels::PageNumStyle;
    use pretty_assertions::assert_eq;

    fn bytes_of(doc: &Document) -> Vec<u8> {
        let mut bytes = Vec::new();
        doc.write_to(&mut bytes).unwrap();
        bytes
    }

    fn text_of(doc: &Document) -> String {
        String::from_utf8_lossy(&bytes_of(doc)).into_owned()
    }

    #[test]
    fn test_minimal_document_layout() {
        let mut doc = Document::new();
        doc.add_page().unwrap();
        let text = text_of(&doc);

        assert!(text.starts_with("%PDF-1.3\n"));
        assert!(text.ends_with("%%EOF\n"));
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/Count 1"));
        assert!(text.contains("/MediaBox [0 0 595.276 841.89]"));
        assert!(text.contains("trailer\n<<\n/Size 6\n/Root 1 0 R\n/Info 3 0 R\n>>"));
        assert!(!text.contains("/Encrypt"));
    }

    #[test]
    fn test_output_is_deterministic() {
        let mut doc = Document::new();
        let font = doc.get_font("Times-Roman", None).unwrap();
        let page = doc.add_page().unwrap();
        {
            let mut page = doc.page(page).unwrap();
            page.begin_text().unwrap();
            page.set_font_and_size(font, 12.0).unwrap();
            page.show_text("same bytes").unwrap();
            page.end_text().unwrap();
        }
        assert_eq!(bytes_of(&doc), bytes_of(&doc));
    }

    #[test]
    fn test_page_resources_and_catalog_entries() {
        let mut doc = Document::new();
        doc.set_page_layout(PageLayout::TwoColumnLeft);
        doc.add_page_label(0, PageNumStyle::UpperRoman, 1, None).unwrap();
        let font = doc.get_font("Courier", None).unwrap();
        let image = doc
            .load_raw_from_mem(&[0u8; 3], 1, 1, ColorSpace::DeviceRgb, 8)
            .unwrap();
        let handle = doc.add_page().unwrap();
        {
            let mut page = doc.page(handle).unwrap();
            page.set_rotate(90).unwrap();
            page.begin_text().unwrap();
            page.set_font_and_size(font, 10.0).unwrap();
            page.end_text().unwrap();
            page.draw_image(image, 0.0, 0.0, 10.0, 10.0).unwrap();
            let dest = page.create_destination().unwrap();
            let rect = crate::graphics::Rect::new(0.0, 0.0, 10.0, 10.0);
            page.create_link_annotation(rect, dest).unwrap();
        }
        let text = text_of(&doc);

        assert!(text.contains("/PageLayout /TwoColumnLeft"));
        assert!(text.contains("/PageLabels"));
        assert!(text.contains("/Rotate 90"));
        assert!(text.contains("/F1 4 0 R"));
        assert!(text.contains("/X1 5 0 R"));
        assert!(text.contains("/Annots [8 0 R]"));
        assert!(text.contains("/Dest [6 0 R /Fit]"));
    }

    #[test]
    fn test_pages_per_node_builds_intermediate_nodes() {
        let mut doc = Document::new();
        doc.set_pages_configuration(2).unwrap();
        for _ in 0..5 {
            doc.add_page().unwrap();
        }
        let text = text_of(&doc);
        assert!(text.contains("/Count 5"));
        // Three leaf groups, then two nodes above them: numbered from 14.
        assert!(text.contains("14 0 obj"));
        assert!(text.contains("18 0 obj"));
        assert!(!text.contains("19 0 obj"));
        // Object numbers are not consumed by saving.
        assert_eq!(doc.object_count(), 13);
    }

    #[test]
    fn test_encrypted_document_has_id_and_version() {
        let mut doc = Document::new();
        doc.set_info_attr(InfoType::Title, "Secret").unwrap();
        doc.set_password("owner", "user").unwrap();
        doc.set_permission(Permissions::PRINT).unwrap();
        doc.set_encryption_mode(EncryptMode::R3, 16).unwrap();
        doc.add_page().unwrap();
        let text = text_of(&doc);

        assert!(text.starts_with("%PDF-1.4\n"));
        assert!(text.contains("/Encrypt 4 0 R"));
        assert!(text.contains("/ID [<"));
        assert!(text.contains("/Filter /Standard"));
        assert!(!text.contains("(Secret)"));
    }

    #[test]
    fn test_memory_stream_round_trip() {
        let mut doc = Document::new();
        doc.add_page().unwrap();
        assert!(matches!(doc.stream_size(), Err(PdfError::InvalidOperation(_))));

        doc.save_to_stream().unwrap();
        let expected = bytes_of(&doc);
        assert_eq!(doc.stream_size().unwrap(), expected.len());

        let mut collected = Vec::new();
        loop {
            let chunk = doc.read_from_stream(100).unwrap();
            if chunk.is_empty() {
                break;
            }
            collected.extend(chunk);
        }
        assert_eq!(collected, expected);

        doc.reset_stream().unwrap();
        assert_eq!(doc.read_from_stream(8).unwrap(), b"%PDF-1.3");

        let mut sink = Vec::new();
        assert_eq!(doc.output(&mut sink).unwrap(), expected.len() as u64);
        assert_eq!(sink, expected);
    }

    #[test]
    fn test_save_respects_base_dir() {
        let dir = tempfile::tempdir().unwrap();
        let options = crate::document::DocumentOptions::new().with_base_dir(dir.path());
        let mut doc = Document::with_options(options);
        doc.add_page().unwrap();

        doc.save("inside.pdf").unwrap();
        let written = std::fs::read(dir.path().join("inside.pdf")).unwrap();
        assert_eq!(written, bytes_of(&doc));

        let outside = tempfile::tempdir().unwrap();
        assert!(matches!(
            doc.save(outside.path().join("outside.pdf")),
            Err(PdfError::PathNotAllowed(_))
        ));
    }
}
