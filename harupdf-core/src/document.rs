use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use indexmap::IndexMap;
use tracing::debug;

use crate::annotations::Annotation;
use crate::compression::CompressionMode;
use crate::encryption::StandardSecurityHandler;
use crate::error::{PdfError, Result};
use crate::fonts::{Font, FontDef};
use crate::graphics::Image;
use crate::handles::{
    AnnotationRef, DestinationRef, DocumentId, EncoderRef, FontRef, ImageRef, OutlineRef, PageRef,
};
use crate::objects::{ObjectId, ObjectRegistry};
use crate::page::Page;
use crate::page_labels::{PageLabel, PageLabelTree, PageNumStyle};
use crate::streaming::MemoryStream;
use crate::structure::{Destination, Outline};
use crate::text::{CjkFamily, Encoder};

mod info;
mod options;
mod page_mut;
mod page_text;
mod resources;
mod security;
mod serialize;

pub use info::{InfoType, PdfDate, UtcOffset};
pub use options::{DocumentOptions, DEFAULT_CHUNK_SIZE};
pub use page_mut::PageMut;

use info::DocumentInfo;

/// Page arrangement a viewer opens the document with (`/PageLayout`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageLayout {
    SinglePage,
    OneColumn,
    TwoColumnLeft,
    TwoColumnRight,
}

impl PageLayout {
    pub fn pdf_name(self) -> &'static str {
        match self {
            PageLayout::SinglePage => "SinglePage",
            PageLayout::OneColumn => "OneColumn",
            PageLayout::TwoColumnLeft => "TwoColumnLeft",
            PageLayout::TwoColumnRight => "TwoColumnRight",
        }
    }
}

/// Panels a viewer shows on opening (`/PageMode`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageMode {
    UseNone,
    UseOutlines,
    UseThumbs,
    FullScreen,
}

impl PageMode {
    pub fn pdf_name(self) -> &'static str {
        match self {
            PageMode::UseNone => "UseNone",
            PageMode::UseOutlines => "UseOutlines",
            PageMode::UseThumbs => "UseThumbs",
            PageMode::FullScreen => "FullScreen",
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct PageSlot {
    pub page: Page,
    pub id: ObjectId,
    pub contents_id: ObjectId,
}

#[derive(Debug, Clone)]
pub(crate) struct FontSlot {
    pub font: Font,
    pub ids: Vec<ObjectId>,
}

#[derive(Debug, Clone)]
pub(crate) struct ImageSlot {
    pub image: Image,
    pub id: ObjectId,
    /// Generated soft mask for images with their own alpha channel.
    pub alpha_id: Option<ObjectId>,
}

#[derive(Debug, Clone)]
pub(crate) struct AnnotationSlot {
    pub annotation: Annotation,
    pub id: ObjectId,
}

#[derive(Debug, Clone)]
pub(crate) struct Security {
    pub handler: StandardSecurityHandler,
    pub id: ObjectId,
}

/// A PDF document under construction.
///
/// The document owns every page, font, image, destination, annotation and
/// outline item; callers hold copyable handles into it. Drawing happens
/// through [`PageMut`], obtained with [`Document::page`].
///
/// # Example
///
/// ```rust
/// use harupdf::{Document, Result};
///
/// # fn main() -> Result<()> {
/// let mut doc = Document::new();
/// let font = doc.get_font("Helvetica", None)?;
/// let page = doc.add_page()?;
///
/// let mut page = doc.page(page)?;
/// page.begin_text()?;
/// page.set_font_and_size(font, 24.0)?;
/// page.text_out(100.0, 700.0, "Hello")?;
/// page.end_text()?;
///
/// let mut bytes = Vec::new();
/// doc.write_to(&mut bytes)?;
/// assert!(bytes.starts_with(b"%PDF-1.3"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Document {
    pub(crate) doc_id: DocumentId,
    pub(crate) options: DocumentOptions,
    pub(crate) registry: ObjectRegistry,
    pub(crate) catalog_id: ObjectId,
    pub(crate) pages_id: ObjectId,
    pub(crate) info_id: ObjectId,

    pub(crate) pages: Vec<PageSlot>,
    /// Arena indices in page-tree order.
    pub(crate) page_order: Vec<usize>,
    pub(crate) current_page: Option<PageRef>,
    pub(crate) pages_per_node: usize,

    pub(crate) info: DocumentInfo,
    pub(crate) compression: CompressionMode,
    pub(crate) security: Option<Security>,
    pub(crate) page_layout: Option<PageLayout>,
    pub(crate) page_mode: Option<PageMode>,
    pub(crate) open_action: Option<DestinationRef>,
    pub(crate) page_labels: PageLabelTree,

    pub(crate) outlines: Vec<Outline>,
    pub(crate) outline_roots: Vec<OutlineRef>,
    pub(crate) outline_root_id: Option<ObjectId>,
    pub(crate) destinations: Vec<Destination>,
    pub(crate) annotations: Vec<AnnotationSlot>,

    pub(crate) encoders: Vec<Arc<Encoder>>,
    pub(crate) encoder_names: HashMap<String, EncoderRef>,
    pub(crate) current_encoder: Option<EncoderRef>,
    /// Loaded and enabled definitions by font name.
    pub(crate) font_defs: IndexMap<String, FontDef>,
    pub(crate) fonts: Vec<FontSlot>,
    pub(crate) font_cache: HashMap<(String, String), FontRef>,
    pub(crate) cjk_fonts: HashSet<CjkFamily>,
    pub(crate) cjk_encodings: HashSet<CjkFamily>,
    pub(crate) images: Vec<ImageSlot>,

    pub(crate) stream: Option<MemoryStream>,
}

impl Document {
    pub fn new() -> Self {
        Self::with_options(DocumentOptions::default())
    }

    pub fn with_options(options: DocumentOptions) -> Self {
        let mut registry = ObjectRegistry::new();
        let catalog_id = registry.allocate();
        let pages_id = registry.allocate();
        let info_id = registry.allocate();

        Self {
            doc_id: DocumentId::fresh(),
            pages_per_node: options.pages_per_node,
            compression: options.compression,
            options,
            registry,
            catalog_id,
            pages_id,
            info_id,
            pages: Vec::new(),
            page_order: Vec::new(),
            current_page: None,
            info: DocumentInfo::default(),
            security: None,
            page_layout: None,
            page_mode: None,
            open_action: None,
            page_labels: PageLabelTree::new(),
            outlines: Vec::new(),
            outline_roots: Vec::new(),
            outline_root_id: None,
            destinations: Vec::new(),
            annotations: Vec::new(),
            encoders: Vec::new(),
            encoder_names: HashMap::new(),
            current_encoder: None,
            font_defs: IndexMap::new(),
            fonts: Vec::new(),
            font_cache: HashMap::new(),
            cjk_fonts: HashSet::new(),
            cjk_encodings: HashSet::new(),
            images: Vec::new(),
            stream: None,
        }
    }

    pub fn id(&self) -> DocumentId {
        self.doc_id
    }

    pub fn options(&self) -> &DocumentOptions {
        &self.options
    }

    /// Object numbers handed out so far.
    pub fn object_count(&self) -> u32 {
        self.registry.count()
    }

    /// Kept for callers written against the status-slot interface; every
    /// operation reports its own error.
    pub fn reset_error(&mut self) {}

    // ---- pages ----

    /// Appends an A4 portrait page and makes it current.
    pub fn add_page(&mut self) -> Result<PageRef> {
        let handle = self.new_page_slot();
        self.page_order.push(handle.raw_index());
        debug!(page = self.page_order.len(), "added page");
        Ok(handle)
    }

    /// Inserts a new page before `target` and makes it current.
    pub fn insert_page(&mut self, target: PageRef) -> Result<PageRef> {
        let target = target.index_in(self.doc_id)?;
        let position = self
            .page_order
            .iter()
            .position(|&index| index == target)
            .ok_or(PdfError::InvalidPage)?;

        let handle = self.new_page_slot();
        self.page_order.insert(position, handle.raw_index());
        debug!(position, "inserted page");
        Ok(handle)
    }

    fn new_page_slot(&mut self) -> PageRef {
        let id = self.registry.allocate();
        let contents_id = self.registry.allocate();
        let handle = PageRef::new(self.doc_id, self.pages.len());
        self.pages.push(PageSlot {
            page: Page::new(),
            id,
            contents_id,
        });
        self.current_page = Some(handle);
        handle
    }

    pub fn current_page(&self) -> Option<PageRef> {
        self.current_page
    }

    pub fn page_count(&self) -> usize {
        self.page_order.len()
    }

    /// Pages in document order.
    pub fn pages(&self) -> impl Iterator<Item = PageRef> + '_ {
        self.page_order
            .iter()
            .map(move |&index| PageRef::new(self.doc_id, index))
    }

    /// Drawing access to a page.
    pub fn page(&mut self, page: PageRef) -> Result<PageMut<'_>> {
        let index = self.page_index(page)?;
        Ok(PageMut::new(self, page, index))
    }

    /// Read-only view of a page.
    pub fn get_page(&self, page: PageRef) -> Result<&Page> {
        let index = self.page_index(page)?;
        Ok(&self.pages[index].page)
    }

    pub(crate) fn page_index(&self, page: PageRef) -> Result<usize> {
        let index = page.index_in(self.doc_id)?;
        if index >= self.pages.len() {
            return Err(PdfError::InvalidPage);
        }
        Ok(index)
    }

    /// Maximum kids per `/Pages` node; only before the first page.
    ///
    /// 0 keeps the tree flat. A node needs room for at least two kids.
    pub fn set_pages_configuration(&mut self, pages_per_node: usize) -> Result<()> {
        if !self.pages.is_empty() {
            return Err(PdfError::InvalidDocumentState(
                "page tree configuration after pages were added".to_string(),
            ));
        }
        if pages_per_node == 1 {
            return Err(PdfError::InvalidParameter(
                "pages per node must be 0 or at least 2".to_string(),
            ));
        }
        self.pages_per_node = pages_per_node;
        Ok(())
    }

    // ---- catalog ----

    pub fn set_page_layout(&mut self, layout: PageLayout) {
        self.page_layout = Some(layout);
    }

    pub fn page_layout(&self) -> Option<PageLayout> {
        self.page_layout
    }

    pub fn set_page_mode(&mut self, mode: PageMode) {
        self.page_mode = Some(mode);
    }

    pub fn page_mode(&self) -> Option<PageMode> {
        self.page_mode
    }

    /// Destination shown when the document is opened.
    pub fn set_open_action(&mut self, destination: DestinationRef) -> Result<()> {
        self.destination_index(destination)?;
        self.open_action = Some(destination);
        Ok(())
    }

    /// Labels pages from `page_num` (0-based page index) onwards.
    ///
    /// `first_page` is the number shown on that page. An empty prefix means
    /// none.
    pub fn add_page_label(
        &mut self,
        page_num: usize,
        style: PageNumStyle,
        first_page: u32,
        prefix: Option<&str>,
    ) -> Result<()> {
        self.page_labels
            .add_range(page_num, PageLabel::new(style, first_page, prefix));
        Ok(())
    }

    /// Displayed label of the page at `index` in document order.
    pub fn page_label(&self, index: usize) -> Option<String> {
        self.page_labels.label(index)
    }

    // ---- metadata ----

    /// Sets a string entry; date entries take [`Document::set_info_date_attr`].
    pub fn set_info_attr(&mut self, kind: InfoType, value: &str) -> Result<()> {
        self.info.set(kind, value)
    }

    pub fn set_info_date_attr(&mut self, kind: InfoType, date: PdfDate) -> Result<()> {
        self.info.set_date(kind, date)
    }

    /// Stored value, dates in their `D:` form. Empty when unset.
    pub fn info_attr(&self, kind: InfoType) -> String {
        self.info.get(kind).unwrap_or_default().to_string()
    }

    pub(crate) fn producer() -> String {
        format!("harupdf {}", env!("CARGO_PKG_VERSION"))
    }

    // ---- compression ----

    pub fn set_compression_mode(&mut self, mode: CompressionMode) {
        self.compression = mode;
    }

    /// Raw flag form of [`Document::set_compression_mode`].
    pub fn set_compression_bits(&mut self, bits: u32) -> Result<()> {
        self.compression = CompressionMode::from_raw(bits)?;
        Ok(())
    }

    pub fn compression_mode(&self) -> CompressionMode {
        self.compression
    }

    // ---- outlines ----

    /// Adds an outline item under `parent`, or at the top level.
    ///
    /// Title bytes are interpreted in `encoder`; without one they are taken
    /// as PDFDocEncoding.
    pub fn create_outline(
        &mut self,
        parent: Option<OutlineRef>,
        title: impl AsRef<[u8]>,
        encoder: Option<EncoderRef>,
    ) -> Result<OutlineRef> {
        let parent_index = parent.map(|p| self.outline_index(p)).transpose()?;
        let encoder = encoder
            .map(|e| self.encoder_index(e).map(|i| Arc::clone(&self.encoders[i])))
            .transpose()?;

        if self.outline_root_id.is_none() {
            self.outline_root_id = Some(self.registry.allocate());
        }
        let id = self.registry.allocate();
        let handle = OutlineRef::new(self.doc_id, self.outlines.len());
        self.outlines
            .push(Outline::new(title.as_ref().to_vec(), encoder, parent, id));
        match parent_index {
            Some(index) => self.outlines[index].children.push(handle),
            None => self.outline_roots.push(handle),
        }
        Ok(handle)
    }

    pub fn outline(&self, outline: OutlineRef) -> Result<&Outline> {
        let index = self.outline_index(outline)?;
        Ok(&self.outlines[index])
    }

    pub fn outline_mut(&mut self, outline: OutlineRef) -> Result<&mut Outline> {
        let index = self.outline_index(outline)?;
        Ok(&mut self.outlines[index])
    }

    /// Target of an outline item.
    pub fn set_outline_destination(
        &mut self,
        outline: OutlineRef,
        destination: DestinationRef,
    ) -> Result<()> {
        self.destination_index(destination)?;
        let index = self.outline_index(outline)?;
        self.outlines[index].destination = Some(destination);
        Ok(())
    }

    fn outline_index(&self, outline: OutlineRef) -> Result<usize> {
        let index = outline.index_in(self.doc_id)?;
        if index >= self.outlines.len() {
            return Err(PdfError::InvalidOutline);
        }
        Ok(index)
    }

    // ---- destinations and annotations ----

    pub fn destination(&self, destination: DestinationRef) -> Result<&Destination> {
        let index = self.destination_index(destination)?;
        Ok(&self.destinations[index])
    }

    pub fn destination_mut(&mut self, destination: DestinationRef) -> Result<&mut Destination> {
        let index = self.destination_index(destination)?;
        Ok(&mut self.destinations[index])
    }

    pub(crate) fn destination_index(&self, destination: DestinationRef) -> Result<usize> {
        let index = destination.index_in(self.doc_id)?;
        if index >= self.destinations.len() {
            return Err(PdfError::InvalidDestination);
        }
        Ok(index)
    }

    pub fn annotation(&self, annotation: AnnotationRef) -> Result<&Annotation> {
        let index = self.annotation_index(annotation)?;
        Ok(&self.annotations[index].annotation)
    }

    pub fn annotation_mut(&mut self, annotation: AnnotationRef) -> Result<&mut Annotation> {
        let index = self.annotation_index(annotation)?;
        Ok(&mut self.annotations[index].annotation)
    }

    fn annotation_index(&self, annotation: AnnotationRef) -> Result<usize> {
        let index = annotation.index_in(self.doc_id)?;
        if index >= self.annotations.len() {
            return Err(PdfError::InvalidAnnotation);
        }
        Ok(index)
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_new() {
        let doc = Document::new();
        assert_eq!(doc.page_count(), 0);
        assert!(doc.current_page().is_none());
        // Catalog, page tree root and info.
        assert_eq!(doc.object_count(), 3);
        assert!(doc.page_layout().is_none());
        assert!(doc.page_mode().is_none());
    }

    #[test]
    fn test_add_and_insert_pages() {
        let mut doc = Document::new();
        let first = doc.add_page().unwrap();
        let second = doc.add_page().unwrap();
        assert_eq!(doc.current_page(), Some(second));
        assert_eq!(doc.object_count(), 7);

        let inserted = doc.insert_page(second).unwrap();
        assert_eq!(doc.current_page(), Some(inserted));
        let order: Vec<PageRef> = doc.pages().collect();
        assert_eq!(order, vec![first, inserted, second]);
    }

    #[test]
    fn test_handles_from_other_documents_are_rejected() {
        let mut other = Document::new();
        let foreign = other.add_page().unwrap();

        let mut doc = Document::new();
        doc.add_page().unwrap();
        assert!(matches!(doc.page(foreign), Err(PdfError::InvalidDocument)));
        assert!(matches!(doc.insert_page(foreign), Err(PdfError::InvalidDocument)));
    }

    #[test]
    fn test_pages_configuration() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.set_pages_configuration(1),
            Err(PdfError::InvalidParameter(_))
        ));
        doc.set_pages_configuration(4).unwrap();
        doc.add_page().unwrap();
        assert!(matches!(
            doc.set_pages_configuration(8),
            Err(PdfError::InvalidDocumentState(_))
        ));
    }

    #[test]
    fn test_info_attributes() {
        let mut doc = Document::new();
        assert_eq!(doc.info_attr(InfoType::Author), "");
        doc.set_info_attr(InfoType::Author, "Jane").unwrap();
        assert_eq!(doc.info_attr(InfoType::Author), "Jane");

        doc.set_info_date_attr(InfoType::CreationDate, PdfDate::new(2024, 5, 6, 7, 8, 9))
            .unwrap();
        assert_eq!(doc.info_attr(InfoType::CreationDate), "D:20240506070809");
        assert!(doc.set_info_attr(InfoType::ModDate, "yesterday").is_err());
    }

    #[test]
    fn test_compression_bits() {
        let mut doc = Document::new();
        doc.set_compression_bits(0x0F).unwrap();
        assert_eq!(doc.compression_mode(), CompressionMode::ALL);
        assert!(matches!(
            doc.set_compression_bits(0x10),
            Err(PdfError::InvalidCompressionMode(0x10))
        ));
        assert_eq!(doc.compression_mode(), CompressionMode::ALL);
    }

    #[test]
    fn test_outline_tree() {
        let mut doc = Document::new();
        let root = doc.create_outline(None, "Book", None).unwrap();
        let child = doc.create_outline(Some(root), "Chapter", None).unwrap();
        // Outline root plus two items.
        assert_eq!(doc.object_count(), 6);

        assert_eq!(doc.outline(root).unwrap().children(), &[child]);
        assert_eq!(doc.outline(child).unwrap().parent(), Some(root));
        doc.outline_mut(root).unwrap().set_opened(true);
        assert!(doc.outline(root).unwrap().is_opened());
    }

    #[test]
    fn test_page_labels() {
        let mut doc = Document::new();
        doc.add_page_label(0, PageNumStyle::LowerRoman, 1, None).unwrap();
        doc.add_page_label(2, PageNumStyle::Decimal, 1, Some("")).unwrap();
        assert_eq!(doc.page_label(1).as_deref(), Some("ii"));
        assert_eq!(doc.page_label(2).as_deref(), Some("1"));
    }

    #[test]
    fn test_reset_error_is_harmless() {
        let mut doc = Document::new();
        doc.reset_error();
        assert_eq!(doc.object_count(), 3);
    }
}
