//! Fonts, encoders and images owned by a document.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::{Document, FontSlot, ImageSlot};
use crate::error::{PdfError, Result};
use crate::fonts::{CidFont, Font, FontDef, StandardFont, TrueTypeFont, Type1Font};
use crate::graphics::{load_png_bytes, load_png_header, ColorSpace, Image};
use crate::handles::{EncoderRef, FontRef, ImageRef};
use crate::text::{cjk_family_of, CjkFamily, Encoder};

impl Document {
    // ---- encoders ----

    /// Registered encoder by name, creating built-in ones on first use.
    ///
    /// Double-byte encoders need their family enabled first, for example
    /// with [`Document::use_jp_encodings`].
    pub fn get_encoder(&mut self, name: &str) -> Result<EncoderRef> {
        if let Some(&handle) = self.encoder_names.get(name) {
            return Ok(handle);
        }

        let encoder = match cjk_family_of(name) {
            Some(family) if self.cjk_encodings.contains(&family) => Encoder::double_byte(name),
            Some(_) => None,
            None => Encoder::single_byte(name),
        }
        .ok_or_else(|| PdfError::InvalidEncodingName(name.to_string()))?;

        let handle = EncoderRef::new(self.doc_id, self.encoders.len());
        self.encoders.push(Arc::new(encoder));
        self.encoder_names.insert(name.to_string(), handle);
        Ok(handle)
    }

    pub fn encoder(&self, encoder: EncoderRef) -> Result<&Encoder> {
        let index = self.encoder_index(encoder)?;
        Ok(&self.encoders[index])
    }

    pub fn current_encoder(&self) -> Option<EncoderRef> {
        self.current_encoder
    }

    pub fn set_current_encoder(&mut self, name: &str) -> Result<()> {
        let handle = self.get_encoder(name)?;
        self.current_encoder = Some(handle);
        Ok(())
    }

    pub(crate) fn encoder_index(&self, encoder: EncoderRef) -> Result<usize> {
        let index = encoder.index_in(self.doc_id)?;
        if index >= self.encoders.len() {
            return Err(PdfError::InvalidEncoder);
        }
        Ok(index)
    }

    // ---- CJK families ----

    pub fn use_jp_fonts(&mut self) -> Result<()> {
        self.use_cjk_fonts(CjkFamily::Japanese)
    }

    pub fn use_kr_fonts(&mut self) -> Result<()> {
        self.use_cjk_fonts(CjkFamily::Korean)
    }

    pub fn use_cns_fonts(&mut self) -> Result<()> {
        self.use_cjk_fonts(CjkFamily::SimplifiedChinese)
    }

    pub fn use_cnt_fonts(&mut self) -> Result<()> {
        self.use_cjk_fonts(CjkFamily::TraditionalChinese)
    }

    pub fn use_jp_encodings(&mut self) -> Result<()> {
        self.use_cjk_encodings(CjkFamily::Japanese)
    }

    pub fn use_kr_encodings(&mut self) -> Result<()> {
        self.use_cjk_encodings(CjkFamily::Korean)
    }

    pub fn use_cns_encodings(&mut self) -> Result<()> {
        self.use_cjk_encodings(CjkFamily::SimplifiedChinese)
    }

    pub fn use_cnt_encodings(&mut self) -> Result<()> {
        self.use_cjk_encodings(CjkFamily::TraditionalChinese)
    }

    fn use_cjk_fonts(&mut self, family: CjkFamily) -> Result<()> {
        if !self.cjk_fonts.insert(family) {
            return Ok(());
        }
        let fonts = CidFont::family_fonts(family);
        debug!(?family, count = fonts.len(), "enabled CID fonts");
        for font in fonts {
            self.font_defs
                .entry(font.name().to_string())
                .or_insert(FontDef::Cid(font));
        }
        Ok(())
    }

    fn use_cjk_encodings(&mut self, family: CjkFamily) -> Result<()> {
        if self.cjk_encodings.insert(family) {
            debug!(?family, "enabled CMap encoders");
        }
        Ok(())
    }

    // ---- fonts ----

    /// Registers a TrueType font and returns its PostScript name.
    pub fn load_ttf(&mut self, path: impl AsRef<Path>, embed: bool) -> Result<String> {
        let (path, data) = self.read_file(path.as_ref())?;
        let font = TrueTypeFont::parse(&data, embed)?;
        debug!(path = %path.display(), name = font.base_font(), embed, "loaded TrueType font");
        Ok(self.register_font_def(FontDef::TrueType(Arc::new(font))))
    }

    /// [`Document::load_ttf`] for a font already in memory.
    pub fn load_ttf_from_mem(&mut self, data: &[u8], embed: bool) -> Result<String> {
        let font = TrueTypeFont::parse(data, embed)?;
        Ok(self.register_font_def(FontDef::TrueType(Arc::new(font))))
    }

    /// Registers font `index` of a TrueType collection.
    pub fn load_ttc(&mut self, path: impl AsRef<Path>, index: u32, embed: bool) -> Result<String> {
        let (path, data) = self.read_file(path.as_ref())?;
        let font = TrueTypeFont::parse_collection(&data, index, embed)?;
        debug!(
            path = %path.display(),
            index,
            name = font.base_font(),
            "loaded font from collection"
        );
        Ok(self.register_font_def(FontDef::TrueType(Arc::new(font))))
    }

    /// Registers a Type 1 font from its metrics and, optionally, its
    /// program. An empty PFB path means the font is not embedded.
    pub fn load_type1(
        &mut self,
        afm_path: impl AsRef<Path>,
        pfb_path: Option<&Path>,
    ) -> Result<String> {
        let (afm_path, afm) = self.read_file(afm_path.as_ref())?;
        let afm = String::from_utf8_lossy(&afm).into_owned();
        let pfb = match pfb_path.filter(|p| !p.as_os_str().is_empty()) {
            Some(path) => Some(self.read_file(path)?.1),
            None => None,
        };
        let font = Type1Font::parse(&afm, pfb.as_deref())?;
        debug!(
            path = %afm_path.display(),
            name = font.font_name(),
            embedded = pfb.is_some(),
            "loaded Type 1 font"
        );
        Ok(self.register_font_def(FontDef::Type1(Arc::new(font))))
    }

    /// [`Document::load_type1`] for data already in memory.
    pub fn load_type1_from_mem(&mut self, afm: &str, pfb: Option<&[u8]>) -> Result<String> {
        let font = Type1Font::parse(afm, pfb.filter(|p| !p.is_empty()))?;
        Ok(self.register_font_def(FontDef::Type1(Arc::new(font))))
    }

    /// A name that is already registered keeps its first definition.
    fn register_font_def(&mut self, def: FontDef) -> String {
        let name = def.name().to_string();
        if self.font_defs.contains_key(&name) {
            warn!(name, "font already loaded, keeping the first definition");
        } else {
            self.font_defs.insert(name.clone(), def);
        }
        name
    }

    /// A font bound to an encoder.
    ///
    /// `encoding` of `None` or `""` selects the font's default encoder.
    /// Repeated calls with the same names return the same handle.
    pub fn get_font(&mut self, name: &str, encoding: Option<&str>) -> Result<FontRef> {
        let def = match self.font_defs.get(name) {
            Some(def) => def.clone(),
            None => StandardFont::from_name(name)
                .map(FontDef::Standard)
                .ok_or_else(|| PdfError::InvalidFontName(name.to_string()))?,
        };
        let encoding = encoding
            .filter(|e| !e.is_empty())
            .unwrap_or(def.default_encoding())
            .to_string();

        let key = (name.to_string(), encoding.clone());
        if let Some(&handle) = self.font_cache.get(&key) {
            return Ok(handle);
        }

        let encoder = self.get_encoder(&encoding)?;
        let encoder = Arc::clone(&self.encoders[encoder.raw_index()]);
        let font = Font::new(def, encoder)?;

        let ids = (0..font.object_count())
            .map(|_| self.registry.allocate())
            .collect();
        let handle = FontRef::new(self.doc_id, self.fonts.len());
        debug!(name, encoding = %encoding, "created font");
        self.fonts.push(FontSlot { font, ids });
        self.font_cache.insert(key, handle);
        Ok(handle)
    }

    pub fn font(&self, font: FontRef) -> Result<&Font> {
        let index = self.font_index(font)?;
        Ok(&self.fonts[index].font)
    }

    pub(crate) fn font_index(&self, font: FontRef) -> Result<usize> {
        let index = font.index_in(self.doc_id)?;
        if index >= self.fonts.len() {
            return Err(PdfError::InvalidFont);
        }
        Ok(index)
    }

    // ---- images ----

    /// Loads a PNG file. With `deferred` only the header is kept and the
    /// pixels are decoded when the document is saved.
    pub fn load_png(&mut self, path: impl AsRef<Path>, deferred: bool) -> Result<ImageRef> {
        let (path, data) = self.read_file(path.as_ref())?;
        let image = if deferred {
            Image::deferred_png(load_png_header(&data)?, path.clone())
        } else {
            Image::from_png(load_png_bytes(&data)?)
        };
        debug!(path = %path.display(), deferred, "loaded PNG");
        Ok(self.register_image(image))
    }

    pub fn load_png_from_mem(&mut self, data: &[u8]) -> Result<ImageRef> {
        let image = Image::from_png(load_png_bytes(data)?);
        Ok(self.register_image(image))
    }

    pub fn load_jpeg(&mut self, path: impl AsRef<Path>) -> Result<ImageRef> {
        let (path, data) = self.read_file(path.as_ref())?;
        let image = Image::from_jpeg(data)?;
        debug!(path = %path.display(), "loaded JPEG");
        Ok(self.register_image(image))
    }

    pub fn load_jpeg_from_mem(&mut self, data: &[u8]) -> Result<ImageRef> {
        let image = Image::from_jpeg(data.to_vec())?;
        Ok(self.register_image(image))
    }

    /// Raw 8-bit samples from a file. Only the device colour spaces are
    /// accepted, and that is checked before the file is opened.
    pub fn load_raw(
        &mut self,
        path: impl AsRef<Path>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
    ) -> Result<ImageRef> {
        check_raw_color_space(color_space)?;
        let (path, data) = self.read_file(path.as_ref())?;
        let image = Image::from_raw(data, width, height, color_space, 8)?;
        debug!(path = %path.display(), width, height, "loaded raw image");
        Ok(self.register_image(image))
    }

    pub fn load_raw_from_mem(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        color_space: ColorSpace,
        bits_per_component: u8,
    ) -> Result<ImageRef> {
        check_raw_color_space(color_space)?;
        let image = Image::from_raw(data.to_vec(), width, height, color_space, bits_per_component)?;
        Ok(self.register_image(image))
    }

    fn register_image(&mut self, image: Image) -> ImageRef {
        let id = self.registry.allocate();
        let alpha_id = image.has_alpha().then(|| self.registry.allocate());
        debug!(
            width = image.width(),
            height = image.height(),
            color_space = image.color_space().pdf_name(),
            "registered image"
        );
        let handle = ImageRef::new(self.doc_id, self.images.len());
        self.images.push(ImageSlot { image, id, alpha_id });
        handle
    }

    pub fn image(&self, image: ImageRef) -> Result<&Image> {
        let index = self.image_index(image)?;
        Ok(&self.images[index].image)
    }

    /// Mutable access, for [`Image::set_color_mask`].
    pub fn image_mut(&mut self, image: ImageRef) -> Result<&mut Image> {
        let index = self.image_index(image)?;
        Ok(&mut self.images[index].image)
    }

    /// Uses `mask`, a 1-bit gray image, as the stencil mask of `image`.
    pub fn set_mask_image(&mut self, image: ImageRef, mask: ImageRef) -> Result<()> {
        let image_index = self.image_index(image)?;
        let mask_index = self.image_index(mask)?;
        if image_index == mask_index {
            return Err(PdfError::InvalidParameter("an image cannot mask itself".to_string()));
        }

        let mask_image = &self.images[mask_index].image;
        if mask_image.color_space() != ColorSpace::DeviceGray {
            return Err(PdfError::InvalidColorSpace(
                mask_image.color_space().pdf_name().to_string(),
            ));
        }
        if mask_image.bits_per_component() != 1 {
            return Err(PdfError::InvalidBitsPerComponent(mask_image.bits_per_component()));
        }

        self.images[mask_index].image.is_image_mask = true;
        self.images[image_index].image.mask = Some(mask);
        Ok(())
    }

    /// Uses the gray image `smask` as the soft mask of `image`.
    pub fn add_smask(&mut self, image: ImageRef, smask: ImageRef) -> Result<()> {
        let image_index = self.image_index(image)?;
        let smask_index = self.image_index(smask)?;
        if image_index == smask_index {
            return Err(PdfError::InvalidParameter("an image cannot mask itself".to_string()));
        }
        let smask_image = &self.images[smask_index].image;
        if smask_image.color_space() != ColorSpace::DeviceGray {
            return Err(PdfError::InvalidColorSpace(
                smask_image.color_space().pdf_name().to_string(),
            ));
        }
        self.images[image_index].image.smask = Some(smask);
        Ok(())
    }

    pub(crate) fn image_index(&self, image: ImageRef) -> Result<usize> {
        let index = image.index_in(self.doc_id)?;
        if index >= self.images.len() {
            return Err(PdfError::InvalidImageHandle);
        }
        Ok(index)
    }

    /// Validates `path` against the base directory, then reads it.
    pub(crate) fn read_file(&self, path: &Path) -> Result<(PathBuf, Vec<u8>)> {
        let resolved = self.options.resolve_path(path)?;
        let data = std::fs::read(&resolved).map_err(|source| PdfError::FileOpen {
            path: resolved.clone(),
            source,
        })?;
        Ok((resolved, data))
    }
}

fn check_raw_color_space(color_space: ColorSpace) -> Result<()> {
    if !color_space.is_device() {
        return Err(PdfError::InvalidColorSpace(color_space.pdf_name().to_string()));
    }
    Ok(())
}
