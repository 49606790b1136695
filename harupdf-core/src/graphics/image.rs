//! Image XObjects: PNG (through the `image` crate), JPEG and raw pixels

use crate::error::{PdfError, Result};
use crate::graphics::{ColorSpace, Point};
use crate::handles::ImageRef;
use crate::objects::{Dictionary, Object};
use std::path::PathBuf;

/// Where the pixel data of an image comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    /// Uncompressed samples, row by row.
    Samples(Vec<u8>),
    /// A complete JPEG file, embedded as-is with `/DCTDecode`.
    Dct(Vec<u8>),
    /// A PNG file decoded when the document is serialized.
    DeferredPng(PathBuf),
}

/// Colour-key mask bounds; pixels inside all three ranges are transparent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorMask {
    pub rmin: u8,
    pub rmax: u8,
    pub gmin: u8,
    pub gmax: u8,
    pub bmin: u8,
    pub bmax: u8,
}

#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    bits_per_component: u8,
    color_space: ColorSpace,
    source: ImageSource,
    /// Alpha samples split out of a PNG, written as a generated soft mask.
    alpha: Option<Vec<u8>>,
    has_alpha: bool,
    color_mask: Option<ColorMask>,
    pub(crate) mask: Option<ImageRef>,
    pub(crate) smask: Option<ImageRef>,
    pub(crate) is_image_mask: bool,
}

impl Image {
    /// Raw samples in one of the device colour spaces.
    pub fn from_raw(
        data: Vec<u8>,
        width: u32,
        height: u32,
        color_space: ColorSpace,
        bits_per_component: u8,
    ) -> Result<Self> {
        let components = color_space
            .components()
            .ok_or_else(|| PdfError::InvalidColorSpace(color_space.pdf_name().to_string()))?;
        if !matches!(bits_per_component, 1 | 2 | 4 | 8) {
            return Err(PdfError::InvalidBitsPerComponent(bits_per_component));
        }
        if width == 0 || height == 0 {
            return Err(PdfError::InvalidImage(format!(
                "raw image size {width}x{height}"
            )));
        }

        let row_bits = width as usize * components * bits_per_component as usize;
        let expected = row_bits.div_ceil(8) * height as usize;
        if data.len() != expected {
            return Err(PdfError::InvalidImage(format!(
                "raw image data is {} bytes, expected {expected}",
                data.len()
            )));
        }

        Ok(Self::with_source(
            width,
            height,
            bits_per_component,
            color_space,
            ImageSource::Samples(data),
        ))
    }

    pub fn from_jpeg(data: Vec<u8>) -> Result<Self> {
        let info = jpeg_info(&data)?;
        Ok(Self::with_source(
            info.width,
            info.height,
            info.bits_per_component,
            info.color_space,
            ImageSource::Dct(data),
        ))
    }

    pub(crate) fn from_png(png: PngData) -> Self {
        let mut image = Self::with_source(
            png.width,
            png.height,
            8,
            png.color_space,
            ImageSource::Samples(png.samples),
        );
        image.has_alpha = png.alpha.is_some();
        image.alpha = png.alpha;
        image
    }

    /// Header-only PNG; the samples are read back from `path` at save time.
    pub(crate) fn deferred_png(header: PngHeader, path: PathBuf) -> Self {
        let mut image = Self::with_source(
            header.width,
            header.height,
            8,
            header.color_space,
            ImageSource::DeferredPng(path),
        );
        image.has_alpha = header.has_alpha;
        image
    }

    fn with_source(
        width: u32,
        height: u32,
        bits_per_component: u8,
        color_space: ColorSpace,
        source: ImageSource,
    ) -> Self {
        Self {
            width,
            height,
            bits_per_component,
            color_space,
            source,
            alpha: None,
            has_alpha: false,
            color_mask: None,
            mask: None,
            smask: None,
            is_image_mask: false,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn size(&self) -> Point {
        Point::new(self.width as f32, self.height as f32)
    }

    pub fn bits_per_component(&self) -> u8 {
        self.bits_per_component
    }

    pub fn color_space(&self) -> ColorSpace {
        self.color_space
    }

    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    pub fn color_mask(&self) -> Option<ColorMask> {
        self.color_mask
    }

    /// Whether a soft mask is generated from the image's own alpha channel.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    pub fn is_image_mask(&self) -> bool {
        self.is_image_mask
    }

    /// Only for 8-bit RGB images that are not themselves image masks.
    #[allow(clippy::too_many_arguments)]
    pub fn set_color_mask(
        &mut self,
        rmin: u32,
        rmax: u32,
        gmin: u32,
        gmax: u32,
        bmin: u32,
        bmax: u32,
    ) -> Result<()> {
        if self.is_image_mask {
            return Err(PdfError::InvalidOperation(
                "an image mask cannot carry a colour mask".to_string(),
            ));
        }
        if self.color_space != ColorSpace::DeviceRgb {
            return Err(PdfError::InvalidColorSpace(
                self.color_space.pdf_name().to_string(),
            ));
        }
        if self.bits_per_component != 8 {
            return Err(PdfError::InvalidBitsPerComponent(self.bits_per_component));
        }

        let range = |min: u32, max: u32| -> Result<(u8, u8)> {
            if min > max || max > 255 {
                return Err(PdfError::InvalidParameter(format!(
                    "colour mask range {min}..{max}"
                )));
            }
            Ok((min as u8, max as u8))
        };
        let (rmin, rmax) = range(rmin, rmax)?;
        let (gmin, gmax) = range(gmin, gmax)?;
        let (bmin, bmax) = range(bmin, bmax)?;

        self.color_mask = Some(ColorMask {
            rmin,
            rmax,
            gmin,
            gmax,
            bmin,
            bmax,
        });
        Ok(())
    }

    /// XObject dictionary without `/Length`, `/Mask` or `/SMask` references.
    pub(crate) fn base_dictionary(&self) -> Dictionary {
        let mut dict = Dictionary::typed("XObject");
        dict.set_name("Subtype", "Image");
        dict.set("Width", self.width);
        dict.set("Height", self.height);
        if self.is_image_mask {
            dict.set("ImageMask", true);
        } else {
            dict.set_name("ColorSpace", self.color_space.pdf_name());
        }
        dict.set("BitsPerComponent", self.bits_per_component as i64);

        if let ImageSource::Dct(_) = self.source {
            dict.set_name("Filter", "DCTDecode");
            if self.color_space == ColorSpace::DeviceCmyk {
                dict.set("Decode", Object::reals([1.0f32, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0]));
            }
        }
        if let Some(mask) = self.color_mask {
            dict.set(
                "Mask",
                Object::Array(
                    [mask.rmin, mask.rmax, mask.gmin, mask.gmax, mask.bmin, mask.bmax]
                        .iter()
                        .map(|v| Object::Integer(*v as i64))
                        .collect(),
                ),
            );
        }
        dict
    }

    /// Pixel payload plus the generated soft-mask samples, if any.
    pub(crate) fn resolve_samples(&self) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
        match &self.source {
            ImageSource::Samples(data) | ImageSource::Dct(data) => {
                Ok((data.clone(), self.alpha.clone()))
            }
            ImageSource::DeferredPng(path) => {
                let bytes = std::fs::read(path).map_err(|source| PdfError::FileOpen {
                    path: path.clone(),
                    source,
                })?;
                let png = load_png_bytes(&bytes)?;
                if png.width != self.width || png.height != self.height {
                    return Err(PdfError::InvalidPngImage(format!(
                        "{} changed since it was loaded",
                        path.display()
                    )));
                }
                Ok((png.samples, png.alpha))
            }
        }
    }

    pub(crate) fn is_dct(&self) -> bool {
        matches!(self.source, ImageSource::Dct(_))
    }
}

/// Fields read from a JPEG frame header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct JpegInfo {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub bits_per_component: u8,
}

/// Scans for the SOF segment (baseline, extended or progressive).
pub(crate) fn jpeg_info(data: &[u8]) -> Result<JpegInfo> {
    if data.len() < 4 || data[0] != 0xFF || data[1] != 0xD8 {
        return Err(PdfError::UnsupportedJpegFormat(
            "missing SOI marker".to_string(),
        ));
    }

    let mut pos = 2;
    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return Err(PdfError::UnsupportedJpegFormat(format!(
                "expected marker at offset {pos}"
            )));
        }
        let marker = data[pos + 1];
        pos += 2;

        match marker {
            // Fill bytes
            0xFF => {
                pos -= 1;
                continue;
            }
            0xD8 | 0x01 | 0xD0..=0xD7 => continue,
            0xD9 | 0xDA => break,
            0xC0..=0xC2 => {
                if pos + 8 > data.len() {
                    return Err(PdfError::UnsupportedJpegFormat(
                        "truncated frame header".to_string(),
                    ));
                }
                let precision = data[pos + 2];
                if precision != 8 {
                    return Err(PdfError::UnsupportedJpegFormat(format!(
                        "{precision}-bit sample precision"
                    )));
                }
                let height = u16::from_be_bytes([data[pos + 3], data[pos + 4]]) as u32;
                let width = u16::from_be_bytes([data[pos + 5], data[pos + 6]]) as u32;
                let color_space = match data[pos + 7] {
                    1 => ColorSpace::DeviceGray,
                    3 => ColorSpace::DeviceRgb,
                    4 => ColorSpace::DeviceCmyk,
                    n => {
                        return Err(PdfError::UnsupportedJpegFormat(format!(
                            "{n} colour components"
                        )))
                    }
                };
                if width == 0 || height == 0 {
                    return Err(PdfError::UnsupportedJpegFormat(
                        "zero image dimension".to_string(),
                    ));
                }
                return Ok(JpegInfo {
                    width,
                    height,
                    color_space,
                    bits_per_component: precision,
                });
            }
            0xC3 | 0xC5..=0xC7 | 0xC9..=0xCB | 0xCD..=0xCF => {
                return Err(PdfError::UnsupportedJpegFormat(format!(
                    "frame type {marker:#04X}"
                )))
            }
            _ => {
                if pos + 1 >= data.len() {
                    break;
                }
                let length = u16::from_be_bytes([data[pos], data[pos + 1]]) as usize;
                if length < 2 {
                    break;
                }
                pos += length;
            }
        }
    }

    Err(PdfError::UnsupportedJpegFormat(
        "no frame header found".to_string(),
    ))
}

/// Decoded PNG samples, alpha split into its own plane.
#[derive(Debug, Clone)]
pub(crate) struct PngData {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub samples: Vec<u8>,
    pub alpha: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PngHeader {
    pub width: u32,
    pub height: u32,
    pub color_space: ColorSpace,
    pub has_alpha: bool,
}

#[cfg(feature = "png")]
fn png_reader(data: &[u8]) -> image::ImageReader<std::io::Cursor<&[u8]>> {
    let mut reader = image::ImageReader::new(std::io::Cursor::new(data));
    reader.set_format(image::ImageFormat::Png);
    reader
}

#[cfg(feature = "png")]
fn png_error(err: image::ImageError) -> PdfError {
    PdfError::InvalidPngImage(err.to_string())
}

#[cfg(feature = "png")]
fn classify(color_type: image::ColorType) -> (ColorSpace, bool) {
    use image::ColorType;
    match color_type {
        ColorType::L8 | ColorType::L16 => (ColorSpace::DeviceGray, false),
        ColorType::La8 | ColorType::La16 => (ColorSpace::DeviceGray, true),
        ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => (ColorSpace::DeviceRgb, true),
        _ => (ColorSpace::DeviceRgb, false),
    }
}

/// Reads dimensions and channel layout without decoding pixels.
#[cfg(feature = "png")]
pub(crate) fn load_png_header(data: &[u8]) -> Result<PngHeader> {
    use image::ImageDecoder;

    let decoder = png_reader(data).into_decoder().map_err(png_error)?;
    let (width, height) = decoder.dimensions();
    let (color_space, has_alpha) = classify(decoder.color_type());
    Ok(PngHeader {
        width,
        height,
        color_space,
        has_alpha,
    })
}

/// Decodes a PNG to 8-bit samples; 16-bit channels are reduced.
#[cfg(feature = "png")]
pub(crate) fn load_png_bytes(data: &[u8]) -> Result<PngData> {
    use image::ImageDecoder;

    let decoder = png_reader(data).into_decoder().map_err(png_error)?;
    let (width, height) = decoder.dimensions();
    let (color_space, has_alpha) = classify(decoder.color_type());
    let decoded = image::DynamicImage::from_decoder(decoder).map_err(png_error)?;

    let (samples, alpha) = match (color_space, has_alpha) {
        (ColorSpace::DeviceGray, false) => (decoded.to_luma8().into_raw(), None),
        (ColorSpace::DeviceGray, true) => {
            let la = decoded.to_luma_alpha8();
            let (gray, alpha): (Vec<u8>, Vec<u8>) = la.pixels().map(|p| (p[0], p[1])).unzip();
            (gray, Some(alpha))
        }
        (_, true) => {
            let rgba = decoded.to_rgba8();
            let pixel_count = (width * height) as usize;
            let mut rgb = Vec::with_capacity(pixel_count * 3);
            let mut alpha = Vec::with_capacity(pixel_count);
            for p in rgba.pixels() {
                rgb.extend_from_slice(&p.0[..3]);
                alpha.push(p[3]);
            }
            (rgb, Some(alpha))
        }
        _ => (decoded.to_rgb8().into_raw(), None),
    };

    Ok(PngData {
        width,
        height,
        color_space,
        samples,
        alpha,
    })
}

#[cfg(not(feature = "png"))]
pub(crate) fn load_png_header(_data: &[u8]) -> Result<PngHeader> {
    Err(PdfError::UnsupportedFunc("PNG"))
}

#[cfg(not(feature = "png"))]
pub(crate) fn load_png_bytes(_data: &[u8]) -> Result<PngData> {
    Err(PdfError::UnsupportedFunc("PNG"))
}
