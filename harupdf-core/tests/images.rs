//! Image XObjects: JPEG pass-through, raw samples, PNG decoding and masks.

mod common;

use common::{jpeg, render, render_text, stream_after};
use harupdf::{ColorSpace, CompressionMode, Document, DocumentOptions, PdfError};
use pretty_assertions::assert_eq;

fn uncompressed() -> Document {
    let mut doc = Document::new();
    doc.set_compression_mode(CompressionMode::NONE);
    doc
}

#[test]
fn test_jpeg_is_passed_through() {
    let mut doc = Document::new();
    doc.set_compression_mode(CompressionMode::ALL);
    let data = jpeg(320, 200, 3);
    let image = doc.load_jpeg_from_mem(&data).unwrap();
    assert_eq!(doc.image(image).unwrap().width(), 320);
    assert_eq!(doc.image(image).unwrap().color_space(), ColorSpace::DeviceRgb);

    let bytes = render(&doc);
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.contains("/Filter /DCTDecode"));
    assert!(!text.contains("/FlateDecode"));
    assert_eq!(stream_after(&bytes, b"4 0 obj"), &data[..]);
}

#[test]
fn test_cmyk_jpeg_and_bad_headers() {
    let mut doc = Document::new();
    doc.load_jpeg_from_mem(&jpeg(10, 10, 4)).unwrap();
    assert!(render_text(&doc).contains("/Decode [1 0 1 0 1 0 1 0]"));

    assert!(matches!(
        doc.load_jpeg_from_mem(b"not a jpeg"),
        Err(PdfError::UnsupportedJpegFormat(_))
    ));
    assert_eq!(doc.object_count(), 4);
}

#[test]
fn test_raw_image_placement() {
    let mut doc = uncompressed();
    let samples: Vec<u8> = (0..12).collect();
    let image = doc
        .load_raw_from_mem(&samples, 2, 2, ColorSpace::DeviceRgb, 8)
        .unwrap();
    let handle = doc.add_page().unwrap();
    doc.page(handle)
        .unwrap()
        .draw_image(image, 10.0, 20.0, 100.0, 50.0)
        .unwrap();

    let bytes = render(&doc);
    assert_eq!(stream_after(&bytes, b"4 0 obj"), &samples[..]);
    let content = String::from_utf8_lossy(stream_after(&bytes, b"6 0 obj")).into_owned();
    assert_eq!(content, "q\n100 0 0 50 10 20 cm\n/X1 Do\nQ\n");
    assert!(String::from_utf8_lossy(&bytes).contains("/XObject <<\n/X1 4 0 R\n>>"));
}

#[test]
fn test_raw_images_from_files() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("gray.raw"), [0u8, 64, 128, 255]).unwrap();
    let mut doc = Document::with_options(DocumentOptions::new().with_base_dir(dir.path()));

    let image = doc.load_raw("gray.raw", 2, 2, ColorSpace::DeviceGray).unwrap();
    assert_eq!(doc.image(image).unwrap().bits_per_component(), 8);
    assert!(matches!(
        doc.load_raw("gray.raw", 3, 3, ColorSpace::DeviceGray),
        Err(PdfError::InvalidImage(_))
    ));
    assert!(matches!(
        doc.load_raw("absent.raw", 2, 2, ColorSpace::Lab),
        Err(PdfError::InvalidColorSpace(_))
    ));
}

#[test]
fn test_stencil_mask_and_color_key() {
    let mut doc = uncompressed();
    let picture = doc
        .load_raw_from_mem(&[0u8; 12], 2, 2, ColorSpace::DeviceRgb, 8)
        .unwrap();
    let stencil = doc
        .load_raw_from_mem(&[0b1000_0000, 0b0100_0000], 2, 2, ColorSpace::DeviceGray, 1)
        .unwrap();
    let keyed = doc
        .load_raw_from_mem(&[0u8; 12], 2, 2, ColorSpace::DeviceRgb, 8)
        .unwrap();

    assert!(matches!(
        doc.set_mask_image(picture, keyed),
        Err(PdfError::InvalidColorSpace(_))
    ));
    doc.set_mask_image(picture, stencil).unwrap();
    assert!(doc.image(stencil).unwrap().is_image_mask());
    doc.image_mut(keyed).unwrap().set_color_mask(0, 0, 0, 0, 0, 10).unwrap();

    let text = render_text(&doc);
    assert!(text.contains("/Mask 5 0 R"));
    assert!(text.contains("/ImageMask true"));
    assert!(text.contains("/Mask [0 0 0 0 0 10]"));
    assert!(text.starts_with("%PDF-1.3"));
}

#[test]
fn test_explicit_soft_mask_needs_pdf_1_4() {
    let mut doc = uncompressed();
    let picture = doc
        .load_raw_from_mem(&[0u8; 12], 2, 2, ColorSpace::DeviceRgb, 8)
        .unwrap();
    let alpha = doc
        .load_raw_from_mem(&[255u8; 4], 2, 2, ColorSpace::DeviceGray, 8)
        .unwrap();
    assert!(matches!(
        doc.add_smask(alpha, picture),
        Err(PdfError::InvalidColorSpace(_))
    ));
    doc.add_smask(picture, alpha).unwrap();

    let text = render_text(&doc);
    assert!(text.starts_with("%PDF-1.4"));
    assert!(text.contains("/SMask 5 0 R"));
}

#[cfg(feature = "png")]
mod png {
    use super::*;
    use common::png;
    use pretty_assertions::assert_eq;
    use image::{DynamicImage, GrayImage, Luma, Rgba, RgbaImage};

    #[test]
    fn test_png_alpha_becomes_a_soft_mask() {
        let mut doc = uncompressed();
        let rgba = RgbaImage::from_pixel(2, 1, Rgba([10, 20, 30, 77]));
        let image = doc
            .load_png_from_mem(&png(DynamicImage::ImageRgba8(rgba)))
            .unwrap();
        assert!(doc.image(image).unwrap().has_alpha());
        // The image and its generated soft mask.
        assert_eq!(doc.object_count(), 5);

        let bytes = render(&doc);
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.starts_with("%PDF-1.4"));
        assert!(text.contains("/SMask 5 0 R"));
        assert_eq!(stream_after(&bytes, b"4 0 obj"), &[10, 20, 30, 10, 20, 30]);
        assert_eq!(stream_after(&bytes, b"5 0 obj"), &[77, 77]);
    }

    #[test]
    fn test_deferred_png_is_decoded_at_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.png");
        let gray = GrayImage::from_pixel(3, 2, Luma([90]));
        std::fs::write(&path, png(DynamicImage::ImageLuma8(gray))).unwrap();

        let mut doc = uncompressed();
        let image = doc.load_png(&path, true).unwrap();
        assert_eq!(doc.image(image).unwrap().width(), 3);
        assert_eq!(doc.image(image).unwrap().color_space(), ColorSpace::DeviceGray);

        let bytes = render(&doc);
        assert_eq!(stream_after(&bytes, b"4 0 obj"), &[90u8; 6]);

        // The file disappearing only matters at save time.
        std::fs::remove_file(&path).unwrap();
        let mut sink = Vec::new();
        assert!(matches!(doc.write_to(&mut sink), Err(PdfError::FileOpen { .. })));
    }

    #[test]
    fn test_invalid_png_data() {
        let mut doc = Document::new();
        assert!(matches!(
            doc.load_png_from_mem(b"\x89PNG\r\n\x1a\nbroken"),
            Err(PdfError::InvalidPngImage(_))
        ));
        assert_eq!(doc.object_count(), 3);
    }
}
