use crate::error::{PdfError, Result};

/// Colour spaces known to the engine. Only the three device spaces can be
/// used for colour setters and raw images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    DeviceGray,
    DeviceRgb,
    DeviceCmyk,
    CalGray,
    CalRgb,
    Lab,
    IccBased,
    Separation,
    DeviceN,
    Indexed,
    Pattern,
}

impl ColorSpace {
    pub fn pdf_name(self) -> &'static str {
        match self {
            ColorSpace::DeviceGray => "DeviceGray",
            ColorSpace::DeviceRgb => "DeviceRGB",
            ColorSpace::DeviceCmyk => "DeviceCMYK",
            ColorSpace::CalGray => "CalGray",
            ColorSpace::CalRgb => "CalRGB",
            ColorSpace::Lab => "Lab",
            ColorSpace::IccBased => "ICCBased",
            ColorSpace::Separation => "Separation",
            ColorSpace::DeviceN => "DeviceN",
            ColorSpace::Indexed => "Indexed",
            ColorSpace::Pattern => "Pattern",
        }
    }

    /// Components per pixel for the device spaces.
    pub fn components(self) -> Option<usize> {
        match self {
            ColorSpace::DeviceGray => Some(1),
            ColorSpace::DeviceRgb => Some(3),
            ColorSpace::DeviceCmyk => Some(4),
            _ => None,
        }
    }

    pub fn is_device(self) -> bool {
        self.components().is_some()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RgbColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl RgbColor {
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CmykColor {
    pub c: f32,
    pub m: f32,
    pub y: f32,
    pub k: f32,
}

impl CmykColor {
    pub fn new(c: f32, m: f32, y: f32, k: f32) -> Self {
        Self { c, m, y, k }
    }
}

/// A device colour value with its space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    Gray(f32),
    Rgb(RgbColor),
    Cmyk(CmykColor),
}

impl Color {
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    pub fn color_space(&self) -> ColorSpace {
        match self {
            Color::Gray(_) => ColorSpace::DeviceGray,
            Color::Rgb(_) => ColorSpace::DeviceRgb,
            Color::Cmyk(_) => ColorSpace::DeviceCmyk,
        }
    }

    /// Validates that every component lies in `0.0..=1.0`.
    pub fn validated(self) -> Result<Self> {
        let components = match self {
            Color::Gray(g) => vec![g],
            Color::Rgb(c) => vec![c.r, c.g, c.b],
            Color::Cmyk(c) => vec![c.c, c.m, c.y, c.k],
        };
        components.into_iter().try_for_each(check_unit)?;
        Ok(self)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

pub(crate) fn check_unit(value: f32) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(PdfError::PageOutOfRange(format!(
            "colour component {value} outside 0..=1"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_components() {
        assert_eq!(ColorSpace::DeviceGray.components(), Some(1));
        assert_eq!(ColorSpace::DeviceRgb.components(), Some(3));
        assert_eq!(ColorSpace::DeviceCmyk.components(), Some(4));
        assert_eq!(ColorSpace::Lab.components(), None);
        assert!(!ColorSpace::Indexed.is_device());
    }

    #[test]
    fn test_pdf_names() {
        assert_eq!(ColorSpace::DeviceRgb.pdf_name(), "DeviceRGB");
        assert_eq!(ColorSpace::IccBased.pdf_name(), "ICCBased");
    }

    #[test]
    fn test_validation() {
        assert!(Color::Gray(0.5).validated().is_ok());
        assert!(Color::Rgb(RgbColor::new(0.0, 1.0, 0.3)).validated().is_ok());
        assert!(matches!(
            Color::Rgb(RgbColor::new(1.2, 0.0, 0.0)).validated(),
            Err(PdfError::PageOutOfRange(_))
        ));
        assert!(Color::Cmyk(CmykColor::new(0.0, 0.0, 0.0, -0.1))
            .validated()
            .is_err());
    }

    #[test]
    fn test_color_space_of_value() {
        assert_eq!(Color::black().color_space(), ColorSpace::DeviceGray);
        assert_eq!(
            Color::Cmyk(CmykColor::default()).color_space(),
            ColorSpace::DeviceCmyk
        );
    }
}
