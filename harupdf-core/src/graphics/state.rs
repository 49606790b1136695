//! Graphics state tracked alongside a page's content stream.
//!
//! The page mirrors every state operator it emits into a [`GState`] so it
//! can answer queries and compute text advances. `q`/`Q` push and pop a
//! copy through [`GStateStack`].

use crate::error::{PdfError, Result};
use crate::graphics::{
    CmykColor, ColorSpace, DashMode, LineCap, LineJoin, RgbColor, TextRenderingMode, TransMatrix,
};
use crate::handles::FontRef;

/// Maximum nesting of `q` on one page.
pub const GSTATE_DEPTH_LIMIT: usize = 28;

pub const DEFAULT_LINE_WIDTH: f32 = 1.0;
pub const DEFAULT_MITER_LIMIT: f32 = 10.0;
pub const DEFAULT_FLATNESS: f32 = 1.0;
pub const DEFAULT_HORIZONTAL_SCALING: f32 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub struct GState {
    pub trans_matrix: TransMatrix,
    pub line_width: f32,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub dash: DashMode,
    pub flatness: f32,

    pub char_space: f32,
    pub word_space: f32,
    pub horizontal_scaling: f32,
    pub text_leading: f32,
    pub rendering_mode: TextRenderingMode,
    pub text_rise: f32,
    pub font: Option<FontRef>,
    pub font_size: f32,

    pub fill_color_space: ColorSpace,
    pub stroke_color_space: ColorSpace,
    pub rgb_fill: RgbColor,
    pub rgb_stroke: RgbColor,
    pub cmyk_fill: CmykColor,
    pub cmyk_stroke: CmykColor,
    pub gray_fill: f32,
    pub gray_stroke: f32,
}

impl Default for GState {
    fn default() -> Self {
        Self {
            trans_matrix: TransMatrix::IDENTITY,
            line_width: DEFAULT_LINE_WIDTH,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
            dash: DashMode::solid(),
            flatness: DEFAULT_FLATNESS,
            char_space: 0.0,
            word_space: 0.0,
            horizontal_scaling: DEFAULT_HORIZONTAL_SCALING,
            text_leading: 0.0,
            rendering_mode: TextRenderingMode::Fill,
            text_rise: 0.0,
            font: None,
            font_size: 0.0,
            fill_color_space: ColorSpace::DeviceGray,
            stroke_color_space: ColorSpace::DeviceGray,
            rgb_fill: RgbColor::default(),
            rgb_stroke: RgbColor::default(),
            cmyk_fill: CmykColor::default(),
            cmyk_stroke: CmykColor::default(),
            gray_fill: 0.0,
            gray_stroke: 0.0,
        }
    }
}

/// The current state plus the states saved by `q`.
#[derive(Debug, Clone, Default)]
pub struct GStateStack {
    current: GState,
    saved: Vec<GState>,
}

impl GStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &GState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GState {
        &mut self.current
    }

    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// Fails without side effects once the depth limit is reached.
    pub fn check_push(&self) -> Result<()> {
        if self.saved.len() >= GSTATE_DEPTH_LIMIT {
            return Err(PdfError::ExceedGStateLimit);
        }
        Ok(())
    }

    pub fn push(&mut self) -> Result<()> {
        self.check_push()?;
        self.saved.push(self.current.clone());
        Ok(())
    }

    pub fn check_pop(&self) -> Result<()> {
        if self.saved.is_empty() {
            return Err(PdfError::PageCannotRestoreGState);
        }
        Ok(())
    }

    pub fn pop(&mut self) -> Result<()> {
        let previous = self.saved.pop().ok_or(PdfError::PageCannotRestoreGState)?;
        self.current = previous;
        Ok(())
    }
}
