use crate::error::{PdfError, Result};
use crate::graphics::{
    CmykColor, ColorSpace, DashMode, GState, GStateStack, GraphicsMode, LineCap, LineJoin, Point,
    Rect, RgbColor, TextRenderingMode, TransMatrix,
};
use crate::handles::{AnnotationRef, FontRef, ImageRef};
use indexmap::IndexMap;

pub(crate) const MIN_PAGE_SIZE: f32 = 3.0;
pub(crate) const MAX_PAGE_SIZE: f32 = 14400.0;
pub(crate) const MIN_ZOOM: f32 = 0.08;
pub(crate) const MAX_ZOOM: f32 = 32.0;

/// Standard paper sizes for [`Page::set_size`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageSize {
    Letter,
    Legal,
    A3,
    A4,
    A5,
    B4,
    B5,
    Executive,
    Us4x6,
    Us4x8,
    Us5x7,
    Comm10,
}

impl PageSize {
    pub const ALL: [PageSize; 12] = [
        PageSize::Letter,
        PageSize::Legal,
        PageSize::A3,
        PageSize::A4,
        PageSize::A5,
        PageSize::B4,
        PageSize::B5,
        PageSize::Executive,
        PageSize::Us4x6,
        PageSize::Us4x8,
        PageSize::Us5x7,
        PageSize::Comm10,
    ];

    /// Portrait width and height in points.
    pub fn dimensions(self) -> (f32, f32) {
        match self {
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::A3 => (841.89, 1190.551),
            PageSize::A4 => (595.276, 841.89),
            PageSize::A5 => (419.528, 595.276),
            PageSize::B4 => (708.661, 1000.63),
            PageSize::B5 => (498.898, 708.661),
            PageSize::Executive => (522.0, 756.0),
            PageSize::Us4x6 => (288.0, 432.0),
            PageSize::Us4x8 => (288.0, 576.0),
            PageSize::Us5x7 => (360.0, 504.0),
            PageSize::Comm10 => (297.0, 684.0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PageDirection {
    #[default]
    Portrait,
    Landscape,
}

/// Presentation transition effects (`/Trans`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionStyle {
    WipeRight,
    WipeUp,
    WipeLeft,
    WipeDown,
    BarnDoorsHorizontalOut,
    BarnDoorsHorizontalIn,
    BarnDoorsVerticalOut,
    BarnDoorsVerticalIn,
    BoxOut,
    BoxIn,
    BlindsHorizontal,
    BlindsVertical,
    Dissolve,
    GlitterRight,
    GlitterDown,
    GlitterTopLeftToBottomRight,
    Replace,
}

impl TransitionStyle {
    pub const ALL: [TransitionStyle; 17] = [
        TransitionStyle::WipeRight,
        TransitionStyle::WipeUp,
        TransitionStyle::WipeLeft,
        TransitionStyle::WipeDown,
        TransitionStyle::BarnDoorsHorizontalOut,
        TransitionStyle::BarnDoorsHorizontalIn,
        TransitionStyle::BarnDoorsVerticalOut,
        TransitionStyle::BarnDoorsVerticalIn,
        TransitionStyle::BoxOut,
        TransitionStyle::BoxIn,
        TransitionStyle::BlindsHorizontal,
        TransitionStyle::BlindsVertical,
        TransitionStyle::Dissolve,
        TransitionStyle::GlitterRight,
        TransitionStyle::GlitterDown,
        TransitionStyle::GlitterTopLeftToBottomRight,
        TransitionStyle::Replace,
    ];

    /// `/S` value followed by the direction, dimension and motion entries.
    pub(crate) fn entries(
        self,
    ) -> (
        &'static str,
        Option<i64>,
        Option<&'static str>,
        Option<&'static str>,
    ) {
        use TransitionStyle::*;
        match self {
            WipeRight => ("Wipe", Some(0), None, None),
            WipeUp => ("Wipe", Some(90), None, None),
            WipeLeft => ("Wipe", Some(180), None, None),
            WipeDown => ("Wipe", Some(270), None, None),
            BarnDoorsHorizontalOut => ("Split", None, Some("H"), Some("O")),
            BarnDoorsHorizontalIn => ("Split", None, Some("H"), Some("I")),
            BarnDoorsVerticalOut => ("Split", None, Some("V"), Some("O")),
            BarnDoorsVerticalIn => ("Split", None, Some("V"), Some("I")),
            BoxOut => ("Box", None, None, Some("O")),
            BoxIn => ("Box", None, None, Some("I")),
            BlindsHorizontal => ("Blinds", None, Some("H"), None),
            BlindsVertical => ("Blinds", None, Some("V"), None),
            Dissolve => ("Dissolve", None, None, None),
            GlitterRight => ("Glitter", Some(0), None, None),
            GlitterDown => ("Glitter", Some(270), None, None),
            GlitterTopLeftToBottomRight => ("Glitter", Some(315), None, None),
            Replace => ("R", None, None, None),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub style: TransitionStyle,
    /// Seconds the page is displayed (`/Dur`).
    pub display_time: f32,
    /// Seconds the effect takes (`/D`).
    pub transition_time: f32,
}

/// A single page in a PDF document.
///
/// Pages own their content stream and the graphics state that mirrors it.
/// Drawing goes through [`crate::PageMut`], which checks every operator
/// against the current [`GraphicsMode`].
#[derive(Debug, Clone)]
pub struct Page {
    width: f32,
    height: f32,
    rotate: i32,
    transition: Option<Transition>,
    zoom: Option<f32>,

    pub(crate) gstate: GStateStack,
    pub(crate) mode: GraphicsMode,
    pub(crate) current_pos: Point,
    /// Start of the current subpath, where `h` returns to.
    pub(crate) start_pos: Point,
    pub(crate) text_matrix: TransMatrix,
    /// Current point inside a text object, in user space.
    pub(crate) text_pos: Point,

    pub(crate) content: Vec<u8>,
    pub(crate) fonts: IndexMap<FontRef, String>,
    pub(crate) xobjects: IndexMap<ImageRef, String>,
    pub(crate) annotations: Vec<AnnotationRef>,
}

impl Page {
    /// Creates an A4 portrait page.
    pub(crate) fn new() -> Self {
        let (width, height) = PageSize::A4.dimensions();
        Self {
            width,
            height,
            rotate: 0,
            transition: None,
            zoom: None,
            gstate: GStateStack::new(),
            mode: GraphicsMode::PageDescription,
            current_pos: Point::default(),
            start_pos: Point::default(),
            text_matrix: TransMatrix::IDENTITY,
            text_pos: Point::default(),
            content: Vec::new(),
            fonts: IndexMap::new(),
            xobjects: IndexMap::new(),
            annotations: Vec::new(),
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn media_box(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    pub fn rotate(&self) -> i32 {
        self.rotate
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    pub fn zoom(&self) -> Option<f32> {
        self.zoom
    }

    pub fn set_width(&mut self, width: f32) -> Result<()> {
        self.width = check_size(width)?;
        Ok(())
    }

    pub fn set_height(&mut self, height: f32) -> Result<()> {
        self.height = check_size(height)?;
        Ok(())
    }

    /// Sets a preset size; landscape swaps width and height.
    pub fn set_size(&mut self, size: PageSize, direction: PageDirection) {
        let (width, height) = size.dimensions();
        (self.width, self.height) = match direction {
            PageDirection::Portrait => (width, height),
            PageDirection::Landscape => (height, width),
        };
    }

    /// Angle must be a multiple of 90 degrees.
    pub fn set_rotate(&mut self, angle: i32) -> Result<()> {
        if angle % 90 != 0 {
            return Err(PdfError::PageInvalidRotateValue(angle));
        }
        self.rotate = angle;
        Ok(())
    }

    pub fn set_slide_show(
        &mut self,
        style: TransitionStyle,
        display_time: f32,
        transition_time: f32,
    ) -> Result<()> {
        if display_time < 0.0 || transition_time < 0.0 {
            return Err(PdfError::InvalidParameter(format!(
                "slide show times {display_time}/{transition_time}"
            )));
        }
        self.transition = Some(Transition {
            style,
            display_time,
            transition_time,
        });
        Ok(())
    }

    /// Preferred zoom factor (`/PZ`), 0.08 to 32.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<()> {
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(PdfError::PageOutOfRange(format!("zoom {zoom}")));
        }
        self.zoom = Some(zoom);
        Ok(())
    }

    pub fn gmode(&self) -> GraphicsMode {
        self.mode
    }

    pub fn current_pos(&self) -> Point {
        self.current_pos
    }

    pub fn current_text_pos(&self) -> Point {
        self.text_pos
    }

    pub(crate) fn state(&self) -> &GState {
        self.gstate.current()
    }

    pub(crate) fn state_mut(&mut self) -> &mut GState {
        self.gstate.current_mut()
    }

    pub fn gstate_depth(&self) -> usize {
        self.gstate.depth()
    }

    pub fn current_font(&self) -> Option<FontRef> {
        self.state().font
    }

    pub fn current_font_size(&self) -> f32 {
        self.state().font_size
    }

    pub fn trans_matrix(&self) -> TransMatrix {
        self.state().trans_matrix
    }

    pub fn text_matrix(&self) -> TransMatrix {
        self.text_matrix
    }

    pub fn line_width(&self) -> f32 {
        self.state().line_width
    }

    pub fn line_cap(&self) -> LineCap {
        self.state().line_cap
    }

    pub fn line_join(&self) -> LineJoin {
        self.state().line_join
    }

    pub fn miter_limit(&self) -> f32 {
        self.state().miter_limit
    }

    pub fn dash(&self) -> DashMode {
        self.state().dash.clone()
    }

    pub fn flatness(&self) -> f32 {
        self.state().flatness
    }

    pub fn char_space(&self) -> f32 {
        self.state().char_space
    }

    pub fn word_space(&self) -> f32 {
        self.state().word_space
    }

    pub fn horizontal_scaling(&self) -> f32 {
        self.state().horizontal_scaling
    }

    pub fn text_leading(&self) -> f32 {
        self.state().text_leading
    }

    pub fn text_rendering_mode(&self) -> TextRenderingMode {
        self.state().rendering_mode
    }

    pub fn text_rise(&self) -> f32 {
        self.state().text_rise
    }

    pub fn rgb_fill(&self) -> RgbColor {
        self.state().rgb_fill
    }

    pub fn rgb_stroke(&self) -> RgbColor {
        self.state().rgb_stroke
    }

    pub fn cmyk_fill(&self) -> CmykColor {
        self.state().cmyk_fill
    }

    pub fn cmyk_stroke(&self) -> CmykColor {
        self.state().cmyk_stroke
    }

    pub fn gray_fill(&self) -> f32 {
        self.state().gray_fill
    }

    pub fn gray_stroke(&self) -> f32 {
        self.state().gray_stroke
    }

    pub fn fill_color_space(&self) -> ColorSpace {
        self.state().fill_color_space
    }

    pub fn stroke_color_space(&self) -> ColorSpace {
        self.state().stroke_color_space
    }

    /// Raw content stream bytes emitted so far.
    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn annotations(&self) -> &[AnnotationRef] {
        &self.annotations
    }

    /// Resource name for a font, assigning `F<n>` on first use.
    pub(crate) fn font_resource(&mut self, font: FontRef) -> String {
        let next = self.fonts.len() + 1;
        self.fonts
            .entry(font)
            .or_insert_with(|| format!("F{next}"))
            .clone()
    }

    /// Resource name for an image, assigning `X<n>` on first use.
    pub(crate) fn xobject_resource(&mut self, image: ImageRef) -> String {
        let next = self.xobjects.len() + 1;
        self.xobjects
            .entry(image)
            .or_insert_with(|| format!("X{next}"))
            .clone()
    }
}

fn check_size(value: f32) -> Result<f32> {
    if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&value) {
        return Err(PdfError::PageInvalidSize(value));
    }
    Ok(value)
}
