//! Graphics state, colours, paths and images for page content streams.
//!
//! Every content operator belongs to a set of [`GraphicsMode`]s in which it
//! is legal. [`ModeSet`] expresses those sets; the page layer checks the
//! current mode against them before emitting anything.

mod color;
mod image;
mod path;
mod state;

pub use color::{CmykColor, Color, ColorSpace, RgbColor};
pub use image::{ColorMask, Image, ImageSource};
pub use path::{arc_segments, ellipse_segments, BezierSegment, DashMode, LineCap, LineJoin, KAPPA};
pub use state::{GState, GStateStack, GSTATE_DEPTH_LIMIT};

pub(crate) use color::check_unit;
pub(crate) use image::{load_png_bytes, load_png_header};

use bitflags::bitflags;

/// Content-stream graphics mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GraphicsMode {
    #[default]
    PageDescription,
    PathObject,
    TextObject,
    ClippingPath,
    Shading,
    InlineImage,
    ExternalObject,
}

bitflags! {
    /// Set of graphics modes an operator accepts.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct ModeSet: u16 {
        const PAGE_DESCRIPTION = 0x0001;
        const PATH_OBJECT = 0x0002;
        const TEXT_OBJECT = 0x0004;
        const CLIPPING_PATH = 0x0008;
        const SHADING = 0x0010;
        const INLINE_IMAGE = 0x0020;
        const EXTERNAL_OBJECT = 0x0040;

        /// `w J j M d i` and colour setters.
        const GENERAL_STATE = Self::PAGE_DESCRIPTION.bits() | Self::TEXT_OBJECT.bits();
        /// `m re` and the composite path shapes.
        const PATH_START = Self::PAGE_DESCRIPTION.bits() | Self::PATH_OBJECT.bits();
        /// Painting and `n`.
        const PATH_END = Self::PATH_OBJECT.bits() | Self::CLIPPING_PATH.bits();
    }
}

impl GraphicsMode {
    pub fn flag(self) -> ModeSet {
        match self {
            GraphicsMode::PageDescription => ModeSet::PAGE_DESCRIPTION,
            GraphicsMode::PathObject => ModeSet::PATH_OBJECT,
            GraphicsMode::TextObject => ModeSet::TEXT_OBJECT,
            GraphicsMode::ClippingPath => ModeSet::CLIPPING_PATH,
            GraphicsMode::Shading => ModeSet::SHADING,
            GraphicsMode::InlineImage => ModeSet::INLINE_IMAGE,
            GraphicsMode::ExternalObject => ModeSet::EXTERNAL_OBJECT,
        }
    }
}

impl ModeSet {
    pub fn allows(self, mode: GraphicsMode) -> bool {
        self.contains(mode.flag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub left: f32,
    pub bottom: f32,
    pub right: f32,
    pub top: f32,
}

impl Rect {
    pub fn new(left: f32, bottom: f32, right: f32, top: f32) -> Self {
        Self {
            left,
            bottom,
            right,
            top,
        }
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }
}

/// Affine matrix `[a b c d x y]` as used by `cm` and `Tm`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransMatrix {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub x: f32,
    pub y: f32,
}

impl TransMatrix {
    pub const IDENTITY: TransMatrix = TransMatrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        x: 0.0,
        y: 0.0,
    };

    pub fn new(a: f32, b: f32, c: f32, d: f32, x: f32, y: f32) -> Self {
        Self { a, b, c, d, x, y }
    }

    /// `self` premultiplied by `[a b c d x y]`, the effect of a `cm` operator.
    pub fn concat(&self, m: &TransMatrix) -> TransMatrix {
        TransMatrix {
            a: m.a * self.a + m.b * self.c,
            b: m.a * self.b + m.b * self.d,
            c: m.c * self.a + m.d * self.c,
            d: m.c * self.b + m.d * self.d,
            x: self.x + m.x * self.a + m.y * self.c,
            y: self.y + m.x * self.b + m.y * self.d,
        }
    }
}

impl Default for TransMatrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Text rendering mode (`Tr` operand).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TextRenderingMode {
    #[default]
    Fill = 0,
    Stroke = 1,
    FillThenStroke = 2,
    Invisible = 3,
    FillClipping = 4,
    StrokeClipping = 5,
    FillStrokeClipping = 6,
    Clipping = 7,
}

/// Horizontal alignment for `text_rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextAlignment {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}
