//! Content-stream operators of a page.
//!
//! Every operator first checks the page's [`GraphicsMode`] against the
//! set of modes it is legal in. A rejected call, or one whose operands
//! fail validation, leaves the content stream and the tracked state
//! untouched.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use tracing::trace;

use crate::annotations::Annotation;
use crate::document::{AnnotationSlot, Document};
use crate::error::{PdfError, Result};
use crate::graphics::{
    arc_segments, check_unit, ellipse_segments, BezierSegment, CmykColor, ColorSpace, DashMode,
    GraphicsMode, LineCap, LineJoin, ModeSet, Point, Rect, RgbColor, TransMatrix,
};
use crate::handles::{AnnotationRef, DestinationRef, EncoderRef, ImageRef, PageRef};
use crate::page::Page;
use crate::structure::Destination;
use crate::writer::fmt_num;

const MAX_FLATNESS: f32 = 100.0;

/// Mutable access to one page of a [`Document`].
///
/// Dereferences to [`Page`] for the page properties and state queries.
pub struct PageMut<'a> {
    pub(crate) doc: &'a mut Document,
    pub(crate) handle: PageRef,
    pub(crate) index: usize,
}

impl<'a> PageMut<'a> {
    pub(crate) fn new(doc: &'a mut Document, handle: PageRef, index: usize) -> Self {
        Self { doc, handle, index }
    }

    pub fn handle(&self) -> PageRef {
        self.handle
    }

    pub(crate) fn check_mode(&self, operator: &'static str, allowed: ModeSet) -> Result<()> {
        let mode = self.mode;
        if !allowed.allows(mode) {
            trace!(operator, ?mode, "operator rejected in graphics mode");
            return Err(PdfError::InvalidGraphicsMode { operator, mode });
        }
        Ok(())
    }

    /// Rejects NaN and infinite operands before anything is written.
    pub(crate) fn check_finite(operator: &str, operands: &[f32]) -> Result<()> {
        match operands.iter().find(|v| !v.is_finite()) {
            Some(v) => Err(PdfError::PageOutOfRange(format!("{operator} operand {v}"))),
            None => Ok(()),
        }
    }

    /// Appends one operator line.
    pub(crate) fn emit(&mut self, op: impl AsRef<[u8]>) {
        let content = &mut self.content;
        content.extend_from_slice(op.as_ref());
        content.push(b'\n');
    }

    fn emit_point(&mut self, x: f32, y: f32, operator: &str) {
        self.emit(format!("{} {} {operator}", fmt_num(x), fmt_num(y)));
    }

    fn emit_curve(&mut self, segment: &BezierSegment) {
        let BezierSegment { c1, c2, end } = segment;
        self.emit(format!(
            "{} {} {} {} {} {} c",
            fmt_num(c1.x),
            fmt_num(c1.y),
            fmt_num(c2.x),
            fmt_num(c2.y),
            fmt_num(end.x),
            fmt_num(end.y)
        ));
        self.current_pos = *end;
    }

    // ---- path construction ----

    pub fn move_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.check_mode("m", ModeSet::PATH_START)?;
        Self::check_finite("m", &[x, y])?;
        self.emit_point(x, y, "m");
        let point = Point::new(x, y);
        self.current_pos = point;
        self.start_pos = point;
        self.mode = GraphicsMode::PathObject;
        Ok(())
    }

    pub fn line_to(&mut self, x: f32, y: f32) -> Result<()> {
        self.check_mode("l", ModeSet::PATH_OBJECT)?;
        Self::check_finite("l", &[x, y])?;
        self.emit_point(x, y, "l");
        self.current_pos = Point::new(x, y);
        Ok(())
    }

    /// Cubic curve with two explicit control points (`c`).
    pub fn curve_to(
        &mut self,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
    ) -> Result<()> {
        self.check_mode("c", ModeSet::PATH_OBJECT)?;
        Self::check_finite("c", &[x1, y1, x2, y2, x3, y3])?;
        self.emit_curve(&BezierSegment {
            c1: Point::new(x1, y1),
            c2: Point::new(x2, y2),
            end: Point::new(x3, y3),
        });
        Ok(())
    }

    /// Curve whose first control point is the current point (`v`).
    pub fn curve_to2(&mut self, x2: f32, y2: f32, x3: f32, y3: f32) -> Result<()> {
        self.check_mode("v", ModeSet::PATH_OBJECT)?;
        Self::check_finite("v", &[x2, y2, x3, y3])?;
        self.emit(format!(
            "{} {} {} {} v",
            fmt_num(x2),
            fmt_num(y2),
            fmt_num(x3),
            fmt_num(y3)
        ));
        self.current_pos = Point::new(x3, y3);
        Ok(())
    }

    /// Curve whose second control point is the end point (`y`).
    pub fn curve_to3(&mut self, x1: f32, y1: f32, x3: f32, y3: f32) -> Result<()> {
        self.check_mode("y", ModeSet::PATH_OBJECT)?;
        Self::check_finite("y", &[x1, y1, x3, y3])?;
        self.emit(format!(
            "{} {} {} {} y",
            fmt_num(x1),
            fmt_num(y1),
            fmt_num(x3),
            fmt_num(y3)
        ));
        self.current_pos = Point::new(x3, y3);
        Ok(())
    }

    pub fn close_path(&mut self) -> Result<()> {
        self.check_mode("h", ModeSet::PATH_OBJECT)?;
        self.emit("h");
        self.current_pos = self.start_pos;
        Ok(())
    }

    pub fn rectangle(&mut self, x: f32, y: f32, width: f32, height: f32) -> Result<()> {
        self.check_mode("re", ModeSet::PATH_START)?;
        Self::check_finite("re", &[x, y, width, height])?;
        self.emit(format!(
            "{} {} {} {} re",
            fmt_num(x),
            fmt_num(y),
            fmt_num(width),
            fmt_num(height)
        ));
        let point = Point::new(x, y);
        self.current_pos = point;
        self.start_pos = point;
        self.mode = GraphicsMode::PathObject;
        Ok(())
    }

    /// Circular arc from `ang1` to `ang2` degrees, counter-clockwise from
    /// 3 o'clock.
    ///
    /// Inside an open path the arc is joined to the current point with a
    /// line; otherwise it starts a new subpath.
    pub fn arc(&mut self, x: f32, y: f32, radius: f32, ang1: f32, ang2: f32) -> Result<()> {
        self.check_mode("arc", ModeSet::PATH_START)?;
        Self::check_finite("arc", &[x, y, radius, ang1, ang2])?;
        let (start, segments) = arc_segments(x, y, radius, ang1, ang2)?;

        if self.mode == GraphicsMode::PathObject {
            self.emit_point(start.x, start.y, "l");
        } else {
            self.emit_point(start.x, start.y, "m");
            self.start_pos = start;
        }
        for segment in &segments {
            self.emit_curve(segment);
        }
        self.mode = GraphicsMode::PathObject;
        Ok(())
    }

    pub fn circle(&mut self, x: f32, y: f32, radius: f32) -> Result<()> {
        self.check_mode("circle", ModeSet::PATH_START)?;
        Self::check_finite("circle", &[x, y, radius])?;
        if radius.is_nan() || radius < 0.0 {
            return Err(PdfError::PageOutOfRange(format!("circle radius {radius}")));
        }
        self.closed_curve(ellipse_segments(x, y, radius, radius));
        Ok(())
    }

    pub fn ellipse(&mut self, x: f32, y: f32, x_radius: f32, y_radius: f32) -> Result<()> {
        self.check_mode("ellipse", ModeSet::PATH_START)?;
        Self::check_finite("ellipse", &[x, y, x_radius, y_radius])?;
        if x_radius.is_nan() || y_radius.is_nan() || x_radius < 0.0 || y_radius < 0.0 {
            return Err(PdfError::PageOutOfRange(format!(
                "ellipse radii {x_radius},{y_radius}"
            )));
        }
        self.closed_curve(ellipse_segments(x, y, x_radius, y_radius));
        Ok(())
    }

    fn closed_curve(&mut self, (start, segments): (Point, [BezierSegment; 4])) {
        self.emit_point(start.x, start.y, "m");
        self.start_pos = start;
        for segment in &segments {
            self.emit_curve(segment);
        }
        self.mode = GraphicsMode::PathObject;
    }

    // ---- painting ----

    fn paint(&mut self, operator: &'static str) -> Result<()> {
        self.check_mode(operator, ModeSet::PATH_END)?;
        self.emit(operator);
        self.current_pos = Point::default();
        self.start_pos = Point::default();
        self.mode = GraphicsMode::PageDescription;
        Ok(())
    }

    pub fn stroke(&mut self) -> Result<()> {
        self.paint("S")
    }

    pub fn close_path_stroke(&mut self) -> Result<()> {
        self.paint("s")
    }

    pub fn fill(&mut self) -> Result<()> {
        self.paint("f")
    }

    pub fn eofill(&mut self) -> Result<()> {
        self.paint("f*")
    }

    pub fn fill_stroke(&mut self) -> Result<()> {
        self.paint("B")
    }

    pub fn eofill_stroke(&mut self) -> Result<()> {
        self.paint("B*")
    }

    pub fn close_path_fill_stroke(&mut self) -> Result<()> {
        self.paint("b")
    }

    pub fn close_path_eofill_stroke(&mut self) -> Result<()> {
        self.paint("b*")
    }

    /// Ends the path without painting it (`n`).
    pub fn end_path(&mut self) -> Result<()> {
        self.paint("n")
    }

    /// Intersects the clipping path with the current path (`W`). A
    /// painting operator must follow.
    pub fn clip(&mut self) -> Result<()> {
        self.clip_with("W")
    }

    pub fn eoclip(&mut self) -> Result<()> {
        self.clip_with("W*")
    }

    fn clip_with(&mut self, operator: &'static str) -> Result<()> {
        self.check_mode(operator, ModeSet::PATH_OBJECT)?;
        self.emit(operator);
        self.mode = GraphicsMode::ClippingPath;
        Ok(())
    }

    // ---- general graphics state ----

    pub fn set_line_width(&mut self, width: f32) -> Result<()> {
        self.check_mode("w", ModeSet::GENERAL_STATE)?;
        if !width.is_finite() || width < 0.0 {
            return Err(PdfError::PageOutOfRange(format!("line width {width}")));
        }
        self.emit(format!("{} w", fmt_num(width)));
        self.state_mut().line_width = width;
        Ok(())
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> Result<()> {
        self.check_mode("J", ModeSet::GENERAL_STATE)?;
        self.emit(format!("{} J", cap as u8));
        self.state_mut().line_cap = cap;
        Ok(())
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> Result<()> {
        self.check_mode("j", ModeSet::GENERAL_STATE)?;
        self.emit(format!("{} j", join as u8));
        self.state_mut().line_join = join;
        Ok(())
    }

    pub fn set_miter_limit(&mut self, limit: f32) -> Result<()> {
        self.check_mode("M", ModeSet::GENERAL_STATE)?;
        if !limit.is_finite() || limit < 1.0 {
            return Err(PdfError::PageOutOfRange(format!("miter limit {limit}")));
        }
        self.emit(format!("{} M", fmt_num(limit)));
        self.state_mut().miter_limit = limit;
        Ok(())
    }

    /// An empty pattern with phase 0 restores solid lines.
    pub fn set_dash(&mut self, pattern: &[f32], phase: u32) -> Result<()> {
        self.check_mode("d", ModeSet::GENERAL_STATE)?;
        let dash = DashMode::new(pattern, phase)?;
        let elements: Vec<String> = dash.pattern().iter().map(|v| fmt_num(*v)).collect();
        self.emit(format!("[{}] {} d", elements.join(" "), dash.phase()));
        self.state_mut().dash = dash;
        Ok(())
    }

    pub fn set_flatness(&mut self, flatness: f32) -> Result<()> {
        self.check_mode("i", ModeSet::GENERAL_STATE)?;
        if !(0.0..=MAX_FLATNESS).contains(&flatness) {
            return Err(PdfError::PageOutOfRange(format!("flatness {flatness}")));
        }
        self.emit(format!("{} i", fmt_num(flatness)));
        self.state_mut().flatness = flatness;
        Ok(())
    }

    // ---- colour ----

    pub fn set_gray_fill(&mut self, gray: f32) -> Result<()> {
        self.check_mode("g", ModeSet::GENERAL_STATE)?;
        check_unit(gray)?;
        self.emit(format!("{} g", fmt_num(gray)));
        let state = self.state_mut();
        state.gray_fill = gray;
        state.fill_color_space = ColorSpace::DeviceGray;
        Ok(())
    }

    pub fn set_gray_stroke(&mut self, gray: f32) -> Result<()> {
        self.check_mode("G", ModeSet::GENERAL_STATE)?;
        check_unit(gray)?;
        self.emit(format!("{} G", fmt_num(gray)));
        let state = self.state_mut();
        state.gray_stroke = gray;
        state.stroke_color_space = ColorSpace::DeviceGray;
        Ok(())
    }

    pub fn set_rgb_fill(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        self.check_mode("rg", ModeSet::GENERAL_STATE)?;
        [r, g, b].into_iter().try_for_each(check_unit)?;
        self.emit(format!("{} {} {} rg", fmt_num(r), fmt_num(g), fmt_num(b)));
        let state = self.state_mut();
        state.rgb_fill = RgbColor::new(r, g, b);
        state.fill_color_space = ColorSpace::DeviceRgb;
        Ok(())
    }

    pub fn set_rgb_stroke(&mut self, r: f32, g: f32, b: f32) -> Result<()> {
        self.check_mode("RG", ModeSet::GENERAL_STATE)?;
        [r, g, b].into_iter().try_for_each(check_unit)?;
        self.emit(format!("{} {} {} RG", fmt_num(r), fmt_num(g), fmt_num(b)));
        let state = self.state_mut();
        state.rgb_stroke = RgbColor::new(r, g, b);
        state.stroke_color_space = ColorSpace::DeviceRgb;
        Ok(())
    }

    pub fn set_cmyk_fill(&mut self, c: f32, m: f32, y: f32, k: f32) -> Result<()> {
        self.check_mode("k", ModeSet::GENERAL_STATE)?;
        [c, m, y, k].into_iter().try_for_each(check_unit)?;
        self.emit(format!(
            "{} {} {} {} k",
            fmt_num(c),
            fmt_num(m),
            fmt_num(y),
            fmt_num(k)
        ));
        let state = self.state_mut();
        state.cmyk_fill = CmykColor::new(c, m, y, k);
        state.fill_color_space = ColorSpace::DeviceCmyk;
        Ok(())
    }

    pub fn set_cmyk_stroke(&mut self, c: f32, m: f32, y: f32, k: f32) -> Result<()> {
        self.check_mode("K", ModeSet::GENERAL_STATE)?;
        [c, m, y, k].into_iter().try_for_each(check_unit)?;
        self.emit(format!(
            "{} {} {} {} K",
            fmt_num(c),
            fmt_num(m),
            fmt_num(y),
            fmt_num(k)
        ));
        let state = self.state_mut();
        state.cmyk_stroke = CmykColor::new(c, m, y, k);
        state.stroke_color_space = ColorSpace::DeviceCmyk;
        Ok(())
    }

    // ---- state stack and transformation ----

    pub fn gsave(&mut self) -> Result<()> {
        self.check_mode("q", ModeSet::PAGE_DESCRIPTION)?;
        self.gstate.push()?;
        self.emit("q");
        Ok(())
    }

    pub fn grestore(&mut self) -> Result<()> {
        self.check_mode("Q", ModeSet::PAGE_DESCRIPTION)?;
        self.gstate.pop()?;
        self.emit("Q");
        Ok(())
    }

    /// Premultiplies the current transformation matrix (`cm`).
    pub fn concat(&mut self, a: f32, b: f32, c: f32, d: f32, x: f32, y: f32) -> Result<()> {
        self.check_mode("cm", ModeSet::PAGE_DESCRIPTION)?;
        Self::check_finite("cm", &[a, b, c, d, x, y])?;
        let m = TransMatrix::new(a, b, c, d, x, y);
        self.emit(matrix_operands(&m, "cm"));
        let state = self.state_mut();
        state.trans_matrix = state.trans_matrix.concat(&m);
        Ok(())
    }

    // ---- images ----

    /// Paints `image` into the rectangle at `(x, y)` of the given size.
    pub fn draw_image(
        &mut self,
        image: ImageRef,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
    ) -> Result<()> {
        self.check_mode("Do", ModeSet::PAGE_DESCRIPTION)?;
        Self::check_finite("Do", &[x, y, width, height])?;
        self.doc.image_index(image)?;
        self.gstate.check_push()?;

        let name = self.xobject_resource(image);
        self.emit("q");
        self.emit(matrix_operands(&TransMatrix::new(width, 0.0, 0.0, height, x, y), "cm"));
        self.emit(format!("/{name} Do"));
        self.emit("Q");
        Ok(())
    }

    // ---- destinations and annotations ----

    /// A destination showing this page, initially `/Fit`.
    pub fn create_destination(&mut self) -> Result<DestinationRef> {
        let doc = &mut *self.doc;
        let handle = DestinationRef::new(doc.doc_id, doc.destinations.len());
        doc.destinations.push(Destination::new(self.handle));
        Ok(handle)
    }

    /// A note whose contents are interpreted in `encoder`, or in
    /// PDFDocEncoding without one.
    pub fn create_text_annotation(
        &mut self,
        rect: Rect,
        text: impl AsRef<[u8]>,
        encoder: Option<EncoderRef>,
    ) -> Result<AnnotationRef> {
        let encoder = encoder
            .map(|e| self.doc.encoder_index(e).map(|i| Arc::clone(&self.doc.encoders[i])))
            .transpose()?;
        let annotation = Annotation::text(self.handle, rect, text.as_ref().to_vec(), encoder);
        Ok(self.push_annotation(annotation))
    }

    pub fn create_link_annotation(
        &mut self,
        rect: Rect,
        destination: DestinationRef,
    ) -> Result<AnnotationRef> {
        self.doc.destination_index(destination)?;
        let annotation = Annotation::link(self.handle, rect, destination);
        Ok(self.push_annotation(annotation))
    }

    pub fn create_url_annotation(&mut self, rect: Rect, uri: &str) -> Result<AnnotationRef> {
        let annotation = Annotation::uri(self.handle, rect, uri)?;
        Ok(self.push_annotation(annotation))
    }

    fn push_annotation(&mut self, annotation: Annotation) -> AnnotationRef {
        let doc = &mut *self.doc;
        let id = doc.registry.allocate();
        let handle = AnnotationRef::new(doc.doc_id, doc.annotations.len());
        doc.annotations.push(AnnotationSlot { annotation, id });
        doc.pages[self.index].page.annotations.push(handle);
        handle
    }
}

pub(crate) fn matrix_operands(m: &TransMatrix, operator: &str) -> String {
    format!(
        "{} {} {} {} {} {} {operator}",
        fmt_num(m.a),
        fmt_num(m.b),
        fmt_num(m.c),
        fmt_num(m.d),
        fmt_num(m.x),
        fmt_num(m.y)
    )
}

impl Deref for PageMut<'_> {
    type Target = Page;

    fn deref(&self) -> &Page {
        &self.doc.pages[self.index].page
    }
}

impl DerefMut for PageMut<'_> {
    fn deref_mut(&mut self) -> &mut Page {
        &mut self.doc.pages[self.index].page
    }
}
