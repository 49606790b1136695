//! PDF destinations according to ISO 32000-1 Section 12.3.2

use crate::error::{PdfError, Result};
use crate::handles::PageRef;
use crate::objects::{Object, ObjectId};
use crate::page::{MAX_ZOOM, MIN_ZOOM};

/// How the target page is displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DestinationView {
    /// Display page with coordinates (left, top) at upper-left corner.
    /// A zoom of 0 keeps the current zoom.
    Xyz { left: f32, top: f32, zoom: f32 },
    /// Fit entire page in window
    Fit,
    /// Fit width of page in window
    FitH { top: f32 },
    /// Fit height of page in window
    FitV { left: f32 },
    /// Fit rectangle in window
    FitR {
        left: f32,
        bottom: f32,
        right: f32,
        top: f32,
    },
    /// Fit page bounding box in window
    FitB,
    /// Fit width of bounding box
    FitBH { top: f32 },
    /// Fit height of bounding box
    FitBV { left: f32 },
}

/// A view of a page, the target of links, outlines and the open action.
#[derive(Debug, Clone, PartialEq)]
pub struct Destination {
    page: PageRef,
    view: DestinationView,
}

impl Destination {
    pub(crate) fn new(page: PageRef) -> Self {
        Self {
            page,
            view: DestinationView::Fit,
        }
    }

    pub fn page(&self) -> PageRef {
        self.page
    }

    pub fn view(&self) -> DestinationView {
        self.view
    }

    pub fn set_xyz(&mut self, left: f32, top: f32, zoom: f32) -> Result<()> {
        if left < 0.0 || top < 0.0 {
            return Err(PdfError::InvalidParameter(format!(
                "destination position {left},{top}"
            )));
        }
        if zoom != 0.0 && !(MIN_ZOOM..=MAX_ZOOM).contains(&zoom) {
            return Err(PdfError::InvalidParameter(format!("destination zoom {zoom}")));
        }
        self.view = DestinationView::Xyz { left, top, zoom };
        Ok(())
    }

    pub fn set_fit(&mut self) {
        self.view = DestinationView::Fit;
    }

    pub fn set_fit_h(&mut self, top: f32) {
        self.view = DestinationView::FitH { top };
    }

    pub fn set_fit_v(&mut self, left: f32) {
        self.view = DestinationView::FitV { left };
    }

    pub fn set_fit_r(&mut self, left: f32, bottom: f32, right: f32, top: f32) {
        self.view = DestinationView::FitR {
            left,
            bottom,
            right,
            top,
        };
    }

    pub fn set_fit_b(&mut self) {
        self.view = DestinationView::FitB;
    }

    pub fn set_fit_bh(&mut self, top: f32) {
        self.view = DestinationView::FitBH { top };
    }

    pub fn set_fit_bv(&mut self, left: f32) {
        self.view = DestinationView::FitBV { left };
    }

    /// Convert to PDF array
    pub(crate) fn to_array(&self, page_id: ObjectId) -> Object {
        let mut arr = vec![Object::Reference(page_id)];

        let (name, params): (&str, Vec<f32>) = match self.view {
            DestinationView::Xyz { left, top, zoom } => ("XYZ", vec![left, top, zoom]),
            DestinationView::Fit => ("Fit", vec![]),
            DestinationView::FitH { top } => ("FitH", vec![top]),
            DestinationView::FitV { left } => ("FitV", vec![left]),
            DestinationView::FitR {
                left,
                bottom,
                right,
                top,
            } => ("FitR", vec![left, bottom, right, top]),
            DestinationView::FitB => ("FitB", vec![]),
            DestinationView::FitBH { top } => ("FitBH", vec![top]),
            DestinationView::FitBV { left } => ("FitBV", vec![left]),
        };
        arr.push(Object::name(name));
        arr.extend(params.into_iter().map(Object::from));

        Object::Array(arr)
    }
}
