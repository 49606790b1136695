//! Text, link and URI annotations

use std::sync::Arc;

use crate::error::{PdfError, Result};
use crate::graphics::Rect;
use crate::handles::{DestinationRef, PageRef};
use crate::objects::{Dictionary, Object};
use crate::structure::text_string;
use crate::text::Encoder;

/// Visual effect when a link is clicked (`/H`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HighlightMode {
    NoHighlight,
    #[default]
    InvertBox,
    InvertBorder,
    DownAppearance,
}

impl HighlightMode {
    pub fn pdf_name(self) -> &'static str {
        match self {
            HighlightMode::NoHighlight => "N",
            HighlightMode::InvertBox => "I",
            HighlightMode::InvertBorder => "O",
            HighlightMode::DownAppearance => "P",
        }
    }
}

/// Icon of a text annotation (`/Name`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AnnotationIcon {
    Comment,
    Key,
    #[default]
    Note,
    Help,
    NewParagraph,
    Paragraph,
    Insert,
}

impl AnnotationIcon {
    pub const ALL: [AnnotationIcon; 7] = [
        AnnotationIcon::Comment,
        AnnotationIcon::Key,
        AnnotationIcon::Note,
        AnnotationIcon::Help,
        AnnotationIcon::NewParagraph,
        AnnotationIcon::Paragraph,
        AnnotationIcon::Insert,
    ];

    pub fn pdf_name(self) -> &'static str {
        match self {
            AnnotationIcon::Comment => "Comment",
            AnnotationIcon::Key => "Key",
            AnnotationIcon::Note => "Note",
            AnnotationIcon::Help => "Help",
            AnnotationIcon::NewParagraph => "NewParagraph",
            AnnotationIcon::Paragraph => "Paragraph",
            AnnotationIcon::Insert => "Insert",
        }
    }
}

/// Border of a link annotation. A zero `dash_on` draws a solid line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStyle {
    pub width: f32,
    pub dash_on: u16,
    pub dash_off: u16,
}

impl BorderStyle {
    fn to_dict(self) -> Dictionary {
        let mut dict = Dictionary::typed("Border");
        dict.set("W", self.width);
        if self.dash_on > 0 {
            dict.set_name("S", "D");
            dict.set(
                "D",
                Object::Array(vec![
                    i64::from(self.dash_on).into(),
                    i64::from(self.dash_off).into(),
                ]),
            );
        } else {
            dict.set_name("S", "S");
        }
        dict
    }
}

#[derive(Debug, Clone)]
pub enum AnnotationKind {
    Text {
        contents: Vec<u8>,
        encoder: Option<Arc<Encoder>>,
        icon: AnnotationIcon,
        opened: bool,
    },
    Link {
        destination: DestinationRef,
        highlight: HighlightMode,
        border: Option<BorderStyle>,
    },
    Uri {
        uri: String,
        highlight: HighlightMode,
        border: Option<BorderStyle>,
    },
}

/// An annotation placed on one page.
#[derive(Debug, Clone)]
pub struct Annotation {
    page: PageRef,
    rect: Rect,
    kind: AnnotationKind,
}

impl Annotation {
    pub(crate) fn text(
        page: PageRef,
        rect: Rect,
        contents: Vec<u8>,
        encoder: Option<Arc<Encoder>>,
    ) -> Self {
        Self {
            page,
            rect,
            kind: AnnotationKind::Text {
                contents,
                encoder,
                icon: AnnotationIcon::default(),
                opened: false,
            },
        }
    }

    pub(crate) fn link(page: PageRef, rect: Rect, destination: DestinationRef) -> Self {
        Self {
            page,
            rect,
            kind: AnnotationKind::Link {
                destination,
                highlight: HighlightMode::default(),
                border: None,
            },
        }
    }

    pub(crate) fn uri(page: PageRef, rect: Rect, uri: &str) -> Result<Self> {
        if uri.is_empty() {
            return Err(PdfError::InvalidUri);
        }
        Ok(Self {
            page,
            rect,
            kind: AnnotationKind::Uri {
                uri: uri.to_string(),
                highlight: HighlightMode::default(),
                border: None,
            },
        })
    }

    pub fn page(&self) -> PageRef {
        self.page
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn kind(&self) -> &AnnotationKind {
        &self.kind
    }

    /// Link and URI annotations only.
    pub fn set_highlight_mode(&mut self, mode: HighlightMode) -> Result<()> {
        match &mut self.kind {
            AnnotationKind::Link { highlight, .. } | AnnotationKind::Uri { highlight, .. } => {
                *highlight = mode;
                Ok(())
            }
            AnnotationKind::Text { .. } => Err(PdfError::InvalidAnnotation),
        }
    }

    /// Link and URI annotations only.
    pub fn set_border_style(&mut self, width: f32, dash_on: u16, dash_off: u16) -> Result<()> {
        if width.is_nan() || width < 0.0 {
            return Err(PdfError::AnnotInvalidBorderStyle(format!("width {width}")));
        }
        match &mut self.kind {
            AnnotationKind::Link { border, .. } | AnnotationKind::Uri { border, .. } => {
                *border = Some(BorderStyle {
                    width,
                    dash_on,
                    dash_off,
                });
                Ok(())
            }
            AnnotationKind::Text { .. } => Err(PdfError::InvalidAnnotation),
        }
    }

    /// Text annotations only.
    pub fn set_icon(&mut self, new_icon: AnnotationIcon) -> Result<()> {
        match &mut self.kind {
            AnnotationKind::Text { icon, .. } => {
                *icon = new_icon;
                Ok(())
            }
            _ => Err(PdfError::InvalidAnnotation),
        }
    }

    /// Whether the popup of a text annotation starts open.
    pub fn set_opened(&mut self, open: bool) -> Result<()> {
        match &mut self.kind {
            AnnotationKind::Text { opened, .. } => {
                *opened = open;
                Ok(())
            }
            _ => Err(PdfError::InvalidAnnotation),
        }
    }

    /// `dest` resolves the link target to its array form.
    pub(crate) fn to_dict(
        &self,
        dest: impl FnOnce(DestinationRef) -> Result<Object>,
    ) -> Result<Dictionary> {
        let mut dict = Dictionary::typed("Annot");
        let rect = self.rect;
        dict.set("Rect", Object::reals([rect.left, rect.bottom, rect.right, rect.top]));

        match &self.kind {
            AnnotationKind::Text {
                contents,
                encoder,
                icon,
                opened,
            } => {
                dict.set_name("Subtype", "Text");
                dict.set("Contents", text_string(contents, encoder.as_deref()));
                dict.set_name("Name", icon.pdf_name());
                dict.set("Open", *opened);
            }
            AnnotationKind::Link {
                destination,
                highlight,
                border,
            } => {
                dict.set_name("Subtype", "Link");
                dict.set("Dest", dest(*destination)?);
                set_link_appearance(&mut dict, *highlight, *border);
            }
            AnnotationKind::Uri {
                uri,
                highlight,
                border,
            } => {
                dict.set_name("Subtype", "Link");
                let mut action = Dictionary::typed("Action");
                action.set_name("S", "URI");
                action.set("URI", uri.as_str());
                dict.set("A", action);
                set_link_appearance(&mut dict, *highlight, *border);
            }
        }
        Ok(dict)
    }
}

fn set_link_appearance(
    dict: &mut Dictionary,
    highlight: HighlightMode,
    border: Option<BorderStyle>,
) {
    if highlight != HighlightMode::InvertBox {
        dict.set_name("H", highlight.pdf_name());
    }
    if let Some(border) = border {
        dict.set("BS", border.to_dict());
    }
}
