//! Text objects: state operators, positioning and showing text.

use crate::document::PageMut;
use crate::error::{PdfError, Result};
use crate::graphics::{GraphicsMode, ModeSet, Point, TextAlignment, TextRenderingMode, TransMatrix};
use crate::handles::FontRef;
use crate::text::is_white_space;
use crate::writer::{escape_literal, fmt_num, hex_literal};

use super::page_mut::matrix_operands;

const MAX_FONT_SIZE: f32 = 600.0;
const MIN_CHAR_SPACE: f32 = -30.0;
const MAX_CHAR_SPACE: f32 = 300.0;
const MIN_HORIZONTAL_SCALING: f32 = 10.0;
const MAX_HORIZONTAL_SCALING: f32 = 300.0;
const MAX_TEXT_LEN: usize = 65535;

impl PageMut<'_> {
    // ---- text object ----

    /// `BT`; the text matrix and position start at the identity.
    pub fn begin_text(&mut self) -> Result<()> {
        self.check_mode("BT", ModeSet::PAGE_DESCRIPTION)?;
        self.emit("BT");
        self.text_matrix = TransMatrix::IDENTITY;
        self.text_pos = Point::default();
        self.mode = GraphicsMode::TextObject;
        Ok(())
    }

    pub fn end_text(&mut self) -> Result<()> {
        self.check_mode("ET", ModeSet::TEXT_OBJECT)?;
        self.emit("ET");
        self.text_pos = Point::default();
        self.mode = GraphicsMode::PageDescription;
        Ok(())
    }

    // ---- text state ----

    pub fn set_font_and_size(&mut self, font: FontRef, size: f32) -> Result<()> {
        self.check_mode("Tf", ModeSet::GENERAL_STATE)?;
        self.doc.font_index(font)?;
        if !(size > 0.0 && size <= MAX_FONT_SIZE) {
            return Err(PdfError::PageInvalidFontSize(size));
        }

        let name = self.font_resource(font);
        self.emit(format!("/{name} {} Tf", fmt_num(size)));
        let state = self.state_mut();
        state.font = Some(font);
        state.font_size = size;
        Ok(())
    }

    pub fn set_char_space(&mut self, value: f32) -> Result<()> {
        self.check_mode("Tc", ModeSet::GENERAL_STATE)?;
        check_spacing("character spacing", value)?;
        self.emit(format!("{} Tc", fmt_num(value)));
        self.state_mut().char_space = value;
        Ok(())
    }

    pub fn set_word_space(&mut self, value: f32) -> Result<()> {
        self.check_mode("Tw", ModeSet::GENERAL_STATE)?;
        check_spacing("word spacing", value)?;
        self.write_word_space(value);
        Ok(())
    }

    fn write_word_space(&mut self, value: f32) {
        self.emit(format!("{} Tw", fmt_num(value)));
        self.state_mut().word_space = value;
    }

    /// Percentage of the normal glyph width, 10 to 300.
    pub fn set_horizontal_scaling(&mut self, value: f32) -> Result<()> {
        self.check_mode("Tz", ModeSet::GENERAL_STATE)?;
        if !(MIN_HORIZONTAL_SCALING..=MAX_HORIZONTAL_SCALING).contains(&value) {
            return Err(PdfError::PageOutOfRange(format!("horizontal scaling {value}")));
        }
        self.emit(format!("{} Tz", fmt_num(value)));
        self.state_mut().horizontal_scaling = value;
        Ok(())
    }

    pub fn set_text_leading(&mut self, value: f32) -> Result<()> {
        self.check_mode("TL", ModeSet::GENERAL_STATE)?;
        Self::check_finite("TL", &[value])?;
        self.emit(format!("{} TL", fmt_num(value)));
        self.state_mut().text_leading = value;
        Ok(())
    }

    pub fn set_text_rendering_mode(&mut self, mode: TextRenderingMode) -> Result<()> {
        self.check_mode("Tr", ModeSet::GENERAL_STATE)?;
        self.emit(format!("{} Tr", mode as u8));
        self.state_mut().rendering_mode = mode;
        Ok(())
    }

    pub fn set_text_rise(&mut self, value: f32) -> Result<()> {
        self.check_mode("Ts", ModeSet::GENERAL_STATE)?;
        Self::check_finite("Ts", &[value])?;
        self.emit(format!("{} Ts", fmt_num(value)));
        self.state_mut().text_rise = value;
        Ok(())
    }

    // ---- positioning ----

    /// Moves to the start of the next line, offset from the start of the
    /// current one (`Td`).
    pub fn move_text_pos(&mut self, x: f32, y: f32) -> Result<()> {
        self.check_mode("Td", ModeSet::TEXT_OBJECT)?;
        Self::check_finite("Td", &[x, y])?;
        self.emit(format!("{} {} Td", fmt_num(x), fmt_num(y)));
        self.apply_text_offset(x, y);
        Ok(())
    }

    /// `TD`: like [`PageMut::move_text_pos`] and sets the leading to `-y`.
    pub fn move_text_pos_set_leading(&mut self, x: f32, y: f32) -> Result<()> {
        self.check_mode("TD", ModeSet::TEXT_OBJECT)?;
        Self::check_finite("TD", &[x, y])?;
        self.emit(format!("{} {} TD", fmt_num(x), fmt_num(y)));
        self.apply_text_offset(x, y);
        self.state_mut().text_leading = -y;
        Ok(())
    }

    pub fn move_to_next_line(&mut self) -> Result<()> {
        self.check_mode("T*", ModeSet::TEXT_OBJECT)?;
        self.emit("T*");
        self.apply_next_line();
        Ok(())
    }

    /// Replaces the text matrix (`Tm`).
    pub fn set_text_matrix(
        &mut self,
        a: f32,
        b: f32,
        c: f32,
        d: f32,
        x: f32,
        y: f32,
    ) -> Result<()> {
        self.check_mode("Tm", ModeSet::TEXT_OBJECT)?;
        Self::check_finite("Tm", &[a, b, c, d, x, y])?;
        if (a == 0.0 || d == 0.0) && (b == 0.0 || c == 0.0) {
            return Err(PdfError::InvalidParameter(format!(
                "degenerate text matrix [{a} {b} {c} {d}]"
            )));
        }
        let m = TransMatrix::new(a, b, c, d, x, y);
        self.emit(matrix_operands(&m, "Tm"));
        self.text_matrix = m;
        self.text_pos = Point::new(x, y);
        Ok(())
    }

    fn apply_text_offset(&mut self, x: f32, y: f32) {
        let tm = &mut self.text_matrix;
        tm.x += x * tm.a + y * tm.c;
        tm.y += y * tm.d + x * tm.b;
        self.text_pos = Point::new(self.text_matrix.x, self.text_matrix.y);
    }

    fn apply_next_line(&mut self) {
        let leading = self.state().text_leading;
        let tm = &mut self.text_matrix;
        tm.x -= leading * tm.c;
        tm.y -= leading * tm.d;
        self.text_pos = Point::new(self.text_matrix.x, self.text_matrix.y);
    }

    /// Offsets for `Td` that land the line start on `(x, y)`.
    fn offset_to(&self, x: f32, y: f32) -> Result<(f32, f32)> {
        let tm = self.text_matrix;
        let det = tm.a * tm.d - tm.b * tm.c;
        if det == 0.0 {
            return Err(PdfError::InvalidParameter("text matrix is not invertible".to_string()));
        }
        let (ex, ey) = (x - tm.x, y - tm.y);
        Ok(((tm.d * ex - tm.c * ey) / det, (tm.a * ey - tm.b * ex) / det))
    }

    // ---- showing text ----

    /// Shows `text` at the current position (`Tj`) and advances past it.
    pub fn show_text(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        self.check_mode("Tj", ModeSet::TEXT_OBJECT)?;
        let font = self.text_font(text)?;
        if text.is_empty() {
            return Ok(());
        }
        self.write_text(font, text, "Tj");
        Ok(())
    }

    /// Moves to the next line and shows `text` (`'`).
    pub fn show_text_next_line(&mut self, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        self.check_mode("'", ModeSet::TEXT_OBJECT)?;
        let font = self.text_font(text)?;
        if text.is_empty() {
            self.emit("T*");
            self.apply_next_line();
            return Ok(());
        }
        self.apply_next_line();
        self.write_text(font, text, "'");
        Ok(())
    }

    /// Sets word and character spacing, moves to the next line and shows
    /// `text` (`"`).
    pub fn show_text_next_line_ex(
        &mut self,
        word_space: f32,
        char_space: f32,
        text: impl AsRef<[u8]>,
    ) -> Result<()> {
        let text = text.as_ref();
        self.check_mode("\"", ModeSet::TEXT_OBJECT)?;
        check_spacing("word spacing", word_space)?;
        check_spacing("character spacing", char_space)?;
        let font = self.text_font(text)?;

        let state = self.state_mut();
        state.word_space = word_space;
        state.char_space = char_space;
        self.apply_next_line();

        let spacing = format!("{} {} ", fmt_num(word_space), fmt_num(char_space));
        self.write_text_with(font, text, &spacing, "\"");
        Ok(())
    }

    /// Shows `text` with its line start at `(x, y)` in text space.
    pub fn text_out(&mut self, x: f32, y: f32, text: impl AsRef<[u8]>) -> Result<()> {
        let text = text.as_ref();
        self.check_mode("TextOut", ModeSet::TEXT_OBJECT)?;
        Self::check_finite("TextOut", &[x, y])?;
        let font = self.text_font(text)?;
        let (dx, dy) = self.offset_to(x, y)?;

        self.emit(format!("{} {} Td", fmt_num(dx), fmt_num(dy)));
        self.apply_text_offset(dx, dy);
        if !text.is_empty() {
            self.write_text(font, text, "Tj");
        }
        Ok(())
    }

    /// Flows `text` into the box top-down and returns the bytes placed.
    ///
    /// The first baseline sits one ascent below `top`; lines advance by
    /// the leading, or the font size while the leading is 0. Lines that
    /// fit stay drawn when the rest does not, and
    /// [`PdfError::PageInsufficientSpace`] reports how much was placed.
    pub fn text_rect(
        &mut self,
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        text: impl AsRef<[u8]>,
        align: TextAlignment,
    ) -> Result<usize> {
        let text = text.as_ref();
        self.check_mode("TextRect", ModeSet::TEXT_OBJECT)?;
        Self::check_finite("TextRect", &[left, top, right, bottom])?;
        let font = self.text_font(text)?;

        let state = self.state().clone();
        let ascent = f32::from(self.doc.fonts[font].font.ascent()) * state.font_size / 1000.0;
        let line_height = if state.text_leading == 0.0 {
            state.font_size
        } else {
            state.text_leading
        };
        let box_width = right - left;
        let scale = state.horizontal_scaling / 100.0;

        let mut baseline = top - ascent;
        let mut printed = 0;
        while printed < text.len() && baseline >= bottom {
            let rest = &text[printed..];
            let fitted = self.doc.fonts[font].font.measure_text(
                rest,
                box_width / scale,
                state.font_size,
                state.char_space,
                state.word_space,
                true,
            );
            if fitted == 0 {
                break;
            }

            let line = &rest[..fitted];
            let last_line = printed + fitted == text.len() || line.last() == Some(&b'\n');
            let drawn = trim_trailing_white_space(line);
            let line_width = self.width_in_user_space(font, drawn);

            let x = match align {
                TextAlignment::Left | TextAlignment::Justify => left,
                TextAlignment::Right => right - line_width,
                TextAlignment::Center => left + (box_width - line_width) / 2.0,
            };
            let spaces = self.doc.fonts[font].font.text_width(drawn).numspace;
            let justify = align == TextAlignment::Justify && !last_line && spaces > 0;

            let (dx, dy) = self.offset_to(x, baseline)?;
            self.emit(format!("{} {} Td", fmt_num(dx), fmt_num(dy)));
            self.apply_text_offset(dx, dy);

            if justify {
                let extra = (box_width - line_width) / spaces as f32 / scale;
                self.write_word_space(state.word_space + extra);
            }
            if !drawn.is_empty() {
                self.write_text(font, drawn, "Tj");
            }
            if justify {
                self.write_word_space(state.word_space);
            }

            printed += fitted;
            baseline -= line_height;
        }

        if printed < text.len() {
            return Err(PdfError::PageInsufficientSpace { printed });
        }
        Ok(printed)
    }

    // ---- measurement ----

    /// Width of `text` in the current font, size and spacing, scaled by
    /// the horizontal scaling.
    pub fn text_width(&self, text: impl AsRef<[u8]>) -> Result<f32> {
        let font = self.current_font_index()?;
        Ok(self.width_in_user_space(font, text.as_ref()))
    }

    /// Longest prefix of `text`, in bytes, that fits `width` in the current
    /// font and spacing.
    pub fn measure_text(
        &self,
        text: impl AsRef<[u8]>,
        width: f32,
        word_wrap: bool,
    ) -> Result<usize> {
        let font = self.current_font_index()?;
        let state = self.state();
        Ok(self.doc.fonts[font].font.measure_text(
            text,
            width,
            state.font_size,
            state.char_space,
            state.word_space,
            word_wrap,
        ))
    }

    fn current_font_index(&self) -> Result<usize> {
        let font = self.state().font.ok_or(PdfError::PageFontNotFound)?;
        self.doc.font_index(font)
    }

    /// Font arena index for showing `text`, after the length check.
    fn text_font(&self, text: &[u8]) -> Result<usize> {
        let font = self.current_font_index()?;
        if text.len() > MAX_TEXT_LEN {
            return Err(PdfError::StringOutOfRange(text.len()));
        }
        Ok(font)
    }

    fn width_in_user_space(&self, font: usize, text: &[u8]) -> f32 {
        let tw = self.doc.fonts[font].font.text_width(text);
        let state = self.state();
        let width = tw.width as f32 * state.font_size / 1000.0
            + state.char_space * tw.numchars as f32
            + state.word_space * tw.numspace as f32;
        width * state.horizontal_scaling / 100.0
    }

    /// Writes the string operand and operator, then advances the text
    /// position by the string's width.
    fn write_text(&mut self, font: usize, text: &[u8], operator: &str) {
        self.write_text_with(font, text, "", operator);
    }

    /// `operands` precede the string, as for `"`.
    fn write_text_with(&mut self, font: usize, text: &[u8], operands: &str, operator: &str) {
        let mut line = operands.as_bytes().to_vec();
        if self.doc.fonts[font].font.is_double_byte() {
            line.extend_from_slice(hex_literal(text).as_bytes());
        } else {
            line.extend_from_slice(&escape_literal(text));
        }
        line.push(b' ');
        line.extend_from_slice(operator.as_bytes());
        self.emit(line);

        let advance = self.width_in_user_space(font, text);
        let tm = &mut self.text_matrix;
        tm.x += advance * tm.a;
        tm.y += advance * tm.b;
        self.text_pos = Point::new(self.text_matrix.x, self.text_matrix.y);
    }
}

fn check_spacing(what: &str, value: f32) -> Result<()> {
    if !(MIN_CHAR_SPACE..=MAX_CHAR_SPACE).contains(&value) {
        return Err(PdfError::PageOutOfRange(format!("{what} {value}")));
    }
    Ok(())
}

fn trim_trailing_white_space(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|&b| !is_white_space(b))
        .map_or(0, |i| i + 1);
    &line[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Document;
    use pretty_assertions::assert_eq;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn with_text_page(f: impl FnOnce(&mut PageMut<'_>, FontRef)) {
        let mut doc = Document::new();
        let font = doc.get_font("Helvetica", None).unwrap();
        let handle = doc.add_page().unwrap();
        let mut page = doc.page(handle).unwrap();
        page.begin_text().unwrap();
        f(&mut page, font);
    }

    #[test]
    fn test_show_text_advances_by_width() {
        with_text_page(|page, font| {
            page.set_font_and_size(font, 12.0).unwrap();
            page.move_text_pos(100.0, 700.0).unwrap();
            let width = page.text_width("A").unwrap();
            assert!(close(width, 667.0 * 12.0 / 1000.0));

            page.show_text("A").unwrap();
            let pos = page.current_text_pos();
            assert!(close(pos.x, 100.0 + width));
            assert!(close(pos.y, 700.0));
            page.end_text().unwrap();

            let content = String::from_utf8_lossy(page.content()).into_owned();
            assert_eq!(content, "BT\n/F1 12 Tf\n100 700 Td\n(A) Tj\nET\n");
        });
    }

    #[test]
    fn test_show_text_requires_font_and_text_mode() {
        with_text_page(|page, font| {
            assert!(matches!(page.show_text("x"), Err(PdfError::PageFontNotFound)));
            page.set_font_and_size(font, 10.0).unwrap();
            let long = vec![b'a'; MAX_TEXT_LEN + 1];
            assert!(matches!(page.show_text(&long), Err(PdfError::StringOutOfRange(_))));

            page.end_text().unwrap();
            page.move_to(0.0, 0.0).unwrap();
            assert!(matches!(
                page.show_text("x"),
                Err(PdfError::InvalidGraphicsMode { .. })
            ));
            assert_eq!(page.gmode(), GraphicsMode::PathObject);
        });
    }

    #[test]
    fn test_font_size_and_spacing_limits() {
        with_text_page(|page, font| {
            assert!(matches!(
                page.set_font_and_size(font, 0.0),
                Err(PdfError::PageInvalidFontSize(_))
            ));
            assert!(page.set_font_and_size(font, 601.0).is_err());
            page.set_font_and_size(font, 600.0).unwrap();
            assert!(page.set_char_space(-31.0).is_err());
            assert!(page.set_word_space(301.0).is_err());
            assert!(page.set_horizontal_scaling(9.0).is_err());
            page.set_horizontal_scaling(50.0).unwrap();
            assert_eq!(page.horizontal_scaling(), 50.0);
        });
    }

    #[test]
    fn test_leading_and_next_line() {
        with_text_page(|page, font| {
            page.set_font_and_size(font, 10.0).unwrap();
            page.move_text_pos_set_leading(50.0, -14.0).unwrap();
            assert_eq!(page.text_leading(), 14.0);
            page.move_to_next_line().unwrap();
            assert!(close(page.current_text_pos().y, -28.0));

            page.show_text_next_line("abc").unwrap();
            assert!(close(page.current_text_pos().y, -42.0));
            page.show_text_next_line_ex(2.0, 1.0, "a b").unwrap();
            assert_eq!(page.word_space(), 2.0);
            assert_eq!(page.char_space(), 1.0);
            assert!(String::from_utf8_lossy(page.content()).ends_with("2 1 (a b) \"\n"));
        });
    }

    #[test]
    fn test_text_matrix_and_text_out() {
        with_text_page(|page, font| {
            page.set_font_and_size(font, 10.0).unwrap();
            page.set_text_matrix(2.0, 0.0, 0.0, 2.0, 10.0, 10.0).unwrap();
            page.text_out(110.0, 50.0, "").unwrap();
            let pos = page.current_text_pos();
            assert!(close(pos.x, 110.0) && close(pos.y, 50.0));
            assert!(String::from_utf8_lossy(page.content()).contains("50 20 Td\n"));

            assert!(matches!(
                page.set_text_matrix(0.0, 0.0, 0.0, 0.0, 0.0, 0.0),
                Err(PdfError::InvalidParameter(_))
            ));
        });
    }

    #[test]
    fn test_text_rect_reports_partial_fit() {
        with_text_page(|page, font| {
            page.set_font_and_size(font, 10.0).unwrap();
            let placed = page
                .text_rect(0.0, 100.0, 500.0, 0.0, "short line", TextAlignment::Left)
                .unwrap();
            assert_eq!(placed, 10);

            let text = "one two three four five six seven eight nine ten";
            match page.text_rect(0.0, 30.0, 60.0, 10.0, text, TextAlignment::Justify) {
                Err(PdfError::PageInsufficientSpace { printed }) => {
                    assert!(printed > 0 && printed < text.len());
                }
                other => panic!("unexpected result {other:?}"),
            }
            assert_eq!(page.word_space(), 0.0);
        });
    }

    #[test]
    fn test_alignment_positions() {
        with_text_page(|page, font| {
            page.set_font_and_size(font, 10.0).unwrap();
            let width = page.text_width("abc").unwrap();
            page.text_rect(0.0, 100.0, 200.0, 0.0, "abc", TextAlignment::Right)
                .unwrap();
            assert!(close(page.current_text_pos().x, 200.0));
            page.text_rect(0.0, 100.0, 200.0, 0.0, "abc", TextAlignment::Center)
                .unwrap();
            assert!(close(page.current_text_pos().x, 100.0 + width / 2.0));
        });
    }

    #[test]
    fn test_measure_text_uses_current_state() {
        with_text_page(|page, font| {
            assert!(page.measure_text("abc", 100.0, false).is_err());
            page.set_font_and_size(font, 10.0).unwrap();
            assert_eq!(page.measure_text("abc def", 1000.0, true).unwrap(), 7);
            let fitted = page.measure_text("abc def", 25.0, true).unwrap();
            assert_eq!(fitted, 4);
        });
    }
}
