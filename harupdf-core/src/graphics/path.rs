use crate::error::{PdfError, Result};
use crate::graphics::Point;

/// Control-point distance for a quarter circle approximated by one cubic.
pub const KAPPA: f32 = 0.552_284_75;

pub(crate) const MAX_DASH_PATTERN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LineCap {
    #[default]
    Butt = 0,
    Round = 1,
    ProjectingSquare = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LineJoin {
    #[default]
    Miter = 0,
    Round = 1,
    Bevel = 2,
}

/// Dash pattern and phase (`d` operands).
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashMode {
    pattern: Vec<f32>,
    phase: u32,
}

impl DashMode {
    /// At most eight elements, none negative and not all zero; the phase
    /// may not exceed the element count. An empty pattern is a solid line
    /// and requires phase 0.
    pub fn new(pattern: &[f32], phase: u32) -> Result<Self> {
        if pattern.len() > MAX_DASH_PATTERN {
            return Err(PdfError::PageOutOfRange(format!(
                "dash pattern has {} elements, at most {MAX_DASH_PATTERN} allowed",
                pattern.len()
            )));
        }
        if phase as usize > pattern.len() {
            return Err(PdfError::PageOutOfRange(format!(
                "dash phase {phase} exceeds pattern length {}",
                pattern.len()
            )));
        }
        if pattern.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(PdfError::PageOutOfRange(
                "dash elements must be non-negative".to_string(),
            ));
        }
        if !pattern.is_empty() && pattern.iter().all(|v| *v == 0.0) {
            return Err(PdfError::PageOutOfRange(
                "dash elements are all zero".to_string(),
            ));
        }

        Ok(Self {
            pattern: pattern.to_vec(),
            phase,
        })
    }

    pub fn solid() -> Self {
        Self::default()
    }

    pub fn pattern(&self) -> &[f32] {
        &self.pattern
    }

    pub fn phase(&self) -> u32 {
        self.phase
    }
}

/// One cubic Bézier segment continuing from the current point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BezierSegment {
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

/// Cubic approximation of a circular arc.
///
/// Angles are in degrees, counter-clockwise from 3 o'clock. Requires
/// `ang1 < ang2` and a sweep below 360. Returns the start point and at
/// least one segment, each spanning at most 90 degrees.
pub fn arc_segments(
    x: f32,
    y: f32,
    radius: f32,
    ang1: f32,
    ang2: f32,
) -> Result<(Point, Vec<BezierSegment>)> {
    if radius < 0.0 {
        return Err(PdfError::PageOutOfRange(format!("arc radius {radius}")));
    }
    if !(ang1 < ang2) || ang2 - ang1 >= 360.0 {
        return Err(PdfError::PageOutOfRange(format!(
            "arc angles {ang1}..{ang2}"
        )));
    }

    let point_at = |deg: f32| {
        let rad = deg.to_radians();
        Point::new(x + radius * rad.cos(), y + radius * rad.sin())
    };

    let start = point_at(ang1);
    let mut segments = Vec::new();
    let mut from = ang1;
    while from < ang2 {
        let to = (from + 90.0).min(ang2);
        let (t1, t2) = (from.to_radians(), to.to_radians());
        let k = 4.0 / 3.0 * ((t2 - t1) / 4.0).tan() * radius;

        let p0 = point_at(from);
        let p3 = point_at(to);
        segments.push(BezierSegment {
            c1: Point::new(p0.x - k * t1.sin(), p0.y + k * t1.cos()),
            c2: Point::new(p3.x + k * t2.sin(), p3.y - k * t2.cos()),
            end: p3,
        });
        from = to;
    }

    Ok((start, segments))
}

/// Four quarter curves around `(x, y)`, starting and ending at the leftmost point.
pub fn ellipse_segments(x: f32, y: f32, xr: f32, yr: f32) -> (Point, [BezierSegment; 4]) {
    let kx = xr * KAPPA;
    let ky = yr * KAPPA;
    let seg = |c1: (f32, f32), c2: (f32, f32), end: (f32, f32)| BezierSegment {
        c1: Point::new(c1.0, c1.1),
        c2: Point::new(c2.0, c2.1),
        end: Point::new(end.0, end.1),
    };

    (
        Point::new(x - xr, y),
        [
            seg((x - xr, y + ky), (x - kx, y + yr), (x, y + yr)),
            seg((x + kx, y + yr), (x + xr, y + ky), (x + xr, y)),
            seg((x + xr, y - ky), (x + kx, y - yr), (x, y - yr)),
            seg((x - kx, y - yr), (x - xr, y - ky), (x - xr, y)),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_line_cap_values() {
        assert_eq!(LineCap::Butt as u8, 0);
        assert_eq!(LineCap::Round as u8, 1);
        assert_eq!(LineCap::ProjectingSquare as u8, 2);
        assert_eq!(LineCap::default(), LineCap::Butt);
    }

    #[test]
    fn test_line_join_values() {
        assert_eq!(LineJoin::Miter as u8, 0);
        assert_eq!(LineJoin::Round as u8, 1);
        assert_eq!(LineJoin::Bevel as u8, 2);
    }

    #[test]
    fn test_dash_validation() {
        let dash = DashMode::new(&[3.0, 7.0], 2).unwrap();
        assert_eq!(dash.pattern(), &[3.0, 7.0]);
        assert_eq!(dash.phase(), 2);

        assert!(DashMode::new(&[], 0).is_ok());
        assert!(DashMode::new(&[1.0; 8], 8).is_ok());
        assert!(DashMode::new(&[1.0; 9], 0).is_err());
        assert!(DashMode::new(&[3.0, 7.0], 3).is_err());
        assert!(DashMode::new(&[], 1).is_err());
        assert!(DashMode::new(&[0.0, 0.0], 0).is_err());
        assert!(DashMode::new(&[-1.0, 2.0], 0).is_err());
    }

    #[test]
    fn test_quarter_arc() {
        let (start, segments) = arc_segments(0.0, 0.0, 100.0, 0.0, 90.0).unwrap();
        assert!(close(start.x, 100.0) && close(start.y, 0.0));
        assert_eq!(segments.len(), 1);

        let seg = segments[0];
        assert!(close(seg.c1.x, 100.0));
        assert!(close(seg.c1.y, 100.0 * KAPPA));
        assert!(close(seg.c2.x, 100.0 * KAPPA));
        assert!(close(seg.c2.y, 100.0));
        assert!(close(seg.end.x, 0.0) && close(seg.end.y, 100.0));
    }

    #[test]
    fn test_arc_splits_into_quarters() {
        let (_, segments) = arc_segments(50.0, 50.0, 10.0, 0.0, 270.0).unwrap();
        assert_eq!(segments.len(), 3);

        let (_, segments) = arc_segments(50.0, 50.0, 10.0, 10.0, 200.0).unwrap();
        assert_eq!(segments.len(), 3);
        let last = segments[2].end;
        let rad = 200f32.to_radians();
        assert!(close(last.x, 50.0 + 10.0 * rad.cos()));
        assert!(close(last.y, 50.0 + 10.0 * rad.sin()));
    }

    #[test]
    fn test_arc_rejects_bad_angles() {
        assert!(arc_segments(0.0, 0.0, 1.0, 90.0, 90.0).is_err());
        assert!(arc_segments(0.0, 0.0, 1.0, 90.0, 10.0).is_err());
        assert!(arc_segments(0.0, 0.0, 1.0, 0.0, 360.0).is_err());
        assert!(arc_segments(0.0, 0.0, 1.0, -45.0, 300.0).is_ok());
    }

    #[test]
    fn test_ellipse_closes_on_start() {
        let (start, segments) = ellipse_segments(100.0, 100.0, 40.0, 20.0);
        assert_eq!(start, Point::new(60.0, 100.0));
        assert_eq!(segments[0].end, Point::new(100.0, 120.0));
        assert_eq!(segments[1].end, Point::new(140.0, 100.0));
        assert_eq!(segments[2].end, Point::new(100.0, 80.0));
        assert_eq!(segments[3].end, start);
    }
}
