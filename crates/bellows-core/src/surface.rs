use std::convert::Infallible;

use crate::{Affine, Point2, Rgba, Segment, TextStyle};

/// A 2D vector drawing sink with canvas-style state.
///
/// Points passed to `move_to`/`line_to`/`fill_text`/`fill_rect` are interpreted in the
/// coordinate system produced by every `translate`/`rotate` issued so far. `stroke` and
/// `stroke_dashed` consume the pending path.
pub trait DrawingSurface {
    type Error: std::error::Error + Send + Sync + 'static;

    fn translate(&mut self, dx: f64, dy: f64);
    fn rotate(&mut self, radians: f64);

    fn move_to(&mut self, p: Point2);
    fn line_to(&mut self, p: Point2);

    fn stroke(&mut self, color: Rgba) -> Result<(), Self::Error>;
    fn stroke_dashed(&mut self, color: Rgba, dash: [f64; 2]) -> Result<(), Self::Error>;

    fn fill_rect(
        &mut self,
        origin: Point2,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), Self::Error>;

    fn fill_text(&mut self, text: &str, at: Point2, style: &TextStyle) -> Result<(), Self::Error>;

    /// Stroke a single segment in its kind's color, dashed for fold kinds.
    fn draw_segment(&mut self, segment: &Segment, dash: [f64; 2]) -> Result<(), Self::Error> {
        self.move_to(segment.from);
        self.line_to(segment.to);
        if segment.kind.is_dashed() {
            self.stroke_dashed(segment.kind.color(), dash)
        } else {
            self.stroke(segment.kind.color())
        }
    }
}

/// Subpaths collected between strokes, already mapped through the surface transform.
#[derive(Debug, Clone, Default)]
pub struct PendingPath {
    subpaths: Vec<Vec<Point2>>,
}

impl PendingPath {
    pub fn move_to(&mut self, p: Point2) {
        self.subpaths.push(vec![p]);
    }

    pub fn line_to(&mut self, p: Point2) {
        match self.subpaths.last_mut() {
            Some(sub) => sub.push(p),
            // Canvas semantics: a lineTo with no current point behaves as moveTo.
            None => self.subpaths.push(vec![p]),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subpaths.iter().all(|s| s.len() < 2)
    }

    /// Drain the path, dropping subpaths that never got a second point.
    pub fn take(&mut self) -> Vec<Vec<Point2>> {
        std::mem::take(&mut self.subpaths)
            .into_iter()
            .filter(|s| s.len() >= 2)
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        corners: [Point2; 4],
        color: Rgba,
    },
    Stroke {
        points: Vec<Point2>,
        color: Rgba,
        dash: Option<[f64; 2]>,
    },
    Text {
        text: String,
        at: Point2,
        transform: Affine,
        style: TextStyle,
    },
}

/// Surface that keeps every command in page coordinates instead of drawing it.
#[derive(Debug, Clone, Default)]
pub struct Recorder {
    transform: Affine,
    path: PendingPath,
    commands: Vec<DrawCommand>,
}

impl Recorder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    #[must_use]
    pub fn transform(&self) -> Affine {
        self.transform
    }

    fn push_strokes(&mut self, color: Rgba, dash: Option<[f64; 2]>) {
        for points in self.path.take() {
            self.commands.push(DrawCommand::Stroke {
                points,
                color,
                dash,
            });
        }
    }
}

impl DrawingSurface for Recorder {
    type Error = Infallible;

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.translate(dx, dy);
    }

    fn rotate(&mut self, radians: f64) {
        self.transform.rotate(radians);
    }

    fn move_to(&mut self, p: Point2) {
        self.path.move_to(self.transform.apply(p));
    }

    fn line_to(&mut self, p: Point2) {
        self.path.line_to(self.transform.apply(p));
    }

    fn stroke(&mut self, color: Rgba) -> Result<(), Infallible> {
        self.push_strokes(color, None);
        Ok(())
    }

    fn stroke_dashed(&mut self, color: Rgba, dash: [f64; 2]) -> Result<(), Infallible> {
        self.push_strokes(color, Some(dash));
        Ok(())
    }

    fn fill_rect(
        &mut self,
        origin: Point2,
        width: f64,
        height: f64,
        color: Rgba,
    ) -> Result<(), Infallible> {
        let corners = rect_corners(origin, width, height).map(|p| self.transform.apply(p));
        self.commands.push(DrawCommand::FillRect { corners, color });
        Ok(())
    }

    fn fill_text(&mut self, text: &str, at: Point2, style: &TextStyle) -> Result<(), Infallible> {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            at,
            transform: self.transform,
            style: *style,
        });
        Ok(())
    }
}

/// Corners of an axis-aligned rectangle, clockwise on a Y-down page.
#[must_use]
pub fn rect_corners(origin: Point2, width: f64, height: f64) -> [Point2; 4] {
    [
        origin,
        Point2::new(origin.x + width, origin.y),
        Point2::new(origin.x + width, origin.y + height),
        Point2::new(origin.x, origin.y + height),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SegmentKind;

    #[test]
    fn stroke_consumes_pending_path() {
        let mut rec = Recorder::new();
        rec.move_to(Point2::new(0.0, 0.0));
        rec.line_to(Point2::new(1.0, 0.0));
        rec.stroke(Rgba::BLACK).unwrap();
        rec.stroke(Rgba::BLACK).unwrap();
        assert_eq!(rec.commands().len(), 1);
    }

    #[test]
    fn recorded_points_are_in_page_space() {
        let mut rec = Recorder::new();
        rec.translate(100.0, 50.0);
        let seg = Segment::new(
            SegmentKind::FoldAway,
            Point2::new(0.0, 0.0),
            Point2::new(10.0, 0.0),
        );
        rec.draw_segment(&seg, [2.0, 1.0]).unwrap();
        match &rec.commands()[0] {
            DrawCommand::Stroke {
                points,
                color,
                dash,
            } => {
                assert_eq!(points[0], Point2::new(100.0, 50.0));
                assert_eq!(points[1], Point2::new(110.0, 50.0));
                assert_eq!(*color, Rgba::BLUE);
                assert_eq!(*dash, Some([2.0, 1.0]));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn lone_move_to_is_not_stroked() {
        let mut rec = Recorder::new();
        rec.move_to(Point2::new(3.0, 3.0));
        rec.stroke(Rgba::RED).unwrap();
        assert!(rec.commands().is_empty());
    }
}
