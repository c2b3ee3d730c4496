use std::fmt;

use serde::{Deserialize, Serialize};

use crate::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::opaque(0, 0, 0);
    pub const WHITE: Rgba = Rgba::opaque(255, 255, 255);
    pub const RED: Rgba = Rgba::opaque(255, 0, 0);
    pub const BLUE: Rgba = Rgba::opaque(0, 0, 255);

    #[must_use]
    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// CSS `rgba(...)` form with a unit-interval alpha.
    #[must_use]
    pub fn css(&self) -> String {
        let alpha = f64::from(self.a) / 255.0;
        format!("rgba({},{},{},{:.1})", self.r, self.g, self.b, alpha)
    }
}

impl fmt::Display for Rgba {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.css())
    }
}

/// What a line in the net means to whoever cuts and folds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SegmentKind {
    Cut,
    /// Valley fold.
    FoldAway,
    /// Mountain fold.
    FoldToward,
}

impl SegmentKind {
    #[must_use]
    pub const fn color(self) -> Rgba {
        match self {
            SegmentKind::Cut => Rgba::BLACK,
            SegmentKind::FoldAway => Rgba::BLUE,
            SegmentKind::FoldToward => Rgba::RED,
        }
    }

    #[must_use]
    pub const fn is_dashed(self) -> bool {
        !matches!(self, SegmentKind::Cut)
    }

    /// Inverse of [`SegmentKind::color`] for the three palette colors.
    #[must_use]
    pub fn from_color(color: Rgba) -> Option<Self> {
        [SegmentKind::Cut, SegmentKind::FoldAway, SegmentKind::FoldToward]
            .into_iter()
            .find(|kind| kind.color() == color)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            SegmentKind::Cut => "Cut lines",
            SegmentKind::FoldAway => "Fold away",
            SegmentKind::FoldToward => "Fold toward",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub kind: SegmentKind,
    pub from: Point2,
    pub to: Point2,
}

impl Segment {
    #[must_use]
    pub const fn new(kind: SegmentKind, from: Point2, to: Point2) -> Self {
        Self { kind, from, to }
    }

    #[must_use]
    pub const fn cut(from: Point2, to: Point2) -> Self {
        Self::new(SegmentKind::Cut, from, to)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub family: &'static str,
    pub size: f64,
    pub color: Rgba,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            family: "Arial",
            size: 24.0,
            color: Rgba::BLACK,
        }
    }
}
