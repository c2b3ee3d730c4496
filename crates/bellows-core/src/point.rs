use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Cumulative 2D affine transform in canvas order.
///
/// Stored as the matrix `[a c e; b d f]`. `translate` and `rotate` post-multiply, so each
/// call acts in the coordinate system left behind by the previous one, the same way a
/// 2D canvas context accumulates its transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    pub fn translate(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.e += self.a * dx + self.c * dy;
        self.f += self.b * dx + self.d * dy;
        self
    }

    /// Rotate by `radians`; positive angles turn +X towards +Y (clockwise on a Y-down page).
    pub fn rotate(&mut self, radians: f64) -> &mut Self {
        let (s, c) = radians.sin_cos();
        let (a, b, cc, d) = (self.a, self.b, self.c, self.d);
        self.a = a * c + cc * s;
        self.b = b * c + d * s;
        self.c = cc * c - a * s;
        self.d = d * c - b * s;
        self
    }

    #[must_use]
    pub fn apply(&self, p: Point2) -> Point2 {
        Point2 {
            x: self.a * p.x + self.c * p.y + self.e,
            y: self.b * p.x + self.d * p.y + self.f,
        }
    }

    #[must_use]
    pub fn as_array(&self) -> [f64; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}
