/// Round to the nearest integer with ties going towards +infinity.
///
/// This is the rounding the printed patterns have always used; it differs from
/// [`f64::round`] on negative ties (`-2.5` becomes `-2`, not `-3`).
#[must_use]
pub fn round_half_up(v: f64) -> f64 {
    (v + 0.5).floor()
}

/// Inward offset of one side of a tapering edge at `pos` along a run of `length`.
///
/// Interpolates linearly from 0 at `pos == 0` to half of `back - front` at
/// `pos == length`, rounded to whole dots. `length` must be non-zero.
#[must_use]
pub fn taper(back: f64, front: f64, length: f64, pos: f64) -> f64 {
    if back == front {
        return 0.0;
    }
    let half_diff = (back - front) / 2.0;
    // Multiply first so `pos == length` reproduces `half_diff` exactly.
    round_half_up(half_diff * pos / length)
}

/// A [`taper`] with its dimensions bound, evaluated at different positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaperProfile {
    pub back: f64,
    pub front: f64,
    pub length: f64,
}

impl TaperProfile {
    #[must_use]
    pub const fn new(back: f64, front: f64, length: f64) -> Self {
        Self {
            back,
            front,
            length,
        }
    }

    #[must_use]
    pub fn at(&self, pos: f64) -> f64 {
        taper(self.back, self.front, self.length, pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ties_round_up() {
        assert_eq!(round_half_up(2.5), 3.0);
        assert_eq!(round_half_up(-2.5), -2.0);
        assert_eq!(round_half_up(-2.6), -3.0);
    }

    #[test]
    fn no_taper_when_ends_match() {
        assert_eq!(taper(472.0, 472.0, 3272.5, 1000.0), 0.0);
    }

    #[test]
    fn midway_is_half_the_offset() {
        // (600 - 400) / 2 = 100 over the full run, 50 halfway.
        assert_eq!(taper(600.0, 400.0, 1000.0, 500.0), 50.0);
    }

    #[test]
    fn widening_taper_is_negative() {
        assert_eq!(taper(400.0, 472.0, 1000.0, 1000.0), -36.0);
    }

    proptest! {
        #[test]
        fn starts_at_zero(back in 1u32..2000, front in 1u32..2000, folds in 1u32..200, half_pitch in 1u32..200) {
            let length = f64::from(folds) * f64::from(half_pitch) / 2.0;
            prop_assert_eq!(taper(f64::from(back), f64::from(front), length, 0.0), 0.0);
        }

        #[test]
        fn ends_at_rounded_half_difference(back in 1u32..2000, front in 1u32..2000, folds in 1u32..200, half_pitch in 1u32..200) {
            prop_assume!(back != front);
            let (back, front) = (f64::from(back), f64::from(front));
            let length = f64::from(folds) * f64::from(half_pitch) / 2.0;
            prop_assert_eq!(taper(back, front, length, length), round_half_up((back - front) / 2.0));
        }

        #[test]
        fn equal_ends_never_taper(x in 1u32..2000, length in 1.0f64..10_000.0, pos in 0.0f64..10_000.0) {
            prop_assert_eq!(taper(f64::from(x), f64::from(x), length, pos), 0.0);
        }
    }
}
