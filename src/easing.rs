//! Easing curves for the disc tween.
//!
//! Pure functions of a normalized progress value, no state.

/// Easing curve applied to a normalized progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant velocity
    #[default]
    Linear,
    /// Fast start, slow end
    CubicOut,
    /// Flat for most of the range, then a steep climb
    ExpoIn,
    /// Steep start, then flat
    ExpoOut,
}

impl Easing {
    /// Apply the curve to `t`, clamped to [0, 1]
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::CubicOut => 1.0 - (1.0 - t).powi(3),
            Easing::ExpoIn => {
                if t == 0.0 {
                    0.0
                } else {
                    2.0_f32.powf(10.0 * t - 10.0)
                }
            },
            Easing::ExpoOut => {
                if t == 1.0 {
                    1.0
                } else {
                    1.0 - 2.0_f32.powf(-10.0 * t)
                }
            },
        }
    }
}

/// Interpolate from `start` to `end` along an eased progress `p`
#[inline]
pub fn tween(start: f32, end: f32, p: f32, easing: Easing) -> f32 {
    start + (end - start) * easing.apply(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        for easing in [
            Easing::Linear,
            Easing::CubicOut,
            Easing::ExpoIn,
            Easing::ExpoOut,
        ] {
            assert!(easing.apply(0.0).abs() < 0.001, "{:?} at 0", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 0.001, "{:?} at 1", easing);
        }
    }

    #[test]
    fn test_out_curves_lead_in_curves() {
        assert!(Easing::CubicOut.apply(0.5) > 0.5);
        assert!(Easing::ExpoOut.apply(0.5) > Easing::CubicOut.apply(0.5));
        assert!(Easing::ExpoIn.apply(0.5) < 0.05);
    }

    #[test]
    fn test_tween_reverses_range() {
        // Disc scale runs from 1 down to 0
        assert_eq!(tween(1.0, 0.0, 0.0, Easing::CubicOut), 1.0);
        assert!((tween(1.0, 0.0, 0.5, Easing::Linear) - 0.5).abs() < 1e-6);
        assert!(tween(1.0, 0.0, 1.0, Easing::ExpoOut).abs() < 1e-6);
    }

    #[test]
    fn test_input_is_clamped() {
        assert_eq!(Easing::CubicOut.apply(-1.0), 0.0);
        assert_eq!(Easing::ExpoIn.apply(2.0), 1.0);
    }
}
