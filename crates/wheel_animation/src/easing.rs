//! Easing functions for tweens

use serde::{Deserialize, Serialize};

/// Easing function type
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    EaseOut,
    EaseInOut,
    /// Decelerating curve `1 - (1 - t)^(2 * factor)`.
    ///
    /// Factor 1.0 is a plain quadratic ease-out; larger factors front-load
    /// more of the motion, which is what settling wheels feel like.
    Decelerate(f32),
}

impl Easing {
    /// Curve used for wheel snapping and step scrolling
    pub const WHEEL: Easing = Easing::Decelerate(2.5);

    /// Apply the easing function to a progress value (0.0 to 1.0)
    ///
    /// Progress is clamped, so the endpoints are always exact.
    pub fn apply(&self, t: f32) -> f32 {
        if t <= 0.0 || t.is_nan() {
            return 0.0;
        }
        if t >= 1.0 {
            return 1.0;
        }

        match self {
            Easing::Linear => t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
            Easing::Decelerate(factor) => {
                let factor = if factor.is_finite() && *factor > 0.0 {
                    *factor
                } else {
                    1.0
                };
                1.0 - (1.0 - t).powf(2.0 * factor)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 4] = [
        Easing::Linear,
        Easing::EaseOut,
        Easing::EaseInOut,
        Easing::WHEEL,
    ];

    #[test]
    fn test_endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.apply(0.0), 0.0, "{easing:?} at 0");
            assert_eq!(easing.apply(1.0), 1.0, "{easing:?} at 1");
        }
    }

    #[test]
    fn test_out_of_range_progress_is_clamped() {
        for easing in ALL {
            assert_eq!(easing.apply(-3.0), 0.0);
            assert_eq!(easing.apply(7.5), 1.0);
            assert_eq!(easing.apply(f32::NAN), 0.0);
        }
    }

    #[test]
    fn test_decelerate_matches_quadratic_at_factor_one() {
        let t = 0.3;
        let expected = 1.0 - (1.0 - t) * (1.0 - t);
        assert!((Easing::Decelerate(1.0).apply(t) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_decelerate_front_loads_motion() {
        // Halfway through, a 2.5 factor has covered nearly all the distance
        assert!(Easing::WHEEL.apply(0.5) > 0.95);
        assert!(Easing::WHEEL.apply(0.5) > Easing::Linear.apply(0.5));
    }

    #[test]
    fn test_bad_decelerate_factor_falls_back() {
        let bad = Easing::Decelerate(-1.0).apply(0.4);
        let quadratic = Easing::Decelerate(1.0).apply(0.4);
        assert_eq!(bad, quadratic);
    }

    proptest::proptest! {
        #[test]
        fn prop_output_stays_in_unit_range(t in -2.0f32..3.0, factor in 0.1f32..6.0) {
            for easing in [Easing::Linear, Easing::EaseOut, Easing::EaseInOut, Easing::Decelerate(factor)] {
                let v = easing.apply(t);
                proptest::prop_assert!((0.0..=1.0).contains(&v), "{:?}({}) = {}", easing, t, v);
            }
        }
    }

    #[test]
    fn test_curves_are_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for step in 0..=100 {
                let v = easing.apply(step as f32 / 100.0);
                assert!(v >= prev, "{easing:?} decreased at step {step}");
                prev = v;
            }
        }
    }
}
