//! Easing curves for tweens.

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    /// Constant speed; used for book and camera moves.
    #[default]
    Linear,
    QuadraticIn,
    QuadraticOut,
    /// Slow start and end; used for page flips.
    QuadraticInOut,
}

impl Easing {
    /// Eased progress for `t`, clamped to `[0, 1]`.
    #[inline]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadraticIn => t * t,
            Easing::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Easing::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let omt = 1.0 - t;
                    1.0 - 2.0 * omt * omt
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_fixed() {
        for e in [
            Easing::Linear,
            Easing::QuadraticIn,
            Easing::QuadraticOut,
            Easing::QuadraticInOut,
        ] {
            assert_eq!(e.evaluate(0.0), 0.0, "{e:?}");
            assert_eq!(e.evaluate(1.0), 1.0, "{e:?}");
        }
    }

    #[test]
    fn in_out_is_symmetric() {
        let e = Easing::QuadraticInOut;
        assert_eq!(e.evaluate(0.5), 0.5);
        assert!((e.evaluate(0.25) + e.evaluate(0.75) - 1.0).abs() < 1e-6);
        assert!(e.evaluate(0.25) < 0.25);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::Linear.evaluate(-0.5), 0.0);
        assert_eq!(Easing::QuadraticInOut.evaluate(1.5), 1.0);
    }
}
