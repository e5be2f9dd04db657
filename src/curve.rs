//! Alignment-gated response curves.
//!
//! The locomotion force scales its acceleration by a curve evaluated at the
//! dot product between the desired direction and the current goal-velocity
//! direction. These curves are plain keyed data, not engine assets, so they
//! can be built in code and serialized with the rest of the config.

use bevy::prelude::*;

/// A piecewise-linear curve over the alignment dot product.
///
/// Keys are `(dot, multiplier)` pairs kept sorted by `dot`. Sampling clamps
/// to the first/last key outside the keyed range, so a single key behaves
/// like a constant. The domain of interest is `[-1.0, 1.0]` (a dot product
/// of unit vectors), but keys outside that range are accepted.
///
/// # Example
///
/// ```rust
/// use floating_character_controller::prelude::*;
///
/// // Accelerate twice as hard when reversing direction.
/// let curve = DotCurve::from_points([(-1.0, 2.0), (0.0, 1.0), (1.0, 1.0)]);
/// assert_eq!(curve.sample(-1.0), 2.0);
/// assert_eq!(curve.sample(1.0), 1.0);
/// ```
#[derive(Reflect, Debug, Clone, PartialEq)]
pub struct DotCurve {
    points: Vec<(f32, f32)>,
}

impl Default for DotCurve {
    fn default() -> Self {
        Self::constant(1.0)
    }
}

impl DotCurve {
    /// A curve that returns `value` everywhere.
    pub fn constant(value: f32) -> Self {
        Self {
            points: vec![(0.0, value)],
        }
    }

    /// Build a curve from `(dot, multiplier)` keys.
    ///
    /// Keys are sorted by their dot value; duplicates are kept in input
    /// order. An empty key list samples as `1.0`.
    pub fn from_points(points: impl Into<Vec<(f32, f32)>>) -> Self {
        let mut points = points.into();
        points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        Self { points }
    }

    /// Sample the curve at `dot`, interpolating linearly between keys and
    /// clamping outside the keyed range.
    pub fn sample(&self, dot: f32) -> f32 {
        let (Some(first), Some(last)) = (self.points.first(), self.points.last()) else {
            return 1.0;
        };
        if dot <= first.0 {
            return first.1;
        }
        if dot >= last.0 {
            return last.1;
        }
        for window in self.points.windows(2) {
            let (x0, y0) = window[0];
            let (x1, y1) = window[1];
            if dot >= x0 && dot <= x1 {
                if (x1 - x0).abs() <= f32::EPSILON {
                    return y1;
                }
                let t = (dot - x0) / (x1 - x0);
                return y0 + (y1 - y0) * t;
            }
        }
        last.1
    }

    /// Number of keys in the curve.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the curve has no keys.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
