// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Axis-aligned bounding envelope of a city object

use std::fmt;

/// Axis-aligned bounds in f64 precision
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Envelope {
    /// Lower corner (x, y, z)
    pub lower: [f64; 3],
    /// Upper corner (x, y, z)
    pub upper: [f64; 3],
}

impl Envelope {
    /// Create an empty envelope that any point will expand
    pub fn new() -> Self {
        Self {
            lower: [f64::MAX; 3],
            upper: [f64::MIN; 3],
        }
    }

    /// Create an envelope from two corners as given by the source document
    pub fn from_corners(lower: [f64; 3], upper: [f64; 3]) -> Self {
        Self { lower, upper }
    }

    /// Check if at least one point or a corner pair has been set
    #[inline]
    pub fn is_valid(&self) -> bool {
        (0..3).all(|i| self.lower[i] <= self.upper[i])
    }

    /// Expand bounds to include a point
    #[inline]
    pub fn expand(&mut self, x: f64, y: f64, z: f64) {
        self.lower[0] = self.lower[0].min(x);
        self.lower[1] = self.lower[1].min(y);
        self.lower[2] = self.lower[2].min(z);
        self.upper[0] = self.upper[0].max(x);
        self.upper[1] = self.upper[1].max(y);
        self.upper[2] = self.upper[2].max(z);
    }

    /// Grow to cover another envelope
    pub fn union(&mut self, other: &Envelope) {
        if !other.is_valid() {
            return;
        }
        let [x0, y0, z0] = other.lower;
        let [x1, y1, z1] = other.upper;
        self.expand(x0, y0, z0);
        self.expand(x1, y1, z1);
    }
}

impl Default for Envelope {
    fn default() -> Self {
        Self::new()
    }
}

/// `lx ly lz ux uy uz`, or `empty`
impl fmt::Display for Envelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.is_valid() {
            return f.write_str("empty");
        }
        let [lx, ly, lz] = self.lower;
        let [ux, uy, uz] = self.upper;
        write!(f, "{} {} {} {} {} {}", lx, ly, lz, ux, uy, uz)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_creation() {
        let env = Envelope::new();
        assert!(!env.is_valid());
        assert_eq!(env.to_string(), "empty");
    }

    #[test]
    fn test_envelope_expand() {
        let mut env = Envelope::new();
        env.expand(1.0, 2.0, 3.0);
        assert!(env.is_valid());
        env.expand(-1.0, 5.0, 0.0);

        assert_eq!(env.lower, [-1.0, 2.0, 0.0]);
        assert_eq!(env.upper, [1.0, 5.0, 3.0]);
    }

    #[test]
    fn test_envelope_union_ignores_empty() {
        let mut env = Envelope::from_corners([0.0; 3], [1.0; 3]);
        env.union(&Envelope::new());
        assert_eq!(env, Envelope::from_corners([0.0; 3], [1.0; 3]));

        env.union(&Envelope::from_corners([-2.0, 0.5, 0.5], [0.5, 3.0, 0.5]));
        assert_eq!(env.lower, [-2.0, 0.0, 0.0]);
        assert_eq!(env.upper, [1.0, 3.0, 1.0]);
    }

    #[test]
    fn test_envelope_display() {
        let env = Envelope::from_corners([0.0, 1.0, 2.0], [3.5, 4.0, 5.0]);
        assert_eq!(env.to_string(), "0 1 2 3.5 4 5");
    }
}
