// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Handle East, North and Height coordinates (typically associated with antenna
positions and the separations between them).
*/

use std::ops::{Div, Neg, Sub};

use serde::{Deserialize, Serialize};

/// East, North and Height coordinates of an antenna, or of a baseline (the
/// difference of two antenna positions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ENH {
    /// East \[metres\]
    pub e: f64,
    /// North \[metres\]
    pub n: f64,
    /// Height \[metres\]
    pub h: f64,
}

impl ENH {
    pub fn new(e: f64, n: f64, h: f64) -> ENH {
        ENH { e, n, h }
    }

    /// The Euclidean norm of these coordinates.
    pub fn norm(self) -> f64 {
        self.dot(self).sqrt()
    }

    pub fn dot(self, other: ENH) -> f64 {
        self.e * other.e + self.n * other.n + self.h * other.h
    }

    /// Scale these coordinates to unit length. A zero-length vector becomes
    /// all NaNs; callers deal with that themselves.
    pub fn normalised(self) -> ENH {
        self / self.norm()
    }

    /// The Euclidean distance between two sets of coordinates.
    pub fn distance(self, other: ENH) -> f64 {
        (self - other).norm()
    }
}

impl From<[f64; 3]> for ENH {
    fn from([e, n, h]: [f64; 3]) -> Self {
        ENH { e, n, h }
    }
}

impl Sub for ENH {
    type Output = ENH;

    fn sub(self, rhs: ENH) -> ENH {
        ENH {
            e: self.e - rhs.e,
            n: self.n - rhs.n,
            h: self.h - rhs.h,
        }
    }
}

impl Neg for ENH {
    type Output = ENH;

    fn neg(self) -> ENH {
        ENH {
            e: -self.e,
            n: -self.n,
            h: -self.h,
        }
    }
}

impl Div<f64> for ENH {
    type Output = ENH;

    fn div(self, rhs: f64) -> ENH {
        ENH {
            e: self.e / rhs,
            n: self.n / rhs,
            h: self.h / rhs,
        }
    }
}
