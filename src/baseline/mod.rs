// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Baseline keys and polarisations.


use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// An antenna identifier, as used in antenna position maps.
pub type Ant = usize;

/// A visibility polarisation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    EnumIter,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum Pol {
    NN,
    EE,
    NE,
    EN,
    XX,
    YY,
    XY,
    YX,
}

/// A baseline key: two antennas and a polarisation. The separation vector of
/// a baseline points from `ant1` to `ant2`.
///
/// `(a, b, pol)` and `(b, a, pol)` describe the same physical baseline; the
/// second is the conjugate of the first. Anything looking up baselines should
/// use [`Baseline::canonical`] so that either ordering resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Baseline {
    pub ant1: Ant,
    pub ant2: Ant,
    pub pol: Pol,
}

impl Baseline {
    pub fn new(ant1: Ant, ant2: Ant, pol: Pol) -> Baseline {
        Baseline { ant1, ant2, pol }
    }

    /// Swap the antennas of this baseline (i.e. conjugate it).
    pub fn reversed(self) -> Baseline {
        Baseline {
            ant1: self.ant2,
            ant2: self.ant1,
            pol: self.pol,
        }
    }

    /// Get the ordering of this baseline with `ant1 <= ant2`, and whether
    /// that required reversing it.
    pub fn canonical(self) -> (Baseline, bool) {
        if self.ant1 <= self.ant2 {
            (self, false)
        } else {
            (self.reversed(), true)
        }
    }

    /// Is this baseline the same as `other`, regardless of antenna ordering?
    pub fn is_conjugate_equal(self, other: Baseline) -> bool {
        self.canonical().0 == other.canonical().0
    }
}

impl From<(Ant, Ant, Pol)> for Baseline {
    fn from((ant1, ant2, pol): (Ant, Ant, Pol)) -> Self {
        Baseline::new(ant1, ant2, pol)
    }
}

impl fmt::Display for Baseline {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {}, {})", self.ant1, self.ant2, self.pol)
    }
}
