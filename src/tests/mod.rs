// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Helpful functions for tests.

use vec1::{vec1, Vec1};

use crate::{
    baseline::{Baseline, Pol},
    coord::ENH,
    geometry::AntennaPositions,
};

/// `num_ants` antennas on an east-west line, `spacing` metres apart.
pub(crate) fn east_west_line(num_ants: usize, spacing: f64) -> AntennaPositions {
    (0..num_ants)
        .map(|i| (i, ENH::new(i as f64 * spacing, 0.0, 0.0)))
        .collect()
}

/// A `side` by `side` square grid of antennas, `spacing` metres apart. The
/// antenna at row `r` (north) and column `c` (east) is numbered `r * side + c`.
pub(crate) fn square_grid(side: usize, spacing: f64) -> AntennaPositions {
    (0..side * side)
        .map(|i| {
            let (row, col) = (i / side, i % side);
            (
                i,
                ENH::new(col as f64 * spacing, row as f64 * spacing, 0.0),
            )
        })
        .collect()
}

/// Make each baseline its own spatially redundant group.
pub(crate) fn singleton_reds(bls: &[(usize, usize)], pol: Pol) -> Vec<Vec1<Baseline>> {
    bls.iter()
        .map(|&(a1, a2)| vec1![Baseline::new(a1, a2, pol)])
        .collect()
}
