// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Integration tests.
//!
//! Some help for laying out these tests was taken from:
//! https://matklad.github.io/2021/02/27/delete-cargo-integration-tests.html

mod pipeline;

use mwa_nucal::{AntennaPositions, ENH};

/// A `side` by `side` square grid of antennas, `spacing` metres apart. The
/// antenna at row `r` (north) and column `c` (east) is numbered `r * side + c`.
fn square_grid(side: usize, spacing: f64) -> AntennaPositions {
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
