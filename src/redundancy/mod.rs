// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Finding spatially redundant baseline groups from antenna positions.


use log::{debug, warn};
use vec1::Vec1;

use crate::{
    baseline::{Baseline, Pol},
    clustering::points_west,
    coord::ENH,
    geometry::{baseline_vector, AntennaPositions, GeometryError},
};

/// Something that can group the baselines of an array into spatially
/// redundant groups.
pub trait RedundancyFinder {
    /// Get the spatially redundant groups of all cross-correlation baselines
    /// formed by `antpos`, for each of `pols`. Baselines in a group have
    /// separation vectors that agree within `bl_error_tol` \[metres\].
    fn get_reds(
        &self,
        antpos: &AntennaPositions,
        pols: &[Pol],
        bl_error_tol: f64,
    ) -> Result<Vec<Vec1<Baseline>>, GeometryError>;
}

/// Groups baselines by comparing each separation vector against the first
/// vector of every group found so far.
///
/// Each antenna pair is oriented to point into the non-negative east
/// half-space, so a baseline and its reversal are never in different groups.
/// Groups are returned in order of discovery, iterating over antennas in the
/// order of the antenna positions; every polarisation gets the same groups.
/// Antennas sharing a position form no group.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleRedundancyFinder;

impl RedundancyFinder for SimpleRedundancyFinder {
    fn get_reds(
        &self,
        antpos: &AntennaPositions,
        pols: &[Pol],
        bl_error_tol: f64,
    ) -> Result<Vec<Vec1<Baseline>>, GeometryError> {
        let ants: Vec<_> = antpos.iter().map(|(ant, _)| ant).collect();

        // (group vector, antenna pairs)
        let mut groups: Vec<(ENH, Vec<(usize, usize)>)> = vec![];
        for (i, &ant1) in ants.iter().enumerate() {
            for &ant2 in &ants[i + 1..] {
                // The polarisation doesn't matter for the geometry.
                let mut bl = Baseline::new(ant1, ant2, Pol::NN);
                let mut vector = baseline_vector(bl, antpos)?;
                if vector.norm() == 0.0 {
                    warn!("Antennas {ant1} and {ant2} share a position; ignoring their baseline");
                    continue;
                }
                if points_west(vector) {
                    bl = bl.reversed();
                    vector = -vector;
                }

                match groups
                    .iter_mut()
                    .find(|(group_vector, _)| group_vector.distance(vector) < bl_error_tol)
                {
                    Some((_, pairs)) => pairs.push((bl.ant1, bl.ant2)),
                    None => groups.push((vector, vec![(bl.ant1, bl.ant2)])),
                }
            }
        }
        debug!(
            "Found {} spatially redundant groups from {} antennas",
            groups.len(),
            ants.len()
        );

        let mut reds = Vec::with_capacity(groups.len() * pols.len());
        for &pol in pols {
            for (_, pairs) in &groups {
                let red = pairs
                    .iter()
                    .map(|&(a1, a2)| Baseline::new(a1, a2, pol))
                    .collect::<Vec<_>>();
                // Groups are only made with a pair in them.
                if let Ok(red) = Vec1::try_from_vec(red) {
                    reds.push(red);
                }
            }
        }
        Ok(reds)
    }
}
