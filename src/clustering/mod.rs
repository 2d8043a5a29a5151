// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sorting baselines into groups with the same radial heading.


use itertools::Itertools;
use log::{debug, trace};
use vec1::Vec1;

use crate::{
    baseline::{Baseline, Pol},
    coord::ENH,
    geometry::{unit_baseline_vector, AntennaPositions, GeometryError},
};

/// Something that can partition points into flat clusters under a distance
/// threshold.
///
/// Implementations must be deterministic: for the same points (in the same
/// order) and threshold, the same labels must be returned.
pub trait DistanceClusterer {
    /// Assign a cluster label to each of `points`. Labels are dense, start at
    /// 0 and are numbered in order of each cluster's first appearance in
    /// `points`.
    fn cluster(&self, points: &[ENH], threshold: f64) -> Vec<usize>;
}

/// Single-linkage flat clustering. Two points share a cluster if and only if
/// they're joined by a chain of points with each consecutive pair no further
/// than the threshold apart. Raising the threshold can merge clusters, but
/// never split them.
#[derive(Debug, Clone, Copy, Default)]
pub struct SingleLinkage;

impl DistanceClusterer for SingleLinkage {
    fn cluster(&self, points: &[ENH], threshold: f64) -> Vec<usize> {
        let mut parents: Vec<usize> = (0..points.len()).collect();
        for (i, &p1) in points.iter().enumerate() {
            for (j, &p2) in points.iter().enumerate().skip(i + 1) {
                if p1.distance(p2) <= threshold {
                    let root1 = find_root(&mut parents, i);
                    let root2 = find_root(&mut parents, j);
                    if root1 != root2 {
                        // Keep the earliest point as the root.
                        let (lo, hi) = (root1.min(root2), root1.max(root2));
                        parents[hi] = lo;
                    }
                }
            }
        }

        // Relabel the roots by first appearance.
        let mut root_labels = vec![None; points.len()];
        let mut num_clusters = 0;
        (0..points.len())
            .map(|i| {
                let root = find_root(&mut parents, i);
                *root_labels[root].get_or_insert_with(|| {
                    num_clusters += 1;
                    num_clusters - 1
                })
            })
            .collect()
    }
}

/// Does this vector point into the negative east half-space? Vectors with no
/// east component are decided by their north component, then their height.
pub(crate) fn points_west(v: ENH) -> bool {
    if v.e != 0.0 {
        v.e < 0.0
    } else if v.n != 0.0 {
        v.n < 0.0
    } else {
        v.h < 0.0
    }
}

fn find_root(parents: &mut [usize], mut i: usize) -> usize {
    while parents[i] != i {
        parents[i] = parents[parents[i]];
        i = parents[i];
    }
    i
}

/// Sort the spatially-unique baselines of `reds` into groups with the same
/// radial heading and polarisation.
///
/// The first baseline of each spatially redundant group represents the group.
/// Each representative is pointed into the non-negative east half-space
/// (reversing it if necessary; baselines without an east component are
/// pointed north) before its unit vector is clustered, so the
/// returned baselines may be reversed with respect to `reds`. Groups with
/// fewer than `min_ubl_per_orient` baselines are discarded, and the rest are
/// sorted by size, largest first (ties keep their discovery order).
pub fn get_unique_orientations<C: DistanceClusterer + ?Sized>(
    antpos: &AntennaPositions,
    reds: &[Vec1<Baseline>],
    min_ubl_per_orient: usize,
    blvec_error_tol: f64,
    clusterer: &C,
) -> Result<Vec<Vec1<Baseline>>, GeometryError> {
    let pols: Vec<Pol> = reds.iter().map(|red| red.first().pol).unique().collect();

    let mut uors: Vec<Vec1<Baseline>> = vec![];
    for pol in pols {
        let mut normalised_vecs = vec![];
        let mut ubl_pairs = vec![];
        for red in reds.iter().filter(|red| red.first().pol == pol) {
            let bl = *red.first();
            let vector = unit_baseline_vector(bl, antpos)?;
            if points_west(vector) {
                normalised_vecs.push(-vector);
                ubl_pairs.push(bl.reversed());
            } else {
                normalised_vecs.push(vector);
                ubl_pairs.push(bl);
            }
        }

        let clusters = clusterer.cluster(&normalised_vecs, blvec_error_tol);
        let num_clusters = clusters.iter().max().map(|m| m + 1).unwrap_or(0);
        let mut groups: Vec<Vec<Baseline>> = vec![vec![]; num_clusters];
        for (cluster, bl) in clusters.into_iter().zip(ubl_pairs) {
            groups[cluster].push(bl);
        }
        trace!(
            "{} spatially-unique {pol} baselines fell into {num_clusters} orientations",
            normalised_vecs.len()
        );
        // Every cluster label was handed out to at least one baseline.
        uors.extend(groups.into_iter().filter_map(|g| Vec1::try_from_vec(g).ok()));
    }

    uors.retain(|group| group.len() >= min_ubl_per_orient);
    uors.sort_by(|a, b| b.len().cmp(&a.len()));
    debug!("Found {} radially redundant groups", uors.len());
    Ok(uors)
}
