// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geometric predicates on baselines.
//!
//! Nothing here holds state; everything is a function of antenna positions
//! and baseline keys.

mod error;

pub use error::GeometryError;

use indexmap::IndexMap;

use crate::{
    baseline::{Ant, Baseline},
    coord::ENH,
};

/// Antenna positions in local East, North, Height coordinates \[metres\].
///
/// Insertion order is kept so that anything iterating over antennas does so
/// deterministically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AntennaPositions(IndexMap<Ant, ENH>);

impl AntennaPositions {
    pub fn new() -> AntennaPositions {
        AntennaPositions(IndexMap::new())
    }

    pub fn insert(&mut self, ant: Ant, pos: ENH) {
        self.0.insert(ant, pos);
    }

    /// Get the position of an antenna.
    pub fn get(&self, ant: Ant) -> Result<ENH, GeometryError> {
        self.0
            .get(&ant)
            .copied()
            .ok_or(GeometryError::MissingAntenna { ant })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Ant, ENH)> + '_ {
        self.0.iter().map(|(&ant, &pos)| (ant, pos))
    }
}

impl<P: Into<ENH>> FromIterator<(Ant, P)> for AntennaPositions {
    fn from_iter<I: IntoIterator<Item = (Ant, P)>>(iter: I) -> Self {
        AntennaPositions(iter.into_iter().map(|(a, p)| (a, p.into())).collect())
    }
}

/// The separation vector of a baseline, pointing from `ant1` to `ant2`
/// \[metres\].
pub fn baseline_vector(bl: Baseline, antpos: &AntennaPositions) -> Result<ENH, GeometryError> {
    Ok(antpos.get(bl.ant2)? - antpos.get(bl.ant1)?)
}

/// The length of a baseline \[metres\].
pub fn baseline_length(bl: Baseline, antpos: &AntennaPositions) -> Result<f64, GeometryError> {
    baseline_vector(bl, antpos).map(ENH::norm)
}

/// The separation vector of a baseline, scaled to unit length.
pub fn unit_baseline_vector(
    bl: Baseline,
    antpos: &AntennaPositions,
) -> Result<ENH, GeometryError> {
    baseline_vector(bl, antpos).map(ENH::normalised)
}

/// Do two baselines have the same orientation? They do if the Euclidean
/// distance between their unit separation vectors is less than
/// `blvec_error_tol`. Orientation is directed; a baseline and its reversal
/// point in opposite directions.
///
/// Polarisations are not considered.
pub fn same_orientation(
    bl1: Baseline,
    bl2: Baseline,
    antpos: &AntennaPositions,
    blvec_error_tol: f64,
) -> Result<bool, GeometryError> {
    let unit1 = unit_baseline_vector(bl1, antpos)?;
    let unit2 = unit_baseline_vector(bl2, antpos)?;
    Ok(unit1.distance(unit2) < blvec_error_tol)
}

/// Are two baselines frequency redundant? They are if they have the same
/// polarisation, the u-modes they sample over `freqs` overlap, and they have
/// the same orientation.
///
/// `freqs` are in \[Hz\]. An empty `freqs` samples no u-modes, so nothing is
/// frequency redundant.
pub fn is_frequency_redundant(
    bl1: Baseline,
    bl2: Baseline,
    freqs: &[f64],
    antpos: &AntennaPositions,
    blvec_error_tol: f64,
) -> Result<bool, GeometryError> {
    if bl1.pol != bl2.pol {
        return Ok(false);
    }
    let (fmin, fmax) = match min_max(freqs) {
        Some(mm) => mm,
        None => return Ok(false),
    };

    let mag1 = baseline_length(bl1, antpos)?;
    let mag2 = baseline_length(bl2, antpos)?;
    let upper_overlap = mag1 * fmin <= mag2 * fmax && mag1 * fmax >= mag2 * fmax;
    let lower_overlap = mag1 * fmin <= mag2 * fmin && mag1 * fmax >= mag2 * fmin;
    if !(upper_overlap || lower_overlap) {
        return Ok(false);
    }

    same_orientation(bl1, bl2, antpos, blvec_error_tol)
}

/// The smallest and largest values of a slice, or `None` if it's empty. NaNs
/// are ignored unless they're all there is.
pub(crate) fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    Some(
        values
            .iter()
            .fold((first, first), |(min, max), &v| (min.min(v), max.max(v))),
    )
}
