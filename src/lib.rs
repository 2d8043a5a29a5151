// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Radial redundancy, spatial filters and weights for frequency-redundant
("nucal") calibration of radio interferometers.

Baselines that point the same way sample the same smooth function of |u| at
different frequencies. [`RadialRedundancy`] groups baselines by orientation
and keeps the groups consistent with the spatially redundant groups they came
from; [`compute_spatial_filters`] makes band-limited bases over each group's
u range and [`build_nucal_wgts`] makes weights with cuts in u and frequency.
 */

pub mod baseline;
pub mod clustering;
pub mod constants;
pub mod coord;
mod error;
pub mod filters;
pub mod geometry;
pub(crate) mod math;
pub mod params;
pub mod radial;
pub mod redundancy;
pub mod weights;

#[cfg(test)]
mod tests;

// Re-exports.
pub use baseline::{Ant, Baseline, Pol};
pub use constants::*;
pub use clustering::{get_unique_orientations, DistanceClusterer, SingleLinkage};
pub use coord::ENH;
pub use error::NucalError;
pub use filters::{
    compute_spatial_filters, get_u_bounds, EigenFilter, FilterCache, FilterError, SincEigenFilter,
};
pub use geometry::{
    baseline_length, baseline_vector, is_frequency_redundant, same_orientation,
    unit_baseline_vector, AntennaPositions, GeometryError,
};
pub use params::{NucalParams, RadialRedundancyParams, SpatialFilterParams, WeightCuts};
pub use radial::{InvalidGroupError, RadialRedundancy, RadialRedundancyError};
pub use redundancy::{RedundancyFinder, SimpleRedundancyFinder};
pub use weights::{
    build_model_flags, build_nucal_wgts, FlagWeights, WeightInputs, WeightSynthesiser,
    WeightsError,
};
