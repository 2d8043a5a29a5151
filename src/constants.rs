// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

/*!
Useful constants.

All constants *must* be double precision. Baseline lengths, u-modes and
filters are all computed in double precision.
 */

/// Speed of light \[metres/second\]
pub const VEL_C: f64 = 299_792_458.0;

/// The largest allowable Euclidean distance between two unit baseline vectors
/// for them to be considered to have the same orientation.
pub const DEFAULT_BLVEC_ERROR_TOL: f64 = 1e-4;

/// The largest allowable difference between baseline vectors in a spatially
/// redundant group \[metres\].
pub const DEFAULT_BL_ERROR_TOL: f64 = 1.0;

/// The minimum number of spatially-unique baselines a radially redundant group
/// needs to survive construction.
pub const DEFAULT_MIN_UBL_PER_ORIENT: usize = 1;

/// The spatial filter half width. A value of 1 models foregrounds out to the
/// horizon.
pub const DEFAULT_SPATIAL_FILTER_HALF_WIDTH: f64 = 1.0;

/// Normalised sinc-kernel eigenvalues at or below this value don't contribute
/// a spatial filter mode.
pub const DEFAULT_EIGENVAL_CUTOFF: f64 = 1e-12;

/// The number of grid points per Nyquist interval of the sinc kernel used
/// when discretising it.
pub const DEFAULT_GRID_OVERSAMPLE: f64 = 4.0;

/// The fewest points used to discretise the sinc kernel.
pub const MIN_GRID_POINTS: usize = 32;

/// The most points used to discretise the sinc kernel. The eigensolver scales
/// cubically with this. Kernels that need more points than this to be sampled
/// at their Nyquist spacing are rejected.
pub const MAX_GRID_POINTS: usize = 2048;
