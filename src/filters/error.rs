// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::radial::RadialRedundancyError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("No frequencies were supplied")]
    EmptyFreqs,

    #[error("No u modes were supplied to the eigen-filter operator")]
    EmptyUModes,

    #[error("Filter specifications don't line up: {centres} centres, {half_widths} half widths and {cutoffs} eigenvalue cutoffs")]
    MismatchedFilterSpecs {
        centres: usize,
        half_widths: usize,
        cutoffs: usize,
    },

    #[error("Filter centre {centre} is unsupported; only filters centred on 0 can be made")]
    UnsupportedFilterCentre { centre: f64 },

    #[error("Filter half width must be positive, but got {half_width}")]
    NonPositiveHalfWidth { half_width: f64 },

    #[error("Invalid filter domain [{xmin}, {xmax}]")]
    InvalidDomain { xmin: f64, xmax: f64 },

    #[error("u mode {u} is outside of the filter domain [{xmin}, {xmax}]")]
    UModeOutOfDomain { u: f64, xmin: f64, xmax: f64 },

    #[error("A filter of half width {half_width} over [{xmin}, {xmax}] needs more than the maximum of {max_points} grid points")]
    GridTooLarge {
        half_width: f64,
        xmin: f64,
        xmax: f64,
        max_points: usize,
    },

    #[error(transparent)]
    RadialRedundancy(#[from] RadialRedundancyError),
}
