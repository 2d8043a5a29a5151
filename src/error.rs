// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Error type for all nucal-related errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NucalError {
    #[error("{0}")]
    Geometry(#[from] crate::geometry::GeometryError),

    #[error("{0}")]
    RadialRedundancy(#[from] crate::radial::RadialRedundancyError),

    #[error("{0}")]
    InvalidGroup(#[from] crate::radial::InvalidGroupError),

    #[error("{0}")]
    Filter(#[from] crate::filters::FilterError),

    #[error("{0}")]
    Weights(#[from] crate::weights::WeightsError),

    #[error("{0}")]
    Params(#[from] crate::params::ParamsError),
}
