// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use thiserror::Error;

use crate::{baseline::Baseline, radial::RadialRedundancyError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeightsError {
    #[error("No data flags were supplied for baseline {baseline} (in either orientation)")]
    MissingFlags { baseline: Baseline },

    #[error("No sample counts were supplied for baseline {baseline} (in either orientation)")]
    MissingNsamples { baseline: Baseline },

    #[error("Baseline {baseline} has {what} with shape {got:?}, but shape {expected:?} was expected")]
    ShapeMismatch {
        baseline: Baseline,
        what: &'static str,
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error(transparent)]
    RadialRedundancy(#[from] RadialRedundancyError),
}
