// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Errors from maintaining radially redundant groups.

use strum_macros::Display;
use thiserror::Error;

use crate::{baseline::Baseline, geometry::GeometryError};

/// The kinds of baseline groups a lookup can fail in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum GroupKind {
    #[strum(serialize = "spatially redundant")]
    Spatial,

    #[strum(serialize = "radially redundant")]
    Radial,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RadialRedundancyError {
    #[error("Baseline {baseline} (in either orientation) is not in any {kind} group")]
    BaselineNotFound { baseline: Baseline, kind: GroupKind },

    #[error(transparent)]
    InvalidGroup(#[from] InvalidGroupError),

    #[error("A radially redundant group with the same orientation and polarisation as {baseline} already exists (it contains {existing}); use add_radial_group to merge them")]
    DuplicateOrientation {
        baseline: Baseline,
        existing: Baseline,
    },

    #[error("Cannot set radially redundant group {index}; there are only {len} groups")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error(transparent)]
    Geometry(#[from] GeometryError),
}

/// Reasons a group of baselines can't be a radially redundant group.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvalidGroupError {
    #[error("A radially redundant group must contain at least one baseline")]
    Empty,

    #[error("Baselines {first} and {other} are not in the same orientation")]
    OrientationMismatch { first: Baseline, other: Baseline },

    #[error("Baselines {first} and {other} do not have the same polarisation")]
    PolarisationMismatch { first: Baseline, other: Baseline },
}
