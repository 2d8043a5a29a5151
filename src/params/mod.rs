// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Parameters controlling radial redundancy, spatial filters and weights.
//!
//! All parameters have sensible defaults and can be deserialised from
//! argument files; missing fields take their default values.

mod error;

pub use error::ParamsError;

use std::{path::Path, str::FromStr};

use itertools::Itertools;
use lazy_static::lazy_static;
use log::debug;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::{baseline::Pol, constants::*};

lazy_static! {
    pub(crate) static ref ARG_FILE_TYPES_COMMA_SEPARATED: String =
        ArgFileTypes::iter().join(", ");
}

/// Parameters used to build [`crate::RadialRedundancy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialRedundancyParams {
    /// Largest allowable Euclidean distance a unit baseline vector can be away
    /// from an existing cluster to be considered the same orientation.
    pub blvec_error_tol: f64,

    /// The polarisations to get spatially redundant groups for, if they need
    /// to be found.
    pub pols: Vec<Pol>,

    /// The largest allowable difference between baselines in a spatially
    /// redundant group \[metres\]. Only used if the groups need to be found.
    pub bl_error_tol: f64,

    /// The minimum number of baselines a radially redundant group needs when
    /// it's first made.
    pub min_ubl_per_orient: usize,
}

impl Default for RadialRedundancyParams {
    fn default() -> Self {
        Self {
            blvec_error_tol: DEFAULT_BLVEC_ERROR_TOL,
            pols: vec![Pol::NN],
            bl_error_tol: DEFAULT_BL_ERROR_TOL,
            min_ubl_per_orient: DEFAULT_MIN_UBL_PER_ORIENT,
        }
    }
}

/// Parameters used to make spatial filters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpatialFilterParams {
    /// The filter half width. 1 corresponds to modelling foregrounds out to
    /// the horizon.
    pub spatial_filter_half_width: f64,

    /// Eigenvalue cutoff for included filter modes.
    pub eigenval_cutoff: f64,
}

impl Default for SpatialFilterParams {
    fn default() -> Self {
        Self {
            spatial_filter_half_width: DEFAULT_SPATIAL_FILTER_HALF_WIDTH,
            eigenval_cutoff: DEFAULT_EIGENVAL_CUTOFF,
        }
    }
}

/// Cuts on u-magnitude and frequency applied when building weights. `None`
/// means that side is unconstrained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightCuts {
    /// u-modes with magnitudes less than this get zero weight.
    pub min_u_cut: Option<f64>,

    /// u-modes with magnitudes greater than this get zero weight.
    pub max_u_cut: Option<f64>,

    /// Channels below this frequency get zero weight \[Hz\].
    pub min_freq_cut: Option<f64>,

    /// Channels above this frequency get zero weight \[Hz\].
    pub max_freq_cut: Option<f64>,

    /// The (start, stop) frequencies of spectral windows to flag \[Hz\].
    /// Channels strictly between the start and stop are flagged.
    pub spw_range_flags: Vec<(f64, f64)>,
}

/// All parameters together, as they'd appear in an argument file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NucalParams {
    pub radial: RadialRedundancyParams,
    pub filters: SpatialFilterParams,
    pub cuts: WeightCuts,
}

#[derive(Debug, Display, EnumIter, EnumString)]
pub(crate) enum ArgFileTypes {
    #[strum(serialize = "toml")]
    Toml,
    #[strum(serialize = "json")]
    Json,
}

impl NucalParams {
    /// Read parameters from an argument file. The file type is determined by
    /// its extension.
    pub fn from_arg_file<P: AsRef<Path>>(arg_file: P) -> Result<NucalParams, ParamsError> {
        let arg_file = arg_file.as_ref();
        debug!("Attempting to parse argument file {}", arg_file.display());

        let arg_file_type = arg_file
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .and_then(|e| ArgFileTypes::from_str(&e).ok())
            .ok_or_else(|| ParamsError::UnrecognisedExtension {
                file: arg_file.display().to_string(),
                valid: ARG_FILE_TYPES_COMMA_SEPARATED.clone(),
            })?;

        let contents = std::fs::read_to_string(arg_file)?;
        NucalParams::from_str_with_type(&contents, &arg_file_type).map_err(|err| {
            ParamsError::Decode {
                file: arg_file.display().to_string(),
                err,
            }
        })
    }

    /// Parse toml-formatted parameters.
    pub fn from_toml_str(contents: &str) -> Result<NucalParams, ParamsError> {
        NucalParams::from_str_with_type(contents, &ArgFileTypes::Toml).map_err(|err| {
            ParamsError::Decode {
                file: "<toml string>".to_string(),
                err,
            }
        })
    }

    fn from_str_with_type(contents: &str, arg_file_type: &ArgFileTypes) -> Result<NucalParams, String> {
        let params: NucalParams = match arg_file_type {
            ArgFileTypes::Toml => {
                debug!("Parsing toml file...");
                toml::from_str(contents).map_err(|e| e.to_string())?
            }
            ArgFileTypes::Json => {
                debug!("Parsing json file...");
                serde_json::from_str(contents).map_err(|e| e.to_string())?
            }
        };
        Ok(params)
    }
}
