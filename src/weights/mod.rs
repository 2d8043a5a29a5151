// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calibration weights.
//!
//! All per-baseline arrays here have the shape (num_times, num_freqs).
//! Baselines may be supplied in either orientation; lookups try both.

mod error;

pub use error::WeightsError;

use indexmap::IndexMap;
use log::{debug, trace};
use ndarray::{prelude::*, Zip};
use num_complex::Complex64 as c64;

use crate::{baseline::Baseline, constants::VEL_C, params::WeightCuts, radial::RadialRedundancy};

/// Everything about the data needed to make weights.
#[derive(Debug, Clone, Copy)]
pub struct WeightInputs<'a> {
    /// Flags on the data to be calibrated.
    pub data_flags: &'a IndexMap<Baseline, Array2<bool>>,

    /// The number of samples in each data point.
    pub data_nsamples: &'a IndexMap<Baseline, Array2<f64>>,

    /// Autocorrelations, keyed by e.g. `(1, 1, NN)`.
    pub autocorrs: &'a IndexMap<Baseline, Array2<c64>>,

    /// Flags on the autocorrelations.
    pub auto_flags: &'a IndexMap<Baseline, Array2<bool>>,
}

/// Something that turns data flags, sample counts and model flags into
/// per-baseline weights.
pub trait WeightSynthesiser {
    fn build_data_wgts(
        &self,
        inputs: &WeightInputs,
        model_flags: &IndexMap<Baseline, Array2<bool>>,
    ) -> Result<IndexMap<Baseline, Array2<f64>>, WeightsError>;
}

/// Weights that are the number of samples wherever neither the data nor the
/// model is flagged, and zero otherwise. Baselines without model flags aren't
/// modelled, so all of their weights are zero. Autocorrelations are not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlagWeights;

impl WeightSynthesiser for FlagWeights {
    fn build_data_wgts(
        &self,
        inputs: &WeightInputs,
        model_flags: &IndexMap<Baseline, Array2<bool>>,
    ) -> Result<IndexMap<Baseline, Array2<f64>>, WeightsError> {
        let mut wgts = IndexMap::with_capacity(inputs.data_flags.len());
        for (&bl, flags) in inputs.data_flags {
            let nsamples = get_either(inputs.data_nsamples, bl)
                .ok_or(WeightsError::MissingNsamples { baseline: bl })?;
            check_shape(bl, "sample counts", flags.dim(), nsamples.dim())?;

            let wgt = match get_either(model_flags, bl) {
                Some(model) => {
                    check_shape(bl, "model flags", flags.dim(), model.dim())?;
                    Zip::from(flags)
                        .and(nsamples)
                        .and(model)
                        .map_collect(|&flag, &n, &model_flag| {
                            if flag || model_flag {
                                0.0
                            } else {
                                n.max(0.0)
                            }
                        })
                }
                None => {
                    trace!("Baseline {bl} has no model flags; giving it zero weight");
                    Array2::zeros(flags.dim())
                }
            };
            wgts.insert(bl, wgt);
        }
        Ok(wgts)
    }
}

/// Make model flags from cuts on u-magnitude and frequency.
///
/// For each baseline in a radially redundant group, channels are flagged
/// where they fall outside the u or frequency cuts or inside any spectral
/// window to flag. The same flags are used for every time and given to every
/// baseline spatially redundant with it. The shape of the flags comes from
/// that baseline's data flags.
pub fn build_model_flags(
    data_flags: &IndexMap<Baseline, Array2<bool>>,
    radial_reds: &RadialRedundancy,
    freqs: &[f64],
    cuts: &WeightCuts,
) -> Result<IndexMap<Baseline, Array2<bool>>, WeightsError> {
    let mut model_flags = IndexMap::new();
    for group in radial_reds.iter() {
        for &key in group.iter() {
            let flags = get_either(data_flags, key)
                .ok_or(WeightsError::MissingFlags { baseline: key })?;
            let (num_times, num_freqs) = flags.dim();
            check_shape(key, "data flags", (num_times, freqs.len()), (num_times, num_freqs))?;

            let length = radial_reds.baseline_length(key)?;
            let channel_flags = freqs
                .iter()
                .map(|&freq| {
                    let umag = length * freq / VEL_C;
                    cuts.min_u_cut.map_or(false, |cut| umag < cut)
                        || cuts.max_u_cut.map_or(false, |cut| umag > cut)
                        || cuts.min_freq_cut.map_or(false, |cut| freq < cut)
                        || cuts.max_freq_cut.map_or(false, |cut| freq > cut)
                        || cuts
                            .spw_range_flags
                            .iter()
                            .any(|&(lo, hi)| freq > lo && freq < hi)
                })
                .collect::<Vec<_>>();
            let model = Array2::from_shape_fn((num_times, num_freqs), |(_, i_freq)| {
                channel_flags[i_freq]
            });

            for &bl in radial_reds.get_redundant_group(key)?.iter() {
                model_flags.insert(bl, model.clone());
            }
        }
    }
    debug!("Made model flags for {} baselines", model_flags.len());

    Ok(model_flags)
}

/// Make weights for frequency-redundant calibration. Model flags from `cuts`
/// are made with [`build_model_flags`] and then handed to `synthesiser`
/// alongside the data.
pub fn build_nucal_wgts<W>(
    inputs: &WeightInputs,
    radial_reds: &RadialRedundancy,
    freqs: &[f64],
    cuts: &WeightCuts,
    synthesiser: &W,
) -> Result<IndexMap<Baseline, Array2<f64>>, WeightsError>
where
    W: WeightSynthesiser + ?Sized,
{
    let model_flags = build_model_flags(inputs.data_flags, radial_reds, freqs, cuts)?;
    synthesiser.build_data_wgts(inputs, &model_flags)
}

/// Get the value for a baseline, trying the reversed baseline if necessary.
fn get_either<T>(map: &IndexMap<Baseline, T>, bl: Baseline) -> Option<&T> {
    map.get(&bl).or_else(|| map.get(&bl.reversed()))
}

fn check_shape(
    baseline: Baseline,
    what: &'static str,
    expected: (usize, usize),
    got: (usize, usize),
) -> Result<(), WeightsError> {
    if expected == got {
        Ok(())
    } else {
        Err(WeightsError::ShapeMismatch {
            baseline,
            what,
            expected,
            got,
        })
    }
}
