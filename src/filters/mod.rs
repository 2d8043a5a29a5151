// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Sampling bounds and spatial filters for radially redundant groups.
//!
//! Every baseline in a radially redundant group samples the same smooth
//! function of |u|, just over a different range of |u| depending on its
//! length. The filters here are eigenvector bases of a band-limiting operator
//! over the whole group's range, evaluated at each baseline's own u modes.

mod cache;
mod error;
#[cfg(test)]
mod tests;

pub use cache::FilterCache;
pub use error::FilterError;

use indexmap::IndexMap;
use log::{debug, trace};
use ndarray::prelude::*;
use num_complex::Complex64 as c64;

use crate::{
    baseline::Baseline,
    constants::*,
    geometry::min_max,
    math::{eigh, interp_regular, sinc},
    params::SpatialFilterParams,
    radial::RadialRedundancy,
};
use cache::{FilterCacheKey, GridModes};

/// u modes are allowed to be this far outside of a filter domain (relative to
/// the domain's magnitude) before they're rejected.
const DOMAIN_TOLERANCE: f64 = 1e-9;

/// Something that can turn a filter domain and a set of u modes into an
/// orthogonal basis of band-limited modes.
pub trait EigenFilter {
    /// Make a basis of modes evaluated at `umodes`. The returned matrix has a
    /// row per u mode and a column per kept mode, ordered by descending
    /// eigenvalue; the kept eigenvalues are also returned.
    ///
    /// `filter_centres`, `filter_half_widths` and `eigenval_cutoffs` describe
    /// the bands to concentrate on and must have the same lengths. The modes
    /// are made over the domain `[xmin, xmax]`, which must contain every u
    /// mode. If a cache is supplied, decompositions may be reused from it.
    #[allow(clippy::too_many_arguments)]
    fn pswf_operator(
        &self,
        umodes: &[f64],
        filter_centres: &[f64],
        filter_half_widths: &[f64],
        eigenval_cutoffs: &[f64],
        xmin: f64,
        xmax: f64,
        cache: Option<&mut FilterCache>,
    ) -> Result<(Array2<c64>, Array1<f64>), FilterError>;
}

/// Prolate-spheroidal-like modes from the eigenvectors of a sinc kernel.
///
/// The kernel `sinc(2 hw (x_i - x_j))` is built on a regular grid over the
/// filter domain and diagonalised; eigenvalues are normalised by the largest,
/// and modes with normalised eigenvalues above the cutoff are kept. Modes are
/// linearly interpolated from the grid to the requested u modes, so all
/// baselines sharing a domain get the same underlying functions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SincEigenFilter {
    /// Grid points per Nyquist interval of the kernel, `1 / (2 hw)`.
    pub oversample: f64,

    pub min_grid_points: usize,

    pub max_grid_points: usize,
}

impl Default for SincEigenFilter {
    fn default() -> Self {
        Self {
            oversample: DEFAULT_GRID_OVERSAMPLE,
            min_grid_points: MIN_GRID_POINTS,
            max_grid_points: MAX_GRID_POINTS,
        }
    }
}

impl SincEigenFilter {
    /// The number of grid points for a kernel of half width `half_width` over
    /// `[xmin, xmax]`. The spacing is never coarser than the kernel's Nyquist
    /// spacing, `1 / (2 hw)`; if that needs more than `max_grid_points`
    /// points, the kernel can't be represented.
    fn num_grid_points(
        &self,
        half_width: f64,
        xmin: f64,
        xmax: f64,
    ) -> Result<usize, FilterError> {
        if xmax <= xmin {
            return Ok(1);
        }
        let min_points = self.min_grid_points.max(2);
        let max_points = self.max_grid_points.max(min_points);

        // Counted in floats; huge half widths are finite but overflow a usize.
        let nyquist_intervals = (xmax - xmin) * 2.0 * half_width;
        let nyquist_points = nyquist_intervals.ceil() + 1.0;
        if !(nyquist_points <= max_points as f64) {
            return Err(FilterError::GridTooLarge {
                half_width,
                xmin,
                xmax,
                max_points,
            });
        }
        let wanted = (nyquist_intervals * self.oversample).ceil() + 1.0;
        let n = wanted.max(nyquist_points).min(max_points as f64) as usize;
        Ok(n.max(min_points))
    }

    fn grid_modes(
        &self,
        half_width: f64,
        eigenval_cutoff: f64,
        xmin: f64,
        xmax: f64,
        num_points: usize,
    ) -> GridModes {
        debug!("Diagonalising a {num_points}x{num_points} sinc kernel over [{xmin}, {xmax}]");
        let dx = if num_points > 1 {
            (xmax - xmin) / (num_points - 1) as f64
        } else {
            0.0
        };
        let kernel = Array2::from_shape_fn((num_points, num_points), |(i, j)| {
            sinc(2.0 * half_width * (i as f64 - j as f64) * dx)
        });
        let (values, vectors) = eigh(kernel.view());

        // The kernel's trace is the number of points, so the largest
        // eigenvalue is positive.
        let normalised = &values / values[0];
        let num_kept = normalised.iter().take_while(|&&v| v > eigenval_cutoff).count();
        trace!("Kept {num_kept} of {num_points} modes");

        GridModes {
            x0: xmin,
            dx,
            vectors: vectors.slice(s![.., ..num_kept]).to_owned(),
            eigenvalues: normalised.slice(s![..num_kept]).to_owned(),
        }
    }
}

impl EigenFilter for SincEigenFilter {
    #[allow(clippy::too_many_arguments)]
    fn pswf_operator(
        &self,
        umodes: &[f64],
        filter_centres: &[f64],
        filter_half_widths: &[f64],
        eigenval_cutoffs: &[f64],
        xmin: f64,
        xmax: f64,
        cache: Option<&mut FilterCache>,
    ) -> Result<(Array2<c64>, Array1<f64>), FilterError> {
        if umodes.is_empty() {
            return Err(FilterError::EmptyUModes);
        }
        if filter_centres.is_empty()
            || filter_centres.len() != filter_half_widths.len()
            || filter_centres.len() != eigenval_cutoffs.len()
        {
            return Err(FilterError::MismatchedFilterSpecs {
                centres: filter_centres.len(),
                half_widths: filter_half_widths.len(),
                cutoffs: eigenval_cutoffs.len(),
            });
        }
        if let Some(&centre) = filter_centres.iter().find(|&&c| c != 0.0) {
            return Err(FilterError::UnsupportedFilterCentre { centre });
        }
        if let Some(&half_width) = filter_half_widths
            .iter()
            .find(|&&hw| !(hw > 0.0 && hw.is_finite()))
        {
            return Err(FilterError::NonPositiveHalfWidth { half_width });
        }
        if !(xmin.is_finite() && xmax.is_finite() && xmin <= xmax) {
            return Err(FilterError::InvalidDomain { xmin, xmax });
        }
        let slack = DOMAIN_TOLERANCE * xmin.abs().max(xmax.abs()).max(1.0);
        if let Some(&u) = umodes
            .iter()
            .find(|&&u| !(u >= xmin - slack && u <= xmax + slack))
        {
            return Err(FilterError::UModeOutOfDomain { u, xmin, xmax });
        }

        // Bands centred on zero are nested, so the widest one covers the
        // rest.
        let (half_width, eigenval_cutoff) = filter_half_widths
            .iter()
            .copied()
            .zip(eigenval_cutoffs.iter().copied())
            .fold((0.0, 0.0), |acc, (hw, cutoff)| {
                if hw > acc.0 {
                    (hw, cutoff)
                } else {
                    acc
                }
            });

        let num_points = self.num_grid_points(half_width, xmin, xmax)?;
        let computed;
        let modes = match cache {
            Some(cache) => {
                let key = FilterCacheKey::new(half_width, eigenval_cutoff, xmin, xmax, num_points);
                cache.get_or_insert_with(key, || {
                    self.grid_modes(half_width, eigenval_cutoff, xmin, xmax, num_points)
                })
            }
            None => {
                computed = self.grid_modes(half_width, eigenval_cutoff, xmin, xmax, num_points);
                &computed
            }
        };

        let num_modes = modes.eigenvalues.len().min(umodes.len());
        let basis = Array2::from_shape_fn((umodes.len(), num_modes), |(i, k)| {
            c64::new(
                interp_regular(modes.vectors.column(k), modes.x0, modes.dx, umodes[i]),
                0.0,
            )
        });
        Ok((basis, modes.eigenvalues.slice(s![..num_modes]).to_owned()))
    }
}

/// Get the (umin, umax) bounds of each radially redundant group, in group
/// order. umin is the shortest baseline's u at the lowest frequency and umax
/// the longest baseline's u at the highest frequency.
pub fn get_u_bounds(
    radial_reds: &RadialRedundancy,
    freqs: &[f64],
) -> Result<Vec<(f64, f64)>, FilterError> {
    let (fmin, fmax) = min_max(freqs).ok_or(FilterError::EmptyFreqs)?;
    radial_reds
        .iter()
        .map(|group| -> Result<_, FilterError> {
            let lengths = group
                .iter()
                .map(|&bl| radial_reds.baseline_length(bl))
                .collect::<Result<Vec<_>, _>>()?;
            // Groups are non-empty, so there's always a min and max.
            let (lmin, lmax) = min_max(&lengths).unwrap_or_default();
            Ok((lmin * fmin / VEL_C, lmax * fmax / VEL_C))
        })
        .collect()
}

/// Make a spatial filter for every baseline in every radially redundant group.
///
/// Each filter has a row per frequency and a column per mode; baselines in the
/// same group use the group's u bounds as their filter domain. Only the real
/// part of each operator's output is kept. If a cache is supplied, it's used
/// for (and filled by) every call to the operator.
pub fn compute_spatial_filters<E>(
    radial_reds: &RadialRedundancy,
    freqs: &[f64],
    params: &SpatialFilterParams,
    operator: &E,
    mut cache: Option<&mut FilterCache>,
) -> Result<IndexMap<Baseline, Array2<f64>>, FilterError>
where
    E: EigenFilter + ?Sized,
{
    let u_bounds = get_u_bounds(radial_reds, freqs)?;

    let mut filters = IndexMap::new();
    for (group, &(umin, umax)) in radial_reds.iter().zip(u_bounds.iter()) {
        for &bl in group.iter() {
            let length = radial_reds.baseline_length(bl)?;
            let umodes = freqs.iter().map(|f| length * f / VEL_C).collect::<Vec<_>>();
            let (pswf, _) = operator.pswf_operator(
                &umodes,
                &[0.0],
                &[params.spatial_filter_half_width],
                &[params.eigenval_cutoff],
                umin,
                umax,
                cache.as_deref_mut(),
            )?;
            filters.insert(bl, pswf.mapv(|z| z.re));
        }
    }
    debug!("Made spatial filters for {} baselines", filters.len());

    Ok(filters)
}
