// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use approx::assert_abs_diff_eq;

use super::*;
use crate::{
    baseline::Pol,
    params::RadialRedundancyParams,
    tests::{east_west_line, singleton_reds, square_grid},
};

fn four_on_a_line() -> RadialRedundancy {
    RadialRedundancy::new(
        east_west_line(4, 10.0),
        Some(singleton_reds(&[(0, 1), (1, 2), (2, 3)], Pol::NN)),
        &RadialRedundancyParams::default(),
    )
    .unwrap()
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| start + (end - start) * i as f64 / (n - 1) as f64)
        .collect()
}

#[test]
fn test_u_bounds_four_on_a_line() {
    let rr = four_on_a_line();
    let bounds = get_u_bounds(&rr, &[100e6, 200e6]).unwrap();
    assert_eq!(bounds.len(), 1);
    let (umin, umax) = bounds[0];
    assert_abs_diff_eq!(umin, 10.0 * 100e6 / VEL_C);
    assert_abs_diff_eq!(umax, 10.0 * 200e6 / VEL_C);
    assert_abs_diff_eq!(umin, 3.3356, epsilon = 1e-4);
    assert_abs_diff_eq!(umax, 6.6713, epsilon = 1e-4);

    // Frequency order doesn't matter.
    assert_eq!(get_u_bounds(&rr, &[200e6, 150e6, 100e6]).unwrap(), bounds);
}

#[test]
fn test_u_bounds_grid() {
    let rr = RadialRedundancy::new(
        square_grid(3, 14.6),
        None,
        &RadialRedundancyParams::default(),
    )
    .unwrap();
    let freqs = linspace(120e6, 180e6, 7);
    let bounds = get_u_bounds(&rr, &freqs).unwrap();
    assert_eq!(bounds.len(), rr.len());
    for (group, &(umin, umax)) in rr.iter().zip(bounds.iter()) {
        assert!(umin <= umax);
        let shortest = group
            .iter()
            .map(|&bl| rr.baseline_length(bl).unwrap())
            .fold(f64::INFINITY, f64::min);
        assert_abs_diff_eq!(umin, shortest * 120e6 / VEL_C);
    }
}

#[test]
fn test_u_bounds_no_freqs() {
    let rr = four_on_a_line();
    assert_eq!(get_u_bounds(&rr, &[]), Err(FilterError::EmptyFreqs));
    assert!(matches!(
        compute_spatial_filters(
            &rr,
            &[],
            &SpatialFilterParams::default(),
            &SincEigenFilter::default(),
            None
        ),
        Err(FilterError::EmptyFreqs)
    ));
}

#[test]
fn test_spatial_filters_shapes() {
    let rr = four_on_a_line();
    let freqs = linspace(100e6, 200e6, 16);
    let filters = compute_spatial_filters(
        &rr,
        &freqs,
        &SpatialFilterParams::default(),
        &SincEigenFilter::default(),
        None,
    )
    .unwrap();

    assert_eq!(filters.len(), 3);
    for bl in rr[0].iter() {
        let filter = &filters[bl];
        assert_eq!(filter.nrows(), freqs.len());
        assert!(filter.ncols() >= 1);
        assert!(filter.ncols() <= freqs.len());
        assert!(filter.iter().all(|x| x.is_finite()));
    }
    // Same lengths and domain, so the same filter.
    assert_abs_diff_eq!(
        filters[&Baseline::new(0, 1, Pol::NN)],
        filters[&Baseline::new(2, 3, Pol::NN)]
    );
}

#[test]
fn test_spatial_filters_columns_capped() {
    // Only two channels, but plenty of modes over the domain.
    let rr = four_on_a_line();
    let filters = compute_spatial_filters(
        &rr,
        &[100e6, 200e6],
        &SpatialFilterParams {
            spatial_filter_half_width: 2.0,
            eigenval_cutoff: 1e-12,
        },
        &SincEigenFilter::default(),
        None,
    )
    .unwrap();
    for filter in filters.values() {
        assert_eq!(filter.dim(), (2, 2));
    }
}

#[test]
fn test_spatial_filters_cache() {
    let rr = RadialRedundancy::new(
        east_west_line(5, 10.0),
        None,
        &RadialRedundancyParams::default(),
    )
    .unwrap();
    let freqs = linspace(100e6, 200e6, 8);
    let params = SpatialFilterParams::default();
    let operator = SincEigenFilter::default();

    let uncached = compute_spatial_filters(&rr, &freqs, &params, &operator, None).unwrap();

    let mut cache = FilterCache::new();
    assert!(cache.is_empty());
    let cached =
        compute_spatial_filters(&rr, &freqs, &params, &operator, Some(&mut cache)).unwrap();
    // One group, so one decomposition shared by all four baselines.
    assert_eq!(rr.len(), 1);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 3);
    assert_eq!(cached.len(), uncached.len());
    for (bl, filter) in &uncached {
        assert_abs_diff_eq!(filter, &cached[bl]);
    }

    // Reusing the cache doesn't decompose again.
    compute_spatial_filters(&rr, &freqs, &params, &operator, Some(&mut cache)).unwrap();
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.misses(), 1);
    assert_eq!(cache.hits(), 7);

    // A different half width is a different entry.
    let wider = SpatialFilterParams {
        spatial_filter_half_width: 0.5,
        ..params
    };
    compute_spatial_filters(&rr, &freqs, &wider, &operator, Some(&mut cache)).unwrap();
    assert_eq!(cache.len(), 2);
    assert_eq!(cache.misses(), 2);

    cache.clear();
    assert!(cache.is_empty());
    assert_eq!(cache.hits(), 0);
}

/// An operator that puts junk in the imaginary part.
struct ImaginaryNoise;

impl EigenFilter for ImaginaryNoise {
    #[allow(clippy::too_many_arguments)]
    fn pswf_operator(
        &self,
        umodes: &[f64],
        _: &[f64],
        _: &[f64],
        _: &[f64],
        xmin: f64,
        _: f64,
        _: Option<&mut FilterCache>,
    ) -> Result<(Array2<c64>, Array1<f64>), FilterError> {
        let basis = Array2::from_shape_fn((umodes.len(), 1), |(i, _)| {
            c64::new(umodes[i] - xmin, 1e-3)
        });
        Ok((basis, array![1.0]))
    }
}

#[test]
fn test_spatial_filters_keep_real_part() {
    let rr = four_on_a_line();
    let filters = compute_spatial_filters(
        &rr,
        &[100e6, 200e6],
        &SpatialFilterParams::default(),
        &ImaginaryNoise,
        None,
    )
    .unwrap();
    let umin = 10.0 * 100e6 / VEL_C;
    let expected = array![[0.0], [10.0 * 200e6 / VEL_C - umin]];
    for filter in filters.values() {
        assert_abs_diff_eq!(filter, &expected, epsilon = 1e-12);
    }
}

#[test]
fn test_pswf_operator_modes() {
    let operator = SincEigenFilter::default();
    // With these settings, the grid has 32 points, so u modes on the grid
    // points pick out the gridded eigenvectors directly.
    let umodes = linspace(0.0, 1.0, 32);
    let (basis, eigenvalues) = operator
        .pswf_operator(&umodes, &[0.0], &[1.0], &[1e-12], 0.0, 1.0, None)
        .unwrap();

    assert_eq!(basis.nrows(), 32);
    assert_eq!(basis.ncols(), eigenvalues.len());
    assert_abs_diff_eq!(eigenvalues[0], 1.0);
    for pair in eigenvalues.windows(2) {
        assert!(pair[0] >= pair[1]);
    }
    assert!(eigenvalues.iter().all(|&v| v > 1e-12));
    assert!(basis.iter().all(|z| z.im == 0.0));

    let real = basis.mapv(|z| z.re);
    let gram = real.t().dot(&real);
    assert_abs_diff_eq!(gram, Array2::<f64>::eye(real.ncols()), epsilon = 1e-8);
}

#[test]
fn test_pswf_operator_cutoff() {
    let operator = SincEigenFilter::default();
    let umodes = linspace(0.0, 1.0, 32);
    let (_, loose) = operator
        .pswf_operator(&umodes, &[0.0], &[1.0], &[1e-12], 0.0, 1.0, None)
        .unwrap();
    let (_, strict) = operator
        .pswf_operator(&umodes, &[0.0], &[1.0], &[1e-2], 0.0, 1.0, None)
        .unwrap();
    assert!(strict.len() < loose.len());
    assert!(strict.iter().all(|&v| v > 1e-2));
}

#[test]
fn test_pswf_operator_point_domain() {
    let operator = SincEigenFilter::default();
    let (basis, eigenvalues) = operator
        .pswf_operator(&[2.0, 2.0, 2.0], &[0.0], &[1.0], &[1e-12], 2.0, 2.0, None)
        .unwrap();
    assert_eq!(eigenvalues, array![1.0]);
    assert_eq!(basis.dim(), (3, 1));
    assert!(basis.iter().all(|z| *z == c64::new(1.0, 0.0)));
}

#[test]
fn test_pswf_operator_errors() {
    let operator = SincEigenFilter::default();
    let call = |umodes: &[f64], centres: &[f64], hws: &[f64], cutoffs: &[f64], xmin, xmax| {
        operator
            .pswf_operator(umodes, centres, hws, cutoffs, xmin, xmax, None)
            .map(|_| ())
    };

    assert_eq!(
        call(&[], &[0.0], &[1.0], &[1e-12], 0.0, 1.0),
        Err(FilterError::EmptyUModes)
    );
    assert_eq!(
        call(&[0.5], &[0.0], &[0.0], &[1e-12], 0.0, 1.0),
        Err(FilterError::NonPositiveHalfWidth { half_width: 0.0 })
    );
    assert_eq!(
        call(&[0.5], &[0.0], &[-1.0], &[1e-12], 0.0, 1.0),
        Err(FilterError::NonPositiveHalfWidth { half_width: -1.0 })
    );
    assert_eq!(
        call(&[0.5, 1.5], &[0.0], &[1.0], &[1e-12], 0.0, 1.0),
        Err(FilterError::UModeOutOfDomain {
            u: 1.5,
            xmin: 0.0,
            xmax: 1.0
        })
    );
    assert_eq!(
        call(&[0.5], &[0.0], &[1.0], &[1e-12], 1.0, 0.0),
        Err(FilterError::InvalidDomain {
            xmin: 1.0,
            xmax: 0.0
        })
    );
    assert_eq!(
        call(&[0.5], &[0.25], &[1.0], &[1e-12], 0.0, 1.0),
        Err(FilterError::UnsupportedFilterCentre { centre: 0.25 })
    );
    assert_eq!(
        call(&[0.5], &[0.0], &[1.0, 2.0], &[1e-12], 0.0, 1.0),
        Err(FilterError::MismatchedFilterSpecs {
            centres: 1,
            half_widths: 2,
            cutoffs: 1
        })
    );
    // Tiny excursions from floating-point error are fine.
    assert!(call(&[1.0 + 1e-14], &[0.0], &[1.0], &[1e-12], 0.0, 1.0).is_ok());
}

#[test]
fn test_pswf_operator_nested_bands() {
    // Bands centred on zero collapse to the widest.
    let operator = SincEigenFilter::default();
    let umodes = linspace(0.0, 1.0, 10);
    let (widest, _) = operator
        .pswf_operator(&umodes, &[0.0], &[2.0], &[1e-6], 0.0, 1.0, None)
        .unwrap();
    let (both, _) = operator
        .pswf_operator(&umodes, &[0.0, 0.0], &[0.5, 2.0], &[1e-3, 1e-6], 0.0, 1.0, None)
        .unwrap();
    assert_eq!(widest, both);
}

#[test]
fn test_pswf_operator_huge_half_width() {
    let operator = SincEigenFilter::default();
    let result = operator.pswf_operator(&[0.5], &[0.0], &[1e300], &[1e-12], 0.0, 1.0, None);
    assert_eq!(
        result.map(|_| ()),
        Err(FilterError::GridTooLarge {
            half_width: 1e300,
            xmin: 0.0,
            xmax: 1.0,
            max_points: MAX_GRID_POINTS,
        })
    );
    // Nothing is cached for a kernel that can't be made.
    let mut cache = FilterCache::new();
    assert!(operator
        .pswf_operator(&[0.5], &[0.0], &[f64::MAX], &[1e-12], 0.0, 1.0, Some(&mut cache))
        .is_err());
    assert!(cache.is_empty());
}

#[test]
fn test_pswf_operator_grid_follows_nyquist() {
    let operator = SincEigenFilter {
        oversample: 4.0,
        min_grid_points: 32,
        max_grid_points: 64,
    };
    // The kernel has about 2 hw (xmax - xmin) = 40 significant modes. The
    // grid can hold 41 Nyquist-spaced points, so it's capped at 64 points
    // rather than oversampled, but every significant mode survives.
    let umodes = linspace(0.0, 20.0, 64);
    let (basis, eigenvalues) = operator
        .pswf_operator(&umodes, &[0.0], &[1.0], &[1e-12], 0.0, 20.0, None)
        .unwrap();
    assert!(eigenvalues.len() >= 40);
    assert!(eigenvalues.len() <= 64);
    assert_eq!(basis.ncols(), eigenvalues.len());

    // A domain twice as wide can't be sampled at the Nyquist spacing.
    let umodes = linspace(0.0, 40.0, 64);
    assert_eq!(
        operator
            .pswf_operator(&umodes, &[0.0], &[1.0], &[1e-12], 0.0, 40.0, None)
            .map(|_| ()),
        Err(FilterError::GridTooLarge {
            half_width: 1.0,
            xmin: 0.0,
            xmax: 40.0,
            max_points: 64,
        })
    );
}
