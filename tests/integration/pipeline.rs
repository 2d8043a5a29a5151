// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Groups, filters and weights, one after the other.

use approx::assert_abs_diff_eq;
use indexmap::IndexMap;
use indoc::indoc;
use ndarray::prelude::*;
use num_complex::Complex64 as c64;

use super::square_grid;
use mwa_nucal::*;

const NUM_TIMES: usize = 3;

fn freqs() -> Vec<f64> {
    (0..6).map(|i| 150e6 + i as f64 * 10e6).collect()
}

#[test]
fn test_pipeline() -> Result<(), NucalError> {
    let params = NucalParams::from_toml_str(indoc! {r#"
        [radial]
        pols = ["nn"]

        [cuts]
        max_freq_cut = 190e6
    "#})?;

    // A 3x3 grid 14 m apart. Keeping groups of at least two baselines shorter
    // than 30 m leaves the 14 m and 28 m east-west and north-south baselines.
    let mut rr = RadialRedundancy::new(square_grid(3, 14.0), None, &params.radial)?;
    rr.filter_radial_groups(1, None, Some(30.0))?;
    assert_eq!(rr.len(), 2);
    for group in &rr {
        assert_eq!(group.len(), 2);
        let mut lengths = group
            .iter()
            .map(|&bl| rr.baseline_length(bl))
            .collect::<Result<Vec<_>, _>>()?;
        lengths.sort_by(f64::total_cmp);
        assert_abs_diff_eq!(lengths[0], 14.0);
        assert_abs_diff_eq!(lengths[1], 28.0);
    }

    let freqs = freqs();
    let bounds = get_u_bounds(&rr, &freqs)?;
    for &(umin, umax) in &bounds {
        assert_abs_diff_eq!(umin, 14.0 * 150e6 / VEL_C);
        assert_abs_diff_eq!(umax, 28.0 * 200e6 / VEL_C);
    }

    // Both groups have the same lengths, so they share one decomposition.
    let mut cache = FilterCache::new();
    let filters = compute_spatial_filters(
        &rr,
        &freqs,
        &params.filters,
        &SincEigenFilter::default(),
        Some(&mut cache),
    )?;
    assert_eq!(filters.len(), 4);
    assert_eq!(cache.len(), 1);
    assert_eq!(cache.hits(), 3);
    for filter in filters.values() {
        assert_eq!(filter.nrows(), freqs.len());
        assert!(filter.ncols() <= freqs.len());
    }

    let data_bls = rr
        .reds()
        .iter()
        .flat_map(|red| red.iter().copied())
        .collect::<Vec<_>>();
    let data_flags: IndexMap<Baseline, Array2<bool>> = data_bls
        .iter()
        .map(|&bl| (bl, Array2::from_elem((NUM_TIMES, freqs.len()), false)))
        .collect();
    let data_nsamples: IndexMap<Baseline, Array2<f64>> = data_bls
        .iter()
        .map(|&bl| (bl, Array2::ones((NUM_TIMES, freqs.len()))))
        .collect();
    let autos = (0..9).map(|a| Baseline::new(a, a, Pol::NN)).collect::<Vec<_>>();
    let autocorrs: IndexMap<Baseline, Array2<c64>> = autos
        .iter()
        .map(|&bl| (bl, Array2::from_elem((NUM_TIMES, freqs.len()), c64::new(1.0, 0.0))))
        .collect();
    let auto_flags: IndexMap<Baseline, Array2<bool>> = autos
        .iter()
        .map(|&bl| (bl, Array2::from_elem((NUM_TIMES, freqs.len()), false)))
        .collect();
    let inputs = WeightInputs {
        data_flags: &data_flags,
        data_nsamples: &data_nsamples,
        autocorrs: &autocorrs,
        auto_flags: &auto_flags,
    };

    let wgts = build_nucal_wgts(&inputs, &rr, &freqs, &params.cuts, &FlagWeights)?;
    assert_eq!(wgts.len(), data_bls.len());
    // Everything spatially redundant with a 14 m east-west baseline is
    // weighted, except for the channel above the frequency cut.
    for bl in [(0, 1), (1, 2), (4, 5), (7, 8)] {
        let wgt = &wgts[&Baseline::new(bl.0, bl.1, Pol::NN)];
        assert_abs_diff_eq!(wgt.slice(s![.., ..5]), Array2::<f64>::ones((NUM_TIMES, 5)));
        assert_abs_diff_eq!(wgt.slice(s![.., 5]), Array1::<f64>::zeros(NUM_TIMES));
    }
    // Diagonals were filtered out of the radially redundant groups.
    assert!(wgts[&Baseline::new(0, 4, Pol::NN)].iter().all(|&w| w == 0.0));

    Ok(())
}

#[test]
fn test_errors_convert() {
    let rr = RadialRedundancy::new(square_grid(2, 14.0), None, &RadialRedundancyParams::default())
        .unwrap();

    let err: NucalError = get_u_bounds(&rr, &[]).unwrap_err().into();
    assert!(matches!(err, NucalError::Filter(FilterError::EmptyFreqs)));
    assert_eq!(err.to_string(), "No frequencies were supplied");

    let missing = Baseline::new(0, 7, Pol::NN);
    let err: NucalError = rr.get_redundant_group(missing).unwrap_err().into();
    assert!(matches!(
        err,
        NucalError::RadialRedundancy(RadialRedundancyError::BaselineNotFound { .. })
    ));
    assert!(err.to_string().contains("(0, 7, nn)"));
}
