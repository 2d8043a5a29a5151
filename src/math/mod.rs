// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Some helper mathematics.


use std::f64::consts::PI;

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::prelude::*;

/// Normalised sinc, sin(pi x) / (pi x).
///
/// # Examples
///
/// `assert_abs_diff_eq!(sinc(0.5), 2.0 / PI);`
#[inline]
pub(crate) fn sinc(x: f64) -> f64 {
    if x == 0.0 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Eigendecomposition of a real, symmetric matrix. Only the lower triangle
/// of `a` is read.
///
/// Returns the eigenvalues in descending order and a matrix whose columns are
/// the corresponding (orthonormal) eigenvectors.
pub(crate) fn eigh(a: ArrayView2<f64>) -> (Array1<f64>, Array2<f64>) {
    let n = a.nrows();
    assert_eq!(n, a.ncols(), "eigh needs a square matrix");
    let eig = SymmetricEigen::new(DMatrix::from_fn(n, n, |i, j| a[[i, j]]));

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| eig.eigenvalues[j].total_cmp(&eig.eigenvalues[i]));
    let eigenvalues = order.iter().map(|&i| eig.eigenvalues[i]).collect::<Array1<f64>>();
    let eigenvectors =
        Array2::from_shape_fn((n, n), |(row, col)| eig.eigenvectors[(row, order[col])]);
    (eigenvalues, eigenvectors)
}

/// Linearly interpolate samples `ys`, taken on a regular grid starting at `x0`
/// with spacing `dx`, at `x`. Outside the grid, the nearest sample is used.
pub(crate) fn interp_regular(ys: ArrayView1<f64>, x0: f64, dx: f64, x: f64) -> f64 {
    let n = ys.len();
    if n == 1 || dx == 0.0 {
        return ys[0];
    }
    let pos = ((x - x0) / dx).clamp(0.0, (n - 1) as f64);
    let i0 = (pos.floor() as usize).min(n - 2);
    let frac = pos - i0 as f64;
    ys[i0] * (1.0 - frac) + ys[i0 + 1] * frac
}
