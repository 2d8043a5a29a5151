// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! A cache of eigen-decompositions shared between filter computations.

use std::collections::HashMap;

use ndarray::prelude::*;

/// Identifies a gridded eigen-decomposition. Floats are stored as their bit
/// patterns, so only identical inputs share an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct FilterCacheKey {
    half_width: u64,
    eigenval_cutoff: u64,
    xmin: u64,
    xmax: u64,
    num_points: usize,
}

impl FilterCacheKey {
    pub(crate) fn new(
        half_width: f64,
        eigenval_cutoff: f64,
        xmin: f64,
        xmax: f64,
        num_points: usize,
    ) -> FilterCacheKey {
        FilterCacheKey {
            half_width: half_width.to_bits(),
            eigenval_cutoff: eigenval_cutoff.to_bits(),
            xmin: xmin.to_bits(),
            xmax: xmax.to_bits(),
            num_points,
        }
    }
}

/// Eigenvectors sampled on a regular grid over a filter domain.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct GridModes {
    /// The first grid coordinate.
    pub(crate) x0: f64,

    /// The grid spacing. Zero if the grid has a single point.
    pub(crate) dx: f64,

    /// Kept eigenvectors, one per column, in descending eigenvalue order.
    /// The first dimension is the grid.
    pub(crate) vectors: Array2<f64>,

    /// Kept eigenvalues, normalised by the largest.
    pub(crate) eigenvalues: Array1<f64>,
}

/// Eigen-decompositions keyed by filter half width, eigenvalue cutoff, domain
/// and sampling grid.
///
/// Baselines in a radially redundant group share a domain, so they can all
/// reuse one decomposition. A cache is only ever changed through `&mut`; it
/// has no internal synchronisation, and callers sharing one between threads
/// must lock it themselves.
#[derive(Debug, Clone, Default)]
pub struct FilterCache {
    modes: HashMap<FilterCacheKey, GridModes>,
    hits: usize,
    misses: usize,
}

impl FilterCache {
    pub fn new() -> FilterCache {
        FilterCache::default()
    }

    /// The number of decompositions held.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    /// How many lookups have been served from the cache.
    pub fn hits(&self) -> usize {
        self.hits
    }

    /// How many lookups had to compute a decomposition.
    pub fn misses(&self) -> usize {
        self.misses
    }

    pub fn clear(&mut self) {
        self.modes.clear();
        self.hits = 0;
        self.misses = 0;
    }

    pub(crate) fn get_or_insert_with<F>(&mut self, key: FilterCacheKey, f: F) -> &GridModes
    where
        F: FnOnce() -> GridModes,
    {
        if self.modes.contains_key(&key) {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        self.modes.entry(key).or_insert_with(f)
    }
}
