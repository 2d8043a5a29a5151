// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Groups of radially redundant baselines.
//!
//! Spatially redundant baselines sample the same u-modes; radially redundant
//! baselines point in the same direction (and have the same polarisation), but
//! may have different lengths, so that together they sample a wider range of
//! u-modes over a band. [`RadialRedundancy`] keeps both kinds of groups and
//! the mappings from each baseline to its groups.

mod error;

pub use error::{GroupKind, InvalidGroupError, RadialRedundancyError};

use std::{
    borrow::Cow,
    collections::{HashMap, HashSet},
    ops::Index,
};

use log::{debug, trace};
use vec1::{vec1, Vec1};

use crate::{
    baseline::{Baseline, Pol},
    clustering::{get_unique_orientations, DistanceClusterer, SingleLinkage},
    geometry::{baseline_length, same_orientation, AntennaPositions},
    params::RadialRedundancyParams,
    redundancy::{RedundancyFinder, SimpleRedundancyFinder},
};

/// Where a baseline lives in a list of groups. `reversed` is whether the
/// baseline is stored with `ant1 > ant2`; mappings are keyed by
/// [`Baseline::canonical`].
#[derive(Debug, Clone, Copy)]
struct GroupRef {
    index: usize,
    reversed: bool,
}

/// Map every baseline in `groups` to its group.
fn index_groups(groups: &[Vec1<Baseline>]) -> HashMap<Baseline, GroupRef> {
    let mut map = HashMap::with_capacity(groups.iter().map(|g| g.len()).sum());
    for (index, group) in groups.iter().enumerate() {
        for bl in group.iter() {
            let (canonical, reversed) = bl.canonical();
            map.insert(canonical, GroupRef { index, reversed });
        }
    }
    map
}

/// Find the group containing `key` in either orientation. The returned bool
/// is whether the group has to be reversed to match the orientation of `key`.
fn resolve(map: &HashMap<Baseline, GroupRef>, key: Baseline) -> Option<(usize, bool)> {
    let (canonical, key_reversed) = key.canonical();
    map.get(&canonical)
        .map(|gr| (gr.index, gr.reversed != key_reversed))
}

/// Drop baselines that repeat an earlier one in either orientation. The first
/// occurrence is kept.
fn dedup_conjugates(group: Vec1<Baseline>) -> Vec1<Baseline> {
    let (first, rest) = group.split_off_first();
    let mut deduped = vec1![first];
    for bl in rest {
        if !deduped.iter().any(|e| e.is_conjugate_equal(bl)) {
            deduped.push(bl);
        }
    }
    deduped
}

fn oriented(group: &Vec1<Baseline>, reverse: bool) -> Cow<'_, Vec1<Baseline>> {
    if reverse {
        Cow::Owned(group.mapped_ref(|bl| bl.reversed()))
    } else {
        Cow::Borrowed(group)
    }
}

/// A list-like collection of radially redundant baseline groups, which also
/// knows the spatially redundant group of every baseline.
///
/// Every mutating method validates its input before touching anything and
/// rebuilds the baseline-to-group mappings before returning, so a
/// `RadialRedundancy` is never observed with stale mappings.
#[derive(Debug, Clone)]
pub struct RadialRedundancy {
    antpos: AntennaPositions,
    blvec_error_tol: f64,

    /// Spatially redundant groups. Baselines added through radially redundant
    /// groups that weren't already here get their own group.
    reds: Vec<Vec1<Baseline>>,

    radial_groups: Vec<Vec1<Baseline>>,

    /// Keyed by canonical baseline.
    baseline_lengths: HashMap<Baseline, f64>,

    bl_to_red: HashMap<Baseline, GroupRef>,
    bl_to_radial: HashMap<Baseline, GroupRef>,
}

impl RadialRedundancy {
    /// Make radially redundant groups from antenna positions and spatially
    /// redundant groups. If `reds` is `None`, the spatially redundant groups
    /// are found with [`SimpleRedundancyFinder`] for the polarisations in
    /// `params`.
    pub fn new(
        antpos: AntennaPositions,
        reds: Option<Vec<Vec1<Baseline>>>,
        params: &RadialRedundancyParams,
    ) -> Result<RadialRedundancy, RadialRedundancyError> {
        Self::with_collaborators(antpos, reds, params, &SimpleRedundancyFinder, &SingleLinkage)
    }

    /// As [`RadialRedundancy::new`], but with the given means of finding
    /// spatially redundant groups and clustering orientations.
    pub fn with_collaborators<F, C>(
        antpos: AntennaPositions,
        reds: Option<Vec<Vec1<Baseline>>>,
        params: &RadialRedundancyParams,
        finder: &F,
        clusterer: &C,
    ) -> Result<RadialRedundancy, RadialRedundancyError>
    where
        F: RedundancyFinder + ?Sized,
        C: DistanceClusterer + ?Sized,
    {
        let reds = match reds {
            Some(reds) => reds,
            None => finder.get_reds(&antpos, &params.pols, params.bl_error_tol)?,
        };

        let radial_groups = get_unique_orientations(
            &antpos,
            &reds,
            params.min_ubl_per_orient,
            params.blvec_error_tol,
            clusterer,
        )?;

        let mut baseline_lengths = HashMap::new();
        for bl in reds.iter().flat_map(|red| red.iter()) {
            baseline_lengths.insert(bl.canonical().0, baseline_length(*bl, &antpos)?);
        }

        debug!(
            "Made {} radially redundant groups from {} spatially redundant groups",
            radial_groups.len(),
            reds.len()
        );
        let mut rr = RadialRedundancy {
            antpos,
            blvec_error_tol: params.blvec_error_tol,
            reds,
            radial_groups,
            baseline_lengths,
            bl_to_red: HashMap::new(),
            bl_to_radial: HashMap::new(),
        };
        rr.reset_mappings();
        Ok(rr)
    }

    fn reset_mappings(&mut self) {
        self.bl_to_red = index_groups(&self.reds);
        self.bl_to_radial = index_groups(&self.radial_groups);
    }

    pub fn antpos(&self) -> &AntennaPositions {
        &self.antpos
    }

    pub fn blvec_error_tol(&self) -> f64 {
        self.blvec_error_tol
    }

    /// All spatially redundant groups.
    pub fn reds(&self) -> &[Vec1<Baseline>] {
        &self.reds
    }

    /// All radially redundant groups.
    pub fn radial_groups(&self) -> &[Vec1<Baseline>] {
        &self.radial_groups
    }

    /// The number of radially redundant groups.
    pub fn len(&self) -> usize {
        self.radial_groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.radial_groups.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Vec1<Baseline>> {
        self.radial_groups.iter()
    }

    /// The length of a baseline in either orientation \[metres\].
    pub fn baseline_length(&self, key: Baseline) -> Result<f64, RadialRedundancyError> {
        self.baseline_lengths
            .get(&key.canonical().0)
            .copied()
            .ok_or(RadialRedundancyError::BaselineNotFound {
                baseline: key,
                kind: GroupKind::Spatial,
            })
    }

    /// Get the baselines that are spatially redundant with `key`. The group is
    /// oriented so that it contains `key` as given, even if `key` is stored
    /// reversed.
    pub fn get_redundant_group(
        &self,
        key: Baseline,
    ) -> Result<Cow<'_, Vec1<Baseline>>, RadialRedundancyError> {
        let (index, reverse) =
            resolve(&self.bl_to_red, key).ok_or(RadialRedundancyError::BaselineNotFound {
                baseline: key,
                kind: GroupKind::Spatial,
            })?;
        Ok(oriented(&self.reds[index], reverse))
    }

    /// Get the baselines with the same radial heading (and polarisation) as
    /// `key`.
    ///
    /// `key` need not be in a radially redundant group itself; if it isn't,
    /// the radially redundant group of the first baseline of its spatially
    /// redundant group is used. The group is oriented to agree with `key`.
    pub fn get_radial_group(
        &self,
        key: Baseline,
    ) -> Result<Cow<'_, Vec1<Baseline>>, RadialRedundancyError> {
        let not_found = RadialRedundancyError::BaselineNotFound {
            baseline: key,
            kind: GroupKind::Radial,
        };

        if let Some((index, reverse)) = resolve(&self.bl_to_radial, key) {
            return Ok(oriented(&self.radial_groups[index], reverse));
        }

        let red = self.get_redundant_group(key)?;
        let (index, reverse) = resolve(&self.bl_to_radial, *red.first()).ok_or(not_found)?;
        Ok(oriented(&self.radial_groups[index], reverse))
    }

    /// Get all radially redundant groups with a given polarisation.
    pub fn get_pol(&self, pol: Pol) -> Vec<&Vec1<Baseline>> {
        self.radial_groups
            .iter()
            .filter(|group| group.first().pol == pol)
            .collect()
    }

    /// Filter each radially redundant group to exclude baselines with lengths
    /// less than or equal to `min_bl_cut` or greater than or equal to
    /// `max_bl_cut` \[metres\]. Groups left with `min_nbls` or fewer baselines
    /// are removed completely.
    pub fn filter_radial_groups(
        &mut self,
        min_nbls: usize,
        min_bl_cut: Option<f64>,
        max_bl_cut: Option<f64>,
    ) -> Result<(), RadialRedundancyError> {
        let mut radial_reds = Vec::with_capacity(self.radial_groups.len());
        for group in &self.radial_groups {
            let mut filtered_group = Vec::with_capacity(group.len());
            for &bl in group.iter() {
                let length = self.baseline_length(bl)?;
                if max_bl_cut.map(|max| length < max).unwrap_or(true)
                    && min_bl_cut.map(|min| length > min).unwrap_or(true)
                {
                    filtered_group.push(bl);
                }
            }

            if filtered_group.len() > min_nbls {
                if let Ok(group) = Vec1::try_from_vec(filtered_group) {
                    radial_reds.push(group);
                }
            }
        }

        debug!(
            "Filtered radially redundant groups: {} -> {}",
            self.radial_groups.len(),
            radial_reds.len()
        );
        self.radial_groups = radial_reds;
        self.reset_mappings();
        Ok(())
    }

    /// Add a radially redundant group. If a group with the same heading and
    /// polarisation already exists, the baselines are merged into that group
    /// (reoriented to agree with it, without duplicates); otherwise the group
    /// is appended.
    pub fn add_radial_group(&mut self, group: Vec<Baseline>) -> Result<(), RadialRedundancyError> {
        let group = self.check_new_group(group)?;
        let lengths = self.lengths_of(&group)?;

        match self.find_same_heading(*group.first(), None)? {
            Some((index, reverse)) => {
                trace!(
                    "Merging {} baselines into the radially redundant group of {}",
                    group.len(),
                    self.radial_groups[index].first()
                );
                let existing = &mut self.radial_groups[index];
                for bl in group.into_vec() {
                    let bl = if reverse { bl.reversed() } else { bl };
                    if !existing.iter().any(|e| e.is_conjugate_equal(bl)) {
                        existing.push(bl);
                    }
                }
            }
            None => self.radial_groups.push(dedup_conjugates(group)),
        }

        self.commit_new_baselines(lengths);
        Ok(())
    }

    /// Append a radially redundant group. Unlike
    /// [`RadialRedundancy::add_radial_group`], this fails if a group with the
    /// same heading and polarisation already exists.
    pub fn append(&mut self, group: Vec<Baseline>) -> Result<(), RadialRedundancyError> {
        let group = self.check_new_group(group)?;
        let lengths = self.lengths_of(&group)?;
        self.check_unique_heading(*group.first(), None)?;

        self.radial_groups.push(dedup_conjugates(group));
        self.commit_new_baselines(lengths);
        Ok(())
    }

    /// Replace the radially redundant group at `index`. Fails if another group
    /// has the same heading and polarisation as `group`.
    pub fn set(&mut self, index: usize, group: Vec<Baseline>) -> Result<(), RadialRedundancyError> {
        if index >= self.radial_groups.len() {
            return Err(RadialRedundancyError::IndexOutOfBounds {
                index,
                len: self.radial_groups.len(),
            });
        }
        let group = self.check_new_group(group)?;
        let lengths = self.lengths_of(&group)?;
        self.check_unique_heading(*group.first(), Some(index))?;

        self.radial_groups[index] = dedup_conjugates(group);
        self.commit_new_baselines(lengths);
        Ok(())
    }

    /// Sort the radially redundant groups by size, largest first. Groups of
    /// equal size keep their order.
    pub fn sort(&mut self) {
        self.radial_groups.sort_by(|a, b| b.len().cmp(&a.len()));
        self.reset_mappings();
    }

    /// Sort the radially redundant groups (stably, ascending) by a key.
    pub fn sort_by_key<K, F>(&mut self, f: F)
    where
        K: Ord,
        F: FnMut(&Vec1<Baseline>) -> K,
    {
        self.radial_groups.sort_by_key(f);
        self.reset_mappings();
    }

    /// Check that a list of baselines is actually radially redundant.
    fn check_new_group(
        &self,
        group: Vec<Baseline>,
    ) -> Result<Vec1<Baseline>, RadialRedundancyError> {
        let group = Vec1::try_from_vec(group).map_err(|_| InvalidGroupError::Empty)?;
        let first = *group.first();
        for &other in group.iter().skip(1) {
            if !same_orientation(first, other, &self.antpos, self.blvec_error_tol)? {
                return Err(InvalidGroupError::OrientationMismatch { first, other }.into());
            }
            if first.pol != other.pol {
                return Err(InvalidGroupError::PolarisationMismatch { first, other }.into());
            }
        }
        Ok(group)
    }

    /// Find an existing group with the same heading and polarisation as `bl`,
    /// ignoring the group at `skip`. The returned bool is whether `bl` points
    /// the opposite way to the group.
    fn find_same_heading(
        &self,
        bl: Baseline,
        skip: Option<usize>,
    ) -> Result<Option<(usize, bool)>, RadialRedundancyError> {
        for (index, group) in self.radial_groups.iter().enumerate() {
            let existing = *group.first();
            if Some(index) == skip || existing.pol != bl.pol {
                continue;
            }
            if same_orientation(bl, existing, &self.antpos, self.blvec_error_tol)? {
                return Ok(Some((index, false)));
            }
            if same_orientation(bl.reversed(), existing, &self.antpos, self.blvec_error_tol)? {
                return Ok(Some((index, true)));
            }
        }
        Ok(None)
    }

    fn check_unique_heading(
        &self,
        bl: Baseline,
        skip: Option<usize>,
    ) -> Result<(), RadialRedundancyError> {
        match self.find_same_heading(bl, skip)? {
            Some((index, _)) => Err(RadialRedundancyError::DuplicateOrientation {
                baseline: bl,
                existing: *self.radial_groups[index].first(),
            }),
            None => Ok(()),
        }
    }

    fn lengths_of(
        &self,
        group: &Vec1<Baseline>,
    ) -> Result<Vec<(Baseline, f64)>, RadialRedundancyError> {
        group
            .iter()
            .map(|&bl| -> Result<_, RadialRedundancyError> {
                Ok((bl, baseline_length(bl, &self.antpos)?))
            })
            .collect()
    }

    /// Record the lengths of newly-added baselines, give any baseline without
    /// a spatially redundant group its own group, then rebuild the mappings.
    fn commit_new_baselines(&mut self, lengths: Vec<(Baseline, f64)>) {
        let mut seen = HashSet::new();
        for (bl, length) in lengths {
            let canonical = bl.canonical().0;
            self.baseline_lengths.insert(canonical, length);
            if !self.bl_to_red.contains_key(&canonical) && seen.insert(canonical) {
                self.reds.push(vec1![bl]);
            }
        }
        self.reset_mappings();
    }
}

impl Index<usize> for RadialRedundancy {
    type Output = Vec1<Baseline>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.radial_groups[index]
    }
}

impl<'a> IntoIterator for &'a RadialRedundancy {
    type Item = &'a Vec1<Baseline>;
    type IntoIter = std::slice::Iter<'a, Vec1<Baseline>>;

    fn into_iter(self) -> Self::IntoIter {
        self.radial_groups.iter()
    }
}
