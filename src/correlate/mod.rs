//! # PSM Correlation & Grouping
//!
//! Joins parsed report records with the spectrum catalog:
//!
//! - every record whose (file, scan) resolves becomes one [`PeptideMatch`] in
//!   the [`PsmGroup`] of its spectrum, and one [`FeatureRecord`];
//! - records that do not resolve are counted and dropped, since DIA-NN reports
//!   identifications for scans the host does not track.
//!
//! Groups are handed to a [`MatchRanker`] before they are returned.

mod ranking;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::mapper::{SpectrumMapper, SpectrumRecord, UNRESOLVED_SPECTRUM_ID};
use crate::report::{Modification, PeptideRecord};

pub use ranking::{MatchRanker, UniformRanker};

/// A peptide hypothesis for one spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeptideMatch {
    /// Unmodified residue sequence
    pub sequence: String,
    /// Positioned modifications
    pub modifications: Vec<Modification>,
    /// Protein identifiers the peptide maps to
    pub protein_ids: Vec<i32>,
    /// Search engine score (CScore)
    pub score: f64,
    /// Rank within the group, assigned by a [`MatchRanker`]; 0 until ranked
    pub rank: u32,
}

impl From<PeptideRecord> for PeptideMatch {
    fn from(record: PeptideRecord) -> Self {
        Self {
            sequence: record.sequence,
            modifications: record.modifications,
            protein_ids: record.protein_ids,
            score: record.score,
            rank: 0,
        }
    }
}

/// All matches made against one spectrum
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsmGroup {
    /// Internal spectrum id
    pub spectrum_id: i32,
    /// Matches in report order
    pub matches: Vec<PeptideMatch>,
}

/// Chromatographic feature derived from one resolved identification
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    /// Internal file id
    pub file_id: i32,
    /// Precursor intensity of the spectrum
    pub intensity: f64,
    /// Precursor charge of the spectrum
    pub charge_state: i16,
    /// Monoisotopic precursor m/z of the spectrum
    pub monoisotopic_mz: f64,
    /// Apex retention time of the peptide
    pub apex_retention_time: f64,
    /// Elution start of the peptide
    pub left_retention_time: f64,
    /// Elution end of the peptide
    pub right_retention_time: f64,
    /// MS1 area of the peptide
    pub area: f64,
}

impl FeatureRecord {
    /// Combine spectrum-level and peptide-level values
    pub fn new(peptide: &PeptideRecord, spectrum: &SpectrumRecord) -> Self {
        Self {
            file_id: spectrum.file_id,
            intensity: spectrum.intensity,
            charge_state: spectrum.charge,
            monoisotopic_mz: spectrum.mass_over_charge,
            apex_retention_time: peptide.retention_time,
            left_retention_time: peptide.retention_time_start,
            right_retention_time: peptide.retention_time_stop,
            area: peptide.area,
        }
    }
}

/// Output of correlating one report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlation {
    /// Ranked match groups, in order of first appearance of their spectrum
    pub groups: Vec<PsmGroup>,
    /// One feature per resolved record, in report order
    pub features: Vec<FeatureRecord>,
    /// Records whose spectrum could not be resolved
    pub unresolved: usize,
}

impl Correlation {
    /// Total number of matches over all groups
    pub fn match_count(&self) -> usize {
        self.groups.iter().map(|g| g.matches.len()).sum()
    }
}

/// Incremental correlation of records against a sealed mapper.
///
/// Feed records with [`push`](Self::push) as they are parsed, then call
/// [`finish`](Self::finish) once.
#[derive(Debug)]
pub struct Correlator<'a> {
    mapper: &'a SpectrumMapper,
    groups: Vec<PsmGroup>,
    group_index: HashMap<i32, usize>,
    features: Vec<FeatureRecord>,
    unresolved: usize,
}

impl<'a> Correlator<'a> {
    /// Start correlating against `mapper`
    pub fn new(mapper: &'a SpectrumMapper) -> Self {
        Self {
            mapper,
            groups: Vec::new(),
            group_index: HashMap::new(),
            features: Vec::new(),
            unresolved: 0,
        }
    }

    /// Add one record; returns whether it resolved to a spectrum
    pub fn push(&mut self, peptide: PeptideRecord) -> bool {
        let spectrum = match self
            .mapper
            .resolve(&peptide.source_file_name, peptide.scan_number)
        {
            Some(spectrum) if spectrum.spectrum_id != UNRESOLVED_SPECTRUM_ID => *spectrum,
            _ => {
                self.unresolved += 1;
                return false;
            }
        };

        self.features.push(FeatureRecord::new(&peptide, &spectrum));

        let index = *self
            .group_index
            .entry(spectrum.spectrum_id)
            .or_insert_with(|| {
                self.groups.push(PsmGroup {
                    spectrum_id: spectrum.spectrum_id,
                    matches: Vec::new(),
                });
                self.groups.len() - 1
            });
        self.groups[index].matches.push(PeptideMatch::from(peptide));
        true
    }

    /// Rank every group and return the result
    pub fn finish<K: MatchRanker + ?Sized>(mut self, ranker: &K) -> Correlation {
        for group in &mut self.groups {
            ranker.rank(group);
        }

        debug!(
            "Correlated {} features into {} spectrum groups ({} unresolved)",
            self.features.len(),
            self.groups.len(),
            self.unresolved
        );

        Correlation {
            groups: self.groups,
            features: self.features,
            unresolved: self.unresolved,
        }
    }
}

/// Correlate records and rank groups with [`UniformRanker`]
pub fn correlate<I>(peptides: I, mapper: &SpectrumMapper) -> Correlation
where
    I: IntoIterator<Item = PeptideRecord>,
{
    correlate_with(peptides, mapper, &UniformRanker)
}

/// Correlate records and rank groups with `ranker`
pub fn correlate_with<I, K>(peptides: I, mapper: &SpectrumMapper, ranker: &K) -> Correlation
where
    I: IntoIterator<Item = PeptideRecord>,
    K: MatchRanker + ?Sized,
{
    let mut correlator = Correlator::new(mapper);
    for peptide in peptides {
        correlator.push(peptide);
    }
    correlator.finish(ranker)
}
