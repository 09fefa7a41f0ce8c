use super::*;
use crate::mapper::{SourceFile, SpectrumAcquisition};
use proptest::prelude::*;
use std::collections::HashSet;

fn peptide(file: &str, scan: i32, sequence: &str, score: f64) -> PeptideRecord {
    PeptideRecord {
        source_file_name: file.to_string(),
        scan_number: scan,
        protein_ids: vec![1],
        sequence: sequence.to_string(),
        modifications: Vec::new(),
        score,
        area: 1000.0 + scan as f64,
        retention_time: 10.0,
        retention_time_start: 9.5,
        retention_time_stop: 10.5,
    }
}

fn acquisition(spectrum_id: i32, file_id: i32, scans: &[i32]) -> SpectrumAcquisition {
    SpectrumAcquisition {
        spectrum_id,
        file_id,
        scan_numbers: scans.to_vec(),
        intensity: 5.0e5 + spectrum_id as f64,
        mass_over_charge: 400.0 + spectrum_id as f64,
        charge: 2,
    }
}

fn mapper() -> SpectrumMapper {
    let mut builder = SpectrumMapper::builder();
    builder
        .register_files([SourceFile::new("/a/run1.raw", 1), SourceFile::new("/a/run2.raw", 2)])
        .unwrap()
        .register_spectra([
            acquisition(100, 1, &[10, 11]),
            acquisition(101, 1, &[12]),
            acquisition(200, 2, &[10]),
        ])
        .unwrap();
    builder.build()
}

#[test]
fn test_grouping_by_spectrum() {
    let mapper = mapper();
    let correlation = correlate(
        vec![
            peptide("/a/run1.raw", 10, "PEPTIDEK", 0.9),
            peptide("/a/run2.raw", 10, "ELVISK", 0.8),
            peptide("/a/run1.raw", 11, "PEPTIDER", 0.7),
            peptide("/a/run1.raw", 12, "LIVESK", 0.6),
        ],
        &mapper,
    );

    let ids: Vec<i32> = correlation.groups.iter().map(|g| g.spectrum_id).collect();
    assert_eq!(ids, vec![100, 200, 101]);

    // Scans 10 and 11 of run1 are the same acquisition.
    let first = &correlation.groups[0];
    assert_eq!(first.matches.len(), 2);
    assert_eq!(first.matches[0].sequence, "PEPTIDEK");
    assert_eq!(first.matches[1].sequence, "PEPTIDER");

    assert_eq!(correlation.features.len(), 4);
    assert_eq!(correlation.match_count(), 4);
    assert_eq!(correlation.unresolved, 0);
}

#[test]
fn test_unresolved_records_are_dropped() {
    let mapper = mapper();
    let correlation = correlate(
        vec![
            peptide("/a/run1.raw", 10, "PEPTIDEK", 0.9),
            peptide("/a/run1.raw", 99, "MISSINGK", 0.9),
            peptide("/a/run3.raw", 10, "NOFILEK", 0.9),
        ],
        &mapper,
    );

    assert_eq!(correlation.groups.len(), 1);
    assert_eq!(correlation.features.len(), 1);
    assert_eq!(correlation.unresolved, 2);
}

#[test]
fn test_feature_values() {
    let mapper = mapper();
    let correlation = correlate(vec![peptide("/a/run2.raw", 10, "ELVISK", 0.8)], &mapper);

    assert_eq!(
        correlation.features[0],
        FeatureRecord {
            file_id: 2,
            intensity: 5.0e5 + 200.0,
            charge_state: 2,
            monoisotopic_mz: 600.0,
            apex_retention_time: 10.0,
            left_retention_time: 9.5,
            right_retention_time: 10.5,
            area: 1010.0,
        }
    );
}

#[test]
fn test_features_are_not_deduplicated() {
    let mapper = mapper();
    let correlation = correlate(
        vec![
            peptide("/a/run1.raw", 10, "PEPTIDEK", 0.9),
            peptide("/a/run1.raw", 10, "PEPTIDEK", 0.5),
        ],
        &mapper,
    );
    assert_eq!(correlation.groups.len(), 1);
    assert_eq!(correlation.features.len(), 2);
}

#[test]
fn test_sentinel_spectrum_is_excluded() {
    let mut builder = SpectrumMapper::builder();
    builder
        .register_files([SourceFile::new("/a/run1.raw", 1)])
        .unwrap()
        .register_spectra([acquisition(UNRESOLVED_SPECTRUM_ID, 1, &[1]), acquisition(7, 1, &[2])])
        .unwrap();
    let mapper = builder.build();

    let correlation = correlate(
        vec![peptide("/a/run1.raw", 1, "AAAK", 0.5), peptide("/a/run1.raw", 2, "CCCK", 0.5)],
        &mapper,
    );

    assert_eq!(correlation.groups.len(), 1);
    assert_eq!(correlation.groups[0].spectrum_id, 7);
    assert_eq!(correlation.features.len(), 1);
    assert_eq!(correlation.unresolved, 1);
}

#[test]
fn test_uniform_ranker_assigns_rank_one() {
    let mapper = mapper();
    let correlation = correlate(
        vec![
            peptide("/a/run1.raw", 10, "PEPTIDEK", 0.2),
            peptide("/a/run1.raw", 11, "PEPTIDER", 0.9),
        ],
        &mapper,
    );
    assert!(correlation.groups[0].matches.iter().all(|m| m.rank == 1));
}

#[test]
fn test_custom_ranker() {
    let mapper = mapper();
    let by_score = |group: &mut PsmGroup| {
        group.matches.sort_by(|a, b| b.score.total_cmp(&a.score));
        for (i, m) in group.matches.iter_mut().enumerate() {
            m.rank = i as u32 + 1;
        }
    };

    let correlation = correlate_with(
        vec![
            peptide("/a/run1.raw", 10, "PEPTIDEK", 0.2),
            peptide("/a/run1.raw", 11, "PEPTIDER", 0.9),
        ],
        &mapper,
        &by_score,
    );

    let group = &correlation.groups[0];
    assert_eq!(group.matches[0].sequence, "PEPTIDER");
    assert_eq!(group.matches[0].rank, 1);
    assert_eq!(group.matches[1].rank, 2);
}

#[test]
fn test_empty_input() {
    let mapper = mapper();
    let correlation = correlate(Vec::new(), &mapper);
    assert_eq!(correlation, Correlation::default());
}

#[test]
fn test_correlator_reports_resolution() {
    let mapper = mapper();
    let mut correlator = Correlator::new(&mapper);
    assert!(correlator.push(peptide("/a/run1.raw", 12, "LIVESK", 0.6)));
    assert!(!correlator.push(peptide("/a/run1.raw", 13, "LIVESK", 0.6)));
    let correlation = correlator.finish(&UniformRanker);
    assert_eq!(correlation.features.len(), 1);
    assert_eq!(correlation.unresolved, 1);
}

proptest! {
    #[test]
    fn test_grouping_is_a_partition(
        rows in prop::collection::vec((0usize..3, 8i32..14), 0..40),
    ) {
        let files = ["/a/run1.raw", "/a/run2.raw", "/a/run3.raw"];
        let mapper = mapper();
        let peptides: Vec<PeptideRecord> = rows
            .iter()
            .map(|&(file, scan)| peptide(files[file], scan, "PEPTIDEK", 0.5))
            .collect();
        let resolvable = peptides
            .iter()
            .filter(|p| mapper.resolve(&p.source_file_name, p.scan_number).is_some())
            .count();

        let correlation = correlate(peptides, &mapper);

        prop_assert_eq!(correlation.features.len(), resolvable);
        prop_assert_eq!(correlation.match_count(), resolvable);
        prop_assert_eq!(correlation.unresolved, rows.len() - resolvable);

        let mut seen = HashSet::new();
        for group in &correlation.groups {
            prop_assert!(!group.matches.is_empty());
            prop_assert!(seen.insert(group.spectrum_id));
        }
    }
}
