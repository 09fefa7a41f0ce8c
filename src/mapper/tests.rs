use super::*;

fn acquisition(spectrum_id: i32, file_id: i32, scan_numbers: &[i32]) -> SpectrumAcquisition {
    SpectrumAcquisition {
        spectrum_id,
        file_id,
        scan_numbers: scan_numbers.to_vec(),
        intensity: 1.0e6,
        mass_over_charge: 512.77,
        charge: 2,
    }
}

fn sample_mapper() -> SpectrumMapper {
    let mut builder = SpectrumMapper::builder();
    builder
        .register_files([SourceFile::new("/a/run1.raw", 1)])
        .unwrap()
        .register_spectra([acquisition(100, 1, &[55, 56])])
        .unwrap();
    builder.build()
}

#[test]
fn test_two_level_resolution() {
    let mapper = sample_mapper();

    assert_eq!(mapper.resolve("/a/run1.raw", 55).unwrap().spectrum_id, 100);
    assert_eq!(mapper.resolve("/a/run1.raw", 56).unwrap().spectrum_id, 100);
    assert!(mapper.resolve("/a/run1.raw", 99).is_none());
    assert!(mapper.resolve("/unknown.raw", 55).is_none());

    assert_eq!(mapper.file_count(), 1);
    assert_eq!(mapper.scan_count(), 2);
}

#[test]
fn test_paths_match_exactly() {
    let mapper = sample_mapper();
    assert!(mapper.resolve("/a/RUN1.raw", 55).is_none());
    assert!(mapper.resolve("run1.raw", 55).is_none());
    assert!(mapper.resolve("/a/run1.raw ", 55).is_none());
}

#[test]
fn test_record_values() {
    let mapper = sample_mapper();
    let record = mapper.resolve("/a/run1.raw", 55).unwrap();
    assert_eq!(
        *record,
        SpectrumRecord {
            spectrum_id: 100,
            file_id: 1,
            intensity: 1.0e6,
            mass_over_charge: 512.77,
            charge: 2,
        }
    );
}

#[test]
fn test_scan_numbers_are_file_scoped() {
    let mut builder = SpectrumMapper::builder();
    builder
        .register_files([SourceFile::new("/a/run1.raw", 1), SourceFile::new("/a/run2.raw", 2)])
        .unwrap()
        .register_spectra([acquisition(100, 1, &[7]), acquisition(200, 2, &[7])])
        .unwrap();
    let mapper = builder.build();

    assert_eq!(mapper.resolve("/a/run1.raw", 7).unwrap().spectrum_id, 100);
    assert_eq!(mapper.resolve("/a/run2.raw", 7).unwrap().spectrum_id, 200);
}

#[test]
fn test_spectra_may_be_registered_before_files() {
    let mut builder = SpectrumMapper::builder();
    builder.register_spectra([acquisition(5, 3, &[11])]).unwrap();
    builder.register_files([SourceFile::new("/b/run.raw", 3)]).unwrap();
    let mapper = builder.build();

    assert_eq!(mapper.resolve("/b/run.raw", 11).unwrap().spectrum_id, 5);
}

#[test]
fn test_duplicate_file_is_fatal() {
    let mut builder = SpectrumMapper::builder();
    builder.register_files([SourceFile::new("/a/run1.raw", 1)]).unwrap();
    let err = builder
        .register_files([SourceFile::new("/a/run1.raw", 2)])
        .unwrap_err();
    assert_eq!(
        err,
        MapperError::DuplicateFile {
            path: "/a/run1.raw".to_string(),
            existing: 1,
            file_id: 2,
        }
    );

    let mut builder = SpectrumMapper::builder();
    assert!(builder
        .register_files([SourceFile::new("/a/run1.raw", 1), SourceFile::new("/a/run1.raw", 1)])
        .is_err());
}

#[test]
fn test_duplicate_scan_is_fatal() {
    let mut builder = SpectrumMapper::builder();
    builder.register_spectra([acquisition(100, 1, &[55])]).unwrap();
    let err = builder
        .register_spectra([acquisition(101, 1, &[55])])
        .unwrap_err();
    assert_eq!(
        err,
        MapperError::DuplicateScan {
            file_id: 1,
            scan_number: 55,
            existing: 100,
            spectrum_id: 101,
        }
    );

    let mut builder = SpectrumMapper::builder();
    assert!(builder
        .register_spectra([acquisition(100, 1, &[55, 55])])
        .is_err());
}

#[test]
fn test_independent_mappers() {
    let first = sample_mapper();
    let mut builder = SpectrumMapper::builder();
    builder.register_files([SourceFile::new("/a/run1.raw", 9)]).unwrap();
    let second = builder.build();

    assert!(first.resolve("/a/run1.raw", 55).is_some());
    assert!(second.resolve("/a/run1.raw", 55).is_none());
    assert_eq!(second.file_id("/a/run1.raw"), Some(9));
}

const CATALOG: &str = r#"{
  "files": [{ "path": "/a/run1.raw", "file_id": 1 }],
  "spectra": [
    { "spectrum_id": 100, "file_id": 1, "scan_numbers": [55, 56],
      "intensity": 1.2e6, "mass_over_charge": 512.77, "charge": 2 }
  ]
}"#;

#[test]
fn test_catalog_to_mapper() {
    let catalog = SpectrumCatalog::from_reader(CATALOG.as_bytes()).unwrap();
    assert_eq!(catalog.files.len(), 1);
    assert_eq!(catalog.spectra[0].scan_numbers, vec![55, 56]);

    let mapper = catalog.to_mapper().unwrap();
    let record = mapper.resolve("/a/run1.raw", 56).unwrap();
    assert_eq!(record.spectrum_id, 100);
    assert_eq!(record.charge, 2);
}

#[test]
fn test_catalog_json_roundtrip() {
    let catalog = SpectrumCatalog::from_reader(CATALOG.as_bytes()).unwrap();
    let json = catalog.to_json().unwrap();
    let restored = SpectrumCatalog::from_reader(json.as_bytes()).unwrap();
    assert_eq!(restored, catalog);
}

#[test]
fn test_catalog_with_duplicate_scan() {
    let catalog = SpectrumCatalog {
        files: vec![SourceFile::new("/a/run1.raw", 1)],
        spectra: vec![acquisition(1, 1, &[3]), acquisition(2, 1, &[3])],
    };
    assert!(matches!(
        catalog.to_mapper(),
        Err(CatalogError::MapperError(MapperError::DuplicateScan { .. }))
    ));
}

#[test]
fn test_empty_catalog() {
    let catalog = SpectrumCatalog::from_reader("{}".as_bytes()).unwrap();
    let mapper = catalog.to_mapper().unwrap();
    assert_eq!(mapper.file_count(), 0);
}
