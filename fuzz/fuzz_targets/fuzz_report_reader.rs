#![no_main]

use diann_bridge::report::{
    decode_modified_sequence, PeptideReader, ProteinGroupReader, ReportOptions,
    DEFAULT_MODIFICATION_MARKER,
};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // The decoder must reject malformed annotations without panicking
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(decoded) = decode_modified_sequence(text, DEFAULT_MODIFICATION_MARKER) {
            assert!(decoded.sequence.len() <= text.len());
        }
    }

    let options = ReportOptions::default();

    // Malformed reports must surface as errors, never panics
    if let Ok(reader) = PeptideReader::from_reader(Cursor::new(data), &options) {
        for record in reader.take(1000) {
            let _ = record;
        }
    }

    if let Ok(reader) = ProteinGroupReader::from_reader(Cursor::new(data), &["A", "B"], &options) {
        for record in reader.take(1000) {
            let _ = record;
        }
    }
});
