//! Decoding of DIA-NN modified sequences such as `AC(UniMod:4)DEM(UniMod:35)K`.

use serde::{Deserialize, Serialize};

use super::ModificationError;

/// Annotation prefix DIA-NN writes before a UniMod accession
pub const DEFAULT_MODIFICATION_MARKER: &str = "(UniMod:";

const ANNOTATION_END: char = ')';

/// A modification attached to a residue of the stripped sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Modification {
    /// 0-based residue index into the stripped sequence; `-1` is the peptide N-terminus
    pub position: i32,
    /// External accession of the modification type (UniMod id)
    pub reference_id: i32,
}

impl Modification {
    /// True for an annotation that precedes the first residue
    pub fn is_n_terminal(&self) -> bool {
        self.position < 0
    }
}

/// Result of decoding an annotated sequence
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DecodedSequence {
    /// Residues with every annotation removed
    pub sequence: String,
    /// Modifications in the order they appear in the annotation
    pub modifications: Vec<Modification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Plain,
    Accession,
}

/// Decode an annotated sequence into residues and positioned modifications.
///
/// `marker` opens an annotation and is matched ignoring ASCII case; the
/// accession runs from the end of the marker to the next `)`. Each modification
/// is attached to the residue immediately before its annotation, i.e. its
/// position is the number of residues seen so far minus one.
pub fn decode_modified_sequence(
    text: &str,
    marker: &str,
) -> Result<DecodedSequence, ModificationError> {
    let mut decoded = DecodedSequence {
        sequence: String::with_capacity(text.len()),
        modifications: Vec::new(),
    };
    let mut residues: i32 = 0;
    let mut state = State::Plain;
    let mut pos = 0;

    while pos < text.len() {
        match state {
            State::Plain => {
                if starts_with_marker(&text[pos..], marker) {
                    pos += marker.len();
                    state = State::Accession;
                    continue;
                }
                let Some(residue) = text[pos..].chars().next() else {
                    break;
                };
                decoded.sequence.push(residue);
                residues += 1;
                pos += residue.len_utf8();
            }
            State::Accession => {
                let Some(end) = text[pos..].find(ANNOTATION_END) else {
                    return Err(ModificationError::Unterminated {
                        sequence: text.to_string(),
                    });
                };
                let accession = &text[pos..pos + end];
                let reference_id = accession.trim().parse::<i32>().map_err(|_| {
                    ModificationError::InvalidAccession {
                        sequence: text.to_string(),
                        accession: accession.to_string(),
                    }
                })?;
                decoded.modifications.push(Modification {
                    position: residues - 1,
                    reference_id,
                });
                pos += end + ANNOTATION_END.len_utf8();
                state = State::Plain;
            }
        }
    }

    // A marker at the very end of the text leaves the scanner inside an annotation.
    if state == State::Accession {
        return Err(ModificationError::Unterminated {
            sequence: text.to_string(),
        });
    }

    Ok(decoded)
}

fn starts_with_marker(text: &str, marker: &str) -> bool {
    !marker.is_empty()
        && text
            .as_bytes()
            .get(..marker.len())
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case(marker.as_bytes()))
}
