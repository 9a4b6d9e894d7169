use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a chain within a structure (e.g., 'A', 'B').
pub type ChainId = char;

/// Identifier of a structure, usually the source file's code (e.g., "5e0m").
pub type StructureId = String;

/// Identifies a residue within its chain.
///
/// The identifier is the triple used by the PDB format: a hetero flag
/// (`" "` for standard residues, `"W"` for water, `"H_<NAME>"` for other
/// hetero groups), the sequence number, and the insertion code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResidueId {
    /// Hetero flag of the residue.
    pub hetero_flag: String,
    /// Sequence number from the source file.
    pub sequence_number: i32,
    /// Insertion code, blank when absent.
    pub insertion_code: char,
}

impl ResidueId {
    pub fn new(hetero_flag: &str, sequence_number: i32, insertion_code: char) -> Self {
        Self {
            hetero_flag: hetero_flag.to_string(),
            sequence_number,
            insertion_code,
        }
    }

    /// Identifier of a standard (non-hetero) residue without insertion code.
    pub fn standard(sequence_number: i32) -> Self {
        Self::new(" ", sequence_number, ' ')
    }

    pub fn is_hetero(&self) -> bool {
        !self.hetero_flag.trim().is_empty()
    }
}

impl fmt::Display for ResidueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "('{}', {}, '{}')",
            self.hetero_flag, self.sequence_number, self.insertion_code
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_residue_id_has_blank_flag_and_insertion_code() {
        let id = ResidueId::standard(44);
        assert_eq!(id.hetero_flag, " ");
        assert_eq!(id.sequence_number, 44);
        assert_eq!(id.insertion_code, ' ');
        assert!(!id.is_hetero());
    }

    #[test]
    fn hetero_flag_marks_residue_as_hetero() {
        assert!(ResidueId::new("W", 301, ' ').is_hetero());
        assert!(ResidueId::new("H_GLC", 1, 'A').is_hetero());
    }

    #[test]
    fn display_matches_tuple_form() {
        let id = ResidueId::new("H_GLC", 12, 'A');
        assert_eq!(id.to_string(), "('H_GLC', 12, 'A')");
    }

    #[test]
    fn ids_order_by_flag_then_number_then_insertion_code() {
        let a = ResidueId::standard(10);
        let b = ResidueId::new(" ", 10, 'A');
        let c = ResidueId::standard(11);
        assert!(a < b);
        assert!(b < c);
    }
}
