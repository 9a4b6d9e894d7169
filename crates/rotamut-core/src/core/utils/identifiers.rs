use phf::{Set, phf_set};
use std::cmp::Ordering;

static BACKBONE_ATOM_NAMES: Set<&'static str> = phf_set! {
    "N", "H", "HN", "CA", "HA", "C", "O", "OXT", "H1", "H2", "H3", "NT",
    "HT1", "HT2", "HT3", "OT1", "OT2", "HC", "HOXT", "HA1", "HA2", "1HA", "2HA",
};

/// Backbone atoms shared by every amino acid; sample coordinates for these
/// are never copied onto a mutated residue.
pub const FIXED_BACKBONE_ATOMS: [&str; 4] = ["N", "CA", "C", "O"];

/// Remoteness indicators of side-chain atom names, from CA outwards.
const REMOTENESS: [char; 6] = ['B', 'G', 'D', 'E', 'Z', 'H'];

pub fn is_backbone_atom(atom_name: &str) -> bool {
    BACKBONE_ATOM_NAMES.contains(atom_name.trim())
}

pub fn is_fixed_backbone_atom(atom_name: &str) -> bool {
    FIXED_BACKBONE_ATOMS.contains(&atom_name.trim())
}

/// Sort key of an atom name: (group, position, hydrogen, branch).
fn atom_rank(atom_name: &str) -> (u8, u8, u8, u8) {
    let name = atom_name.trim();
    if let Some(index) = FIXED_BACKBONE_ATOMS.iter().position(|b| *b == name) {
        return (0, index as u8, 0, 0);
    }
    if name == "OXT" {
        return (0, FIXED_BACKBONE_ATOMS.len() as u8, 0, 0);
    }
    if is_backbone_atom(name) {
        return (1, 0, 0, 0);
    }

    // PDB v2 hydrogen names carry a leading branch digit ("1HB").
    let mut chars = name.trim_start_matches(|c: char| c.is_ascii_digit()).chars();
    let element = chars.next();
    let remoteness = chars
        .next()
        .and_then(|c| REMOTENESS.iter().position(|r| *r == c));
    match (element, remoteness) {
        (Some(element), Some(remoteness)) => {
            let hydrogen = u8::from(matches!(element, 'H' | 'D'));
            let branch = chars.next().and_then(|c| c.to_digit(10)).unwrap_or(0) as u8;
            (2, remoteness as u8, hydrogen, branch)
        }
        _ => (3, 0, 0, 0),
    }
}

/// Orders atom names the way PDB files list them: N, CA, C, O and OXT, then
/// the remaining backbone atoms, then the side chain outwards from CB with
/// heavy atoms ahead of their hydrogens.
///
/// Names that follow no remoteness convention sort last and compare equal to
/// each other.
pub fn residue_atom_order(atom1_name: &str, atom2_name: &str) -> Ordering {
    atom_rank(atom1_name).cmp(&atom_rank(atom2_name))
}
