use super::chi::{Chi, ChiDefinition, ResidueChiTopology, TopologyError};
use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;
use thiserror::Error;

type StandardChi = (Chi, [&'static str; 4], [&'static str; 2]);

struct StandardResidue {
    order: &'static [&'static str],
    chis: &'static [StandardChi],
}

const CHI1_CG: StandardChi = (Chi::Chi1, ["N", "CA", "CB", "CG"], ["CA", "CB"]);
const CHI2_CD: StandardChi = (Chi::Chi2, ["CA", "CB", "CG", "CD"], ["CB", "CG"]);
const CHI2_CD1: StandardChi = (Chi::Chi2, ["CA", "CB", "CG", "CD1"], ["CB", "CG"]);
const CHI2_OD1: StandardChi = (Chi::Chi2, ["CA", "CB", "CG", "OD1"], ["CB", "CG"]);

static STANDARD_RESIDUES: Map<&'static str, StandardResidue> = phf_map! {
    "ALA" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB"],
        chis: &[],
    },
    "ARG" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD", "NE", "CZ", "NH1", "NH2"],
        chis: &[
            CHI1_CG,
            CHI2_CD,
            (Chi::Chi3, ["CB", "CG", "CD", "NE"], ["CG", "CD"]),
            (Chi::Chi4, ["CG", "CD", "NE", "CZ"], ["CD", "NE"]),
        ],
    },
    "ASN" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "OD1", "ND2"],
        chis: &[CHI1_CG, CHI2_OD1],
    },
    "ASP" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "OD1", "OD2"],
        chis: &[CHI1_CG, CHI2_OD1],
    },
    "CYS" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "SG"],
        chis: &[(Chi::Chi1, ["N", "CA", "CB", "SG"], ["CA", "CB"])],
    },
    "GLN" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD", "OE1", "NE2"],
        chis: &[
            CHI1_CG,
            CHI2_CD,
            (Chi::Chi3, ["CB", "CG", "CD", "OE1"], ["CG", "CD"]),
        ],
    },
    "GLU" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD", "OE1", "OE2"],
        chis: &[
            CHI1_CG,
            CHI2_CD,
            (Chi::Chi3, ["CB", "CG", "CD", "OE1"], ["CG", "CD"]),
        ],
    },
    "GLY" => StandardResidue {
        order: &["N", "CA", "C", "O"],
        chis: &[],
    },
    "HIS" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "ND1", "CD2", "CE1", "NE2"],
        chis: &[
            CHI1_CG,
            (Chi::Chi2, ["CA", "CB", "CG", "ND1"], ["CB", "CG"]),
        ],
    },
    "ILE" => StandardResidue {
        // CG2 hangs off CB, so it precedes CG1 and is left alone by chi2.
        order: &["N", "CA", "C", "O", "CB", "CG2", "CG1", "CD1"],
        chis: &[
            (Chi::Chi1, ["N", "CA", "CB", "CG1"], ["CA", "CB"]),
            (Chi::Chi2, ["CA", "CB", "CG1", "CD1"], ["CB", "CG1"]),
        ],
    },
    "LEU" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD1", "CD2"],
        chis: &[CHI1_CG, CHI2_CD1],
    },
    "LYS" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD", "CE", "NZ"],
        chis: &[
            CHI1_CG,
            CHI2_CD,
            (Chi::Chi3, ["CB", "CG", "CD", "CE"], ["CG", "CD"]),
            (Chi::Chi4, ["CG", "CD", "CE", "NZ"], ["CD", "CE"]),
        ],
    },
    "MET" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "SD", "CE"],
        chis: &[
            CHI1_CG,
            (Chi::Chi2, ["CA", "CB", "CG", "SD"], ["CB", "CG"]),
            (Chi::Chi3, ["CB", "CG", "SD", "CE"], ["CG", "SD"]),
        ],
    },
    "PHE" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD1", "CD2", "CE1", "CE2", "CZ"],
        chis: &[CHI1_CG, CHI2_CD1],
    },
    "PRO" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD"],
        chis: &[CHI1_CG, CHI2_CD],
    },
    "SER" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "OG"],
        chis: &[(Chi::Chi1, ["N", "CA", "CB", "OG"], ["CA", "CB"])],
    },
    "THR" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "OG1", "CG2"],
        chis: &[(Chi::Chi1, ["N", "CA", "CB", "OG1"], ["CA", "CB"])],
    },
    "TRP" => StandardResidue {
        order: &[
            "N", "CA", "C", "O", "CB", "CG", "CD1", "CD2", "NE1", "CE2", "CE3", "CZ2", "CZ3",
            "CH2",
        ],
        chis: &[CHI1_CG, CHI2_CD1],
    },
    "TYR" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG", "CD1", "CD2", "CE1", "CE2", "CZ", "OH"],
        chis: &[CHI1_CG, CHI2_CD1],
    },
    "VAL" => StandardResidue {
        order: &["N", "CA", "C", "O", "CB", "CG1", "CG2"],
        chis: &[(Chi::Chi1, ["N", "CA", "CB", "CG1"], ["CA", "CB"])],
    },
};

static STANDARD_LIBRARY: LazyLock<ChiLibrary> = LazyLock::new(ChiLibrary::standard);

/// The built-in library for the 20 canonical amino acids, built once per
/// process and shared read-only.
pub fn standard_library() -> &'static ChiLibrary {
    &STANDARD_LIBRARY
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawResidueChis {
    order: Vec<String>,
    #[serde(default)]
    chi: HashMap<String, ChiDefinition>,
}

type RawChiFile = HashMap<String, RawResidueChis>;

#[derive(Debug, Error)]
pub enum LibraryLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Unknown chi angle '{chi}' for residue '{residue}' in '{path}'")]
    UnknownChi {
        path: String,
        residue: String,
        chi: String,
    },
    #[error("Chi angle {chi} is defined more than once for residue '{residue}' in '{path}'")]
    DuplicateChi {
        path: String,
        residue: String,
        chi: Chi,
    },
    #[error("Invalid chi topology in '{path}': {source}")]
    InvalidTopology {
        path: String,
        source: TopologyError,
    },
}

/// Chi-angle metadata for a set of residue types.
///
/// For every residue type the library records the canonical atom order and,
/// per chi angle, the reference plane and rotation axis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChiLibrary {
    residues: HashMap<String, ResidueChiTopology>,
}

impl ChiLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the library of the 20 canonical amino acids.
    ///
    /// Prefer [`standard_library`] to share a single instance.
    pub fn standard() -> Self {
        let residues = STANDARD_RESIDUES
            .entries()
            .map(|(name, residue)| {
                let topology = residue.chis.iter().fold(
                    ResidueChiTopology::new(residue.order),
                    |topology, (chi, ref_plane, axis)| {
                        topology.with_chi(*chi, ChiDefinition::new(*ref_plane, *axis))
                    },
                );
                (name.to_string(), topology)
            })
            .collect();
        Self { residues }
    }

    /// Loads a library from a TOML file.
    ///
    /// Each top-level table is a residue name holding an `order` array and an
    /// optional `chi` table keyed by `CHI1`..`CHI4`.
    ///
    /// # Errors
    ///
    /// Returns `LibraryLoadError::Io` if the file cannot be read,
    /// `LibraryLoadError::Toml` if it is not a valid library document,
    /// `LibraryLoadError::UnknownChi` for chi keys other than `CHI1`..`CHI4`,
    /// `LibraryLoadError::DuplicateChi` when two keys name the same chi angle,
    /// and `LibraryLoadError::InvalidTopology` if a definition references
    /// atoms outside its residue's atom order.
    pub fn load(path: &Path) -> Result<Self, LibraryLoadError> {
        let path_str = path.to_string_lossy().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| LibraryLoadError::Io {
            path: path_str.clone(),
            source: e,
        })?;
        Self::parse(&content, &path_str)
    }

    /// Parses a library from TOML text held in memory.
    pub fn from_toml_str(content: &str) -> Result<Self, LibraryLoadError> {
        Self::parse(content, "<memory>")
    }

    fn parse(content: &str, origin: &str) -> Result<Self, LibraryLoadError> {
        let raw: RawChiFile = toml::from_str(content).map_err(|e| LibraryLoadError::Toml {
            path: origin.to_string(),
            source: e,
        })?;

        let mut library = Self::new();
        for (residue, raw_residue) in raw {
            let mut topology = ResidueChiTopology::new(&raw_residue.order);
            for (chi_name, definition) in raw_residue.chi {
                let chi = Chi::from_str(&chi_name).map_err(|_| LibraryLoadError::UnknownChi {
                    path: origin.to_string(),
                    residue: residue.clone(),
                    chi: chi_name.clone(),
                })?;
                if topology.chi(chi).is_some() {
                    return Err(LibraryLoadError::DuplicateChi {
                        path: origin.to_string(),
                        residue: residue.clone(),
                        chi,
                    });
                }
                topology = topology.with_chi(chi, definition);
            }
            library
                .insert(&residue, topology)
                .map_err(|e| LibraryLoadError::InvalidTopology {
                    path: origin.to_string(),
                    source: e,
                })?;
        }
        Ok(library)
    }

    /// Adds or replaces the topology of a residue type after validating it.
    pub fn insert(
        &mut self,
        residue: &str,
        topology: ResidueChiTopology,
    ) -> Result<Option<ResidueChiTopology>, TopologyError> {
        topology.validate(residue)?;
        Ok(self.residues.insert(residue.to_string(), topology))
    }

    pub fn get(&self, residue: &str) -> Option<&ResidueChiTopology> {
        self.residues.get(residue)
    }

    pub fn contains(&self, residue: &str) -> bool {
        self.residues.contains_key(residue)
    }

    /// Residue names in alphabetical order.
    pub fn residue_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.residues.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const TYROSINE_TOML: &str = r#"
[TYR]
order = ["N", "CA", "C", "O", "CB", "CG", "CD1", "CD2", "CE1", "CE2", "CZ", "OH"]

[TYR.chi.CHI1]
ref_plane = ["N", "CA", "CB", "CG"]
axis = ["CA", "CB"]

[TYR.chi.CHI2]
ref_plane = ["CA", "CB", "CG", "CD1"]
axis = ["CB", "CG"]
"#;

    #[test]
    fn standard_library_covers_the_canonical_amino_acids() {
        let library = standard_library();
        assert_eq!(library.len(), 20);
        for name in ["ALA", "GLY", "SER", "TYR", "TRP", "LYS", "ARG", "PRO"] {
            assert!(library.contains(name), "missing {}", name);
        }
        assert_eq!(library.get("GLY").unwrap().chi_count(), 0);
        assert_eq!(library.get("ALA").unwrap().chi_count(), 0);
        assert_eq!(library.get("LYS").unwrap().chi_count(), 4);
        assert_eq!(library.get("ARG").unwrap().chi_count(), 4);
    }

    #[test]
    fn standard_topologies_are_internally_consistent() {
        let library = ChiLibrary::standard();
        for name in library.residue_names() {
            let topology = library.get(name).unwrap();
            assert_eq!(topology.validate(name), Ok(()));
            assert_eq!(&topology.order()[..4], &["N", "CA", "C", "O"]);
        }
    }

    #[test]
    fn standard_axes_are_the_middle_bond_of_the_reference_plane() {
        let library = standard_library();
        for name in library.residue_names() {
            for (chi, definition) in library.get(name).unwrap().chis() {
                assert_eq!(
                    definition.axis[..],
                    definition.ref_plane[1..3],
                    "{} {}",
                    name,
                    chi
                );
            }
        }
    }

    #[test]
    fn isoleucine_cg2_is_not_downstream_of_chi2_axis() {
        let ile = standard_library().get("ILE").unwrap();
        let axis = &ile.chi(Chi::Chi2).unwrap().axis;
        let downstream = ile.downstream_of(&axis[1]).unwrap();
        assert_eq!(downstream, &["CD1".to_string()]);
    }

    #[test]
    fn loads_library_from_valid_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", TYROSINE_TOML).unwrap();

        let library = ChiLibrary::load(file.path()).unwrap();

        assert_eq!(library.len(), 1);
        assert_eq!(library.get("TYR"), standard_library().get("TYR"));
    }

    #[test]
    fn parses_library_from_memory() {
        let library = ChiLibrary::from_toml_str(TYROSINE_TOML).unwrap();
        let tyr = library.get("TYR").unwrap();
        assert_eq!(tyr.chi_count(), 2);
        assert_eq!(tyr.chi(Chi::Chi2).unwrap().axis, ["CB", "CG"].map(String::from));
    }

    #[test]
    fn residue_without_chi_table_is_accepted() {
        let library = ChiLibrary::from_toml_str("[GLY]\norder = [\"N\", \"CA\", \"C\", \"O\"]\n")
            .unwrap();
        assert_eq!(library.get("GLY").unwrap().chi_count(), 0);
    }

    #[test]
    fn loads_empty_library_from_empty_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "").unwrap();

        let library = ChiLibrary::load(file.path()).unwrap();

        assert!(library.is_empty());
    }

    #[test]
    fn returns_io_error_for_nonexistent_file() {
        let result = ChiLibrary::load(Path::new("nonexistent_chi_library.toml"));
        assert!(matches!(result, Err(LibraryLoadError::Io { .. })));
    }

    #[test]
    fn returns_toml_error_for_malformed_file() {
        let result = ChiLibrary::from_toml_str("this is not valid toml");
        assert!(matches!(result, Err(LibraryLoadError::Toml { .. })));
    }

    #[test]
    fn returns_toml_error_for_unknown_fields() {
        let content = "[SER]\norder = [\"N\"]\nrotamers = 3\n";
        let result = ChiLibrary::from_toml_str(content);
        assert!(matches!(result, Err(LibraryLoadError::Toml { .. })));
    }

    #[test]
    fn returns_unknown_chi_error_for_invalid_chi_key() {
        let content = r#"
[SER]
order = ["N", "CA", "C", "O", "CB", "OG"]

[SER.chi.CHI7]
ref_plane = ["N", "CA", "CB", "OG"]
axis = ["CA", "CB"]
"#;
        let result = ChiLibrary::from_toml_str(content);
        assert!(matches!(
            result,
            Err(LibraryLoadError::UnknownChi { ref chi, .. }) if chi == "CHI7"
        ));
    }

    #[test]
    fn returns_duplicate_chi_error_for_keys_differing_only_in_case() {
        let content = r#"
[SER]
order = ["N", "CA", "C", "O", "CB", "OG"]

[SER.chi.CHI1]
ref_plane = ["N", "CA", "CB", "OG"]
axis = ["CA", "CB"]

[SER.chi.chi1]
ref_plane = ["C", "CA", "CB", "OG"]
axis = ["CA", "CB"]
"#;
        let result = ChiLibrary::from_toml_str(content);
        assert!(matches!(
            result,
            Err(LibraryLoadError::DuplicateChi { ref residue, chi: Chi::Chi1, .. }) if residue == "SER"
        ));
    }

    #[test]
    fn returns_invalid_topology_error_for_atom_outside_order() {
        let content = r#"
[SER]
order = ["N", "CA", "C", "O", "CB"]

[SER.chi.CHI1]
ref_plane = ["N", "CA", "CB", "OG"]
axis = ["CA", "CB"]
"#;
        let result = ChiLibrary::from_toml_str(content);
        assert!(matches!(
            result,
            Err(LibraryLoadError::InvalidTopology { .. })
        ));
    }

    #[test]
    fn insert_replaces_existing_topology() {
        let mut library = ChiLibrary::standard();
        let replacement = ResidueChiTopology::new(&["N", "CA", "C", "O", "CB", "OG"]);

        let previous = library.insert("SER", replacement.clone()).unwrap();

        assert_eq!(previous.unwrap().chi_count(), 1);
        assert_eq!(library.get("SER"), Some(&replacement));
    }
}
