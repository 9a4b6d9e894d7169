use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A side-chain dihedral angle index.
///
/// Variants are ordered so that iterating a `BTreeMap<Chi, _>` or
/// [`Chi::ALL`] visits chi1 through chi4 in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chi {
    Chi1,
    Chi2,
    Chi3,
    Chi4,
}

impl Chi {
    pub const ALL: [Chi; 4] = [Chi::Chi1, Chi::Chi2, Chi::Chi3, Chi::Chi4];

    /// One-based index of the angle.
    pub fn index(self) -> u8 {
        match self {
            Chi::Chi1 => 1,
            Chi::Chi2 => 2,
            Chi::Chi3 => 3,
            Chi::Chi4 => 4,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Chi::Chi1 => "CHI1",
            Chi::Chi2 => "CHI2",
            Chi::Chi3 => "CHI3",
            Chi::Chi4 => "CHI4",
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid chi angle name '{0}', expected one of CHI1..CHI4")]
pub struct ParseChiError(pub String);

impl FromStr for Chi {
    type Err = ParseChiError;

    /// Parses "CHI1".."CHI4" (case-insensitive) or a bare index "1".."4".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CHI1" | "1" => Ok(Chi::Chi1),
            "CHI2" | "2" => Ok(Chi::Chi2),
            "CHI3" | "3" => Ok(Chi::Chi3),
            "CHI4" | "4" => Ok(Chi::Chi4),
            _ => Err(ParseChiError(s.to_string())),
        }
    }
}

impl fmt::Display for Chi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Geometry needed to measure and rotate one chi angle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChiDefinition {
    /// The four atoms whose dihedral defines the angle.
    pub ref_plane: [String; 4],
    /// The bond the angle rotates about. Atoms after `axis[1]` in the
    /// residue's canonical order are moved.
    pub axis: [String; 2],
}

impl ChiDefinition {
    pub fn new(ref_plane: [&str; 4], axis: [&str; 2]) -> Self {
        Self {
            ref_plane: ref_plane.map(str::to_string),
            axis: axis.map(str::to_string),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Atom '{atom}' used by {chi} of residue '{residue}' is missing from its atom order")]
    AtomNotInOrder {
        residue: String,
        chi: Chi,
        atom: String,
    },
    #[error("Atom '{atom}' appears more than once in the atom order of residue '{residue}'")]
    DuplicateAtomInOrder { residue: String, atom: String },
}

/// Chi-angle metadata of one residue type.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ResidueChiTopology {
    order: Vec<String>,
    chis: BTreeMap<Chi, ChiDefinition>,
}

impl ResidueChiTopology {
    pub fn new<S: AsRef<str>>(order: &[S]) -> Self {
        Self {
            order: order.iter().map(|s| s.as_ref().to_string()).collect(),
            chis: BTreeMap::new(),
        }
    }

    pub fn with_chi(mut self, chi: Chi, definition: ChiDefinition) -> Self {
        self.chis.insert(chi, definition);
        self
    }

    /// Canonical atom order, from the backbone outwards along the side chain.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    pub fn chi(&self, chi: Chi) -> Option<&ChiDefinition> {
        self.chis.get(&chi)
    }

    /// Defined chi angles in ascending order.
    pub fn chis(&self) -> impl Iterator<Item = (Chi, &ChiDefinition)> {
        self.chis.iter().map(|(chi, definition)| (*chi, definition))
    }

    pub fn chi_count(&self) -> usize {
        self.chis.len()
    }

    pub fn position(&self, atom: &str) -> Option<usize> {
        self.order.iter().position(|name| name == atom)
    }

    /// Atoms strictly after `atom` in the canonical order.
    pub fn downstream_of(&self, atom: &str) -> Option<&[String]> {
        atoms_after(&self.order, atom)
    }

    /// Checks that the order has no duplicates and that every atom named by
    /// a chi definition is part of the order.
    pub fn validate(&self, residue: &str) -> Result<(), TopologyError> {
        for (index, atom) in self.order.iter().enumerate() {
            if self.order[..index].contains(atom) {
                return Err(TopologyError::DuplicateAtomInOrder {
                    residue: residue.to_string(),
                    atom: atom.clone(),
                });
            }
        }
        for (chi, definition) in &self.chis {
            for atom in definition.ref_plane.iter().chain(definition.axis.iter()) {
                if self.position(atom).is_none() {
                    return Err(TopologyError::AtomNotInOrder {
                        residue: residue.to_string(),
                        chi: *chi,
                        atom: atom.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The tail of `order` following `atom`, or `None` if `atom` is absent.
pub fn atoms_after<'a>(order: &'a [String], atom: &str) -> Option<&'a [String]> {
    order
        .iter()
        .position(|name| name == atom)
        .map(|index| &order[index + 1..])
}
