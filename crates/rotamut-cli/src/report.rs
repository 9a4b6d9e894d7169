use crate::error::{CliError, Result};
use rotamut::core::models::atom::Atom;
use rotamut::core::models::residue::Residue;
use rotamut::core::rotamers::mutation::{ChiRotation, MutationSummary};
use rotamut::engine::config::ResidueSpecifier;
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RotationReport {
    pub chi: String,
    pub measured_degrees: f64,
    pub target_degrees: f64,
    pub moved_atoms: Vec<String>,
}

impl From<&ChiRotation> for RotationReport {
    fn from(rotation: &ChiRotation) -> Self {
        Self {
            chi: rotation.chi.label().to_string(),
            measured_degrees: rotation.measured_degrees,
            target_degrees: rotation.target_degrees,
            moved_atoms: rotation.moved_atoms.clone(),
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct AtomReport {
    pub name: String,
    pub element: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub altloc: Option<char>,
    pub occupancy: f64,
    pub b_factor: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<usize>,
    pub position: [f64; 3],
}

impl From<&Atom> for AtomReport {
    fn from(atom: &Atom) -> Self {
        Self {
            name: atom.name.clone(),
            element: atom.element.symbol().to_string(),
            altloc: (!atom.has_blank_altloc()).then_some(atom.altloc),
            occupancy: atom.occupancy,
            b_factor: atom.b_factor,
            serial: atom.serial,
            position: [atom.position.x, atom.position.y, atom.position.z],
        }
    }
}

/// Result of the `mutate` command: what changed and the residue's final
/// atoms.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct MutationReport {
    pub chain_id: char,
    pub residue_number: i32,
    pub insertion_code: char,
    pub previous_resname: String,
    pub resname: String,
    pub atoms_removed: Vec<String>,
    pub atoms_added: Vec<String>,
    pub rotations: Vec<RotationReport>,
    pub atoms: Vec<AtomReport>,
}

impl MutationReport {
    pub fn new(spec: &ResidueSpecifier, summary: &MutationSummary, residue: &Residue) -> Self {
        Self {
            chain_id: spec.chain_id,
            residue_number: spec.residue_id.sequence_number,
            insertion_code: spec.residue_id.insertion_code,
            previous_resname: summary.previous_resname.clone(),
            resname: summary.resname.clone(),
            atoms_removed: summary.atoms_removed.clone(),
            atoms_added: summary.atoms_added.clone(),
            rotations: summary.rotations.iter().map(RotationReport::from).collect(),
            atoms: residue
                .unpacked_atoms()
                .into_iter()
                .map(AtomReport::from)
                .collect(),
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize report: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;
    use rotamut::core::models::ids::ResidueId;
    use rotamut::core::rotamers::chi::Chi;

    fn summary() -> MutationSummary {
        MutationSummary {
            previous_resname: "ALA".to_string(),
            resname: "SER".to_string(),
            rotations: vec![ChiRotation {
                chi: Chi::Chi1,
                measured_degrees: 180.0,
                target_degrees: 90.0,
                angle_radians: std::f64::consts::FRAC_PI_2,
                moved_atoms: vec!["OG".to_string()],
            }],
            atoms_added: vec!["OG".to_string()],
            atoms_removed: vec![],
        }
    }

    fn residue() -> Residue {
        let mut residue = Residue::new(ResidueId::standard(44), "SER", "");
        residue
            .add(Atom::new("CA", Point3::new(0.0, 0.0, 0.0)))
            .unwrap();
        residue
            .add(Atom::new("OG", Point3::new(0.0, 1.4, 2.0)).with_altloc('A', 0.5))
            .unwrap();
        residue
    }

    #[test]
    fn report_collects_summary_and_atoms() {
        let report = MutationReport::new(&ResidueSpecifier::standard('A', 44), &summary(), &residue());

        assert_eq!(report.chain_id, 'A');
        assert_eq!(report.residue_number, 44);
        assert_eq!(report.rotations[0].chi, "CHI1");
        assert_eq!(report.atoms.len(), 2);
        assert_eq!(report.atoms[0].altloc, None);
        assert_eq!(report.atoms[1].altloc, Some('A'));
        assert_eq!(report.atoms[1].element, "O");
    }

    #[test]
    fn report_serializes_to_kebab_case_toml() {
        let report = MutationReport::new(&ResidueSpecifier::standard('A', 44), &summary(), &residue());

        let text = report.to_toml().unwrap();

        assert!(text.contains("previous-resname = \"ALA\""));
        assert!(text.contains("resname = \"SER\""));
        assert!(text.contains("[[rotations]]"));
        assert!(text.contains("measured-degrees = 180.0"));
        assert!(text.contains("[[atoms]]"));
        assert!(text.contains("name = \"OG\""));
    }
}
