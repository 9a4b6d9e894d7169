use super::chi::{Chi, ChiDefinition, atoms_after};
use super::library::ChiLibrary;
use crate::core::models::atom::Atom;
use crate::core::utils::geometry::{dihedral, rotate_about, rotation_about_axis};
use crate::core::utils::identifiers::is_fixed_backbone_atom;
use indexmap::IndexMap;
use nalgebra::Point3;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

/// Working coordinates of a mutation, keyed by atom name.
///
/// Typically produced by a rotamer sampler for the target residue type,
/// already superimposed on the residue being mutated. Rotations overwrite
/// entries in place.
pub type SampleCoordinates = IndexMap<String, Point3<f64>>;

/// Target chi angles in degrees.
pub type RotamerAngles = BTreeMap<Chi, f64>;

/// Residue types without rotatable side-chain bonds.
pub const SIDECHAIN_FREE_RESIDUES: [&str; 2] = ["ALA", "GLY"];

pub const MUTANT_B_FACTOR: f64 = 1.0;
pub const MUTANT_OCCUPANCY: f64 = 1.0;
/// Serial number given to atoms created by a mutation.
pub const MUTANT_SERIAL: usize = 9999;

pub fn is_sidechain_free(resname: &str) -> bool {
    SIDECHAIN_FREE_RESIDUES.contains(&resname)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOptions {
    /// Remove every non-backbone atom of the residue before adding the new
    /// side chain.
    pub strip_existing_sidechain: bool,
}

impl Default for MutationOptions {
    fn default() -> Self {
        Self {
            strip_existing_sidechain: true,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MutationError {
    #[error("No chi-angle metadata for residue type '{0}'")]
    UnknownResidueType(String),

    #[error("Atom '{atom}' required by {chi} is missing from the sample coordinates")]
    MissingSampleAtom { chi: Chi, atom: String },

    #[error("Rotamer does not provide {chi}, which residue type '{residue}' requires")]
    MissingChiAngle { residue: String, chi: Chi },

    #[error("Rotation axis {axis:?} of {chi} has zero length")]
    InvalidAxis { chi: Chi, axis: [String; 2] },

    #[error("Axis atom '{atom}' of {chi} is not part of the atom order")]
    AtomNotInOrder { chi: Chi, atom: String },
}

/// Record of one chi rotation applied to the sample.
#[derive(Debug, Clone, PartialEq)]
pub struct ChiRotation {
    pub chi: Chi,
    /// Dihedral of the reference plane before the rotation.
    pub measured_degrees: f64,
    pub target_degrees: f64,
    /// Angle applied about `axis[0] - axis[1]`.
    pub angle_radians: f64,
    pub moved_atoms: Vec<String>,
}

/// Outcome of a completed residue mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationSummary {
    pub previous_resname: String,
    pub resname: String,
    pub rotations: Vec<ChiRotation>,
    pub atoms_added: Vec<String>,
    pub atoms_removed: Vec<String>,
}

fn sample_position(
    sample: &SampleCoordinates,
    chi: Chi,
    atom: &str,
) -> Result<Point3<f64>, MutationError> {
    sample
        .get(atom)
        .copied()
        .ok_or_else(|| MutationError::MissingSampleAtom {
            chi,
            atom: atom.to_string(),
        })
}

/// Drives one chi angle of the sample to `target_degrees`.
///
/// The current dihedral of the reference plane is measured and every sample
/// atom located after `axis[1]` in `order` is rotated about the axis bond by
/// the difference. Atoms of the order that the sample lacks are skipped.
pub fn apply_chi_rotation(
    sample: &mut SampleCoordinates,
    order: &[String],
    chi: Chi,
    definition: &ChiDefinition,
    target_degrees: f64,
) -> Result<ChiRotation, MutationError> {
    let [a, b, c, d] = &definition.ref_plane;
    let measured = dihedral(
        &sample_position(sample, chi, a)?,
        &sample_position(sample, chi, b)?,
        &sample_position(sample, chi, c)?,
        &sample_position(sample, chi, d)?,
    );

    let [axis_start, axis_end] = &definition.axis;
    let start = sample_position(sample, chi, axis_start)?;
    let pivot = sample_position(sample, chi, axis_end)?;

    let angle = measured - target_degrees.to_radians();
    let rotation =
        rotation_about_axis(&(start - pivot), angle).ok_or_else(|| MutationError::InvalidAxis {
            chi,
            axis: definition.axis.clone(),
        })?;

    let downstream = atoms_after(order, axis_end).ok_or_else(|| MutationError::AtomNotInOrder {
        chi,
        atom: axis_end.clone(),
    })?;

    let mut moved_atoms = Vec::new();
    for name in downstream {
        if let Some(position) = sample.get_mut(name) {
            *position = rotate_about(position, &pivot, &rotation);
            moved_atoms.push(name.clone());
        }
    }

    debug!(
        chi = %chi,
        measured = measured.to_degrees(),
        target = target_degrees,
        moved = moved_atoms.len(),
        "Applied chi rotation."
    );

    Ok(ChiRotation {
        chi,
        measured_degrees: measured.to_degrees(),
        target_degrees,
        angle_radians: angle,
        moved_atoms,
    })
}

/// Applies every chi angle defined for `resname`, chi1 first.
///
/// Side-chain-free residue types leave the sample untouched. On error the
/// sample keeps the rotations applied so far.
pub fn introduce_rotamer(
    library: &ChiLibrary,
    resname: &str,
    sample: &mut SampleCoordinates,
    rotamer: &RotamerAngles,
) -> Result<Vec<ChiRotation>, MutationError> {
    if is_sidechain_free(resname) {
        return Ok(Vec::new());
    }

    let topology = library
        .get(resname)
        .ok_or_else(|| MutationError::UnknownResidueType(resname.to_string()))?;

    let mut rotations = Vec::with_capacity(topology.chi_count());
    for (chi, definition) in topology.chis() {
        let target = rotamer
            .get(&chi)
            .copied()
            .ok_or_else(|| MutationError::MissingChiAngle {
                residue: resname.to_string(),
                chi,
            })?;
        rotations.push(apply_chi_rotation(
            sample,
            topology.order(),
            chi,
            definition,
            target,
        )?);
    }
    Ok(rotations)
}

/// Builds the atoms a mutation adds to the residue: every sample atom except
/// N, CA, C and O, in sample order.
pub fn build_mutant_atoms(sample: &SampleCoordinates) -> Vec<Atom> {
    sample
        .iter()
        .filter(|(name, _)| !is_fixed_backbone_atom(name))
        .map(|(name, position)| {
            let mut atom = Atom::new(name, *position);
            atom.b_factor = MUTANT_B_FACTOR;
            atom.occupancy = MUTANT_OCCUPANCY;
            atom.altloc = ' ';
            atom.serial = Some(MUTANT_SERIAL);
            atom
        })
        .collect()
}
