use super::atom::{Atom, AtomSite};
use super::entity::{Entity, Node};
use super::ids::{ChainId, ResidueId};
use crate::core::rotamers::library::{ChiLibrary, standard_library};
use crate::core::rotamers::mutation::{
    MutationError, MutationOptions, MutationSummary, RotamerAngles, SampleCoordinates,
    build_mutant_atoms, introduce_rotamer,
};
use crate::core::utils::identifiers::{is_backbone_atom, residue_atom_order};
use std::fmt;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ResidueError {
    #[error("Atom {atom} is already defined in {residue}")]
    AtomAlreadyDefined { atom: String, residue: String },

    #[error("Atom added to disordered residue {resname} {residue_id} outside an alternate-location group")]
    MissingAlternateLocation {
        resname: String,
        residue_id: ResidueId,
    },

    #[error("Disordered residue {residue_id} has no selected variant")]
    EmptyDisorderedResidue { residue_id: ResidueId },

    #[error("Mutation failed: {0}")]
    Mutation(#[from] MutationError),
}

/// Operations shared by a plain residue and a wrapper of residue variants.
pub trait ResidueLike {
    fn add_atom(&mut self, atom: AtomSite) -> Result<(), ResidueError>;

    fn sort_atoms(&mut self);

    fn residue_id(&self) -> &ResidueId;

    /// Three-letter residue name; `None` for an empty variant wrapper.
    fn residue_name(&self) -> Option<&str>;
}

/// An amino acid or ligand: a named, ordered set of atom sites.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    entity: Entity<ResidueId, ChainId, AtomSite>,
    resname: String,
    segid: String,
    disordered: bool,
}

impl Residue {
    pub fn new(id: ResidueId, resname: &str, segid: &str) -> Self {
        Self {
            entity: Entity::new(id),
            resname: resname.to_string(),
            segid: segid.to_string(),
            disordered: false,
        }
    }

    pub fn id(&self) -> &ResidueId {
        self.entity.id()
    }

    pub fn resname(&self) -> &str {
        &self.resname
    }

    pub fn segid(&self) -> &str {
        &self.segid
    }

    pub fn parent(&self) -> Option<&ChainId> {
        self.entity.parent()
    }

    pub fn set_parent(&mut self, parent: Option<ChainId>) {
        self.entity.set_parent(parent);
    }

    pub fn detach_parent(&mut self) {
        self.entity.detach_parent();
    }

    /// Adds an atom (or an alternate-location group) to the residue.
    ///
    /// # Errors
    ///
    /// Returns [`ResidueError::AtomAlreadyDefined`] if an atom with the same
    /// name is already present; the residue is left unchanged.
    pub fn add(&mut self, atom: impl Into<AtomSite>) -> Result<(), ResidueError> {
        let site = atom.into();
        let name = site.name().to_string();
        self.entity
            .add(site)
            .map_err(|_| ResidueError::AtomAlreadyDefined {
                atom: name,
                residue: self.to_string(),
            })
    }

    pub fn flag_disordered(&mut self) {
        self.disordered = true;
    }

    pub fn is_disordered(&self) -> bool {
        self.disordered
    }

    pub fn atom(&self, name: &str) -> Option<&AtomSite> {
        self.entity.get(&name.to_string())
    }

    pub fn atom_mut(&mut self, name: &str) -> Option<&mut AtomSite> {
        self.entity.get_mut(&name.to_string())
    }

    pub fn has_atom(&self, name: &str) -> bool {
        self.entity.has_id(&name.to_string())
    }

    /// Atom sites in insertion (or last sorted) order.
    pub fn atoms(&self) -> impl Iterator<Item = &AtomSite> {
        self.entity.iter()
    }

    pub fn atoms_mut(&mut self) -> impl Iterator<Item = &mut AtomSite> {
        self.entity.iter_mut()
    }

    pub fn remove_atom(&mut self, name: &str) -> Option<AtomSite> {
        self.entity.detach_child(&name.to_string())
    }

    /// Every atom of the residue, with each alternate-location group expanded
    /// in place.
    pub fn unpacked_atoms(&self) -> Vec<&Atom> {
        self.entity.iter().flat_map(AtomSite::unpacked).collect()
    }

    pub fn len(&self) -> usize {
        self.entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity.is_empty()
    }

    /// Reorders atoms backbone first, then outwards along the side chain.
    pub fn sort(&mut self) {
        self.entity.sort_by(|a, b| {
            residue_atom_order(a.name(), b.name()).then_with(|| a.name().cmp(b.name()))
        });
    }

    pub fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        self.resname == other.resname
            && self.segid == other.segid
            && self.entity.strictly_equals(&other.entity, compare_coordinates)
    }

    /// Mutates the residue into `target` using the built-in chi library and
    /// default options.
    ///
    /// See [`Self::mutate_with`].
    pub fn mutate(
        &mut self,
        target: &str,
        sample: &mut SampleCoordinates,
        rotamer: &RotamerAngles,
    ) -> Result<MutationSummary, ResidueError> {
        self.mutate_with(
            standard_library(),
            MutationOptions::default(),
            target,
            sample,
            rotamer,
        )
    }

    /// Replaces the side chain of this residue with that of `target`.
    ///
    /// The chi angles of `target` are first driven to the values in `rotamer`
    /// by rotating `sample` in place, chi1 first. The residue's side-chain
    /// atoms are then removed (unless disabled in `options`), every sample
    /// atom other than N, CA, C and O is added, and the residue is renamed.
    ///
    /// # Errors
    ///
    /// - [`ResidueError::Mutation`] if the rotations cannot be applied; the
    ///   residue is untouched but `sample` may be partially rotated.
    /// - [`ResidueError::AtomAlreadyDefined`] if a new atom collides with an
    ///   atom the residue keeps (e.g. a backbone hydrogen also present in the
    ///   sample). The collision is detected before the residue is modified.
    pub fn mutate_with(
        &mut self,
        library: &ChiLibrary,
        options: MutationOptions,
        target: &str,
        sample: &mut SampleCoordinates,
        rotamer: &RotamerAngles,
    ) -> Result<MutationSummary, ResidueError> {
        let rotations = introduce_rotamer(library, target, sample, rotamer)?;
        let new_atoms = build_mutant_atoms(sample);

        let keeps =
            |site: &AtomSite| !options.strip_existing_sidechain || is_backbone_atom(site.name());
        if let Some(collision) = new_atoms
            .iter()
            .find(|atom| self.atom(&atom.name).is_some_and(keeps))
        {
            return Err(ResidueError::AtomAlreadyDefined {
                atom: collision.name.clone(),
                residue: self.to_string(),
            });
        }

        let atoms_removed: Vec<String> = if options.strip_existing_sidechain {
            self.entity
                .retain(|site| is_backbone_atom(site.name()))
                .iter()
                .map(|site| site.name().to_string())
                .collect()
        } else {
            Vec::new()
        };

        let mut atoms_added = Vec::with_capacity(new_atoms.len());
        for atom in new_atoms {
            atoms_added.push(atom.name.clone());
            self.add(atom)?;
        }

        let previous_resname = std::mem::replace(&mut self.resname, target.to_string());
        info!(
            "Mutated {} {} -> {} ({} atom(s) removed, {} added).",
            previous_resname,
            self.id(),
            target,
            atoms_removed.len(),
            atoms_added.len()
        );

        Ok(MutationSummary {
            previous_resname,
            resname: self.resname.clone(),
            rotations,
            atoms_added,
            atoms_removed,
        })
    }
}

impl Node for Residue {
    type Id = ResidueId;
    type ParentId = ChainId;

    fn id(&self) -> &ResidueId {
        self.entity.id()
    }

    fn parent(&self) -> Option<&ChainId> {
        self.entity.parent()
    }

    fn set_parent(&mut self, parent: Option<ChainId>) {
        self.entity.set_parent(parent);
    }

    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        Residue::strictly_equals(self, other, compare_coordinates)
    }
}

impl ResidueLike for Residue {
    fn add_atom(&mut self, atom: AtomSite) -> Result<(), ResidueError> {
        self.add(atom)
    }

    fn sort_atoms(&mut self) {
        self.sort();
    }

    fn residue_id(&self) -> &ResidueId {
        self.id()
    }

    fn residue_name(&self) -> Option<&str> {
        Some(&self.resname)
    }
}

impl fmt::Display for Residue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id();
        write!(
            f,
            "<Residue {} het={} resseq={} icode={}>",
            self.resname, id.hetero_flag, id.sequence_number, id.insertion_code
        )
    }
}
