use super::atom::AtomSite;
use super::disordered::DisorderedResidue;
use super::entity::{Entity, Node};
use super::ids::{ChainId, ResidueId, StructureId};
use super::residue::{Residue, ResidueError, ResidueLike};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ChainError {
    #[error("Residue {residue_id} is already defined in chain {chain_id}")]
    ResidueAlreadyDefined {
        residue_id: ResidueId,
        chain_id: ChainId,
    },
}

/// A child of a chain: a single residue or a set of residue variants sharing
/// one position (point mutations modelled in the crystal).
#[derive(Debug, Clone, PartialEq)]
pub enum ResidueSite {
    Ordered(Residue),
    Disordered(DisorderedResidue),
}

impl ResidueSite {
    pub fn id(&self) -> &ResidueId {
        match self {
            Self::Ordered(residue) => residue.id(),
            Self::Disordered(variants) => variants.id(),
        }
    }

    pub fn is_disordered(&self) -> bool {
        matches!(self, Self::Disordered(_))
    }

    /// The residue that represents this site: the residue itself, or the
    /// selected variant.
    pub fn residue(&self) -> Option<&Residue> {
        match self {
            Self::Ordered(residue) => Some(residue),
            Self::Disordered(variants) => variants.disordered_get(),
        }
    }

    pub fn residue_mut(&mut self) -> Option<&mut Residue> {
        match self {
            Self::Ordered(residue) => Some(residue),
            Self::Disordered(variants) => variants.disordered_get_mut(),
        }
    }
}

impl From<Residue> for ResidueSite {
    fn from(residue: Residue) -> Self {
        Self::Ordered(residue)
    }
}

impl From<DisorderedResidue> for ResidueSite {
    fn from(variants: DisorderedResidue) -> Self {
        Self::Disordered(variants)
    }
}

impl Node for ResidueSite {
    type Id = ResidueId;
    type ParentId = ChainId;

    fn id(&self) -> &ResidueId {
        ResidueSite::id(self)
    }

    fn parent(&self) -> Option<&ChainId> {
        match self {
            Self::Ordered(residue) => residue.parent(),
            Self::Disordered(variants) => variants.parent(),
        }
    }

    fn set_parent(&mut self, parent: Option<ChainId>) {
        match self {
            Self::Ordered(residue) => residue.set_parent(parent),
            Self::Disordered(variants) => variants.set_parent(parent),
        }
    }

    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        match (self, other) {
            (Self::Ordered(a), Self::Ordered(b)) => a.strictly_equals(b, compare_coordinates),
            (Self::Disordered(a), Self::Disordered(b)) => {
                a.strictly_equals(b, compare_coordinates)
            }
            _ => false,
        }
    }
}

impl ResidueLike for ResidueSite {
    fn add_atom(&mut self, atom: AtomSite) -> Result<(), ResidueError> {
        match self {
            Self::Ordered(residue) => residue.add_atom(atom),
            Self::Disordered(variants) => variants.add_atom(atom),
        }
    }

    fn sort_atoms(&mut self) {
        match self {
            Self::Ordered(residue) => residue.sort_atoms(),
            Self::Disordered(variants) => variants.sort_atoms(),
        }
    }

    fn residue_id(&self) -> &ResidueId {
        self.id()
    }

    fn residue_name(&self) -> Option<&str> {
        match self {
            Self::Ordered(residue) => residue.residue_name(),
            Self::Disordered(variants) => variants.residue_name(),
        }
    }
}

/// A polymer chain: residues keyed by [`ResidueId`] in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    entity: Entity<ChainId, StructureId, ResidueSite>,
}

impl Chain {
    pub fn new(id: ChainId) -> Self {
        Self {
            entity: Entity::new(id),
        }
    }

    pub fn id(&self) -> ChainId {
        *self.entity.id()
    }

    pub fn parent(&self) -> Option<&StructureId> {
        self.entity.parent()
    }

    pub fn add(&mut self, residue: impl Into<ResidueSite>) -> Result<(), ChainError> {
        let site = residue.into();
        let residue_id = site.id().clone();
        self.entity
            .add(site)
            .map_err(|_| ChainError::ResidueAlreadyDefined {
                residue_id,
                chain_id: self.id(),
            })
    }

    pub fn residue(&self, id: &ResidueId) -> Option<&ResidueSite> {
        self.entity.get(id)
    }

    pub fn residue_mut(&mut self, id: &ResidueId) -> Option<&mut ResidueSite> {
        self.entity.get_mut(id)
    }

    pub fn has_residue(&self, id: &ResidueId) -> bool {
        self.entity.has_id(id)
    }

    pub fn residues(&self) -> impl Iterator<Item = &ResidueSite> {
        self.entity.iter()
    }

    pub fn residues_mut(&mut self) -> impl Iterator<Item = &mut ResidueSite> {
        self.entity.iter_mut()
    }

    pub fn remove_residue(&mut self, id: &ResidueId) -> Option<ResidueSite> {
        self.entity.detach_child(id)
    }

    pub fn len(&self) -> usize {
        self.entity.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entity.is_empty()
    }

    pub fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        self.entity.strictly_equals(&other.entity, compare_coordinates)
    }
}

impl Node for Chain {
    type Id = ChainId;
    type ParentId = StructureId;

    fn id(&self) -> &ChainId {
        self.entity.id()
    }

    fn parent(&self) -> Option<&StructureId> {
        self.entity.parent()
    }

    fn set_parent(&mut self, parent: Option<StructureId>) {
        self.entity.set_parent(parent);
    }

    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        Chain::strictly_equals(self, other, compare_coordinates)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Chain id={}>", self.id())
    }
}
