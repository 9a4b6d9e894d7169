use super::chain::{Chain, ResidueSite};
use super::entity::Entity;
use super::ids::{ChainId, ResidueId, StructureId};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("Chain {chain_id} is already defined in structure {structure_id}")]
    ChainAlreadyDefined {
        chain_id: ChainId,
        structure_id: StructureId,
    },
}

/// Root of the hierarchy: chains keyed by chain identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    entity: Entity<StructureId, (), Chain>,
}

impl Structure {
    pub fn new(id: &str) -> Self {
        Self {
            entity: Entity::new(id.to_string()),
        }
    }

    pub fn id(&self) -> &str {
        self.entity.id()
    }

    pub fn add(&mut self, chain: Chain) -> Result<(), StructureError> {
        let chain_id = chain.id();
        self.entity
            .add(chain)
            .map_err(|_| StructureError::ChainAlreadyDefined {
                chain_id,
                structure_id: self.id().to_string(),
            })
    }

    pub fn chain(&self, id: ChainId) -> Option<&Chain> {
        self.entity.get(&id)
    }

    pub fn chain_mut(&mut self, id: ChainId) -> Option<&mut Chain> {
        self.entity.get_mut(&id)
    }

    pub fn has_chain(&self, id: ChainId) -> bool {
        self.entity.has_id(&id)
    }

    pub fn chains(&self) -> impl Iterator<Item = &Chain> {
        self.entity.iter()
    }

    pub fn remove_chain(&mut self, id: ChainId) -> Option<Chain> {
        self.entity.detach_child(&id)
    }

    /// Looks up a residue site by chain and residue identifier.
    pub fn residue(&self, chain_id: ChainId, residue_id: &ResidueId) -> Option<&ResidueSite> {
        self.chain(chain_id)?.residue(residue_id)
    }

    pub fn residue_mut(
        &mut self,
        chain_id: ChainId,
        residue_id: &ResidueId,
    ) -> Option<&mut ResidueSite> {
        self.chain_mut(chain_id)?.residue_mut(residue_id)
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

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Structure id={}>", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::entity::Node;
    use crate::core::models::residue::Residue;

    fn structure_with_chain(chain_id: ChainId) -> Structure {
        let mut chain = Chain::new(chain_id);
        chain
            .add(Residue::new(ResidueId::standard(10), "LEU", ""))
            .unwrap();
        let mut structure = Structure::new("1abc");
        structure.add(chain).unwrap();
        structure
    }

    #[test]
    fn add_chain_sets_parent_to_structure_id() {
        let structure = structure_with_chain('A');
        let chain = structure.chain('A').unwrap();
        assert_eq!(Node::parent(chain), Some(&"1abc".to_string()));
    }

    #[test]
    fn duplicate_chain_is_rejected() {
        let mut structure = structure_with_chain('A');

        let err = structure.add(Chain::new('A')).unwrap_err();

        assert_eq!(
            err,
            StructureError::ChainAlreadyDefined {
                chain_id: 'A',
                structure_id: "1abc".to_string(),
            }
        );
        assert_eq!(structure.chain('A').unwrap().len(), 1);
    }

    #[test]
    fn residue_lookup_walks_chain_and_residue_ids() {
        let structure = structure_with_chain('A');

        let site = structure.residue('A', &ResidueId::standard(10)).unwrap();

        assert_eq!(site.residue().unwrap().resname(), "LEU");
        assert!(structure.residue('B', &ResidueId::standard(10)).is_none());
        assert!(structure.residue('A', &ResidueId::standard(11)).is_none());
    }

    #[test]
    fn remove_chain_clears_parent() {
        let mut structure = structure_with_chain('A');
        let chain = structure.remove_chain('A').unwrap();
        assert!(chain.parent().is_none());
        assert!(structure.is_empty());
    }

    #[test]
    fn display_uses_structure_id() {
        assert_eq!(Structure::new("5e0m").to_string(), "<Structure id=5e0m>");
    }
}
