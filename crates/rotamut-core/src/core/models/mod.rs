//! # Core Models Module
//!
//! This module contains the data structures that represent a macromolecular
//! structure as a four-level hierarchy: structure, chain, residue and atom.
//!
//! ## Overview
//!
//! Every level except the atoms is an [`entity::Entity`]: an insertion-ordered
//! map of uniquely identified children plus a non-owning reference to the
//! parent, stored as the parent's identifier. The container guarantees that
//!
//! - **Child identifiers are unique** - adding a duplicate is rejected and the
//!   container is left unchanged
//! - **Parent references stay consistent** - adding a child points it at the
//!   container, detaching a child clears the reference
//! - **Iteration is deterministic** - children come back in insertion order
//!   unless explicitly sorted
//!
//! Alternate conformations are represented by the wrappers in [`disordered`]:
//! a [`disordered::DisorderedAtom`] groups alternate locations of one atom and
//! a [`disordered::DisorderedResidue`] groups residue variants occupying the
//! same position.
//!
//! ## Key Components
//!
//! - [`entity`] - The generic parent/child container and the [`entity::Node`] trait
//! - [`atom`] - Atom records, elements and atom sites
//! - [`residue`] - Residues, including the in-place side-chain mutation
//! - [`disordered`] - Alternate-location and point-mutation wrappers
//! - [`chain`] - Chains of residue sites
//! - [`structure`] - The root container of chains
//! - [`ids`] - Identifier types for residues, chains and structures
//!
//! ## Usage
//!
//! ```ignore
//! use rotamut::core::models::{atom::Atom, chain::Chain, ids::ResidueId, residue::Residue};
//!
//! let mut residue = Residue::new(ResidueId::standard(44), "SER", "");
//! residue.add(Atom::new("CA", Point3::new(0.0, 0.0, 0.0)))?;
//!
//! let mut chain = Chain::new('A');
//! chain.add(residue)?;
//! ```

pub mod atom;
pub mod chain;
pub mod disordered;
pub mod entity;
pub mod ids;
pub mod residue;
pub mod structure;
