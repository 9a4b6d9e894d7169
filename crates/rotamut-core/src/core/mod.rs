//! # Core Module
//!
//! This module provides the building blocks of residue mutation: the
//! structure hierarchy, the chi-angle metadata of the amino acids, and the
//! geometry used to rotate side chains.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Structures, chains, residues,
//!   atoms and their disordered variants
//! - **Side-Chain Conformations** ([`rotamers`]) - Chi-angle definitions, the
//!   built-in chi library and the rotation steps of a mutation
//! - **Utilities** ([`utils`]) - Dihedral measurement, axis-angle rotation and
//!   atom-name classification
//!
//! ## Key Capabilities
//!
//! - **Consistent hierarchy bookkeeping** with unique child identifiers and
//!   parent references
//! - **Alternate conformations** at atom and residue level
//! - **Rotamer-driven point mutation** that rebuilds a side chain on an
//!   existing backbone

pub mod models;
pub mod rotamers;
pub mod utils;
