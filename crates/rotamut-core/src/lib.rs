//! # Rotamut Core Library
//!
//! Hierarchical macromolecular structure models and rotamer-driven point
//! mutation of residue side chains.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** The structure hierarchy (`Structure`, `Chain`,
//!   `Residue`, `Atom`) with its disordered variants, the chi-angle metadata of
//!   the amino acids, and the geometry of side-chain rotations. A residue can
//!   be mutated directly with `Residue::mutate`.
//!
//! - **[`engine`]: Configuration.** The `MutationConfig` builder and the error
//!   type shared by the workflows.
//!
//! - **[`workflows`]: The Public API.** Complete procedures such as mutating a
//!   residue addressed by chain and residue identifier inside a structure.

pub mod core;
pub mod engine;
pub mod workflows;
