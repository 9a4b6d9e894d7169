//! # Workflows Module
//!
//! High-level entry points that tie the [`engine`](crate::engine) configuration
//! to the [`core`](crate::core) models.
//!
//! - **Mutation Workflow** ([`mutate`]) - Locates a residue in a structure,
//!   loads the requested chi library and replaces the residue's side chain,
//!   handling disordered residue sites.

pub mod mutate;
