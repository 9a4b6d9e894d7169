//! # Rotamers Module
//!
//! Chi-angle metadata and the rotation machinery that drives a residue's
//! side chain into a requested rotamer.
//!
//! ## Key Components
//!
//! - [`chi`] - Chi-angle indices and per-residue definitions (reference plane,
//!   rotation axis, canonical atom order)
//! - [`library`] - The built-in library of the 20 canonical amino acids and
//!   TOML loading of custom libraries
//! - [`mutation`] - The working coordinate buffer and the per-chi rotation
//!   steps used by [`Residue::mutate`](crate::core::models::residue::Residue::mutate)
//!
//! ## Usage
//!
//! ```ignore
//! use rotamut::core::rotamers::chi::Chi;
//! use rotamut::core::rotamers::library::standard_library;
//! use rotamut::core::rotamers::mutation::{introduce_rotamer, RotamerAngles};
//!
//! let rotamer: RotamerAngles = [(Chi::Chi1, -65.0), (Chi::Chi2, 95.0)].into_iter().collect();
//! let rotations = introduce_rotamer(standard_library(), "TYR", &mut sample, &rotamer)?;
//! ```

pub mod chi;
pub mod library;
pub mod mutation;
