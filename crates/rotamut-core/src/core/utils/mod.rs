//! Geometry helpers and atom-name classification shared by the models and
//! the mutation code.

pub mod geometry;
pub mod identifiers;
