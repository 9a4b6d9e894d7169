use thiserror::Error;

use super::config::{ConfigError, ResidueSpecifier};
use crate::core::models::ids::ChainId;
use crate::core::models::residue::ResidueError;
use crate::core::rotamers::library::LibraryLoadError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Chain '{chain_id}' not found in structure")]
    ChainNotFound { chain_id: ChainId },

    #[error("Residue not found in structure: {spec}")]
    ResidueNotFound { spec: ResidueSpecifier },

    #[error("Disordered residue at {spec} has no selected variant")]
    EmptyResidueSite { spec: ResidueSpecifier },

    #[error("Disordered residue at {spec} already holds a '{resname}' variant")]
    VariantConflict {
        spec: ResidueSpecifier,
        resname: String,
    },

    #[error("Failed to load chi library: {source}")]
    Library {
        #[from]
        source: LibraryLoadError,
    },

    #[error("Residue operation failed: {source}")]
    Residue {
        #[from]
        source: ResidueError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },
}
