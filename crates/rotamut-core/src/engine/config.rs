use crate::core::models::ids::{ChainId, ResidueId};
use crate::core::rotamers::mutation::MutationOptions;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid residue name '{0}': expected a non-empty alphanumeric code")]
    InvalidResidueName(String),
}

/// Locates a residue within a structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueSpecifier {
    pub chain_id: ChainId,
    pub residue_id: ResidueId,
}

impl ResidueSpecifier {
    pub fn new(chain_id: ChainId, residue_id: ResidueId) -> Self {
        Self {
            chain_id,
            residue_id,
        }
    }

    /// A standard residue without insertion code, e.g. `A 44`.
    pub fn standard(chain_id: ChainId, sequence_number: i32) -> Self {
        Self::new(chain_id, ResidueId::standard(sequence_number))
    }
}

impl fmt::Display for ResidueSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "chain {} residue {}", self.chain_id, self.residue_id)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MutationConfig {
    pub residue: ResidueSpecifier,
    /// Three-letter code of the residue type to build, upper case.
    pub target: String,
    /// Custom chi library; the built-in library is used when absent.
    pub chi_library_path: Option<PathBuf>,
    pub options: MutationOptions,
}

#[derive(Default)]
pub struct MutationConfigBuilder {
    residue: Option<ResidueSpecifier>,
    target: Option<String>,
    chi_library_path: Option<PathBuf>,
    strip_existing_sidechain: Option<bool>,
}

impl MutationConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn residue(mut self, residue: ResidueSpecifier) -> Self {
        self.residue = Some(residue);
        self
    }
    pub fn target(mut self, resname: &str) -> Self {
        self.target = Some(resname.to_string());
        self
    }
    pub fn chi_library_path(mut self, path: PathBuf) -> Self {
        self.chi_library_path = Some(path);
        self
    }
    pub fn strip_existing_sidechain(mut self, strip: bool) -> Self {
        self.strip_existing_sidechain = Some(strip);
        self
    }

    pub fn build(self) -> Result<MutationConfig, ConfigError> {
        let target = self
            .target
            .ok_or(ConfigError::MissingParameter("target"))?
            .trim()
            .to_ascii_uppercase();
        if target.is_empty() || !target.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::InvalidResidueName(target));
        }

        let defaults = MutationOptions::default();
        Ok(MutationConfig {
            residue: self
                .residue
                .ok_or(ConfigError::MissingParameter("residue"))?,
            target,
            chi_library_path: self.chi_library_path,
            options: MutationOptions {
                strip_existing_sidechain: self
                    .strip_existing_sidechain
                    .unwrap_or(defaults.strip_existing_sidechain),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_normalizes_target_and_applies_defaults() {
        let config = MutationConfigBuilder::new()
            .residue(ResidueSpecifier::standard('A', 44))
            .target(" tyr ")
            .build()
            .unwrap();

        assert_eq!(config.target, "TYR");
        assert_eq!(config.residue.residue_id, ResidueId::standard(44));
        assert!(config.chi_library_path.is_none());
        assert!(config.options.strip_existing_sidechain);
    }

    #[test]
    fn build_keeps_explicit_options() {
        let config = MutationConfigBuilder::new()
            .residue(ResidueSpecifier::standard('B', 7))
            .target("SER")
            .chi_library_path(PathBuf::from("chi.toml"))
            .strip_existing_sidechain(false)
            .build()
            .unwrap();

        assert_eq!(config.chi_library_path, Some(PathBuf::from("chi.toml")));
        assert!(!config.options.strip_existing_sidechain);
    }

    #[test]
    fn build_reports_missing_parameters() {
        let missing_target = MutationConfigBuilder::new()
            .residue(ResidueSpecifier::standard('A', 1))
            .build();
        let missing_residue = MutationConfigBuilder::new().target("ALA").build();

        assert_eq!(missing_target, Err(ConfigError::MissingParameter("target")));
        assert_eq!(missing_residue, Err(ConfigError::MissingParameter("residue")));
    }

    #[test]
    fn build_rejects_malformed_residue_names() {
        let result = MutationConfigBuilder::new()
            .residue(ResidueSpecifier::standard('A', 1))
            .target("T-R")
            .build();
        assert_eq!(result, Err(ConfigError::InvalidResidueName("T-R".to_string())));
    }

    #[test]
    fn specifier_display_names_chain_and_residue() {
        assert_eq!(
            ResidueSpecifier::standard('A', 44).to_string(),
            "chain A residue (' ', 44, ' ')"
        );
    }
}
