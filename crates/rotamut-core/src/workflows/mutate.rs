use crate::core::models::chain::ResidueSite;
use crate::core::models::disordered::DisorderedResidue;
use crate::core::models::structure::Structure;
use crate::core::rotamers::library::{ChiLibrary, standard_library};
use crate::core::rotamers::mutation::{MutationSummary, RotamerAngles, SampleCoordinates};
use crate::engine::config::MutationConfig;
use crate::engine::error::EngineError;
use tracing::{info, instrument, warn};

/// Mutates the residue named by `config` inside `structure`.
///
/// `sample` holds coordinates of the target residue type, already
/// superimposed on the residue's backbone, and is rotated in place to the
/// chi angles in `rotamer`.
///
/// For a disordered site the selected variant is mutated and re-registered
/// under its new residue name, which stays selected.
#[instrument(skip_all, name = "mutation_workflow", fields(target = %config.target))]
pub fn run(
    structure: &mut Structure,
    config: &MutationConfig,
    sample: &mut SampleCoordinates,
    rotamer: &RotamerAngles,
) -> Result<MutationSummary, EngineError> {
    info!(
        "Mutating {} of structure '{}' to {}.",
        config.residue,
        structure.id(),
        config.target
    );

    let loaded;
    let library: &ChiLibrary = match &config.chi_library_path {
        Some(path) => {
            loaded = ChiLibrary::load(path)?;
            info!(
                "Loaded chi library from '{}' ({} residue type(s)).",
                path.display(),
                loaded.len()
            );
            &loaded
        }
        None => standard_library(),
    };

    let spec = &config.residue;
    let chain = structure
        .chain_mut(spec.chain_id)
        .ok_or(EngineError::ChainNotFound {
            chain_id: spec.chain_id,
        })?;
    let site = chain
        .residue_mut(&spec.residue_id)
        .ok_or_else(|| EngineError::ResidueNotFound { spec: spec.clone() })?;

    let summary = match site {
        ResidueSite::Ordered(residue) => {
            residue.mutate_with(library, config.options, &config.target, sample, rotamer)?
        }
        ResidueSite::Disordered(variants) => {
            mutate_selected_variant(variants, library, config, sample, rotamer)?
        }
    };

    info!(
        "Mutation complete: {} -> {} ({} chi rotation(s)).",
        summary.previous_resname,
        summary.resname,
        summary.rotations.len()
    );
    Ok(summary)
}

fn mutate_selected_variant(
    variants: &mut DisorderedResidue,
    library: &ChiLibrary,
    config: &MutationConfig,
    sample: &mut SampleCoordinates,
    rotamer: &RotamerAngles,
) -> Result<MutationSummary, EngineError> {
    let spec = &config.residue;
    let selected = variants
        .selected_resname()
        .map(str::to_string)
        .ok_or_else(|| EngineError::EmptyResidueSite { spec: spec.clone() })?;

    if selected != config.target && variants.disordered_has_id(&config.target) {
        return Err(EngineError::VariantConflict {
            spec: spec.clone(),
            resname: config.target.clone(),
        });
    }

    let mut residue = variants
        .disordered_remove(&selected)
        .ok_or_else(|| EngineError::EmptyResidueSite { spec: spec.clone() })?;

    let result = residue.mutate_with(library, config.options, &config.target, sample, rotamer);
    if result.is_err() {
        warn!("Mutation of variant {} failed; restoring it.", selected);
    }
    // Re-registering selects the variant again, whether or not it was mutated.
    variants.disordered_add(residue);
    Ok(result?)
}
