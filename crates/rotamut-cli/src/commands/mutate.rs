use crate::cli::MutateArgs;
use crate::config::MutationJob;
use crate::error::{CliError, Result};
use crate::report::MutationReport;
use rotamut::core::models::chain::ResidueSite;
use rotamut::workflows::mutate;
use std::path::Path;
use tracing::{debug, info};

pub fn run(args: MutateArgs) -> Result<()> {
    let report = execute(&args)?;
    let text = report.to_toml()?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text)?;
            info!("Mutation report written to {:?}", path);
            println!(
                "Mutated chain {} residue {}: {} -> {}. Report written to {}",
                report.chain_id,
                report.residue_number,
                report.previous_resname,
                report.resname,
                path.display()
            );
        }
        None => print!("{}", text),
    }
    Ok(())
}

fn execute(args: &MutateArgs) -> Result<MutationReport> {
    let job = MutationJob::from_file(&args.job)?;
    let config = job.mutation_config(args)?;
    debug!("Resolved mutation configuration: {:?}", config);

    let mut structure = job.build_structure(&structure_name(&args.job))?;
    let mut sample = job.sample()?;
    let rotamer = job.rotamer()?;

    let summary = mutate::run(&mut structure, &config, &mut sample, &rotamer)?;

    let spec = &config.residue;
    let residue = structure
        .residue(spec.chain_id, &spec.residue_id)
        .and_then(ResidueSite::residue)
        .ok_or_else(|| {
            CliError::Other(anyhow::anyhow!("Mutated residue at {} is no longer present", spec))
        })?;

    Ok(MutationReport::new(spec, &summary, residue))
}

fn structure_name(job: &Path) -> String {
    job.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "job".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotamut::core::models::residue::ResidueError;
    use rotamut::core::rotamers::mutation::MutationError;
    use rotamut::engine::error::EngineError;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    const SERINE_JOB: &str = r#"
[residue]
chain-id = "A"
residue-number = 44
resname = "ALA"

[[residue.atoms]]
name = "N"
position = [1.4, 0.0, -0.5]

[[residue.atoms]]
name = "CA"
position = [0.0, 0.0, 0.0]

[[residue.atoms]]
name = "C"
position = [-0.8, 1.2, -0.5]

[[residue.atoms]]
name = "O"
position = [-0.6, 2.3, 0.0]

[[residue.atoms]]
name = "CB"
position = [0.0, 0.0, 1.5]

[mutation]
target = "SER"

[rotamer]
CHI1 = 90.0

[[sample]]
name = "N"
position = [1.4, 0.0, -0.5]

[[sample]]
name = "CA"
position = [0.0, 0.0, 0.0]

[[sample]]
name = "C"
position = [-0.8, 1.2, -0.5]

[[sample]]
name = "O"
position = [-0.6, 2.3, 0.0]

[[sample]]
name = "CB"
position = [0.0, 0.0, 1.5]

[[sample]]
name = "OG"
position = [1.4, 0.0, 2.0]
"#;

    fn write_job(content: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ser44.toml");
        fs::write(&path, content).unwrap();
        (dir, path)
    }

    fn args(job: PathBuf, output: Option<PathBuf>) -> MutateArgs {
        MutateArgs {
            job,
            output,
            chi_library: None,
            keep_sidechain: false,
        }
    }

    #[test]
    fn execute_mutates_residue_from_job_file() {
        let (_dir, path) = write_job(SERINE_JOB);

        let report = execute(&args(path, None)).unwrap();

        assert_eq!(report.previous_resname, "ALA");
        assert_eq!(report.resname, "SER");
        assert_eq!(report.rotations.len(), 1);
        assert!((report.rotations[0].measured_degrees).abs() < 1e-6);
        let og = report.atoms.iter().find(|atom| atom.name == "OG").unwrap();
        assert!((og.position[0] - 0.0).abs() < 1e-3);
        assert!((og.position[1] - 1.4).abs() < 1e-3);
        assert!((og.position[2] - 2.0).abs() < 1e-3);
        assert_eq!(og.serial, Some(9999));
    }

    #[test]
    fn run_writes_report_to_output_file() {
        let (dir, path) = write_job(SERINE_JOB);
        let output = dir.path().join("report.toml");

        run(args(path, Some(output.clone()))).unwrap();

        let content = fs::read_to_string(output).unwrap();
        assert!(content.contains("resname = \"SER\""));
        assert!(content.contains("atoms-added"));
    }

    #[test]
    fn missing_rotamer_angle_surfaces_core_error() {
        let (_dir, path) = write_job(&SERINE_JOB.replace("CHI1 = 90.0", ""));

        let result = execute(&args(path, None));

        assert!(matches!(
            result,
            Err(CliError::Core(EngineError::Residue {
                source: ResidueError::Mutation(MutationError::MissingChiAngle { .. })
            }))
        ));
    }

    #[test]
    fn custom_chi_library_is_used() {
        let (dir, path) = write_job(SERINE_JOB);
        fs::write(
            dir.path().join("chi.toml"),
            "[SER]\norder = [\"N\", \"CA\", \"C\", \"O\", \"CB\", \"OG\"]\n",
        )
        .unwrap();
        let mut args = args(path, None);
        args.chi_library = Some(dir.path().join("chi.toml"));

        let report = execute(&args).unwrap();

        // No chi definitions: the sample is copied without rotation.
        assert!(report.rotations.is_empty());
        let og = report.atoms.iter().find(|atom| atom.name == "OG").unwrap();
        assert_eq!(og.position, [1.4, 0.0, 2.0]);
    }

    #[test]
    fn structure_is_named_after_job_file() {
        assert_eq!(structure_name(Path::new("jobs/ser44.toml")), "ser44");
    }
}
