use crate::cli::{LibraryArgs, LibraryCommands};
use crate::error::{CliError, Result};
use rotamut::core::rotamers::chi::{ChiDefinition, ResidueChiTopology};
use rotamut::core::rotamers::library::{ChiLibrary, standard_library};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};
use tracing::info;

pub fn run(args: LibraryArgs) -> Result<()> {
    match args.command {
        LibraryCommands::Show { residues, library } => {
            print!("{}", handle_show(&residues, library.as_deref())?);
        }
        LibraryCommands::Validate { path } => {
            let library = ChiLibrary::load(&path)?;
            println!(
                "✅ {} is a valid chi library with {} residue type(s).",
                path.display(),
                library.len()
            );
        }
        LibraryCommands::Export { output } => {
            handle_export(output)?;
        }
    }
    Ok(())
}

fn handle_show(residues: &[String], library_path: Option<&Path>) -> Result<String> {
    let loaded;
    let library = match library_path {
        Some(path) => {
            loaded = ChiLibrary::load(path)?;
            &loaded
        }
        None => standard_library(),
    };

    let names: Vec<String> = if residues.is_empty() {
        library.residue_names().into_iter().map(str::to_string).collect()
    } else {
        residues.iter().map(|name| name.trim().to_ascii_uppercase()).collect()
    };

    let mut out = String::new();
    for name in &names {
        let topology = library.get(name).ok_or_else(|| {
            CliError::Argument(format!("Residue type '{}' is not in the chi library", name))
        })?;
        describe_residue(&mut out, name, topology);
    }
    Ok(out)
}

fn describe_residue(out: &mut String, name: &str, topology: &ResidueChiTopology) {
    let _ = writeln!(out, "{} ({} chi angle(s))", name, topology.chi_count());
    let _ = writeln!(out, "  order: {}", topology.order().join(" "));
    for (chi, definition) in topology.chis() {
        let _ = writeln!(
            out,
            "  {}: plane {}  axis {}",
            chi,
            definition.ref_plane.join("-"),
            definition.axis.join("-")
        );
    }
}

#[derive(Serialize)]
struct ExportedResidue<'a> {
    order: &'a [String],
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    chi: BTreeMap<&'static str, &'a ChiDefinition>,
}

/// Renders a library in the TOML layout read by [`ChiLibrary::load`].
fn library_to_toml(library: &ChiLibrary) -> Result<String> {
    let residues: BTreeMap<&str, ExportedResidue> = library
        .residue_names()
        .into_iter()
        .filter_map(|name| library.get(name).map(|topology| (name, topology)))
        .map(|(name, topology)| {
            let chi = topology
                .chis()
                .map(|(chi, definition)| (chi.label(), definition))
                .collect();
            (
                name,
                ExportedResidue {
                    order: topology.order(),
                    chi,
                },
            )
        })
        .collect();

    toml::to_string_pretty(&residues)
        .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to serialize chi library: {}", e)))
}

fn handle_export(output: Option<PathBuf>) -> Result<()> {
    let text = library_to_toml(standard_library())?;
    match output {
        Some(path) => {
            std::fs::write(&path, text)?;
            info!("Exported built-in chi library to {:?}", path);
            println!("Built-in chi library written to {}", path.display());
        }
        None => print!("{}", text),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rotamut::core::rotamers::library::LibraryLoadError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn exported_library_loads_back_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("chi.toml");

        handle_export(Some(path.clone())).unwrap();
        let reloaded = ChiLibrary::load(&path).unwrap();

        assert_eq!(&reloaded, standard_library());
    }

    #[test]
    fn show_describes_requested_residues() {
        let text = handle_show(&["ile".to_string()], None).unwrap();

        assert!(text.starts_with("ILE (2 chi angle(s))"));
        assert!(text.contains("CHI1: plane N-CA-CB-CG1  axis CA-CB"));
        assert!(text.contains("CHI2: plane CA-CB-CG1-CD1  axis CB-CG1"));
    }

    #[test]
    fn show_lists_every_residue_by_default() {
        let text = handle_show(&[], None).unwrap();

        assert!(text.starts_with("ALA (0 chi angle(s))"));
        assert_eq!(text.lines().filter(|line| !line.starts_with(' ')).count(), 20);
    }

    #[test]
    fn show_rejects_unknown_residue() {
        let result = handle_show(&["XYZ".to_string()], None);

        assert!(matches!(result, Err(CliError::Argument(_))));
    }

    #[test]
    fn validate_reports_inconsistent_library() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(
            &path,
            "[SER]\norder = [\"N\", \"CA\", \"CB\"]\n\n[SER.chi.CHI1]\nref_plane = [\"N\", \"CA\", \"CB\", \"OG\"]\naxis = [\"CA\", \"CB\"]\n",
        )
        .unwrap();

        let result = run(LibraryArgs {
            command: LibraryCommands::Validate { path },
        });

        assert!(matches!(
            result,
            Err(CliError::Library(LibraryLoadError::InvalidTopology { .. }))
        ));
    }
}
