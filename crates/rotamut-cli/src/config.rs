use crate::cli::MutateArgs;
use crate::error::{CliError, Result};
use nalgebra::Point3;
use rotamut::core::models::atom::{Atom, AtomSite, Element};
use rotamut::core::models::chain::Chain;
use rotamut::core::models::disordered::DisorderedAtom;
use rotamut::core::models::ids::ResidueId;
use rotamut::core::models::residue::Residue;
use rotamut::core::models::structure::Structure;
use rotamut::core::rotamers::chi::{Chi, ParseChiError};
use rotamut::core::rotamers::mutation::{RotamerAngles, SampleCoordinates};
use rotamut::engine::config::{MutationConfig, MutationConfigBuilder, ResidueSpecifier};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

fn default_insertion_code() -> char {
    ' '
}

fn default_hetero_flag() -> String {
    " ".to_string()
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialAtom {
    name: String,
    position: [f64; 3],
    element: Option<String>,
    altloc: Option<char>,
    occupancy: Option<f64>,
    b_factor: Option<f64>,
    serial: Option<usize>,
}

impl From<&PartialAtom> for Atom {
    fn from(p: &PartialAtom) -> Self {
        let mut atom = Atom::new(&p.name, Point3::from(p.position));
        if let Some(symbol) = &p.element {
            atom.element = Element::from_symbol(symbol);
        }
        if let Some(altloc) = p.altloc {
            atom.altloc = altloc;
        }
        if let Some(occupancy) = p.occupancy {
            atom.occupancy = occupancy;
        }
        if let Some(b_factor) = p.b_factor {
            atom.b_factor = b_factor;
        }
        atom.serial = p.serial;
        atom
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialResidue {
    chain_id: char,
    residue_number: i32,
    #[serde(default = "default_insertion_code")]
    insertion_code: char,
    #[serde(default = "default_hetero_flag")]
    hetero_flag: String,
    resname: String,
    #[serde(default)]
    segid: String,
    #[serde(default)]
    atoms: Vec<PartialAtom>,
}

impl PartialResidue {
    fn residue_id(&self) -> ResidueId {
        ResidueId::new(&self.hetero_flag, self.residue_number, self.insertion_code)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct PartialMutation {
    target: String,
    chi_library: Option<PathBuf>,
    strip_existing_sidechain: Option<bool>,
}

#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
struct PartialSampleAtom {
    name: String,
    position: [f64; 3],
}

/// A mutation job read from a TOML file: the residue to mutate with its
/// current atoms, the target residue type, the target chi angles and the
/// sampled coordinates of the new side chain.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct MutationJob {
    residue: PartialResidue,
    mutation: PartialMutation,
    #[serde(default)]
    rotamer: BTreeMap<String, f64>,
    #[serde(default)]
    sample: Vec<PartialSampleAtom>,
    #[serde(skip)]
    base_dir: PathBuf,
}

impl MutationJob {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading mutation job from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        let mut job: Self = toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })?;
        job.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        Ok(job)
    }

    pub fn residue_specifier(&self) -> ResidueSpecifier {
        ResidueSpecifier::new(self.residue.chain_id, self.residue.residue_id())
    }

    /// Builds a one-chain structure holding the job's residue.
    ///
    /// Atoms sharing a name with distinct altloc codes are grouped into a
    /// disordered atom.
    pub fn build_structure(&self, name: &str) -> Result<Structure> {
        let spec = &self.residue;
        let mut residue = Residue::new(spec.residue_id(), &spec.resname, &spec.segid);
        for partial in &spec.atoms {
            add_job_atom(&mut residue, Atom::from(partial))?;
        }
        debug!("Built {} with {} atom site(s).", residue, residue.len());

        let mut chain = Chain::new(spec.chain_id);
        chain
            .add(residue)
            .map_err(|e| CliError::Config(e.to_string()))?;
        let mut structure = Structure::new(name);
        structure
            .add(chain)
            .map_err(|e| CliError::Config(e.to_string()))?;
        Ok(structure)
    }

    /// Resolves the mutation configuration, letting command-line flags
    /// override the job file.
    ///
    /// A relative `chi-library` path in the job file is taken relative to the
    /// job file itself.
    pub fn mutation_config(&self, args: &MutateArgs) -> Result<MutationConfig> {
        let chi_library = match &args.chi_library {
            Some(path) => Some(path.clone()),
            None => self
                .mutation
                .chi_library
                .as_ref()
                .map(|path| self.base_dir.join(path)),
        };
        let strip = if args.keep_sidechain {
            false
        } else {
            self.mutation.strip_existing_sidechain.unwrap_or(true)
        };

        let mut builder = MutationConfigBuilder::new()
            .residue(self.residue_specifier())
            .target(&self.mutation.target)
            .strip_existing_sidechain(strip);
        if let Some(path) = chi_library {
            builder = builder.chi_library_path(path);
        }
        builder.build().map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn sample(&self) -> Result<SampleCoordinates> {
        let mut sample = SampleCoordinates::with_capacity(self.sample.len());
        for atom in &self.sample {
            if sample
                .insert(atom.name.clone(), Point3::from(atom.position))
                .is_some()
            {
                return Err(CliError::Config(format!(
                    "Sample atom '{}' is listed more than once",
                    atom.name
                )));
            }
        }
        Ok(sample)
    }

    pub fn rotamer(&self) -> Result<RotamerAngles> {
        let mut angles = RotamerAngles::new();
        for (key, &degrees) in &self.rotamer {
            let chi: Chi = key
                .parse()
                .map_err(|e: ParseChiError| CliError::Config(e.to_string()))?;
            if angles.insert(chi, degrees).is_some() {
                return Err(CliError::Config(format!("{} is given more than once", chi)));
            }
        }
        Ok(angles)
    }
}

fn add_job_atom(residue: &mut Residue, atom: Atom) -> Result<()> {
    if atom.has_blank_altloc() {
        residue.add(atom)?;
        return Ok(());
    }

    if let Some(AtomSite::Disordered(group)) = residue.atom_mut(&atom.name) {
        if group.altlocs().any(|altloc| altloc == atom.altloc) {
            return Err(CliError::Config(format!(
                "Atom '{}' repeats alternate location '{}'",
                atom.name, atom.altloc
            )));
        }
        group.disordered_add(atom);
        return Ok(());
    }

    if residue.has_atom(&atom.name) {
        // An ordered atom of that name exists; let the residue report it.
        residue.add(atom)?;
        return Ok(());
    }

    let mut group = DisorderedAtom::new(&atom.name);
    group.disordered_add(atom);
    residue.add(group)?;
    residue.flag_disordered();
    Ok(())
}
