use super::disordered::DisorderedAtom;
use super::entity::Node;
use super::ids::ResidueId;
use nalgebra::Point3;
use std::fmt;

const COORDINATE_ABSOLUTE_TOLERANCE: f64 = 1e-8;
const COORDINATE_RELATIVE_TOLERANCE: f64 = 1e-5;

/// Chemical element of an atom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Element {
    // --- Core Bio-organic ---
    H, // Hydrogen
    C, // Carbon
    N, // Nitrogen
    O, // Oxygen
    P, // Phosphorus
    S, // Sulfur

    // --- Common Halogens ---
    F,  // Fluorine
    Cl, // Chlorine
    Br, // Bromine
    I,  // Iodine

    // --- Common Metal Ions ---
    Na, // Sodium
    K,  // Potassium
    Mg, // Magnesium
    Ca, // Calcium
    Mn, // Manganese
    Fe, // Iron
    Co, // Cobalt
    Ni, // Nickel
    Cu, // Copper
    Zn, // Zinc

    // --- Other ---
    Se, // Selenium
    #[default]
    Unknown, // Unrecognized symbol
}

impl Element {
    /// Parses an element symbol; unrecognized symbols map to [`Element::Unknown`].
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol.trim().to_uppercase().as_str() {
            "H" | "D" | "1H" | "2H" => Self::H,
            "C" => Self::C,
            "N" => Self::N,
            "O" => Self::O,
            "P" => Self::P,
            "S" => Self::S,

            "F" => Self::F,
            "CL" => Self::Cl,
            "BR" => Self::Br,
            "I" => Self::I,

            "NA" => Self::Na,
            "K" => Self::K,
            "MG" => Self::Mg,
            "CA" => Self::Ca,
            "MN" => Self::Mn,
            "FE" => Self::Fe,
            "CO" => Self::Co,
            "NI" => Self::Ni,
            "CU" => Self::Cu,
            "ZN" => Self::Zn,

            "SE" => Self::Se,

            _ => Self::Unknown,
        }
    }

    /// Element implied by the first letter of an atom name ("CD1" -> C,
    /// "1HB" -> H).
    pub fn from_atom_name(name: &str) -> Self {
        name.trim()
            .trim_start_matches(|c: char| c.is_ascii_digit())
            .chars()
            .next()
            .map(|c| Self::from_symbol(c.encode_utf8(&mut [0; 4])))
            .unwrap_or_default()
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::H => "H",
            Self::C => "C",
            Self::N => "N",
            Self::O => "O",
            Self::P => "P",
            Self::S => "S",
            Self::F => "F",
            Self::Cl => "Cl",
            Self::Br => "Br",
            Self::I => "I",
            Self::Na => "Na",
            Self::K => "K",
            Self::Mg => "Mg",
            Self::Ca => "Ca",
            Self::Mn => "Mn",
            Self::Fe => "Fe",
            Self::Co => "Co",
            Self::Ni => "Ni",
            Self::Cu => "Cu",
            Self::Zn => "Zn",
            Self::Se => "Se",
            Self::Unknown => "X",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Pads an atom name to the 4-character column used by PDB writers.
pub fn padded_atom_name(name: &str) -> String {
    format!("{:>4}", name)
}

/// A single atom record.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The trimmed atom name (e.g., "CA", "CD1").
    pub name: String,
    /// The 4-character name as written in the PDB atom-name column.
    pub fullname: String,
    /// The chemical element.
    pub element: Element,
    /// Cartesian coordinates in Angstroms.
    pub position: Point3<f64>,
    /// Isotropic temperature factor.
    pub b_factor: f64,
    /// Alternate-location code, blank (' ') when the atom is ordered.
    pub altloc: char,
    /// Fractional occupancy.
    pub occupancy: f64,
    /// Serial number from the source file, if any.
    pub serial: Option<usize>,
    residue_id: Option<ResidueId>,
}

impl Atom {
    /// Creates an ordered atom with full occupancy and a zero B-factor.
    ///
    /// The element is derived from the first character of the name.
    pub fn new(name: &str, position: Point3<f64>) -> Self {
        Self {
            name: name.to_string(),
            fullname: padded_atom_name(name),
            element: Element::from_atom_name(name),
            position,
            b_factor: 0.0,
            altloc: ' ',
            occupancy: 1.0,
            serial: None,
            residue_id: None,
        }
    }

    pub fn with_altloc(mut self, altloc: char, occupancy: f64) -> Self {
        self.altloc = altloc;
        self.occupancy = occupancy;
        self
    }

    pub fn has_blank_altloc(&self) -> bool {
        self.altloc == ' '
    }

    pub fn residue_id(&self) -> Option<&ResidueId> {
        self.residue_id.as_ref()
    }

    pub(crate) fn same_position(&self, other: &Atom) -> bool {
        self.position
            .iter()
            .zip(other.position.iter())
            .all(|(a, b)| {
                (a - b).abs() <= COORDINATE_ABSOLUTE_TOLERANCE + COORDINATE_RELATIVE_TOLERANCE * b.abs()
            })
    }
}

impl Node for Atom {
    type Id = String;
    type ParentId = ResidueId;

    fn id(&self) -> &String {
        &self.name
    }

    fn parent(&self) -> Option<&ResidueId> {
        self.residue_id.as_ref()
    }

    fn set_parent(&mut self, parent: Option<ResidueId>) {
        self.residue_id = parent;
    }

    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        self.name == other.name
            && self.fullname == other.fullname
            && self.element == other.element
            && self.altloc == other.altloc
            && self.occupancy == other.occupancy
            && self.b_factor == other.b_factor
            && (!compare_coordinates || self.same_position(other))
    }
}

/// A child of a residue: either a plain atom or a group of alternate
/// locations sharing one atom name.
#[derive(Debug, Clone, PartialEq)]
pub enum AtomSite {
    Ordered(Atom),
    Disordered(DisorderedAtom),
}

impl AtomSite {
    pub fn name(&self) -> &str {
        match self {
            Self::Ordered(atom) => &atom.name,
            Self::Disordered(group) => group.name(),
        }
    }

    pub fn is_disordered(&self) -> bool {
        matches!(self, Self::Disordered(_))
    }

    /// The atom that represents this site: the atom itself, or the selected
    /// alternate location.
    pub fn atom(&self) -> Option<&Atom> {
        match self {
            Self::Ordered(atom) => Some(atom),
            Self::Disordered(group) => group.selected(),
        }
    }

    pub fn atom_mut(&mut self) -> Option<&mut Atom> {
        match self {
            Self::Ordered(atom) => Some(atom),
            Self::Disordered(group) => group.selected_mut(),
        }
    }

    /// Every atom of this site; alternate locations are expanded in order.
    pub fn unpacked(&self) -> Vec<&Atom> {
        match self {
            Self::Ordered(atom) => vec![atom],
            Self::Disordered(group) => group.atoms().collect(),
        }
    }
}

impl From<Atom> for AtomSite {
    fn from(atom: Atom) -> Self {
        Self::Ordered(atom)
    }
}

impl From<DisorderedAtom> for AtomSite {
    fn from(group: DisorderedAtom) -> Self {
        Self::Disordered(group)
    }
}

impl Node for AtomSite {
    type Id = String;
    type ParentId = ResidueId;

    fn id(&self) -> &String {
        match self {
            Self::Ordered(atom) => atom.id(),
            Self::Disordered(group) => group.id(),
        }
    }

    fn parent(&self) -> Option<&ResidueId> {
        match self {
            Self::Ordered(atom) => atom.parent(),
            Self::Disordered(group) => group.parent(),
        }
    }

    fn set_parent(&mut self, parent: Option<ResidueId>) {
        match self {
            Self::Ordered(atom) => atom.set_parent(parent),
            Self::Disordered(group) => group.set_parent(parent),
        }
    }

    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        match (self, other) {
            (Self::Ordered(a), Self::Ordered(b)) => a.strictly_equals(b, compare_coordinates),
            (Self::Disordered(a), Self::Disordered(b)) => {
                a.strictly_equals(b, compare_coordinates)
            }
            _ => false,
        }
    }
}
