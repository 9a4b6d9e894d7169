use super::atom::{Atom, AtomSite};
use super::entity::Node;
use super::ids::{ChainId, ResidueId};
use super::residue::{Residue, ResidueError, ResidueLike};
use indexmap::IndexMap;
use std::fmt;
use std::hash::Hash;
use tracing::warn;

/// Holds several variants of one structural position and exposes one of
/// them as the selected variant.
///
/// Invariants:
/// - at most one variant per key;
/// - the selected key, when set, is present in the variant map;
/// - removing the selected variant promotes the first remaining one.
#[derive(Debug, Clone, PartialEq)]
pub struct DisorderedWrapper<I, P, K: Eq + Hash, V> {
    id: I,
    parent: Option<P>,
    variants: IndexMap<K, V>,
    selected: Option<K>,
}

impl<I, P, K, V> DisorderedWrapper<I, P, K, V>
where
    P: Clone,
    K: Clone + Eq + Hash + fmt::Debug,
{
    pub fn new(id: I) -> Self {
        Self {
            id,
            parent: None,
            variants: IndexMap::new(),
            selected: None,
        }
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    pub fn parent(&self) -> Option<&P> {
        self.parent.as_ref()
    }

    pub fn disordered_has_id(&self, key: &K) -> bool {
        self.variants.contains_key(key)
    }

    /// Inserts a new variant without changing the selection.
    ///
    /// # Panics
    ///
    /// Panics if a variant with the same key is already registered; callers
    /// must check [`Self::disordered_has_id`] first.
    pub fn disordered_insert(&mut self, key: K, variant: V) {
        assert!(
            !self.variants.contains_key(&key),
            "variant {:?} is already registered",
            key
        );
        self.variants.insert(key, variant);
    }

    /// Selects the variant stored under `key` and returns it.
    ///
    /// Returns `None` and keeps the current selection if `key` is unknown.
    pub fn disordered_select(&mut self, key: &K) -> Option<&V> {
        let (_, stored_key, variant) = self.variants.get_full(key)?;
        self.selected = Some(stored_key.clone());
        Some(variant)
    }

    pub fn selected_key(&self) -> Option<&K> {
        self.selected.as_ref()
    }

    pub fn disordered_get(&self) -> Option<&V> {
        self.selected.as_ref().and_then(|key| self.variants.get(key))
    }

    pub fn disordered_get_mut(&mut self) -> Option<&mut V> {
        let key = self.selected.as_ref()?;
        self.variants.get_mut(key)
    }

    pub fn disordered_get_by_id(&self, key: &K) -> Option<&V> {
        self.variants.get(key)
    }

    pub fn disordered_get_list(&self) -> impl Iterator<Item = &V> {
        self.variants.values()
    }

    pub fn disordered_get_list_mut(&mut self) -> impl Iterator<Item = &mut V> {
        self.variants.values_mut()
    }

    pub fn disordered_keys(&self) -> impl Iterator<Item = &K> {
        self.variants.keys()
    }

    /// Removes a variant, re-selecting the first remaining one if the removed
    /// variant was selected.
    pub fn disordered_remove(&mut self, key: &K) -> Option<V> {
        let variant = self.variants.shift_remove(key)?;
        if self.selected.as_ref() == Some(key) {
            self.selected = self.variants.keys().next().cloned();
        }
        Some(variant)
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    fn set_own_parent(&mut self, parent: Option<P>) {
        self.parent = parent;
    }
}

/// A group of alternate locations of one atom, keyed by altloc code.
///
/// The variant with the highest occupancy seen so far is selected.
#[derive(Debug, Clone, PartialEq)]
pub struct DisorderedAtom {
    inner: DisorderedWrapper<String, ResidueId, char, Atom>,
    last_occupancy: f64,
}

impl DisorderedAtom {
    pub fn new(name: &str) -> Self {
        Self {
            inner: DisorderedWrapper::new(name.to_string()),
            last_occupancy: f64::NEG_INFINITY,
        }
    }

    pub fn name(&self) -> &str {
        self.inner.id()
    }

    /// Adds an alternate location keyed by its altloc code.
    ///
    /// # Panics
    ///
    /// Panics if the altloc code is already present.
    pub fn disordered_add(&mut self, mut atom: Atom) {
        atom.set_parent(self.inner.parent().cloned());
        let altloc = atom.altloc;
        let occupancy = atom.occupancy;
        self.inner.disordered_insert(altloc, atom);
        if occupancy > self.last_occupancy {
            self.last_occupancy = occupancy;
            self.inner.disordered_select(&altloc);
        }
    }

    pub fn disordered_select(&mut self, altloc: char) -> Option<&Atom> {
        self.inner.disordered_select(&altloc)
    }

    pub fn disordered_remove(&mut self, altloc: char) -> Option<Atom> {
        let mut atom = self.inner.disordered_remove(&altloc)?;
        atom.set_parent(None);
        Some(atom)
    }

    pub fn selected(&self) -> Option<&Atom> {
        self.inner.disordered_get()
    }

    pub fn selected_mut(&mut self) -> Option<&mut Atom> {
        self.inner.disordered_get_mut()
    }

    pub fn selected_altloc(&self) -> Option<char> {
        self.inner.selected_key().copied()
    }

    pub fn altlocs(&self) -> impl Iterator<Item = char> + '_ {
        self.inner.disordered_keys().copied()
    }

    /// All alternate locations, in insertion order.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.inner.disordered_get_list()
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl Node for DisorderedAtom {
    type Id = String;
    type ParentId = ResidueId;

    fn id(&self) -> &String {
        self.inner.id()
    }

    fn parent(&self) -> Option<&ResidueId> {
        self.inner.parent()
    }

    fn set_parent(&mut self, parent: Option<ResidueId>) {
        for atom in self.inner.disordered_get_list_mut() {
            atom.set_parent(parent.clone());
        }
        self.inner.set_own_parent(parent);
    }

    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        self.name() == other.name()
            && self.len() == other.len()
            && self.atoms().zip(other.atoms()).all(|(a, b)| {
                a.altloc == b.altloc && a.strictly_equals(b, compare_coordinates)
            })
    }
}

/// Wrapper around two or more residues occupying the same position, e.g. a
/// Ser 60 and a Cys 60 each at 50 % occupancy.
///
/// Variants are keyed by residue name; calls made through [`ResidueLike`]
/// are forwarded to the selected variant.
#[derive(Debug, Clone, PartialEq)]
pub struct DisorderedResidue {
    inner: DisorderedWrapper<ResidueId, ChainId, String, Residue>,
}

impl DisorderedResidue {
    pub fn new(id: ResidueId) -> Self {
        Self {
            inner: DisorderedWrapper::new(id),
        }
    }

    pub fn id(&self) -> &ResidueId {
        self.inner.id()
    }

    pub fn parent(&self) -> Option<&ChainId> {
        self.inner.parent()
    }

    /// Adds an atom to the selected variant.
    ///
    /// Only alternate-location groups ([`DisorderedAtom`]) belong in a
    /// disordered residue. A plain atom is still stored in the selected
    /// variant, so no data is lost, but the call then returns
    /// [`ResidueError::MissingAlternateLocation`], whatever its altloc code.
    ///
    /// # Errors
    ///
    /// Returns [`ResidueError::EmptyDisorderedResidue`] when there is no
    /// selected variant, [`ResidueError::AtomAlreadyDefined`] when the
    /// selected variant already holds the atom name, and
    /// [`ResidueError::MissingAlternateLocation`] as described above.
    pub fn add(&mut self, atom: impl Into<AtomSite>) -> Result<(), ResidueError> {
        let site = atom.into();
        let residue_id = self.inner.id().clone();
        let residue = self
            .inner
            .disordered_get_mut()
            .ok_or(ResidueError::EmptyDisorderedResidue { residue_id })?;

        let ungrouped = matches!(&site, AtomSite::Ordered(_));
        residue.add(site)?;

        if ungrouped {
            warn!(
                "Atom without alternate-location group in duplicate residue {}; stored in the selected variant",
                residue
            );
            return Err(ResidueError::MissingAlternateLocation {
                resname: residue.resname().to_string(),
                residue_id: residue.id().clone(),
            });
        }
        Ok(())
    }

    /// Registers a residue variant under its residue name and selects it.
    ///
    /// The variant inherits the wrapper's parent chain.
    ///
    /// # Panics
    ///
    /// Panics if a variant with the same residue name is already present.
    pub fn disordered_add(&mut self, mut residue: Residue) {
        let resname = residue.resname().to_string();
        residue.set_parent(self.inner.parent().copied());
        assert!(
            !self.inner.disordered_has_id(&resname),
            "residue variant {} is already registered at {}",
            resname,
            self.inner.id()
        );
        self.inner.disordered_insert(resname.clone(), residue);
        self.inner.disordered_select(&resname);
    }

    /// Removes a variant and detaches it from the chain.
    ///
    /// If the removed variant was selected, the first remaining variant (in
    /// insertion order) becomes selected; an empty wrapper has no selection.
    pub fn disordered_remove(&mut self, resname: &str) -> Option<Residue> {
        let mut residue = self.inner.disordered_remove(&resname.to_string())?;
        residue.detach_parent();
        Some(residue)
    }

    pub fn disordered_select(&mut self, resname: &str) -> Option<&Residue> {
        self.inner.disordered_select(&resname.to_string())
    }

    pub fn disordered_has_id(&self, resname: &str) -> bool {
        self.inner.disordered_has_id(&resname.to_string())
    }

    pub fn disordered_get(&self) -> Option<&Residue> {
        self.inner.disordered_get()
    }

    pub fn disordered_get_mut(&mut self) -> Option<&mut Residue> {
        self.inner.disordered_get_mut()
    }

    pub fn disordered_get_by_resname(&self, resname: &str) -> Option<&Residue> {
        self.inner.disordered_get_by_id(&resname.to_string())
    }

    pub fn disordered_get_list(&self) -> impl Iterator<Item = &Residue> {
        self.inner.disordered_get_list()
    }

    pub fn selected_resname(&self) -> Option<&str> {
        self.inner.selected_key().map(String::as_str)
    }

    pub fn resnames(&self) -> impl Iterator<Item = &str> {
        self.inner.disordered_keys().map(String::as_str)
    }

    /// Sorts the atoms of every variant.
    pub fn sort(&mut self) {
        for residue in self.inner.disordered_get_list_mut() {
            residue.sort();
        }
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn set_parent(&mut self, parent: Option<ChainId>) {
        for residue in self.inner.disordered_get_list_mut() {
            residue.set_parent(parent);
        }
        self.inner.set_own_parent(parent);
    }

    pub fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
        self.id() == other.id()
            && self.len() == other.len()
            && self
                .inner
                .disordered_keys()
                .zip(other.inner.disordered_keys())
                .all(|(a, b)| a == b)
            && self
                .disordered_get_list()
                .zip(other.disordered_get_list())
                .all(|(a, b)| a.strictly_equals(b, compare_coordinates))
    }
}

impl ResidueLike for DisorderedResidue {
    fn add_atom(&mut self, atom: AtomSite) -> Result<(), ResidueError> {
        self.add(atom)
    }

    fn sort_atoms(&mut self) {
        self.sort();
    }

    fn residue_id(&self) -> &ResidueId {
        self.id()
    }

    fn residue_name(&self) -> Option<&str> {
        self.disordered_get().map(Residue::resname)
    }
}

impl fmt::Display for DisorderedResidue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.disordered_get() {
            Some(residue) => {
                let id = self.id();
                write!(
                    f,
                    "<DisorderedResidue {} het={} resseq={} icode={}>",
                    residue.resname(),
                    id.hetero_flag,
                    id.sequence_number,
                    id.insertion_code
                )
            }
            None => write!(f, "<Empty DisorderedResidue>"),
        }
    }
}
