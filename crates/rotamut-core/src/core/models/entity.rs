use indexmap::IndexMap;
use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;
use thiserror::Error;

/// A member of the structure hierarchy that can be owned by an [`Entity`].
///
/// Children know their own identifier and hold a non-owning reference to
/// their parent in the form of the parent's identifier.
pub trait Node {
    /// Identifier of this node, unique among its siblings.
    type Id: Clone + Eq + Hash + fmt::Debug;
    /// Identifier type of the container that owns this node.
    type ParentId: Clone + fmt::Debug;

    fn id(&self) -> &Self::Id;

    fn parent(&self) -> Option<&Self::ParentId>;

    fn set_parent(&mut self, parent: Option<Self::ParentId>);

    /// Structural equality: same identity and recursively equal content.
    ///
    /// Coordinates are only compared when `compare_coordinates` is set.
    fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Child {child} is already defined in {parent}")]
pub struct DuplicateIdError {
    pub child: String,
    pub parent: String,
}

/// Generic parent/child container shared by every level of the hierarchy.
///
/// Children are kept in insertion order so that iteration (and therefore any
/// output derived from it) is deterministic.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<I, P, C: Node> {
    id: I,
    parent: Option<P>,
    children: IndexMap<C::Id, C>,
}

impl<I, P, C> Entity<I, P, C>
where
    I: Clone + fmt::Debug,
    C: Node<ParentId = I>,
{
    pub fn new(id: I) -> Self {
        Self {
            id,
            parent: None,
            children: IndexMap::new(),
        }
    }

    pub fn id(&self) -> &I {
        &self.id
    }

    pub fn parent(&self) -> Option<&P> {
        self.parent.as_ref()
    }

    pub fn set_parent(&mut self, parent: Option<P>) {
        self.parent = parent;
    }

    pub fn detach_parent(&mut self) {
        self.parent = None;
    }

    /// Registers a child and points its parent reference at this container.
    ///
    /// # Errors
    ///
    /// Returns [`DuplicateIdError`] if a child with the same identifier is
    /// already present; the container is left unchanged.
    pub fn add(&mut self, mut child: C) -> Result<(), DuplicateIdError> {
        let child_id = child.id().clone();
        if self.children.contains_key(&child_id) {
            return Err(DuplicateIdError {
                child: format!("{:?}", child_id),
                parent: format!("{:?}", self.id),
            });
        }
        child.set_parent(Some(self.id.clone()));
        self.children.insert(child_id, child);
        Ok(())
    }

    /// Removes a child, clears its parent reference and hands it back.
    pub fn detach_child(&mut self, id: &C::Id) -> Option<C> {
        let mut child = self.children.shift_remove(id)?;
        child.set_parent(None);
        Some(child)
    }

    pub fn get(&self, id: &C::Id) -> Option<&C> {
        self.children.get(id)
    }

    pub fn get_mut(&mut self, id: &C::Id) -> Option<&mut C> {
        self.children.get_mut(id)
    }

    pub fn has_id(&self, id: &C::Id) -> bool {
        self.children.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &C::Id> {
        self.children.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = &C> {
        self.children.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut C> {
        self.children.values_mut()
    }

    /// Children in insertion order.
    pub fn list(&self) -> Vec<&C> {
        self.children.values().collect()
    }

    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&C, &C) -> Ordering,
    {
        self.children.sort_by(|_, a, _, b| compare(a, b));
    }

    pub fn retain<F>(&mut self, mut keep: F) -> Vec<C>
    where
        F: FnMut(&C) -> bool,
    {
        let (kept, removed): (IndexMap<C::Id, C>, IndexMap<C::Id, C>) =
            std::mem::take(&mut self.children)
                .into_iter()
                .partition(|(_, child)| keep(child));
        self.children = kept;
        removed
            .into_values()
            .map(|mut child| {
                child.set_parent(None);
                child
            })
            .collect()
    }

    pub fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool
    where
        I: PartialEq,
    {
        self.id == other.id
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(other.children.iter())
                .all(|((id_a, a), (id_b, b))| {
                    id_a == id_b && a.strictly_equals(b, compare_coordinates)
                })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Leaf {
        name: String,
        value: f64,
        parent: Option<u32>,
    }

    impl Leaf {
        fn new(name: &str, value: f64) -> Self {
            Self {
                name: name.to_string(),
                value,
                parent: None,
            }
        }
    }

    impl Node for Leaf {
        type Id = String;
        type ParentId = u32;

        fn id(&self) -> &String {
            &self.name
        }

        fn parent(&self) -> Option<&u32> {
            self.parent.as_ref()
        }

        fn set_parent(&mut self, parent: Option<u32>) {
            self.parent = parent;
        }

        fn strictly_equals(&self, other: &Self, compare_coordinates: bool) -> bool {
            self.name == other.name && (!compare_coordinates || self.value == other.value)
        }
    }

    type Container = Entity<u32, (), Leaf>;

    #[test]
    fn add_registers_child_and_sets_parent() {
        let mut container = Container::new(7);
        container.add(Leaf::new("a", 1.0)).unwrap();

        let child = container.get(&"a".to_string()).unwrap();
        assert_eq!(child.parent, Some(7));
        assert!(container.has_id(&"a".to_string()));
        assert_eq!(container.len(), 1);
    }

    #[test]
    fn add_rejects_duplicate_id_and_keeps_original_child() {
        let mut container = Container::new(1);
        container.add(Leaf::new("a", 1.0)).unwrap();

        let err = container.add(Leaf::new("a", 2.0)).unwrap_err();

        assert_eq!(err.child, "\"a\"");
        assert_eq!(err.parent, "1");
        assert_eq!(container.len(), 1);
        assert_eq!(container.get(&"a".to_string()).unwrap().value, 1.0);
    }

    #[test]
    fn list_preserves_insertion_order() {
        let mut container = Container::new(1);
        for name in ["z", "a", "m"] {
            container.add(Leaf::new(name, 0.0)).unwrap();
        }
        let names: Vec<_> = container.list().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["z", "a", "m"]);
    }

    #[test]
    fn detach_child_clears_parent_and_keeps_remaining_order() {
        let mut container = Container::new(3);
        for name in ["a", "b", "c"] {
            container.add(Leaf::new(name, 0.0)).unwrap();
        }

        let detached = container.detach_child(&"b".to_string()).unwrap();

        assert_eq!(detached.parent, None);
        let ids: Vec<_> = container.ids().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
        assert!(container.detach_child(&"b".to_string()).is_none());
    }

    #[test]
    fn retain_returns_removed_children_detached() {
        let mut container = Container::new(3);
        container.add(Leaf::new("a", 1.0)).unwrap();
        container.add(Leaf::new("b", -1.0)).unwrap();
        container.add(Leaf::new("c", 2.0)).unwrap();

        let removed = container.retain(|leaf| leaf.value > 0.0);

        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].name, "b");
        assert_eq!(removed[0].parent, None);
        let ids: Vec<_> = container.ids().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn sort_by_reorders_children() {
        let mut container = Container::new(1);
        container.add(Leaf::new("b", 2.0)).unwrap();
        container.add(Leaf::new("a", 1.0)).unwrap();

        container.sort_by(|x, y| x.name.cmp(&y.name));

        let ids: Vec<_> = container.ids().cloned().collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn strictly_equals_compares_coordinates_only_when_requested() {
        let mut left = Container::new(1);
        let mut right = Container::new(1);
        left.add(Leaf::new("a", 1.0)).unwrap();
        right.add(Leaf::new("a", 5.0)).unwrap();

        assert!(left.strictly_equals(&right, false));
        assert!(!left.strictly_equals(&right, true));
    }

    #[test]
    fn strictly_equals_is_order_sensitive() {
        let mut left = Container::new(1);
        let mut right = Container::new(1);
        left.add(Leaf::new("a", 0.0)).unwrap();
        left.add(Leaf::new("b", 0.0)).unwrap();
        right.add(Leaf::new("b", 0.0)).unwrap();
        right.add(Leaf::new("a", 0.0)).unwrap();

        assert!(!left.strictly_equals(&right, false));
    }
}
