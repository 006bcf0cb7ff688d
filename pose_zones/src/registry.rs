//! Owned object registry keyed by stable ids.
//!
//! Ids are handed out in increasing order and never reused, so iteration
//! order is insertion order.

use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObjectId(u64);

impl ObjectId {
    pub fn raw(self) -> u64 { self.0 }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct ObjectRegistry<T> {
    next_id: u64,
    objects: BTreeMap<ObjectId, T>,
}

impl<T> ObjectRegistry<T> {
    pub fn new() -> Self {
        ObjectRegistry { next_id: 0, objects: BTreeMap::new() }
    }

    pub fn insert(&mut self, object: T) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    pub fn get(&self, id: ObjectId) -> Option<&T>             { self.objects.get(&id) }
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut T> { self.objects.get_mut(&id) }
    pub fn remove(&mut self, id: ObjectId) -> Option<T>       { self.objects.remove(&id) }

    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &T)> {
        self.objects.iter().map(|(&id, o)| (id, o))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObjectId, &mut T)> {
        self.objects.iter_mut().map(|(&id, o)| (id, o))
    }

    pub fn retain(&mut self, mut keep: impl FnMut(ObjectId, &mut T) -> bool) {
        self.objects.retain(|&id, o| keep(id, o));
    }

    /// Remove the oldest object, if any.
    pub fn pop_oldest(&mut self) -> Option<(ObjectId, T)> {
        self.objects.pop_first()
    }

    pub fn len(&self) -> usize     { self.objects.len() }
    pub fn is_empty(&self) -> bool { self.objects.is_empty() }
}

impl<T> Default for ObjectRegistry<T> {
    fn default() -> Self {
        ObjectRegistry::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_stable_and_not_reused() {
        let mut r = ObjectRegistry::new();
        let a = r.insert("a");
        let b = r.insert("b");
        r.remove(a);
        let c = r.insert("c");
        assert_ne!(a, c);
        assert_eq!(r.get(b), Some(&"b"));
        assert_eq!(r.get(a), None);
        let order: Vec<_> = r.iter().map(|(_, v)| *v).collect();
        assert_eq!(order, vec!["b", "c"]);
    }

    #[test]
    fn pop_oldest_and_retain() {
        let mut r = ObjectRegistry::new();
        for i in 0..5 { r.insert(i); }
        assert_eq!(r.pop_oldest().map(|(_, v)| v), Some(0));
        r.retain(|_, v| *v % 2 == 0);
        let left: Vec<_> = r.iter().map(|(_, v)| *v).collect();
        assert_eq!(left, vec![2, 4]);
    }
}
