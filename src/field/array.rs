use std::ops::{Index, IndexMut};

use super::{Field, Node, NodeMut, Presence, State};

/// Ordered, growable sequence of one element type.
///
/// Reports Undefined only while flagged Undefined *and* empty, Null only while
/// flagged Null *and* empty; any element makes it HasValue.
#[derive(Debug, Clone)]
pub struct Array<T> {
    items: Vec<T>,
    presence: Presence,
}

/// Object-safe face of [`Array`] used by the parser, serializer and bridge.
pub trait ArrayField: Field {
    fn len(&self) -> usize;
    fn item(&self, index: usize) -> Option<&dyn Field>;
    fn item_mut(&mut self, index: usize) -> Option<&mut dyn Field>;
    /// Appends a default element and hands it out for population.
    fn new_item(&mut self) -> &mut dyn Field;
    /// Transitions to HasValue without adding elements.
    fn define(&mut self);

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self { items: Vec::new(), presence: Presence::Undefined }
    }
}

impl<T: Field + Default> Array<T> {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn null() -> Self {
        Self { items: Vec::new(), presence: Presence::Null }
    }
    pub fn len(&self) -> usize {
        self.items.len()
    }
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
    pub fn define(&mut self) {
        self.presence = Presence::Defined;
    }

    /// Replaces the element at `index`, returning the old one. Out of range
    /// leaves the array untouched and returns `None`.
    pub fn replace(&mut self, index: usize, value: T) -> Option<T> {
        self.items.get_mut(index).map(|slot| std::mem::replace(slot, value))
    }

    /// Inserts before `before`; positions past the end append.
    pub fn insert(&mut self, before: usize, value: T) {
        let at = before.min(self.items.len());
        self.items.insert(at, value);
    }

    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    pub fn push_front(&mut self, value: T) {
        self.items.insert(0, value);
    }

    /// Appends a default element and returns its index. Re-fetch by index
    /// after further growth.
    pub fn push_new(&mut self) -> usize {
        self.items.push(T::default());
        self.items.len() - 1
    }

    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        (index < self.items.len()).then(|| self.items.remove(index))
    }

    /// Drops every element for which `pred(index, element)` holds. Indices
    /// are positions before removal.
    pub fn remove_if<F>(&mut self, mut pred: F)
    where
        F: FnMut(usize, &T) -> bool,
    {
        let mut index = 0;
        self.items.retain(|item| {
            let drop = pred(index, item);
            index += 1;
            !drop
        });
    }

    /// Replaces the whole content and defines the array.
    pub fn assign<I>(&mut self, values: I)
    where
        I: IntoIterator,
        I::Item: Into<T>,
    {
        self.items = values.into_iter().map(Into::into).collect();
        self.presence = Presence::Defined;
    }
}

impl<T: Field + Default + Clone> Array<T> {
    pub fn insert_all(&mut self, before: usize, values: &Array<T>) {
        self.insert_slice(before, &values.items);
    }

    pub fn insert_slice(&mut self, before: usize, values: &[T]) {
        let at = before.min(self.items.len());
        self.items.splice(at..at, values.iter().cloned());
    }
}

impl<T: Field + Default> Field for Array<T> {
    fn node(&self) -> Node<'_> {
        Node::Array(self)
    }
    fn node_mut(&mut self) -> NodeMut<'_> {
        NodeMut::Array(self)
    }
    fn state(&self) -> State {
        self.presence.with_content(!self.items.is_empty())
    }
    fn clear(&mut self) {
        self.items.clear();
        self.presence = Presence::Undefined;
    }
    fn set_null(&mut self) {
        self.items.clear();
        self.presence = Presence::Null;
    }
}

impl<T: Field + Default> ArrayField for Array<T> {
    fn len(&self) -> usize {
        self.items.len()
    }
    fn item(&self, index: usize) -> Option<&dyn Field> {
        self.items.get(index).map(|item| item as &dyn Field)
    }
    fn item_mut(&mut self, index: usize) -> Option<&mut dyn Field> {
        self.items.get_mut(index).map(|item| item as &mut dyn Field)
    }
    fn new_item(&mut self) -> &mut dyn Field {
        let index = self.push_new();
        &mut self.items[index]
    }
    fn define(&mut self) {
        self.presence = Presence::Defined;
    }
}

impl<T: Field + Default + PartialEq> PartialEq for Array<T> {
    fn eq(&self, other: &Self) -> bool {
        self.state() == other.state() && self.items == other.items
    }
}

impl<T> Index<usize> for Array<T> {
    type Output = T;
    fn index(&self, index: usize) -> &T {
        &self.items[index]
    }
}

impl<T> IndexMut<usize> for Array<T> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.items[index]
    }
}

impl<T: Field + Default, V: Into<T>> FromIterator<V> for Array<T> {
    fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
        let mut array = Self::default();
        array.assign(iter);
        array
    }
}

impl<'a, T> IntoIterator for &'a Array<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::Int;

    fn ints(array: &Array<Int>) -> Vec<i64> {
        array.iter().map(|item| item.value_or(-1)).collect()
    }

    #[test]
    fn content_overrides_stale_flags() {
        let mut array = Array::<Int>::null();
        assert!(array.is_null());
        array.push(Int::new(1));
        assert!(array.has_value());
        assert!(!array.is_null());
        array.remove_at(0);
        assert!(array.is_null());

        array.clear();
        array.push(Int::new(1));
        assert!(array.has_value());
        array.remove_if(|_, _| true);
        assert!(array.is_undefined());
    }

    #[test]
    fn insert_positions_clamp_to_append() {
        let mut array: Array<Int> = [1, 2].into_iter().map(Int::new).collect();
        array.insert(99, Int::new(3));
        array.insert_slice(1000, &[Int::new(4)]);
        assert_eq!(ints(&array), vec![1, 2, 3, 4]);
    }

    #[test]
    fn replace_out_of_range_is_ignored() {
        let mut array: Array<Int> = [1].into_iter().map(Int::new).collect();
        assert_eq!(array.replace(0, Int::new(7)), Some(Int::new(1)));
        assert_eq!(array.replace(5, Int::new(8)), None);
        assert_eq!(ints(&array), vec![7]);
    }

    #[test]
    fn push_new_returns_stable_index() {
        let mut array = Array::<Int>::new();
        let first = array.push_new();
        let second = array.push_new();
        array[first].set(10);
        array[second].set(20);
        assert_eq!(ints(&array), vec![10, 20]);
    }
}
