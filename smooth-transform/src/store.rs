//! Insertion-ordered weight store and the model handle that owns it.

use std::collections::HashMap;

use crate::tensor::Tensor;

/// Ordered mapping from layer name to tensor.
///
/// Keys are unique; iteration follows insertion order so progress counts are
/// reproducible across runs. Re-inserting an existing name replaces the
/// tensor in place without moving it.
#[derive(Debug, Clone, Default)]
pub struct WeightStore {
    entries: Vec<(String, Tensor)>,
    index: HashMap<String, usize>,
}

impl WeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a tensor, returning the previous one if any.
    pub fn insert(&mut self, name: impl Into<String>, tensor: Tensor) -> Option<Tensor> {
        let name = name.into();
        match self.index.get(&name) {
            Some(&slot) => {
                let previous = std::mem::replace(&mut self.entries[slot].1, tensor);
                Some(previous)
            }
            None => {
                self.index.insert(name.clone(), self.entries.len());
                self.entries.push((name, tensor));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Tensor> {
        self.index.get(name).map(|&slot| &self.entries[slot].1)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Layer names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// (name, tensor) pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Tensor)> {
        self.entries.iter().map(|(name, tensor)| (name.as_str(), tensor))
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [(String, Tensor)] {
        &mut self.entries
    }
}

/// Handle to a model's weights.
///
/// Cloning is a deep copy: the clone owns independent tensor storage, so
/// mutating it never aliases the source model.
#[derive(Debug, Clone, Default)]
pub struct Model {
    weights: WeightStore,
}

impl Model {
    pub fn new(weights: WeightStore) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightStore {
        &self.weights
    }

    pub(crate) fn weights_mut(&mut self) -> &mut WeightStore {
        &mut self.weights
    }

    pub fn into_weights(self) -> WeightStore {
        self.weights
    }
}
