use std::collections::{HashMap, hash_map::Entry};

use super::VectorOps;

/// A vector without a fixed dimension, only explicitly set keys exist.
///
/// Keys are iterated in insertion order.
#[derive(Debug, Clone, Default)]
pub struct SparseVector {
    values: HashMap<usize, f64>,
    keys: Vec<usize>,
}

impl SparseVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The amount of explicitly set keys.
    #[inline]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    #[inline]
    pub fn keys(&self) -> &[usize] {
        &self.keys
    }

    pub fn contains(&self, key: usize) -> bool {
        self.values.contains_key(&key)
    }

    /// Replaces the contents with keys `0..values.len()`, the i-th key holding `values[i]`.
    pub fn set_values(&mut self, values: &[f64]) {
        self.clear();
        for (key, &value) in values.iter().enumerate() {
            self.set(key, value);
        }
    }

    /// Iterates the `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.keys.iter().map(|&k| (k, self.values[&k]))
    }
}

impl PartialEq for SparseVector {
    fn eq(&self, other: &Self) -> bool {
        self.values == other.values
    }
}

impl VectorOps for SparseVector {
    fn get(&self, key: usize) -> f64 {
        self.values.get(&key).copied().unwrap_or(0.)
    }

    fn set(&mut self, key: usize, value: f64) {
        if self.values.insert(key, value).is_none() {
            self.keys.push(key);
        }
    }

    fn clear(&mut self) {
        self.values.clear();
        self.keys.clear();
    }

    fn fill(&mut self, value: f64) {
        self.values.values_mut().for_each(|v| *v = value);
    }

    fn scale(&mut self, s: f64) {
        self.values.values_mut().for_each(|v| *v *= s);
    }

    fn norm_squared(&self) -> f64 {
        self.iter().map(|(_, v)| v * v).sum()
    }

    fn populate(&self) -> Self {
        Self::new()
    }

    fn opposite(&self) -> Self {
        Self {
            values: self.values.iter().map(|(&k, &v)| (k, -v)).collect(),
            keys: self.keys.clone(),
        }
    }

    fn copy_from(&mut self, other: &Self) {
        self.values.clone_from(&other.values);
        self.keys.clone_from(&other.keys);
    }

    fn increment(&mut self, other: &Self, alpha: f64) {
        for (key, value) in other.iter() {
            match self.values.entry(key) {
                Entry::Occupied(mut entry) => *entry.get_mut() += value * alpha,
                Entry::Vacant(entry) => {
                    entry.insert(value * alpha);
                    self.keys.push(key);
                }
            }
        }
    }

    /// The resulting key set is the union of both operands' keys, `v1`'s keys first.
    fn weighted_sum(&mut self, a: f64, v1: &Self, b: f64, v2: &Self) {
        self.clear();
        for (key, value) in v1.iter() {
            self.set(key, a * value);
        }
        self.increment(v2, b);
    }

    /// Only the receiver's keys are visited, keys present only in `other` stay absent.
    fn multiply(&mut self, a: f64, b: f64, other: &Self) {
        for key in &self.keys {
            if let Some(v) = self.values.get_mut(key) {
                *v = (*v * a + b) * other.get(*key);
            }
        }
    }

    /// Only the keys of `self` are visited, so the result depends on operand order when
    /// the key sets differ.
    fn dot(&self, other: &Self) -> f64 {
        self.iter().map(|(k, v)| v * other.get(k)).sum()
    }
}
