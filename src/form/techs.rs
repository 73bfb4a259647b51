use super::FormError;
use crate::validation::TechInput;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Stable identity of a technologies entry. Keys are handed out from a
/// counter that only grows, so a removed key is never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TechKey(u64);

impl TechKey {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TechKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tech-{}", self.0)
    }
}

/// Arena of technologies entries plus the display order of their keys.
#[derive(Debug, Clone, Default)]
pub struct TechList {
    entries: HashMap<TechKey, TechInput>,
    order: Vec<TechKey>,
    next_key: u64,
}

impl TechList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, entry: TechInput) -> TechKey {
        let key = TechKey(self.next_key);
        self.next_key += 1;
        self.entries.insert(key, entry);
        self.order.push(key);
        key
    }

    /// Remove the entry displayed at `index`; siblings keep their keys.
    pub fn remove(&mut self, index: usize) -> Result<(TechKey, TechInput), FormError> {
        if index >= self.order.len() {
            return Err(FormError::NoSuchEntry {
                index,
                len: self.order.len(),
            });
        }
        let key = self.order.remove(index);
        let entry = self.entries.remove(&key).unwrap_or_default();
        Ok((key, entry))
    }

    pub fn key_at(&self, index: usize) -> Option<TechKey> {
        self.order.get(index).copied()
    }

    pub fn index_of(&self, key: TechKey) -> Option<usize> {
        self.order.iter().position(|k| *k == key)
    }

    pub fn get(&self, index: usize) -> Option<&TechInput> {
        self.key_at(index).and_then(|key| self.entries.get(&key))
    }

    pub fn get_mut(&mut self, index: usize) -> Result<&mut TechInput, FormError> {
        let len = self.order.len();
        self.key_at(index)
            .and_then(|key| self.entries.get_mut(&key))
            .ok_or(FormError::NoSuchEntry { index, len })
    }

    pub fn by_key(&self, key: TechKey) -> Option<&TechInput> {
        self.entries.get(&key)
    }

    /// Entries in display order
    pub fn iter(&self) -> impl Iterator<Item = (TechKey, &TechInput)> {
        self.order
            .iter()
            .filter_map(|key| self.entries.get(key).map(|entry| (*key, entry)))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn to_inputs(&self) -> Vec<TechInput> {
        self.iter().map(|(_, entry)| entry.clone()).collect()
    }
}
