//! Synthetic write operations.

mod generator;

use std::collections::BTreeMap;

pub use generator::{BatchGenerator, TimestampGenerator};

/// Ordered field/value pairs of a filter or an update.
pub type Fields = BTreeMap<String, String>;

/// One logical update: documents matching every `filter` pair get the
/// `update` pairs set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteSpec {
    filter: Fields,
    update: Fields,
}

impl WriteSpec {
    pub fn new(filter: Fields, update: Fields) -> Self {
        Self { filter, update }
    }

    pub fn filter(&self) -> &Fields {
        &self.filter
    }

    pub fn update(&self) -> &Fields {
        &self.update
    }

    /// Canonical `k=v,k=v` form of the filter, used as a document key by
    /// stores without query support.
    pub fn filter_key(&self) -> String {
        filter_key(&self.filter)
    }
}

pub fn filter_key(filter: &Fields) -> String {
    filter
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered writes submitted in a single backend call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Batch {
    specs: Vec<WriteSpec>,
}

impl Batch {
    pub fn new(specs: Vec<WriteSpec>) -> Self {
        Self { specs }
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }

    pub fn specs(&self) -> &[WriteSpec] {
        &self.specs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WriteSpec> {
        self.specs.iter()
    }
}

impl From<Vec<WriteSpec>> for Batch {
    fn from(specs: Vec<WriteSpec>) -> Self {
        Self::new(specs)
    }
}

impl<'a> IntoIterator for &'a Batch {
    type Item = &'a WriteSpec;
    type IntoIter = std::slice::Iter<'a, WriteSpec>;

    fn into_iter(self) -> Self::IntoIter {
        self.specs.iter()
    }
}
