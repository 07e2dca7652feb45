#![forbid(unsafe_code)]

use crate::CoreError;
use std::collections::BTreeMap;

/// Run-scoped id issuer for the pageset's record tables.
///
/// Each table must be seeded with the highest id already present in the store before any id is
/// issued; ids then grow strictly from there and are never reused within the run.
#[derive(Clone, Debug, Default)]
pub struct IdAllocator {
    last_issued: BTreeMap<String, i64>,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raise the floor for `table`. Seeding never lowers a counter.
    pub fn seed(&mut self, table: &str, highest_existing: i64) {
        let floor = highest_existing.max(0);
        self.last_issued
            .entry(table.to_string())
            .and_modify(|current| *current = (*current).max(floor))
            .or_insert(floor);
    }

    pub fn next(&mut self, table: &str) -> Result<i64, CoreError> {
        let counter = self
            .last_issued
            .get_mut(table)
            .ok_or_else(|| CoreError::UnknownSequence(table.to_string()))?;
        *counter += 1;
        Ok(*counter)
    }

    /// Highest id issued or seeded for `table`.
    pub fn current(&self, table: &str) -> Option<i64> {
        self.last_issued.get(table).copied()
    }

    pub fn tables(&self) -> impl Iterator<Item = (&str, i64)> {
        self.last_issued
            .iter()
            .map(|(table, value)| (table.as_str(), *value))
    }
}
