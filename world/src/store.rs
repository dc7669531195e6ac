//! Authoritative cell records keyed by identifier.

use std::collections::BTreeMap;

use token_grid_core::{CellId, StorePolicy, TokenValue};
use token_grid_system_token_generation::TokenGenerator;

/// Logical state of a single observed cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct CellRecord {
    /// Token currently stored in the cell.
    pub(crate) value: Option<TokenValue>,
    /// Whether the rendering side currently shows a label for the cell.
    pub(crate) labeled: bool,
}

impl CellRecord {
    fn generated(value: Option<TokenValue>) -> Self {
        Self {
            value,
            labeled: false,
        }
    }
}

/// Arena of cell records governed by a [`StorePolicy`].
#[derive(Debug)]
pub(crate) struct CellStore {
    policy: StorePolicy,
    records: BTreeMap<CellId, CellRecord>,
}

impl CellStore {
    /// Creates an empty store applying the provided eviction policy.
    pub(crate) fn new(policy: StorePolicy) -> Self {
        Self {
            policy,
            records: BTreeMap::new(),
        }
    }

    pub(crate) fn policy(&self) -> StorePolicy {
        self.policy
    }

    /// Fetches the record for `cell`, generating its starting token on first sight.
    pub(crate) fn materialize(
        &mut self,
        cell: CellId,
        generator: &TokenGenerator,
    ) -> &mut CellRecord {
        self.records
            .entry(cell)
            .or_insert_with(|| CellRecord::generated(generator.generate(cell)))
    }

    pub(crate) fn get(&self, cell: CellId) -> Option<&CellRecord> {
        self.records.get(&cell)
    }

    pub(crate) fn get_mut(&mut self, cell: CellId) -> Option<&mut CellRecord> {
        self.records.get_mut(&cell)
    }

    /// Applies the eviction policy to `cell`.
    ///
    /// Returns whether the cell was labeled before eviction.
    pub(crate) fn evict(&mut self, cell: CellId) -> bool {
        match self.policy {
            StorePolicy::Persistent => self
                .records
                .get_mut(&cell)
                .map_or(false, |record| std::mem::replace(&mut record.labeled, false)),
            StorePolicy::Memoryless => self
                .records
                .remove(&cell)
                .map_or(false, |record| record.labeled),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }
}
