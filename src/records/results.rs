use std::collections::HashMap;

use crate::catalog::TrackedItem;

use super::{AssetRecord, LogoBlob};

/// Final outcome for one item in a fetch cycle, produced once both sub-fetches settle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemResult {
    pub item: TrackedItem,
    pub record: AssetRecord,
    pub logo: Option<LogoBlob>,
}

impl ItemResult {
    /// Whether the record is live data; placeholder rows are shown as unavailable.
    pub fn is_available(&self) -> bool {
        !self.record.is_placeholder()
    }
}

/// Every item's result for one cycle, in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    results: Vec<ItemResult>,
}

impl AggregateResult {
    /// Callers pass exactly one result per catalog item, in catalog order.
    pub(crate) fn from_ordered(results: Vec<ItemResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&ItemResult> {
        self.results.iter().find(|result| result.item.id == id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ItemResult> {
        self.results.iter()
    }

    pub fn available_count(&self) -> usize {
        self.results.iter().filter(|result| result.is_available()).count()
    }

    pub fn into_results(self) -> Vec<ItemResult> {
        self.results
    }

    pub fn into_map(self) -> HashMap<String, ItemResult> {
        self.results
            .into_iter()
            .map(|result| (result.item.id.clone(), result))
            .collect()
    }
}

impl<'a> IntoIterator for &'a AggregateResult {
    type Item = &'a ItemResult;
    type IntoIter = std::slice::Iter<'a, ItemResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
