use log::{debug, warn};

use crate::catalog::{Catalog, TrackedItem};
use crate::error::FetchError;
use crate::fetch::FetchResult;
use crate::records::{default_record, AggregateResult, AssetRecord, ItemResult, LogoBlob};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Record,
    Logo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Pending,
    Done,
}

/// Outcome of one sub-fetch, routed to its item by catalog index.
#[derive(Debug)]
pub enum Settlement {
    Record(FetchResult<AssetRecord>),
    Logo(FetchResult<LogoBlob>),
}

impl Settlement {
    pub fn kind(&self) -> SlotKind {
        match self {
            Settlement::Record(_) => SlotKind::Record,
            Settlement::Logo(_) => SlotKind::Logo,
        }
    }

    /// A failed settlement for a sub-fetch that produced no outcome of its own.
    pub fn failed(kind: SlotKind, error: FetchError) -> Self {
        match kind {
            SlotKind::Record => Settlement::Record(Err(error)),
            SlotKind::Logo => Settlement::Logo(Err(error)),
        }
    }
}

/// Two-slot completion state for a single item.
///
/// `{Pending, Pending} -> {Done, Pending} | {Pending, Done} -> {Done, Done}`; the
/// transition into `{Done, Done}` yields the item's result, and nothing after it does.
#[derive(Debug)]
pub struct ItemProgress {
    item: TrackedItem,
    record_state: SlotState,
    logo_state: SlotState,
    record: AssetRecord,
    logo: Option<LogoBlob>,
    emitted: bool,
}

impl ItemProgress {
    pub fn new(item: TrackedItem) -> Self {
        let record = default_record(&item);
        Self {
            item,
            record_state: SlotState::Pending,
            logo_state: SlotState::Pending,
            record,
            logo: None,
            emitted: false,
        }
    }

    pub fn slots(&self) -> (SlotState, SlotState) {
        (self.record_state, self.logo_state)
    }

    pub fn is_settled(&self) -> bool {
        self.record_state == SlotState::Done && self.logo_state == SlotState::Done
    }

    /// Apply one settlement; returns the item's result on the transition to fully settled.
    pub fn settle(&mut self, settlement: Settlement) -> Option<ItemResult> {
        let kind = settlement.kind();
        if self.slot(kind) == SlotState::Done {
            debug!(
                "Ignoring repeated {:?} settlement for {}",
                kind, self.item.symbol
            );
            return None;
        }

        match settlement {
            Settlement::Record(Ok(record)) => self.record = record,
            Settlement::Record(Err(err)) => {
                warn!(
                    "Failed to fetch data for {}: {}, using default asset",
                    self.item.symbol, err
                );
            }
            Settlement::Logo(Ok(logo)) => self.logo = Some(logo),
            Settlement::Logo(Err(err)) => {
                warn!("Failed to fetch logo for {}: {}", self.item.symbol, err);
                self.logo = None;
            }
        }
        *self.slot_mut(kind) = SlotState::Done;

        if self.is_settled() && !self.emitted {
            self.emitted = true;
            Some(self.snapshot())
        } else {
            None
        }
    }

    /// Current renderable value, placeholder fields included.
    pub fn snapshot(&self) -> ItemResult {
        ItemResult {
            item: self.item.clone(),
            record: self.record.clone(),
            logo: self.logo.clone(),
        }
    }

    fn slot(&self, kind: SlotKind) -> SlotState {
        match kind {
            SlotKind::Record => self.record_state,
            SlotKind::Logo => self.logo_state,
        }
    }

    fn slot_mut(&mut self, kind: SlotKind) -> &mut SlotState {
        match kind {
            SlotKind::Record => &mut self.record_state,
            SlotKind::Logo => &mut self.logo_state,
        }
    }
}

/// Per-cycle accumulator: one `ItemProgress` per catalog index plus the settled-item counter.
///
/// Owned by a single consumer, so every check-and-emit happens without interleaving.
#[derive(Debug)]
pub struct CycleState {
    items: Vec<ItemProgress>,
    settled: usize,
}

impl CycleState {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            items: catalog.iter().cloned().map(ItemProgress::new).collect(),
            settled: 0,
        }
    }

    pub fn settled(&self) -> usize {
        self.settled
    }

    pub fn is_complete(&self) -> bool {
        self.settled == self.items.len()
    }

    pub fn apply(&mut self, index: usize, settlement: Settlement) -> Option<ItemResult> {
        let Some(progress) = self.items.get_mut(index) else {
            warn!("Dropping settlement for unknown item index {index}");
            return None;
        };

        let result = progress.settle(settlement)?;
        self.settled += 1;
        Some(result)
    }

    /// Settle every still-pending slot with its fallback, returning the results this produces.
    pub fn settle_remaining(&mut self) -> Vec<ItemResult> {
        let mut emitted = Vec::new();
        for index in 0..self.items.len() {
            for kind in [SlotKind::Record, SlotKind::Logo] {
                let progress = &self.items[index];
                if progress.slot(kind) == SlotState::Done {
                    continue;
                }
                let url = match kind {
                    SlotKind::Record => progress.item.data_url.clone(),
                    SlotKind::Logo => progress.item.logo_url.clone(),
                };
                let error = FetchError::no_data(url, "sub-fetch never settled");
                if let Some(result) = self.apply(index, Settlement::failed(kind, error)) {
                    emitted.push(result);
                }
            }
        }
        emitted
    }

    /// Settle whatever is still pending and build the aggregate.
    ///
    /// Returns the item results produced by that final settlement alongside the aggregate.
    pub fn finish(mut self) -> (Vec<ItemResult>, AggregateResult) {
        let late = self.settle_remaining();
        let aggregate = AggregateResult::from_ordered(
            self.items.iter().map(ItemProgress::snapshot).collect(),
        );
        (late, aggregate)
    }

    /// The aggregate, once every item has settled.
    pub fn aggregate(&self) -> Option<AggregateResult> {
        if !self.is_complete() {
            return None;
        }
        Some(AggregateResult::from_ordered(
            self.items.iter().map(ItemProgress::snapshot).collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::fetch::decode::ImageFormat;

    fn catalog() -> Catalog {
        Catalog::from_config(&Config::builtin().endpoints).unwrap()
    }

    fn live_record(item: &TrackedItem, price: &str) -> AssetRecord {
        AssetRecord {
            price_usd: price.to_string(),
            name: item.display_name.clone(),
            explorer_url: None,
            ..default_record(item)
        }
    }

    fn no_data() -> FetchError {
        FetchError::no_data("https://example.com", "offline")
    }

    #[test]
    fn starts_with_placeholder_values() {
        let catalog = catalog();
        let progress = ItemProgress::new(catalog.items()[0].clone());

        assert_eq!(progress.slots(), (SlotState::Pending, SlotState::Pending));
        let snapshot = progress.snapshot();
        assert_eq!(snapshot.record, default_record(&catalog.items()[0]));
        assert!(snapshot.logo.is_none());
    }

    #[test]
    fn emits_only_when_both_slots_settle() {
        let catalog = catalog();
        let item = catalog.items()[1].clone();
        let mut progress = ItemProgress::new(item.clone());

        let logo = LogoBlob::new(ImageFormat::Png, vec![1, 2, 3]);
        assert!(progress.settle(Settlement::Logo(Ok(logo.clone()))).is_none());
        assert_eq!(progress.slots(), (SlotState::Pending, SlotState::Done));

        let result = progress
            .settle(Settlement::Record(Ok(live_record(&item, "3000"))))
            .expect("second slot completes the item");
        assert_eq!(result.record.price_usd, "3000");
        assert_eq!(result.logo, Some(logo));
    }

    #[test]
    fn repeated_settlements_are_ignored() {
        let catalog = catalog();
        let item = catalog.items()[0].clone();
        let mut progress = ItemProgress::new(item.clone());

        progress.settle(Settlement::Record(Err(no_data())));
        assert!(progress.settle(Settlement::Logo(Err(no_data()))).is_some());

        assert!(progress
            .settle(Settlement::Record(Ok(live_record(&item, "1"))))
            .is_none());
        assert!(progress.snapshot().record.is_placeholder());
    }

    #[test]
    fn counter_reaches_total_once() {
        let catalog = catalog();
        let mut state = CycleState::new(&catalog);

        for index in 0..catalog.len() {
            assert!(state.aggregate().is_none());
            assert!(state.apply(index, Settlement::Logo(Err(no_data()))).is_none());
            assert!(state.apply(index, Settlement::Record(Err(no_data()))).is_some());
            assert!(state.apply(index, Settlement::Record(Err(no_data()))).is_none());
        }

        assert_eq!(state.settled(), catalog.len());
        let aggregate = state.aggregate().expect("complete cycle aggregates");
        assert_eq!(aggregate.len(), catalog.len());
        assert_eq!(aggregate.available_count(), 0);
    }

    #[test]
    fn settle_remaining_fills_fallbacks() {
        let catalog = catalog();
        let mut state = CycleState::new(&catalog);
        let first = catalog.items()[0].clone();

        state.apply(0, Settlement::Record(Ok(live_record(&first, "50000"))));
        let emitted = state.settle_remaining();

        assert_eq!(emitted.len(), catalog.len());
        assert!(state.is_complete());
        assert_eq!(emitted[0].record.price_usd, "50000");
        assert!(emitted[1..].iter().all(|result| !result.is_available()));
        assert!(state.settle_remaining().is_empty());
    }

    #[test]
    fn finish_completes_a_partial_cycle() {
        let catalog = catalog();
        let mut state = CycleState::new(&catalog);
        for index in 0..catalog.len() - 1 {
            state.apply(index, Settlement::Record(Err(no_data())));
            state.apply(index, Settlement::Logo(Err(no_data())));
        }

        let (late, aggregate) = state.finish();
        assert_eq!(late.len(), 1);
        assert_eq!(late[0].item.symbol, "DOGE");
        assert_eq!(aggregate.len(), catalog.len());
    }

    #[test]
    fn out_of_range_index_is_dropped() {
        let catalog = catalog();
        let mut state = CycleState::new(&catalog);
        assert!(state
            .apply(catalog.len(), Settlement::Logo(Err(no_data())))
            .is_none());
        assert_eq!(state.settled(), 0);
    }
}
