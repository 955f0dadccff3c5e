use std::sync::Arc;

use futures::stream::{FuturesUnordered, StreamExt};
use log::{debug, info};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{JoinError, JoinHandle};

use crate::catalog::Catalog;
use crate::error::FetchError;
use crate::fetch::{fetch_logo, fetch_record, ByteFetcher};
use crate::records::AggregateResult;

pub mod events;
pub mod state;

pub use events::{ChannelObserver, CycleEvent, CycleObserver, Generation};
pub use state::{CycleState, ItemProgress, Settlement, SlotKind, SlotState};

/// Fans out a data and a logo request per catalog item and fans the results back in.
#[derive(Clone)]
pub struct ConcurrentAggregator {
    fetcher: Arc<dyn ByteFetcher>,
}

impl ConcurrentAggregator {
    pub fn new(fetcher: Arc<dyn ByteFetcher>) -> Self {
        Self { fetcher }
    }

    /// Run one fetch cycle over `catalog`.
    ///
    /// Every item is reported to `observer` once both of its sub-fetches settle, in whatever
    /// order they finish. Failed sub-fetches fall back to placeholder values, so the cycle
    /// always completes: `on_cycle_complete` fires exactly once with one entry per item, and
    /// the same aggregate is returned.
    pub async fn fetch_all<O>(&self, catalog: &Catalog, observer: &mut O) -> AggregateResult
    where
        O: CycleObserver + ?Sized,
    {
        let total = catalog.len();
        info!("Fetching {} assets ({} requests)", total, total * 2);

        let mut pending = FuturesUnordered::new();
        for (index, item) in catalog.iter().enumerate() {
            let fetcher = Arc::clone(&self.fetcher);
            let record_item = item.clone();
            let record_task = tokio::spawn(async move {
                Settlement::Record(fetch_record(&*fetcher, &record_item).await)
            });
            pending.push(tagged(index, SlotKind::Record, record_task));

            let fetcher = Arc::clone(&self.fetcher);
            let logo_item = item.clone();
            let logo_task = tokio::spawn(async move {
                Settlement::Logo(fetch_logo(&*fetcher, &logo_item).await)
            });
            pending.push(tagged(index, SlotKind::Logo, logo_task));
        }

        // Single consumer: all state transitions and emissions happen in this loop.
        let mut state = CycleState::new(catalog);
        while let Some((index, kind, joined)) = pending.next().await {
            let settlement = match joined {
                Ok(settlement) => settlement,
                Err(err) => Settlement::failed(kind, task_failure(catalog, index, kind, err)),
            };

            if let Some(result) = state.apply(index, settlement) {
                debug!(
                    "{} settled ({}/{} assets)",
                    result.item.symbol,
                    state.settled(),
                    total
                );
                observer.on_item_ready(&result);
            }
        }

        // Slots left pending by a lost task settle with their fallback here.
        let (late, aggregate) = state.finish();
        for result in &late {
            observer.on_item_ready(result);
        }

        info!(
            "Fetch cycle complete: {}/{} assets available",
            aggregate.available_count(),
            aggregate.len()
        );
        observer.on_cycle_complete(&aggregate);
        aggregate
    }

    /// Run a cycle on its own task, forwarding generation-tagged events to `events`.
    pub fn spawn_cycle(
        &self,
        catalog: Catalog,
        generation: Generation,
        events: UnboundedSender<CycleEvent>,
    ) -> JoinHandle<AggregateResult> {
        let aggregator = self.clone();
        tokio::spawn(async move {
            debug!("Starting fetch cycle {}", generation);
            let mut observer = ChannelObserver::new(generation, events);
            aggregator.fetch_all(&catalog, &mut observer).await
        })
    }
}

async fn tagged(
    index: usize,
    kind: SlotKind,
    task: JoinHandle<Settlement>,
) -> (usize, SlotKind, Result<Settlement, JoinError>) {
    (index, kind, task.await)
}

fn task_failure(catalog: &Catalog, index: usize, kind: SlotKind, err: JoinError) -> FetchError {
    let url = catalog
        .get(index)
        .map(|item| match kind {
            SlotKind::Record => item.data_url.to_string(),
            SlotKind::Logo => item.logo_url.to_string(),
        })
        .unwrap_or_default();
    FetchError::no_data(url, format!("fetch task failed: {err}"))
}
