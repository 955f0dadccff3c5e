use std::fmt;

use log::debug;
use tokio::sync::mpsc::UnboundedSender;

use crate::records::{AggregateResult, ItemResult};

/// Receives the results of one fetch cycle.
///
/// `on_item_ready` fires at most once per item; `on_cycle_complete` fires exactly once, last.
pub trait CycleObserver {
    fn on_item_ready(&mut self, result: &ItemResult);
    fn on_cycle_complete(&mut self, aggregate: &AggregateResult);
}

/// Identifies one fetch cycle among overlapping refreshes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(pub u64);

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub enum CycleEvent {
    ItemReady {
        generation: Generation,
        result: ItemResult,
    },
    Completed {
        generation: Generation,
        aggregate: AggregateResult,
    },
}

impl CycleEvent {
    pub fn generation(&self) -> Generation {
        match self {
            CycleEvent::ItemReady { generation, .. } | CycleEvent::Completed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Forwards callbacks as generation-tagged events over a channel.
pub struct ChannelObserver {
    generation: Generation,
    events: UnboundedSender<CycleEvent>,
}

impl ChannelObserver {
    pub fn new(generation: Generation, events: UnboundedSender<CycleEvent>) -> Self {
        Self { generation, events }
    }

    fn send(&self, event: CycleEvent) {
        if self.events.send(event).is_err() {
            debug!("Cycle {} event dropped: receiver closed", self.generation);
        }
    }
}

impl CycleObserver for ChannelObserver {
    fn on_item_ready(&mut self, result: &ItemResult) {
        self.send(CycleEvent::ItemReady {
            generation: self.generation,
            result: result.clone(),
        });
    }

    fn on_cycle_complete(&mut self, aggregate: &AggregateResult) {
        self.send(CycleEvent::Completed {
            generation: self.generation,
            aggregate: aggregate.clone(),
        });
    }
}
