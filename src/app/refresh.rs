use std::sync::atomic::{AtomicU64, Ordering};

use log::debug;

use crate::aggregator::{CycleEvent, Generation};

/// Hands out fetch-cycle generations; only the newest one is current.
///
/// Starting a cycle supersedes every earlier one. Superseded cycles keep running to
/// completion, but their events are rejected by `admit`.
#[derive(Debug, Default)]
pub struct CycleGate {
    latest: AtomicU64,
}

impl CycleGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Generation {
        Generation(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn current(&self) -> Option<Generation> {
        match self.latest.load(Ordering::SeqCst) {
            0 => None,
            latest => Some(Generation(latest)),
        }
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.current() == Some(generation)
    }

    /// Pass through events from the current cycle, dropping stale ones.
    pub fn admit(&self, event: CycleEvent) -> Option<CycleEvent> {
        let generation = event.generation();
        if self.is_current(generation) {
            Some(event)
        } else {
            debug!(
                "Discarding event from superseded cycle {} (current {:?})",
                generation,
                self.current()
            );
            None
        }
    }
}
