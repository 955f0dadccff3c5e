use chrono::{DateTime, Local};

use crate::aggregator::{CycleEvent, Generation};
use crate::app::refresh::CycleGate;
use crate::catalog::Catalog;
use crate::records::{default_record, ItemResult};

/// What a cycle event changed in the tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Item { index: usize, done: usize },
    Completed,
    Stale,
}

/// Renderable rows for the catalog, kept in catalog order across fetch cycles.
pub struct TrackerState {
    catalog: Catalog,
    gate: CycleGate,
    rows: Vec<ItemResult>,
    done: usize,
    loading: bool,
    last_updated: Option<DateTime<Local>>,
}

impl TrackerState {
    pub fn new(catalog: Catalog) -> Self {
        let rows = placeholder_rows(&catalog);
        Self {
            catalog,
            gate: CycleGate::new(),
            rows,
            done: 0,
            loading: false,
            last_updated: None,
        }
    }

    /// Supersede any running cycle and reset every row to its placeholder.
    pub fn begin_cycle(&mut self) -> Generation {
        let generation = self.gate.begin();
        self.rows = placeholder_rows(&self.catalog);
        self.done = 0;
        self.loading = true;
        generation
    }

    pub fn apply(&mut self, event: CycleEvent) -> Applied {
        let Some(event) = self.gate.admit(event) else {
            return Applied::Stale;
        };

        match event {
            CycleEvent::ItemReady { result, .. } => {
                let Some(index) = self.catalog.position(&result.item.id) else {
                    return Applied::Stale;
                };
                self.rows[index] = result;
                self.done += 1;
                Applied::Item {
                    index,
                    done: self.done,
                }
            }
            CycleEvent::Completed { aggregate, .. } => {
                self.rows = aggregate.into_results();
                self.done = self.rows.len();
                self.loading = false;
                self.last_updated = Some(Local::now());
                Applied::Completed
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn rows(&self) -> &[ItemResult] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&ItemResult> {
        self.rows.get(index)
    }

    pub fn find_symbol(&self, symbol: &str) -> Option<&ItemResult> {
        self.rows
            .iter()
            .find(|row| row.item.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn current_generation(&self) -> Option<Generation> {
        self.gate.current()
    }

    pub fn last_updated(&self) -> Option<DateTime<Local>> {
        self.last_updated
    }
}

fn placeholder_rows(catalog: &Catalog) -> Vec<ItemResult> {
    catalog
        .iter()
        .map(|item| ItemResult {
            item: item.clone(),
            record: default_record(item),
            logo: None,
        })
        .collect()
}
