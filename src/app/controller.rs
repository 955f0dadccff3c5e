use std::io::{Stdout, Write};

use log::{debug, info};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::sync::mpsc::{self, UnboundedSender};

use crate::aggregator::{ConcurrentAggregator, CycleEvent};
use crate::app::command::{Command, HELP};
use crate::app::state::{Applied, TrackerState};
use crate::catalog::Catalog;
use crate::error::{AppError, Result};
use crate::ui::ConsolePresenter;

/// Coordinates fetch cycles, tracker state and the console.
pub struct AppController<W: Write> {
    aggregator: ConcurrentAggregator,
    state: TrackerState,
    presenter: ConsolePresenter<W>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

impl AppController<Stdout> {
    /// Drive the tracker from stdin until the user quits or input closes.
    pub async fn run(mut self) -> Result<()> {
        self.run_with(BufReader::new(tokio::io::stdin())).await
    }
}

impl<W: Write> AppController<W> {
    pub fn new(
        aggregator: ConcurrentAggregator,
        catalog: Catalog,
        presenter: ConsolePresenter<W>,
    ) -> Result<Self> {
        if catalog.is_empty() {
            return Err(AppError::message("No assets configured to track."));
        }
        Ok(Self {
            aggregator,
            state: TrackerState::new(catalog),
            presenter,
        })
    }

    pub fn state(&self) -> &TrackerState {
        &self.state
    }

    pub fn into_presenter(self) -> ConsolePresenter<W> {
        self.presenter
    }

    /// Start a cycle, then interleave cycle events with commands read from `input`.
    ///
    /// Once `input` is exhausted the loop keeps draining events until the active cycle completes.
    pub async fn run_with<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let (events_tx, mut events) = mpsc::unbounded_channel();
        let mut lines = input.lines();
        let mut input_open = true;

        self.presenter.message(HELP)?;
        self.start_cycle(&events_tx)?;

        loop {
            tokio::select! {
                Some(event) = events.recv() => {
                    self.handle_event(event)?;
                    if !input_open && !self.state.is_loading() {
                        break;
                    }
                }
                line = lines.next_line(), if input_open => {
                    match line? {
                        Some(line) => {
                            if self.handle_command(&line, &events_tx)? == Flow::Quit {
                                break;
                            }
                        }
                        None => {
                            debug!("Input closed");
                            input_open = false;
                            if !self.state.is_loading() {
                                break;
                            }
                        }
                    }
                }
                else => break,
            }
        }

        Ok(())
    }

    fn start_cycle(&mut self, events: &UnboundedSender<CycleEvent>) -> Result<()> {
        let generation = self.state.begin_cycle();
        info!("Refreshing {} assets (cycle {})", self.state.catalog().len(), generation);
        self.presenter
            .cycle_started(generation, self.state.catalog().len())?;
        self.aggregator
            .spawn_cycle(self.state.catalog().clone(), generation, events.clone());
        Ok(())
    }

    fn handle_event(&mut self, event: CycleEvent) -> Result<()> {
        match self.state.apply(event) {
            Applied::Item { index, done } => {
                let total = self.state.catalog().len();
                if let Some(row) = self.state.row(index) {
                    self.presenter.item_ready(row, done, total)?;
                }
            }
            Applied::Completed => {
                self.presenter
                    .summary(self.state.rows(), self.state.last_updated())?;
            }
            Applied::Stale => {}
        }
        Ok(())
    }

    fn handle_command(&mut self, line: &str, events: &UnboundedSender<CycleEvent>) -> Result<Flow> {
        match Command::parse(line) {
            Command::Refresh => self.start_cycle(events)?,
            Command::List => {
                if self.state.is_loading() {
                    self.presenter
                        .message("Refresh in progress; rows update as assets arrive.")?;
                }
                self.presenter
                    .summary(self.state.rows(), self.state.last_updated())?;
            }
            Command::Show(symbols) if symbols.is_empty() => {
                self.presenter.message("Usage: show <symbol> [symbol]...")?;
            }
            Command::Show(symbols) => {
                for symbol in symbols {
                    match self.state.find_symbol(&symbol) {
                        Some(row) => self.presenter.detail(row)?,
                        None => self
                            .presenter
                            .message(&format!("Unknown symbol: {symbol}"))?,
                    }
                }
            }
            Command::Help => self.presenter.message(HELP)?,
            Command::Quit => {
                self.presenter.message("Exiting...")?;
                return Ok(Flow::Quit);
            }
            Command::Empty => {}
            Command::Unknown(word) => {
                self.presenter
                    .message(&format!("Unknown command '{word}'. {HELP}"))?;
            }
        }
        Ok(Flow::Continue)
    }
}
