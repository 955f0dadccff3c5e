use std::sync::Arc;

use log::info;

use crate::aggregator::ConcurrentAggregator;
use crate::app::controller::AppController;
use crate::catalog::Catalog;
use crate::config::Config;
use crate::error::Result;
use crate::fetch::HttpFetcher;
use crate::ui::ConsolePresenter;

/// Entry point used by `main` to bootstrap the controller stack.
pub async fn run() -> Result<()> {
    let config = Config::from_env()?;
    let catalog = Catalog::from_config(&config.endpoints)?;
    let fetcher = HttpFetcher::new(&config.http)?;
    info!(
        "Tracking {} assets with a {}s request timeout",
        catalog.len(),
        config.http.timeout_secs
    );

    let aggregator = ConcurrentAggregator::new(Arc::new(fetcher));
    let controller = AppController::new(aggregator, catalog, ConsolePresenter::stdout())?;
    controller.run().await
}
