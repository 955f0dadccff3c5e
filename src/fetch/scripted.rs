use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;

use crate::catalog::TrackedItem;
use crate::error::FetchError;

use super::{ByteFetcher, FetchResult};

pub const PNG_LOGO: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

#[derive(Clone)]
enum Outcome {
    Body(Vec<u8>),
    Fail(FetchError),
    Panic,
}

#[derive(Clone)]
struct Script {
    outcome: Outcome,
    delay: Duration,
}

/// In-memory `ByteFetcher` with per-URL responses and latencies. Unscripted URLs fail with `NoData`.
#[derive(Default)]
pub struct ScriptedFetcher {
    scripts: HashMap<String, Script>,
    calls: AtomicUsize,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn body(mut self, url: &Url, body: impl Into<Vec<u8>>) -> Self {
        self.set(url, Outcome::Body(body.into()));
        self
    }

    /// Serve a single-asset CoinCap payload for the item's data URL.
    pub fn record(self, item: &TrackedItem, price_usd: &str) -> Self {
        let body = serde_json::json!({
            "data": [{
                "id": item.id,
                "rank": "1",
                "symbol": item.symbol,
                "name": item.display_name,
                "priceUsd": price_usd,
                "changePercent24Hr": "0.5",
            }]
        });
        let url = item.data_url.clone();
        self.body(&url, body.to_string())
    }

    pub fn logo(self, item: &TrackedItem) -> Self {
        let url = item.logo_url.clone();
        self.body(&url, PNG_LOGO)
    }

    pub fn fail(mut self, url: &Url, error: FetchError) -> Self {
        self.set(url, Outcome::Fail(error));
        self
    }

    pub fn panic_on(mut self, url: &Url) -> Self {
        self.set(url, Outcome::Panic);
        self
    }

    pub fn delay(mut self, url: &Url, delay: Duration) -> Self {
        self.scripts
            .entry(url.to_string())
            .or_insert_with(|| Script {
                outcome: Outcome::Fail(FetchError::no_data(url, "not scripted")),
                delay: Duration::ZERO,
            })
            .delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn set(&mut self, url: &Url, outcome: Outcome) {
        let script = self.scripts.entry(url.to_string()).or_insert(Script {
            outcome: Outcome::Panic,
            delay: Duration::ZERO,
        });
        script.outcome = outcome;
    }
}

#[async_trait]
impl ByteFetcher for ScriptedFetcher {
    async fn fetch_bytes(&self, url: &Url) -> FetchResult<Vec<u8>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let Some(script) = self.scripts.get(url.as_str()).cloned() else {
            return Err(FetchError::no_data(url, "not scripted"));
        };

        if !script.delay.is_zero() {
            tokio::time::sleep(script.delay).await;
        } else {
            tokio::task::yield_now().await;
        }

        match script.outcome {
            Outcome::Body(body) => Ok(body),
            Outcome::Fail(error) => Err(error),
            Outcome::Panic => panic!("scripted panic for {url}"),
        }
    }
}
