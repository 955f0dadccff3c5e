use serde::Deserialize;

use crate::catalog::TrackedItem;
use crate::fetch::decode::{lenient_string, lenient_string_opt, ImageFormat};

pub mod results;

pub use results::{AggregateResult, ItemResult};

/// Sentinel carried in place of any value the remote endpoint could not supply.
pub const NOT_AVAILABLE: &str = "N/A";

/// Market data for one asset as returned by the CoinCap `assets` endpoint.
///
/// Numeric fields stay textual; the presentation layer parses them when it needs to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub rank: Option<String>,
    pub symbol: String,
    pub name: String,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub supply: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub max_supply: Option<String>,
    #[serde(default, deserialize_with = "lenient_string_opt")]
    pub market_cap_usd: Option<String>,
    #[serde(
        default,
        rename = "volumeUsd24Hr",
        deserialize_with = "lenient_string_opt"
    )]
    pub volume_usd_24h: Option<String>,
    #[serde(deserialize_with = "lenient_string")]
    pub price_usd: String,
    #[serde(
        default,
        rename = "changePercent24Hr",
        deserialize_with = "lenient_string_opt"
    )]
    pub change_percent_24h: Option<String>,
    #[serde(default, rename = "explorer")]
    pub explorer_url: Option<String>,
}

impl AssetRecord {
    /// True when this record is the fallback rather than live data.
    pub fn is_placeholder(&self) -> bool {
        self.price_usd == NOT_AVAILABLE
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AssetListResponse {
    pub data: Vec<AssetRecord>,
}

/// Placeholder record for an item with no live data. Pure and deterministic.
pub fn default_record(item: &TrackedItem) -> AssetRecord {
    let na = || Some(NOT_AVAILABLE.to_string());

    AssetRecord {
        id: item.id.clone(),
        rank: na(),
        symbol: item.symbol.clone(),
        name: format!("{} (Unavailable)", item.display_name),
        supply: na(),
        max_supply: na(),
        market_cap_usd: na(),
        volume_usd_24h: na(),
        price_usd: NOT_AVAILABLE.to_string(),
        change_percent_24h: na(),
        explorer_url: None,
    }
}

/// Raw logo payload; only its container format has been sniffed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoBlob {
    format: ImageFormat,
    bytes: Vec<u8>,
}

impl LogoBlob {
    pub fn new(format: ImageFormat, bytes: Vec<u8>) -> Self {
        Self { format, bytes }
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::config::Config;

    #[test]
    fn default_record_is_deterministic_placeholder() {
        let catalog = Catalog::from_config(&Config::builtin().endpoints).unwrap();
        let solana = catalog.find_symbol("SOL").unwrap();

        let first = default_record(solana);
        let second = default_record(solana);

        assert_eq!(first, second);
        assert_eq!(first.id, "solana");
        assert_eq!(first.name, "Solana (Unavailable)");
        assert_eq!(first.symbol, "SOL");
        assert_eq!(first.price_usd, NOT_AVAILABLE);
        assert_eq!(first.change_percent_24h.as_deref(), Some(NOT_AVAILABLE));
        assert_eq!(first.explorer_url, None);
        assert!(first.is_placeholder());
    }
}
