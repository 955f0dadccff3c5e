use std::collections::HashSet;
use std::sync::Arc;

use reqwest::Url;

use crate::config::EndpointConfig;
use crate::error::{AppError, Result};
use crate::fetch::request::{render_url, TemplateContext};

/// Static description of a tracked coin before its endpoint URLs are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub name: &'static str,
    pub symbol: &'static str,
    /// Logo provider slug, e.g. `btc-bitcoin`.
    pub slug: &'static str,
    /// Brand colour as RGB.
    pub accent: [u8; 3],
}

impl CatalogEntry {
    pub fn id(&self) -> String {
        self.name.to_lowercase()
    }
}

pub const BUILTIN_ENTRIES: [CatalogEntry; 8] = [
    CatalogEntry { name: "Bitcoin", symbol: "BTC", slug: "btc-bitcoin", accent: [255, 128, 0] },
    CatalogEntry { name: "Ethereum", symbol: "ETH", slug: "eth-ethereum", accent: [88, 86, 214] },
    CatalogEntry { name: "Tether", symbol: "USDT", slug: "usdt-tether", accent: [0, 255, 0] },
    CatalogEntry { name: "Litecoin", symbol: "LTC", slug: "ltc-litecoin", accent: [128, 128, 128] },
    CatalogEntry { name: "Ripple", symbol: "XRP", slug: "xrp-xrp", accent: [0, 0, 255] },
    CatalogEntry { name: "Cardano", symbol: "ADA", slug: "ada-cardano", accent: [48, 176, 199] },
    CatalogEntry { name: "Solana", symbol: "SOL", slug: "sol-solana", accent: [84, 158, 130] },
    CatalogEntry { name: "Dogecoin", symbol: "DOGE", slug: "doge-dogecoin", accent: [240, 196, 82] },
];

/// One asset the tracker fetches, with both endpoints already resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackedItem {
    pub id: String,
    pub display_name: String,
    pub symbol: String,
    pub accent: [u8; 3],
    pub data_url: Url,
    pub logo_url: Url,
}

impl TrackedItem {
    pub fn from_entry(entry: &CatalogEntry, endpoints: &EndpointConfig) -> Result<Self> {
        let id = entry.id();
        let context = TemplateContext {
            id: &id,
            symbol: entry.symbol,
            slug: entry.slug,
        };
        let data_url = render_url(&endpoints.data_url_template, &context)?;
        let logo_url = render_url(&endpoints.logo_url_template, &context)?;

        Ok(Self {
            id,
            display_name: entry.name.to_string(),
            symbol: entry.symbol.to_string(),
            accent: entry.accent,
            data_url,
            logo_url,
        })
    }
}

/// Ordered, immutable set of tracked items. Cloning shares the same allocation.
#[derive(Debug, Clone)]
pub struct Catalog {
    items: Arc<[TrackedItem]>,
}

impl Catalog {
    /// Build a catalog, rejecting an empty list or duplicate ids.
    pub fn new(items: Vec<TrackedItem>) -> Result<Self> {
        if items.is_empty() {
            return Err(AppError::message("catalog must contain at least one item"));
        }

        let mut seen = HashSet::with_capacity(items.len());
        for item in &items {
            if !seen.insert(item.id.as_str()) {
                return Err(AppError::message(format!(
                    "catalog contains duplicate item id `{}`",
                    item.id
                )));
            }
        }

        Ok(Self {
            items: items.into(),
        })
    }

    pub fn from_entries(entries: &[CatalogEntry], endpoints: &EndpointConfig) -> Result<Self> {
        let items = entries
            .iter()
            .map(|entry| TrackedItem::from_entry(entry, endpoints))
            .collect::<Result<Vec<_>>>()?;
        Self::new(items)
    }

    /// The eight builtin coins rendered against the given endpoint templates.
    pub fn from_config(endpoints: &EndpointConfig) -> Result<Self> {
        Self::from_entries(&BUILTIN_ENTRIES, endpoints)
    }

    pub fn items(&self) -> &[TrackedItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&TrackedItem> {
        self.items.get(index)
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id == id)
    }

    /// Case-insensitive lookup by ticker symbol.
    pub fn find_symbol(&self, symbol: &str) -> Option<&TrackedItem> {
        self.items
            .iter()
            .find(|item| item.symbol.eq_ignore_ascii_case(symbol))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedItem> {
        self.items.iter()
    }
}

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a TrackedItem;
    type IntoIter = std::slice::Iter<'a, TrackedItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn builtin() -> Catalog {
        Catalog::from_config(&Config::builtin().endpoints).expect("builtin catalog builds")
    }

    #[test]
    fn builtin_catalog_keeps_order_and_urls() {
        let catalog = builtin();
        assert_eq!(catalog.len(), 8);

        let symbols: Vec<&str> = catalog.iter().map(|item| item.symbol.as_str()).collect();
        assert_eq!(
            symbols,
            vec!["BTC", "ETH", "USDT", "LTC", "XRP", "ADA", "SOL", "DOGE"]
        );

        let ripple = catalog.find_symbol("xrp").expect("ripple present");
        assert_eq!(ripple.id, "ripple");
        assert_eq!(
            ripple.data_url.as_str(),
            "https://api.coincap.io/v2/assets?search=XRP"
        );
        assert_eq!(
            ripple.logo_url.as_str(),
            "https://static.coinpaprika.com/coin/xrp-xrp/logo.png"
        );
        assert_eq!(catalog.position("dogecoin"), Some(7));
        assert_eq!(catalog.items()[0].accent, [255, 128, 0]);
    }

    #[test]
    fn rejects_empty_catalog() {
        let err = Catalog::new(Vec::new()).expect_err("empty catalog fails");
        assert!(err.to_string().contains("at least one item"), "{err}");
    }

    #[test]
    fn rejects_duplicate_ids() {
        let endpoints = Config::builtin().endpoints;
        let entries = [BUILTIN_ENTRIES[0], BUILTIN_ENTRIES[1], BUILTIN_ENTRIES[0]];

        let err = Catalog::from_entries(&entries, &endpoints).expect_err("duplicate id fails");
        assert!(err.to_string().contains("`bitcoin`"), "{err}");
    }

    #[test]
    fn clones_share_items() {
        let catalog = builtin();
        let shared = catalog.clone();
        assert!(std::ptr::eq(catalog.items(), shared.items()));
    }
}
