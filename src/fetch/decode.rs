use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::error::FetchError;
use crate::records::{AssetListResponse, AssetRecord, LogoBlob};

/// Decode a `{ "data": [...] }` payload and keep its first record.
pub fn decode_first_record(url: &str, bytes: &[u8]) -> Result<AssetRecord, FetchError> {
    let response = decode_record_list(url, bytes)?;
    response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| FetchError::no_data(url, "response contained no assets"))
}

pub fn decode_record_list(url: &str, bytes: &[u8]) -> Result<AssetListResponse, FetchError> {
    serde_json::from_slice(bytes).map_err(|err| FetchError::decode(url, err))
}

/// Best-effort check that a payload looks like an image; pixels are never decoded here.
pub fn decode_logo(url: &str, bytes: Vec<u8>) -> Result<LogoBlob, FetchError> {
    match sniff_image(&bytes) {
        Some(format) => Ok(LogoBlob::new(format, bytes)),
        None => Err(FetchError::decode(url, "payload is not a recognised image")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Svg,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Webp => "webp",
            ImageFormat::Svg => "svg",
        }
    }
}

pub fn sniff_image(bytes: &[u8]) -> Option<ImageFormat> {
    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n";

    if bytes.starts_with(PNG) {
        return Some(ImageFormat::Png);
    }
    if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return Some(ImageFormat::Jpeg);
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return Some(ImageFormat::Gif);
    }
    if bytes.len() >= 12 && &bytes[..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        return Some(ImageFormat::Webp);
    }

    let head = &bytes[..bytes.len().min(256)];
    let text = String::from_utf8_lossy(head);
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
        return Some(ImageFormat::Svg);
    }

    None
}

pub fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Accept a JSON string or number for a numeric field, keeping it as text. `null` is absent.
pub fn lenient_string_opt<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(value_to_string))
}

pub fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    value_to_string(&value).ok_or_else(|| serde::de::Error::custom("expected a string or number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://api.coincap.io/v2/assets?search=BTC";

    #[test]
    fn decodes_coincap_payload() {
        let body = br#"{
            "data": [
                {
                    "id": "bitcoin",
                    "rank": "1",
                    "symbol": "BTC",
                    "name": "Bitcoin",
                    "supply": "19700000.0000000000000000",
                    "maxSupply": "21000000.0000000000000000",
                    "marketCapUsd": "1300000000000.12",
                    "volumeUsd24Hr": "9000000000.5",
                    "priceUsd": "65000.1234",
                    "changePercent24Hr": "-1.25",
                    "vwap24Hr": "64800.0",
                    "explorer": "https://blockchain.info/"
                },
                {
                    "id": "wrapped-bitcoin",
                    "symbol": "WBTC",
                    "name": "Wrapped Bitcoin",
                    "priceUsd": "64990"
                }
            ],
            "timestamp": 1700000000000
        }"#;

        let record = decode_first_record(URL, body).expect("payload decodes");
        assert_eq!(record.id, "bitcoin");
        assert_eq!(record.rank.as_deref(), Some("1"));
        assert_eq!(record.volume_usd_24h.as_deref(), Some("9000000000.5"));
        assert_eq!(record.change_percent_24h.as_deref(), Some("-1.25"));
        assert_eq!(record.price_usd, "65000.1234");
        assert_eq!(record.explorer_url.as_deref(), Some("https://blockchain.info/"));
    }

    #[test]
    fn numbers_and_nulls_are_tolerated() {
        let body = br#"{"data":[{"id":"tether","symbol":"USDT","name":"Tether",
            "priceUsd":1.0002,"maxSupply":null,"rank":3}]}"#;

        let record = decode_first_record(URL, body).expect("payload decodes");
        assert_eq!(record.price_usd, "1.0002");
        assert_eq!(record.rank.as_deref(), Some("3"));
        assert_eq!(record.max_supply, None);
    }

    #[test]
    fn empty_list_is_no_data() {
        let err = decode_first_record(URL, br#"{"data":[]}"#).expect_err("empty list fails");
        assert!(matches!(err, FetchError::NoData { .. }), "{err:?}");
    }

    #[test]
    fn malformed_payload_is_decode_error() {
        for body in [&b"<html>rate limited</html>"[..], &br#"{"data":[{"id":"x"}]}"#[..]] {
            let err = decode_first_record(URL, body).expect_err("bad payload fails");
            assert!(matches!(err, FetchError::Decode { .. }), "{err:?}");
        }
    }

    #[test]
    fn sniffs_common_logo_formats() {
        assert_eq!(sniff_image(b"\x89PNG\r\n\x1a\nrest"), Some(ImageFormat::Png));
        assert_eq!(sniff_image(&[0xFF, 0xD8, 0xFF, 0xE0]), Some(ImageFormat::Jpeg));
        assert_eq!(sniff_image(b"GIF89a...."), Some(ImageFormat::Gif));
        assert_eq!(sniff_image(b"RIFF\0\0\0\0WEBPVP8 "), Some(ImageFormat::Webp));
        assert_eq!(
            sniff_image(b"<?xml version=\"1.0\"?>\n<svg xmlns=\"\"/>"),
            Some(ImageFormat::Svg)
        );
        assert_eq!(sniff_image(b"{\"error\":\"not found\"}"), None);
        assert_eq!(sniff_image(b""), None);
    }

    #[test]
    fn non_image_logo_is_rejected() {
        let err = decode_logo("https://x/logo.png", b"Not Found".to_vec())
            .expect_err("text body is not a logo");
        assert!(matches!(err, FetchError::Decode { .. }));
    }
}
