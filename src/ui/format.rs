use crate::records::{LogoBlob, NOT_AVAILABLE};

fn parse_amount(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

/// `65000.1234` -> `$65,000.12`; sub-dollar prices keep six decimals.
pub fn format_usd(value: &str) -> String {
    match parse_amount(value) {
        Some(amount) => {
            let decimals = if amount != 0.0 && amount.abs() < 1.0 { 6 } else { 2 };
            format!("${}", group_thousands(amount, decimals))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Signed percentage with two decimals, e.g. `-1.25%`.
pub fn format_percent(value: Option<&str>) -> String {
    match value.and_then(parse_amount) {
        Some(change) => format!("{:+.2}%", change),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Large quantities as `1.23T`, `45.60B`, `7.00M`, `12.50K`.
pub fn format_compact(value: Option<&str>) -> String {
    let Some(amount) = value.and_then(parse_amount) else {
        return NOT_AVAILABLE.to_string();
    };

    const UNITS: [(f64, &str); 4] = [(1e12, "T"), (1e9, "B"), (1e6, "M"), (1e3, "K")];
    for (scale, suffix) in UNITS {
        if amount.abs() >= scale {
            return format!("{:.2}{}", amount / scale, suffix);
        }
    }
    format!("{:.2}", amount)
}

/// Whole-number quantity with thousands separators.
pub fn format_quantity(value: Option<&str>) -> String {
    match value.and_then(parse_amount) {
        Some(amount) => group_thousands(amount, 0),
        None => NOT_AVAILABLE.to_string(),
    }
}

pub fn format_logo(logo: Option<&LogoBlob>) -> String {
    match logo {
        Some(logo) => format!("{} {}", logo.format().extension(), format_bytes(logo.len())),
        None => "-".to_string(),
    }
}

fn format_bytes(len: usize) -> String {
    if len >= 1024 {
        format!("{:.1} KB", len as f64 / 1024.0)
    } else {
        format!("{} B", len)
    }
}

fn group_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(formatted.len() + int_part.len() / 3 + 1);
    if value < 0.0 && formatted.chars().any(|ch| ch != '0' && ch != '.') {
        grouped.push('-');
    }
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}
