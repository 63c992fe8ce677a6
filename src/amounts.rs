use once_cell::sync::Lazy;
use regex::Regex;

static DOLLAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$(\d[\d,]*(?:\.\d{2})?)").expect("dollar pattern compiles"));

/// Parse a single amount field (`event_$:` values, table cells).
/// Anything unreadable is zero.
pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    match s.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Every `$1,234.56`-style amount found in free text, in order of appearance.
pub fn dollar_amounts(text: &str) -> Vec<f64> {
    DOLLAR_RE
        .captures_iter(text)
        .map(|caps| parse_amount(&caps[1]))
        .collect()
}

/// Sum of all dollar amounts mentioned in `text`.
pub fn extract_dollars(text: &str) -> f64 {
    dollar_amounts(text).iter().sum()
}
