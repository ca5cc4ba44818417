// File: crates/stockchart-core/src/data.rs
// Summary: Raw stock data points and the single source of truth for "what counts as absent".
// Notes:
// - Fields arrive as numbers or numeric strings from the dashboard layer.
// - A field is present only if it parses to a finite number.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::IgnoredAny;
use serde::Deserialize;

/// Numeric-or-string field value as delivered by the backend.
/// Any other JSON shape (bool, array, object) is kept as `Other` and reads as absent.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self { FieldValue::Number(v) }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self { FieldValue::Number(v as f64) }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self { FieldValue::Text(v.to_string()) }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self { FieldValue::Text(v) }
}

/// One sample of a stock time series.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct StockDataPoint {
    pub date: String,
    #[serde(default)]
    pub open: Option<FieldValue>,
    #[serde(default)]
    pub high: Option<FieldValue>,
    #[serde(default)]
    pub low: Option<FieldValue>,
    #[serde(default)]
    pub close: Option<FieldValue>,
    #[serde(default)]
    pub trend_q: Option<FieldValue>,
    #[serde(default)]
    pub fq: Option<FieldValue>,
    #[serde(default)]
    pub qv1: Option<FieldValue>,
}

/// Names accepted by [`StockDataPoint::field`].
pub const FIELD_NAMES: [&str; 7] = ["open", "high", "low", "close", "trend_q", "fq", "qv1"];

impl StockDataPoint {
    pub fn new(date: impl Into<String>) -> Self {
        Self { date: date.into(), ..Self::default() }
    }

    /// Builder-style setter; unknown field names are ignored.
    pub fn with(mut self, name: &str, value: impl Into<FieldValue>) -> Self {
        if let Some(slot) = self.field_mut(name) {
            *slot = Some(value.into());
        }
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldValue> {
        match name {
            "open" => self.open.as_ref(),
            "high" => self.high.as_ref(),
            "low" => self.low.as_ref(),
            "close" => self.close.as_ref(),
            "trend_q" => self.trend_q.as_ref(),
            "fq" => self.fq.as_ref(),
            "qv1" => self.qv1.as_ref(),
            _ => None,
        }
    }

    fn field_mut(&mut self, name: &str) -> Option<&mut Option<FieldValue>> {
        match name {
            "open" => Some(&mut self.open),
            "high" => Some(&mut self.high),
            "low" => Some(&mut self.low),
            "close" => Some(&mut self.close),
            "trend_q" => Some(&mut self.trend_q),
            "fq" => Some(&mut self.fq),
            "qv1" => Some(&mut self.qv1),
            _ => None,
        }
    }

    /// Parsed value of a field, `None` when absent or not a finite number.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.field(name).and_then(parse_number)
    }

    /// Open/high/low/close, only when all four are present.
    pub fn ohlc(&self) -> Option<(f64, f64, f64, f64)> {
        Some((self.value("open")?, self.value("high")?, self.value("low")?, self.value("close")?))
    }

    /// Normalized timestamp (UTC midnight, seconds).
    pub fn time(&self) -> Option<i64> {
        parse_date(&self.date)
    }
}

/// Permissive numeric coercion with `parseFloat` semantics: the longest numeric
/// prefix of a trimmed string is used. Empty, non-numeric and non-finite values are absent.
pub fn parse_number(value: &FieldValue) -> Option<f64> {
    let v = match value {
        FieldValue::Number(n) => *n,
        FieldValue::Text(s) => {
            let prefix = numeric_prefix(s.trim());
            if prefix.is_empty() {
                return None;
            }
            prefix.parse::<f64>().ok()?
        }
        FieldValue::Other(_) => return None,
    };
    v.is_finite().then_some(v)
}

fn numeric_prefix(s: &str) -> &str {
    let b = s.as_bytes();
    let mut i = 0usize;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < b.len() && b[i] == b'.' {
        let frac_start = i + 1;
        let mut k = frac_start;
        while k < b.len() && b[k].is_ascii_digit() {
            k += 1;
        }
        if digits > 0 || k > frac_start {
            digits += k - frac_start;
            i = k;
        }
    }
    if digits == 0 {
        return "";
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut k = i + 1;
        if k < b.len() && (b[k] == b'+' || b[k] == b'-') {
            k += 1;
        }
        let exp_start = k;
        while k < b.len() && b[k].is_ascii_digit() {
            k += 1;
        }
        if k > exp_start {
            i = k;
        }
    }
    &s[..i]
}

/// Convert a calendar date string to the UTC-midnight timestamp of that day.
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, RFC 3339 and `YYYY-MM-DD HH:MM:SS`; the time part is ignored.
pub fn parse_date(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y/%m/%d"))
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
        .or_else(|| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").ok().map(|dt| dt.date()))?;
    Some(date.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
}

/// Format a normalized timestamp back to `YYYY-MM-DD`.
pub fn format_date(time: i64) -> String {
    DateTime::from_timestamp(time, 0)
        .map(|dt| dt.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| time.to_string())
}
