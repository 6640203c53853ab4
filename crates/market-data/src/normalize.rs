//! Response normalization.
//!
//! Converts raw provider payloads into the tabular representations of
//! [`crate::models`], given a declared shape:
//!
//! - [`date_keyed_table`] — nested date→fields object (price series,
//!   technical indicators)
//! - [`value_rows`] — list of row objects carrying a date field (economic
//!   series, financial statements)
//! - [`company_profile`] — flat field map (OVERVIEW)
//! - [`earnings_calendar`] — CSV with a header row (calendar endpoints)
//!
//! A declared field missing from the payload is a lookup failure naming the
//! field, never a silent default.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{Cell, CompanyProfile, EarningsEvent, TimeSeries};

/// Parse a provider timestamp into canonical orderable form.
///
/// Accepts intraday stamps (`2024-01-15 09:31:00`) and plain dates
/// (`2024-01-15`, midnight).
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Utc.from_local_datetime(&dt).single();
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .and_then(|dt| Utc.from_local_datetime(&dt).single())
}

/// Strip the provider's ordinal prefix from a column name:
/// "1. open" becomes "open". Names without the prefix pass through.
fn canonical_column(raw: &str) -> String {
    match raw.split_once(". ") {
        Some((prefix, rest))
            if prefix.starts_with(|c: char| c.is_ascii_digit())
                && prefix.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            rest.to_string()
        }
        _ => raw.to_string(),
    }
}

fn cell_from_value(value: &Value) -> Cell {
    match value {
        Value::String(s) => Cell::coerce(s),
        Value::Number(n) => match n.to_string().parse::<Decimal>() {
            Ok(d) => Cell::Number(d),
            Err(_) => Cell::Text(n.to_string()),
        },
        other => Cell::Text(other.to_string()),
    }
}

/// Screen a JSON payload for provider-level notices.
///
/// The provider reports errors inside a 200 response: an "Error Message"
/// field is a hard failure, while "Note"/"Information" throttling notices
/// collapse into absence, like any other transport-level failure.
///
/// Returns `Ok(true)` when the payload is usable, `Ok(false)` for absence.
pub(crate) fn screen_payload(payload: &Value) -> Result<bool, MarketDataError> {
    if let Some(message) = payload.get("Error Message").and_then(Value::as_str) {
        return Err(MarketDataError::shape(format!("provider error: {message}")));
    }
    for key in ["Note", "Information"] {
        if let Some(message) = payload.get(key).and_then(Value::as_str) {
            if message.contains("API call frequency") || message.contains("rate limit") {
                warn!("provider throttled the request: {}", message);
                return Ok(false);
            }
            warn!("provider notice: {}", message);
        }
    }
    Ok(true)
}

/// Normalize a nested date-keyed object into a [`TimeSeries`].
///
/// Each outer key becomes a row timestamp, each inner key a column; column
/// names are canonicalized and string-typed numeric fields coerced. The
/// column set is declared by the first row; a field missing from any row is
/// a [`MarketDataError::FieldNotFound`] naming it.
pub fn date_keyed_table(payload: &Value, series_key: &str) -> Result<TimeSeries, MarketDataError> {
    let series = payload
        .get(series_key)
        .and_then(Value::as_object)
        .ok_or_else(|| MarketDataError::FieldNotFound {
            field: series_key.to_string(),
        })?;

    // (raw, canonical) pairs from the first row, in the payload's key order
    let mut columns: Vec<(String, String)> = Vec::new();
    if let Some((_, first)) = series.iter().next() {
        let fields = first
            .as_object()
            .ok_or_else(|| MarketDataError::shape("series rows must be objects"))?;
        for raw in fields.keys() {
            columns.push((raw.clone(), canonical_column(raw)));
        }
    }

    let mut rows = BTreeMap::new();
    for (stamp, fields) in series {
        let timestamp = parse_timestamp(stamp)
            .ok_or_else(|| MarketDataError::shape(format!("unparseable timestamp: {stamp}")))?;
        let fields = fields
            .as_object()
            .ok_or_else(|| MarketDataError::shape(format!("row at {stamp} is not an object")))?;
        let mut values = Vec::with_capacity(columns.len());
        for (raw, _) in &columns {
            let value = fields
                .get(raw)
                .ok_or_else(|| MarketDataError::FieldNotFound { field: raw.clone() })?;
            values.push(cell_from_value(value));
        }
        rows.insert(timestamp, values);
    }

    TimeSeries::from_map(columns.into_iter().map(|(_, c)| c).collect(), rows)
}

/// Normalize a list of row objects into a [`TimeSeries`].
///
/// `rows_key` names the list in the payload (e.g. `"data"`,
/// `"annualReports"`); `date_field` names the per-row timestamp field. The
/// remaining fields of the first row declare the column set.
pub fn value_rows(
    payload: &Value,
    rows_key: &str,
    date_field: &str,
) -> Result<TimeSeries, MarketDataError> {
    let list = payload
        .get(rows_key)
        .and_then(Value::as_array)
        .ok_or_else(|| MarketDataError::FieldNotFound {
            field: rows_key.to_string(),
        })?;

    let mut columns: Vec<String> = Vec::new();
    if let Some(first) = list.first() {
        let fields = first
            .as_object()
            .ok_or_else(|| MarketDataError::shape("rows must be objects"))?;
        for key in fields.keys() {
            if key != date_field {
                columns.push(key.clone());
            }
        }
    }

    let mut rows = BTreeMap::new();
    for entry in list {
        let fields = entry
            .as_object()
            .ok_or_else(|| MarketDataError::shape("rows must be objects"))?;
        let stamp = fields
            .get(date_field)
            .and_then(Value::as_str)
            .ok_or_else(|| MarketDataError::FieldNotFound {
                field: date_field.to_string(),
            })?;
        let timestamp = parse_timestamp(stamp)
            .ok_or_else(|| MarketDataError::shape(format!("unparseable timestamp: {stamp}")))?;
        let mut values = Vec::with_capacity(columns.len());
        for column in &columns {
            let value = fields
                .get(column)
                .ok_or_else(|| MarketDataError::FieldNotFound {
                    field: column.clone(),
                })?;
            values.push(cell_from_value(value));
        }
        rows.insert(timestamp, values);
    }

    TimeSeries::from_map(columns, rows)
}

/// Normalize an OVERVIEW flat field map into a [`CompanyProfile`].
pub fn company_profile(payload: &Value) -> Result<CompanyProfile, MarketDataError> {
    serde_json::from_value(payload.clone())
        .map_err(|e| MarketDataError::shape(format!("company overview: {e}")))
}

/// Normalize an earnings-calendar CSV payload into typed rows.
///
/// The first row is the header. A payload with no data rows (header only)
/// is "no data available" and yields the absence value, distinct from a
/// present-but-empty series.
pub fn earnings_calendar(text: &str) -> Result<Option<Vec<EarningsEvent>>, MarketDataError> {
    let mut reader = csv::Reader::from_reader(text.as_bytes());
    let mut events = Vec::new();
    for record in reader.deserialize::<EarningsEvent>() {
        let event =
            record.map_err(|e| MarketDataError::shape(format!("earnings calendar CSV: {e}")))?;
        events.push(event);
    }
    if events.is_empty() {
        return Ok(None);
    }
    Ok(Some(events))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_date_keyed_table_dimensions() {
        // N outer keys x M inner keys -> N rows x M columns
        let payload = json!({
            "Meta Data": {},
            "Time Series (1min)": {
                "2024-01-15 09:31:00": {
                    "1. open": "185.00", "2. high": "185.30",
                    "3. low": "184.90", "4. close": "185.10", "5. volume": "1200"
                },
                "2024-01-15 09:32:00": {
                    "1. open": "185.10", "2. high": "185.50",
                    "3. low": "185.00", "4. close": "185.40", "5. volume": "900"
                },
                "2024-01-15 09:33:00": {
                    "1. open": "185.40", "2. high": "185.60",
                    "3. low": "185.20", "4. close": "185.25", "5. volume": "1500"
                }
            }
        });

        let table = date_keyed_table(&payload, "Time Series (1min)").unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.columns(),
            ["open", "high", "low", "close", "volume"].map(String::from)
        );
        // string-typed numeric fields are coerced
        let close = table.column("close").unwrap();
        assert_eq!(close[0].as_number(), Some(dec!(185.10)));
    }

    #[test]
    fn test_date_keyed_table_missing_series_key() {
        let payload = json!({ "Meta Data": {} });
        match date_keyed_table(&payload, "Time Series (1min)") {
            Err(MarketDataError::FieldNotFound { field }) => {
                assert_eq!(field, "Time Series (1min)");
            }
            other => panic!("expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_date_keyed_table_missing_row_field() {
        let payload = json!({
            "series": {
                "2024-01-15": { "1. open": "1", "4. close": "2" },
                "2024-01-16": { "1. open": "1" }
            }
        });
        match date_keyed_table(&payload, "series") {
            Err(MarketDataError::FieldNotFound { field }) => assert_eq!(field, "4. close"),
            other => panic!("expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_date_keyed_table_rows_sorted_ascending() {
        let payload = json!({
            "series": {
                "2024-01-16": { "value": "2" },
                "2024-01-14": { "value": "1" },
                "2024-01-15": { "value": "3" }
            }
        });
        let table = date_keyed_table(&payload, "series").unwrap();
        let stamps: Vec<_> = table.rows().iter().map(|r| r.timestamp()).collect();
        assert!(stamps.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_value_rows_economic_series() {
        let payload = json!({
            "name": "Consumer Price Index",
            "interval": "monthly",
            "unit": "index 1982-1984=100",
            "data": [
                { "date": "2024-02-01", "value": "310.326" },
                { "date": "2024-01-01", "value": "308.417" }
            ]
        });
        let table = value_rows(&payload, "data", "date").unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.columns(), ["value".to_string()]);
        assert_eq!(
            table.rows()[0].values()[0].as_number(),
            Some(dec!(308.417))
        );
    }

    #[test]
    fn test_value_rows_missing_rows_key() {
        let payload = json!({ "name": "CPI" });
        assert!(matches!(
            value_rows(&payload, "data", "date"),
            Err(MarketDataError::FieldNotFound { field }) if field == "data"
        ));
    }

    #[test]
    fn test_non_numeric_values_stay_text() {
        let payload = json!({
            "data": [ { "date": "2024-01-01", "value": "." } ]
        });
        let table = value_rows(&payload, "data", "date").unwrap();
        assert_eq!(table.rows()[0].values()[0].as_text(), Some("."));
    }

    #[test]
    fn test_earnings_calendar_header_only_is_absence() {
        let csv = "symbol,name,reportDate,fiscalDateEnding,estimate,currency\n";
        assert!(earnings_calendar(csv).unwrap().is_none());
    }

    #[test]
    fn test_earnings_calendar_rows() {
        let csv = "\
symbol,name,reportDate,fiscalDateEnding,estimate,currency
AAPL,Apple Inc,2024-05-02,2024-03-31,1.50,USD
MSFT,Microsoft Corporation,2024-04-25,,,USD
";
        let events = earnings_calendar(csv).unwrap().unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].symbol, "AAPL");
        assert_eq!(events[0].estimate, Some(dec!(1.50)));
        assert!(events[1].fiscal_date_ending.is_none());
        assert!(events[1].estimate.is_none());
    }

    #[test]
    fn test_screen_payload_error_message_is_shape_error() {
        let payload = json!({ "Error Message": "Invalid API call" });
        assert!(matches!(
            screen_payload(&payload),
            Err(MarketDataError::UnexpectedShape { .. })
        ));
    }

    #[test]
    fn test_screen_payload_throttle_note_is_absence() {
        let payload = json!({
            "Note": "Thank you for using our API! Our standard API call frequency is 5 calls per minute."
        });
        assert_eq!(screen_payload(&payload).unwrap(), false);
    }

    #[test]
    fn test_screen_payload_clean() {
        let payload = json!({ "data": [] });
        assert!(screen_payload(&payload).unwrap());
    }

    #[test]
    fn test_parse_timestamp_forms() {
        assert!(parse_timestamp("2024-01-15").is_some());
        assert!(parse_timestamp("2024-01-15 09:31:00").is_some());
        assert!(parse_timestamp("15/01/2024").is_none());
    }
}
