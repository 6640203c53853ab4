//! Spreadsheet export.
//!
//! Writing a table to disk is a side-effecting convenience kept separate
//! from the core data contract: the resampler returns its result as a
//! value, and callers opt into export explicitly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::errors::MarketDataError;
use crate::models::TimeSeries;

/// Write a series to a CSV file at `path`.
///
/// The header row is `timestamp` followed by the column names; timestamps
/// are RFC 3339.
pub fn write_csv(series: &TimeSeries, path: &Path) -> Result<(), MarketDataError> {
    let file = File::create(path).map_err(|e| MarketDataError::Export {
        message: format!("{}: {}", path.display(), e),
    })?;
    write_csv_to(series, file)
}

/// Write a series as CSV to any writer.
pub fn write_csv_to<W: Write>(series: &TimeSeries, writer: W) -> Result<(), MarketDataError> {
    let export_error = |e: csv::Error| MarketDataError::Export {
        message: e.to_string(),
    };

    let mut out = csv::Writer::from_writer(writer);
    let mut header = Vec::with_capacity(series.columns().len() + 1);
    header.push("timestamp".to_string());
    header.extend(series.columns().iter().cloned());
    out.write_record(&header).map_err(export_error)?;

    for row in series.rows() {
        let mut record = Vec::with_capacity(header.len());
        record.push(row.timestamp().to_rfc3339());
        record.extend(row.values().iter().map(|cell| cell.to_string()));
        out.write_record(&record).map_err(export_error)?;
    }

    out.flush().map_err(|e| MarketDataError::Export {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Cell;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap;

    #[test]
    fn test_write_csv_to_buffer() {
        let mut rows = BTreeMap::new();
        rows.insert(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            vec![Cell::Number(dec!(185.10)), Cell::Text("regular".to_string())],
        );
        let series =
            TimeSeries::from_map(vec!["close".to_string(), "session".to_string()], rows).unwrap();

        let mut buffer = Vec::new();
        write_csv_to(&series, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("timestamp,close,session"));
        assert_eq!(
            lines.next(),
            Some("2024-01-15T00:00:00+00:00,185.10,regular")
        );
    }

    #[test]
    fn test_write_csv_empty_series_is_header_only() {
        let series = TimeSeries::empty(vec!["close".to_string()]);
        let mut buffer = Vec::new();
        write_csv_to(&series, &mut buffer).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "timestamp,close\n");
    }
}
