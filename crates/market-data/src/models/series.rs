use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::errors::MarketDataError;

/// A single table value.
///
/// Numeric where the source payload was numeric (or a numeric string),
/// text otherwise. Providers routinely send numbers as quoted strings;
/// [`Cell::coerce`] performs the coercion once, at normalization time.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    /// A numeric value
    Number(Decimal),
    /// A non-numeric string value
    Text(String),
}

impl Cell {
    /// Coerce a raw string field into a cell.
    ///
    /// Numeric strings (e.g. `"150.25"`) become [`Cell::Number`];
    /// anything else is kept as [`Cell::Text`] unchanged.
    pub fn coerce(raw: &str) -> Self {
        match raw.trim().parse::<Decimal>() {
            Ok(value) => Cell::Number(value),
            Err(_) => Cell::Text(raw.to_string()),
        }
    }

    /// The numeric value, if this cell is numeric.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Cell::Number(value) => Some(*value),
            Cell::Text(_) => None,
        }
    }

    /// The text value, if this cell is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Cell::Number(_) => None,
            Cell::Text(value) => Some(value),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Number(value) => write!(f, "{}", value),
            Cell::Text(value) => write!(f, "{}", value),
        }
    }
}

/// One row of a [`TimeSeries`]: a timestamp plus one cell per column.
#[derive(Clone, Debug, Serialize)]
pub struct SeriesRow {
    timestamp: DateTime<Utc>,
    values: Vec<Cell>,
}

impl SeriesRow {
    /// Timestamp keying this row.
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Cell values, in column order.
    pub fn values(&self) -> &[Cell] {
        &self.values
    }
}

/// A tabular time series: one row per timestamp, a shared column set.
///
/// Invariants, enforced structurally and at construction:
/// - every row holds exactly one cell per column, in column order
/// - timestamps are unique and strictly increasing
///
/// Produced by the normalizer from a raw provider response; consumed by the
/// resampler or directly by the caller. Not cached and not persisted.
#[derive(Clone, Debug, Serialize)]
pub struct TimeSeries {
    columns: Vec<String>,
    rows: Vec<SeriesRow>,
}

impl TimeSeries {
    /// Build a series from a timestamp-keyed map of cell rows.
    ///
    /// The map guarantees unique, ascending timestamps; each row must carry
    /// exactly one cell per column.
    pub fn from_map(
        columns: Vec<String>,
        rows: BTreeMap<DateTime<Utc>, Vec<Cell>>,
    ) -> Result<Self, MarketDataError> {
        let rows = rows
            .into_iter()
            .map(|(timestamp, values)| {
                if values.len() != columns.len() {
                    return Err(MarketDataError::shape(format!(
                        "row at {} has {} values for {} columns",
                        timestamp,
                        values.len(),
                        columns.len()
                    )));
                }
                Ok(SeriesRow { timestamp, values })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { columns, rows })
    }

    /// An empty series with the given column set.
    pub fn empty(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Column names, in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows, ascending by timestamp.
    pub fn rows(&self) -> &[SeriesRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the series holds no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column, or a lookup error naming it.
    pub fn column_index(&self, name: &str) -> Result<usize, MarketDataError> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| MarketDataError::FieldNotFound {
                field: name.to_string(),
            })
    }

    /// All cells of one column, in row order.
    pub fn column(&self, name: &str) -> Result<Vec<&Cell>, MarketDataError> {
        let index = self.column_index(name)?;
        Ok(self.rows.iter().map(|row| &row.values[index]).collect())
    }

    /// Sub-series covering the inclusive period `[from, to]`.
    pub fn between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> TimeSeries {
        TimeSeries {
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|row| row.timestamp >= from && row.timestamp <= to)
                .cloned()
                .collect(),
        }
    }
}
