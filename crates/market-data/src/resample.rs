//! Time-series resampling.
//!
//! Converts a table at the finest available granularity into a coarser one
//! by grouping rows into fixed-width, epoch-aligned buckets and aggregating
//! per column with a fixed rule. The resampled table is returned as a
//! value; file export is a separate concern (see [`crate::export`]).

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

use crate::errors::MarketDataError;
use crate::models::{Cell, TimeSeries};

/// Target bucket width for resampling.
///
/// A closed enumeration: anything outside it fails with
/// [`MarketDataError::UnsupportedGranularity`] at parse time, before any
/// network call. Weekly and monthly widths are naive multiples of the daily
/// width (5x and 28x) rather than calendar-aware buckets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Granularity {
    /// 5 minutes
    M5,
    /// 15 minutes
    M15,
    /// 30 minutes
    M30,
    /// 60 minutes
    M60,
    /// 2 hours
    H2,
    /// 4 hours
    H4,
    /// 1 trading day
    Daily,
    /// 5 daily widths
    Weekly,
    /// 28 daily widths
    Monthly,
}

impl Granularity {
    /// Every supported granularity, finest first.
    pub const ALL: [Granularity; 9] = [
        Granularity::M5,
        Granularity::M15,
        Granularity::M30,
        Granularity::M60,
        Granularity::H2,
        Granularity::H4,
        Granularity::Daily,
        Granularity::Weekly,
        Granularity::Monthly,
    ];

    /// Fixed bucket width in minutes.
    pub fn minutes(self) -> i64 {
        match self {
            Granularity::M5 => 5,
            Granularity::M15 => 15,
            Granularity::M30 => 30,
            Granularity::M60 => 60,
            Granularity::H2 => 120,
            Granularity::H4 => 240,
            Granularity::Daily => 1440,
            Granularity::Weekly => 1440 * 5,
            Granularity::Monthly => 1440 * 28,
        }
    }

    /// Canonical label, matching [`FromStr`].
    pub fn as_str(self) -> &'static str {
        match self {
            Granularity::M5 => "5min",
            Granularity::M15 => "15min",
            Granularity::M30 => "30min",
            Granularity::M60 => "60min",
            Granularity::H2 => "2h",
            Granularity::H4 => "4h",
            Granularity::Daily => "1d",
            Granularity::Weekly => "1w",
            Granularity::Monthly => "1m",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "5min" => Ok(Granularity::M5),
            "15min" => Ok(Granularity::M15),
            "30min" => Ok(Granularity::M30),
            "60min" => Ok(Granularity::M60),
            "2h" => Ok(Granularity::H2),
            "4h" => Ok(Granularity::H4),
            "1d" => Ok(Granularity::Daily),
            "1w" => Ok(Granularity::Weekly),
            "1m" => Ok(Granularity::Monthly),
            other => Err(MarketDataError::UnsupportedGranularity {
                requested: other.to_string(),
            }),
        }
    }
}

/// Per-column aggregation operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Aggregate {
    First,
    Max,
    Min,
    Last,
    Sum,
}

/// The fixed bucket rule: open=first, high=max, low=min, close=last,
/// volume=sum. Columns outside the rule take the last value in the bucket.
fn rule_for(column: &str) -> Aggregate {
    match column {
        "open" => Aggregate::First,
        "high" => Aggregate::Max,
        "low" => Aggregate::Min,
        "close" => Aggregate::Last,
        "volume" => Aggregate::Sum,
        _ => Aggregate::Last,
    }
}

/// Running state of one column within one bucket.
enum Acc {
    First(Option<Cell>),
    Last(Option<Cell>),
    Max(Option<Decimal>),
    Min(Option<Decimal>),
    Sum(Decimal),
}

impl Acc {
    fn new(rule: Aggregate) -> Self {
        match rule {
            Aggregate::First => Acc::First(None),
            Aggregate::Last => Acc::Last(None),
            Aggregate::Max => Acc::Max(None),
            Aggregate::Min => Acc::Min(None),
            Aggregate::Sum => Acc::Sum(Decimal::ZERO),
        }
    }

    fn push(&mut self, column: &str, cell: &Cell) -> Result<(), MarketDataError> {
        let numeric = |cell: &Cell| {
            cell.as_number().ok_or_else(|| {
                MarketDataError::shape(format!("non-numeric value in column {column}"))
            })
        };
        match self {
            Acc::First(slot) => {
                if slot.is_none() {
                    *slot = Some(cell.clone());
                }
            }
            Acc::Last(slot) => *slot = Some(cell.clone()),
            Acc::Max(current) => {
                let value = numeric(cell)?;
                *current = Some(current.map_or(value, |c| c.max(value)));
            }
            Acc::Min(current) => {
                let value = numeric(cell)?;
                *current = Some(current.map_or(value, |c| c.min(value)));
            }
            Acc::Sum(total) => *total += numeric(cell)?,
        }
        Ok(())
    }

    fn finish(self) -> Cell {
        match self {
            // push() ran at least once per bucket, so the slots are filled
            Acc::First(slot) | Acc::Last(slot) => {
                slot.unwrap_or_else(|| Cell::Text(String::new()))
            }
            Acc::Max(value) | Acc::Min(value) => {
                Cell::Number(value.unwrap_or(Decimal::ZERO))
            }
            Acc::Sum(total) => Cell::Number(total),
        }
    }
}

/// Resample a series into fixed-width buckets of the target granularity.
///
/// Buckets are aligned to the Unix epoch; each output row is keyed by its
/// bucket start and aggregated per the fixed rule. An empty input yields an
/// empty output with the same columns.
///
/// # Errors
///
/// [`MarketDataError::UnexpectedShape`] if a numeric aggregate (max, min,
/// sum) meets a text cell.
pub fn resample(series: &TimeSeries, target: Granularity) -> Result<TimeSeries, MarketDataError> {
    let width_secs = target.minutes() * 60;
    let columns = series.columns().to_vec();
    let rules: Vec<Aggregate> = columns.iter().map(|c| rule_for(c)).collect();

    let mut buckets: BTreeMap<i64, Vec<Acc>> = BTreeMap::new();
    for row in series.rows() {
        let bucket = row.timestamp().timestamp().div_euclid(width_secs);
        let accs = buckets
            .entry(bucket)
            .or_insert_with(|| rules.iter().map(|&r| Acc::new(r)).collect());
        for (index, cell) in row.values().iter().enumerate() {
            accs[index].push(&columns[index], cell)?;
        }
    }

    let mut rows = BTreeMap::new();
    for (bucket, accs) in buckets {
        let timestamp = Utc
            .timestamp_opt(bucket * width_secs, 0)
            .single()
            .ok_or_else(|| MarketDataError::shape("bucket start out of range"))?;
        rows.insert(timestamp, accs.into_iter().map(Acc::finish).collect());
    }

    TimeSeries::from_map(columns, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use rust_decimal_macros::dec;
    use std::collections::BTreeMap as Map;

    fn minute(offset: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap() + chrono::Duration::minutes(offset)
    }

    fn ohlcv_columns() -> Vec<String> {
        ["open", "high", "low", "close", "volume"]
            .map(String::from)
            .to_vec()
    }

    fn row(o: Decimal, h: Decimal, l: Decimal, c: Decimal, v: Decimal) -> Vec<Cell> {
        vec![
            Cell::Number(o),
            Cell::Number(h),
            Cell::Number(l),
            Cell::Number(c),
            Cell::Number(v),
        ]
    }

    #[test]
    fn test_granularity_widths() {
        assert_eq!(Granularity::M5.minutes(), 5);
        assert_eq!(Granularity::H4.minutes(), 240);
        assert_eq!(Granularity::Daily.minutes(), 1440);
        assert_eq!(Granularity::Weekly.minutes(), 7200);
        assert_eq!(Granularity::Monthly.minutes(), 40320);
    }

    #[test]
    fn test_unknown_granularity_is_rejected() {
        match "3min".parse::<Granularity>() {
            Err(MarketDataError::UnsupportedGranularity { requested }) => {
                assert_eq!(requested, "3min");
            }
            other => panic!("expected UnsupportedGranularity, got {:?}", other),
        }
    }

    #[test]
    fn test_labels_round_trip() {
        for granularity in Granularity::ALL {
            assert_eq!(granularity.as_str().parse::<Granularity>().unwrap(), granularity);
        }
    }

    #[test]
    fn test_one_daily_bucket_aggregates_per_rule() {
        // Three 1-minute rows inside one daily bucket:
        // open=first, high=max, low=min, close=last, volume=sum.
        let mut rows = Map::new();
        rows.insert(minute(0), row(dec!(10), dec!(11), dec!(9), dec!(10.5), dec!(100)));
        rows.insert(minute(1), row(dec!(10.5), dec!(12), dec!(10), dec!(11), dec!(200)));
        rows.insert(minute(2), row(dec!(11), dec!(11.5), dec!(8), dec!(9), dec!(50)));
        let series = TimeSeries::from_map(ohlcv_columns(), rows).unwrap();

        let resampled = resample(&series, Granularity::Daily).unwrap();
        assert_eq!(resampled.len(), 1);
        let values = resampled.rows()[0].values();
        assert_eq!(values[0].as_number(), Some(dec!(10))); // open: first
        assert_eq!(values[1].as_number(), Some(dec!(12))); // high: max
        assert_eq!(values[2].as_number(), Some(dec!(8))); // low: min
        assert_eq!(values[3].as_number(), Some(dec!(9))); // close: last
        assert_eq!(values[4].as_number(), Some(dec!(350))); // volume: sum
    }

    #[test]
    fn test_rows_split_across_buckets() {
        let mut rows = Map::new();
        rows.insert(minute(0), row(dec!(1), dec!(1), dec!(1), dec!(1), dec!(10)));
        rows.insert(minute(4), row(dec!(2), dec!(2), dec!(2), dec!(2), dec!(10)));
        rows.insert(minute(5), row(dec!(3), dec!(3), dec!(3), dec!(3), dec!(10)));
        rows.insert(minute(11), row(dec!(4), dec!(4), dec!(4), dec!(4), dec!(10)));
        let series = TimeSeries::from_map(ohlcv_columns(), rows).unwrap();

        let resampled = resample(&series, Granularity::M5).unwrap();
        assert_eq!(resampled.len(), 3);
        assert_eq!(resampled.rows()[0].timestamp(), minute(0));
        assert_eq!(resampled.rows()[1].timestamp(), minute(5));
        assert_eq!(resampled.rows()[2].timestamp(), minute(10));
        // first bucket holds rows at minutes 0 and 4
        let first = resampled.rows()[0].values();
        assert_eq!(first[0].as_number(), Some(dec!(1)));
        assert_eq!(first[3].as_number(), Some(dec!(2)));
        assert_eq!(first[4].as_number(), Some(dec!(20)));
    }

    #[test]
    fn test_text_cell_under_numeric_aggregate_is_shape_error() {
        let mut rows = Map::new();
        rows.insert(
            minute(0),
            vec![
                Cell::Number(dec!(1)),
                Cell::Text("n/a".to_string()),
                Cell::Number(dec!(1)),
                Cell::Number(dec!(1)),
                Cell::Number(dec!(1)),
            ],
        );
        let series = TimeSeries::from_map(ohlcv_columns(), rows).unwrap();
        match resample(&series, Granularity::M5) {
            Err(MarketDataError::UnexpectedShape { message }) => {
                assert!(message.contains("high"));
            }
            other => panic!("expected UnexpectedShape, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_series_resamples_to_empty() {
        let series = TimeSeries::empty(ohlcv_columns());
        let resampled = resample(&series, Granularity::Weekly).unwrap();
        assert!(resampled.is_empty());
        assert_eq!(resampled.columns(), series.columns());
    }

    #[test]
    fn test_unlisted_column_takes_last_value() {
        let mut rows = Map::new();
        rows.insert(minute(0), vec![Cell::Number(dec!(1))]);
        rows.insert(minute(1), vec![Cell::Number(dec!(2))]);
        let series = TimeSeries::from_map(vec!["value".to_string()], rows).unwrap();
        let resampled = resample(&series, Granularity::M5).unwrap();
        assert_eq!(resampled.rows()[0].values()[0].as_number(), Some(dec!(2)));
    }
}
