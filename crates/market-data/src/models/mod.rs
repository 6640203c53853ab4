//! Market data models
//!
//! This module contains the core data types returned by the facades:
//! - `series` - Tabular time series (TimeSeries, SeriesRow, Cell)
//! - `profile` - Company overview record (CompanyProfile)
//! - `calendar` - Earnings calendar rows (EarningsEvent)

mod calendar;
mod profile;
mod series;

pub use calendar::EarningsEvent;
pub use profile::CompanyProfile;
pub use series::{Cell, SeriesRow, TimeSeries};
