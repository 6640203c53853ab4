//! Provider facades.
//!
//! One facade per data category, each exposing a fixed catalog of named
//! operations over the provider's query-string API:
//! - `economic` - macroeconomic series (GDP, CPI, employment)
//! - `fundamental` - per-company fundamentals, with a cached overview
//! - `technical` - server-computed technical indicators
//!
//! Facades hold only the shared [`ApiClient`](crate::transport::ApiClient)
//! (and, for fundamentals, the once-fetched company profile); there is no
//! other state. Every operation returns `Ok(None)` on a transport failure
//! and a hard error on parse, shape, or lookup problems.

mod economic;
mod fundamental;
mod technical;

pub use economic::{EconomicCalendar, EconomicIndicator};
pub use fundamental::{CalendarHorizon, FundamentalIndicators, IntradayInterval, OutputSize};
pub use technical::{Interval, MovingAverageKind, SeriesType, TechnicalIndicators};
