//! Finboard Market Data Crate
//!
//! This crate is the data-fetch-and-normalize layer of the finboard
//! dashboard: it talks to the market data provider's query-string API,
//! reshapes the JSON/CSV responses into tabular time series, and resamples
//! them between granularities. All indicator math (moving averages, RSI,
//! GDP series) is computed server-side by the provider and merely fetched
//! and reshaped here.
//!
//! # Architecture
//!
//! ```text
//! +-----------------+     +------------------+
//! |     Facade      | --> |    QuerySpec     |  (function + ordered params)
//! +-----------------+     +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    ApiClient     |  (one GET; absence on failure)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    normalize     |  (declared shape -> table)
//!                          +------------------+
//!                                  |
//!                                  v
//!                          +------------------+
//!                          |    TimeSeries    |  (-> resample -> export)
//!                          +------------------+
//! ```
//!
//! # Result conventions
//!
//! Every facade operation returns `Result<Option<T>, MarketDataError>`:
//! - `Ok(Some(_))` - data
//! - `Ok(None)` - the absence value: a recovered transport failure or a
//!   "no data available" response, never an empty collection
//! - `Err(_)` - a configuration, lookup, shape, or unsupported-input
//!   failure that must not be ignored
//!
//! # Core Types
//!
//! - [`TimeSeries`] - time-indexed table, one row per timestamp
//! - [`CompanyProfile`] - cached company overview with typed accessors
//! - [`Granularity`] - closed enumeration of resampling bucket widths
//! - [`ApiClient`] - shared transport holding the immutable credential

pub mod errors;
pub mod export;
pub mod facade;
pub mod models;
pub mod normalize;
pub mod query;
pub mod resample;
pub mod transport;

// Re-export the model types
pub use models::{Cell, CompanyProfile, EarningsEvent, SeriesRow, TimeSeries};

// Re-export the facades and their catalogs
pub use facade::{
    CalendarHorizon, EconomicCalendar, EconomicIndicator, FundamentalIndicators, Interval,
    IntradayInterval, MovingAverageKind, OutputSize, SeriesType, TechnicalIndicators,
};

// Re-export the remaining public surface
pub use errors::MarketDataError;
pub use export::{write_csv, write_csv_to};
pub use query::QuerySpec;
pub use resample::{resample, Granularity};
pub use transport::{ApiClient, ApiClientBuilder, API_KEY_VAR, DEFAULT_BASE_URL};
