use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One row of the earnings calendar (CSV endpoint).
///
/// Calendar rows are not a time series: report dates repeat across symbols,
/// so they are modeled as typed records rather than a [`TimeSeries`].
///
/// [`TimeSeries`]: crate::models::TimeSeries
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    /// Ticker symbol
    pub symbol: String,
    /// Company name
    pub name: String,
    /// Scheduled report date
    #[serde(rename = "reportDate")]
    pub report_date: NaiveDate,
    /// Fiscal period the report covers, when announced
    #[serde(rename = "fiscalDateEnding")]
    pub fiscal_date_ending: Option<NaiveDate>,
    /// Consensus EPS estimate, when available
    pub estimate: Option<Decimal>,
    /// Reporting currency, when available
    pub currency: Option<String>,
}
