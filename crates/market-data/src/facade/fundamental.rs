//! Fundamental indicators facade.

use log::debug;
use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::{CompanyProfile, EarningsEvent, TimeSeries};
use crate::normalize;
use crate::query::QuerySpec;
use crate::transport::ApiClient;

/// Sampling interval for intraday price series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntradayInterval {
    /// 1 minute
    Min1,
    /// 5 minutes
    Min5,
    /// 15 minutes
    Min15,
    /// 30 minutes
    Min30,
    /// 60 minutes
    Min60,
}

impl IntradayInterval {
    /// Provider parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            IntradayInterval::Min1 => "1min",
            IntradayInterval::Min5 => "5min",
            IntradayInterval::Min15 => "15min",
            IntradayInterval::Min30 => "30min",
            IntradayInterval::Min60 => "60min",
        }
    }

    /// Key of the series object in the intraday response.
    fn series_key(self) -> String {
        format!("Time Series ({})", self.as_str())
    }
}

/// How much history an intraday request returns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputSize {
    /// Latest 100 data points
    Compact,
    /// Full available history
    Full,
}

impl OutputSize {
    /// Provider parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            OutputSize::Compact => "compact",
            OutputSize::Full => "full",
        }
    }
}

/// Horizon for the earnings calendar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CalendarHorizon {
    /// Next 3 months
    ThreeMonth,
    /// Next 6 months
    SixMonth,
    /// Next 12 months
    TwelveMonth,
}

impl CalendarHorizon {
    /// Provider parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            CalendarHorizon::ThreeMonth => "3month",
            CalendarHorizon::SixMonth => "6month",
            CalendarHorizon::TwelveMonth => "12month",
        }
    }
}

/// Facade over per-company fundamental data.
///
/// Constructed for one ticker; fetches the company overview once and
/// caches it for the facade's lifetime. The cached record is re-fetchable
/// on demand via [`refresh_profile`](Self::refresh_profile), and its typed
/// accessors (see [`CompanyProfile`]) never touch the network.
pub struct FundamentalIndicators {
    client: ApiClient,
    ticker: String,
    profile: CompanyProfile,
}

impl FundamentalIndicators {
    /// Construct the facade, fetching and caching the company overview.
    ///
    /// Returns `Ok(None)` if the overview could not be fetched due to a
    /// transport failure; the caller may re-attempt.
    pub async fn new(
        client: ApiClient,
        ticker: impl Into<String>,
    ) -> Result<Option<Self>, MarketDataError> {
        let ticker = ticker.into();
        match Self::fetch_profile(&client, &ticker).await? {
            Some(profile) => Ok(Some(Self {
                client,
                ticker,
                profile,
            })),
            None => Ok(None),
        }
    }

    async fn fetch_profile(
        client: &ApiClient,
        ticker: &str,
    ) -> Result<Option<CompanyProfile>, MarketDataError> {
        let query = QuerySpec::new("OVERVIEW").param("symbol", ticker);
        let Some(body) = client.get(&query).await else {
            return Ok(None);
        };
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::shape(format!("company overview: {e}")))?;
        if !normalize::screen_payload(&payload)? {
            return Ok(None);
        }
        let profile = normalize::company_profile(&payload)?;
        if profile.symbol().is_err() {
            return Err(MarketDataError::shape(format!(
                "no overview data for {ticker}"
            )));
        }
        debug!("cached company overview for {}", ticker);
        Ok(Some(profile))
    }

    /// The ticker this facade serves.
    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    /// The cached company overview.
    pub fn profile(&self) -> &CompanyProfile {
        &self.profile
    }

    /// Re-fetch the company overview on demand.
    ///
    /// Returns `true` if the cache was replaced, `false` on a transport
    /// failure (the previous cache is kept).
    pub async fn refresh_profile(&mut self) -> Result<bool, MarketDataError> {
        match Self::fetch_profile(&self.client, &self.ticker).await? {
            Some(profile) => {
                self.profile = profile;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Intraday price series at the given interval.
    ///
    /// Columns: open, high, low, close, volume. Returns `Ok(None)` on
    /// transport failure.
    pub async fn intraday(
        &self,
        interval: IntradayInterval,
        output_size: OutputSize,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new("TIME_SERIES_INTRADAY")
            .param("symbol", &self.ticker)
            .param("interval", interval.as_str())
            .param("outputsize", output_size.as_str());
        let Some(body) = self.client.get(&query).await else {
            return Ok(None);
        };
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::shape(format!("intraday series: {e}")))?;
        if !normalize::screen_payload(&payload)? {
            return Ok(None);
        }
        let table = normalize::date_keyed_table(&payload, &interval.series_key())?;
        debug!("fetched {} intraday rows for {}", table.len(), self.ticker);
        Ok(Some(table))
    }

    async fn statement(
        &self,
        function: &'static str,
        rows_key: &str,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new(function).param("symbol", &self.ticker);
        let Some(body) = self.client.get(&query).await else {
            return Ok(None);
        };
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::shape(format!("{function}: {e}")))?;
        if !normalize::screen_payload(&payload)? {
            return Ok(None);
        }
        normalize::value_rows(&payload, rows_key, "fiscalDateEnding").map(Some)
    }

    /// Annual income statements, one row per fiscal year.
    pub async fn income_statement(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.statement("INCOME_STATEMENT", "annualReports").await
    }

    /// Annual balance sheets, one row per fiscal year.
    pub async fn balance_sheet(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.statement("BALANCE_SHEET", "annualReports").await
    }

    /// Annual cash flow statements, one row per fiscal year.
    pub async fn cash_flow(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.statement("CASH_FLOW", "annualReports").await
    }

    /// Annual earnings, one row per fiscal year.
    pub async fn earnings(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.statement("EARNINGS", "annualEarnings").await
    }

    /// Upcoming earnings events for this ticker within the horizon.
    ///
    /// The provider answers in CSV; a header-only payload means no events
    /// are scheduled and yields `Ok(None)`, as does a transport failure.
    pub async fn earnings_calendar(
        &self,
        horizon: CalendarHorizon,
    ) -> Result<Option<Vec<EarningsEvent>>, MarketDataError> {
        let query = QuerySpec::new("EARNINGS_CALENDAR")
            .param("symbol", &self.ticker)
            .param("horizon", horizon.as_str());
        let Some(body) = self.client.get(&query).await else {
            return Ok(None);
        };
        normalize::earnings_calendar(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intraday_series_keys() {
        assert_eq!(IntradayInterval::Min1.series_key(), "Time Series (1min)");
        assert_eq!(IntradayInterval::Min60.series_key(), "Time Series (60min)");
    }

    #[test]
    fn test_calendar_horizon_parameters() {
        assert_eq!(CalendarHorizon::ThreeMonth.as_str(), "3month");
        assert_eq!(CalendarHorizon::TwelveMonth.as_str(), "12month");
    }

    #[test]
    fn test_intraday_url_shape() {
        let client = ApiClient::new("TESTKEY");
        let query = QuerySpec::new("TIME_SERIES_INTRADAY")
            .param("symbol", "AAPL")
            .param("interval", IntradayInterval::Min5.as_str())
            .param("outputsize", OutputSize::Compact.as_str());
        assert_eq!(
            client.url_for(&query),
            "https://www.alphavantage.co/query?function=TIME_SERIES_INTRADAY&symbol=AAPL&interval=5min&outputsize=compact&apikey=TESTKEY"
        );
    }
}
