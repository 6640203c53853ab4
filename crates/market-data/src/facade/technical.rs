//! Technical indicators facade.
//!
//! All indicator math happens server-side at the provider; this facade
//! only names the operation, builds the query, and normalizes the nested
//! date-keyed response into a [`TimeSeries`].

use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::TimeSeries;
use crate::normalize;
use crate::query::QuerySpec;
use crate::transport::ApiClient;

/// Sampling interval for technical indicator series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interval {
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
    /// Daily
    Daily,
    /// Weekly
    Weekly,
    /// Monthly
    Monthly,
}

impl Interval {
    /// Provider parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            Interval::Min1 => "1min",
            Interval::Min5 => "5min",
            Interval::Min15 => "15min",
            Interval::Min30 => "30min",
            Interval::Min60 => "60min",
            Interval::Daily => "daily",
            Interval::Weekly => "weekly",
            Interval::Monthly => "monthly",
        }
    }
}

/// Which price series an indicator is computed over.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeriesType {
    /// Opening prices
    Open,
    /// High prices
    High,
    /// Low prices
    Low,
    /// Closing prices
    Close,
}

impl SeriesType {
    /// Provider parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            SeriesType::Open => "open",
            SeriesType::High => "high",
            SeriesType::Low => "low",
            SeriesType::Close => "close",
        }
    }
}

/// Moving average family supported by the provider.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MovingAverageKind {
    /// Simple moving average
    Sma,
    /// Exponential moving average
    Ema,
    /// Weighted moving average
    Wma,
    /// Double exponential moving average
    Dema,
    /// Triple exponential moving average
    Tema,
    /// Triangular moving average
    Trima,
    /// Kaufman adaptive moving average
    Kama,
    /// MESA adaptive moving average
    Mama,
    /// Triple exponential moving average (T3)
    T3,
}

impl MovingAverageKind {
    /// Provider function identifier.
    pub fn function(self) -> &'static str {
        match self {
            MovingAverageKind::Sma => "SMA",
            MovingAverageKind::Ema => "EMA",
            MovingAverageKind::Wma => "WMA",
            MovingAverageKind::Dema => "DEMA",
            MovingAverageKind::Tema => "TEMA",
            MovingAverageKind::Trima => "TRIMA",
            MovingAverageKind::Kama => "KAMA",
            MovingAverageKind::Mama => "MAMA",
            MovingAverageKind::T3 => "T3",
        }
    }
}

/// Facade over the provider's technical indicator endpoints.
///
/// Stateless aside from the shared client.
pub struct TechnicalIndicators {
    client: ApiClient,
}

impl TechnicalIndicators {
    /// Create the facade over a shared client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Key of the series object in an indicator response.
    fn series_key(function: &str) -> String {
        format!("Technical Analysis: {function}")
    }

    async fn fetch_indicator(
        &self,
        query: QuerySpec,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let function = query.function();
        let Some(body) = self.client.get(&query).await else {
            return Ok(None);
        };
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::shape(format!("{function}: {e}")))?;
        if !normalize::screen_payload(&payload)? {
            return Ok(None);
        }
        normalize::date_keyed_table(&payload, &Self::series_key(function)).map(Some)
    }

    /// A moving average series of the chosen family.
    pub async fn moving_average(
        &self,
        symbol: &str,
        kind: MovingAverageKind,
        interval: Interval,
        time_period: u32,
        series_type: SeriesType,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new(kind.function())
            .param("symbol", symbol)
            .param("interval", interval.as_str())
            .param("time_period", time_period.to_string())
            .param("series_type", series_type.as_str());
        self.fetch_indicator(query).await
    }

    /// Moving average convergence/divergence.
    pub async fn macd(
        &self,
        symbol: &str,
        interval: Interval,
        series_type: SeriesType,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new("MACD")
            .param("symbol", symbol)
            .param("interval", interval.as_str())
            .param("series_type", series_type.as_str());
        self.fetch_indicator(query).await
    }

    /// Stochastic oscillator.
    pub async fn stochastic(
        &self,
        symbol: &str,
        interval: Interval,
        series_type: SeriesType,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new("STOCH")
            .param("symbol", symbol)
            .param("interval", interval.as_str())
            .param("series_type", series_type.as_str());
        self.fetch_indicator(query).await
    }

    /// Relative strength index.
    pub async fn rsi(
        &self,
        symbol: &str,
        interval: Interval,
        time_period: u32,
        series_type: SeriesType,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new("RSI")
            .param("symbol", symbol)
            .param("interval", interval.as_str())
            .param("time_period", time_period.to_string())
            .param("series_type", series_type.as_str());
        self.fetch_indicator(query).await
    }

    /// Bollinger bands.
    pub async fn bollinger_bands(
        &self,
        symbol: &str,
        interval: Interval,
        time_period: u32,
        series_type: SeriesType,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new("BBANDS")
            .param("symbol", symbol)
            .param("interval", interval.as_str())
            .param("time_period", time_period.to_string())
            .param("series_type", series_type.as_str());
        self.fetch_indicator(query).await
    }

    /// Average true range.
    pub async fn average_true_range(
        &self,
        symbol: &str,
        interval: Interval,
        time_period: u32,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = QuerySpec::new("ATR")
            .param("symbol", symbol)
            .param("interval", interval.as_str())
            .param("time_period", time_period.to_string());
        self.fetch_indicator(query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moving_average_functions() {
        assert_eq!(MovingAverageKind::Sma.function(), "SMA");
        assert_eq!(MovingAverageKind::Kama.function(), "KAMA");
        assert_eq!(MovingAverageKind::T3.function(), "T3");
    }

    #[test]
    fn test_series_key_format() {
        assert_eq!(
            TechnicalIndicators::series_key("RSI"),
            "Technical Analysis: RSI"
        );
    }

    #[test]
    fn test_rsi_url_shape() {
        let client = ApiClient::new("TESTKEY");
        let query = QuerySpec::new("RSI")
            .param("symbol", "AAPL")
            .param("interval", Interval::Daily.as_str())
            .param("time_period", "14")
            .param("series_type", SeriesType::Close.as_str());
        assert_eq!(
            client.url_for(&query),
            "https://www.alphavantage.co/query?function=RSI&symbol=AAPL&interval=daily&time_period=14&series_type=close&apikey=TESTKEY"
        );
    }
}
