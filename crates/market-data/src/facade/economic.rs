//! Economic calendar facade.

use serde_json::Value;

use crate::errors::MarketDataError;
use crate::models::TimeSeries;
use crate::normalize;
use crate::query::QuerySpec;
use crate::transport::ApiClient;

/// Catalog of economic series operations.
///
/// A closed enumeration: each entry maps to a fixed provider function
/// identifier and default parameters, so an unknown operation cannot be
/// requested at all.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EconomicIndicator {
    /// Real gross domestic product
    RealGdp,
    /// Real GDP per capita
    RealGdpPerCapita,
    /// Consumer price index
    ConsumerPriceIndex,
    /// Retail sales
    RetailSales,
    /// Unemployment rate
    UnemploymentRate,
    /// Nonfarm payroll
    NonfarmPayroll,
}

impl EconomicIndicator {
    /// Provider function identifier.
    pub fn function(self) -> &'static str {
        match self {
            EconomicIndicator::RealGdp => "REAL_GDP",
            EconomicIndicator::RealGdpPerCapita => "REAL_GDP_PER_CAPITA",
            EconomicIndicator::ConsumerPriceIndex => "CPI",
            EconomicIndicator::RetailSales => "RETAIL_SALES",
            EconomicIndicator::UnemploymentRate => "UNEMPLOYMENT",
            EconomicIndicator::NonfarmPayroll => "NONFARM_PAYROLL",
        }
    }

    /// Human-readable operation name.
    pub fn label(self) -> &'static str {
        match self {
            EconomicIndicator::RealGdp => "Real GDP",
            EconomicIndicator::RealGdpPerCapita => "Real GDP per capita",
            EconomicIndicator::ConsumerPriceIndex => "Consumer Price Index",
            EconomicIndicator::RetailSales => "Retail Sales",
            EconomicIndicator::UnemploymentRate => "Unemployment Rate",
            EconomicIndicator::NonfarmPayroll => "Nonfarm Payroll",
        }
    }

    /// Default reporting interval, for the series that take one.
    pub fn default_interval(self) -> Option<&'static str> {
        match self {
            EconomicIndicator::RealGdp => Some("annual"),
            EconomicIndicator::ConsumerPriceIndex => Some("monthly"),
            _ => None,
        }
    }
}

/// Facade over the provider's economic series endpoints.
///
/// Stateless aside from the shared client.
pub struct EconomicCalendar {
    client: ApiClient,
}

impl EconomicCalendar {
    /// Create the facade over a shared client.
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    fn query(indicator: EconomicIndicator, interval: Option<&str>) -> QuerySpec {
        let mut query = QuerySpec::new(indicator.function());
        if let Some(interval) = interval.or_else(|| indicator.default_interval()) {
            query = query.param("interval", interval);
        }
        query
    }

    /// Fetch an economic series.
    ///
    /// `interval` overrides the indicator's default reporting interval
    /// where one applies (e.g. `"quarterly"` for GDP, `"semiannual"` for
    /// CPI). Returns `Ok(None)` on transport failure.
    pub async fn fetch(
        &self,
        indicator: EconomicIndicator,
        interval: Option<&str>,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        let query = Self::query(indicator, interval);
        let Some(body) = self.client.get(&query).await else {
            return Ok(None);
        };
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| MarketDataError::shape(format!("{}: {e}", indicator.label())))?;
        if !normalize::screen_payload(&payload)? {
            return Ok(None);
        }
        normalize::value_rows(&payload, "data", "date").map(Some)
    }

    /// Real GDP at the given interval (`"annual"` or `"quarterly"`).
    pub async fn real_gdp(
        &self,
        interval: &str,
    ) -> Result<Option<TimeSeries>, MarketDataError> {
        self.fetch(EconomicIndicator::RealGdp, Some(interval)).await
    }

    /// Real GDP per capita.
    pub async fn real_gdp_per_capita(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.fetch(EconomicIndicator::RealGdpPerCapita, None).await
    }

    /// Consumer price index at the given interval (`"monthly"` or
    /// `"semiannual"`).
    pub async fn cpi(&self, interval: &str) -> Result<Option<TimeSeries>, MarketDataError> {
        self.fetch(EconomicIndicator::ConsumerPriceIndex, Some(interval))
            .await
    }

    /// Retail sales.
    pub async fn retail_sales(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.fetch(EconomicIndicator::RetailSales, None).await
    }

    /// Unemployment rate.
    pub async fn unemployment_rate(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.fetch(EconomicIndicator::UnemploymentRate, None).await
    }

    /// Nonfarm payroll.
    pub async fn nonfarm_payroll(&self) -> Result<Option<TimeSeries>, MarketDataError> {
        self.fetch(EconomicIndicator::NonfarmPayroll, None).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_function_identifiers() {
        assert_eq!(EconomicIndicator::RealGdp.function(), "REAL_GDP");
        assert_eq!(EconomicIndicator::ConsumerPriceIndex.function(), "CPI");
        assert_eq!(EconomicIndicator::UnemploymentRate.function(), "UNEMPLOYMENT");
        assert_eq!(EconomicIndicator::NonfarmPayroll.function(), "NONFARM_PAYROLL");
    }

    #[test]
    fn test_cpi_url_end_to_end() {
        // Facade configured with "TESTKEY", operation "Consumer Price
        // Index", interval "monthly".
        let client = ApiClient::new("TESTKEY");
        let query = EconomicCalendar::query(
            EconomicIndicator::ConsumerPriceIndex,
            Some("monthly"),
        );
        assert_eq!(
            client.url_for(&query),
            "https://www.alphavantage.co/query?function=CPI&interval=monthly&apikey=TESTKEY"
        );
    }

    #[test]
    fn test_default_intervals_apply() {
        let query = EconomicCalendar::query(EconomicIndicator::RealGdp, None);
        assert!(QuerySpec::to_url(&query, "B", "K").contains("interval=annual"));

        let query = EconomicCalendar::query(EconomicIndicator::RetailSales, None);
        assert_eq!(QuerySpec::to_url(&query, "B", "K"), "B?function=RETAIL_SALES&apikey=K");
    }

    #[test]
    fn test_interval_override_wins() {
        let query = EconomicCalendar::query(EconomicIndicator::RealGdp, Some("quarterly"));
        assert!(QuerySpec::to_url(&query, "B", "K").contains("interval=quarterly"));
    }
}
