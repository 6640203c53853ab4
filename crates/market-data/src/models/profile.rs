use serde::{Deserialize, Serialize};

use crate::errors::MarketDataError;

/// Company overview record from the provider's OVERVIEW endpoint.
///
/// Fetched once when a `FundamentalIndicators` facade is constructed and
/// cached for the facade's lifetime. Every field the provider may omit is
/// optional; the typed accessors below are pure lookups into the cached
/// record and fail with [`MarketDataError::FieldNotFound`] naming the field
/// when it is absent. They never trigger a network re-fetch.
///
/// All values are kept as the provider's strings, unchanged.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    // Company identification
    #[serde(rename = "Symbol")]
    symbol: Option<String>,
    #[serde(rename = "AssetType")]
    asset_type: Option<String>,
    #[serde(rename = "Name")]
    name: Option<String>,
    #[serde(rename = "Description")]
    description: Option<String>,
    #[serde(rename = "Exchange")]
    exchange: Option<String>,
    #[serde(rename = "Currency")]
    currency: Option<String>,
    #[serde(rename = "Country")]
    country: Option<String>,
    #[serde(rename = "Sector")]
    sector: Option<String>,
    #[serde(rename = "Industry")]
    industry: Option<String>,

    // Size and profitability
    #[serde(rename = "MarketCapitalization")]
    market_capitalization: Option<String>,
    #[serde(rename = "EBITDA")]
    ebitda: Option<String>,
    #[serde(rename = "ProfitMargin")]
    profit_margin: Option<String>,
    #[serde(rename = "OperatingMarginTTM")]
    operating_margin_ttm: Option<String>,
    #[serde(rename = "ReturnOnAssetsTTM")]
    return_on_assets_ttm: Option<String>,
    #[serde(rename = "ReturnOnEquityTTM")]
    return_on_equity_ttm: Option<String>,
    #[serde(rename = "RevenueTTM")]
    revenue_ttm: Option<String>,
    #[serde(rename = "GrossProfitTTM")]
    gross_profit_ttm: Option<String>,
    #[serde(rename = "QuarterlyEarningsGrowthYOY")]
    quarterly_earnings_growth_yoy: Option<String>,
    #[serde(rename = "QuarterlyRevenueGrowthYOY")]
    quarterly_revenue_growth_yoy: Option<String>,

    // Valuation ratios
    #[serde(rename = "PERatio")]
    pe_ratio: Option<String>,
    #[serde(rename = "PEGRatio")]
    peg_ratio: Option<String>,
    #[serde(rename = "EPS")]
    eps: Option<String>,
    #[serde(rename = "BookValue")]
    book_value: Option<String>,
    #[serde(rename = "TrailingPE")]
    trailing_pe: Option<String>,
    #[serde(rename = "ForwardPE")]
    forward_pe: Option<String>,
    #[serde(rename = "PriceToSalesRatioTTM")]
    price_to_sales_ratio_ttm: Option<String>,
    #[serde(rename = "PriceToBookRatio")]
    price_to_book_ratio: Option<String>,
    #[serde(rename = "AnalystTargetPrice")]
    analyst_target_price: Option<String>,
    #[serde(rename = "Beta")]
    beta: Option<String>,

    // Dividends
    #[serde(rename = "DividendPerShare")]
    dividend_per_share: Option<String>,
    #[serde(rename = "DividendYield")]
    dividend_yield: Option<String>,
    #[serde(rename = "DividendDate")]
    dividend_date: Option<String>,
    #[serde(rename = "ExDividendDate")]
    ex_dividend_date: Option<String>,

    // Price levels
    #[serde(rename = "52WeekHigh")]
    week_52_high: Option<String>,
    #[serde(rename = "52WeekLow")]
    week_52_low: Option<String>,
    #[serde(rename = "50DayMovingAverage")]
    day_50_moving_average: Option<String>,
    #[serde(rename = "200DayMovingAverage")]
    day_200_moving_average: Option<String>,
    #[serde(rename = "SharesOutstanding")]
    shares_outstanding: Option<String>,
}

/// Pure lookup: the field's value, or a lookup error naming it.
fn require<'a>(
    field: &'static str,
    value: &'a Option<String>,
) -> Result<&'a str, MarketDataError> {
    value
        .as_deref()
        .ok_or_else(|| MarketDataError::FieldNotFound {
            field: field.to_string(),
        })
}

macro_rules! accessor {
    ($(#[$doc:meta])* $method:ident, $field:ident, $name:literal) => {
        $(#[$doc])*
        pub fn $method(&self) -> Result<&str, MarketDataError> {
            require($name, &self.$field)
        }
    };
}

impl CompanyProfile {
    accessor!(/// Ticker symbol.
        symbol, symbol, "Symbol");
    accessor!(/// Asset type (e.g. "Common Stock").
        asset_type, asset_type, "AssetType");
    accessor!(/// Full company name.
        name, name, "Name");
    accessor!(/// Business description.
        description, description, "Description");
    accessor!(/// Listing exchange.
        exchange, exchange, "Exchange");
    accessor!(/// Reporting currency.
        currency, currency, "Currency");
    accessor!(/// Country of domicile.
        country, country, "Country");
    accessor!(/// Business sector.
        sector, sector, "Sector");
    accessor!(/// Industry within the sector.
        industry, industry, "Industry");
    accessor!(/// Market capitalization.
        market_cap, market_capitalization, "MarketCapitalization");
    accessor!(/// EBITDA.
        ebitda, ebitda, "EBITDA");
    accessor!(/// Profit margin.
        profit_margin, profit_margin, "ProfitMargin");
    accessor!(/// Operating margin, trailing twelve months.
        operating_margin, operating_margin_ttm, "OperatingMarginTTM");
    accessor!(/// Return on assets, trailing twelve months.
        return_on_assets, return_on_assets_ttm, "ReturnOnAssetsTTM");
    accessor!(/// Return on equity, trailing twelve months.
        return_on_equity, return_on_equity_ttm, "ReturnOnEquityTTM");
    accessor!(/// Revenue, trailing twelve months.
        revenue, revenue_ttm, "RevenueTTM");
    accessor!(/// Gross profit, trailing twelve months.
        gross_profit, gross_profit_ttm, "GrossProfitTTM");
    accessor!(/// Quarterly earnings growth, year over year.
        quarterly_earnings_growth, quarterly_earnings_growth_yoy, "QuarterlyEarningsGrowthYOY");
    accessor!(/// Quarterly revenue growth, year over year.
        quarterly_revenue_growth, quarterly_revenue_growth_yoy, "QuarterlyRevenueGrowthYOY");
    accessor!(/// Price-to-earnings ratio.
        pe_ratio, pe_ratio, "PERatio");
    accessor!(/// PEG ratio.
        peg_ratio, peg_ratio, "PEGRatio");
    accessor!(/// Earnings per share.
        eps, eps, "EPS");
    accessor!(/// Book value per share.
        book_value, book_value, "BookValue");
    accessor!(/// Trailing price-to-earnings ratio.
        trailing_pe, trailing_pe, "TrailingPE");
    accessor!(/// Forward price-to-earnings ratio.
        forward_pe, forward_pe, "ForwardPE");
    accessor!(/// Price-to-sales ratio, trailing twelve months.
        price_to_sales_ratio, price_to_sales_ratio_ttm, "PriceToSalesRatioTTM");
    accessor!(/// Price-to-book ratio.
        price_to_book_ratio, price_to_book_ratio, "PriceToBookRatio");
    accessor!(/// Analyst consensus target price.
        analyst_target_price, analyst_target_price, "AnalystTargetPrice");
    accessor!(/// Beta against the market.
        beta, beta, "Beta");
    accessor!(/// Dividend per share.
        dividend_per_share, dividend_per_share, "DividendPerShare");
    accessor!(/// Dividend yield.
        dividend_yield, dividend_yield, "DividendYield");
    accessor!(/// Next dividend payment date.
        dividend_date, dividend_date, "DividendDate");
    accessor!(/// Ex-dividend date.
        ex_dividend_date, ex_dividend_date, "ExDividendDate");
    accessor!(/// 52-week high price.
        week_52_high, week_52_high, "52WeekHigh");
    accessor!(/// 52-week low price.
        week_52_low, week_52_low, "52WeekLow");
    accessor!(/// 50-day moving average price.
        day_50_moving_average, day_50_moving_average, "50DayMovingAverage");
    accessor!(/// 200-day moving average price.
        day_200_moving_average, day_200_moving_average, "200DayMovingAverage");
    accessor!(/// Shares outstanding.
        shares_outstanding, shares_outstanding, "SharesOutstanding");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_present_field_is_returned_unchanged() {
        let profile = CompanyProfile {
            name: Some("Apple Inc".to_string()),
            ..Default::default()
        };
        assert_eq!(profile.name().unwrap(), "Apple Inc");
    }

    #[test]
    fn test_absent_field_fails_naming_the_field() {
        let profile = CompanyProfile::default();
        match profile.market_cap() {
            Err(MarketDataError::FieldNotFound { field }) => {
                assert_eq!(field, "MarketCapitalization");
            }
            other => panic!("expected FieldNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_deserializes_provider_field_names() {
        let payload = serde_json::json!({
            "Symbol": "AAPL",
            "Name": "Apple Inc",
            "PERatio": "28.5",
            "52WeekHigh": "199.62"
        });
        let profile: CompanyProfile = serde_json::from_value(payload).unwrap();
        assert_eq!(profile.symbol().unwrap(), "AAPL");
        assert_eq!(profile.pe_ratio().unwrap(), "28.5");
        assert_eq!(profile.week_52_high().unwrap(), "199.62");
        assert!(profile.sector().is_err());
    }
}
