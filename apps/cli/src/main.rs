//! finboard — command-line caller for the market data layer.
//!
//! Commands:
//! - `overview` — print the cached company overview for a ticker
//! - `intraday` — fetch an intraday price series, optionally resampled
//!   and exported to CSV
//! - `econ` — fetch an economic series (CPI, GDP, ...)
//! - `rsi` — fetch the relative strength index for a ticker

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use finboard_market_data::{
    export, resample, ApiClient, EconomicCalendar, EconomicIndicator, FundamentalIndicators,
    Granularity, Interval, IntradayInterval, OutputSize, SeriesType, TechnicalIndicators,
    TimeSeries,
};

#[derive(Parser)]
#[command(name = "finboard", about = "Financial dashboard data fetcher")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the company overview for a ticker.
    Overview {
        /// Ticker symbol (e.g. AAPL).
        ticker: String,
    },

    /// Fetch an intraday price series.
    Intraday {
        /// Ticker symbol (e.g. AAPL).
        ticker: String,

        /// Sampling interval: 1min, 5min, 15min, 30min, 60min.
        #[arg(long, default_value = "1min")]
        interval: String,

        /// Resample to a coarser granularity (5min..4h, 1d, 1w, 1m).
        #[arg(long)]
        resample: Option<String>,

        /// Write the (resampled) series to a CSV file.
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Fetch an economic series.
    Econ {
        /// Series name: real-gdp, gdp-per-capita, cpi, retail-sales,
        /// unemployment, nonfarm-payroll.
        indicator: String,

        /// Reporting interval, where the series takes one.
        #[arg(long)]
        interval: Option<String>,
    },

    /// Fetch the relative strength index for a ticker.
    Rsi {
        /// Ticker symbol (e.g. AAPL).
        ticker: String,

        /// Sampling interval: 1min..60min, daily, weekly, monthly.
        #[arg(long, default_value = "daily")]
        interval: String,

        /// Lookback period in data points.
        #[arg(long, default_value_t = 14)]
        time_period: u32,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn parse_intraday_interval(label: &str) -> Result<IntradayInterval> {
    Ok(match label {
        "1min" => IntradayInterval::Min1,
        "5min" => IntradayInterval::Min5,
        "15min" => IntradayInterval::Min15,
        "30min" => IntradayInterval::Min30,
        "60min" => IntradayInterval::Min60,
        other => bail!("unknown intraday interval: {other}"),
    })
}

fn parse_interval(label: &str) -> Result<Interval> {
    Ok(match label {
        "1min" => Interval::Min1,
        "5min" => Interval::Min5,
        "15min" => Interval::Min15,
        "30min" => Interval::Min30,
        "60min" => Interval::Min60,
        "daily" => Interval::Daily,
        "weekly" => Interval::Weekly,
        "monthly" => Interval::Monthly,
        other => bail!("unknown interval: {other}"),
    })
}

fn parse_indicator(label: &str) -> Result<EconomicIndicator> {
    Ok(match label {
        "real-gdp" => EconomicIndicator::RealGdp,
        "gdp-per-capita" => EconomicIndicator::RealGdpPerCapita,
        "cpi" => EconomicIndicator::ConsumerPriceIndex,
        "retail-sales" => EconomicIndicator::RetailSales,
        "unemployment" => EconomicIndicator::UnemploymentRate,
        "nonfarm-payroll" => EconomicIndicator::NonfarmPayroll,
        other => bail!("unknown economic series: {other}"),
    })
}

/// Print the first rows of a series as an aligned table.
fn print_series(series: &TimeSeries, limit: usize) {
    print!("{:<25}", "timestamp");
    for column in series.columns() {
        print!(" | {:<12}", column);
    }
    println!();

    for row in series.rows().iter().take(limit) {
        print!("{:<25}", row.timestamp().format("%Y-%m-%d %H:%M:%S"));
        for cell in row.values() {
            print!(" | {:<12}", cell.to_string());
        }
        println!();
    }
    if series.len() > limit {
        println!("... {} more rows", series.len() - limit);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let client = ApiClient::from_env()?;

    match cli.command {
        Commands::Overview { ticker } => {
            let Some(fundamentals) = FundamentalIndicators::new(client, &ticker).await? else {
                bail!("no overview returned for {ticker} (transport failure or throttled)");
            };
            let profile = fundamentals.profile();
            println!("{} ({})", profile.name()?, profile.symbol()?);
            println!("{} / {}", profile.sector()?, profile.industry()?);
            println!("Market cap: {}", profile.market_cap()?);
            println!("P/E: {}", profile.pe_ratio()?);
            println!();
            println!("{}", profile.description()?);
        }

        Commands::Intraday {
            ticker,
            interval,
            resample: target,
            export: path,
        } => {
            let interval = parse_intraday_interval(&interval)?;
            // An unsupported granularity fails here, before any request.
            let target = target
                .as_deref()
                .map(str::parse::<Granularity>)
                .transpose()?;

            let Some(fundamentals) = FundamentalIndicators::new(client, &ticker).await? else {
                bail!("no overview returned for {ticker} (transport failure or throttled)");
            };
            let Some(series) = fundamentals.intraday(interval, OutputSize::Compact).await? else {
                bail!("no intraday data returned for {ticker}");
            };

            let series = match target {
                Some(granularity) => resample::resample(&series, granularity)?,
                None => series,
            };

            print_series(&series, 10);
            if let Some(path) = path {
                export::write_csv(&series, &path)
                    .with_context(|| format!("writing {}", path.display()))?;
                println!("wrote {} rows to {}", series.len(), path.display());
            }
        }

        Commands::Econ {
            indicator,
            interval,
        } => {
            let indicator = parse_indicator(&indicator)?;
            let calendar = EconomicCalendar::new(client);
            let Some(series) = calendar.fetch(indicator, interval.as_deref()).await? else {
                bail!("no data returned for {}", indicator.label());
            };
            println!("{}", indicator.label());
            print_series(&series, 12);
        }

        Commands::Rsi {
            ticker,
            interval,
            time_period,
        } => {
            let interval = parse_interval(&interval)?;
            let technicals = TechnicalIndicators::new(client);
            let Some(series) = technicals
                .rsi(&ticker, interval, time_period, SeriesType::Close)
                .await?
            else {
                bail!("no RSI data returned for {ticker}");
            };
            print_series(&series, 12);
        }
    }

    Ok(())
}
