use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use screener_core::{AnalysisConfig, AnalysisReport, Mode, PriceSource};
use screener_data::{csv_loader, CsvDataProvider, PolygonClient};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "screener")]
#[command(about = "RSI and MACD momentum screener for stocks and options")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info", env = "SCREENER_LOG_LEVEL")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a CSV file of closing prices
    Analyze {
        /// Path to CSV data file
        #[arg(short, long)]
        data: PathBuf,

        #[command(flatten)]
        config: ConfigArgs,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch a ticker from Polygon.io and analyze it
    Fetch {
        /// Stock ticker or option contract (e.g. "AAPL", "O:SPY240719C00550000")
        #[arg(short, long)]
        ticker: String,

        /// stock: weekly bars over a year; option: daily bars over 90 days
        #[arg(short, long, default_value = "stock")]
        mode: Mode,

        #[arg(long, env = "POLYGON_API_KEY", hide_env_values = true)]
        api_key: String,

        #[command(flatten)]
        config: ConfigArgs,

        /// Print the full report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Start the API server
    Serve {
        /// Bind address
        #[arg(short, long, default_value = "0.0.0.0:3000")]
        bind: String,

        /// Serve `<DIR>/<SYMBOL>.csv` files
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Serve tickers from Polygon.io (ignored when --data-dir is given)
        #[arg(long, env = "POLYGON_API_KEY", hide_env_values = true)]
        api_key: Option<String>,

        #[command(flatten)]
        config: ConfigArgs,
    },

    /// Print the effective configuration as TOML
    Config {
        #[command(flatten)]
        config: ConfigArgs,
    },
}

/// Indicator settings: preset, then TOML file, then individual flags.
#[derive(Args)]
struct ConfigArgs {
    /// TOML file with analysis settings
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from the daily swing preset (MACD 8/21/9)
    #[arg(long, conflicts_with = "config")]
    daily_swing: bool,

    #[arg(long)]
    rsi_period: Option<usize>,

    #[arg(long)]
    macd_fast: Option<usize>,

    #[arg(long)]
    macd_slow: Option<usize>,

    #[arg(long)]
    macd_signal: Option<usize>,

    /// Inclusive lower bound of the RSI band
    #[arg(long)]
    rsi_band_low: Option<f64>,

    /// Inclusive upper bound of the RSI band
    #[arg(long)]
    rsi_band_high: Option<f64>,

    /// Also check for a fast EMA crossing above the slow EMA
    #[arg(long)]
    ema_crossover: bool,

    #[arg(long)]
    ema_fast: Option<usize>,

    #[arg(long)]
    ema_slow: Option<usize>,
}

impl ConfigArgs {
    fn resolve(&self) -> Result<AnalysisConfig> {
        let mut config = match &self.config {
            Some(path) => AnalysisConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None if self.daily_swing => AnalysisConfig::daily_swing(),
            None => AnalysisConfig::default(),
        };

        if let Some(period) = self.rsi_period {
            config.rsi_period = period;
        }
        if let Some(fast) = self.macd_fast {
            config.macd_fast = fast;
        }
        if let Some(slow) = self.macd_slow {
            config.macd_slow = slow;
        }
        if let Some(signal) = self.macd_signal {
            config.macd_signal = signal;
        }
        if let Some(low) = self.rsi_band_low {
            config.rsi_band_low = low;
        }
        if let Some(high) = self.rsi_band_high {
            config.rsi_band_high = high;
        }
        if self.ema_crossover {
            config.ema_crossover = true;
        }
        if let Some(fast) = self.ema_fast {
            config.ema_fast = fast;
        }
        if let Some(slow) = self.ema_slow {
            config.ema_slow = slow;
        }

        config.validate()?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { data, config, json } => {
            let config = config.resolve()?;
            run_analyze(data, &config, json)?;
        }
        Commands::Fetch {
            ticker,
            mode,
            api_key,
            config,
            json,
        } => {
            let config = config.resolve()?;
            run_fetch(&ticker, mode, api_key, &config, json).await?;
        }
        Commands::Serve {
            bind,
            data_dir,
            api_key,
            config,
        } => {
            let config = config.resolve()?;
            let source: Arc<dyn PriceSource> = match (data_dir, api_key) {
                (Some(dir), _) => Arc::new(CsvDataProvider::new(dir)),
                (None, Some(key)) => Arc::new(PolygonClient::new(key)?),
                (None, None) => anyhow::bail!("serve needs --data-dir or --api-key"),
            };
            tracing::info!(source = source.name(), "Price source configured");
            let state = screener_api::AppState::new(config).with_source(source);
            screener_api::start_server(state, &bind).await?;
        }
        Commands::Config { config } => {
            print!("{}", config.resolve()?.to_toml_string()?);
        }
    }

    Ok(())
}

fn run_analyze(data_path: PathBuf, config: &AnalysisConfig, json: bool) -> Result<()> {
    tracing::info!(data = %data_path.display(), "Analyzing CSV prices");

    let points = csv_loader::load_points_from_csv(&data_path)?;
    if points.is_empty() {
        tracing::warn!(data = %data_path.display(), "CSV file has no price rows");
    }

    let (series, result) = screener_engine::analyze_points(points, config)?;
    let report = AnalysisReport::new(&series, &result, config);
    print_report(&report, json)
}

async fn run_fetch(
    ticker: &str,
    mode: Mode,
    api_key: String,
    config: &AnalysisConfig,
    json: bool,
) -> Result<()> {
    let client = PolygonClient::new(api_key)?;
    let (series, result) = screener_engine::analyze_symbol(&client, ticker, mode, config).await?;
    let report = AnalysisReport::new(&series, &result, config).with_symbol(ticker, mode);
    print_report(&report, json)
}

fn print_report(report: &AnalysisReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    let label = match (&report.symbol, report.mode) {
        (Some(symbol), Some(mode)) => format!("{} ({})", symbol, mode),
        (Some(symbol), None) => symbol.clone(),
        _ => "Series".to_string(),
    };
    let last_close = report
        .last_close
        .map(|c| format!("{:.2}", c))
        .unwrap_or_else(|| "n/a".to_string());

    let sep = "=".repeat(60);
    println!("\n{sep}");
    println!(
        "  [{}] {}: {} points, last close {}",
        mark(report.any_condition_met),
        label,
        report.points,
        last_close
    );
    println!("{sep}");
    println!("  [{}] {}", mark(report.rsi.condition_met), report.rsi.summary);
    println!("  [{}] {}", mark(report.macd.condition_met), report.macd.summary);
    if let Some(ema) = &report.ema_crossover {
        println!("  [{}] {}", mark(ema.condition_met), ema.summary);
    }
    println!("{sep}\n");

    Ok(())
}

fn mark(met: bool) -> &'static str {
    if met {
        "PASS"
    } else {
        "FAIL"
    }
}
