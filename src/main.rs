use analytics::{AprEngine, PositionReport, trailing_change};
use anyhow::Context;
use api_client::{SubgraphClient, VaultDataSource};
use cache::{FsStorage, SnapshotCache, SystemClock};
use chrono::{Duration, Utc};
use clap::{Parser, Subcommand};
use core_types::{OpenPosition, PriceHistory};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;

mod render;

type Cache = SnapshotCache<FsStorage, SystemClock>;

// Snapshot keys, one per cached endpoint.
const SHARE_PRICES_KEY: &str = "share_prices";
const OPEN_TRADES_KEY: &str = "open_trades";

/// The main entry point for the Argus dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Endpoint URLs live in .env; a missing file is fine in CI.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = configuration::load().context("failed to load configuration")?;

    let client = SubgraphClient::new(&settings.api);
    let cache = SnapshotCache::new(
        FsStorage::new(&settings.cache.data_dir),
        SystemClock,
        Duration::minutes(settings.cache.ttl_minutes as i64),
    );

    match cli.command {
        Commands::Prices(args) => handle_prices(args, &client, &cache).await,
        Commands::Apr(args) => handle_apr(args, &settings.apr, &client, &cache).await,
        Commands::Positions(args) => handle_positions(args, &client, &cache).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A terminal dashboard for the vault: share prices, APR modelling, open positions.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show trailing change metrics and recent share-price history.
    Prices(PricesArgs),
    /// Show the APR modelling table (smoothed annualized returns).
    Apr(AprArgs),
    /// Show open positions with unrealized PnL and open-interest aggregates.
    Positions(PositionsArgs),
}

#[derive(Parser)]
struct PricesArgs {
    /// How many recent days of history to list.
    #[arg(long, default_value_t = 30)]
    days: usize,

    /// Bypass the snapshot cache and fetch fresh data.
    #[arg(long)]
    refresh: bool,
}

#[derive(Parser)]
struct AprArgs {
    /// Override N, the largest return window in days.
    #[arg(long)]
    window_days: Option<usize>,

    /// Override K, the deepest smoothing depth.
    #[arg(long)]
    depth: Option<usize>,

    /// Bypass the snapshot cache and fetch fresh data.
    #[arg(long)]
    refresh: bool,
}

#[derive(Parser)]
struct PositionsArgs {
    /// Bypass the snapshot cache and fetch fresh data.
    #[arg(long)]
    refresh: bool,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_prices(
    args: PricesArgs,
    client: &SubgraphClient,
    cache: &Cache,
) -> anyhow::Result<()> {
    let history = load_share_prices(client, cache, args.refresh).await?;
    let today = Utc::now().date_naive();

    for (label, days) in [("24h", 1), ("7d", 7), ("15d", 15)] {
        println!(
            "{}",
            render::change_metric(label, trailing_change(&history, days, today))
        );
    }
    println!();
    println!("{}", render::price_history(&history, args.days));
    Ok(())
}

async fn handle_apr(
    args: AprArgs,
    apr_settings: &configuration::AprSettings,
    client: &SubgraphClient,
    cache: &Cache,
) -> anyhow::Result<()> {
    let history = load_share_prices(client, cache, args.refresh).await?;
    let n_max = args.window_days.unwrap_or(apr_settings.max_window_days);
    let k_max = args.depth.unwrap_or(apr_settings.max_smoothing_depth);

    let table = AprEngine::new().table(&history.prices(), n_max, k_max)?;

    println!("{}", render::apr_table(&table));
    println!();
    println!("n: how many days back are used to extrapolate the annualized return");
    println!("k: how many return observations feed the simple moving average");
    Ok(())
}

async fn handle_positions(
    args: PositionsArgs,
    client: &SubgraphClient,
    cache: &Cache,
) -> anyhow::Result<()> {
    let positions = load_open_positions(client, cache, args.refresh).await?;
    // Quotes are a live lookup; caching them would defeat the point.
    let quotes = client.latest_quotes().await?.value;

    let report = PositionReport::from_positions(positions, &quotes);

    println!(
        "Total Unrealized PnL: {}",
        render::usd(report.total_unrealized_pnl)
    );
    println!();
    println!("PnL by Pair");
    println!("{}", render::pnl_table("Pair", &report.pnl_by_pair));
    println!();
    println!("Open Interest by Pair");
    println!("{}", render::open_interest_table(&report.open_interest_by_pair));
    println!();
    println!("Positions");
    println!("{}", render::positions_table(&report.positions));
    println!();
    println!("PnL by Trader");
    println!("{}", render::pnl_table("Trader", &report.pnl_by_trader));
    Ok(())
}

// ==============================================================================
// Fetch-with-cache orchestration
// ==============================================================================

async fn load_share_prices(
    client: &SubgraphClient,
    cache: &Cache,
    refresh: bool,
) -> anyhow::Result<PriceHistory> {
    if !refresh {
        if let Some(body) = cache.fresh(SHARE_PRICES_KEY)? {
            debug!("using cached share prices");
            return Ok(api_client::decode_share_price_history(&body)?);
        }
    }

    match client.share_price_history().await {
        Ok(fetched) => {
            cache.store(SHARE_PRICES_KEY, &fetched.raw)?;
            Ok(fetched.value)
        }
        Err(fetch_error) => {
            warn!(error = %fetch_error, "share price fetch failed, falling back to the last snapshot");
            let body = cache.any(SHARE_PRICES_KEY)?.ok_or_else(|| {
                anyhow::anyhow!("fetch failed and no snapshot exists: {fetch_error}")
            })?;
            Ok(api_client::decode_share_price_history(&body)?)
        }
    }
}

async fn load_open_positions(
    client: &SubgraphClient,
    cache: &Cache,
    refresh: bool,
) -> anyhow::Result<Vec<OpenPosition>> {
    if !refresh {
        if let Some(body) = cache.fresh(OPEN_TRADES_KEY)? {
            debug!("using cached open positions");
            return Ok(api_client::decode_open_positions(&body)?);
        }
    }

    match client.open_positions().await {
        Ok(fetched) => {
            cache.store(OPEN_TRADES_KEY, &fetched.raw)?;
            Ok(fetched.value)
        }
        Err(fetch_error) => {
            warn!(error = %fetch_error, "open position fetch failed, falling back to the last snapshot");
            let body = cache.any(OPEN_TRADES_KEY)?.ok_or_else(|| {
                anyhow::anyhow!("fetch failed and no snapshot exists: {fetch_error}")
            })?;
            Ok(api_client::decode_open_positions(&body)?)
        }
    }
}
