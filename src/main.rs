use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

use steam_ban_scanner::apis::steam::SteamBansClient;
use steam_ban_scanner::config::Config;
use steam_ban_scanner::error::ScannerError;
use steam_ban_scanner::fetcher::{BatchFetcher, RetryPolicy};
use steam_ban_scanner::filter::{make_report_rows, BanFilter};
use steam_ban_scanner::logging;
use steam_ban_scanner::mafile;
use steam_ban_scanner::rate_limiter::MinuteRateLimiter;
use steam_ban_scanner::report;

#[derive(Parser)]
#[command(name = "steam_ban_scanner")]
#[command(about = "Scans a folder of maFiles and reports Steam ban status")]
#[command(version = "0.1.0")]
struct Cli {
    /// Directory containing *.maFile credential files
    #[arg(long, default_value = "maFiles")]
    dir: PathBuf,

    /// Identifiers per API request
    #[arg(long)]
    chunk: Option<usize>,

    /// Keep only accounts banned within the last N days (default: any ban)
    #[arg(long)]
    days: Option<u32>,

    /// Output file for the SteamID line list
    #[arg(long, default_value = "steam_ids64.txt")]
    out_steamids: PathBuf,

    /// Output file for the raw API responses
    #[arg(long, default_value = "data.json")]
    out_json: PathBuf,

    /// Output file for the filtered ban list
    #[arg(long, default_value = "data_ban.json")]
    out_ban: PathBuf,

    /// Output file for the Excel report
    #[arg(long, default_value = "report.xlsx")]
    out_xlsx: PathBuf,

    /// Minimum requests per minute (overrides config and env RPM_MIN)
    #[arg(long)]
    rpm_min: Option<u32>,

    /// Maximum requests per minute (overrides config and env RPM_MAX)
    #[arg(long)]
    rpm_max: Option<u32>,
}

fn env_u32(name: &str) -> Option<u32> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    let cli = Cli::parse();

    // Resolve settings: defaults < config.toml < env < CLI flags
    let mut fetch = Config::load_or_default()?.fetch;
    if let Some(rpm) = env_u32("RPM_MIN") {
        fetch.min_rpm = rpm;
    }
    if let Some(rpm) = env_u32("RPM_MAX") {
        fetch.max_rpm = rpm;
    }
    if let Some(chunk) = cli.chunk {
        fetch.batch_size = chunk;
    }
    if let Some(rpm) = cli.rpm_min {
        fetch.min_rpm = rpm;
    }
    if let Some(rpm) = cli.rpm_max {
        fetch.max_rpm = rpm;
    }
    fetch.validate()?;

    let api_key = std::env::var("STEAM_API_KEY")
        .ok()
        .map(|key| key.trim().to_string())
        .filter(|key| !key.is_empty())
        .ok_or_else(|| {
            ScannerError::Config("no API key: set STEAM_API_KEY in the environment or .env".into())
        })?;

    // Step 1: Scan credential files
    let accounts = mafile::scan_dir(&cli.dir)?;
    if accounts.is_empty() {
        return Err(
            ScannerError::Config(format!("no valid maFile found in {}", cli.dir.display())).into(),
        );
    }
    let (steam_ids, logins) = mafile::index_accounts(&accounts);
    info!("found {} unique SteamIDs", steam_ids.len());
    println!("✅ Found {} unique SteamIDs", steam_ids.len());

    // Step 2: Save the identifier line list
    report::write_id_list(&steam_ids, &cli.out_steamids)?;

    // Step 3: Rate-limited batch fetch
    let limiter = MinuteRateLimiter::new(fetch.min_rpm, fetch.max_rpm)?;
    let retry = RetryPolicy::new(fetch.retries, Duration::from_secs_f64(fetch.backoff_seconds))?;
    let api = SteamBansClient::new(api_key, Duration::from_secs(fetch.timeout_seconds))?;
    let mut fetcher = BatchFetcher::new(api, limiter, retry);

    println!(
        "📡 Fetching ban status for {} account(s) ({} per batch, {}-{} requests/min)...",
        steam_ids.len(),
        fetch.batch_size,
        fetch.min_rpm,
        fetch.max_rpm
    );
    let players = fetcher.fetch_all(&steam_ids, fetch.batch_size).await?;
    println!("✅ Fetched {} ban record(s)", players.len());

    // Step 4: Raw aggregate
    report::write_json(&players, &cli.out_json)?;

    // Step 5: Filtered subset
    let rows = make_report_rows(&players, &logins, BanFilter::from_days_threshold(cli.days));
    report::write_json(&rows, &cli.out_ban)?;
    println!("🧮 {} record(s) matched the ban filter", rows.len());

    // Step 6: Spreadsheet
    report::write_xlsx(&players, &logins, &cli.out_xlsx)?;

    println!("🎉 Done");
    Ok(())
}
