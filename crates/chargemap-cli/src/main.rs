use anyhow::Context;
use clap::{Parser, Subcommand};

use chargemap_app::{availability_label, SessionState};
use chargemap_core::{format_distance, ChargingPoint, UserPosition};
use chargemap_datamall::{normalize_records, DataMallClient};

#[derive(Debug, Parser)]
#[command(name = "chargemap-cli")]
#[command(about = "EV charging availability from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the feed and print charging points
    Points {
        /// Rank by distance from this position, as "LAT,LNG"
        #[arg(long)]
        near: Option<String>,
        /// Filter by address, postal code, or operator substring
        #[arg(long, default_value = "")]
        search: String,
        /// Maximum number of rows to print
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Points {
            near,
            search,
            limit,
        } => points(near.as_deref(), &search, limit).await,
    }
}

async fn points(near: Option<&str>, search: &str, limit: usize) -> anyhow::Result<()> {
    let config = chargemap_core::load_app_config_from_env()?;
    let account_key = config
        .datamall_account_key
        .as_deref()
        .context("CHARGEMAP_DATAMALL_ACCOUNT_KEY is not set")?;

    let client = DataMallClient::with_base_url(
        account_key,
        config.feed_request_timeout_secs,
        &config.datamall_base_url,
    )?
    .with_retry_policy(config.feed_max_retries, config.feed_retry_backoff_base_ms);

    let raw = client.fetch_all().await?;
    let points = normalize_records(&raw);

    let mut session = SessionState::new();
    session.replace_points(points);
    if let Some(raw_position) = near {
        session.set_user_position(parse_near(raw_position)?);
    }

    let visible = session.visible_points(search);
    println!(
        "{} charging point{}",
        visible.len(),
        if visible.len() == 1 { "" } else { "s" }
    );
    for point in visible.iter().take(limit) {
        println!("{}", render_row(point));
    }
    Ok(())
}

/// Parses a `"LAT,LNG"` pair into a position.
fn parse_near(raw: &str) -> anyhow::Result<UserPosition> {
    let (lat, lng) = raw
        .split_once(',')
        .with_context(|| format!("expected LAT,LNG, got \"{raw}\""))?;
    let lat = lat
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid latitude \"{lat}\""))?;
    let lng = lng
        .trim()
        .parse::<f64>()
        .with_context(|| format!("invalid longitude \"{lng}\""))?;
    Ok(UserPosition { lat, lng })
}

fn render_row(point: &ChargingPoint) -> String {
    let mut row = format!("{} | {}", point.address, availability_label(point));
    if !point.postal_code.is_empty() {
        row.push_str(&format!(" | S{}", point.postal_code));
    }
    row.push_str(&format!(" | {}", point.operator));
    if let Some(km) = point.distance_km {
        row.push_str(&format!(" | {}", format_distance(km)));
    }
    row
}
