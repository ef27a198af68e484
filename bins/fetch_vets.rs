//! One-shot export of veterinary clinics from OpenStreetMap.
//!
//! ```text
//! fetch_vets --area "Bangkok" --output data/vets.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use service::geodata::{fetch_vets, DEFAULT_OVERPASS_URL};
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "fetch_vets", about = "Export veterinary clinics inside an area to JSON")]
struct Args {
    /// Administrative area name as tagged in OpenStreetMap.
    #[arg(long, default_value = "Bangkok")]
    area: String,

    #[arg(long, short, default_value = "data/vets.json")]
    output: PathBuf,

    #[arg(long, default_value = DEFAULT_OVERPASS_URL)]
    endpoint: String,

    /// Server-side query timeout in seconds.
    #[arg(long, default_value_t = 60)]
    timeout: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    common::utils::logging::init_logging_default();
    let args = Args::parse();

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(u64::from(args.timeout) + 30))
        .build()?;

    info!(area = %args.area, endpoint = %args.endpoint, "querying overpass");
    let vets = fetch_vets(&http, &args.endpoint, &args.area, args.timeout)
        .await
        .with_context(|| format!("overpass query for {} failed", args.area))?;

    if let Some(parent) = args.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let json = serde_json::to_string_pretty(&vets)?;
    tokio::fs::write(&args.output, json)
        .await
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!(count = vets.len(), output = %args.output.display(), "vet export written");
    Ok(())
}
