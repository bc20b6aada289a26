use anyhow::{Context, Result};

use tm_warehouse::config::{self, PipelineConfig};
use tm_warehouse::{logging, release};

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();
    let cfg = PipelineConfig::from_env();

    let asset = cfg
        .release
        .as_ref()
        .context("RELEASE_DB_URL and RELEASE_DB_SHA256 must be set in environment")?;
    let path = release::ensure_db(&cfg.db_path, &asset.db_url, &asset.sha256_url)?;
    println!("DB ready at {}", path.display());
    Ok(())
}
