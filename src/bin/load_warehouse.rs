use anyhow::Result;

use tm_warehouse::config::{self, PipelineConfig};
use tm_warehouse::{args, logging, warehouse};

const USAGE: &str = "load_warehouse <db_path> <parquet_dir>";

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();
    let cfg = PipelineConfig::from_env();

    let (db_path, parquet_dir) = args::two_paths(
        std::env::args().skip(1),
        USAGE,
        (cfg.db_path.clone(), cfg.parquet_dir.clone()),
    )?;

    let summary = warehouse::run_load(&db_path, &parquet_dir, |table| {
        println!("{}", table.report_line());
    })?;
    println!(
        "Loaded {} tables into {}",
        summary.tables.len(),
        summary.db_path.display()
    );
    Ok(())
}
