use anyhow::Result;

use tm_warehouse::config::{self, PipelineConfig};
use tm_warehouse::{logging, pipeline};

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();
    let cfg = PipelineConfig::from_env();

    println!("Environment: {}", cfg.environment.label());
    println!("Raw CSV: {}", cfg.raw_dir.display());
    println!("Parquet: {}", cfg.parquet_dir.display());
    println!("DB: {}", cfg.db_path.display());

    let summary = pipeline::run_pipeline(
        &cfg,
        |outcome| println!("{}", outcome.report_line()),
        |table| println!("{}", table.report_line()),
    )?;

    println!(
        "Converted {}/{} files",
        summary.convert.converted, summary.convert.attempted
    );
    println!("Loaded {} tables", summary.load.tables.len());
    if summary.convert.skipped() > 0 {
        println!("Skipped: {}", summary.convert.skipped());
        if cfg.fail_on_skip {
            std::process::exit(1);
        }
    }
    Ok(())
}
