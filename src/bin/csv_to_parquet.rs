use anyhow::Result;

use tm_warehouse::config::{self, PipelineConfig};
use tm_warehouse::{args, convert, logging};

const USAGE: &str = "csv_to_parquet <raw_csv_dir> <parquet_dir>";

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();
    let cfg = PipelineConfig::from_env();

    let (src, dst) = args::two_paths(
        std::env::args().skip(1),
        USAGE,
        (cfg.raw_dir.clone(), cfg.parquet_dir.clone()),
    )?;

    let summary = convert::convert_dir(&src, &dst, |outcome| {
        println!("{}", outcome.report_line());
    })?;
    println!(
        "Converted {}/{} files",
        summary.converted, summary.attempted
    );

    if cfg.fail_on_skip && summary.skipped() > 0 {
        eprintln!(
            "{} file(s) skipped and CONVERT_FAIL_ON_SKIP is set",
            summary.skipped()
        );
        std::process::exit(1);
    }
    Ok(())
}
