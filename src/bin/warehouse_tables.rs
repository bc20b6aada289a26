use std::path::PathBuf;

use anyhow::{Result, anyhow};

use tm_warehouse::config::{self, PipelineConfig};
use tm_warehouse::{logging, warehouse};

fn main() -> Result<()> {
    config::load_dotenv();
    logging::init();
    let cfg = PipelineConfig::from_env();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let db_path = match args.as_slice() {
        [] => cfg.db_path.clone(),
        [path] => PathBuf::from(path),
        _ => return Err(anyhow!("usage: warehouse_tables [db_path]")),
    };

    let conn = warehouse::open_read_only(&db_path)?;
    let tables = warehouse::describe_tables(&conn)?;
    println!("DB: {}", db_path.display());
    for table in &tables {
        println!(
            "{:<40} rows={:<10} columns={}",
            table.name, table.rows, table.columns
        );
    }
    println!("Tables: {}", tables.len());
    Ok(())
}
