use anyhow::Result;

use crate::config::PipelineConfig;
use crate::convert::{self, ConvertOutcome, ConvertSummary};
use crate::warehouse::{self, LoadSummary, LoadedTable};

#[derive(Debug)]
pub struct PipelineSummary {
    pub convert: ConvertSummary,
    pub load: LoadSummary,
}

pub fn run_pipeline<C, L>(
    config: &PipelineConfig,
    on_convert: C,
    on_load: L,
) -> Result<PipelineSummary>
where
    C: FnMut(&ConvertOutcome),
    L: FnMut(&LoadedTable),
{
    let convert = convert::convert_dir(&config.raw_dir, &config.parquet_dir, on_convert)?;
    let load = warehouse::run_load(&config.db_path, &config.parquet_dir, on_load)?;
    Ok(PipelineSummary { convert, load })
}
