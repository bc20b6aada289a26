use std::fs::{self, File};
use std::io::{Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::csv::ReaderBuilder;
use arrow::csv::reader::Format;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::error::ArrowError;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, ZstdLevel};
use parquet::errors::ParquetError;
use parquet::file::properties::WriterProperties;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::files;

// Later rows that do not fit the inferred types fail the file.
pub const INFER_SCHEMA_ROWS: usize = 10_000;
pub const SOURCE_EXTENSION: &str = "csv";
pub const OUTPUT_EXTENSION: &str = "parquet";

const BATCH_SIZE: usize = 8192;

#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parse error: {0}")]
    Parse(ArrowError),
    #[error("no columns found (empty file?)")]
    NoColumns,
    #[error("cannot write {}: {source}", path.display())]
    WriteIo {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("parquet write error: {0}")]
    Write(ParquetError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub rows: usize,
    pub columns: usize,
}

#[derive(Debug)]
pub enum ConvertOutcome {
    Converted(ConvertedFile),
    Skipped { source: PathBuf, error: ConvertError },
}

impl ConvertOutcome {
    pub fn is_converted(&self) -> bool {
        matches!(self, ConvertOutcome::Converted(_))
    }

    pub fn report_line(&self) -> String {
        match self {
            ConvertOutcome::Converted(file) => format!(
                "ok: {} ({} rows, {} columns)",
                display_name(&file.output),
                file.rows,
                file.columns
            ),
            ConvertOutcome::Skipped { source, error } => {
                format!("skip: {} - {error}", display_name(source))
            }
        }
    }
}

#[derive(Debug)]
pub struct ConvertSummary {
    pub attempted: usize,
    pub converted: usize,
    pub outcomes: Vec<ConvertOutcome>,
}

impl ConvertSummary {
    pub fn skipped(&self) -> usize {
        self.attempted - self.converted
    }
}

/// Only setting up `dst` and listing `src` can fail the run. A file that
/// cannot be parsed or written is reported through `on_outcome` and skipped.
pub fn convert_dir<F>(src: &Path, dst: &Path, mut on_outcome: F) -> Result<ConvertSummary>
where
    F: FnMut(&ConvertOutcome),
{
    fs::create_dir_all(dst).with_context(|| format!("create output dir {}", dst.display()))?;
    let sources = files::list_with_extension(src, SOURCE_EXTENSION)?;

    let mut outcomes = Vec::with_capacity(sources.len());
    let mut converted = 0usize;
    for source in sources {
        let outcome = match convert_file(&source, dst) {
            Ok(file) => {
                info!(
                    source = %source.display(),
                    rows = file.rows,
                    columns = file.columns,
                    "converted"
                );
                converted += 1;
                ConvertOutcome::Converted(file)
            }
            Err(error) => {
                warn!(source = %source.display(), %error, "skipped");
                ConvertOutcome::Skipped { source, error }
            }
        };
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    Ok(ConvertSummary {
        attempted: outcomes.len(),
        converted,
        outcomes,
    })
}

/// Writes to a temporary sibling and renames into place, so a failure never
/// replaces a previous good file.
pub fn convert_file(source: &Path, dst_dir: &Path) -> Result<ConvertedFile, ConvertError> {
    let output = output_path(source, dst_dir);
    let tmp = output.with_extension("parquet.tmp");

    let result = write_parquet(source, &tmp).and_then(|(rows, columns)| {
        fs::rename(&tmp, &output).map_err(|source| ConvertError::WriteIo {
            path: output.clone(),
            source,
        })?;
        Ok((rows, columns))
    });

    match result {
        Ok((rows, columns)) => Ok(ConvertedFile {
            source: source.to_path_buf(),
            output,
            rows,
            columns,
        }),
        Err(err) => {
            let _ = fs::remove_file(&tmp);
            Err(err)
        }
    }
}

pub fn output_path(source: &Path, dst_dir: &Path) -> PathBuf {
    let stem = source.file_stem().unwrap_or(source.as_os_str());
    let mut name = stem.to_os_string();
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    dst_dir.join(name)
}

fn write_parquet(source: &Path, out: &Path) -> Result<(usize, usize), ConvertError> {
    let read_err = |err: std::io::Error| ConvertError::Read {
        path: source.to_path_buf(),
        source: err,
    };

    let mut input = File::open(source).map_err(read_err)?;
    let format = Format::default().with_header(true);
    let (schema, sampled) = format
        .infer_schema(&mut input, Some(INFER_SCHEMA_ROWS))
        .map_err(ConvertError::Parse)?;
    if schema.fields().is_empty() {
        return Err(ConvertError::NoColumns);
    }
    let schema = untyped_as_text(&schema);
    debug!(source = %source.display(), sampled, schema = ?schema, "inferred schema");
    input.seek(SeekFrom::Start(0)).map_err(read_err)?;

    let schema = Arc::new(schema);
    let columns = schema.fields().len();
    let reader = ReaderBuilder::new(schema.clone())
        .with_header(true)
        .with_batch_size(BATCH_SIZE)
        .build(input)
        .map_err(ConvertError::Parse)?;

    let out_file = File::create(out).map_err(|source| ConvertError::WriteIo {
        path: out.to_path_buf(),
        source,
    })?;
    let props = WriterProperties::builder()
        .set_compression(Compression::ZSTD(ZstdLevel::default()))
        .build();
    let mut writer =
        ArrowWriter::try_new(out_file, schema, Some(props)).map_err(ConvertError::Write)?;

    let mut rows = 0usize;
    for batch in reader {
        let batch = batch.map_err(ConvertError::Parse)?;
        rows += batch.num_rows();
        writer.write(&batch).map_err(ConvertError::Write)?;
    }
    writer.close().map_err(ConvertError::Write)?;

    Ok((rows, columns))
}

// A column empty in every sampled row is inferred as Null, which would drop
// any value after the sample. Read it as text instead.
fn untyped_as_text(schema: &Schema) -> Schema {
    let fields = schema
        .fields()
        .iter()
        .map(|field| match field.data_type() {
            DataType::Null => Field::new(field.name(), DataType::Utf8, true),
            _ => field.as_ref().clone(),
        })
        .collect::<Vec<_>>();
    Schema::new_with_metadata(fields, schema.metadata().clone())
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use arrow::datatypes::{DataType, Field, Schema};

    use super::{output_path, untyped_as_text};

    #[test]
    fn output_keeps_stem_and_swaps_extension() {
        assert_eq!(
            output_path(Path::new("/raw/mart_player_season.csv"), Path::new("/pq")),
            Path::new("/pq/mart_player_season.parquet")
        );
        assert_eq!(
            output_path(Path::new("/raw/games.2024.csv"), Path::new("out")),
            Path::new("out/games.2024.parquet")
        );
    }

    #[test]
    fn null_columns_become_nullable_text() {
        let inferred = Schema::new(vec![
            Field::new("player_id", DataType::Int64, true),
            Field::new("agent_name", DataType::Null, true),
        ]);
        let schema = untyped_as_text(&inferred);
        assert_eq!(schema.field(0).data_type(), &DataType::Int64);
        assert_eq!(schema.field(1).data_type(), &DataType::Utf8);
        assert!(schema.field(1).is_nullable());
        assert_eq!(schema.field(1).name(), "agent_name");
    }
}
