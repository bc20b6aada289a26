use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use duckdb::{AccessMode, Config, Connection};
use tracing::{debug, info};

use crate::files;
use crate::identifier::{TableName, sql_string_literal};

pub const COLUMNAR_EXTENSION: &str = "parquet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedTable {
    pub table: TableName,
    pub source: PathBuf,
    pub rows: u64,
}

impl LoadedTable {
    pub fn report_line(&self) -> String {
        format!("Loaded {} ({} rows)", self.table, self.rows)
    }
}

#[derive(Debug, Clone)]
pub struct LoadSummary {
    pub db_path: PathBuf,
    pub tables: Vec<LoadedTable>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub name: String,
    pub rows: u64,
    pub columns: u64,
}

pub fn open_db(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create warehouse dir {}", parent.display()))?;
    }
    Connection::open(path).with_context(|| format!("open duckdb {}", path.display()))
}

pub fn open_read_only(path: &Path) -> Result<Connection> {
    if !path.is_file() {
        return Err(anyhow!("warehouse file {} does not exist", path.display()));
    }
    let config = Config::default()
        .access_mode(AccessMode::ReadOnly)
        .context("build read-only duckdb config")?;
    Connection::open_with_flags(path, config)
        .with_context(|| format!("open duckdb read-only {}", path.display()))
}

pub fn run_load<F>(db_path: &Path, dir: &Path, on_loaded: F) -> Result<LoadSummary>
where
    F: FnMut(&LoadedTable),
{
    let mut conn = open_db(db_path)?;
    let loaded = load_dir(&mut conn, dir, on_loaded);
    let closed = conn
        .close()
        .map_err(|(_, err)| err)
        .with_context(|| format!("close duckdb {}", db_path.display()));

    let tables = loaded?;
    closed?;
    Ok(LoadSummary {
        db_path: db_path.to_path_buf(),
        tables,
    })
}

/// Stops at the first failure: tables before it are already replaced, files
/// after it are not touched.
pub fn load_dir<F>(conn: &mut Connection, dir: &Path, mut on_loaded: F) -> Result<Vec<LoadedTable>>
where
    F: FnMut(&LoadedTable),
{
    let sources = files::list_with_extension(dir, COLUMNAR_EXTENSION)?;

    let mut out = Vec::with_capacity(sources.len());
    for source in sources {
        let table = TableName::from_parquet_path(&source)
            .with_context(|| format!("derive table name for {}", source.display()))?;
        let loaded = load_table(conn, &table, &source)
            .with_context(|| format!("load {} into table {table}", source.display()))?;
        on_loaded(&loaded);
        out.push(loaded);
    }
    Ok(out)
}

/// Drop and create share one transaction, so a failed create leaves the
/// previous table in place.
pub fn load_table(conn: &mut Connection, table: &TableName, source: &Path) -> Result<LoadedTable> {
    let source_str = source
        .to_str()
        .ok_or_else(|| anyhow!("path {} is not valid UTF-8", source.display()))?;
    let drop_sql = format!("DROP TABLE IF EXISTS {}", table.quoted());
    let create_sql = format!(
        "CREATE TABLE {} AS SELECT * FROM read_parquet({})",
        table.quoted(),
        sql_string_literal(source_str)
    );
    debug!(sql = %create_sql, "replacing table");

    let tx = conn.transaction().context("begin load transaction")?;
    tx.execute_batch(&drop_sql).context("drop previous table")?;
    tx.execute_batch(&create_sql)
        .context("create table from parquet")?;
    let rows = tx
        .query_row(&format!("SELECT COUNT(*) FROM {}", table.quoted()), [], |row| {
            row.get::<_, i64>(0)
        })
        .context("count loaded rows")?;
    tx.commit().context("commit load transaction")?;

    info!(table = %table, rows, "loaded");
    Ok(LoadedTable {
        table: table.clone(),
        source: source.to_path_buf(),
        rows: u64::try_from(rows).unwrap_or_default(),
    })
}

pub fn describe_tables(conn: &Connection) -> Result<Vec<TableStats>> {
    let mut stmt = conn
        .prepare(
            r#"
            SELECT t.table_name, COUNT(c.column_name)
            FROM information_schema.tables t
            LEFT JOIN information_schema.columns c
              ON c.table_schema = t.table_schema
             AND c.table_name = t.table_name
            WHERE t.table_schema = 'main'
              AND t.table_type = 'BASE TABLE'
            GROUP BY t.table_name
            ORDER BY t.table_name
            "#,
        )
        .context("prepare table listing")?;

    let rows = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
        })
        .context("query table listing")?;

    let mut listed = Vec::new();
    for row in rows {
        listed.push(row.context("decode table listing row")?);
    }
    drop(stmt);

    let mut out = Vec::with_capacity(listed.len());
    for (name, columns) in listed {
        let count_sql = format!("SELECT COUNT(*) FROM {}", quote_existing(&name));
        let rows = conn
            .query_row(&count_sql, [], |row| row.get::<_, i64>(0))
            .with_context(|| format!("count rows of {name}"))?;
        out.push(TableStats {
            name,
            rows: u64::try_from(rows).unwrap_or_default(),
            columns: u64::try_from(columns).unwrap_or_default(),
        });
    }
    Ok(out)
}

// Names read back from the catalog were not necessarily created by us.
fn quote_existing(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
