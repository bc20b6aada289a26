use std::fmt;
use std::path::Path;

use anyhow::{Result, anyhow};

const MAX_IDENTIFIER_LEN: usize = 120;

/// A table name taken verbatim from a file stem and checked to be a plain
/// SQL identifier (`[A-Za-z_][A-Za-z0-9_]*`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Err(anyhow!("table name is empty"));
        }
        if raw.len() > MAX_IDENTIFIER_LEN {
            return Err(anyhow!(
                "table name {raw:?} is longer than {MAX_IDENTIFIER_LEN} bytes"
            ));
        }
        let mut chars = raw.chars();
        let first_ok = chars
            .next()
            .is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_');
        if !first_ok || !chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_') {
            return Err(anyhow!(
                "table name {raw:?} is not a valid identifier (letters, digits and '_' only, not starting with a digit)"
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn from_parquet_path(path: &Path) -> Result<Self> {
        let stem = path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| anyhow!("no usable file stem in {}", path.display()))?;
        Self::parse(stem)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn quoted(&self) -> String {
        // Validation rules out '"', so no escaping is needed.
        format!("\"{}\"", self.0)
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn sql_string_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}
