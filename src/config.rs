use std::path::PathBuf;

const DEFAULT_DEV_DB_PATH: &str = "warehouse/transfermarkt_serving.duckdb";
const DEFAULT_PROD_DB_PATH: &str = "/tmp/transfermarkt_serving.duckdb";
const DEFAULT_RAW_DIR: &str = "data/raw";
const DEFAULT_PARQUET_DIR: &str = "data/parquet";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Prod,
}

impl Environment {
    pub fn from_value(raw: Option<&str>) -> Self {
        match raw.map(|v| v.trim().to_ascii_lowercase()) {
            Some(v) if v == "prod" => Environment::Prod,
            _ => Environment::Dev,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Environment::Dev => "dev",
            Environment::Prod => "prod",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub db_url: String,
    pub sha256_url: String,
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub environment: Environment,
    pub db_path: PathBuf,
    pub raw_dir: PathBuf,
    pub parquet_dir: PathBuf,
    pub fail_on_skip: bool,
    pub release: Option<ReleaseAsset>,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = Environment::from_value(get("ENV").as_deref());
        let db_path = match environment {
            Environment::Prod => get("PROD_DB_PATH").unwrap_or_else(|| DEFAULT_PROD_DB_PATH.into()),
            Environment::Dev => get("DEV_DB_PATH").unwrap_or_else(|| DEFAULT_DEV_DB_PATH.into()),
        };
        let raw_dir = get("RAW_CSV_DIR").unwrap_or_else(|| DEFAULT_RAW_DIR.into());
        let parquet_dir = get("PARQUET_DIR").unwrap_or_else(|| DEFAULT_PARQUET_DIR.into());
        let fail_on_skip = get("CONVERT_FAIL_ON_SKIP").is_some_and(|v| is_truthy(&v));
        let release = match (get("RELEASE_DB_URL"), get("RELEASE_DB_SHA256")) {
            (Some(db_url), Some(sha256_url)) => Some(ReleaseAsset { db_url, sha256_url }),
            _ => None,
        };

        Self {
            environment,
            db_path: PathBuf::from(db_path.trim()),
            raw_dir: PathBuf::from(raw_dir.trim()),
            parquet_dir: PathBuf::from(parquet_dir.trim()),
            fail_on_skip,
            release,
        }
    }
}

pub fn load_dotenv() {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
