use std::fs::{self, File};
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use sha2::{Digest, Sha256};
use tracing::info;

use crate::http_client::http_client;

const HASH_CHUNK_BYTES: usize = 1024 * 1024;

// An existing file is returned as is; a download is only renamed into place
// once its digest matches.
pub fn ensure_db(local_path: &Path, asset_url: &str, sha_url: &str) -> Result<PathBuf> {
    if local_path.exists() {
        return Ok(local_path.to_path_buf());
    }
    if let Some(parent) = local_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("create dir {}", parent.display()))?;
    }
    let part = part_path(local_path);

    download_to(asset_url, &part)?;

    let expected = fetch_expected_digest(sha_url)?;
    let actual = sha256_file(&part)?;
    if actual != expected {
        let _ = fs::remove_file(&part);
        return Err(anyhow!(
            "checksum mismatch: expected SHA256 {expected} but got {actual}"
        ));
    }

    fs::rename(&part, local_path)
        .with_context(|| format!("move {} into place", part.display()))?;
    info!(path = %local_path.display(), "release database ready");
    Ok(local_path.to_path_buf())
}

pub fn sha256_file(path: &Path) -> Result<String> {
    let mut file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; HASH_CHUNK_BYTES];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    Ok(to_hex(&hasher.finalize()))
}

pub fn parse_checksum(raw: &str) -> Option<String> {
    let token = raw.split_whitespace().next()?;
    if token.len() != 64 || !token.chars().all(|ch| ch.is_ascii_hexdigit()) {
        return None;
    }
    Some(token.to_ascii_lowercase())
}

fn download_to(url: &str, out: &Path) -> Result<()> {
    let client = http_client()?;
    let mut resp = client
        .get(url)
        .send()
        .with_context(|| format!("request {url}"))?
        .error_for_status()
        .with_context(|| format!("download {url}"))?;

    let file = File::create(out).with_context(|| format!("create {}", out.display()))?;
    let mut writer = BufWriter::with_capacity(HASH_CHUNK_BYTES, file);
    let result = std::io::copy(&mut resp, &mut writer)
        .and_then(|_| writer.flush())
        .with_context(|| format!("write {}", out.display()));
    if result.is_err() {
        let _ = fs::remove_file(out);
    }
    result
}

fn fetch_expected_digest(sha_url: &str) -> Result<String> {
    let client = http_client()?;
    let body = client
        .get(sha_url)
        .send()
        .with_context(|| format!("request {sha_url}"))?
        .error_for_status()
        .with_context(|| format!("fetch checksum {sha_url}"))?
        .text()
        .context("read checksum body")?;
    parse_checksum(&body).ok_or_else(|| anyhow!("no SHA256 digest found at {sha_url}"))
}

fn part_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

fn to_hex(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}
