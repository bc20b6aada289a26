use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const CONNECT_TIMEOUT_SECS: u64 = 30;
// Covers the whole body, and release assets can be hundreds of MB.
const REQUEST_TIMEOUT_SECS: u64 = 15 * 60;

static CLIENT: OnceCell<Client> = OnceCell::new();

pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| {
        Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(concat!("tm_warehouse/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("failed to build http client")
    })
}
