pub mod args;
pub mod config;
pub mod convert;
pub mod files;
pub mod http_client;
pub mod identifier;
pub mod logging;
pub mod pipeline;
pub mod release;
pub mod warehouse;
