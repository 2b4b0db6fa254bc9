//! Configuration shared by the Expensa clients.

pub mod client;

pub use client::{ClientConfig, ConfigError, LogFormat, parse_base_url};
