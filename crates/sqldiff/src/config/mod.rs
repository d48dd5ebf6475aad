//! Connection configuration and diff options.

mod types;
mod validation;

pub use types::*;

use crate::error::Result;
use std::path::Path;
use tracing::debug;

impl DbInfo {
    /// Load connection settings from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse connection settings from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build a `user:passwd@tcp(host:port)/database` string.
    pub fn to_dsn(&self) -> String {
        format!(
            "{}:{}@tcp({}:{})/{}",
            self.user, self.passwd, self.host, self.port, self.database
        )
    }
}

impl Dsn {
    /// Parse and validate a DSN string.
    pub fn parse(dsn: &str) -> Result<Self> {
        validation::parse_dsn(dsn)
    }

    /// Resolve a `--dsn` argument: a `*.json` path is read as [`DbInfo`],
    /// anything else is taken as a DSN. Either way the result is validated.
    pub fn from_option(option: &str) -> Result<Self> {
        if option.ends_with(".json") {
            debug!("Reading connection settings from {}", option);
            let info = DbInfo::load(option)?;
            return Self::parse(&info.to_dsn());
        }
        Self::parse(option)
    }
}

impl DiffOptions {
    /// Validate the options.
    pub fn validate(&self) -> Result<()> {
        validation::validate(self)
    }
}
