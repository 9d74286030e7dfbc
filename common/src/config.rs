use std::env::var;

use anyhow::Context;

pub const DEFAULT_DATABASE: &str = "issue-tracker";
pub const DEFAULT_COLLECTION: &str = "issues";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub mongo_uri: String,
    pub database: String,
    pub collection: String,
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let mongo_uri = lookup("MONGOURI").context("MONGOURI is not set")?;

        let port = match lookup("PORT") {
            Some(port) => port
                .parse()
                .with_context(|| format!("PORT is not a valid port: {}", port))?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            mongo_uri,
            database: lookup("ISSUES_DATABASE").unwrap_or_else(|| DEFAULT_DATABASE.to_string()),
            collection: lookup("ISSUES_COLLECTION")
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| env.get(key).cloned()
    }

    #[test]
    fn defaults_apply() {
        let config = Config::from_lookup(lookup(&[("MONGOURI", "mongodb://localhost")])).unwrap();
        assert_eq!(config.database, DEFAULT_DATABASE);
        assert_eq!(config.collection, DEFAULT_COLLECTION);
        assert_eq!(config.port, DEFAULT_PORT);
    }

    #[test]
    fn mongo_uri_is_required() {
        assert!(Config::from_lookup(lookup(&[])).is_err());
    }

    #[test]
    fn bad_port_is_rejected() {
        let result = Config::from_lookup(lookup(&[
            ("MONGOURI", "mongodb://localhost"),
            ("PORT", "eighty"),
        ]));
        assert!(result.is_err());
    }
}
