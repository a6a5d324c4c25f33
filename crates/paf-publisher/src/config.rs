use super::*;
use paf_core::Port;
use paf_core::TestRun;
use paf_core::UNDEFINED;
use paf_mssql::Endpoint;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;
use std::str::FromStr;

/// Setting keys understood by the publisher.
pub mod keys {
    pub const HOST: &str = "host";
    pub const PORT: &str = "port";
    pub const DATABASE: &str = "database";
    pub const USER: &str = "user";
    pub const PASSWORD: &str = "password";
    pub const TEST_RUN: &str = "test-run";
    pub const LOG_LEVEL: &str = "log-level";
    pub const STRICTNESS: &str = "strictness";
}

/// One value of a configuration bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Setting {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Setting {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Bool(_) => "boolean",
            Self::Int(_) => "integer",
            Self::Float(_) => "float",
            Self::Str(_) => "string",
        }
    }
}

impl From<&str> for Setting {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}
impl From<String> for Setting {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}
impl From<i64> for Setting {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}
impl From<i32> for Setting {
    fn from(n: i32) -> Self {
        Self::Int(n.into())
    }
}
impl From<bool> for Setting {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

/// Opaque key → setting map handed over with every batch.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bundle(BTreeMap<String, Setting>);

impl Bundle {
    pub fn with(mut self, key: &str, value: impl Into<Setting>) -> Self {
        self.insert(key, value.into());
        self
    }
    pub fn insert(&mut self, key: &str, value: Setting) {
        self.0.insert(key.to_string(), value);
    }
    pub fn remove(&mut self, key: &str) -> Option<Setting> {
        self.0.remove(key)
    }
    pub fn get(&self, key: &str) -> Option<&Setting> {
        self.0.get(key)
    }
    pub fn string(&self, key: &'static str) -> Result<&str, ConfigError> {
        match self.get(key) {
            Some(Setting::Str(s)) => Ok(s.as_str()),
            Some(other) => Err(ConfigError::WrongType {
                field: key,
                expected: "string",
                found: other.kind(),
            }),
            None => Err(ConfigError::MissingField { field: key }),
        }
    }
    pub fn integer(&self, key: &'static str) -> Result<i64, ConfigError> {
        match self.get(key) {
            Some(Setting::Int(n)) => Ok(*n),
            Some(other) => Err(ConfigError::WrongType {
                field: key,
                expected: "integer",
                found: other.kind(),
            }),
            None => Err(ConfigError::MissingField { field: key }),
        }
    }
}

impl<K: Into<String>, V: Into<Setting>> FromIterator<(K, V)> for Bundle {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// How a publish treats failures inside the transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Log row, finalize and commit failures; report success anyway.
    #[default]
    BestEffort,
    /// Roll back on the first failure and report it.
    AllOrNothing,
}

impl FromStr for Strictness {
    type Err = ConfigError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "best-effort" => Ok(Self::BestEffort),
            "all-or-nothing" => Ok(Self::AllOrNothing),
            _ => Err(ConfigError::InvalidValue {
                field: keys::STRICTNESS,
                value: s.to_string(),
                expected: "best-effort or all-or-nothing",
            }),
        }
    }
}

/// Typed settings of one publish invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub host: String,
    pub port: Port,
    pub database: String,
    pub user: String,
    pub password: String,
    pub test_run: TestRun,
    /// Raw `log-level` value, [`UNDEFINED`] when absent.
    pub log_level: String,
    pub strictness: Strictness,
}

impl Configuration {
    /// Reads a bundle after filling in the declared defaults of `policy`.
    pub fn resolve(bundle: &Bundle, policy: &Policy) -> Result<Self, ConfigError> {
        let ref bundle = policy.apply(bundle);
        let host = bundle.string(keys::HOST)?.to_string();
        let database = bundle.string(keys::DATABASE)?.to_string();
        let user = bundle.string(keys::USER)?.to_string();
        let password = bundle.string(keys::PASSWORD)?.to_string();
        let port = bundle.integer(keys::PORT)?;
        let port = Port::try_from(port).map_err(|_| ConfigError::InvalidValue {
            field: keys::PORT,
            value: port.to_string(),
            expected: "a TCP port",
        })?;
        let test_run = bundle.integer(keys::TEST_RUN)?;
        let log_level = bundle
            .string(keys::LOG_LEVEL)
            .map(str::to_string)
            .unwrap_or_else(|_| UNDEFINED.to_string());
        let strictness = match bundle.get(keys::STRICTNESS) {
            None => Strictness::default(),
            Some(_) => bundle.string(keys::STRICTNESS)?.parse()?,
        };
        Ok(Self {
            host,
            port,
            database,
            user,
            password,
            test_run,
            log_level,
            strictness,
        })
    }
    pub fn endpoint(&self) -> Endpoint {
        Endpoint {
            host: self.host.clone(),
            port: self.port,
            database: self.database.clone(),
            user: self.user.clone(),
            password: self.password.clone(),
        }
    }
}
