//! Plugin identity, shared aliases, and logging for the pafdb publisher.
//!
//! Everything here is consumed by more than one crate in the workspace:
//! the identity constants tag every log line, the aliases pin the column
//! types of the destination tables, and the severity helpers let each
//! publish invocation move the active log threshold.

// ============================================================================
// PLUGIN IDENTITY
// ============================================================================
/// Name the plugin registers under with the collection framework.
pub const NAME: &str = "pafdb";
/// Plugin interface version.
pub const VERSION: i32 = 1;
/// Plugin kind as understood by the collection framework.
pub const PLUGIN_TYPE: &str = "publisher";

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// TCP port of the SQL Server endpoint.
pub type Port = u16;
/// Correlation id grouping the wait samples of one benchmarking session.
pub type TestRun = i64;
/// Magnitude of a single wait-event sample.
pub type WaitValue = i32;

// ============================================================================
// DEFAULTS
// ============================================================================
/// Port used when the configuration bundle does not carry one.
pub const DEFAULT_PORT: Port = 8086;
/// Threshold in effect until a `log-level` setting says otherwise.
pub const DEFAULT_SEVERITY: log::LevelFilter = log::LevelFilter::Warn;
/// Sentinel stored in place of an absent `log-level` setting.
pub const UNDEFINED: &str = "undefined";
/// Human-readable list of accepted `log-level` values.
pub const ACCEPTABLE_SEVERITIES: &str = "off, error, warn, info, debug, trace, warning, fatal, panic";

// ============================================================================
// LOG CONTEXT
// ============================================================================
use std::fmt::Display;
use std::fmt::Formatter;

/// Structured fields prefixed to every log line of one publish invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    fields: Vec<(&'static str, String)>,
}

impl Scope {
    /// Scope carrying the plugin name, version and type.
    pub fn plugin() -> Self {
        Self {
            fields: vec![
                ("plugin-name", NAME.to_string()),
                ("plugin-version", VERSION.to_string()),
                ("plugin-type", PLUGIN_TYPE.to_string()),
            ],
        }
    }
    /// Adds one more field, replacing an existing one with the same key.
    pub fn with(mut self, key: &'static str, value: impl Display) -> Self {
        let value = value.to_string();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some(field) => field.1 = value,
            None => self.fields.push((key, value)),
        }
        self
    }
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl Display for Scope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for (key, value) in self.fields.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}

// ============================================================================
// SEVERITY
// ============================================================================
/// Parses a `log-level` value, ignoring case.
///
/// Accepts the `log` crate level names plus the `warning`, `fatal` and
/// `panic` spellings used by other collector plugins.
pub fn severity(value: &str) -> Option<log::LevelFilter> {
    match value.trim().to_lowercase().as_str() {
        "warning" => Some(log::LevelFilter::Warn),
        "fatal" | "panic" => Some(log::LevelFilter::Error),
        other => other.parse().ok(),
    }
}

/// Moves the global log threshold according to a `log-level` value.
///
/// [`UNDEFINED`] leaves the threshold untouched. Values that do not parse
/// are reported at warn and also leave it untouched. Returns the threshold
/// in effect afterwards.
pub fn threshold(scope: &Scope, value: &str) -> log::LevelFilter {
    if value != UNDEFINED {
        match severity(value) {
            Some(level) => log::set_max_level(level),
            None => log::warn!(
                "{} value={} acceptable-values=\"{}\" invalid log-level config value",
                scope,
                value.to_lowercase(),
                ACCEPTABLE_SEVERITIES
            ),
        }
    }
    log::max_level()
}

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Installs the terminal logger on stderr.
///
/// The backend accepts every level; the effective threshold lives in
/// `log::max_level` so that [`threshold`] can move it per invocation.
/// Starts at [`DEFAULT_SEVERITY`].
#[cfg(feature = "server")]
pub fn log() -> Result<(), log::SetLoggerError> {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Trace,
        config,
        simplelog::TerminalMode::Stderr,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term])?;
    log::set_max_level(DEFAULT_SEVERITY);
    Ok(())
}
