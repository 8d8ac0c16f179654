use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

/// Signals consulted, in order, to decide which environment we run in.
pub const ENVIRONMENT_SIGNALS: &[&str] = &["APP_ENV", "DEPLOY_ENV", "VERCEL_ENV", "NODE_ENV"];

/// Used when no signal is set to a recognised value.
pub const DEFAULT_ENVIRONMENT: Environment = Environment::Development;

/// A frozen copy of environment variables.
///
/// Everything that reads configuration takes a snapshot instead of calling
/// `std::env::var`, so resolution is a pure function of its input.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct EnvSnapshot {
    vars: BTreeMap<String, String>,
}

impl EnvSnapshot {
    /// Captures the current process environment. Non-UTF-8 entries are skipped.
    pub fn from_process() -> Self {
        let vars = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self { vars: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }

    /// The trimmed value of `key`, or `None` when unset or blank.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(|v| v.trim()).filter(|v| !v.is_empty())
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.vars.insert(key.into(), value.into());
    }
}

/// Where the process runs.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Preview,
    Production,
    Test,
}

impl Environment {
    pub const ALL: [Environment; 4] = [
        Environment::Development,
        Environment::Preview,
        Environment::Production,
        Environment::Test,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Preview     => "preview",
            Self::Production  => "production",
            Self::Test        => "test",
        }
    }
}

/// Accepts the canonical names plus the usual short forms, case-insensitively.
impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local"  => Ok(Self::Development),
            "preview" | "staging" | "stage"  => Ok(Self::Preview),
            "production" | "prod"            => Ok(Self::Production),
            "test" | "testing" | "ci"        => Ok(Self::Test),
            _                                => Err(()),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The first non-empty signal decides.
///
/// An unrecognised value there yields [`DEFAULT_ENVIRONMENT`]; later signals
/// are never consulted.
pub fn resolve_environment(env: &EnvSnapshot) -> Environment {
    let Some((key, value)) = ENVIRONMENT_SIGNALS
        .iter()
        .find_map(|key| env.get(key).map(|value| (*key, value)))
    else {
        return DEFAULT_ENVIRONMENT;
    };
    value.parse().unwrap_or_else(|()| {
        warn!(signal = key, value, fallback = %DEFAULT_ENVIRONMENT, "unrecognised environment");
        DEFAULT_ENVIRONMENT
    })
}

/// Parses an override value. `None` means "no opinion": fall through.
pub fn parse_bool_token(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "enabled" | "enable" | "yes"      => Some(true),
        "0" | "false" | "off" | "disabled" | "disable" | "no"  => Some(false),
        _                                                      => None,
    }
}
