use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use super::definitions::Flag;
use super::env::{EnvSnapshot, Environment, parse_bool_token, resolve_environment};

/// Which precedence tier decided a flag.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(tag = "source", rename_all = "camelCase")]
pub enum Resolution {
    Override { key: &'static str, value: bool },
    Environment { environment: Environment, value: bool },
    Default { value: bool },
}

impl Resolution {
    pub fn value(&self) -> bool {
        match *self {
            Self::Override { value, .. }
            | Self::Environment { value, .. }
            | Self::Default { value } => value,
        }
    }
}

/// Resolves feature flags against one environment snapshot.
///
/// Construct it once at startup and pass it to whatever needs it. The
/// runtime environment is resolved at construction and never re-read.
#[derive(Clone, Debug)]
pub struct FeatureFlags {
    env: EnvSnapshot,
    environment: Environment,
}

impl FeatureFlags {
    pub fn new(env: EnvSnapshot) -> Self {
        let environment = resolve_environment(&env);
        debug!(%environment, "feature flags initialised");
        Self { env, environment }
    }

    pub fn from_process_env() -> Self {
        Self::new(EnvSnapshot::from_process())
    }

    /// The environment resolved at construction.
    pub fn environment(&self) -> Environment {
        self.environment
    }

    /// Resolves `flag`, for `environment` or the resolved runtime one.
    ///
    /// Precedence: override env vars (first parseable, in listed order),
    /// then the per-environment value, then the flag's default.
    pub fn explain(&self, flag: Flag, environment: Option<Environment>) -> Resolution {
        let def = flag.definition();

        for &key in def.override_keys {
            let Some(raw) = self.env.get(key) else { continue };
            match parse_bool_token(raw) {
                Some(value) => return Resolution::Override { key, value },
                None => debug!(%flag, key, raw, "ignoring unparseable flag override"),
            }
        }

        let environment = environment.unwrap_or(self.environment);
        match def.for_environment(environment) {
            Some(value) => Resolution::Environment { environment, value },
            None => Resolution::Default { value: def.default_value },
        }
    }

    pub fn is_enabled(&self, flag: Flag, environment: Option<Environment>) -> bool {
        self.explain(flag, environment).value()
    }

    /// String-keyed lookup for callers outside the crate's type system
    /// (query strings, templates). Unknown names are disabled.
    pub fn is_enabled_by_name(&self, name: &str, environment: Option<Environment>) -> bool {
        match name.parse::<Flag>() {
            Ok(flag) => self.is_enabled(flag, environment),
            Err(()) => {
                debug!(name, "unknown feature flag");
                false
            }
        }
    }

    pub fn resolve_all(&self, environment: Option<Environment>) -> BTreeMap<Flag, bool> {
        Flag::ALL.into_iter()
            .map(|flag| (flag, self.is_enabled(flag, environment)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pairs: &[(&str, &str)]) -> FeatureFlags {
        FeatureFlags::new(EnvSnapshot::from_pairs(pairs.iter().copied()))
    }

    #[test]
    fn first_parseable_override_wins() {
        let f = flags(&[
            ("FEATURE_TASK_INLINE_EDIT", "sometimes"),
            ("NEXT_PUBLIC_FEATURE_TASK_INLINE_EDIT", "off"),
        ]);
        assert_eq!(
            f.explain(Flag::TaskInlineEdit, Some(Environment::Development)),
            Resolution::Override { key: "NEXT_PUBLIC_FEATURE_TASK_INLINE_EDIT", value: false }
        );
    }

    #[test]
    fn environment_beats_default() {
        let f = flags(&[]);
        assert_eq!(
            f.explain(Flag::AiTaskDrafts, Some(Environment::Development)),
            Resolution::Environment { environment: Environment::Development, value: true }
        );
        assert_eq!(
            f.explain(Flag::AiTaskDrafts, Some(Environment::Production)),
            Resolution::Default { value: false }
        );
    }

    #[test]
    fn uses_resolved_environment_when_none_given() {
        let f = flags(&[("NODE_ENV", "test")]);
        assert_eq!(f.environment(), Environment::Test);
        assert!(!f.is_enabled(Flag::TaskInlineEdit, None));
    }

    #[test]
    fn unknown_names_are_disabled() {
        let f = flags(&[]);
        assert!(!f.is_enabled_by_name("darkMode", None));
        assert!(f.is_enabled_by_name("taskBoardDragDrop", None));
    }

    #[test]
    fn resolution_serialises_with_source_tag() {
        let json = serde_json::to_value(Resolution::Override { key: "K", value: true }).unwrap();
        assert_eq!(json, serde_json::json!({ "source": "override", "key": "K", "value": true }));
    }
}
