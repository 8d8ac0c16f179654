//! Feature flags.
//!
//! A flag resolves, highest precedence first, from:
//!
//! 1. its override environment variables, in listed order; the first one
//!    that parses as a boolean wins (`1/true/on/enabled/enable/yes`,
//!    `0/false/off/disabled/disable/no`, trimmed, any case);
//! 2. its value for the current [`Environment`], if it defines one;
//! 3. its default.
//!
//! Resolution never fails: unparseable overrides are skipped.
//!
//! ```rust
//! use taskdeck::flags::{EnvSnapshot, Environment, FeatureFlags, Flag};
//!
//! let flags = FeatureFlags::new(EnvSnapshot::from_pairs([("FEATURE_TASK_INLINE_EDIT", "1")]));
//! assert!(flags.is_enabled(Flag::TaskInlineEdit, Some(Environment::Production)));
//! ```

mod definitions;
mod env;
mod resolver;

pub use definitions::{Flag, FlagDefinition};
pub use env::{
    DEFAULT_ENVIRONMENT, ENVIRONMENT_SIGNALS, EnvSnapshot, Environment, parse_bool_token,
    resolve_environment,
};
pub use resolver::{FeatureFlags, Resolution};
