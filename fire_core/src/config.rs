//! Dispatcher configuration.

/// Environment variable read by [`Config::from_env`].
pub const SUPPRESS_RESULTS_ENV: &str = "FIRE_SUPPRESS_RESULTS";

/// Options recognized by the dispatcher.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Invoke as usual but do not print the result line.
    pub suppress_results: bool,
}

impl Config {
    pub const fn quiet() -> Self {
        Self { suppress_results: true }
    }

    /// Read `FIRE_SUPPRESS_RESULTS` from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. `1` or `true` (any case) switches
    /// result printing off.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let suppress_results = lookup(SUPPRESS_RESULTS_ENV)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false);
        Self { suppress_results }
    }
}
