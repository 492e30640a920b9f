use std::collections::HashMap;
use std::env;
use std::time::Duration;

/// Bundled config for builds that ship without a `.env` (wasm, mobile)
const BUNDLED_CONFIG: &str = include_str!("../assets/config.env");

pub const BANNER_MS_VAR: &str = "REASONCHAT_BANNER_MS";
pub const QUEUE_CAPACITY_VAR: &str = "REASONCHAT_QUEUE_CAPACITY";
pub const LOG_VAR: &str = "REASONCHAT_LOG";

const DEFAULT_BANNER_MS: u64 = 3000;
const DEFAULT_QUEUE_CAPACITY: usize = 64;
const DEFAULT_LOG_FILTER: &str = "info";
/// Largest bound a tokio mpsc channel accepts
pub const MAX_QUEUE_CAPACITY: usize = tokio::sync::Semaphore::MAX_PERMITS;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be a whole number, got {value:?}")]
    NotANumber { var: &'static str, value: String },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("{var} must be at most {max}, got {value}")]
    TooLarge {
        var: &'static str,
        value: u64,
        max: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WidgetConfig {
    /// How long the "Reasoning mode ..." banner stays on screen
    pub banner_ttl: Duration,
    /// Bound of the actor's inbound queue
    pub queue_capacity: usize,
    pub log_filter: String,
}

impl Default for WidgetConfig {
    fn default() -> Self {
        Self {
            banner_ttl: Duration::from_millis(DEFAULT_BANNER_MS),
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl WidgetConfig {
    /// Load `.env` (or the bundled defaults) into the process environment,
    /// then read the widget settings from it.
    pub fn load() -> Result<Self, ConfigError> {
        load_dotenv();
        Self::from_env()
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        let vars: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with("REASONCHAT_"))
            .collect();
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let banner_ttl = match lookup(BANNER_MS_VAR) {
            Some(raw) => Duration::from_millis(parse_number(BANNER_MS_VAR, &raw)?),
            None => defaults.banner_ttl,
        };

        let queue_capacity = match lookup(QUEUE_CAPACITY_VAR) {
            Some(raw) => {
                let value = parse_number(QUEUE_CAPACITY_VAR, &raw)?;
                if value == 0 {
                    return Err(ConfigError::Zero(QUEUE_CAPACITY_VAR));
                }
                usize::try_from(value)
                    .ok()
                    .filter(|capacity| *capacity <= MAX_QUEUE_CAPACITY)
                    .ok_or(ConfigError::TooLarge {
                        var: QUEUE_CAPACITY_VAR,
                        value,
                        max: MAX_QUEUE_CAPACITY,
                    })?
            }
            None => defaults.queue_capacity,
        };

        let log_filter = lookup(LOG_VAR)
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.log_filter);

        Ok(Self {
            banner_ttl,
            queue_capacity,
            log_filter,
        })
    }
}

fn parse_number(var: &'static str, raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .map_err(|_| ConfigError::NotANumber {
            var,
            value: raw.to_string(),
        })
}

#[cfg(not(target_arch = "wasm32"))]
fn load_dotenv() {
    // First try to load from .env file (desktop dev)
    if dotenvy::dotenv().is_ok() {
        return;
    }

    load_bundled_config();
}

#[cfg(target_arch = "wasm32")]
fn load_dotenv() {
    load_bundled_config();
}

fn load_bundled_config() {
    for (key, value) in parse_bundled(BUNDLED_CONFIG) {
        // Only set if not already set (allow env override)
        if env::var(key).is_err() {
            // SAFETY: called once at startup before the runtime spawns threads
            unsafe {
                env::set_var(key, value);
            }
        }
    }
}

fn parse_bundled(source: &str) -> Vec<(&str, &str)> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |key: &str| {
            pairs
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn defaults_when_unset() {
        let config = WidgetConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config, WidgetConfig::default());
        assert_eq!(config.banner_ttl, Duration::from_millis(3000));
    }

    #[test]
    fn reads_overrides() {
        let pairs = [(BANNER_MS_VAR, " 1500 "), (QUEUE_CAPACITY_VAR, "8"), (LOG_VAR, "debug")];
        let config = WidgetConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.banner_ttl, Duration::from_millis(1500));
        assert_eq!(config.queue_capacity, 8);
        assert_eq!(config.log_filter, "debug");
    }

    #[test]
    fn rejects_invalid_values() {
        let pairs = [(BANNER_MS_VAR, "soon")];
        assert!(matches!(
            WidgetConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::NotANumber { var: BANNER_MS_VAR, .. })
        ));
        let pairs = [(QUEUE_CAPACITY_VAR, "0")];
        assert!(matches!(
            WidgetConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::Zero(QUEUE_CAPACITY_VAR))
        ));
        let pairs = [(QUEUE_CAPACITY_VAR, "18446744073709551615")];
        assert!(matches!(
            WidgetConfig::from_lookup(lookup(&pairs)),
            Err(ConfigError::TooLarge { var: QUEUE_CAPACITY_VAR, max: MAX_QUEUE_CAPACITY, .. })
        ));
        let largest = MAX_QUEUE_CAPACITY.to_string();
        let pairs = [(QUEUE_CAPACITY_VAR, largest.as_str())];
        let config = WidgetConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.queue_capacity, MAX_QUEUE_CAPACITY);
    }

    #[test]
    fn bundled_config_skips_comments() {
        let parsed = parse_bundled("# comment\n\nA = 1\nbogus\nB=two\n");
        assert_eq!(parsed, vec![("A", "1"), ("B", "two")]);
        assert!(parse_bundled(BUNDLED_CONFIG).iter().any(|(k, _)| *k == BANNER_MS_VAR));
    }
}
