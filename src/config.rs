use std::env;
use std::str::FromStr;

use log::warn;

use crate::blockchain::{DEFAULT_APPEND_RETRIES, DEFAULT_DIFFICULTY, DIFFICULTY_STEP_INTERVAL};

/// Runtime settings, read from the environment (after `.env` is loaded).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub initial_difficulty: u32,
    pub difficulty_step_interval: u32,
    /// `None` lets a single mining run search the whole nonce space.
    pub max_mining_attempts: Option<u64>,
    pub append_retries: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            initial_difficulty: DEFAULT_DIFFICULTY,
            difficulty_step_interval: DIFFICULTY_STEP_INTERVAL,
            max_mining_attempts: None,
            append_retries: DEFAULT_APPEND_RETRIES,
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build settings from any key lookup; unset keys keep their defaults and
    /// unparsable values are logged and ignored.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let mut difficulty_step_interval =
            parse_or(&lookup, "DIFFICULTY_STEP_INTERVAL", defaults.difficulty_step_interval);
        if difficulty_step_interval == 0 {
            warn!("CONFIG - DIFFICULTY_STEP_INTERVAL must be >= 1, using 1");
            difficulty_step_interval = 1;
        }

        Self {
            host: lookup("HOST").unwrap_or(defaults.host),
            port: parse_or(&lookup, "PORT", defaults.port),
            initial_difficulty: parse_or(&lookup, "INITIAL_DIFFICULTY", defaults.initial_difficulty),
            difficulty_step_interval,
            max_mining_attempts: parse_opt(&lookup, "MAX_MINING_ATTEMPTS"),
            append_retries: parse_or(&lookup, "APPEND_RETRIES", defaults.append_retries),
        }
    }
}

fn parse_opt<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = lookup(key)?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("CONFIG - ignoring invalid {key}={raw:?}");
            None
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    parse_opt(lookup, key).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::Settings;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]);
        assert_eq!(s, Settings::default());
        assert_eq!(s.port, 8000);
        assert_eq!(s.initial_difficulty, 1);
        assert_eq!(s.difficulty_step_interval, 10);
        assert_eq!(s.max_mining_attempts, None);
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("HOST", "0.0.0.0"),
            ("PORT", "9090"),
            ("INITIAL_DIFFICULTY", "3"),
            ("DIFFICULTY_STEP_INTERVAL", "5"),
            ("MAX_MINING_ATTEMPTS", " 1000000 "),
            ("APPEND_RETRIES", "0"),
        ]);
        assert_eq!(s.host, "0.0.0.0");
        assert_eq!(s.port, 9090);
        assert_eq!(s.initial_difficulty, 3);
        assert_eq!(s.difficulty_step_interval, 5);
        assert_eq!(s.max_mining_attempts, Some(1_000_000));
        assert_eq!(s.append_retries, 0);
    }

    #[test]
    fn invalid_values_fall_back() {
        let s = settings(&[
            ("PORT", "eighty"),
            ("DIFFICULTY_STEP_INTERVAL", "0"),
            ("MAX_MINING_ATTEMPTS", "-5"),
        ]);
        assert_eq!(s.port, 8000);
        assert_eq!(s.difficulty_step_interval, 1);
        assert_eq!(s.max_mining_attempts, None);
    }
}
