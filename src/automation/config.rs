//! Configuration for an automation session

use crate::error::{LocatorError, LocatorResult};
use crate::template_matching::{DEFAULT_SCALE_STEP, MatchMethod};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocatorConfig {
    /// Window handed to the screenshot provider
    pub window_title: String,
    /// Threshold used when a call does not supply one
    pub default_threshold: Option<f32>,
    /// Pause between failed capture+match attempts
    pub retry_backoff: Duration,
    /// Pause between locating an element and clicking it
    pub click_delay: Duration,
    /// Spacing of sampled scale factors during multi-scale search
    pub scale_step: f64,
    pub method: MatchMethod,
}

impl Default for LocatorConfig {
    fn default() -> Self {
        Self {
            window_title: String::new(),
            default_threshold: None,
            retry_backoff: Duration::from_secs(1),
            click_delay: Duration::from_millis(500),
            scale_step: DEFAULT_SCALE_STEP,
            method: MatchMethod::CoefficientNormalized,
        }
    }
}

impl LocatorConfig {
    pub fn for_window(window_title: impl Into<String>) -> Self {
        Self {
            window_title: window_title.into(),
            ..Self::default()
        }
    }

    /// Defaults overlaid with `SCREEN_LOCATOR_*` environment variables
    pub fn from_env() -> LocatorResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`:
    /// - `SCREEN_LOCATOR_WINDOW` - window title
    /// - `SCREEN_LOCATOR_THRESHOLD` - default threshold
    /// - `SCREEN_LOCATOR_BACKOFF_MS` - retry backoff in milliseconds
    /// - `SCREEN_LOCATOR_CLICK_DELAY_MS` - click settle delay in milliseconds
    /// - `SCREEN_LOCATOR_METHOD` - `ccoeff` or `ccorr`
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LocatorResult<Self> {
        let mut config = Self::default();

        if let Some(window) = lookup("SCREEN_LOCATOR_WINDOW") {
            config.window_title = window;
        }
        if let Some(raw) = lookup("SCREEN_LOCATOR_THRESHOLD") {
            config.default_threshold = Some(parse_value("SCREEN_LOCATOR_THRESHOLD", &raw)?);
        }
        if let Some(raw) = lookup("SCREEN_LOCATOR_BACKOFF_MS") {
            config.retry_backoff =
                Duration::from_millis(parse_value("SCREEN_LOCATOR_BACKOFF_MS", &raw)?);
        }
        if let Some(raw) = lookup("SCREEN_LOCATOR_CLICK_DELAY_MS") {
            config.click_delay =
                Duration::from_millis(parse_value("SCREEN_LOCATOR_CLICK_DELAY_MS", &raw)?);
        }
        if let Some(raw) = lookup("SCREEN_LOCATOR_METHOD") {
            config.method = raw.parse()?;
        }

        Ok(config)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> LocatorResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| LocatorError::InvalidArgument {
            description: format!("{key}: cannot parse '{raw}'"),
        })
}

/// Configuration preset for crisp, unscaled UI elements (buttons, menus)
pub fn create_strict_config(window_title: &str) -> LocatorConfig {
    LocatorConfig {
        default_threshold: Some(0.9),
        ..LocatorConfig::for_window(window_title)
    }
}

/// Configuration preset for quick polling loops
pub fn create_fast_config(window_title: &str) -> LocatorConfig {
    LocatorConfig {
        retry_backoff: Duration::from_millis(200),
        click_delay: Duration::ZERO,
        ..LocatorConfig::for_window(window_title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = LocatorConfig::default();
        assert_eq!(config.default_threshold, None);
        assert_eq!(config.retry_backoff, Duration::from_secs(1));
        assert_eq!(config.click_delay, Duration::from_millis(500));
        assert!((config.scale_step - 0.1).abs() < f64::EPSILON);
        assert_eq!(config.method, MatchMethod::CoefficientNormalized);
    }

    #[test]
    fn test_presets() {
        assert_eq!(create_strict_config("w").default_threshold, Some(0.9));
        let fast = create_fast_config("w");
        assert_eq!(fast.click_delay, Duration::ZERO);
        assert_eq!(fast.window_title, "w");
    }

    #[test]
    fn test_lookup_overrides() {
        let vars: HashMap<&str, &str> = [
            ("SCREEN_LOCATOR_WINDOW", "Game"),
            ("SCREEN_LOCATOR_THRESHOLD", "0.75"),
            ("SCREEN_LOCATOR_BACKOFF_MS", "250"),
            ("SCREEN_LOCATOR_METHOD", "ccorr"),
        ]
        .into_iter()
        .collect();

        let config = LocatorConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.window_title, "Game");
        assert_eq!(config.default_threshold, Some(0.75));
        assert_eq!(config.retry_backoff, Duration::from_millis(250));
        assert_eq!(config.click_delay, Duration::from_millis(500));
        assert_eq!(config.method, MatchMethod::CrossCorrelationNormalized);
    }

    #[test]
    fn test_lookup_rejects_garbage() {
        let err = LocatorConfig::from_lookup(|k| {
            (k == "SCREEN_LOCATOR_BACKOFF_MS").then(|| "soon".to_string())
        })
        .unwrap_err();
        assert!(err.is_usage_error());
    }
}
