use anyhow::{Context, Result};
use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
const PLACEHOLDER_KEY: &str = "your-api-key-here";

/// Runtime settings. Deliberately not `Debug`: it carries the API key.
#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub google_api_key: Option<String>,
    pub model: String,
    pub request_timeout_secs: u64,
    pub bind: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            google_api_key: None,
            model: DEFAULT_MODEL.to_string(),
            request_timeout_secs: 120,
            bind: DEFAULT_BIND.to_string(),
            temperature: 0.9,
            max_output_tokens: 8192,
        }
    }
}

fn defaults() -> Result<ConfigBuilder<DefaultState>> {
    Ok(Config::builder()
        .set_default("model", DEFAULT_MODEL)?
        .set_default("request_timeout_secs", 120_i64)?
        .set_default("bind", DEFAULT_BIND)?
        .set_default("temperature", 0.9_f64)?
        .set_default("max_output_tokens", 8192_i64)?)
}

impl Settings {
    /// Defaults, then `PITCH_*` variables, then `GOOGLE_API_KEY`.
    pub fn load() -> Result<Self> {
        defaults()?
            .add_source(Environment::with_prefix("PITCH").try_parsing(true))
            .set_override_option("google_api_key", std::env::var("GOOGLE_API_KEY").ok())?
            .build()
            .context("loading settings")?
            .try_deserialize()
            .context("invalid settings")
    }

    /// The API key, unless it is missing, blank or the placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.google_api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != PLACEHOLDER_KEY)
    }

    pub fn report(&self) -> EnvReport {
        let raw = self.google_api_key.as_deref().unwrap_or("").trim();
        EnvReport {
            has_api_key: self.api_key().is_some(),
            is_placeholder_key: raw == PLACEHOLDER_KEY,
            key_length: raw.chars().count(),
            model: self.model.clone(),
            timeout_secs: self.request_timeout_secs,
        }
    }
}

/// Configuration check that never reveals the key itself.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvReport {
    pub has_api_key: bool,
    pub is_placeholder_key: bool,
    pub key_length: usize,
    pub model: String,
    pub timeout_secs: u64,
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn with_key(key: Option<&str>) -> Settings {
        Settings {
            google_api_key: key.map(String::from),
            ..Settings::default()
        }
    }

    #[test]
    fn builder_defaults_match_default_impl() {
        let built: Settings = defaults().unwrap().build().unwrap().try_deserialize().unwrap();
        let expected = Settings::default();
        assert_eq!(built.model, expected.model);
        assert_eq!(built.request_timeout_secs, expected.request_timeout_secs);
        assert_eq!(built.bind, expected.bind);
        assert_eq!(built.max_output_tokens, expected.max_output_tokens);
        assert!((built.temperature - expected.temperature).abs() < f32::EPSILON);
        assert!(built.google_api_key.is_none());
    }

    #[test]
    fn override_sets_key() {
        let built: Settings = defaults()
            .unwrap()
            .set_override_option("google_api_key", Some("abc123"))
            .unwrap()
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(built.api_key(), Some("abc123"));
    }

    #[test]
    fn unusable_keys_are_not_configured() {
        assert_eq!(with_key(None).api_key(), None);
        assert_eq!(with_key(Some("")).api_key(), None);
        assert_eq!(with_key(Some("   ")).api_key(), None);
        assert_eq!(with_key(Some("your-api-key-here")).api_key(), None);
        assert_eq!(with_key(Some(" real-key ")).api_key(), Some("real-key"));
    }

    #[test]
    fn report_hides_key() {
        let report = with_key(Some("your-api-key-here")).report();
        assert!(!report.has_api_key);
        assert!(report.is_placeholder_key);
        assert_eq!(report.key_length, 17);

        let report = with_key(Some("secret")).report();
        assert!(report.has_api_key);
        assert_eq!(report.key_length, 6);
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("secret"));
        assert!(json.contains("\"hasApiKey\":true"));
    }
}
