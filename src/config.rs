use crate::defaults;
use crate::error::{EnrichError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub normalizer: NormalizerConfig,
    pub dispatch: DispatchConfig,
    pub entities: EntityConfig,
    pub captions: CaptionConfig,
    pub service: ServiceConfig,
}

/// Token stream segmentation and chunking
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct NormalizerConfig {
    pub pause_threshold_secs: f64,
    pub max_fragment_secs: f64,
    pub sentence_split_chars: usize,
    pub hard_cap_chars: usize,
    pub sentence_max_chars: usize,
    pub metrics_bucket_secs: f64,
    pub unsure_threshold: f64,
}

/// Enrichment request throttling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DispatchConfig {
    pub entity_concurrency: usize,
    pub translation_concurrency: usize,
    pub quiescence_ms: u64,
    pub call_timeout_ms: u64,
}

/// Entity table filtering
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EntityConfig {
    pub language: String,
    pub ignored_types: Vec<String>,
    pub min_score: f64,
}

/// Caption track layout and languages
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptionConfig {
    pub source_language: String,
    pub target_languages: Vec<String>,
    pub line_terms: usize,
    pub cue_duration_secs: u64,
}

/// Enrichment service location
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            pause_threshold_secs: defaults::PAUSE_THRESHOLD_SECS,
            max_fragment_secs: defaults::MAX_FRAGMENT_SECS,
            sentence_split_chars: defaults::SENTENCE_SPLIT_CHARS,
            hard_cap_chars: defaults::HARD_CAP_CHARS,
            sentence_max_chars: defaults::SENTENCE_MAX_CHARS,
            metrics_bucket_secs: defaults::METRICS_BUCKET_SECS,
            unsure_threshold: defaults::UNSURE_THRESHOLD,
        }
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            entity_concurrency: defaults::ENTITY_CONCURRENCY,
            translation_concurrency: defaults::TRANSLATION_CONCURRENCY,
            quiescence_ms: defaults::QUIESCENCE_MS,
            call_timeout_ms: defaults::CALL_TIMEOUT_MS,
        }
    }
}

impl DispatchConfig {
    pub fn quiescence(&self) -> Duration {
        Duration::from_millis(self.quiescence_ms)
    }

    /// Per-call timeout; `0` disables it.
    pub fn call_timeout(&self) -> Option<Duration> {
        (self.call_timeout_ms > 0).then(|| Duration::from_millis(self.call_timeout_ms))
    }
}

impl Default for EntityConfig {
    fn default() -> Self {
        Self {
            language: defaults::SOURCE_LANGUAGE.to_string(),
            ignored_types: vec![defaults::IGNORED_ENTITY_TYPE.to_string()],
            min_score: defaults::ENTITY_MIN_SCORE,
        }
    }
}

impl Default for CaptionConfig {
    fn default() -> Self {
        Self {
            source_language: defaults::SOURCE_LANGUAGE.to_string(),
            target_languages: defaults::TARGET_LANGUAGES
                .iter()
                .map(|l| l.to_string())
                .collect(),
            line_terms: defaults::CAPTION_LINE_TERMS,
            cue_duration_secs: defaults::CUE_DURATION_SECS,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Missing fields use default values.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if the file doesn't exist.
    ///
    /// Invalid TOML is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(EnrichError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - TRANSCRIPT_ENRICH_ENDPOINT → service.endpoint
    /// - TRANSCRIPT_ENRICH_LANGUAGES → captions.target_languages (comma-separated)
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(defaults::ENDPOINT_ENV)
            && !endpoint.is_empty()
        {
            self.service.endpoint = Some(endpoint);
        }

        if let Ok(languages) = std::env::var(defaults::LANGUAGES_ENV)
            && !languages.is_empty()
        {
            self.captions.target_languages = parse_language_list(&languages);
        }

        self
    }

    /// Reject values the pipeline cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |key: &str, message: &str| {
            Err(EnrichError::ConfigInvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.dispatch.entity_concurrency == 0 {
            return invalid("dispatch.entity_concurrency", "must be at least 1");
        }
        if self.dispatch.translation_concurrency == 0 {
            return invalid("dispatch.translation_concurrency", "must be at least 1");
        }
        if self.normalizer.hard_cap_chars == 0 {
            return invalid("normalizer.hard_cap_chars", "must be at least 1");
        }
        if self.normalizer.sentence_split_chars > self.normalizer.hard_cap_chars {
            return invalid(
                "normalizer.sentence_split_chars",
                "must not exceed normalizer.hard_cap_chars",
            );
        }
        if self.normalizer.metrics_bucket_secs <= 0.0 {
            return invalid("normalizer.metrics_bucket_secs", "must be positive");
        }
        if self.captions.line_terms == 0 {
            return invalid("captions.line_terms", "must be at least 1");
        }
        Ok(())
    }

    /// Serialize as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| EnrichError::ConfigParse {
            message: e.to_string(),
        })
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/transcript-enrich/config.toml on Linux
    #[cfg(feature = "cli")]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("transcript-enrich")
            .join("config.toml")
    }
}

/// Split a comma-separated language list, dropping blanks.
pub fn parse_language_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to serialize tests that modify environment variables
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    // SAFETY: only used with ENV_LOCK held.
    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value) }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key) }
    }

    fn clear_env() {
        remove_env(defaults::ENDPOINT_ENV);
        remove_env(defaults::LANGUAGES_ENV);
    }

    #[test]
    fn test_default_config_has_correct_values() {
        let config = Config::default();

        assert_eq!(config.normalizer.pause_threshold_secs, 0.9);
        assert_eq!(config.normalizer.max_fragment_secs, 3.0);
        assert_eq!(config.normalizer.sentence_split_chars, 4500);
        assert_eq!(config.normalizer.hard_cap_chars, 4900);
        assert_eq!(config.normalizer.metrics_bucket_secs, 10.0);

        assert_eq!(config.dispatch.entity_concurrency, 1);
        assert_eq!(config.dispatch.translation_concurrency, 3);

        assert_eq!(config.entities.ignored_types, vec!["QUANTITY".to_string()]);
        assert_eq!(config.entities.min_score, 0.5);

        assert_eq!(config.captions.source_language, "en");
        assert_eq!(config.captions.target_languages, vec!["es".to_string()]);
        assert_eq!(config.service.endpoint, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let toml_content = r#"
            [normalizer]
            pause_threshold_secs = 1.5
            hard_cap_chars = 2000
            sentence_split_chars = 1800

            [dispatch]
            translation_concurrency = 8
            call_timeout_ms = 0

            [captions]
            target_languages = ["fr", "de"]

            [service]
            endpoint = "http://localhost:8080"
        "#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = Config::load(temp_file.path()).unwrap();

        assert_eq!(config.normalizer.pause_threshold_secs, 1.5);
        assert_eq!(config.normalizer.hard_cap_chars, 2000);
        assert_eq!(config.normalizer.sentence_split_chars, 1800);
        assert_eq!(config.dispatch.translation_concurrency, 8);
        assert_eq!(config.dispatch.call_timeout(), None);
        assert_eq!(config.captions.target_languages, vec!["fr", "de"]);
        assert_eq!(
            config.service.endpoint,
            Some("http://localhost:8080".to_string())
        );
        // Untouched sections keep defaults
        assert_eq!(config.entities, EntityConfig::default());
    }

    #[test]
    fn test_call_timeout_keeps_milliseconds() {
        let config: Config = toml::from_str("[dispatch]\ncall_timeout_ms = 1500\n").unwrap();
        assert_eq!(
            config.dispatch.call_timeout(),
            Some(Duration::from_millis(1500))
        );
        assert_eq!(
            Config::default().dispatch.call_timeout(),
            Some(Duration::from_secs(30))
        );
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[dispatch]\nentity_concurrency = 0\n")
            .unwrap();

        let err = Config::load(temp_file.path()).unwrap_err();
        assert!(matches!(err, EnrichError::ConfigInvalidValue { ref key, .. } if key == "dispatch.entity_concurrency"));
    }

    #[test]
    fn test_split_above_cap_rejected() {
        let mut config = Config::default();
        config.normalizer.sentence_split_chars = config.normalizer.hard_cap_chars + 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_env_override_endpoint_and_languages() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        set_env(defaults::ENDPOINT_ENV, "http://enrich.internal");
        set_env(defaults::LANGUAGES_ENV, "es, fr,,pt");
        let config = Config::default().with_env_overrides();

        assert_eq!(
            config.service.endpoint,
            Some("http://enrich.internal".to_string())
        );
        assert_eq!(config.captions.target_languages, vec!["es", "fr", "pt"]);

        clear_env();
    }

    #[test]
    fn test_env_override_empty_string_ignored() {
        let _lock = ENV_LOCK.lock().unwrap();
        clear_env();

        set_env(defaults::ENDPOINT_ENV, "");
        let config = Config::default().with_env_overrides();
        assert_eq!(config.service.endpoint, None);

        clear_env();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"[dispatch\nbroken = ").unwrap();

        assert!(Config::load(temp_file.path()).is_err());
        assert!(Config::load_or_default(temp_file.path()).is_err());
    }

    #[test]
    fn test_load_or_default_returns_default_for_missing_file() {
        let missing_path = Path::new("/tmp/nonexistent_transcript_enrich_config_12345.toml");
        let config = Config::load_or_default(missing_path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_to_toml_reloads() {
        let mut config = Config::default();
        config.captions.target_languages = vec!["de".to_string()];
        let dumped = config.to_toml().unwrap();
        assert!(dumped.contains("[dispatch]"));

        let reloaded: Config = toml::from_str(&dumped).unwrap();
        assert_eq!(reloaded, config);
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = Config::default_path();
        let path_str = path.to_string_lossy();
        assert!(path_str.contains("transcript-enrich"));
        assert!(path_str.ends_with("config.toml"));
    }
}
