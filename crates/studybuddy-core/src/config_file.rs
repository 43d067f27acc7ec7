use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::Config;

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub api: Option<ApiConfig>,
    pub extraction: Option<ExtractionConfig>,
    pub generation: Option<GenerationConfig>,
    pub display: Option<DisplayConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    pub gemini_api_key: Option<String>,
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionConfig {
    pub min_chars: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub strict_quiz_answers: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub theme: Option<String>,
    pub fps: Option<u32>,
}

/// Platform config directory path: `<config_dir>/studybuddy/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("studybuddy").join("config.toml"))
}

/// Load config by cascading CWD `.studybuddy.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(Path::new(".studybuddy.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &Path) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    let base_api = base.api.unwrap_or_default();
    let over_api = overlay.api.unwrap_or_default();
    let base_ext = base.extraction.unwrap_or_default();
    let over_ext = overlay.extraction.unwrap_or_default();
    let base_gen = base.generation.unwrap_or_default();
    let over_gen = overlay.generation.unwrap_or_default();
    let base_display = base.display.unwrap_or_default();
    let over_display = overlay.display.unwrap_or_default();

    ConfigFile {
        api: Some(ApiConfig {
            gemini_api_key: over_api.gemini_api_key.or(base_api.gemini_api_key),
            model: over_api.model.or(base_api.model),
            base_url: over_api.base_url.or(base_api.base_url),
            timeout_secs: over_api.timeout_secs.or(base_api.timeout_secs),
        }),
        extraction: Some(ExtractionConfig {
            min_chars: over_ext.min_chars.or(base_ext.min_chars),
        }),
        generation: Some(GenerationConfig {
            strict_quiz_answers: over_gen
                .strict_quiz_answers
                .or(base_gen.strict_quiz_answers),
        }),
        display: Some(DisplayConfig {
            theme: over_display.theme.or(base_display.theme),
            fps: over_display.fps.or(base_display.fps),
        }),
    }
}

/// Resolve a [`Config`] from file values and the process environment.
///
/// Environment variables override the file; CLI flags are applied by the
/// caller on top of the result.
pub fn resolve(file: &ConfigFile) -> Config {
    resolve_with_env(file, |key| std::env::var(key).ok())
}

/// Like [`resolve`], reading variables through `env`.
pub fn resolve_with_env(file: &ConfigFile, env: impl Fn(&str) -> Option<String>) -> Config {
    let mut config = Config::default();

    if let Some(api) = &file.api {
        if let Some(key) = &api.gemini_api_key {
            config.api_key = Some(key.clone());
        }
        if let Some(model) = &api.model {
            config.model = model.clone();
        }
        if let Some(url) = &api.base_url {
            config.base_url = url.clone();
        }
        if let Some(secs) = api.timeout_secs {
            config.timeout_secs = secs;
        }
    }
    if let Some(min) = file.extraction.as_ref().and_then(|e| e.min_chars) {
        config.min_chars = min;
    }
    if let Some(strict) = file.generation.as_ref().and_then(|g| g.strict_quiz_answers) {
        config.strict_quiz_answers = strict;
    }

    if let Some(key) = env("GEMINI_API_KEY").filter(|v| !v.is_empty()) {
        config.api_key = Some(key);
    }
    if let Some(model) = env("STUDYBUDDY_MODEL").filter(|v| !v.is_empty()) {
        config.model = model;
    }
    if let Some(url) = env("STUDYBUDDY_BASE_URL").filter(|v| !v.is_empty()) {
        config.base_url = url;
    }
    if let Some(secs) = env("STUDYBUDDY_TIMEOUT").and_then(|v| v.parse().ok()) {
        config.timeout_secs = secs;
    }

    config
}
