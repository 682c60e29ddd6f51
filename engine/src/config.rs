use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_CONFIG_FILES: [&str; 2] = ["coderefine.yaml", "coderefine.json"];

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
    #[serde(default)]
    pub mock: bool,
}

/// Load configuration from a YAML/JSON file with environment overrides.
/// Without an explicit path, probes `coderefine.yaml` then `coderefine.json`
/// in the working directory and falls back to an empty config.
/// Env vars:
/// - GROQ_API_KEY
/// - CODEREFINE_MODEL
/// - CODEREFINE_BASE_URL
/// - CODEREFINE_TEMPERATURE
/// - CODEREFINE_MAX_TOKENS
/// - CODEREFINE_TIMEOUT_SECS
/// - CODEREFINE_MOCK=true|false
pub fn load_config(path: Option<&Path>) -> Result<Config, String> {
    let mut cfg = match path {
        Some(p) => parse_file(p)?,
        None => match default_config_path() {
            Some(p) => parse_file(&p)?,
            None => Config::default(),
        },
    };

    // Env overrides
    if let Ok(val) = std::env::var("GROQ_API_KEY") {
        if !val.is_empty() {
            cfg.api_key = Some(val);
        }
    }
    if let Ok(val) = std::env::var("CODEREFINE_MODEL") {
        if !val.is_empty() {
            cfg.model = Some(val);
        }
    }
    if let Ok(val) = std::env::var("CODEREFINE_BASE_URL") {
        if !val.is_empty() {
            cfg.base_url = Some(val);
        }
    }
    if let Ok(val) = std::env::var("CODEREFINE_TEMPERATURE") {
        if let Ok(v) = val.parse::<f64>() {
            cfg.temperature = Some(v);
        }
    }
    if let Ok(val) = std::env::var("CODEREFINE_MAX_TOKENS") {
        if let Ok(v) = val.parse::<u32>() {
            cfg.max_tokens = Some(v);
        }
    }
    if let Ok(val) = std::env::var("CODEREFINE_TIMEOUT_SECS") {
        if let Ok(v) = val.parse::<u64>() {
            cfg.timeout_secs = Some(v);
        }
    }
    if let Ok(val) = std::env::var("CODEREFINE_MOCK") {
        cfg.mock = matches!(val.to_lowercase().as_str(), "1" | "true" | "yes");
    }

    Ok(cfg)
}

fn default_config_path() -> Option<PathBuf> {
    DEFAULT_CONFIG_FILES
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn parse_file(p: &Path) -> Result<Config, String> {
    let contents =
        fs::read_to_string(p).map_err(|e| format!("failed to read config {}: {e}", p.display()))?;
    if p.extension().and_then(|s| s.to_str()) == Some("json") {
        serde_json::from_str(&contents)
            .map_err(|e| format!("failed to parse json config {}: {e}", p.display()))
    } else {
        serde_yaml::from_str(&contents)
            .map_err(|e| format!("failed to parse yaml config {}: {e}", p.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, OnceLock};
    use tempfile::tempdir;

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        LOCK.get_or_init(|| Mutex::new(())).lock().unwrap()
    }

    fn clear_env() {
        for var in [
            "GROQ_API_KEY",
            "CODEREFINE_MODEL",
            "CODEREFINE_BASE_URL",
            "CODEREFINE_TEMPERATURE",
            "CODEREFINE_MAX_TOKENS",
            "CODEREFINE_TIMEOUT_SECS",
            "CODEREFINE_MOCK",
        ] {
            std::env::remove_var(var);
        }
    }

    #[test]
    fn loads_yaml_and_overrides_env() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("coderefine.yaml");
        let yaml = r#"
api_key: from-file
model: llama-3.1-8b-instant
temperature: 0.1
"#;
        std::fs::write(&path, yaml).unwrap();

        std::env::set_var("GROQ_API_KEY", "from-env");
        std::env::set_var("CODEREFINE_MODEL", "llama-3.3-70b-versatile");
        std::env::set_var("CODEREFINE_TIMEOUT_SECS", "60");
        std::env::set_var("CODEREFINE_MOCK", "true");

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("from-env"));
        assert_eq!(cfg.model.as_deref(), Some("llama-3.3-70b-versatile"));
        assert_eq!(cfg.temperature, Some(0.1));
        assert_eq!(cfg.timeout_secs, Some(60));
        assert!(cfg.mock);
        assert_eq!(cfg.base_url, None);
        assert_eq!(cfg.max_tokens, None);

        clear_env();
    }

    #[test]
    fn loads_json_config() {
        let _guard = env_lock();
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("coderefine.json");
        let json = r#"
{
  "api_key": "k1",
  "base_url": "http://localhost:8080/v1",
  "max_tokens": 2000,
  "mock": true
}
"#;
        std::fs::write(&path, json).unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.api_key.as_deref(), Some("k1"));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:8080/v1"));
        assert_eq!(cfg.max_tokens, Some(2000));
        assert!(cfg.mock);
    }

    #[test]
    fn empty_config_when_nothing_provided() {
        let _guard = env_lock();
        clear_env();
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.api_key, None);
        assert_eq!(cfg.model, None);
        assert_eq!(cfg.base_url, None);
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.max_tokens, None);
        assert_eq!(cfg.timeout_secs, None);
        assert!(!cfg.mock);
    }

    #[test]
    fn missing_file_is_an_error() {
        let _guard = env_lock();
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.yaml");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.contains("failed to read config"), "{err}");
    }

    #[test]
    fn ignores_unparseable_numeric_overrides() {
        let _guard = env_lock();
        clear_env();
        std::env::set_var("CODEREFINE_TEMPERATURE", "warm");
        std::env::set_var("CODEREFINE_MAX_TOKENS", "lots");
        let cfg = load_config(None).unwrap();
        assert_eq!(cfg.temperature, None);
        assert_eq!(cfg.max_tokens, None);
        clear_env();
    }
}
