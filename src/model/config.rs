use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

const ENV_CONFIG_PATH: &str = "CONTENT_SYNC_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const ENV_DOC_URL: &str = "CONTENT_DOC_URL";
const DEFAULT_DOC_URL: &str = "http://127.0.0.1:8080/content/site-content.txt";

const ENV_PAGE_PATH: &str = "CONTENT_PAGE_PATH";
const DEFAULT_PAGE_PATH: &str = "site/index.html";

const ENV_REFRESH_MS: &str = "CONTENT_REFRESH_MS";
const DEFAULT_REFRESH_MS: u64 = 3000;

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub document_url: Option<Url>,
    #[serde(default)]
    pub page_path: Option<PathBuf>,
    #[serde(default)]
    pub refresh_period_ms: Option<u64>,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Location of the source text document
    pub document_url: Url,
    /// HTML page whose tagged placeholders receive the extracted values
    pub page_path: PathBuf,
    /// Delay between refresh cycles
    pub refresh_period_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            document_url: Url::parse(DEFAULT_DOC_URL).expect("default URL is valid"),
            page_path: PathBuf::from(DEFAULT_PAGE_PATH),
            refresh_period_ms: DEFAULT_REFRESH_MS,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment.
    ///
    /// Precedence: environment variables over config file over defaults.
    pub fn from_env() -> Self {
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let file = Self::load_config_file(&config_path).unwrap_or_default();
        let defaults = Self::default();

        let document_url = std::env::var(ENV_DOC_URL)
            .ok()
            .and_then(|v| match Url::parse(&v) {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(value = %v, error = %e, "Ignoring invalid {}", ENV_DOC_URL);
                    None
                }
            })
            .or(file.document_url)
            .unwrap_or(defaults.document_url);

        let page_path = std::env::var(ENV_PAGE_PATH)
            .ok()
            .map(PathBuf::from)
            .or(file.page_path)
            .unwrap_or(defaults.page_path);

        let refresh_period_ms = std::env::var(ENV_REFRESH_MS)
            .ok()
            .and_then(|v| v.parse().ok())
            .or(file.refresh_period_ms)
            .unwrap_or(defaults.refresh_period_ms);

        Self {
            document_url,
            page_path,
            refresh_period_ms,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    /// Refresh period, clamped to at least 1 ms
    pub fn refresh_period(&self) -> Duration {
        Duration::from_millis(self.refresh_period_ms.max(1))
    }
}
