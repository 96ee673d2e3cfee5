//! Runtime settings shared by the CLI and library consumers.

use crate::api::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_SERIES_POINTS};
use std::path::PathBuf;
use std::time::Duration;

const APP_DIR: &str = "wbi-connectivity";
const FAVORITES_FILE: &str = "favorites.json";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub base_url: String,
    /// Most-recent years fetched per indicator for a country's history.
    pub series_points: u32,
    pub favorites_path: PathBuf,
    pub timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.into(),
            series_points: DEFAULT_SERIES_POINTS,
            favorites_path: default_favorites_path(),
            timeout: None,
        }
    }
}

impl Settings {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.base_url.clone(),
            timeout: self.timeout,
            ..ClientConfig::default()
        }
    }
}

/// `<data dir>/wbi-connectivity/favorites.json`, or the working directory when
/// the platform has no data directory.
pub fn default_favorites_path() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
        .join(FAVORITES_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_config_carries_url_and_timeout() {
        let settings = Settings {
            base_url: "http://localhost:9".into(),
            timeout: Some(Duration::from_secs(5)),
            ..Settings::default()
        };
        let cfg = settings.client_config();
        assert_eq!(cfg.base_url, "http://localhost:9");
        assert_eq!(cfg.timeout, Some(Duration::from_secs(5)));
        assert!(settings.favorites_path.ends_with("favorites.json"));
    }
}
