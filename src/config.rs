// src/config.rs
use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Runtime configuration for a scrape run. Every component takes what it
/// needs from here; there is no process-wide state.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page to scrape for the produce price table.
    pub produce_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout_secs: u64,
    /// Total GET attempts before giving up.
    pub max_retries: u32,
    /// Base backoff in seconds; attempt `n` sleeps `n * base` before retrying.
    pub retry_backoff_secs: u64,
    /// Origin substrings that mark an item as local. Matched case-sensitively
    /// by containment, so "NC" also matches inside longer tokens.
    pub local_indicators: Vec<String>,
    /// HTML template with {timestamp}, {local_table}, {non_local_table}.
    pub template_file: PathBuf,
    /// Where the rendered report is written.
    pub output_file: PathBuf,
    /// Treat zero surviving records as an error instead of rendering an
    /// empty report.
    pub fail_on_empty: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            produce_url: "https://www.foodcoop.com/produce/".to_string(),
            request_timeout_secs: 30,
            max_retries: 3,
            retry_backoff_secs: 1,
            local_indicators: [
                "500 miles",
                "NY",
                "New York",
                "VT",
                "Vermont",
                "MA",
                "Massachusetts",
                "PA",
                "Pennsylvania",
                "NJ",
                "New Jersey",
                "CT",
                "Connecticut",
                "Company",
                "NC",
                "North Carolina",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            template_file: PathBuf::from("templates/produce_list_template.html"),
            output_file: PathBuf::from("index.html"),
            fail_on_empty: true,
        }
    }
}

impl Config {
    /// Read a JSON config file. A file that exists but cannot be read or
    /// parsed is a fatal configuration error.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Load `path` if it exists, otherwise fall back to the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            info!(path = %path.display(), "loading config");
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_match_upstream() {
        let config = Config::default();
        assert_eq!(config.produce_url, "https://www.foodcoop.com/produce/");
        assert_eq!(config.max_retries, 3);
        assert!(config.local_indicators.iter().any(|s| s == "500 miles"));
        assert!(config.fail_on_empty);
    }

    #[test]
    fn partial_file_overrides_defaults() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, r#"{{ "max_retries": 5, "fail_on_empty": false }}"#)?;

        let config = Config::from_file(tmp.path())?;
        assert_eq!(config.max_retries, 5);
        assert!(!config.fail_on_empty);
        // Untouched fields keep their defaults.
        assert_eq!(config.request_timeout_secs, 30);
        Ok(())
    }

    #[test]
    fn malformed_file_is_an_error() -> Result<()> {
        let mut tmp = NamedTempFile::new()?;
        writeln!(tmp, "not json")?;
        assert!(Config::from_file(tmp.path()).is_err());
        Ok(())
    }

    #[test]
    fn load_falls_back_when_absent() -> Result<()> {
        let config = Config::load("definitely/not/a/real/config.json")?;
        assert_eq!(config.max_retries, 3);
        Ok(())
    }
}
