use promptlab_core::ReconcileOptions;
use serde::{Deserialize, Serialize};
use std::env;

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server host
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Largest template, in lines, the server will diff. `None` disables the cap.
    #[serde(default = "default_max_diff_lines")]
    pub max_diff_lines: Option<usize>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_max_diff_lines() -> Option<usize> {
    Some(500)
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_diff_lines: default_max_diff_lines(),
        }
    }
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok(); // Load .env file if it exists

        let max_diff_lines = match env::var("MAX_DIFF_LINES") {
            Ok(raw) => parse_max_diff_lines(&raw)?,
            Err(_) => default_max_diff_lines(),
        };

        let settings = Settings {
            host: env::var("HOST").unwrap_or_else(|_| default_host()),
            port: env::var("PORT")
                .map(|p| p.parse().unwrap_or(default_port()))
                .unwrap_or(default_port()),
            max_diff_lines,
        };

        Ok(settings)
    }

    /// Get the server address as a string
    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Options applied to every reconciliation this server runs
    pub fn reconcile_options(&self) -> ReconcileOptions {
        ReconcileOptions::new().with_max_diff_lines(self.max_diff_lines)
    }
}

/// `0` turns the cap off
fn parse_max_diff_lines(raw: &str) -> Result<Option<usize>, anyhow::Error> {
    let value: usize = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("MAX_DIFF_LINES must be a non-negative integer, got {raw:?}"))?;
    Ok((value > 0).then_some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_max_diff_lines() {
        assert_eq!(parse_max_diff_lines("200").unwrap(), Some(200));
        assert_eq!(parse_max_diff_lines(" 0 ").unwrap(), None);
        assert!(parse_max_diff_lines("many").is_err());
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.server_address(), "0.0.0.0:8000");
        assert_eq!(settings.reconcile_options().max_diff_lines, Some(500));
        assert!(!settings.reconcile_options().include_diff);
    }
}
