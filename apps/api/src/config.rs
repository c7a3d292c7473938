use std::path::PathBuf;

use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub stage_benchmarks_path: PathBuf,
    pub depth_benchmarks_path: PathBuf,
    /// Substitute template clusters for unusable input instead of returning 422.
    pub allow_default_profile: bool,
    /// Penalise scores whose reported depth falls short of the stage expectation.
    pub depth_adjusted_gaps: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: env_or("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            stage_benchmarks_path: env_or("STAGE_BENCHMARKS_PATH", "data/stage_benchmarks.json")
                .into(),
            depth_benchmarks_path: env_or("DEPTH_BENCHMARKS_PATH", "data/depth_benchmarks.json")
                .into(),
            allow_default_profile: env_flag("ALLOW_DEFAULT_PROFILE")?,
            depth_adjusted_gaps: env_flag("DEPTH_ADJUSTED_GAPS")?,
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_flag(key: &str) -> Result<bool> {
    parse_flag(&env_or(key, "false"))
        .with_context(|| format!("Environment variable '{key}' must be true or false"))
}

fn parse_flag(raw: &str) -> Result<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => anyhow::bail!("unrecognised flag value '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag_accepts_common_spellings() {
        assert!(parse_flag("true").unwrap());
        assert!(parse_flag(" YES ").unwrap());
        assert!(parse_flag("1").unwrap());
        assert!(!parse_flag("false").unwrap());
        assert!(!parse_flag("").unwrap());
    }

    #[test]
    fn test_parse_flag_rejects_garbage() {
        assert!(parse_flag("maybe").is_err());
    }
}
