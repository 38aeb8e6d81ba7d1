// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use cinegrade_domain::{ScoringProfile, Validate};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Upper bound on compiled patterns kept in memory.
    pub pattern_cache_capacity: u64,
    /// Rank lists at least this long are scored on the rayon pool.
    pub parallel_rank_threshold: usize,
    pub default_profile: String,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            pattern_cache_capacity: 10_000,
            parallel_rank_threshold: 64,
            default_profile: "maximum-quality".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// JSON catalog that replaces the built-in formats when set.
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub telemetry: TelemetryConfig,
    pub scoring: ScoringConfig,
    pub catalog: CatalogConfig,
    /// User profiles; an entry shadows the built-in profile with the same id.
    #[serde(default)]
    pub profiles: Vec<ScoringProfile>,
}

impl AppConfig {
    pub fn profile(&self, id: &str) -> Option<&ScoringProfile> {
        self.profiles
            .iter()
            .find(|profile| profile.id.eq_ignore_ascii_case(id))
    }

    fn check_profiles(&self) -> Result<()> {
        for profile in &self.profiles {
            if let Err(errors) = profile.validate() {
                let details = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                bail!("invalid profile '{}': {}", profile.id, details);
            }
        }
        Ok(())
    }
}

/// Load configuration from defaults, optional TOML file, and environment overrides (prefix: CINEGRADE_).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("CINEGRADE_").split("__"));

    let config: AppConfig = figment.extract()?;
    config.check_profiles()?;
    info!(
        target: "config",
        profiles = config.profiles.len(),
        default_profile = %config.scoring.default_profile,
        "configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_without_file_or_env() {
        Jail::expect_with(|_jail| {
            let config = load(None).map_err(|e| e.to_string())?;
            assert_eq!(config.telemetry.log_level, "info");
            assert_eq!(config.scoring.default_profile, "maximum-quality");
            assert_eq!(config.scoring.parallel_rank_threshold, 64);
            assert!(config.catalog.path.is_none());
            assert!(config.profiles.is_empty());
            Ok(())
        });
    }

    #[test]
    fn toml_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cinegrade.toml",
                r#"
                [scoring]
                default_profile = "efficient"
                pattern_cache_capacity = 128

                [catalog]
                path = "formats.json"

                [[profiles]]
                id = "mine"
                name = "Mine"
                min_score = 250

                [profiles.weights]
                res-2160p = -500
                src-remux = 900

                [profiles.size_limits]
                episode_min_mb = 100.0
                "#,
            )?;

            let config = load(Some(Path::new("cinegrade.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.scoring.default_profile, "efficient");
            assert_eq!(config.scoring.pattern_cache_capacity, 128);
            assert_eq!(config.scoring.parallel_rank_threshold, 64);
            assert_eq!(config.catalog.path, Some(PathBuf::from("formats.json")));

            let mine = config.profile("MINE").expect("profile loaded");
            assert_eq!(mine.min_score, 250);
            assert_eq!(mine.upgrade_until, i64::MAX);
            assert_eq!(mine.weights.get("res-2160p"), Some(&-500));
            assert_eq!(mine.size_limits.episode_min_mb, Some(100.0));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_file() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cinegrade.toml",
                "[telemetry]\nlog_level = \"warn\"\n",
            )?;
            jail.set_env("CINEGRADE_TELEMETRY__LOG_LEVEL", "debug");
            jail.set_env("CINEGRADE_SCORING__PARALLEL_RANK_THRESHOLD", "8");

            let config = load(Some(Path::new("cinegrade.toml"))).map_err(|e| e.to_string())?;
            assert_eq!(config.telemetry.log_level, "debug");
            assert_eq!(config.scoring.parallel_rank_threshold, 8);
            Ok(())
        });
    }

    #[test]
    fn invalid_profile_is_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "cinegrade.toml",
                r#"
                [[profiles]]
                id = "broken"
                name = "Broken"
                min_score = 100
                upgrade_until = 10
                "#,
            )?;

            let err = load(Some(Path::new("cinegrade.toml"))).unwrap_err();
            assert!(err.to_string().contains("broken"));
            assert!(err.to_string().contains("upgrade_until"));
            Ok(())
        });
    }
}
