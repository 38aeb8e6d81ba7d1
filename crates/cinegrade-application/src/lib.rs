// SPDX-License-Identifier: GPL-3.0-or-later
use std::sync::Arc;

use anyhow::{Context, Result};
use cinegrade_config::AppConfig;
use cinegrade_domain::ScoringProfile;
use cinegrade_formats::{profiles, FormatCatalog};

pub mod comparison;
pub mod evaluator;
pub mod exclusivity;
pub mod explain;
pub mod matcher;
pub mod patterns;
pub mod release_parsing;
pub mod scorer;
pub mod size;

pub use comparison::{
    cutoff_met, Comparison, RankedRelease, UpgradeDecision, UpgradeOptions, Winner,
};
pub use evaluator::{evaluate_condition, ConditionEvaluation};
pub use exclusivity::resolve_exclusivity;
pub use explain::explain;
pub use matcher::{evaluate_catalog, match_catalog, match_format, FormatMatch};
pub use patterns::{CompiledPattern, PatternCache};
pub use release_parsing::{parse_release_name, ReleaseParser, SceneNameParser};
pub use scorer::{ReleaseCandidate, ScoringEngine};
pub use size::{validate_size, SizeVerdict};

use tracing::info;

/// Engine and profiles assembled from configuration.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub engine: ScoringEngine,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self> {
        let catalog = match &config.catalog.path {
            Some(path) => FormatCatalog::from_json_file(path)
                .with_context(|| format!("loading catalog from {}", path.display()))?,
            None => FormatCatalog::builtin(),
        };

        let engine = ScoringEngine::new(Arc::new(catalog))
            .with_pattern_cache(PatternCache::new(config.scoring.pattern_cache_capacity))
            .with_parallel_threshold(config.scoring.parallel_rank_threshold);

        Ok(Self { config, engine })
    }

    pub fn on_start(&self) {
        info!(
            target: "application",
            formats = self.engine.catalog().len(),
            profiles = self.profiles().len(),
            "scoring engine initialized"
        );
    }

    /// Configured profiles followed by the built-ins they do not shadow.
    pub fn profiles(&self) -> Vec<ScoringProfile> {
        let mut all = self.config.profiles.clone();
        all.extend(
            profiles::builtin()
                .into_iter()
                .filter(|builtin| self.config.profile(&builtin.id).is_none()),
        );
        all
    }

    /// Look up a profile by id, falling back to the configured default.
    pub fn profile(&self, id: Option<&str>) -> Result<ScoringProfile> {
        let id = id.unwrap_or(&self.config.scoring.default_profile);
        self.config
            .profile(id)
            .cloned()
            .or_else(|| profiles::find(id))
            .with_context(|| format!("unknown scoring profile '{id}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinegrade_domain::{ConditionKind, CustomFormat, FormatCategory, FormatCondition};
    use std::io::Write;

    #[test]
    fn builtin_state_resolves_default_profile() {
        let state = AppState::new(AppConfig::default()).unwrap();
        let profile = state.profile(None).unwrap();
        assert_eq!(profile.id, profiles::MAXIMUM_QUALITY);
        assert!(state.engine.catalog().len() > 100);
        assert!(state.profile(Some("nope")).is_err());
    }

    #[test]
    fn configured_profile_shadows_builtin() {
        let mut config = AppConfig::default();
        let mut custom = ScoringProfile::new(profiles::EFFICIENT, "My Efficient");
        custom.min_score = 42;
        config.profiles.push(custom);

        let state = AppState::new(config).unwrap();
        assert_eq!(state.profile(Some("efficient")).unwrap().min_score, 42);

        let listed = state.profiles();
        assert_eq!(
            listed.iter().filter(|p| p.id == profiles::EFFICIENT).count(),
            1
        );
        assert_eq!(listed.len(), profiles::builtin().len());
    }

    #[test]
    fn catalog_path_replaces_builtin_catalog() {
        let catalog = FormatCatalog::from_formats(vec![CustomFormat::new(
            "only",
            "Only",
            FormatCategory::Enhancement,
            7,
            vec![FormatCondition::new("only", ConditionKind::Title("only".into()))],
        )])
        .unwrap();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(catalog.to_json_string().unwrap().as_bytes())
            .unwrap();

        let mut config = AppConfig::default();
        config.catalog.path = Some(file.path().to_path_buf());
        let state = AppState::new(config).unwrap();
        assert_eq!(state.engine.catalog().len(), 1);
    }

    #[test]
    fn missing_catalog_file_is_an_error() {
        let mut config = AppConfig::default();
        config.catalog.path = Some("/nonexistent/catalog.json".into());
        let err = AppState::new(config).err().unwrap();
        assert!(format!("{err:#}").contains("/nonexistent/catalog.json"));
    }
}
