//! Orchestration policy.
//!
//! There is no process-wide default instance: every orchestrator owns the
//! [`OrchestrationConfig`] it was built with, and callers that need a
//! different policy for one request derive a new orchestrator from it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{BraidError, BraidResult};
use crate::types::InformationSource;

/// Multiplier applied to raw scores, per source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceWeights {
    pub knowledge_graph: f32,
    pub design_docs: f32,
    pub mcp: f32,
    pub other: f32,
}

impl Default for SourceWeights {
    fn default() -> Self {
        Self {
            knowledge_graph: 0.5,
            design_docs: 0.3,
            mcp: 0.15,
            other: 0.05,
        }
    }
}

impl SourceWeights {
    /// Weight configured for `source`.
    pub fn get(&self, source: InformationSource) -> f32 {
        match source {
            InformationSource::KnowledgeGraph => self.knowledge_graph,
            InformationSource::DesignDocs => self.design_docs,
            InformationSource::Mcp => self.mcp,
            InformationSource::Other => self.other,
        }
    }

    /// Replace the weight for `source`.
    pub fn set(&mut self, source: InformationSource, weight: f32) {
        match source {
            InformationSource::KnowledgeGraph => self.knowledge_graph = weight,
            InformationSource::DesignDocs => self.design_docs = weight,
            InformationSource::Mcp => self.mcp = weight,
            InformationSource::Other => self.other = weight,
        }
    }
}

/// Tunable policy for one orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestrationConfig {
    /// Approximate token budget for the assembled context.
    pub max_tokens: usize,
    /// Items whose weighted score falls below this are dropped.
    pub min_relevance_score: f32,
    /// Per-source score multipliers.
    pub source_weights: SourceWeights,
    /// Similarity allowance for the optional diversity filter.
    /// Only read when `enable_diversity_filter` is set.
    pub diversity_threshold: f32,
    /// Drop candidates that are near-copies of a higher-ranked candidate.
    pub enable_diversity_filter: bool,
    /// Deadline for each provider fetch, in milliseconds. `None` waits forever.
    pub provider_timeout_ms: Option<u64>,
}

impl Default for OrchestrationConfig {
    fn default() -> Self {
        Self {
            max_tokens: 4000,
            min_relevance_score: 0.05,
            source_weights: SourceWeights::default(),
            diversity_threshold: 0.3,
            enable_diversity_filter: false,
            provider_timeout_ms: Some(10_000),
        }
    }
}

impl OrchestrationConfig {
    /// Validate every field, failing on the first violation.
    pub fn validate(&self) -> BraidResult<()> {
        if self.max_tokens == 0 {
            return Err(BraidError::out_of_range(
                "max_tokens",
                self.max_tokens,
                "greater than 0",
            ));
        }
        if !unit_interval(self.min_relevance_score) {
            return Err(BraidError::out_of_range(
                "min_relevance_score",
                self.min_relevance_score,
                "between 0.0 and 1.0",
            ));
        }
        for source in InformationSource::PRECEDENCE {
            let weight = self.source_weights.get(source);
            if !unit_interval(weight) {
                return Err(BraidError::out_of_range(
                    &format!("source_weights.{}", source),
                    weight,
                    "between 0.0 and 1.0",
                ));
            }
        }
        if !unit_interval(self.diversity_threshold) {
            return Err(BraidError::out_of_range(
                "diversity_threshold",
                self.diversity_threshold,
                "between 0.0 and 1.0",
            ));
        }
        if self.provider_timeout_ms == Some(0) {
            return Err(BraidError::out_of_range(
                "provider_timeout_ms",
                0,
                "greater than 0 when set",
            ));
        }
        Ok(())
    }

    /// Per-provider fetch deadline.
    pub fn provider_timeout(&self) -> Option<Duration> {
        self.provider_timeout_ms.map(Duration::from_millis)
    }

    /// Load configuration from a file (TOML, JSON, or YAML).
    pub fn from_file(path: impl AsRef<Path>) -> BraidResult<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let ext = path.as_ref().extension().and_then(|e| e.to_str());

        let config: Self = match ext {
            Some("toml") => {
                toml::from_str(&content).map_err(|e| BraidError::Configuration(e.to_string()))?
            }
            Some("json") => serde_json::from_str(&content)
                .map_err(|e| BraidError::Configuration(e.to_string()))?,
            Some("yaml" | "yml") => serde_yaml::from_str(&content)
                .map_err(|e| BraidError::Configuration(e.to_string()))?,
            _ => {
                return Err(BraidError::Configuration(
                    "Unsupported config file format. Use .toml, .json, or .yaml".to_string(),
                ))
            }
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `BRAID_*` environment variables over the defaults.
    pub fn from_env() -> BraidResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`Self::from_env`] but reading variables through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> BraidResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup("BRAID_MAX_TOKENS") {
            config.max_tokens = parse_var("BRAID_MAX_TOKENS", &value)?;
        }
        if let Some(value) = lookup("BRAID_MIN_RELEVANCE_SCORE") {
            config.min_relevance_score = parse_var("BRAID_MIN_RELEVANCE_SCORE", &value)?;
        }
        if let Some(value) = lookup("BRAID_PROVIDER_TIMEOUT_MS") {
            config.provider_timeout_ms = match value.trim() {
                "" | "none" | "off" => None,
                raw => Some(parse_var("BRAID_PROVIDER_TIMEOUT_MS", raw)?),
            };
        }
        if let Some(value) = lookup("BRAID_DIVERSITY_THRESHOLD") {
            config.diversity_threshold = parse_var("BRAID_DIVERSITY_THRESHOLD", &value)?;
        }
        if let Some(value) = lookup("BRAID_ENABLE_DIVERSITY_FILTER") {
            config.enable_diversity_filter = parse_var("BRAID_ENABLE_DIVERSITY_FILTER", &value)?;
        }

        let weight_vars = [
            ("BRAID_WEIGHT_KNOWLEDGE_GRAPH", InformationSource::KnowledgeGraph),
            ("BRAID_WEIGHT_DESIGN_DOCS", InformationSource::DesignDocs),
            ("BRAID_WEIGHT_MCP", InformationSource::Mcp),
            ("BRAID_WEIGHT_OTHER", InformationSource::Other),
        ];
        for (key, source) in weight_vars {
            if let Some(value) = lookup(key) {
                config.source_weights.set(source, parse_var(key, &value)?);
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Build configuration using builder pattern.
    pub fn builder() -> OrchestrationConfigBuilder {
        OrchestrationConfigBuilder::default()
    }
}

fn unit_interval(value: f32) -> bool {
    value.is_finite() && (0.0..=1.0).contains(&value)
}

fn parse_var<T: std::str::FromStr>(key: &str, value: &str) -> BraidResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| BraidError::Configuration(format!("{} has an invalid value: {:?}", key, value)))
}

/// Builder for OrchestrationConfig.
#[derive(Default)]
pub struct OrchestrationConfigBuilder {
    config: OrchestrationConfig,
}

impl OrchestrationConfigBuilder {
    /// Set the token budget.
    pub fn max_tokens(mut self, max_tokens: usize) -> Self {
        self.config.max_tokens = max_tokens;
        self
    }

    /// Set the relevance floor.
    pub fn min_relevance_score(mut self, score: f32) -> Self {
        self.config.min_relevance_score = score;
        self
    }

    /// Replace all source weights.
    pub fn source_weights(mut self, weights: SourceWeights) -> Self {
        self.config.source_weights = weights;
        self
    }

    /// Override one source weight.
    pub fn source_weight(mut self, source: InformationSource, weight: f32) -> Self {
        self.config.source_weights.set(source, weight);
        self
    }

    /// Turn on the diversity filter with the given threshold.
    pub fn diversity_filter(mut self, threshold: f32) -> Self {
        self.config.enable_diversity_filter = true;
        self.config.diversity_threshold = threshold;
        self
    }

    /// Set the per-provider timeout. `None` disables it.
    pub fn provider_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.config.provider_timeout_ms = timeout.map(|t| t.as_millis() as u64);
        self
    }

    /// Validate and build the configuration.
    pub fn build(self) -> BraidResult<OrchestrationConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = OrchestrationConfig::default();
        assert_eq!(config.max_tokens, 4000);
        assert!((config.min_relevance_score - 0.05).abs() < f32::EPSILON);
        assert!((config.source_weights.knowledge_graph - 0.5).abs() < f32::EPSILON);
        assert!((config.source_weights.design_docs - 0.3).abs() < f32::EPSILON);
        assert!((config.source_weights.mcp - 0.15).abs() < f32::EPSILON);
        assert!((config.source_weights.other - 0.05).abs() < f32::EPSILON);
        assert!((config.diversity_threshold - 0.3).abs() < f32::EPSILON);
        assert!(!config.enable_diversity_filter);
        assert_eq!(config.provider_timeout(), Some(Duration::from_secs(10)));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_errors() {
        let zero_budget = OrchestrationConfig {
            max_tokens: 0,
            ..Default::default()
        };
        assert!(zero_budget
            .validate()
            .unwrap_err()
            .to_string()
            .contains("max_tokens"));

        let bad_floor = OrchestrationConfig {
            min_relevance_score: 1.5,
            ..Default::default()
        };
        assert!(bad_floor.validate().is_err());

        let mut bad_weight = OrchestrationConfig::default();
        bad_weight.source_weights.mcp = f32::NAN;
        let err = bad_weight.validate().unwrap_err();
        assert!(err.to_string().contains("source_weights.mcp"));

        let zero_timeout = OrchestrationConfig {
            provider_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());

        let no_timeout = OrchestrationConfig {
            provider_timeout_ms: None,
            ..Default::default()
        };
        assert!(no_timeout.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = OrchestrationConfig::builder()
            .max_tokens(3000)
            .min_relevance_score(0.1)
            .source_weight(InformationSource::Mcp, 0.2)
            .diversity_filter(0.4)
            .provider_timeout(None)
            .build()
            .unwrap();

        assert_eq!(config.max_tokens, 3000);
        assert!((config.source_weights.get(InformationSource::Mcp) - 0.2).abs() < f32::EPSILON);
        assert!(config.enable_diversity_filter);
        assert!(config.provider_timeout().is_none());

        assert!(OrchestrationConfig::builder().max_tokens(0).build().is_err());
    }

    #[test]
    fn test_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("BRAID_MAX_TOKENS", "3000"),
            ("BRAID_MIN_RELEVANCE_SCORE", "0.1"),
            ("BRAID_PROVIDER_TIMEOUT_MS", "off"),
            ("BRAID_WEIGHT_DESIGN_DOCS", "0.4"),
        ]
        .into_iter()
        .collect();

        let config =
            OrchestrationConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(config.max_tokens, 3000);
        assert!((config.min_relevance_score - 0.1).abs() < f32::EPSILON);
        assert!(config.provider_timeout_ms.is_none());
        assert!((config.source_weights.design_docs - 0.4).abs() < f32::EPSILON);
        assert!((config.source_weights.knowledge_graph - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = OrchestrationConfig::from_lookup(|k| {
            (k == "BRAID_MAX_TOKENS").then(|| "lots".to_string())
        })
        .unwrap_err();
        assert!(err.to_string().contains("BRAID_MAX_TOKENS"));

        let err = OrchestrationConfig::from_lookup(|k| {
            (k == "BRAID_MAX_TOKENS").then(|| "0".to_string())
        })
        .unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "max_tokens = 3000\nmin_relevance_score = 0.05\n\n[source_weights]\nmcp = 0.25\n"
        )
        .unwrap();

        let config = OrchestrationConfig::from_file(file.path()).unwrap();
        assert_eq!(config.max_tokens, 3000);
        assert!((config.source_weights.mcp - 0.25).abs() < f32::EPSILON);
        // Unset weights fall back to their defaults.
        assert!((config.source_weights.knowledge_graph - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_from_file_rejects_invalid_values_and_formats() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"max_tokens": 0}}"#).unwrap();
        assert!(OrchestrationConfig::from_file(file.path()).is_err());

        let file = tempfile::Builder::new().suffix(".ini").tempfile().unwrap();
        let err = OrchestrationConfig::from_file(file.path()).unwrap_err();
        assert!(err.to_string().contains("Unsupported config file format"));
    }
}
