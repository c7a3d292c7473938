//! Benchmark Store: stage-keyed target weights and expected depth levels.
//!
//! Loaded once at startup from two JSON files and shared read-only behind an
//! `Arc` in `AppState`. Any failure here is fatal: the process refuses to
//! serve without benchmarks.

pub mod stage;

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::models::capability::CapabilityKind;
use crate::models::skills::ClusterKind;

pub use stage::Stage;

/// Target weight per cluster kind and capability name for one stage.
pub type WeightRow = BTreeMap<String, f64>;

type RawWeights = BTreeMap<String, WeightRow>;
type RawDepths = BTreeMap<String, BTreeMap<String, BTreeMap<String, u64>>>;

#[derive(Debug, Error)]
pub enum BenchmarkError {
    #[error("Benchmark file '{path}' could not be read: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Benchmark file '{path}' is malformed: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },

    #[error("Stage weight table has no '{0}' row, which is required as the fallback stage")]
    MissingFallbackStage(Stage),

    #[error("Weight for '{key}' in stage '{stage}' is {value}; weights must lie in [0, 1]")]
    WeightOutOfRange {
        stage: Stage,
        key: String,
        value: f64,
    },

    #[error("Expected depth for '{skill}' in {stage}/{cluster} is {value}; depths must lie in 1-4")]
    DepthOutOfRange {
        stage: Stage,
        cluster: &'static str,
        skill: String,
        value: u64,
    },
}

/// Immutable benchmark tables. Construct once, pass by reference.
#[derive(Debug, Clone)]
pub struct Benchmarks {
    weights: BTreeMap<Stage, WeightRow>,
    depths: BTreeMap<Stage, BTreeMap<ClusterKind, BTreeMap<String, u8>>>,
}

impl Benchmarks {
    /// Reads and validates both benchmark files.
    pub fn load(stage_path: &Path, depth_path: &Path) -> Result<Self, BenchmarkError> {
        let weights: RawWeights = read_json(stage_path)?;
        let depths: RawDepths = read_json(depth_path)?;
        let benchmarks = Self::build(weights, depths)?;
        info!(
            "Benchmarks loaded: {} weighted stages, {} depth-configured stages",
            benchmarks.weights.len(),
            benchmarks.depths.len()
        );
        Ok(benchmarks)
    }

    /// Builds benchmarks from in-memory JSON documents.
    #[cfg(test)]
    pub fn from_json(stage_json: &str, depth_json: &str) -> Result<Self, BenchmarkError> {
        let weights: RawWeights = parse_json(stage_json, "<stage weights>")?;
        let depths: RawDepths = parse_json(depth_json, "<depth levels>")?;
        Self::build(weights, depths)
    }

    fn build(raw_weights: RawWeights, raw_depths: RawDepths) -> Result<Self, BenchmarkError> {
        let mut weights = BTreeMap::new();
        for (stage_key, row) in raw_weights {
            let Some(stage) = Stage::parse(&stage_key) else {
                warn!("Ignoring weights for unknown stage '{stage_key}'");
                continue;
            };
            for (key, value) in &row {
                if !(0.0..=1.0).contains(value) {
                    return Err(BenchmarkError::WeightOutOfRange {
                        stage,
                        key: key.clone(),
                        value: *value,
                    });
                }
                if ClusterKind::from_key(key).is_none()
                    && !CapabilityKind::ALL.iter().any(|c| c.key() == key)
                {
                    warn!("Stage '{stage}' weights an unrecognised key '{key}'");
                }
            }
            weights.insert(stage, row);
        }

        if !weights.contains_key(&Stage::FALLBACK) {
            return Err(BenchmarkError::MissingFallbackStage(Stage::FALLBACK));
        }
        for stage in Stage::ALL {
            if !weights.contains_key(&stage) {
                warn!("No weights configured for stage '{stage}'; it will use {} weights", Stage::FALLBACK);
            }
        }

        let mut depths = BTreeMap::new();
        for (stage_key, clusters) in raw_depths {
            let Some(stage) = Stage::parse(&stage_key) else {
                warn!("Ignoring depth levels for unknown stage '{stage_key}'");
                continue;
            };
            let mut per_cluster = BTreeMap::new();
            for (cluster_key, skills) in clusters {
                let Some(cluster) = ClusterKind::from_key(&cluster_key) else {
                    warn!("Ignoring depth levels for unknown cluster '{cluster_key}' in stage '{stage}'");
                    continue;
                };
                let mut expected = BTreeMap::new();
                for (skill, value) in skills {
                    if !(1..=4).contains(&value) {
                        return Err(BenchmarkError::DepthOutOfRange {
                            stage,
                            cluster: cluster.key(),
                            skill,
                            value,
                        });
                    }
                    expected.insert(skill, value as u8);
                }
                per_cluster.insert(cluster, expected);
            }
            depths.insert(stage, per_cluster);
        }

        if weights.keys().any(|stage| !depths.contains_key(stage)) {
            warn!("Config stage mismatch - some scoring stages lack depth configs");
        }

        Ok(Self { weights, depths })
    }

    /// True when the stage has its own weight row.
    pub fn has_stage(&self, stage: Stage) -> bool {
        self.weights.contains_key(&stage)
    }

    pub fn weights_for(&self, stage: Stage) -> Option<&WeightRow> {
        self.weights.get(&stage)
    }

    /// Expected depth for a skill, or `None` when the table has no entry.
    pub fn expected_depth(&self, stage: Stage, cluster: ClusterKind, skill: &str) -> Option<u8> {
        self.depths
            .get(&stage)
            .and_then(|clusters| clusters.get(&cluster))
            .and_then(|skills| skills.get(skill))
            .copied()
    }

    /// Benchmarks built from the shipped data files.
    #[cfg(test)]
    pub fn fixture() -> Self {
        Self::from_json(
            include_str!("../../data/stage_benchmarks.json"),
            include_str!("../../data/depth_benchmarks.json"),
        )
        .expect("shipped benchmark data must be valid")
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, BenchmarkError> {
    let label = path.display().to_string();
    let contents = fs::read_to_string(path).map_err(|source| BenchmarkError::Io {
        path: label.clone(),
        source,
    })?;
    parse_json(&contents, &label)
}

fn parse_json<T: DeserializeOwned>(contents: &str, label: &str) -> Result<T, BenchmarkError> {
    serde_json::from_str(contents).map_err(|source| BenchmarkError::Parse {
        path: label.to_string(),
        source,
    })
}
