//! Per-evaluation view of the benchmark tables for one resolved stage.
//!
//! Defaults are applied here, once, so each calculator reads complete tables
//! and each missing entry produces exactly one warning.

use std::collections::BTreeMap;

use crate::benchmarks::{Benchmarks, Stage, WeightRow};
use crate::models::capability::CapabilityKind;
use crate::models::skills::{ClusterKind, SkillsAssessment};
use crate::scoring::diagnostics::{Diagnostics, WarningKind};

/// Neutral weight used when a stage row or entry is absent.
pub const DEFAULT_TARGET_WEIGHT: f64 = 0.8;

/// Least demanding depth, assumed when a skill has no benchmark entry.
pub const DEFAULT_EXPECTED_DEPTH: u8 = 1;

/// Target weights for the four clusters and four capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct StageTargets {
    clusters: BTreeMap<ClusterKind, f64>,
    capabilities: BTreeMap<CapabilityKind, f64>,
}

impl StageTargets {
    pub fn resolve(row: Option<&WeightRow>, stage: Stage, diagnostics: &mut Diagnostics) -> Self {
        let Some(row) = row else {
            diagnostics.warn(
                WarningKind::MissingField,
                format!(
                    "Missing target weights for stage {stage}; using {DEFAULT_TARGET_WEIGHT} for every cluster and capability"
                ),
            );
            return Self::uniform(DEFAULT_TARGET_WEIGHT);
        };

        let mut lookup = |key: &str| match row.get(key) {
            Some(weight) => *weight,
            None => {
                diagnostics.warn(
                    WarningKind::MissingField,
                    format!("No target weight for '{key}' at stage {stage}; using {DEFAULT_TARGET_WEIGHT}"),
                );
                DEFAULT_TARGET_WEIGHT
            }
        };

        let clusters = ClusterKind::ALL
            .into_iter()
            .map(|kind| (kind, lookup(kind.key())))
            .collect();
        let capabilities = CapabilityKind::ALL
            .into_iter()
            .map(|kind| (kind, lookup(kind.key())))
            .collect();

        Self {
            clusters,
            capabilities,
        }
    }

    pub fn uniform(weight: f64) -> Self {
        Self {
            clusters: ClusterKind::ALL.into_iter().map(|k| (k, weight)).collect(),
            capabilities: CapabilityKind::ALL.into_iter().map(|k| (k, weight)).collect(),
        }
    }

    pub fn cluster(&self, kind: ClusterKind) -> f64 {
        self.clusters.get(&kind).copied().unwrap_or(DEFAULT_TARGET_WEIGHT)
    }

    pub fn capability(&self, kind: CapabilityKind) -> f64 {
        self.capabilities
            .get(&kind)
            .copied()
            .unwrap_or(DEFAULT_TARGET_WEIGHT)
    }
}

/// Expected depth for every skill present in an assessment.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DepthTargets {
    expected: BTreeMap<ClusterKind, BTreeMap<String, u8>>,
}

impl DepthTargets {
    pub fn resolve(
        skills: &SkillsAssessment,
        benchmarks: &Benchmarks,
        stage: Stage,
        diagnostics: &mut Diagnostics,
    ) -> Self {
        let mut expected = BTreeMap::new();
        for (kind, cluster) in skills.clusters() {
            let mut unconfigured = Vec::new();
            let per_skill: BTreeMap<String, u8> = cluster
                .keys()
                .map(|name| {
                    let depth = benchmarks
                        .expected_depth(stage, kind, name)
                        .unwrap_or_else(|| {
                            unconfigured.push(name.as_str());
                            DEFAULT_EXPECTED_DEPTH
                        });
                    (name.clone(), depth)
                })
                .collect();

            if !unconfigured.is_empty() {
                diagnostics.warn(
                    WarningKind::MissingField,
                    format!(
                        "No expected depth for {} skills [{}] at stage {stage}; assuming {DEFAULT_EXPECTED_DEPTH}",
                        kind.key(),
                        unconfigured.join(", ")
                    ),
                );
            }
            expected.insert(kind, per_skill);
        }
        Self { expected }
    }

    pub fn get(&self, kind: ClusterKind, skill: &str) -> u8 {
        self.expected
            .get(&kind)
            .and_then(|skills| skills.get(skill))
            .copied()
            .unwrap_or(DEFAULT_EXPECTED_DEPTH)
    }
}
