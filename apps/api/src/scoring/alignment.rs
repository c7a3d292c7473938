use std::collections::BTreeMap;

use serde::Serialize;

use crate::benchmarks::Stage;
use crate::models::skills::{cluster_mean, round1, ClusterKind, SkillsAssessment};
use crate::scoring::targets::StageTargets;

/// Tolerance for "mean equals target" comparisons.
const EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StageAlignment {
    pub matches: bool,
    pub gaps: BTreeMap<ClusterKind, f64>,
    pub recommendations: Vec<String>,
}

/// Per-cluster pass/fail against the stage targets.
///
/// Targets and cluster means are both on the 0–1 scale.
pub fn evaluate_alignment(
    skills: &SkillsAssessment,
    targets: &StageTargets,
    stage: Stage,
) -> StageAlignment {
    let mut alignment = StageAlignment {
        matches: true,
        gaps: BTreeMap::new(),
        recommendations: vec![],
    };

    for (kind, cluster) in skills.clusters() {
        let Some(average) = cluster_mean(cluster) else {
            continue;
        };
        let required = targets.cluster(kind);
        if average + EPSILON < required {
            let gap = round1(required - average);
            alignment.matches = false;
            alignment.gaps.insert(kind, gap);
            alignment.recommendations.push(format!(
                "Improve {} to meet {stage} requirements (gap: {gap})",
                kind.label()
            ));
        }
    }

    alignment
}
