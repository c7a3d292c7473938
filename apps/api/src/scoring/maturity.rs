//! Maturity Scorer: one normalised score per assessment.
//!
//! score = Σ(cluster_mean × weight) / Σ weight, rounded to one decimal.
//! Clusters are visited in canonical order, so the result never depends on
//! the key order of the input.

use std::collections::BTreeMap;

use crate::models::skills::{cluster_mean, round1, ClusterKind, SkillsAssessment};
use crate::scoring::targets::StageTargets;

pub fn compute_maturity_score(skills: &SkillsAssessment, targets: &StageTargets) -> f64 {
    let mut total_score = 0.0;
    let mut total_weight = 0.0;

    for (kind, cluster) in skills.clusters() {
        let Some(mean) = cluster_mean(cluster) else {
            continue;
        };
        let weight = targets.cluster(kind);
        total_score += mean * weight;
        total_weight += weight;
    }

    if total_weight > 0.0 {
        round1(total_score / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

/// Rounded mean score per cluster, reported alongside the overall score.
pub fn cluster_scores(skills: &SkillsAssessment) -> BTreeMap<ClusterKind, f64> {
    skills
        .clusters()
        .filter_map(|(kind, cluster)| cluster_mean(cluster).map(|mean| (kind, round1(mean))))
        .collect()
}
