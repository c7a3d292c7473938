//! Gap Calculator: per-skill shortfall against the stage's cluster target.
//!
//! gap = round1(max(0, target − effective_score))
//!
//! `effective_score` equals the clamped score unless depth adjustment is on,
//! in which case each level of depth shortfall (capped at 3) removes 10% of it.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::skills::{round1, ClusterKind, Skill, SkillsAssessment};
use crate::scoring::targets::{DepthTargets, StageTargets};

const DEPTH_PENALTY_PER_LEVEL: f64 = 0.1;
const MAX_PENALISED_LEVELS: u8 = 3;

pub type SkillGaps = BTreeMap<ClusterKind, BTreeMap<String, f64>>;

/// Score used for gap computation.
pub fn effective_score(skill: &Skill, expected_depth: u8, depth_adjusted: bool) -> f64 {
    let score = skill.clamped_score();
    if !depth_adjusted {
        return score;
    }
    let shortfall = expected_depth
        .saturating_sub(skill.reported_depth)
        .min(MAX_PENALISED_LEVELS);
    score * (1.0 - DEPTH_PENALTY_PER_LEVEL * f64::from(shortfall))
}

pub fn compute_gaps(
    skills: &SkillsAssessment,
    targets: &StageTargets,
    depths: &DepthTargets,
    depth_adjusted: bool,
) -> SkillGaps {
    skills
        .clusters()
        .map(|(kind, cluster)| {
            let target = targets.cluster(kind);
            let per_skill = cluster
                .iter()
                .map(|(name, skill)| {
                    let effective = effective_score(skill, depths.get(kind, name), depth_adjusted);
                    (name.clone(), round1((target - effective).max(0.0)))
                })
                .collect();
            (kind, per_skill)
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillScores {
    /// The assessor's literal score.
    pub raw: f64,
    pub effective: f64,
}

/// A skill as supplied, plus the scores derived from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotatedSkill {
    pub score: f64,
    pub reported_depth: u8,
    pub evidence: Vec<String>,
    pub scores: SkillScores,
}

pub type AnnotatedSkills = BTreeMap<ClusterKind, BTreeMap<String, AnnotatedSkill>>;

/// Builds an annotated copy of the assessment. The input is left untouched.
pub fn annotate(
    skills: &SkillsAssessment,
    depths: &DepthTargets,
    depth_adjusted: bool,
) -> AnnotatedSkills {
    skills
        .clusters()
        .map(|(kind, cluster)| {
            let annotated = cluster
                .iter()
                .map(|(name, skill)| {
                    let effective = effective_score(skill, depths.get(kind, name), depth_adjusted);
                    let entry = AnnotatedSkill {
                        score: skill.score,
                        reported_depth: skill.reported_depth,
                        evidence: skill.evidence.clone(),
                        scores: SkillScores {
                            raw: skill.score,
                            effective,
                        },
                    };
                    (name.clone(), entry)
                })
                .collect();
            (kind, annotated)
        })
        .collect()
}
