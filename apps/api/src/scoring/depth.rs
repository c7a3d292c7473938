//! Depth Analyzer: how deeply each skill is held versus how deeply the stage
//! needs it.
//!
//! Three outputs from one pass over the skills:
//! 1. per-skill depth gap: max(0, expected − reported)
//! 2. per-cluster composite: 1 − Σgap / Σmax(0, expected − 1), plus an overall
//!    mean and a threshold-triggered narrative
//! 3. a reverse index bucketing credibly assessed skills (score > 0) by their
//!    reported depth level, each bucket with its own narrative

use std::collections::BTreeMap;

use serde::Serialize;

use crate::benchmarks::Stage;
use crate::models::skills::{round1, ClusterKind, Skill, SkillsAssessment};
use crate::scoring::targets::DepthTargets;

/// Composites below this are called out in the narrative.
const COMPOSITE_THRESHOLD: f64 = 0.8;
const EVIDENCE_PER_SKILL: usize = 2;
const TOP_SKILLS: usize = 3;

/// Ordinal depth at which a skill is held, from least to most hands-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DepthLevel {
    Strategic = 1,
    Managerial = 2,
    Conversational = 3,
    Executional = 4,
}

impl DepthLevel {
    pub const ALL: [DepthLevel; 4] = [
        DepthLevel::Strategic,
        DepthLevel::Managerial,
        DepthLevel::Conversational,
        DepthLevel::Executional,
    ];

    /// Maps a reported depth to its level; values outside 1–4 saturate.
    pub fn from_depth(depth: u8) -> Self {
        match depth {
            0 | 1 => DepthLevel::Strategic,
            2 => DepthLevel::Managerial,
            3 => DepthLevel::Conversational,
            _ => DepthLevel::Executional,
        }
    }

    pub fn key(&self) -> &'static str {
        match self {
            DepthLevel::Strategic => "strategic",
            DepthLevel::Managerial => "managerial",
            DepthLevel::Conversational => "conversational",
            DepthLevel::Executional => "executional",
        }
    }

    pub fn proficiency(&self) -> &'static str {
        match self {
            DepthLevel::Strategic => "Strategic understanding",
            DepthLevel::Managerial => "Managerial oversight",
            DepthLevel::Conversational => "Conversational proficiency",
            DepthLevel::Executional => "Executional expertise",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DepthLevel::Strategic => {
                "frames direction and priorities, relying on others for delivery"
            }
            DepthLevel::Managerial => "directs the teams, budgets and processes that deliver the work",
            DepthLevel::Conversational => {
                "discusses the discipline credibly with peers, sales and the board"
            }
            DepthLevel::Executional => "personally builds and runs the work end to end",
        }
    }
}

/// Score band used when describing an individual skill.
pub fn assess_score(score: f64) -> &'static str {
    if score >= 0.9 {
        "Expert"
    } else if score >= 0.7 {
        "Proficient"
    } else if score >= 0.5 {
        "Competent"
    } else {
        "Developing"
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDepthGap {
    pub reported_depth: u8,
    pub expected_depth: u8,
    pub gap: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelSkill {
    pub name: String,
    pub category: ClusterKind,
    pub score: f64,
    pub assessment: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelBucket {
    pub level: DepthLevel,
    pub skills: Vec<LevelSkill>,
    pub evidence: Vec<String>,
    pub narrative: String,
}

impl LevelBucket {
    fn empty(level: DepthLevel) -> Self {
        Self {
            level,
            skills: vec![],
            evidence: vec![],
            narrative: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByLevel {
    pub strategic: LevelBucket,
    pub managerial: LevelBucket,
    pub conversational: LevelBucket,
    pub executional: LevelBucket,
}

impl ByLevel {
    #[cfg(test)]
    pub fn get(&self, level: DepthLevel) -> &LevelBucket {
        match level {
            DepthLevel::Strategic => &self.strategic,
            DepthLevel::Managerial => &self.managerial,
            DepthLevel::Conversational => &self.conversational,
            DepthLevel::Executional => &self.executional,
        }
    }

    fn get_mut(&mut self, level: DepthLevel) -> &mut LevelBucket {
        match level {
            DepthLevel::Strategic => &mut self.strategic,
            DepthLevel::Managerial => &mut self.managerial,
            DepthLevel::Conversational => &mut self.conversational,
            DepthLevel::Executional => &mut self.executional,
        }
    }

    #[cfg(test)]
    pub fn total_skills(&self) -> usize {
        DepthLevel::ALL.iter().map(|l| self.get(*l).skills.len()).sum()
    }
}

pub type PerSkillDepth = BTreeMap<ClusterKind, BTreeMap<String, SkillDepthGap>>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DepthAnalysis {
    pub per_skill: PerSkillDepth,
    pub composite: BTreeMap<ClusterKind, f64>,
    pub overall: f64,
    pub narrative: String,
    pub by_level: ByLevel,
}

pub fn analyze_depth(skills: &SkillsAssessment, depths: &DepthTargets, stage: Stage) -> DepthAnalysis {
    let per_skill = per_skill_gaps(skills, depths);
    let composite = composite_scores(&per_skill);
    let overall = overall_composite(&composite);
    let narrative = composite_narrative(&composite, stage);
    let by_level = bucket_by_level(skills);

    DepthAnalysis {
        per_skill,
        composite,
        overall,
        narrative,
        by_level,
    }
}

fn per_skill_gaps(skills: &SkillsAssessment, depths: &DepthTargets) -> PerSkillDepth {
    skills
        .clusters()
        .map(|(kind, cluster)| {
            let gaps = cluster
                .iter()
                .map(|(name, skill)| {
                    let expected = depths.get(kind, name);
                    let gap = SkillDepthGap {
                        reported_depth: skill.reported_depth,
                        expected_depth: expected,
                        gap: expected.saturating_sub(skill.reported_depth),
                    };
                    (name.clone(), gap)
                })
                .collect();
            (kind, gaps)
        })
        .collect()
}

fn composite_scores(per_skill: &PerSkillDepth) -> BTreeMap<ClusterKind, f64> {
    per_skill
        .iter()
        .map(|(kind, gaps)| {
            let total_gap: u32 = gaps.values().map(|g| u32::from(g.gap)).sum();
            let total_max_gap: u32 = gaps
                .values()
                .map(|g| u32::from(g.expected_depth.saturating_sub(1)))
                .sum();
            let composite = if total_max_gap > 0 {
                round1(1.0 - f64::from(total_gap) / f64::from(total_max_gap))
            } else {
                1.0
            };
            (*kind, composite)
        })
        .collect()
}

fn overall_composite(composite: &BTreeMap<ClusterKind, f64>) -> f64 {
    if composite.is_empty() {
        return 1.0;
    }
    round1(composite.values().sum::<f64>() / composite.len() as f64)
}

fn composite_narrative(composite: &BTreeMap<ClusterKind, f64>, stage: Stage) -> String {
    let shortfalls: Vec<String> = composite
        .iter()
        .filter(|(_, score)| **score < COMPOSITE_THRESHOLD)
        .map(|(kind, score)| {
            format!(
                "The {} composite depth score is {}%, below expectations.",
                kind.label(),
                (score * 100.0).round() as i64
            )
        })
        .collect();

    if shortfalls.is_empty() {
        format!("All skill clusters meet the expected depth for the {stage} stage.")
    } else {
        shortfalls.join(" ")
    }
}

fn bucket_by_level(skills: &SkillsAssessment) -> ByLevel {
    let mut by_level = ByLevel {
        strategic: LevelBucket::empty(DepthLevel::Strategic),
        managerial: LevelBucket::empty(DepthLevel::Managerial),
        conversational: LevelBucket::empty(DepthLevel::Conversational),
        executional: LevelBucket::empty(DepthLevel::Executional),
    };

    for (kind, cluster) in skills.clusters() {
        for (name, skill) in cluster {
            // zero or negative scores were not credibly assessed
            if skill.score <= 0.0 {
                continue;
            }
            let bucket = by_level.get_mut(DepthLevel::from_depth(skill.reported_depth));
            bucket.skills.push(level_skill(kind, name, skill));
            bucket.evidence.extend(
                skill
                    .evidence
                    .iter()
                    .take(EVIDENCE_PER_SKILL)
                    .map(|item| format!("{name}: {item}")),
            );
        }
    }

    for level in DepthLevel::ALL {
        let bucket = by_level.get_mut(level);
        bucket.narrative = level_narrative(bucket);
    }
    by_level
}

fn level_skill(kind: ClusterKind, name: &str, skill: &Skill) -> LevelSkill {
    let score = skill.clamped_score();
    LevelSkill {
        name: name.to_string(),
        category: kind,
        score,
        assessment: assess_score(score),
    }
}

fn level_narrative(bucket: &LevelBucket) -> String {
    if bucket.skills.is_empty() {
        return format!("No skills identified at {}.", bucket.level.key());
    }

    let mut counts: BTreeMap<ClusterKind, usize> = BTreeMap::new();
    for skill in &bucket.skills {
        *counts.entry(skill.category).or_default() += 1;
    }
    let categories = counts
        .iter()
        .map(|(kind, count)| format!("{} ({count})", kind.label()))
        .collect::<Vec<_>>()
        .join(", ");

    let mut ranked: Vec<&LevelSkill> = bucket.skills.iter().collect();
    ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
    let top = ranked
        .iter()
        .take(TOP_SKILLS)
        .map(|s| s.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{} ({} skills): {}. Categories represented: {categories}. Top skills: {top}.",
        bucket.level.proficiency(),
        bucket.skills.len(),
        bucket.level.description()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::Benchmarks;
    use crate::scoring::diagnostics::Diagnostics;
    use crate::scoring::validation::validate;
    use serde_json::{json, Value};

    fn analyze(raw: Value, stage: Stage) -> DepthAnalysis {
        let skills = validate(&raw).unwrap().skills;
        let depths = DepthTargets::resolve(&skills, &Benchmarks::fixture(), stage, &mut Diagnostics::new());
        analyze_depth(&skills, &depths, stage)
    }

    fn early_stage_profile() -> Value {
        json!({
            "hardSkills": {
                "data_analytics": { "score": 0.8, "reportedDepth": 1, "evidence": ["Set KPIs", "Chose BI tool", "Hired analyst"] },
                "podcasting": { "score": 0.0, "reportedDepth": 4 }
            },
            "softSkills": {
                "communication": { "score": 0.9, "reportedDepth": 3, "evidence": ["Board updates"] }
            },
            "leadershipSkills": {
                "vision_setting": { "score": 0.6, "reportedDepth": 3 },
                "change_management": { "score": 0.5, "reportedDepth": 2 }
            },
            "commercialAcumen": {
                "market_sizing": { "score": 0.7, "reportedDepth": 4, "evidence": ["Built TAM model"] }
            }
        })
    }

    #[test]
    fn test_per_skill_depth_gap() {
        let analysis = analyze(early_stage_profile(), Stage::EarlyStage);
        let data = &analysis.per_skill[&ClusterKind::HardSkills]["data_analytics"];
        assert_eq!(data.reported_depth, 1);
        assert_eq!(data.expected_depth, 4);
        assert_eq!(data.gap, 3);
        // unconfigured skill expects depth 1, so no gap
        let podcasting = &analysis.per_skill[&ClusterKind::HardSkills]["podcasting"];
        assert_eq!(podcasting.expected_depth, 1);
        assert_eq!(podcasting.gap, 0);
    }

    #[test]
    fn test_scenario_c_composite_driven_to_zero() {
        let analysis = analyze(early_stage_profile(), Stage::EarlyStage);
        // data_analytics: gap 3 of max 3; podcasting contributes nothing to either sum
        assert_eq!(analysis.composite[&ClusterKind::HardSkills], 0.0);
        // communication expects 3, reported 3
        assert_eq!(analysis.composite[&ClusterKind::SoftSkills], 1.0);
        // vision 3/3 and change 2/3: gap 1 of max 4
        assert_eq!(analysis.composite[&ClusterKind::LeadershipSkills], 0.8);
        assert_eq!(analysis.composite[&ClusterKind::CommercialAcumen], 1.0);
        // (0 + 1 + 0.8 + 1) / 4 = 0.7
        assert_eq!(analysis.overall, 0.7);
    }

    #[test]
    fn test_narrative_names_clusters_below_threshold() {
        let analysis = analyze(early_stage_profile(), Stage::EarlyStage);
        assert_eq!(
            analysis.narrative,
            "The Hard Skills composite depth score is 0%, below expectations."
        );
    }

    #[test]
    fn test_all_clear_narrative() {
        let analysis = analyze(
            json!({
                "hardSkills": { "x": { "score": 0.5, "reportedDepth": 4 } },
                "softSkills": { "x": 0.5 },
                "leadershipSkills": { "x": 0.5 },
                "commercialAcumen": { "x": 0.5 }
            }),
            Stage::Growth,
        );
        assert_eq!(analysis.overall, 1.0);
        assert_eq!(
            analysis.narrative,
            "All skill clusters meet the expected depth for the Growth stage."
        );
    }

    #[test]
    fn test_by_level_counts_match_scored_skills() {
        let raw = early_stage_profile();
        let skills = validate(&raw).unwrap().skills;
        let scored = skills
            .clusters()
            .flat_map(|(_, c)| c.values())
            .filter(|s| s.score > 0.0)
            .count();
        let analysis = analyze(raw, Stage::EarlyStage);
        assert_eq!(analysis.by_level.total_skills(), scored);
        assert_eq!(scored, 5);
    }

    #[test]
    fn test_by_level_buckets_and_evidence() {
        let analysis = analyze(early_stage_profile(), Stage::EarlyStage);
        let strategic = &analysis.by_level.strategic;
        assert_eq!(strategic.skills.len(), 1);
        assert_eq!(strategic.skills[0].name, "data_analytics");
        assert_eq!(strategic.skills[0].assessment, "Proficient");
        // capped at two evidence items per skill, prefixed with the skill name
        assert_eq!(
            strategic.evidence,
            vec![
                "data_analytics: Set KPIs".to_string(),
                "data_analytics: Chose BI tool".to_string()
            ]
        );

        let executional = &analysis.by_level.executional;
        let names: Vec<_> = executional.skills.iter().map(|s| s.name.as_str()).collect();
        // podcasting has score 0 and is excluded
        assert_eq!(names, vec!["market_sizing"]);
    }

    #[test]
    fn test_level_narratives() {
        let analysis = analyze(early_stage_profile(), Stage::EarlyStage);
        let conversational = &analysis.by_level.conversational;
        assert_eq!(
            conversational.narrative,
            "Conversational proficiency (2 skills): discusses the discipline credibly with peers, sales and the board. \
             Categories represented: Soft Skills (1), Leadership Skills (1). Top skills: communication, vision_setting."
        );
    }

    #[test]
    fn test_empty_bucket_narrative() {
        let analysis = analyze(
            json!({
                "hardSkills": { "x": 0.5 },
                "softSkills": { "x": 0.5 },
                "leadershipSkills": { "x": 0.5 },
                "commercialAcumen": { "x": 0.5 }
            }),
            Stage::Growth,
        );
        assert_eq!(analysis.by_level.strategic.skills.len(), 4);
        assert_eq!(
            analysis.by_level.executional.narrative,
            "No skills identified at executional."
        );
    }

    #[test]
    fn test_top_skills_limited_to_three() {
        let analysis = analyze(
            json!({
                "hardSkills": { "a": 0.2, "b": 0.9, "c": 0.4 },
                "softSkills": { "d": 0.8 },
                "leadershipSkills": { "e": 0.7 },
                "commercialAcumen": { "f": 0.1 }
            }),
            Stage::Growth,
        );
        assert!(analysis
            .by_level
            .strategic
            .narrative
            .ends_with("Top skills: b, d, e."));
    }

    #[test]
    fn test_assess_score_bands() {
        assert_eq!(assess_score(0.95), "Expert");
        assert_eq!(assess_score(0.7), "Proficient");
        assert_eq!(assess_score(0.5), "Competent");
        assert_eq!(assess_score(0.49), "Developing");
    }

    #[test]
    fn test_by_level_serializes_level_keys() {
        let analysis = analyze(early_stage_profile(), Stage::EarlyStage);
        let value = serde_json::to_value(&analysis).unwrap();
        assert_eq!(value["byLevel"]["managerial"]["level"], "managerial");
        assert_eq!(value["perSkill"]["hardSkills"]["data_analytics"]["expectedDepth"], 4);
    }
}
