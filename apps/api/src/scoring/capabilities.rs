//! Capability Evaluator: scores the fixed readiness dimensions and ranks them
//! so the largest unmet capability comes first.
//!
//! Each capability entry may be:
//! - a bare number: `"investor_readiness": 0.4`
//! - an object with a numeric `score` (optionally `recommendation`)
//! - an object of numeric sub-scores, e.g. `{ "storytelling": 0.6, "metrics_mastery": 0.4 }`,
//!   whose mean becomes the score
//!
//! Anything else scores 0 and is reported as a warning.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::benchmarks::Stage;
use crate::models::capability::CapabilityKind;
use crate::models::skills::round1;
use crate::scoring::diagnostics::{Diagnostics, WarningKind};
use crate::scoring::targets::StageTargets;

/// Keys inside a capability object that are never treated as sub-scores.
const RESERVED_KEYS: &[&str] = &["score", "gap", "weight", "recommendation"];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Capability {
    pub name: CapabilityKind,
    pub score: f64,
    pub gap: f64,
    pub recommendation: String,
    pub weight: f64,
}

pub fn evaluate_capabilities(
    input: Option<&Value>,
    targets: &StageTargets,
    stage: Stage,
    diagnostics: &mut Diagnostics,
) -> Vec<Capability> {
    let entries = match input {
        Some(Value::Object(entries)) => Some(entries),
        None | Some(Value::Null) => {
            diagnostics.warn(
                WarningKind::MissingField,
                "No capability data supplied; every capability scored 0",
            );
            None
        }
        Some(_) => {
            diagnostics.warn(
                WarningKind::MissingField,
                "Capability data is not an object; every capability scored 0",
            );
            None
        }
    };

    let mut capabilities: Vec<Capability> = CapabilityKind::ALL
        .into_iter()
        .map(|kind| {
            let entry = entries.and_then(|e| e.get(kind.key()));
            let score = match entry {
                Some(value) => read_score(kind, value, diagnostics),
                None if entries.is_some() => {
                    diagnostics.warn(
                        WarningKind::MissingField,
                        format!("Capability '{}' missing; scored 0", kind.key()),
                    );
                    0.0
                }
                None => 0.0,
            };
            let weight = targets.capability(kind);
            let gap = round1((weight - score).max(0.0));
            let recommendation = entry
                .and_then(|v| v.get("recommendation"))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| build_recommendation(kind, score, gap, weight, stage));

            Capability {
                name: kind,
                score,
                gap,
                recommendation,
                weight,
            }
        })
        .collect();

    // Stable sort keeps the canonical order among equal gaps.
    capabilities.sort_by(|a, b| b.gap.total_cmp(&a.gap));
    capabilities
}

fn read_score(kind: CapabilityKind, value: &Value, diagnostics: &mut Diagnostics) -> f64 {
    let score = match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(fields) => match fields.get("score") {
            Some(score) => score.as_f64(),
            None => mean_of_sub_scores(fields),
        },
        _ => None,
    };

    match score {
        Some(score) if (0.0..=1.0).contains(&score) => score,
        Some(score) => {
            diagnostics.warn(
                WarningKind::OutOfRange,
                format!(
                    "Capability '{}' score {score} is outside [0, 1]; clamped",
                    kind.key()
                ),
            );
            score.clamp(0.0, 1.0)
        }
        None => {
            diagnostics.warn(
                WarningKind::MissingField,
                format!("Capability '{}' has no numeric score; scored 0", kind.key()),
            );
            0.0
        }
    }
}

fn mean_of_sub_scores(fields: &Map<String, Value>) -> Option<f64> {
    let sub_scores: Vec<f64> = fields
        .iter()
        .filter(|(key, _)| !RESERVED_KEYS.contains(&key.as_str()))
        .filter_map(|(_, value)| value.as_f64())
        .collect();
    if sub_scores.is_empty() {
        return None;
    }
    Some(sub_scores.iter().sum::<f64>() / sub_scores.len() as f64)
}

fn build_recommendation(
    kind: CapabilityKind,
    score: f64,
    gap: f64,
    weight: f64,
    stage: Stage,
) -> String {
    if gap <= 0.0 {
        format!("{} meets the {stage} target.", kind.label())
    } else {
        format!(
            "Raise {} from {} toward the {stage} target of {weight}.",
            kind.label().to_lowercase(),
            round1(score)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::Benchmarks;
    use serde_json::json;

    fn targets(stage: Stage) -> StageTargets {
        let benchmarks = Benchmarks::fixture();
        StageTargets::resolve(benchmarks.weights_for(stage), stage, &mut Diagnostics::new())
    }

    fn names(capabilities: &[Capability]) -> Vec<CapabilityKind> {
        capabilities.iter().map(|c| c.name).collect()
    }

    #[test]
    fn test_scenario_d_empty_input_defaults() {
        let mut diagnostics = Diagnostics::new();
        let caps = evaluate_capabilities(
            Some(&json!({})),
            &targets(Stage::Growth),
            Stage::Growth,
            &mut diagnostics,
        );
        assert_eq!(caps.len(), 4);
        for cap in &caps {
            assert_eq!(cap.score, 0.0);
            assert_eq!(cap.gap, cap.weight);
        }
        assert_eq!(caps[0].name, CapabilityKind::TechnicalCapability);
        assert_eq!(caps[0].weight, 0.8);
        assert_eq!(caps[3].name, CapabilityKind::InvestorReadiness);
        assert_eq!(diagnostics.count(WarningKind::MissingField), 4);
    }

    #[test]
    fn test_absent_input_warns_once() {
        let mut diagnostics = Diagnostics::new();
        let caps = evaluate_capabilities(None, &targets(Stage::Growth), Stage::Growth, &mut diagnostics);
        assert!(caps.iter().all(|c| c.score == 0.0));
        assert_eq!(diagnostics.warnings().len(), 1);
    }

    #[test]
    fn test_sorted_by_descending_gap() {
        let input = json!({
            "technical_capability": 0.8,
            "leadership_capability": { "score": 0.1 },
            "investor_readiness": { "storytelling": 0.6, "metrics_mastery": 0.4, "market_knowledge": 0.5 },
            "tech_readiness": "strong"
        });
        let caps = evaluate_capabilities(
            Some(&input),
            &targets(Stage::Growth),
            Stage::Growth,
            &mut Diagnostics::new(),
        );
        assert!(caps.windows(2).all(|pair| pair[0].gap >= pair[1].gap));
        assert_eq!(
            names(&caps),
            vec![
                CapabilityKind::TechReadiness,
                CapabilityKind::LeadershipCapability,
                CapabilityKind::InvestorReadiness,
                CapabilityKind::TechnicalCapability,
            ]
        );
    }

    #[test]
    fn test_sub_score_mean_becomes_score() {
        let input = json!({
            "investor_readiness": { "storytelling": 0.6, "metrics_mastery": 0.4, "weight": 0.9 }
        });
        let caps = evaluate_capabilities(
            Some(&input),
            &targets(Stage::Growth),
            Stage::Growth,
            &mut Diagnostics::new(),
        );
        let investor = caps
            .iter()
            .find(|c| c.name == CapabilityKind::InvestorReadiness)
            .unwrap();
        assert!((investor.score - 0.5).abs() < 1e-9);
        assert_eq!(investor.gap, 0.1);
        // weight comes from the stage table, not the caller
        assert_eq!(investor.weight, 0.6);
    }

    #[test]
    fn test_caller_recommendation_is_kept() {
        let input = json!({
            "tech_readiness": { "score": 0.2, "recommendation": "Pair with the data team on attribution." }
        });
        let caps = evaluate_capabilities(
            Some(&input),
            &targets(Stage::Growth),
            Stage::Growth,
            &mut Diagnostics::new(),
        );
        let tech = caps.iter().find(|c| c.name == CapabilityKind::TechReadiness).unwrap();
        assert_eq!(tech.recommendation, "Pair with the data team on attribution.");
    }

    #[test]
    fn test_generated_recommendations() {
        let input = json!({ "technical_capability": 1.0, "investor_readiness": 0.2 });
        let caps = evaluate_capabilities(
            Some(&input),
            &targets(Stage::Growth),
            Stage::Growth,
            &mut Diagnostics::new(),
        );
        let technical = caps
            .iter()
            .find(|c| c.name == CapabilityKind::TechnicalCapability)
            .unwrap();
        assert_eq!(technical.recommendation, "Technical capability meets the Growth target.");
        let investor = caps
            .iter()
            .find(|c| c.name == CapabilityKind::InvestorReadiness)
            .unwrap();
        assert_eq!(
            investor.recommendation,
            "Raise investor readiness from 0.2 toward the Growth target of 0.6."
        );
    }

    #[test]
    fn test_missing_stage_weight_uses_default() {
        let caps = evaluate_capabilities(
            None,
            &StageTargets::uniform(crate::scoring::targets::DEFAULT_TARGET_WEIGHT),
            Stage::Growth,
            &mut Diagnostics::new(),
        );
        assert!(caps.iter().all(|c| c.weight == 0.8 && c.gap == 0.8));
    }

    #[test]
    fn test_out_of_range_score_clamped() {
        let mut diagnostics = Diagnostics::new();
        let caps = evaluate_capabilities(
            Some(&json!({ "tech_readiness": 8 })),
            &targets(Stage::Growth),
            Stage::Growth,
            &mut diagnostics,
        );
        let tech = caps.iter().find(|c| c.name == CapabilityKind::TechReadiness).unwrap();
        assert_eq!(tech.score, 1.0);
        assert_eq!(tech.gap, 0.0);
        assert_eq!(diagnostics.count(WarningKind::OutOfRange), 1);
    }
}
