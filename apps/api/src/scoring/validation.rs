//! Structural Validator: turns the analyzer's skills JSON into a typed
//! [`SkillsAssessment`] or a discriminated [`InvalidStructure`] error.
//!
//! A cluster is usable when it is a JSON object holding at least one skill
//! with a numeric score. A skill may be a bare number or an object of the
//! form `{ "score": n, "reportedDepth": d, "evidence": [..] }`.
//!
//! Validation is pure. Field-level anomalies inside usable clusters are
//! returned as warnings rather than logged here.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::models::skills::{Cluster, ClusterKind, Skill, SkillsAssessment};
use crate::scoring::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::scoring::template::template_cluster;

const MIN_DEPTH: i64 = 1;
const MAX_DEPTH: i64 = 4;

#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(rename_all = "camelCase")]
#[error(
    "Invalid skills structure: missing clusters [{}], invalid clusters [{}]",
    join_keys(.missing_clusters),
    join_keys(.invalid_clusters)
)]
pub struct InvalidStructure {
    pub missing_clusters: Vec<ClusterKind>,
    pub invalid_clusters: Vec<ClusterKind>,
}

fn join_keys(kinds: &[ClusterKind]) -> String {
    kinds.iter().map(|k| k.key()).collect::<Vec<_>>().join(", ")
}

/// A structurally valid assessment plus anomalies found while reading it.
#[derive(Debug)]
pub struct ValidatedSkills {
    pub skills: SkillsAssessment,
    pub warnings: Vec<Warning>,
}

enum ClusterCheck {
    Usable(Cluster),
    Missing,
    Invalid,
}

/// Strict validation: any absent or unusable cluster fails the whole input.
pub fn validate(raw: &Value) -> Result<ValidatedSkills, InvalidStructure> {
    let mut warnings = Vec::new();
    let mut clusters = BTreeMap::new();
    let mut missing_clusters = Vec::new();
    let mut invalid_clusters = Vec::new();

    for kind in ClusterKind::ALL {
        match check_cluster(raw, kind, &mut warnings) {
            ClusterCheck::Usable(cluster) => {
                clusters.insert(kind, cluster);
            }
            ClusterCheck::Missing => missing_clusters.push(kind),
            ClusterCheck::Invalid => invalid_clusters.push(kind),
        }
    }

    if missing_clusters.is_empty() && invalid_clusters.is_empty() {
        Ok(ValidatedSkills {
            skills: SkillsAssessment::from_clusters(clusters),
            warnings,
        })
    } else {
        Err(InvalidStructure {
            missing_clusters,
            invalid_clusters,
        })
    }
}

/// Degraded-mode validation: unusable clusters are replaced by the profile
/// template and each substitution is recorded. Only call this when the caller
/// has explicitly opted in.
pub fn validate_with_defaults(raw: &Value, diagnostics: &mut Diagnostics) -> SkillsAssessment {
    let mut warnings = Vec::new();
    let mut clusters = BTreeMap::new();

    for kind in ClusterKind::ALL {
        let cluster = match check_cluster(raw, kind, &mut warnings) {
            ClusterCheck::Usable(cluster) => cluster,
            ClusterCheck::Missing | ClusterCheck::Invalid => {
                warnings.push(Warning {
                    kind: WarningKind::DefaultsSubstituted,
                    message: format!(
                        "Cluster '{}' is missing or unusable; substituted template defaults",
                        kind.key()
                    ),
                });
                template_cluster(kind)
            }
        };
        clusters.insert(kind, cluster);
    }

    for warning in warnings {
        diagnostics.warn(warning.kind, warning.message);
    }
    SkillsAssessment::from_clusters(clusters)
}

fn check_cluster(raw: &Value, kind: ClusterKind, warnings: &mut Vec<Warning>) -> ClusterCheck {
    let entries = match raw.get(kind.key()) {
        None | Some(Value::Null) => return ClusterCheck::Missing,
        Some(Value::Object(entries)) => entries,
        Some(_) => return ClusterCheck::Invalid,
    };

    let mut cluster = Cluster::new();
    let mut skipped = Vec::new();
    for (name, value) in entries {
        match read_skill(kind, name, value) {
            Some((skill, notes)) => {
                warnings.extend(notes);
                cluster.insert(name.clone(), skill);
            }
            None => skipped.push(name.as_str()),
        }
    }

    if cluster.is_empty() {
        return ClusterCheck::Invalid;
    }
    for name in skipped {
        warnings.push(Warning {
            kind: WarningKind::SkippedSkill,
            message: format!("Skill '{}.{name}' has no numeric score and was skipped", kind.key()),
        });
    }
    ClusterCheck::Usable(cluster)
}

fn read_skill(kind: ClusterKind, name: &str, value: &Value) -> Option<(Skill, Vec<Warning>)> {
    let path = format!("{}.{name}", kind.key());
    let mut notes = Vec::new();

    let skill = match value {
        Value::Number(n) => Skill::new(n.as_f64()?),
        Value::Object(fields) => {
            let score = fields.get("score").and_then(Value::as_f64)?;
            Skill::new(score)
                .with_depth(read_depth(fields, &path, &mut notes))
                .with_evidence(read_evidence(fields, &path, &mut notes))
        }
        _ => return None,
    };

    if !(0.0..=1.0).contains(&skill.score) {
        notes.push(Warning {
            kind: WarningKind::OutOfRange,
            message: format!(
                "Score {} for '{path}' is outside [0, 1]; clamped for scoring",
                skill.score
            ),
        });
    }
    Some((skill, notes))
}

fn read_depth(fields: &Map<String, Value>, path: &str, notes: &mut Vec<Warning>) -> u8 {
    let raw = match fields.get("reportedDepth") {
        None | Some(Value::Null) => return MIN_DEPTH as u8,
        Some(raw) => raw,
    };
    match integral(raw) {
        Some(depth) if (MIN_DEPTH..=MAX_DEPTH).contains(&depth) => depth as u8,
        Some(depth) => {
            let clamped = depth.clamp(MIN_DEPTH, MAX_DEPTH);
            notes.push(Warning {
                kind: WarningKind::OutOfRange,
                message: format!("Reported depth {depth} for '{path}' clamped to {clamped}"),
            });
            clamped as u8
        }
        None => {
            notes.push(Warning {
                kind: WarningKind::MissingField,
                message: format!(
                    "Reported depth for '{path}' is not an integer ({raw}); defaulting to {MIN_DEPTH}"
                ),
            });
            MIN_DEPTH as u8
        }
    }
}

/// Integer value of a JSON number, accepting integral floats such as `3.0`.
fn integral(raw: &Value) -> Option<i64> {
    raw.as_i64().or_else(|| {
        raw.as_f64()
            .filter(|v| v.is_finite() && v.fract() == 0.0)
            .map(|v| v as i64)
    })
}

fn read_evidence(fields: &Map<String, Value>, path: &str, notes: &mut Vec<Warning>) -> Vec<String> {
    match fields.get("evidence") {
        None | Some(Value::Null) => vec![],
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_string))
            .collect(),
        Some(_) => {
            notes.push(Warning {
                kind: WarningKind::MissingField,
                message: format!("Evidence for '{path}' is not a list; treating as empty"),
            });
            vec![]
        }
    }
}
