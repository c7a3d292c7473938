//! Evaluation entry point: validated skills + stage in, one composite result out.
//!
//! Pure and synchronous. `Benchmarks` is borrowed, never mutated, so any
//! number of evaluations may share one instance.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::benchmarks::{Benchmarks, Stage};
use crate::models::skills::{ClusterKind, SkillsAssessment};
use crate::scoring::alignment::{evaluate_alignment, StageAlignment};
use crate::scoring::capabilities::{evaluate_capabilities, Capability};
use crate::scoring::depth::{analyze_depth, DepthAnalysis};
use crate::scoring::diagnostics::{Diagnostics, Warning, WarningKind};
use crate::scoring::gaps::{annotate, compute_gaps, AnnotatedSkills, SkillGaps};
use crate::scoring::maturity::{cluster_scores, compute_maturity_score};
use crate::scoring::targets::{DepthTargets, StageTargets};
use crate::scoring::validation::{validate, validate_with_defaults, InvalidStructure};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationOptions {
    /// Substitute template clusters for unusable ones instead of failing.
    pub allow_defaults: bool,
    /// Penalise scores for reported depth below the stage expectation.
    pub depth_adjusted_gaps: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssessmentResult {
    pub stage: Stage,
    pub gaps: SkillGaps,
    pub score: f64,
    pub cluster_scores: BTreeMap<ClusterKind, f64>,
    pub stage_alignment: StageAlignment,
    pub capabilities: Vec<Capability>,
    pub depth_analysis: DepthAnalysis,
    pub annotated_skills: AnnotatedSkills,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub result: AssessmentResult,
    pub warnings: Vec<Warning>,
}

/// Evaluates an already validated assessment. Never fails.
pub fn evaluate(
    benchmarks: &Benchmarks,
    skills: &SkillsAssessment,
    raw_stage: &str,
    capabilities: Option<&Value>,
    options: EvaluationOptions,
) -> Evaluation {
    let mut diagnostics = Diagnostics::new();
    let stage = resolve_stage(benchmarks, raw_stage, &mut diagnostics);
    let targets = StageTargets::resolve(benchmarks.weights_for(stage), stage, &mut diagnostics);
    let depths = DepthTargets::resolve(skills, benchmarks, stage, &mut diagnostics);

    let result = AssessmentResult {
        stage,
        gaps: compute_gaps(skills, &targets, &depths, options.depth_adjusted_gaps),
        score: compute_maturity_score(skills, &targets),
        cluster_scores: cluster_scores(skills),
        stage_alignment: evaluate_alignment(skills, &targets, stage),
        capabilities: evaluate_capabilities(capabilities, &targets, stage, &mut diagnostics),
        depth_analysis: analyze_depth(skills, &depths, stage),
        annotated_skills: annotate(skills, &depths, options.depth_adjusted_gaps),
    };

    debug!(
        "Evaluated {} skills at stage {stage}: score {}, {} warnings",
        skills.skill_count(),
        result.score,
        diagnostics.warnings().len()
    );

    Evaluation {
        result,
        warnings: diagnostics.into_warnings(),
    }
}

/// Validates raw analyzer output, then evaluates it.
///
/// Fails with [`InvalidStructure`] unless `options.allow_defaults` is set, in
/// which case unusable clusters are replaced by the profile template.
/// Validation warnings come first in the returned list.
pub fn evaluate_raw(
    benchmarks: &Benchmarks,
    raw_skills: &Value,
    stage: &str,
    capabilities: Option<&Value>,
    options: EvaluationOptions,
) -> Result<Evaluation, InvalidStructure> {
    let mut diagnostics = Diagnostics::new();
    let skills = if options.allow_defaults {
        validate_with_defaults(raw_skills, &mut diagnostics)
    } else {
        let validated = validate(raw_skills)?;
        for warning in validated.warnings {
            diagnostics.warn(warning.kind, warning.message);
        }
        validated.skills
    };

    let evaluation = evaluate(benchmarks, &skills, stage, capabilities, options);
    let mut warnings = diagnostics.into_warnings();
    warnings.extend(evaluation.warnings);
    Ok(Evaluation {
        result: evaluation.result,
        warnings,
    })
}

/// Resolves the stage string, falling back to Growth for unknown stages and
/// for stages the weight table does not cover.
fn resolve_stage(benchmarks: &Benchmarks, raw: &str, diagnostics: &mut Diagnostics) -> Stage {
    let stage = Stage::resolve(raw, diagnostics);
    if benchmarks.has_stage(stage) {
        return stage;
    }
    diagnostics.warn(
        WarningKind::UnknownStage,
        format!(
            "Stage {stage} has no benchmark weights; using {} stage weights",
            Stage::FALLBACK
        ),
    );
    Stage::FALLBACK
}
