//! Structured warnings for every default the engine substitutes.
//!
//! Nothing here aborts an evaluation. Each record is logged through `tracing`
//! as it is raised and also returned to the caller alongside the result.

use serde::Serialize;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Stage string not recognised (or not benchmarked); Growth used instead.
    UnknownStage,
    /// Weight, capability score, depth entry or evidence absent; default used.
    MissingField,
    /// Score or depth outside its domain; clamped for computation.
    OutOfRange,
    /// Skill without a numeric score dropped from an otherwise valid cluster.
    SkippedSkill,
    /// Invalid cluster replaced by the profile template (degraded mode only).
    DefaultsSubstituted,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
}

/// Accumulates warnings for a single evaluation.
#[derive(Debug, Default)]
pub struct Diagnostics {
    warnings: Vec<Warning>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warn(&mut self, kind: WarningKind, message: impl Into<String>) {
        let message = message.into();
        warn!(kind = ?kind, "{message}");
        self.warnings.push(Warning { kind, message });
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    #[cfg(test)]
    pub fn count(&self, kind: WarningKind) -> usize {
        self.warnings.iter().filter(|w| w.kind == kind).count()
    }

    pub fn into_warnings(self) -> Vec<Warning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.warn(WarningKind::UnknownStage, "first");
        diagnostics.warn(WarningKind::MissingField, "second");
        let messages: Vec<_> = diagnostics
            .warnings()
            .iter()
            .map(|w| w.message.as_str())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        assert_eq!(diagnostics.count(WarningKind::UnknownStage), 1);
        assert_eq!(diagnostics.count(WarningKind::OutOfRange), 0);
    }

    #[test]
    fn test_kind_serializes_snake_case() {
        let warning = Warning {
            kind: WarningKind::DefaultsSubstituted,
            message: "x".to_string(),
        };
        let value = serde_json::to_value(&warning).unwrap();
        assert_eq!(value["kind"], "defaults_substituted");
    }
}
