use std::fmt;

use serde::{Deserialize, Serialize};

use crate::scoring::diagnostics::{Diagnostics, WarningKind};

/// Organisational growth phase that parameterises target weights and depths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Stage {
    #[serde(rename = "Early-Stage")]
    EarlyStage,
    Growth,
    #[serde(rename = "Scale-Up")]
    ScaleUp,
    Enterprise,
}

const STAGE_SUFFIX: &str = " stage";

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::EarlyStage,
        Stage::Growth,
        Stage::ScaleUp,
        Stage::Enterprise,
    ];

    /// Substituted whenever a stage cannot be resolved.
    pub const FALLBACK: Stage = Stage::Growth;

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::EarlyStage => "Early-Stage",
            Stage::Growth => "Growth",
            Stage::ScaleUp => "Scale-Up",
            Stage::Enterprise => "Enterprise",
        }
    }

    /// Parses an upstream stage string. `"Growth Stage"`, `" growth "` and
    /// `"Growth"` all resolve to [`Stage::Growth`].
    pub fn parse(raw: &str) -> Option<Stage> {
        let trimmed = raw.trim();
        let name = trimmed
            .len()
            .checked_sub(STAGE_SUFFIX.len())
            .and_then(|cut| {
                trimmed
                    .get(cut..)
                    .filter(|tail| tail.eq_ignore_ascii_case(STAGE_SUFFIX))
                    .and_then(|_| trimmed.get(..cut))
            })
            .unwrap_or(trimmed)
            .trim_end();

        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str().eq_ignore_ascii_case(name))
    }

    /// Like [`Stage::parse`], but never fails: unknown input resolves to
    /// [`Stage::FALLBACK`] and is recorded as a warning.
    pub fn resolve(raw: &str, diagnostics: &mut Diagnostics) -> Stage {
        match Self::parse(raw) {
            Some(stage) => stage,
            None => {
                diagnostics.warn(
                    WarningKind::UnknownStage,
                    format!(
                        "Invalid stage \"{raw}\", using {} stage weights",
                        Self::FALLBACK
                    ),
                );
                Self::FALLBACK
            }
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
