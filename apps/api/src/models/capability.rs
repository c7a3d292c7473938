use serde::{Deserialize, Serialize};

/// Cross-cutting readiness dimensions scored independently of the skill clusters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapabilityKind {
    TechnicalCapability,
    LeadershipCapability,
    InvestorReadiness,
    TechReadiness,
}

impl CapabilityKind {
    pub const ALL: [CapabilityKind; 4] = [
        CapabilityKind::TechnicalCapability,
        CapabilityKind::LeadershipCapability,
        CapabilityKind::InvestorReadiness,
        CapabilityKind::TechReadiness,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            CapabilityKind::TechnicalCapability => "technical_capability",
            CapabilityKind::LeadershipCapability => "leadership_capability",
            CapabilityKind::InvestorReadiness => "investor_readiness",
            CapabilityKind::TechReadiness => "tech_readiness",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            CapabilityKind::TechnicalCapability => "Technical capability",
            CapabilityKind::LeadershipCapability => "Leadership capability",
            CapabilityKind::InvestorReadiness => "Investor readiness",
            CapabilityKind::TechReadiness => "Tech readiness",
        }
    }
}
