//! Default CMO profile skills, substituted for unusable clusters only when the
//! caller opts into degraded mode.

use crate::models::skills::{Cluster, ClusterKind, Skill};

fn template_skill_names(kind: ClusterKind) -> &'static [&'static str] {
    match kind {
        ClusterKind::HardSkills => &[
            "marketing_strategy",
            "digital_marketing",
            "data_analytics",
            "strategic_planning",
        ],
        ClusterKind::SoftSkills => &[
            "leadership",
            "stakeholder_management",
            "communication",
            "team_building",
        ],
        ClusterKind::LeadershipSkills => &[
            "vision_setting",
            "team_development",
            "change_management",
            "strategic_influence",
            "organizational_design",
        ],
        ClusterKind::CommercialAcumen => &[
            "financial_modeling",
            "market_sizing",
            "revenue_optimization",
            "resource_allocation",
            "budget_management",
        ],
    }
}

/// Template cluster: every skill scored 0 at depth 1 with no evidence.
pub fn template_cluster(kind: ClusterKind) -> Cluster {
    template_skill_names(kind)
        .iter()
        .map(|name| (name.to_string(), Skill::new(0.0)))
        .collect()
}
