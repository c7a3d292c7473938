use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The four fixed skill groupings every assessment is organised into.
///
/// Ordering is significant: every calculator walks clusters in `ALL` order so
/// floating-point sums never depend on input key order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClusterKind {
    HardSkills,
    SoftSkills,
    LeadershipSkills,
    CommercialAcumen,
}

impl ClusterKind {
    pub const ALL: [ClusterKind; 4] = [
        ClusterKind::HardSkills,
        ClusterKind::SoftSkills,
        ClusterKind::LeadershipSkills,
        ClusterKind::CommercialAcumen,
    ];

    /// Wire key, as produced by the transcript analyzer and used in benchmark files.
    pub fn key(&self) -> &'static str {
        match self {
            ClusterKind::HardSkills => "hardSkills",
            ClusterKind::SoftSkills => "softSkills",
            ClusterKind::LeadershipSkills => "leadershipSkills",
            ClusterKind::CommercialAcumen => "commercialAcumen",
        }
    }

    /// Human-readable label used in recommendations and narratives.
    pub fn label(&self) -> &'static str {
        match self {
            ClusterKind::HardSkills => "Hard Skills",
            ClusterKind::SoftSkills => "Soft Skills",
            ClusterKind::LeadershipSkills => "Leadership Skills",
            ClusterKind::CommercialAcumen => "Commercial Acumen",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

/// A single assessed skill.
///
/// `score` is kept exactly as the assessor reported it; calculators read it
/// through [`Skill::clamped_score`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub score: f64,
    pub reported_depth: u8,
    pub evidence: Vec<String>,
}

impl Skill {
    pub fn new(score: f64) -> Self {
        Self {
            score,
            reported_depth: 1,
            evidence: vec![],
        }
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.reported_depth = depth;
        self
    }

    pub fn with_evidence(mut self, evidence: Vec<String>) -> Self {
        self.evidence = evidence;
        self
    }

    pub fn clamped_score(&self) -> f64 {
        self.score.clamp(0.0, 1.0)
    }
}

pub type Cluster = BTreeMap<String, Skill>;

/// Structurally valid skills input: one entry per cluster kind.
///
/// Only obtainable through the structural validator (or the profile template),
/// so every calculator may assume each cluster holds at least one skill.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct SkillsAssessment {
    clusters: BTreeMap<ClusterKind, Cluster>,
}

impl SkillsAssessment {
    pub(crate) fn from_clusters(clusters: BTreeMap<ClusterKind, Cluster>) -> Self {
        Self { clusters }
    }

    #[cfg(test)]
    pub fn cluster(&self, kind: ClusterKind) -> Option<&Cluster> {
        self.clusters.get(&kind)
    }

    /// Iterates present clusters in canonical order.
    pub fn clusters(&self) -> impl Iterator<Item = (ClusterKind, &Cluster)> {
        ClusterKind::ALL
            .into_iter()
            .filter_map(|kind| self.clusters.get(&kind).map(|c| (kind, c)))
    }

    pub fn skill_count(&self) -> usize {
        self.clusters.values().map(|c| c.len()).sum()
    }
}

/// Arithmetic mean of the clamped scores in a cluster. `None` for an empty cluster.
pub fn cluster_mean(cluster: &Cluster) -> Option<f64> {
    if cluster.is_empty() {
        return None;
    }
    let sum: f64 = cluster.values().map(Skill::clamped_score).sum();
    Some(sum / cluster.len() as f64)
}

/// Rounds to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cluster_key_round_trip() {
        for kind in ClusterKind::ALL {
            assert_eq!(ClusterKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(ClusterKind::from_key("investor_readiness"), None);
    }

    #[test]
    fn test_round1_half_away_from_zero() {
        assert_eq!(round1(0.25), 0.3);
        assert_eq!(round1(0.96), 1.0);
        assert_eq!(round1(0.3 - 0.2), 0.1);
        assert_eq!(round1(0.0), 0.0);
    }

    #[test]
    fn test_round1_idempotent() {
        for raw in [0.04, 0.15, 0.33, 0.55, 0.678, 0.95, 1.0] {
            let once = round1(raw);
            assert_eq!(round1(once), once, "round1 not idempotent for {raw}");
        }
    }

    #[test]
    fn test_cluster_mean_uses_clamped_scores() {
        let mut cluster = Cluster::new();
        cluster.insert("a".to_string(), Skill::new(1.4));
        cluster.insert("b".to_string(), Skill::new(0.6));
        let mean = cluster_mean(&cluster).unwrap();
        assert!((mean - 0.8).abs() < 1e-9, "mean was {mean}");
    }

    #[test]
    fn test_cluster_mean_empty_is_none() {
        assert!(cluster_mean(&Cluster::new()).is_none());
    }

    #[test]
    fn test_clusters_iterate_in_canonical_order() {
        let mut map = BTreeMap::new();
        map.insert(ClusterKind::CommercialAcumen, Cluster::new());
        map.insert(ClusterKind::HardSkills, Cluster::new());
        let skills = SkillsAssessment::from_clusters(map);
        let kinds: Vec<_> = skills.clusters().map(|(k, _)| k).collect();
        assert_eq!(
            kinds,
            vec![ClusterKind::HardSkills, ClusterKind::CommercialAcumen]
        );
    }

    #[test]
    fn test_serializes_with_wire_keys() {
        let mut cluster = Cluster::new();
        cluster.insert("market_sizing".to_string(), Skill::new(0.6).with_depth(2));
        let mut map = BTreeMap::new();
        map.insert(ClusterKind::CommercialAcumen, cluster);
        let value = serde_json::to_value(SkillsAssessment::from_clusters(map)).unwrap();
        assert_eq!(
            value["commercialAcumen"]["market_sizing"]["reportedDepth"],
            2
        );
    }
}
