use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::VulnerabilityDimension;

/// Fixed weighting of the five dimensions. The defaults sum to 1.0; deployments
/// overriding them are expected to preserve that invariant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionWeights {
    pub demographic: f64,
    pub economic: f64,
    pub social: f64,
    pub health: f64,
    pub geographic: f64,
}

impl DimensionWeights {
    pub fn get(&self, dimension: VulnerabilityDimension) -> f64 {
        match dimension {
            VulnerabilityDimension::Demographic => self.demographic,
            VulnerabilityDimension::Economic => self.economic,
            VulnerabilityDimension::Social => self.social,
            VulnerabilityDimension::Health => self.health,
            VulnerabilityDimension::Geographic => self.geographic,
        }
    }

    pub fn sum(&self) -> f64 {
        self.demographic + self.economic + self.social + self.health + self.geographic
    }
}

impl Default for DimensionWeights {
    fn default() -> Self {
        Self {
            demographic: 0.25,
            economic: 0.35,
            social: 0.20,
            health: 0.15,
            geographic: 0.05,
        }
    }
}

/// Deployment-specific inputs to vulnerability scoring. The poverty line and
/// the rural division set vary per country rollout and are injected from
/// configuration, never hard-coded in scoring code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VulnerabilityConfig {
    pub weights: DimensionWeights,
    /// Monthly income at the national poverty line, in deployment currency.
    pub poverty_line: f64,
    /// Administrative divisions classified as rural.
    pub rural_divisions: BTreeSet<String>,
    /// Minimum dimension score to report as a contributing factor.
    pub factor_threshold: f64,
    pub critical_threshold: f64,
    pub high_threshold: f64,
    pub moderate_threshold: f64,
}

impl Default for VulnerabilityConfig {
    fn default() -> Self {
        Self {
            weights: DimensionWeights::default(),
            poverty_line: 75_000.0,
            rural_divisions: BTreeSet::new(),
            factor_threshold: 50.0,
            critical_threshold: 80.0,
            high_threshold: 60.0,
            moderate_threshold: 40.0,
        }
    }
}
