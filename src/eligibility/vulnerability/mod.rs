mod config;

pub use config::{DimensionWeights, VulnerabilityConfig};

use chrono::NaiveDate;

use super::domain::{
    AuxiliaryData, ContributingFactor, EducationLevel, EmploymentStatus, Gender, HealthStatus,
    HousingType, MaritalStatus, PersonAttributes, VulnerabilityDimension, VulnerabilityLevel,
    VulnerabilityScore,
};
use super::round2;

const CALCULATION_VERSION: &str = "1.0";

/// Multi-dimensional vulnerability calculator.
///
/// Each dimension accumulates additively from independent sub-rules and is
/// clamped to [0, 100] only at the end, so several triggered sub-rules may
/// overflow before the final clamp. The weighted overall score therefore
/// always lands in [0, 100].
pub struct VulnerabilityCalculator {
    config: VulnerabilityConfig,
}

impl VulnerabilityCalculator {
    pub fn new(config: VulnerabilityConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VulnerabilityConfig {
        &self.config
    }

    /// Compute the full score for one person. Pure: age derives from the
    /// explicit `as_of` date and no state is retained between calls.
    pub fn calculate(
        &self,
        person: &PersonAttributes,
        auxiliary: &AuxiliaryData,
        as_of: NaiveDate,
    ) -> VulnerabilityScore {
        let age = person.age_on(as_of);

        let demographic = self.demographic_score(person, age);
        let economic = self.economic_score(person, auxiliary);
        let social = self.social_score(person, auxiliary);
        let health = self.health_score(auxiliary, age);
        let geographic = self.geographic_score(person);

        let weights = &self.config.weights;
        let overall = demographic * weights.demographic
            + economic * weights.economic
            + social * weights.social
            + health * weights.health
            + geographic * weights.geographic;

        let level = self.classify(overall);
        let contributing_factors = self.contributing_factors([
            (VulnerabilityDimension::Demographic, demographic),
            (VulnerabilityDimension::Economic, economic),
            (VulnerabilityDimension::Social, social),
            (VulnerabilityDimension::Health, health),
            (VulnerabilityDimension::Geographic, geographic),
        ]);

        VulnerabilityScore {
            overall: round2(overall),
            demographic: round2(demographic),
            economic: round2(economic),
            social: round2(social),
            health: round2(health),
            geographic: round2(geographic),
            level,
            contributing_factors,
            confidence: round2(50.0 + 50.0 * auxiliary.completeness()),
            calculation_version: CALCULATION_VERSION.to_string(),
        }
    }

    fn demographic_score(&self, person: &PersonAttributes, age: u32) -> f64 {
        let mut score: f64 = 0.0;

        // Vulnerability peaks at both ends of working age.
        if age < 18 || age > 65 {
            score += 30.0;
        } else if age < 25 || age > 55 {
            score += 15.0;
        }

        if person.gender == Gender::Female {
            score += 10.0;
        }
        if person.gender == Gender::Female && person.household_head {
            score += 20.0;
        }

        if matches!(
            person.marital_status,
            Some(MaritalStatus::Divorced) | Some(MaritalStatus::Widowed)
        ) {
            score += 15.0;
        }

        score.min(100.0)
    }

    fn economic_score(&self, person: &PersonAttributes, auxiliary: &AuxiliaryData) -> f64 {
        let mut score: f64 = 0.0;

        // First satisfied bracket wins; the conditions overlap deliberately.
        if let Some(income) = auxiliary.monthly_income {
            let poverty_line = self.config.poverty_line;
            if income <= poverty_line {
                score += 60.0;
            } else if income <= poverty_line * 1.5 {
                score += 40.0;
            } else if income <= poverty_line * 2.0 {
                score += 20.0;
            }
        }

        match auxiliary.employment_status {
            Some(EmploymentStatus::Unemployed) | Some(EmploymentStatus::Informal) => score += 30.0,
            Some(EmploymentStatus::PartTime) => score += 15.0,
            _ => {}
        }

        match auxiliary.housing_type {
            Some(HousingType::Precarious) | Some(HousingType::Homeless) => score += 40.0,
            Some(HousingType::Rental) => score += 10.0,
            _ => {}
        }

        if person.dependents_count > 3 {
            score += 25.0;
        } else if person.dependents_count > 0 {
            score += 10.0;
        }

        score.min(100.0)
    }

    fn social_score(&self, person: &PersonAttributes, auxiliary: &AuxiliaryData) -> f64 {
        let mut score: f64 = 0.0;

        // Small households read as social isolation.
        if person.family_size <= 1 {
            score += 30.0;
        } else if person.family_size <= 2 {
            score += 15.0;
        }

        match auxiliary.education_level {
            Some(EducationLevel::None) | Some(EducationLevel::PrimaryIncomplete) => score += 25.0,
            Some(EducationLevel::PrimaryComplete) => score += 10.0,
            _ => {}
        }

        score.min(100.0)
    }

    fn health_score(&self, auxiliary: &AuxiliaryData, age: u32) -> f64 {
        let mut score: f64 = 0.0;

        match auxiliary.health_status {
            Some(HealthStatus::Poor) => score += 50.0,
            Some(HealthStatus::Fair) => score += 25.0,
            _ => {}
        }

        if auxiliary.has_disability {
            score += 30.0;
        }
        if auxiliary.chronic_illness {
            score += 20.0;
        }

        if age > 70 {
            score += 15.0;
        } else if age > 60 {
            score += 10.0;
        }

        score.min(100.0)
    }

    fn geographic_score(&self, person: &PersonAttributes) -> f64 {
        let mut score: f64 = 0.0;

        if let Some(division) = &person.administrative_division {
            if self.config.rural_divisions.contains(division) {
                score += 30.0;
            }
        }

        // TODO: fold in distance-to-services once the geospatial index ships;
        // until then rural classification is the only geographic signal.

        score.min(100.0)
    }

    /// Classification bands with inclusive lower bounds, checked highest-first.
    pub fn classify(&self, overall: f64) -> VulnerabilityLevel {
        if overall >= self.config.critical_threshold {
            VulnerabilityLevel::Critical
        } else if overall >= self.config.high_threshold {
            VulnerabilityLevel::High
        } else if overall >= self.config.moderate_threshold {
            VulnerabilityLevel::Moderate
        } else {
            VulnerabilityLevel::Low
        }
    }

    /// Dimensions at or above the significance threshold, ranked by their
    /// weighted contribution to the overall score.
    fn contributing_factors(
        &self,
        dimension_scores: [(VulnerabilityDimension, f64); 5],
    ) -> Vec<ContributingFactor> {
        let mut factors: Vec<ContributingFactor> = dimension_scores
            .into_iter()
            .filter(|(_, score)| *score >= self.config.factor_threshold)
            .map(|(dimension, score)| {
                let weight = self.config.weights.get(dimension);
                ContributingFactor {
                    dimension,
                    score,
                    weight,
                    contribution: score * weight,
                }
            })
            .collect();

        factors.sort_by(|a, b| {
            b.contribution
                .partial_cmp(&a.contribution)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        factors
    }
}
