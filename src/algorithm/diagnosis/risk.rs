//! Nutritional risk assessment
//!
//! Grades a classified subject as Low, Moderate or Severe risk from both the
//! per-indicator labels and the composite label, and attaches the matching
//! follow-up recommendations.

use std::fmt;

use serde::Serialize;
use smallvec::SmallVec;

use crate::algorithm::growth::IndicatorOutcomes;
use crate::models::labels::{
    AdultBmiLabel, BmiForAgeLabel, ChildCompositeLabel, HeightForAgeLabel, MaternalMuacLabel,
    OverallClassification, StandardLabel, WeightForAgeLabel, WeightForHeightLabel,
};

/// Overall nutritional risk
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskLevel {
    /// No malnutrition indicator present
    Low = 1,
    /// Moderate undernutrition, stunting or overweight
    Moderate = 2,
    /// Severe undernutrition
    Severe = 3,
}

impl RiskLevel {
    /// Descriptive name
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::Severe => "Severe",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Broad direction of the composite label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum NutritionCategory {
    /// Any form of undernutrition
    Undernutrition,
    /// Normal status
    Normal,
    /// Overweight or obesity
    Overnutrition,
    /// Composite label is "No Data"
    Unclassified,
}

impl NutritionCategory {
    /// Category of a composite label
    #[must_use]
    pub const fn of(overall: OverallClassification) -> Self {
        match overall {
            OverallClassification::NoData => Self::Unclassified,
            OverallClassification::Child(ChildCompositeLabel::Normal)
            | OverallClassification::Maternal(MaternalMuacLabel::Normal)
            | OverallClassification::Adult(AdultBmiLabel::Normal) => Self::Normal,
            OverallClassification::Adult(
                AdultBmiLabel::Overweight
                | AdultBmiLabel::ObesityClassI
                | AdultBmiLabel::ObesityClassII
                | AdultBmiLabel::ObesityClassIII,
            ) => Self::Overnutrition,
            _ => Self::Undernutrition,
        }
    }
}

impl fmt::Display for NutritionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Undernutrition => "Undernutrition",
            Self::Normal => "Normal",
            Self::Overnutrition => "Overnutrition",
            Self::Unclassified => "Unclassified",
        };
        write!(f, "{name}")
    }
}

/// Risk grading with its reasons
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RiskAssessment {
    /// Highest risk found
    pub level: RiskLevel,
    /// Why the level was assigned
    pub factors: SmallVec<[&'static str; 4]>,
    /// Follow-up actions
    pub recommendations: Vec<&'static str>,
}

// BMI-for-age only contributes through its Overweight band; its other
// extremes are graded by the composite label
const fn label_risk(label: StandardLabel) -> Option<RiskLevel> {
    match label {
        StandardLabel::WeightForAge(WeightForAgeLabel::SeverelyUnderweight)
        | StandardLabel::HeightForAge(HeightForAgeLabel::SeverelyStunted)
        | StandardLabel::WeightForHeight(WeightForHeightLabel::SeverelyWasted) => Some(RiskLevel::Severe),
        StandardLabel::WeightForAge(WeightForAgeLabel::Underweight)
        | StandardLabel::HeightForAge(HeightForAgeLabel::Stunted)
        | StandardLabel::WeightForHeight(WeightForHeightLabel::Wasted)
        | StandardLabel::BmiForAge(BmiForAgeLabel::Overweight) => Some(RiskLevel::Moderate),
        _ => None,
    }
}

const fn composite_risk(overall: OverallClassification) -> Option<RiskLevel> {
    match overall {
        OverallClassification::Child(ChildCompositeLabel::SevereAcuteMalnutrition)
        | OverallClassification::Maternal(MaternalMuacLabel::Undernutrition)
        | OverallClassification::Adult(AdultBmiLabel::SevereUnderweight) => Some(RiskLevel::Severe),
        OverallClassification::Child(ChildCompositeLabel::Normal)
        | OverallClassification::Maternal(MaternalMuacLabel::Normal)
        | OverallClassification::Adult(AdultBmiLabel::Normal)
        | OverallClassification::NoData => None,
        _ => Some(RiskLevel::Moderate),
    }
}

/// Grade the risk of a classified subject
#[must_use]
pub fn assess_risk(outcomes: &IndicatorOutcomes, overall: OverallClassification) -> RiskAssessment {
    let mut level = RiskLevel::Low;
    let mut factors: SmallVec<[&'static str; 4]> = SmallVec::new();
    let mut push = |factor: &'static str| {
        if !factors.contains(&factor) {
            factors.push(factor);
        }
    };

    for (_, outcome) in outcomes.iter() {
        let Some(label) = outcome.label() else {
            continue;
        };
        match label_risk(label) {
            Some(RiskLevel::Severe) => {
                level = RiskLevel::Severe;
                push("Severe malnutrition detected");
            }
            Some(RiskLevel::Moderate) => {
                level = level.max(RiskLevel::Moderate);
                if matches!(label, StandardLabel::BmiForAge(_)) {
                    push("Overweight indicators present");
                } else {
                    push("Underweight indicators present");
                }
            }
            _ => {}
        }
    }

    if let Some(composite) = composite_risk(overall) {
        level = level.max(composite);
        push(match NutritionCategory::of(overall) {
            NutritionCategory::Overnutrition => "Overnutrition by composite classification",
            _ if composite == RiskLevel::Severe => "Severe undernutrition by composite classification",
            _ => "Undernutrition by composite classification",
        });
    }

    RiskAssessment {
        level,
        recommendations: recommendations(level, outcomes, overall),
        factors,
    }
}

fn recommendations(
    level: RiskLevel,
    outcomes: &IndicatorOutcomes,
    overall: OverallClassification,
) -> Vec<&'static str> {
    let mut recs: Vec<&'static str> = match level {
        RiskLevel::Severe => vec![
            "Immediate medical attention required",
            "Refer to a nutritionist",
        ],
        RiskLevel::Moderate => vec![
            "Schedule follow-up within 2 weeks",
            "Provide nutritional counseling",
        ],
        RiskLevel::Low => vec!["Continue regular monitoring"],
    };

    recs.extend_from_slice(match overall {
        OverallClassification::Child(ChildCompositeLabel::SevereAcuteMalnutrition) => {
            &["Start therapeutic feeding program", "Monitor closely for complications"][..]
        }
        OverallClassification::Child(ChildCompositeLabel::ModerateAcuteMalnutrition) => {
            &["Start supplementary feeding program"][..]
        }
        OverallClassification::Child(ChildCompositeLabel::MildAcuteMalnutrition) => {
            &["Increase meal frequency and energy density"][..]
        }
        OverallClassification::Child(ChildCompositeLabel::Stunting) => {
            &["Improve overall nutrition quality", "Address underlying causes"][..]
        }
        OverallClassification::Maternal(MaternalMuacLabel::Undernutrition) => {
            &["Start nutritional supplementation", "Monitor pregnancy closely"][..]
        }
        OverallClassification::Maternal(MaternalMuacLabel::AtRisk) => {
            &["Increase caloric intake", "Continue prenatal care"][..]
        }
        OverallClassification::Adult(
            AdultBmiLabel::SevereUnderweight
            | AdultBmiLabel::ModerateUnderweight
            | AdultBmiLabel::MildUnderweight,
        ) => &["Increase caloric intake", "Focus on nutrient-dense foods"][..],
        OverallClassification::Adult(AdultBmiLabel::Overweight) => {
            &["Reduce caloric intake", "Increase physical activity"][..]
        }
        OverallClassification::Adult(
            AdultBmiLabel::ObesityClassI | AdultBmiLabel::ObesityClassII | AdultBmiLabel::ObesityClassIII,
        ) => &["Start structured weight management program"][..],
        OverallClassification::NoData => &["Collect weight, height and MUAC measurements"][..],
        _ => &["Maintain balanced diet"][..],
    });

    for (_, outcome) in outcomes.iter() {
        let extra = match outcome.label() {
            Some(StandardLabel::WeightForAge(WeightForAgeLabel::Underweight)) => {
                "Focus on weight gain strategies"
            }
            Some(StandardLabel::HeightForAge(HeightForAgeLabel::Stunted)) => {
                "Address stunting concerns"
            }
            Some(StandardLabel::BmiForAge(BmiForAgeLabel::Overweight)) => {
                "Implement healthy weight management"
            }
            _ => continue,
        };
        if !recs.contains(&extra) {
            recs.push(extra);
        }
    }

    recs
}
