//! Life-stage routing
//!
//! Exactly one branch applies to every subject. The order in which the
//! pregnancy flag and the age test are applied is the configured
//! [`BranchPrecedence`]; nothing depends on evaluation order elsewhere.

use log::{debug, warn};
use smallvec::SmallVec;

use crate::config::BranchPrecedence;
use crate::models::types::{LifeStage, Sex, WhoStandard};
use crate::models::SubjectProfile;
use crate::standards::windows::{
    ADULT_AGE_MONTHS, BMI_FOR_AGE_WINDOW, CHILD_MUAC_WINDOW, HEIGHT_FOR_AGE_WINDOW,
    WEIGHT_FOR_HEIGHT_WINDOW,
};

/// Measurement an assessment branch may draw on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchIndicator {
    /// Weight-for-height z-score
    WeightForHeight,
    /// BMI-for-age z-score, used when weight-for-height is unavailable
    BmiForAge,
    /// Height-for-age z-score
    HeightForAge,
    /// Child MUAC, 6-59 months
    ChildMuac,
    /// Maternal MUAC
    MaternalMuac,
    /// Adult BMI cut-points
    AdultBmi,
}

impl BranchIndicator {
    /// Reporting standard evaluated for this measurement; MUAC has none
    #[must_use]
    pub const fn standard(self) -> Option<WhoStandard> {
        match self {
            Self::WeightForHeight => Some(WhoStandard::WeightForHeight),
            Self::BmiForAge => Some(WhoStandard::BmiForAge),
            Self::HeightForAge => Some(WhoStandard::HeightForAge),
            Self::AdultBmi => Some(WhoStandard::BmiAdult),
            Self::ChildMuac | Self::MaternalMuac => None,
        }
    }
}

/// Chooses the assessment branch for a subject
#[derive(Debug, Clone, Copy, Default)]
pub struct LifeStageRouter {
    precedence: BranchPrecedence,
}

impl LifeStageRouter {
    /// Create a router with a precedence rule
    #[must_use]
    pub const fn new(precedence: BranchPrecedence) -> Self {
        Self { precedence }
    }

    /// Branch for a subject
    ///
    /// A pregnancy flag on a male subject is ignored.
    #[must_use]
    pub fn route(&self, subject: &SubjectProfile) -> LifeStage {
        if subject.is_pregnant && subject.sex == Sex::Male {
            warn!(
                "Subject {} is male but flagged pregnant; ignoring the pregnancy flag",
                subject.subject_id
            );
        }
        let pregnant = subject.is_pregnant && subject.sex != Sex::Male;
        let minor = subject.age_months < ADULT_AGE_MONTHS;

        let stage = match self.precedence {
            BranchPrecedence::PregnancyFirst if pregnant => LifeStage::PregnantWoman,
            BranchPrecedence::PregnancyFirst if minor => LifeStage::ChildAdolescent,
            BranchPrecedence::ChildFirst if minor => LifeStage::ChildAdolescent,
            BranchPrecedence::ChildFirst if pregnant => LifeStage::PregnantWoman,
            _ => LifeStage::Adult,
        };

        debug!(
            "Routed subject {} ({} months, {}) to {stage}",
            subject.subject_id, subject.age_months, self.precedence
        );
        stage
    }

    /// Branch a subject would take if the pregnancy flag were absent
    #[must_use]
    pub const fn non_pregnant_stage(subject: &SubjectProfile) -> LifeStage {
        if subject.age_months < ADULT_AGE_MONTHS {
            LifeStage::ChildAdolescent
        } else {
            LifeStage::Adult
        }
    }

    /// Measurements the branch draws on at the given age
    #[must_use]
    pub fn indicators(stage: LifeStage, age_months: u32) -> SmallVec<[BranchIndicator; 4]> {
        let mut indicators = SmallVec::new();
        match stage {
            LifeStage::ChildAdolescent => {
                if WEIGHT_FOR_HEIGHT_WINDOW.contains(age_months) {
                    indicators.push(BranchIndicator::WeightForHeight);
                }
                if BMI_FOR_AGE_WINDOW.contains(age_months) {
                    indicators.push(BranchIndicator::BmiForAge);
                }
                if HEIGHT_FOR_AGE_WINDOW.contains(age_months) {
                    indicators.push(BranchIndicator::HeightForAge);
                }
                if CHILD_MUAC_WINDOW.contains(age_months) {
                    indicators.push(BranchIndicator::ChildMuac);
                }
            }
            LifeStage::PregnantWoman => indicators.push(BranchIndicator::MaternalMuac),
            LifeStage::Adult => indicators.push(BranchIndicator::AdultBmi),
        }
        indicators
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject(age_months: u32, sex: Sex, pregnant: bool) -> SubjectProfile {
        SubjectProfile::new("r", age_months, sex).with_pregnancy(pregnant)
    }

    #[test]
    fn test_pregnancy_first() {
        let router = LifeStageRouter::new(BranchPrecedence::PregnancyFirst);
        assert_eq!(router.route(&subject(192, Sex::Female, true)), LifeStage::PregnantWoman);
        assert_eq!(router.route(&subject(192, Sex::Female, false)), LifeStage::ChildAdolescent);
        assert_eq!(router.route(&subject(216, Sex::Female, false)), LifeStage::Adult);
        assert_eq!(router.route(&subject(400, Sex::Female, true)), LifeStage::PregnantWoman);
    }

    #[test]
    fn test_child_first() {
        let router = LifeStageRouter::new(BranchPrecedence::ChildFirst);
        assert_eq!(router.route(&subject(192, Sex::Female, true)), LifeStage::ChildAdolescent);
        assert_eq!(router.route(&subject(400, Sex::Female, true)), LifeStage::PregnantWoman);
    }

    #[test]
    fn test_male_pregnancy_flag_ignored() {
        let router = LifeStageRouter::default();
        assert_eq!(router.route(&subject(400, Sex::Male, true)), LifeStage::Adult);
    }

    #[test]
    fn test_child_indicators_by_age() {
        let infant = LifeStageRouter::indicators(LifeStage::ChildAdolescent, 3);
        assert_eq!(
            infant.as_slice(),
            &[BranchIndicator::WeightForHeight, BranchIndicator::HeightForAge]
        );

        let toddler = LifeStageRouter::indicators(LifeStage::ChildAdolescent, 30);
        assert_eq!(toddler.len(), 4);
        assert!(toddler.contains(&BranchIndicator::ChildMuac));

        let teen = LifeStageRouter::indicators(LifeStage::ChildAdolescent, 150);
        assert_eq!(teen.as_slice(), &[BranchIndicator::BmiForAge]);
    }
}
