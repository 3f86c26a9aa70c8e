//! Single-subject diagnosis
//!
//! Routes a subject to one life-stage branch, resolves the composite clinical
//! label and grades nutritional risk.

pub mod risk;
pub mod router;
pub mod severity;

pub use risk::{NutritionCategory, RiskAssessment, RiskLevel, assess_risk};
pub use router::{BranchIndicator, LifeStageRouter};
pub use severity::{DecisionBasis, Diagnosis, SeverityResolver};
