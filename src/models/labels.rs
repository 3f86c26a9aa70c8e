//! Classification labels
//!
//! Every indicator has its own closed label set, so a label from one standard
//! can never be counted under another. Labels serialize to their display text,
//! which is what the reporting layer shows.

use std::fmt;

use serde::Serialize;

use super::types::WhoStandard;

/// Text used for the ineligible / missing-data bucket in reports
pub const NO_DATA: &str = "No Data";

/// Define a closed label enum with display text, ordinal and serialization
macro_rules! classification_label {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// All labels in severity order, as they appear in reports
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];

            /// Display text of the label
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Position of the label within [`Self::ALL`]
            #[must_use]
            pub const fn ordinal(self) -> usize {
                self as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }
    };
}

classification_label! {
    /// Weight-for-Age labels
    WeightForAgeLabel {
        SeverelyUnderweight => "Severely Underweight",
        Underweight => "Underweight",
        Normal => "Normal",
        Overweight => "Overweight",
        /// Reserved: no cut-point maps here unless the band table is extended
        Obese => "Obese",
    }
}

classification_label! {
    /// Height/Length-for-Age labels
    HeightForAgeLabel {
        SeverelyStunted => "Severely Stunted",
        Stunted => "Stunted",
        Normal => "Normal",
        Tall => "Tall",
    }
}

classification_label! {
    /// Weight-for-Height labels
    WeightForHeightLabel {
        SeverelyWasted => "Severely Wasted",
        Wasted => "Wasted",
        Normal => "Normal",
        Overweight => "Overweight",
        Obese => "Obese",
    }
}

classification_label! {
    /// BMI-for-Age labels (same bands as Weight-for-Height)
    BmiForAgeLabel {
        SeverelyUnderweight => "Severely Underweight",
        Underweight => "Underweight",
        Normal => "Normal",
        Overweight => "Overweight",
        Obese => "Obese",
    }
}

classification_label! {
    /// Fixed adult BMI labels
    AdultBmiLabel {
        SevereUnderweight => "Severe Underweight",
        ModerateUnderweight => "Moderate Underweight",
        MildUnderweight => "Mild Underweight",
        Normal => "Normal",
        Overweight => "Overweight",
        ObesityClassI => "Obesity Class I",
        ObesityClassII => "Obesity Class II",
        ObesityClassIII => "Obesity Class III",
    }
}

classification_label! {
    /// MUAC labels for children aged 6-59 months
    ChildMuacLabel {
        SevereAcuteMalnutrition => "Severe Acute Malnutrition (SAM)",
        ModerateAcuteMalnutrition => "Moderate Acute Malnutrition (MAM)",
        AtRisk => "At Risk (Mild)",
        Normal => "Normal",
    }
}

classification_label! {
    /// MUAC labels for pregnant women
    MaternalMuacLabel {
        Undernutrition => "Maternal Undernutrition (At-risk)",
        AtRisk => "Maternal At-risk",
        Normal => "Normal",
    }
}

classification_label! {
    /// Composite labels of the child/adolescent decision tree
    ChildCompositeLabel {
        SevereAcuteMalnutrition => "Severe Acute Malnutrition (SAM)",
        ModerateAcuteMalnutrition => "Moderate Acute Malnutrition (MAM)",
        MildAcuteMalnutrition => "Mild Acute Malnutrition (Wasting)",
        Stunting => "Stunting (Chronic Malnutrition)",
        Normal => "Normal",
    }
}

/// A label produced by one of the five reporting standards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StandardLabel {
    /// Weight-for-Age label
    WeightForAge(WeightForAgeLabel),
    /// Height-for-Age label
    HeightForAge(HeightForAgeLabel),
    /// Weight-for-Height label
    WeightForHeight(WeightForHeightLabel),
    /// BMI-for-Age label
    BmiForAge(BmiForAgeLabel),
    /// Adult BMI label
    BmiAdult(AdultBmiLabel),
}

impl StandardLabel {
    /// Standard that produced this label
    #[must_use]
    pub const fn standard(self) -> WhoStandard {
        match self {
            Self::WeightForAge(_) => WhoStandard::WeightForAge,
            Self::HeightForAge(_) => WhoStandard::HeightForAge,
            Self::WeightForHeight(_) => WhoStandard::WeightForHeight,
            Self::BmiForAge(_) => WhoStandard::BmiForAge,
            Self::BmiAdult(_) => WhoStandard::BmiAdult,
        }
    }

    /// Display text of the wrapped label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WeightForAge(l) => l.as_str(),
            Self::HeightForAge(l) => l.as_str(),
            Self::WeightForHeight(l) => l.as_str(),
            Self::BmiForAge(l) => l.as_str(),
            Self::BmiAdult(l) => l.as_str(),
        }
    }

    /// Position of the label within its standard's label list
    #[must_use]
    pub const fn ordinal(self) -> usize {
        match self {
            Self::WeightForAge(l) => l.ordinal(),
            Self::HeightForAge(l) => l.ordinal(),
            Self::WeightForHeight(l) => l.ordinal(),
            Self::BmiForAge(l) => l.ordinal(),
            Self::BmiAdult(l) => l.ordinal(),
        }
    }

    /// All labels a standard can produce, in report order
    #[must_use]
    pub fn all_for(standard: WhoStandard) -> Vec<Self> {
        match standard {
            WhoStandard::WeightForAge => WeightForAgeLabel::ALL
                .iter()
                .map(|l| Self::WeightForAge(*l))
                .collect(),
            WhoStandard::HeightForAge => HeightForAgeLabel::ALL
                .iter()
                .map(|l| Self::HeightForAge(*l))
                .collect(),
            WhoStandard::WeightForHeight => WeightForHeightLabel::ALL
                .iter()
                .map(|l| Self::WeightForHeight(*l))
                .collect(),
            WhoStandard::BmiForAge => BmiForAgeLabel::ALL
                .iter()
                .map(|l| Self::BmiForAge(*l))
                .collect(),
            WhoStandard::BmiAdult => AdultBmiLabel::ALL
                .iter()
                .map(|l| Self::BmiAdult(*l))
                .collect(),
        }
    }

    /// Number of labels a standard can produce
    #[must_use]
    pub const fn count_for(standard: WhoStandard) -> usize {
        match standard {
            WhoStandard::WeightForAge => WeightForAgeLabel::ALL.len(),
            WhoStandard::HeightForAge => HeightForAgeLabel::ALL.len(),
            WhoStandard::WeightForHeight => WeightForHeightLabel::ALL.len(),
            WhoStandard::BmiForAge => BmiForAgeLabel::ALL.len(),
            WhoStandard::BmiAdult => AdultBmiLabel::ALL.len(),
        }
    }
}

impl fmt::Display for StandardLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StandardLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Label assigned to the MUAC measurement, depending on who was measured
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum MuacLabel {
    /// Child aged 6-59 months
    Child(ChildMuacLabel),
    /// Pregnant woman
    Maternal(MaternalMuacLabel),
}

impl MuacLabel {
    /// Display text of the wrapped label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Child(l) => l.as_str(),
            Self::Maternal(l) => l.as_str(),
        }
    }
}

impl fmt::Display for MuacLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single composite clinical classification of a subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OverallClassification {
    /// Outcome of the child/adolescent decision tree
    Child(ChildCompositeLabel),
    /// MUAC classification of a pregnant woman
    Maternal(MaternalMuacLabel),
    /// Adult BMI classification
    Adult(AdultBmiLabel),
    /// Not enough valid measurements for the selected branch
    NoData,
}

impl OverallClassification {
    /// Display text of the composite label
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Child(l) => l.as_str(),
            Self::Maternal(l) => l.as_str(),
            Self::Adult(l) => l.as_str(),
            Self::NoData => NO_DATA,
        }
    }

    /// Every composite label, child labels first and "No Data" last
    #[must_use]
    pub fn all() -> Vec<Self> {
        ChildCompositeLabel::ALL
            .iter()
            .map(|l| Self::Child(*l))
            .chain(MaternalMuacLabel::ALL.iter().map(|l| Self::Maternal(*l)))
            .chain(AdultBmiLabel::ALL.iter().map(|l| Self::Adult(*l)))
            .chain(std::iter::once(Self::NoData))
            .collect()
    }
}

impl fmt::Display for OverallClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for OverallClassification {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
