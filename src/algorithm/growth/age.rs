//! Age resolution
//!
//! Converts a birthday and screening date into completed months of age. Age is
//! never allowed to block classification: unparsable dates resolve to 0 with a
//! warning and negative intervals clamp to 0.

use chrono::{Datelike, NaiveDate, Utc};
use log::warn;

use crate::config::{DateFormatConfig, EngineConfig};
use crate::models::{Measurement, SubjectProfile};

/// Completed months between two dates, clamped at 0
///
/// The month difference is reduced by one when the screening day of month is
/// earlier than the birth day of month.
#[must_use]
pub fn months_between(birthday: NaiveDate, screening: NaiveDate) -> u32 {
    let years = i64::from(screening.year()) - i64::from(birthday.year());
    let months = i64::from(screening.month()) - i64::from(birthday.month());
    let mut total = years * 12 + months;
    if screening.day() < birthday.day() {
        total -= 1;
    }
    u32::try_from(total.max(0)).unwrap_or(u32::MAX)
}

/// Resolves measurement dates into ages in months
#[derive(Debug, Clone)]
pub struct AgeResolver<'a> {
    formats: &'a DateFormatConfig,
    today: NaiveDate,
}

impl<'a> AgeResolver<'a> {
    /// Create a resolver; "now" is the configured reference date, or today in UTC
    #[must_use]
    pub fn new(config: &'a EngineConfig) -> Self {
        Self {
            formats: &config.date_formats,
            today: config
                .reference_date
                .unwrap_or_else(|| Utc::now().date_naive()),
        }
    }

    /// Create a resolver with an explicit "now"
    #[must_use]
    pub const fn with_today(formats: &'a DateFormatConfig, today: NaiveDate) -> Self {
        Self { formats, today }
    }

    /// Age in completed months at screening
    ///
    /// A missing screening date means "now". Unparsable dates yield 0.
    #[must_use]
    pub fn resolve(&self, birthday: &str, screening_date: Option<&str>) -> u32 {
        let Some(birth) = self.formats.parse(birthday) else {
            warn!("Unparsable birthday '{birthday}', using age 0 months");
            return 0;
        };

        let screening = match screening_date {
            Some(raw) => match self.formats.parse(raw) {
                Some(date) => date,
                None => {
                    warn!("Unparsable screening date '{raw}', using age 0 months");
                    return 0;
                }
            },
            None => self.today,
        };

        months_between(birth, screening)
    }

    /// Build the subject profile for a measurement
    #[must_use]
    pub fn profile(&self, measurement: &Measurement) -> SubjectProfile {
        let age_months = self.resolve(
            &measurement.birthday,
            measurement.screening_date.as_deref(),
        );

        let mut profile = SubjectProfile::new(measurement.id.clone(), age_months, measurement.sex)
            .with_weight(measurement.weight_kg)
            .with_height(measurement.height_cm)
            .with_pregnancy(measurement.is_pregnant);
        if let Some(muac) = measurement.muac_cm {
            profile = profile.with_muac(muac);
        }
        profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_months_between_day_adjustment() {
        assert_eq!(months_between(date(2020, 1, 15), date(2022, 1, 15)), 24);
        assert_eq!(months_between(date(2020, 1, 15), date(2022, 1, 14)), 23);
        assert_eq!(months_between(date(2020, 1, 31), date(2020, 3, 1)), 1);
        assert_eq!(months_between(date(2020, 5, 1), date(2021, 2, 1)), 9);
    }

    #[test]
    fn test_months_between_clamps_negative() {
        assert_eq!(months_between(date(2024, 6, 1), date(2023, 6, 1)), 0);
        assert_eq!(months_between(date(2024, 6, 20), date(2024, 6, 10)), 0);
    }

    #[test]
    fn test_resolve_soft_failures() {
        let formats = DateFormatConfig::default();
        let resolver = AgeResolver::with_today(&formats, date(2024, 1, 15));

        assert_eq!(resolver.resolve("garbage", Some("2024-01-01")), 0);
        assert_eq!(resolver.resolve("2020-01-01", Some("31/31/2024")), 0);
        assert_eq!(resolver.resolve("2022-01-15", None), 24);
        assert_eq!(resolver.resolve("2022-01-15", Some("2023-01-15 10:00:00")), 12);
    }

    #[test]
    fn test_resolve_is_idempotent() {
        let formats = DateFormatConfig::default();
        let resolver = AgeResolver::with_today(&formats, date(2024, 1, 15));
        let first = resolver.resolve("2019-07-23", Some("2024-01-02"));
        let second = resolver.resolve("2019-07-23", Some("2024-01-02"));
        assert_eq!(first, second);
        assert_eq!(first, 53);
    }
}
