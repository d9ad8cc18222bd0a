use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::models::Profile;

/// Result of an aggregate: the statistic and how many rows fed it
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub value: Option<f64>,
    pub sample_size: usize,
}

/// Age in whole years on `today`
///
/// The birthday only counts once its month/day has been reached.
#[inline]
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let had_birthday = (today.month(), today.day()) >= (date_of_birth.month(), date_of_birth.day());
    today.year() - date_of_birth.year() - if had_birthday { 0 } else { 1 }
}

/// Arithmetic mean; `None` for an empty input
pub fn mean<I>(values: I) -> Aggregate
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));

    Aggregate {
        value: (count > 0).then(|| sum / count as f64),
        sample_size: count,
    }
}

/// Mean age of the profiles that have a date of birth
pub fn average_age(profiles: &[Profile], today: NaiveDate) -> Aggregate {
    mean(
        profiles
            .iter()
            .filter_map(|p| p.fields.date_of_birth)
            .map(|dob| age_on(dob, today) as f64),
    )
}

/// Mean salary of the profiles that have one
pub fn average_salary(profiles: &[Profile]) -> Aggregate {
    mean(profiles.iter().filter_map(|p| p.fields.salary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileFields;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn profile(dob: Option<NaiveDate>, salary: Option<f64>) -> Profile {
        Profile {
            id: 1,
            fields: ProfileFields {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                date_of_birth: dob,
                salary,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_age_before_and_after_birthday() {
        let dob = date(1990, 6, 15);
        assert_eq!(age_on(dob, date(2020, 6, 14)), 29);
        assert_eq!(age_on(dob, date(2020, 6, 15)), 30);
        assert_eq!(age_on(dob, date(2020, 12, 1)), 30);
    }

    #[test]
    fn test_age_leap_day() {
        let dob = date(2000, 2, 29);
        assert_eq!(age_on(dob, date(2021, 2, 28)), 20);
        assert_eq!(age_on(dob, date(2021, 3, 1)), 21);
    }

    #[test]
    fn test_mean_empty() {
        let agg = mean(std::iter::empty());
        assert_eq!(agg.value, None);
        assert_eq!(agg.sample_size, 0);
    }

    #[test]
    fn test_average_age_skips_missing() {
        let today = date(2024, 1, 1);
        let profiles = vec![
            profile(Some(date(1984, 1, 1)), None),
            profile(Some(date(1994, 1, 1)), None),
            profile(None, None),
        ];

        let agg = average_age(&profiles, today);
        assert_eq!(agg.value, Some(35.0));
        assert_eq!(agg.sample_size, 2);
    }

    #[test]
    fn test_average_salary_skips_missing() {
        let profiles = vec![
            profile(None, Some(1000.0)),
            profile(None, None),
            profile(None, Some(2000.0)),
        ];

        let agg = average_salary(&profiles);
        assert_eq!(agg.value, Some(1500.0));
        assert_eq!(agg.sample_size, 2);
    }
}
