use chrono::NaiveDate;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::borrow::Cow;
use std::fmt::Display;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{ValidationError, ValidationErrors};

use crate::models::domain::{Ordering, ProfileFields, ProfileFilter};

/// Query string of `GET /v1/profiles/`
///
/// Every filter is an exact match. `ordering` takes a comma separated list of
/// `industry`, `salary`, `years_of_experience`, each optionally prefixed with `-`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProfilesQuery {
    #[serde(default, deserialize_with = "blank_as_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub gender: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub industry: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub salary: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub years_of_experience: Option<i32>,
    pub ordering: Option<String>,
    /// 1-based page number, or `last`
    pub page: Option<String>,
}

/// An empty query value means the parameter wasn't given
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    match Option::<String>::deserialize(deserializer)?.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse().map(Some).map_err(de::Error::custom),
    }
}

impl ListProfilesQuery {
    pub fn filter(&self) -> ProfileFilter {
        ProfileFilter {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            gender: self.gender.clone(),
            date_of_birth: self.date_of_birth,
            industry: self.industry.clone(),
            salary: self.salary,
            years_of_experience: self.years_of_experience,
        }
    }

    pub fn ordering(&self) -> Vec<Ordering> {
        self.ordering.as_deref().map(Ordering::parse_list).unwrap_or_default()
    }

    /// Resolve `page` against the number of pages; `None` if it isn't one of them
    pub fn page_number(&self, last_page: i64) -> Option<i64> {
        match self.page.as_deref().map(str::trim) {
            None | Some("") => Some(1),
            Some("last") => Some(last_page),
            Some(raw) => raw.parse().ok().filter(|page| (1..=last_page).contains(page)),
        }
    }
}

/// Body of `PATCH /v1/profiles/{id}/`
///
/// Outer `None` leaves the column untouched; `Some(None)` clears it.
/// The names can't be cleared, so `null` for them is rejected by [`ProfilePatch::apply`].
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProfilePatch {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub first_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub last_name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub gender: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<NaiveDate>)]
    pub date_of_birth: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub industry: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<f64>)]
    pub salary: Option<Option<f64>>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<i32>)]
    pub years_of_experience: Option<Option<i32>>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl ProfilePatch {
    pub fn apply(self, mut fields: ProfileFields) -> Result<ProfileFields, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        match self.first_name {
            Some(Some(v)) => fields.first_name = v,
            Some(None) => errors.add("first_name", not_null()),
            None => {}
        }
        match self.last_name {
            Some(Some(v)) => fields.last_name = v,
            Some(None) => errors.add("last_name", not_null()),
            None => {}
        }
        if !errors.is_empty() {
            return Err(errors);
        }

        if let Some(v) = self.email { fields.email = v; }
        if let Some(v) = self.gender { fields.gender = v; }
        if let Some(v) = self.date_of_birth { fields.date_of_birth = v; }
        if let Some(v) = self.industry { fields.industry = v; }
        if let Some(v) = self.salary { fields.salary = v; }
        if let Some(v) = self.years_of_experience { fields.years_of_experience = v; }
        Ok(fields)
    }
}

fn not_null() -> ValidationError {
    let mut error = ValidationError::new("null");
    error.message = Some(Cow::Borrowed("This field may not be null."));
    error
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> ProfileFields {
        ProfileFields {
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            industry: Some("Computer Software".to_string()),
            salary: Some(9000.0),
            ..Default::default()
        }
    }

    #[test]
    fn test_patch_distinguishes_null_from_missing() {
        let patch: ProfilePatch =
            serde_json::from_str(r#"{"industry": null, "years_of_experience": 12}"#).unwrap();
        let patched = patch.apply(base()).unwrap();

        assert_eq!(patched.industry, None);
        assert_eq!(patched.years_of_experience, Some(12));
        assert_eq!(patched.salary, Some(9000.0));
        assert_eq!(patched.first_name, "Grace");
    }

    #[test]
    fn test_empty_patch_is_noop() {
        let patch: ProfilePatch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.apply(base()).unwrap(), base());
    }

    #[test]
    fn test_patch_rejects_null_name() {
        let patch: ProfilePatch =
            serde_json::from_str(r#"{"first_name": null, "salary": 1.0}"#).unwrap();
        let errors = patch.apply(base()).unwrap_err();

        assert!(errors.field_errors().contains_key("first_name"));
        assert!(!errors.field_errors().contains_key("last_name"));
    }

    #[test]
    fn test_blank_filter_values_are_ignored() {
        use actix_web::web::Query;

        let query = Query::<ListProfilesQuery>::from_query("industry=&salary=&years_of_experience=4").unwrap();

        assert_eq!(query.filter(), ProfileFilter::years_of_experience(4));
        assert!(Query::<ListProfilesQuery>::from_query("salary=lots").is_err());
    }

    #[test]
    fn test_page_number() {
        let page = |raw: &str| ListProfilesQuery {
            page: Some(raw.to_string()),
            ..Default::default()
        };

        assert_eq!(ListProfilesQuery::default().page_number(3), Some(1));
        assert_eq!(page("").page_number(3), Some(1));
        assert_eq!(page("2").page_number(3), Some(2));
        assert_eq!(page("last").page_number(3), Some(3));
        assert_eq!(page("0").page_number(3), None);
        assert_eq!(page("4").page_number(3), None);
        assert_eq!(page("abc").page_number(3), None);
    }

    #[test]
    fn test_list_query_ordering() {
        let query = ListProfilesQuery {
            ordering: Some("-years_of_experience,unknown".to_string()),
            ..Default::default()
        };
        assert_eq!(query.ordering().len(), 1);
        assert!(ListProfilesQuery::default().ordering().is_empty());
    }
}
