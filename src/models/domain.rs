use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering as CmpOrdering;
use utoipa::ToSchema;
use validator::Validate;

/// Employee profile as stored in the `profiles` table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Profile {
    pub id: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub fields: ProfileFields,
}

/// Every column of a profile except its id
///
/// Doubles as the request body for create and full update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, sqlx::FromRow, ToSchema)]
pub struct ProfileFields {
    #[validate(length(min = 1, max = 254))]
    pub first_name: String,
    #[validate(length(min = 1, max = 254))]
    pub last_name: String,
    #[serde(default)]
    #[validate(email, length(max = 254))]
    pub email: Option<String>,
    #[serde(default)]
    #[validate(length(max = 254))]
    pub gender: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(default)]
    #[validate(length(max = 254))]
    pub industry: Option<String>,
    #[serde(default)]
    pub salary: Option<f64>,
    #[serde(default)]
    pub years_of_experience: Option<i32>,
}

/// Exact-match column filters; `None` means "don't filter on this column"
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub industry: Option<String>,
    pub salary: Option<f64>,
    pub years_of_experience: Option<i32>,
}

impl ProfileFilter {
    pub fn industry(industry: impl Into<String>) -> Self {
        Self {
            industry: Some(industry.into()),
            ..Default::default()
        }
    }

    pub fn years_of_experience(years: i32) -> Self {
        Self {
            years_of_experience: Some(years),
            ..Default::default()
        }
    }

    /// Check whether a profile passes every set filter
    pub fn matches(&self, profile: &Profile) -> bool {
        let f = &profile.fields;

        fn eq<T: PartialEq>(wanted: &Option<T>, actual: &T) -> bool {
            wanted.as_ref().map_or(true, |w| w == actual)
        }

        fn eq_opt<T: PartialEq>(wanted: &Option<T>, actual: &Option<T>) -> bool {
            match wanted {
                None => true,
                Some(w) => actual.as_ref() == Some(w),
            }
        }

        eq(&self.first_name, &f.first_name)
            && eq(&self.last_name, &f.last_name)
            && eq_opt(&self.email, &f.email)
            && eq_opt(&self.gender, &f.gender)
            && eq_opt(&self.date_of_birth, &f.date_of_birth)
            && eq_opt(&self.industry, &f.industry)
            && eq_opt(&self.salary, &f.salary)
            && eq_opt(&self.years_of_experience, &f.years_of_experience)
    }
}

/// Columns a profile listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    Industry,
    Salary,
    YearsOfExperience,
}

impl OrderField {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "industry" => Some(Self::Industry),
            "salary" => Some(Self::Salary),
            "years_of_experience" => Some(Self::YearsOfExperience),
            _ => None,
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Self::Industry => "industry",
            Self::Salary => "salary",
            Self::YearsOfExperience => "years_of_experience",
        }
    }

    /// Ascending comparison with NULLs last, matching Postgres' default
    fn compare(self, a: &Profile, b: &Profile) -> CmpOrdering {
        match self {
            Self::Industry => nulls_last(&a.fields.industry, &b.fields.industry, |x, y| x.cmp(y)),
            Self::Salary => nulls_last(&a.fields.salary, &b.fields.salary, |x, y| x.total_cmp(y)),
            Self::YearsOfExperience => nulls_last(
                &a.fields.years_of_experience,
                &b.fields.years_of_experience,
                |x, y| x.cmp(y),
            ),
        }
    }
}

fn nulls_last<T>(a: &Option<T>, b: &Option<T>, cmp: impl Fn(&T, &T) -> CmpOrdering) -> CmpOrdering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => CmpOrdering::Less,
        (None, Some(_)) => CmpOrdering::Greater,
        (None, None) => CmpOrdering::Equal,
    }
}

/// One term of an `ordering` parameter, e.g. `-salary`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub field: OrderField,
    pub descending: bool,
}

impl Ordering {
    /// Parse a comma separated ordering list. Unknown fields are skipped.
    pub fn parse_list(raw: &str) -> Vec<Ordering> {
        raw.split(',')
            .map(str::trim)
            .filter_map(|term| {
                let (descending, name) = match term.strip_prefix('-') {
                    Some(name) => (true, name),
                    None => (false, term),
                };
                OrderField::parse(name).map(|field| Ordering { field, descending })
            })
            .collect()
    }

    /// Compare two profiles under a full ordering list, falling back to id
    pub fn compare_all(orderings: &[Ordering], a: &Profile, b: &Profile) -> CmpOrdering {
        orderings
            .iter()
            .map(|o| {
                let ord = o.field.compare(a, b);
                if o.descending { ord.reverse() } else { ord }
            })
            .find(|ord| *ord != CmpOrdering::Equal)
            .unwrap_or_else(|| a.id.cmp(&b.id))
    }
}

/// A page (or all) of filtered, ordered profiles
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileQuery {
    pub filter: ProfileFilter,
    pub ordering: Vec<Ordering>,
    pub limit: Option<i64>,
    pub offset: i64,
}

impl ProfileQuery {
    /// Every profile matching `filter`, in id order
    pub fn all(filter: ProfileFilter) -> Self {
        Self {
            filter,
            ..Default::default()
        }
    }
}
