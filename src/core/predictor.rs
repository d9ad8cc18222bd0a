use chrono::NaiveDate;
use thiserror::Error;

use crate::core::{
    encoding::LabelEncoder,
    regression::{LinearRegression, RegressionError},
    stats::{age_on, mean},
};
use crate::models::{PredictionLabelsResponse, Profile};

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("no profiles to train on")]
    NoData,

    #[error("regression failed: {0}")]
    Regression(#[from] RegressionError),
}

/// Feature vector a caller asks a prediction for
///
/// `gender` and `industry` are codes from [`CategoryEncoders`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredictionInput {
    pub gender: u32,
    pub industry: u32,
    pub years_of_experience: u32,
    pub age: u32,
}

impl PredictionInput {
    fn features(&self) -> [f64; 4] {
        [
            self.gender as f64,
            self.industry as f64,
            self.years_of_experience as f64,
            self.age as f64,
        ]
    }
}

/// Label encoders for the categorical columns of the profile table
#[derive(Debug, Clone, Default)]
pub struct CategoryEncoders {
    pub gender: LabelEncoder,
    pub industry: LabelEncoder,
}

impl CategoryEncoders {
    pub fn fit(profiles: &[Profile]) -> Self {
        Self {
            gender: LabelEncoder::fit(profiles.iter().map(|p| p.fields.gender.as_deref())),
            industry: LabelEncoder::fit(profiles.iter().map(|p| p.fields.industry.as_deref())),
        }
    }

    pub fn labels(&self) -> PredictionLabelsResponse {
        PredictionLabelsResponse {
            gender: self.gender.labels(),
            industry: self.industry.labels(),
        }
    }
}

/// Linear salary model over `[gender, industry, years_of_experience, age]`
#[derive(Debug, Clone)]
pub struct SalaryModel {
    encoders: CategoryEncoders,
    regression: LinearRegression,
    sample_size: usize,
}

impl SalaryModel {
    /// Train on every profile, filling missing numbers with the column mean
    ///
    /// A column with no known value at all is filled with 0.
    pub fn train(profiles: &[Profile], today: NaiveDate) -> Result<Self, ModelError> {
        if profiles.is_empty() {
            return Err(ModelError::NoData);
        }

        let encoders = CategoryEncoders::fit(profiles);

        let ages: Vec<Option<f64>> = profiles
            .iter()
            .map(|p| p.fields.date_of_birth.map(|dob| age_on(dob, today) as f64))
            .collect();
        let experience: Vec<Option<f64>> = profiles
            .iter()
            .map(|p| p.fields.years_of_experience.map(f64::from))
            .collect();
        let salaries: Vec<Option<f64>> = profiles.iter().map(|p| p.fields.salary).collect();

        let fill_age = column_mean(&ages);
        let fill_experience = column_mean(&experience);
        let fill_salary = column_mean(&salaries);

        let x: Vec<Vec<f64>> = profiles
            .iter()
            .enumerate()
            .map(|(i, p)| {
                let gender = encoders.gender.encode(p.fields.gender.as_deref());
                let industry = encoders.industry.encode(p.fields.industry.as_deref());
                vec![
                    gender.map_or(0.0, |c| c as f64),
                    industry.map_or(0.0, |c| c as f64),
                    experience[i].unwrap_or(fill_experience),
                    ages[i].unwrap_or(fill_age),
                ]
            })
            .collect();
        let y: Vec<f64> = salaries.iter().map(|s| s.unwrap_or(fill_salary)).collect();

        let regression = LinearRegression::fit(&x, &y)?;

        tracing::debug!(
            "Trained salary model on {} profiles (coefficients: {:?}, intercept: {})",
            profiles.len(),
            regression.coefficients(),
            regression.intercept()
        );

        Ok(Self {
            encoders,
            regression,
            sample_size: profiles.len(),
        })
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<f64, ModelError> {
        Ok(self.regression.predict(&input.features())?)
    }

    pub fn encoders(&self) -> &CategoryEncoders {
        &self.encoders
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }
}

fn column_mean(values: &[Option<f64>]) -> f64 {
    mean(values.iter().flatten().copied()).value.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProfileFields;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    fn profile(
        gender: Option<&str>,
        industry: Option<&str>,
        years: Option<i32>,
        birth_year: Option<i32>,
        salary: Option<f64>,
    ) -> Profile {
        Profile {
            id: 1,
            fields: ProfileFields {
                first_name: "Test".to_string(),
                last_name: "User".to_string(),
                gender: gender.map(String::from),
                industry: industry.map(String::from),
                years_of_experience: years,
                date_of_birth: birth_year.and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1)),
                salary,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_empty_table() {
        assert!(matches!(SalaryModel::train(&[], today()), Err(ModelError::NoData)));
    }

    #[test]
    fn test_learns_experience_slope() {
        // salary = 1000 + 500 * years, everything else constant
        let profiles: Vec<Profile> = (0..6)
            .map(|years| {
                profile(
                    Some("Female"),
                    Some("Commercial Banks"),
                    Some(years),
                    Some(1990),
                    Some(1000.0 + 500.0 * years as f64),
                )
            })
            .collect();

        let model = SalaryModel::train(&profiles, today()).unwrap();
        let predicted = model
            .predict(&PredictionInput { gender: 0, industry: 0, years_of_experience: 10, age: 34 })
            .unwrap();

        assert!((predicted - 6000.0).abs() < 1e-6, "got {}", predicted);
        assert_eq!(model.sample_size(), 6);
    }

    #[test]
    fn test_missing_values_are_imputed() {
        let profiles = vec![
            profile(Some("Male"), Some("Water Supply"), Some(2), Some(1980), Some(3000.0)),
            profile(None, None, None, None, None),
            profile(Some("Female"), Some("Water Supply"), Some(4), Some(1990), Some(5000.0)),
        ];

        let model = SalaryModel::train(&profiles, today()).unwrap();
        let labels = model.encoders().labels();

        assert_eq!(labels.gender.len(), 3);
        assert_eq!(labels.gender[2].label, None);
        assert_eq!(labels.industry[0].label.as_deref(), Some("Water Supply"));

        let predicted = model
            .predict(&PredictionInput { gender: 1, industry: 0, years_of_experience: 3, age: 39 })
            .unwrap();
        assert!(predicted.is_finite());
    }
}
