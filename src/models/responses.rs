use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::domain::Profile;

/// Paginated profile listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfilePage {
    /// Total number of profiles matching the filters
    pub count: i64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<Profile>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AverageAgeResponse {
    pub industry: String,
    pub average_age: Option<f64>,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AverageSalaryResponse {
    pub industry: String,
    pub average_salary: Option<f64>,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExperienceSalaryResponse {
    pub years_of_experience: u32,
    pub average_salary_per_experience: Option<f64>,
    pub sample_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionResponse {
    pub gender: u32,
    pub industry: u32,
    pub years_of_experience: u32,
    pub age: u32,
    pub predicted_salary: f64,
    /// Number of profiles the model was trained on
    pub sample_size: usize,
}

/// One class of a label-encoded column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct EncodedLabel {
    pub code: usize,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PredictionLabelsResponse {
    pub gender: Vec<EncodedLabel>,
    pub industry: Vec<EncodedLabel>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
