use actix_web::{web, HttpResponse};
use chrono::NaiveDate;

use crate::core::{average_age, average_salary, CategoryEncoders, PredictionInput, SalaryModel};
use crate::error::ApiError;
use crate::models::{
    AverageAgeResponse, AverageSalaryResponse, ErrorResponse, ExperienceSalaryResponse,
    PredictionLabelsResponse, PredictionResponse, Profile, ProfileFilter, ProfileQuery,
};
use crate::routes::AppState;

/// Configure aggregate and prediction routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/age/{industry}", web::get().to(get_average_age))
        .route("/salary/industry/{industry}", web::get().to(get_average_salary))
        .route("/salary/experience/{experience}", web::get().to(get_salary_per_experience))
        .route("/salary/prediction/labels", web::get().to(get_prediction_labels))
        .route(
            "/salary/prediction/{gender}/{industry}/{experience}/{age}",
            web::get().to(predict_salary),
        );
}

fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn load(state: &AppState, filter: ProfileFilter) -> Result<Vec<Profile>, ApiError> {
    let profiles = state.store.list(&ProfileQuery::all(filter)).await?;
    tracing::debug!("Loaded {} profiles for aggregation", profiles.len());
    Ok(profiles)
}

/// Average age in an industry
///
/// Example: `/v1/age/Metal Fabrications`
#[utoipa::path(
    get,
    path = "/v1/age/{industry}",
    tag = "statistics",
    params(("industry" = String, Path, description = "Exact industry name")),
    responses((status = 200, description = "Average age, null when nobody matched", body = AverageAgeResponse))
)]
pub async fn get_average_age(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let industry = path.into_inner();
    let profiles = load(&state, ProfileFilter::industry(industry.as_str())).await?;

    let aggregate = average_age(&profiles, today());

    tracing::info!(
        "Average age in {:?}: {:?} over {} profiles",
        industry,
        aggregate.value,
        aggregate.sample_size
    );

    Ok(HttpResponse::Ok().json(AverageAgeResponse {
        industry,
        average_age: aggregate.value,
        sample_size: aggregate.sample_size,
    }))
}

/// Average salary in an industry
///
/// Example: `/v1/salary/industry/Metal%20Fabrications`
#[utoipa::path(
    get,
    path = "/v1/salary/industry/{industry}",
    tag = "statistics",
    params(("industry" = String, Path, description = "Exact industry name")),
    responses((status = 200, description = "Average salary, null when nobody matched", body = AverageSalaryResponse))
)]
pub async fn get_average_salary(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let industry = path.into_inner();
    let profiles = load(&state, ProfileFilter::industry(industry.as_str())).await?;

    let aggregate = average_salary(&profiles);

    tracing::info!(
        "Average salary in {:?}: {:?} over {} profiles",
        industry,
        aggregate.value,
        aggregate.sample_size
    );

    Ok(HttpResponse::Ok().json(AverageSalaryResponse {
        industry,
        average_salary: aggregate.value,
        sample_size: aggregate.sample_size,
    }))
}

/// Average salary for an exact number of years of experience
#[utoipa::path(
    get,
    path = "/v1/salary/experience/{experience}",
    tag = "statistics",
    params(("experience" = u32, Path, description = "Years of experience")),
    responses(
        (status = 200, description = "Average salary, null when nobody matched", body = ExperienceSalaryResponse),
        (status = 404, description = "Not a non-negative integer", body = ErrorResponse)
    )
)]
pub async fn get_salary_per_experience(
    state: web::Data<AppState>,
    path: web::Path<u32>,
) -> Result<HttpResponse, ApiError> {
    let experience = path.into_inner();
    // Anything above i32::MAX can't be stored, so it matches nobody
    let profiles = match i32::try_from(experience) {
        Ok(years) => load(&state, ProfileFilter::years_of_experience(years)).await?,
        Err(_) => Vec::new(),
    };

    let aggregate = average_salary(&profiles);

    tracing::info!(
        "Average salary for {} years of experience: {:?} over {} profiles",
        experience,
        aggregate.value,
        aggregate.sample_size
    );

    Ok(HttpResponse::Ok().json(ExperienceSalaryResponse {
        years_of_experience: experience,
        average_salary_per_experience: aggregate.value,
        sample_size: aggregate.sample_size,
    }))
}

/// Predict a salary
///
/// Trains a fresh linear model over the whole table on every call.
/// `gender` and `industry` are label codes; see `/v1/salary/prediction/labels`.
/// Example: `/v1/salary/prediction/2/22/4/40`
#[utoipa::path(
    get,
    path = "/v1/salary/prediction/{gender}/{industry}/{experience}/{age}",
    tag = "statistics",
    params(
        ("gender" = u32, Path, description = "Gender code"),
        ("industry" = u32, Path, description = "Industry code"),
        ("experience" = u32, Path, description = "Years of experience"),
        ("age" = u32, Path, description = "Age in years")
    ),
    responses(
        (status = 200, description = "Predicted salary", body = PredictionResponse),
        (status = 422, description = "No profiles to train on", body = ErrorResponse)
    )
)]
pub async fn predict_salary(
    state: web::Data<AppState>,
    path: web::Path<(u32, u32, u32, u32)>,
) -> Result<HttpResponse, ApiError> {
    let (gender, industry, experience, age) = path.into_inner();
    let profiles = load(&state, ProfileFilter::default()).await?;

    let model = SalaryModel::train(&profiles, today())?;
    let input = PredictionInput {
        gender,
        industry,
        years_of_experience: experience,
        age,
    };
    let predicted_salary = model.predict(&input)?;

    tracing::info!(
        "Predicted salary {:.2} for {:?} (trained on {} profiles)",
        predicted_salary,
        input,
        model.sample_size()
    );

    Ok(HttpResponse::Ok().json(PredictionResponse {
        gender,
        industry,
        years_of_experience: experience,
        age,
        predicted_salary,
        sample_size: model.sample_size(),
    }))
}

/// Codes the predictor currently assigns to each gender and industry
#[utoipa::path(
    get,
    path = "/v1/salary/prediction/labels",
    tag = "statistics",
    responses((status = 200, description = "Label encodings", body = PredictionLabelsResponse))
)]
pub async fn get_prediction_labels(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let profiles = load(&state, ProfileFilter::default()).await?;

    Ok(HttpResponse::Ok().json(CategoryEncoders::fit(&profiles).labels()))
}
