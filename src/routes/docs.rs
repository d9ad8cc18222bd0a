use actix_web::{web, HttpResponse, Responder};
use utoipa::OpenApi;

use crate::models::{
    AverageAgeResponse, AverageSalaryResponse, EncodedLabel, ErrorResponse, ExperienceSalaryResponse,
    HealthResponse, PredictionLabelsResponse, PredictionResponse, Profile, ProfileFields, ProfilePage,
    ProfilePatch,
};
use crate::routes::{profiles, stats, AppState};

#[derive(OpenApi)]
#[openapi(
    info(title = "HR API", version = "1.0.0", description = "API for the HR API"),
    paths(
        profiles::list_profiles,
        profiles::create_profile,
        profiles::get_profile,
        profiles::update_profile,
        profiles::patch_profile,
        profiles::delete_profile,
        stats::get_average_age,
        stats::get_average_salary,
        stats::get_salary_per_experience,
        stats::predict_salary,
        stats::get_prediction_labels,
        health_check
    ),
    components(
        schemas(
            Profile,
            ProfileFields,
            ProfilePatch,
            ProfilePage,
            AverageAgeResponse,
            AverageSalaryResponse,
            ExperienceSalaryResponse,
            PredictionResponse,
            PredictionLabelsResponse,
            EncodedLabel,
            HealthResponse,
            ErrorResponse
        )
    )
)]
pub struct ApiDoc;

/// Configure health and documentation routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/schema/", web::get().to(openapi_json))
        .route("/docs/", web::get().to(docs_ui));
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/v1/health",
    tag = "meta",
    responses((status = 200, description = "Service status", body = HealthResponse))
)]
pub async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let healthy = match state.store.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            tracing::warn!("Storage health check failed: {}", e);
            false
        }
    };

    let status = if healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

async fn openapi_json() -> impl Responder {
    HttpResponse::Ok().json(ApiDoc::openapi())
}

async fn docs_ui() -> impl Responder {
    HttpResponse::Ok().content_type("text/html; charset=utf-8").body(
        r#"<!doctype html>
<html>
  <head>
    <title>HR API</title>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <script src="https://unpkg.com/@stoplight/elements/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements/styles.min.css">
  </head>
  <body style="height: 100%; margin: 0;">
    <elements-api apiDescriptionUrl="../schema/" router="hash" />
  </body>
</html>
"#,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        for expected in [
            "/v1/profiles/",
            "/v1/profiles/{id}/",
            "/v1/age/{industry}",
            "/v1/salary/industry/{industry}",
            "/v1/salary/experience/{experience}",
            "/v1/salary/prediction/{gender}/{industry}/{experience}/{age}",
            "/v1/salary/prediction/labels",
            "/v1/health",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {}", expected);
        }
        assert_eq!(doc.info.title, "HR API");
    }
}
