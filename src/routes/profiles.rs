use actix_web::{web, HttpRequest, HttpResponse};
use validator::Validate;

use crate::error::ApiError;
use crate::models::{ErrorResponse, ListProfilesQuery, Profile, ProfileFields, ProfilePage, ProfilePatch, ProfileQuery};
use crate::routes::AppState;

/// Configure profile CRUD routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/profiles/")
            .route(web::get().to(list_profiles))
            .route(web::post().to(create_profile)),
    )
    .service(
        web::resource("/profiles/{id}/")
            .route(web::get().to(get_profile))
            .route(web::put().to(update_profile))
            .route(web::patch().to(patch_profile))
            .route(web::delete().to(delete_profile)),
    );
}

/// List profiles
///
/// Supports exact-match filtering on every column (blank values are ignored),
/// `ordering` on industry, salary and years_of_experience, and `page` for pagination.
#[utoipa::path(
    get,
    path = "/v1/profiles/",
    tag = "profiles",
    params(ListProfilesQuery),
    responses(
        (status = 200, description = "One page of profiles", body = ProfilePage),
        (status = 400, description = "Malformed filter value", body = ErrorResponse),
        (status = 404, description = "Page out of range", body = ErrorResponse)
    )
)]
pub async fn list_profiles(
    state: web::Data<AppState>,
    query: web::Query<ListProfilesQuery>,
    req: HttpRequest,
) -> Result<HttpResponse, ApiError> {
    let page_size = i64::from(state.page_size.max(1));
    let filter = query.filter();

    let count = state.store.count(&filter).await?;
    // An empty result still has a first page
    let last_page = ((count + page_size - 1) / page_size).max(1);
    let page = query.page_number(last_page).ok_or(ApiError::InvalidPage)?;

    let results = state
        .store
        .list(&ProfileQuery {
            filter,
            ordering: query.ordering(),
            limit: Some(page_size),
            offset: (page - 1) * page_size,
        })
        .await?;

    tracing::debug!("Listing page {} of {} ({} profiles total)", page, last_page, count);

    Ok(HttpResponse::Ok().json(ProfilePage {
        count,
        next: (page < last_page).then(|| page_url(&req, page + 1)),
        previous: (page > 1).then(|| page_url(&req, page - 1)),
        results,
    }))
}

/// Absolute URL of another page, keeping every other query parameter
fn page_url(req: &HttpRequest, page: i64) -> String {
    let info = req.connection_info();

    let mut params: Vec<String> = req
        .query_string()
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
        .map(String::from)
        .collect();
    if page > 1 {
        params.push(format!("page={}", page));
    }

    let mut url = format!("{}://{}{}", info.scheme(), info.host(), req.path());
    if !params.is_empty() {
        url.push('?');
        url.push_str(&params.join("&"));
    }
    url
}

/// Create a profile
#[utoipa::path(
    post,
    path = "/v1/profiles/",
    tag = "profiles",
    request_body = ProfileFields,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Invalid body", body = ErrorResponse)
    )
)]
pub async fn create_profile(
    state: web::Data<AppState>,
    body: web::Json<ProfileFields>,
) -> Result<HttpResponse, ApiError> {
    let fields = body.into_inner();
    fields.validate()?;

    let profile = state.store.create(fields).await?;

    tracing::info!("Created profile {}", profile.id);

    Ok(HttpResponse::Created().json(profile))
}

/// Get a single profile
#[utoipa::path(
    get,
    path = "/v1/profiles/{id}/",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 200, description = "The profile", body = Profile),
        (status = 404, description = "No such profile", body = ErrorResponse)
    )
)]
pub async fn get_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .store
        .get(path.into_inner())
        .await?
        .ok_or(ApiError::NotFound)?;

    Ok(HttpResponse::Ok().json(profile))
}

/// Replace a profile
///
/// Optional fields missing from the body are cleared.
#[utoipa::path(
    put,
    path = "/v1/profiles/{id}/",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    request_body = ProfileFields,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "No such profile", body = ErrorResponse)
    )
)]
pub async fn update_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ProfileFields>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let fields = body.into_inner();
    fields.validate()?;

    let profile = state.store.update(id, fields).await?.ok_or(ApiError::NotFound)?;

    tracing::info!("Updated profile {}", id);

    Ok(HttpResponse::Ok().json(profile))
}

/// Partially update a profile
///
/// Only the fields present in the body change; `null` clears a field.
#[utoipa::path(
    patch,
    path = "/v1/profiles/{id}/",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    request_body = ProfilePatch,
    responses(
        (status = 200, description = "Updated profile", body = Profile),
        (status = 400, description = "Invalid body", body = ErrorResponse),
        (status = 404, description = "No such profile", body = ErrorResponse)
    )
)]
pub async fn patch_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
    body: web::Json<ProfilePatch>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let current = state.store.get(id).await?.ok_or(ApiError::NotFound)?;

    let fields = body.into_inner().apply(current.fields)?;
    fields.validate()?;

    let profile = state.store.update(id, fields).await?.ok_or(ApiError::NotFound)?;

    tracing::info!("Patched profile {}", id);

    Ok(HttpResponse::Ok().json(profile))
}

/// Delete a profile
#[utoipa::path(
    delete,
    path = "/v1/profiles/{id}/",
    tag = "profiles",
    params(("id" = i64, Path, description = "Profile id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such profile", body = ErrorResponse)
    )
)]
pub async fn delete_profile(
    state: web::Data<AppState>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    if !state.store.delete(id).await? {
        return Err(ApiError::NotFound);
    }

    tracing::info!("Deleted profile {}", id);

    Ok(HttpResponse::NoContent().finish())
}
