//! # API REST
//!
//! REST API implementation for the placement locator.
//!
//! Handles:
//! - HTTP endpoints with axum (upload, search, health)
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (multipart uploads, JSON serialization, CORS, body limits)
//!
//! Uses `api-shared` for wire types and `placements-core` for all index logic.

#![warn(rust_2018_idioms)]

use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{ErrorRes, HealthRes, HealthService, SearchReq, SearchRes, UploadReq, UploadRes};
use placements_core::{CoreConfig, PlacementError, PlacementService};

/// Multipart field carrying the placement definition file.
pub const UPLOAD_FIELD_NAME: &str = "file";

type ApiError = (StatusCode, Json<ErrorRes>);

/// Application state for the REST API server
///
/// Shared by all request handlers. Cloning is cheap; every clone serves the same published
/// placement index.
#[derive(Clone)]
pub struct AppState {
    cfg: Arc<CoreConfig>,
    placement_service: PlacementService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>, placement_service: PlacementService) -> Self {
        Self {
            cfg,
            placement_service,
        }
    }

    pub fn placement_service(&self) -> &PlacementService {
        &self.placement_service
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, upload_placements, search_placements),
    components(schemas(HealthRes, ErrorRes, UploadReq, UploadRes, SearchRes)),
    info(
        title = "Advertising Placements API",
        description = "Finds the advertising placements eligible at a location"
    )
)]
pub struct ApiDoc;

/// Builds the REST router with documentation, CORS and the upload body limit applied.
pub fn router(state: AppState) -> Router {
    let body_limit = state.cfg.max_upload_bytes();

    Router::new()
        .route("/health", get(health))
        .route("/api/placements/upload", post(upload_placements))
        .route("/api/placements/search", get(search_placements))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn bad_request(message: impl Into<String>) -> ApiError {
    (StatusCode::BAD_REQUEST, Json(ErrorRes::new(message)))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns liveness plus the number of distinct locations in the served index.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> Json<HealthRes> {
    let distinct_locations = state.placement_service.snapshot().len();
    Json(HealthService::check_health(distinct_locations))
}

#[utoipa::path(
    post,
    path = "/api/placements/upload",
    request_body(content = UploadReq, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Index replaced", body = UploadRes),
        (status = 400, description = "No file, or file unreadable", body = ErrorRes),
        (status = 413, description = "Upload exceeds the configured size limit", body = ErrorRes)
    )
)]
/// Replace the placement index from an uploaded definition file
///
/// Reads the `file` part of a multipart form and rebuilds the whole index from it. Lines that
/// cannot be parsed are listed in the response and skipped; the rest of the file is still
/// published. Any previously uploaded data is discarded.
///
/// # Returns
/// * `Ok(Json<UploadRes>)` - Upload summary
/// * `Err((StatusCode, Json<ErrorRes>))` - The request carried no readable file
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the request is not a multipart form,
/// - no `file` part is present, or
/// - the file is not valid UTF-8 text.
///
/// Returns `413 Payload Too Large` if the body exceeds the configured limit. In every error case
/// the previously published index keeps serving.
#[axum::debug_handler]
async fn upload_placements(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadRes>, ApiError> {
    let mut multipart = multipart.map_err(|e| {
        tracing::warn!("Upload rejected: {}", e);
        bad_request("expected a multipart/form-data upload")
    })?;

    let mut contents = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!("Upload stream error: {}", e);
                return Err((e.status(), Json(ErrorRes::new(e.body_text()))));
            }
        };

        if field.name() != Some(UPLOAD_FIELD_NAME) {
            continue;
        }

        match field.bytes().await {
            Ok(bytes) => {
                contents = Some(bytes);
                break;
            }
            Err(e) => {
                tracing::warn!("Upload stream error: {}", e);
                return Err((e.status(), Json(ErrorRes::new(e.body_text()))));
            }
        }
    }

    let Some(contents) = contents else {
        return Err(bad_request("no file uploaded"));
    };

    match state
        .placement_service
        .replace_index_from_reader(contents.as_ref())
    {
        Ok(outcome) => Ok(Json(UploadRes::from(outcome))),
        Err(PlacementError::UploadRead(e)) => {
            tracing::warn!("Upload not readable as text: {}", e);
            Err(bad_request("uploaded file is not valid UTF-8 text"))
        }
        Err(e) => {
            tracing::error!("Upload error: {:?}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorRes::new("internal error")),
            ))
        }
    }
}

#[utoipa::path(
    get,
    path = "/api/placements/search",
    params(SearchReq),
    responses(
        (status = 200, description = "Placements visible at the location", body = SearchRes),
        (status = 400, description = "Missing or invalid location", body = ErrorRes)
    )
)]
/// Find the placements eligible at a location
///
/// Matches the location against itself and each of its ancestors, so a placement registered at
/// `/eu/de` is returned for `/eu/de/berlin` as well.
///
/// # Returns
/// * `Ok(Json<SearchRes>)` - Canonical location and sorted placements
/// * `Err((StatusCode, Json<ErrorRes>))` - Bad request
///
/// # Errors
/// Returns `400 Bad Request` if:
/// - the `location` parameter is missing or blank, or
/// - the location does not start with `/`.
#[axum::debug_handler]
async fn search_placements(
    State(state): State<AppState>,
    Query(req): Query<SearchReq>,
) -> Result<Json<SearchRes>, ApiError> {
    let location = req.location.unwrap_or_default();
    if location.trim().is_empty() {
        return Err(bad_request("location is required"));
    }

    match state.placement_service.lookup(&location) {
        Ok(result) => Ok(Json(SearchRes::from(result))),
        Err(e) => {
            tracing::warn!("Search rejected: {}", e);
            Err(bad_request(e.to_string()))
        }
    }
}
