//! HTTP request handlers
//!
//! `/` renders the dashboard page, `/api/v1/*` returns the same report as JSON.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use uuid::Uuid;

use super::server::AppState;
use crate::error::{PainelError, PainelResult};
use crate::render::{render_dashboard, render_error_page, PageOptions};
use crate::report::{load_report, CitySelection, Report};

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
        }
    }
}

/// Read the city selection from query pairs
///
/// `cidade` may repeat. A submitted form with nothing checked carries only
/// `todas=0`, which means an empty selection; no parameters at all means
/// every city.
pub fn selection_from_query(params: &[(String, String)]) -> Option<CitySelection> {
    let cities: Vec<&str> = params
        .iter()
        .filter(|(key, _)| key == "cidade")
        .map(|(_, value)| value.as_str())
        .collect();

    if !cities.is_empty() {
        return Some(CitySelection::of(cities));
    }

    let cleared = params.iter().any(|(key, value)| key == "todas" && value == "0");
    cleared.then(CitySelection::none)
}

/// Build the report on the blocking pool
///
/// Workbook reads are synchronous file I/O behind the cache mutex.
async fn build_report(
    state: Arc<AppState>,
    selection: Option<CitySelection>,
) -> PainelResult<Report> {
    tokio::task::spawn_blocking(move || {
        load_report(&state.cache, &state.config, selection.as_ref())
    })
    .await
    .map_err(|e| PainelError::Task(e.to_string()))?
}

/// GET / - Dashboard page
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let selection = selection_from_query(&params);

    let result = build_report(Arc::clone(&state), selection).await;
    let profile = &state.config.profile;
    match result {
        Ok(report) => {
            let logo_src = state
                .config
                .logo
                .as_ref()
                .filter(|path| path.is_file())
                .map(|_| "/logo".to_string());
            let options = PageOptions {
                logo_src,
                interactive: true,
                footer: Some(format!(
                    "{} · {} {}",
                    state.config.workbook.display(),
                    env!("CARGO_PKG_NAME"),
                    state.version
                )),
            };
            Html(render_dashboard(&report, profile, &options)).into_response()
        }
        Err(e) => {
            error!(error = %e, "failed to build dashboard");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page(&profile.labels.header, &e.to_string())),
            )
                .into_response()
        }
    }
}

/// GET /logo - Banner image
pub async fn logo(State(state): State<Arc<AppState>>) -> Response {
    let Some(path) = state.config.logo.as_ref() else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(path).await {
        Ok(bytes) => {
            let content_type = match path
                .extension()
                .and_then(|ext| ext.to_str())
                .map(str::to_ascii_lowercase)
                .as_deref()
            {
                Some("jpg") | Some("jpeg") => "image/jpeg",
                Some("svg") => "image/svg+xml",
                Some("gif") => "image/gif",
                _ => "image/png",
            };
            ([(header::CONTENT_TYPE, content_type)], bytes).into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "logo not readable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_message: String,
}

/// GET /health - Health check
pub async fn health() -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        uptime_message: "Server is running".to_string(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub profile: String,
    pub workbook: String,
}

/// GET /version - Server version and active dashboard
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        profile: state.config.profile.name.clone(),
        workbook: state.config.workbook.display().to_string(),
    }))
}

/// GET /api/v1/report - Computed report as JSON
pub async fn report(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Response {
    let selection = selection_from_query(&params);

    match build_report(state, selection).await {
        Ok(report) => Json(ApiResponse::ok(report)).into_response(),
        Err(e) => {
            error!(error = %e, "failed to build report");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

/// Cities response
#[derive(Serialize)]
pub struct CitiesResponse {
    pub cities: Vec<String>,
}

/// GET /api/v1/cities - Filter options
pub async fn cities(State(state): State<Arc<AppState>>) -> Response {
    match build_report(state, None).await {
        Ok(report) => Json(ApiResponse::ok(CitiesResponse {
            cities: report.available_cities,
        }))
        .into_response(),
        Err(e) => {
            error!(error = %e, "failed to list cities");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<()>::err(e.to_string())),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    // ==================== ApiResponse Tests ====================

    #[test]
    fn test_api_response_ok() {
        let response: ApiResponse<String> = ApiResponse::ok("test data".to_string());
        assert!(response.success);
        assert!(response.data.is_some());
        assert!(response.error.is_none());
        assert!(!response.request_id.is_empty());
    }

    #[test]
    fn test_api_response_err_omits_data() {
        let response: ApiResponse<()> = ApiResponse::err("Sheet 'BASE' not found");
        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("Sheet 'BASE' not found"));
        assert!(!json.contains("\"data\""));
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a: ApiResponse<String> = ApiResponse::ok("a".to_string());
        let b: ApiResponse<String> = ApiResponse::ok("b".to_string());
        assert_ne!(a.request_id, b.request_id);
    }

    // ==================== Query Selection Tests ====================

    #[test]
    fn test_no_params_selects_everything() {
        assert!(selection_from_query(&[]).is_none());
    }

    #[test]
    fn test_repeated_cidade_params() {
        let selection =
            selection_from_query(&pairs(&[("todas", "0"), ("cidade", "X"), ("cidade", "Y")]))
                .unwrap();
        assert_eq!(selection.len(), 2);
        assert!(selection.contains("X"));
        assert!(selection.contains("Y"));
    }

    #[test]
    fn test_cleared_form_is_empty_selection() {
        let selection = selection_from_query(&pairs(&[("todas", "0")])).unwrap();
        assert!(selection.is_empty());
    }
}
