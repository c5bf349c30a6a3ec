use crate::core::dashboard::{update_graphs, update_heatmap, DashboardUpdate};
use crate::core::figures::Figure;
use crate::core::transform::{borough_options, major_crime_options};
use crate::domain::model::DropdownOption;
use crate::web::page::render_dashboard;
use crate::web::AppState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
}

#[derive(Debug)]
pub(crate) struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    fn invalid_query(message: String) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            code: "InvalidQueryParameter",
            message,
        }
    }

    fn not_found(path: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            code: "NotFound",
            message: format!("no route for {}", path),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::invalid_query(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!(status = self.status.as_u16(), code = self.code, "{}", self.message);
        (
            self.status,
            Json(serde_json::json!({
                "error": ErrorBody {
                    code: self.code,
                    message: self.message,
                }
            })),
        )
            .into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct HeatmapQuery {
    n_clicks: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DashboardQuery {
    n_clicks: Option<u64>,
    borough: Option<String>,
    major_crime: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct Readiness {
    status: &'static str,
    crime_data: bool,
    boundaries: bool,
    loaded_at: chrono::DateTime<chrono::Utc>,
}

pub(crate) async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_dashboard(&state.data))
}

pub(crate) async fn healthz_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

/// Always 200 once the server is listening; the body reports which sources loaded.
pub(crate) async fn readyz_handler(State(state): State<AppState>) -> Json<Readiness> {
    Json(Readiness {
        status: if state.data.is_complete() {
            "ready"
        } else {
            "degraded"
        },
        crime_data: state.data.crimes.is_some(),
        boundaries: state.data.boundaries.is_some(),
        loaded_at: state.data.loaded_at,
    })
}

pub(crate) async fn boroughs_handler(State(state): State<AppState>) -> Json<Vec<DropdownOption>> {
    Json(borough_options(state.data.crimes.as_deref()))
}

pub(crate) async fn major_crimes_handler(
    State(state): State<AppState>,
    Path(borough): Path<String>,
) -> Json<Vec<DropdownOption>> {
    let options = match state.data.crimes.as_deref() {
        Some(crimes) => major_crime_options(crimes, &borough),
        None => vec![],
    };
    Json(options)
}

pub(crate) async fn heatmap_handler(
    State(state): State<AppState>,
    query: Result<Query<HeatmapQuery>, QueryRejection>,
) -> Result<Json<Figure>, ApiError> {
    let Query(query) = query?;
    Ok(Json(update_heatmap(&state.data, query.n_clicks.unwrap_or(0))))
}

pub(crate) async fn dashboard_handler(
    State(state): State<AppState>,
    query: Result<Query<DashboardQuery>, QueryRejection>,
) -> Result<Json<DashboardUpdate>, ApiError> {
    let Query(query) = query?;
    Ok(Json(update_graphs(
        &state.data,
        query.n_clicks.unwrap_or(0),
        query.major_crime.as_deref(),
        query.borough.as_deref(),
    )))
}

pub(crate) async fn fallback_handler(uri: Uri) -> ApiError {
    ApiError::not_found(uri.path())
}
