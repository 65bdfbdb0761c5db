// TrashFlow - REST API with Axum
// Every handler locks the shared Dashboard for its whole duration

use crate::dashboard::Dashboard;
use crate::error::RedistributionError;
use crate::facility::{FacilityId, FacilityRecord};
use crate::redistribution::{has_transferable_load, RedistributionPlan};
use crate::status::{Presentation, Status};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tower_http::cors::CorsLayer;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    dashboard: Arc<Mutex<Dashboard>>,
    refresh_delay: Duration,
}

impl AppState {
    pub fn new(dashboard: Dashboard, refresh_delay: Duration) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(dashboard)),
            refresh_delay,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Dashboard> {
        // A panicked handler cannot leave a record half-written, so keep serving
        self.dashboard.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// API Response wrapper
#[derive(Serialize)]
struct ApiResponse<T> {
    success: bool,
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<T> ApiResponse<T> {
    fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    fn err(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

impl IntoResponse for RedistributionError {
    fn into_response(self) -> Response {
        let status = if self.is_missing_record() {
            StatusCode::NOT_FOUND
        } else {
            StatusCode::CONFLICT
        };
        (status, Json(ApiResponse::err(self.to_string()))).into_response()
    }
}

/// Facility row as the page renders it
#[derive(Serialize, Deserialize)]
pub struct FacilityResponse {
    pub id: FacilityId,
    pub district: String,
    pub name: String,
    pub capacity_percent: u8,
    pub status: Status,
    pub label: String,
    pub color: String,
    pub can_redistribute: bool,
}

impl From<&FacilityRecord> for FacilityResponse {
    fn from(record: &FacilityRecord) -> Self {
        let presentation = record.status().presentation();
        Self {
            id: record.id(),
            district: record.district().to_string(),
            name: record.name().to_string(),
            capacity_percent: record.capacity_percent(),
            status: record.status(),
            label: presentation.label.to_string(),
            color: presentation.color.to_string(),
            can_redistribute: record.status() == Status::Overload
                && has_transferable_load(record.capacity_percent()),
        }
    }
}

#[derive(Deserialize)]
struct FacilityFilter {
    status: Option<String>,
}

#[derive(Serialize)]
struct ClassificationResponse {
    id: FacilityId,
    status: Status,
    presentation: Presentation,
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET /api/health - Health check
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::ok("OK"))
}

/// GET /api/facilities - All facilities, optionally `?status=safe|warning|overload`
async fn list_facilities(
    State(state): State<AppState>,
    Query(filter): Query<FacilityFilter>,
) -> Response {
    let wanted = match filter.status.as_deref().map(str::parse::<Status>) {
        None => None,
        Some(Ok(status)) => Some(status),
        Some(Err(e)) => {
            return (StatusCode::BAD_REQUEST, Json(ApiResponse::err(e.to_string()))).into_response()
        }
    };

    let dashboard = state.lock();
    let response: Vec<FacilityResponse> = dashboard
        .records()
        .iter()
        .filter(|r| wanted.map_or(true, |s| r.status() == s))
        .map(FacilityResponse::from)
        .collect();

    Json(ApiResponse::ok(response)).into_response()
}

/// GET /api/facilities/:id/status - Classification of one facility
async fn facility_status(
    State(state): State<AppState>,
    Path(id): Path<FacilityId>,
) -> Result<Json<ApiResponse<ClassificationResponse>>, RedistributionError> {
    let status = state.lock().classification_of(id)?;
    Ok(Json(ApiResponse::ok(ClassificationResponse {
        id,
        status,
        presentation: status.presentation(),
    })))
}

/// GET /api/presentation/:key - Label and colour for any status key, `Unknown` if unrecognized
async fn presentation(Path(key): Path<String>) -> impl IntoResponse {
    Json(ApiResponse::ok(Presentation::for_key(&key)))
}

/// GET /api/facilities/:id/plan - Redistribution plan for one facility
async fn facility_plan(
    State(state): State<AppState>,
    Path(id): Path<FacilityId>,
) -> Result<Json<ApiResponse<RedistributionPlan>>, RedistributionError> {
    let plan = state.lock().plan_for(id)?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// GET /api/simulate - Plan for the first Overload facility
async fn simulate(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<RedistributionPlan>>, RedistributionError> {
    let plan = state.lock().plan_for_first_overload()?;
    Ok(Json(ApiResponse::ok(plan)))
}

/// POST /api/redistributions - Confirm a plan
async fn confirm_redistribution(
    State(state): State<AppState>,
    Json(plan): Json<RedistributionPlan>,
) -> Result<Json<ApiResponse<Vec<FacilityResponse>>>, RedistributionError> {
    let mut dashboard = state.lock();
    dashboard.confirm(&plan)?;

    let updated = [plan.source_id, plan.target_id]
        .iter()
        .filter_map(|id| dashboard.registry().find_by_id(*id))
        .map(FacilityResponse::from)
        .collect();
    Ok(Json(ApiResponse::ok(updated)))
}

/// POST /api/refresh - Synthetic refresh after the configured delay
async fn refresh(State(state): State<AppState>) -> impl IntoResponse {
    tokio::time::sleep(state.refresh_delay).await;
    let summary = state.lock().refresh();
    Json(ApiResponse::ok(summary))
}

/// GET /api/summary - Count of facilities per status
async fn summary(State(state): State<AppState>) -> impl IntoResponse {
    Json(ApiResponse::ok(state.lock().summary()))
}

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/facilities", get(list_facilities))
        .route("/facilities/:id/status", get(facility_status))
        .route("/facilities/:id/plan", get(facility_plan))
        .route("/presentation/:key", get(presentation))
        .route("/simulate", get(simulate))
        .route("/redistributions", post(confirm_redistribution))
        .route("/refresh", post(refresh))
        .route("/summary", get(summary))
        .with_state(state);

    Router::new()
        .nest("/api", api_routes)
        .layer(CorsLayer::permissive())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FacilityRegistry;
    use crate::refresh::Refresher;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    fn app() -> Router {
        let dashboard = Dashboard::new(FacilityRegistry::default(), Refresher::seeded(5, 5));
        router(AppState::new(dashboard, Duration::ZERO))
    }

    async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn get_req(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_list_facilities() {
        let (status, body) = call(app(), get_req("/api/facilities")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 14);
        assert_eq!(body["data"][2]["label"], "Overload");
        assert_eq!(body["data"][2]["can_redistribute"], true);
    }

    #[tokio::test]
    async fn test_filter_by_status() {
        let (status, body) = call(app(), get_req("/api/facilities?status=overload")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 3);

        let (status, _) = call(app(), get_req("/api/facilities?status=full")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_status_of_unknown_facility() {
        let (status, body) = call(app(), get_req("/api/facilities/99/status")).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_plan_and_confirm() {
        let app = app();

        let (status, body) = call(app.clone(), get_req("/api/facilities/3/plan")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["target_id"], 6);

        let request = Request::builder()
            .method("POST")
            .uri("/api/redistributions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body["data"].to_string()))
            .unwrap();
        let (status, body) = call(app.clone(), request).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["capacity_percent"], 93);
        assert_eq!(body["data"][1]["capacity_percent"], 32);
    }

    #[tokio::test]
    async fn test_plan_without_transfer_is_conflict() {
        // Ngampilan at 88% is Overload but below the first whole percent of transfer
        let (status, body) = call(app(), get_req("/api/facilities/7/plan")).await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert!(body["error"].as_str().unwrap().contains("nothing to redistribute"));
    }

    #[tokio::test]
    async fn test_rows_without_transferable_load_cannot_redistribute() {
        let (_, body) = call(app(), get_req("/api/facilities?status=overload")).await;
        let rows = body["data"].as_array().unwrap();

        // Jetis 95%, Ngampilan 88%, Wirobrajan 92%
        let flags: Vec<_> = rows.iter().map(|r| r["can_redistribute"].as_bool().unwrap()).collect();
        assert_eq!(flags, vec![true, false, true]);
    }

    #[tokio::test]
    async fn test_forged_plan_is_rejected() {
        let app = app();
        let forged = serde_json::json!({
            "source_id": 3,
            "target_id": 3,
            "amount_percent": 2,
            "resulting_source_capacity": 93,
            "resulting_target_capacity": 10
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/redistributions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(forged.to_string()))
            .unwrap();
        let (status, _) = call(app.clone(), request).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let tampered = serde_json::json!({
            "source_id": 3,
            "target_id": 6,
            "amount_percent": 2,
            "resulting_source_capacity": 10,
            "resulting_target_capacity": 32
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/redistributions")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(tampered.to_string()))
            .unwrap();
        let (status, _) = call(app.clone(), request).await;
        assert_eq!(status, StatusCode::CONFLICT);

        let (_, body) = call(app, get_req("/api/facilities/3/status")).await;
        assert_eq!(body["data"]["status"], "overload");
    }

    #[tokio::test]
    async fn test_presentation_lookup_falls_back() {
        let (status, body) = call(app(), get_req("/api/presentation/warning")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["label"], "Peringatan");

        let (_, body) = call(app(), get_req("/api/presentation/critical")).await;
        assert_eq!(body["data"]["label"], "Unknown");
        assert_eq!(body["data"]["color"], "gray");
    }

    #[tokio::test]
    async fn test_refresh_and_summary() {
        let app = app();

        let request = Request::builder()
            .method("POST")
            .uri("/api/refresh")
            .body(Body::empty())
            .unwrap();
        let (status, body) = call(app.clone(), request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["records"], 14);

        let (_, body) = call(app, get_req("/api/summary")).await;
        assert_eq!(body["data"]["total"], 14);
    }
}
