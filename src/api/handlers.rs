//! Request handlers for the API endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use tracing::{debug, info};

use super::AppState;
use super::types::{ErrorResponse, FieldError, SeriesQuery, SimulateRequest, StateResponse};
use crate::error::SimError;
use crate::sim::engine::Engine;
use crate::sim::result::ResultSet;
use crate::sim::types::StepResult;

type ApiError = (StatusCode, Json<ErrorResponse>);

/// `GET /state` → 200 + `StateResponse` JSON
pub async fn get_state(State(state): State<Arc<AppState>>) -> Json<StateResponse> {
    debug!("GET /state");
    Json(StateResponse {
        config: state.result.config().clone(),
        kpi: state.kpi.clone(),
        completion: state.result.completion(),
        latest_step: state.result.rows().last().cloned(),
    })
}

/// Returns step rows, optionally filtered by an inclusive step range.
///
/// `GET /series` → 200 + every row
/// `GET /series?from=N&to=M` → rows `N..=M`
/// `GET /series?from=10&to=5` → 400 + `ErrorResponse`
pub async fn get_series(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SeriesQuery>,
) -> Result<Json<Vec<StepResult>>, ApiError> {
    let from = query.from.unwrap_or(0);
    let to = query.to.unwrap_or(usize::MAX);
    debug!(from, to, "GET /series");

    if from > to {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::message(format!(
                "`from` ({from}) must be <= `to` ({to})"
            ))),
        ));
    }

    Ok(Json(state.result.rows_between(from, to).to_vec()))
}

/// Runs a fresh simulation for the posted vehicle inputs.
///
/// `POST /simulate` → 200 + `ResultSet` JSON
/// invalid configuration → 422 + `ErrorResponse` listing every field
pub async fn post_simulate(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<ResultSet>, ApiError> {
    info!(
        capacity_kwh = request.battery_capacity_kwh,
        initial_soc_percent = request.initial_soc_percent,
        max_charging_kw = request.max_charging_kw,
        "POST /simulate"
    );

    let engine = Engine::new(
        request.to_config(),
        state.signals.clone(),
        state.controller.clone(),
    )
    .map_err(invalid_configuration)?;

    Ok(Json(engine.run()))
}

fn invalid_configuration(err: SimError) -> ApiError {
    let fields = err.problems().iter().map(FieldError::from).collect();
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ErrorResponse {
            error: err.to_string(),
            fields,
        }),
    )
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::Request;
    use tower::util::ServiceExt;

    use super::*;
    use crate::api::router;
    use crate::sim::controller::RuleBasedController;
    use crate::sim::signals::SignalGenerator;
    use crate::sim::types::SimulationConfig;

    fn make_test_state() -> Arc<AppState> {
        let config = SimulationConfig::new(40.0, 20.0, 7.0).with_horizon(60, 1);
        let result = Engine::with_defaults(config).unwrap().run();
        Arc::new(AppState::new(
            result,
            SignalGenerator::default(),
            RuleBasedController::default(),
        ))
    }

    async fn body_json(resp: axum::response::Response) -> serde_json::Value {
        let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn state_returns_200() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/state")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert!(json.get("config").is_some());
        assert!(json.get("kpi").is_some());
        assert_eq!(json["completion"]["status"], "not_reached");
        assert_eq!(json["latest_step"]["step"], 59);
    }

    #[tokio::test]
    async fn series_returns_all_steps() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/series")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json.as_array().map(Vec::len), Some(60));
    }

    #[tokio::test]
    async fn series_range_query() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/series?from=5&to=10")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        let rows = json.as_array().cloned().unwrap_or_default();
        assert_eq!(rows.len(), 6); // steps 5..=10
        assert_eq!(rows[0]["step"], 5);
        assert_eq!(rows[0]["time"], "00:05");
        assert_eq!(rows[5]["step"], 10);
    }

    #[tokio::test]
    async fn series_invalid_range_returns_400() {
        let app = router(make_test_state());

        let req = Request::builder()
            .uri("/series?from=10&to=5")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let json = body_json(resp).await;
        assert!(json.get("error").is_some());
    }

    #[tokio::test]
    async fn simulate_runs_fresh_engine() {
        let app = router(make_test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/simulate")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"battery_capacity_kwh":40.0,"initial_soc_percent":20.0,"max_charging_kw":7.0}"#,
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let json = body_json(resp).await;
        assert_eq!(json["rows"].as_array().map(Vec::len), Some(1440));
        assert_eq!(json["completion"]["status"], "reached");
    }

    #[tokio::test]
    async fn simulate_rejects_invalid_config_with_422() {
        let app = router(make_test_state());

        let req = Request::builder()
            .method("POST")
            .uri("/simulate")
            .header("content-type", "application/json")
            .body(Body::from(
                r#"{"battery_capacity_kwh":0.0,"initial_soc_percent":20.0,"max_charging_kw":7.0}"#,
            ))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(resp).await;
        assert_eq!(json["fields"][0]["field"], "battery_capacity_kwh");
    }
}
