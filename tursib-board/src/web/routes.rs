//! HTTP route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tracing::warn;

use crate::domain::StationId;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/boards", get(list_boards))
        .route("/api/boards/:station_id", get(get_board))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Summary of every configured station.
async fn list_boards(State(state): State<AppState>) -> Json<BoardListResponse> {
    let boards = state
        .registry
        .list()
        .await
        .iter()
        .map(BoardSummary::from_status)
        .collect();

    Json(BoardListResponse { boards })
}

/// Last good board for one station.
async fn get_board(
    State(state): State<AppState>,
    Path(station_id): Path<String>,
) -> Result<Json<SensorResponse>, AppError> {
    let id = StationId::parse(&station_id).map_err(|e| AppError::BadRequest {
        message: e.to_string(),
    })?;

    let status = state
        .registry
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound {
            message: format!("unknown station {id}"),
        })?;

    let snapshot = status.snapshot.ok_or_else(|| AppError::Unavailable {
        message: match status.last_error {
            Some(e) => format!("no board for station {id} yet: {e}"),
            None => format!("no board for station {id} yet"),
        },
    })?;

    Ok(Json(SensorResponse::from_snapshot(snapshot)))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Unavailable { message: String },
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Unavailable { message } => (StatusCode::SERVICE_UNAVAILABLE, message),
        };

        warn!(%status, %message, "request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardRegistry, BoardSnapshot};
    use crate::domain::Station;
    use chrono::NaiveDate;

    fn id(s: &str) -> StationId {
        StationId::parse(s).unwrap()
    }

    fn state() -> AppState {
        AppState::new(BoardRegistry::new([
            Station::new(id("1"), "Gara"),
            Station::new(id("2"), "Piața Unirii"),
        ]))
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn board_available_after_refresh() {
        let state = state();
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        state
            .registry
            .record(&id("1"), &Ok(BoardSnapshot::no_data("Gara", now)))
            .await;

        let Json(response) = get_board(State(state), Path("1".to_string()))
            .await
            .unwrap();
        assert_eq!(response.state, "n/a");
        assert_eq!(response.attributes.station, "Gara");
    }

    #[tokio::test]
    async fn board_not_yet_refreshed_is_unavailable() {
        let err = get_board(State(state()), Path("2".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Unavailable { .. }));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[tokio::test]
    async fn unknown_and_invalid_stations() {
        let err = get_board(State(state()), Path("99".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);

        let err = get_board(State(state()), Path("a b".to_string()))
            .await
            .unwrap_err();
        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn list_includes_every_station() {
        let Json(response) = list_boards(State(state())).await;
        let ids: Vec<_> = response
            .boards
            .iter()
            .map(|b| b.station_id.to_string())
            .collect();
        assert_eq!(ids, vec!["1", "2"]);
        assert!(response.boards.iter().all(|b| !b.available));
    }

    #[test]
    fn router_builds() {
        let _router = create_router(state());
    }
}
