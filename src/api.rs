//! HTTP surface: the weather procedures behind a tRPC-style envelope.
//!
//! Queries are `GET /trpc/<name>?input=<json>`, mutations are
//! `POST /trpc/<name>` with a JSON body. Every response body is either
//! `{"result":{"data":...}}` or `{"error":{"message","code","httpStatus"}}`.

use crate::db::WeatherStore;
use crate::error::AppError;
use crate::handlers;
use crate::model::{CreateWeatherInput, GetWeatherInput, Weather};
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

#[derive(Clone)]
pub struct AppState {
    store: Arc<dyn WeatherStore>,
}

pub fn routes(store: Arc<dyn WeatherStore>) -> Router {
    Router::new()
        .route(
            "/trpc/healthcheck",
            get(healthcheck).fallback(method_not_supported),
        )
        .route(
            "/trpc/getWeather",
            get(get_weather).fallback(method_not_supported),
        )
        .route(
            "/trpc/getAllWeather",
            get(get_all_weather).fallback(method_not_supported),
        )
        .route(
            "/trpc/createWeather",
            post(create_weather).fallback(method_not_supported),
        )
        .fallback(no_such_procedure)
        .with_state(AppState { store })
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcResult<T> {
    pub result: RpcData<T>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcData<T> {
    pub data: T,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RpcError {
    pub error: RpcErrorBody,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RpcErrorBody {
    pub message: String,
    pub code: String,
    pub http_status: u16,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

fn ok<T: Serialize>(data: T) -> Json<RpcResult<T>> {
    Json(RpcResult {
        result: RpcData { data },
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::InvalidInput { .. } => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", self.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, "NOT_FOUND", message.clone()),
            _ => {
                error!("Error encountered while processing request: {}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_SERVER_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        rpc_error(status, code, message)
    }
}

fn rpc_error(status: StatusCode, code: &str, message: String) -> Response {
    let body = RpcError {
        error: RpcErrorBody {
            message,
            code: code.to_string(),
            http_status: status.as_u16(),
        },
    };
    (status, Json(body)).into_response()
}

async fn method_not_supported(method: Method, uri: Uri) -> Response {
    rpc_error(
        StatusCode::METHOD_NOT_ALLOWED,
        "METHOD_NOT_SUPPORTED",
        format!("Unsupported {} request to {}", method, uri.path()),
    )
}

async fn no_such_procedure(uri: Uri) -> Response {
    rpc_error(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        format!("No procedure found on path \"{}\"", uri.path()),
    )
}

#[derive(Debug, Deserialize)]
struct QueryInput {
    input: Option<String>,
}

fn decode_input<T: DeserializeOwned>(raw: &[u8]) -> Result<T, AppError> {
    serde_json::from_slice(raw).map_err(|e| AppError::invalid_input("input", e.to_string()))
}

async fn healthcheck() -> Json<RpcResult<HealthStatus>> {
    ok(HealthStatus {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<QueryInput>, QueryRejection>,
) -> Result<Json<RpcResult<Weather>>, AppError> {
    let Query(query) = query.map_err(|e| AppError::invalid_input("input", e.body_text()))?;
    let raw = query
        .input
        .ok_or_else(|| AppError::invalid_input("input", "missing query input"))?;
    let input: GetWeatherInput = decode_input(raw.as_bytes())?;

    let weather = handlers::get_weather(state.store.as_ref(), input).await?;
    Ok(ok(weather))
}

async fn get_all_weather(
    State(state): State<AppState>,
) -> Result<Json<RpcResult<Vec<Weather>>>, AppError> {
    let weather = handlers::get_all_weather(state.store.as_ref()).await?;
    Ok(ok(weather))
}

async fn create_weather(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<RpcResult<Weather>>, AppError> {
    let input: CreateWeatherInput = decode_input(&body)?;

    let weather = handlers::create_weather(state.store.as_ref(), input).await?;
    Ok(ok(weather))
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn decode_error(response: Response) -> RpcError {
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_input_maps_to_bad_request() {
        let response =
            AppError::invalid_input("humidity", "must be between 0 and 100").into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = decode_error(response).await;
        assert_eq!(body.error.code, "BAD_REQUEST");
        assert_eq!(body.error.http_status, 400);
        assert!(body.error.message.contains("humidity"));
    }

    #[tokio::test]
    async fn test_not_found_keeps_message() {
        let message = "Weather data not found for city: Paris, FR".to_string();
        let response = AppError::NotFound(message.clone()).into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = decode_error(response).await;
        assert_eq!(body.error.code, "NOT_FOUND");
        assert_eq!(body.error.message, message);
    }

    #[tokio::test]
    async fn test_storage_errors_are_generic() {
        let response = AppError::Database(sqlx::Error::PoolTimedOut).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = decode_error(response).await;
        assert_eq!(body.error.code, "INTERNAL_SERVER_ERROR");
        assert_eq!(body.error.message, "Internal server error");
    }

    #[test]
    fn test_decode_input_reports_missing_field() {
        let err = decode_input::<GetWeatherInput>(br#"{"country":"GB"}"#).unwrap_err();
        assert!(err.to_string().contains("city"));
    }
}
