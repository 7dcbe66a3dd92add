use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::http::{header, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::models::{ErrorResponse, IngestRequest};
use crate::service;
use crate::validate::delay_seconds;

const ALLOWED_METHODS: &str = "HEAD,GET,PUT,DELETE,OPTIONS";
const ALLOWED_REQUEST_HEADERS: &str =
    "X-Requested-With, X-HTTP-Method-Override, Content-Type, Cache-Control, Accept";

pub async fn healthz() -> StatusCode {
    StatusCode::OK
}

pub async fn readyz() -> StatusCode {
    StatusCode::OK
}

pub async fn status() -> &'static str {
    "the stub api is up!"
}

pub async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ALLOW, ALLOWED_METHODS),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, ALLOWED_REQUEST_HEADERS),
        ],
    )
}

// OPTIONS is answered on every path, known or not.
pub async fn fallback(method: Method) -> Response {
    if method == Method::OPTIONS {
        return preflight().await.into_response();
    }
    StatusCode::NOT_FOUND.into_response()
}

pub async fn ingest(body: String) -> Response {
    tracing::debug!(body = %body, "raw request body");

    let request: IngestRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(err) => {
            // Decode faults take the catch-all path, not the validation one.
            tracing::error!(error = %err, "request decode failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("An error occured: {err}"),
            )
                .into_response();
        }
    };

    let response_body = match service::process(&request, unix_now()) {
        Ok(body) => body,
        Err(halt) => {
            tracing::error!(error = %halt.message, "request halted");
            return Json(ErrorResponse {
                error: halt.message,
            })
            .into_response();
        }
    };

    if let Some(seconds) = delay_seconds(request.api_key.as_deref()) {
        // Client-controlled stall for timeout testing. Unbounded, and only
        // this request's task waits.
        tracing::info!(seconds = seconds, "delaying response");
        tokio::time::sleep(Duration::from_secs(seconds)).await;
    }

    Json(serde_json::Value::Object(response_body)).into_response()
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs() as i64)
        .unwrap_or_default()
}
