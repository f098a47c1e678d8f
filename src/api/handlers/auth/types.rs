//! Request/response types for gate endpoints.

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use super::gate::GateError;

#[derive(ToSchema, Serialize, Deserialize, Debug, Default)]
pub struct LoginRequest {
    #[serde(default)]
    pub passcode: Option<String>,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    pub(crate) fn ok() -> Json<Self> {
        Json(Self { ok: true })
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ContentResponse {
    pub ok: bool,
    pub html: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

/// Map a gate failure to its status code and JSON body.
pub(crate) fn gate_error_response(err: &GateError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        GateError::MissingPasscode => StatusCode::BAD_REQUEST,
        GateError::IncorrectPassword => StatusCode::UNAUTHORIZED,
        GateError::NotAuthorized => StatusCode::FORBIDDEN,
        GateError::NotReady | GateError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let message = match err {
        GateError::Internal(detail) => {
            error!("Gate failure: {detail}");
            "Internal error".to_string()
        }
        _ => err.to_string(),
    };
    (
        status,
        Json(ErrorResponse {
            ok: false,
            error: message,
        }),
    )
}
