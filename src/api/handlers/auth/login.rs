//! Passcode login endpoint.

use axum::{
    Form, Json,
    extract::{Extension, FromRequest, Request},
    http::{
        HeaderMap, StatusCode,
        header::{CONTENT_TYPE, SET_COOKIE},
    },
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::{error, info};

use super::{
    session::{session_cookie, session_from_headers},
    state::AuthState,
    types::{ErrorResponse, LoginRequest, OkResponse, gate_error_response},
};

#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in, session cookie set", body = OkResponse),
        (status = 400, description = "Missing passcode", body = ErrorResponse),
        (status = 401, description = "Incorrect password", body = ErrorResponse),
        (status = 500, description = "Server not ready", body = ErrorResponse)
    ),
    tag = "auth"
)]
pub async fn login(auth_state: Extension<Arc<AuthState>>, request: Request) -> impl IntoResponse {
    let session = session_from_headers(request.headers(), auth_state.config());
    let passcode = read_passcode(request).await;

    let id = match auth_state
        .gate()
        .attempt(passcode.as_deref(), session.as_ref())
        .await
    {
        Ok(id) => id,
        Err(err) => return gate_error_response(&err).into_response(),
    };

    let cookie = match session_cookie(auth_state.config(), &id) {
        Ok(cookie) => cookie,
        Err(err) => {
            error!("Failed to build session cookie: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    ok: false,
                    error: "Internal error".to_string(),
                }),
            )
                .into_response();
        }
    };

    info!("Admin session authorized");

    let mut headers = HeaderMap::new();
    headers.insert(SET_COOKIE, cookie);
    (StatusCode::OK, headers, OkResponse::ok()).into_response()
}

/// Pull the passcode out of a JSON or urlencoded body.
///
/// Unparseable bodies read as "no passcode" so they surface as a 400.
async fn read_passcode(request: Request) -> Option<String> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

    let body = if is_form {
        Form::<LoginRequest>::from_request(request, &())
            .await
            .ok()
            .map(|Form(body)| body)
    } else {
        Json::<LoginRequest>::from_request(request, &())
            .await
            .ok()
            .map(|Json(body)| body)
    };

    body.and_then(|body| body.passcode)
}
