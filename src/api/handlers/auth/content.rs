//! Protected content endpoint.

use axum::{
    Json,
    extract::Extension,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use std::sync::Arc;
use tracing::debug;

use super::{
    session::session_from_headers,
    state::AuthState,
    types::{ContentResponse, ErrorResponse, gate_error_response},
};

#[utoipa::path(
    get,
    path = "/admin/content",
    responses(
        (status = 200, description = "Protected markup", body = ContentResponse),
        (status = 403, description = "No authorized session", body = ErrorResponse)
    ),
    tag = "admin"
)]
pub async fn content(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let session = session_from_headers(&headers, auth_state.config());
    match auth_state.gate().read(session.as_ref()) {
        Ok(html) => (
            StatusCode::OK,
            Json(ContentResponse {
                ok: true,
                html: html.to_string(),
            }),
        )
            .into_response(),
        Err(err) => {
            debug!("Protected content denied: {err}");
            gate_error_response(&err).into_response()
        }
    }
}
