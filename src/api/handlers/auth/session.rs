//! Session cookie handling.
//!
//! The cookie carries `<token>.<signature>` where the signature is
//! HMAC-SHA256 of the token under the session-signing secret. Cookies that fail
//! verification are treated as absent.
//!
//! `POST /logout` lives here too since it only deals with the cookie and the store.

use anyhow::{Context, Result, anyhow};
use axum::{
    extract::Extension,
    http::{
        HeaderMap, HeaderValue, StatusCode,
        header::{COOKIE, InvalidHeaderValue, SET_COOKIE},
    },
    response::IntoResponse,
};
use base64ct::{Base64UrlUnpadded, Encoding};
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;

use std::sync::Arc;
use tracing::{error, info};

use super::{
    state::{AuthConfig, AuthState},
    store::SessionId,
    types::OkResponse,
};

pub const SESSION_COOKIE_NAME: &str = "passgate.sid";

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &SecretString) -> Result<HmacSha256> {
    HmacSha256::new_from_slice(secret.expose_secret().as_bytes())
        .map_err(|_| anyhow!("invalid session signing key"))
}

/// Produce the signed cookie value for `id`.
pub(crate) fn sign(secret: &SecretString, id: &SessionId) -> Result<String> {
    let mut mac = mac(secret)?;
    mac.update(id.as_str().as_bytes());
    let signature = Base64UrlUnpadded::encode_string(&mac.finalize().into_bytes());
    Ok(format!("{}.{signature}", id.as_str()))
}

/// Check a signed cookie value and return the session token it carries.
pub(crate) fn unsign(secret: &SecretString, value: &str) -> Option<SessionId> {
    let (token, signature) = value.rsplit_once('.')?;
    if token.is_empty() {
        return None;
    }
    let signature = Base64UrlUnpadded::decode_vec(signature).ok()?;
    let mut mac = mac(secret).ok()?;
    mac.update(token.as_bytes());
    mac.verify_slice(&signature).ok()?;
    Some(SessionId::from(token.to_string()))
}

#[utoipa::path(
    post,
    path = "/logout",
    responses(
        (status = 200, description = "Session destroyed and cookie cleared", body = OkResponse)
    ),
    tag = "auth"
)]
pub async fn logout(headers: HeaderMap, auth_state: Extension<Arc<AuthState>>) -> impl IntoResponse {
    let session = session_from_headers(&headers, auth_state.config());
    auth_state.gate().terminate(session.as_ref());
    info!("Admin session terminated");

    // Always clear the cookie, even if the session record was missing.
    let mut response_headers = HeaderMap::new();
    match clear_session_cookie(auth_state.config()) {
        Ok(cookie) => {
            response_headers.insert(SET_COOKIE, cookie);
        }
        Err(err) => error!("Failed to build clearing cookie: {err}"),
    }
    (StatusCode::OK, response_headers, OkResponse::ok())
}

/// Extract and verify the session token from the request cookies.
pub(crate) fn session_from_headers(headers: &HeaderMap, config: &AuthConfig) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|header| header.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(key, _)| key.trim() == SESSION_COOKIE_NAME)
        .find_map(|(_, value)| unsign(config.session_secret(), value.trim()))
}

/// Build an `HttpOnly` cookie for the session token.
pub(crate) fn session_cookie(config: &AuthConfig, id: &SessionId) -> Result<HeaderValue> {
    let value = sign(config.session_secret(), id)?;
    let ttl_seconds = config.session_ttl().as_secs();
    let mut cookie = format!(
        "{SESSION_COOKIE_NAME}={value}; Path=/; HttpOnly; SameSite=Lax; Max-Age={ttl_seconds}"
    );
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie).context("failed to build session cookie")
}

pub(crate) fn clear_session_cookie(config: &AuthConfig) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut cookie = format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    if config.cookie_secure() {
        cookie.push_str("; Secure");
    }
    HeaderValue::from_str(&cookie)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> AuthConfig {
        AuthConfig::new(SecretString::from("session-secret"))
    }

    #[test]
    fn signed_value_verifies_with_same_secret() {
        let secret = SecretString::from("session-secret");
        let id = SessionId::generate().unwrap();
        let value = sign(&secret, &id).unwrap();
        assert_eq!(unsign(&secret, &value), Some(id));
    }

    #[test]
    fn signed_value_rejected_with_other_secret() {
        let id = SessionId::generate().unwrap();
        let value = sign(&SecretString::from("one"), &id).unwrap();
        assert_eq!(unsign(&SecretString::from("two"), &value), None);
    }

    #[test]
    fn tampered_or_malformed_values_are_rejected() {
        let secret = SecretString::from("session-secret");
        let id = SessionId::from("token".to_string());
        let value = sign(&secret, &id).unwrap();
        let (_, signature) = value.rsplit_once('.').unwrap();

        assert_eq!(unsign(&secret, &format!("other.{signature}")), None);
        assert_eq!(unsign(&secret, "token"), None);
        assert_eq!(unsign(&secret, "token.not-base64!"), None);
        assert_eq!(unsign(&secret, &format!(".{signature}")), None);
        assert_eq!(unsign(&secret, ""), None);
    }

    #[test]
    fn session_from_headers_finds_cookie_among_others() {
        let config = config();
        let id = SessionId::generate().unwrap();
        let value = sign(config.session_secret(), &id).unwrap();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {SESSION_COOKIE_NAME}={value}; x=1"))
                .unwrap(),
        );
        assert_eq!(session_from_headers(&headers, &config), Some(id));
    }

    #[test]
    fn session_from_headers_ignores_unsigned_cookie() {
        let config = config();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("{SESSION_COOKIE_NAME}=raw-token")).unwrap(),
        );
        assert_eq!(session_from_headers(&headers, &config), None);
        assert_eq!(session_from_headers(&HeaderMap::new(), &config), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let config = config();
        let id = SessionId::from("token".to_string());
        let cookie = session_cookie(&config, &id).unwrap();
        let cookie = cookie.to_str().unwrap();
        assert!(cookie.starts_with(&format!("{SESSION_COOKIE_NAME}=token.")));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=3600"));
        assert!(!cookie.contains("Secure"));

        let secure = config.with_cookie_secure(true);
        let cookie = session_cookie(&secure, &id).unwrap();
        assert!(cookie.to_str().unwrap().ends_with("; Secure"));
    }

    #[test]
    fn clear_session_cookie_expires_immediately() {
        let cookie = clear_session_cookie(&config()).unwrap();
        assert_eq!(
            cookie.to_str().unwrap(),
            format!("{SESSION_COOKIE_NAME}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
        );
    }
}
