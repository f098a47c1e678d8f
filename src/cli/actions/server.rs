use crate::{
    api::{self, AuthConfig, AuthState, DEFAULT_CONTENT},
    secret::SecretLoader,
};
use anyhow::{Context, Result};
use base64ct::{Base64UrlUnpadded, Encoding};
use rand::{RngCore, rngs::OsRng};
use secrecy::SecretString;
use std::{fs, path::PathBuf, sync::Arc, time::Duration};
use tracing::{debug, info, warn};

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub public_dir: PathBuf,
    pub admin_pass: Option<SecretString>,
    pub admin_pass_file: Option<PathBuf>,
    pub content_file: Option<PathBuf>,
    pub session_secret: Option<SecretString>,
    pub session_ttl_seconds: u64,
    pub cookie_secure: bool,
}

/// Execute the server action.
///
/// The admin passcode is resolved and hashed before the listener is bound, so a
/// missing passcode aborts startup without ever accepting a connection.
///
/// # Errors
/// Returns an error if no admin passcode is found, the content file cannot be
/// read, hashing fails, or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let (admin_pass, source) = SecretLoader::new(args.admin_pass, args.admin_pass_file).load()?;
    info!("Admin passcode loaded from {source}");

    let content = match &args.content_file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read content file: {}", path.display()))?,
        None => DEFAULT_CONTENT.to_string(),
    };

    let session_secret = match args.session_secret {
        Some(secret) => secret,
        None => {
            warn!("SESSION_SECRET not set, using a random per-process signing secret");
            random_session_secret()?
        }
    };

    let auth_config = AuthConfig::new(session_secret)
        .with_session_ttl(Duration::from_secs(args.session_ttl_seconds))
        .with_cookie_secure(args.cookie_secure);
    debug!("Auth config: {:?}", auth_config);

    let auth_state = Arc::new(AuthState::in_memory(auth_config, content));

    auth_state
        .gate()
        .initialize(admin_pass)
        .await
        .context("Failed to hash admin passcode")?;
    info!("Admin passcode hash ready");

    api::new(args.port, auth_state, &args.public_dir).await
}

fn random_session_secret() -> Result<SecretString> {
    let mut bytes = [0u8; 32];
    OsRng
        .try_fill_bytes(&mut bytes)
        .context("failed to generate session secret")?;
    Ok(SecretString::from(Base64UrlUnpadded::encode_string(&bytes)))
}
