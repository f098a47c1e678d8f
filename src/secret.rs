//! Admin passcode discovery.
//!
//! Sources are checked in order: the passcode itself (`ADMIN_PASS`), a file
//! named by `ADMIN_PASS_FILE`, then the well-known secret mounts. Values are
//! trimmed. An `ADMIN_PASS_FILE` that reads but is blank ends the search with
//! an error; only an unreadable one falls through. Among the well-known mounts
//! the first non-empty value wins.

use anyhow::{Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use std::{
    fmt, fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Secret mounts probed when neither `ADMIN_PASS` nor `ADMIN_PASS_FILE` yields a value.
pub const WELL_KNOWN_PATHS: [&str; 4] = [
    "/run/secrets/admin_pass",
    "/run/secrets/ADMIN_PASS",
    "/etc/kaja/admin_pass",
    "/etc/kaja/ADMIN_PASS",
];

const NOT_FOUND_MESSAGE: &str = "Admin password not found. Set ADMIN_PASS environment variable or place secret in a file (e.g. /run/secrets/admin_pass).";

/// Where the admin passcode was found.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SecretSource {
    Env,
    File(PathBuf),
    WellKnown(PathBuf),
}

impl fmt::Display for SecretSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Env => write!(f, "ADMIN_PASS"),
            Self::File(path) => write!(f, "ADMIN_PASS_FILE ({})", path.display()),
            Self::WellKnown(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Clone)]
pub struct SecretLoader {
    direct: Option<SecretString>,
    file: Option<PathBuf>,
    well_known: Vec<PathBuf>,
}

impl SecretLoader {
    #[must_use]
    pub fn new(direct: Option<SecretString>, file: Option<PathBuf>) -> Self {
        Self {
            direct,
            file,
            well_known: WELL_KNOWN_PATHS.iter().map(PathBuf::from).collect(),
        }
    }

    #[must_use]
    pub fn with_well_known(mut self, paths: Vec<PathBuf>) -> Self {
        self.well_known = paths;
        self
    }

    /// Resolve the admin passcode.
    ///
    /// # Errors
    /// Returns an error when no source yields a non-empty value. Callers treat
    /// this as fatal and must not start serving.
    pub fn load(&self) -> Result<(SecretString, SecretSource)> {
        if let Some(direct) = &self.direct {
            let trimmed = direct.expose_secret().trim();
            if !trimmed.is_empty() {
                return Ok((SecretString::from(trimmed), SecretSource::Env));
            }
        }

        if let Some(path) = &self.file
            && let Some(secret) = read_secret_file(path)
        {
            if secret.expose_secret().is_empty() {
                debug!("Secret file {} is empty", path.display());
                return Err(anyhow!(NOT_FOUND_MESSAGE));
            }
            return Ok((secret, SecretSource::File(path.clone())));
        }

        for path in &self.well_known {
            if let Some(secret) = read_secret_file(path)
                && !secret.expose_secret().is_empty()
            {
                return Ok((secret, SecretSource::WellKnown(path.clone())));
            }
        }

        Err(anyhow!(NOT_FOUND_MESSAGE))
    }
}

impl fmt::Debug for SecretLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretLoader")
            .field("direct", &self.direct.as_ref().map(|_| "***"))
            .field("file", &self.file)
            .field("well_known", &self.well_known)
            .finish()
    }
}

/// Read and trim a secret file. `None` means unreadable; a blank file reads as `Some("")`.
fn read_secret_file(path: &Path) -> Option<SecretString> {
    match fs::read_to_string(path) {
        Ok(contents) => Some(SecretString::from(contents.trim())),
        Err(err) => {
            debug!("Secret file {} not readable: {err}", path.display());
            None
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn secret_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn direct_value_wins_and_is_trimmed() {
        let file = secret_file("from-file");
        let loader = SecretLoader::new(
            Some(SecretString::from("  letmein123\n")),
            Some(file.path().to_path_buf()),
        )
        .with_well_known(Vec::new());

        let (secret, source) = loader.load().unwrap();
        assert_eq!(secret.expose_secret(), "letmein123");
        assert_eq!(source, SecretSource::Env);
    }

    #[test]
    fn blank_direct_value_falls_through_to_file() {
        let file = secret_file("  from-file \n");
        let loader = SecretLoader::new(
            Some(SecretString::from("   ")),
            Some(file.path().to_path_buf()),
        )
        .with_well_known(Vec::new());

        let (secret, source) = loader.load().unwrap();
        assert_eq!(secret.expose_secret(), "from-file");
        assert_eq!(source, SecretSource::File(file.path().to_path_buf()));
    }

    #[test]
    fn first_non_empty_well_known_path_wins() {
        let empty = secret_file("\n");
        let second = secret_file("mounted");
        let third = secret_file("ignored");
        let loader = SecretLoader::new(None, Some(PathBuf::from("/nonexistent/admin_pass")))
            .with_well_known(vec![
                PathBuf::from("/nonexistent/first"),
                empty.path().to_path_buf(),
                second.path().to_path_buf(),
                third.path().to_path_buf(),
            ]);

        let (secret, source) = loader.load().unwrap();
        assert_eq!(secret.expose_secret(), "mounted");
        assert_eq!(source, SecretSource::WellKnown(second.path().to_path_buf()));
    }

    #[test]
    fn blank_admin_pass_file_is_an_error() {
        let blank = secret_file("   \n");
        let mounted = secret_file("mounted");
        let loader = SecretLoader::new(None, Some(blank.path().to_path_buf()))
            .with_well_known(vec![mounted.path().to_path_buf()]);

        let err = loader.load().unwrap_err();
        assert!(err.to_string().contains("Admin password not found"));
    }

    #[test]
    fn unreadable_admin_pass_file_falls_through() {
        let mounted = secret_file("mounted");
        let loader = SecretLoader::new(None, Some(PathBuf::from("/nonexistent/admin_pass")))
            .with_well_known(vec![mounted.path().to_path_buf()]);

        let (secret, source) = loader.load().unwrap();
        assert_eq!(secret.expose_secret(), "mounted");
        assert_eq!(source, SecretSource::WellKnown(mounted.path().to_path_buf()));
    }

    #[test]
    fn nothing_found_is_an_error() {
        let loader = SecretLoader::new(None, None)
            .with_well_known(vec![PathBuf::from("/nonexistent/admin_pass")]);
        let err = loader.load().unwrap_err();
        assert!(err.to_string().contains("Admin password not found"));
    }

    #[test]
    fn debug_redacts_direct_value() {
        let loader = SecretLoader::new(Some(SecretString::from("letmein123")), None);
        let debug = format!("{loader:?}");
        assert!(!debug.contains("letmein123"));
        assert!(debug.contains("***"));
    }

    #[test]
    fn default_well_known_paths_are_probed_in_order() {
        let loader = SecretLoader::new(None, None);
        let expected: Vec<PathBuf> = WELL_KNOWN_PATHS.iter().map(PathBuf::from).collect();
        assert_eq!(loader.well_known, expected);
    }
}
