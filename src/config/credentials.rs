// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Hosting-service credentials.
//!
//! ```text
//! credentials.json            environment
//! {"username": ...,           GITHUB_ACTOR
//!  "access_token": ...}       GITHUB_TOKEN
//!           \                  /
//!            v                v
//!         Credentials (validated, Arc-shared)
//! ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;

use crate::error::InputError;

/// Environment variable holding the identity.
pub const IDENTITY_ENV: &str = "GITHUB_ACTOR";

/// Environment variable holding the secret token.
pub const SECRET_ENV: &str = "GITHUB_TOKEN";

/// An identity and secret token, both non-empty.
///
/// Shared read-only by every repository handle and the API client.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    identity: String,
    secret: String,
}

#[derive(Deserialize)]
struct CredentialsFile {
    #[serde(alias = "identity")]
    username: String,
    #[serde(alias = "secret")]
    access_token: String,
}

impl Credentials {
    /// Creates validated credentials.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingCredentials` if either part is empty.
    pub fn new(
        identity: impl Into<String>,
        secret: impl Into<String>,
    ) -> Result<Self, InputError> {
        let identity = identity.into();
        let secret = secret.into();
        if identity.trim().is_empty() || secret.trim().is_empty() {
            return Err(InputError::MissingCredentials);
        }
        Ok(Self { identity, secret })
    }

    /// Loads credentials from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns `InputError::InvalidCredentials` if the file cannot be read or
    /// parsed, and `InputError::MissingCredentials` if a field is empty.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let invalid = |message: String| InputError::InvalidCredentials {
            path: path.display().to_string(),
            message,
        };
        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let file: CredentialsFile =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        Self::new(file.username, file.access_token)
    }

    /// Loads credentials from `GITHUB_ACTOR` and `GITHUB_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns `InputError::MissingCredentials` if either variable is unset or
    /// empty.
    pub fn from_env() -> Result<Self, InputError> {
        let identity = std::env::var(IDENTITY_ENV).unwrap_or_default();
        let secret = std::env::var(SECRET_ENV).unwrap_or_default();
        Self::new(identity, secret)
    }

    /// Loads from `file` when given, otherwise from the environment.
    ///
    /// # Errors
    ///
    /// See [`Credentials::from_file`] and [`Credentials::from_env`].
    pub fn load(file: Option<&Path>) -> Result<Self, InputError> {
        match file {
            Some(path) => Self::from_file(path),
            None => Self::from_env(),
        }
    }

    #[must_use]
    pub fn identity(&self) -> &str {
        &self.identity
    }

    #[must_use]
    pub fn secret(&self) -> &str {
        &self.secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identity", &self.identity)
            .field("secret", &"[hidden]")
            .finish()
    }
}
