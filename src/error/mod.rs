// repo-fleet: branch-based bulk changes across git repositories
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!          FleetError (<= 24 bytes)
//!                     |
//!        +--------+---+----+------+
//!        |        |        |      |
//!        v        v        v      v
//!      Input  Repository  Cfg    Io
//!       Box      Box      Box    Box
//!
//! Sub-errors (unboxed internally):
//!   Input       InconsistentBranches, MissingCredentials, InvalidRemoteUrl,
//!               InvalidImageReference
//!   Repository  CommandFailed, Gix, BranchNotFound, StashConflict,
//!               DuplicatePullRequest, TagNotFound, Api, Http
//!   Config      InvalidValue
//! ```
//!
//! "Not found" conditions (no descriptor, no pull request, no tag) are not
//! errors: they travel as `Option` so call sites can filter them.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`FleetError`].
pub type FleetResult<T> = std::result::Result<T, FleetError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum small on the stack.
#[derive(Debug, Error)]
pub enum FleetError {
    /// Malformed or inconsistent user input. Never retried.
    #[error("input error: {0}")]
    Input(#[from] Box<InputError>),

    /// Local git or remote API operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] Box<RepositoryError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

impl FleetError {
    /// Returns the repository error, if this is one.
    #[must_use]
    pub fn as_repository(&self) -> Option<&RepositoryError> {
        match self {
            Self::Repository(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the input error, if this is one.
    #[must_use]
    pub fn as_input(&self) -> Option<&InputError> {
        match self {
            Self::Input(err) => Some(err),
            _ => None,
        }
    }
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for FleetError {
                fn from(err: $error) -> Self {
                    FleetError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    InputError => Input,
    RepositoryError => Repository,
    ConfigError => Config,
    std::io::Error => Io,
}

// --- Input Errors ---

/// Problems with user-supplied input: descriptors, repository lists,
/// unit groupings, credentials.
#[derive(Debug, Error)]
pub enum InputError {
    /// Units of one repository declare different home branches.
    #[error("units of {url} declare inconsistent home branches: {}", branches.join(", "))]
    InconsistentBranches { url: String, branches: Vec<String> },

    /// Credentials are absent or empty.
    #[error("credentials must provide a non-empty identity and secret")]
    MissingCredentials,

    /// Credentials file could not be read or parsed.
    #[error("invalid credentials file '{path}': {message}")]
    InvalidCredentials { path: String, message: String },

    /// Remote URL cannot be mapped to a hosted repository.
    #[error("invalid remote repository url: {0}")]
    InvalidRemoteUrl(String),

    /// An existing clone points at a different remote.
    #[error("clone remote mismatch: expected {expected}, found {actual}")]
    RemoteMismatch { expected: String, actual: String },

    /// A descriptor file exists but cannot be interpreted.
    #[error("malformed descriptor '{path}': {message}")]
    MalformedDescriptor { path: String, message: String },

    /// A repository list file cannot be interpreted.
    #[error("malformed repository list '{path}': {message}")]
    MalformedRepositoryList { path: String, message: String },

    /// Container image reference that cannot be parsed.
    #[error("invalid image reference '{reference}': {message}")]
    InvalidImageReference { reference: String, message: String },

    /// File extension not supported for the requested format.
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// gix has multiple error types that are converted through this enum.
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to discover repository from path.
    #[error("failed to discover repository: {0}")]
    Discover(#[from] Box<gix::discover::Error>),

    /// Failed to get HEAD reference.
    #[error("failed to get head reference: {0}")]
    Head(#[from] gix::reference::find::existing::Error),
}

// --- Repository Errors ---

/// Local git and remote API failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Repository not found at the specified path.
    #[error("repository not found: {path}")]
    RepoNotFound { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Branch exists neither locally nor on any remote.
    #[error("branch not found: {branch}")]
    BranchNotFound { branch: String },

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },

    /// Checkout operation failed.
    #[error("failed to checkout {what}: {message}")]
    CheckoutFailed { what: String, message: String },

    /// Restoring stashed changes conflicted and the policy refuses to resolve.
    #[error("stashed changes conflict on {branch}: {}", paths.join(", "))]
    StashConflict { branch: String, paths: Vec<String> },

    /// Restoring stashed changes failed for a reason other than a conflict.
    #[error("failed to restore stashed changes on {branch}: {message}")]
    StashRestoreFailed { branch: String, message: String },

    /// More than one open pull request shares a head branch.
    #[error("{count} open pull requests found for branch {branch}")]
    DuplicatePullRequest { branch: String, count: usize },

    /// Tag does not exist.
    #[error("tag not found: {tag}")]
    TagNotFound { tag: String },

    /// File does not exist at the given tag.
    #[error("file {path} not found at tag {tag}")]
    FileNotFound { path: String, tag: String },

    /// Remote API answered with an error status.
    #[error("api error {status}: {url} - {message}")]
    Api {
        status: u16,
        url: String,
        message: String,
    },

    /// Error from reqwest library.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Invalid configuration value.
    #[error("invalid value for '{key}' in section '[{section}]': {message}")]
    InvalidValue {
        section: String,
        key: String,
        message: String,
    },
}
