use thiserror::Error;

/// Errors raised while validating a repository configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Provider display name cannot be empty")]
    MissingProviderName,

    #[error("DAV root must be a server-side path, not a URL: '{value}'")]
    DavRootIsUrl { value: String },
}

/// Errors surfaced by `CloudClient` implementations (WebDAV transport,
/// share endpoint, OAuth2 session)
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Client is not configured: issuer or client registration missing")]
    NotConfigured,

    #[error("No usable session: {details}")]
    Unauthorized { details: String },

    #[error("Connection failed: {details}")]
    ConnectionFailed { details: String },

    #[error("Server error {status}: {message}")]
    ServerError { status: u16, message: String },

    #[error("Remote path not found: {path}")]
    NotFound { path: String },

    #[error("Protocol error: {details}")]
    Protocol { details: String },
}

/// Convenience methods for creating common client errors
impl ClientError {
    pub fn unauthorized<S: Into<String>>(details: S) -> Self {
        Self::Unauthorized { details: details.into() }
    }

    pub fn connection_failed<S: Into<String>>(details: S) -> Self {
        Self::ConnectionFailed { details: details.into() }
    }

    pub fn server_error<S: Into<String>>(status: u16, message: S) -> Self {
        Self::ServerError {
            status,
            message: message.into(),
        }
    }

    pub fn not_found<S: Into<String>>(path: S) -> Self {
        Self::NotFound { path: path.into() }
    }

    pub fn protocol<S: Into<String>>(details: S) -> Self {
        Self::Protocol { details: details.into() }
    }
}

/// Errors returned by repository operations that are allowed to fail
///
/// Directory listings are not among them: a failed listing degrades to an
/// empty one instead of surfacing here.
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("Cannot create a share link for an empty path")]
    EmptyPath,

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Failed to write fetched file: {0}")]
    Io(#[from] std::io::Error),
}
