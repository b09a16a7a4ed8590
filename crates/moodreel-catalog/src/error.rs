/// Failure reported by the remote catalog. `status_code` is 0 when no HTTP
/// response was received (unreachable host, refused connection, bad body).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("catalog request failed ({status_code}): {message}")]
pub struct RemoteError {
    pub status_code: u16,
    pub message: String,
}

impl RemoteError {
    pub fn new(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            message: message.into(),
        }
    }

    pub fn unreachable(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }

    pub fn is_network(&self) -> bool {
        self.status_code == 0
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Remote(#[from] RemoteError),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl CatalogError {
    pub fn status_code(&self) -> Option<u16> {
        match self {
            CatalogError::Remote(e) => Some(e.status_code),
            CatalogError::InvalidArgument(_) => None,
        }
    }
}

impl From<moodreel_models::UnknownMood> for CatalogError {
    fn from(e: moodreel_models::UnknownMood) -> Self {
        CatalogError::InvalidArgument(e.to_string())
    }
}
