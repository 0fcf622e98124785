//! Error types shared by the session activity components

/// Standard result type for core operations
pub type CoreResult<T> = std::result::Result<T, CoreError>;

/// Failures raised by the collaborators the idle-timeout logic talks to.
///
/// None of these ever leave a session half-authenticated: callers log them
/// and continue towards the sign-in page.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize, thiserror::Error)]
pub enum CoreError {
    #[error("Activity storage unavailable: {message}")]
    Storage { message: String },

    #[error("Sign-out failed: {message}")]
    SignOut { message: String },

    #[error("Navigation failed: {message}")]
    Navigation { message: String },
}

impl CoreError {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Create a sign-out error
    pub fn sign_out(message: impl Into<String>) -> Self {
        Self::SignOut {
            message: message.into(),
        }
    }

    /// Create a navigation error
    pub fn navigation(message: impl Into<String>) -> Self {
        Self::Navigation {
            message: message.into(),
        }
    }
}
