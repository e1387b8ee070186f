use async_graphql::ErrorExtensions;
use thiserror::Error;

/// Errors raised by resolvers and the store.
///
/// The user-facing variants keep short plain-text messages; every variant
/// also maps to a machine-readable `code` in the GraphQL error extensions.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Already in db")]
    AlreadyRegistered,

    // Distinct from InvalidPassword, so callers can tell whether an email is registered.
    #[error("Not user with that email")]
    UnknownEmail,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid id: {0}")]
    InvalidId(String),

    #[error("Database error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(#[from] argon2::Error),

    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("Token lifetime out of range")]
    TokenLifetime,

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Document encoding error: {0}")]
    Encoding(#[from] mongodb::bson::ser::Error),

    #[error("Blocking task failed")]
    Blocking,
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::AlreadyRegistered => "ALREADY_EXISTS",
            ApiError::UnknownEmail | ApiError::InvalidPassword => "INVALID_CREDENTIALS",
            ApiError::InvalidId(_) => "BAD_USER_INPUT",
            _ => "INTERNAL",
        }
    }

    fn is_internal(&self) -> bool {
        self.code() == "INTERNAL"
    }
}

impl From<actix_web::error::BlockingError> for ApiError {
    fn from(_: actix_web::error::BlockingError) -> Self {
        ApiError::Blocking
    }
}

impl ErrorExtensions for ApiError {
    fn extend(&self) -> async_graphql::Error {
        let message = if self.is_internal() {
            log::error!("{}", self);
            "Internal server error".to_string()
        } else {
            self.to_string()
        };
        let code = self.code();
        async_graphql::Error::new(message).extend_with(|_, e| e.set("code", code))
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
