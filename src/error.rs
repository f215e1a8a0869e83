use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum IdealizaError {
    #[error("{0}")]
    NotFound(&'static str),

    #[error("E-mail já cadastrado.")]
    EmailConflict,

    #[error("Nenhum dado enviado para atualizar.")]
    EmptyUpdate,

    #[error("Senha incorreta")]
    WrongPassword,

    #[error("Senha muito longa.")]
    PasswordTooLong,

    /// A multi-statement operation failed and was rolled back.
    #[error("{context}: {source}")]
    Transaction {
        context: &'static str,
        #[source]
        source: SqlxError,
    },

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    HashError(#[from] bcrypt::BcryptError),

    #[error("Blocking task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Coarse failure categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    BadRequest,
    Unauthorized,
    ServerError,
}

impl IdealizaError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdealizaError::NotFound(_) => ErrorKind::NotFound,
            IdealizaError::EmailConflict => ErrorKind::Conflict,
            IdealizaError::EmptyUpdate | IdealizaError::PasswordTooLong => ErrorKind::BadRequest,
            IdealizaError::WrongPassword => ErrorKind::Unauthorized,
            IdealizaError::Transaction { .. }
            | IdealizaError::DatabaseError(_)
            | IdealizaError::HashError(_)
            | IdealizaError::TaskJoin(_) => ErrorKind::ServerError,
        }
    }

    /// Map a failed insert/update to `EmailConflict` when it tripped the UNIQUE(email) index.
    pub(crate) fn from_write(e: SqlxError) -> Self {
        match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => IdealizaError::EmailConflict,
            _ => IdealizaError::DatabaseError(e),
        }
    }
}

impl IntoResponse for IdealizaError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_body) = match &self {
            IdealizaError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: msg.to_string(),
                },
            ),
            IdealizaError::EmailConflict => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "CONFLICT".to_string(),
                    message: self.to_string(),
                },
            ),
            IdealizaError::EmptyUpdate | IdealizaError::PasswordTooLong => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message: self.to_string(),
                },
            ),
            IdealizaError::WrongPassword => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "UNAUTHORIZED".to_string(),
                    message: self.to_string(),
                },
            ),
            IdealizaError::Transaction { .. } => {
                error!(error = %self, "transaction rolled back");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "SERVER_ERROR".to_string(),
                        message: self.to_string(),
                    },
                )
            }
            IdealizaError::DatabaseError(_)
            | IdealizaError::HashError(_)
            | IdealizaError::TaskJoin(_) => {
                error!(error = %self, "unexpected internal failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
        };
        (status, Json(ApiErrorResponse { error: error_body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
