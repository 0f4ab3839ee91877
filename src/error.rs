use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use strum::{AsRefStr, IntoStaticStr};
use thiserror::Error;

/// Why an existing promo code cannot be redeemed right now.
///
/// All variants surface as the same `failed-precondition` kind; only the
/// message differs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RedemptionBlocked {
    #[error("Este código no está activo.")]
    Inactive,
    #[error("Este código ya ha sido utilizado.")]
    AlreadyUsed,
    #[error("Este código ha caducado.")]
    Expired,
    #[error("Este código tiene un plan no válido ({0}).")]
    UnknownPlan(String),
}

/// Wire-level error kind, serialized in the `status` field of error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    Unauthenticated,
    InvalidArgument,
    NotFound,
    FailedPrecondition,
    Internal,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Unauthenticated(String),

    #[error("{0}")]
    InvalidArgument(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    FailedPrecondition(#[from] RedemptionBlocked),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Connection pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Unauthenticated(_) => ErrorKind::Unauthenticated,
            AppError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::FailedPrecondition(_) => ErrorKind::FailedPrecondition,
            AppError::Database(_) | AppError::Pool(_) | AppError::Internal(_) => {
                ErrorKind::Internal
            }
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self.kind() {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::InvalidArgument | ErrorKind::FailedPrecondition => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    status: &'static str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match kind {
            ErrorKind::Internal => {
                // Storage details stay in the logs
                tracing::error!("Internal error: {}", self);
                "Error interno. Inténtalo de nuevo más tarde.".to_string()
            }
            _ => self.to_string(),
        };

        (
            self.status_code(),
            Json(ErrorBody {
                error: ErrorDetail {
                    status: kind.into(),
                    message,
                },
            }),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_strings_match_callable_error_codes() {
        assert_eq!(ErrorKind::Unauthenticated.as_ref(), "unauthenticated");
        assert_eq!(ErrorKind::InvalidArgument.as_ref(), "invalid-argument");
        assert_eq!(ErrorKind::NotFound.as_ref(), "not-found");
        assert_eq!(ErrorKind::FailedPrecondition.as_ref(), "failed-precondition");
    }

    #[test]
    fn test_precondition_failures_share_one_kind() {
        for blocked in [
            RedemptionBlocked::Inactive,
            RedemptionBlocked::AlreadyUsed,
            RedemptionBlocked::Expired,
            RedemptionBlocked::UnknownPlan("x".into()),
        ] {
            let err = AppError::from(blocked);
            assert_eq!(err.kind(), ErrorKind::FailedPrecondition);
            assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        }
    }
}
