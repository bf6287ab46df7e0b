//! Error-to-response mapping for the HTTP surface.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use services::{
    AccountServiceError, ChallengeServiceError, ProgressServiceError, VocalServiceError,
};

/// Wraps service failures for conversion into JSON error payloads.
///
/// Account routes report failures under a `message` key, all other routes
/// under `error`; both carry `success: false`. Not-found and bad-password
/// both map to 400: the distinction lives only in the message, which is the
/// contract the mobile client was built against (a known information-leak
/// smell, kept deliberately; see DESIGN.md).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Account(#[from] AccountServiceError),

    #[error(transparent)]
    Progress(#[from] ProgressServiceError),

    #[error(transparent)]
    Vocal(#[from] VocalServiceError),

    #[error(transparent)]
    Challenge(#[from] ChallengeServiceError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Account(err) => match err {
                AccountServiceError::MissingField { .. }
                | AccountServiceError::DuplicateEmail
                | AccountServiceError::NotFound
                | AccountServiceError::InvalidCredentials => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Progress(err) => match err {
                ProgressServiceError::MissingField { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Vocal(err) => match err {
                VocalServiceError::MissingField { .. }
                | VocalServiceError::InvalidStatus { .. } => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::Challenge(err) => match err {
                ChallengeServiceError::MissingField { .. }
                | ChallengeServiceError::InvalidStatus { .. } => StatusCode::BAD_REQUEST,
                ChallengeServiceError::NoChallengesAvailable { .. } => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn field(&self) -> &'static str {
        match self {
            ApiError::Account(_) => "message",
            _ => "error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("request failed: {self}");
        }

        let mut body = serde_json::Map::new();
        body.insert("success".to_string(), serde_json::Value::Bool(false));
        body.insert(
            self.field().to_string(),
            serde_json::Value::String(self.to_string()),
        );

        (status, Json(serde_json::Value::Object(body))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn account_failures_use_the_message_key() {
        let response =
            ApiError::Account(AccountServiceError::InvalidCredentials).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], serde_json::Value::Bool(false));
        assert_eq!(body["message"], "incorrect password");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn other_failures_use_the_error_key() {
        let response = ApiError::Progress(ProgressServiceError::MissingField {
            field: "exerciseType",
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["error"], "exerciseType is required");
        assert!(body.get("message").is_none());
    }

    #[tokio::test]
    async fn exhausted_catalog_maps_to_not_found() {
        let response =
            ApiError::Challenge(ChallengeServiceError::NoChallengesAvailable { level: 4 })
                .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn storage_failures_map_to_internal_errors() {
        let response = ApiError::Vocal(VocalServiceError::Storage(
            storage::repository::StorageError::Connection("db gone".to_string()),
        ))
        .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
