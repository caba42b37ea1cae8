//! HTTP API handlers

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use crate::error::Error;

pub mod health;
pub mod people;

pub use health::health_routes;
pub use people::{create_person, delete_person, list_people, update_person};

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::InvalidInput(_) | Error::NothingToUpdate => StatusCode::BAD_REQUEST,
            Error::NotFound => StatusCode::NOT_FOUND,
            Error::AlreadyExists => StatusCode::CONFLICT,
            Error::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Enrichment { .. } => StatusCode::BAD_GATEWAY,
        };

        if status.is_server_error() {
            error!(error = %self, cause = ?std::error::Error::source(&self), "request failed");
        }

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::{SourceError, Stage};

    fn status_of(err: Error) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn taxonomy_maps_to_expected_statuses() {
        assert_eq!(
            status_of(Error::InvalidInput("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_of(Error::NothingToUpdate), StatusCode::BAD_REQUEST);
        assert_eq!(status_of(Error::NotFound), StatusCode::NOT_FOUND);
        assert_eq!(status_of(Error::AlreadyExists), StatusCode::CONFLICT);
        assert_eq!(
            status_of(Error::Database(sqlx::Error::PoolClosed)),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(Error::Enrichment {
                stage: Stage::Gender,
                source: SourceError::Unavailable("status 503".to_string()),
            }),
            StatusCode::BAD_GATEWAY
        );
    }
}
