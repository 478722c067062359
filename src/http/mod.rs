//! HTTP endpoint handlers

pub mod clients;
pub mod delivery;
pub mod docs;

use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{FormRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

pub const INVALID_FORM_MSG: &str = "Dados do formulário inválidos.";
pub const INVALID_QUERY_MSG: &str = "Parâmetros da requisição inválidos.";

/// Body of every error response
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// An error already mapped to the status and message the client will see
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "rejected form body");
        Self::bad_request(INVALID_FORM_MSG)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::warn!(error = %rejection.body_text(), "rejected query string");
        Self::bad_request(INVALID_QUERY_MSG)
    }
}

/// `Form` whose rejection is answered as a 400 [`ApiError`]
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct ValidForm<T>(pub T);

/// `Query` whose rejection is answered as a 400 [`ApiError`]
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ValidQuery<T>(pub T);
