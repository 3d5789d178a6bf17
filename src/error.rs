// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Catalog errors.
//!
//! Rendered as `{success: false, error: <status>, message}`. Authorization
//! failures never pass through here; they are [`AuthError`](crate::auth::AuthError)s.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Not found")]
    NotFound,
    /// Another drink already uses the title
    #[error("A drink titled {0:?} already exists")]
    DuplicateTitle(String),
    #[error("unprocessable")]
    Unprocessable,
    #[error("{0}")]
    BadRequest(String),
    #[error("Method Not Allowed")]
    MethodNotAllowed,
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: u16,
    message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::DuplicateTitle(_) => StatusCode::CONFLICT,
            ApiError::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(ErrorBody {
            success: false,
            error: status.as_u16(),
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}
