// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JSON extractor whose rejections render as catalog errors.
//!
//! `axum::Json` rejects with a plain-text body; this wrapper maps every
//! [`JsonRejection`] onto [`ApiError`] so clients always get
//! `{success, error, message}`.

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Json as AxumJson, Request};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct Json<T>(pub T);

impl<T, S> FromRequest<S> for Json<T>
where
    T: DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let AxumJson(value) = <AxumJson<T> as FromRequest<S>>::from_request(req, state).await?;
        Ok(Self(value))
    }
}

impl<T> IntoResponse for Json<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        AxumJson(self.0).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Request body rejected");
        match rejection {
            // Well-formed JSON of the wrong shape
            JsonRejection::JsonDataError(_) => ApiError::Unprocessable,
            JsonRejection::JsonSyntaxError(_) => {
                ApiError::BadRequest("Request body is not valid JSON".to_string())
            }
            JsonRejection::MissingJsonContentType(_) => {
                ApiError::BadRequest("Content-Type must be application/json".to_string())
            }
            _ => ApiError::BadRequest("Request body could not be read".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CreateDrinkRequest;
    use axum::body::Body;
    use axum::http::{header, StatusCode};

    async fn extract(content_type: Option<&str>, body: &str) -> Result<CreateDrinkRequest, ApiError> {
        let mut builder = Request::builder().method("POST").uri("/drinks");
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body.to_string())).unwrap();
        Json::<CreateDrinkRequest>::from_request(request, &())
            .await
            .map(|Json(value)| value)
    }

    #[tokio::test]
    async fn missing_field_is_unprocessable() {
        let result = extract(Some("application/json"), r#"{"title": "x"}"#).await;
        let err = result.unwrap_err();
        assert_eq!(err, ApiError::Unprocessable);
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn broken_json_is_bad_request() {
        let result = extract(Some("application/json"), r#"{"title": "#).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn wrong_content_type_is_bad_request() {
        let result = extract(Some("text/plain"), r#"{"title": "x", "recipe": []}"#).await;
        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn valid_body_extracts() {
        let body = r#"{"title": "Water", "recipe": {"name": "water", "color": "blue", "parts": 1}}"#;
        let request = extract(Some("application/json"), body).await.unwrap();
        assert_eq!(request.title, "Water");
    }
}
