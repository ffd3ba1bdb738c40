// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use collection_resolver::CollectionError;
use serde_json::{Map, Value, json};
use thiserror::Error;

/// A [`CollectionError`] rendered as `{"error": "<message>"}` with the matching status.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] CollectionError);

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        // Actix uses http-0.2, while the resolver reports http-1.x status codes
        StatusCode::from_u16(self.0.status_code().as_u16())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.0.user_error_message()
        }))
    }
}

/// Parse a request body that must be a JSON object.
pub(crate) fn parse_object(body: &[u8]) -> Result<Map<String, Value>, CollectionError> {
    match serde_json::from_slice(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(CollectionError::MalformedRequest(
            "Invalid JSON data".to_string(),
        )),
    }
}
