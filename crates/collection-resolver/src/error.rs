// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gate_sql::database_error::DatabaseError;
use http::StatusCode;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum CollectionError {
    #[error("Collection '{0}' not found")]
    CollectionNotFound(String),

    #[error("Record not found")]
    RecordNotFound,

    #[error("{0}")]
    Validation(String),

    #[error("No valid fields to update")]
    NothingToUpdate,

    #[error("{0}")]
    MalformedRequest(String),

    #[error("{0}")]
    Storage(#[from] DatabaseError),
}

impl From<tokio_postgres::Error> for CollectionError {
    fn from(e: tokio_postgres::Error) -> Self {
        CollectionError::Storage(DatabaseError::Delegate(e))
    }
}

impl CollectionError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            CollectionError::CollectionNotFound(_) | CollectionError::RecordNotFound => {
                StatusCode::NOT_FOUND
            }
            CollectionError::Validation(_)
            | CollectionError::NothingToUpdate
            | CollectionError::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            CollectionError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn user_error_message(&self) -> String {
        match self {
            // Do not reveal the underlying database error as it may expose sensitive details (such as column names or data involved in constraint violation).
            CollectionError::Storage(e) => {
                error!("Storage operation failed: {:?}", e);
                "Operation failed".to_string()
            }
            _ => self.to_string(),
        }
    }
}
