// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ModelError {
    #[error("Collection '{0}' is defined more than once")]
    DuplicateCollection(String),

    #[error("Collection '{collection}' defines field '{field}' more than once")]
    DuplicateField { collection: String, field: String },

    #[error("Collection '{collection}' uses the reserved field name '{field}'")]
    ReservedField { collection: String, field: String },

    #[error("Collection '{collection}' refers to unknown field '{field}'")]
    UnknownField { collection: String, field: String },

    #[error("Relation '{relation}' of collection '{collection}' is invalid: {message}")]
    InvalidRelation {
        collection: String,
        relation: String,
        message: String,
    },
}
