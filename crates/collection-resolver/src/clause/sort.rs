// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use collection_model::CollectionSchema;
use gate_sql::{OrderBy, OrderByElement, Ordering};

use crate::error::CollectionError;

/// Build the ORDER BY clause for a sort such as `-created,name`.
///
/// A leading `-` sorts descending, `+` or no prefix ascending. Empty tokens are skipped.
pub fn build_sort(schema: &CollectionSchema, sort: &str) -> Result<OrderBy, CollectionError> {
    sort.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            let (field, ordering) = match token.strip_prefix('-') {
                Some(field) => (field, Ordering::Desc),
                None => (token.strip_prefix('+').unwrap_or(token), Ordering::Asc),
            };

            match schema.column_type(field) {
                Some(_) => Ok(OrderByElement::new(field, ordering)),
                None => Err(CollectionError::Validation(format!(
                    "Invalid sort field '{field}'"
                ))),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(OrderBy)
}
