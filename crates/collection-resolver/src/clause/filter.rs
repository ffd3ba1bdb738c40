// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use collection_model::{CollectionSchema, FieldType};
use gate_sql::{Column, Predicate};

use crate::{cast::cast_literal, error::CollectionError};

const CLAUSE_SEPARATOR: &str = "&&";
const OR_OPERATOR: &str = "||";
const GROUPING: [char; 2] = ['(', ')'];
const QUOTES: [char; 2] = ['"', '\''];

/// Build the WHERE predicate for a filter such as `name = "Shoes" && store = 's1'`.
///
/// Only conjunctions of equality clauses are supported: `||` and parenthesized grouping are
/// rejected. Pieces without `=` or with an empty field name are skipped; unknown fields and
/// literals that don't fit the field's type are rejected.
/// When the collection has an activeness field that no clause mentions, only active records
/// match.
pub fn build_filter(schema: &CollectionSchema, filter: &str) -> Result<Predicate, CollectionError> {
    let mut referenced = vec![];
    let mut predicates = vec![];

    for (field, literal) in parse_clauses(filter)? {
        let field_type = schema
            .column_type(field)
            .ok_or_else(|| CollectionError::Validation(format!("Invalid filter field '{field}'")))?;

        if *field_type == FieldType::Json {
            return Err(CollectionError::Validation(format!(
                "Field '{field}' cannot be filtered"
            )));
        }

        let nullable = schema.field(field).is_some_and(|f| f.nullable);
        let value = cast_literal(field_type, nullable, literal).map_err(|e| {
            CollectionError::Validation(format!("Invalid value for field '{field}': {e}"))
        })?;

        referenced.push(field);
        predicates.push(Predicate::eq(Column::physical(field), value));
    }

    Ok(Predicate::and(
        Predicate::and_all(predicates),
        activeness_predicate(schema, &referenced),
    ))
}

/// `<activeness field> = TRUE` unless the collection has no activeness field or `referenced`
/// already names it.
pub fn activeness_predicate(schema: &CollectionSchema, referenced: &[&str]) -> Predicate {
    match &schema.activeness_field {
        Some(field) if !referenced.contains(&field.as_str()) => {
            Predicate::eq(Column::physical(field), Column::param(true))
        }
        _ => Predicate::True,
    }
}

fn parse_clauses(filter: &str) -> Result<Vec<(&str, &str)>, CollectionError> {
    let unsupported = |operator: &str| {
        CollectionError::Validation(format!("Unsupported filter operator '{operator}'"))
    };

    let mut clauses = vec![];
    for piece in filter.split(CLAUSE_SEPARATOR) {
        if piece.contains(OR_OPERATOR) {
            return Err(unsupported(OR_OPERATOR));
        }

        let Some((field, literal)) = piece.trim().split_once('=') else {
            continue;
        };
        let field = field.trim();
        if let Some(paren) = field.chars().find(|c| GROUPING.contains(c)) {
            return Err(unsupported(&paren.to_string()));
        }
        if field.is_empty() {
            continue;
        }

        clauses.push((field, literal.trim().trim_matches(QUOTES)));
    }

    Ok(clauses)
}
