// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, SecondsFormat, Utc};
use collection_model::{FieldDefault, FieldSpec, FieldType};
use gate_sql::{Column, SQLParamContainer};
use serde_json::Value;
use thiserror::Error;
use tokio_postgres::Row;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CastError {
    #[error("expected {expected}, got '{value}'")]
    Literal {
        expected: &'static str,
        value: String,
    },

    #[error("fields of this type cannot be compared")]
    Unsupported,
}

/// Bind a filter literal as a value of `field_type`.
///
/// An empty literal for a nullable field compares against `NULL`, matching how unset relations
/// are reported.
pub fn cast_literal(
    field_type: &FieldType,
    nullable: bool,
    literal: &str,
) -> Result<Column, CastError> {
    let invalid = |expected| CastError::Literal {
        expected,
        value: literal.to_string(),
    };

    if nullable && literal.is_empty() {
        return Ok(Column::Null);
    }

    match field_type {
        FieldType::Text | FieldType::Relation(_) => Ok(Column::param(literal.to_string())),
        FieldType::Int => literal
            .parse::<i64>()
            .map(Column::param)
            .map_err(|_| invalid("an integer")),
        FieldType::Float => literal
            .parse::<f64>()
            .map(Column::param)
            .map_err(|_| invalid("a number")),
        FieldType::Bool => match literal {
            "true" => Ok(Column::param(true)),
            "false" => Ok(Column::param(false)),
            _ => Err(invalid("true or false")),
        },
        FieldType::DateTime => parse_datetime(literal)
            .map(Column::param)
            .ok_or_else(|| invalid("an RFC3339 date-time")),
        FieldType::Json => Err(CastError::Unsupported),
    }
}

/// Bind a JSON payload value for `field`, or `None` when the value's JSON type doesn't fit the
/// field (such values are treated as absent).
pub fn cast_json(field: &FieldSpec, value: &Value) -> Option<SQLParamContainer> {
    match (&field.typ, value) {
        (FieldType::Text, Value::String(s)) => Some(SQLParamContainer::new(s.clone())),
        (FieldType::Int, Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(SQLParamContainer::new),
        (FieldType::Float, Value::Number(n)) => n.as_f64().map(SQLParamContainer::new),
        (FieldType::Bool, Value::Bool(b)) => Some(SQLParamContainer::new(*b)),
        (FieldType::DateTime, Value::String(s)) if s.is_empty() => field
            .nullable
            .then(|| SQLParamContainer::new(Option::<DateTime<Utc>>::None)),
        (FieldType::DateTime, Value::String(s)) => {
            parse_datetime(s).map(SQLParamContainer::new)
        }
        (FieldType::Json, Value::Null) => None,
        (FieldType::Json, value) => Some(SQLParamContainer::new(value.clone())),
        (FieldType::Relation(_), Value::String(s)) if s.is_empty() => field
            .nullable
            .then(|| SQLParamContainer::new(Option::<String>::None)),
        (FieldType::Relation(_), Value::String(s)) => Some(SQLParamContainer::new(s.clone())),
        _ => None,
    }
}

/// Value stored for `field` when a create payload doesn't supply one.
pub fn default_param(field: &FieldSpec, now: DateTime<Utc>) -> SQLParamContainer {
    match &field.default {
        FieldDefault::Value(value) => {
            cast_json(field, value).unwrap_or_else(|| zero_param(field, now))
        }
        FieldDefault::Zero => zero_param(field, now),
    }
}

fn zero_param(field: &FieldSpec, now: DateTime<Utc>) -> SQLParamContainer {
    if field.nullable {
        return match field.typ {
            FieldType::Text | FieldType::Relation(_) => SQLParamContainer::new(Option::<String>::None),
            FieldType::Int => SQLParamContainer::new(Option::<i64>::None),
            FieldType::Float => SQLParamContainer::new(Option::<f64>::None),
            FieldType::Bool => SQLParamContainer::new(Option::<bool>::None),
            FieldType::DateTime => SQLParamContainer::new(Option::<DateTime<Utc>>::None),
            FieldType::Json => SQLParamContainer::new(Option::<Value>::None),
        };
    }

    match field.typ {
        FieldType::Text | FieldType::Relation(_) => SQLParamContainer::new(String::new()),
        FieldType::Int => SQLParamContainer::new(0i64),
        FieldType::Float => SQLParamContainer::new(0f64),
        FieldType::Bool => SQLParamContainer::new(false),
        FieldType::DateTime => SQLParamContainer::new(now),
        FieldType::Json => SQLParamContainer::new(Value::Null),
    }
}

/// Read column `idx` of `row` as the JSON value reported to clients.
pub fn read_column(row: &Row, idx: usize, field_type: &FieldType) -> Result<Value, tokio_postgres::Error> {
    Ok(match field_type {
        FieldType::Text | FieldType::Relation(_) => {
            Value::String(row.try_get::<_, Option<String>>(idx)?.unwrap_or_default())
        }
        FieldType::Int => row.try_get::<_, Option<i64>>(idx)?.map_or(Value::Null, Value::from),
        FieldType::Float => row
            .try_get::<_, Option<f64>>(idx)?
            .and_then(serde_json::Number::from_f64)
            .map_or(Value::Null, Value::Number),
        FieldType::Bool => row.try_get::<_, Option<bool>>(idx)?.map_or(Value::Null, Value::Bool),
        FieldType::DateTime => Value::String(
            row.try_get::<_, Option<DateTime<Utc>>>(idx)?
                .map(format_datetime)
                .unwrap_or_default(),
        ),
        FieldType::Json => row.try_get::<_, Option<Value>>(idx)?.unwrap_or(Value::Null),
    })
}

pub fn format_datetime(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use serde_json::json;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    #[test]
    fn literal_casts() {
        assert_eq!(
            cast_literal(&FieldType::Text, false, "Shoes"),
            Ok(Column::param("Shoes".to_string()))
        );
        assert_eq!(cast_literal(&FieldType::Int, false, "42"), Ok(Column::param(42i64)));
        assert_eq!(cast_literal(&FieldType::Float, false, "4.5"), Ok(Column::param(4.5f64)));
        assert_eq!(cast_literal(&FieldType::Bool, false, "true"), Ok(Column::param(true)));
        assert_eq!(
            cast_literal(&FieldType::DateTime, false, "2024-05-01T10:00:00Z"),
            Ok(Column::param(now()))
        );
    }

    #[test]
    fn empty_literal_for_nullable_field_is_null() {
        let relation = FieldType::Relation("subcategories".into());

        assert_eq!(cast_literal(&relation, true, ""), Ok(Column::Null));
        assert_eq!(
            cast_literal(&relation, false, ""),
            Ok(Column::param(String::new()))
        );
    }

    #[test]
    fn invalid_literals() {
        assert_eq!(
            cast_literal(&FieldType::Int, false, "many"),
            Err(CastError::Literal {
                expected: "an integer",
                value: "many".into()
            })
        );
        assert!(cast_literal(&FieldType::Bool, false, "yes").is_err());
        assert!(cast_literal(&FieldType::DateTime, false, "yesterday").is_err());
        assert_eq!(
            cast_literal(&FieldType::Json, false, "[]"),
            Err(CastError::Unsupported)
        );
    }

    #[test]
    fn json_casts() {
        assert_eq!(
            cast_json(&FieldSpec::int("inventory"), &json!(7.9)),
            Some(SQLParamContainer::new(7i64))
        );
        assert_eq!(
            cast_json(&FieldSpec::float("rating"), &json!(4)),
            Some(SQLParamContainer::new(4f64))
        );
        assert_eq!(
            cast_json(&FieldSpec::json("images"), &json!(["a.png"])),
            Some(SQLParamContainer::new(json!(["a.png"])))
        );
        assert_eq!(
            cast_json(&FieldSpec::datetime("plan_ends_at"), &json!("2024-05-01T12:00:00+02:00")),
            Some(SQLParamContainer::new(now()))
        );
    }

    #[test]
    fn mismatched_json_types_are_absent() {
        assert_eq!(cast_json(&FieldSpec::text("name"), &json!(5)), None);
        assert_eq!(cast_json(&FieldSpec::int("inventory"), &json!("5")), None);
        assert_eq!(cast_json(&FieldSpec::bool("active"), &json!(1)), None);
        assert_eq!(cast_json(&FieldSpec::json("items"), &Value::Null), None);
        assert_eq!(cast_json(&FieldSpec::datetime("at"), &json!("soon")), None);
    }

    #[test]
    fn empty_strings_for_nullable_fields() {
        assert_eq!(
            cast_json(&FieldSpec::relation("subcategory", "subcategories"), &json!("")),
            Some(SQLParamContainer::new(Option::<String>::None))
        );
        assert_eq!(
            cast_json(&FieldSpec::relation("store", "stores").required(), &json!("")),
            None
        );
        assert_eq!(
            cast_json(&FieldSpec::datetime("plan_ends_at").nullable(), &json!("")),
            Some(SQLParamContainer::new(Option::<DateTime<Utc>>::None))
        );
        assert_eq!(cast_json(&FieldSpec::datetime("at"), &json!("")), None);
    }

    #[test]
    fn defaults() {
        assert_eq!(
            default_param(&FieldSpec::bool("active").with_default(json!(true)), now()),
            SQLParamContainer::new(true)
        );
        assert_eq!(
            default_param(&FieldSpec::text("description"), now()),
            SQLParamContainer::new(String::new())
        );
        assert_eq!(
            default_param(&FieldSpec::int("inventory"), now()),
            SQLParamContainer::new(0i64)
        );
        assert_eq!(
            default_param(&FieldSpec::datetime("seen_at"), now()),
            SQLParamContainer::new(now())
        );
        assert_eq!(
            default_param(&FieldSpec::relation("user", "users"), now()),
            SQLParamContainer::new(Option::<String>::None)
        );
    }

    #[test]
    fn datetime_format() {
        assert_eq!(format_datetime(now()), "2024-05-01T10:00:00.000Z");
    }
}
