// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::{DateTime, Utc};
use collection_model::{
    CREATED_FIELD, CollectionSchema, FieldSpec, FieldType, ID_FIELD, UPDATED_FIELD,
};
use gate_sql::SQLParamContainer;
use serde_json::{Map, Value};
use tokio_postgres::Row;

use crate::{
    cast::{cast_json, default_param, read_column},
    error::CollectionError,
    record::{COLLECTION_ID_FIELD, COLLECTION_NAME_FIELD, Record},
};

/// Column name and bound value pairs, in column order.
pub type ColumnValues = Vec<(String, SQLParamContainer)>;

const ID_LENGTH: usize = 15;

/// A fresh 15-character record id.
pub fn generate_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(ID_LENGTH);
    id
}

/// Values for a new record: a generated id, both timestamps set to `now`, then every schema field
/// taken from the payload or defaulted.
pub fn from_payload(
    schema: &CollectionSchema,
    payload: &Map<String, Value>,
    now: DateTime<Utc>,
) -> Result<ColumnValues, CollectionError> {
    let mut values: ColumnValues = vec![
        (ID_FIELD.to_string(), SQLParamContainer::new(generate_id())),
        (CREATED_FIELD.to_string(), SQLParamContainer::new(now)),
        (UPDATED_FIELD.to_string(), SQLParamContainer::new(now)),
    ];

    for field in &schema.fields {
        let provided = match payload.get(&field.name) {
            Some(value) => provided_value(field, value)?,
            None => None,
        };

        let value = match provided {
            Some(value) => value,
            None if field.required => {
                return Err(CollectionError::Validation(format!(
                    "Field '{}' is required",
                    field.name
                )));
            }
            None => default_param(field, now),
        };

        values.push((field.name.clone(), value));
    }

    Ok(values)
}

/// Values for the schema fields present (with a fitting type) in an update payload.
pub fn partial_from_payload(
    schema: &CollectionSchema,
    payload: &Map<String, Value>,
) -> Result<ColumnValues, CollectionError> {
    let mut changes: ColumnValues = vec![];
    for field in &schema.fields {
        if let Some(value) = payload.get(&field.name)
            && let Some(value) = provided_value(field, value)?
        {
            changes.push((field.name.clone(), value));
        }
    }

    if changes.is_empty() {
        Err(CollectionError::NothingToUpdate)
    } else {
        Ok(changes)
    }
}

/// The bound value for a payload entry, `None` when its JSON type doesn't fit the field. Values
/// below the field's minimum are rejected.
fn provided_value(
    field: &FieldSpec,
    value: &Value,
) -> Result<Option<SQLParamContainer>, CollectionError> {
    if let (Some(min), Some(number)) = (field.min, value.as_f64())
        && (number.trunc() as i64) < min
    {
        return Err(CollectionError::Validation(format!(
            "Field '{}' must be at least {min}",
            field.name
        )));
    }

    Ok(cast_json(field, value))
}

/// Map a row selected with [`CollectionSchema::column_names`] to a record.
pub fn from_row(schema: &CollectionSchema, row: &Row) -> Result<Record, CollectionError> {
    let mut fields = Map::new();

    fields.insert(ID_FIELD.into(), read_column(row, 0, &FieldType::Text)?);
    fields.insert(CREATED_FIELD.into(), read_column(row, 1, &FieldType::DateTime)?);
    fields.insert(UPDATED_FIELD.into(), read_column(row, 2, &FieldType::DateTime)?);
    fields.insert(
        COLLECTION_ID_FIELD.into(),
        Value::String(schema.name.clone()),
    );
    fields.insert(
        COLLECTION_NAME_FIELD.into(),
        Value::String(schema.name.clone()),
    );

    for (idx, field) in schema.fields.iter().enumerate() {
        fields.insert(field.name.clone(), read_column(row, idx + 3, &field.typ)?);
    }

    Ok(Record::new(fields))
}
