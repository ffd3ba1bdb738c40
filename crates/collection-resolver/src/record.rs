// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde::Serialize;
use serde_json::{Map, Value};

pub const COLLECTION_ID_FIELD: &str = "collectionId";
pub const COLLECTION_NAME_FIELD: &str = "collectionName";
pub const EXPAND_FIELD: &str = "expand";

/// A record as reported to clients: system fields, then collection fields in schema order, then
/// (only when present) the `expand` map of related records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    #[serde(flatten)]
    fields: Map<String, Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    expand: Map<String, Value>,
}

impl Record {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            fields,
            expand: Map::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn id(&self) -> Option<&str> {
        self.get("id").and_then(Value::as_str)
    }

    pub fn expand(&self) -> &Map<String, Value> {
        &self.expand
    }

    pub fn set_expansion(&mut self, relation: &str, value: Value) {
        self.expand.insert(relation.to_string(), value);
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        let mut fields = record.fields;
        if !record.expand.is_empty() {
            fields.insert(EXPAND_FIELD.to_string(), Value::Object(record.expand));
        }
        Value::Object(fields)
    }
}
