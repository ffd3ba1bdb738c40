// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use serde_json::Value;

/// The semantic type of a field, which decides its column type and how JSON values are coerced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Int,
    Float,
    Bool,
    DateTime,
    Json,
    /// Id of a record in the named collection
    Relation(String),
}

impl FieldType {
    pub fn column_type(&self) -> &'static str {
        match self {
            FieldType::Text | FieldType::Relation(_) => "TEXT",
            FieldType::Int => "BIGINT",
            FieldType::Float => "DOUBLE PRECISION",
            FieldType::Bool => "BOOLEAN",
            FieldType::DateTime => "TIMESTAMPTZ",
            FieldType::Json => "JSONB",
        }
    }
}

/// Value used when a create payload omits a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldDefault {
    /// The type's zero value (`""`, `0`, `false`, JSON `null`); the current time for non-nullable
    /// date-times and `NULL` for nullable fields.
    Zero,
    Value(Value),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub name: String,
    pub typ: FieldType,
    pub required: bool,
    pub nullable: bool,
    pub unique: bool,
    pub default: FieldDefault,
    /// Smallest accepted value of an `Int` field
    pub min: Option<i64>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, typ: FieldType) -> Self {
        // Optional relations are stored as NULL when unset
        let nullable = matches!(typ, FieldType::Relation(_));

        Self {
            name: name.into(),
            typ,
            required: false,
            nullable,
            unique: false,
            default: FieldDefault::Zero,
            min: None,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Text)
    }

    pub fn int(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Int)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Float)
    }

    pub fn bool(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Bool)
    }

    pub fn datetime(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::DateTime)
    }

    pub fn json(name: impl Into<String>) -> Self {
        Self::new(name, FieldType::Json)
    }

    pub fn relation(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self::new(name, FieldType::Relation(target.into()))
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self.nullable = false;
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = FieldDefault::Value(value);
        self
    }

    pub fn with_min(mut self, min: i64) -> Self {
        self.min = Some(min);
        self
    }

    pub fn relation_target(&self) -> Option<&str> {
        match &self.typ {
            FieldType::Relation(target) => Some(target),
            _ => None,
        }
    }
}
