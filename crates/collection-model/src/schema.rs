// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use crate::{
    field::{FieldSpec, FieldType},
    relation::RelationDescriptor,
};

pub const ID_FIELD: &str = "id";
pub const CREATED_FIELD: &str = "created";
pub const UPDATED_FIELD: &str = "updated";

static ID_TYPE: FieldType = FieldType::Text;
static TIMESTAMP_TYPE: FieldType = FieldType::DateTime;

/// Upsert behavior for collections keyed by a natural key: a create whose `key` fields match an
/// existing record adds its `accumulate` value to the stored one instead of inserting a new row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeRule {
    pub key: Vec<String>,
    pub accumulate: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    pub name: String,
    pub fields: Vec<FieldSpec>,
    pub relations: Vec<RelationDescriptor>,
    /// Sort expression used when a list request doesn't specify one (e.g. `-created`)
    pub default_sort: Option<String>,
    /// Boolean field restricting reads to active records unless a filter mentions it
    pub activeness_field: Option<String>,
    pub merge_rule: Option<MergeRule>,
    /// Multi-column unique constraints (single-column ones are declared on the field)
    pub unique_constraints: Vec<Vec<String>>,
}

impl CollectionSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: vec![],
            relations: vec![],
            default_sort: None,
            activeness_field: None,
            merge_rule: None,
            unique_constraints: vec![],
        }
    }

    pub fn with_field(mut self, field: FieldSpec) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_relation(mut self, relation: RelationDescriptor) -> Self {
        self.relations.push(relation);
        self
    }

    pub fn with_default_sort(mut self, sort: impl Into<String>) -> Self {
        self.default_sort = Some(sort.into());
        self
    }

    pub fn with_activeness_field(mut self, field: impl Into<String>) -> Self {
        self.activeness_field = Some(field.into());
        self
    }

    /// Declare a merge rule, along with the unique constraint on its key that backs the upsert.
    pub fn with_merge_rule(mut self, key: &[&str], accumulate: impl Into<String>) -> Self {
        let key: Vec<String> = key.iter().map(|k| k.to_string()).collect();
        self.unique_constraints.push(key.clone());
        self.merge_rule = Some(MergeRule {
            key,
            accumulate: accumulate.into(),
        });
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn relation(&self, name: &str) -> Option<&RelationDescriptor> {
        self.relations.iter().find(|r| r.name == name)
    }

    /// Type of a column that may appear in a filter or sort: a declared field or a system field.
    pub fn column_type(&self, name: &str) -> Option<&FieldType> {
        match name {
            ID_FIELD => Some(&ID_TYPE),
            CREATED_FIELD | UPDATED_FIELD => Some(&TIMESTAMP_TYPE),
            _ => self.field(name).map(|f| &f.typ),
        }
    }

    /// Every stored column, system fields first, then declared fields in order.
    pub fn column_names(&self) -> Vec<&str> {
        [ID_FIELD, CREATED_FIELD, UPDATED_FIELD]
            .into_iter()
            .chain(self.fields.iter().map(|f| f.name.as_str()))
            .collect()
    }
}
