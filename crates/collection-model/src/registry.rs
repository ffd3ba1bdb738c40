// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::{
    error::ModelError,
    field::FieldType,
    relation::{RelationDescriptor, RelationKind},
    schema::CollectionSchema,
};

const RESERVED_FIELDS: [&str; 6] = [
    "id",
    "created",
    "updated",
    "collectionId",
    "collectionName",
    "expand",
];

/// All collections known to the gateway, keyed by name in declaration order.
#[derive(Debug)]
pub struct SchemaRegistry {
    collections: IndexMap<String, CollectionSchema>,
}

impl SchemaRegistry {
    pub fn new(schemas: Vec<CollectionSchema>) -> Result<Self, ModelError> {
        let mut collections = IndexMap::new();

        for schema in schemas {
            if collections.contains_key(&schema.name) {
                return Err(ModelError::DuplicateCollection(schema.name));
            }
            collections.insert(schema.name.clone(), schema);
        }

        let registry = Self { collections };
        for schema in registry.collections.values() {
            registry.validate(schema)?;
        }

        Ok(registry)
    }

    pub fn get(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CollectionSchema> {
        self.collections.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(|name| name.as_str())
    }

    fn validate(&self, schema: &CollectionSchema) -> Result<(), ModelError> {
        let unknown_field = |field: &str| ModelError::UnknownField {
            collection: schema.name.clone(),
            field: field.to_string(),
        };

        let mut seen = HashSet::new();
        for field in &schema.fields {
            if RESERVED_FIELDS.contains(&field.name.as_str()) {
                return Err(ModelError::ReservedField {
                    collection: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
            if !seen.insert(field.name.as_str()) {
                return Err(ModelError::DuplicateField {
                    collection: schema.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        if let Some(sort) = &schema.default_sort {
            for token in sort.split(',').map(str::trim).filter(|t| !t.is_empty()) {
                let name = token.trim_start_matches(['-', '+']);
                if schema.column_type(name).is_none() {
                    return Err(unknown_field(name));
                }
            }
        }

        if let Some(activeness_field) = &schema.activeness_field {
            match schema.field(activeness_field) {
                Some(field) if field.typ == FieldType::Bool => {}
                _ => return Err(unknown_field(activeness_field)),
            }
        }

        if let Some(rule) = &schema.merge_rule {
            for key in &rule.key {
                if schema.field(key).is_none() {
                    return Err(unknown_field(key));
                }
            }
            match schema.field(&rule.accumulate) {
                Some(field) if matches!(field.typ, FieldType::Int | FieldType::Float) => {}
                _ => return Err(unknown_field(&rule.accumulate)),
            }
        }

        for constraint in &schema.unique_constraints {
            for column in constraint {
                if schema.field(column).is_none() {
                    return Err(unknown_field(column));
                }
            }
        }

        let mut relation_names = HashSet::new();
        for relation in &schema.relations {
            if !relation_names.insert(relation.name.as_str()) {
                return Err(self.invalid_relation(schema, relation, "defined more than once"));
            }
            self.validate_relation(schema, relation)?;
        }

        Ok(())
    }

    fn validate_relation(
        &self,
        schema: &CollectionSchema,
        relation: &RelationDescriptor,
    ) -> Result<(), ModelError> {
        let target = self.get(&relation.target).ok_or_else(|| {
            self.invalid_relation(
                schema,
                relation,
                &format!("unknown target collection '{}'", relation.target),
            )
        })?;

        match &relation.kind {
            RelationKind::Forward { field } => match schema.field(field) {
                Some(spec) if spec.relation_target() == Some(target.name.as_str()) => Ok(()),
                _ => Err(self.invalid_relation(
                    schema,
                    relation,
                    &format!("'{field}' is not a relation field to '{}'", target.name),
                )),
            },
            RelationKind::Reverse {
                target_field,
                local_field,
            } => {
                if target.column_type(target_field).is_none() {
                    return Err(self.invalid_relation(
                        schema,
                        relation,
                        &format!("'{}' has no field '{target_field}'", target.name),
                    ));
                }
                if schema.column_type(local_field).is_none() {
                    return Err(self.invalid_relation(
                        schema,
                        relation,
                        &format!("unknown local field '{local_field}'"),
                    ));
                }
                Ok(())
            }
        }
    }

    fn invalid_relation(
        &self,
        schema: &CollectionSchema,
        relation: &RelationDescriptor,
        message: &str,
    ) -> ModelError {
        ModelError::InvalidRelation {
            collection: schema.name.clone(),
            relation: relation.name.clone(),
            message: message.to_string(),
        }
    }
}
