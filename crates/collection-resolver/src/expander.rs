// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use collection_model::{CollectionSchema, RelationDescriptor, RelationKind, SchemaRegistry};
use gate_sql::{Column, Predicate};
use serde_json::Value;
use tokio_postgres::GenericClient;
use tracing::{debug, instrument};

use crate::{
    clause::{activeness_predicate, build_sort},
    error::CollectionError,
    fetch::{fetch_all, fetch_by_id},
    record::Record,
};

/// Attaches related records to loaded records, one lookup per record and relation.
pub struct RelationExpander<'a> {
    registry: &'a SchemaRegistry,
    schema: &'a CollectionSchema,
}

impl<'a> RelationExpander<'a> {
    pub fn new(registry: &'a SchemaRegistry, schema: &'a CollectionSchema) -> Self {
        Self { registry, schema }
    }

    /// Expand the comma-separated relation names in `expand` on each of `records`.
    ///
    /// Names that are not relations of the collection are ignored.
    #[instrument(skip(self, client, records), fields(collection = %self.schema.name))]
    pub async fn expand<C: GenericClient>(
        &self,
        client: &C,
        records: &mut [Record],
        expand: &str,
    ) -> Result<(), CollectionError> {
        let relations: Vec<(&RelationDescriptor, &CollectionSchema)> = relation_names(expand)
            .into_iter()
            .filter_map(|name| {
                let relation = self.schema.relation(name)?;
                let target = self.registry.get(&relation.target)?;
                Some((relation, target))
            })
            .collect();

        if relations.is_empty() {
            debug!(expand, "no known relations to expand");
            return Ok(());
        }

        for record in records.iter_mut() {
            for (relation, target) in &relations {
                if let Some(value) = self.related(client, record, relation, target).await? {
                    record.set_expansion(&relation.name, value);
                }
            }
        }

        Ok(())
    }

    async fn related<C: GenericClient>(
        &self,
        client: &C,
        record: &Record,
        relation: &RelationDescriptor,
        target: &CollectionSchema,
    ) -> Result<Option<Value>, CollectionError> {
        match &relation.kind {
            RelationKind::Forward { field } => {
                let Some(id) = record
                    .get(field)
                    .and_then(Value::as_str)
                    .filter(|id| !id.is_empty())
                else {
                    return Ok(None);
                };

                Ok(fetch_by_id(client, target, id).await?.map(Value::from))
            }
            RelationKind::Reverse {
                target_field,
                local_field,
            } => {
                let Some(key) = record.get(local_field).and_then(Value::as_str) else {
                    return Ok(Some(Value::Array(vec![])));
                };

                let predicate = Predicate::and(
                    Predicate::eq(
                        Column::physical(target_field),
                        Column::param(key.to_string()),
                    ),
                    activeness_predicate(target, &[target_field.as_str()]),
                );
                let order_by = build_sort(target, target.default_sort.as_deref().unwrap_or(""))?;

                let related = fetch_all(client, target, &predicate, &order_by, None).await?;

                Ok(Some(Value::Array(
                    related.into_iter().map(Value::from).collect(),
                )))
            }
        }
    }
}

/// Trimmed, non-empty relation names in first-seen order, without duplicates.
fn relation_names(expand: &str) -> Vec<&str> {
    let mut names: Vec<&str> = vec![];
    for name in expand.split(',').map(str::trim).filter(|n| !n.is_empty()) {
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_trimmed_and_deduplicated() {
        assert_eq!(
            relation_names(" store, category ,store,,"),
            vec!["store", "category"]
        );
        assert!(relation_names("").is_empty());
        assert!(relation_names(" , ").is_empty());
    }
}
