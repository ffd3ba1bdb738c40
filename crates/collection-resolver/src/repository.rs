// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use chrono::Utc;
use collection_model::{CollectionSchema, SchemaRegistry, UPDATED_FIELD};
use gate_sql::{DatabaseClientManager, ExpressionBuilder, SQLParamContainer, as_pg_params};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::{
    clause::{build_filter, build_sort},
    error::CollectionError,
    expander::RelationExpander,
    fetch::{count, fetch_all, fetch_by_id},
    mapper::{from_payload, from_row, partial_from_payload},
    page::{ListQuery, PageEnvelope, PageRequest},
    record::Record,
    statement::{Delete, Insert, Update},
};

/// CRUD for one collection. Requests are validated before a database client is acquired.
pub struct CollectionRepository<'a> {
    schema: &'a CollectionSchema,
    registry: &'a SchemaRegistry,
    clients: &'a DatabaseClientManager,
}

impl<'a> CollectionRepository<'a> {
    pub fn new(
        schema: &'a CollectionSchema,
        registry: &'a SchemaRegistry,
        clients: &'a DatabaseClientManager,
    ) -> Self {
        Self {
            schema,
            registry,
            clients,
        }
    }

    pub fn schema(&self) -> &CollectionSchema {
        self.schema
    }

    /// One page of records matching the query's filter, with the total count of matches.
    ///
    /// The count and the page are read in the same snapshot.
    #[instrument(skip(self), fields(collection = %self.schema.name))]
    pub async fn list(&self, query: &ListQuery) -> Result<PageEnvelope, CollectionError> {
        let page = PageRequest::new(query.page.as_deref(), query.per_page.as_deref());
        let predicate = build_filter(self.schema, query.filter.as_deref().unwrap_or(""))?;

        let sort = query
            .sort
            .as_deref()
            .filter(|sort| !sort.trim().is_empty())
            .or(self.schema.default_sort.as_deref())
            .unwrap_or("");
        let order_by = build_sort(self.schema, sort)?;

        let mut client = self.clients.get_client().await?;
        let transaction = client.snapshot_transaction().await?;

        // Both queries are pipelined on the same connection
        let (total_items, mut items) = futures::try_join!(
            count(&transaction, self.schema, &predicate),
            fetch_all(
                &transaction,
                self.schema,
                &predicate,
                &order_by,
                Some(&page)
            ),
        )?;

        if let Some(expand) = &query.expand {
            self.expander()
                .expand(&transaction, &mut items, expand)
                .await?;
        }

        transaction.commit().await?;

        Ok(PageEnvelope::new(page, total_items, items))
    }

    #[instrument(skip(self), fields(collection = %self.schema.name))]
    pub async fn get(&self, id: &str, expand: Option<&str>) -> Result<Record, CollectionError> {
        let client = self.clients.get_client().await?;
        let client: &tokio_postgres::Client = &client;

        let mut record = fetch_by_id(client, self.schema, id)
            .await?
            .ok_or(CollectionError::RecordNotFound)?;

        if let Some(expand) = expand {
            self.expander()
                .expand(client, std::slice::from_mut(&mut record), expand)
                .await?;
        }

        Ok(record)
    }

    /// Insert a record with a generated id and timestamps. With a merge rule, a record matching
    /// an existing one on the merge key is folded into it instead.
    #[instrument(skip(self, payload), fields(collection = %self.schema.name))]
    pub async fn create(&self, payload: &Map<String, Value>) -> Result<Record, CollectionError> {
        let values = from_payload(self.schema, payload, Utc::now())?;
        let (sql, params) = Insert {
            schema: self.schema,
            values: &values,
        }
        .to_sql();
        debug!(%sql, "create");

        let client = self.clients.get_client().await?;
        let row = client.query_one(sql.as_str(), &as_pg_params(&params)).await?;

        from_row(self.schema, &row)
    }

    /// Apply the recognized fields of `payload` and refresh `updated`.
    #[instrument(skip(self, payload), fields(collection = %self.schema.name))]
    pub async fn update(
        &self,
        id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Record, CollectionError> {
        let mut changes = partial_from_payload(self.schema, payload)?;
        changes.push((UPDATED_FIELD.to_string(), SQLParamContainer::new(Utc::now())));

        let (sql, params) = Update {
            schema: self.schema,
            id,
            changes: &changes,
        }
        .to_sql();
        debug!(%sql, "update");

        let client = self.clients.get_client().await?;
        let row = client
            .query_opt(sql.as_str(), &as_pg_params(&params))
            .await?
            .ok_or(CollectionError::RecordNotFound)?;

        from_row(self.schema, &row)
    }

    #[instrument(skip(self), fields(collection = %self.schema.name))]
    pub async fn delete(&self, id: &str) -> Result<(), CollectionError> {
        let (sql, params) = Delete {
            schema: self.schema,
            id,
        }
        .to_sql();
        debug!(%sql, "delete");

        let client = self.clients.get_client().await?;
        match client.execute(sql.as_str(), &as_pg_params(&params)).await? {
            0 => Err(CollectionError::RecordNotFound),
            _ => Ok(()),
        }
    }

    fn expander(&self) -> RelationExpander<'a> {
        RelationExpander::new(self.registry, self.schema)
    }
}
