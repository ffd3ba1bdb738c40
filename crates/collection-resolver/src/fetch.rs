// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Reads shared by the repository and the relation expander.

use collection_model::CollectionSchema;
use gate_sql::{ExpressionBuilder, OrderBy, Predicate, as_pg_params};
use tokio_postgres::GenericClient;
use tracing::debug;

use crate::{
    error::CollectionError,
    mapper::from_row,
    page::PageRequest,
    record::Record,
    statement::{Count, Select, id_predicate},
};

pub async fn fetch_by_id<C: GenericClient>(
    client: &C,
    schema: &CollectionSchema,
    id: &str,
) -> Result<Option<Record>, CollectionError> {
    let predicate = id_predicate(id);
    let (sql, params) = Select {
        schema,
        predicate: &predicate,
        order_by: None,
        limit: None,
        offset: None,
    }
    .to_sql();
    debug!(%sql, "fetch by id");

    client
        .query_opt(sql.as_str(), &as_pg_params(&params))
        .await?
        .map(|row| from_row(schema, &row))
        .transpose()
}

pub async fn fetch_all<C: GenericClient>(
    client: &C,
    schema: &CollectionSchema,
    predicate: &Predicate,
    order_by: &OrderBy,
    page: Option<&PageRequest>,
) -> Result<Vec<Record>, CollectionError> {
    let (sql, params) = Select {
        schema,
        predicate,
        order_by: Some(order_by),
        limit: page.map(PageRequest::limit),
        offset: page.map(PageRequest::offset),
    }
    .to_sql();
    debug!(%sql, "fetch all");

    client
        .query(sql.as_str(), &as_pg_params(&params))
        .await?
        .iter()
        .map(|row| from_row(schema, row))
        .collect()
}

pub async fn count<C: GenericClient>(
    client: &C,
    schema: &CollectionSchema,
    predicate: &Predicate,
) -> Result<i64, CollectionError> {
    let (sql, params) = Count { schema, predicate }.to_sql();
    debug!(%sql, "count");

    let row = client.query_one(sql.as_str(), &as_pg_params(&params)).await?;
    Ok(row.try_get(0)?)
}
