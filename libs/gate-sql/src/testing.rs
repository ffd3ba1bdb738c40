// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Helpers for tests that need a live PostgreSQL server.

use std::{future::Future, panic::AssertUnwindSafe, str::FromStr};

use futures::FutureExt;
use tokio_postgres::{Config, NoTls};

use crate::{DatabaseClientManager, database_error::DatabaseError};

/// Run `test` against a freshly created schema on the server at `url`.
///
/// The schema is created, initialized with `init_sql`, handed to `test` as the default
/// `search_path` of every pooled connection, and dropped once `test` completes. The schema is
/// dropped even when initialization fails or `test` panics; the panic is then resumed.
pub async fn with_isolated_schema<F, Fut, T>(
    url: &str,
    init_sql: &str,
    test: F,
) -> Result<T, DatabaseError>
where
    F: FnOnce(DatabaseClientManager) -> Fut,
    Fut: Future<Output = T>,
{
    let (admin, connection) = tokio_postgres::connect(url, NoTls).await?;
    tokio::spawn(async move {
        if let Err(e) = connection.await {
            eprintln!("connection error: {e}");
        }
    });

    let schema = format!("gate_test_{}", uuid::Uuid::new_v4().simple());
    admin
        .batch_execute(&format!("CREATE SCHEMA \"{schema}\""))
        .await?;

    let outcome = async {
        let mut config = Config::from_str(url)?;
        config.options(&format!("-c search_path={schema}"));

        let manager = DatabaseClientManager::from_config(2, true, config).await?;
        manager.get_client().await?.batch_execute(init_sql).await?;

        Ok::<_, DatabaseError>(AssertUnwindSafe(test(manager)).catch_unwind().await)
    }
    .await;

    admin
        .batch_execute(&format!("DROP SCHEMA \"{schema}\" CASCADE"))
        .await?;

    match outcome? {
        Ok(result) => Ok(result),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
