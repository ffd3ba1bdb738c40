// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::ops::{Deref, DerefMut};

use tokio_postgres::{IsolationLevel, Transaction};

pub enum DatabaseClient {
    Pooled(deadpool_postgres::Client),
}

impl Deref for DatabaseClient {
    type Target = tokio_postgres::Client;

    fn deref(&self) -> &Self::Target {
        match self {
            DatabaseClient::Pooled(client) => client,
        }
    }
}

impl DerefMut for DatabaseClient {
    fn deref_mut(&mut self) -> &mut Self::Target {
        match self {
            DatabaseClient::Pooled(client) => client,
        }
    }
}

impl DatabaseClient {
    /// Start a read-only transaction whose statements all observe the same snapshot.
    pub async fn snapshot_transaction(&mut self) -> Result<Transaction<'_>, tokio_postgres::Error> {
        let client: &mut tokio_postgres::Client = self;
        client
            .build_transaction()
            .isolation_level(IsolationLevel::RepeatableRead)
            .read_only(true)
            .start()
            .await
    }
}
