// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gate_env::Environment;
use tokio_postgres::Config;

use crate::database_error::DatabaseError;

use super::{database_client::DatabaseClient, database_pool::DatabasePool};

/// Hands out database clients to request handlers.
pub enum DatabaseClientManager {
    Pooled(DatabasePool),
}

impl DatabaseClientManager {
    pub async fn from_env(env: &impl Environment) -> Result<Self, DatabaseError> {
        let pool = DatabasePool::from_env(env).await?;
        Ok(Self::Pooled(pool))
    }

    pub async fn from_db_url(
        url: &str,
        pool_size: usize,
        check_connection: bool,
    ) -> Result<Self, DatabaseError> {
        let pool = DatabasePool::from_db_url(url, pool_size, check_connection, None, None).await?;
        Ok(Self::Pooled(pool))
    }

    pub async fn from_config(
        pool_size: usize,
        check_connection: bool,
        config: Config,
    ) -> Result<Self, DatabaseError> {
        let pool = DatabasePool::from_config(pool_size, check_connection, config, None, None).await?;
        Ok(Self::Pooled(pool))
    }

    pub async fn get_client(&self) -> Result<DatabaseClient, DatabaseError> {
        match self {
            DatabaseClientManager::Pooled(pool) => pool.get_client().await,
        }
    }
}
