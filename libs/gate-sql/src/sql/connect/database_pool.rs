// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::str::FromStr;

use common::env_const::{
    DATABASE_URL, DEFAULT_CONNECTION_POOL_SIZE, GATE_CHECK_CONNECTION_ON_STARTUP,
    GATE_CONNECTION_POOL_SIZE, GATE_POSTGRES_PASSWORD, GATE_POSTGRES_URL, GATE_POSTGRES_USER,
};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use gate_env::Environment;
use tokio_postgres::{Config, NoTls};
use tracing::debug;

use crate::database_error::DatabaseError;

use super::database_client::DatabaseClient;

pub struct DatabasePool {
    pool: Pool,
}

impl DatabasePool {
    pub async fn get_client(&self) -> Result<DatabaseClient, DatabaseError> {
        Ok(DatabaseClient::Pooled(self.pool.get().await?))
    }

    pub async fn from_env(env: &impl Environment) -> Result<Self, DatabaseError> {
        let url = env
            .get(GATE_POSTGRES_URL)
            .or_else(|| env.get(DATABASE_URL))
            .filter(|url| !url.trim().is_empty())
            .ok_or(DatabaseError::Config(format!(
                "Env {GATE_POSTGRES_URL} (or {DATABASE_URL}) must be provided"
            )))?;

        let user = env.get(GATE_POSTGRES_USER);
        let password = env.get(GATE_POSTGRES_PASSWORD);
        let pool_size = env
            .get_parsed::<usize>(GATE_CONNECTION_POOL_SIZE)
            .map_err(|e| DatabaseError::Config(e.to_string()))?
            .unwrap_or(DEFAULT_CONNECTION_POOL_SIZE);
        let check_connection = env
            .enabled(GATE_CHECK_CONNECTION_ON_STARTUP, true)
            .map_err(|e| DatabaseError::Config(e.to_string()))?;

        Self::from_db_url(&url, pool_size, check_connection, user, password).await
    }

    pub async fn from_db_url(
        url: &str,
        pool_size: usize,
        check_connection: bool,
        user: Option<String>,
        password: Option<String>,
    ) -> Result<Self, DatabaseError> {
        let config = Config::from_str(url).map_err(|e| {
            DatabaseError::Delegate(e)
                .with_context("Failed to parse PostgreSQL connection string".into())
        })?;

        Self::from_config(pool_size, check_connection, config, user, password).await
    }

    pub async fn from_config(
        pool_size: usize,
        check_connection: bool,
        mut config: Config,
        user: Option<String>,
        password: Option<String>,
    ) -> Result<Self, DatabaseError> {
        if let Some(user) = &user {
            config.user(user);
        }
        if let Some(password) = &password {
            config.password(password);
        }

        let manager_config = ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        };

        let manager = Manager::from_config(config, NoTls, manager_config);

        let pool = Pool::builder(manager)
            .max_size(pool_size)
            .build()
            .map_err(|e| DatabaseError::Config(format!("Failed to create DB pool: {e}")))?;

        let db = Self { pool };

        if check_connection {
            // Fail fast instead of on the first request
            let _ = db
                .get_client()
                .await
                .map_err(|e| e.with_context("Failed to connect to the database".into()))?;
            debug!("Database connection verified");
        }

        Ok(db)
    }
}
