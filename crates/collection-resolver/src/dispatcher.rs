// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::sync::Arc;

use collection_model::SchemaRegistry;
use gate_sql::DatabaseClientManager;

use crate::{error::CollectionError, repository::CollectionRepository};

/// Routes collection names to repositories sharing one registry and one database pool.
pub struct CollectionDispatcher {
    registry: Arc<SchemaRegistry>,
    clients: Arc<DatabaseClientManager>,
}

impl CollectionDispatcher {
    pub fn new(registry: Arc<SchemaRegistry>, clients: Arc<DatabaseClientManager>) -> Self {
        Self { registry, clients }
    }

    pub fn dispatch(&self, collection: &str) -> Result<CollectionRepository<'_>, CollectionError> {
        let schema = self
            .registry
            .get(collection)
            .ok_or_else(|| CollectionError::CollectionNotFound(collection.to_string()))?;

        Ok(CollectionRepository::new(
            schema,
            &self.registry,
            &self.clients,
        ))
    }
}
