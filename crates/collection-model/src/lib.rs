// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Static description of the collections served by the gateway.
//!
//! A [`CollectionSchema`] lists a table's fields with their semantic types, defaults and
//! relations. The [`SchemaRegistry`] holds every schema, validated once at startup and immutable
//! afterwards.

mod ddl;
mod ecommerce;
mod error;
mod field;
mod registry;
mod relation;
mod schema;

pub use ecommerce::ecommerce_schemas;
pub use error::ModelError;
pub use field::{FieldDefault, FieldSpec, FieldType};
pub use registry::SchemaRegistry;
pub use relation::{RelationDescriptor, RelationKind};
pub use schema::{CREATED_FIELD, CollectionSchema, ID_FIELD, MergeRule, UPDATED_FIELD};
