// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Generic CRUD over the collections described by a [`collection_model::SchemaRegistry`].
//!
//! A request names a collection; the [`CollectionDispatcher`] hands back a
//! [`CollectionRepository`] bound to that collection's schema, which builds parameterized SQL
//! from the filter and sort clauses, maps rows to [`Record`]s and expands requested relations.

mod cast;
mod clause;
mod dispatcher;
mod error;
mod expander;
mod fetch;
mod mapper;
mod page;
mod record;
mod repository;
mod statement;

pub use clause::{build_filter, build_sort};
pub use dispatcher::CollectionDispatcher;
pub use error::CollectionError;
pub use expander::RelationExpander;
pub use page::{DEFAULT_PER_PAGE, ListQuery, MAX_PER_PAGE, PageEnvelope, PageRequest};
pub use record::Record;
pub use repository::CollectionRepository;
