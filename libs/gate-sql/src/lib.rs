// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Thin SQL layer over `tokio-postgres`.
//!
//! Statements are assembled with [`SQLBuilder`] from small [`ExpressionBuilder`] pieces
//! ([`Predicate`], [`OrderBy`], [`Limit`], [`Offset`]), so every user-supplied value ends up as a
//! bound parameter and every identifier is quoted.

#[macro_use]
mod sql;

pub mod database_error;

#[cfg(feature = "test-support")]
pub mod testing;

pub use sql::{
    ExpressionBuilder, SQLParam, SQLParamContainer, as_pg_params,
    column::Column,
    connect::database_client::DatabaseClient,
    connect::database_client_manager::DatabaseClientManager,
    connect::database_pool::DatabasePool,
    limit::Limit,
    offset::Offset,
    order::{OrderBy, OrderByElement, Ordering},
    predicate::Predicate,
    sql_builder::SQLBuilder,
};
