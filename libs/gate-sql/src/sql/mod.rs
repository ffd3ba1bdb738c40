// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use std::any::Any;

use tokio_postgres::types::ToSql;

#[macro_use]
#[cfg(any(test, feature = "test-support"))]
pub mod test_util;

pub mod column;
pub mod connect;
pub mod limit;
pub mod offset;
pub mod order;
pub mod predicate;
pub mod sql_builder;
mod sql_param_container;

pub use sql_param_container::SQLParamContainer;

use sql_builder::SQLBuilder;

/// A value that may be bound to a statement placeholder.
///
/// Any `ToSql` type that can be compared with itself qualifies, which lets tests assert on the
/// exact parameters a statement carries.
pub trait SQLParam: ToSql + Send + Sync {
    fn as_any(&self) -> &dyn Any;
    fn eq(&self, other: &dyn SQLParam) -> bool;

    fn as_pg(&self) -> &(dyn ToSql + Sync);
}

impl<T: ToSql + Send + Sync + Any + PartialEq> SQLParam for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn eq(&self, other: &dyn SQLParam) -> bool {
        if let Some(other) = other.as_any().downcast_ref::<T>() {
            self == other
        } else {
            false
        }
    }

    fn as_pg(&self) -> &(dyn ToSql + Sync) {
        self
    }
}

impl PartialEq for dyn SQLParam {
    fn eq(&self, other: &Self) -> bool {
        SQLParam::eq(self, other)
    }
}

/// Borrow a parameter list in the shape `tokio_postgres` expects.
pub fn as_pg_params(params: &[SQLParamContainer]) -> Vec<&(dyn ToSql + Sync)> {
    params.iter().map(|p| p as &(dyn ToSql + Sync)).collect()
}

pub trait ExpressionBuilder {
    /// Build the SQL expression into `builder`.
    fn build(&self, builder: &mut SQLBuilder);

    /// Build a standalone SQL expression. Mostly useful for top-level statements and tests.
    fn to_sql(&self) -> (String, Vec<SQLParamContainer>) {
        let mut builder = SQLBuilder::new();
        self.build(&mut builder);
        builder.into_sql()
    }
}

impl<T: ExpressionBuilder> ExpressionBuilder for Box<T> {
    fn build(&self, builder: &mut SQLBuilder) {
        self.as_ref().build(builder)
    }
}
