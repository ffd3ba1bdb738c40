// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, SQLParam, SQLParamContainer};

/// An operand in a predicate: a column of the statement's table, a bound value, or `NULL`.
#[derive(Debug, PartialEq, Clone)]
pub enum Column {
    Physical(String),
    Param(SQLParamContainer),
    Null,
}

impl Column {
    pub fn physical(name: impl Into<String>) -> Self {
        Column::Physical(name.into())
    }

    pub fn param<T: SQLParam + 'static>(value: T) -> Self {
        Column::Param(SQLParamContainer::new(value))
    }
}

impl ExpressionBuilder for Column {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            Column::Physical(name) => builder.push_identifier(name),
            Column::Param(value) => builder.push_param(value.clone()),
            Column::Null => builder.push_str("NULL"),
        }
    }
}
