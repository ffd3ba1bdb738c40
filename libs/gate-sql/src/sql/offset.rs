// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, SQLParamContainer};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offset(pub i64);

impl ExpressionBuilder for Offset {
    /// Build expression of the form `OFFSET <offset>`
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("OFFSET ");
        builder.push_param(SQLParamContainer::new(self.0));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Limit;

    #[test]
    fn limit_and_offset_are_bound() {
        let mut builder = SQLBuilder::new();
        Limit(30).build(&mut builder);
        builder.push_space();
        Offset(60).build(&mut builder);

        assert_binding!(builder.into_sql(), "LIMIT $1 OFFSET $2", 30i64, 60i64);
    }
}
