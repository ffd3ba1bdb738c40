// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

/// Assert that a built statement has the expected SQL text and bound parameters.
///
/// ```ignore
/// assert_binding!(predicate.to_sql(), r#""name" = $1"#, "shoes".to_string());
/// ```
#[macro_export]
macro_rules! assert_binding {
    ($actual:expr, $expected_stmt:expr $(, $expected_param:expr)* $(,)?) => {{
        let (actual_stmt, actual_params): (String, Vec<$crate::SQLParamContainer>) = $actual;
        assert_eq!(actual_stmt, $expected_stmt);
        let expected_params: Vec<$crate::SQLParamContainer> =
            vec![$($crate::SQLParamContainer::new($expected_param)),*];
        assert_eq!(actual_params, expected_params, "Parameter mismatch");
    }};
}
