// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! Translation of the `filter` and `sort` query parameters into SQL clauses.
//!
//! Field names are checked against the collection's columns before they reach SQL text, and
//! every literal is bound as a parameter.

mod filter;
mod sort;

pub use filter::{activeness_predicate, build_filter};
pub use sort::build_sort;
