// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gate_sql::{Limit, Offset};
use serde::{Deserialize, Serialize};

use crate::record::Record;

pub const DEFAULT_PER_PAGE: i64 = 30;
pub const MAX_PER_PAGE: i64 = 100;

/// Query parameters of a list request, as received.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    pub sort: Option<String>,
    pub filter: Option<String>,
    pub expand: Option<String>,
}

/// Normalized pagination: `page >= 1` and `1 <= per_page <= 100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Values that are missing, unparsable or out of range fall back to page 1 and 30 per page.
    pub fn new(page: Option<&str>, per_page: Option<&str>) -> Self {
        let page = page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| *p >= 1)
            .unwrap_or(1);
        let per_page = per_page
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|p| (1..=MAX_PER_PAGE).contains(p))
            .unwrap_or(DEFAULT_PER_PAGE);

        Self { page, per_page }
    }

    pub fn limit(&self) -> Limit {
        Limit(self.per_page)
    }

    pub fn offset(&self) -> Offset {
        Offset((self.page - 1).saturating_mul(self.per_page))
    }

    pub fn total_pages(&self, total_items: i64) -> i64 {
        (total_items + self.per_page - 1) / self.per_page
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope {
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub items: Vec<Record>,
}

impl PageEnvelope {
    pub fn new(request: PageRequest, total_items: i64, items: Vec<Record>) -> Self {
        Self {
            page: request.page,
            per_page: request.per_page,
            total_items,
            total_pages: request.total_pages(total_items),
            items,
        }
    }
}
