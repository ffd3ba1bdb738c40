// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationKind {
    /// The owning record holds the target's id in `field`
    Forward { field: String },
    /// Target records hold the owning record's `local_field` value in their `target_field`
    Reverse {
        target_field: String,
        local_field: String,
    },
}

/// A named relation that may be requested through `expand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationDescriptor {
    pub name: String,
    pub target: String,
    pub kind: RelationKind,
}

impl RelationDescriptor {
    pub fn forward(field: impl Into<String>, target: impl Into<String>) -> Self {
        let field = field.into();
        Self {
            name: field.clone(),
            target: target.into(),
            kind: RelationKind::Forward { field },
        }
    }

    pub fn reverse(
        name: impl Into<String>,
        target: impl Into<String>,
        target_field: impl Into<String>,
        local_field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
            kind: RelationKind::Reverse {
                target_field: target_field.into(),
                local_field: local_field.into(),
            },
        }
    }
}
