// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use gate_sql::SQLBuilder;

use crate::{
    SchemaRegistry,
    field::FieldSpec,
    schema::{CREATED_FIELD, CollectionSchema, ID_FIELD, UPDATED_FIELD},
};

impl CollectionSchema {
    /// `CREATE TABLE IF NOT EXISTS` statement for this collection, followed by an index on each
    /// relation field.
    pub fn creation_sql(&self) -> String {
        let mut builder = SQLBuilder::new();

        builder.push_str("CREATE TABLE IF NOT EXISTS ");
        builder.push_identifier(&self.name);
        builder.push_str(" (\n    ");
        builder.push_identifier(ID_FIELD);
        builder.push_str(" TEXT PRIMARY KEY,\n    ");
        builder.push_identifier(CREATED_FIELD);
        builder.push_str(" TIMESTAMPTZ NOT NULL,\n    ");
        builder.push_identifier(UPDATED_FIELD);
        builder.push_str(" TIMESTAMPTZ NOT NULL");

        for field in &self.fields {
            builder.push_str(",\n    ");
            push_column_definition(&mut builder, field);
        }

        for constraint in &self.unique_constraints {
            builder.push_str(",\n    UNIQUE (");
            builder.push_identifiers(constraint);
            builder.push(')');
        }

        builder.push_str("\n);\n");

        for field in self.fields.iter().filter(|f| f.relation_target().is_some()) {
            builder.push_str("CREATE INDEX IF NOT EXISTS ");
            builder.push_identifier(format!("{}_{}_idx", self.name, field.name));
            builder.push_str(" ON ");
            builder.push_identifier(&self.name);
            builder.push_str(" (");
            builder.push_identifier(&field.name);
            builder.push_str(");\n");
        }

        builder.into_sql().0
    }
}

fn push_column_definition(builder: &mut SQLBuilder, field: &FieldSpec) {
    builder.push_identifier(&field.name);
    builder.push_space();
    builder.push_str(field.typ.column_type());
    if !field.nullable {
        builder.push_str(" NOT NULL");
    }
    if field.unique {
        builder.push_str(" UNIQUE");
    }
    if let Some(min) = field.min {
        builder.push_str(" CHECK (");
        builder.push_identifier(&field.name);
        builder.push_str(format!(" >= {min})"));
    }
}

impl SchemaRegistry {
    /// Creation statements for every registered collection, in registration order.
    pub fn creation_sql(&self) -> String {
        self.iter()
            .map(|schema| schema.creation_sql())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
