// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

//! The statements a repository issues, rendered against a collection schema.

use collection_model::{CollectionSchema, ID_FIELD, UPDATED_FIELD};
use gate_sql::{
    Column, ExpressionBuilder, Limit, Offset, OrderBy, Predicate, SQLBuilder, SQLParamContainer,
};

/// `SELECT <columns> FROM <table> [WHERE ...] [ORDER BY ...] [LIMIT ... OFFSET ...]`
pub struct Select<'a> {
    pub schema: &'a CollectionSchema,
    pub predicate: &'a Predicate,
    pub order_by: Option<&'a OrderBy>,
    pub limit: Option<Limit>,
    pub offset: Option<Offset>,
}

/// `SELECT COUNT(*) FROM <table> [WHERE ...]`
pub struct Count<'a> {
    pub schema: &'a CollectionSchema,
    pub predicate: &'a Predicate,
}

/// `INSERT ... RETURNING <columns>`, upserting on the merge key when the schema has a merge rule.
pub struct Insert<'a> {
    pub schema: &'a CollectionSchema,
    pub values: &'a [(String, SQLParamContainer)],
}

/// `UPDATE <table> SET ... WHERE "id" = $n RETURNING <columns>`
pub struct Update<'a> {
    pub schema: &'a CollectionSchema,
    pub id: &'a str,
    pub changes: &'a [(String, SQLParamContainer)],
}

/// `DELETE FROM <table> WHERE "id" = $1`
pub struct Delete<'a> {
    pub schema: &'a CollectionSchema,
    pub id: &'a str,
}

impl ExpressionBuilder for Select<'_> {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("SELECT ");
        builder.push_identifiers(&self.schema.column_names());
        builder.push_str(" FROM ");
        builder.push_identifier(&self.schema.name);
        push_where(builder, self.predicate);

        if let Some(order_by) = self.order_by.filter(|order_by| !order_by.is_empty()) {
            builder.push_space();
            order_by.build(builder);
        }
        if let Some(limit) = &self.limit {
            builder.push_space();
            limit.build(builder);
        }
        if let Some(offset) = &self.offset {
            builder.push_space();
            offset.build(builder);
        }
    }
}

impl ExpressionBuilder for Count<'_> {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("SELECT COUNT(*) FROM ");
        builder.push_identifier(&self.schema.name);
        push_where(builder, self.predicate);
    }
}

impl ExpressionBuilder for Insert<'_> {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("INSERT INTO ");
        builder.push_identifier(&self.schema.name);
        builder.push_str(" (");
        builder.push_iter(self.values.iter(), ", ", |builder, (name, _)| {
            builder.push_identifier(name)
        });
        builder.push_str(") VALUES (");
        builder.push_iter(self.values.iter(), ", ", |builder, (_, value)| {
            builder.push_param(value.clone())
        });
        builder.push(')');

        if let Some(rule) = &self.schema.merge_rule {
            builder.push_str(" ON CONFLICT (");
            builder.push_identifiers(&rule.key);
            builder.push_str(") DO UPDATE SET ");
            builder.push_identifier(&rule.accumulate);
            builder.push_str(" = ");
            builder.push_qualified_column(&self.schema.name, &rule.accumulate);
            builder.push_str(" + EXCLUDED.");
            builder.push_identifier(&rule.accumulate);
            builder.push_str(", ");
            builder.push_identifier(UPDATED_FIELD);
            builder.push_str(" = EXCLUDED.");
            builder.push_identifier(UPDATED_FIELD);
        }

        push_returning(builder, self.schema);
    }
}

impl ExpressionBuilder for Update<'_> {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("UPDATE ");
        builder.push_identifier(&self.schema.name);
        builder.push_str(" SET ");
        builder.push_iter(self.changes.iter(), ", ", |builder, (name, value)| {
            builder.push_identifier(name);
            builder.push_str(" = ");
            builder.push_param(value.clone());
        });
        push_where(builder, &id_predicate(self.id));
        push_returning(builder, self.schema);
    }
}

impl ExpressionBuilder for Delete<'_> {
    fn build(&self, builder: &mut SQLBuilder) {
        builder.push_str("DELETE FROM ");
        builder.push_identifier(&self.schema.name);
        push_where(builder, &id_predicate(self.id));
    }
}

pub fn id_predicate(id: &str) -> Predicate {
    Predicate::eq(Column::physical(ID_FIELD), Column::param(id.to_string()))
}

fn push_where(builder: &mut SQLBuilder, predicate: &Predicate) {
    if *predicate != Predicate::True {
        builder.push_str(" WHERE ");
        predicate.build(builder);
    }
}

fn push_returning(builder: &mut SQLBuilder, schema: &CollectionSchema) {
    builder.push_str(" RETURNING ");
    builder.push_identifiers(&schema.column_names());
}
