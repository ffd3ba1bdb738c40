// Copyright Exograph, Inc. All rights reserved.
//
// Use of this software is governed by the Business Source License
// included in the LICENSE file at the root of this repository.
//
// As of the Change Date specified in that file, in accordance with
// the Business Source License, use of this software will be governed
// by the Apache License, Version 2.0.

use super::{ExpressionBuilder, SQLBuilder, column::Column};

#[derive(Debug, PartialEq, Clone)]
pub enum Predicate {
    True,
    False,
    Eq(Column, Column),
    And(Box<Predicate>, Box<Predicate>),
}

impl Predicate {
    /// Compare two columns, folding the comparison away when both sides are the same.
    pub fn eq(lhs: Column, rhs: Column) -> Predicate {
        if lhs == rhs {
            Predicate::True
        } else {
            Predicate::Eq(lhs, rhs)
        }
    }

    /// Logical and of two predicates, simplifying if either side is a constant.
    pub fn and(lhs: Predicate, rhs: Predicate) -> Predicate {
        match (lhs, rhs) {
            (Predicate::False, _) | (_, Predicate::False) => Predicate::False,
            (Predicate::True, rhs) => rhs,
            (lhs, Predicate::True) => lhs,
            (lhs, rhs) if lhs == rhs => lhs,
            (lhs, rhs) => Predicate::And(Box::new(lhs), Box::new(rhs)),
        }
    }

    pub fn and_all(predicates: impl IntoIterator<Item = Predicate>) -> Predicate {
        predicates
            .into_iter()
            .fold(Predicate::True, Predicate::and)
    }
}

impl From<bool> for Predicate {
    fn from(value: bool) -> Self {
        if value {
            Predicate::True
        } else {
            Predicate::False
        }
    }
}

impl ExpressionBuilder for Predicate {
    fn build(&self, builder: &mut SQLBuilder) {
        match self {
            Predicate::True => builder.push_str("TRUE"),
            Predicate::False => builder.push_str("FALSE"),
            Predicate::Eq(column1, column2) => {
                if column2 == &Column::Null {
                    column1.build(builder);
                    builder.push_str(" IS NULL");
                } else {
                    relational_combine(column1, column2, "=", builder)
                }
            }
            Predicate::And(predicate1, predicate2) => {
                logical_combine(predicate1, predicate2, "AND", builder)
            }
        }
    }
}

fn relational_combine<E1: ExpressionBuilder, E2: ExpressionBuilder>(
    left: &E1,
    right: &E2,
    op: &'static str,
    builder: &mut SQLBuilder,
) {
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
}

fn logical_combine<E1: ExpressionBuilder, E2: ExpressionBuilder>(
    left: &E1,
    right: &E2,
    op: &'static str,
    builder: &mut SQLBuilder,
) {
    builder.push('(');
    left.build(builder);
    builder.push_space();
    builder.push_str(op);
    builder.push_space();
    right.build(builder);
    builder.push(')');
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn true_predicate() {
        assert_binding!(Predicate::True.to_sql(), "TRUE");
    }

    #[test]
    fn eq_predicate() {
        let predicate = Predicate::eq(Column::physical("age"), Column::param(5i64));

        assert_binding!(predicate.to_sql(), r#""age" = $1"#, 5i64);
    }

    #[test]
    fn eq_null_predicate() {
        let predicate = Predicate::eq(Column::physical("subcategory"), Column::Null);

        assert_binding!(predicate.to_sql(), r#""subcategory" IS NULL"#);
    }

    #[test]
    fn and_predicate() {
        let name = Predicate::eq(Column::physical("name"), Column::param("foo".to_string()));
        let age = Predicate::eq(Column::physical("age"), Column::param(5i64));

        assert_binding!(
            Predicate::and(name, age).to_sql(),
            r#"("name" = $1 AND "age" = $2)"#,
            "foo".to_string(),
            5i64
        );
    }

    #[test]
    fn and_simplification() {
        let age = Predicate::eq(Column::physical("age"), Column::param(5i64));

        assert_eq!(Predicate::and(Predicate::True, age.clone()), age);
        assert_eq!(Predicate::and(age.clone(), Predicate::False), Predicate::False);
        assert_eq!(Predicate::and(age.clone(), age.clone()), age);
        assert_eq!(Predicate::and_all(vec![]), Predicate::True);
    }

    #[test]
    fn and_all_nests_left() {
        let predicate = Predicate::and_all(vec![
            Predicate::eq(Column::physical("a"), Column::param(1i64)),
            Predicate::eq(Column::physical("b"), Column::param(2i64)),
            Predicate::eq(Column::physical("c"), Column::param(3i64)),
        ]);

        assert_binding!(
            predicate.to_sql(),
            r#"(("a" = $1 AND "b" = $2) AND "c" = $3)"#,
            1i64,
            2i64,
            3i64
        );
    }
}
