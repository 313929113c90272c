use super::*;
use crate::param::Param;

fn column_name(condition: &Condition) -> &str {
    match condition {
        Condition::Column { column, .. }
        | Condition::Like { column, .. }
        | Condition::Between { column, .. }
        | Condition::In { column, .. }
        | Condition::InSubquery { column, .. }
        | Condition::IsNull { column, .. } => column,
        Condition::Exists { .. } => "<exists>",
        Condition::Nested { .. } => "<nested>",
    }
}

#[test]
fn test_add_column_stores_operator_and_separator() {
    let mut group = ConditionGroup::new();
    group.add_column("age", Value::literal(18i32), ">=", Separator::Or);

    match &group.conditions()[0] {
        Condition::Column {
            column,
            operator,
            separator,
            value,
        } => {
            assert_eq!(column, "age");
            assert_eq!(operator, ">=");
            assert_eq!(*separator, Separator::Or);
            assert!(matches!(value, Value::Literal(_)));
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_nested_group_preserves_child_order_and_separators() {
    let mut group = ConditionGroup::new();
    group.add_column("a", Value::literal(1i32), "=", Separator::And);
    group.add_nested(
        |g| {
            g.add_column("b", Value::literal(2i32), "=", Separator::And);
            g.add_column("c", Value::literal(3i32), "=", Separator::Or);
        },
        Separator::Or,
    );

    assert_eq!(group.len(), 2);
    match &group.conditions()[1] {
        Condition::Nested {
            children,
            separator,
        } => {
            assert_eq!(*separator, Separator::Or);
            let names: Vec<&str> = children.iter().map(column_name).collect();
            assert_eq!(names, vec!["b", "c"]);
            assert_eq!(children[0].separator(), Separator::And);
            assert_eq!(children[1].separator(), Separator::Or);
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_expression_callback_result_is_stored() {
    let mut group = ConditionGroup::new();
    group.add_column_with(
        "total",
        |e| {
            e.column("price").times().column("quantity");
        },
        ">",
        Separator::And,
    );

    let Condition::Column { value, .. } = &group.conditions()[0] else {
        panic!("expected column node");
    };
    let expr = value.as_expression().expect("expression value");
    assert_eq!(expr.parts().len(), 3);
    assert!(matches!(&expr.parts()[0], ExprPart::Column(c) if c == "price"));
    assert!(matches!(&expr.parts()[1], ExprPart::Op(op) if op == "*"));
}

#[test]
fn test_subquery_callbacks_build_fresh_subqueries() {
    let mut group = ConditionGroup::new();
    group.add_in_subquery(
        "id",
        |q| {
            q.from(["orders"]).select(["user_id"]);
        },
        Separator::And,
        false,
    );
    group.add_exists(
        |q| {
            q.from(["bans"]);
        },
        Separator::And,
        true,
    );

    match &group.conditions()[0] {
        Condition::InSubquery { subquery, .. } => {
            assert_eq!(subquery.statement().tables(), ["orders".to_string()]);
            assert_eq!(subquery.statement().columns()[0].expr, "user_id");
        }
        other => panic!("unexpected node: {other:?}"),
    }
    match &group.conditions()[1] {
        Condition::Exists {
            subquery, negated, ..
        } => {
            assert!(*negated);
            assert_eq!(subquery.statement().tables(), ["bans".to_string()]);
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_empty_in_list_is_stored_unvalidated() {
    let mut group = ConditionGroup::new();
    group.add_in("id", Vec::new(), Separator::And, false);

    let Condition::In { values, .. } = &group.conditions()[0] else {
        panic!("expected in node");
    };
    assert!(values.is_empty());
}

#[test]
fn test_add_tables_replaces_previous_list() {
    let mut stmt = Statement::new();
    stmt.add_tables(["a"]);
    stmt.add_tables(["b"]);
    assert_eq!(stmt.tables(), ["b".to_string()]);
}

#[test]
fn test_update_columns_are_appended_not_merged() {
    let mut stmt = Statement::new();
    stmt.add_update_columns([("name", Value::literal("a")), ("age", Value::literal(1i32))]);
    stmt.add_update_columns([("name", Value::literal("b"))]);
    stmt.add_update_column_with("visits", |e| {
        e.column("visits").plus().value(1i32);
    });

    let columns: Vec<&str> = stmt
        .assignments()
        .iter()
        .map(|a| a.column.as_str())
        .collect();
    assert_eq!(columns, vec!["name", "age", "name", "visits"]);
    assert!(stmt.assignments()[3].value.as_expression().is_some());
}

#[test]
fn test_joins_keep_insertion_order() {
    let mut stmt = Statement::new();
    stmt.add_join(JoinKind::Left, ["profiles"], |on| {
        on.on("users.id", "profiles.user_id");
    });
    stmt.add_join(JoinKind::Inner, ["roles", "role_users"], |on| {
        on.on("roles.id", "role_users.role_id")
            .or_on("roles.id", "users.role_id");
    });

    let joins = stmt.joins();
    assert_eq!(joins.len(), 2);
    assert_eq!(joins[0].kind, JoinKind::Left);
    assert_eq!(joins[0].tables, vec!["profiles".to_string()]);
    assert_eq!(joins[1].tables, vec!["roles".to_string(), "role_users".to_string()]);
    assert_eq!(joins[1].on.len(), 2);
    assert_eq!(joins[1].on.conditions()[1].separator(), Separator::Or);
}

#[test]
fn test_having_between_keeps_separator() {
    let mut having = HavingGroup::new();
    having.add_aggregate("COUNT(id)", Value::literal(1i64), ">", Separator::And);
    having.add_between(
        "SUM(total)",
        Param::new(10i64),
        Param::new(20i64),
        Separator::Or,
        true,
    );

    match &having.conditions()[1] {
        HavingCondition::Between {
            aggregate,
            separator,
            negated,
            ..
        } => {
            assert_eq!(aggregate, "SUM(total)");
            assert_eq!(*separator, Separator::Or);
            assert!(*negated);
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_having_nested_group() {
    let mut having = HavingGroup::new();
    having.add_nested(
        |g| {
            g.add_in("COUNT(id)", vec![Param::new(1i64)], Separator::And, false);
            g.add_in_subquery(
                "MAX(score)",
                |q| {
                    q.from(["scores"]).select(["score"]);
                },
                Separator::Or,
                false,
            );
        },
        Separator::And,
    );

    let HavingCondition::Nested { children, .. } = &having.conditions()[0] else {
        panic!("expected nested node");
    };
    assert_eq!(children.len(), 2);
    assert_eq!(children[1].separator(), Separator::Or);
}

#[test]
fn test_fluent_where_decides_separators_and_negation() {
    let mut stmt = Statement::new();
    stmt.and_where("status")
        .is("active")
        .or_where("name")
        .not_like("bot%")
        .and_where("deleted_at")
        .is_null()
        .or_where_group(|g| {
            g.and_where("age").between(18i32, 30i32).or_where("vip").is(true);
        });

    let nodes = stmt.wheres().conditions();
    assert_eq!(nodes.len(), 4);
    assert_eq!(nodes[0].separator(), Separator::And);
    assert!(matches!(&nodes[1], Condition::Like { negated: true, separator: Separator::Or, .. }));
    assert!(matches!(&nodes[2], Condition::IsNull { negated: false, .. }));
    assert!(matches!(&nodes[3], Condition::Nested { separator: Separator::Or, children } if children.len() == 2));
}

#[test]
fn test_fluent_in_and_exists_helpers() {
    let mut stmt = Statement::new();
    stmt.and_where("id")
        .in_list(vec![1i64, 2, 3])
        .and_where("role_id")
        .not_in_subquery(|q| {
            q.from(["banned_roles"]).select(["id"]);
        })
        .where_not_exists(|q| {
            q.from(["locks"]).and_where("locks.user_id").is_column("users.id");
        });

    let nodes = stmt.wheres().conditions();
    assert!(matches!(&nodes[0], Condition::In { values, negated: false, .. } if values.len() == 3));
    assert!(matches!(&nodes[1], Condition::InSubquery { negated: true, .. }));
    match &nodes[2] {
        Condition::Exists { subquery, negated, .. } => {
            assert!(*negated);
            assert_eq!(subquery.statement().wheres().len(), 1);
        }
        other => panic!("unexpected node: {other:?}"),
    }
}

#[test]
fn test_fluent_having() {
    let mut stmt = Statement::new();
    stmt.and_having(Aggregate::count("id"))
        .gt(5i64)
        .or_having(Aggregate::sum("total"))
        .not_between(0i64, 10i64);

    let nodes = stmt.having().conditions();
    assert_eq!(nodes.len(), 2);
    assert!(matches!(&nodes[0], HavingCondition::Aggregate { aggregate, operator, .. } if aggregate == "COUNT(id)" && operator == ">"));
    assert!(matches!(&nodes[1], HavingCondition::Between { negated: true, separator: Separator::Or, .. }));
}
