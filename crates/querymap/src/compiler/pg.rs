use super::{Compiled, Compiler};
use crate::param::{Param, ParamList};
use crate::stmt::{
    Condition, ExprPart, Expression, HavingCondition, JoinKind, Separator, Statement, Value,
};

/// PostgreSQL compiler: `$n` placeholders, identifiers rendered verbatim.
///
/// Empty `IN` lists render as `1=0` and empty `NOT IN` lists as `1=1`. Empty nested
/// groups are dropped together with their separator.
///
/// UPDATE and DELETE have no JOIN syntax: joined tables go to `FROM` / `USING` and
/// their ON predicates are ANDed into the WHERE clause. An UPDATE without
/// assignments renders a statement that matches no rows.
#[derive(Clone, Copy, Debug, Default)]
pub struct PgCompiler;

impl Compiler for PgCompiler {
    fn select(&self, statement: &Statement) -> Compiled {
        let mut params = ParamList::new();
        let sql = select_sql(statement, &mut params);
        Compiled::new(sql, params)
    }

    fn update(&self, statement: &Statement) -> Compiled {
        let mut params = ParamList::new();
        let target = statement.tables().join(", ");

        if statement.assignments().is_empty() {
            return Compiled::new(
                format!("UPDATE {target} SET _error_no_set_fields = 1 WHERE 1=0"),
                params,
            );
        }

        let sets: Vec<String> = statement
            .assignments()
            .iter()
            .map(|a| format!("{} = {}", a.column, value_sql(&a.value, &mut params)))
            .collect();
        let mut sql = format!("UPDATE {} SET {}", target, sets.join(", "));

        let from = joined_tables(statement, statement.tables());
        if !from.is_empty() {
            sql.push_str(" FROM ");
            sql.push_str(&from.join(", "));
        }

        push_write_where(&mut sql, statement, &mut params);
        Compiled::new(sql, params)
    }

    fn delete(&self, statement: &Statement) -> Compiled {
        let mut params = ParamList::new();
        let mut sql = format!("DELETE FROM {}", statement.from().join(", "));

        let mut using: Vec<&str> = statement
            .tables()
            .iter()
            .filter(|t| !statement.from().contains(*t))
            .map(String::as_str)
            .collect();
        for table in joined_tables(statement, statement.from()) {
            if !using.contains(&table) {
                using.push(table);
            }
        }
        if !using.is_empty() {
            sql.push_str(" USING ");
            sql.push_str(&using.join(", "));
        }

        push_write_where(&mut sql, statement, &mut params);
        Compiled::new(sql, params)
    }
}

fn select_sql(statement: &Statement, params: &mut ParamList) -> String {
    let mut sql = String::from("SELECT ");
    if statement.is_distinct() {
        sql.push_str("DISTINCT ");
    }

    if statement.columns().is_empty() {
        sql.push('*');
    } else {
        let cols: Vec<String> = statement
            .columns()
            .iter()
            .map(|c| match &c.alias {
                Some(alias) => format!("{} AS {}", c.expr, alias),
                None => c.expr.clone(),
            })
            .collect();
        sql.push_str(&cols.join(", "));
    }

    sql.push_str(" FROM ");
    sql.push_str(&statement.tables().join(", "));

    for join in statement.joins() {
        sql.push(' ');
        sql.push_str(join.kind.as_sql());
        sql.push(' ');
        sql.push_str(&join.tables.join(", "));
        if join.kind != JoinKind::Cross {
            let on = conditions_sql(join.on.conditions(), params);
            if !on.is_empty() {
                sql.push_str(" ON ");
                sql.push_str(&on);
            }
        }
    }

    push_where(&mut sql, statement, params);

    if !statement.group_by().is_empty() {
        sql.push_str(" GROUP BY ");
        sql.push_str(&statement.group_by().join(", "));
    }

    let having = having_sql(statement.having().conditions(), params);
    if !having.is_empty() {
        sql.push_str(" HAVING ");
        sql.push_str(&having);
    }

    if !statement.order().is_empty() {
        let order: Vec<String> = statement
            .order()
            .iter()
            .map(|o| format!("{} {}", o.column, o.order.as_sql()))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&order.join(", "));
    }

    if let Some(limit) = statement.limit() {
        sql.push_str(&format!(" LIMIT {limit}"));
    }
    if let Some(offset) = statement.offset() {
        sql.push_str(&format!(" OFFSET {offset}"));
    }

    sql
}

fn push_where(sql: &mut String, statement: &Statement, params: &mut ParamList) {
    let wheres = conditions_sql(statement.wheres().conditions(), params);
    if !wheres.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&wheres);
    }
}

/// Joined tables not already named in `targets`, in join order.
fn joined_tables<'s>(statement: &'s Statement, targets: &[String]) -> Vec<&'s str> {
    let mut tables: Vec<&str> = Vec::new();
    for table in statement.joins().iter().flat_map(|j| j.tables.iter()) {
        if !targets.contains(table) && !tables.contains(&table.as_str()) {
            tables.push(table);
        }
    }
    tables
}

/// WHERE for UPDATE and DELETE: every ON group is ANDed in front of the WHERE
/// clause, each kept in its own nested group.
fn push_write_where(sql: &mut String, statement: &Statement, params: &mut ParamList) {
    let mut conditions: Vec<Condition> = statement
        .joins()
        .iter()
        .filter(|j| j.kind != JoinKind::Cross && !j.on.conditions().is_empty())
        .map(|j| Condition::Nested {
            children: j.on.conditions().to_vec(),
            separator: Separator::And,
        })
        .collect();

    if conditions.is_empty() {
        push_where(sql, statement, params);
        return;
    }

    let wheres = statement.wheres().conditions();
    if !wheres.is_empty() {
        conditions.push(Condition::Nested {
            children: wheres.to_vec(),
            separator: Separator::And,
        });
    }

    let rendered = conditions_sql(&conditions, params);
    if !rendered.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&rendered);
    }
}

/// Join rendered nodes with their separators, dropping the first node's separator.
fn join_fragments(fragments: Vec<(Separator, String)>) -> String {
    let mut sql = String::new();
    for (separator, fragment) in fragments.into_iter().filter(|(_, f)| !f.is_empty()) {
        if !sql.is_empty() {
            sql.push(' ');
            sql.push_str(separator.as_sql());
            sql.push(' ');
        }
        sql.push_str(&fragment);
    }
    sql
}

fn conditions_sql(conditions: &[Condition], params: &mut ParamList) -> String {
    let fragments = conditions
        .iter()
        .map(|c| (c.separator(), condition_sql(c, params)))
        .collect();
    join_fragments(fragments)
}

fn condition_sql(condition: &Condition, params: &mut ParamList) -> String {
    match condition {
        Condition::Column {
            column,
            value,
            operator,
            ..
        } => format!("{} {} {}", column, operator, value_sql(value, params)),
        Condition::Like {
            column,
            pattern,
            negated,
            ..
        } => {
            let idx = params.push_param(Param::new(pattern.clone()));
            format!("{} {}LIKE ${}", column, not(*negated), idx)
        }
        Condition::Between {
            column,
            low,
            high,
            negated,
            ..
        } => between_sql(column, low, high, *negated, params),
        Condition::In {
            column,
            values,
            negated,
            ..
        } => in_list_sql(column, values, *negated, params),
        Condition::InSubquery {
            column,
            subquery,
            negated,
            ..
        } => format!(
            "{} {}IN ({})",
            column,
            not(*negated),
            select_sql(subquery.statement(), params)
        ),
        Condition::IsNull {
            column, negated, ..
        } => format!("{} IS {}NULL", column, not(*negated)),
        Condition::Exists {
            subquery, negated, ..
        } => format!(
            "{}EXISTS ({})",
            not(*negated),
            select_sql(subquery.statement(), params)
        ),
        Condition::Nested { children, .. } => {
            let inner = conditions_sql(children, params);
            if inner.is_empty() {
                inner
            } else {
                format!("({})", inner)
            }
        }
    }
}

fn having_sql(conditions: &[HavingCondition], params: &mut ParamList) -> String {
    let fragments = conditions
        .iter()
        .map(|c| (c.separator(), having_condition_sql(c, params)))
        .collect();
    join_fragments(fragments)
}

fn having_condition_sql(condition: &HavingCondition, params: &mut ParamList) -> String {
    match condition {
        HavingCondition::Aggregate {
            aggregate,
            value,
            operator,
            ..
        } => format!("{} {} {}", aggregate, operator, value_sql(value, params)),
        HavingCondition::In {
            aggregate,
            values,
            negated,
            ..
        } => in_list_sql(aggregate, values, *negated, params),
        HavingCondition::InSubquery {
            aggregate,
            subquery,
            negated,
            ..
        } => format!(
            "{} {}IN ({})",
            aggregate,
            not(*negated),
            select_sql(subquery.statement(), params)
        ),
        HavingCondition::Between {
            aggregate,
            low,
            high,
            negated,
            ..
        } => between_sql(aggregate, low, high, *negated, params),
        HavingCondition::Nested { children, .. } => {
            let inner = having_sql(children, params);
            if inner.is_empty() {
                inner
            } else {
                format!("({})", inner)
            }
        }
    }
}

fn not(negated: bool) -> &'static str {
    if negated { "NOT " } else { "" }
}

fn between_sql(
    lhs: &str,
    low: &Param,
    high: &Param,
    negated: bool,
    params: &mut ParamList,
) -> String {
    let idx1 = params.push_param(low.clone());
    let idx2 = params.push_param(high.clone());
    format!("{} {}BETWEEN ${} AND ${}", lhs, not(negated), idx1, idx2)
}

fn in_list_sql(lhs: &str, values: &[Param], negated: bool, params: &mut ParamList) -> String {
    if values.is_empty() {
        return if negated { "1=1".to_string() } else { "1=0".to_string() };
    }
    let placeholders: Vec<String> = values
        .iter()
        .map(|v| format!("${}", params.push_param(v.clone())))
        .collect();
    format!("{} {}IN ({})", lhs, not(negated), placeholders.join(", "))
}

fn value_sql(value: &Value, params: &mut ParamList) -> String {
    match value {
        Value::Literal(param) => format!("${}", params.push_param(param.clone())),
        Value::Expression(expr) => expression_sql(expr, params),
    }
}

fn expression_sql(expr: &Expression, params: &mut ParamList) -> String {
    let parts: Vec<String> = expr
        .parts()
        .iter()
        .map(|part| match part {
            ExprPart::Column(column) => column.clone(),
            ExprPart::Op(op) => op.clone(),
            ExprPart::Value(param) => format!("${}", params.push_param(param.clone())),
            ExprPart::Group(inner) => format!("({})", expression_sql(inner, params)),
            ExprPart::Function {
                func,
                column,
                distinct,
            } => {
                let distinct = if *distinct { "DISTINCT " } else { "" };
                format!("{}({}{})", func.as_sql(), distinct, column)
            }
            ExprPart::Raw(sql) => sql.clone(),
        })
        .collect();
    parts.join(" ")
}
