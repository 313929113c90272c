//! JOIN specifications.

use crate::stmt::condition::ConditionGroup;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Cross,
}

impl JoinKind {
    pub fn as_sql(self) -> &'static str {
        match self {
            JoinKind::Inner => "INNER JOIN",
            JoinKind::Left => "LEFT JOIN",
            JoinKind::Right => "RIGHT JOIN",
            JoinKind::Cross => "CROSS JOIN",
        }
    }
}

/// A join against one or more tables with its ON clause.
#[derive(Clone, Debug)]
pub struct JoinSpec {
    pub kind: JoinKind,
    pub tables: Vec<String>,
    pub on: ConditionGroup,
}

impl JoinSpec {
    /// Build a join, running `f` against a fresh ON group.
    pub fn build<I, S>(kind: JoinKind, tables: I, f: impl FnOnce(&mut ConditionGroup)) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut on = ConditionGroup::new();
        f(&mut on);
        Self {
            kind,
            tables: tables.into_iter().map(Into::into).collect(),
            on,
        }
    }
}
