use super::{Expr, TableRef};

/// A table joined onto a plan.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub kind: JoinKind,

    /// The joined side
    pub table: Box<TableRef>,

    /// The `ON` predicate. Unset until the join predicate has been built.
    pub constraint: Option<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    Inner,
    LeftOuter,
}

impl Join {
    pub fn inner(table: impl Into<TableRef>) -> Self {
        Self {
            kind: JoinKind::Inner,
            table: Box::new(table.into()),
            constraint: None,
        }
    }

    pub fn left_outer(table: impl Into<TableRef>) -> Self {
        Self {
            kind: JoinKind::LeftOuter,
            table: Box::new(table.into()),
            constraint: None,
        }
    }
}

impl From<Join> for TableRef {
    fn from(value: Join) -> Self {
        TableRef::Join(value)
    }
}
