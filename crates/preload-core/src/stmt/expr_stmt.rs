use super::{Expr, Select};

/// A scalar subquery.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub select: Box<Select>,
}

impl Expr {
    pub fn stmt(select: Select) -> Self {
        ExprStmt {
            select: Box::new(select),
        }
        .into()
    }
}

impl From<ExprStmt> for Expr {
    fn from(value: ExprStmt) -> Self {
        Self::Stmt(value)
    }
}
