use super::Expr;

/// `NOT <expr>`. Include filters may negate any supported predicate.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNot {
    pub expr: Box<Expr>,
}

impl Expr {
    pub fn not(expr: impl Into<Self>) -> Self {
        Self::Not(ExprNot {
            expr: Box::new(expr.into()),
        })
    }
}

impl From<ExprNot> for Expr {
    fn from(value: ExprNot) -> Self {
        Self::Not(value)
    }
}
