use super::Expr;

/// The `WHERE` clause of a plan.
///
/// Filters only ever grow: [`Filter::add_filter`] conjoins the new predicate
/// onto the existing one and never replaces it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Filter {
    pub expr: Option<Expr>,
}

impl Filter {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self {
            expr: Some(expr.into()),
        }
    }

    pub fn add_filter(&mut self, filter: impl Into<Filter>) {
        match (self.expr.take(), filter.into().expr) {
            (Some(expr), Some(other)) => {
                self.expr = Some(Expr::and(expr, other));
            }
            (Some(expr), None) => {
                self.expr = Some(expr);
            }
            (_, other) => {
                self.expr = other;
            }
        }
    }

    pub fn is_some(&self) -> bool {
        self.expr.is_some()
    }

    pub fn is_none(&self) -> bool {
        self.expr.is_none()
    }

    pub fn as_expr(&self) -> Option<&Expr> {
        self.expr.as_ref()
    }

    /// The top-level conjuncts of the predicate, in composition order.
    pub fn conjuncts(&self) -> &[Expr] {
        match &self.expr {
            Some(expr) => expr.conjuncts(),
            None => &[],
        }
    }
}

impl<T> From<T> for Filter
where
    Expr: From<T>,
{
    fn from(value: T) -> Self {
        Filter {
            expr: Some(value.into()),
        }
    }
}

impl From<Option<Expr>> for Filter {
    fn from(expr: Option<Expr>) -> Self {
        Filter { expr }
    }
}
