use super::{Expr, Select};

/// Tests whether a subquery returns any rows.
///
/// # Examples
///
/// ```text
/// exists(subquery)      // returns `true` if subquery has results
/// not_exists(subquery)  // returns `true` if subquery has no results
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ExprExists {
    /// The subquery to check.
    pub subquery: Box<Select>,

    /// When `true`, this is a "not exists" check.
    pub negated: bool,
}

impl Expr {
    pub fn exists(subquery: Select) -> Expr {
        Expr::Exists(ExprExists {
            subquery: Box::new(subquery),
            negated: false,
        })
    }

    pub fn not_exists(subquery: Select) -> Expr {
        Expr::Exists(ExprExists {
            subquery: Box::new(subquery),
            negated: true,
        })
    }

    pub fn is_exists(&self) -> bool {
        matches!(self, Self::Exists(_))
    }
}

impl From<ExprExists> for Expr {
    fn from(value: ExprExists) -> Self {
        Self::Exists(value)
    }
}
