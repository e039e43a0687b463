use super::*;

use std::fmt;

/// A node in the expression tree used for predicates, projections and
/// orderings.
///
/// Model-level nodes (`Field`, `Project`, `Func`) only appear in
/// caller-supplied include filters, before they are bound to a table. Every
/// other node is table-level.
#[derive(Clone, PartialEq)]
pub enum Expr {
    /// An expression referenced by its projected name
    Alias(ExprAlias),

    /// AND a set of boolean expressions
    And(ExprAnd),

    /// Binary expression
    BinaryOp(ExprBinaryOp),

    /// Cast an expression to a different type
    Cast(ExprCast),

    /// References a column of a table reference in scope
    Column(ExprColumn),

    /// Tests whether a subquery returns any rows
    Exists(ExprExists),

    /// References a field of the model being filtered
    Field(ExprField),

    /// Function call
    Func(ExprFunc),

    /// Negates a boolean expression
    Not(ExprNot),

    /// OR a set of boolean expressions
    Or(ExprOr),

    /// Traverse a navigation and project a field of its target
    Project(ExprProject),

    /// A scalar subquery
    Stmt(ExprStmt),

    /// Evaluates to a constant value
    Value(Value),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    /// Returns true if the expression is the `true` boolean expression
    pub fn is_true(&self) -> bool {
        matches!(self, Self::Value(Value::Bool(true)))
    }

    pub fn is_stmt(&self) -> bool {
        matches!(self, Self::Stmt(..))
    }

    /// Returns `true` if the expression is an alias wrapping a column.
    pub fn is_alias_with_column(&self) -> bool {
        match self {
            Self::Alias(alias) => alias.expr.is_column(),
            _ => false,
        }
    }

    /// Returns `true` if the expression is an alias wrapping a scalar
    /// subquery.
    pub fn is_alias_with_stmt(&self) -> bool {
        match self {
            Self::Alias(alias) => alias.expr.is_stmt(),
            _ => false,
        }
    }

    /// Returns the column this expression refers to, looking through one
    /// level of aliasing.
    pub fn try_as_column(&self) -> Option<&ExprColumn> {
        match self {
            Self::Column(column) => Some(column),
            Self::Alias(alias) => match &*alias.expr {
                Self::Column(column) => Some(column),
                _ => None,
            },
            _ => None,
        }
    }

    /// The type of the expression, when it can be determined without a
    /// schema.
    pub fn ty(&self) -> Option<Type> {
        match self {
            Self::Alias(alias) => alias.expr.ty(),
            Self::Cast(cast) => Some(cast.ty.clone()),
            Self::Column(column) => Some(column.ty.clone()),
            Self::Value(value) => value.ty(),
            Self::Stmt(stmt) => stmt
                .select
                .projection
                .first()
                .and_then(|projection| projection.expr.ty()),
            Self::And(_) | Self::Or(_) | Self::Not(_) | Self::BinaryOp(_) | Self::Exists(_) => {
                Some(Type::Bool)
            }
            _ => None,
        }
    }

    /// Returns the conjuncts of the expression: the operands of a top-level
    /// `AND`, or the expression itself.
    pub fn conjuncts(&self) -> &[Expr] {
        match self {
            Self::And(expr_and) => &expr_and.operands,
            expr => std::slice::from_ref(expr),
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Value(Value::Null))
    }

    /// Rewrite every column bound to table alias `from` so it is bound to
    /// `to` instead.
    pub fn rehome(&mut self, from: &str, to: &str) {
        struct Rehome<'a> {
            from: &'a str,
            to: &'a str,
        }

        impl VisitMut for Rehome<'_> {
            fn visit_expr_column_mut(&mut self, i: &mut ExprColumn) {
                if i.table == self.from {
                    i.table = self.to.to_string();
                }
            }
        }

        Rehome { from, to }.visit_expr_mut(self);
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::default())
    }
}

// === Conversions ===

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(Value::from(value))
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl From<String> for Expr {
    fn from(value: String) -> Self {
        Self::Value(value.into())
    }
}

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias(e) => e.fmt(f),
            Self::And(e) => e.fmt(f),
            Self::BinaryOp(e) => e.fmt(f),
            Self::Cast(e) => e.fmt(f),
            Self::Column(e) => e.fmt(f),
            Self::Exists(e) => e.fmt(f),
            Self::Field(e) => e.fmt(f),
            Self::Func(e) => e.fmt(f),
            Self::Not(e) => e.fmt(f),
            Self::Or(e) => e.fmt(f),
            Self::Project(e) => e.fmt(f),
            Self::Stmt(e) => e.fmt(f),
            Self::Value(e) => e.fmt(f),
        }
    }
}
