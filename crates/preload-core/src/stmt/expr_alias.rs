use super::{Expr, ExprColumn};

/// An expression paired with an optional output name.
///
/// Projections are lists of `ExprAlias`. Predicates and orderings use
/// `Expr::Alias` when an expression has to be referenced by its projected
/// name rather than recomputed.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprAlias {
    /// The aliased expression
    pub expr: Box<Expr>,

    /// The output name. When `None`, a column keeps its own name.
    pub alias: Option<String>,
}

impl ExprAlias {
    pub fn new(expr: impl Into<Expr>) -> Self {
        Self {
            expr: Box::new(expr.into()),
            alias: None,
        }
    }

    pub fn with_alias(alias: impl Into<String>, expr: impl Into<Expr>) -> Self {
        Self {
            expr: Box::new(expr.into()),
            alias: Some(alias.into()),
        }
    }

    /// The column wrapped by this alias, if any.
    pub fn column(&self) -> Option<&ExprColumn> {
        match &*self.expr {
            Expr::Column(column) => Some(column),
            _ => None,
        }
    }

    /// The name under which the expression is visible from outside of the
    /// projecting plan: the alias, else the wrapped column's name.
    pub fn output_name(&self) -> Option<&str> {
        self.alias
            .as_deref()
            .or_else(|| self.column().map(|column| column.name.as_str()))
    }

    /// Returns an expression reading this projection from the derived table
    /// aliased `table`.
    ///
    /// The result is an alias-wrapped column named by the projection's output
    /// name and carrying the same field identity and type.
    pub fn rehome(&self, table: &str) -> Option<Expr> {
        let name = self.output_name()?;
        let ty = self.expr.ty()?;
        let field = self.column().and_then(|column| column.field);

        Some(Expr::Alias(ExprAlias::new(ExprColumn {
            table: table.to_string(),
            name: name.to_string(),
            field,
            ty,
        })))
    }
}

impl Expr {
    pub fn alias(expr: impl Into<Expr>) -> Self {
        ExprAlias::new(expr).into()
    }
}

impl From<ExprAlias> for Expr {
    fn from(value: ExprAlias) -> Self {
        Self::Alias(value)
    }
}

impl From<ExprColumn> for ExprAlias {
    fn from(value: ExprColumn) -> Self {
        Self::new(value)
    }
}
