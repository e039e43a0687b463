use super::{Expr, Type};
use crate::schema::FieldId;

/// A reference to a column of a table reference in the current plan scope.
///
/// The column is bound to its table by alias. A column is only meaningful in
/// the plan that owns the aliased table reference (or in a subquery nested in
/// it); moving it to another scope requires rebinding it with
/// [`Expr::rehome`] or [`super::ExprAlias::rehome`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExprColumn {
    /// Alias of the table reference the column is read from.
    pub table: String,

    /// The emitted column name.
    pub name: String,

    /// The model field the column stores, when known.
    pub field: Option<FieldId>,

    /// Column type, including nullability.
    pub ty: Type,
}

impl ExprColumn {
    pub fn new(
        table: impl Into<String>,
        name: impl Into<String>,
        field: impl Into<Option<FieldId>>,
        ty: Type,
    ) -> Self {
        Self {
            table: table.into(),
            name: name.into(),
            field: field.into(),
            ty,
        }
    }
}

impl Expr {
    pub fn column(column: impl Into<ExprColumn>) -> Self {
        column.into().into()
    }

    pub fn is_column(&self) -> bool {
        matches!(self, Self::Column(_))
    }
}

impl From<ExprColumn> for Expr {
    fn from(value: ExprColumn) -> Self {
        Self::Column(value)
    }
}
