use super::{Expr, Type};

/// Converts an expression to another type.
///
/// Join predicates use it to compare a nullable key column with a
/// non-nullable one: the non-nullable side is cast to the nullable type.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprCast {
    pub expr: Box<Expr>,

    /// The target type, nullability included
    pub ty: Type,
}

impl Expr {
    pub fn cast(expr: impl Into<Self>, ty: impl Into<Type>) -> Self {
        Self::Cast(ExprCast {
            expr: Box::new(expr.into()),
            ty: ty.into(),
        })
    }
}

impl From<ExprCast> for Expr {
    fn from(value: ExprCast) -> Self {
        Self::Cast(value)
    }
}
