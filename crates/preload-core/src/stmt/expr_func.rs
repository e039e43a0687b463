use super::Expr;

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprFunc {
    /// The function name
    pub name: String,

    /// Call arguments
    pub args: Vec<Expr>,
}

impl Expr {
    pub fn func(name: impl Into<String>, args: Vec<Expr>) -> Self {
        ExprFunc {
            name: name.into(),
            args,
        }
        .into()
    }
}

impl From<ExprFunc> for Expr {
    fn from(value: ExprFunc) -> Self {
        Self::Func(value)
    }
}
