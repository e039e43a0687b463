use std::fmt;

/// The type of a column or expression, from the planner's point of view.
///
/// Only the distinction that matters for predicate construction is modeled
/// precisely: whether a value can be null. Comparing a nullable column with a
/// non-nullable one requires coercing the non-nullable side.
#[derive(Clone, PartialEq, Eq)]
pub enum Type {
    /// Boolean value
    Bool,

    /// Signed 32-bit integer
    I32,

    /// Signed 64-bit integer
    I64,

    /// String type
    String,

    /// The inner type, or null.
    Nullable(Box<Type>),
}

impl Type {
    /// Returns the nullable form of this type. Already nullable types are
    /// returned unchanged.
    pub fn nullable(self) -> Self {
        match self {
            Self::Nullable(_) => self,
            ty => Self::Nullable(Box::new(ty)),
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable(_))
    }

    /// The type with any nullability stripped.
    pub fn non_nullable(&self) -> &Type {
        match self {
            Self::Nullable(ty) => ty.non_nullable(),
            ty => ty,
        }
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => f.write_str("Bool"),
            Self::I32 => f.write_str("I32"),
            Self::I64 => f.write_str("I64"),
            Self::String => f.write_str("String"),
            Self::Nullable(ty) => write!(f, "{ty:?}?"),
        }
    }
}
