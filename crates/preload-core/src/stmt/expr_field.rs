use super::Expr;
use crate::schema::FieldId;

/// References a field of the model an include filter applies to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprField {
    pub field: FieldId,
}

impl Expr {
    pub fn field(field: impl Into<FieldId>) -> Self {
        ExprField {
            field: field.into(),
        }
        .into()
    }
}

impl From<ExprField> for Expr {
    fn from(value: ExprField) -> Self {
        Self::Field(value)
    }
}
