use super::Expr;
use crate::schema::FieldId;

/// Projects a field out of the model reached through `base`.
///
/// `order.customer.name` is `Project { base: Field(customer), field: name }`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprProject {
    pub base: Box<Expr>,
    pub field: FieldId,
}

impl Expr {
    pub fn project(base: impl Into<Expr>, field: impl Into<FieldId>) -> Self {
        ExprProject {
            base: Box::new(base.into()),
            field: field.into(),
        }
        .into()
    }
}

impl From<ExprProject> for Expr {
    fn from(value: ExprProject) -> Self {
        Self::Project(value)
    }
}
