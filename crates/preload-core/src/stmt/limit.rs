use super::Expr;

/// `LIMIT` and / or `OFFSET`. At least one of the two is set; a plan without
/// paging has no `Limit` at all.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub limit: Option<Expr>,
    pub offset: Option<Expr>,
}

impl Limit {
    pub fn limit(limit: impl Into<Expr>) -> Self {
        Self {
            limit: Some(limit.into()),
            offset: None,
        }
    }

    pub fn offset(offset: impl Into<Expr>) -> Self {
        Self {
            limit: None,
            offset: Some(offset.into()),
        }
    }

    pub fn with_offset(mut self, offset: impl Into<Expr>) -> Self {
        self.offset = Some(offset.into());
        self
    }
}
