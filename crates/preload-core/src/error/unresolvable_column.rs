use super::Error;

/// Error when a field cannot be mapped to any column reference in the
/// current plan scope.
///
/// This is a defect: the metadata and the plan disagree. It is never caused
/// by caller input and must not be recovered from.
#[derive(Debug)]
pub(super) struct UnresolvableColumn {
    field: Box<str>,
    scope: Box<str>,
}

impl std::error::Error for UnresolvableColumn {}

impl core::fmt::Display for UnresolvableColumn {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unresolvable column: {} in scope `{}`",
            self.field, self.scope
        )
    }
}

impl Error {
    /// Creates an unresolvable column error for `field` looked up in the table
    /// reference aliased `scope`.
    pub fn unresolvable_column(field: impl Into<String>, scope: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnresolvableColumn(UnresolvableColumn {
            field: field.into().into(),
            scope: scope.into().into(),
        }))
    }

    /// Returns `true` if this error is an unresolvable column error.
    pub fn is_unresolvable_column(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnresolvableColumn(_))
    }
}
