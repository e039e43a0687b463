use super::Error;

/// Error when several projected aliases map to the same field and none of
/// them belongs to the navigation's query source.
///
/// Like [`Error::unresolvable_column`], this indicates a plan inconsistency.
#[derive(Debug)]
pub(super) struct AmbiguousColumnAlias {
    field: Box<str>,
    candidates: usize,
}

impl std::error::Error for AmbiguousColumnAlias {}

impl core::fmt::Display for AmbiguousColumnAlias {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "ambiguous column alias: {} projections match {} and none belongs to the query source",
            self.candidates, self.field
        )
    }
}

impl Error {
    /// Creates an ambiguous column alias error.
    pub fn ambiguous_column_alias(field: impl Into<String>, candidates: usize) -> Error {
        Error::from(super::ErrorKind::AmbiguousColumnAlias(AmbiguousColumnAlias {
            field: field.into().into(),
            candidates,
        }))
    }

    /// Returns `true` if this error is an ambiguous column alias error.
    pub fn is_ambiguous_column_alias(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::AmbiguousColumnAlias(_))
    }
}
