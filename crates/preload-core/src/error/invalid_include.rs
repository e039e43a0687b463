use super::Error;

/// Error when an include path is malformed.
///
/// This occurs when:
/// - A path step is not a relation field
/// - A path step does not start from the model reached by the previous step
/// - Filters are attached to a navigation that is not part of the path, or
///   to a single-valued navigation
/// - The base plan has no table for the query source
#[derive(Debug)]
pub(super) struct InvalidInclude {
    message: Box<str>,
}

impl std::error::Error for InvalidInclude {}

impl core::fmt::Display for InvalidInclude {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid include: {}", self.message)
    }
}

impl Error {
    /// Creates an invalid include error.
    pub fn invalid_include(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidInclude(InvalidInclude {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is an invalid include error.
    pub fn is_invalid_include(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::InvalidInclude(_))
    }
}
