use super::Error;

/// Error when a caller-supplied include filter uses an expression shape the
/// filter translator cannot bind to the related table.
///
/// This occurs when:
/// - The filter calls a function
/// - The filter traverses a navigation (`order.customer.name`)
/// - The filter references a field of a model other than the include target
///
/// The condition is never dropped or approximated; planning of the whole
/// include path fails instead.
#[derive(Debug)]
pub(super) struct UnsupportedFilterExpression {
    message: Box<str>,
}

impl std::error::Error for UnsupportedFilterExpression {}

impl core::fmt::Display for UnsupportedFilterExpression {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unsupported filter expression: {}", self.message)
    }
}

impl Error {
    /// Creates an unsupported filter expression error.
    pub fn unsupported_filter_expression(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnsupportedFilterExpression(
            UnsupportedFilterExpression {
                message: message.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported filter expression error.
    pub fn is_unsupported_filter_expression(&self) -> bool {
        matches!(
            self.kind(),
            super::ErrorKind::UnsupportedFilterExpression(_)
        )
    }
}
