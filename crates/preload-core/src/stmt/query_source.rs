use std::fmt;

/// Identifies the query clause (the "from" item of the user's query) a table
/// reference was introduced for.
///
/// Several table references may share a query source: every table the
/// include planner adds for a path is tagged with the root's source. The
/// join-predicate builder uses it to break ties between projected aliases.
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct QuerySource(pub usize);

impl fmt::Debug for QuerySource {
    fn fmt(&self, fmt: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(fmt, "QuerySource({})", self.0)
    }
}
