use preload_core::{schema::FieldId, stmt::Expr};

use indexmap::IndexMap;

/// Predicates restricting the rows loaded for collection navigations.
///
/// Predicates are written against the fields of the navigation's target
/// model with [`Expr::Field`] references. All predicates added for a
/// navigation apply, in the order they were added.
#[derive(Debug, Default, Clone)]
pub struct IncludeFilters {
    filters: IndexMap<FieldId, Vec<Expr>>,
}

impl IncludeFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, navigation: FieldId, filter: impl Into<Expr>) -> &mut Self {
        self.filters.entry(navigation).or_default().push(filter.into());
        self
    }

    /// The predicates added for `navigation`.
    pub fn get(&self, navigation: FieldId) -> &[Expr] {
        self.filters
            .get(&navigation)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// The navigations with at least one predicate, in insertion order.
    pub fn navigations(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.filters.keys().copied()
    }
}
