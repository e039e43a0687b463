use preload_core::{
    schema::Navigation,
    stmt::{Select, Value, ValueRecord},
    Error, Generate, QueryText, Result, Shaper,
};

use std::fmt;

/// Loads the entities of one include step from query results.
///
/// Loaders are produced by [`crate::Planner::plan_includes`], one per
/// navigation of the include path, in path order.
#[derive(Debug, Clone)]
pub enum RelatedLoader {
    /// The target was joined into an existing plan and is read from a window
    /// of that plan's rows.
    Reference(ReferenceLoader),

    /// The target is read by a plan of its own.
    Collection(CollectionLoader),
}

#[derive(Clone)]
pub struct ReferenceLoader {
    navigation: Navigation,
    value_buffer_offset: usize,

    /// Window positions of the target's primary key columns
    key_positions: Vec<usize>,

    shaper: Shaper,
}

#[derive(Clone)]
pub struct CollectionLoader {
    navigation: Navigation,
    select: Select,
    value_buffer_offset: usize,
    shaper: Shaper,
}

impl RelatedLoader {
    pub fn navigation(&self) -> &Navigation {
        match self {
            Self::Reference(loader) => &loader.navigation,
            Self::Collection(loader) => &loader.navigation,
        }
    }

    pub fn value_buffer_offset(&self) -> usize {
        match self {
            Self::Reference(loader) => loader.value_buffer_offset,
            Self::Collection(loader) => loader.value_buffer_offset,
        }
    }

    pub fn as_reference(&self) -> Option<&ReferenceLoader> {
        match self {
            Self::Reference(loader) => Some(loader),
            _ => None,
        }
    }

    pub fn as_collection(&self) -> Option<&CollectionLoader> {
        match self {
            Self::Collection(loader) => Some(loader),
            _ => None,
        }
    }

    #[track_caller]
    pub fn expect_reference(&self) -> &ReferenceLoader {
        match self {
            Self::Reference(loader) => loader,
            _ => panic!("expected reference loader; actual={self:#?}"),
        }
    }

    #[track_caller]
    pub fn expect_collection(&self) -> &CollectionLoader {
        match self {
            Self::Collection(loader) => loader,
            _ => panic!("expected collection loader; actual={self:#?}"),
        }
    }
}

impl ReferenceLoader {
    pub(crate) fn new(
        navigation: Navigation,
        value_buffer_offset: usize,
        key_positions: Vec<usize>,
        shaper: Shaper,
    ) -> Self {
        Self {
            navigation,
            value_buffer_offset,
            key_positions,
            shaper,
        }
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Index of the target's first column in the rows of the plan the target
    /// was joined into.
    pub fn value_buffer_offset(&self) -> usize {
        self.value_buffer_offset
    }

    /// Reads the joined entity from a row of the plan it was joined into.
    ///
    /// Returns `None` when the join found no match, i.e. every key column of
    /// the entity is null.
    pub fn load(&self, row: &[Value]) -> Result<Option<ValueRecord>> {
        let window = window(row, self.value_buffer_offset)?;

        let unmatched = !self.key_positions.is_empty()
            && self
                .key_positions
                .iter()
                .all(|position| window.get(*position).map_or(true, Value::is_null));

        if unmatched {
            return Ok(None);
        }

        (self.shaper)(window).map(Some)
    }
}

impl CollectionLoader {
    pub(crate) fn new(
        navigation: Navigation,
        select: Select,
        value_buffer_offset: usize,
        shaper: Shaper,
    ) -> Self {
        Self {
            navigation,
            select,
            value_buffer_offset,
            shaper,
        }
    }

    pub fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// The plan reading the target rows.
    pub fn select(&self) -> &Select {
        &self.select
    }

    pub fn value_buffer_offset(&self) -> usize {
        self.value_buffer_offset
    }

    pub fn to_query_text(&self, generator: &dyn Generate) -> Result<QueryText> {
        generator.generate(&self.select)
    }

    /// Reads one target entity per row, in row order.
    pub fn load<'a>(&self, rows: impl IntoIterator<Item = &'a [Value]>) -> Result<Vec<ValueRecord>> {
        rows.into_iter()
            .map(|row| (self.shaper)(window(row, self.value_buffer_offset)?))
            .collect()
    }
}

fn window(row: &[Value], offset: usize) -> Result<&[Value]> {
    row.get(offset..).ok_or_else(|| {
        Error::invalid_result(format!(
            "row has {} values but the entity starts at {offset}",
            row.len()
        ))
    })
}

impl fmt::Debug for ReferenceLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReferenceLoader")
            .field("navigation", &self.navigation)
            .field("value_buffer_offset", &self.value_buffer_offset)
            .field("key_positions", &self.key_positions)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for CollectionLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CollectionLoader")
            .field("navigation", &self.navigation)
            .field("select", &self.select)
            .field("value_buffer_offset", &self.value_buffer_offset)
            .finish_non_exhaustive()
    }
}
