use crate::{
    schema::{Field, Model, Schema},
    stmt::{Select, Value, ValueRecord},
    Result,
};

use std::sync::Arc;

/// Rebuilds an entity from the window of a result row that starts at the
/// entity's first projected column.
pub type Shaper = Arc<dyn Fn(&[Value]) -> Result<ValueRecord> + Send + Sync>;

/// Creates materializers for the entities the planner adds to a plan.
pub trait MaterializerFactory {
    /// Adds the columns needed to rebuild a `model` instance to `select`.
    ///
    /// `project` adds the column storing a field to the plan's projection and
    /// returns its index relative to the start of the entity's window. The
    /// factory may also conjoin predicates onto `select`, for example to
    /// restrict a table shared by several models.
    fn create_materializer(
        &self,
        schema: &Schema,
        model: &Model,
        select: &mut Select,
        project: &mut dyn FnMut(&Field, &mut Select) -> usize,
    ) -> Result<Box<dyn Materializer>>;
}

pub trait Materializer {
    /// Returns the function rebuilding entities from row windows.
    fn compile(&self) -> Shaper;
}

impl<T: MaterializerFactory + ?Sized> MaterializerFactory for Box<T> {
    fn create_materializer(
        &self,
        schema: &Schema,
        model: &Model,
        select: &mut Select,
        project: &mut dyn FnMut(&Field, &mut Select) -> usize,
    ) -> Result<Box<dyn Materializer>> {
        (**self).create_materializer(schema, model, select, project)
    }
}
