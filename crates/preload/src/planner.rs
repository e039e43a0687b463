mod builder;
pub use builder::Builder;

mod include_filters;
pub use include_filters::IncludeFilters;

use crate::{engine::include::PlanIncludes, loader::RelatedLoader};
use preload_core::{
    schema::FieldId,
    stmt::{QuerySource, Select},
    MaterializerFactory, Result, Schema,
};

/// Plans the loading of filtered includes against a schema.
///
/// A planner holds no per-query state: one planner can serve any number of
/// plans.
pub struct Planner<'a> {
    schema: &'a Schema,
    materializer: Box<dyn MaterializerFactory + 'a>,
    exists_strategy: bool,
}

impl<'a> Planner<'a> {
    /// A planner using [`crate::ModelMaterializer`], with `EXISTS` correlation
    /// enabled.
    pub fn new(schema: &'a Schema) -> Self {
        Self::builder(schema).build()
    }

    pub fn builder(schema: &'a Schema) -> Builder<'a> {
        Builder::new(schema)
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Rewrites `select` to load the include `path`, starting at the table
    /// `select` reads for `source`.
    ///
    /// Reference navigations are joined into `select` (or into the plan of
    /// the closest preceding collection). Each collection navigation gets a
    /// plan of its own, carried by the returned loader. `filters` restrict
    /// the rows loaded for collection navigations of the path.
    ///
    /// On error, `select` may have been partially rewritten and should be
    /// discarded.
    pub fn plan_includes(
        &self,
        select: &mut Select,
        source: QuerySource,
        path: &[FieldId],
        filters: &IncludeFilters,
    ) -> Result<Vec<RelatedLoader>> {
        PlanIncludes {
            schema: self.schema,
            materializer: &*self.materializer,
            exists_strategy: self.exists_strategy,
            source,
            filters,
        }
        .plan(select, path)
    }
}

