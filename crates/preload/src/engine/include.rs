mod collection;
mod reference;

use crate::{loader::*, planner::IncludeFilters};
use preload_core::{
    bail, err,
    schema::{Field, FieldId, Model, Navigation, Schema},
    stmt::{ExprColumn, QuerySource, Select},
    Error, Materializer, MaterializerFactory, Result, Shaper,
};

use tracing::{debug, debug_span, trace};

/// Plans the loading of one include path.
///
/// The planner walks the path one navigation at a time. A reference
/// navigation joins its target onto the plan the walk is currently in; a
/// collection navigation starts a new plan, which becomes the current plan
/// for the remaining steps.
pub(crate) struct PlanIncludes<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) materializer: &'a dyn MaterializerFactory,
    pub(crate) exists_strategy: bool,
    pub(crate) source: QuerySource,
    pub(crate) filters: &'a IncludeFilters,
}

/// Plans built so far. Index `None` is the caller's root plan.
struct Plans<'a> {
    root: &'a mut Select,
    collections: Vec<Select>,
}

/// Where the walk currently is: a plan and the alias, in that plan, of the
/// table holding the previous navigation's target.
#[derive(Debug, Clone)]
struct Cursor {
    plan: Option<usize>,
    table: String,
}

enum Step {
    Reference {
        navigation: Navigation,
        value_buffer_offset: usize,
        key_positions: Vec<usize>,
        shaper: Shaper,
    },
    Collection {
        navigation: Navigation,
        plan: usize,
        value_buffer_offset: usize,
        shaper: Shaper,
    },
}

/// What a materializer added to a plan.
struct Materialized {
    materializer: Box<dyn Materializer>,

    /// The fields projected for the entity with their window positions.
    projected: Vec<(FieldId, usize)>,
}

impl Plans<'_> {
    fn get_mut(&mut self, plan: Option<usize>) -> &mut Select {
        match plan {
            Some(index) => &mut self.collections[index],
            None => &mut *self.root,
        }
    }
}

impl PlanIncludes<'_> {
    pub(crate) fn plan(&self, select: &mut Select, path: &[FieldId]) -> Result<Vec<RelatedLoader>> {
        let span = debug_span!("plan_includes", source = ?self.source, steps = path.len());
        let _enter = span.enter();

        let navigations = self.resolve_path(path)?;

        if navigations.is_empty() {
            return Ok(vec![]);
        }

        let Some(root) = select.table_for_source(self.source) else {
            return Err(Error::invalid_include(format!(
                "the plan has no table for {:?}",
                self.source
            )));
        };

        let mut cursor = Cursor {
            plan: None,
            table: root.alias().to_string(),
        };

        let mut plans = Plans {
            root: select,
            collections: vec![],
        };

        let mut steps = Vec::with_capacity(navigations.len());

        for navigation in navigations {
            let name = self.schema.qualified_name(navigation.field);

            let step = if navigation.collection {
                self.plan_collection(&mut plans, &mut cursor, navigation)
            } else {
                self.plan_reference(&mut plans, &mut cursor, navigation)
            };

            steps.push(step.map_err(|err| err.context(err!("include `{name}`")))?);
        }

        debug_assert!(
            plans.root.verify().is_ok(),
            "{:#?}",
            plans.root.verify()
        );

        let mut collections: Vec<_> = plans.collections.into_iter().map(Some).collect();

        steps
            .into_iter()
            .map(|step| match step {
                Step::Reference {
                    navigation,
                    value_buffer_offset,
                    key_positions,
                    shaper,
                } => Ok(RelatedLoader::Reference(ReferenceLoader::new(
                    navigation,
                    value_buffer_offset,
                    key_positions,
                    shaper,
                ))),
                Step::Collection {
                    navigation,
                    plan,
                    value_buffer_offset,
                    shaper,
                } => {
                    let Some(select) = collections[plan].take() else {
                        bail!("collection plan #{plan} claimed twice");
                    };

                    debug_assert!(select.verify().is_ok(), "{:#?}", select.verify());

                    Ok(RelatedLoader::Collection(CollectionLoader::new(
                        navigation,
                        select,
                        value_buffer_offset,
                        shaper,
                    )))
                }
            })
            .collect()
    }

    /// Resolves every field of the path to a navigation and checks the path
    /// and its filters are consistent.
    fn resolve_path(&self, path: &[FieldId]) -> Result<Vec<Navigation>> {
        let mut navigations: Vec<Navigation> = Vec::with_capacity(path.len());

        for field in path {
            let navigation = self.schema.navigation(*field)?;

            if let Some(previous) = navigations.last() {
                if previous.target != navigation.source {
                    return Err(Error::invalid_include(format!(
                        "`{}` does not start at `{}`, the target of `{}`",
                        self.schema.qualified_name(navigation.field),
                        self.schema.model(previous.target).name,
                        self.schema.qualified_name(previous.field),
                    )));
                }
            }

            navigations.push(navigation);
        }

        for field in self.filters.navigations() {
            let Some(navigation) = navigations.iter().find(|n| n.field == field) else {
                return Err(Error::invalid_include(format!(
                    "filter on `{}`, which is not part of the include path",
                    self.schema.qualified_name(field)
                )));
            };

            if !navigation.collection {
                return Err(Error::invalid_include(format!(
                    "filter on `{}`: only collection navigations can be filtered",
                    self.schema.qualified_name(field)
                )));
            }
        }

        Ok(navigations)
    }

    /// Lets the materializer add `model`'s columns, bound to `table`, to
    /// `select`.
    fn materialize(&self, model: &Model, select: &mut Select, table: &str) -> Result<Materialized> {
        let schema = self.schema;
        let value_buffer_offset = select.projection.len();
        let mut projected = vec![];
        let mut error = None;

        let mut project = |field: &Field, select: &mut Select| {
            let ty = match schema.column_type_for(field.id) {
                Ok(ty) => ty,
                Err(err) => {
                    error.get_or_insert(err);
                    return 0;
                }
            };

            let index = select.add_to_projection(ExprColumn::new(
                table,
                schema.column_name_for(field.id),
                field.id,
                ty,
            ));

            debug_assert!(index >= value_buffer_offset);
            let position = index - value_buffer_offset;
            trace!(field = %field.name.app_name, table, index, "projected column");
            projected.push((field.id, position));
            position
        };

        let materializer =
            self.materializer
                .create_materializer(schema, model, select, &mut project)?;

        if let Some(err) = error {
            return Err(err);
        }

        debug!(model = %model.name, table, columns = projected.len(), "materialized entity");

        Ok(Materialized {
            materializer,
            projected,
        })
    }
}

/// First letter of a table name, lowercased, as an alias base.
fn alias_base(table_name: &str) -> String {
    match table_name.chars().find(|c| c.is_alphabetic()) {
        Some(c) => c.to_lowercase().collect(),
        None => "t".to_string(),
    }
}
