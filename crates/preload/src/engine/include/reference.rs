use super::{alias_base, Cursor, PlanIncludes, Plans, Step};
use crate::engine::build_join_predicate;
use preload_core::{
    bail,
    schema::Navigation,
    stmt::{Expr, Filter, Join, JoinKind, Select, TableBase, TableDerived, TableRef},
    Result,
};

use tracing::debug;

impl PlanIncludes<'_> {
    /// Joins the target of a reference navigation onto the current plan.
    pub(super) fn plan_reference(
        &self,
        plans: &mut Plans<'_>,
        cursor: &mut Cursor,
        navigation: Navigation,
    ) -> Result<Step> {
        let target = self.schema.model(navigation.target);
        let select = plans.get_mut(cursor.plan);
        let alias = select.unique_alias(&alias_base(&target.table_name));

        // A required reference from the dependent side always finds its
        // principal. Every other reference may not.
        let kind = if navigation.required && navigation.dependent_to_principal {
            JoinKind::Inner
        } else {
            JoinKind::LeftOuter
        };

        select.add_join(Join {
            kind,
            table: Box::new(
                TableBase {
                    name: target.table_name.clone(),
                    schema: target.schema.clone(),
                    alias: alias.clone(),
                    source: Some(self.source),
                }
                .into(),
            ),
            constraint: None,
        });

        let value_buffer_offset = select.projection.len();
        let filter = select.filter.clone();
        let materialized = self.materialize(target, select, &alias)?;

        // Predicates the materializer added restrict the joined table, not the
        // rows of the plan.
        if select.filter != filter {
            wrap_joined_table(select, &alias, &target.table_name, filter)?;
        }

        let constraint = {
            let (Some(current), Some(joined)) = (select.table(&cursor.table), select.table(&alias))
            else {
                bail!("table `{}` or `{alias}` missing from the plan", cursor.table);
            };

            if navigation.dependent_to_principal {
                build_join_predicate(self.schema, &navigation, current, joined, self.source)?
            } else {
                build_join_predicate(self.schema, &navigation, joined, current, self.source)?
            }
        };

        if let Some(join) = select.table_mut(&alias).and_then(TableRef::as_join_mut) {
            join.constraint = Some(constraint);
        }

        let key_positions = target
            .primary_key
            .iter()
            .filter_map(|key| {
                materialized
                    .projected
                    .iter()
                    .find(|(field, _)| field == key)
                    .map(|(_, position)| *position)
            })
            .collect();

        debug!(
            navigation = %self.schema.qualified_name(navigation.field),
            alias = %alias,
            ?kind,
            value_buffer_offset,
            "joined reference"
        );

        cursor.table = alias;

        Ok(Step::Reference {
            navigation,
            value_buffer_offset,
            key_positions,
            shaper: materialized.materializer.compile(),
        })
    }
}

/// Replaces the table joined as `alias` by a derived table reading it under
/// a fresh alias and applying the conjuncts added to `select` since
/// `original`. The derived table keeps `alias`, so columns already bound to
/// it stay valid, and `select` gets its `original` filter back.
fn wrap_joined_table(select: &mut Select, alias: &str, table_name: &str, original: Filter) -> Result<()> {
    let added: Vec<Expr> = select
        .filter
        .conjuncts()
        .iter()
        .filter(|conjunct| !original.conjuncts().contains(conjunct))
        .cloned()
        .collect();

    let inner_alias = select.unique_alias(&alias_base(table_name));

    let Some(join) = select.table_mut(alias).and_then(TableRef::as_join_mut) else {
        bail!("joined table `{alias}` missing from the plan");
    };

    let TableRef::Table(table) = &*join.table else {
        bail!("joined table `{alias}` is not a base table");
    };

    let source = table.source;

    let mut inner = Select::from_table(TableBase {
        alias: inner_alias.clone(),
        ..table.clone()
    });
    inner.project_star = true;
    inner.alias = Some(alias.to_string());

    for mut conjunct in added {
        conjunct.rehome(alias, &inner_alias);
        inner.add_filter(conjunct);
    }

    *join.table = TableDerived {
        select: Box::new(inner),
        alias: alias.to_string(),
        source,
    }
    .into();

    debug!(alias, inner_alias = %inner_alias, "wrapped joined table");

    select.filter = original;
    Ok(())
}
