use super::{alias_base, Cursor, PlanIncludes, Plans, Step};
use crate::engine::{build_join_predicate, join_predicate::resolve_column, lift_order_by, translate_filter};
use preload_core::{
    bail,
    schema::Navigation,
    stmt::{
        visit, Expr, ExprColumn, Join, JoinKind, OrderByExpr, Select, TableBase, TableDerived,
        TableRef,
    },
    Error, Result,
};

use tracing::debug;

impl PlanIncludes<'_> {
    /// Builds the plan loading the target rows of a collection navigation.
    ///
    /// The current plan is ordered by the principal key and the target plan
    /// is ordered the same way, so both result streams can be merged in one
    /// pass. The target plan is restricted to the principal rows either by an
    /// `EXISTS` subquery or by joining a distinct copy of the current plan.
    pub(super) fn plan_collection(
        &self,
        plans: &mut Plans<'_>,
        cursor: &mut Cursor,
        navigation: Navigation,
    ) -> Result<Step> {
        let schema = self.schema;
        let target = schema.model(navigation.target);
        let select = plans.get_mut(cursor.plan);

        let keys = {
            let Some(principal) = select.table(&cursor.table) else {
                bail!("principal table `{}` missing from the plan", cursor.table);
            };

            navigation
                .principal_key
                .iter()
                .map(|key| resolve_column(schema, principal, *key, self.source))
                .collect::<Result<Vec<_>>>()?
        };

        for key in keys {
            select.add_to_order_by(OrderByExpr::asc(Expr::alias(key)));
        }

        let exists = self.exists_strategy && can_correlate(select, &cursor.table, &navigation);

        let target_alias = Select::unique_alias_in(&alias_base(&target.table_name), [&*select]);

        let mut target_select = Select::from_table(TableBase {
            name: target.table_name.clone(),
            schema: target.schema.clone(),
            alias: target_alias.clone(),
            source: Some(self.source),
        });

        let value_buffer_offset = target_select.projection.len();
        let materialized = self.materialize(target, &mut target_select, &target_alias)?;

        for filter in self.filters.get(navigation.field) {
            target_select.add_filter(translate_filter(schema, target, &target_alias, filter)?);
        }

        if exists {
            self.correlate(select, &mut target_select, &cursor.table, &target_alias, &navigation)?;
        } else {
            self.join_principal(select, &mut target_select, &cursor.table, &target_alias, &navigation)?;
        }

        debug!(
            navigation = %schema.qualified_name(navigation.field),
            alias = %target_alias,
            exists,
            "planned collection"
        );

        let plan = plans.collections.len();
        plans.collections.push(target_select);

        *cursor = Cursor {
            plan: Some(plan),
            table: target_alias,
        };

        Ok(Step::Collection {
            navigation,
            plan,
            value_buffer_offset,
            shaper: materialized.materializer.compile(),
        })
    }

    /// Restricts the target plan with `EXISTS (<current plan> AND <join>)`
    /// and orders it by the foreign key columns matching the current plan's
    /// key ordering.
    fn correlate(
        &self,
        select: &Select,
        target_select: &mut Select,
        principal: &str,
        target_alias: &str,
        navigation: &Navigation,
    ) -> Result<()> {
        let schema = self.schema;

        let mut subquery = select.clone();
        subquery.clear_projection();
        subquery.clear_order_by();
        subquery.project_star = true;
        subquery.alias = None;

        let predicate = {
            let (Some(dependent), Some(principal)) =
                (target_select.table(target_alias), subquery.table(principal))
            else {
                bail!("table `{target_alias}` or `{principal}` missing from the plan");
            };

            build_join_predicate(schema, navigation, dependent, principal, self.source)?
        };

        subquery.add_filter(predicate);

        for ordering in &select.order_by {
            let foreign_key = ordering
                .expr
                .try_as_column()
                .and_then(|column| column.field)
                .and_then(|key| navigation.foreign_key_for(key));

            let Some(foreign_key) = foreign_key else {
                return Err(Error::unresolvable_column(
                    format!("foreign key matching ordering {:?}", ordering.expr),
                    target_alias,
                ));
            };

            let column = ExprColumn::new(
                target_alias,
                schema.column_name_for(foreign_key),
                foreign_key,
                schema.column_type_for(foreign_key)?,
            );

            target_select.add_to_order_by(OrderByExpr {
                expr: Expr::alias(column),
                order: ordering.order,
            });
        }

        target_select.add_filter(Expr::exists(subquery));
        Ok(())
    }

    /// Joins a distinct copy of the current plan, truncated after the last
    /// table its ordering and filter need, and orders the target plan by the
    /// copy's ordering.
    fn join_principal(
        &self,
        select: &Select,
        target_select: &mut Select,
        principal: &str,
        target_alias: &str,
        navigation: &Navigation,
    ) -> Result<()> {
        let Some(mut last) = select.position(principal) else {
            bail!("principal table `{principal}` missing from the plan");
        };

        let mut referenced = |expr: &Expr| {
            visit::for_each_expr(expr, |expr| {
                if let Expr::Column(column) = expr {
                    if let Some(position) = select.position(&column.table) {
                        last = last.max(position);
                    }
                }
            })
        };

        for ordering in &select.order_by {
            referenced(&ordering.expr);
        }

        if let Some(filter) = select.filter.as_expr() {
            referenced(filter);
        }

        let truncate_at = select.tables[last].alias().to_string();
        let mut inner = select.clone_truncated(&truncate_at);
        inner.clear_projection();
        inner.project_star = false;
        inner.distinct = true;

        let join_alias = Select::unique_alias_in("t", [&*target_select, &inner]);
        inner.alias = Some(join_alias.clone());

        lift_order_by(&mut inner, target_select, &join_alias)?;

        let derived: TableRef = TableDerived {
            select: Box::new(inner),
            alias: join_alias,
            source: None,
        }
        .into();

        let constraint = {
            let Some(dependent) = target_select.table(target_alias) else {
                bail!("table `{target_alias}` missing from the plan");
            };

            build_join_predicate(self.schema, navigation, dependent, &derived, self.source)?
        };

        target_select.add_join(Join {
            kind: JoinKind::Inner,
            table: Box::new(derived),
            constraint: Some(constraint),
        });

        Ok(())
    }
}

/// Whether the target plan can be restricted with a correlated `EXISTS`.
///
/// The current plan must be ordered by nothing but the principal key, and
/// must not depend on paging unless a filter already narrows it.
fn can_correlate(select: &Select, principal: &str, navigation: &Navigation) -> bool {
    if select.filter.is_none() && select.has_paging() {
        return false;
    }

    select.order_by.iter().all(|ordering| {
        if !ordering.expr.is_alias_with_column() {
            return false;
        }

        ordering.expr.try_as_column().is_some_and(|column| {
            column.table == principal
                && column
                    .field
                    .is_some_and(|field| navigation.principal_key.contains(&field))
        })
    })
}
