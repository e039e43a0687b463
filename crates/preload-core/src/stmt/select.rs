use super::{
    visit, Expr, ExprAlias, Filter, Join, Limit, OrderByExpr, QuerySource, TableBase,
    TableDerived, TableRef, Visit,
};

use std::collections::HashSet;

/// A relational query plan.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Select {
    /// The `FROM` part of the query, in join order.
    pub tables: Vec<TableRef>,

    /// Query filter
    pub filter: Filter,

    pub order_by: Vec<OrderByExpr>,

    pub limit: Option<Limit>,

    pub distinct: bool,

    /// When set, the plan selects every column of its tables and
    /// `projection` is ignored.
    pub project_star: bool,

    /// The output expressions, in order.
    pub projection: Vec<ExprAlias>,

    /// Alias of the plan when it is used as a derived table.
    pub alias: Option<String>,
}

impl Select {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a plan reading from a single base table.
    pub fn from_table(table: TableBase) -> Self {
        Self {
            tables: vec![table.into()],
            ..Self::default()
        }
    }

    pub fn add_table(&mut self, table: impl Into<TableRef>) {
        self.tables.push(table.into());
    }

    pub fn add_join(&mut self, join: Join) {
        self.tables.push(join.into());
    }

    pub fn add_filter(&mut self, filter: impl Into<Filter>) {
        self.filter.add_filter(filter);
    }

    /// Finds the top-level table reference aliased `alias`.
    pub fn table(&self, alias: &str) -> Option<&TableRef> {
        self.tables.iter().find(|table| table.alias() == alias)
    }

    pub fn table_mut(&mut self, alias: &str) -> Option<&mut TableRef> {
        self.tables.iter_mut().find(|table| table.alias() == alias)
    }

    /// Position of the top-level table reference aliased `alias`.
    pub fn position(&self, alias: &str) -> Option<usize> {
        self.tables.iter().position(|table| table.alias() == alias)
    }

    /// Returns the table reference that stands for `source` in this plan.
    ///
    /// When the plan wraps a single derived table that reads from `source`
    /// (for example a paging wrapper), the wrapper is returned. Otherwise the
    /// last table introduced for `source` is.
    pub fn table_for_source(&self, source: QuerySource) -> Option<&TableRef> {
        if let [table] = &self.tables[..] {
            if let Some(derived) = table.as_derived() {
                if derived
                    .select
                    .tables
                    .iter()
                    .any(|inner| inner.source() == Some(source))
                {
                    return Some(table);
                }
            }
        }

        self.tables
            .iter()
            .rev()
            .find(|table| table.source() == Some(source))
    }

    /// Every table alias used anywhere in the plan, including nested derived
    /// tables and subqueries.
    pub fn aliases(&self) -> Vec<String> {
        #[derive(Default)]
        struct Aliases {
            aliases: Vec<String>,
        }

        impl Visit for Aliases {
            fn visit_table_base(&mut self, i: &TableBase) {
                self.aliases.push(i.alias.clone());
            }

            fn visit_table_derived(&mut self, i: &TableDerived) {
                self.aliases.push(i.alias.clone());
                visit::visit_table_derived(self, i);
            }
        }

        let mut aliases = Aliases::default();
        aliases.visit_select(self);
        aliases.aliases
    }

    /// Returns an alias starting with `base` that is not used anywhere in the
    /// plan.
    pub fn unique_alias(&self, base: &str) -> String {
        Self::unique_alias_in(base, [self])
    }

    /// Returns an alias starting with `base` that is not used by any of
    /// `scopes`. Candidates are `base`, then `base0`, `base1`, ...
    pub fn unique_alias_in<'a>(base: &str, scopes: impl IntoIterator<Item = &'a Select>) -> String {
        let used: HashSet<String> = scopes
            .into_iter()
            .flat_map(|select| select.aliases())
            .collect();

        if !used.contains(base) {
            return base.to_string();
        }

        let mut n = 0;

        loop {
            let alias = format!("{base}{n}");

            if !used.contains(&alias) {
                return alias;
            }

            n += 1;
        }
    }

    /// Adds an expression to the projection unless an equal one is already
    /// projected. Returns the expression's projection index.
    pub fn add_to_projection(&mut self, expr: impl Into<Expr>) -> usize {
        let projection = match expr.into() {
            Expr::Alias(alias) => alias,
            expr => ExprAlias::new(expr),
        };

        self.push_projection(projection)
    }

    /// Adds an expression projected under `alias`. Returns the projection
    /// index.
    pub fn add_alias_to_projection(&mut self, alias: impl Into<String>, expr: impl Into<Expr>) -> usize {
        self.push_projection(ExprAlias::with_alias(alias, expr))
    }

    fn push_projection(&mut self, projection: ExprAlias) -> usize {
        if let Some(index) = self.projection.iter().position(|p| *p == projection) {
            return index;
        }

        self.projection.push(projection);
        self.projection.len() - 1
    }

    /// Appends an ordering unless the plan is already ordered by the same
    /// expression.
    pub fn add_to_order_by(&mut self, order_by: OrderByExpr) {
        if self
            .order_by
            .iter()
            .any(|existing| existing.expr == order_by.expr)
        {
            return;
        }

        self.order_by.push(order_by);
    }

    pub fn clear_projection(&mut self) {
        self.projection.clear();
    }

    pub fn clear_order_by(&mut self) {
        self.order_by.clear();
    }

    /// Returns `true` if the plan carries a `LIMIT` or an `OFFSET`. Both live
    /// in [`Limit`], so checking `limit` covers an offset-only plan too.
    pub fn has_paging(&self) -> bool {
        self.limit.is_some()
    }

    /// Clones the plan, keeping only the tables up to and including the one
    /// aliased `alias`.
    pub fn clone_truncated(&self, alias: &str) -> Select {
        let mut select = self.clone();

        if let Some(position) = self.position(alias) {
            select.tables.truncate(position + 1);
        }

        select.alias = None;
        select
    }
}
