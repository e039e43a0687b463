use super::{ExprColumn, ExprExists, ExprStmt, Select, TableDerived, TableRef, Visit};
use crate::{Error, Result};

use std::collections::HashSet;

struct Verify {
    /// Table aliases visible from the plan being checked, innermost scope
    /// last.
    scopes: Vec<Vec<String>>,

    error: Option<Error>,
}

impl Select {
    /// Checks that the plan is well formed: no two table references share an
    /// alias, and every column reference resolves to a table reference in
    /// scope.
    pub fn verify(&self) -> Result<()> {
        self.verify_aliases_are_unique()?;

        let mut verify = Verify {
            scopes: vec![],
            error: None,
        };

        verify.verify_select(self);

        match verify.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn verify_aliases_are_unique(&self) -> Result<()> {
        let mut seen = HashSet::new();

        for alias in self.aliases() {
            if !seen.insert(alias.clone()) {
                crate::bail!("duplicate table alias `{alias}`");
            }
        }

        Ok(())
    }
}

impl Verify {
    fn verify_select(&mut self, select: &Select) {
        // Derived tables only see the enclosing scopes, not their siblings.
        for table in &select.tables {
            if let Some(derived) = table.as_derived() {
                self.verify_select(&derived.select);
            }
        }

        self.scopes.push(
            select
                .tables
                .iter()
                .map(|table| table.alias().to_string())
                .collect(),
        );

        for table in &select.tables {
            if let Some(constraint) = table.as_join().and_then(|join| join.constraint.as_ref()) {
                self.visit_expr(constraint);
            }
        }

        self.visit_filter(&select.filter);

        for projection in &select.projection {
            self.visit_expr_alias(projection);
        }

        for order_by in &select.order_by {
            self.visit_order_by_expr(order_by);
        }

        self.scopes.pop();
    }
}

impl Visit for Verify {
    fn visit_expr_column(&mut self, i: &ExprColumn) {
        if self.error.is_some() {
            return;
        }

        let resolves = self
            .scopes
            .iter()
            .any(|scope| scope.iter().any(|alias| *alias == i.table));

        if !resolves {
            let scope = self
                .scopes
                .last()
                .map(|scope| scope.join(", "))
                .unwrap_or_default();

            self.error = Some(Error::unresolvable_column(
                format!("{}.{}", i.table, i.name),
                scope,
            ));
        }
    }

    fn visit_expr_exists(&mut self, i: &ExprExists) {
        self.verify_select(&i.subquery);
    }

    fn visit_expr_stmt(&mut self, i: &ExprStmt) {
        self.verify_select(&i.select);
    }

    // Derived tables are checked by `verify_select` with their own scope.
    fn visit_table_derived(&mut self, _: &TableDerived) {}

    fn visit_table_ref(&mut self, _: &TableRef) {}
}
