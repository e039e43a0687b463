use super::{Comma, Ident, Params, ToSql};

use preload_core::stmt::{
    ExprAlias, Join, JoinKind, Limit, OrderByExpr, Select, TableBase, TableRef,
};

/// The `FROM` list of a plan: joins attach to the preceding tables, other
/// tables are comma separated.
struct Tables<'a>(&'a [TableRef]);

impl ToSql for &Select {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, "SELECT ");

        if self.distinct {
            fmt!(f, "DISTINCT ");
        }

        if self.project_star {
            fmt!(f, "*");
        } else if self.projection.is_empty() {
            fmt!(f, "1");
        } else {
            fmt!(f, Comma(&self.projection));
        }

        if !self.tables.is_empty() {
            fmt!(f, " FROM ", Tables(&self.tables));
        }

        if let Some(filter) = self.filter.as_expr() {
            fmt!(f, " WHERE ", filter);
        }

        if !self.order_by.is_empty() {
            fmt!(f, " ORDER BY ", Comma(&self.order_by));
        }

        if let Some(limit) = &self.limit {
            fmt!(f, limit);
        }
    }
}

impl ToSql for Tables<'_> {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        for (i, table) in self.0.iter().enumerate() {
            match table {
                TableRef::Join(join) if i > 0 => fmt!(f, " ", join),
                table if i > 0 => fmt!(f, ", ", table),
                table => fmt!(f, table),
            }
        }
    }
}

impl ToSql for &TableRef {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match self {
            TableRef::Table(table) => fmt!(f, table),
            TableRef::Join(join) => fmt!(f, &*join.table),
            TableRef::Derived(derived) => {
                fmt!(f, "(", &*derived.select, ") AS ", Ident(&derived.alias))
            }
        }
    }
}

impl ToSql for &TableBase {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        if let Some(schema) = &self.schema {
            fmt!(f, Ident(schema), ".");
        }

        fmt!(f, Ident(&self.name), " AS ", Ident(&self.alias));
    }
}

impl ToSql for &Join {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let kind = match self.kind {
            JoinKind::Inner => "INNER JOIN ",
            JoinKind::LeftOuter => "LEFT JOIN ",
        };

        fmt!(f, kind, &*self.table);

        match &self.constraint {
            Some(constraint) => fmt!(f, " ON ", constraint),
            None => fmt!(f, " ON 1 = 1"),
        }
    }
}

/// A projected expression, named when it has an alias.
impl ToSql for &ExprAlias {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        fmt!(f, &*self.expr);

        if let Some(alias) = &self.alias {
            fmt!(f, " AS ", Ident(alias));
        }
    }
}

impl ToSql for &OrderByExpr {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        let direction = if self.order.is_desc() { " DESC" } else { " ASC" };
        fmt!(f, &self.expr, direction);
    }
}

impl ToSql for &Limit {
    fn to_sql<P: Params>(self, f: &mut super::Formatter<'_, P>) {
        match &self.limit {
            Some(limit) => fmt!(f, " LIMIT ", limit),
            // An offset needs a limit outside of PostgreSQL
            None if self.offset.is_some() && f.serializer.is_mysql() => {
                fmt!(f, " LIMIT 18446744073709551615")
            }
            None if self.offset.is_some() && f.serializer.is_sqlite() => fmt!(f, " LIMIT -1"),
            None => {}
        }

        if let Some(offset) = &self.offset {
            fmt!(f, " OFFSET ", offset);
        }
    }
}
