use super::{ExprAlias, Join, QuerySource, Select};

/// A table reference in a plan's `FROM` list.
#[derive(Debug, Clone, PartialEq)]
pub enum TableRef {
    /// A base table
    Table(TableBase),

    /// A table joined onto the preceding ones
    Join(Join),

    /// A nested plan used as a table
    Derived(TableDerived),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableBase {
    /// Table name
    pub name: String,

    /// Database schema, if not the default one
    pub schema: Option<String>,

    pub alias: String,

    /// The query clause the table was introduced for
    pub source: Option<QuerySource>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableDerived {
    pub select: Box<Select>,

    pub alias: String,

    /// The query clause the table was introduced for
    pub source: Option<QuerySource>,
}

/// A projection visible from outside of a table reference, along with the
/// query source of the table the projected column is read from.
#[derive(Debug, Clone, Copy)]
pub struct ExposedProjection<'a> {
    pub projection: &'a ExprAlias,
    pub source: Option<QuerySource>,
}

impl TableRef {
    /// The alias other expressions use to refer to this table. Joins are
    /// referred to by the alias of their joined side.
    pub fn alias(&self) -> &str {
        match self {
            Self::Table(table) => &table.alias,
            Self::Join(join) => join.table.alias(),
            Self::Derived(table) => &table.alias,
        }
    }

    pub fn source(&self) -> Option<QuerySource> {
        match self {
            Self::Table(table) => table.source,
            Self::Join(join) => join.table.source(),
            Self::Derived(table) => table.source,
        }
    }

    /// Returns the table reference with any join wrapper removed.
    pub fn unjoined(&self) -> &TableRef {
        match self {
            Self::Join(join) => join.table.unjoined(),
            table => table,
        }
    }

    pub fn unjoined_mut(&mut self) -> &mut TableRef {
        match self {
            Self::Join(join) => join.table.unjoined_mut(),
            table => table,
        }
    }

    pub fn as_join(&self) -> Option<&Join> {
        match self {
            Self::Join(join) => Some(join),
            _ => None,
        }
    }

    pub fn as_join_mut(&mut self) -> Option<&mut Join> {
        match self {
            Self::Join(join) => Some(join),
            _ => None,
        }
    }

    pub fn as_derived(&self) -> Option<&TableDerived> {
        match self.unjoined() {
            Self::Derived(derived) => Some(derived),
            _ => None,
        }
    }

    /// The projections this table reference exposes to the plan it belongs
    /// to.
    ///
    /// A derived table exposes its projection, or, when it selects `*`, the
    /// projections exposed by each of its own tables. A base table exposes
    /// nothing: its columns are read directly.
    pub fn exposed_projections(&self) -> Vec<ExposedProjection<'_>> {
        let mut out = vec![];
        self.collect_exposed_projections(&mut out);
        out
    }

    fn collect_exposed_projections<'a>(&'a self, out: &mut Vec<ExposedProjection<'a>>) {
        match self {
            Self::Table(_) => {}
            Self::Join(join) => join.table.collect_exposed_projections(out),
            Self::Derived(derived) => {
                let select = &derived.select;

                if select.project_star {
                    for table in &select.tables {
                        table.collect_exposed_projections(out);
                    }
                } else {
                    out.extend(select.projection.iter().map(|projection| {
                        let source = projection
                            .column()
                            .and_then(|column| select.table(&column.table))
                            .and_then(TableRef::source);

                        ExposedProjection { projection, source }
                    }));
                }
            }
        }
    }
}

impl TableBase {
    pub fn new(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: None,
            alias: alias.into(),
            source: None,
        }
    }
}

impl From<TableBase> for TableRef {
    fn from(value: TableBase) -> Self {
        TableRef::Table(value)
    }
}

impl From<TableDerived> for TableRef {
    fn from(value: TableDerived) -> Self {
        TableRef::Derived(value)
    }
}
