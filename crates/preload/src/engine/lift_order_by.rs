use preload_core::{
    stmt::{Expr, ExprAlias, ExprColumn, OrderByExpr, Select},
    Error, Result,
};

use tracing::trace;

/// Moves the ordering of `source` onto `dest`, which joins `source` as a
/// derived table aliased `join_alias`.
///
/// Every ordering expression is projected by `source` and `dest` is ordered
/// by the projected columns, read through `join_alias`, in the same order and
/// direction. Orderings `source` cannot express by a projected name
/// (scalar subqueries, aliased columns) are rewritten onto their projection
/// so both plans sort by the same values. A column whose name clashes with
/// an earlier projection is projected under a fresh name. `source` keeps its
/// ordering only when it pages; an unpaged derived table does not need one.
pub fn lift_order_by(source: &mut Select, dest: &mut Select, join_alias: &str) -> Result<()> {
    let rewrite = source
        .order_by
        .iter()
        .any(|ordering| {
            ordering.expr.is_stmt()
                || ordering.expr.is_alias_with_column()
                || ordering.expr.is_alias_with_stmt()
        });

    let orderings = if rewrite {
        std::mem::take(&mut source.order_by)
    } else {
        source.order_by.clone()
    };

    for ordering in orderings {
        let index = match ordering.expr {
            Expr::Alias(ExprAlias { expr, alias }) => match (*expr, alias) {
                // An aliased column is read back under its alias.
                (Expr::Column(column), Some(alias)) => project_column(
                    source,
                    ExprColumn {
                        name: alias,
                        ..column
                    },
                ),
                (Expr::Column(column), None) => project_column(source, column),
                (expr, Some(alias)) => source.add_alias_to_projection(alias, expr),
                (expr, None) => {
                    let alias = generated_alias(source, join_alias);
                    source.add_alias_to_projection(alias, expr)
                }
            },
            Expr::Column(column) => project_column(source, column),
            expr => {
                let alias = generated_alias(source, join_alias);
                source.add_alias_to_projection(alias, expr)
            }
        };

        let projection = source.projection[index].clone();

        if rewrite {
            let expr = match projection.column() {
                Some(column) => Expr::Column(column.clone()),
                None => Expr::Alias(projection.clone()),
            };

            source.add_to_order_by(OrderByExpr {
                expr,
                order: ordering.order,
            });
        }

        let Some(expr) = projection.rehome(join_alias) else {
            return Err(Error::unresolvable_column(
                format!("ordering #{index}"),
                join_alias,
            ));
        };

        trace!(index, join_alias, desc = ordering.order.is_desc(), "lifted ordering");

        dest.add_to_order_by(OrderByExpr {
            expr,
            order: ordering.order,
        });
    }

    if source.limit.is_none() {
        source.clear_order_by();
    }

    Ok(())
}

fn generated_alias(source: &Select, join_alias: &str) -> String {
    format!("{join_alias}_{}", source.projection.len())
}

/// Projects `column` from `source`. Columns of different tables can share a
/// name; a column whose name is already taken by another projection is
/// projected under the first free `{name}{n}` instead, so every column of
/// the derived table stays addressable.
fn project_column(source: &mut Select, column: ExprColumn) -> usize {
    if let Some(index) = source
        .projection
        .iter()
        .position(|projection| projection.column() == Some(&column))
    {
        return index;
    }

    if !name_taken(source, &column.name) {
        return source.add_to_projection(column);
    }

    let alias = (0..)
        .map(|n| format!("{}{n}", column.name))
        .find(|candidate| !name_taken(source, candidate))
        .unwrap_or_default();

    trace!(column = %column.name, alias = %alias, "renamed clashing projection");
    source.add_alias_to_projection(alias, column)
}

fn name_taken(source: &Select, name: &str) -> bool {
    source
        .projection
        .iter()
        .any(|projection| projection.output_name() == Some(name))
}
