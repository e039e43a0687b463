use preload_core::stmt::{Expr, ExprColumn, Join, Select, TableBase, TableDerived, Type};

fn table(name: &str, alias: &str) -> TableBase {
    TableBase::new(name, alias)
}

fn col(table: &str, name: &str) -> ExprColumn {
    ExprColumn::new(table, name, None, Type::I64)
}

#[test]
fn well_formed_plan() {
    let mut select = Select::from_table(table("Order", "o"));
    let mut join = Join::inner(table("Customer", "c"));
    join.constraint = Some(Expr::eq(col("o", "customer_id"), col("c", "id")));
    select.add_join(join);
    select.add_to_projection(col("c", "name"));

    assert!(select.verify().is_ok());
}

#[test]
fn duplicate_alias() {
    let mut select = Select::from_table(table("Order", "o"));
    select.add_join(Join::inner(table("Customer", "o")));

    let err = select.verify().unwrap_err();
    assert_eq!(err.to_string(), "duplicate table alias `o`");
}

#[test]
fn dangling_column() {
    let mut select = Select::from_table(table("Order", "o"));
    select.add_filter(Expr::eq(col("x", "id"), 1));

    let err = select.verify().unwrap_err();
    assert!(err.is_unresolvable_column());
    assert!(err.is_defect());
}

#[test]
fn correlated_subquery_sees_outer_scope() {
    let mut subquery = Select::from_table(table("Order", "o"));
    subquery.add_filter(Expr::eq(col("l", "order_id"), col("o", "id")));

    let mut select = Select::from_table(table("OrderLine", "l"));
    select.add_filter(Expr::exists(subquery));

    assert!(select.verify().is_ok());
}

#[test]
fn derived_table_does_not_see_siblings() {
    let mut inner = Select::from_table(table("Customer", "c"));
    inner.add_filter(Expr::eq(col("o", "customer_id"), col("c", "id")));

    let mut select = Select::from_table(table("Order", "o"));
    select.add_table(TableDerived {
        select: Box::new(inner),
        alias: "t".to_string(),
        source: None,
    });

    assert!(select.verify().unwrap_err().is_unresolvable_column());
}
