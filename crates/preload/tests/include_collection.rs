mod support;

use preload::{
    stmt::{
        Expr, ExprAlias, ExprColumn, JoinKind, Limit, OrderByExpr, Select, TableBase, TableDerived,
        TableRef, Type,
    },
    IncludeFilters, Planner,
};
use support::*;

use pretty_assertions::assert_eq;

fn lines_of_orders(planner: &Planner<'_>, select: &mut Select, filters: &IncludeFilters) -> Select {
    let schema = planner.schema();
    let path = [field(schema, "Order", "lines")];

    let loaders = planner
        .plan_includes(select, SOURCE, &path, filters)
        .unwrap();

    assert_eq!(loaders.len(), 1);
    let loader = loaders[0].expect_collection();
    assert_eq!(loader.value_buffer_offset(), 0);
    loader.select().clone()
}

#[test]
fn unordered_root_is_correlated_with_exists() {
    init_tracing();
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    // The root is ordered by its key so the two streams line up
    assert_eq!(
        select.order_by,
        vec![OrderByExpr::asc(Expr::alias(column(&schema, "o", "Order", "id")))]
    );

    assert_eq!(
        lines.tables,
        vec![TableRef::Table(TableBase {
            source: Some(SOURCE),
            ..TableBase::new("order_lines", "o0")
        })]
    );
    assert_eq!(lines.projection.len(), 4);

    let mut subquery = root(&schema, "Order", "o");
    subquery.clear_projection();
    subquery.project_star = true;
    subquery.add_filter(Expr::eq(
        column(&schema, "o0", "OrderLine", "order_id"),
        column(&schema, "o", "Order", "id"),
    ));
    assert_eq!(lines.filter.as_expr(), Some(&Expr::exists(subquery)));

    // Lines are ordered by the foreign key matching the root's key ordering
    assert_eq!(
        lines.order_by,
        vec![OrderByExpr::asc(Expr::alias(column(
            &schema,
            "o0",
            "OrderLine",
            "order_id"
        )))]
    );

    lines.verify().unwrap();
    select.verify().unwrap();
}

#[test]
fn filters_precede_the_correlation() {
    let schema = shop();
    let planner = Planner::new(&schema);
    let quantity = field(&schema, "OrderLine", "quantity");
    let id = field(&schema, "OrderLine", "id");

    let mut filters = IncludeFilters::new();
    filters
        .add(field(&schema, "Order", "lines"), Expr::gt(Expr::field(quantity), 1i32))
        .add(field(&schema, "Order", "lines"), Expr::ne(Expr::field(id), 7i64));

    let mut select = root(&schema, "Order", "o");
    let lines = lines_of_orders(&planner, &mut select, &filters);

    let conjuncts = lines.filter.conjuncts();
    assert_eq!(conjuncts.len(), 3);
    assert_eq!(
        conjuncts[0],
        Expr::gt(Expr::alias(column(&schema, "o0", "OrderLine", "quantity")), 1i32)
    );
    assert_eq!(
        conjuncts[1],
        Expr::ne(Expr::alias(column(&schema, "o0", "OrderLine", "id")), 7i64)
    );
    assert!(conjuncts[2].is_exists());

    lines.verify().unwrap();
}

/// Checks `lines` joins a distinct copy of the root aliased `t` and returns
/// that copy.
fn hoisted_principal(lines: &Select) -> &Select {
    let Some(TableRef::Join(join)) = lines.tables.get(1) else {
        panic!("expected the principal to be joined; actual={lines:#?}");
    };
    assert_eq!(join.kind, JoinKind::Inner);

    let TableRef::Derived(TableDerived { select, alias, .. }) = &*join.table else {
        panic!("expected a derived principal; actual={:#?}", join.table);
    };
    assert_eq!(alias, "t");
    assert!(select.distinct);
    select
}

#[test]
fn paged_root_is_joined_as_a_distinct_copy() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    select.limit = Some(Limit::limit(10i64));

    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    assert!(lines.filter.is_none());

    let principal = hoisted_principal(&lines);
    assert_eq!(principal.limit, Some(Limit::limit(10i64)));
    assert_eq!(
        principal.projection,
        vec![ExprAlias::from(column(&schema, "o", "Order", "id"))]
    );
    // Paged, so the copy keeps its ordering
    assert_eq!(
        principal.order_by,
        vec![OrderByExpr::asc(column(&schema, "o", "Order", "id"))]
    );

    let Some(TableRef::Join(join)) = lines.tables.get(1) else {
        unreachable!()
    };
    assert_eq!(
        join.constraint,
        Some(Expr::eq(
            column(&schema, "o0", "OrderLine", "order_id"),
            column(&schema, "t", "Order", "id"),
        ))
    );

    assert_eq!(
        lines.order_by,
        vec![OrderByExpr::asc(Expr::alias(column(&schema, "t", "Order", "id")))]
    );

    lines.verify().unwrap();
}

#[test]
fn filtered_paged_root_still_uses_exists() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    select.limit = Some(Limit::limit(10i64));
    select.add_filter(Expr::eq(column(&schema, "o", "Order", "number"), "A-1"));

    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    assert!(lines.filter.as_expr().is_some_and(Expr::is_exists));
}

#[test]
fn ordering_on_other_columns_is_lifted() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    select.order_by = vec![OrderByExpr::desc(Expr::alias(column(
        &schema, "o", "Order", "number",
    )))];

    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    // The root keeps its ordering, completed with its key
    assert_eq!(
        select.order_by,
        vec![
            OrderByExpr::desc(Expr::alias(column(&schema, "o", "Order", "number"))),
            OrderByExpr::asc(Expr::alias(column(&schema, "o", "Order", "id"))),
        ]
    );

    let principal = hoisted_principal(&lines);
    assert!(principal.order_by.is_empty());
    assert_eq!(principal.projection.len(), 2);

    // ... and the lines are sorted the same way
    assert_eq!(
        lines.order_by,
        vec![
            OrderByExpr::desc(Expr::alias(column(&schema, "t", "Order", "number"))),
            OrderByExpr::asc(Expr::alias(column(&schema, "t", "Order", "id"))),
        ]
    );

    lines.verify().unwrap();
}

#[test]
fn hoisted_copy_keeps_same_named_keys_apart() {
    let schema = shop();
    let planner = Planner::new(&schema);

    // Orders by id, their customer, and every order of that customer
    let mut select = root(&schema, "Order", "o");
    select.add_to_order_by(OrderByExpr::asc(Expr::alias(column(&schema, "o", "Order", "id"))));

    let path = [
        field(&schema, "Order", "customer"),
        field(&schema, "Customer", "orders"),
    ];
    let loaders = planner
        .plan_includes(&mut select, SOURCE, &path, &IncludeFilters::new())
        .unwrap();
    let orders = loaders[1].expect_collection().select();

    // o.id and c.id both read as `id`; the customer key gets its own name
    let customer_id = column(&schema, "c", "Customer", "id");
    let principal = hoisted_principal(orders);
    assert_eq!(
        principal.projection,
        vec![
            ExprAlias::from(column(&schema, "o", "Order", "id")),
            ExprAlias::with_alias("id0", customer_id.clone()),
        ]
    );

    let rehomed = |name: &str, column: ExprColumn| ExprColumn {
        table: "t".to_string(),
        name: name.to_string(),
        ..column
    };

    let Some(TableRef::Join(join)) = orders.tables.get(1) else {
        unreachable!()
    };
    assert_eq!(
        join.constraint,
        Some(Expr::eq(
            column(&schema, "o0", "Order", "customer_id"),
            rehomed("id0", customer_id.clone()),
        ))
    );

    assert_eq!(
        orders.order_by,
        vec![
            OrderByExpr::asc(Expr::alias(column(&schema, "t", "Order", "id"))),
            OrderByExpr::asc(Expr::alias(rehomed("id0", customer_id))),
        ]
    );

    orders.verify().unwrap();
}

#[test]
fn exists_strategy_can_be_disabled() {
    let schema = shop();
    let planner = Planner::builder(&schema).exists_strategy(false).build();

    let mut select = root(&schema, "Order", "o");
    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    assert!(lines.filter.is_none());
    hoisted_principal(&lines);
    lines.verify().unwrap();
}

#[test]
fn hoisted_copy_keeps_tables_the_filter_needs() {
    let schema = shop();
    let planner = Planner::builder(&schema).exists_strategy(false).build();

    // Orders of customers named Ann, with their customer and address joined
    let mut select = root(&schema, "Order", "o");
    planner
        .plan_includes(
            &mut select,
            SOURCE,
            &[
                field(&schema, "Order", "customer"),
                field(&schema, "Customer", "address"),
            ],
            &IncludeFilters::new(),
        )
        .unwrap();
    select.add_filter(Expr::eq(column(&schema, "c", "Customer", "name"), "Ann"));

    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    // The address join is not needed by the copy
    let principal = hoisted_principal(&lines);
    let aliases: Vec<_> = principal.tables.iter().map(TableRef::alias).collect();
    assert_eq!(aliases, ["o", "c"]);

    lines.verify().unwrap();
}

#[test]
fn wrapped_root_is_the_principal() {
    let schema = shop();
    let planner = Planner::new(&schema);

    // SELECT * FROM (SELECT ... FROM orders o LIMIT 5) AS t
    let mut inner = root(&schema, "Order", "o");
    inner.project_star = true;
    inner.clear_projection();
    inner.limit = Some(Limit::limit(5i64));
    inner.alias = Some("t".to_string());

    let mut select = Select::new();
    select.add_table(TableDerived {
        select: Box::new(inner),
        alias: "t".to_string(),
        source: None,
    });
    select.project_star = true;

    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    assert_eq!(
        select.order_by,
        vec![OrderByExpr::asc(Expr::alias(column(&schema, "t", "Order", "id")))]
    );

    let Some(Expr::Exists(exists)) = lines.filter.as_expr() else {
        panic!("expected an EXISTS correlation; actual={lines:#?}");
    };
    assert_eq!(
        exists.subquery.filter.as_expr(),
        Some(&Expr::eq(
            column(&schema, "o0", "OrderLine", "order_id"),
            column(&schema, "t", "Order", "id"),
        ))
    );

    lines.verify().unwrap();
}

#[test]
fn reference_after_collection_joins_into_the_collection_plan() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    let path = [
        field(&schema, "Order", "lines"),
        field(&schema, "OrderLine", "product"),
    ];

    let loaders = planner
        .plan_includes(&mut select, SOURCE, &path, &IncludeFilters::new())
        .unwrap();

    assert_eq!(loaders.len(), 2);
    let lines = loaders[0].expect_collection().select();
    let product = loaders[1].expect_reference();
    assert_eq!(product.value_buffer_offset(), 4);

    // The root is untouched by the product join
    assert_eq!(select.tables.len(), 1);

    let Some(TableRef::Join(join)) = lines.tables.get(1) else {
        panic!("expected products to be joined; actual={lines:#?}");
    };
    assert_eq!(join.kind, JoinKind::LeftOuter);
    assert_eq!(join.table.alias(), "p");
    assert_eq!(
        join.constraint,
        Some(Expr::eq(
            column(&schema, "o0", "OrderLine", "product_id"),
            Expr::cast(column(&schema, "p", "Product", "id"), Type::I64.nullable()),
        ))
    );

    lines.verify().unwrap();
}

#[test]
fn nested_collections_line_up_with_their_parents() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Customer", "c");
    let path = [
        field(&schema, "Customer", "orders"),
        field(&schema, "Order", "lines"),
    ];

    let loaders = planner
        .plan_includes(&mut select, SOURCE, &path, &IncludeFilters::new())
        .unwrap();

    let orders = loaders[0].expect_collection().select();
    let lines = loaders[1].expect_collection().select();

    // Orders are sorted by customer, then by their own key for the lines
    assert_eq!(
        orders.order_by,
        vec![
            OrderByExpr::asc(Expr::alias(column(&schema, "o", "Order", "customer_id"))),
            OrderByExpr::asc(Expr::alias(column(&schema, "o", "Order", "id"))),
        ]
    );
    assert!(orders.filter.as_expr().is_some_and(Expr::is_exists));

    // Orders are not ordered by their key alone, so lines join a copy
    let principal = hoisted_principal(lines);
    assert!(principal.filter.as_expr().is_some_and(Expr::is_exists));
    assert_eq!(
        lines.order_by,
        vec![
            OrderByExpr::asc(Expr::alias(column(&schema, "t", "Order", "customer_id"))),
            OrderByExpr::asc(Expr::alias(column(&schema, "t", "Order", "id"))),
        ]
    );

    orders.verify().unwrap();
    lines.verify().unwrap();
}

#[test]
fn target_ordering_mirrors_the_principal_ordering() {
    let schema = shop();

    for exists_strategy in [true, false] {
        let planner = Planner::builder(&schema)
            .exists_strategy(exists_strategy)
            .build();

        let mut select = root(&schema, "Order", "o");
        let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

        assert_eq!(lines.order_by.len(), select.order_by.len());

        for (target, principal) in lines.order_by.iter().zip(&select.order_by) {
            assert_eq!(target.order, principal.order);

            let principal_field = principal.expr.try_as_column().and_then(|c| c.field);
            let target_field = target.expr.try_as_column().and_then(|c| c.field);

            // Either the same key read through the copy, or the foreign key
            // it pairs with
            let paired = target_field == principal_field
                || target_field == Some(field(&schema, "OrderLine", "order_id"));
            assert!(paired, "{target:?} does not mirror {principal:?}");
        }
    }
}

#[test]
fn correlated_ordering_uses_the_key_columns() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let id = field(&schema, "Order", "id");
    let mut select = root(&schema, "Order", "o");
    select.order_by = vec![OrderByExpr::desc(Expr::alias(ExprColumn::new(
        "o",
        "id",
        id,
        Type::I64,
    )))];

    let lines = lines_of_orders(&planner, &mut select, &IncludeFilters::new());

    // Already ordered by the key: nothing added, direction carried over
    assert_eq!(select.order_by.len(), 1);
    assert_eq!(
        lines.order_by,
        vec![OrderByExpr::desc(Expr::alias(column(
            &schema,
            "o0",
            "OrderLine",
            "order_id"
        )))]
    );
}
