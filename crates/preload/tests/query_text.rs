mod support;

use preload::{
    stmt::{Expr, OrderByExpr, Value},
    IncludeFilters, Planner,
};
use preload_sql::Serializer;
use support::*;

use pretty_assertions::assert_eq;

#[test]
fn reference_include_renders_as_a_join() {
    init_tracing();
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    let path = [field(&schema, "Order", "customer")];
    planner
        .plan_includes(&mut select, SOURCE, &path, &IncludeFilters::new())
        .unwrap();

    let mut params: Vec<Value> = vec![];
    let sql = Serializer::sqlite().serialize(&select, &mut params).unwrap();

    assert_eq!(
        sql,
        concat!(
            r#"SELECT "o"."id", "o"."number", "o"."customer_id", "o"."placed_by_id", "#,
            r#""c"."id", "c"."customer_name", "c"."address_id" FROM "orders" AS "o" "#,
            r#"INNER JOIN "customers" AS "c" ON "o"."customer_id" = "c"."id";"#,
        )
    );
    assert!(params.is_empty());
}

#[test]
fn collection_loader_renders_its_own_query() {
    let schema = shop();
    let planner = Planner::new(&schema);
    let quantity = field(&schema, "OrderLine", "quantity");

    let mut filters = IncludeFilters::new();
    filters.add(
        field(&schema, "Order", "lines"),
        Expr::gt(Expr::field(quantity), 1i32),
    );

    let mut select = root(&schema, "Order", "o");
    let path = [field(&schema, "Order", "lines")];
    let loaders = planner
        .plan_includes(&mut select, SOURCE, &path, &filters)
        .unwrap();

    let query = loaders[0]
        .expect_collection()
        .to_query_text(&Serializer::postgresql())
        .unwrap();

    assert_eq!(
        query.sql,
        concat!(
            r#"SELECT "o0"."id", "o0"."order_id", "o0"."product_id", "o0"."quantity" "#,
            r#"FROM "order_lines" AS "o0" WHERE "o0"."quantity" > $1 AND "#,
            r#"EXISTS (SELECT * FROM "orders" AS "o" WHERE "o0"."order_id" = "o"."id") "#,
            r#"ORDER BY "o0"."order_id" ASC;"#,
        )
    );
    assert_eq!(query.params, vec![Value::I32(1)]);

    // The root keeps its shape, now ordered by key
    let mut params: Vec<Value> = vec![];
    let root = Serializer::postgresql().serialize(&select, &mut params).unwrap();
    assert_eq!(
        root,
        concat!(
            r#"SELECT "o"."id", "o"."number", "o"."customer_id", "o"."placed_by_id" "#,
            r#"FROM "orders" AS "o" ORDER BY "o"."id" ASC;"#,
        )
    );
}

#[test]
fn hoisted_principal_columns_render_unambiguously() {
    let schema = shop();
    let planner = Planner::new(&schema);

    let mut select = root(&schema, "Order", "o");
    select.add_to_order_by(OrderByExpr::asc(Expr::alias(column(&schema, "o", "Order", "id"))));

    let path = [
        field(&schema, "Order", "customer"),
        field(&schema, "Customer", "orders"),
    ];
    let loaders = planner
        .plan_includes(&mut select, SOURCE, &path, &IncludeFilters::new())
        .unwrap();

    let query = loaders[1]
        .expect_collection()
        .to_query_text(&Serializer::postgresql())
        .unwrap();

    assert_eq!(
        query.sql,
        concat!(
            r#"SELECT "o0"."id", "o0"."number", "o0"."customer_id", "o0"."placed_by_id" "#,
            r#"FROM "orders" AS "o0" INNER JOIN "#,
            r#"(SELECT DISTINCT "o"."id", "c"."id" AS "id0" FROM "orders" AS "o" "#,
            r#"INNER JOIN "customers" AS "c" ON "o"."customer_id" = "c"."id") AS "t" "#,
            r#"ON "o0"."customer_id" = "t"."id0" "#,
            r#"ORDER BY "t"."id" ASC, "t"."id0" ASC;"#,
        )
    );
    assert!(query.params.is_empty());
}
