use preload_core::{
    schema::{FieldId, ModelId},
    stmt::{
        Expr, ExprColumn, Join, Limit, OrderByExpr, Select, TableBase, TableDerived, Type, Value,
    },
    Generate,
};
use preload_sql::Serializer;

use pretty_assertions::assert_eq;

fn col(table: &str, name: &str, ty: Type) -> Expr {
    Expr::column(ExprColumn::new(table, name, None::<FieldId>, ty))
}

fn customers() -> Select {
    let mut select = Select::from_table(TableBase::new("customers", "c"));
    select.add_to_projection(col("c", "id", Type::I64));
    select.add_to_projection(col("c", "customer_name", Type::String));
    select
}

#[test]
fn filtered_select_binds_values() {
    let mut select = customers();
    select.add_filter(Expr::eq(col("c", "customer_name", Type::String), "Ann"));

    let mut params: Vec<Value> = vec![];
    let sql = Serializer::sqlite().serialize(&select, &mut params).unwrap();

    assert_eq!(
        sql,
        r#"SELECT "c"."id", "c"."customer_name" FROM "customers" AS "c" WHERE "c"."customer_name" = ?1;"#
    );
    assert_eq!(params, vec![Value::from("Ann")]);
}

#[test]
fn placeholders_per_flavor() {
    let mut select = customers();
    select.add_filter(Expr::and(
        Expr::ge(col("c", "id", Type::I64), 10_i64),
        Expr::le(col("c", "id", Type::I64), 20_i64),
    ));

    let postgres = Serializer::postgresql().generate(&select).unwrap();
    assert_eq!(
        postgres.sql,
        r#"SELECT "c"."id", "c"."customer_name" FROM "customers" AS "c" WHERE "c"."id" >= $1 AND "c"."id" <= $2;"#
    );
    assert_eq!(postgres.params, vec![Value::I64(10), Value::I64(20)]);

    let mysql = Serializer::mysql().generate(&select).unwrap();
    assert_eq!(
        mysql.sql,
        "SELECT `c`.`id`, `c`.`customer_name` FROM `customers` AS `c` WHERE `c`.`id` >= ? AND `c`.`id` <= ?;"
    );
}

#[test]
fn joins_render_with_their_constraints() {
    let mut select = Select::from_table(TableBase::new("orders", "o"));
    select.add_to_projection(col("o", "id", Type::I64));

    let mut customer = Join::inner(TableBase::new("customers", "c"));
    customer.constraint = Some(Expr::eq(
        col("o", "customer_id", Type::I64),
        col("c", "id", Type::I64),
    ));
    select.add_join(customer);

    let mut placed_by = Join::left_outer(TableBase::new("customers", "c0"));
    placed_by.constraint = Some(Expr::eq(
        col("o", "placed_by_id", Type::I64.nullable()),
        Expr::cast(col("c0", "id", Type::I64), Type::I64.nullable()),
    ));
    select.add_join(placed_by);

    select.add_join(Join::inner(TableBase::new("addresses", "a")));

    let query = Serializer::postgresql().generate(&select).unwrap();
    assert_eq!(
        query.sql,
        concat!(
            r#"SELECT "o"."id" FROM "orders" AS "o""#,
            r#" INNER JOIN "customers" AS "c" ON "o"."customer_id" = "c"."id""#,
            r#" LEFT JOIN "customers" AS "c0" ON "o"."placed_by_id" = CAST("c0"."id" AS BIGINT)"#,
            r#" INNER JOIN "addresses" AS "a" ON 1 = 1;"#,
        )
    );
    assert!(query.params.is_empty());
}

#[test]
fn exists_subquery_selects_a_constant() {
    let mut subquery = Select::from_table(TableBase::new("customers", "c"));
    subquery.add_filter(Expr::eq(
        col("o", "customer_id", Type::I64),
        col("c", "id", Type::I64),
    ));

    let mut select = Select::from_table(TableBase::new("orders", "o"));
    select.project_star = true;
    select.add_filter(Expr::exists(subquery.clone()));
    select.add_filter(Expr::not_exists(subquery));

    let sql = Serializer::sqlite().generate(&select).unwrap().sql;
    assert_eq!(
        sql,
        concat!(
            r#"SELECT * FROM "orders" AS "o" WHERE "#,
            r#"EXISTS (SELECT 1 FROM "customers" AS "c" WHERE "o"."customer_id" = "c"."id") AND "#,
            r#"NOT EXISTS (SELECT 1 FROM "customers" AS "c" WHERE "o"."customer_id" = "c"."id");"#,
        )
    );
}

#[test]
fn derived_table_with_distinct_and_aliases() {
    let mut inner = Select::from_table(TableBase::new("orders", "o"));
    inner.distinct = true;
    inner.add_alias_to_projection("customer", col("o", "customer_id", Type::I64));

    let mut select = Select::new();
    select.add_table(TableDerived {
        select: Box::new(inner),
        alias: "t".to_string(),
        source: None,
    });
    select.add_to_projection(col("t", "customer", Type::I64));

    let sql = Serializer::sqlite().generate(&select).unwrap().sql;
    assert_eq!(
        sql,
        concat!(
            r#"SELECT "t"."customer" FROM "#,
            r#"(SELECT DISTINCT "o"."customer_id" AS "customer" FROM "orders" AS "o") AS "t";"#,
        )
    );
}

#[test]
fn order_by_and_paging() {
    let mut select = customers();
    select.add_to_order_by(OrderByExpr::desc(col("c", "customer_name", Type::String)));
    select.add_to_order_by(OrderByExpr::asc(col("c", "id", Type::I64)));
    select.limit = Some(Limit::limit(10_i64).with_offset(20_i64));

    let query = Serializer::postgresql().generate(&select).unwrap();
    assert_eq!(
        query.sql,
        concat!(
            r#"SELECT "c"."id", "c"."customer_name" FROM "customers" AS "c""#,
            r#" ORDER BY "c"."customer_name" DESC, "c"."id" ASC LIMIT $1 OFFSET $2;"#,
        )
    );
    assert_eq!(query.params, vec![Value::I64(10), Value::I64(20)]);
}

#[test]
fn offset_without_limit() {
    let mut select = customers();
    select.limit = Some(Limit::offset(5_i64));

    let base = r#"SELECT "c"."id", "c"."customer_name" FROM "customers" AS "c""#;

    let sqlite = Serializer::sqlite().generate(&select).unwrap().sql;
    assert_eq!(sqlite, format!("{base} LIMIT -1 OFFSET ?1;"));

    let postgres = Serializer::postgresql().generate(&select).unwrap().sql;
    assert_eq!(postgres, format!("{base} OFFSET $1;"));

    let mysql = Serializer::mysql().generate(&select).unwrap().sql;
    assert_eq!(
        mysql,
        "SELECT `c`.`id`, `c`.`customer_name` FROM `customers` AS `c` LIMIT 18446744073709551615 OFFSET ?;"
    );
}

#[test]
fn null_comparisons_and_nesting() {
    let placed_by = || col("o", "placed_by_id", Type::I64.nullable());

    let mut select = Select::from_table(TableBase::new("orders", "o"));
    select.project_star = true;
    select.add_filter(Expr::or(
        Expr::eq(placed_by(), Expr::null()),
        Expr::and(
            Expr::ne(placed_by(), Expr::null()),
            Expr::not(Expr::eq(col("o", "number", Type::String), "A-1")),
        ),
    ));

    let sql = Serializer::sqlite().generate(&select).unwrap().sql;
    assert_eq!(
        sql,
        concat!(
            r#"SELECT * FROM "orders" AS "o" WHERE "o"."placed_by_id" IS NULL OR "#,
            r#"("o"."placed_by_id" IS NOT NULL AND NOT ("o"."number" = ?1));"#,
        )
    );
}

#[test]
fn function_calls_and_scalar_subqueries() {
    let mut count = Select::from_table(TableBase::new("order_lines", "l"));
    count.add_to_projection(Expr::func("count", vec![col("l", "id", Type::I64)]));
    count.add_filter(Expr::eq(
        col("l", "order_id", Type::I64),
        col("o", "id", Type::I64),
    ));

    let mut select = Select::from_table(TableBase::new("orders", "o"));
    select.add_alias_to_projection("lines", Expr::stmt(count));
    select.add_filter(Expr::eq(
        Expr::func("lower", vec![col("o", "number", Type::String)]),
        "a-1",
    ));

    let query = Serializer::sqlite().generate(&select).unwrap();
    assert_eq!(
        query.sql,
        concat!(
            r#"SELECT (SELECT count("l"."id") FROM "order_lines" AS "l" WHERE "l"."order_id" = "o"."id") AS "lines""#,
            r#" FROM "orders" AS "o" WHERE lower("o"."number") = ?1;"#,
        )
    );
    assert_eq!(query.params, vec![Value::from("a-1")]);
}

#[test]
fn cast_type_names_per_flavor() {
    let mut select = Select::from_table(TableBase::new("orders", "o"));
    select.add_to_projection(Expr::cast(col("o", "id", Type::I64), Type::String));
    select.add_to_projection(Expr::cast(col("o", "id", Type::I64), Type::I64.nullable()));

    let sqlite = Serializer::sqlite().generate(&select).unwrap().sql;
    assert_eq!(
        sqlite,
        r#"SELECT CAST("o"."id" AS TEXT), CAST("o"."id" AS INTEGER) FROM "orders" AS "o";"#
    );

    let mysql = Serializer::mysql().generate(&select).unwrap().sql;
    assert_eq!(
        mysql,
        "SELECT CAST(`o`.`id` AS CHAR), CAST(`o`.`id` AS SIGNED) FROM `orders` AS `o`;"
    );
}

#[test]
fn identifiers_are_escaped() {
    let mut select = Select::from_table(TableBase::new(r#"odd"name"#, "t"));
    select.project_star = true;

    let sql = Serializer::sqlite().generate(&select).unwrap().sql;
    assert_eq!(sql, r#"SELECT * FROM "odd""name" AS "t";"#);
}

#[test]
fn model_level_expressions_are_rejected() {
    let mut select = customers();
    select.add_filter(Expr::eq(Expr::field(FieldId { model: ModelId(0), index: 1 }), "Ann"));

    let err = Serializer::sqlite().generate(&select).unwrap_err();
    assert!(err
        .to_string()
        .starts_with("model-level expression cannot be serialized"));
}
