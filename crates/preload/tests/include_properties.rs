mod support;

use preload::{
    schema::{FieldId, Schema},
    stmt::{Expr, OrderByExpr, Select, Value, ValueRecord},
    IncludeFilters, Planner, RelatedLoader,
};
use support::*;

use pretty_assertions::assert_eq;

/// Fields of the columns `select` projects in `range`.
fn projected_fields(select: &Select, range: std::ops::Range<usize>) -> Vec<Option<FieldId>> {
    select.projection[range]
        .iter()
        .map(|projection| projection.column().and_then(|column| column.field))
        .collect()
}

fn customer_fields(schema: &Schema) -> Vec<Option<FieldId>> {
    ["id", "name", "address_id"]
        .into_iter()
        .map(|name| Some(field(schema, "Customer", name)))
        .collect()
}

fn plan(schema: &Schema, path: &[FieldId], filters: &IncludeFilters) -> (Select, Vec<RelatedLoader>) {
    let planner = Planner::new(schema);

    let mut select = root(schema, "Order", "o");
    select.add_to_order_by(OrderByExpr::desc(Expr::alias(column(schema, "o", "Order", "number"))));

    let loaders = planner
        .plan_includes(&mut select, SOURCE, path, filters)
        .unwrap();

    (select, loaders)
}

#[test]
fn planning_is_deterministic() {
    init_tracing();
    let schema = shop();
    let path = [
        field(&schema, "Order", "customer"),
        field(&schema, "Customer", "orders"),
        field(&schema, "Order", "lines"),
    ];

    let mut filters = IncludeFilters::new();
    filters.add(
        field(&schema, "Order", "lines"),
        Expr::gt(Expr::field(field(&schema, "OrderLine", "quantity")), 1i32),
    );

    let (first, first_loaders) = plan(&schema, &path, &filters);
    let (second, second_loaders) = plan(&schema, &path, &filters);

    assert_eq!(first, second);
    assert_eq!(first.aliases(), second.aliases());
    assert_eq!(first_loaders.len(), second_loaders.len());

    for (a, b) in first_loaders.iter().zip(&second_loaders) {
        assert_eq!(a.navigation(), b.navigation());
        assert_eq!(a.value_buffer_offset(), b.value_buffer_offset());

        if let (Some(a), Some(b)) = (a.as_collection(), b.as_collection()) {
            assert_eq!(a.select(), b.select());
            assert_eq!(a.select().aliases(), b.select().aliases());
        }
    }
}

#[test]
fn reference_window_survives_a_later_collection() {
    let schema = shop();
    let path = [
        field(&schema, "Order", "customer"),
        field(&schema, "Customer", "orders"),
    ];

    let (select, loaders) = plan(&schema, &path, &IncludeFilters::new());

    // The collection step only added orderings to the root
    assert_eq!(select.projection.len(), 7);
    assert_eq!(
        select.order_by,
        vec![
            OrderByExpr::desc(Expr::alias(column(&schema, "o", "Order", "number"))),
            OrderByExpr::asc(Expr::alias(column(&schema, "c", "Customer", "id"))),
        ]
    );

    let customer = loaders[0].expect_reference();
    assert_eq!(customer.value_buffer_offset(), 4);
    assert_eq!(projected_fields(&select, 4..7), customer_fields(&schema));

    let row = [
        Value::from(1i64),
        Value::from("A-1"),
        Value::from(10i64),
        Value::Null,
        Value::from(10i64),
        Value::from("Ann"),
        Value::from(3i64),
    ];
    assert_eq!(
        customer.load(&row).unwrap(),
        Some(ValueRecord::from_vec(vec![
            Value::from(10i64),
            Value::from("Ann"),
            Value::from(3i64),
        ]))
    );
}

#[test]
fn reference_inside_a_collection_points_into_its_plan() {
    let schema = shop();
    let path = [
        field(&schema, "Order", "customer"),
        field(&schema, "Customer", "orders"),
        field(&schema, "Order", "placed_by"),
    ];

    let (select, loaders) = plan(&schema, &path, &IncludeFilters::new());
    assert_eq!(loaders.len(), 3);

    // The first reference still reads the root
    assert_eq!(loaders[0].value_buffer_offset(), 4);
    assert_eq!(projected_fields(&select, 4..7), customer_fields(&schema));

    // The last one reads the rows of the collection plan, after the order
    let orders = loaders[1].expect_collection().select();
    let placed_by = loaders[2].expect_reference();
    assert_eq!(placed_by.value_buffer_offset(), 4);
    assert_eq!(orders.projection.len(), 7);
    assert_eq!(projected_fields(orders, 4..7), customer_fields(&schema));

    orders.verify().unwrap();
}
