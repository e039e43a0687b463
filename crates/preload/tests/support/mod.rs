#![allow(dead_code)]

use preload::{
    schema::{FieldId, Schema},
    stmt::{ExprColumn, QuerySource, Select, TableBase, Type},
};

pub const SOURCE: QuerySource = QuerySource(0);

/// A small shop: customers with an address place orders made of lines, each
/// line referencing a product. Gift cards share the products table and are
/// told apart by `kind`.
pub fn shop() -> Schema {
    Schema::builder()
        .model("Customer", |m| {
            m.table_name("customers")
                .primary_key("id", Type::I64)
                .field("name", Type::String)
                .storage_name("customer_name")
                .field("address_id", Type::I64)
                .belongs_to("address", "Address", &["address_id"])
                .has_many("orders", "Order", "customer");
        })
        .model("Address", |m| {
            m.table_name("addresses")
                .primary_key("id", Type::I64)
                .field("city", Type::String);
        })
        .model("Order", |m| {
            m.table_name("orders")
                .primary_key("id", Type::I64)
                .field("number", Type::String)
                .field("customer_id", Type::I64)
                .nullable("placed_by_id", Type::I64)
                .belongs_to("customer", "Customer", &["customer_id"])
                .belongs_to("placed_by", "Customer", &["placed_by_id"])
                .has_many("lines", "OrderLine", "order");
        })
        .model("OrderLine", |m| {
            m.table_name("order_lines")
                .primary_key("id", Type::I64)
                .field("order_id", Type::I64)
                .nullable("product_id", Type::I64)
                .field("quantity", Type::I32)
                .belongs_to("order", "Order", &["order_id"])
                .belongs_to("product", "Product", &["product_id"])
                .belongs_to("gift_card", "GiftCard", &["product_id"]);
        })
        .model("Product", |m| {
            m.table_name("products")
                .primary_key("id", Type::I64)
                .field("name", Type::String)
                .field("kind", Type::String);
        })
        .model("GiftCard", |m| {
            m.table_name("products")
                .primary_key("id", Type::I64)
                .field("name", Type::String)
                .field("kind", Type::String)
                .discriminator("kind", "gift");
        })
        .build()
        .expect("shop schema should build")
}

pub fn field(schema: &Schema, model: &str, name: &str) -> FieldId {
    schema
        .model_by_name(model)
        .and_then(|model| model.field_by_name(name))
        .map(|field| field.id)
        .unwrap_or_else(|| panic!("no field {model}.{name}"))
}

/// The column storing `model.name`, bound to `table`.
pub fn column(schema: &Schema, table: &str, model: &str, name: &str) -> ExprColumn {
    let id = field(schema, model, name);
    ExprColumn::new(
        table,
        schema.column_name_for(id),
        id,
        schema.column_type_for(id).unwrap(),
    )
}

/// `SELECT <every column of model> FROM <model's table> AS alias`, the plan
/// a query over `model` starts from.
pub fn root(schema: &Schema, model: &str, alias: &str) -> Select {
    let model = schema.model_by_name(model).unwrap();

    let mut select = Select::from_table(TableBase {
        source: Some(SOURCE),
        ..TableBase::new(&model.table_name, alias)
    });

    for field in model.primitives() {
        select.add_to_projection(column(schema, alias, &model.name, &field.name.app_name));
    }

    select
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
