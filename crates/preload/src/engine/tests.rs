use preload_core::{
    schema::{FieldId, Schema},
    stmt::Type,
};


/// Customers and their orders, plus a model with a composite key.
pub fn test_schema() -> Schema {
    Schema::builder()
        .model("Customer", |m| {
            m.table_name("customers")
                .primary_key("id", Type::I64)
                .field("name", Type::String)
                .storage_name("customer_name")
                .has_many("orders", "Order", "customer");
        })
        .model("Order", |m| {
            m.table_name("orders")
                .primary_key("id", Type::I64)
                .nullable("customer_id", Type::I64)
                .field("total", Type::I64)
                .belongs_to("customer", "Customer", &["customer_id"]);
        })
        .model("Warehouse", |m| {
            m.table_name("warehouses")
                .primary_key("region", Type::String)
                .primary_key("code", Type::I32);
        })
        .model("Bin", |m| {
            m.table_name("bins")
                .primary_key("id", Type::I64)
                .field("warehouse_region", Type::String)
                .field("warehouse_code", Type::I32)
                .belongs_to("warehouse", "Warehouse", &["warehouse_region", "warehouse_code"]);
        })
        .build()
        .expect("test schema should build")
}

pub fn field(schema: &Schema, model: &str, name: &str) -> FieldId {
    schema
        .model_by_name(model)
        .and_then(|model| model.field_by_name(name))
        .map(|field| field.id)
        .unwrap_or_else(|| panic!("no field {model}.{name}"))
}
