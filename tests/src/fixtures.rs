//! Shop schema fixture.
//!
//! ```text
//! User 1──* Order 1──* OrderItem
//! ```

use std::sync::Arc;

use cham_engine::{Engine, EngineConfig};
use cham_mutation::{SqlMutationFactory, Validator, ValidatorConfig};
use cham_registry::{DefaultValue, Field, FieldType, Relation, RelationKind, Schema, SchemaBuilder};

use crate::compiler::StubCompiler;

pub const USER_ID: &str = "6f1c2a3b-4d5e-4f60-8a7b-9c0d1e2f3a4b";

pub const ORDER_IDS: [&str; 3] = [
    "0b7e1c9a-1f42-4c55-9d1e-7a6b5c4d3e21",
    "1c8f2d0b-2a53-4d66-8e2f-8b7c6d5e4f32",
    "2d903e1c-3b64-4e77-9f30-9c8d7e6f5a43",
];

/// User, Order and OrderItem.
pub fn shop_schema() -> Schema {
    let mut builder = SchemaBuilder::new();

    builder
        .add_entity("User")
        .field(Field::new("id", FieldType::Uuid).primary_key().with_default(DefaultValue::UuidV4))
        .field(Field::new("email", FieldType::String).unique())
        .field(Field::new("name", FieldType::String))
        .field(Field::new("age", FieldType::Int).nullable())
        .field(Field::new("created_at", FieldType::Timestamp).with_default(DefaultValue::Now))
        .relation(Relation::new("orders", RelationKind::HasMany, "Order").foreign_key("user_id"))
        .done()
        .expect("User is well formed");

    builder
        .add_entity("Order")
        .field(Field::new("id", FieldType::Uuid).primary_key().with_default(DefaultValue::UuidV4))
        .field(Field::new("user_id", FieldType::Uuid))
        .field(Field::new("total", FieldType::Decimal))
        .field(
            Field::new("status", FieldType::String)
                .with_default(DefaultValue::Literal("pending".to_string())),
        )
        .relation(Relation::new("user", RelationKind::BelongsTo, "User").foreign_key("user_id"))
        .relation(Relation::new("items", RelationKind::HasMany, "OrderItem").foreign_key("order_id"))
        .done()
        .expect("Order is well formed");

    builder
        .add_entity("OrderItem")
        .field(Field::new("id", FieldType::Int).primary_key())
        .field(Field::new("order_id", FieldType::Uuid))
        .field(Field::new("sku", FieldType::String))
        .field(Field::new("quantity", FieldType::Int))
        .relation(Relation::new("order", RelationKind::BelongsTo, "Order").foreign_key("order_id"))
        .done()
        .expect("OrderItem is well formed");

    builder.build().expect("shop schema is well formed")
}

pub fn shop_validator(config: ValidatorConfig) -> Validator {
    Validator::new(Arc::new(shop_schema()), config)
}

/// An engine with the shop schema loaded through a `StubCompiler`.
pub fn shop_engine(config: EngineConfig) -> Engine {
    let schema = shop_schema();
    let mut engine = Engine::builder()
        .compiler(Arc::new(StubCompiler::new(&schema)))
        .mutation_factory(Arc::new(SqlMutationFactory))
        .config(config)
        .build()
        .expect("compiler and factory are configured");
    engine
        .load_schema("// shop schema")
        .expect("stub compiler accepts the shop schema");
    engine
}
