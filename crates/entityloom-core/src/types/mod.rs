mod entity_id;
mod enum_variants;
mod field_name;
mod schema_name;

pub use entity_id::EntityId;
pub use enum_variants::EnumVariants;
pub use field_name::FieldName;
pub use schema_name::SchemaName;
