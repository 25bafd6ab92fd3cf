mod command;
mod entity_schema;
mod field_schema;
mod graph;

pub use command::{Command, CommandKind};
pub use entity_schema::EntitySchema;
pub use field_schema::{FieldKind, FieldSchema};
pub use graph::SchemaGraph;
