//! The schema and entity engine: schema loading, the value model, entity
//! lifecycle, the entity registry, and the orchestrating `Engine` façade.

mod engine;
mod entity;
mod error;
mod query;
mod registry;
mod schema;
mod types;
mod value;

pub use engine::{CommandRunner, Engine};
pub use entity::{Entity, EntityState};
pub use error::{EngineError, RegistryError, SchemaError, ValueError};
pub use query::{ByState, BySchemaName, EntityQuery};
pub use registry::EntityManager;
pub use schema::{Command, CommandKind, EntitySchema, FieldKind, FieldSchema, SchemaGraph};
pub use types::{EntityId, EnumVariants, FieldName, SchemaName};
pub use value::FieldValue;
