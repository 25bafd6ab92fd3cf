use crate::entity::Entity;
use crate::registry::EntityManager;

/// A polymorphic predicate over the entity registry.
///
/// Exposing a single `execute` capability lets ad-hoc lookups be expressed
/// without growing a new `EntityManager` method per query kind.
pub trait EntityQuery {
    fn execute<'a>(&self, manager: &'a EntityManager) -> Vec<&'a Entity>;
}

/// Matches every entity whose schema name equals the given name.
pub struct BySchemaName {
    pub schema: String,
}

impl EntityQuery for BySchemaName {
    fn execute<'a>(&self, manager: &'a EntityManager) -> Vec<&'a Entity> {
        manager.iter().filter(|e| e.schema().name() == self.schema).collect()
    }
}

/// Matches every entity currently in the given state.
pub struct ByState {
    pub state: crate::entity::EntityState,
}

impl EntityQuery for ByState {
    fn execute<'a>(&self, manager: &'a EntityManager) -> Vec<&'a Entity> {
        manager.iter().filter(|e| e.state() == self.state).collect()
    }
}
