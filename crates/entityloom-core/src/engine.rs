use std::collections::{BTreeMap, HashSet};

use entityloom_dsl::DocumentDecoder;
use indexmap::IndexMap;
use serde_json::Value;

use crate::entity::{Entity, EntityState};
use crate::error::EngineError;
use crate::query::EntityQuery;
use crate::registry::EntityManager;
use crate::schema::{Command, EntitySchema, SchemaGraph};
use crate::types::EntityId;

/// Runs a schema-declared command against an entity. Implemented outside
/// this crate (the script bridge owns the interpreter); `Engine::run_command`
/// takes one by reference so the core crate never depends on it directly.
pub trait CommandRunner {
    fn run(&self, command: &Command, entity: &Entity, registry: &EntityManager) -> Result<(), String>;
}

/// The only component that touches the Schema Manager and Entity Manager
/// together; authority on lifecycle state and referential integrity.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    schemas: SchemaGraph,
    entities: EntityManager,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schemas(&self) -> &SchemaGraph {
        &self.schemas
    }

    pub fn entities(&self) -> &EntityManager {
        &self.entities
    }

    pub fn load_schemas(&mut self, bundle: &BTreeMap<String, String>, decoder: &dyn DocumentDecoder) -> Result<(), EngineError> {
        self.schemas.load(bundle, decoder)?;
        Ok(())
    }

    pub fn schema_list(&self) -> Vec<String> {
        self.schemas.names()
    }

    pub fn get_schema(&self, name: &str) -> Result<&EntitySchema, EngineError> {
        self.schemas.get(name).map(AsRef::as_ref).ok_or_else(|| EngineError::UnknownSchema { name: name.to_string() })
    }

    /// Resets the entity registry and imports; all created entities have
    /// `state = Unchanged`.
    pub fn load_data(&mut self, bundle: &BTreeMap<String, String>, decoder: &dyn DocumentDecoder) -> Result<(), EngineError> {
        self.entities.parse_data_bundle(bundle, &self.schemas, decoder)?;
        Ok(())
    }

    pub fn create_entity(
        &mut self,
        schema_name: &str,
        id: &str,
        parent_id: Option<&str>,
        field_raws: &IndexMap<String, String>,
    ) -> Result<(), EngineError> {
        let schema = self.schemas.get(schema_name).cloned().ok_or_else(|| EngineError::UnknownSchema { name: schema_name.to_string() })?;
        if let Some(parent_id) = parent_id {
            self.entities.validate_parent_exists(parent_id)?;
        }
        let mut entity = Entity::new(EntityId::new(id), parent_id.map(EntityId::new), schema, EntityState::Added);
        for (field, raw) in field_raws {
            entity.set_field(field, raw)?;
        }
        self.entities.add(entity)?;
        Ok(())
    }

    /// Rejects on not-found or Deleted entity; delegates the mutation, then
    /// transitions state: `Added` stays `Added`, anything else becomes
    /// `Modified`.
    pub fn set_field(&mut self, id: &str, field: &str, raw: &str) -> Result<(), EngineError> {
        self.entities.set_field_value(id, field, raw)?;
        let entity = self.entities.get_by_id_mut(id).expect("just mutated");
        if entity.state() != EntityState::Added {
            entity.set_state(EntityState::Modified);
        }
        Ok(())
    }

    pub fn validate_entity(&self, id: &str) -> Result<(), EngineError> {
        self.entities.validate(id)?;
        Ok(())
    }

    /// Deep cascade delete (spec §4.7):
    /// 1. mark the target Deleted;
    /// 2. recursively mark every descendant Deleted;
    /// 3. clear every reference field, anywhere in the registry, pointing at a deleted id;
    /// 4. unlink every deleted id from the parent/root indexes (handled by `EntityManager::remove`).
    pub fn delete_entity(&mut self, id: &str) -> Result<(), EngineError> {
        if self.entities.get_by_id(id).is_none() {
            return Err(EngineError::Registry(crate::error::RegistryError::UnknownEntity { id: id.to_string() }));
        }
        let mut deleted = HashSet::new();
        let mut stack = vec![id.to_string()];
        while let Some(current) = stack.pop() {
            if !self.entities.remove(&current) {
                continue;
            }
            deleted.insert(current.clone());
            for child_id in self.entities.children_ids(&current).to_vec() {
                stack.push(child_id.to_string());
            }
        }
        clear_dangling_references(&mut self.entities, &deleted);
        Ok(())
    }

    pub fn get_parents(&self) -> Vec<&Entity> {
        self.entities.get_parents()
    }

    pub fn get_children(&self, parent_id: &str) -> Vec<&Entity> {
        self.entities.get_children(parent_id)
    }

    pub fn get_parent(&self, entity_id: &str) -> Option<&Entity> {
        let entity = self.entities.get_by_id(entity_id)?;
        let parent_id = entity.parent_id()?;
        self.entities.get_by_id(parent_id.as_str())
    }

    pub fn query(&self, query: &dyn EntityQuery) -> Vec<&Entity> {
        self.entities.query(query)
    }

    /// Runs a schema-declared command against an entity via the given
    /// runner, resolving the command id through the entity's schema.
    pub fn run_command(&self, entity_id: &str, command_id: &str, runner: &dyn CommandRunner) -> Result<(), EngineError> {
        let entity = self
            .entities
            .get_by_id(entity_id)
            .ok_or_else(|| EngineError::Registry(crate::error::RegistryError::UnknownEntity { id: entity_id.to_string() }))?;
        let command = entity.schema().command(command_id).ok_or_else(|| EngineError::UnknownCommand {
            schema: entity.schema().name().to_string(),
            command: command_id.to_string(),
        })?;
        runner.run(command, entity, &self.entities).map_err(|message| EngineError::Registry(crate::error::RegistryError::Value(
            crate::error::ValueError::MalformedStructure { field: command_id.to_string(), message },
        )))
    }

    /// Ordered list of `{id, schema, state, children: [recursively…]}`, one
    /// entry per root, in root insertion order.
    pub fn tree_json(&self) -> Value {
        Value::Array(self.entities.get_parents().into_iter().map(|e| self.tree_node_json(e)).collect())
    }

    fn tree_node_json(&self, entity: &Entity) -> Value {
        let children: Vec<Value> =
            self.entities.get_children(entity.id().as_str()).into_iter().map(|c| self.tree_node_json(c)).collect();
        serde_json::json!({
            "id": entity.id().as_str(),
            "schema": entity.schema().name(),
            "state": entity.state().as_str(),
            "children": children,
        })
    }
}

fn clear_dangling_references(entities: &mut EntityManager, deleted: &HashSet<String>) {
    let ids: Vec<EntityId> = entities.iter().map(|e| e.id().clone()).collect();
    for id in ids {
        if deleted.contains(id.as_str()) {
            continue;
        }
        if let Some(entity) = entities.get_by_id_mut(id.as_str()) {
            for value in entity.fields_mut().values_mut() {
                value.clear_dangling_references(deleted);
            }
        }
    }
}
