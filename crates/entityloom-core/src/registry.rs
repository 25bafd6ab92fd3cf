use std::collections::BTreeMap;

use entityloom_dsl::{DocumentDecoder, Node};
use indexmap::IndexMap;

use crate::entity::{Entity, EntityState};
use crate::error::{RegistryError, ValueError};
use crate::query::EntityQuery;
use crate::schema::SchemaGraph;
use crate::types::EntityId;

/// The process-wide entity registry: the owning entity set plus two derived
/// indexes (`children_by_parent`, `roots`) that preserve insertion order.
#[derive(Debug, Clone, Default)]
pub struct EntityManager {
    entities: IndexMap<EntityId, Entity>,
    children_by_parent: IndexMap<EntityId, Vec<EntityId>>,
    roots: Vec<EntityId>,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.entities.clear();
        self.children_by_parent.clear();
        self.roots.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// Inserts `entity` into the owning map and appends it to the relevant
    /// index (`roots` if it has no parent, else its parent's child list).
    pub fn add(&mut self, entity: Entity) -> Result<(), RegistryError> {
        if self.entities.contains_key(entity.id()) {
            return Err(RegistryError::DuplicateEntity { id: entity.id().to_string() });
        }
        match entity.parent_id().cloned() {
            Some(parent_id) => self.children_by_parent.entry(parent_id).or_default().push(entity.id().clone()),
            None => self.roots.push(entity.id().clone()),
        }
        self.entities.insert(entity.id().clone(), entity);
        Ok(())
    }

    /// Tombstones a single entity: marks it Deleted and unlinks its id from
    /// `roots`/`children_by_parent`. Does not recurse into descendants or
    /// clear dangling references — that cascade lives at the Engine layer.
    pub fn remove(&mut self, id: &str) -> bool {
        let Some(entity) = self.entities.get_mut(id) else { return false };
        if entity.state() == EntityState::Deleted {
            return false;
        }
        entity.set_state(EntityState::Deleted);
        let parent_id = entity.parent_id().cloned();
        match parent_id {
            Some(parent_id) => {
                if let Some(siblings) = self.children_by_parent.get_mut(&parent_id) {
                    siblings.retain(|child_id| child_id.as_str() != id);
                }
            }
            None => self.roots.retain(|root_id| root_id.as_str() != id),
        }
        true
    }

    pub fn get_by_id(&self, id: &str) -> Option<&Entity> {
        self.entities.get(id)
    }

    /// Checks that `parent_id` names an existing, non-deleted entity.
    pub fn validate_parent_exists(&self, parent_id: &str) -> Result<(), RegistryError> {
        match self.entities.get(parent_id) {
            Some(entity) if entity.state() != EntityState::Deleted => Ok(()),
            _ => Err(RegistryError::UnknownParent { id: parent_id.to_string() }),
        }
    }

    pub fn get_by_id_mut(&mut self, id: &str) -> Option<&mut Entity> {
        self.entities.get_mut(id)
    }

    /// May return empty; ordering follows insertion, not schema declaration.
    pub fn get_children(&self, parent_id: &str) -> Vec<&Entity> {
        self.children_by_parent
            .get(parent_id)
            .map(|ids| ids.iter().filter_map(|id| self.entities.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn get_parents(&self) -> Vec<&Entity> {
        self.roots.iter().filter_map(|id| self.entities.get(id)).collect()
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn children_ids(&self, parent_id: &str) -> &[EntityId] {
        self.children_by_parent.get(parent_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks up `id`, delegates to the entity's `set_field`. Does not adjust
    /// lifecycle state — that transition is the Engine's responsibility.
    pub fn set_field_value(&mut self, id: &str, field: &str, raw: &str) -> Result<(), RegistryError> {
        let entity = self.entities.get_mut(id).ok_or_else(|| RegistryError::UnknownEntity { id: id.to_string() })?;
        if entity.state() == EntityState::Deleted {
            return Err(RegistryError::EntityDeleted { id: id.to_string() });
        }
        entity.set_field(field, raw).map_err(Into::into)
    }

    pub fn validate(&self, id: &str) -> Result<(), RegistryError> {
        let entity = self.entities.get(id).ok_or_else(|| RegistryError::UnknownEntity { id: id.to_string() })?;
        entity.validate(self).map_err(Into::into)
    }

    pub fn query(&self, query: &dyn EntityQuery) -> Vec<&Entity> {
        query.execute(self)
    }

    /// Resets the registry, then imports every document in the bundle.
    /// Each document's top-level mapping is `entity id -> { _schema, _parentid?, <field>: … }`.
    pub fn parse_data_bundle(
        &mut self,
        bundle: &BTreeMap<String, String>,
        schemas: &SchemaGraph,
        decoder: &dyn DocumentDecoder,
    ) -> Result<(), RegistryError> {
        let mut built = EntityManager::new();
        for (file, content) in bundle {
            let node = decoder.decode(file, content).map_err(|e| RegistryError::Value(ValueError::MalformedStructure {
                field: file.clone(),
                message: e.to_string(),
            }))?;
            let map = node.as_mapping().ok_or_else(|| RegistryError::Value(ValueError::MalformedStructure {
                field: file.clone(),
                message: "expected a mapping document".into(),
            }))?;
            for (entity_id, entry) in map {
                let entry_map = entry.as_mapping().ok_or_else(|| RegistryError::Value(ValueError::MalformedStructure {
                    field: entity_id.clone(),
                    message: "expected a mapping".into(),
                }))?;
                let schema_name = entry_map
                    .get("_schema")
                    .and_then(Node::as_scalar)
                    .ok_or_else(|| RegistryError::MissingSchemaKey { entity_id: entity_id.clone() })?;
                let schema = schemas
                    .get(schema_name)
                    .ok_or_else(|| RegistryError::UnknownSchema { name: schema_name.to_string() })?
                    .clone();
                let parent_id = entry_map.get("_parentid").and_then(Node::as_scalar).map(EntityId::new);

                let mut entity = Entity::new(EntityId::new(entity_id.clone()), parent_id, schema.clone(), EntityState::Unchanged);
                for key in entry_map.keys() {
                    if key == "_schema" || key == "_parentid" {
                        continue;
                    }
                    if entity.field(key).is_none() {
                        return Err(RegistryError::Value(ValueError::UnknownField { field: key.clone() }));
                    }
                }
                for (name, value) in entity.fields_mut().iter_mut() {
                    if let Some(field_node) = entry_map.get(name) {
                        value.populate_from_node(field_node)?;
                    }
                }
                built.add(entity)?;
            }
        }
        for entity in built.entities.values() {
            if let Some(parent_id) = entity.parent_id() {
                built.validate_parent_exists(parent_id.as_str())?;
            }
        }
        *self = built;
        tracing::info!(entity_count = self.entities.len(), "data bundle loaded");
        Ok(())
    }
}
