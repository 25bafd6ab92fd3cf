use std::collections::BTreeMap;

use entityloom_core::{Engine, EntityState};
use entityloom_dsl::YamlDecoder;
use indexmap::IndexMap;
use proptest::prelude::*;

fn gadget_schema() -> BTreeMap<String, String> {
    [(
        "gadget.yaml".to_string(),
        "entity_name: Gadget\nfields:\n  name:\n    type: string\n  level:\n    type: integer\n    min: -1000\n    max: 1000\n  active:\n    type: boolean\n"
            .to_string(),
    )]
    .into_iter()
    .collect()
}

proptest! {
    /// Invariant 5 (round-trip): for text, integer, and boolean scalar
    /// fields, setField followed by a query yields back the same value.
    #[test]
    fn text_and_integer_and_boolean_round_trip(name in "[ -~]{0,40}", level in -1000i64..=1000, active in any::<bool>()) {
        let mut engine = Engine::new();
        engine.load_schemas(&gadget_schema(), &YamlDecoder).unwrap();
        let mut fields = IndexMap::new();
        fields.insert("name".to_string(), name.clone());
        fields.insert("level".to_string(), level.to_string());
        fields.insert("active".to_string(), active.to_string());
        engine.create_entity("Gadget", "g1", None, &fields).unwrap();

        let entity = engine.entities().get_by_id("g1").unwrap();
        prop_assert_eq!(entity.field("name").unwrap().to_display_string(), name);
        prop_assert_eq!(entity.field("level").unwrap().to_json(), serde_json::json!(level));
        prop_assert_eq!(entity.field("active").unwrap().to_json(), serde_json::json!(active));
    }

    /// Invariant 8 (state transitions): setField on a freshly created
    /// (Added) entity always leaves it Added; setField on a freshly
    /// loaded (Unchanged) entity always moves it to Modified.
    #[test]
    fn set_field_state_transitions_hold(level in -1000i64..=1000) {
        let mut engine = Engine::new();
        engine.load_schemas(&gadget_schema(), &YamlDecoder).unwrap();

        let mut fields = IndexMap::new();
        fields.insert("level".to_string(), "0".to_string());
        engine.create_entity("Gadget", "added1", None, &fields).unwrap();
        engine.set_field("added1", "level", &level.to_string()).unwrap();
        prop_assert_eq!(engine.entities().get_by_id("added1").unwrap().state(), EntityState::Added);

        let data: BTreeMap<String, String> = [(
            "data.yaml".to_string(),
            "loaded1:\n  _schema: Gadget\n  level: 0\n".to_string(),
        )]
        .into_iter()
        .collect();
        engine.load_data(&data, &YamlDecoder).unwrap();
        engine.set_field("loaded1", "level", &level.to_string()).unwrap();
        prop_assert_eq!(engine.entities().get_by_id("loaded1").unwrap().state(), EntityState::Modified);
    }

    /// Invariant 1: every created entity's field-name set matches its
    /// schema's declared field-name set, regardless of which subset of
    /// fields the caller actually populated.
    #[test]
    fn created_entity_field_keys_match_schema(populate_name in any::<bool>()) {
        let mut engine = Engine::new();
        engine.load_schemas(&gadget_schema(), &YamlDecoder).unwrap();
        let mut fields = IndexMap::new();
        if populate_name {
            fields.insert("name".to_string(), "Widget".to_string());
        }
        engine.create_entity("Gadget", "g1", None, &fields).unwrap();

        let entity = engine.entities().get_by_id("g1").unwrap();
        let schema = engine.get_schema("Gadget").unwrap();
        let mut entity_keys: Vec<&str> = entity.fields().keys().map(String::as_str).collect();
        let mut schema_keys: Vec<&str> = schema.fields().keys().map(String::as_str).collect();
        entity_keys.sort_unstable();
        schema_keys.sort_unstable();
        prop_assert_eq!(entity_keys, schema_keys);
    }

    /// Invariant 6 (idempotence): calling validate twice in a row with no
    /// intervening mutation yields the same result.
    #[test]
    fn validate_is_idempotent(level in -2000i64..=2000) {
        let mut engine = Engine::new();
        engine.load_schemas(&gadget_schema(), &YamlDecoder).unwrap();
        let mut fields = IndexMap::new();
        fields.insert("level".to_string(), level.to_string());
        engine.create_entity("Gadget", "g1", None, &fields).unwrap();

        let first = engine.validate_entity("g1").is_ok();
        let second = engine.validate_entity("g1").is_ok();
        prop_assert_eq!(first, second);
    }
}
