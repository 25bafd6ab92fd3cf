use std::fmt;

/// Errors raised while turning a schema bundle into a schema graph.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SchemaError {
    /// A document declared a schema name already seen in this bundle.
    DuplicateSchema { name: String },
    /// A document's top-level mapping had neither or both of `profile_name`/`entity_name`.
    MissingNameKey { file: String },
    /// A document declared a top-level key outside the valid set.
    UnknownTopLevelKey { file: String, key: String },
    /// `fields`/`children`/`commands` was present but not a mapping.
    WrongShape { file: String, key: String },
    /// A field descriptor's `type` did not match a known field type.
    UnknownFieldType { field: String, type_name: String },
    /// An `enum` field declared no `values`.
    EmptyEnumValues { field: String },
    /// A `reference` field's `target` did not resolve to a known entity schema.
    UnknownReferenceTarget { field: String, target: String },
    /// A `children` entry named an entity schema that was never declared.
    UnknownChildEntity { relation: String, name: String },
    /// The same relation tag appeared twice under `children`.
    DuplicateChildTag { relation: String },
    /// An `integer`/`float` field declared `min > max`.
    InvalidRange { field: String },
    /// A field descriptor was missing a required attribute for its type.
    MissingAttribute { field: String, attribute: String },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateSchema { name } => write!(f, "duplicate schema name '{name}'"),
            Self::MissingNameKey { file } => write!(
                f,
                "document '{file}' must declare exactly one of 'profile_name' or 'entity_name'"
            ),
            Self::UnknownTopLevelKey { file, key } => {
                write!(f, "document '{file}' has unknown top-level key '{key}'")
            }
            Self::WrongShape { file, key } => {
                write!(f, "document '{file}' key '{key}' has the wrong shape")
            }
            Self::UnknownFieldType { field, type_name } => {
                write!(f, "field '{field}' has unknown type '{type_name}'")
            }
            Self::EmptyEnumValues { field } => {
                write!(f, "enum field '{field}' must declare at least one value")
            }
            Self::UnknownReferenceTarget { field, target } => write!(
                f,
                "reference field '{field}' targets unknown schema '{target}'"
            ),
            Self::UnknownChildEntity { relation, name } => write!(
                f,
                "child relation '{relation}' targets unknown schema '{name}'"
            ),
            Self::DuplicateChildTag { relation } => {
                write!(f, "relation tag '{relation}' declared more than once")
            }
            Self::InvalidRange { field } => {
                write!(f, "field '{field}' has min greater than max")
            }
            Self::MissingAttribute { field, attribute } => {
                write!(f, "field '{field}' is missing required attribute '{attribute}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}

/// Errors raised while parsing or validating a field value.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValueError {
    /// A raw scalar did not parse into the field's declared type.
    BadValueFormat { field: String, got: String },
    /// An `object` value's raw JSON named a key the schema does not declare.
    UnknownField { field: String },
    /// A required field (on an object, or the entity itself) held no value.
    MissingRequired { field: String },
    /// An integer/float value fell outside its schema's `min`/`max`.
    OutOfRange { field: String, got: String },
    /// An enum value was not one of the schema's declared members.
    NotAVariant { field: String, got: String },
    /// A reference value's target entity does not exist, or exists under the wrong schema.
    DanglingReference { field: String, target_id: String },
    /// Raw input for an array/object field was not valid JSON, or was the wrong JSON shape.
    MalformedStructure { field: String, message: String },
}

impl fmt::Display for ValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadValueFormat { field, got } => {
                write!(f, "field '{field}': '{got}' is not a valid value")
            }
            Self::UnknownField { field } => write!(f, "unknown field '{field}'"),
            Self::MissingRequired { field } => write!(f, "field '{field}' is required"),
            Self::OutOfRange { field, got } => {
                write!(f, "field '{field}': '{got}' is out of range")
            }
            Self::NotAVariant { field, got } => {
                write!(f, "field '{field}': '{got}' is not a declared enum value")
            }
            Self::DanglingReference { field, target_id } => write!(
                f,
                "field '{field}': referenced entity '{target_id}' does not exist or has the wrong schema"
            ),
            Self::MalformedStructure { field, message } => {
                write!(f, "field '{field}': {message}")
            }
        }
    }
}

impl std::error::Error for ValueError {}

/// Errors raised by the entity registry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// `add` was called with an id already present in the registry.
    DuplicateEntity { id: String },
    /// An operation referenced an id not present in the registry.
    UnknownEntity { id: String },
    /// A mutation was attempted on an entity whose state is already `Deleted`.
    EntityDeleted { id: String },
    /// `parentId` did not name an existing, non-deleted entity.
    UnknownParent { id: String },
    /// A data-bundle entry had no `_schema` key.
    MissingSchemaKey { entity_id: String },
    /// A data-bundle entry's `_schema` named a schema not in the graph.
    UnknownSchema { name: String },
    /// A value error surfaced while populating an entity from a data bundle.
    Value(ValueError),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateEntity { id } => write!(f, "duplicate entity id '{id}'"),
            Self::UnknownEntity { id } => write!(f, "unknown entity id '{id}'"),
            Self::EntityDeleted { id } => write!(f, "entity '{id}' has been deleted"),
            Self::UnknownParent { id } => write!(f, "parent entity '{id}' does not exist"),
            Self::MissingSchemaKey { entity_id } => {
                write!(f, "entity '{entity_id}' has no '_schema' key")
            }
            Self::UnknownSchema { name } => write!(f, "unknown schema '{name}'"),
            Self::Value(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RegistryError {}

impl From<ValueError> for RegistryError {
    fn from(e: ValueError) -> Self {
        Self::Value(e)
    }
}

/// The error type returned by every public `Engine` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EngineError {
    Schema(SchemaError),
    Value(ValueError),
    Registry(RegistryError),
    /// `createEntity`/command dispatch named a schema the graph doesn't have.
    UnknownSchema { name: String },
    /// `runCommand` named a command id the schema doesn't declare.
    UnknownCommand { schema: String, command: String },
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Schema(e) => write!(f, "{e}"),
            Self::Value(e) => write!(f, "{e}"),
            Self::Registry(e) => write!(f, "{e}"),
            Self::UnknownSchema { name } => write!(f, "unknown schema '{name}'"),
            Self::UnknownCommand { schema, command } => {
                write!(f, "schema '{schema}' has no command '{command}'")
            }
        }
    }
}

impl std::error::Error for EngineError {}

impl From<SchemaError> for EngineError {
    fn from(e: SchemaError) -> Self {
        Self::Schema(e)
    }
}

impl From<ValueError> for EngineError {
    fn from(e: ValueError) -> Self {
        Self::Value(e)
    }
}

impl From<RegistryError> for EngineError {
    fn from(e: RegistryError) -> Self {
        Self::Registry(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_messages() {
        let cases = vec![
            (
                SchemaError::DuplicateSchema { name: "Device".into() },
                "duplicate schema name 'Device'",
            ),
            (
                SchemaError::UnknownReferenceTarget {
                    field: "owner".into(),
                    target: "Ghost".into(),
                },
                "reference field 'owner' targets unknown schema 'Ghost'",
            ),
        ];
        for (err, expected) in cases {
            assert_eq!(err.to_string(), expected);
        }
    }

    #[test]
    fn value_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(ValueError::MissingRequired {
            field: "name".into(),
        });
        assert!(err.to_string().contains("is required"));
    }

    #[test]
    fn registry_error_from_value_error() {
        let err: RegistryError = ValueError::UnknownField { field: "x".into() }.into();
        assert!(matches!(err, RegistryError::Value(_)));
    }

    #[test]
    fn engine_error_conversions() {
        let e1: EngineError = SchemaError::EmptyEnumValues { field: "x".into() }.into();
        assert!(matches!(e1, EngineError::Schema(_)));
        let e2: EngineError = ValueError::MissingRequired { field: "x".into() }.into();
        assert!(matches!(e2, EngineError::Value(_)));
        let e3: EngineError = RegistryError::UnknownEntity { id: "x".into() }.into();
        assert!(matches!(e3, EngineError::Registry(_)));
    }
}
