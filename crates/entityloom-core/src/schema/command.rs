use std::collections::BTreeMap;

/// A schema-declared command: `{id, type, ...type-specific config}`.
///
/// The sole concrete variant in this system is a scripted command backed
/// by a Lua source file, matching the original's `LuaCommand`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    id: String,
    kind: CommandKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandKind {
    Script {
        script_path: String,
        params: BTreeMap<String, String>,
    },
}

impl Command {
    pub fn script(id: impl Into<String>, script_path: impl Into<String>, params: BTreeMap<String, String>) -> Self {
        Self {
            id: id.into(),
            kind: CommandKind::Script {
                script_path: script_path.into(),
                params,
            },
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> &CommandKind {
        &self.kind
    }

    pub fn script_path(&self) -> &str {
        match &self.kind {
            CommandKind::Script { script_path, .. } => script_path,
        }
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        match &self.kind {
            CommandKind::Script { params, .. } => params,
        }
    }
}
