use std::fmt;

/// Router-level errors: malformed JSON request, unknown command, or a
/// missing/wrong-typed argument. Never reach the wire as anything but
/// `{status: "error", message: ...}` — this type only exists so the
/// Router's own validation can be tested independent of string-formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EnvelopeError {
    MalformedRequest { message: String },
    MissingCommand,
    UnknownCommand { name: String },
    MissingArgument { command: String, argument: String },
    WrongArgumentType { command: String, argument: String },
}

impl fmt::Display for EnvelopeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MalformedRequest { message } => write!(f, "malformed request: {message}"),
            Self::MissingCommand => write!(f, "Missing or invalid 'command'"),
            Self::UnknownCommand { name } => write!(f, "unknown command '{name}'"),
            Self::MissingArgument { command, argument } => {
                write!(f, "command '{command}' is missing required argument '{argument}'")
            }
            Self::WrongArgumentType { command, argument } => {
                write!(f, "command '{command}' argument '{argument}' has the wrong type")
            }
        }
    }
}

impl std::error::Error for EnvelopeError {}
