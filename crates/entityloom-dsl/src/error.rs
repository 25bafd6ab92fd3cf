use std::fmt;

/// Errors raised while decoding a named document into a [`crate::Node`] tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum DslError {
    /// The document's syntax could not be parsed at all.
    BadSyntax { file: String, message: String },
}

impl fmt::Display for DslError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadSyntax { file, message } => {
                write!(f, "bad syntax in '{file}': {message}")
            }
        }
    }
}

impl std::error::Error for DslError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_syntax_display() {
        let err = DslError::BadSyntax {
            file: "home.yaml".into(),
            message: "mapping values are not allowed here".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("home.yaml"));
        assert!(msg.contains("mapping values"));
    }

    #[test]
    fn error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(DslError::BadSyntax {
            file: "x".into(),
            message: "y".into(),
        });
        assert!(err.to_string().contains("bad syntax"));
    }
}
