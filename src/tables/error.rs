use std::fmt;

pub type GrammarResult<T> = Result<T, GrammarError>;

/// Represents any failure that can occur while loading grammars, building tables, or writing
/// the generated artifacts. Every variant is fatal for the generation pass.
#[derive(Debug)]
pub enum GrammarError {
    Io(std::io::Error),
    /// Mismatched input/output designators, an empty request, or configuration that does not
    /// fit the loaded grammar.
    Configuration(String),
    /// A required field is absent from the grammar or has the wrong shape.
    Malformed {
        context: String,
        message: String,
    },
    /// A supplementary extension name is also declared by a grammar.
    RegistryCollision {
        extension: String,
    },
}

impl GrammarError {
    pub fn configuration(message: impl Into<String>) -> Self {
        GrammarError::Configuration(message.into())
    }

    pub fn malformed(context: impl Into<String>, message: impl Into<String>) -> Self {
        GrammarError::Malformed {
            context: context.into(),
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for GrammarError {
    fn from(err: std::io::Error) -> Self {
        GrammarError::Io(err)
    }
}

impl From<serde_json::Error> for GrammarError {
    fn from(err: serde_json::Error) -> Self {
        GrammarError::malformed("<json>", err.to_string())
    }
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::Io(err) => write!(f, "I/O error: {err}"),
            GrammarError::Configuration(msg) => write!(f, "configuration error: {msg}"),
            GrammarError::Malformed { context, message } => {
                write!(f, "malformed grammar at {context}: {message}")
            }
            GrammarError::RegistryCollision { extension } => write!(
                f,
                "extension '{extension}' is already declared in a grammar file; \
                 remove it from the supplementary extension list"
            ),
        }
    }
}

impl std::error::Error for GrammarError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrammarError::Io(err) => Some(err),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_display_names_location() {
        let err = GrammarError::malformed("instructions[4]", "missing 'opname'");
        assert_eq!(
            err.to_string(),
            "malformed grammar at instructions[4]: missing 'opname'"
        );
    }

    #[test]
    fn json_errors_become_malformed() {
        let err: GrammarError = serde_json::from_str::<serde_json::Value>("{")
            .expect_err("truncated json")
            .into();
        assert!(matches!(err, GrammarError::Malformed { .. }));
    }
}
