use thiserror::Error;

/// Boxed error returned by external collaborators (metadata source,
/// extension handlers). Carried through unmodified as the error source.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors raised while generating a grammar.
///
/// None of these are transient: they signal missing configuration or an
/// upstream failure, and grammar generation aborts without a partial result.
#[derive(Error, Debug)]
pub enum GrammarError {
    #[error("Unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("Column with type {0} was not configured, yet")]
    UnconfiguredType(String),

    #[error("Attribute {attribute} of entity {second} collides with entity {first}")]
    AttributeCollision {
        attribute: String,
        first: String,
        second: String,
    },

    #[error("Metadata lookup failed for entity {entity}")]
    Metadata {
        entity: String,
        #[source]
        source: BoxError,
    },

    #[error("Invalid literal pattern {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Extension handler on {channel} failed")]
    Extension {
        channel: String,
        #[source]
        source: BoxError,
    },
}

pub type Result<T> = std::result::Result<T, GrammarError>;

impl GrammarError {
    /// True for the errors caused by incomplete grammar configuration, as
    /// opposed to failures of a collaborator.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            GrammarError::UnknownAttribute(_)
                | GrammarError::UnconfiguredType(_)
                | GrammarError::AttributeCollision { .. }
                | GrammarError::InvalidPattern { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = GrammarError::UnconfiguredType("currency".to_string());
        assert_eq!(err.to_string(), "Column with type currency was not configured, yet");

        let err = GrammarError::UnknownAttribute("P.COLOR".to_string());
        assert_eq!(err.to_string(), "Unknown attribute: P.COLOR");
    }

    #[test]
    fn test_source_is_preserved() {
        let upstream: BoxError = "connection refused".into();
        let err = GrammarError::Metadata {
            entity: "Product".to_string(),
            source: upstream,
        };
        assert_eq!(err.source().unwrap().to_string(), "connection refused");
        assert!(!err.is_configuration_error());
    }

    #[test]
    fn test_configuration_errors() {
        assert!(GrammarError::UnknownAttribute("X".into()).is_configuration_error());
        assert!(GrammarError::UnconfiguredType("x".into()).is_configuration_error());
    }
}
