//! Opaque record identifiers.
//!
//! The backend uses integer primary keys, but nothing on the client side
//! relies on that: ids are compared and echoed back, never computed. Each id
//! accepts either a JSON string or a JSON integer and always serializes as a
//! string.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Wire form of an identifier: either a JSON string or a JSON integer.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for String {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => s,
            RawId::Number(n) => n.to_string(),
        }
    }
}

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(from = "RawId", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw identifier.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Borrow the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<RawId> for $name {
            fn from(raw: RawId) -> Self {
                Self(raw.into())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

opaque_id!(
    /// Identifier of a project.
    ProjectId
);
opaque_id!(
    /// Identifier of a task.
    TaskId
);
opaque_id!(
    /// Identifier of an agent persona.
    AgentId
);
opaque_id!(
    /// Identifier of a stored AI-provider API key.
    ApiKeyId
);
opaque_id!(
    /// Identifier of a connected GitHub repository record.
    RepositoryId
);
opaque_id!(
    /// Identifier of a requirements survey answer.
    RequirementId
);
opaque_id!(
    /// Identifier of a generated planning document.
    PlanningDocumentId
);
opaque_id!(
    /// Identifier of a planner's agent recommendation.
    RecommendationId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserializes_integer_and_string() {
        let from_int: TaskId = serde_json::from_str("42").unwrap();
        let from_str: TaskId = serde_json::from_str("\"42\"").unwrap();
        assert_eq!(from_int, from_str);
        assert_eq!(from_int.as_str(), "42");
    }

    #[test]
    fn test_serializes_as_string() {
        let id = AgentId::new("7");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"7\"");
    }

    #[test]
    fn test_optional_null() {
        let id: Option<AgentId> = serde_json::from_str("null").unwrap();
        assert!(id.is_none());
    }
}
