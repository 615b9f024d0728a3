//! Opaque identifiers owned by the video service.
//!
//! None of these are generated locally; they are received from callers or
//! from the service and passed through unchanged.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            /// Create from an existing string.
            pub fn from_string(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Get the inner string.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }
    };
}

string_id!(
    /// Collection a video belongs to.
    CollectionId
);

string_id!(
    /// Video inside a collection.
    VideoId
);

string_id!(
    /// Handle of a scene index computed for one video.
    SceneIndexId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_serialize_transparently() {
        let id = VideoId::from("m-123");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"m-123\"");

        let back: SceneIndexId = serde_json::from_str("\"idx-9\"").unwrap();
        assert_eq!(back.as_str(), "idx-9");
        assert!(!back.is_empty());
    }
}
