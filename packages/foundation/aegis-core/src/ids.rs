//! Opaque newtype identifiers.
//!
//! Identifiers are opaque strings; wrapping them in
//! distinct types catches argument transposition at compile time without
//! changing wire representation (each serializes as its inner string).

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! opaque_id {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }
    };
}

opaque_id!(NpcId);
opaque_id!(EventId);
opaque_id!(MemoryId);
opaque_id!(ProviderId);
/// `entityId == "director"` is the distinguished entity.
opaque_id!(EntityId);

impl EntityId {
    pub fn director() -> Self {
        Self("director".to_string())
    }

    pub fn is_director(&self) -> bool {
        self.0 == "director"
    }
}
