// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Upstream entity identifiers.
//!
//! The game server hands out 64-bit entity ids. They arrive as JSON numbers
//! in row payloads and as strings in the preference file, so ids are kept in
//! their decimal string form.

/// Define a newtype ID wrapper around `SmolStr`.
///
/// Generates `from_string()`, `as_str()`, `is_empty()`, `Display`,
/// `From<String>`, `From<&str>`, `From<u64>`, `PartialEq<str>`,
/// `PartialEq<&str>`, `Borrow<str>`, and `Deref` implementations.
///
/// ```ignore
/// define_id! {
///     /// Doc comment for the ID type.
///     pub struct ClaimId;
/// }
/// ```
#[macro_export]
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        pub struct $name:ident;
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub smol_str::SmolStr);

        impl $name {
            /// Create ID from an existing string
            pub fn from_string(id: impl Into<smol_str::SmolStr>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Returns true if the ID is an empty string.
            pub fn is_empty(&self) -> bool {
                self.0.is_empty()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self::from_string(s)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self::from_string(s)
            }
        }

        impl From<u64> for $name {
            fn from(n: u64) -> Self {
                Self::from_string(n.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }

        impl std::borrow::Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl std::ops::Deref for $name {
            type Target = str;

            fn deref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id! {
    /// A player's entity id.
    pub struct PlayerId;
}

define_id! {
    /// A claim's entity id.
    pub struct ClaimId;
}

define_id! {
    /// Any other upstream entity (building, inventory, craft, task).
    pub struct EntityId;
}

/// Escape a value for embedding in a single-quoted query literal.
pub fn quote_literal(s: &str) -> String {
    s.replace('\'', "''")
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;
