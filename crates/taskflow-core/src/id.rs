use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, fmt, str::FromStr};
use uuid::Uuid;

/// Error returned when parsing an identifier from a blank string.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("identifier must not be blank")]
pub struct BlankIdError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Generate a fresh identifier.
            #[must_use]
            pub fn new() -> Self {
                // UUID version 7 sorts by creation time, which keeps fresh ids
                // grouped after seeded ones when ordered lexically.
                Self(Uuid::now_v7().to_string())
            }

            /// Borrow the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = BlankIdError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err(BlankIdError);
                }
                Ok(Self(trimmed.to_owned()))
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// Identifier of a task. Seeded records keep whatever string the fixture
    /// carried; fresh ids are UUID v7 strings.
    TaskId
);

string_id!(
    /// Identifier of a category.
    CategoryId
);

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used)]

    use super::*;

    #[test]
    fn task_id_uses_uuid_v7() {
        let id = TaskId::new();
        let parsed = Uuid::parse_str(id.as_str()).expect("fresh id must be a uuid");
        assert_eq!(parsed.get_version_num(), 7);
    }

    #[test]
    fn fresh_ids_do_not_collide_in_tight_loops() {
        let ids: std::collections::HashSet<CategoryId> =
            (0..1_000).map(|_| CategoryId::new()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    #[test]
    fn parse_rejects_blank_input() {
        assert_eq!(TaskId::from_str("  "), Err(BlankIdError));
        let parsed: TaskId = " 42 ".parse().expect("must parse task id");
        assert_eq!(parsed.as_str(), "42");
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = CategoryId::from("work");
        let json = serde_json::to_string(&id).expect("serialize id");
        assert_eq!(json, "\"work\"");
    }
}
