use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($name:ident, $doc:literal) => {
        #[doc = $doc]
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generates a new random identifier.
            #[must_use]
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an identifier from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the raw 16-byte representation suitable for SQLite blobs.
            #[must_use]
            pub const fn to_bytes(self) -> [u8; 16] {
                self.0.into_bytes()
            }

            /// Creates an identifier from raw bytes.
            ///
            /// # Errors
            ///
            /// Returns `uuid::Error` when the bytes do not form a valid UUID.
            pub fn from_bytes(bytes: &[u8]) -> Result<Self, uuid::Error> {
                Uuid::from_slice(bytes).map(Self)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<Uuid> for $name {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

define_id!(UserId, "Unique identifier for a registered user.");
define_id!(
    BucketId,
    "Opaque unique identifier for a bucket, generated server-side at creation."
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_ids_are_unique() {
        assert_ne!(BucketId::new(), BucketId::new());
    }

    #[test]
    fn id_round_trips_through_bytes() {
        let id = UserId::new();
        let restored = UserId::from_bytes(&id.to_bytes()).expect("valid bytes");
        assert_eq!(id, restored);
    }

    #[test]
    fn id_round_trips_through_display() {
        let id = BucketId::new();
        let restored: BucketId = id.to_string().parse().expect("valid uuid string");
        assert_eq!(id, restored);
    }

    #[test]
    fn malformed_id_string_is_rejected() {
        assert!("not-a-uuid".parse::<BucketId>().is_err());
    }
}
