//! Strongly-typed identifier value objects.
//!
//! Session identifiers are minted from a client-local random component plus
//! a device tag, so identifiers created while offline never collide with
//! identifiers minted concurrently on other devices. The device tag starts
//! out as a locally generated value and is replaced by a server-assigned
//! suffix at first sync; already-minted identifiers are never re-keyed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use super::ValidationError;

/// Prefix for device tags that have not yet been assigned by the server.
const LOCAL_TAG_PREFIX: &str = "loc";

/// Per-device suffix folded into every minted [`SessionId`].
///
/// A freshly installed device uses a random local tag. The sync endpoint
/// assigns a canonical tag at first successful upload; from then on, new
/// sessions carry the server suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceTag(String);

impl DeviceTag {
    /// Generates a random, locally-scoped device tag.
    pub fn local() -> Self {
        let raw = Uuid::new_v4().simple().to_string();
        Self(format!("{}{}", LOCAL_TAG_PREFIX, &raw[..8]))
    }

    /// Wraps a server-assigned tag.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the tag is empty
    pub fn assigned(tag: impl Into<String>) -> Result<Self, ValidationError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(ValidationError::empty_field("device_tag"));
        }
        Ok(Self(tag))
    }

    /// Returns true if this tag was assigned by the server.
    pub fn is_server_assigned(&self) -> bool {
        !self.0.starts_with(LOCAL_TAG_PREFIX)
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a dialogue session.
///
/// Opaque and immutable once minted. The wire form is
/// `<uuid>.<device-tag>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Mints a new SessionId from a random UUID and the device tag.
    pub fn mint(tag: &DeviceTag) -> Self {
        Self(format!("{}.{}", Uuid::new_v4(), tag.as_str()))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SessionId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(ValidationError::empty_field("session_id"));
        }
        Ok(Self(s.to_string()))
    }
}

/// User identifier (issued by the auth layer, opaque to this core).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Creates a new UserId, returning error if empty.
    pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
        let id = id.into();
        if id.is_empty() {
            return Err(ValidationError::empty_field("user_id"));
        }
        Ok(Self(id))
    }

    /// Returns the inner string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for a queued offline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Creates a new random ItemId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ItemId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Unique identifier for a message within a session's history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(Uuid);

impl MessageId {
    /// Creates a new random MessageId.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a MessageId from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod device_tag {
        use super::*;

        #[test]
        fn local_tags_are_not_server_assigned() {
            let tag = DeviceTag::local();
            assert!(!tag.is_server_assigned());
        }

        #[test]
        fn local_tags_are_random() {
            assert_ne!(DeviceTag::local(), DeviceTag::local());
        }

        #[test]
        fn assigned_tag_is_server_assigned() {
            let tag = DeviceTag::assigned("d42").unwrap();
            assert!(tag.is_server_assigned());
            assert_eq!(tag.as_str(), "d42");
        }

        #[test]
        fn empty_assigned_tag_is_rejected() {
            assert!(DeviceTag::assigned("").is_err());
        }
    }

    mod session_id {
        use super::*;

        #[test]
        fn minted_ids_carry_the_device_tag() {
            let tag = DeviceTag::assigned("d7").unwrap();
            let id = SessionId::mint(&tag);
            assert!(id.as_str().ends_with(".d7"));
        }

        #[test]
        fn minted_ids_are_unique() {
            let tag = DeviceTag::local();
            assert_ne!(SessionId::mint(&tag), SessionId::mint(&tag));
        }

        #[test]
        fn round_trips_through_from_str() {
            let id = SessionId::mint(&DeviceTag::local());
            let parsed: SessionId = id.as_str().parse().unwrap();
            assert_eq!(parsed, id);
        }

        #[test]
        fn empty_string_is_rejected() {
            assert!("".parse::<SessionId>().is_err());
        }
    }

    mod user_id {
        use super::*;

        #[test]
        fn accepts_non_empty_id() {
            let id = UserId::new("vendor-17").unwrap();
            assert_eq!(id.as_str(), "vendor-17");
        }

        #[test]
        fn rejects_empty_id() {
            assert!(UserId::new("").is_err());
        }
    }

    mod item_id {
        use super::*;

        #[test]
        fn new_ids_are_unique() {
            assert_ne!(ItemId::new(), ItemId::new());
        }

        #[test]
        fn round_trips_through_from_str() {
            let id = ItemId::new();
            let parsed: ItemId = id.to_string().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }
}
