//! Device identity - the tag folded into newly minted session ids.
//!
//! A fresh install starts with a random local tag. The sync endpoint
//! assigns a canonical tag at first successful upload; sessions minted
//! afterwards carry the server suffix. Already-minted ids are never
//! re-keyed.

use std::sync::RwLock;

use tracing::info;

use crate::domain::foundation::{DeviceTag, SessionId};

/// Shared, mutable device tag with session id minting.
pub struct DeviceIdentity {
    tag: RwLock<DeviceTag>,
}

impl DeviceIdentity {
    /// Starts with a random, locally-scoped tag.
    pub fn new() -> Self {
        Self {
            tag: RwLock::new(DeviceTag::local()),
        }
    }

    /// Starts from a previously persisted tag.
    pub fn with_tag(tag: DeviceTag) -> Self {
        Self { tag: RwLock::new(tag) }
    }

    /// Returns the current tag.
    pub fn current(&self) -> DeviceTag {
        self.tag
            .read()
            .expect("DeviceIdentity: tag lock poisoned")
            .clone()
    }

    /// Mints a new session id carrying the current tag.
    pub fn mint_session_id(&self) -> SessionId {
        SessionId::mint(&self.current())
    }

    /// Adopts a server-assigned tag. Returns true if the tag changed.
    pub fn adopt(&self, assigned: DeviceTag) -> bool {
        let mut tag = self
            .tag
            .write()
            .expect("DeviceIdentity: tag lock poisoned");
        if *tag == assigned {
            return false;
        }
        info!(
            target: "sahayak::device",
            old_tag = %tag,
            new_tag = %assigned,
            "adopting server-assigned device tag"
        );
        *tag = assigned;
        true
    }
}

impl Default for DeviceIdentity {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_with_a_local_tag() {
        let device = DeviceIdentity::new();
        assert!(!device.current().is_server_assigned());
    }

    #[test]
    fn minted_ids_carry_the_current_tag() {
        let device = DeviceIdentity::with_tag(DeviceTag::assigned("d7").unwrap());
        let id = device.mint_session_id();
        assert!(id.as_str().ends_with(".d7"));
    }

    #[test]
    fn adopt_switches_future_ids_only() {
        let device = DeviceIdentity::new();
        let before = device.mint_session_id();

        assert!(device.adopt(DeviceTag::assigned("d42").unwrap()));
        let after = device.mint_session_id();

        assert!(!before.as_str().ends_with(".d42"));
        assert!(after.as_str().ends_with(".d42"));
    }

    #[test]
    fn adopting_the_same_tag_is_a_no_op() {
        let tag = DeviceTag::assigned("d42").unwrap();
        let device = DeviceIdentity::with_tag(tag.clone());
        assert!(!device.adopt(tag));
    }
}
