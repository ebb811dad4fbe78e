//! Permission bitflags gating command access
//!
//! Commands carry a required permission set; a source may invoke a command
//! when its resolved permissions cover that set. An empty requirement means
//! the command is public.

use bitflags::bitflags;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

bitflags! {
    /// Capability flags resolved from a user's platform roles
    ///
    /// Serialized as a string in JSON for JavaScript safety.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u64 {
        /// Issue and review warns
        const MODERATE       = 1 << 0;
        /// Issue, list, and revoke punishments
        const PUNISH         = 1 << 1;
        /// Inspect other users' moderation records
        const VIEW_RECORDS   = 1 << 2;
        /// Bypass all permission checks
        const ADMINISTRATOR  = 1 << 3;

        /// Everything a moderator needs
        const MODERATOR = Self::MODERATE.bits()
            | Self::PUNISH.bits()
            | Self::VIEW_RECORDS.bits();
    }
}

impl Permissions {
    /// Check if the permission set covers a required permission
    ///
    /// Administrators bypass all permission checks.
    #[inline]
    pub fn has(&self, required: Permissions) -> bool {
        if self.contains(Permissions::ADMINISTRATOR) {
            return true;
        }
        self.contains(required)
    }

    /// Combine permissions resolved from multiple roles
    pub fn combine<I>(roles: I) -> Self
    where
        I: IntoIterator<Item = Permissions>,
    {
        roles.into_iter().fold(Permissions::empty(), |acc, p| acc | p)
    }

    /// Parse from string representation (decimal number)
    pub fn parse(s: &str) -> Result<Self, std::num::ParseIntError> {
        s.parse::<u64>().map(Permissions::from_bits_truncate)
    }
}

impl Serialize for Permissions {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.bits().to_string())
    }
}

impl<'de> Deserialize<'de> for Permissions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Permissions::parse(&s).map_err(serde::de::Error::custom)
    }
}
