//! Item identifier module.
//!
//! Provides the `ItemId` type, an interned string identifier for catalog
//! items. Uses `Arc<str>` so the many copies held by builds, candidate
//! lists and indexes share one allocation.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Interned, opaque, stable identifier for an item definition.
///
/// Ordering is lexicographic, which is what the catalog uses as its
/// declaration order.
///
/// # Examples
///
/// ```rust
/// use buildsmith::ItemId;
///
/// let gjally = ItemId::new("gjallarhorn");
/// let same: ItemId = "gjallarhorn".into();
/// let owned: ItemId = String::from("gjallarhorn").into();
///
/// assert_eq!(gjally, same);
/// assert_eq!(gjally, owned);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ItemId(Arc<str>);

impl Serialize for ItemId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(ItemId::from(s))
    }
}

impl ItemId {
    /// Create a new `ItemId` from a string slice.
    pub fn new(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this `ItemId`.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ItemId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ItemId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for ItemId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_id_creation() {
        let id1 = ItemId::new("ace_of_spades");
        let id2 = ItemId::new("ace_of_spades");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "ace_of_spades");
    }

    #[test]
    fn test_item_id_ordering_is_lexicographic() {
        let a = ItemId::new("a_helmet");
        let b = ItemId::new("b_helmet");
        assert!(a < b);
    }

    #[test]
    fn test_item_id_serializes_as_plain_string() {
        let id = ItemId::new("sunshot");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"sunshot\"");

        let back: ItemId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }
}
