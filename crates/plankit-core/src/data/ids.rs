use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a plan item inside its home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(Uuid);

impl ItemId {
    /// Create a new unique item id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Item({})", &self.0.to_string()[..8])
    }
}

/// Identity of a level inside its home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LevelId(Uuid);

impl LevelId {
    /// Create a new unique level id
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for LevelId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Level({})", &self.0.to_string()[..8])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        assert_ne!(ItemId::new(), ItemId::new());
        assert_ne!(LevelId::new(), LevelId::new());
    }

    #[test]
    fn test_display_is_short() {
        let id = ItemId::new();
        assert_eq!(id.to_string().len(), "Item(".len() + 8 + 1);
    }
}
