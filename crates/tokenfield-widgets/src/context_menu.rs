//! Context menu requested by a long press on a chip.

use crate::token::Token;
use serde::{Deserialize, Serialize};
use tokenfield_core::Point;

/// One entry of a chip's context menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    /// Text shown to the user
    pub title: String,
    /// Action identifier handed back to the host when chosen
    pub action: String,
}

impl MenuItem {
    /// Create a menu item.
    #[must_use]
    pub fn new(title: impl Into<String>, action: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            action: action.into(),
        }
    }
}

/// A context menu shown for one chip.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenu {
    /// Index of the chip (and token) the menu belongs to
    pub token_index: usize,
    /// The token the menu belongs to
    pub token: Token,
    /// Where the menu points: the top center of the chip
    pub anchor: Point,
    /// Items, never empty
    pub items: Vec<MenuItem>,
}

impl ContextMenu {
    /// Find the item with the given action identifier.
    #[must_use]
    pub fn item(&self, action: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.action == action)
    }
}
