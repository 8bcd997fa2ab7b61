//! Resolution stages.

use std::fmt;

/// One step of the resolution protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Theme asset below the reserved theme route.
    Theme,
    /// Exact item match.
    Item,
    /// File attached to an item.
    ItemFile,
    /// Rewrite rule whose target exists in the file index.
    Rewrite,
}

impl Stage {
    /// Priority order; earlier stages win.
    pub const ORDER: [Stage; 4] = [Stage::Theme, Stage::Item, Stage::ItemFile, Stage::Rewrite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Theme => "theme",
            Stage::Item => "item",
            Stage::ItemFile => "item_file",
            Stage::Rewrite => "rewrite",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
