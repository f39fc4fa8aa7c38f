//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Entity collections that can signal changes to subscribers.
///
/// A change signal means "something in this collection changed, re-read" —
/// the signal itself carries no payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    StockItems,
    StockMovements,
    Categories,
    ActivityLogs,
    UniformItems,
    UniformCategories,
    UniformMovements,
    Issuances,
}

impl Collection {
    /// All collections, in a stable order.
    pub const ALL: [Collection; 8] = [
        Collection::StockItems,
        Collection::StockMovements,
        Collection::Categories,
        Collection::ActivityLogs,
        Collection::UniformItems,
        Collection::UniformCategories,
        Collection::UniformMovements,
        Collection::Issuances,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::StockItems => "stock_items",
            Collection::StockMovements => "stock_movements",
            Collection::Categories => "categories",
            Collection::ActivityLogs => "activity_logs",
            Collection::UniformItems => "uniform_items",
            Collection::UniformCategories => "uniform_categories",
            Collection::UniformMovements => "uniform_movements",
            Collection::Issuances => "issuances",
        }
    }
}

impl std::str::FromStr for Collection {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or(())
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_round_trip() {
        for c in Collection::ALL {
            assert_eq!(c.as_str().parse::<Collection>(), Ok(c));
        }
    }

    #[test]
    fn test_collection_unknown() {
        assert!("lots".parse::<Collection>().is_err());
    }
}
