//! Dining Table Model

use serde::{Deserialize, Serialize};

/// Table occupancy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStatus {
    #[default]
    Available,
    Occupied,
}

/// Dining table entity (target of a QR code)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiningTable {
    pub id: String,
    pub restaurant_id: String,
    /// Number or display label printed on the table
    pub label: String,
    pub is_active: bool,
    #[serde(default)]
    pub status: TableStatus,
}

impl DiningTable {
    /// Stand-in used when the scanned table is not in the store
    pub fn placeholder(id: &str, restaurant_id: &str) -> Self {
        Self {
            id: id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            label: id.to_string(),
            is_active: true,
            status: TableStatus::Available,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_available() {
        let table: DiningTable = serde_json::from_value(serde_json::json!({
            "id": "t1",
            "restaurant_id": "r1",
            "label": "12",
            "is_active": true
        }))
        .unwrap();
        assert_eq!(table.status, TableStatus::Available);
    }

    #[test]
    fn test_placeholder_uses_id_as_label() {
        let table = DiningTable::placeholder("7", "r1");
        assert_eq!(table.label, "7");
        assert_eq!(table.restaurant_id, "r1");
        assert!(table.is_active);
    }
}
