use serde::Serialize;
use std::path::PathBuf;

use crate::model::{Equipment, Transaction};
use crate::storage::InventorySummary;

/// Equipment with its low-stock flag, for list views.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentRow {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub low_stock: bool,
}

impl From<Equipment> for EquipmentRow {
    fn from(equipment: Equipment) -> Self {
        let low_stock = equipment.is_low_stock();
        Self {
            equipment,
            low_stock,
        }
    }
}

/// Equipment with its full history, for the show view.
#[derive(Debug, Clone, Serialize)]
pub struct EquipmentDetails {
    #[serde(flatten)]
    pub equipment: Equipment,
    pub low_stock: bool,
    pub history: Vec<Transaction>,
}

/// One page of the transaction log.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub page: usize,
    pub page_size: usize,
    pub total: usize,
    pub transactions: Vec<Transaction>,
}

/// Aggregate statistics.
#[derive(Debug, Clone, Serialize)]
pub struct Statistics {
    #[serde(flatten)]
    pub summary: InventorySummary,
    pub categories: usize,
    pub transactions: usize,
}

/// Result of writing a file (backup or export).
#[derive(Debug, Clone, Serialize)]
pub struct FileWritten {
    pub path: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bytes: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rows: Option<usize>,
}

/// Outcome of a quantity adjustment.
#[derive(Debug, Clone, Serialize)]
pub struct AdjustResult {
    pub id: String,
    pub new_quantity: i64,
    pub low_stock: bool,
}
