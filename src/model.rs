//! Core data types for `equipment_tracker`.
//!
//! [`Equipment`] is one trackable item line. [`Transaction`] is one immutable
//! audit record; it carries a copy of the equipment name so history survives
//! renames and deletes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::TrackerError;

/// Kind of change recorded in the transaction log.
///
/// Persisted as the capitalized variant name (`"Create"`, `"Remove"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeType {
    Create,
    Update,
    Add,
    Remove,
    Delete,
}

impl ChangeType {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Update => "Update",
            Self::Add => "Add",
            Self::Remove => "Remove",
            Self::Delete => "Delete",
        }
    }
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChangeType {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "create" => Ok(Self::Create),
            "update" => Ok(Self::Update),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            "delete" => Ok(Self::Delete),
            _ => Err(TrackerError::InvalidChangeType {
                value: s.to_string(),
            }),
        }
    }
}

impl Serialize for ChangeType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ChangeType {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// Direction of a quantity adjustment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustDirection {
    Add,
    Remove,
}

impl AdjustDirection {
    #[must_use]
    pub const fn from_is_add(is_add: bool) -> Self {
        if is_add { Self::Add } else { Self::Remove }
    }

    #[must_use]
    pub const fn change_type(self) -> ChangeType {
        match self {
            Self::Add => ChangeType::Add,
            Self::Remove => ChangeType::Remove,
        }
    }

    /// Compute the post-adjustment quantity.
    ///
    /// Removal clamps at zero. Returns `None` only if an addition overflows.
    #[must_use]
    pub const fn apply(self, current: i64, delta: i64) -> Option<i64> {
        match self {
            Self::Add => current.checked_add(delta),
            Self::Remove => {
                let remaining = current.saturating_sub(delta);
                Some(if remaining < 0 { 0 } else { remaining })
            }
        }
    }

    /// Default note used when the caller supplies none.
    #[must_use]
    pub fn default_note(self, delta: i64) -> String {
        match self {
            Self::Add => format!("Added {delta} units."),
            Self::Remove => format!("Removed {delta} units."),
        }
    }
}

/// One trackable item line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Equipment {
    /// Unique ID (e.g., "eq-k3x9a").
    pub id: String,

    /// Display name, never empty.
    pub name: String,

    /// Current on-hand count.
    pub quantity: i64,

    /// Free-form grouping label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Threshold at or below which the item counts as low stock.
    #[serde(default)]
    pub min_stock_level: i64,

    /// Timestamp of the most recent mutation.
    pub last_updated: DateTime<Utc>,
}

impl Equipment {
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock_level
    }
}

/// Input for creating equipment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEquipment {
    pub name: String,
    pub quantity: i64,
    pub category: Option<String>,
    pub min_stock_level: i64,
}

impl NewEquipment {
    #[must_use]
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub const fn min_stock_level(mut self, level: i64) -> Self {
        self.min_stock_level = level;
        self
    }
}

/// Replacement values for the non-quantity fields of an equipment record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentUpdate {
    pub name: String,
    pub category: Option<String>,
    pub min_stock_level: i64,
}

impl From<&Equipment> for EquipmentUpdate {
    fn from(equipment: &Equipment) -> Self {
        Self {
            name: equipment.name.clone(),
            category: equipment.category.clone(),
            min_stock_level: equipment.min_stock_level,
        }
    }
}

/// An entry in the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Transaction {
    pub id: i64,
    pub equipment_id: String,
    /// Name at the time of the event, not the current one.
    pub equipment_name: String,
    pub timestamp: DateTime<Utc>,
    pub change_type: ChangeType,
    pub old_quantity: i64,
    pub new_quantity: i64,
    #[serde(default)]
    pub notes: String,
}

impl Transaction {
    /// Signed quantity change carried by this entry.
    #[must_use]
    pub const fn delta(&self) -> i64 {
        self.new_quantity - self.old_quantity
    }
}
