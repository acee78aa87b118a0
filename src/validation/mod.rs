//! Validation helpers for `equipment_tracker`.
//!
//! These routines enforce the data constraints on equipment input and return
//! structured validation errors without touching storage.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{TrackerError, ValidationError};
use crate::model::{EquipmentUpdate, NewEquipment};

const MAX_NAME_LEN: usize = 200;
const MAX_CATEGORY_LEN: usize = 100;
const MAX_NOTES_LEN: usize = 2_000;

static ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]{1,10}-[a-z0-9]{3,12}$").expect("static id pattern"));

/// Validates equipment fields.
pub struct EquipmentValidator;

impl EquipmentValidator {
    /// Validate input for a new record and return all validation errors found.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_new(input: &NewEquipment) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_name(&input.name, &mut errors);
        check_category(input.category.as_deref(), &mut errors);
        if input.quantity < 0 {
            errors.push(ValidationError::new("quantity", "must be >= 0"));
        }
        check_min_stock(input.min_stock_level, &mut errors);
        finish(errors)
    }

    /// Validate a metadata update.
    ///
    /// # Errors
    ///
    /// Returns a `Vec<ValidationError>` if any validation rules are violated.
    pub fn validate_update(update: &EquipmentUpdate) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();
        check_name(&update.name, &mut errors);
        check_category(update.category.as_deref(), &mut errors);
        check_min_stock(update.min_stock_level, &mut errors);
        finish(errors)
    }

    /// Validate the amount and note of a quantity adjustment.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if `delta` is not positive or the note is too long.
    pub fn validate_adjustment(delta: i64, notes: &str) -> Result<(), TrackerError> {
        if delta <= 0 {
            return Err(TrackerError::validation("delta", "must be > 0"));
        }
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(TrackerError::validation("notes", "exceeds 2000 characters"));
        }
        Ok(())
    }
}

/// Validate transaction-log paging arguments (1-based page, non-empty page).
///
/// # Errors
///
/// Returns `Validation` when either argument is zero.
pub fn validate_page(page: usize, page_size: usize) -> Result<(), TrackerError> {
    if page == 0 {
        return Err(TrackerError::validation("page", "must be >= 1"));
    }
    if page_size == 0 {
        return Err(TrackerError::validation("page_size", "must be >= 1"));
    }
    Ok(())
}

/// Trim a name for storage.
#[must_use]
pub fn normalize_name(name: &str) -> String {
    name.trim().to_string()
}

/// Trim a category; blank becomes `None`.
#[must_use]
pub fn normalize_category(category: Option<&str>) -> Option<String> {
    category
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(ToString::to_string)
}

/// Check if a string looks like a generated equipment ID (`prefix-hash`).
#[must_use]
pub fn is_valid_id_format(id: &str) -> bool {
    ID_PATTERN.is_match(id)
}

/// Reject input that cannot be an equipment ID before it reaches storage.
///
/// # Errors
///
/// Returns `Validation` on field `id` when the format does not match.
pub fn validate_id(id: &str) -> Result<(), TrackerError> {
    if is_valid_id_format(id) {
        Ok(())
    } else {
        Err(TrackerError::validation(
            "id",
            format!("'{id}' is not an equipment ID (expected e.g. eq-a1b2)"),
        ))
    }
}

fn check_name(name: &str, errors: &mut Vec<ValidationError>) {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        errors.push(ValidationError::new("name", "cannot be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        errors.push(ValidationError::new("name", "exceeds 200 characters"));
    }
}

fn check_category(category: Option<&str>, errors: &mut Vec<ValidationError>) {
    if let Some(category) = category {
        if category.trim().chars().count() > MAX_CATEGORY_LEN {
            errors.push(ValidationError::new("category", "exceeds 100 characters"));
        }
    }
}

fn check_min_stock(level: i64, errors: &mut Vec<ValidationError>) {
    if level < 0 {
        errors.push(ValidationError::new("min_stock_level", "must be >= 0"));
    }
}

fn finish(errors: Vec<ValidationError>) -> Result<(), Vec<ValidationError>> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
