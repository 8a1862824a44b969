//! Per-user category labels
//!
//! Categories are the names a user picks from when recording transactions.
//! Transactions carry the name itself, so renaming or deleting a category
//! leaves existing transactions as they were.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{CategoryId, UserId};

/// Longest accepted category name, in characters
pub const MAX_NAME_LEN: usize = 50;

/// A category owned by one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCategory {
    pub id: CategoryId,
    pub user_id: UserId,
    pub name: String,

    /// Position in the user's list; new categories go last
    pub display_order: u32,

    pub created_at: DateTime<Utc>,
}

impl UserCategory {
    pub fn new(user_id: UserId, name: impl Into<String>, display_order: u32) -> Self {
        Self {
            id: CategoryId::new(),
            user_id,
            name: name.into(),
            display_order,
            created_at: Utc::now(),
        }
    }

    pub fn validate(&self) -> Result<(), CategoryValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(CategoryValidationError::EmptyName);
        }
        let len = name.chars().count();
        if len > MAX_NAME_LEN {
            return Err(CategoryValidationError::NameTooLong(len));
        }
        Ok(())
    }
}

impl fmt::Display for UserCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Validation errors for categories
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for CategoryValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Category name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Category name too long ({} characters, max {})",
                len, MAX_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for CategoryValidationError {}
