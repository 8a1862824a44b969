//! Storage layer for cycle-ledger
//!
//! JSON file repositories with atomic writes, plus the narrow store traits
//! the cycle composer reads through. The traits keep the composer
//! independent of how transactions and budgets are persisted.

pub mod budgets;
pub mod categories;
pub mod file_io;
pub mod preferences;
pub mod transactions;

pub use budgets::BudgetRepository;
pub use categories::CategoryRepository;
pub use file_io::{read_json, write_json_atomic};
pub use preferences::PreferenceRepository;
pub use transactions::TransactionRepository;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::LedgerError;
use crate::models::{CycleBudget, Transaction, UserId, UserPreferences};

/// Read access to a user's transactions
pub trait TransactionStore {
    /// Transactions with `start <= timestamp <= end`, oldest first
    fn find_in_range(
        &self,
        user_id: &UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>, LedgerError>;

    /// Transactions at or after `start` (all of them for `None`), newest first
    fn find_since(
        &self,
        user_id: &UserId,
        start: Option<NaiveDateTime>,
    ) -> Result<Vec<Transaction>, LedgerError>;
}

/// Budgets keyed by (user, cycle start string)
pub trait BudgetStore {
    fn get(&self, user_id: &UserId, cycle_start: &str) -> Result<Option<CycleBudget>, LedgerError>;

    /// Insert, or replace the budget with the same key
    fn upsert(&self, budget: CycleBudget) -> Result<(), LedgerError>;

    /// A user's budgets ordered by cycle start
    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CycleBudget>, LedgerError>;
}

/// Per-user preferences
pub trait PreferenceStore {
    /// Stored preferences, or defaults for an unknown user
    fn get(&self, user_id: &UserId) -> Result<UserPreferences, LedgerError>;

    fn put(&self, user_id: &UserId, preferences: UserPreferences) -> Result<(), LedgerError>;
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub transactions: TransactionRepository,
    pub budgets: BudgetRepository,
    pub preferences: PreferenceRepository,
    pub categories: CategoryRepository,
    audit: AuditLogger,
}

impl Storage {
    /// Create the repositories, making sure the data directory exists
    pub fn new(paths: LedgerPaths) -> Result<Self, LedgerError> {
        paths.ensure_directories()?;

        Ok(Self {
            transactions: TransactionRepository::new(paths.transactions_file()),
            budgets: BudgetRepository::new(paths.budgets_file()),
            preferences: PreferenceRepository::new(paths.preferences_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            audit: AuditLogger::new(paths.audit_log()),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), LedgerError> {
        self.transactions.load()?;
        self.budgets.load()?;
        self.preferences.load()?;
        self.categories.load()?;
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), LedgerError> {
        self.transactions.save()?;
        self.budgets.save()?;
        self.preferences.save()?;
        self.categories.save()?;
        Ok(())
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        user_id: &UserId,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::create(entity_type, entity_id, user_id, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        user_id: &UserId,
        before: &T,
        after: &T,
        summary: Option<String>,
    ) -> Result<(), LedgerError> {
        let mut entry = AuditEntry::update(entity_type, entity_id, user_id, before, after);
        entry.summary = summary;
        self.audit.log(&entry)
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: impl Into<String>,
        user_id: &UserId,
        entity: &T,
    ) -> Result<(), LedgerError> {
        self.audit
            .log(&AuditEntry::delete(entity_type, entity_id, user_id, entity))
    }
}

impl TransactionStore for Storage {
    fn find_in_range(
        &self,
        user_id: &UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.transactions.find_in_range(user_id, start, end)
    }

    fn find_since(
        &self,
        user_id: &UserId,
        start: Option<NaiveDateTime>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        self.transactions.find_since(user_id, start)
    }
}

impl BudgetStore for Storage {
    fn get(&self, user_id: &UserId, cycle_start: &str) -> Result<Option<CycleBudget>, LedgerError> {
        self.budgets.get(user_id, cycle_start)
    }

    fn upsert(&self, budget: CycleBudget) -> Result<(), LedgerError> {
        self.budgets.upsert(budget)
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CycleBudget>, LedgerError> {
        self.budgets.list_for_user(user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    #[test]
    fn test_storage_creation() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();

        assert!(temp_dir.path().join("data").exists());
        storage.load_all().unwrap();
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_save_all_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths.clone()).unwrap();
        let alice = UserId::new("alice");

        BudgetStore::upsert(
            &storage,
            CycleBudget::new(alice.clone(), "2025-01-15", Some(Money::from_cents(100)), None),
        )
        .unwrap();
        storage.save_all().unwrap();

        let reopened = Storage::new(paths).unwrap();
        reopened.load_all().unwrap();
        assert!(BudgetStore::get(&reopened, &alice, "2025-01-15")
            .unwrap()
            .is_some());
    }

    #[test]
    fn test_audit_helpers_append() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        let alice = UserId::new("alice");

        storage
            .log_create(EntityType::Preferences, "alice", &alice, &UserPreferences::default())
            .unwrap();
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }
}
