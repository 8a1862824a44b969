//! Cycle budget repository backed by `budgets.json`

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::LedgerError;
use crate::models::{CycleBudget, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::BudgetStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct BudgetData {
    #[serde(default)]
    budgets: Vec<CycleBudget>,
}

/// (user, cycle start) uniquely identifies a budget
type BudgetKey = (UserId, String);

/// Repository for cycle budget persistence
pub struct BudgetRepository {
    path: PathBuf,
    budgets: RwLock<BTreeMap<BudgetKey, CycleBudget>>,
}

impl BudgetRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            budgets: RwLock::new(BTreeMap::new()),
        }
    }

    /// Load budgets from disk. A later duplicate key replaces an earlier one.
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: BudgetData = read_json(&self.path)?;

        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;

        budgets.clear();
        for budget in file_data.budgets {
            budgets.insert((budget.user_id.clone(), budget.cycle_start.clone()), budget);
        }

        Ok(())
    }

    /// Save budgets to disk, ordered by user then cycle start
    pub fn save(&self) -> Result<(), LedgerError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let file_data = BudgetData {
            budgets: budgets.values().cloned().collect(),
        };
        write_json_atomic(&self.path, &file_data)
    }

    /// Remove a budget, returning it if it existed
    pub fn delete(
        &self,
        user_id: &UserId,
        cycle_start: &str,
    ) -> Result<Option<CycleBudget>, LedgerError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        Ok(budgets.remove(&(user_id.clone(), cycle_start.to_string())))
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets.len())
    }
}

impl BudgetStore for BudgetRepository {
    fn get(&self, user_id: &UserId, cycle_start: &str) -> Result<Option<CycleBudget>, LedgerError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets
            .get(&(user_id.clone(), cycle_start.to_string()))
            .cloned())
    }

    fn upsert(&self, budget: CycleBudget) -> Result<(), LedgerError> {
        let mut budgets = self
            .budgets
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        budgets.insert((budget.user_id.clone(), budget.cycle_start.clone()), budget);
        Ok(())
    }

    fn list_for_user(&self, user_id: &UserId) -> Result<Vec<CycleBudget>, LedgerError> {
        let budgets = self
            .budgets
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(budgets
            .values()
            .filter(|b| &b.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, BudgetRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        (temp_dir, repo)
    }

    #[test]
    fn test_upsert_replaces_by_key() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::new("alice");

        repo.upsert(CycleBudget::new(alice.clone(), "2025-01-15", Some(Money::from_cents(300000)), None))
            .unwrap();
        repo.upsert(CycleBudget::new(alice.clone(), "2025-01-15", None, Some(Money::from_cents(150000))))
            .unwrap();

        assert_eq!(repo.count().unwrap(), 1);
        let budget = repo.get(&alice, "2025-01-15").unwrap().unwrap();
        assert_eq!(budget.expected_income, None);
        assert_eq!(budget.expected_expense, Some(Money::from_cents(150000)));
    }

    #[test]
    fn test_budgets_are_user_scoped() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(CycleBudget::new(UserId::new("alice"), "2025-01-15", None, None))
            .unwrap();

        assert!(repo.get(&UserId::new("bob"), "2025-01-15").unwrap().is_none());
        assert!(repo.list_for_user(&UserId::new("bob")).unwrap().is_empty());
    }

    #[test]
    fn test_list_is_ordered_by_cycle_start() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::new("alice");
        for start in ["2025-03-15", "2025-01-15", "2025-02-15"] {
            repo.upsert(CycleBudget::new(alice.clone(), start, None, None)).unwrap();
        }

        let starts: Vec<String> = repo
            .list_for_user(&alice)
            .unwrap()
            .into_iter()
            .map(|b| b.cycle_start)
            .collect();
        assert_eq!(starts, vec!["2025-01-15", "2025-02-15", "2025-03-15"]);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let alice = UserId::new("alice");
        repo.upsert(CycleBudget::new(alice.clone(), "2025-01-15", Some(Money::zero()), None))
            .unwrap();
        repo.save().unwrap();

        let repo2 = BudgetRepository::new(temp_dir.path().join("budgets.json"));
        repo2.load().unwrap();
        let budget = repo2.get(&alice, "2025-01-15").unwrap().unwrap();
        // zero is a target, not an absent one
        assert_eq!(budget.expected_income, Some(Money::zero()));
        assert_eq!(budget.expected_expense, None);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let alice = UserId::new("alice");
        repo.upsert(CycleBudget::new(alice.clone(), "2025-01-15", None, None)).unwrap();

        assert!(repo.delete(&alice, "2025-01-15").unwrap().is_some());
        assert!(repo.get(&alice, "2025-01-15").unwrap().is_none());
    }
}
