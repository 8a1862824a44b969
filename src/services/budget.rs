//! Cycle budget service
//!
//! Budgets are keyed by the cycle start string the caller supplies. The key
//! is not checked against the user's anchor day, so a budget written under
//! an old anchor simply stops matching any generated cycle.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CycleBudget, Money, UserId};
use crate::storage::{BudgetStore, Storage};

/// Service for per-cycle budget targets
pub struct BudgetService<'a> {
    storage: &'a Storage,
}

impl<'a> BudgetService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create or replace the budget for `(user, cycle_start)`.
    ///
    /// Both targets are overwritten, including with `None`. Writing the same
    /// values twice leaves the stored budget untouched.
    pub fn set_budget(
        &self,
        user_id: &UserId,
        cycle_start: &str,
        expected_income: Option<Money>,
        expected_expense: Option<Money>,
    ) -> LedgerResult<CycleBudget> {
        let cycle_start = cycle_start.trim();
        if cycle_start.is_empty() {
            return Err(LedgerError::Validation(
                "Cycle start cannot be empty".into(),
            ));
        }

        for target in [expected_income, expected_expense].into_iter().flatten() {
            if target.abs() > Money::max_amount() {
                return Err(LedgerError::Validation(format!(
                    "Budget targets must not exceed {}",
                    Money::max_amount()
                )));
            }
        }

        match self.storage.budgets.get(user_id, cycle_start)? {
            Some(existing) => {
                let mut budget = existing.clone();
                if !budget.set_targets(expected_income, expected_expense) {
                    return Ok(existing);
                }

                self.storage.budgets.upsert(budget.clone())?;
                self.storage.budgets.save()?;
                self.storage.log_update(
                    EntityType::CycleBudget,
                    cycle_start,
                    user_id,
                    &existing,
                    &budget,
                    Some(change_summary(&existing, &budget)),
                )?;

                info!(user = %user_id, cycle_start, "budget updated");
                Ok(budget)
            }
            None => {
                let budget =
                    CycleBudget::new(user_id.clone(), cycle_start, expected_income, expected_expense);

                self.storage.budgets.upsert(budget.clone())?;
                self.storage.budgets.save()?;
                self.storage
                    .log_create(EntityType::CycleBudget, cycle_start, user_id, &budget)?;

                info!(user = %user_id, cycle_start, "budget created");
                Ok(budget)
            }
        }
    }

    pub fn get_budget(&self, user_id: &UserId, cycle_start: &str) -> LedgerResult<Option<CycleBudget>> {
        self.storage.budgets.get(user_id, cycle_start.trim())
    }

    /// All of a user's budgets, ordered by cycle start
    pub fn list_for_user(&self, user_id: &UserId) -> LedgerResult<Vec<CycleBudget>> {
        self.storage.budgets.list_for_user(user_id)
    }

    /// Remove a budget so the cycle reports no targets again
    pub fn clear_budget(&self, user_id: &UserId, cycle_start: &str) -> LedgerResult<CycleBudget> {
        let cycle_start = cycle_start.trim();
        let removed = self
            .storage
            .budgets
            .delete(user_id, cycle_start)?
            .ok_or_else(|| LedgerError::budget_not_found(cycle_start))?;

        self.storage.budgets.save()?;
        self.storage
            .log_delete(EntityType::CycleBudget, cycle_start, user_id, &removed)?;

        info!(user = %user_id, cycle_start, "budget cleared");
        Ok(removed)
    }
}

fn change_summary(before: &CycleBudget, after: &CycleBudget) -> String {
    let show = |m: Option<Money>| m.map(|m| m.to_string()).unwrap_or_else(|| "-".into());
    let mut changes = Vec::new();
    if before.expected_income != after.expected_income {
        changes.push(format!(
            "expected_income: {} -> {}",
            show(before.expected_income),
            show(after.expected_income)
        ));
    }
    if before.expected_expense != after.expected_expense {
        changes.push(format!(
            "expected_expense: {} -> {}",
            show(before.expected_expense),
            show(after.expected_expense)
        ));
    }
    changes.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::Operation;
    use crate::config::paths::LedgerPaths;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_set_then_overwrite() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = UserId::new("alice");

        service
            .set_budget(&alice, "2025-01-15", Some(Money::from_cents(300000)), Some(Money::from_cents(150000)))
            .unwrap();
        let updated = service
            .set_budget(&alice, "2025-01-15", None, Some(Money::from_cents(120000)))
            .unwrap();

        // both fields are overwritten, including back to unset
        assert_eq!(updated.expected_income, None);
        assert_eq!(updated.expected_expense, Some(Money::from_cents(120000)));
        assert_eq!(service.list_for_user(&alice).unwrap().len(), 1);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].operation, Operation::Update);
        assert_eq!(
            entries[1].summary.as_deref(),
            Some("expected_income: 3000.00 -> -, expected_expense: 1500.00 -> 1200.00")
        );
    }

    #[test]
    fn test_repeat_upsert_is_idempotent() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = UserId::new("alice");

        let first = service
            .set_budget(&alice, "2025-01-15", Some(Money::from_cents(100)), None)
            .unwrap();
        let second = service
            .set_budget(&alice, "2025-01-15", Some(Money::from_cents(100)), None)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_get_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = UserId::new("alice");

        assert!(service.get_budget(&alice, "2025-01-15").unwrap().is_none());
        service
            .set_budget(&alice, " 2025-01-15 ", Some(Money::zero()), None)
            .unwrap();

        let budget = service.get_budget(&alice, "2025-01-15").unwrap().unwrap();
        assert_eq!(budget.expected_income, Some(Money::zero()));
        assert!(service.get_budget(&UserId::new("bob"), "2025-01-15").unwrap().is_none());
    }

    #[test]
    fn test_cycle_start_is_not_validated_against_anchor() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = UserId::new("alice");

        // day 3 is not the default anchor; stored as given
        service.set_budget(&alice, "2025-02-03", None, None).unwrap();
        assert!(service.get_budget(&alice, "2025-02-03").unwrap().is_some());
    }

    #[test]
    fn test_empty_cycle_start_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);

        let err = service
            .set_budget(&UserId::new("alice"), "  ", None, None)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_oversized_target_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let huge = Money::parse("50000000000000000000000000000").unwrap();

        let err = service
            .set_budget(&UserId::new("alice"), "2025-01-15", Some(huge), None)
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(storage.budgets.count().unwrap(), 0);
    }

    #[test]
    fn test_clear_budget() {
        let (_temp_dir, storage) = create_test_storage();
        let service = BudgetService::new(&storage);
        let alice = UserId::new("alice");

        service.set_budget(&alice, "2025-01-15", None, None).unwrap();
        service.clear_budget(&alice, "2025-01-15").unwrap();
        assert!(service.get_budget(&alice, "2025-01-15").unwrap().is_none());
        assert!(service.clear_budget(&alice, "2025-01-15").unwrap_err().is_not_found());
    }
}
