//! Transaction repository backed by `transactions.json`
//!
//! Holds every user's transactions in memory with a per-user index and
//! answers the time-range queries the cycle composer issues.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use chrono::NaiveDateTime;

use crate::error::LedgerError;
use crate::models::{Transaction, TransactionId, UserId};

use super::file_io::{read_json, write_json_atomic};
use super::TransactionStore;

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// user -> transaction ids
    by_user: RwLock<HashMap<UserId, Vec<TransactionId>>>,
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_user: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the user index
    pub fn load(&self) -> Result<(), LedgerError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(lock_err)?;
        let mut by_user = self.by_user.write().map_err(lock_err)?;
        data.clear();
        by_user.clear();

        for txn in file_data.transactions {
            by_user.entry(txn.user_id.clone()).or_default().push(txn.id);
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    /// Save transactions to disk, newest first
    pub fn save(&self) -> Result<(), LedgerError> {
        let data = self.data.read().map_err(lock_err)?;

        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then(b.created_at.cmp(&a.created_at)));

        write_json_atomic(&self.path, &TransactionData { transactions })
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let data = self.data.read().map_err(lock_err)?;
        Ok(data.get(&id).cloned())
    }

    /// All of a user's transactions, newest first
    pub fn get_for_user(&self, user_id: &UserId) -> Result<Vec<Transaction>, LedgerError> {
        let mut list = self.collect_for_user(user_id, |_| true)?;
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(list)
    }

    /// Insert or replace a transaction
    pub fn upsert(&self, txn: Transaction) -> Result<(), LedgerError> {
        let mut data = self.data.write().map_err(lock_err)?;
        let mut by_user = self.by_user.write().map_err(lock_err)?;

        if let Some(old) = data.get(&txn.id) {
            if old.user_id != txn.user_id {
                if let Some(ids) = by_user.get_mut(&old.user_id) {
                    ids.retain(|id| *id != txn.id);
                }
            }
        }

        let ids = by_user.entry(txn.user_id.clone()).or_default();
        if !ids.contains(&txn.id) {
            ids.push(txn.id);
        }
        data.insert(txn.id, txn);
        Ok(())
    }

    /// Remove a transaction, returning it if it existed
    pub fn delete(&self, id: TransactionId) -> Result<Option<Transaction>, LedgerError> {
        let mut data = self.data.write().map_err(lock_err)?;
        let mut by_user = self.by_user.write().map_err(lock_err)?;

        let removed = data.remove(&id);
        if let Some(txn) = &removed {
            if let Some(ids) = by_user.get_mut(&txn.user_id) {
                ids.retain(|other| *other != id);
            }
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, LedgerError> {
        let data = self.data.read().map_err(lock_err)?;
        Ok(data.len())
    }

    fn collect_for_user<F>(&self, user_id: &UserId, keep: F) -> Result<Vec<Transaction>, LedgerError>
    where
        F: Fn(&Transaction) -> bool,
    {
        let data = self.data.read().map_err(lock_err)?;
        let by_user = self.by_user.read().map_err(lock_err)?;

        Ok(by_user
            .get(user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| data.get(id))
                    .filter(|txn| keep(txn))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

impl TransactionStore for TransactionRepository {
    fn find_in_range(
        &self,
        user_id: &UserId,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut list =
            self.collect_for_user(user_id, |txn| txn.timestamp >= start && txn.timestamp <= end)?;
        list.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(list)
    }

    fn find_since(
        &self,
        user_id: &UserId,
        start: Option<NaiveDateTime>,
    ) -> Result<Vec<Transaction>, LedgerError> {
        let mut list =
            self.collect_for_user(user_id, |txn| start.map_or(true, |s| txn.timestamp >= s))?;
        list.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(list)
    }
}

fn lock_err<E: std::fmt::Display>(e: E) -> LedgerError {
    LedgerError::Storage(format!("Failed to acquire lock: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CurrencyCode, Money, TransactionKind};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        (temp_dir, repo)
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn txn(user: &str, when: NaiveDateTime) -> Transaction {
        Transaction::new(
            UserId::new(user),
            Money::from_cents(500),
            CurrencyCode::parse("GBP").unwrap(),
            TransactionKind::Expense,
            when,
        )
    }

    #[test]
    fn test_find_in_range_is_inclusive_and_user_scoped() {
        let (_temp_dir, repo) = create_test_repo();
        repo.load().unwrap();

        repo.upsert(txn("alice", at(1, 0))).unwrap();
        repo.upsert(txn("alice", at(14, 23))).unwrap();
        repo.upsert(txn("alice", at(15, 0))).unwrap();
        repo.upsert(txn("bob", at(5, 12))).unwrap();

        let alice = UserId::new("alice");
        let found = repo
            .find_in_range(&alice, at(1, 0), at(14, 23))
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].timestamp < found[1].timestamp);

        let bob = repo
            .find_in_range(&UserId::new("bob"), at(1, 0), at(31, 23))
            .unwrap();
        assert_eq!(bob.len(), 1);
    }

    #[test]
    fn test_find_since() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(txn("alice", at(1, 0))).unwrap();
        repo.upsert(txn("alice", at(20, 0))).unwrap();

        let alice = UserId::new("alice");
        assert_eq!(repo.find_since(&alice, None).unwrap().len(), 2);
        assert_eq!(repo.find_since(&alice, Some(at(10, 0))).unwrap().len(), 1);
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let t = txn("alice", at(3, 9)).with_category("Food");
        let id = t.id;
        repo.upsert(t).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        let loaded = repo2.get(id).unwrap().unwrap();
        assert_eq!(loaded.category.as_deref(), Some("Food"));
        assert_eq!(repo2.get_for_user(&UserId::new("alice")).unwrap().len(), 1);
    }

    #[test]
    fn test_delete() {
        let (_temp_dir, repo) = create_test_repo();
        let t = txn("alice", at(3, 9));
        let id = t.id;
        repo.upsert(t).unwrap();

        assert!(repo.delete(id).unwrap().is_some());
        assert!(repo.delete(id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
        assert!(repo.get_for_user(&UserId::new("alice")).unwrap().is_empty());
    }
}
