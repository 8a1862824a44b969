//! Transaction service
//!
//! Records, edits and removes transactions for a user. Amounts keep their
//! original currency; only codes the rate table can convert are accepted,
//! so later aggregation cannot fail on data written through here.

use chrono::{NaiveDateTime, Utc};
use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Transaction, TransactionId, TransactionKind, UserId};
use crate::services::currency::RateTable;
use crate::storage::{Storage, TransactionStore};

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub user_id: UserId,
    pub amount: Money,
    pub currency: String,
    pub kind: TransactionKind,
    pub timestamp: NaiveDateTime,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

/// Changes to an existing transaction; `None` leaves a field as it is.
///
/// For the optional text fields, `Some` of a blank string clears the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub amount: Option<Money>,
    pub currency: Option<String>,
    pub kind: Option<TransactionKind>,
    pub timestamp: Option<NaiveDateTime>,
    pub category: Option<String>,
    pub payment_method: Option<String>,
    pub description: Option<String>,
}

impl UpdateTransactionInput {
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.currency.is_none()
            && self.kind.is_none()
            && self.timestamp.is_none()
            && self.category.is_none()
            && self.payment_method.is_none()
            && self.description.is_none()
    }
}

/// Options for listing transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    pub kind: Option<TransactionKind>,
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inclusive timestamp bounds
    pub fn between(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    pub fn kind(mut self, kind: TransactionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
    rates: &'a RateTable,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage, rates: &'a RateTable) -> Self {
        Self { storage, rates }
    }

    /// Record a transaction
    pub fn create(&self, input: CreateTransactionInput) -> LedgerResult<Transaction> {
        let currency = self.rates.supported_code(&input.currency)?;

        let mut txn = Transaction::new(
            input.user_id,
            input.amount,
            currency,
            input.kind,
            input.timestamp,
        );
        txn.category = clean(input.category);
        txn.payment_method = clean(input.payment_method);
        txn.description = clean(input.description);

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;
        self.storage
            .log_create(EntityType::Transaction, txn.id.to_string(), &txn.user_id, &txn)?;

        info!(
            user = %txn.user_id,
            transaction = %txn.id,
            kind = %txn.kind,
            currency = %txn.currency,
            "transaction recorded"
        );
        Ok(txn)
    }

    /// Edit one of a user's transactions. The currency is checked against the
    /// rate table again, and the amount is re-validated.
    pub fn update(
        &self,
        user_id: &UserId,
        id: TransactionId,
        changes: UpdateTransactionInput,
    ) -> LedgerResult<Transaction> {
        let before = self
            .storage
            .transactions
            .get(id)?
            .filter(|txn| &txn.user_id == user_id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        let mut txn = before.clone();
        if let Some(amount) = changes.amount {
            txn.amount = amount;
        }
        if let Some(currency) = &changes.currency {
            txn.currency = self.rates.supported_code(currency)?;
        }
        if let Some(kind) = changes.kind {
            txn.kind = kind;
        }
        if let Some(timestamp) = changes.timestamp {
            txn.timestamp = timestamp;
        }
        if let Some(category) = changes.category {
            txn.category = clean(Some(category));
        }
        if let Some(method) = changes.payment_method {
            txn.payment_method = clean(Some(method));
        }
        if let Some(description) = changes.description {
            txn.description = clean(Some(description));
        }

        txn.validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        let summary = change_summary(&before, &txn);
        if summary.is_empty() {
            return Ok(before);
        }
        txn.updated_at = Some(Utc::now());

        self.storage.transactions.upsert(txn.clone())?;
        self.storage.transactions.save()?;
        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            user_id,
            &before,
            &txn,
            Some(summary),
        )?;

        info!(user = %user_id, transaction = %txn.id, "transaction updated");
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> LedgerResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find one of a user's transactions by full id or by the short
    /// `txn-xxxxxxxx` form shown in listings. An ambiguous prefix finds
    /// nothing.
    pub fn find(&self, user_id: &UserId, identifier: &str) -> LedgerResult<Option<Transaction>> {
        if let Ok(id) = identifier.parse::<TransactionId>() {
            return Ok(self
                .storage
                .transactions
                .get(id)?
                .filter(|txn| &txn.user_id == user_id));
        }

        let prefix = identifier.trim();
        let prefix = prefix.strip_prefix("txn-").unwrap_or(prefix).to_ascii_lowercase();
        if prefix.is_empty() {
            return Ok(None);
        }

        let mut matches = self
            .storage
            .transactions
            .get_for_user(user_id)?
            .into_iter()
            .filter(|txn| txn.id.as_uuid().to_string().starts_with(&prefix));

        match (matches.next(), matches.next()) {
            (Some(txn), None) => Ok(Some(txn)),
            _ => Ok(None),
        }
    }

    /// A user's transactions, newest first
    pub fn list(&self, user_id: &UserId, filter: TransactionFilter) -> LedgerResult<Vec<Transaction>> {
        let mut transactions = self.storage.transactions.find_since(user_id, filter.start)?;

        if let Some(end) = filter.end {
            transactions.retain(|t| t.timestamp <= end);
        }
        if let Some(kind) = filter.kind {
            transactions.retain(|t| t.kind == kind);
        }
        if let Some(limit) = filter.limit {
            transactions.truncate(limit);
        }

        Ok(transactions)
    }

    /// Delete one of a user's transactions
    pub fn delete(&self, user_id: &UserId, id: TransactionId) -> LedgerResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .filter(|txn| &txn.user_id == user_id)
            .ok_or_else(|| LedgerError::transaction_not_found(id.to_string()))?;

        self.storage.transactions.delete(id)?;
        self.storage.transactions.save()?;
        self.storage
            .log_delete(EntityType::Transaction, id.to_string(), user_id, &txn)?;

        info!(user = %user_id, transaction = %id, "transaction deleted");
        Ok(txn)
    }
}

fn change_summary(before: &Transaction, after: &Transaction) -> String {
    let show = |v: &Option<String>| v.clone().unwrap_or_else(|| "-".into());
    let mut changes = Vec::new();
    if before.amount != after.amount || before.currency != after.currency {
        changes.push(format!(
            "amount: {} {} -> {} {}",
            before.amount, before.currency, after.amount, after.currency
        ));
    }
    if before.kind != after.kind {
        changes.push(format!("kind: {} -> {}", before.kind, after.kind));
    }
    if before.timestamp != after.timestamp {
        changes.push(format!(
            "timestamp: {} -> {}",
            before.timestamp.format("%Y-%m-%d %H:%M:%S"),
            after.timestamp.format("%Y-%m-%d %H:%M:%S")
        ));
    }
    if before.category != after.category {
        changes.push(format!(
            "category: {} -> {}",
            show(&before.category),
            show(&after.category)
        ));
    }
    if before.payment_method != after.payment_method {
        changes.push(format!(
            "payment_method: {} -> {}",
            show(&before.payment_method),
            show(&after.payment_method)
        ));
    }
    if before.description != after.description {
        changes.push("description changed".to_string());
    }
    changes.join(", ")
}

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn at(d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 3, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn input(user: &str, cents: i64, currency: &str, when: NaiveDateTime) -> CreateTransactionInput {
        CreateTransactionInput {
            user_id: UserId::new(user),
            amount: Money::from_cents(cents),
            currency: currency.into(),
            kind: TransactionKind::Expense,
            timestamp: when,
            category: Some(" Food ".into()),
            payment_method: Some("".into()),
            description: None,
        }
    }

    #[test]
    fn test_create_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);

        let txn = service.create(input("alice", 1250, "usd", at(10, 9))).unwrap();
        assert_eq!(txn.currency.as_str(), "USD");
        assert_eq!(txn.amount.amount(), dec!(12.50));
        assert_eq!(txn.category.as_deref(), Some("Food"));
        assert_eq!(txn.payment_method, None);

        let stored = service.get(txn.id).unwrap().unwrap();
        assert_eq!(stored.id, txn.id);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
    }

    #[test]
    fn test_unsupported_currency_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);

        let err = service.create(input("alice", 100, "XYZ", at(10, 9))).unwrap_err();
        assert!(err.is_unsupported_currency());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_negative_amount_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);

        let err = service.create(input("alice", -100, "GBP", at(10, 9))).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_oversized_amount_is_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);

        let mut huge = input("alice", 0, "GBP", at(10, 9));
        huge.amount = Money::parse("50000000000000000000000000000").unwrap();
        assert!(service.create(huge).unwrap_err().is_validation());
        assert_eq!(storage.transactions.count().unwrap(), 0);
    }

    #[test]
    fn test_list_filters() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);

        for day in [1, 5, 9, 20] {
            service.create(input("alice", 100, "GBP", at(day, 12))).unwrap();
        }
        service.create(input("bob", 100, "GBP", at(5, 12))).unwrap();

        let alice = UserId::new("alice");
        assert_eq!(service.list(&alice, TransactionFilter::new()).unwrap().len(), 4);

        let ranged = service
            .list(&alice, TransactionFilter::new().between(at(5, 0), at(9, 23)))
            .unwrap();
        assert_eq!(ranged.len(), 2);
        assert!(ranged[0].timestamp > ranged[1].timestamp);

        let limited = service.list(&alice, TransactionFilter::new().limit(1)).unwrap();
        assert_eq!(limited[0].timestamp, at(20, 12));

        let income = service
            .list(&alice, TransactionFilter::new().kind(TransactionKind::Income))
            .unwrap();
        assert!(income.is_empty());
    }

    #[test]
    fn test_find_by_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);
        let alice = UserId::new("alice");

        let txn = service.create(input("alice", 100, "GBP", at(1, 12))).unwrap();
        let short = txn.id.to_string();
        assert!(short.starts_with("txn-"));

        assert_eq!(service.find(&alice, &short).unwrap().unwrap().id, txn.id);
        assert_eq!(
            service
                .find(&alice, &txn.id.as_uuid().to_string())
                .unwrap()
                .unwrap()
                .id,
            txn.id
        );
        assert!(service.find(&UserId::new("bob"), &short).unwrap().is_none());
    }

    #[test]
    fn test_update_transaction() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);
        let alice = UserId::new("alice");

        let txn = service.create(input("alice", 1000, "GBP", at(1, 12))).unwrap();
        let updated = service
            .update(
                &alice,
                txn.id,
                UpdateTransactionInput {
                    amount: Some(Money::from_cents(2500)),
                    currency: Some("eur".into()),
                    category: Some("  ".into()),
                    payment_method: Some("Card".into()),
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(updated.amount.amount(), dec!(25.00));
        assert_eq!(updated.currency.as_str(), "EUR");
        assert_eq!(updated.category, None);
        assert_eq!(updated.payment_method.as_deref(), Some("Card"));
        assert_eq!(updated.timestamp, txn.timestamp);
        assert!(updated.updated_at.is_some());
        assert_eq!(service.get(txn.id).unwrap().unwrap().currency.as_str(), "EUR");

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[1].summary.as_deref(),
            Some("amount: 10.00 GBP -> 25.00 EUR, category: Food -> -, payment_method: - -> Card")
        );
    }

    #[test]
    fn test_update_rechecks_currency_and_owner() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);
        let alice = UserId::new("alice");

        let txn = service.create(input("alice", 1000, "GBP", at(1, 12))).unwrap();

        let err = service
            .update(
                &alice,
                txn.id,
                UpdateTransactionInput {
                    currency: Some("XYZ".into()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_unsupported_currency());

        let err = service
            .update(
                &alice,
                txn.id,
                UpdateTransactionInput {
                    amount: Some(Money::from_cents(-1)),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .update(&UserId::new("bob"), txn.id, UpdateTransactionInput::default())
            .unwrap_err();
        assert!(err.is_not_found());

        // nothing changed, nothing audited
        let same = service
            .update(&alice, txn.id, UpdateTransactionInput::default())
            .unwrap();
        assert_eq!(same.updated_at, None);
        assert_eq!(storage.audit().read_all().unwrap().len(), 1);
        assert_eq!(service.get(txn.id).unwrap().unwrap().currency.as_str(), "GBP");
    }

    #[test]
    fn test_delete_is_user_scoped() {
        let (_temp_dir, storage) = create_test_storage();
        let rates = RateTable::builtin();
        let service = TransactionService::new(&storage, &rates);

        let txn = service.create(input("alice", 100, "GBP", at(1, 12))).unwrap();

        let err = service.delete(&UserId::new("bob"), txn.id).unwrap_err();
        assert!(err.is_not_found());

        service.delete(&UserId::new("alice"), txn.id).unwrap();
        assert!(service.get(txn.id).unwrap().is_none());
        assert_eq!(storage.audit().read_all().unwrap().len(), 2);
    }
}
