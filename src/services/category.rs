//! Category service
//!
//! Maintains each user's list of category names. Names are unique per user
//! after trimming; matching is case-sensitive.

use tracing::info;

use crate::audit::EntityType;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{CategoryId, UserCategory, UserId};
use crate::storage::Storage;

/// Service for per-user categories
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// A user's categories in display order
    pub fn list(&self, user_id: &UserId) -> LedgerResult<Vec<UserCategory>> {
        self.storage.categories.list_for_user(user_id)
    }

    /// Add a category at the end of the user's list
    pub fn create(&self, user_id: &UserId, name: &str) -> LedgerResult<UserCategory> {
        let name = name.trim();
        let existing = self.list(user_id)?;
        if existing.iter().any(|c| c.name == name) {
            return Err(LedgerError::Validation(format!(
                "Category '{}' already exists",
                name
            )));
        }

        let category = UserCategory::new(user_id.clone(), name, existing.len() as u32);
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;
        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            user_id,
            &category,
        )?;

        info!(user = %user_id, category = %category.name, "category created");
        Ok(category)
    }

    /// Find one of a user's categories by id, short id or exact name
    pub fn find(&self, user_id: &UserId, identifier: &str) -> LedgerResult<Option<UserCategory>> {
        let identifier = identifier.trim();

        if let Ok(id) = identifier.parse::<CategoryId>() {
            return Ok(self
                .storage
                .categories
                .get(id)?
                .filter(|c| &c.user_id == user_id));
        }

        if let Some(category) = self.storage.categories.find_by_name(user_id, identifier)? {
            return Ok(Some(category));
        }

        let prefix = match identifier.strip_prefix("cat-") {
            Some(p) if !p.is_empty() => p.to_ascii_lowercase(),
            _ => return Ok(None),
        };
        let mut matches = self
            .list(user_id)?
            .into_iter()
            .filter(|c| c.id.as_uuid().to_string().starts_with(&prefix));

        match (matches.next(), matches.next()) {
            (Some(category), None) => Ok(Some(category)),
            _ => Ok(None),
        }
    }

    /// Rename a category. Transactions already recorded keep the old name.
    pub fn rename(&self, user_id: &UserId, identifier: &str, new_name: &str) -> LedgerResult<UserCategory> {
        let before = self
            .find(user_id, identifier)?
            .ok_or_else(|| LedgerError::category_not_found(identifier.trim()))?;

        let new_name = new_name.trim();
        if before.name == new_name {
            return Ok(before);
        }
        if self
            .storage
            .categories
            .find_by_name(user_id, new_name)?
            .is_some()
        {
            return Err(LedgerError::Validation(format!(
                "Category '{}' already exists",
                new_name
            )));
        }

        let mut category = before.clone();
        category.name = new_name.to_string();
        category
            .validate()
            .map_err(|e| LedgerError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;
        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            user_id,
            &before,
            &category,
            Some(format!("name: {} -> {}", before.name, category.name)),
        )?;

        info!(user = %user_id, from = %before.name, to = %category.name, "category renamed");
        Ok(category)
    }

    /// Remove a category from the user's list
    pub fn delete(&self, user_id: &UserId, identifier: &str) -> LedgerResult<UserCategory> {
        let category = self
            .find(user_id, identifier)?
            .ok_or_else(|| LedgerError::category_not_found(identifier.trim()))?;

        self.storage.categories.delete(category.id)?;
        self.storage.categories.save()?;
        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            user_id,
            &category,
        )?;

        info!(user = %user_id, category = %category.name, "category deleted");
        Ok(category)
    }
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
    fn test_create_appends_in_order() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let alice = UserId::new("alice");

        service.create(&alice, " Food ").unwrap();
        service.create(&alice, "Rent").unwrap();
        service.create(&UserId::new("bob"), "Food").unwrap();

        let list = service.list(&alice).unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].name, "Food");
        assert_eq!(list[0].display_order, 0);
        assert_eq!(list[1].name, "Rent");
        assert_eq!(list[1].display_order, 1);
    }

    #[test]
    fn test_duplicate_and_blank_names_are_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let alice = UserId::new("alice");

        service.create(&alice, "Food").unwrap();
        assert!(service.create(&alice, "Food").unwrap_err().is_validation());
        assert!(service.create(&alice, "   ").unwrap_err().is_validation());
        assert_eq!(storage.categories.count().unwrap(), 1);
    }

    #[test]
    fn test_find_by_name_and_short_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let alice = UserId::new("alice");

        let food = service.create(&alice, "Food").unwrap();
        assert_eq!(service.find(&alice, "Food").unwrap().unwrap().id, food.id);
        assert_eq!(
            service.find(&alice, &food.id.to_string()).unwrap().unwrap().id,
            food.id
        );
        assert!(service.find(&UserId::new("bob"), "Food").unwrap().is_none());
        assert!(service
            .find(&UserId::new("bob"), &food.id.as_uuid().to_string())
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_rename() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let alice = UserId::new("alice");

        service.create(&alice, "Food").unwrap();
        service.create(&alice, "Rent").unwrap();

        let renamed = service.rename(&alice, "Food", "Groceries").unwrap();
        assert_eq!(renamed.name, "Groceries");
        assert!(service.find(&alice, "Food").unwrap().is_none());

        assert!(service
            .rename(&alice, "Groceries", "Rent")
            .unwrap_err()
            .is_validation());
        assert!(service
            .rename(&alice, "Missing", "Other")
            .unwrap_err()
            .is_not_found());

        let entries = storage.audit().read_all().unwrap();
        let last = entries.last().unwrap();
        assert_eq!(last.operation, Operation::Update);
        assert_eq!(last.summary.as_deref(), Some("name: Food -> Groceries"));
    }

    #[test]
    fn test_delete_is_user_scoped() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let alice = UserId::new("alice");

        service.create(&alice, "Food").unwrap();
        assert!(service
            .delete(&UserId::new("bob"), "Food")
            .unwrap_err()
            .is_not_found());

        service.delete(&alice, "Food").unwrap();
        assert!(service.list(&alice).unwrap().is_empty());
    }
}
