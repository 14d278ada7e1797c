//! # Catalog Store Tests
//!
//! Id allocation, legacy repair and fallbacks of the persisted catalog.

use std::fs;
use std::sync::Arc;

use anyhow::Result;
use cookbook::catalog::{CatalogStore, CATALOG_BACKUP_KEY, CATALOG_KEY};
use cookbook::errors::{BotError, StoreError};
use cookbook::recipe::NewRecipe;
use cookbook::storage::{FileStore, KeyValueStore, MemoryStore};
use tempfile::TempDir;

#[cfg(test)]
mod tests {
    use super::*;

    fn new_recipe(title: &str) -> NewRecipe {
        NewRecipe {
            title: title.to_string(),
            ingredients: vec!["Соль".to_string()],
            steps: "Посолить.".to_string(),
            photo_reference: None,
        }
    }

    fn empty_catalog() -> CatalogStore {
        CatalogStore::load(Arc::new(MemoryStore::with_value(CATALOG_KEY, "[]")))
    }

    /// Test that N additions to an empty catalog produce ids 1..N
    #[test]
    fn test_ids_are_sequential() -> Result<()> {
        let mut catalog = empty_catalog();
        assert!(catalog.is_empty());
        assert_eq!(catalog.next_id(), Some(1));

        let ids: Vec<u32> = (0..4)
            .map(|i| catalog.insert(new_recipe(&format!("Рецепт {i}"))).map(|r| r.id))
            .collect::<Result<_, _>>()?;
        assert_eq!(ids, vec![1, 2, 3, 4]);
        Ok(())
    }

    /// Test that deleted ids are never handed out again
    #[test]
    fn test_deleted_ids_are_not_reused() -> Result<()> {
        let mut catalog = empty_catalog();
        for i in 0..4 {
            catalog.insert(new_recipe(&format!("Рецепт {i}")))?;
        }

        catalog.delete_by_id(2)?;
        assert_eq!(catalog.insert(new_recipe("Пятый"))?.id, 5);

        // Deleting the current maximum must not free its id either
        catalog.delete_by_id(5)?;
        assert_eq!(catalog.insert(new_recipe("Шестой"))?.id, 6);
        assert!(catalog.find_by_id(2).is_none());
        Ok(())
    }

    /// Test that deleting an unknown id reports not-found and changes nothing
    #[test]
    fn test_delete_missing_recipe() -> Result<()> {
        let mut catalog = empty_catalog();
        catalog.insert(new_recipe("Один"))?;
        assert!(matches!(catalog.delete_by_id(9), Err(BotError::NotFound(9))));
        assert_eq!(catalog.len(), 1);
        Ok(())
    }

    /// Test that a fresh store serves the ten seed recipes
    #[test]
    fn test_seed_when_nothing_stored() -> Result<()> {
        let catalog = CatalogStore::load(Arc::new(MemoryStore::new()));
        assert_eq!(catalog.len(), 10);
        let ids: Vec<u32> = catalog.recipes().iter().map(|r| r.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        Ok(())
    }

    /// Test that malformed stored data falls back to the seed set
    #[test]
    fn test_malformed_catalog_falls_back_to_seed() -> Result<()> {
        let store = Arc::new(MemoryStore::with_value(CATALOG_KEY, "{not json"));
        let catalog = CatalogStore::load(store);
        assert_eq!(catalog.len(), 10);
        Ok(())
    }

    /// Test that legacy records without ids are renumbered and written back
    #[test]
    fn test_legacy_records_repaired_on_disk() -> Result<()> {
        let dir = TempDir::new()?;
        let legacy = r#"[
            {"title": "Блины", "ingredients": ["Мука", "Молоко"], "steps": "Жарить.", "photo_file_id": "AgAD1"},
            {"title": "Чай"}
        ]"#;
        fs::write(dir.path().join("recipes.json"), legacy)?;

        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path())?);
        let catalog = CatalogStore::load(Arc::clone(&store));

        let recipes = catalog.recipes();
        assert_eq!(recipes.len(), 2);
        assert_eq!(recipes[0].id, 1);
        assert_eq!(recipes[0].photo_reference.as_deref(), Some("AgAD1"));
        assert_eq!(recipes[1].id, 2);
        assert!(recipes[1].ingredients.is_empty());
        assert_eq!(recipes[1].steps, "");

        let reloaded = CatalogStore::load(store);
        assert_eq!(reloaded.recipes(), recipes);
        let on_disk = fs::read_to_string(dir.path().join("recipes.json"))?;
        assert!(on_disk.contains("\"id\": 1"));
        assert!(on_disk.contains("\"photo_reference\": \"AgAD1\""));
        Ok(())
    }

    /// Test that a saved catalog loads back unchanged
    #[test]
    fn test_save_load_round_trip() -> Result<()> {
        let dir = TempDir::new()?;
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(dir.path())?);

        let mut catalog = CatalogStore::load(Arc::clone(&store));
        catalog.insert(NewRecipe {
            photo_reference: Some("AgAD2".to_string()),
            ..new_recipe("С фото")
        })?;

        let reloaded = CatalogStore::load(store);
        assert_eq!(reloaded.recipes(), catalog.recipes());
        assert_eq!(reloaded.next_id(), Some(12));
        Ok(())
    }

    /// Test case-insensitive search over titles and ingredients
    #[test]
    fn test_search_is_case_insensitive() -> Result<()> {
        let catalog = CatalogStore::load(Arc::new(MemoryStore::new()));

        let hits = catalog.search("курица");
        assert!(hits.iter().any(|r| r.title == "Курица на сковороде"));

        let by_ingredient: Vec<&str> = catalog
            .search("  ЯЙЦА ")
            .iter()
            .map(|r| r.title.as_str())
            .collect();
        assert_eq!(by_ingredient, vec!["Омлет", "Блины (базовые)"]);

        assert!(catalog.search("не существует").is_empty());
        Ok(())
    }

    /// Test that one bad record is skipped without discarding the rest of the
    /// catalog, and that the original data is backed up before rewriting
    #[test]
    fn test_bad_record_is_skipped_and_backed_up() -> Result<()> {
        let raw = r#"[
            {"id": 1, "title": "Мой борщ", "ingredients": ["Свёкла"], "steps": "Варить."},
            {"id": 2, "title": "Компот", "ingredients": "Вода", "steps": "Кипятить."}
        ]"#;
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_value(CATALOG_KEY, raw));

        let mut catalog = CatalogStore::load(Arc::clone(&store));
        let titles: Vec<&str> = catalog.recipes().iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Мой борщ"]);
        assert_eq!(store.read(CATALOG_BACKUP_KEY)?, None);

        let added = catalog.insert(new_recipe("Новый"))?;
        assert_eq!(added.id, 3);

        assert_eq!(store.read(CATALOG_BACKUP_KEY)?.as_deref(), Some(raw));
        let saved = store.read(CATALOG_KEY)?.unwrap_or_default();
        assert!(saved.contains("Мой борщ"));
        assert!(saved.contains("Новый"));
        assert!(!saved.contains("Компот"));
        Ok(())
    }

    /// Test that a malformed catalog is backed up before the seed set replaces it
    #[test]
    fn test_malformed_catalog_backed_up_before_write() -> Result<()> {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_value(CATALOG_KEY, "{not json"));
        let mut catalog = CatalogStore::load(Arc::clone(&store));
        assert_eq!(store.read(CATALOG_KEY)?.as_deref(), Some("{not json"));

        catalog.delete_by_id(1)?;
        assert_eq!(store.read(CATALOG_BACKUP_KEY)?.as_deref(), Some("{not json"));
        assert_eq!(CatalogStore::load(store).len(), 9);
        Ok(())
    }

    /// Test that inserting past the largest representable id fails cleanly
    #[test]
    fn test_insert_when_ids_exhausted() -> Result<()> {
        let raw = r#"[{"id": 4294967295, "title": "x"}]"#;
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_value(CATALOG_KEY, raw));
        let mut catalog = CatalogStore::load(Arc::clone(&store));

        assert_eq!(catalog.next_id(), None);
        assert!(matches!(catalog.insert(new_recipe("Переполнение")), Err(BotError::IdsExhausted)));
        assert_eq!(catalog.len(), 1);
        assert_eq!(store.read(CATALOG_KEY)?.as_deref(), Some(raw));
        Ok(())
    }

    struct WriteFailingStore {
        inner: MemoryStore,
    }

    impl KeyValueStore for WriteFailingStore {
        fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
            self.inner.read(key)
        }

        fn write(&self, _key: &str, _value: &str) -> Result<(), StoreError> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    /// Test that a failed repair write still serves the repaired catalog
    #[test]
    fn test_repair_survives_failed_write() {
        let legacy = r#"[{"title": "Блины"}, {"title": "Чай"}, {"title": "Каша"}]"#;
        let store = Arc::new(WriteFailingStore {
            inner: MemoryStore::with_value(CATALOG_KEY, legacy),
        });

        let catalog = CatalogStore::load(store);
        let ids: Vec<u32> = catalog.recipes().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(catalog.next_id(), Some(4));
    }
}
