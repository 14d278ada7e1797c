//! # Catalog Store
//!
//! Holds the ordered recipe collection and keeps it in sync with the
//! injected [`KeyValueStore`]. Every mutation is persisted before the call
//! returns, so callers never acknowledge a change that is not on disk.
//!
//! Stored data that cannot be fully decoded is never silently replaced:
//! the raw value is copied to [`CATALOG_BACKUP_KEY`] before the first
//! write, and a catalog that could not be read at all is never written.

use std::sync::Arc;

use rand::seq::SliceRandom;
use tracing::{error, info, warn};

use crate::errors::{BotError, StoreError};
use crate::recipe::{seed_recipes, NewRecipe, Recipe, RecipeId, StoredRecipe};
use crate::storage::KeyValueStore;

/// Store key holding the serialized catalog
pub const CATALOG_KEY: &str = "recipes";

/// Store key receiving a stored catalog that could not be fully decoded
pub const CATALOG_BACKUP_KEY: &str = "recipes.bak";

/// What the store held under [`CATALOG_KEY`] at startup
enum Stored {
    Absent,
    Unreadable,
    Malformed(String),
    Records { recipes: Vec<Recipe>, skipped: usize, raw: String },
}

/// Decode each record on its own so one bad record does not discard the rest
fn decode_records(raw: String) -> Stored {
    let values = match serde_json::from_str::<Vec<serde_json::Value>>(&raw) {
        Ok(values) => values,
        Err(e) => {
            warn!(error = %e, "Stored catalog is malformed, serving seed recipes");
            return Stored::Malformed(raw);
        }
    };

    let mut skipped = 0;
    let recipes = values
        .into_iter()
        .enumerate()
        .filter_map(|(position, value)| match serde_json::from_value::<StoredRecipe>(value) {
            Ok(stored) => Some(Recipe::from(stored)),
            Err(e) => {
                warn!(position, error = %e, "Skipping malformed stored recipe");
                skipped += 1;
                None
            }
        })
        .collect();

    Stored::Records { recipes, skipped, raw }
}

pub struct CatalogStore {
    store: Arc<dyn KeyValueStore>,
    recipes: Vec<Recipe>,
    /// Highest id handed out or loaded during this run
    high_water: RecipeId,
    /// Raw stored value to back up before the next write
    pending_backup: Option<String>,
    /// The stored catalog could not be read, so it must not be overwritten
    write_blocked: bool,
}

impl CatalogStore {
    /// Load the persisted catalog, falling back to the seed set.
    ///
    /// Records without ids are renumbered `1..=N` by position and the
    /// repaired catalog is written back immediately. Malformed records are
    /// skipped; unreadable or malformed data is logged and replaced by the
    /// seed set instead of failing.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let stored = match store.read(CATALOG_KEY) {
            Ok(Some(raw)) => decode_records(raw),
            Ok(None) => Stored::Absent,
            Err(e) => {
                error!(error = %e, "Stored catalog is unreadable, serving seed recipes without saving");
                Stored::Unreadable
            }
        };

        let (mut recipes, skipped, pending_backup, write_blocked) = match stored {
            Stored::Absent => {
                info!("No stored catalog, using seed recipes");
                (seed_recipes(), 0, None, false)
            }
            Stored::Unreadable => (seed_recipes(), 0, None, true),
            Stored::Malformed(raw) => (seed_recipes(), 0, Some(raw), false),
            Stored::Records { recipes, skipped, raw } => {
                let backup = (skipped > 0).then_some(raw);
                (recipes, skipped, backup, false)
            }
        };

        let needs_repair = recipes.iter().any(|r| r.id == 0);
        if needs_repair {
            for (position, recipe) in recipes.iter_mut().enumerate() {
                recipe.id = position as RecipeId + 1;
            }
        }

        let high_water = recipes.iter().map(|r| r.id).max().unwrap_or(0);
        let mut catalog = Self {
            store,
            recipes,
            high_water,
            pending_backup,
            write_blocked,
        };

        if needs_repair {
            info!(count = catalog.len(), "Assigned ids to legacy recipes");
            if let Err(e) = catalog.save() {
                error!(error = %e, "Failed to persist repaired catalog, serving it from memory");
            }
        }
        info!(count = catalog.len(), skipped, "Catalog loaded");
        catalog
    }

    /// Overwrite the persisted catalog with the in-memory one
    pub fn save(&mut self) -> Result<(), StoreError> {
        if self.write_blocked {
            return Err(StoreError::Unreadable(CATALOG_KEY));
        }
        if let Some(raw) = &self.pending_backup {
            self.store.write(CATALOG_BACKUP_KEY, raw)?;
            warn!(key = CATALOG_BACKUP_KEY, "Backed up undecodable stored catalog");
            self.pending_backup = None;
        }
        let encoded = serde_json::to_string_pretty(&self.recipes)?;
        self.store.write(CATALOG_KEY, &encoded)
    }

    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    pub fn len(&self) -> usize {
        self.recipes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipes.is_empty()
    }

    /// Next id to assign: one past the largest id seen in this run.
    ///
    /// Ids removed by deletion stay retired even when they were the maximum.
    /// `None` once `u32::MAX` has been used.
    pub fn next_id(&self) -> Option<RecipeId> {
        let current_max = self.recipes.iter().map(|r| r.id).max().unwrap_or(0);
        current_max.max(self.high_water).checked_add(1)
    }

    pub fn find_by_id(&self, id: RecipeId) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.id == id)
    }

    /// Append a submission under a fresh id and persist
    pub fn insert(&mut self, new: NewRecipe) -> Result<Recipe, BotError> {
        let id = self.next_id().ok_or(BotError::IdsExhausted)?;
        let recipe = Recipe::from_new(id, new);
        self.recipes.push(recipe.clone());
        self.high_water = id;
        if let Err(e) = self.save() {
            // Keep memory consistent with what is actually stored
            self.recipes.pop();
            return Err(e.into());
        }
        info!(recipe_id = id, title = %recipe.title, "Recipe added to catalog");
        Ok(recipe)
    }

    /// Remove the recipe with `id` and persist
    pub fn delete_by_id(&mut self, id: RecipeId) -> Result<Recipe, BotError> {
        let position = self
            .recipes
            .iter()
            .position(|r| r.id == id)
            .ok_or(BotError::NotFound(id))?;
        let removed = self.recipes.remove(position);
        if let Err(e) = self.save() {
            self.recipes.insert(position, removed);
            return Err(e.into());
        }
        info!(recipe_id = id, title = %removed.title, "Recipe deleted from catalog");
        Ok(removed)
    }

    /// Recipes whose title or any ingredient contains `query`, ignoring case
    pub fn search(&self, query: &str) -> Vec<&Recipe> {
        let needle = query.trim().to_lowercase();
        self.recipes.iter().filter(|r| r.matches(&needle)).collect()
    }

    pub fn random(&self) -> Option<&Recipe> {
        self.recipes.choose(&mut rand::thread_rng())
    }
}
