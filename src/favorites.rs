//! # Favorites Ledger
//!
//! Per-user sets of favorite recipe ids, persisted through the injected
//! [`KeyValueStore`] after every change. Sets are created lazily on the
//! first `add` for a user.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::errors::StoreError;
use crate::recipe::{Recipe, RecipeId};
use crate::storage::KeyValueStore;

/// Store key holding every user's favorites
pub const FAVORITES_KEY: &str = "favorites";

pub struct FavoritesLedger {
    store: Arc<dyn KeyValueStore>,
    by_user: BTreeMap<u64, BTreeSet<RecipeId>>,
}

impl FavoritesLedger {
    /// Load persisted favorites; unreadable data starts an empty ledger.
    ///
    /// Duplicate ids in the stored lists collapse into one entry.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let by_user = match store.read(FAVORITES_KEY) {
            Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!(error = %e, "Stored favorites are malformed, starting empty");
                BTreeMap::new()
            }),
            Ok(None) => BTreeMap::new(),
            Err(e) => {
                warn!(error = %e, "Stored favorites are unreadable, starting empty");
                BTreeMap::new()
            }
        };
        Self { store, by_user }
    }

    fn save(&self) -> Result<(), StoreError> {
        let encoded = serde_json::to_string_pretty(&self.by_user)?;
        self.store.write(FAVORITES_KEY, &encoded)
    }

    /// Add `id` to the user's favorites; returns whether it was newly added
    pub fn add(&mut self, user: u64, id: RecipeId) -> Result<bool, StoreError> {
        let added = self.by_user.entry(user).or_default().insert(id);
        if added {
            if let Err(e) = self.save() {
                self.by_user.entry(user).or_default().remove(&id);
                return Err(e);
            }
        }
        debug!(user_id = user, recipe_id = id, added, "Favorite add");
        Ok(added)
    }

    /// Remove `id` from the user's favorites; returns whether it was present
    pub fn remove(&mut self, user: u64, id: RecipeId) -> Result<bool, StoreError> {
        let removed = self
            .by_user
            .get_mut(&user)
            .is_some_and(|favorites| favorites.remove(&id));
        if removed {
            if let Err(e) = self.save() {
                self.by_user.entry(user).or_default().insert(id);
                return Err(e);
            }
        }
        debug!(user_id = user, recipe_id = id, removed, "Favorite remove");
        Ok(removed)
    }

    pub fn is_favorite(&self, user: u64, id: RecipeId) -> bool {
        self.by_user
            .get(&user)
            .is_some_and(|favorites| favorites.contains(&id))
    }

    pub fn ids(&self, user: u64) -> Option<&BTreeSet<RecipeId>> {
        self.by_user.get(&user)
    }

    pub fn is_empty_for(&self, user: u64) -> bool {
        self.by_user.get(&user).map_or(true, BTreeSet::is_empty)
    }

    /// Remove `id` from every user's favorites; returns how many users had it
    pub fn purge(&mut self, id: RecipeId) -> Result<usize, StoreError> {
        let affected = self
            .by_user
            .values_mut()
            .map(|favorites| favorites.remove(&id))
            .filter(|removed| *removed)
            .count();
        if affected > 0 {
            self.save()?;
            info!(recipe_id = id, users = affected, "Purged deleted recipe from favorites");
        }
        Ok(affected)
    }

    /// The user's favorite recipes, in catalog order
    pub fn select<'a>(&self, user: u64, catalog: &'a [Recipe]) -> Vec<&'a Recipe> {
        match self.by_user.get(&user) {
            Some(favorites) => catalog.iter().filter(|r| favorites.contains(&r.id)).collect(),
            None => Vec::new(),
        }
    }
}
