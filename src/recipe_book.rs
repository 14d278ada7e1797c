//! # Recipe Book
//!
//! Process-wide shared state: the catalog, the favorites ledger and the
//! admin gate, behind async mutexes. Every operation here is one unit of
//! work: a mutation and its persistence write happen under the same lock, so
//! no other handler can observe a change that has not been flushed.
//!
//! Locks are always taken catalog first, then favorites.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{error, info};

use crate::auth::AdminGate;
use crate::catalog::CatalogStore;
use crate::errors::BotError;
use crate::favorites::FavoritesLedger;
use crate::pagination::{paginate, Page, DEFAULT_PAGE_SIZE};
use crate::recipe::{NewRecipe, Recipe, RecipeId};
use crate::storage::KeyValueStore;

/// An owned page of recipes, detached from the locks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub recipes: Vec<Recipe>,
    pub page: usize,
    pub total_pages: usize,
}

impl PageView {
    fn of(recipes: &[&Recipe], requested_page: i64, page_size: usize) -> Self {
        let window = paginate(recipes, requested_page, page_size);
        Self {
            recipes: window.items.iter().copied().cloned().collect(),
            page: window.page,
            total_pages: window.total_pages,
        }
    }

    /// Borrow as a [`Page`] for navigation rendering
    pub fn as_page(&self) -> Page<'_, Recipe> {
        Page {
            items: &self.recipes,
            total_pages: self.total_pages,
            page: self.page,
        }
    }
}

pub struct RecipeBook {
    catalog: Mutex<CatalogStore>,
    favorites: Mutex<FavoritesLedger>,
    gate: AdminGate,
    catalog_page_size: usize,
    favorites_page_size: usize,
}

impl RecipeBook {
    pub fn new(catalog: CatalogStore, favorites: FavoritesLedger, gate: AdminGate) -> Self {
        Self {
            catalog: Mutex::new(catalog),
            favorites: Mutex::new(favorites),
            gate,
            catalog_page_size: DEFAULT_PAGE_SIZE,
            favorites_page_size: DEFAULT_PAGE_SIZE,
        }
    }

    /// Load catalog and favorites from the same store
    pub fn open(store: Arc<dyn KeyValueStore>, gate: AdminGate) -> Self {
        let catalog = CatalogStore::load(Arc::clone(&store));
        let favorites = FavoritesLedger::load(store);
        Self::new(catalog, favorites, gate)
    }

    pub fn with_page_sizes(mut self, catalog: usize, favorites: usize) -> Self {
        self.catalog_page_size = catalog;
        self.favorites_page_size = favorites;
        self
    }

    pub fn is_admin(&self, user: u64) -> bool {
        self.gate.is_admin(user)
    }

    pub async fn recipe(&self, id: RecipeId) -> Result<Recipe, BotError> {
        let catalog = self.catalog.lock().await;
        catalog.find_by_id(id).cloned().ok_or(BotError::NotFound(id))
    }

    pub async fn recipes(&self) -> Vec<Recipe> {
        self.catalog.lock().await.recipes().to_vec()
    }

    pub async fn random(&self) -> Option<Recipe> {
        self.catalog.lock().await.random().cloned()
    }

    pub async fn search(&self, query: &str) -> Vec<Recipe> {
        let catalog = self.catalog.lock().await;
        catalog.search(query).into_iter().cloned().collect()
    }

    pub async fn catalog_page(&self, requested_page: i64) -> PageView {
        let catalog = self.catalog.lock().await;
        let all: Vec<&Recipe> = catalog.recipes().iter().collect();
        PageView::of(&all, requested_page, self.catalog_page_size)
    }

    /// The user's favorites page, `None` when the user has no favorites
    pub async fn favorites_page(&self, user: u64, requested_page: i64) -> Option<PageView> {
        let catalog = self.catalog.lock().await;
        let favorites = self.favorites.lock().await;
        let selected = favorites.select(user, catalog.recipes());
        if selected.is_empty() {
            return None;
        }
        Some(PageView::of(&selected, requested_page, self.favorites_page_size))
    }

    pub async fn is_favorite(&self, user: u64, id: RecipeId) -> bool {
        self.favorites.lock().await.is_favorite(user, id)
    }

    /// Favorite an existing recipe; returns whether it was newly added
    pub async fn add_favorite(&self, user: u64, id: RecipeId) -> Result<bool, BotError> {
        let catalog = self.catalog.lock().await;
        if catalog.find_by_id(id).is_none() {
            return Err(BotError::NotFound(id));
        }
        let mut favorites = self.favorites.lock().await;
        Ok(favorites.add(user, id)?)
    }

    /// Unfavorite; returns whether it was present
    pub async fn remove_favorite(&self, user: u64, id: RecipeId) -> Result<bool, BotError> {
        let mut favorites = self.favorites.lock().await;
        Ok(favorites.remove(user, id)?)
    }

    /// Append a completed submission under a fresh id
    pub async fn add_recipe(&self, new: NewRecipe) -> Result<Recipe, BotError> {
        let mut catalog = self.catalog.lock().await;
        catalog.insert(new)
    }

    /// First step of deletion: admin check and existence check
    pub async fn ask_delete(&self, user: u64, id: RecipeId) -> Result<Recipe, BotError> {
        self.gate.authorize(user)?;
        self.recipe(id).await
    }

    /// Delete a recipe and purge it from every user's favorites.
    ///
    /// The admin check is repeated here because confirm tokens can be
    /// forwarded or forged.
    pub async fn confirm_delete(&self, user: u64, id: RecipeId) -> Result<Recipe, BotError> {
        self.gate.authorize(user)?;

        let mut catalog = self.catalog.lock().await;
        let removed = catalog.delete_by_id(id)?;

        let mut favorites = self.favorites.lock().await;
        if let Err(e) = favorites.purge(id) {
            // The in-memory ledger is already purged; the next write flushes it
            error!(recipe_id = id, error = %e, "Failed to persist favorites after deletion");
        }

        info!(user_id = user, recipe_id = id, "Recipe deleted by admin");
        Ok(removed)
    }
}
