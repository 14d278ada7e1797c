//! # Recipe Data Model
//!
//! This module defines the recipe record served by the bot and its stored
//! representation.
//!
//! ## Core Concepts
//!
//! - **Recipe**: a catalog entry with a unique, never reused id
//! - **NewRecipe**: a validated submission that has not been assigned an id yet
//! - **StoredRecipe**: the lenient on-disk form, tolerant of missing fields
//!
//! ## Usage
//!
//! ```rust
//! use cookbook::recipe::{NewRecipe, Recipe};
//!
//! let draft = NewRecipe {
//!     title: "Тост".to_string(),
//!     ingredients: vec!["Хлеб".to_string(), "Масло".to_string()],
//!     steps: "Подрумянь хлеб.".to_string(),
//!     photo_reference: None,
//! };
//! let recipe = Recipe::from_new(11, draft);
//! assert_eq!(recipe.id, 11);
//! ```

use serde::{Deserialize, Serialize};

/// Identifier of a recipe in the catalog
pub type RecipeId = u32;

/// A recipe in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Unique id, assigned as `max + 1` on insertion
    pub id: RecipeId,

    /// Display title (e.g., "Омлет")
    pub title: String,

    /// Ingredients in the order the author listed them
    pub ingredients: Vec<String>,

    /// Free-form cooking instructions
    pub steps: String,

    /// Opaque platform reference to the dish photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_reference: Option<String>,
}

impl Recipe {
    /// Build a catalog entry from a validated submission
    pub fn from_new(id: RecipeId, new: NewRecipe) -> Self {
        Self {
            id,
            title: new.title,
            ingredients: new.ingredients,
            steps: new.steps,
            photo_reference: new.photo_reference,
        }
    }

    /// Case-insensitive substring match against the title and every ingredient.
    ///
    /// `needle` must already be lowercased.
    pub fn matches(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle)
            || self
                .ingredients
                .iter()
                .any(|ingredient| ingredient.to_lowercase().contains(needle))
    }
}

/// A complete submission produced by the add-recipe flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub title: String,
    pub ingredients: Vec<String>,
    pub steps: String,
    pub photo_reference: Option<String>,
}

/// Stored form of a recipe.
///
/// Every field defaults so that partially written or legacy records stay
/// constructible. A missing id reads as `0` and is repaired by the catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StoredRecipe {
    #[serde(default)]
    pub id: RecipeId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub steps: String,
    #[serde(default, alias = "photo_file_id")]
    pub photo_reference: Option<String>,
}

impl From<StoredRecipe> for Recipe {
    fn from(stored: StoredRecipe) -> Self {
        Self {
            id: stored.id,
            title: stored.title,
            ingredients: stored.ingredients,
            steps: stored.steps,
            photo_reference: stored.photo_reference,
        }
    }
}

fn seed(id: RecipeId, title: &str, ingredients: &[&str], steps: &str) -> Recipe {
    Recipe {
        id,
        title: title.to_string(),
        ingredients: ingredients.iter().map(|s| s.to_string()).collect(),
        steps: steps.to_string(),
        photo_reference: None,
    }
}

/// The catalog served when nothing has been persisted yet
pub fn seed_recipes() -> Vec<Recipe> {
    vec![
        seed(
            1,
            "Омлет",
            &["Яйца (2 шт.)", "Молоко (50 мл)", "Соль", "Масло"],
            "Взбей яйца с молоком и солью. Обжарь на сковороде 3–5 минут.",
        ),
        seed(
            2,
            "Овсянка",
            &["Овсяные хлопья (50 г)", "Вода/молоко (200 мл)", "Соль/сахар"],
            "Доведи жидкость до кипения, всыпь хлопья и вари 3–5 минут.",
        ),
        seed(
            3,
            "Гречка",
            &["Гречка (1 стакан)", "Вода (2 стакана)", "Соль", "Масло (по желанию)"],
            "Промой гречку. Залей водой, посоли, доведи до кипения и вари под крышкой 15–20 минут.",
        ),
        seed(
            4,
            "Макароны с сыром",
            &["Макароны (150 г)", "Сыр (50–80 г)", "Соль", "Масло (по желанию)"],
            "Отвари макароны в подсоленной воде. Слей воду, добавь сыр, перемешай до расплавления.",
        ),
        seed(
            5,
            "Салат из огурцов и помидоров",
            &[
                "Огурец (1–2 шт.)",
                "Помидор (1–2 шт.)",
                "Лук (по желанию)",
                "Соль",
                "Масло/сметана",
            ],
            "Нарежь овощи, посоли, заправь маслом или сметаной, перемешай.",
        ),
        seed(
            6,
            "Картофельное пюре",
            &["Картофель (500 г)", "Молоко (100 мл)", "Масло (30 г)", "Соль"],
            "Отвари картофель до мягкости, слей воду. Разомни, добавь масло и горячее молоко, посоли.",
        ),
        seed(
            7,
            "Курица на сковороде",
            &["Куриное филе (300 г)", "Соль", "Перец", "Масло"],
            "Нарежь филе, посоли/поперчи. Обжарь 8–12 минут до готовности.",
        ),
        seed(
            8,
            "Рис с овощами",
            &[
                "Рис (1 стакан)",
                "Овощи замороженные (200 г)",
                "Соль",
                "Масло/соевый соус (по желанию)",
            ],
            "Отвари рис. Прогрей овощи 5–7 минут, смешай, посоли.",
        ),
        seed(
            9,
            "Сырники (простые)",
            &[
                "Творог (300 г)",
                "Яйцо (1 шт.)",
                "Сахар (1–2 ст. л.)",
                "Мука (3–4 ст. л.)",
                "Масло",
            ],
            "Смешай всё, сформируй сырники и обжарь по 2–3 минуты с каждой стороны.",
        ),
        seed(
            10,
            "Блины (базовые)",
            &[
                "Молоко (500 мл)",
                "Яйца (2 шт.)",
                "Мука (200–250 г)",
                "Сахар (1 ст. л.)",
                "Соль",
                "Масло",
            ],
            "Смешай, добавь муку, жарь тонкие блины на смазанной сковороде.",
        ),
    ]
}
