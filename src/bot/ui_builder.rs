//! UI Builder module for creating keyboards and formatting messages

use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup, KeyboardButton, KeyboardMarkup};

use crate::callback::CallbackAction;
use crate::localization::{get_localization_manager, t_args_lang, t_lang};
use crate::recipe::{Recipe, RecipeId};
use crate::recipe_book::PageView;

/// Buttons of the main reply keyboard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Catalog,
    Random,
    Search,
    Add,
    Favorites,
}

impl MenuAction {
    pub const ALL: [MenuAction; 5] = [
        MenuAction::Catalog,
        MenuAction::Random,
        MenuAction::Search,
        MenuAction::Add,
        MenuAction::Favorites,
    ];

    pub fn label_key(self) -> &'static str {
        match self {
            MenuAction::Catalog => "menu-catalog",
            MenuAction::Random => "menu-random",
            MenuAction::Search => "menu-search",
            MenuAction::Add => "menu-add",
            MenuAction::Favorites => "menu-favorites",
        }
    }
}

/// Recognize a main menu label in any supported language
pub fn menu_action(text: &str) -> Option<MenuAction> {
    let text = text.trim();
    let manager = get_localization_manager();
    MenuAction::ALL.into_iter().find(|action| {
        manager
            .all_translations(action.label_key())
            .iter()
            .any(|label| label == text)
    })
}

/// Main reply keyboard
pub fn main_menu_keyboard(language_code: Option<&str>) -> KeyboardMarkup {
    let button = |action: MenuAction| KeyboardButton::new(t_lang(action.label_key(), language_code));
    KeyboardMarkup::new(vec![
        vec![button(MenuAction::Catalog), button(MenuAction::Random)],
        vec![button(MenuAction::Search), button(MenuAction::Add)],
        vec![button(MenuAction::Favorites)],
    ])
    .resize_keyboard()
}

/// Text card of a recipe: title, bulleted ingredients and steps
pub fn format_recipe(recipe: &Recipe, language_code: Option<&str>) -> String {
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|item| format!("• {item}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "🍽 {}\n\n{}\n{}\n\n{}\n{}",
        recipe.title,
        t_lang("recipe-ingredients", language_code),
        ingredients,
        t_lang("recipe-steps", language_code),
        recipe.steps
    )
}

fn callback_button(text: impl Into<String>, action: CallbackAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(text, action.token())
}

/// Actions under a recipe card
pub fn recipe_actions_keyboard(
    id: RecipeId,
    is_favorite: bool,
    is_admin: bool,
    language_code: Option<&str>,
) -> InlineKeyboardMarkup {
    let favorite = if is_favorite {
        callback_button(
            t_lang("button-favorite-remove", language_code),
            CallbackAction::FavoriteRemove(id),
        )
    } else {
        callback_button(
            t_lang("button-favorite-add", language_code),
            CallbackAction::FavoriteAdd(id),
        )
    };

    let mut rows = vec![vec![favorite]];
    if is_admin {
        rows.push(vec![callback_button(
            t_lang("button-delete", language_code),
            CallbackAction::DeleteAsk(id),
        )]);
    }
    rows.push(vec![
        callback_button(t_lang("button-catalog", language_code), CallbackAction::CatalogPage(1)),
        callback_button(t_lang("button-favorites", language_code), CallbackAction::FavoritesPage(1)),
    ]);

    InlineKeyboardMarkup::new(rows)
}

fn page_number(page: usize) -> u32 {
    u32::try_from(page).unwrap_or(u32::MAX)
}

/// Previous / indicator / next row for a listing page
pub fn navigation_row(view: &PageView, to_page: fn(u32) -> CallbackAction) -> Vec<InlineKeyboardButton> {
    let page = view.as_page();
    let mut nav = Vec::with_capacity(3);
    if page.has_previous() {
        nav.push(callback_button("⬅️", to_page(page_number(page.page - 1))));
    }
    nav.push(callback_button(page.indicator(), CallbackAction::Noop));
    if page.has_next() {
        nav.push(callback_button("➡️", to_page(page_number(page.page + 1))));
    }
    nav
}

fn listing_rows(page: &PageView, show: fn(RecipeId) -> CallbackAction) -> Vec<Vec<InlineKeyboardButton>> {
    page.recipes
        .iter()
        .map(|recipe| vec![callback_button(recipe.title.clone(), show(recipe.id))])
        .collect()
}

/// One button per recipe on the page plus navigation
pub fn catalog_keyboard(page: &PageView) -> InlineKeyboardMarkup {
    let mut rows = listing_rows(page, CallbackAction::CatalogShow);
    rows.push(navigation_row(page, CallbackAction::CatalogPage));
    InlineKeyboardMarkup::new(rows)
}

/// Favorites listing with navigation and a catalog shortcut
pub fn favorites_keyboard(page: &PageView, language_code: Option<&str>) -> InlineKeyboardMarkup {
    let mut rows = listing_rows(page, CallbackAction::FavoritesShow);
    rows.push(navigation_row(page, CallbackAction::FavoritesPage));
    rows.push(vec![callback_button(
        t_lang("button-catalog", language_code),
        CallbackAction::CatalogPage(1),
    )]);
    InlineKeyboardMarkup::new(rows)
}

/// Yes/no buttons for deleting a recipe
pub fn delete_confirm_keyboard(id: RecipeId, language_code: Option<&str>) -> InlineKeyboardMarkup {
    InlineKeyboardMarkup::new(vec![vec![
        callback_button(t_lang("delete-yes", language_code), CallbackAction::DeleteConfirm(id)),
        callback_button(t_lang("delete-no", language_code), CallbackAction::DeleteCancel(id)),
    ]])
}

pub fn delete_question(recipe: &Recipe, language_code: Option<&str>) -> String {
    t_args_lang("delete-question", &[("title", recipe.title.as_str())], language_code)
}
