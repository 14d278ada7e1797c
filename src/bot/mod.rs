//! Bot module for handling Telegram interactions
//!
//! This module is split into several submodules:
//! - `message_handler`: commands, menu buttons, search and add-flow input
//! - `callback_handler`: inline keyboard callback queries
//! - `ui_builder`: keyboards and message formatting
//! - `dialogue_manager`: replies for add-recipe flow transitions

pub mod callback_handler;
pub mod dialogue_manager;
pub mod message_handler;
pub mod ui_builder;

use teloxide::prelude::*;
use teloxide::types::{FileId, InputFile};
use tracing::warn;

use crate::localization::t_lang;
use crate::recipe::Recipe;
use crate::recipe_book::RecipeBook;
use crate::sessions::SubmissionSessions;

// Re-export main handler functions for use in main.rs
pub use callback_handler::callback_handler;
pub use message_handler::message_handler;

pub use ui_builder::{format_recipe, main_menu_keyboard, menu_action, MenuAction};

/// Shared state injected into every handler
pub struct BotState {
    pub book: RecipeBook,
    pub sessions: SubmissionSessions,
}

impl BotState {
    pub fn new(book: RecipeBook) -> Self {
        Self {
            book,
            sessions: SubmissionSessions::new(),
        }
    }
}

/// Send a recipe card: the photo first (if any), then the text with actions
pub async fn send_recipe(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    recipe: &Recipe,
    user_id: u64,
    language_code: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(reference) = &recipe.photo_reference {
        // A stale photo reference must not hide the recipe text
        if let Err(e) = bot
            .send_photo(chat_id, InputFile::file_id(FileId(reference.clone())))
            .await
        {
            warn!(recipe_id = recipe.id, error = %e, "Failed to send recipe photo");
        }
    }

    let is_favorite = state.book.is_favorite(user_id, recipe.id).await;
    let keyboard = ui_builder::recipe_actions_keyboard(
        recipe.id,
        is_favorite,
        state.book.is_admin(user_id),
        language_code,
    );
    bot.send_message(chat_id, format_recipe(recipe, language_code))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Reply with the localized text for `key` and the main menu
pub async fn send_with_menu(
    bot: &Bot,
    chat_id: ChatId,
    key: &str,
    language_code: Option<&str>,
) -> anyhow::Result<()> {
    bot.send_message(chat_id, t_lang(key, language_code))
        .reply_markup(main_menu_keyboard(language_code))
        .await?;
    Ok(())
}
