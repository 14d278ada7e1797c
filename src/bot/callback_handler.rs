//! Callback Handler module for processing inline keyboard callback queries

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, InlineKeyboardMarkup, MessageId};
use tracing::{debug, error, warn};

use crate::callback::{decode, CallbackAction};
use crate::errors::BotError;
use crate::localization::{t_args_lang, t_lang};

use super::ui_builder::{catalog_keyboard, delete_confirm_keyboard, delete_question, favorites_keyboard};
use super::{send_recipe, BotState};

/// Where the pressed button lives and who pressed it
struct CallbackContext<'a> {
    bot: &'a Bot,
    chat_id: ChatId,
    message_id: MessageId,
    user_id: u64,
    language_code: Option<&'a str>,
}

impl CallbackContext<'_> {
    async fn reply(&self, key: &str) -> Result<()> {
        self.bot
            .send_message(self.chat_id, t_lang(key, self.language_code))
            .await?;
        Ok(())
    }

    /// Replace the listing message in place
    async fn edit_listing(&self, key: &str, keyboard: InlineKeyboardMarkup) {
        if let Err(e) = self
            .bot
            .edit_message_text(self.chat_id, self.message_id, t_lang(key, self.language_code))
            .reply_markup(keyboard)
            .await
        {
            warn!(user_id = self.user_id, error = %e, "Failed to edit listing message");
        }
    }

    /// Resolve a domain error within this event
    async fn report(&self, err: &BotError) -> Result<()> {
        match err {
            BotError::Persistence(e) => {
                error!(user_id = self.user_id, error = %e, "Failed to persist change")
            }
            other => debug!(user_id = self.user_id, error = %other, "Callback action refused"),
        }
        match err.reply_key() {
            Some(key) => self.reply(key).await,
            None => Ok(()),
        }
    }

    /// Deletion replies say "already deleted" rather than "not found"
    async fn report_delete(&self, err: &BotError) -> Result<()> {
        match err {
            BotError::NotFound(_) => self.reply("recipe-already-deleted").await,
            other => self.report(other).await,
        }
    }
}

async fn handle_action(ctx: &CallbackContext<'_>, state: &BotState, action: CallbackAction) -> Result<()> {
    match action {
        CallbackAction::Noop => Ok(()),

        CallbackAction::CatalogPage(page) => {
            let page = state.book.catalog_page(i64::from(page)).await;
            if page.recipes.is_empty() {
                return ctx.reply("catalog-empty").await;
            }
            ctx.edit_listing("catalog-title", catalog_keyboard(&page)).await;
            Ok(())
        }

        CallbackAction::FavoritesPage(page) => {
            match state.book.favorites_page(ctx.user_id, i64::from(page)).await {
                Some(page) => {
                    ctx.edit_listing("favorites-title", favorites_keyboard(&page, ctx.language_code))
                        .await;
                    Ok(())
                }
                None => ctx.reply("favorites-empty").await,
            }
        }

        CallbackAction::CatalogShow(id) | CallbackAction::FavoritesShow(id) => {
            match state.book.recipe(id).await {
                Ok(recipe) => {
                    send_recipe(ctx.bot, ctx.chat_id, state, &recipe, ctx.user_id, ctx.language_code).await
                }
                Err(e) => ctx.report(&e).await,
            }
        }

        CallbackAction::FavoriteAdd(id) => match state.book.add_favorite(ctx.user_id, id).await {
            Ok(_) => ctx.reply("favorite-added").await,
            Err(e) => ctx.report(&e).await,
        },

        CallbackAction::FavoriteRemove(id) => match state.book.remove_favorite(ctx.user_id, id).await {
            Ok(_) => ctx.reply("favorite-removed").await,
            Err(e) => ctx.report(&e).await,
        },

        CallbackAction::DeleteAsk(id) => match state.book.ask_delete(ctx.user_id, id).await {
            Ok(recipe) => {
                ctx.bot
                    .send_message(ctx.chat_id, delete_question(&recipe, ctx.language_code))
                    .reply_markup(delete_confirm_keyboard(recipe.id, ctx.language_code))
                    .await?;
                Ok(())
            }
            Err(e) => ctx.report_delete(&e).await,
        },

        CallbackAction::DeleteConfirm(id) => match state.book.confirm_delete(ctx.user_id, id).await {
            Ok(recipe) => {
                ctx.bot
                    .send_message(
                        ctx.chat_id,
                        t_args_lang("delete-done", &[("title", recipe.title.as_str())], ctx.language_code),
                    )
                    .await?;
                Ok(())
            }
            Err(e) => ctx.report_delete(&e).await,
        },

        CallbackAction::DeleteCancel(_) => ctx.reply("delete-cancelled").await,
    }
}

/// Handle callback queries from inline keyboards
pub async fn callback_handler(bot: Bot, q: CallbackQuery, state: Arc<BotState>) -> Result<()> {
    // Stop the client's loading indicator whatever happens next
    bot.answer_callback_query(q.id.clone()).await?;

    let user_id = q.from.id.0;
    let Some(message) = q.message.as_ref() else {
        debug!(user_id, "Callback query without an accessible message");
        return Ok(());
    };

    let token = q.data.as_deref().unwrap_or_default();
    let Some(action) = decode(token) else {
        debug!(user_id, token, "Ignoring malformed callback token");
        return Ok(());
    };
    debug!(user_id, token, "Received callback action");

    let ctx = CallbackContext {
        bot: &bot,
        chat_id: message.chat().id,
        message_id: message.id(),
        user_id,
        language_code: q.from.language_code.as_deref(),
    };
    handle_action(&ctx, &state, action).await
}
