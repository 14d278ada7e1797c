//! Dialogue Manager module: replies for each add-recipe flow transition

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::KeyboardRemove;
use tracing::{error, info};

use crate::dialogue::{AbortReason, AddRecipeState, FlowInput, Transition};
use crate::localization::t_lang;

use super::ui_builder::main_menu_keyboard;
use super::BotState;

/// Prompt shown when the flow enters `state`
pub fn prompt_key(state: AddRecipeState) -> Option<&'static str> {
    match state {
        AddRecipeState::AwaitTitle => Some("add-title-prompt"),
        AddRecipeState::AwaitIngredients => Some("add-ingredients-prompt"),
        AddRecipeState::AwaitSteps => Some("add-steps-prompt"),
        AddRecipeState::AwaitPhoto => Some("add-photo-prompt"),
        AddRecipeState::Entry | AddRecipeState::Complete | AddRecipeState::Aborted => None,
    }
}

/// Reply to input that does not fit the step the flow is waiting on
pub fn rejection_key(state: AddRecipeState) -> &'static str {
    match state {
        AddRecipeState::AwaitPhoto => "add-photo-invalid",
        _ => "add-text-expected",
    }
}

/// Start (or restart) the add-recipe flow for the user
pub async fn start_add_flow(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    language_code: Option<&str>,
) -> Result<()> {
    if state.sessions.begin(user_id) {
        info!(user_id, "Discarded pending add-recipe submission");
    }
    bot.send_message(chat_id, t_lang("add-title-prompt", language_code))
        .reply_markup(KeyboardRemove::new())
        .await?;
    Ok(())
}

/// Feed input to the user's flow and reply.
///
/// Returns `false` without replying when the user has no flow in progress.
pub async fn handle_flow_input(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    input: FlowInput<'_>,
    language_code: Option<&str>,
) -> Result<bool> {
    let Some(transition) = state.sessions.feed(user_id, input) else {
        return Ok(false);
    };

    match transition {
        Transition::Advanced(flow) => {
            if let Some(key) = prompt_key(flow.state()) {
                bot.send_message(chat_id, t_lang(key, language_code)).await?;
            }
        }
        Transition::Rejected(flow) => {
            bot.send_message(chat_id, t_lang(rejection_key(flow.state()), language_code))
                .await?;
        }
        Transition::Completed(new_recipe) => match state.book.add_recipe(new_recipe).await {
            Ok(recipe) => {
                info!(user_id, recipe_id = recipe.id, title = %recipe.title, "Recipe added");
                bot.send_message(chat_id, t_lang("add-complete", language_code))
                    .reply_markup(main_menu_keyboard(language_code))
                    .await?;
            }
            Err(e) => {
                error!(user_id, error = %e, "Failed to save new recipe");
                let key = e.reply_key().unwrap_or("error-storage");
                bot.send_message(chat_id, t_lang(key, language_code))
                    .reply_markup(main_menu_keyboard(language_code))
                    .await?;
            }
        },
        Transition::Aborted(reason) => {
            let key = match reason {
                AbortReason::Cancelled => "add-cancelled",
                AbortReason::Incomplete(field) => {
                    info!(user_id, field, "Add-recipe flow aborted with missing data");
                    "add-incomplete"
                }
            };
            bot.send_message(chat_id, t_lang(key, language_code))
                .reply_markup(main_menu_keyboard(language_code))
                .await?;
        }
    }

    Ok(true)
}
