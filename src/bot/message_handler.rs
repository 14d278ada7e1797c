//! Message Handler module for processing incoming Telegram messages

use std::sync::Arc;

use anyhow::Result;
use teloxide::prelude::*;
use teloxide::types::KeyboardRemove;
use tracing::debug;

use crate::dialogue::FlowInput;
use crate::localization::{t_args_lang, t_lang};

use super::dialogue_manager::{handle_flow_input, start_add_flow};
use super::ui_builder::{catalog_keyboard, favorites_keyboard, main_menu_keyboard, menu_action, MenuAction};
use super::{send_recipe, send_with_menu, BotState};

/// Slash commands understood by the bot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
    MyId,
    Catalog,
    Random,
    Favorites,
    Add,
    Cancel,
    Unknown,
}

/// Parse a `/command` (optionally addressed as `/command@botname`)
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let word = text.split_whitespace().next()?;
    let name = word.strip_prefix('/')?;
    let name = name.split('@').next().unwrap_or(name);

    Some(match name.to_lowercase().as_str() {
        "start" => BotCommand::Start,
        "help" => BotCommand::Help,
        "myid" => BotCommand::MyId,
        "catalog" => BotCommand::Catalog,
        "random" => BotCommand::Random,
        "favs" => BotCommand::Favorites,
        "add" => BotCommand::Add,
        "cancel" => BotCommand::Cancel,
        _ => BotCommand::Unknown,
    })
}

async fn show_catalog(bot: &Bot, chat_id: ChatId, state: &BotState, language_code: Option<&str>) -> Result<()> {
    let page = state.book.catalog_page(1).await;
    if page.recipes.is_empty() {
        return send_with_menu(bot, chat_id, "catalog-empty", language_code).await;
    }
    bot.send_message(chat_id, t_lang("catalog-title", language_code))
        .reply_markup(catalog_keyboard(&page))
        .await?;
    Ok(())
}

async fn show_favorites(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    language_code: Option<&str>,
) -> Result<()> {
    match state.book.favorites_page(user_id, 1).await {
        Some(page) => {
            bot.send_message(chat_id, t_lang("favorites-title", language_code))
                .reply_markup(favorites_keyboard(&page, language_code))
                .await?;
            Ok(())
        }
        None => send_with_menu(bot, chat_id, "favorites-empty", language_code).await,
    }
}

async fn show_random(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    language_code: Option<&str>,
) -> Result<()> {
    match state.book.random().await {
        Some(recipe) => {
            send_recipe(bot, chat_id, state, &recipe, user_id, language_code).await?;
            send_with_menu(bot, chat_id, "what-next", language_code).await
        }
        None => send_with_menu(bot, chat_id, "catalog-empty", language_code).await,
    }
}

async fn show_search_hint(bot: &Bot, chat_id: ChatId, language_code: Option<&str>) -> Result<()> {
    bot.send_message(chat_id, t_lang("search-hint", language_code))
        .reply_markup(KeyboardRemove::new())
        .await?;
    Ok(())
}

async fn handle_search(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    query: &str,
    language_code: Option<&str>,
) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        return show_search_hint(bot, chat_id, language_code).await;
    }

    let hits = state.book.search(query).await;
    debug!(user_id, query, hits = hits.len(), "Search");

    let Some(first) = hits.first() else {
        return send_with_menu(bot, chat_id, "search-none", language_code).await;
    };
    send_recipe(bot, chat_id, state, first, user_id, language_code).await?;

    let count = hits.len().to_string();
    bot.send_message(
        chat_id,
        t_args_lang("search-found", &[("count", count.as_str())], language_code),
    )
    .reply_markup(main_menu_keyboard(language_code))
    .await?;
    Ok(())
}

async fn handle_command(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    command: BotCommand,
    language_code: Option<&str>,
) -> Result<()> {
    match command {
        BotCommand::Start => send_with_menu(bot, chat_id, "welcome", language_code).await,
        BotCommand::Help => send_with_menu(bot, chat_id, "help", language_code).await,
        BotCommand::MyId => {
            let id = user_id.to_string();
            bot.send_message(chat_id, t_args_lang("my-id", &[("user_id", id.as_str())], language_code))
                .await?;
            Ok(())
        }
        BotCommand::Catalog => show_catalog(bot, chat_id, state, language_code).await,
        BotCommand::Random => show_random(bot, chat_id, state, user_id, language_code).await,
        BotCommand::Favorites => show_favorites(bot, chat_id, state, user_id, language_code).await,
        BotCommand::Add => start_add_flow(bot, chat_id, state, user_id, language_code).await,
        BotCommand::Cancel => {
            if !handle_flow_input(bot, chat_id, state, user_id, FlowInput::Cancel, language_code).await? {
                send_with_menu(bot, chat_id, "unknown-command", language_code).await?;
            }
            Ok(())
        }
        BotCommand::Unknown => send_with_menu(bot, chat_id, "unknown-command", language_code).await,
    }
}

async fn handle_menu_action(
    bot: &Bot,
    chat_id: ChatId,
    state: &BotState,
    user_id: u64,
    action: MenuAction,
    language_code: Option<&str>,
) -> Result<()> {
    match action {
        MenuAction::Catalog => show_catalog(bot, chat_id, state, language_code).await,
        MenuAction::Random => show_random(bot, chat_id, state, user_id, language_code).await,
        MenuAction::Search => show_search_hint(bot, chat_id, language_code).await,
        MenuAction::Add => start_add_flow(bot, chat_id, state, user_id, language_code).await,
        MenuAction::Favorites => show_favorites(bot, chat_id, state, user_id, language_code).await,
    }
}

async fn handle_text_message(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    user_id: u64,
    text: &str,
    language_code: Option<&str>,
) -> Result<()> {
    let chat_id = msg.chat.id;

    // Commands and menu buttons take priority over add-flow input
    if let Some(command) = parse_command(text) {
        debug!(user_id, ?command, "Received command");
        return handle_command(bot, chat_id, state, user_id, command, language_code).await;
    }
    if let Some(action) = menu_action(text) {
        debug!(user_id, ?action, "Received menu button");
        return handle_menu_action(bot, chat_id, state, user_id, action, language_code).await;
    }

    if handle_flow_input(bot, chat_id, state, user_id, FlowInput::Text(text), language_code).await? {
        return Ok(());
    }

    handle_search(bot, chat_id, state, user_id, text, language_code).await
}

async fn handle_photo_message(
    bot: &Bot,
    msg: &Message,
    state: &BotState,
    user_id: u64,
    language_code: Option<&str>,
) -> Result<()> {
    // Telegram lists photo sizes in ascending order
    let Some(largest_photo) = msg.photo().and_then(|photos| photos.last()) else {
        return Ok(());
    };
    let input = FlowInput::Photo(largest_photo.file.id.0.clone());

    if !handle_flow_input(bot, msg.chat.id, state, user_id, input, language_code).await? {
        debug!(user_id, "Ignoring photo outside of the add-recipe flow");
    }
    Ok(())
}

pub async fn message_handler(bot: Bot, msg: Message, state: Arc<BotState>) -> Result<()> {
    let Some(user) = msg.from.as_ref() else {
        debug!(chat_id = %msg.chat.id, "Ignoring message without sender");
        return Ok(());
    };
    let user_id = user.id.0;
    let language_code = user.language_code.as_deref();

    if let Some(text) = msg.text() {
        handle_text_message(&bot, &msg, &state, user_id, text, language_code).await?;
    } else if msg.photo().is_some() {
        handle_photo_message(&bot, &msg, &state, user_id, language_code).await?;
    } else if !handle_flow_input(&bot, msg.chat.id, &state, user_id, FlowInput::Other, language_code).await? {
        debug!(user_id, "Received unsupported message type");
    }

    Ok(())
}
