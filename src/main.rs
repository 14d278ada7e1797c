use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::prelude::*;
use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cookbook::auth::AdminGate;
use cookbook::bot::{self, BotState};
use cookbook::config::BotConfig;
use cookbook::localization::init_localization;
use cookbook::recipe_book::RecipeBook;
use cookbook::storage::FileStore;

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    let config = BotConfig::from_env()?;
    init_tracing(config.log_json);

    info!("Starting Cookbook Telegram Bot");

    init_localization(&config.default_language)?;

    info!(data_dir = %config.data_dir.display(), "Opening recipe storage");
    let store = FileStore::open(&config.data_dir)
        .with_context(|| format!("cannot open data directory {}", config.data_dir.display()))?;

    let book = RecipeBook::open(Arc::new(store), AdminGate::new(config.admin_id))
        .with_page_sizes(config.catalog_page_size, config.favorites_page_size);
    let state = Arc::new(BotState::new(book));

    let bot = Bot::new(config.telegram_token);

    info!(admin_id = config.admin_id, "Bot initialized, starting dispatcher");

    let handler = dptree::entry()
        .branch(Update::filter_message().endpoint(bot::message_handler))
        .branch(Update::filter_callback_query().endpoint(bot::callback_handler));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}
