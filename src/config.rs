//! # Bot Configuration Module
//!
//! Runtime settings resolved from environment variables (after an optional
//! `.env` file has been loaded), with defaults for everything except the
//! bot token and the admin identity.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::pagination::DEFAULT_PAGE_SIZE;

// Environment variable names
pub const ENV_TOKEN: &str = "TELEGRAM_BOT_TOKEN";
pub const ENV_ADMIN_ID: &str = "ADMIN_USER_ID";
pub const ENV_DATA_DIR: &str = "COOKBOOK_DATA_DIR";
pub const ENV_CATALOG_PAGE_SIZE: &str = "CATALOG_PAGE_SIZE";
pub const ENV_FAVORITES_PAGE_SIZE: &str = "FAVORITES_PAGE_SIZE";
pub const ENV_LANGUAGE: &str = "COOKBOOK_LANGUAGE";
pub const ENV_LOG_FORMAT: &str = "LOG_FORMAT";

pub const DEFAULT_DATA_DIR: &str = "./data";
pub const DEFAULT_LANGUAGE: &str = "ru";

/// Configuration structure for the bot
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Telegram Bot API token
    pub telegram_token: String,
    /// The single user allowed to delete recipes
    pub admin_id: u64,
    /// Directory holding `recipes.json` and `favorites.json`
    pub data_dir: PathBuf,
    /// Recipes per catalog page
    pub catalog_page_size: usize,
    /// Recipes per favorites page
    pub favorites_page_size: usize,
    /// Language used when the user's language is unsupported or unknown
    pub default_language: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            telegram_token: String::new(),
            admin_id: 0,
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            catalog_page_size: DEFAULT_PAGE_SIZE,
            favorites_page_size: DEFAULT_PAGE_SIZE,
            default_language: DEFAULT_LANGUAGE.to_string(),
            log_json: false,
        }
    }
}

impl BotConfig {
    /// Resolve from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve using `lookup` for variable values.
    ///
    /// Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let telegram_token = get(ENV_TOKEN).with_context(|| format!("{ENV_TOKEN} must be set"))?;

        let admin_id = get(ENV_ADMIN_ID)
            .with_context(|| format!("{ENV_ADMIN_ID} must be set (send /myid to the bot to find it)"))?
            .trim()
            .parse::<u64>()
            .with_context(|| format!("{ENV_ADMIN_ID} must be a numeric Telegram user id"))?;

        let data_dir = get(ENV_DATA_DIR).map_or(defaults.data_dir, PathBuf::from);

        let catalog_page_size = match get(ENV_CATALOG_PAGE_SIZE) {
            Some(value) => parse_page_size(ENV_CATALOG_PAGE_SIZE, &value)?,
            None => defaults.catalog_page_size,
        };
        let favorites_page_size = match get(ENV_FAVORITES_PAGE_SIZE) {
            Some(value) => parse_page_size(ENV_FAVORITES_PAGE_SIZE, &value)?,
            None => defaults.favorites_page_size,
        };

        let default_language = get(ENV_LANGUAGE)
            .map(|lang| lang.trim().to_lowercase())
            .unwrap_or(defaults.default_language);

        let log_json = get(ENV_LOG_FORMAT).is_some_and(|format| format.eq_ignore_ascii_case("json"));

        Ok(Self {
            telegram_token,
            admin_id,
            data_dir,
            catalog_page_size,
            favorites_page_size,
            default_language,
            log_json,
        })
    }
}

fn parse_page_size(key: &str, value: &str) -> Result<usize> {
    let size: usize = value
        .trim()
        .parse()
        .with_context(|| format!("{key} must be a positive integer, got {value:?}"))?;
    if size == 0 {
        bail!("{key} must be greater than zero");
    }
    Ok(size)
}
