//! # Cookbook Telegram Bot
//!
//! A Telegram bot serving a small recipe catalog: paginated browsing,
//! search, per-user favorites, admin-only deletion and a guided
//! multi-step flow for adding recipes.

pub mod auth;
pub mod bot;
pub mod callback;
pub mod catalog;
pub mod config;
pub mod dialogue;
pub mod errors;
pub mod favorites;
pub mod localization;
pub mod pagination;
pub mod recipe;
pub mod recipe_book;
pub mod sessions;
pub mod storage;
