//! # Callback Token Protocol
//!
//! Inline buttons carry their whole intent in `callback_data`: a fixed
//! prefix naming the action followed by a decimal argument (a recipe id or
//! a 1-based page number), e.g. `cp:2` or `da:17`. The literal `noop` marks
//! the non-actionable page indicator.
//!
//! Tokens are only ever produced by [`CallbackAction`]'s `Display` impl, so
//! anything that fails to parse is a stale or forged button and is ignored
//! by the caller.

use std::fmt;
use std::str::FromStr;

use crate::errors::BotError;
use crate::recipe::RecipeId;

/// Token of the page indicator button
pub const NOOP_TOKEN: &str = "noop";

/// Every action an inline button can trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallbackAction {
    /// `fa:<id>`
    FavoriteAdd(RecipeId),
    /// `fd:<id>`
    FavoriteRemove(RecipeId),
    /// `cp:<page>`
    CatalogPage(u32),
    /// `cs:<id>`
    CatalogShow(RecipeId),
    /// `fp:<page>`
    FavoritesPage(u32),
    /// `fs:<id>`
    FavoritesShow(RecipeId),
    /// `da:<id>`
    DeleteAsk(RecipeId),
    /// `do:<id>`
    DeleteConfirm(RecipeId),
    /// `dn:<id>`
    DeleteCancel(RecipeId),
    /// `noop`
    Noop,
}

impl CallbackAction {
    /// Prefix and argument of the token, `None` for [`CallbackAction::Noop`]
    fn parts(self) -> Option<(&'static str, u32)> {
        use CallbackAction::*;
        match self {
            FavoriteAdd(id) => Some(("fa:", id)),
            FavoriteRemove(id) => Some(("fd:", id)),
            CatalogPage(page) => Some(("cp:", page)),
            CatalogShow(id) => Some(("cs:", id)),
            FavoritesPage(page) => Some(("fp:", page)),
            FavoritesShow(id) => Some(("fs:", id)),
            DeleteAsk(id) => Some(("da:", id)),
            DeleteConfirm(id) => Some(("do:", id)),
            DeleteCancel(id) => Some(("dn:", id)),
            Noop => None,
        }
    }

    /// Encode as `callback_data`
    pub fn token(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallbackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.parts() {
            Some((prefix, arg)) => write!(f, "{prefix}{arg}"),
            None => f.write_str(NOOP_TOKEN),
        }
    }
}

impl FromStr for CallbackAction {
    type Err = BotError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        use CallbackAction::*;

        if token == NOOP_TOKEN {
            return Ok(Noop);
        }

        let malformed = || BotError::MalformedToken(token.to_string());

        // All prefixes are two ASCII letters and a colon
        let (prefix, arg) = match token.char_indices().nth(3) {
            Some((split, _)) => token.split_at(split),
            None => return Err(malformed()),
        };
        if !arg.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let arg: u32 = arg.parse().map_err(|_| malformed())?;

        let constructor: fn(u32) -> CallbackAction = match prefix {
            "fa:" => FavoriteAdd,
            "fd:" => FavoriteRemove,
            "cp:" => CatalogPage,
            "cs:" => CatalogShow,
            "fp:" => FavoritesPage,
            "fs:" => FavoritesShow,
            "da:" => DeleteAsk,
            "do:" => DeleteConfirm,
            "dn:" => DeleteCancel,
            _ => return Err(malformed()),
        };
        Ok(constructor(arg))
    }
}

/// Decode a token; `None` for anything this bot could not have produced
pub fn decode(token: &str) -> Option<CallbackAction> {
    token.parse().ok()
}
