//! Single-admin authorization for destructive actions.

use tracing::warn;

use crate::errors::BotError;

/// Grants admin-only actions to exactly one configured user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminGate {
    admin_id: u64,
}

impl AdminGate {
    pub fn new(admin_id: u64) -> Self {
        Self { admin_id }
    }

    pub fn is_admin(&self, user: u64) -> bool {
        user == self.admin_id
    }

    /// `Ok` for the admin, [`BotError::Unauthorized`] for anyone else
    pub fn authorize(&self, user: u64) -> Result<(), BotError> {
        if self.is_admin(user) {
            Ok(())
        } else {
            warn!(user_id = user, "Rejected admin-only action");
            Err(BotError::Unauthorized(user))
        }
    }
}
