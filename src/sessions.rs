//! # Submission Session Table
//!
//! Holds at most one live [`AddRecipeFlow`] per user.
//!
//! # Lifecycle
//!
//! - Created by [`SubmissionSessions::begin`], replacing any stale flow
//! - Updated in place while the flow advances or rejects input
//! - Removed as soon as the flow completes or aborts
//!
//! Sessions live only in memory and are lost on restart.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::debug;

use crate::dialogue::{AddRecipeFlow, AddRecipeState, FlowInput, Transition};

#[derive(Debug, Default)]
pub struct SubmissionSessions {
    sessions: Mutex<HashMap<u64, AddRecipeFlow>>,
}

impl SubmissionSessions {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<u64, AddRecipeFlow>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a fresh flow for `user`; returns `true` if a pending one was discarded
    pub fn begin(&self, user: u64) -> bool {
        let discarded = self.lock().insert(user, AddRecipeFlow::start()).is_some();
        debug!(user_id = user, discarded, "Add-recipe flow started");
        discarded
    }

    pub fn state_of(&self, user: u64) -> AddRecipeState {
        self.lock()
            .get(&user)
            .map_or(AddRecipeState::Entry, AddRecipeFlow::state)
    }

    pub fn is_active(&self, user: u64) -> bool {
        self.lock().contains_key(&user)
    }

    /// Feed input to the user's flow; `None` when no flow is in progress
    pub fn feed(&self, user: u64, input: FlowInput<'_>) -> Option<Transition> {
        let mut sessions = self.lock();
        let flow = sessions.remove(&user)?;
        let transition = flow.advance(input);
        match &transition {
            Transition::Advanced(next) | Transition::Rejected(next) => {
                sessions.insert(user, next.clone());
            }
            Transition::Completed(_) | Transition::Aborted(_) => {}
        }
        debug!(user_id = user, state = ?transition.state(), "Add-recipe flow input");
        Some(transition)
    }

    /// Abort the user's flow; returns `true` if one was in progress
    pub fn cancel(&self, user: u64) -> bool {
        self.feed(user, FlowInput::Cancel).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}
