//! Application state shared across handlers

use crate::{
    middleware::TokenVerifier,
    repositories::Store,
    services::{ComplaintTracker, ShiftScheduler},
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState<S> {
    pub scheduler: ShiftScheduler<S>,
    pub complaints: ComplaintTracker<S>,
    pub token_verifier: TokenVerifier,
}

impl<S: Store> AppState<S> {
    pub fn new(store: S, token_verifier: TokenVerifier) -> Self {
        Self {
            scheduler: ShiftScheduler::new(store.clone()),
            complaints: ComplaintTracker::new(store),
            token_verifier,
        }
    }
}
