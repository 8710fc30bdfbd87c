//! services/api/src/web/state.rs
//!
//! Defines the shared application state handed to every handler.

use crate::config::Config;
use std::sync::Arc;
use vod_notes_core::ports::SharedNotesRepository;
use vod_notes_core::share::ShareGateway;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub gateway: ShareGateway,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(repo: Arc<dyn SharedNotesRepository>, config: Arc<Config>) -> Self {
        Self {
            gateway: ShareGateway::new(repo),
            config,
        }
    }
}
