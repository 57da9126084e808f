//! Application State

use std::sync::Arc;

use defi_butler::ButlerSession;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The process-wide butler, initialized by the first chat request
    pub session: Arc<ButlerSession>,
}

impl AppState {
    pub fn new(session: ButlerSession) -> Self {
        Self {
            session: Arc::new(session),
        }
    }
}
