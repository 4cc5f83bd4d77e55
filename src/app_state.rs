use std::sync::Arc;

use crate::{cors::CorsPolicy, store::ThoughtStore};

/// Everything a request handler needs, opened once at startup and shared by every connection.
pub struct AppState {
    pub store: Arc<dyn ThoughtStore>,
    pub cors: CorsPolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn ThoughtStore>, cors: CorsPolicy) -> Self {
        Self { store, cors }
    }
}
