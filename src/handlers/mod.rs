mod graph;
mod metadata;
mod reads;
mod service_info;
mod variants;

pub use graph::{get_sequence_bases, search_joins, search_sequences};
pub use metadata::{
    search_call_sets, search_read_group_sets, search_reference_sets, search_references,
    search_variant_sets,
};
pub use reads::search_reads;
pub use service_info::service_info;
pub use variants::search_variants;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;

use crate::Backend;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<Backend>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/variants/search", post(search_variants))
        .route("/variantsets/search", post(search_variant_sets))
        .route("/callsets/search", post(search_call_sets))
        .route("/reads/search", post(search_reads))
        .route("/readgroupsets/search", post(search_read_group_sets))
        .route("/references/search", post(search_references))
        .route("/referencesets/search", post(search_reference_sets))
        .route("/sequences/search", post(search_sequences))
        .route("/joins/search", post(search_joins))
        .route("/sequences/:id/bases", get(get_sequence_bases))
        .route("/", get(service_info))
        .route("/service-info", get(service_info))
        .with_state(state)
}

/// Runs a synchronous backend search on the blocking pool.
///
/// Store iteration does file and database I/O; keeping it off the async
/// workers keeps the handlers honest about it.
async fn run_search<T, F>(state: AppState, search: F) -> crate::Result<T>
where
    T: Send + 'static,
    F: FnOnce(&Backend) -> crate::Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || search(&state.backend))
        .await
        .map_err(|e| crate::Error::Internal(format!("search task failed: {e}")))?
}
