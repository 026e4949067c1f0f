use axum::{Json, extract::State};

use super::{AppState, run_search};
use crate::Result;
use crate::types::{SearchVariantsRequest, SearchVariantsResponse};

pub async fn search_variants(
    State(state): State<AppState>,
    Json(request): Json<SearchVariantsRequest>,
) -> Result<Json<SearchVariantsResponse>> {
    tracing::debug!(
        variant_set_ids = ?request.variant_set_ids,
        reference_name = %request.reference_name,
        start = request.start,
        end = request.end,
        "variants search"
    );
    let response = run_search(state, move |backend| backend.search_variants(&request)).await?;
    Ok(Json(response))
}
