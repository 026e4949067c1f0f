use axum::{Json, extract::State};

use super::{AppState, run_search};
use crate::Result;
use crate::types::{SearchReadsRequest, SearchReadsResponse};

pub async fn search_reads(
    State(state): State<AppState>,
    Json(request): Json<SearchReadsRequest>,
) -> Result<Json<SearchReadsResponse>> {
    tracing::debug!(
        read_group_ids = ?request.read_group_ids,
        reference_name = %request.reference_name,
        start = request.start,
        end = request.end,
        "reads search"
    );
    let response = run_search(state, move |backend| backend.search_reads(&request)).await?;
    Ok(Json(response))
}
