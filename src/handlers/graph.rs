//! Graph topology endpoints: sequences, joins and raw base retrieval.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use super::{AppState, run_search};
use crate::Result;
use crate::types::{
    SearchJoinsRequest, SearchJoinsResponse, SearchSequencesRequest, SearchSequencesResponse,
    SequenceBasesResponse,
};

pub async fn search_sequences(
    State(state): State<AppState>,
    Json(request): Json<SearchSequencesRequest>,
) -> Result<Json<SearchSequencesResponse>> {
    let response = run_search(state, move |backend| backend.search_sequences(&request)).await?;
    Ok(Json(response))
}

pub async fn search_joins(
    State(state): State<AppState>,
    Json(request): Json<SearchJoinsRequest>,
) -> Result<Json<SearchJoinsResponse>> {
    let response = run_search(state, move |backend| backend.search_joins(&request)).await?;
    Ok(Json(response))
}

#[derive(Debug, Deserialize, Default)]
pub struct BasesQuery {
    pub start: Option<u64>,
    pub end: Option<u64>,
}

pub async fn get_sequence_bases(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(query): Query<BasesQuery>,
) -> Result<Json<SequenceBasesResponse>> {
    let start = query.start.unwrap_or(0);
    let response = run_search(state, move |backend| {
        backend.sequence_bases(&id, start, query.end)
    })
    .await?;
    Ok(Json(response))
}
