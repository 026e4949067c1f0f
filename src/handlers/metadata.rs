//! Search endpoints over the flat metadata collections.

use axum::{Json, extract::State};

use super::{AppState, run_search};
use crate::Result;
use crate::types::{
    SearchCallSetsRequest, SearchCallSetsResponse, SearchReadGroupSetsRequest,
    SearchReadGroupSetsResponse, SearchReferenceSetsRequest, SearchReferenceSetsResponse,
    SearchReferencesRequest, SearchReferencesResponse, SearchVariantSetsRequest,
    SearchVariantSetsResponse,
};

pub async fn search_variant_sets(
    State(state): State<AppState>,
    Json(request): Json<SearchVariantSetsRequest>,
) -> Result<Json<SearchVariantSetsResponse>> {
    let response = run_search(state, move |backend| backend.search_variant_sets(&request)).await?;
    Ok(Json(response))
}

pub async fn search_call_sets(
    State(state): State<AppState>,
    Json(request): Json<SearchCallSetsRequest>,
) -> Result<Json<SearchCallSetsResponse>> {
    let response = run_search(state, move |backend| backend.search_call_sets(&request)).await?;
    Ok(Json(response))
}

pub async fn search_read_group_sets(
    State(state): State<AppState>,
    Json(request): Json<SearchReadGroupSetsRequest>,
) -> Result<Json<SearchReadGroupSetsResponse>> {
    let response = run_search(state, move |backend| {
        backend.search_read_group_sets(&request)
    })
    .await?;
    Ok(Json(response))
}

pub async fn search_reference_sets(
    State(state): State<AppState>,
    Json(request): Json<SearchReferenceSetsRequest>,
) -> Result<Json<SearchReferenceSetsResponse>> {
    let response = run_search(state, move |backend| {
        backend.search_reference_sets(&request)
    })
    .await?;
    Ok(Json(response))
}

pub async fn search_references(
    State(state): State<AppState>,
    Json(request): Json<SearchReferencesRequest>,
) -> Result<Json<SearchReferencesResponse>> {
    let response = run_search(state, move |backend| backend.search_references(&request)).await?;
    Ok(Json(response))
}
