//! Tests for the SQLite graph backend and its offset pagination scheme.

use axum_test::TestServer;
use ga4ghr::{
    Backend, Config, Error,
    config::BackendKind,
    handlers::{AppState, create_router},
    types::{SearchJoinsRequest, SearchSequencesRequest, SearchVariantSetsRequest},
};
use serde_json::{Value, json};
use std::sync::Arc;
use tempfile::TempDir;

fn graph_config(data_dir: &std::path::Path) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        backend: BackendKind::Graph,
        data_dir: data_dir.to_path_buf(),
        default_page_size: 100,
        max_response_bytes: 1 << 20,
        cors: false,
        log_level: "info".to_string(),
        sim_seed: 0,
        sim_variant_sets: 1,
        sim_calls: 1,
        sim_variant_density: 0.5,
    }
}

/// Builds a data directory holding a small topology database.
fn graph_data_dir() -> TempDir {
    let dir = TempDir::new().unwrap();
    let graphs = dir.path().join("graphs");
    std::fs::create_dir(&graphs).unwrap();

    let conn = rusqlite::Connection::open(graphs.join("topology.sqlite3")).unwrap();
    conn.execute_batch(
        "CREATE TABLE reference_sets (
             id TEXT PRIMARY KEY,
             md5checksum TEXT
         );
         CREATE TABLE refs (
             id TEXT PRIMARY KEY,
             name TEXT,
             sequence_id TEXT,
             start INTEGER,
             length INTEGER,
             md5checksum TEXT,
             reference_set_id TEXT
         );
         CREATE TABLE variant_sets (
             id TEXT PRIMARY KEY,
             dataset_id TEXT
         );
         CREATE TABLE sequences (
             id TEXT PRIMARY KEY,
             length INTEGER,
             bases TEXT
         );
         CREATE TABLE joins (
             side1_sequence_id TEXT,
             side1_position INTEGER,
             side1_forward INTEGER,
             side2_sequence_id TEXT,
             side2_position INTEGER,
             side2_forward INTEGER
         );

         INSERT INTO reference_sets VALUES ('grch-demo', 'abc123');
         INSERT INTO refs VALUES
             ('ref1', 'chr1', 'seq1', 0, 40, 'd41d8c', 'grch-demo'),
             ('ref2', 'chr2', 'seq2', 0, 8, 'e99a18', 'grch-demo');
         INSERT INTO variant_sets VALUES ('graphVs0', 'dataset0');
         INSERT INTO sequences VALUES
             ('seq1', 40, 'ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT'),
             ('seq2', 8, 'TTTTAAAA'),
             ('seq3', 4, 'GGCC'),
             ('seq4', 6, 'ATATAT'),
             ('seq5', 2, 'CG');
         INSERT INTO joins VALUES
             ('seq1', 39, 1, 'seq2', 0, 1),
             ('seq1', 39, 1, 'seq3', 0, 0),
             ('seq2', 7, 1, 'seq4', 0, 1);",
    )
    .unwrap();
    dir
}

#[test]
fn test_sequences_paginate_by_offset() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let request = |page_token: Option<String>| SearchSequencesRequest {
        list_bases: false,
        page_size: Some(2),
        page_token,
    };

    let page = backend.search_sequences(&request(None)).unwrap();
    assert_eq!(page.sequences.len(), 2);
    assert_eq!(page.sequences[0].id, "seq1");
    assert!(page.sequences[0].bases.is_none());
    assert_eq!(page.next_page_token.as_deref(), Some("2"));

    let page = backend
        .search_sequences(&request(Some("2".to_string())))
        .unwrap();
    assert_eq!(page.sequences.len(), 2);
    assert_eq!(page.sequences[0].id, "seq3");
    assert_eq!(page.next_page_token.as_deref(), Some("4"));

    let page = backend
        .search_sequences(&request(Some("4".to_string())))
        .unwrap();
    assert_eq!(page.sequences.len(), 1);
    assert_eq!(page.sequences[0].id, "seq5");
    assert!(page.next_page_token.is_none());
}

#[test]
fn test_sequences_list_bases() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let page = backend
        .search_sequences(&SearchSequencesRequest {
            list_bases: true,
            page_size: Some(1),
            page_token: None,
        })
        .unwrap();
    assert_eq!(page.sequences[0].bases.as_deref().map(str::len), Some(40));
}

#[test]
fn test_joins_filter_by_sequence() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let all = backend
        .search_joins(&SearchJoinsRequest::default())
        .unwrap();
    assert_eq!(all.joins.len(), 3);
    assert!(all.next_page_token.is_none());

    let filtered = backend
        .search_joins(&SearchJoinsRequest {
            sequence_id: Some("seq2".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(filtered.joins.len(), 2);
    for join in &filtered.joins {
        assert!(join.side1.sequence_id == "seq2" || join.side2.sequence_id == "seq2");
    }
}

#[test]
fn test_joins_offset_tokens_respect_filter() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let request = |page_token: Option<String>| SearchJoinsRequest {
        sequence_id: Some("seq1".to_string()),
        page_size: Some(1),
        page_token,
    };

    let page = backend.search_joins(&request(None)).unwrap();
    assert_eq!(page.joins.len(), 1);
    assert_eq!(page.next_page_token.as_deref(), Some("1"));

    let page = backend.search_joins(&request(Some("1".to_string()))).unwrap();
    assert_eq!(page.joins.len(), 1);
    assert!(page.next_page_token.is_none());
}

#[test]
fn test_variant_sets_come_from_the_database() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let page = backend
        .search_variant_sets(&SearchVariantSetsRequest::default())
        .unwrap();
    assert_eq!(page.variant_sets.len(), 1);
    assert_eq!(page.variant_sets[0].id, "graphVs0");
    assert_eq!(page.variant_sets[0].dataset_id.as_deref(), Some("dataset0"));
}

#[test]
fn test_reference_collections() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let sets = backend
        .search_reference_sets(&Default::default())
        .unwrap();
    assert_eq!(sets.reference_sets.len(), 1);
    assert_eq!(sets.reference_sets[0].md5checksum.as_deref(), Some("abc123"));

    let refs = backend.search_references(&Default::default()).unwrap();
    assert_eq!(refs.references.len(), 2);
    assert_eq!(refs.references[0].name, "chr1");
    assert_eq!(refs.references[1].length, 8);
}

#[test]
fn test_sequence_bases_substring() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();

    let bases = backend.sequence_bases("seq2", 2, Some(6)).unwrap();
    assert_eq!(bases.offset, 2);
    assert_eq!(bases.sequence, "TTAA");

    // End past the sequence is clamped.
    let bases = backend.sequence_bases("seq5", 0, Some(100)).unwrap();
    assert_eq!(bases.sequence, "CG");

    assert!(matches!(
        backend.sequence_bases("nope", 0, None).unwrap_err(),
        Error::NotFound(_)
    ));
}

#[tokio::test]
async fn test_graph_http_surface() {
    let dir = graph_data_dir();
    let backend = Backend::with_graph(&graph_config(dir.path())).unwrap();
    let server = TestServer::new(create_router(AppState {
        backend: Arc::new(backend),
    }))
    .unwrap();

    let response = server
        .post("/sequences/search")
        .json(&json!({"pageSize": 3}))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sequences"].as_array().unwrap().len(), 3);
    assert_eq!(body["nextPageToken"], "3");

    let response = server.get("/sequences/seq2/bases?start=4&end=8").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["sequence"], "AAAA");
    assert_eq!(body["offset"], 4);

    let response = server.get("/sequences/unknown/bases").await;
    response.assert_status_not_found();
}
