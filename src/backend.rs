//! The search orchestrator.
//!
//! A backend owns the immutable store registries built at startup plus the
//! paging configuration, and exposes one function per search operation. Each
//! call validates the request, positions the right cursor and drives the page
//! assembler; no iterator or cursor state survives the call.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::paging::{
    CountedCursor, IntervalCursor, IntervalQuery, OffsetCursor, PageAssembler, Positioned,
    offset_from_token,
};
use crate::stores::{
    BamReadStore, GraphStore, ReadStore, Registry, SimulatedReadStore, SimulatedVariantStore,
    VariantStore, VcfVariantStore,
};
use crate::types::*;

pub struct Backend {
    variant_sets: Registry<Arc<dyn VariantStore>>,
    read_group_sets: Registry<ReadGroupSet>,
    read_groups: Registry<Arc<dyn ReadStore>>,
    graph: Option<GraphStore>,
    default_page_size: i32,
    max_response_bytes: usize,
}

impl Backend {
    /// A backend that contains no data.
    pub fn empty(config: &Config) -> Self {
        Self {
            variant_sets: Registry::empty(),
            read_group_sets: Registry::empty(),
            read_groups: Registry::empty(),
            graph: None,
            default_page_size: config.default_page_size,
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// Deterministic generated data, configured by the `sim_*` options.
    pub fn simulated(config: &Config) -> Self {
        let mut variant_sets: HashMap<String, Arc<dyn VariantStore>> = HashMap::new();
        for i in 0..config.sim_variant_sets {
            let id = format!("simVs{i}");
            let seed = config.sim_seed.wrapping_add(i as u64);
            variant_sets.insert(
                id.clone(),
                Arc::new(SimulatedVariantStore::new(
                    id,
                    seed,
                    config.sim_calls,
                    config.sim_variant_density,
                )),
            );
        }

        let mut read_groups: HashMap<String, Arc<dyn ReadStore>> = HashMap::new();
        let set_id = "aReadGroupSet".to_string();
        for i in 0..2 {
            let id = format!("{set_id}:simRg{i}");
            read_groups.insert(
                id.clone(),
                Arc::new(SimulatedReadStore::new(id, config.sim_seed.wrapping_add(i))),
            );
        }
        let read_groups = Registry::new(read_groups);
        let read_group_sets = Registry::new(HashMap::from([(
            set_id.clone(),
            ReadGroupSet {
                id: set_id.clone(),
                name: set_id,
                read_groups: read_groups.values().map(|rg| rg.read_group()).collect(),
            },
        )]));

        Self {
            variant_sets: Registry::new(variant_sets),
            read_group_sets,
            read_groups,
            graph: None,
            default_page_size: config.default_page_size,
            max_response_bytes: config.max_response_bytes,
        }
    }

    /// File-backed data: `data_dir/variants/<setId>/*.vcf.gz` and
    /// `data_dir/reads/<setId>/*.bam`.
    pub fn from_data_dir(config: &Config) -> Result<Self> {
        let data_dir = &config.data_dir;

        let mut variant_sets: HashMap<String, Arc<dyn VariantStore>> = HashMap::new();
        for dir in subdirectories(&data_dir.join("variants"))? {
            let id = directory_name(&dir);
            let store = VcfVariantStore::open(id.clone(), &dir)?;
            variant_sets.insert(id, Arc::new(store));
        }

        let mut read_group_sets = HashMap::new();
        let mut read_groups: HashMap<String, Arc<dyn ReadStore>> = HashMap::new();
        for dir in subdirectories(&data_dir.join("reads"))? {
            let set_id = directory_name(&dir);
            let mut groups = Vec::new();
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                if path.extension().is_some_and(|ext| ext == "bam") {
                    let stem = path
                        .file_stem()
                        .map(|s| s.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    let id = format!("{set_id}:{stem}");
                    let store = Arc::new(BamReadStore::new(id.clone(), &path));
                    groups.push(store.read_group());
                    read_groups.insert(id, store);
                }
            }
            groups.sort_by(|a, b| a.id.cmp(&b.id));
            read_group_sets.insert(
                set_id.clone(),
                ReadGroupSet {
                    id: set_id.clone(),
                    name: set_id,
                    read_groups: groups,
                },
            );
        }

        Ok(Self {
            variant_sets: Registry::new(variant_sets),
            read_group_sets: Registry::new(read_group_sets),
            read_groups: Registry::new(read_groups),
            graph: None,
            default_page_size: config.default_page_size,
            max_response_bytes: config.max_response_bytes,
        })
    }

    /// Graph topology data: one SQLite database under `data_dir/graphs`.
    pub fn with_graph(config: &Config) -> Result<Self> {
        let graph = GraphStore::open(&config.data_dir.join("graphs"))?;
        Ok(Self {
            variant_sets: Registry::empty(),
            read_group_sets: Registry::empty(),
            read_groups: Registry::empty(),
            graph: Some(graph),
            default_page_size: config.default_page_size,
            max_response_bytes: config.max_response_bytes,
        })
    }

    fn page_size(&self, requested: Option<i32>) -> i32 {
        requested.unwrap_or(self.default_page_size)
    }

    fn single_id<'a>(ids: &'a [String], what: &str) -> Result<&'a str> {
        match ids {
            [] => Err(Error::InvalidInput(format!(
                "search requires specifying exactly one {what}"
            ))),
            [id] => Ok(id),
            _ => Err(Error::NotImplemented(format!(
                "search over multiple {what}s is not supported"
            ))),
        }
    }

    fn check_interval(start: u64, end: u64) -> Result<()> {
        if start > end {
            return Err(Error::InvalidRange(format!(
                "start {start} is greater than end {end}"
            )));
        }
        Ok(())
    }

    /// Drives an interval cursor until the page is full.
    fn run_interval_search<R, I, F>(
        &self,
        page_size: Option<i32>,
        query: IntervalQuery,
        open: F,
    ) -> Result<(Vec<R>, Option<String>)>
    where
        R: Positioned + Serialize,
        I: Iterator<Item = Result<R>>,
        F: FnOnce(u64, u64) -> Result<I>,
    {
        let mut assembler = PageAssembler::new(self.page_size(page_size), self.max_response_bytes)?;
        let mut cursor = IntervalCursor::resume(&query, open)?;
        while let Some((record, token)) = cursor.next_pair()? {
            assembler.push(record, token)?;
            if assembler.is_full() {
                break;
            }
        }
        Ok(assembler.into_page())
    }

    /// Pages over a startup registry, projecting entries into protocol form.
    fn run_registry_search<T, U, F>(
        &self,
        registry: &Registry<T>,
        page_size: Option<i32>,
        page_token: Option<&str>,
        project: F,
    ) -> Result<(Vec<U>, Option<String>)>
    where
        U: Serialize,
        F: Fn(&T) -> U,
    {
        let mut assembler = PageAssembler::new(self.page_size(page_size), self.max_response_bytes)?;
        let mut cursor = OffsetCursor::resume(registry, page_token)?;
        while let Some((entry, token)) = cursor.next_pair()? {
            assembler.push(project(entry), token)?;
            if assembler.is_full() {
                break;
            }
        }
        Ok(assembler.into_page())
    }

    /// Pages over a count-reporting store slice (the graph scheme).
    fn run_counted_search<T, F>(
        &self,
        page_size: Option<i32>,
        page_token: Option<&str>,
        fetch: F,
    ) -> Result<(Vec<T>, Option<String>)>
    where
        T: Serialize,
        F: FnOnce(u64, u64) -> Result<(u64, Vec<T>)>,
    {
        let page_size = self.page_size(page_size);
        let mut assembler = PageAssembler::new(page_size, self.max_response_bytes)?;
        let start = offset_from_token(page_token)?;
        let (total, items) = fetch(start, start.saturating_add(page_size as u64))?;
        let mut cursor = CountedCursor::new(start, total, items);
        while let Some((item, token)) = cursor.next_pair() {
            assembler.push(item, token)?;
            if assembler.is_full() {
                break;
            }
        }
        Ok(assembler.into_page())
    }

    fn graph(&self) -> Result<&GraphStore> {
        self.graph.as_ref().ok_or_else(|| {
            Error::NotImplemented("this backend does not serve graph searches".to_string())
        })
    }

    // --- Search operations -------------------------------------------------

    pub fn search_variants(&self, request: &SearchVariantsRequest) -> Result<SearchVariantsResponse> {
        let id = Self::single_id(&request.variant_set_ids, "variantSet")?;
        let store = self
            .variant_sets
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("variant set {id}")))?;
        Self::check_interval(request.start, request.end)?;

        let query = IntervalQuery {
            start: request.start,
            end: request.end,
            page_token: request.page_token.clone(),
        };
        let (variants, next_page_token) =
            self.run_interval_search(request.page_size, query, |start, end| {
                store.variants(&request.reference_name, start, end)
            })?;
        Ok(SearchVariantsResponse {
            variants,
            next_page_token,
        })
    }

    pub fn search_reads(&self, request: &SearchReadsRequest) -> Result<SearchReadsResponse> {
        let id = Self::single_id(&request.read_group_ids, "readGroup")?;
        let store = self
            .read_groups
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("read group {id}")))?;
        Self::check_interval(request.start, request.end)?;

        let query = IntervalQuery {
            start: request.start,
            end: request.end,
            page_token: request.page_token.clone(),
        };
        let (alignments, next_page_token) =
            self.run_interval_search(request.page_size, query, |start, end| {
                store.reads(&request.reference_name, start, end)
            })?;
        Ok(SearchReadsResponse {
            alignments,
            next_page_token,
        })
    }

    pub fn search_variant_sets(
        &self,
        request: &SearchVariantSetsRequest,
    ) -> Result<SearchVariantSetsResponse> {
        let (variant_sets, next_page_token) = match &self.graph {
            Some(graph) => self.run_counted_search(
                request.page_size,
                request.page_token.as_deref(),
                |start, end| graph.variant_sets(start, end),
            )?,
            None => self.run_registry_search(
                &self.variant_sets,
                request.page_size,
                request.page_token.as_deref(),
                |store| store.variant_set(),
            )?,
        };
        Ok(SearchVariantSetsResponse {
            variant_sets,
            next_page_token,
        })
    }

    pub fn search_call_sets(
        &self,
        request: &SearchCallSetsRequest,
    ) -> Result<SearchCallSetsResponse> {
        let id = Self::single_id(&request.variant_set_ids, "variantSet")?;
        let store = self
            .variant_sets
            .get(id)
            .ok_or_else(|| Error::NotFound(format!("variant set {id}")))?;
        let (call_sets, next_page_token) = self.run_registry_search(
            store.call_sets(),
            request.page_size,
            request.page_token.as_deref(),
            Clone::clone,
        )?;
        Ok(SearchCallSetsResponse {
            call_sets,
            next_page_token,
        })
    }

    pub fn search_read_group_sets(
        &self,
        request: &SearchReadGroupSetsRequest,
    ) -> Result<SearchReadGroupSetsResponse> {
        let (read_group_sets, next_page_token) = self.run_registry_search(
            &self.read_group_sets,
            request.page_size,
            request.page_token.as_deref(),
            Clone::clone,
        )?;
        Ok(SearchReadGroupSetsResponse {
            read_group_sets,
            next_page_token,
        })
    }

    pub fn search_reference_sets(
        &self,
        request: &SearchReferenceSetsRequest,
    ) -> Result<SearchReferenceSetsResponse> {
        let graph = self.graph()?;
        let (reference_sets, next_page_token) = self.run_counted_search(
            request.page_size,
            request.page_token.as_deref(),
            |start, end| graph.reference_sets(start, end),
        )?;
        Ok(SearchReferenceSetsResponse {
            reference_sets,
            next_page_token,
        })
    }

    pub fn search_references(
        &self,
        request: &SearchReferencesRequest,
    ) -> Result<SearchReferencesResponse> {
        let graph = self.graph()?;
        let (references, next_page_token) = self.run_counted_search(
            request.page_size,
            request.page_token.as_deref(),
            |start, end| graph.references(start, end),
        )?;
        Ok(SearchReferencesResponse {
            references,
            next_page_token,
        })
    }

    pub fn search_sequences(
        &self,
        request: &SearchSequencesRequest,
    ) -> Result<SearchSequencesResponse> {
        let graph = self.graph()?;
        let (sequences, next_page_token) = self.run_counted_search(
            request.page_size,
            request.page_token.as_deref(),
            |start, end| graph.sequences(start, end, request.list_bases),
        )?;
        Ok(SearchSequencesResponse {
            sequences,
            next_page_token,
        })
    }

    pub fn search_joins(&self, request: &SearchJoinsRequest) -> Result<SearchJoinsResponse> {
        let graph = self.graph()?;
        let (joins, next_page_token) = self.run_counted_search(
            request.page_size,
            request.page_token.as_deref(),
            |start, end| graph.joins(start, end, request.sequence_id.as_deref()),
        )?;
        Ok(SearchJoinsResponse {
            joins,
            next_page_token,
        })
    }

    pub fn sequence_bases(
        &self,
        id: &str,
        start: u64,
        end: Option<u64>,
    ) -> Result<SequenceBasesResponse> {
        let graph = self.graph()?;
        let sequence = graph.sequence_bases(id, start, end)?;
        Ok(SequenceBasesResponse {
            offset: start,
            sequence,
        })
    }
}

fn subdirectories(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut dirs = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn directory_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
