//! Tabix-indexed VCF variant sets.
//!
//! A variant set is a directory of bgzip-compressed, tabix-indexed VCF files,
//! typically one per chromosome. The tabix headers are read once at startup
//! to route each reference name to its file; the VCF headers supply the call
//! sets (one per sample). Record readers are opened per query and dropped
//! with it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use noodles::core::{Position, Region};
use noodles::vcf::variant::record::{AlternateBases as _, Ids as _};
use noodles::csi::BinningIndex as _;
use noodles::{tabix, vcf};

use crate::error::{Error, Result};
use crate::stores::{RecordIter, Registry, VariantStore};
use crate::types::{CallSet, Variant, VariantSet};

pub struct VcfVariantStore {
    id: String,
    // reference name -> the indexed VCF that carries it
    files: HashMap<String, PathBuf>,
    call_sets: Registry<CallSet>,
}

impl VcfVariantStore {
    /// Scans `dir` for `*.vcf.gz` files with `.tbi` indices.
    pub fn open(id: impl Into<String>, dir: &Path) -> Result<Self> {
        let id = id.into();
        let mut files = HashMap::new();
        let mut call_sets = HashMap::new();

        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.to_string_lossy().ends_with(".vcf.gz") {
                continue;
            }

            let index_path = PathBuf::from(format!("{}.tbi", path.display()));
            let index = tabix::read(&index_path)?;
            let header = index.header().ok_or_else(|| {
                Error::Internal(format!("tabix index {index_path:?} has no header"))
            })?;
            for name in header.reference_sequence_names() {
                files.insert(name.to_string(), path.clone());
            }

            let mut reader = vcf::io::reader::Builder::default().build_from_path(&path)?;
            let vcf_header = reader.read_header()?;
            for sample in vcf_header.sample_names() {
                let call_set_id = format!("{id}:{sample}");
                call_sets.entry(call_set_id.clone()).or_insert(CallSet {
                    id: call_set_id,
                    name: sample.to_string(),
                    sample_id: Some(sample.to_string()),
                    variant_set_ids: vec![id.clone()],
                });
            }
        }

        if files.is_empty() {
            return Err(Error::NotFound(format!(
                "no indexed VCF files in {}",
                dir.display()
            )));
        }

        Ok(Self {
            id,
            files,
            call_sets: Registry::new(call_sets),
        })
    }

    fn map_record(&self, reference_name: &str, record: &vcf::Record) -> Result<Variant> {
        let start = match record.variant_start() {
            Some(position) => position.map_err(Error::Io)?.get() as u64 - 1,
            None => 0,
        };
        let reference_bases = record.reference_bases().to_string();
        let end = start + reference_bases.len().max(1) as u64;

        let mut alternate_bases = Vec::new();
        for alt in record.alternate_bases().iter() {
            alternate_bases.push(alt.map_err(Error::Io)?.to_string());
        }
        let names: Vec<String> = record.ids().iter().map(String::from).collect();

        // TODO: map per-sample genotype columns into Call entries.
        Ok(Variant {
            id: format!("{}:{}:{}", self.id, reference_name, start),
            variant_set_id: self.id.clone(),
            names,
            reference_name: reference_name.to_string(),
            start,
            end,
            reference_bases,
            alternate_bases,
            calls: Vec::new(),
        })
    }
}

/// 0-based half-open coordinates to a 1-based inclusive region.
pub(crate) fn region(reference_name: &str, start: u64, end: u64) -> Result<Region> {
    let first = Position::try_from(start as usize + 1)
        .map_err(|e| Error::InvalidRange(e.to_string()))?;
    let last = Position::try_from((end as usize).max(1))
        .map_err(|e| Error::InvalidRange(e.to_string()))?;
    Ok(Region::new(reference_name, first..=last))
}

impl VariantStore for VcfVariantStore {
    fn id(&self) -> &str {
        &self.id
    }

    fn variant_set(&self) -> VariantSet {
        VariantSet {
            id: self.id.clone(),
            dataset_id: None,
        }
    }

    fn call_sets(&self) -> &Registry<CallSet> {
        &self.call_sets
    }

    fn variants(&self, reference_name: &str, start: u64, end: u64) -> Result<RecordIter<Variant>> {
        if start >= end {
            return Ok(Box::new(std::iter::empty()));
        }
        let Some(path) = self.files.get(reference_name) else {
            // Unknown chromosome: no records, not an error.
            return Ok(Box::new(std::iter::empty()));
        };

        let mut reader = vcf::io::indexed_reader::Builder::default().build_from_path(path)?;
        let header = reader.read_header()?;
        let region = region(reference_name, start, end)?;

        let mut variants = Vec::new();
        for result in reader.query(&header, &region)? {
            let record = result?;
            variants.push(self.map_record(reference_name, &record)?);
        }
        Ok(Box::new(variants.into_iter().map(Ok)))
    }
}
