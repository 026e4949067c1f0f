//! BAI-indexed BAM read groups.
//!
//! One BAM file backs one read group. The indexed query yields alignments
//! overlapping the requested range in position order, which is exactly the
//! range-source contract the interval paginator needs; reads that start
//! before the range are part of the stream and handled by the cursor.

use std::path::{Path, PathBuf};

use bstr::ByteSlice as _;
use noodles::bam;

use crate::error::{Error, Result};
use crate::stores::{ReadStore, RecordIter, vcf::region};
use crate::types::{LinearPosition, ReadAlignment, ReadGroup};

pub struct BamReadStore {
    id: String,
    path: PathBuf,
}

impl BamReadStore {
    pub fn new(id: impl Into<String>, path: &Path) -> Self {
        Self {
            id: id.into(),
            path: path.to_path_buf(),
        }
    }

    fn map_record(&self, reference_name: &str, record: &bam::Record) -> Result<ReadAlignment> {
        let position = match record.alignment_start() {
            Some(position) => position.map_err(Error::Io)?.get() as u64 - 1,
            None => 0,
        };
        let fragment_name = record
            .name()
            .map(|name| name.to_string())
            .unwrap_or_default();
        let aligned_sequence: String = record
            .sequence()
            .iter()
            .map(|base| base as char)
            .collect();

        Ok(ReadAlignment {
            id: format!("{}:{}:{}:{}", self.id, reference_name, position, fragment_name),
            read_group_id: self.id.clone(),
            fragment_name,
            position: LinearPosition {
                reference_name: reference_name.to_string(),
                position,
            },
            aligned_sequence,
        })
    }
}

impl ReadStore for BamReadStore {
    fn id(&self) -> &str {
        &self.id
    }

    fn read_group(&self) -> ReadGroup {
        ReadGroup {
            id: self.id.clone(),
            name: self.id.clone(),
        }
    }

    fn reads(
        &self,
        reference_name: &str,
        start: u64,
        end: u64,
    ) -> Result<RecordIter<ReadAlignment>> {
        if start >= end {
            return Ok(Box::new(std::iter::empty()));
        }

        let mut reader = bam::io::indexed_reader::Builder::default().build_from_path(&self.path)?;
        let header = reader.read_header()?;

        let known = header
            .reference_sequences()
            .keys()
            .any(|name| name.as_bytes() == reference_name.as_bytes());
        if !known {
            return Ok(Box::new(std::iter::empty()));
        }
        let region = region(reference_name, start, end)?;

        let mut reads = Vec::new();
        for result in reader.query(&header, &region)? {
            let record = result?;
            reads.push(self.map_record(reference_name, &record)?);
        }
        Ok(Box::new(reads.into_iter().map(Ok)))
    }
}
