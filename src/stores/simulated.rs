//! Deterministic simulated stores.
//!
//! Every record is derived from a seed mixed with its coordinate, so any
//! subrange replays identically on every query. That restartability is the
//! precondition resumable pagination places on a range source, which also
//! makes these stores the reference implementation the pagination tests run
//! against.

use std::collections::HashMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::Result;
use crate::stores::{ReadStore, RecordIter, Registry, VariantStore};
use crate::types::{
    Call, CallSet, LinearPosition, ReadAlignment, ReadGroup, Variant, VariantSet,
};

const BASES: [&str; 4] = ["A", "C", "G", "T"];

fn coordinate_rng(seed: u64, position: u64) -> StdRng {
    StdRng::seed_from_u64(seed ^ position.wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

/// Simulated variant set: a variant appears at a coordinate with the
/// configured density, one per coordinate.
pub struct SimulatedVariantStore {
    id: String,
    seed: u64,
    density: f64,
    call_sets: Registry<CallSet>,
}

impl SimulatedVariantStore {
    pub fn new(id: impl Into<String>, seed: u64, num_calls: usize, density: f64) -> Self {
        let id = id.into();
        let mut map = HashMap::new();
        for i in 0..num_calls {
            let name = format!("simCall{i}");
            let call_set_id = format!("{id}:{name}");
            map.insert(
                call_set_id.clone(),
                CallSet {
                    id: call_set_id,
                    name: name.clone(),
                    sample_id: Some(name),
                    variant_set_ids: vec![id.clone()],
                },
            );
        }
        Self {
            id,
            seed,
            density,
            call_sets: Registry::new(map),
        }
    }

    fn variant_at(&self, reference_name: &str, position: u64, rng: &mut StdRng) -> Variant {
        let reference_index = rng.gen_range(0..BASES.len());
        let alternate_index = (reference_index + 1 + rng.gen_range(0..BASES.len() - 1)) % BASES.len();
        let reference_bases = BASES[reference_index];
        let alternate_bases = vec![BASES[alternate_index].to_string()];
        let calls = self
            .call_sets
            .values()
            .map(|cs| Call {
                call_set_id: cs.id.clone(),
                call_set_name: cs.name.clone(),
                genotype: vec![rng.gen_range(0..2), rng.gen_range(0..2)],
            })
            .collect();
        Variant {
            id: format!("{}:{}:{}", self.id, reference_name, position),
            variant_set_id: self.id.clone(),
            names: Vec::new(),
            reference_name: reference_name.to_string(),
            start: position,
            end: position + 1,
            reference_bases: reference_bases.to_string(),
            alternate_bases,
            calls,
        }
    }
}

impl VariantStore for SimulatedVariantStore {
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
        let mut variants = Vec::new();
        for position in start..end {
            let mut rng = coordinate_rng(self.seed, position);
            if rng.gen_range(0.0..1.0) < self.density {
                variants.push(self.variant_at(reference_name, position, &mut rng));
            }
        }
        Ok(Box::new(variants.into_iter().map(Ok)))
    }
}

/// Simulated read group: a pair of reads every `SPACING` coordinates.
///
/// The two mates share a start coordinate (a tie run for the paginator) and
/// reads overlapping the query range are reported even when they start before
/// it, like an indexed BAM query would.
pub struct SimulatedReadStore {
    id: String,
    seed: u64,
}

const READ_LENGTH: u64 = 100;
const SPACING: u64 = 37;

impl SimulatedReadStore {
    pub fn new(id: impl Into<String>, seed: u64) -> Self {
        Self {
            id: id.into(),
            seed,
        }
    }

    fn read_at(&self, reference_name: &str, position: u64, mate: u64) -> ReadAlignment {
        let mut rng = coordinate_rng(self.seed.wrapping_add(mate), position);
        let aligned_sequence: String = (0..READ_LENGTH)
            .map(|_| BASES[rng.gen_range(0..BASES.len())])
            .collect();
        ReadAlignment {
            id: format!("{}:{}:{}/{}", self.id, reference_name, position, mate + 1),
            read_group_id: self.id.clone(),
            fragment_name: format!("{}:{}:{}", self.id, reference_name, position),
            position: LinearPosition {
                reference_name: reference_name.to_string(),
                position,
            },
            aligned_sequence,
        }
    }
}

impl ReadStore for SimulatedReadStore {
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
        // First template whose reads can still overlap the range start.
        let first = start.saturating_sub(READ_LENGTH - 1).div_ceil(SPACING) * SPACING;
        let mut reads = Vec::new();
        let mut position = first;
        while position < end {
            if position + READ_LENGTH > start {
                reads.push(self.read_at(reference_name, position, 0));
                reads.push(self.read_at(reference_name, position, 1));
            }
            position += SPACING;
        }
        Ok(Box::new(reads.into_iter().map(Ok)))
    }
}
