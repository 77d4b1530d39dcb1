//! Explainability for related-content results
//!
//! Output structures that say where each related record came from and, for
//! automatic results, which taxonomies and fields produced its weight.

use crate::weigh::{Contribution, ScoredCandidate};
use relata_core::{Identify, Record, RecordId, Target};
use serde::Serialize;
use std::collections::BTreeMap;

/// How a related record was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Manual,
    Automatic,
}

/// A related record with its provenance
#[derive(Debug, Clone, Serialize)]
pub struct RelatedEntry {
    pub record: Record,
    pub origin: Origin,
    /// Weight of an automatic result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<u64>,
    /// Weight per `taxonomy:<slug>` / `field:<slug>`
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub explain: BTreeMap<String, u64>,
}

impl RelatedEntry {
    pub fn manual(record: Record) -> Self {
        Self {
            record,
            origin: Origin::Manual,
            weight: None,
            explain: BTreeMap::new(),
        }
    }

    pub fn automatic(scored: ScoredCandidate) -> Self {
        Self {
            record: scored.record,
            origin: Origin::Automatic,
            weight: Some(scored.weight),
            explain: explain_contributions(&scored.contributions),
        }
    }
}

impl Identify for RelatedEntry {
    fn record_id(&self) -> &RecordId {
        &self.record.id
    }
}

fn explain_contributions(contributions: &[Contribution]) -> BTreeMap<String, u64> {
    contributions
        .iter()
        .map(|c| {
            let prefix = match c.target {
                Target::Taxonomy => "taxonomy",
                Target::Field => "field",
            };
            (format!("{}:{}", prefix, c.slug), c.weight)
        })
        .collect()
}

/// Response body for related-content requests
#[derive(Debug, Clone, Serialize)]
pub struct RelatedResponse {
    pub result: Vec<RelatedEntry>,
    pub stats: RelatedStats,
}

impl RelatedResponse {
    pub fn new(result: Vec<RelatedEntry>) -> Self {
        let stats = RelatedStats::compute(&result);
        Self { result, stats }
    }
}

/// Summary of a related-content result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelatedStats {
    pub manual_count: usize,
    pub automatic_count: usize,
    pub best_weight: Option<u64>,
    /// Taxonomy or field that contributed most to the best automatic result
    pub top_contributing: Option<String>,
}

impl RelatedStats {
    pub fn compute(entries: &[RelatedEntry]) -> Self {
        let manual_count = entries.iter().filter(|e| e.origin == Origin::Manual).count();
        let automatic_count = entries.len() - manual_count;

        // Automatic entries are ranked, so the first one carries the best weight
        let best = entries.iter().find(|e| e.origin == Origin::Automatic);
        let best_weight = best.and_then(|e| e.weight);
        let top_contributing = best.and_then(|e| {
            e.explain
                .iter()
                .max_by_key(|(_, weight)| **weight)
                .map(|(name, _)| name.clone())
        });

        Self {
            manual_count,
            automatic_count,
            best_weight,
            top_contributing,
        }
    }
}
