//! Weighting engine
//!
//! Scores automatic candidates against the current record:
//!
//! ```text
//! weight = Σ |shared terms(taxonomy)| × searchweight(taxonomy)
//!        + Σ searchweight(contenttype, field)   for every equal field
//! ```
//!
//! Terms are compared namespaced as `/taxonomy/term`. A field only counts
//! when both its declared type and its value are equal; there is no partial
//! credit.

use crate::allowed::{AllowedFieldSet, AllowedTaxonomySet};
use ahash::AHashSet;
use relata_core::{Record, Schema, Target};
use serde::Serialize;

/// What one taxonomy or field added to a candidate's weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Contribution {
    pub target: Target,
    pub slug: String,
    /// Shared terms for a taxonomy, 1 for a matching field
    pub matches: usize,
    pub weight: u64,
}

/// A candidate with its weight
#[derive(Debug, Clone)]
pub struct ScoredCandidate {
    pub record: Record,
    pub weight: u64,
    pub contributions: Vec<Contribution>,
}

struct TaxonomyTerms {
    slug: String,
    weight: u64,
    terms: AHashSet<String>,
}

/// Scores candidates against one current record
pub struct Weigher<'a> {
    schema: &'a Schema,
    taxonomies: Vec<TaxonomyTerms>,
    fields: &'a AllowedFieldSet,
}

impl<'a> Weigher<'a> {
    pub fn new(
        schema: &'a Schema,
        taxonomies: &AllowedTaxonomySet,
        fields: &'a AllowedFieldSet,
    ) -> Self {
        let taxonomies = taxonomies
            .iter()
            .map(|(slug, terms)| TaxonomyTerms {
                slug: slug.to_string(),
                weight: schema.taxonomy_weight(slug),
                terms: terms.iter().map(|t| namespaced(slug, t)).collect(),
            })
            .collect();

        Self {
            schema,
            taxonomies,
            fields,
        }
    }

    /// Weight from shared taxonomy terms
    pub fn taxonomy_weight(&self, candidate: &Record) -> (u64, Vec<Contribution>) {
        let mut total = 0u64;
        let mut contributions = Vec::new();

        for taxonomy in &self.taxonomies {
            let candidate_terms: AHashSet<String> = candidate
                .terms(&taxonomy.slug)
                .iter()
                .map(|t| namespaced(&taxonomy.slug, t))
                .collect();

            let shared = taxonomy.terms.intersection(&candidate_terms).count();
            if shared == 0 {
                continue;
            }

            let weight = (shared as u64).saturating_mul(taxonomy.weight);
            total = total.saturating_add(weight);
            contributions.push(Contribution {
                target: Target::Taxonomy,
                slug: taxonomy.slug.clone(),
                matches: shared,
                weight,
            });
        }

        (total, contributions)
    }

    /// Weight from fields equal in type and value
    pub fn field_weight(&self, candidate: &Record) -> (u64, Vec<Contribution>) {
        let mut total = 0u64;
        let mut contributions = Vec::new();
        let contenttype = candidate.content_type();

        for (slug, allowed) in self.fields.iter() {
            let Some(value) = candidate.field(slug) else {
                continue;
            };
            if self.schema.field_type(contenttype, slug) != Some(allowed.field_type.as_str()) {
                continue;
            }
            if *value != allowed.value {
                continue;
            }

            let weight = self.schema.field_weight(contenttype, slug);
            total = total.saturating_add(weight);
            contributions.push(Contribution {
                target: Target::Field,
                slug: slug.to_string(),
                matches: 1,
                weight,
            });
        }

        (total, contributions)
    }

    pub fn weigh(&self, candidate: Record) -> ScoredCandidate {
        let (taxonomy_weight, mut contributions) = self.taxonomy_weight(&candidate);
        let (field_weight, field_contributions) = self.field_weight(&candidate);
        contributions.extend(field_contributions);

        ScoredCandidate {
            record: candidate,
            weight: taxonomy_weight.saturating_add(field_weight),
            contributions,
        }
    }

    /// Weigh all candidates and order them by descending weight.
    /// Equal weights keep the fetch order.
    pub fn rank(&self, candidates: Vec<Record>) -> Vec<ScoredCandidate> {
        let mut scored: Vec<ScoredCandidate> =
            candidates.into_iter().map(|c| self.weigh(c)).collect();

        scored.sort_by(|a, b| b.weight.cmp(&a.weight));
        scored
    }
}

/// Drop the weights, keeping the ranked order.
pub fn flatten(scored: Vec<ScoredCandidate>) -> Vec<Record> {
    scored.into_iter().map(|s| s.record).collect()
}

fn namespaced(taxonomy: &str, term: &str) -> String {
    format!("/{}/{}", taxonomy, term)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TaxonomyScope;
    use relata_core::{ContentTypeDef, FieldDef, TaxonomyDef};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .with_contenttype(
                "entries",
                ContentTypeDef::new("Entries")
                    .with_field("author", FieldDef::new("select").with_searchweight(30))
                    .with_field("kind", FieldDef::new("text")),
            )
            .with_contenttype(
                "pages",
                ContentTypeDef::new("Pages").with_field("author", FieldDef::new("text")),
            )
            .with_taxonomy("categories", TaxonomyDef::new("Categories"))
            .with_taxonomy("tags", TaxonomyDef::new("Tags").with_searchweight(20))
    }

    fn current() -> Record {
        Record::new("entries", 1)
            .with_terms("categories", ["news"])
            .with_terms("tags", ["rust", "cms", "web"])
            .with_field("author", json!(5))
            .with_field("kind", json!("post"))
    }

    fn with_weigher<R>(f: impl FnOnce(&Weigher) -> R) -> R {
        let schema = schema();
        let record = current();
        let taxonomies = AllowedTaxonomySet::resolve(&record, &schema, &TaxonomyScope::All);
        let fields = AllowedFieldSet::resolve(
            &record,
            &schema,
            &["author".to_string(), "kind".to_string()],
        );
        let weigher = Weigher::new(&schema, &taxonomies, &fields);
        f(&weigher)
    }

    #[test]
    fn test_taxonomy_overlap_times_weight() {
        with_weigher(|w| {
            let candidate = Record::new("entries", 2)
                .with_terms("categories", ["news", "sports"])
                .with_terms("tags", ["rust", "web", "go"]);

            let (weight, contributions) = w.taxonomy_weight(&candidate);
            assert_eq!(weight, 50 + 2 * 20);
            assert_eq!(contributions.len(), 2);
            assert_eq!(contributions[1].matches, 2);
        });
    }

    #[test]
    fn test_terms_compared_per_taxonomy() {
        with_weigher(|w| {
            // "news" as a tag is not the "news" category
            let candidate = Record::new("entries", 2).with_terms("tags", ["news"]);
            assert_eq!(w.taxonomy_weight(&candidate).0, 0);
        });
    }

    #[test]
    fn test_field_match_requires_type_and_value() {
        with_weigher(|w| {
            let same = Record::new("entries", 2).with_field("author", json!(5));
            assert_eq!(w.field_weight(&same).0, 30);

            let other_value = Record::new("entries", 3).with_field("author", json!(6));
            assert_eq!(w.field_weight(&other_value).0, 0);

            let loose_value = Record::new("entries", 4).with_field("author", json!("5"));
            assert_eq!(w.field_weight(&loose_value).0, 0);

            // pages declare author as text, not select
            let other_type = Record::new("pages", 5).with_field("author", json!(5));
            assert_eq!(w.field_weight(&other_type).0, 0);
        });
    }

    #[test]
    fn test_total_is_sum() {
        with_weigher(|w| {
            let candidate = Record::new("entries", 2)
                .with_terms("categories", ["news"])
                .with_terms("tags", ["cms"])
                .with_field("author", json!(5))
                .with_field("kind", json!("post"));

            let scored = w.weigh(candidate);
            assert_eq!(scored.weight, 50 + 20 + 30 + 50);
            assert_eq!(scored.contributions.len(), 4);
        });
    }

    #[test]
    fn test_one_more_match_adds_exactly_its_weight() {
        with_weigher(|w| {
            let base = Record::new("entries", 2).with_terms("tags", ["rust"]);
            let more_terms = Record::new("entries", 2).with_terms("tags", ["rust", "cms"]);
            let more_fields = base.clone().with_field("kind", json!("post"));

            let base_weight = w.weigh(base).weight;
            assert_eq!(w.weigh(more_terms).weight, base_weight + 20);
            assert_eq!(w.weigh(more_fields).weight, base_weight + 50);
        });
    }

    #[test]
    fn test_identical_candidate_scores_highest() {
        with_weigher(|w| {
            let twin = Record { id: relata_core::RecordId::new("entries", 9), ..current() };
            let partial = Record::new("entries", 3)
                .with_terms("tags", ["rust", "cms", "web"])
                .with_field("author", json!(5));

            let twin_weight = w.weigh(twin).weight;
            assert_eq!(twin_weight, 50 + 3 * 20 + 30 + 50);
            assert!(twin_weight > w.weigh(partial).weight);
        });
    }

    #[test]
    fn test_rank_is_stable_and_keeps_zero_weight() {
        with_weigher(|w| {
            let candidates = vec![
                Record::new("entries", 10),
                Record::new("entries", 11).with_terms("tags", ["rust"]),
                Record::new("entries", 12).with_terms("categories", ["news"]),
                Record::new("entries", 13).with_terms("tags", ["cms"]),
                Record::new("entries", 14),
            ];

            let ranked = w.rank(candidates);
            let order: Vec<(u64, u64)> = ranked.iter().map(|s| (s.record.id.id, s.weight)).collect();
            assert_eq!(order, vec![(12, 50), (11, 20), (13, 20), (10, 0), (14, 0)]);

            let flat = flatten(ranked);
            assert_eq!(flat.len(), 5);
            assert_eq!(flat[0].key(), "entries/12");
        });
    }
}
