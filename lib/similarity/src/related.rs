//! Related-content orchestration
//!
//! One call handles one source record:
//!
//! ```text
//! settings -> manual relations -> (if short of limit) automatic candidates
//!          -> merge / dedupe -> exclude current -> truncate
//! ```
//!
//! The automatic branch builds the allowed taxonomy and field sets, turns
//! them into a candidate query, weighs the fetched candidates and orders
//! them. It is skipped entirely when the manual relations already fill the
//! limit. Nothing is kept between calls.

use crate::allowed::{allowed_contenttypes, AllowedFieldSet, AllowedTaxonomySet};
use crate::assemble::assemble;
use crate::explain::RelatedEntry;
use crate::manual::ManualFieldSpec;
use crate::query::build_candidate_query;
use crate::settings::Settings;
use crate::weigh::{ScoredCandidate, Weigher};
use relata_core::{ConfigProvider, Options, QueryService, Record, Schema};
use tracing::{debug, warn};

/// Entry point for related-content lookups
pub struct RelatedContent<'a> {
    query: &'a dyn QueryService,
    config: &'a dyn ConfigProvider,
    schema: &'a Schema,
}

impl<'a> RelatedContent<'a> {
    pub fn new(
        query: &'a dyn QueryService,
        config: &'a dyn ConfigProvider,
        schema: &'a Schema,
    ) -> Self {
        Self {
            query,
            config,
            schema,
        }
    }

    /// Records related to `record`, manual relations first, then automatic
    /// ones by descending weight.
    pub fn related(&self, record: &Record, options: &Options) -> Vec<Record> {
        self.related_explained(record, options)
            .into_iter()
            .map(|entry| entry.record)
            .collect()
    }

    /// Same as [`related`](Self::related), keeping each entry's origin and,
    /// for automatic entries, its weight breakdown.
    pub fn related_explained(&self, record: &Record, options: &Options) -> Vec<RelatedEntry> {
        let settings = Settings::resolve(self.config, options);

        let manual: Vec<RelatedEntry> = self
            .manual(record, &settings)
            .into_iter()
            .map(RelatedEntry::manual)
            .collect();
        // Only distinct links other than the record itself count toward the limit
        let manual = assemble(manual, Vec::new(), &record.id, usize::MAX);

        let auto: Vec<RelatedEntry> = if manual.len() < settings.limit {
            self.automatic(record, &settings)
                .into_iter()
                .map(RelatedEntry::automatic)
                .collect()
        } else {
            debug!(
                record = %record.id,
                manual = manual.len(),
                limit = settings.limit,
                "manual relations fill the limit, skipping automatic lookup"
            );
            Vec::new()
        };

        let manual_count = manual.len();
        let auto_count = auto.len();
        let results = assemble(manual, auto, &record.id, settings.limit);

        debug!(
            record = %record.id,
            manual = manual_count,
            automatic = auto_count,
            returned = results.len(),
            "related content assembled"
        );

        results
    }

    fn manual(&self, record: &Record, settings: &Settings) -> Vec<Record> {
        match ManualFieldSpec::from_settings(settings, record, self.schema) {
            Some(spec) => spec.resolve(record, self.query),
            None => Vec::new(),
        }
    }

    fn automatic(&self, record: &Record, settings: &Settings) -> Vec<ScoredCandidate> {
        let contenttypes = allowed_contenttypes(self.schema, settings);
        let taxonomies = AllowedTaxonomySet::resolve(record, self.schema, &settings.taxonomies);
        let fields = AllowedFieldSet::resolve(record, self.schema, &settings.fields);

        let Some(query) = build_candidate_query(contenttypes, &taxonomies, &fields) else {
            debug!(record = %record.id, "nothing to compare, skipping candidate fetch");
            return Vec::new();
        };

        debug!(
            record = %record.id,
            selector = %query.selector,
            filter = %query.filter,
            "fetching related candidates"
        );

        let candidates = match self.query.content_by_selector(&query.selector, &query.filter) {
            Ok(candidates) => candidates,
            Err(e) => {
                warn!(record = %record.id, error = %e, "candidate fetch failed");
                return Vec::new();
            }
        };

        Weigher::new(self.schema, &taxonomies, &fields).rank(candidates)
    }
}
