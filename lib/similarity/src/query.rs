//! Candidate query construction
//!
//! Turns the allowed taxonomies and fields of the current record into a
//! [`FilterExpression`] and pairs it with the content-type selector. No
//! clause groups means there is no basis for similarity and no query.

use crate::allowed::{AllowedFieldSet, AllowedTaxonomySet};
use relata_core::{ClauseGroup, ContentTypeSelector, FilterExpression, Literal};
use serde_json::Value;
use tracing::warn;

/// Field types whose value is a serialized list of `contenttype/id` queries
pub const RELATION_LIST_TYPES: &[&str] = &["relationlist", "json"];

pub fn is_relation_list_type(field_type: &str) -> bool {
    RELATION_LIST_TYPES.contains(&field_type)
}

/// Selector and filter for one candidate fetch
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateQuery {
    pub selector: ContentTypeSelector,
    pub filter: FilterExpression,
}

/// Build the filter: taxonomy groups first, then field groups.
pub fn build_filter(taxonomies: &AllowedTaxonomySet, fields: &AllowedFieldSet) -> FilterExpression {
    let mut filter = FilterExpression::new();

    for (slug, terms) in taxonomies.iter() {
        if terms.is_empty() {
            continue;
        }
        let alternatives = terms.iter().map(|t| Literal::exact(t.as_str())).collect();
        filter.push(ClauseGroup::taxonomy(slug, alternatives));
    }

    for (slug, field) in fields.iter() {
        let alternatives: Vec<Literal> = if is_relation_list_type(&field.field_type) {
            match decode_relation_list(&field.value) {
                Some(entries) => entries.into_iter().map(Literal::like).collect(),
                None => {
                    warn!(field = slug, "relation list value could not be decoded");
                    continue;
                }
            }
        } else {
            vec![Literal::exact(field.value.clone())]
        };

        if !alternatives.is_empty() {
            filter.push(ClauseGroup::field(slug, alternatives));
        }
    }

    filter
}

/// The candidate query, or `None` when there is nothing to match on or no
/// content type to search.
pub fn build_candidate_query(
    contenttypes: Vec<String>,
    taxonomies: &AllowedTaxonomySet,
    fields: &AllowedFieldSet,
) -> Option<CandidateQuery> {
    let filter = build_filter(taxonomies, fields);
    if filter.is_empty() {
        return None;
    }

    let selector = ContentTypeSelector::from_names(contenttypes)?;
    Some(CandidateQuery { selector, filter })
}

/// Decode a relation list: a JSON array of strings, or a string holding one.
///
/// Returns `None` for anything that is not a list.
pub fn decode_relation_list(value: &Value) -> Option<Vec<String>> {
    let decoded;
    let items = match value {
        Value::Array(items) => items,
        Value::String(raw) => {
            decoded = serde_json::from_str::<Value>(raw).ok()?;
            decoded.as_array()?
        }
        _ => return None,
    };

    Some(
        items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::TaxonomyScope;
    use relata_core::{ContentTypeDef, FieldDef, Filter, Record, Schema, TaxonomyDef, Target};
    use serde_json::json;

    fn schema() -> Schema {
        Schema::new()
            .with_contenttype(
                "entries",
                ContentTypeDef::new("Entries")
                    .with_field("author", FieldDef::new("select"))
                    .with_field("related", FieldDef::new("relationlist"))
                    .with_field("sources", FieldDef::new("json")),
            )
            .with_taxonomy("categories", TaxonomyDef::new("Categories"))
            .with_taxonomy("tags", TaxonomyDef::new("Tags"))
    }

    fn allowed(record: &Record, fields: &[&str]) -> (AllowedTaxonomySet, AllowedFieldSet) {
        let schema = schema();
        let fields: Vec<String> = fields.iter().map(|f| f.to_string()).collect();
        (
            AllowedTaxonomySet::resolve(record, &schema, &TaxonomyScope::All),
            AllowedFieldSet::resolve(record, &schema, &fields),
        )
    }

    #[test]
    fn test_taxonomy_and_field_groups() {
        let record = Record::new("entries", 1)
            .with_terms("categories", ["news", "local"])
            .with_terms("tags", ["rust"])
            .with_field("author", json!(5));
        let (taxonomies, fields) = allowed(&record, &["author"]);

        let filter = build_filter(&taxonomies, &fields);
        assert_eq!(filter.groups.len(), 3);
        assert_eq!(filter.groups[0].target, Target::Taxonomy);
        assert_eq!(filter.groups[0].slug, "categories");
        assert_eq!(
            filter.groups[0].alternatives,
            vec![Literal::exact("news"), Literal::exact("local")]
        );
        assert_eq!(filter.groups[2].target, Target::Field);
        assert_eq!(filter.groups[2].alternatives, vec![Literal::exact(5)]);
        assert_eq!(filter.key_clause(), "categories ||| tags ||| author");
        assert_eq!(filter.value_clause(), "news || local ||| rust ||| 5");
    }

    #[test]
    fn test_relation_list_becomes_wildcards() {
        let record = Record::new("entries", 1)
            .with_field("related", json!("[\"pages/1\",\"pages/2\"]"));
        let (taxonomies, fields) = allowed(&record, &["related"]);

        let filter = build_filter(&taxonomies, &fields);
        assert_eq!(filter.groups.len(), 1);
        assert_eq!(
            filter.groups[0].alternatives,
            vec![Literal::like("pages/1"), Literal::like("pages/2")]
        );
        assert_eq!(filter.value_clause(), "%pages/1% || %pages/2%");
    }

    #[test]
    fn test_json_field_becomes_wildcards() {
        let record = Record::new("entries", 1)
            .with_field("sources", json!("[\"pages/4\",\"entries/9\"]"));
        let (taxonomies, fields) = allowed(&record, &["sources"]);

        let filter = build_filter(&taxonomies, &fields);
        assert_eq!(filter.groups.len(), 1);
        assert_eq!(filter.groups[0].target, Target::Field);
        assert_eq!(filter.groups[0].slug, "sources");
        assert_eq!(
            filter.groups[0].alternatives,
            vec![Literal::like("pages/4"), Literal::like("entries/9")]
        );
        assert_eq!(filter.to_string(), "sources = %pages/4% || %entries/9%; status = published");

        let sharing = Record::new("entries", 2).with_field("sources", json!("[\"entries/9\"]"));
        let disjoint = Record::new("entries", 3).with_field("sources", json!("[\"pages/5\"]"));
        assert!(filter.matches(&sharing));
        assert!(!filter.matches(&disjoint));
    }

    #[test]
    fn test_malformed_relation_list_is_skipped() {
        let record = Record::new("entries", 1).with_field("related", json!("not json"));
        let (taxonomies, fields) = allowed(&record, &["related"]);
        assert!(build_filter(&taxonomies, &fields).is_empty());
    }

    #[test]
    fn test_no_groups_means_no_query() {
        let record = Record::new("entries", 1);
        let (taxonomies, fields) = allowed(&record, &[]);
        assert_eq!(
            build_candidate_query(vec!["entries".into()], &taxonomies, &fields),
            None
        );
    }

    #[test]
    fn test_selector_shape() {
        let record = Record::new("entries", 1).with_terms("tags", ["rust"]);
        let (taxonomies, fields) = allowed(&record, &[]);

        let single = build_candidate_query(vec!["entries".into()], &taxonomies, &fields).unwrap();
        assert_eq!(single.selector, ContentTypeSelector::Single("entries".into()));

        let union =
            build_candidate_query(vec!["entries".into(), "pages".into()], &taxonomies, &fields)
                .unwrap();
        assert_eq!(union.selector.to_string(), "(entries,pages)");

        assert_eq!(build_candidate_query(vec![], &taxonomies, &fields), None);
    }

    #[test]
    fn test_decode_relation_list() {
        assert_eq!(
            decode_relation_list(&json!("[\"pages/1\", \" entries/4 \"]")),
            Some(vec!["pages/1".to_string(), "entries/4".to_string()])
        );
        assert_eq!(
            decode_relation_list(&json!(["pages/3"])),
            Some(vec!["pages/3".to_string()])
        );
        assert_eq!(decode_relation_list(&json!("{\"a\":1}")), None);
        assert_eq!(decode_relation_list(&json!(12)), None);
    }
}
