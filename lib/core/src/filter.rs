// Structured candidate filter: a conjunction of clause groups, each a
// disjunction of literal conditions on one taxonomy or field slug.
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use crate::{Record, Status};

pub trait Filter {
    fn matches(&self, record: &Record) -> bool;
}

/// What a clause group's slug refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Taxonomy,
    Field,
}

/// A single match condition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Literal {
    /// Value equality
    Exact { value: Value },
    /// Substring match
    Like { pattern: String },
}

impl Literal {
    pub fn exact(value: impl Into<Value>) -> Self {
        Literal::Exact { value: value.into() }
    }

    pub fn like(pattern: impl Into<String>) -> Self {
        Literal::Like { pattern: pattern.into() }
    }

    fn matches_value(&self, candidate: &Value) -> bool {
        let direct = match self {
            Literal::Exact { value } => {
                candidate == value || value_text(candidate) == value_text(value)
            }
            Literal::Like { pattern } => value_text(candidate).contains(pattern.as_str()),
        };

        direct
            || match candidate {
                Value::Array(items) => items.iter().any(|item| self.matches_value(item)),
                _ => false,
            }
    }

    fn matches_term(&self, term: &str) -> bool {
        match self {
            Literal::Exact { value } => value_text(value) == term,
            Literal::Like { pattern } => term.contains(pattern.as_str()),
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Exact { value } => write!(f, "{}", value_text(value)),
            Literal::Like { pattern } => write!(f, "%{}%", pattern),
        }
    }
}

/// Disjunction of literals on one slug
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClauseGroup {
    pub target: Target,
    pub slug: String,
    pub alternatives: Vec<Literal>,
}

impl ClauseGroup {
    pub fn new(target: Target, slug: impl Into<String>, alternatives: Vec<Literal>) -> Self {
        Self {
            target,
            slug: slug.into(),
            alternatives,
        }
    }

    pub fn taxonomy(slug: impl Into<String>, alternatives: Vec<Literal>) -> Self {
        Self::new(Target::Taxonomy, slug, alternatives)
    }

    pub fn field(slug: impl Into<String>, alternatives: Vec<Literal>) -> Self {
        Self::new(Target::Field, slug, alternatives)
    }
}

impl Filter for ClauseGroup {
    fn matches(&self, record: &Record) -> bool {
        match self.target {
            Target::Taxonomy => record.terms(&self.slug).iter().any(|term| {
                self.alternatives.iter().any(|literal| literal.matches_term(term))
            }),
            Target::Field => record
                .field(&self.slug)
                .map(|value| self.alternatives.iter().any(|literal| literal.matches_value(value)))
                .unwrap_or(false),
        }
    }
}

/// Conjunction of clause groups plus a required status
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterExpression {
    pub groups: Vec<ClauseGroup>,
    pub status: Status,
}

impl Default for FilterExpression {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterExpression {
    /// An expression that only requires `status = published`
    pub fn new() -> Self {
        Self {
            groups: Vec::new(),
            status: Status::Published,
        }
    }

    pub fn push(&mut self, group: ClauseGroup) {
        self.groups.push(group);
    }

    /// True when there are no clause groups, i.e. nothing to match on
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Slugs joined with ` ||| `
    pub fn key_clause(&self) -> String {
        self.groups
            .iter()
            .map(|g| g.slug.as_str())
            .collect::<Vec<_>>()
            .join(" ||| ")
    }

    /// Alternatives joined with ` || `, groups with ` ||| `
    pub fn value_clause(&self) -> String {
        self.groups
            .iter()
            .map(|g| {
                g.alternatives
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" || ")
            })
            .collect::<Vec<_>>()
            .join(" ||| ")
    }
}

impl Filter for FilterExpression {
    fn matches(&self, record: &Record) -> bool {
        record.status == self.status && self.groups.iter().all(|g| g.matches(record))
    }
}

impl fmt::Display for FilterExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = serde_json::to_value(self.status)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();

        if self.is_empty() {
            write!(f, "status = {}", status)
        } else {
            write!(
                f,
                "{} = {}; status = {}",
                self.key_clause(),
                self.value_clause(),
                status
            )
        }
    }
}

/// Which content types a candidate query runs against
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContentTypeSelector {
    Single(String),
    Union(Vec<String>),
}

impl ContentTypeSelector {
    /// `None` when no content type is given.
    pub fn from_names(mut names: Vec<String>) -> Option<Self> {
        match names.len() {
            0 => None,
            1 => names.pop().map(ContentTypeSelector::Single),
            _ => Some(ContentTypeSelector::Union(names)),
        }
    }

    pub fn contains(&self, contenttype: &str) -> bool {
        match self {
            ContentTypeSelector::Single(name) => name == contenttype,
            ContentTypeSelector::Union(names) => names.iter().any(|n| n == contenttype),
        }
    }

    pub fn names(&self) -> Vec<&str> {
        match self {
            ContentTypeSelector::Single(name) => vec![name.as_str()],
            ContentTypeSelector::Union(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

impl fmt::Display for ContentTypeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentTypeSelector::Single(name) => write!(f, "{}", name),
            ContentTypeSelector::Union(names) => write!(f, "({})", names.join(",")),
        }
    }
}

fn value_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        other => Cow::Owned(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn news_record() -> Record {
        Record::new("entries", 1)
            .with_terms("categories", ["news", "local"])
            .with_field("author", json!(5))
            .with_field("related", json!("[\"pages/1\",\"pages/2\"]"))
    }

    #[test]
    fn test_taxonomy_group() {
        let record = news_record();
        let hit = ClauseGroup::taxonomy("categories", vec![Literal::exact("sports"), Literal::exact("news")]);
        let miss = ClauseGroup::taxonomy("categories", vec![Literal::exact("sports")]);
        let other = ClauseGroup::taxonomy("tags", vec![Literal::exact("news")]);

        assert!(hit.matches(&record));
        assert!(!miss.matches(&record));
        assert!(!other.matches(&record));
    }

    #[test]
    fn test_field_group_exact_is_loose_on_scalars() {
        let record = news_record();
        assert!(ClauseGroup::field("author", vec![Literal::exact(5)]).matches(&record));
        assert!(ClauseGroup::field("author", vec![Literal::exact("5")]).matches(&record));
        assert!(!ClauseGroup::field("author", vec![Literal::exact(6)]).matches(&record));
        assert!(!ClauseGroup::field("missing", vec![Literal::exact(5)]).matches(&record));
    }

    #[test]
    fn test_field_group_like() {
        let record = news_record();
        assert!(ClauseGroup::field("related", vec![Literal::like("pages/2")]).matches(&record));
        assert!(!ClauseGroup::field("related", vec![Literal::like("pages/3")]).matches(&record));
    }

    #[test]
    fn test_field_group_array_value() {
        let record = Record::new("pages", 2).with_field("tags", json!(["a", "b"]));
        assert!(ClauseGroup::field("tags", vec![Literal::exact("b")]).matches(&record));
        assert!(!ClauseGroup::field("tags", vec![Literal::exact("c")]).matches(&record));
    }

    #[test]
    fn test_expression_is_conjunction_with_status() {
        let mut filter = FilterExpression::new();
        filter.push(ClauseGroup::taxonomy("categories", vec![Literal::exact("news")]));
        filter.push(ClauseGroup::field("author", vec![Literal::exact(5)]));

        let record = news_record();
        assert!(filter.matches(&record));

        let draft = news_record().with_status(Status::Draft);
        assert!(!filter.matches(&draft));

        let other_author = news_record().with_field("author", json!(9));
        assert!(!filter.matches(&other_author));
    }

    #[test]
    fn test_expression_rendering() {
        let mut filter = FilterExpression::new();
        assert_eq!(filter.to_string(), "status = published");

        filter.push(ClauseGroup::taxonomy(
            "categories",
            vec![Literal::exact("news"), Literal::exact("local")],
        ));
        filter.push(ClauseGroup::field("related", vec![Literal::like("pages/1")]));

        assert_eq!(filter.key_clause(), "categories ||| related");
        assert_eq!(filter.value_clause(), "news || local ||| %pages/1%");
        assert_eq!(
            filter.to_string(),
            "categories ||| related = news || local ||| %pages/1%; status = published"
        );
    }

    #[test]
    fn test_selector() {
        assert_eq!(ContentTypeSelector::from_names(vec![]), None);

        let single = ContentTypeSelector::from_names(vec!["pages".into()]).unwrap();
        assert_eq!(single, ContentTypeSelector::Single("pages".into()));
        assert_eq!(single.to_string(), "pages");

        let union = ContentTypeSelector::from_names(vec!["entries".into(), "pages".into()]).unwrap();
        assert_eq!(union.to_string(), "(entries,pages)");
        assert!(union.contains("pages"));
        assert!(!union.contains("people"));
        assert_eq!(union.names(), vec!["entries", "pages"]);
    }
}
