use std::collections::HashMap;

use mongodb::bson::{doc, oid::ObjectId, Bson, Document};

use crate::id::IssueRef;

const TEXT_FIELDS: [&str; 5] = [
    "issue_title",
    "issue_text",
    "created_by",
    "assigned_to",
    "status_text",
];

#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    Text(String),
    Flag(bool),
    Id(ObjectId),
}

impl From<Predicate> for Bson {
    fn from(value: Predicate) -> Self {
        match value {
            Predicate::Text(text) => Bson::String(text),
            Predicate::Flag(flag) => Bson::Boolean(flag),
            Predicate::Id(id) => Bson::ObjectId(id),
        }
    }
}

/// Equality filter over the fields a client may query on.
///
/// Unknown query keys are dropped. A value that does not fit its field's
/// type makes the whole filter unsatisfiable.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueFilter {
    project: String,
    predicates: Vec<(&'static str, Predicate)>,
    unsatisfiable: bool,
}

impl IssueFilter {
    pub fn new(project: String) -> Self {
        Self {
            project,
            predicates: Vec::new(),
            unsatisfiable: false,
        }
    }

    pub fn from_query(project: String, query: &HashMap<String, String>) -> Self {
        let mut filter = Self::new(project);
        for (key, value) in query {
            filter.push(key, value);
        }
        filter
    }

    fn push(&mut self, key: &str, value: &str) {
        let predicate = if let Some(field) = TEXT_FIELDS.iter().find(|f| **f == key) {
            Some((*field, Some(Predicate::Text(value.to_string()))))
        } else {
            match key {
                "open" => Some(("open", value.parse::<bool>().ok().map(Predicate::Flag))),
                "_id" => match IssueRef::parse(Some(value)) {
                    IssueRef::Valid { id, .. } => Some(("_id", Some(Predicate::Id(id)))),
                    _ => Some(("_id", None)),
                },
                _ => None,
            }
        };

        match predicate {
            Some((field, Some(predicate))) => self.predicates.push((field, predicate)),
            Some((field, None)) => {
                log::debug!("Filter value {:?} does not fit field {}", value, field);
                self.unsatisfiable = true;
            }
            None => (),
        }
    }

    /// `None` when no document can match.
    pub fn to_document(&self) -> Option<Document> {
        if self.unsatisfiable {
            return None;
        }

        let mut filter = doc! { "project": self.project.clone() };
        for (field, predicate) in &self.predicates {
            filter.insert(*field, Bson::from(predicate.clone()));
        }
        Some(filter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn project_is_always_scoped() {
        let filter = IssueFilter::from_query("apitest".to_string(), &HashMap::new());
        assert_eq!(filter.to_document(), Some(doc! { "project": "apitest" }));
    }

    #[test]
    fn typed_predicates_are_combined() {
        let filter = IssueFilter::from_query(
            "apitest".to_string(),
            &query(&[("open", "true"), ("status_text", "Test")]),
        );
        let document = filter.to_document().unwrap();
        assert_eq!(document.get_str("project").unwrap(), "apitest");
        assert!(document.get_bool("open").unwrap());
        assert_eq!(document.get_str("status_text").unwrap(), "Test");
        assert_eq!(document.len(), 3);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let filter = IssueFilter::from_query(
            "apitest".to_string(),
            &query(&[
                ("vscodeBrowserReqId", "1700000000000"),
                ("project", "other"),
                ("$where", "1"),
            ]),
        );
        assert_eq!(filter.to_document(), Some(doc! { "project": "apitest" }));
    }

    #[test]
    fn ill_typed_values_match_nothing() {
        let filter =
            IssueFilter::from_query("apitest".to_string(), &query(&[("open", "maybe")]));
        assert_eq!(filter.to_document(), None);

        let filter = IssueFilter::from_query("apitest".to_string(), &query(&[("_id", "123")]));
        assert_eq!(filter.to_document(), None);
    }

    #[test]
    fn id_filter_uses_object_id() {
        let id = ObjectId::new();
        let filter =
            IssueFilter::from_query("apitest".to_string(), &query(&[("_id", id.to_hex().as_str())]));
        assert_eq!(
            filter.to_document().unwrap().get_object_id("_id").unwrap(),
            id
        );
    }
}
