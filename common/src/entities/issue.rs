use mongodb::bson::{doc, oid::ObjectId, Document};
use serde::{Deserialize, Serialize};

use crate::{default_timestamp, repository::Entity};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Issue {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    pub project: String,

    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    #[serde(default)]
    pub assigned_to: String,
    #[serde(default)]
    pub status_text: String,

    pub open: bool,
    pub created_on: i64,
    #[serde(default = "default_timestamp")]
    pub updated_on: i64,
}

impl Entity for Issue {
    fn id(&self) -> ObjectId {
        self.id
    }
}

impl Issue {
    pub fn new(
        project: String,
        issue_title: String,
        issue_text: String,
        created_by: String,
        assigned_to: String,
        status_text: String,
    ) -> Self {
        let now = default_timestamp();
        Self {
            id: ObjectId::new(),
            project,
            issue_title,
            issue_text,
            created_by,
            assigned_to,
            status_text,
            open: true,
            created_on: now,
            updated_on: now,
        }
    }
}

/// Partial change of an issue, as accepted by `PUT /api/issues/{project}`.
///
/// Empty strings leave the stored value untouched. `open` can only close an
/// issue: any truthy value sets it to `false`, there is no way back to `true`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IssueChange {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub close: bool,
}

impl IssueChange {
    /// Builds the `$set` document. `updated_on` is always part of it.
    pub fn to_update(&self, now: i64) -> Document {
        let mut set = doc! {};

        let fields = [
            ("issue_title", &self.issue_title),
            ("issue_text", &self.issue_text),
            ("created_by", &self.created_by),
            ("assigned_to", &self.assigned_to),
            ("status_text", &self.status_text),
        ];
        for (name, value) in fields {
            if let Some(value) = value.as_ref().filter(|v| !v.is_empty()) {
                set.insert(name, value.clone());
            }
        }

        if self.close {
            set.insert("open", false);
        }

        set.insert("updated_on", now);
        doc! { "$set": set }
    }
}
