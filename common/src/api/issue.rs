use chrono::{DateTime, TimeZone, Utc};
use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::entities::issue::{Issue, IssueChange};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct PublicIssue {
    #[serde(rename = "_id")]
    pub id: String,
    pub project: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: DateTime<Utc>,
    pub updated_on: DateTime<Utc>,
}

fn from_micros(micros: i64) -> DateTime<Utc> {
    Utc.timestamp_nanos(micros.saturating_mul(1_000))
}

impl From<Issue> for PublicIssue {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id.to_hex(),
            project: issue.project,
            issue_title: issue.issue_title,
            issue_text: issue.issue_text,
            created_by: issue.created_by,
            assigned_to: issue.assigned_to,
            status_text: issue.status_text,
            open: issue.open,
            created_on: from_micros(issue.created_on),
            updated_on: from_micros(issue.updated_on),
        }
    }
}

/// Accepts any scalar where a string is expected; numbers and booleans are
/// kept in their text form.
fn loose_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?
        .as_ref()
        .and_then(loose_text))
}

pub fn loose_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PostIssueRequest {
    #[serde(default, deserialize_with = "loose_string")]
    pub issue_title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub issue_text: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub status_text: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct PutIssueRequest {
    /// Kept as sent so replies can echo it back unchanged.
    #[serde(rename = "_id", default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
    #[serde(default, deserialize_with = "loose_string")]
    pub issue_title: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub issue_text: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub created_by: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub assigned_to: Option<String>,
    #[serde(default, deserialize_with = "loose_string")]
    pub status_text: Option<String>,
    /// Any truthy value closes the issue.
    #[schema(value_type = Option<Object>)]
    pub open: Option<Value>,
}

impl PutIssueRequest {
    pub fn change(&self) -> IssueChange {
        IssueChange {
            issue_title: self.issue_title.clone(),
            issue_text: self.issue_text.clone(),
            created_by: self.created_by.clone(),
            assigned_to: self.assigned_to.clone(),
            status_text: self.status_text.clone(),
            close: self.open.as_ref().map_or(false, is_truthy),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct DeleteIssueRequest {
    #[serde(rename = "_id", default)]
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
}

/// Text form of a supplied identifier. Falsy values count as absent.
pub fn id_text(id: Option<&Value>) -> Option<String> {
    id.filter(|id| is_truthy(id)).and_then(loose_text)
}

/// Truthiness of a loosely typed form or JSON value. Forms send `open=true`
/// as a string, JSON clients send a boolean.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    #[display(fmt = "missing required fields")]
    MissingRequiredFields,
    #[display(fmt = "Unable to locate newly created record")]
    CreatedRecordNotFound,
    #[display(fmt = "missing _id")]
    MissingId,
    #[display(fmt = "could not update")]
    CouldNotUpdate,
    #[display(fmt = "could not delete")]
    CouldNotDelete,
    #[display(fmt = "successfully updated")]
    Updated,
    #[display(fmt = "successfully deleted")]
    Deleted,
}

/// Outcome of a write that did not return an issue. Validation failures are
/// replies too, sent with status 200.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct IssueReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
}

impl IssueReply {
    pub fn success(message: Message, id: Option<Value>) -> Self {
        Self {
            result: Some(message.to_string()),
            error: None,
            id,
        }
    }

    pub fn failure(message: Message, id: Option<Value>) -> Self {
        Self {
            result: None,
            error: Some(message.to_string()),
            id,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn truthiness_follows_loose_semantics() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!("true")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!(1)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn replies_omit_empty_keys() {
        let reply = IssueReply::failure(Message::MissingId, None);
        assert_eq!(serde_json::to_value(reply).unwrap(), json!({"error": "missing _id"}));

        let reply = IssueReply::success(Message::Updated, Some(json!("abc")));
        assert_eq!(
            serde_json::to_value(reply).unwrap(),
            json!({"result": "successfully updated", "_id": "abc"})
        );
    }

    #[test]
    fn request_fields_accept_any_scalar() {
        let request: PostIssueRequest = serde_json::from_value(json!({
            "issue_title": 5,
            "issue_text": true,
            "created_by": "Joe",
            "assigned_to": null,
        }))
        .unwrap();
        assert_eq!(request.issue_title.as_deref(), Some("5"));
        assert_eq!(request.issue_text.as_deref(), Some("true"));
        assert_eq!(request.created_by.as_deref(), Some("Joe"));
        assert_eq!(request.assigned_to, None);
        assert_eq!(request.status_text, None);
    }

    #[test]
    fn id_text_treats_falsy_as_absent() {
        assert_eq!(id_text(None), None);
        assert_eq!(id_text(Some(&json!(""))), None);
        assert_eq!(id_text(Some(&json!(0))), None);
        assert_eq!(id_text(Some(&json!(123))).as_deref(), Some("123"));
        assert_eq!(id_text(Some(&json!("abc"))).as_deref(), Some("abc"));
    }

    #[test]
    fn public_issue_renders_hex_id_and_times() {
        let issue = Issue::new(
            "testing".to_string(),
            "Title".to_string(),
            "Text".to_string(),
            "Joe".to_string(),
            String::new(),
            String::new(),
        );
        let id = issue.id.to_hex();
        let created_on = issue.created_on;

        let public = PublicIssue::from(issue);
        assert_eq!(public.id, id);
        assert_eq!(public.created_on.timestamp_micros(), created_on);
        assert_eq!(public.created_on, public.updated_on);
    }
}
