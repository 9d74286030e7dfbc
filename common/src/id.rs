use mongodb::bson::oid::ObjectId;

/// Identifier supplied by a client, checked before any store access.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueRef {
    Missing,
    Malformed(String),
    Valid { raw: String, id: ObjectId },
}

impl IssueRef {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some("") => IssueRef::Missing,
            Some(raw) => match ObjectId::parse_str(raw) {
                Ok(id) => IssueRef::Valid {
                    raw: raw.to_string(),
                    id,
                },
                Err(_) => IssueRef::Malformed(raw.to_string()),
            },
        }
    }
}
