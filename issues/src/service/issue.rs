use std::collections::HashMap;

use mongodb::bson::{doc, Bson};

use common::{
    api::issue::{
        id_text, DeleteIssueRequest, IssueReply, Message, PostIssueRequest, PublicIssue, PutIssueRequest,
    },
    context::Context,
    default_timestamp,
    entities::issue::Issue,
    error::{self, AddCode},
    filter::IssueFilter,
    id::IssueRef,
};

pub enum Created {
    Issue(PublicIssue),
    Rejected(IssueReply),
}

fn required(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.is_empty())
}

pub struct IssueService {
    context: Context,
}

impl IssueService {
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    pub async fn find_all(
        &self,
        project: String,
        query: &HashMap<String, String>,
    ) -> error::Result<Vec<PublicIssue>> {
        let Some(filter) = IssueFilter::from_query(project, query).to_document() else {
            return Ok(vec![]);
        };

        let issues = self.context.try_get_repository::<Issue>()?;
        let found = issues.find_by(filter).await?;

        Ok(found.into_iter().map(PublicIssue::from).collect())
    }

    pub async fn create(&self, project: String, request: PostIssueRequest) -> error::Result<Created> {
        let (Some(issue_title), Some(issue_text), Some(created_by)) = (
            required(request.issue_title),
            required(request.issue_text),
            required(request.created_by),
        ) else {
            return Ok(Created::Rejected(IssueReply::failure(
                Message::MissingRequiredFields,
                None,
            )));
        };

        let issues = self.context.try_get_repository::<Issue>()?;

        let issue = Issue::new(
            project,
            issue_title,
            issue_text,
            created_by,
            request.assigned_to.unwrap_or_default(),
            request.status_text.unwrap_or_default(),
        );

        if !issues.insert(&issue).await? {
            return Err(anyhow::anyhow!("Issue {} already exists", issue.id).code(500));
        }

        let lost = match issues.find("_id", &Bson::ObjectId(issue.id)).await {
            Ok(Some(created)) => return Ok(Created::Issue(created.into())),
            Ok(None) => "not found".to_string(),
            Err(err) => err.to_string(),
        };

        log::warn!("Failed to read back issue {}: {}", issue.id, lost);
        Ok(Created::Rejected(IssueReply::failure(
            Message::CreatedRecordNotFound,
            None,
        )))
    }

    pub async fn change(&self, request: PutIssueRequest) -> error::Result<IssueReply> {
        let raw = request.id.clone();
        let id = match IssueRef::parse(id_text(raw.as_ref()).as_deref()) {
            IssueRef::Missing => return Ok(IssueReply::failure(Message::MissingId, None)),
            IssueRef::Malformed(_) => return Ok(IssueReply::failure(Message::CouldNotUpdate, raw)),
            IssueRef::Valid { id, .. } => id,
        };

        let issues = self.context.try_get_repository::<Issue>()?;

        let update = request.change().to_update(default_timestamp());
        let updated = issues.update(doc! {"_id": id}, update).await?;

        if updated.is_none() {
            return Ok(IssueReply::failure(Message::CouldNotUpdate, raw));
        }

        Ok(IssueReply::success(Message::Updated, raw))
    }

    pub async fn delete(&self, request: DeleteIssueRequest) -> error::Result<IssueReply> {
        let raw = request.id.clone();
        let id = match IssueRef::parse(id_text(raw.as_ref()).as_deref()) {
            IssueRef::Missing => return Ok(IssueReply::failure(Message::MissingId, None)),
            IssueRef::Malformed(_) => return Ok(IssueReply::failure(Message::CouldNotDelete, raw)),
            IssueRef::Valid { id, .. } => id,
        };

        let issues = self.context.try_get_repository::<Issue>()?;

        let Some(_) = issues.delete("_id", &id).await? else {
            return Ok(IssueReply::failure(Message::CouldNotDelete, raw));
        };

        Ok(IssueReply::success(Message::Deleted, raw))
    }
}
