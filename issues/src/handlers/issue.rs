use std::collections::HashMap;

use actix_web::{
    delete, get, post, put,
    web::{Form, Json, Path, Query},
    Either, HttpRequest, HttpResponse,
};

use common::{
    api::issue::{DeleteIssueRequest, IssueReply, PostIssueRequest, PublicIssue, PutIssueRequest},
    context::Context,
    error::{self, AddCode},
};

use crate::service::issue::{Created, IssueService};

/// Request bodies come as JSON from API clients and url-encoded from HTML forms.
/// A body that is absent or cannot be read is handled as an empty one.
pub type Body<T> = Option<Either<Json<T>, Form<T>>>;

fn body<T: Default>(data: Body<T>) -> T {
    match data {
        Some(Either::Left(Json(data))) => data,
        Some(Either::Right(Form(data))) => data,
        None => T::default(),
    }
}

#[utoipa::path(
    context_path = "/api",
    params(
        ("_id" = Option<String>, Query, description = "Issue id"),
        ("issue_title" = Option<String>, Query, description = "Exact issue title"),
        ("issue_text" = Option<String>, Query, description = "Exact issue text"),
        ("created_by" = Option<String>, Query, description = "Author of the issue"),
        ("assigned_to" = Option<String>, Query, description = "Assignee of the issue"),
        ("status_text" = Option<String>, Query, description = "Free-form status"),
        ("open" = Option<bool>, Query, description = "Whether the issue is still open"),
    ),
    responses(
        (status = 200, body = [PublicIssue])
    )
)]
#[get("/issues/{project}")]
pub async fn get_issues(
    context: Context,
    project: Path<String>,
    req: HttpRequest,
) -> error::Result<Json<Vec<PublicIssue>>> {
    let Query(query) = Query::<HashMap<String, String>>::from_query(req.query_string())
        .map_err(|err| err.code(400))?;

    Ok(Json(
        IssueService::new(context)
            .find_all(project.into_inner(), &query)
            .await?,
    ))
}

#[utoipa::path(
    context_path = "/api",
    request_body(
        content = PostIssueRequest,
    ),
    responses(
        (status = 200, description = "Created issue, or an error reply", body = PublicIssue)
    )
)]
#[post("/issues/{project}")]
pub async fn post_issue(
    context: Context,
    project: Path<String>,
    data: Body<PostIssueRequest>,
) -> error::Result<HttpResponse> {
    let created = IssueService::new(context)
        .create(project.into_inner(), body(data))
        .await?;

    match created {
        Created::Issue(issue) => Ok(HttpResponse::Ok().json(issue)),
        Created::Rejected(reply) => Ok(HttpResponse::Ok().json(reply)),
    }
}

#[utoipa::path(
    context_path = "/api",
    request_body(
        content = PutIssueRequest,
    ),
    responses(
        (status = 200, body = IssueReply)
    )
)]
#[put("/issues/{project}")]
pub async fn put_issue(
    context: Context,
    _project: Path<String>,
    data: Body<PutIssueRequest>,
) -> error::Result<Json<IssueReply>> {
    Ok(Json(IssueService::new(context).change(body(data)).await?))
}

#[utoipa::path(
    context_path = "/api",
    request_body(
        content = DeleteIssueRequest,
    ),
    responses(
        (status = 200, body = IssueReply)
    )
)]
#[delete("/issues/{project}")]
pub async fn delete_issue(
    context: Context,
    _project: Path<String>,
    data: Body<DeleteIssueRequest>,
) -> error::Result<Json<IssueReply>> {
    Ok(Json(IssueService::new(context).delete(body(data)).await?))
}
