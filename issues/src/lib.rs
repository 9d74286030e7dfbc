pub mod handlers;
pub mod service;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware, web, App,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::{
    api::issue::{DeleteIssueRequest, IssueReply, PostIssueRequest, PublicIssue, PutIssueRequest},
    context::ServiceState,
    entities::issue::Issue,
    repository::{test_repository::TestRepository, RepositoryObject},
};
pub use handlers::issue::*;

pub const SERVICE_NAME: &str = "issues";
pub const API_PREFIX: &str = "/api";

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::issue::get_issues,
        handlers::issue::post_issue,
        handlers::issue::put_issue,
        handlers::issue::delete_issue,
    ),
    components(schemas(
        PublicIssue,
        PostIssueRequest,
        PutIssueRequest,
        DeleteIssueRequest,
        IssueReply,
    ))
)]
pub struct IssuesServiceDoc;

pub fn create_app(
    state: Arc<ServiceState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let cors = Cors::permissive();

    App::new()
        .wrap(cors)
        .wrap(middleware::Logger::default())
        .app_data(web::Data::new(state))
        .service(
            web::scope(API_PREFIX)
                .service(get_issues)
                .service(post_issue)
                .service(put_issue)
                .service(delete_issue),
        )
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-doc/openapi.json", IssuesServiceDoc::openapi()),
        )
}

pub fn create_test_app() -> App<
    impl ServiceFactory<
        ServiceRequest,
        Response = ServiceResponse<impl MessageBody>,
        Config = (),
        InitError = (),
        Error = actix_web::Error,
    >,
> {
    let mut state = ServiceState::new(SERVICE_NAME);
    let issue_repo: RepositoryObject<Issue> = Arc::new(TestRepository::<Issue>::new());
    state.insert(issue_repo);

    create_app(Arc::new(state))
}
