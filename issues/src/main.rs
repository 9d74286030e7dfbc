use std::sync::Arc;

use actix_web::HttpServer;

use common::{
    config::Config,
    context::ServiceState,
    entities::issue::Issue,
    repository::mongo_repository::MongoRepository,
    verification::verify,
};
use issues::{create_app, SERVICE_NAME};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;

    let issue_repo: MongoRepository<Issue> =
        MongoRepository::new(&config.mongo_uri, &config.database, &config.collection).await?;

    verify::<Issue>(&issue_repo.collection, true).await?;

    let mut state = ServiceState::new(SERVICE_NAME);
    state.insert::<Issue>(Arc::new(issue_repo));
    let state = Arc::new(state);

    log::info!(
        "Starting {} service on {}:{}",
        state.service_name,
        config.host,
        config.port
    );

    HttpServer::new(move || create_app(state.clone()))
        .bind((config.host.as_str(), config.port))?
        .run()
        .await?;

    Ok(())
}
