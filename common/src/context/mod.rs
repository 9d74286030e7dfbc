use std::sync::Arc;

use actix_web::{dev::Payload, web::Data, FromRequest, HttpRequest};
use type_map::concurrent::TypeMap;

use crate::{
    error::{self, AddCode, ServiceError},
    repository::RepositoryObject,
};

/// Process-wide state shared by every worker: the store handles, keyed by
/// entity type.
pub struct ServiceState {
    pub service_name: String,
    pub repositories: TypeMap,
}

impl ServiceState {
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            repositories: TypeMap::new(),
        }
    }

    pub fn insert<T: 'static>(&mut self, repository: RepositoryObject<T>) {
        self.repositories.insert(repository);
    }
}

#[derive(Clone)]
pub struct Context(pub Arc<ServiceState>);

impl Context {
    pub fn get_repository<T: 'static>(&self) -> Option<RepositoryObject<T>> {
        self.0.repositories.get::<RepositoryObject<T>>().cloned()
    }

    pub fn try_get_repository<T: 'static>(&self) -> error::Result<RepositoryObject<T>> {
        self.get_repository::<T>().ok_or(
            anyhow::anyhow!(
                "Repository for type {} not found",
                std::any::type_name::<T>()
            )
            .code(500),
        )
    }
}

impl FromRequest for Context {
    type Error = ServiceError;

    type Future = futures_util::future::Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = match req.app_data::<Data<Arc<ServiceState>>>() {
            Some(state) => Ok(Context(Arc::clone(state))),
            None => Err(anyhow::anyhow!("No state provided").code(500)),
        };

        futures_util::future::ready(result)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{entities::issue::Issue, repository::test_repository::TestRepository};

    #[test]
    fn repositories_are_found_by_entity_type() {
        let mut state = ServiceState::new("issues");
        let repo: RepositoryObject<Issue> = Arc::new(TestRepository::<Issue>::new());
        state.insert(repo);

        let context = Context(Arc::new(state));
        assert!(context.get_repository::<Issue>().is_some());
        assert!(context.try_get_repository::<String>().is_err());
    }
}
