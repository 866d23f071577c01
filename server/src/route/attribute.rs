use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::request::{
    AttributeTransformer, CreateAttributeRequest, DeleteAttributeRequest,
    GetAllAttributesRequest, GetAttributeRequest, UpdateAttributeRequest,
};
use crate::response::{or_not_found, AttributePresenter};
use application::service::{
    CreateAttributeService, DeleteAttributeService, GetAttributeService, UpdateAttributeService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use kernel::prelude::entity::AttributeKind;
use uuid::Uuid;

pub trait AttributeRouter {
    fn route_attribute(self) -> Self;
}

fn collection(kind: AttributeKind) -> &'static str {
    match kind {
        AttributeKind::Genre => "/genres",
        AttributeKind::Author => "/authors",
        AttributeKind::Language => "/languages",
        AttributeKind::Bookshelf => "/bookshelves",
        AttributeKind::Publisher => "/publishers",
    }
}

impl AttributeRouter for Router<AppModule> {
    fn route_attribute(self) -> Self {
        AttributeKind::ALL
            .into_iter()
            .fold(self, |router, kind| router.route_kind(kind))
    }
}

trait KindRouter {
    fn route_kind(self, kind: AttributeKind) -> Self;
}

impl KindRouter for Router<AppModule> {
    fn route_kind(self, kind: AttributeKind) -> Self {
        let path = collection(kind);
        self.route(
            path,
            get(move |State(module): State<AppModule>| async move {
                Controller::new(AttributeTransformer, AttributePresenter)
                    .intake(GetAllAttributesRequest::new(kind))
                    .handle(|kind| module.pgpool().get_all_attributes(kind))
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                move |State(module): State<AppModule>,
                      Json(req): Json<CreateAttributeRequest>| async move {
                    Controller::new(AttributeTransformer, AttributePresenter)
                        .try_intake((kind, req))?
                        .handle(|dto| module.pgpool().create_attribute(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            &format!("{path}/:id"),
            get(
                move |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(AttributeTransformer, AttributePresenter)
                        .intake(GetAttributeRequest::new(kind, id))
                        .handle(|dto| module.pgpool().get_attribute(dto))
                        .await
                        .map_err(ErrorStatus::from)
                        .map(or_not_found)
                },
            )
            .patch(
                move |State(module): State<AppModule>,
                      Path(id): Path<Uuid>,
                      Json(req): Json<UpdateAttributeRequest>| async move {
                    Controller::new(AttributeTransformer, AttributePresenter)
                        .try_intake((kind, id, req))?
                        .handle(|dto| module.pgpool().update_attribute(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                move |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(AttributeTransformer, AttributePresenter)
                        .intake(DeleteAttributeRequest::new(kind, id))
                        .handle(|dto| module.pgpool().delete_attribute(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use kernel::prelude::entity::AttributeKind;

    use crate::route::attribute::collection;

    #[test]
    fn collections_are_distinct() {
        let mut paths = AttributeKind::ALL.map(collection).to_vec();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), AttributeKind::ALL.len());
    }
}
