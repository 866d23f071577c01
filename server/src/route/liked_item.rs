use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::request::{CreateLikedItemRequest, DeleteLikedItemRequest, LikedItemTransformer};
use crate::response::LikedItemPresenter;
use application::service::{
    CreateLikedItemService, DeleteLikedItemService, GetLikedItemsService,
};
use axum::extract::{Path, State};
use axum::routing::{delete, get};
use axum::{Json, Router};
use uuid::Uuid;

pub trait LikedItemRouter {
    fn route_liked_item(self) -> Self;
}

impl LikedItemRouter for Router<AppModule> {
    fn route_liked_item(self) -> Self {
        self.route(
            "/liked",
            get(
                |State(module): State<AppModule>, caller: Caller| async move {
                    Controller::new(LikedItemTransformer, LikedItemPresenter)
                        .intake(caller)
                        .handle(|dto| module.pgpool().get_liked_items(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .post(
                |State(module): State<AppModule>,
                 caller: Caller,
                 Json(req): Json<CreateLikedItemRequest>| async move {
                    Controller::new(LikedItemTransformer, LikedItemPresenter)
                        .intake((caller, req))
                        .handle(|dto| module.pgpool().create_liked_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/liked/:id",
            delete(
                |State(module): State<AppModule>, caller: Caller, Path(id): Path<Uuid>| async move {
                    Controller::new(LikedItemTransformer, LikedItemPresenter)
                        .intake(DeleteLikedItemRequest::new(caller, id))
                        .handle(|dto| module.pgpool().delete_liked_item(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
