use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::handler::AppModule;
use crate::identity::Caller;
use crate::request::{
    CreateReviewRequest, DeleteReviewRequest, GetReviewRequest, ReviewTransformer,
    UpdateReviewRequest,
};
use crate::response::{or_not_found, ReviewPresenter};
use application::service::{
    CreateReviewService, DeleteReviewService, GetReviewService, UpdateReviewService,
};
use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use uuid::Uuid;

pub trait ReviewRouter {
    fn route_review(self) -> Self;
}

impl ReviewRouter for Router<AppModule> {
    fn route_review(self) -> Self {
        self.route(
            "/reviews",
            get(|State(module): State<AppModule>| async move {
                Controller::new((), ReviewPresenter)
                    .bypass(|| module.pgpool().get_all_reviews())
                    .await
                    .map_err(ErrorStatus::from)
            })
            .post(
                |State(module): State<AppModule>,
                 caller: Caller,
                 Json(req): Json<CreateReviewRequest>| async move {
                    Controller::new(ReviewTransformer, ReviewPresenter)
                        .try_intake((caller, req))?
                        .handle(|dto| module.pgpool().create_review(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/reviews/:id",
            get(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(ReviewTransformer, ReviewPresenter)
                        .intake(GetReviewRequest::new(id))
                        .handle(|dto| module.pgpool().get_review(dto))
                        .await
                        .map_err(ErrorStatus::from)
                        .map(or_not_found)
                },
            )
            .patch(
                |State(module): State<AppModule>,
                 Path(id): Path<Uuid>,
                 Json(req): Json<UpdateReviewRequest>| async move {
                    Controller::new(ReviewTransformer, ReviewPresenter)
                        .try_intake((id, req))?
                        .handle(|dto| module.pgpool().update_review(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>, Path(id): Path<Uuid>| async move {
                    Controller::new(ReviewTransformer, ReviewPresenter)
                        .intake(DeleteReviewRequest::new(id))
                        .handle(|dto| module.pgpool().delete_review(dto))
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
